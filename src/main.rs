/*
 *  main.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use oled_bringup::config::{self, Backend, BusConfig, Cli, Config};
use oled_bringup::display::{BusSession, DisplayError, HalSession, I2cSession, Ssd1306};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli).context("loading configuration")?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        print!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let result = run(&cfg);
    if let Err(e) = &result {
        error!("SSD1306 bring-up failed: {}", e);
    }
    result.context("SSD1306 bring-up failed")
}

/// Open the configured session and bring the panel up
fn run(cfg: &Config) -> Result<(), DisplayError> {
    let BusConfig::I2c { bus, address, backend } = cfg.bus();
    match backend.unwrap_or_default() {
        Backend::I2cdev => bring_up(I2cSession::open(&bus, address)?, cfg),
        Backend::Hal => bring_up(HalSession::open_linux(&bus, address)?, cfg),
    }
}

/// Init, apply post-init settings, then close the session on every path
fn bring_up<S: BusSession>(session: S, cfg: &Config) -> Result<(), DisplayError> {
    let mut oled = Ssd1306::new(session);
    let result = configure(&mut oled, cfg);

    let mut session = oled.release();
    session.close();
    result
}

fn configure<S: BusSession>(oled: &mut Ssd1306<S>, cfg: &Config) -> Result<(), DisplayError> {
    oled.init()?;

    if let Some(level) = cfg.contrast() {
        info!("Setting contrast to {}", level);
        oled.set_contrast(level)?;
    }
    if let Some(inverted) = cfg.invert() {
        oled.set_invert(inverted)?;
    }
    if let Some(mode) = cfg.fill() {
        info!("Filling panel {:?}", mode);
        oled.fill(mode.is_on())?;
    }
    Ok(())
}
