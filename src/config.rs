/*
 *  config.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, command line
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::bus::{DEFAULT_ADDRESS, DEFAULT_I2C_BUS};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub bus: Option<BusConfig>,
    pub contrast: Option<u8>,       // applied after init, init itself always uses 0xCF
    pub invert: Option<bool>,
    pub fill: Option<FillMode>,     // what to leave on the panel after init
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusConfig {
    I2c {
        bus: String,        // e.g. "/dev/i2c-1"
        address: u8,        // e.g. 0x3C (I2C addresses are 7-bit, stored in u8)
        #[serde(default)]
        backend: Option<Backend>,
    },
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig::I2c {
            bus: DEFAULT_I2C_BUS.to_string(),
            address: DEFAULT_ADDRESS,
            backend: None,
        }
    }
}

/// Which bus session implementation talks to the device node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Raw i2c-dev writes, reports short writes
    #[default]
    I2cdev,
    /// linux-embedded-hal I2cdev through embedded-hal
    Hal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    On,
    Off,
}

impl FillMode {
    pub fn is_on(self) -> bool {
        self == FillMode::On
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "oled-bringup", about = "Initialize an SSD1306 OLED over I2C", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// I2C character device, e.g. /dev/i2c-1
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub i2c_bus: Option<String>,
    /// 7-bit address, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_address)]
    pub i2c_address: Option<u8>,
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,
    /// Fill the panel after init
    #[arg(long, value_enum)]
    pub fill: Option<FillMode>,
    #[arg(long)]
    pub contrast: Option<u8>,
    #[arg(long, action = ArgAction::Set)]
    pub invert: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Accepts "60", "0x3C" or "0X3c"
pub fn parse_address(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{s}': {e}"))
}

/// Public entry point: read YAML, merge CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/oled-bringup/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/oled-bringup/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/oled-bringup.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["oled-bringup.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.bus.is_some()         { dst.bus = src.bus; }
    if src.contrast.is_some()    { dst.contrast = src.contrast; }
    if src.invert.is_some()      { dst.invert = src.invert; }
    if src.fill.is_some()        { dst.fill = src.fill; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    let any_display = cli.i2c_bus.is_some()
        || cli.i2c_address.is_some()
        || cli.backend.is_some()
        || cli.fill.is_some()
        || cli.contrast.is_some()
        || cli.invert.is_some();

    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.fill.is_some()        { display.fill = cli.fill; }
        if cli.contrast.is_some()    { display.contrast = cli.contrast; }
        if cli.invert.is_some()      { display.invert = cli.invert; }

        if cli.i2c_bus.is_some() || cli.i2c_address.is_some() || cli.backend.is_some() {
            let BusConfig::I2c { bus, address, backend } =
                display.bus.get_or_insert_with(BusConfig::default);
            if let Some(b) = cli.i2c_bus.as_ref() { *bus = b.clone(); }
            if let Some(a) = cli.i2c_address     { *address = a; }
            if cli.backend.is_some()             { *backend = cli.backend; }
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(ConfigError::Validation(format!("unknown log_level '{level}'"))),
        }
    }
    if let Some(BusConfig::I2c { bus, address, .. }) = cfg.display.as_ref().and_then(|d| d.bus.as_ref()) {
        if bus.trim().is_empty() {
            return Err(ConfigError::Validation("display bus path must not be empty".into()));
        }
        if *address > 0x7F {
            return Err(ConfigError::Validation(format!(
                "display address 0x{address:02X} is not a 7-bit I2C address"
            )));
        }
    }
    Ok(())
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Effective bus wiring, defaults filled in
    pub fn bus(&self) -> BusConfig {
        self.display
            .as_ref()
            .and_then(|d| d.bus.clone())
            .unwrap_or_default()
    }

    pub fn fill(&self) -> Option<FillMode> {
        self.display.as_ref().and_then(|d| d.fill)
    }

    pub fn contrast(&self) -> Option<u8> {
        self.display.as_ref().and_then(|d| d.contrast)
    }

    pub fn invert(&self) -> Option<bool> {
        self.display.as_ref().and_then(|d| d.invert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["oled-bringup"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x3C"), Ok(0x3C));
        assert_eq!(parse_address("0X3d"), Ok(0x3D));
        assert_eq!(parse_address("60"), Ok(60));
        assert!(parse_address("0x100").is_err());
        assert!(parse_address("oled").is_err());
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(
            cfg.bus(),
            BusConfig::I2c { bus: "/dev/i2c-1".into(), address: 0x3C, backend: None }
        );
        assert!(cfg.fill().is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let cfg = parse_yaml(
            "log_level: debug\n\
             display:\n  \
               bus:\n    \
                 type: i2c\n    \
                 bus: /dev/i2c-3\n    \
                 address: 61\n    \
                 backend: hal\n  \
               contrast: 32\n  \
               fill: on\n",
        )
        .unwrap();

        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(
            cfg.bus(),
            BusConfig::I2c { bus: "/dev/i2c-3".into(), address: 0x3D, backend: Some(Backend::Hal) }
        );
        assert_eq!(cfg.contrast(), Some(32));
        assert_eq!(cfg.fill(), Some(FillMode::On));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut cfg = parse_yaml("display:\n  contrast: 10\n  invert: true\n").unwrap();
        merge(&mut cfg, parse_yaml("display:\n  contrast: 200\n").unwrap());
        assert_eq!(cfg.contrast(), Some(200));
        assert_eq!(cfg.invert(), Some(true));
    }

    #[test]
    fn test_cli_overrides_bus_fields() {
        let mut cfg = parse_yaml(
            "display:\n  bus:\n    type: i2c\n    bus: /dev/i2c-0\n    address: 60\n",
        )
        .unwrap();
        apply_cli_overrides(&mut cfg, &cli(&["--i2c-address", "0x3D", "--fill", "off"]));

        assert_eq!(
            cfg.bus(),
            BusConfig::I2c { bus: "/dev/i2c-0".into(), address: 0x3D, backend: None }
        );
        assert_eq!(cfg.fill(), Some(FillMode::Off));
    }

    #[test]
    fn test_cli_creates_display_section() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--i2c-bus", "/dev/i2c-7", "--backend", "hal"]));
        assert_eq!(
            cfg.bus(),
            BusConfig::I2c { bus: "/dev/i2c-7".into(), address: 0x3C, backend: Some(Backend::Hal) }
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--i2c-address", "0x80"]));
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));

        let cfg = parse_yaml("log_level: loud\n").unwrap();
        assert!(validate(&cfg).is_err());

        let cfg = parse_yaml("display:\n  bus:\n    type: i2c\n    bus: ''\n    address: 60\n").unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_load_missing_config_file() {
        let err = load(&cli(&["--config", "/nonexistent/oled-bringup.yaml"])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
