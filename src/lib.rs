/*
 *  lib.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
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

//! # oled-bringup
//!
//! Driver for a 128x64 SSD1306 OLED on a Linux I2C bus.
//!
//! Two layers:
//!
//! - a bus session ([`display::BusSession`]): an open `/dev/i2c-N` handle
//!   bound to the controller's address, writing one transaction per call;
//! - the controller protocol ([`display::ssd1306`]): the fixed init sequence
//!   and the page-addressed RAM transfer, every transfer prefixed with its
//!   control byte (`0x00` commands, `0x40` data).
//!
//! ```no_run
//! use oled_bringup::display::{ssd1306, BusSession, I2cSession};
//!
//! let mut session = I2cSession::open("/dev/i2c-1", 0x3C)?;
//! ssd1306::initialize(&mut session)?;
//! ssd1306::fill(&mut session, true)?;
//! session.close();
//! # Ok::<(), oled_bringup::display::DisplayError>(())
//! ```

pub mod config;
pub mod display;
