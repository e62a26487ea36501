/*
 *  display/mod.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - bus sessions and the SSD1306 controller protocol
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

pub mod bus;
pub mod command;
pub mod drivers;
pub mod error;
pub mod frame;
pub mod framebuffer;

// Panel geometry. Changing the height also means changing the multiplex
// ratio, the COM pins config and PAGES together.
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const PAGES: usize = HEIGHT / 8;

// Re-export commonly used types
pub use bus::{BusSession, HalSession, I2cSession, MockSession};
pub use drivers::ssd1306::{self, Ssd1306};
pub use error::DisplayError;
pub use framebuffer::Framebuffer;
