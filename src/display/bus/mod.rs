/*
 *  display/bus/mod.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bus session abstraction - an open, address-bound I2C handle
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

use std::io;

use crate::display::error::DisplayError;

pub mod hal;
pub mod i2cdev;
pub mod mock;

pub use hal::HalSession;
pub use i2cdev::I2cSession;
pub use mock::{MockSession, MockSessionState};

/// I2C character device the panel hangs off
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// 7-bit address of the controller (SA0 tied low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Exclusive, address-bound access to the physical bus
///
/// Every transmission is one blocking bus transaction carrying the whole byte
/// slice. Implementations never split or batch what they are given, and must
/// refuse to transmit outside the open window with `NotInitialized`.
///
/// Sessions are not shared: the controller protocol takes `&mut` for the
/// duration of each operation. Callers that need a session from several
/// threads wrap the driver in a `Mutex` themselves.
pub trait BusSession {
    /// The bound 7-bit peripheral address
    fn address(&self) -> u8;

    /// Whether transmissions are currently allowed
    fn is_open(&self) -> bool;

    /// Write `bytes` as a single transaction
    ///
    /// A short write is a hard failure (`TransferIncomplete`); there is no
    /// partial-success path.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Release the handle. Later transmissions fail with `NotInitialized`.
    fn close(&mut self);
}

/// Reject anything that does not fit in 7 bits before it reaches the OS
pub(crate) fn check_address(address: u8) -> Result<(), DisplayError> {
    if address > 0x7F {
        return Err(DisplayError::AddressBindFailed {
            address,
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "I2C addresses are 7-bit (0x00..=0x7F)",
            ),
        });
    }
    Ok(())
}
