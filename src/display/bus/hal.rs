/*
 *  display/bus/hal.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bus session over any embedded-hal I2C implementation
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

use embedded_hal::i2c::I2c;
use linux_embedded_hal::I2cdev;
use log::{info, trace, warn};

use crate::display::bus::{check_address, BusSession};
use crate::display::error::DisplayError;

/// Bus session wrapping an `embedded_hal::i2c::I2c` bus
///
/// The HAL addresses every write itself, so binding is just validation here.
/// `I2c::write` is all-or-nothing, which means a NACK surfaces as a
/// `TransferIncomplete` with nothing written rather than a byte count.
pub struct HalSession<I> {
    bus: Option<I>,
    address: u8,
}

impl<I: I2c> HalSession<I> {
    /// Wrap an already opened bus
    pub fn new(bus: I, address: u8) -> Result<Self, DisplayError> {
        check_address(address)?;
        Ok(Self { bus: Some(bus), address })
    }

    /// Take the bus back, closing the session
    pub fn into_inner(mut self) -> Option<I> {
        self.bus.take()
    }
}

impl HalSession<I2cdev> {
    /// Open a Linux i2c-dev node through linux-embedded-hal
    pub fn open_linux(path: &str, address: u8) -> Result<Self, DisplayError> {
        info!("Opening {} (embedded-hal) for SSD1306 at address 0x{:02X}", path, address);

        check_address(address)?;

        let bus = I2cdev::new(path).map_err(|e| DisplayError::DeviceOpenFailed {
            path: path.to_string(),
            source: io::Error::from(e),
        })?;

        Self::new(bus, address)
    }
}

impl<I: I2c> BusSession for HalSession<I> {
    fn address(&self) -> u8 {
        self.address
    }

    fn is_open(&self) -> bool {
        self.bus.is_some()
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let bus = self.bus.as_mut().ok_or(DisplayError::NotInitialized)?;
        trace!("i2c 0x{:02X} <- {} bytes {:02X?}", self.address, bytes.len(), bytes);

        bus.write(self.address, bytes).map_err(|e| {
            warn!("I2C write to 0x{:02X} failed: {:?}", self.address, e);
            DisplayError::failed_write(bytes.len(), io::Error::other(format!("{:?}", e)))
        })
    }

    fn close(&mut self) {
        if self.bus.take().is_some() {
            info!("Released I2C bus for 0x{:02X}", self.address);
        }
    }
}
