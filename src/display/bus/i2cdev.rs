/*
 *  display/bus/i2cdev.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Linux i2c-dev bus session (open, I2C_SLAVE ioctl, raw writes)
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

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::AsRawFd;

use log::{info, trace, warn};

use crate::display::bus::{check_address, BusSession};
use crate::display::error::DisplayError;

/// ioctl request from <linux/i2c-dev.h>: bind the slave address used by read/write
const I2C_SLAVE: u16 = 0x0703;

/// Bus session over a Linux `/dev/i2c-N` character device
///
/// The raw file handle is used instead of a HAL so that short writes are
/// visible: `write(2)` on i2c-dev reports the number of bytes the adapter
/// pushed before a NACK.
///
/// The handle is closed by `close()` or on drop, whichever comes first.
#[derive(Debug)]
pub struct I2cSession {
    file: Option<File>,
    path: String,
    address: u8,
}

impl I2cSession {
    /// Open `path` for read+write and bind `address` to it
    ///
    /// # Arguments
    ///
    /// * `path` - Path to I2C device (e.g., "/dev/i2c-1")
    /// * `address` - 7-bit I2C address (typically 0x3C or 0x3D)
    pub fn open(path: &str, address: u8) -> Result<Self, DisplayError> {
        info!("Opening {} for SSD1306 at address 0x{:02X}", path, address);
        check_address(address)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| DisplayError::DeviceOpenFailed {
                path: path.to_string(),
                source,
            })?;

        bind_address(&file, address)?;

        Ok(Self {
            file: Some(file),
            path: path.to_string(),
            address,
        })
    }
}

/// `address` has already been through `check_address`
fn bind_address(file: &File, address: u8) -> Result<(), DisplayError> {
    // SAFETY: the descriptor stays valid for the borrow of `file`, and
    // I2C_SLAVE takes the address by value with no out-pointer.
    let rc = unsafe {
        libc::ioctl(
            file.as_raw_fd(),
            I2C_SLAVE as _,
            libc::c_ulong::from(address),
        )
    };
    if rc < 0 {
        return Err(DisplayError::AddressBindFailed {
            address,
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}

impl BusSession for I2cSession {
    fn address(&self) -> u8 {
        self.address
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let file = self.file.as_mut().ok_or(DisplayError::NotInitialized)?;
        trace!("i2c 0x{:02X} <- {} bytes {:02X?}", self.address, bytes.len(), bytes);

        // a single write(2) is a single i2c transaction; write_all would
        // silently split a short write into a second transaction
        match file.write(bytes) {
            Ok(n) if n == bytes.len() => Ok(()),
            Ok(n) => {
                warn!("Short write on {}: {} of {} bytes", self.path, n, bytes.len());
                Err(DisplayError::short_write(bytes.len(), n))
            }
            Err(e) => {
                warn!("Write on {} failed: {}", self.path, e);
                Err(DisplayError::failed_write(bytes.len(), e))
            }
        }
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            info!("Closed {}", self.path);
        }
    }
}

impl Drop for I2cSession {
    fn drop(&mut self) {
        self.close();
    }
}
