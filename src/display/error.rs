/*
 *  display/error.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the bus session and controller protocol
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
use thiserror::Error;

/// Error type for every bus and controller operation
///
/// Nothing here is retried or recovered locally. A failure part way through
/// `initialize` or `fill` leaves the panel with whatever the frames before it
/// produced; re-running the whole operation restores the documented state.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The I2C device node could not be opened (missing, permissions, wrong path)
    #[error("failed to open I2C device {path}: {source}")]
    DeviceOpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Binding the peripheral address to the open handle failed
    #[error("failed to bind I2C address 0x{address:02X}: {source}")]
    AddressBindFailed {
        address: u8,
        #[source]
        source: io::Error,
    },

    /// The session was never opened or has already been closed
    #[error("bus session is not open")]
    NotInitialized,

    /// The bus accepted fewer bytes than were handed to it
    #[error("incomplete transfer: wrote {written} of {expected} bytes")]
    TransferIncomplete {
        expected: usize,
        written: usize,
        #[source]
        source: Option<io::Error>,
    },
}

impl DisplayError {
    /// Short write with no underlying OS error
    pub(crate) fn short_write(expected: usize, written: usize) -> Self {
        DisplayError::TransferIncomplete { expected, written, source: None }
    }

    /// Write that failed outright, nothing reached the controller
    pub(crate) fn failed_write(expected: usize, source: io::Error) -> Self {
        DisplayError::TransferIncomplete { expected, written: 0, source: Some(source) }
    }
}
