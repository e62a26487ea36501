/*
 *  display/frame.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wire frames: control-byte prefixed command and page data transfers
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

use arrayvec::ArrayVec;

use crate::display::WIDTH;

/// Control byte: the rest of the transfer is commands and parameters
pub const COMMAND_MARKER: u8 = 0x00;

/// Control byte: the rest of the transfer goes into graphics RAM
pub const DATA_MARKER: u8 = 0x40;

/// Marker plus one full page of columns
pub const PAGE_FRAME_LEN: usize = WIDTH + 1;

/// Marker, opcode and at most one parameter, kept on the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: ArrayVec<u8, 3>,
}

impl CommandFrame {
    pub(crate) fn single(opcode: u8) -> Self {
        let mut bytes = ArrayVec::new();
        bytes.push(COMMAND_MARKER);
        bytes.push(opcode);
        Self { bytes }
    }

    pub(crate) fn with_param(opcode: u8, param: u8) -> Self {
        let mut frame = Self::single(opcode);
        frame.bytes.push(param);
        frame
    }

    /// Exactly what goes on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One page of display data ready for transmission
///
/// Always `PAGE_FRAME_LEN` bytes: the data marker followed by one byte per
/// column, bit 0 being the top row of the page. It has to go out as a single
/// transfer so the column pointer auto-increments across the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFrame {
    bytes: [u8; PAGE_FRAME_LEN],
}

impl PageFrame {
    /// Every column all set (`on`) or all clear
    pub fn filled(on: bool) -> Self {
        let mut bytes = [if on { 0xFF } else { 0x00 }; PAGE_FRAME_LEN];
        bytes[0] = DATA_MARKER;
        Self { bytes }
    }

    /// Copy of one framebuffer page
    pub fn from_columns(columns: &[u8; WIDTH]) -> Self {
        let mut bytes = [0u8; PAGE_FRAME_LEN];
        bytes[0] = DATA_MARKER;
        bytes[1..].copy_from_slice(columns);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; PAGE_FRAME_LEN] {
        &self.bytes
    }
}
