/*
 *  display/command.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  SSD1306 command set and its encoding into command frames
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

use crate::display::frame::CommandFrame;

// Fundamental
pub const SET_CONTRAST: u8 = 0x81;
pub const ENTIRE_DISPLAY_RESUME: u8 = 0xA4; // | 1 = all pixels on
pub const NORMAL_DISPLAY: u8 = 0xA6; // | 1 = inverted
pub const DISPLAY_OFF: u8 = 0xAE;
pub const DISPLAY_ON: u8 = 0xAF;

// Addressing
pub const SET_LOWER_COLUMN: u8 = 0x00; // | low nibble
pub const SET_HIGHER_COLUMN: u8 = 0x10; // | high nibble
pub const SET_MEMORY_MODE: u8 = 0x20;
pub const SET_PAGE_START: u8 = 0xB0; // | page

// Hardware configuration
pub const SET_START_LINE: u8 = 0x40; // | line
pub const SET_SEGMENT_REMAP: u8 = 0xA0; // | 1 = column 127 mapped to SEG0
pub const SET_MULTIPLEX: u8 = 0xA8;
pub const COM_SCAN_INC: u8 = 0xC0;
pub const COM_SCAN_DEC: u8 = 0xC8;
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
pub const SET_COM_PINS: u8 = 0xDA;

// Timing and driving
pub const SET_CLOCK_DIV: u8 = 0xD5;
pub const SET_PRECHARGE: u8 = 0xD9;
pub const SET_VCOM_DESELECT: u8 = 0xDB;
pub const CHARGE_PUMP: u8 = 0x8D;

const CHARGE_PUMP_ENABLE: u8 = 0x14;
const CHARGE_PUMP_DISABLE: u8 = 0x10;

/// Parameter of `SET_MEMORY_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AddressingMode {
    Horizontal = 0x00,
    Vertical = 0x01,
    Page = 0x02,
}

/// One controller instruction, with its parameter if it takes one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Panel on (`AF`) or sleep (`AE`)
    DisplayOn(bool),
    /// Clock divide ratio (low nibble) and oscillator frequency (high nibble)
    ClockDivide(u8),
    /// Multiplex ratio, rows - 1
    Multiplex(u8),
    /// Vertical shift by COM, 0..=63
    DisplayOffset(u8),
    /// RAM row shown on the first line, 0..=63
    StartLine(u8),
    /// Internal DC/DC charge pump
    ChargePump(bool),
    AddressingMode(AddressingMode),
    /// Column 127 mapped to SEG0 when true
    SegmentRemap(bool),
    /// Scan from COM[N-1] to COM0 when true
    ComScanReversed(bool),
    /// COM pins hardware configuration byte
    ComPins(u8),
    Contrast(u8),
    /// Phase 1 (low nibble) and phase 2 (high nibble) pre-charge periods
    PreCharge(u8),
    /// VCOMH deselect level byte
    VcomhDeselect(u8),
    /// Light every pixel regardless of RAM when true
    EntireDisplayOn(bool),
    /// Inverted polarity when true
    Invert(bool),
    /// Page start address for page addressing, 0..=7
    PageStart(u8),
    /// Low nibble of the column start address
    LowerColumn(u8),
    /// High nibble of the column start address
    UpperColumn(u8),
}

impl Command {
    /// Encode as a `0x00`-prefixed command frame
    ///
    /// Values that carry an address are masked to their field width, the way
    /// the controller would decode them.
    pub fn encode(self) -> CommandFrame {
        match self {
            Command::DisplayOn(on) => CommandFrame::single(if on { DISPLAY_ON } else { DISPLAY_OFF }),
            Command::ClockDivide(value) => CommandFrame::with_param(SET_CLOCK_DIV, value),
            Command::Multiplex(ratio) => CommandFrame::with_param(SET_MULTIPLEX, ratio & 0x3F),
            Command::DisplayOffset(offset) => CommandFrame::with_param(SET_DISPLAY_OFFSET, offset & 0x3F),
            Command::StartLine(line) => CommandFrame::single(SET_START_LINE | (line & 0x3F)),
            Command::ChargePump(enable) => CommandFrame::with_param(
                CHARGE_PUMP,
                if enable { CHARGE_PUMP_ENABLE } else { CHARGE_PUMP_DISABLE },
            ),
            Command::AddressingMode(mode) => CommandFrame::with_param(SET_MEMORY_MODE, mode as u8),
            Command::SegmentRemap(remap) => CommandFrame::single(SET_SEGMENT_REMAP | u8::from(remap)),
            Command::ComScanReversed(rev) => CommandFrame::single(if rev { COM_SCAN_DEC } else { COM_SCAN_INC }),
            Command::ComPins(config) => CommandFrame::with_param(SET_COM_PINS, config),
            Command::Contrast(level) => CommandFrame::with_param(SET_CONTRAST, level),
            Command::PreCharge(period) => CommandFrame::with_param(SET_PRECHARGE, period),
            Command::VcomhDeselect(level) => CommandFrame::with_param(SET_VCOM_DESELECT, level),
            Command::EntireDisplayOn(on) => CommandFrame::single(ENTIRE_DISPLAY_RESUME | u8::from(on)),
            Command::Invert(inverted) => CommandFrame::single(NORMAL_DISPLAY | u8::from(inverted)),
            Command::PageStart(page) => CommandFrame::single(SET_PAGE_START | (page & 0x07)),
            Command::LowerColumn(col) => CommandFrame::single(SET_LOWER_COLUMN | (col & 0x0F)),
            Command::UpperColumn(col) => CommandFrame::single(SET_HIGHER_COLUMN | (col & 0x0F)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(cmd: Command) -> Vec<u8> {
        cmd.encode().as_bytes().to_vec()
    }

    #[test]
    fn test_single_byte_commands() {
        assert_eq!(bytes(Command::DisplayOn(false)), [0x00, 0xAE]);
        assert_eq!(bytes(Command::DisplayOn(true)), [0x00, 0xAF]);
        assert_eq!(bytes(Command::SegmentRemap(true)), [0x00, 0xA1]);
        assert_eq!(bytes(Command::SegmentRemap(false)), [0x00, 0xA0]);
        assert_eq!(bytes(Command::ComScanReversed(true)), [0x00, 0xC8]);
        assert_eq!(bytes(Command::EntireDisplayOn(false)), [0x00, 0xA4]);
        assert_eq!(bytes(Command::Invert(false)), [0x00, 0xA6]);
        assert_eq!(bytes(Command::Invert(true)), [0x00, 0xA7]);
    }

    #[test]
    fn test_parameterized_commands() {
        assert_eq!(bytes(Command::ClockDivide(0x80)), [0x00, 0xD5, 0x80]);
        assert_eq!(bytes(Command::Multiplex(63)), [0x00, 0xA8, 0x3F]);
        assert_eq!(bytes(Command::ChargePump(true)), [0x00, 0x8D, 0x14]);
        assert_eq!(bytes(Command::ChargePump(false)), [0x00, 0x8D, 0x10]);
        assert_eq!(
            bytes(Command::AddressingMode(AddressingMode::Horizontal)),
            [0x00, 0x20, 0x00]
        );
        assert_eq!(bytes(Command::AddressingMode(AddressingMode::Page)), [0x00, 0x20, 0x02]);
        assert_eq!(bytes(Command::ComPins(0x12)), [0x00, 0xDA, 0x12]);
    }

    #[test]
    fn test_base_plus_value_commands() {
        assert_eq!(bytes(Command::StartLine(0)), [0x00, 0x40]);
        assert_eq!(bytes(Command::StartLine(5)), [0x00, 0x45]);
        assert_eq!(bytes(Command::PageStart(0)), [0x00, 0xB0]);
        assert_eq!(bytes(Command::PageStart(7)), [0x00, 0xB7]);
        assert_eq!(bytes(Command::LowerColumn(0)), [0x00, 0x00]);
        assert_eq!(bytes(Command::UpperColumn(0)), [0x00, 0x10]);
    }

    #[test]
    fn test_out_of_range_values_are_masked() {
        // page 9 must not spill into the next opcode family
        assert_eq!(bytes(Command::PageStart(9)), [0x00, 0xB1]);
        assert_eq!(bytes(Command::LowerColumn(0x1F)), [0x00, 0x0F]);
        assert_eq!(bytes(Command::StartLine(64)), [0x00, 0x40]);
    }
}
