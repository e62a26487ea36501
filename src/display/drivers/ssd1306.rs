/*
 *  display/drivers/ssd1306.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  SSD1306 controller protocol: init sequence and page transfers
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

use log::{debug, info, warn};

use crate::display::bus::BusSession;
use crate::display::command::{AddressingMode, Command};
use crate::display::error::DisplayError;
use crate::display::frame::PageFrame;
use crate::display::framebuffer::Framebuffer;
use crate::display::{HEIGHT, PAGES, WIDTH};

/// Oscillator frequency 8, divide ratio 1 (reset value)
pub const CLOCK_DIVIDE_DEFAULT: u8 = 0x80;

/// Alternative COM pin config, no left/right remap. 0x02 on 32-row panels.
pub const COM_PINS_ALT_64: u8 = 0x12;

pub const DEFAULT_CONTRAST: u8 = 0xCF;
pub const DEFAULT_PRECHARGE: u8 = 0xF1;
pub const DEFAULT_VCOMH: u8 = 0x40;

/// Everything `initialize` sends before the blank fill, in order
///
/// Display ON comes last: clock, charge pump, addressing and COM layout all
/// have to be in place before the panel starts driving rows.
pub const INIT_SEQUENCE: [Command; 16] = [
    Command::DisplayOn(false),
    Command::ClockDivide(CLOCK_DIVIDE_DEFAULT),
    Command::Multiplex((HEIGHT - 1) as u8),
    Command::DisplayOffset(0),
    Command::StartLine(0),
    Command::ChargePump(true),
    Command::AddressingMode(AddressingMode::Horizontal),
    Command::SegmentRemap(true),
    Command::ComScanReversed(true),
    Command::ComPins(COM_PINS_ALT_64),
    Command::Contrast(DEFAULT_CONTRAST),
    Command::PreCharge(DEFAULT_PRECHARGE),
    Command::VcomhDeselect(DEFAULT_VCOMH),
    Command::EntireDisplayOn(false),
    Command::Invert(false),
    Command::DisplayOn(true),
];

/// Bring the controller into a known, active state with blank RAM
///
/// Each command goes out as its own transmission. The first failure aborts
/// the sequence; nothing is rolled back. Every step is an absolute set, so
/// calling this again from the top always restores the same state.
pub fn initialize<S: BusSession + ?Sized>(session: &mut S) -> Result<(), DisplayError> {
    ensure_open(session)?;
    info!("Initializing SSD1306 at 0x{:02X}", session.address());

    for (step, command) in INIT_SEQUENCE.into_iter().enumerate() {
        if let Err(e) = send_command(session, command) {
            warn!("SSD1306 init aborted at step {} ({:?}): {}", step + 1, command, e);
            return Err(e);
        }
    }

    // RAM powers up with garbage
    fill(session, false)?;

    info!("SSD1306 initialized successfully ({}x{})", WIDTH, HEIGHT);
    Ok(())
}

/// Set every pixel on (`0xFF` columns) or off (`0x00` columns)
pub fn fill<S: BusSession + ?Sized>(session: &mut S, on: bool) -> Result<(), DisplayError> {
    ensure_open(session)?;
    debug!("Filling panel {}", if on { "on" } else { "off" });

    let frame = PageFrame::filled(on);
    for page in 0..PAGES {
        write_page(session, page as u8, &frame)?;
    }
    Ok(())
}

/// Push a whole framebuffer, page by page
pub fn flush<S: BusSession + ?Sized>(
    session: &mut S,
    framebuffer: &Framebuffer,
) -> Result<(), DisplayError> {
    ensure_open(session)?;
    debug!("Flushing framebuffer ({} pixels on)", framebuffer.count_on_pixels());

    for (page, columns) in framebuffer.pages().iter().enumerate() {
        write_page(session, page as u8, &PageFrame::from_columns(columns))?;
    }
    Ok(())
}

pub fn set_contrast<S: BusSession + ?Sized>(session: &mut S, level: u8) -> Result<(), DisplayError> {
    ensure_open(session)?;
    send_command(session, Command::Contrast(level))
}

pub fn set_invert<S: BusSession + ?Sized>(session: &mut S, inverted: bool) -> Result<(), DisplayError> {
    ensure_open(session)?;
    send_command(session, Command::Invert(inverted))
}

/// Wake the panel or put it to sleep; RAM is kept either way
pub fn set_display_on<S: BusSession + ?Sized>(session: &mut S, on: bool) -> Result<(), DisplayError> {
    ensure_open(session)?;
    send_command(session, Command::DisplayOn(on))
}

/// Send one command as its own transmission
pub fn send_command<S: BusSession + ?Sized>(
    session: &mut S,
    command: Command,
) -> Result<(), DisplayError> {
    debug!("SSD1306 command {:?}", command);
    session.transmit(command.encode().as_bytes())
}

/// Page select, column pointer back to 0, then one continuous data phase
fn write_page<S: BusSession + ?Sized>(
    session: &mut S,
    page: u8,
    frame: &PageFrame,
) -> Result<(), DisplayError> {
    send_command(session, Command::PageStart(page))?;
    send_command(session, Command::LowerColumn(0))?;
    send_command(session, Command::UpperColumn(0))?;
    session.transmit(frame.as_bytes())
}

fn ensure_open<S: BusSession + ?Sized>(session: &S) -> Result<(), DisplayError> {
    if session.is_open() {
        Ok(())
    } else {
        Err(DisplayError::NotInitialized)
    }
}

/// SSD1306 driver owning its bus session
///
/// Thin wrapper over the free functions for callers that want one value to
/// hold on to. The session is dropped with the driver, or handed back by
/// `release` for an explicit close.
pub struct Ssd1306<S: BusSession> {
    session: S,
}

impl<S: BusSession> Ssd1306<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn init(&mut self) -> Result<(), DisplayError> {
        initialize(&mut self.session)
    }

    pub fn fill(&mut self, on: bool) -> Result<(), DisplayError> {
        fill(&mut self.session, on)
    }

    pub fn clear(&mut self) -> Result<(), DisplayError> {
        fill(&mut self.session, false)
    }

    pub fn flush(&mut self, framebuffer: &Framebuffer) -> Result<(), DisplayError> {
        flush(&mut self.session, framebuffer)
    }

    pub fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError> {
        set_contrast(&mut self.session, level)
    }

    pub fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        set_invert(&mut self.session, inverted)
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        set_display_on(&mut self.session, on)
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Hand the session back, e.g. to close it explicitly
    pub fn release(self) -> S {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::bus::MockSession;
    use crate::display::frame::{COMMAND_MARKER, DATA_MARKER};

    const INIT_FRAMES: [&[u8]; 16] = [
        &[0x00, 0xAE],
        &[0x00, 0xD5, 0x80],
        &[0x00, 0xA8, 0x3F],
        &[0x00, 0xD3, 0x00],
        &[0x00, 0x40],
        &[0x00, 0x8D, 0x14],
        &[0x00, 0x20, 0x00],
        &[0x00, 0xA1],
        &[0x00, 0xC8],
        &[0x00, 0xDA, 0x12],
        &[0x00, 0x81, 0xCF],
        &[0x00, 0xD9, 0xF1],
        &[0x00, 0xDB, 0x40],
        &[0x00, 0xA4],
        &[0x00, 0xA6],
        &[0x00, 0xAF],
    ];

    /// Check `frames` is exactly one full-screen transfer with `data` columns
    fn assert_page_transfer(frames: &[Vec<u8>], data: impl Fn(usize) -> [u8; WIDTH]) {
        assert_eq!(frames.len(), PAGES * 4);
        for (page, chunk) in frames.chunks(4).enumerate() {
            assert_eq!(chunk[0], vec![COMMAND_MARKER, 0xB0 + page as u8]);
            assert_eq!(chunk[1], vec![COMMAND_MARKER, 0x00]);
            assert_eq!(chunk[2], vec![COMMAND_MARKER, 0x10]);
            assert_eq!(chunk[3].len(), 129);
            assert_eq!(chunk[3][0], DATA_MARKER);
            assert_eq!(&chunk[3][1..], &data(page)[..], "page {}", page);
        }
    }

    #[test]
    fn test_initialize_byte_stream() {
        let mut session = MockSession::open(0x3C);
        initialize(&mut session).unwrap();

        let frames = session.frames();
        assert_eq!(frames.len(), 16 + PAGES * 4);
        for (i, expected) in INIT_FRAMES.iter().enumerate() {
            assert_eq!(frames[i].as_slice(), *expected, "init frame {}", i + 1);
        }
        assert_page_transfer(&frames[16..], |_| [0x00; WIDTH]);
    }

    #[test]
    fn test_fill_on_and_off() {
        let mut session = MockSession::open(0x3C);

        fill(&mut session, true).unwrap();
        assert_page_transfer(&session.frames(), |_| [0xFF; WIDTH]);

        session.clear_frames();
        fill(&mut session, false).unwrap();
        assert_page_transfer(&session.frames(), |_| [0x00; WIDTH]);
    }

    #[test]
    fn test_flush_sends_framebuffer_pages() {
        let mut fb = Framebuffer::new();
        for page in 0..PAGES {
            fb.set_pixel(page, page * 8, true);
        }

        let mut session = MockSession::open(0x3C);
        flush(&mut session, &fb).unwrap();
        assert_page_transfer(&session.frames(), |page| {
            let mut cols = [0u8; WIDTH];
            cols[page] = 0x01;
            cols
        });
    }

    #[test]
    fn test_init_stops_at_failed_frame() {
        for k in 0..16 {
            let mut session = MockSession::open(0x3C).fail_at(k);
            let err = initialize(&mut session).unwrap_err();
            assert!(matches!(err, DisplayError::TransferIncomplete { .. }), "frame {}", k);
            assert_eq!(session.attempts(), k + 1, "frame {} must be the last attempted", k);
        }
    }

    #[test]
    fn test_fill_failure_keeps_earlier_pages() {
        // page 2's data frame is transmission 2 * 4 + 3
        let mut session = MockSession::open(0x3C).fail_at(11);
        assert!(fill(&mut session, true).is_err());
        assert_eq!(session.attempts(), 12);
    }

    #[test]
    fn test_closed_session_is_never_written() {
        let mut session = MockSession::open(0x3C);
        session.close();

        assert!(matches!(initialize(&mut session), Err(DisplayError::NotInitialized)));
        assert!(matches!(fill(&mut session, true), Err(DisplayError::NotInitialized)));
        assert!(matches!(set_contrast(&mut session, 0x10), Err(DisplayError::NotInitialized)));
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn test_single_setting_commands() {
        let mut session = MockSession::open(0x3C);
        set_contrast(&mut session, 0x7F).unwrap();
        set_invert(&mut session, true).unwrap();
        set_display_on(&mut session, false).unwrap();
        assert_eq!(
            session.frames(),
            vec![vec![0x00, 0x81, 0x7F], vec![0x00, 0xA7], vec![0x00, 0xAE]]
        );
    }

    #[test]
    fn test_driver_wrapper_and_release() {
        let mut oled = Ssd1306::new(MockSession::open(0x3C));
        oled.init().unwrap();
        oled.clear().unwrap();
        assert_eq!(oled.session().attempts(), 16 + 2 * PAGES * 4);

        let mut session = oled.release();
        session.close();
        assert!(!session.is_open());
    }
}
