/*
 *  display/bus/mock.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock bus session for testing without hardware
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

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::display::bus::BusSession;
use crate::display::error::DisplayError;

/// Mock bus session for testing
///
/// This session simulates the bus without requiring hardware. It's useful for:
/// - Unit tests
/// - Integration tests
/// - Development without a panel attached
///
/// Every attempted transmission is recorded, including one that is made to
/// fail, so tests can check both the byte stream and where it stopped.
#[derive(Debug, Clone)]
pub struct MockSession {
    address: u8,

    /// Shared state for testing
    state: Arc<Mutex<MockSessionState>>,
}

/// Internal state for the mock session (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockSessionState {
    /// Every transmission attempted, in order
    pub frames: Vec<Vec<u8>>,

    /// Whether transmissions are currently accepted
    pub is_open: bool,

    /// Number of times close() was called on an open session
    pub close_count: usize,

    /// Report a short write on this transmission index (0-based)
    pub short_write_at: Option<usize>,
}

impl MockSession {
    /// An open session bound to `address`
    pub fn open(address: u8) -> Self {
        let state = MockSessionState { is_open: true, ..Default::default() };
        Self {
            address,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// A session that was never opened
    pub fn unopened(address: u8) -> Self {
        Self {
            address,
            state: Arc::new(Mutex::new(MockSessionState::default())),
        }
    }

    /// Make transmission `index` report a short write
    pub fn fail_at(self, index: usize) -> Self {
        self.lock().short_write_at = Some(index);
        self
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockSessionState>> {
        Arc::clone(&self.state)
    }

    /// Snapshot of every transmission attempted so far
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock().frames.clone()
    }

    /// Number of transmissions attempted so far
    pub fn attempts(&self) -> usize {
        self.lock().frames.len()
    }

    /// Forget recorded frames, keeping open state and fault injection
    pub fn clear_frames(&self) {
        self.lock().frames.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockSessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BusSession for MockSession {
    fn address(&self) -> u8 {
        self.address
    }

    fn is_open(&self) -> bool {
        self.lock().is_open
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        let mut state = self.lock();
        if !state.is_open {
            return Err(DisplayError::NotInitialized);
        }

        let index = state.frames.len();
        state.frames.push(bytes.to_vec());

        if state.short_write_at == Some(index) {
            // pretend the controller NACKed after the control byte
            return Err(DisplayError::short_write(bytes.len(), bytes.len().min(1)));
        }
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.lock();
        if state.is_open {
            state.is_open = false;
            state.close_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_frames_in_order() {
        let mut session = MockSession::open(0x3C);
        session.transmit(&[0x00, 0xAE]).unwrap();
        session.transmit(&[0x00, 0xD5, 0x80]).unwrap();
        assert_eq!(session.frames(), vec![vec![0x00, 0xAE], vec![0x00, 0xD5, 0x80]]);
    }

    #[test]
    fn test_short_write_injection() {
        let mut session = MockSession::open(0x3C).fail_at(1);
        session.transmit(&[0x00, 0xAE]).unwrap();
        let err = session.transmit(&[0x00, 0xD5, 0x80]).unwrap_err();
        assert!(matches!(
            err,
            DisplayError::TransferIncomplete { expected: 3, written: 1, .. }
        ));
        assert_eq!(session.attempts(), 2);
    }

    #[test]
    fn test_unopened_and_closed() {
        let mut never = MockSession::unopened(0x3C);
        assert!(matches!(never.transmit(&[0x00]), Err(DisplayError::NotInitialized)));
        assert_eq!(never.attempts(), 0);

        let mut session = MockSession::open(0x3C);
        let handle = session.state();
        session.close();
        session.close();
        assert!(matches!(session.transmit(&[0x00]), Err(DisplayError::NotInitialized)));
        assert_eq!(handle.lock().unwrap().close_count, 1);
    }
}
