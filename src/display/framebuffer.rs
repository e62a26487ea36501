/*
 *  display/framebuffer.rs
 *
 *  oled-bringup - SSD1306 panel bring-up
 *  (c) 2020-26 Stuart Hunter
 *
 *  Page-packed monochrome framebuffer matching controller RAM
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

use crate::display::{HEIGHT, PAGES, WIDTH};

/// Host-side copy of the panel's graphics RAM
///
/// Laid out exactly like the controller: `PAGES` pages of `WIDTH` column
/// bytes, bit `y % 8` of column `x` in page `y / 8` is pixel (x, y).
/// It is always pushed whole; there is no dirty tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Blank framebuffer
    pub fn new() -> Self {
        Self { pages: [[0; WIDTH]; PAGES] }
    }

    /// Set every pixel on or off
    pub fn fill(&mut self, on: bool) {
        let byte = if on { 0xFF } else { 0x00 };
        for page in self.pages.iter_mut() {
            page.fill(byte);
        }
    }

    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Set one pixel; coordinates off the panel are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let mask = 1u8 << (y % 8);
        let byte = &mut self.pages[y / 8][x];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Get pixel at position, `None` off the panel
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        Some(self.pages[y / 8][x] & (1 << (y % 8)) != 0)
    }

    pub fn page(&self, index: usize) -> Option<&[u8; WIDTH]> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.pages
    }

    /// Count number of pixels set
    pub fn count_on_pixels(&self) -> usize {
        self.pages
            .iter()
            .flatten()
            .map(|b| b.count_ones() as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let fb = Framebuffer::new();
        assert_eq!(fb.count_on_pixels(), 0);
        assert_eq!(fb, Framebuffer::default());
    }

    #[test]
    fn test_pixel_packing_lsb_is_top_row() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(0, 0, true);
        fb.set_pixel(3, 7, true);
        fb.set_pixel(127, 63, true);
        fb.set_pixel(10, 8, true);

        assert_eq!(fb.page(0).unwrap()[0], 0x01);
        assert_eq!(fb.page(0).unwrap()[3], 0x80);
        assert_eq!(fb.page(1).unwrap()[10], 0x01);
        assert_eq!(fb.page(7).unwrap()[127], 0x80);
        assert_eq!(fb.count_on_pixels(), 4);

        assert_eq!(fb.pixel(3, 7), Some(true));
        assert_eq!(fb.pixel(3, 6), Some(false));
    }

    #[test]
    fn test_set_pixel_off_clears_only_that_bit() {
        let mut fb = Framebuffer::new();
        fb.fill(true);
        fb.set_pixel(5, 13, false);
        assert_eq!(fb.page(1).unwrap()[5], !(1 << 5));
        assert_eq!(fb.count_on_pixels(), WIDTH * HEIGHT - 1);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(128, 0, true);
        fb.set_pixel(0, 64, true);
        assert_eq!(fb.count_on_pixels(), 0);
        assert_eq!(fb.pixel(128, 0), None);
        assert!(fb.page(8).is_none());
    }
}
