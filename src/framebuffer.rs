// ── Framebuffer, surface & blit ───────────────────────────────────────────────
//
// `Framebuffer` is what the application draws into: RGBX, row-major, 4 bytes
// per pixel.  `Surface` is what a window presents: BGRX, 4 bytes per pixel,
// top-down rows, the layout both a 32-bit GDI DIB and a 24/32-depth ZPixmap
// expect on little-endian hosts.  `blit_bgr` converts one into the other.
//
// Framebuffer rows are stored bottom-up relative to the screen, so row `r`
// lands on surface row `height - 1 - r`.
//
// No `unsafe`, pure safe Rust.

use crate::error::{Error, Result};

/// Bytes per pixel in both the framebuffer and the surface.
pub const CHANNELS: usize = 4;

/// Largest accepted width or height.  Keeps `width * height * 4` well inside
/// `usize` on 32-bit targets and inside X11/GDI coordinate ranges.
pub const MAX_EXTENT: u32 = 16_384;

fn checked_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 || width > MAX_EXTENT || height > MAX_EXTENT {
        return Err(Error::InvalidSize { width, height });
    }
    Ok(width as usize * height as usize * CHANNELS)
}

// ── Framebuffer ───────────────────────────────────────────────────────────────

/// An application-owned RGB pixel buffer, independent of any window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Framebuffer {
    /// Allocate a zero-filled (black) framebuffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            buffer: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBX bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Mutable raw RGBX bytes, for callers that rasterize whole rows at once.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    /// Write one pixel from separate channels.  The fourth byte is untouched.
    pub fn set_color_u8(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        let i = self.offset(x, y)?;
        self.buffer[i..i + 3].copy_from_slice(&[r, g, b]);
        Ok(())
    }

    /// Write one pixel from a packed `0xRRGGBB` value.  The top byte is ignored.
    pub fn set_color_u32(&mut self, x: u32, y: u32, rgb: u32) -> Result<()> {
        let [_, r, g, b] = rgb.to_be_bytes();
        self.set_color_u8(x, y, r, g, b)
    }

    /// Read back one pixel as `[r, g, b]`.
    pub fn color(&self, x: u32, y: u32) -> Result<[u8; 3]> {
        let i = self.offset(x, y)?;
        Ok([self.buffer[i], self.buffer[i + 1], self.buffer[i + 2]])
    }

    /// Set every pixel to a packed `0xRRGGBB` value.
    pub fn fill(&mut self, rgb: u32) {
        let [_, r, g, b] = rgb.to_be_bytes();
        for px in self.buffer.chunks_exact_mut(CHANNELS) {
            px[..3].copy_from_slice(&[r, g, b]);
        }
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

/// A window's presentation buffer in native BGRX, top-down layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub(crate) fn new(width: u32, height: u32) -> Result<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw BGRX bytes, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }
}

// ── Blit ──────────────────────────────────────────────────────────────────────

/// Copy `src` into `dst`, flipping rows and swapping R and B.
///
/// Fails with `SizeMismatch` unless both buffers have the same dimensions.
pub fn blit_bgr(src: &Framebuffer, dst: &mut Surface) -> Result<()> {
    if src.width != dst.width || src.height != dst.height {
        return Err(Error::SizeMismatch {
            framebuffer_width: src.width,
            framebuffer_height: src.height,
            surface_width: dst.width,
            surface_height: dst.height,
        });
    }

    let stride = dst.stride();
    let src_rows = src.buffer.chunks_exact(stride);
    let dst_rows = dst.data.chunks_exact_mut(stride).rev();
    for (src_row, dst_row) in src_rows.zip(dst_rows) {
        let src_px = src_row.chunks_exact(CHANNELS);
        let dst_px = dst_row.chunks_exact_mut(CHANNELS);
        for (s, d) in src_px.zip(dst_px) {
            d[0] = s[2]; // blue
            d[1] = s[1]; // green
            d[2] = s[0]; // red
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_framebuffer_is_zeroed() {
        let fb = Framebuffer::new(3, 2).expect("framebuffer");
        assert_eq!(fb.as_bytes().len(), 3 * 2 * CHANNELS);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_or_huge_extents_are_rejected() {
        assert!(matches!(
            Framebuffer::new(0, 10),
            Err(Error::InvalidSize { width: 0, height: 10 })
        ));
        assert!(matches!(
            Framebuffer::new(10, 0),
            Err(Error::InvalidSize { .. })
        ));
        assert!(matches!(
            Framebuffer::new(MAX_EXTENT + 1, 1),
            Err(Error::InvalidSize { .. })
        ));
    }

    #[test]
    fn set_color_u32_stores_rgb_order() {
        let mut fb = Framebuffer::new(4, 3).expect("framebuffer");
        fb.set_color_u32(2, 1, 0x12_34_56).expect("in bounds");
        let i = (1 * 4 + 2) * CHANNELS;
        assert_eq!(&fb.as_bytes()[i..i + 3], &[0x12, 0x34, 0x56]);
        assert_eq!(fb.color(2, 1).expect("in bounds"), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn set_color_u32_ignores_top_byte() {
        let mut fb = Framebuffer::new(1, 1).expect("framebuffer");
        fb.set_color_u32(0, 0, 0xAB_FF_00_80).expect("in bounds");
        assert_eq!(fb.color(0, 0).expect("in bounds"), [0xFF, 0x00, 0x80]);
        assert_eq!(fb.as_bytes()[3], 0);
    }

    #[test]
    fn set_color_u8_matches_u32() {
        let mut a = Framebuffer::new(2, 2).expect("framebuffer");
        let mut b = Framebuffer::new(2, 2).expect("framebuffer");
        a.set_color_u8(1, 1, 0xCA, 0xFE, 0x01).expect("in bounds");
        b.set_color_u32(1, 1, 0xCA_FE_01).expect("in bounds");
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_bounds_writes_fail_loudly() {
        let mut fb = Framebuffer::new(4, 3).expect("framebuffer");
        let err = fb.set_color_u32(4, 0, 0xFFFFFF).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds { x: 4, y: 0, width: 4, height: 3 }
        ));
        assert!(fb.set_color_u8(0, 3, 1, 2, 3).is_err());
        assert!(fb.color(9, 9).is_err());
        // Nothing was written.
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut fb = Framebuffer::new(3, 3).expect("framebuffer");
        fb.fill(0xFF8800);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(fb.color(x, y).expect("in bounds"), [0xFF, 0x88, 0x00]);
            }
        }
    }

    #[test]
    fn blit_swaps_channels_on_uniform_fill() {
        let mut fb = Framebuffer::new(5, 4).expect("framebuffer");
        fb.fill(0x11_22_33);
        let mut surface = Surface::new(5, 4).expect("surface");
        blit_bgr(&fb, &mut surface).expect("same size");
        for px in surface.as_bytes().chunks_exact(CHANNELS) {
            assert_eq!(&px[..3], &[0x33, 0x22, 0x11]);
        }
    }

    #[test]
    fn blit_flips_rows() {
        // Row 0 red, row 1 blue.
        let mut fb = Framebuffer::new(2, 2).expect("framebuffer");
        for x in 0..2 {
            fb.set_color_u32(x, 0, 0xFF0000).expect("in bounds");
            fb.set_color_u32(x, 1, 0x0000FF).expect("in bounds");
        }
        let mut surface = Surface::new(2, 2).expect("surface");
        blit_bgr(&fb, &mut surface).expect("same size");

        let stride = surface.stride();
        let rows: Vec<&[u8]> = surface.as_bytes().chunks_exact(stride).collect();
        for px in rows[0].chunks_exact(CHANNELS) {
            assert_eq!(&px[..3], &[0xFF, 0x00, 0x00], "surface row 0 is blue");
        }
        for px in rows[1].chunks_exact(CHANNELS) {
            assert_eq!(&px[..3], &[0x00, 0x00, 0xFF], "surface row 1 is red");
        }
    }

    #[test]
    fn blit_keeps_columns_in_place() {
        let mut fb = Framebuffer::new(3, 1).expect("framebuffer");
        fb.set_color_u32(0, 0, 0x010203).expect("in bounds");
        fb.set_color_u32(2, 0, 0x040506).expect("in bounds");
        let mut surface = Surface::new(3, 1).expect("surface");
        blit_bgr(&fb, &mut surface).expect("same size");
        let bytes = surface.as_bytes();
        assert_eq!(&bytes[0..3], &[0x03, 0x02, 0x01]);
        assert_eq!(&bytes[4..7], &[0x00, 0x00, 0x00]);
        assert_eq!(&bytes[8..11], &[0x06, 0x05, 0x04]);
    }

    #[test]
    fn blit_rejects_mismatched_sizes() {
        let fb = Framebuffer::new(4, 4).expect("framebuffer");
        let mut surface = Surface::new(4, 5).expect("surface");
        assert!(matches!(
            blit_bgr(&fb, &mut surface),
            Err(Error::SizeMismatch {
                framebuffer_width: 4,
                framebuffer_height: 4,
                surface_width: 4,
                surface_height: 5,
            })
        ));
    }
}
