//! The raster surface: a fixed-size RGBA pixel buffer with snapshot support.
//!
//! Each engine instance exclusively owns one `Surface`. The buffer starts
//! solid white and is only mutated through bounds-checked pixel writes,
//! whole-surface fills, and snapshot restores, so strokes that wander off
//! the surface clip silently.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

/// An RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Solid white, the surface background.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Solid black, the pen color.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
}

/// A full-raster copy of a surface, used as one undo history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pixels: Vec<u8>,
}

/// Fixed-resolution RGBA8 raster owned by one engine instance.
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a surface filled with the white background.
    ///
    /// Returns `None` for zero-sized dimensions — an unsized surface means
    /// the host element has not been attached and measured yet.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let len = width as usize * height as usize * 4;
        let mut surface = Self { width, height, pixels: vec![0; len] };
        surface.fill(Rgba::WHITE);
        Some(surface)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 buffer, row-major from the top-left corner.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill the whole surface with one color.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color.0);
        }
    }

    /// Write one pixel; coordinates outside the surface are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.0);
    }

    /// Read one pixel, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return None;
        };
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Capture a full-raster snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { pixels: self.pixels.clone() }
    }

    /// Repaint the surface from a snapshot taken earlier from this surface.
    ///
    /// A snapshot of mismatched size is rejected (logged, surface left
    /// untouched); snapshots never cross surfaces in practice.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.pixels.len() != self.pixels.len() {
            tracing::warn!(
                expected = self.pixels.len(),
                got = snapshot.pixels.len(),
                "snapshot size mismatch; restore skipped"
            );
            return;
        }
        self.pixels.copy_from_slice(&snapshot.pixels);
    }

    /// Whether every pixel matches `color`.
    #[must_use]
    pub fn is_uniform(&self, color: Rgba) -> bool {
        self.pixels.chunks_exact(4).all(|px| px == color.0)
    }
}
