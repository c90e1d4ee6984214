//! The pixel surface that frames are painted onto. It's owned by the host and reused for every
//! frame, only reallocating when its size changes.

use crate::blend::Pixel;
use crate::particles::Bounds;

/// Premultiplied RGBA8 pixels in row-major order.
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// The pixels themselves
    pixels: Vec<Pixel>,
}

impl Canvas {
    /// Instantiate, fully transparent.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self::default();
        canvas.resize(width, height);
        canvas
    }

    /// Change the size of the canvas. The contents are undefined until the next frame clears it.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }

        self.width = width;
        self.height = height;
        self.pixels.resize(Self::area(width, height), [0; 4]);
        tracing::trace!("Canvas resized to {width}x{height}");
    }

    /// The number of pixels needed for the given size.
    fn area(width: u32, height: u32) -> usize {
        usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(usize::MAX)
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The canvas size as simulation bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(f64::from(self.width), f64::from(self.height))
    }

    /// All the pixels, row by row.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// All the pixels, row by row.
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// The raw premultiplied RGBA bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// The index of the pixel at the given coordinates.
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()
    }

    /// The pixel at the given coordinates.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        self.index(x, y)
            .and_then(|index| self.pixels.get(index).copied())
    }

    /// The pixel at the given coordinates.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut Pixel> {
        self.index(x, y).and_then(|index| self.pixels.get_mut(index))
    }

    /// One row of pixels.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [Pixel]> {
        let start = self.index(0, y)?;
        let width = usize::try_from(self.width).ok()?;
        self.pixels.get_mut(start..start + width)
    }

    /// Set every pixel to the same value.
    pub fn fill(&mut self, pixel: Pixel) {
        self.pixels.fill(pixel);
    }

    /// The whole canvas converted to straight, non-premultiplied, RGBA bytes. Useful for
    /// encoding to image formats.
    #[must_use]
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| crate::blend::unpremultiply(*pixel))
            .collect()
    }
}
