//! Overdraw-tolerant framebuffer display.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

/// In-memory `Rgb565` framebuffer.
pub struct TestDisplay {
    pixels: Vec<Rgb565>,
    width: u32,
    height: u32,
    writes: usize,
}

impl TestDisplay {
    /// Create a display cleared to black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; (width * height) as usize],
            width,
            height,
            writes: 0,
        }
    }

    /// Color at `(x, y)`, or `None` outside the display.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.index(Point::new(x, y)).map(|idx| self.pixels[idx])
    }

    /// Number of pixels currently holding `color`.
    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Number of pixels of `color` inside `area`.
    pub fn count_in(&self, area: Rectangle, color: Rgb565) -> usize {
        area.points()
            .filter_map(|p| self.index(p))
            .filter(|&idx| self.pixels[idx] == color)
            .count()
    }

    /// Bounding box of every pixel that differs from `background`.
    pub fn painted_bounds(&self, background: Rgb565) -> Option<Rectangle> {
        let mut min = Point::new(i32::MAX, i32::MAX);
        let mut max = Point::new(i32::MIN, i32::MIN);
        for (idx, &c) in self.pixels.iter().enumerate() {
            if c == background {
                continue;
            }
            let x = (idx as u32 % self.width) as i32;
            let y = (idx as u32 / self.width) as i32;
            min = Point::new(min.x.min(x), min.y.min(y));
            max = Point::new(max.x.max(x), max.y.max(y));
        }
        (min.x <= max.x).then(|| Rectangle::with_corners(min, max))
    }

    /// Pixel writes received since creation or the last [`reset_writes`](Self::reset_writes).
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn reset_writes(&mut self) {
        self.writes = 0;
    }

    fn index(&self, p: Point) -> Option<usize> {
        (p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height)
            .then(|| (p.y as u32 * self.width + p.x as u32) as usize)
    }
}

impl DrawTarget for TestDisplay {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some(idx) = self.index(coord) {
                self.pixels[idx] = color;
                self.writes += 1;
            }
        }
        Ok(())
    }
}

impl OriginDimensions for TestDisplay {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
