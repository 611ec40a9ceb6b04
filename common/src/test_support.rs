//! In-memory draw target for rendering tests.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::colors::BLACK;

/// Row-major pixel grid that silently drops out-of-bounds pixels.
pub struct Canvas {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl Canvas {
    pub fn new(
        width: u32,
        height: u32,
        fill: Rgb888,
    ) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![fill; (width * height) as usize],
        }
    }

    pub fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Rgb888 {
        self.pixels[(y * self.size.width + x) as usize]
    }

    pub fn column(
        &self,
        x: u32,
    ) -> Vec<Rgb888> {
        (0..self.size.height).map(|y| self.pixel(x, y)).collect()
    }

    pub fn is_solid(
        &self,
        color: Rgb888,
    ) -> bool {
        self.pixels.iter().all(|&p| p == color)
    }

    pub fn distinct_non_black(&self) -> usize {
        let mut seen: Vec<Rgb888> = Vec::new();
        for &p in &self.pixels {
            if p != BLACK && !seen.contains(&p) {
                seen.push(p);
            }
        }
        seen.len()
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 && (point.x as u32) < self.size.width && (point.y as u32) < self.size.height {
                let idx = (point.y as u32 * self.size.width + point.x as u32) as usize;
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }
}
