//! Pixel surfaces the renderers draw into.
//!
//! A [`RenderTarget`] is the only capability the renderers need: report a size
//! and write a colour at a coordinate. Callers own and allocate targets; the
//! renderers only ever borrow them.

use embedded_graphics::prelude::*;
use image::{ImageBuffer, RgbaImage};
use std::convert::Infallible;
use std::path::Path;

use super::color::Color;

/// A writable 2-D RGBA surface.
pub trait RenderTarget {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Writes one pixel. Out-of-bounds coordinates must be ignored.
    fn put_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Overwrites every pixel with `color`.
    fn fill(&mut self, color: Color) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.put_pixel(x, y, color);
            }
        }
    }
}

/// Owned RGBA8 pixel buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A transparent buffer. Zero dimensions are allowed.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Raw RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Encodes the buffer as PNG at `path`.
    ///
    /// # Errors
    /// - If the image is empty or cannot be written
    pub fn save_png(&self, path: &Path) -> image::ImageResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl RenderTarget for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }
}

impl RenderTarget for RgbaImage {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < ImageBuffer::width(self) && y < ImageBuffer::height(self) {
            ImageBuffer::put_pixel(self, x, y, color.into());
        }
    }
}

/// embedded-graphics view of a [`RenderTarget`], clipping to its bounds.
pub(crate) struct Canvas<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: RenderTarget + ?Sized> Canvas<'a, T> {
    pub(crate) fn new(target: &'a mut T) -> Self {
        Self { target }
    }
}

impl<T: RenderTarget + ?Sized> OriginDimensions for Canvas<'_, T> {
    fn size(&self) -> Size {
        Size::new(self.target.width(), self.target.height())
    }
}

impl<T: RenderTarget + ?Sized> DrawTarget for Canvas<'_, T> {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = (self.target.width(), self.target.height());
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 && (point.x as u32) < width && (point.y as u32) < height {
                self.target.put_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

/// Draws into `inner` rotated a quarter turn counter-clockwise around `pivot`,
/// so text reads bottom to top.
pub(crate) struct Rotated<'a, D> {
    inner: &'a mut D,
    pivot: Point,
}

impl<'a, D> Rotated<'a, D> {
    pub(crate) fn new(inner: &'a mut D, pivot: Point) -> Self {
        Self { inner, pivot }
    }
}

impl<D: DrawTarget> OriginDimensions for Rotated<'_, D> {
    fn size(&self) -> Size {
        let size = self.inner.bounding_box().size;
        Size::new(size.height, size.width)
    }
}

impl<D: DrawTarget> DrawTarget for Rotated<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let pivot = self.pivot;
        self.inner.draw_iter(
            pixels
                .into_iter()
                .map(|Pixel(p, c)| Pixel(Point::new(pivot.x + p.y, pivot.y - p.x), c)),
        )
    }
}
