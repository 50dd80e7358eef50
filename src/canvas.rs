use std::{
    path::Path,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use image::RgbaImage;

use crate::scene::Color;

/// Shared read access to a canvas background color.
///
/// The canvas keeps the writing side; every clone observes the latest
/// [`Canvas::clear`].
#[derive(Debug, Clone)]
pub struct BackgroundHandle(Arc<AtomicU32>);

impl BackgroundHandle {
    pub fn new(color: Color) -> Self {
        Self(Arc::new(AtomicU32::new(color.to_bits())))
    }

    pub fn get(&self) -> Color {
        Color::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn set(&self, color: Color) {
        self.0.store(color.to_bits(), Ordering::Relaxed);
    }
}

impl Default for BackgroundHandle {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}

/// Raster surface the tracer writes into.
///
/// Screen addressing has its origin at the top-left corner with `y` growing
/// downward. The `*_centered` variants take the center-origin, `y`-up
/// coordinates used for ray generation.
pub struct Canvas {
    image: RgbaImage,
    background: BackgroundHandle,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            image: RgbaImage::new(width, height),
            background: BackgroundHandle::default(),
        };
        canvas.clear(Color::WHITE);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn background(&self) -> Color {
        self.background.get()
    }

    pub fn background_handle(&self) -> BackgroundHandle {
        self.background.clone()
    }

    /// Set the background color and fill every pixel with it.
    pub fn clear(&mut self, color: Color) {
        self.background.set(color);
        for pixel in self.image.pixels_mut() {
            *pixel = color.into();
        }
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width() as i32 && y >= 0 && y < self.height() as i32
    }

    pub fn is_in_bounds_centered(&self, x: i32, y: i32) -> bool {
        let half_width = self.width() as i32 / 2;
        let half_height = self.height() as i32 / 2;
        x >= -half_width && x < half_width && y >= -half_height && y < half_height
    }

    /// Writes outside the canvas are dropped.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.is_in_bounds(x, y) {
            self.image.put_pixel(x as u32, y as u32, color.into());
        }
    }

    pub fn put_pixel_centered(&mut self, x: i32, y: i32, color: Color) {
        let (screen_x, screen_y) = self.centered_to_screen(x, y);
        self.put_pixel(screen_x, screen_y, color);
    }

    pub fn centered_to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        (self.width() as i32 / 2 + x, self.height() as i32 / 2 - y)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|pixel| (*pixel).into())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        self.image.save(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "canvas saved");
        Ok(())
    }
}
