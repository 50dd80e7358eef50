/// Canvas resolution together with the view plane it projects onto.
///
/// Canvas and viewport aspect ratios are not required to match; a mismatch
/// just stretches the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub width: f32,
    pub height: f32,
    pub distance: f32,
}

impl Viewport {
    pub fn new(canvas_width: u32, canvas_height: u32, width: f32, height: f32, distance: f32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            width,
            height,
            distance,
        }
    }

    /// Ray direction through the centered pixel `(x, y)`.
    ///
    /// `x` grows to the right and `y` grows upward from the canvas center, so
    /// a pixel above the center maps to a direction with a positive vertical
    /// component. The result is not normalized and its depth is always the
    /// projection distance.
    pub fn pixel_to_ray_direction(&self, x: i32, y: i32) -> glam::Vec3 {
        glam::Vec3::new(
            x as f32 * self.width / self.canvas_width as f32,
            y as f32 * self.height / self.canvas_height as f32,
            self.distance,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600, 1.0, 1.0, 1.0)
    }
}

/// Fixed camera: every primary ray starts at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin: glam::Vec3,
    pub viewport: Viewport,
}

impl Camera {
    pub fn new(origin: glam::Vec3, viewport: Viewport) -> Self {
        Self { origin, viewport }
    }

    pub fn primary_ray(&self, x: i32, y: i32) -> (glam::Vec3, glam::Vec3) {
        (self.origin, self.viewport.pixel_to_ray_direction(x, y))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(glam::Vec3::ZERO, Viewport::default())
    }
}
