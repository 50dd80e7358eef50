use std::time::Instant;

use rayon::prelude::*;

use crate::{
    camera::Camera, canvas::Canvas, config::RenderConfig, raytracer::Raytracer, scene::Color,
    util,
};

/// Ray parameter window used for primary rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceBounds {
    pub t_min: f32,
    pub t_max: f32,
}

impl Default for TraceBounds {
    fn default() -> Self {
        Self {
            t_min: 1.0,
            t_max: f32::INFINITY,
        }
    }
}

/// A canvas together with everything needed to fill it.
pub struct Frame {
    pub canvas: Canvas,
    pub camera: Camera,
    pub raytracer: Raytracer,
    pub bounds: TraceBounds,
    pub sequential: bool,
}

impl Frame {
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut canvas = Canvas::new(config.canvas.width, config.canvas.height);
        canvas.clear(config.canvas.background);
        let raytracer = Raytracer::new(config.scene(), canvas.background_handle());
        tracing::info!(
            width = canvas.width(),
            height = canvas.height(),
            spheres = raytracer.scene().len(),
            "canvas created"
        );

        Self {
            canvas,
            camera: config.camera(),
            raytracer,
            bounds: config.trace_bounds(),
            sequential: false,
        }
    }

    pub fn render(&mut self) {
        if self.sequential {
            render_frame_sequential(&mut self.canvas, &self.camera, &self.raytracer, self.bounds);
        } else {
            render_frame(&mut self.canvas, &self.camera, &self.raytracer, self.bounds);
        }

        if self.canvas.is_in_bounds_centered(0, 0) {
            let (x, y) = self.canvas.centered_to_screen(0, 0);
            if let Some(center) = self.canvas.pixel(x as u32, y as u32) {
                tracing::debug!(color = %util::color::name(center), "center pixel");
            }
        }
    }
}

/// Trace one primary ray per pixel, one canvas row per rayon task.
///
/// Rows are disjoint so workers never share a pixel; the call returns once
/// the whole frame is written.
pub fn render_frame(canvas: &mut Canvas, camera: &Camera, raytracer: &Raytracer, bounds: TraceBounds) {
    let started = Instant::now();
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    let row_len = width as usize * 4;

    if row_len > 0 {
        canvas
            .image_mut()
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(screen_y, row)| {
                let y = height / 2 - screen_y as i32;
                let pixels: &mut [Color] = bytemuck::cast_slice_mut(row);
                for (screen_x, pixel) in pixels.iter_mut().enumerate() {
                    let x = screen_x as i32 - width / 2;
                    let (origin, direction) = camera.primary_ray(x, y);
                    *pixel = raytracer.trace_ray(origin, direction, bounds.t_min, bounds.t_max);
                }
            });
    }

    tracing::info!(
        width,
        height,
        elapsed_ms = started.elapsed().as_secs_f32() * 1000.0,
        "frame rendered"
    );
}

/// Single-threaded pass over the centered coordinate range, writing through
/// the bounds-checked pixel primitive.
///
/// The range is inclusive on both ends; pixels that land outside the canvas
/// are dropped by [`Canvas::put_pixel_centered`].
pub fn render_frame_sequential(
    canvas: &mut Canvas,
    camera: &Camera,
    raytracer: &Raytracer,
    bounds: TraceBounds,
) {
    let started = Instant::now();
    let half_width = canvas.width() as i32 / 2;
    let half_height = canvas.height() as i32 / 2;

    for x in -half_width..=half_width {
        for y in -half_height..=half_height {
            let (origin, direction) = camera.primary_ray(x, y);
            let color = raytracer.trace_ray(origin, direction, bounds.t_min, bounds.t_max);
            canvas.put_pixel_centered(x, y, color);
        }
    }

    tracing::info!(
        width = canvas.width(),
        height = canvas.height(),
        elapsed_ms = started.elapsed().as_secs_f32() * 1000.0,
        "frame rendered sequentially"
    );
}
