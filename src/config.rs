use std::path::Path;

use serde::Deserialize;

use crate::{
    camera::{Camera, Viewport},
    render::TraceBounds,
    scene::{Color, Scene, Sphere},
    Error, Result,
};

/// Everything needed to build a frame, loadable from TOML.
///
/// Missing sections fall back to the reference setup: an 800x600 white
/// canvas, a 1x1 viewport at distance 1, the camera at the origin tracing
/// `(1, inf)`, and the five reference spheres.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub canvas: CanvasConfig,
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub spheres: Vec<Sphere>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub origin: glam::Vec3,
    pub t_min: f32,
    /// Unbounded when absent.
    pub t_max: Option<f32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
            spheres: Scene::reference().spheres,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color::WHITE,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            distance: 1.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: glam::Vec3::ZERO,
            t_min: 1.0,
            t_max: None,
        }
    }
}

impl RenderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&source)?;
        tracing::info!(path = %path.display(), spheres = config.spheres.len(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(invalid(format!(
                "canvas must be at least 1x1, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        for (name, value) in [
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
            ("viewport.distance", self.viewport.distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive and finite, got {value}")));
            }
        }
        if !self.camera.origin.is_finite() {
            return Err(invalid("camera.origin must be finite".to_owned()));
        }
        let bounds = self.trace_bounds();
        if bounds.t_min.is_nan() || bounds.t_max.is_nan() || bounds.t_min >= bounds.t_max {
            return Err(invalid(format!(
                "camera.t_min ({}) must be below camera.t_max ({})",
                bounds.t_min, bounds.t_max
            )));
        }
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !sphere.center.is_finite() {
                return Err(invalid(format!("spheres[{index}].center must be finite")));
            }
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(invalid(format!(
                    "spheres[{index}].radius must be positive and finite, got {}",
                    sphere.radius
                )));
            }
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.canvas.width,
            self.canvas.height,
            self.viewport.width,
            self.viewport.height,
            self.viewport.distance,
        )
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.camera.origin, self.viewport())
    }

    pub fn scene(&self) -> Scene {
        Scene::new(self.spheres.clone())
    }

    pub fn trace_bounds(&self) -> TraceBounds {
        TraceBounds {
            t_min: self.camera.t_min,
            t_max: self.camera.t_max.unwrap_or(f32::INFINITY),
        }
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig(message)
}
