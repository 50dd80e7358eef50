//! Flat-color ray tracer for a fixed scene of spheres.
//!
//! One primary ray is cast per canvas pixel from a fixed camera; the pixel
//! takes the color of the nearest sphere hit, or the canvas background.

pub mod application;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod error;
pub mod raytracer;
pub mod render;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod util;

pub use error::{Error, Result};
