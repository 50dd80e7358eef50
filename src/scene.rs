use serde::Deserialize;

/// 8-bit RGBA color, the unit every canvas pixel and sphere is shaded with.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, bytemuck::Pod, bytemuck::Zeroable)]
#[serde(from = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_bits(self) -> u32 {
        u32::from_le_bytes(self.to_array())
    }

    pub fn from_bits(bits: u32) -> Self {
        bits.to_le_bytes().into()
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.to_array())
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        pixel.0.into()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Three small spheres floating over a huge yellow ground sphere, with a
    /// black one above the camera.
    pub fn reference() -> Self {
        Self::new(vec![
            Sphere::new(glam::Vec3::new(0.0, -1.0, 3.0), 1.0, Color::RED),
            Sphere::new(glam::Vec3::new(-2.0, 0.0, 4.0), 1.0, Color::GREEN),
            Sphere::new(glam::Vec3::new(2.0, 0.0, 4.0), 1.0, Color::BLUE),
            Sphere::new(glam::Vec3::new(0.0, -5001.0, 0.0), 5000.0, Color::YELLOW),
            Sphere::new(glam::Vec3::new(0.0, 2.0, 3.0), 1.0, Color::BLACK),
        ])
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sphere {
    pub center: glam::Vec3,
    pub radius: f32,
    pub color: Color,
}

impl Sphere {
    pub fn new(center: glam::Vec3, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: glam::Vec3::ZERO,
            radius: 1.0,
            color: Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scene_layout() {
        let scene = Scene::reference();
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.spheres[0].color, Color::RED);
        assert_eq!(scene.spheres[3].radius, 5000.0);
        assert_eq!(scene.spheres[4].center, glam::Vec3::new(0.0, 2.0, 3.0));
    }

    #[test]
    fn color_bits_keep_channels() {
        let color = Color::new(12, 34, 56, 78);
        assert_eq!(Color::from_bits(color.to_bits()), color);
        assert_eq!(image::Rgba::from(color), image::Rgba([12, 34, 56, 78]));
    }
}
