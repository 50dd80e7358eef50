use crate::{
    canvas::BackgroundHandle,
    scene::{Color, Scene, Sphere},
};

/// Both ray parameters where the ray meets the sphere, larger root first.
///
/// `(+inf, +inf)` when the ray misses. `direction` must be non-zero.
pub fn intersect_ray_sphere(origin: glam::Vec3, direction: glam::Vec3, sphere: &Sphere) -> (f32, f32) {
    // |origin + t*direction - center|^2 = radius^2
    let oc = origin - sphere.center;

    let k1 = direction.dot(direction);
    let k2 = 2.0 * oc.dot(direction);
    let k3 = oc.dot(oc) - sphere.radius * sphere.radius;

    let discriminant = k2 * k2 - 4.0 * k1 * k3;
    if discriminant < 0.0 {
        return (f32::INFINITY, f32::INFINITY);
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-k2 + sqrt_discriminant) / (2.0 * k1);
    let t2 = (-k2 - sqrt_discriminant) / (2.0 * k1);
    (t1, t2)
}

/// Nearest accepted intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Position of the sphere in the scene.
    pub index: usize,
    pub t: f32,
}

/// Flat-color tracer over a fixed scene.
///
/// The background is read through the canvas' [`BackgroundHandle`] on every
/// miss, so a later clear is picked up without rebuilding the tracer.
#[derive(Debug, Clone)]
pub struct Raytracer {
    scene: Scene,
    background: BackgroundHandle,
}

impl Raytracer {
    pub fn new(scene: Scene, background: BackgroundHandle) -> Self {
        Self { scene, background }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Smallest root strictly inside `(t_min, t_max)`.
    ///
    /// Spheres are visited in scene order and each sphere's first root is
    /// tested before its second, so an equal `t` keeps the earlier hit.
    pub fn closest_intersection(
        &self,
        origin: glam::Vec3,
        direction: glam::Vec3,
        t_min: f32,
        t_max: f32,
    ) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_t = f32::INFINITY;

        for (index, sphere) in self.scene.spheres.iter().enumerate() {
            let (t1, t2) = intersect_ray_sphere(origin, direction, sphere);
            for t in [t1, t2] {
                if t < closest_t && t_min < t && t < t_max {
                    closest_t = t;
                    closest = Some(Hit { index, t });
                }
            }
        }

        closest
    }

    pub fn trace_ray(&self, origin: glam::Vec3, direction: glam::Vec3, t_min: f32, t_max: f32) -> Color {
        match self.closest_intersection(origin, direction, t_min, t_max) {
            Some(hit) => self.scene.spheres[hit.index].color,
            None => self.background.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn tracer(spheres: Vec<Sphere>) -> Raytracer {
        Raytracer::new(Scene::new(spheres), BackgroundHandle::new(Color::WHITE))
    }

    #[test]
    fn roots_through_center() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, Color::RED);
        let (t1, t2) = intersect_ray_sphere(Vec3::ZERO, Vec3::Z, &sphere);
        assert!((t1 - 12.0).abs() < 1e-5);
        assert!((t2 - 8.0).abs() < 1e-5);
    }

    #[test]
    fn roots_scale_with_direction_length() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, Color::RED);
        let (t1, t2) = intersect_ray_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), &sphere);
        assert!((t1 - 3.0).abs() < 1e-5);
        assert!((t2 - 2.0).abs() < 1e-5);
    }

    #[test]
    fn roots_off_axis_match_distance() {
        let origin = Vec3::new(1.0, -2.0, 0.5);
        let sphere = Sphere::new(Vec3::new(4.0, 2.0, 0.5), 1.5, Color::RED);
        let direction = sphere.center - origin;
        let distance = direction.length();
        let (t1, t2) = intersect_ray_sphere(origin, direction.normalize(), &sphere);
        assert!((t1 - (distance + 1.5)).abs() < 1e-4);
        assert!((t2 - (distance - 1.5)).abs() < 1e-4);
    }

    #[test]
    fn miss_yields_infinity() {
        let sphere = Sphere::new(Vec3::new(5.0, 0.0, 5.0), 1.0, Color::RED);
        let (t1, t2) = intersect_ray_sphere(Vec3::ZERO, Vec3::Z, &sphere);
        assert_eq!(t1, f32::INFINITY);
        assert_eq!(t2, f32::INFINITY);
    }

    #[test]
    fn miss_returns_background() {
        let raytracer = tracer(vec![Sphere::new(Vec3::new(5.0, 0.0, 5.0), 1.0, Color::RED)]);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY), Color::WHITE);
    }

    #[test]
    fn background_is_read_at_trace_time() {
        let mut canvas = crate::canvas::Canvas::new(2, 2);
        let raytracer = Raytracer::new(Scene::default(), canvas.background_handle());
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY), Color::WHITE);

        canvas.clear(Color::GREEN);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY), Color::GREEN);
    }

    #[test]
    fn hit_ahead_returns_sphere_color() {
        let raytracer = tracer(vec![Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, Color::BLUE)]);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY), Color::BLUE);

        let hit = raytracer
            .closest_intersection(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY)
            .unwrap();
        assert_eq!(hit.index, 0);
        assert!((hit.t - 8.0).abs() < 1e-5);
    }

    #[test]
    fn nearest_sphere_wins_regardless_of_order() {
        let raytracer = tracer(vec![
            Sphere::new(Vec3::new(0.0, 0.0, 20.0), 1.0, Color::RED),
            Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, Color::GREEN),
        ]);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY), Color::GREEN);
    }

    #[test]
    fn equal_t_keeps_earlier_sphere() {
        let center = Vec3::new(0.0, 0.0, 6.0);
        let raytracer = tracer(vec![
            Sphere::new(center, 2.0, Color::RED),
            Sphere::new(center, 2.0, Color::BLUE),
        ]);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY), Color::RED);

        let swapped = tracer(vec![
            Sphere::new(center, 2.0, Color::BLUE),
            Sphere::new(center, 2.0, Color::RED),
        ]);
        assert_eq!(swapped.trace_ray(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY), Color::BLUE);
    }

    #[test]
    fn root_equal_to_t_min_is_rejected() {
        // roots 2 and 4
        let near = Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0, Color::RED);
        let raytracer = tracer(vec![near]);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 2.0, 3.0), Color::WHITE);

        // roots 3 and 4
        let behind = Sphere::new(Vec3::new(0.0, 0.0, 3.5), 0.5, Color::BLUE);
        let raytracer = tracer(vec![near, behind]);
        let hit = raytracer
            .closest_intersection(Vec3::ZERO, Vec3::Z, 2.0, f32::INFINITY)
            .unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.t, 3.0);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 2.0, f32::INFINITY), Color::BLUE);
    }

    #[test]
    fn root_equal_to_t_max_is_rejected() {
        let raytracer = tracer(vec![Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0, Color::RED)]);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 0.0, 2.0), Color::WHITE);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, Vec3::Z, 0.0, 2.5), Color::RED);
    }

    #[test]
    fn camera_inside_sphere_sees_far_wall() {
        let raytracer = tracer(vec![Sphere::new(Vec3::ZERO, 10.0, Color::YELLOW)]);
        let hit = raytracer
            .closest_intersection(Vec3::ZERO, Vec3::Z, 1.0, f32::INFINITY)
            .unwrap();
        assert!((hit.t - 10.0).abs() < 1e-5);
    }

    #[test]
    fn reference_scene_center_pixel_is_red() {
        let raytracer = Raytracer::new(Scene::reference(), BackgroundHandle::new(Color::WHITE));
        let viewport = crate::camera::Viewport::new(800, 600, 1.0, 1.0, 1.0);
        let direction = viewport.pixel_to_ray_direction(0, 0);
        assert_eq!(direction, Vec3::Z);
        assert_eq!(raytracer.trace_ray(Vec3::ZERO, direction, 1.0, f32::INFINITY), Color::RED);
    }

    #[test]
    fn reference_scene_backward_ray_is_background() {
        let raytracer = Raytracer::new(Scene::reference(), BackgroundHandle::new(Color::WHITE));
        assert_eq!(
            raytracer.trace_ray(Vec3::ZERO, Vec3::NEG_Z, 1.0, f32::INFINITY),
            Color::WHITE
        );
    }
}
