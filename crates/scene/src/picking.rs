use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub distance: f64,
    pub point: Vec3,
}

/// Nearest intersection of `ray` with `sphere` in front of the ray origin.
///
/// The direction does not need to be normalized; `distance` is measured
/// along the normalized direction. A ray starting inside the sphere hits the
/// far side.
pub fn pick_sphere(ray: Ray, sphere: Sphere) -> Option<PickHit> {
    let dir = ray.dir.try_normalize()?;
    let oc = ray.origin - sphere.center;

    // |o + t d - c|^2 = r^2 with |d| = 1.
    let b = oc.dot(dir);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sq = disc.sqrt();
    let t0 = -b - sq;
    let t1 = -b + sq;
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return None;
    };

    Some(PickHit {
        distance: t,
        point: ray.origin + dir * t,
    })
}
