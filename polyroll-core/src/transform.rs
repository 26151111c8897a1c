/// Model transforms for turning a presented die in place
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// User-controlled rotation of the die about its own centroid (radians).
///
/// Applied on top of the face-presenting camera, so an orbit of zero always
/// shows the rolled face head-on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orbit {
    pub yaw: f64,
    pub pitch: f64,
}

impl Orbit {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    /// Rotate by delta amounts (in radians). Pitch stops short of the poles.
    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        const LIMIT: f64 = std::f64::consts::FRAC_PI_2 - 0.01;
        self.yaw = (self.yaw + d_yaw) % std::f64::consts::TAU;
        self.pitch = (self.pitch + d_pitch).clamp(-LIMIT, LIMIT);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_identity(&self) -> bool {
        self.yaw == 0.0 && self.pitch == 0.0
    }

    /// Model matrix turning the die about `pivot`, with yaw around `up` and
    /// pitch around `right`, both given in world space.
    pub fn model_matrix(
        &self,
        pivot: &Point3<f64>,
        up: &Vector3<f64>,
        right: &Vector3<f64>,
    ) -> Matrix4<f64> {
        let yaw = Matrix4::from_axis_angle(&Unit::new_normalize(*up), self.yaw);
        let pitch = Matrix4::from_axis_angle(&Unit::new_normalize(*right), self.pitch);
        Transform::about_point(&(pitch * yaw), pivot)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f64>) -> Matrix4<f64> {
        Matrix4::new_translation(offset)
    }

    /// Apply `transform` with `pivot` as the fixed point: `T(p) * M * T(-p)`.
    pub fn about_point(transform: &Matrix4<f64>, pivot: &Point3<f64>) -> Matrix4<f64> {
        Self::translation_matrix(&pivot.coords)
            * transform
            * Self::translation_matrix(&-pivot.coords)
    }
}
