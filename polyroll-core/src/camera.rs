/// Camera placement that presents a chosen face, plus projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::catalog::{Catalog, Polyhedron};
use crate::dice::DieType;
use crate::error::Result;

/// How far along the centroid-to-face ray the eye sits, in multiples of
/// the centroid-to-face distance. Clears every catalog shape's silhouette.
pub const EYE_SCALE: f64 = 5.0;

/// Eye position from which face `target_face` (1-based) is seen head-on.
pub fn camera_eye(shape: &Polyhedron, target_face: usize) -> Result<Point3<f64>> {
    camera_eye_with_scale(shape, target_face, EYE_SCALE)
}

/// [`camera_eye`] with an explicit distance multiplier.
pub fn camera_eye_with_scale(
    shape: &Polyhedron,
    target_face: usize,
    scale: f64,
) -> Result<Point3<f64>> {
    shape.check_outcome(target_face)?;
    let origin = shape.centroid();
    let direction = shape.face_centroids()[target_face - 1] - origin;
    Ok(origin + direction * scale)
}

/// [`camera_eye`] against the global catalog.
pub fn compute_camera_eye(die: DieType, target_face: usize) -> Result<Point3<f64>> {
    camera_eye(Catalog::global().get(die), target_face)
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in radians.
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f64::consts::FRAC_PI_4,
            aspect,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Look at `shape` from its [`camera_eye`] for `target_face`, widening the
    /// field of view just enough to keep the whole die in frame.
    pub fn facing(shape: &Polyhedron, target_face: usize, aspect: f64) -> Result<Self> {
        let eye = camera_eye(shape, target_face)?;
        let target = shape.centroid();
        let forward = (target - eye).normalize();

        // +z reads naturally for the bipyramids; fall back when looking along it.
        let up = if forward.dot(&Vector3::z()).abs() > 0.99 {
            Vector3::y()
        } else {
            Vector3::z()
        };

        let distance = (eye - target).norm();
        let mut camera = Self {
            position: eye,
            target,
            up,
            ..Self::new(aspect)
        };
        camera.fov = fit_fov(shape.radius(), distance, aspect);
        Ok(camera)
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = 2.0 * (self.position - self.target).norm() * (self.fov / 2.0).tan();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Direction from the eye to the target.
    pub fn forward(&self) -> Vector3<f64> {
        (self.target - self.position).normalize()
    }

    /// Project a 3D point to 2D screen space.
    ///
    /// Returns `(x, y, depth)` with `depth` the NDC z in [-1, 1], or `None` when
    /// the point lies behind the eye or outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        model_matrix: &Matrix4<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        if clip.w <= 1e-9 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let ndc_z = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&ndc_z)
        {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f64;

        Some((screen_x, screen_y, ndc_z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}

/// Vertical field of view that frames a sphere of `radius` seen from `distance`.
fn fit_fov(radius: f64, distance: f64, aspect: f64) -> f64 {
    const MARGIN: f64 = 1.15;
    let half = (radius / distance).clamp(0.0, 0.95).asin() * MARGIN;
    let mut tan_half = half.tan();
    if aspect > 0.0 && aspect < 1.0 {
        tan_half /= aspect;
    }
    2.0 * tan_half.atan()
}
