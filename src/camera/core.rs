use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Pitch is kept strictly inside straight up / straight down so the view
/// basis never degenerates.
pub const MAX_PITCH: f32 = 89.0;

/// Perspective camera defined by eye position, yaw/pitch, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Heading in degrees; 0 looks down +Z, positive turns toward +X.
    pub yaw: f32,
    /// Elevation in degrees; positive looks up.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Viewport size in physical pixels.
    pub viewport: (u32, u32),
}

impl Camera {
    /// Camera at the configured position looking along the configured
    /// target direction.
    #[must_use]
    pub fn from_options(opts: &CameraOptions, viewport: (u32, u32)) -> Self {
        let mut camera = Self {
            position: Vec3::from(opts.position),
            yaw: 0.0,
            pitch: 0.0,
            fovy: opts.fovy,
            znear: opts.znear,
            zfar: opts.zfar,
            viewport,
        };
        camera.look_along(Vec3::from(opts.target));
        camera
    }

    /// Point the camera along `direction`. Zero vectors are ignored.
    pub fn look_along(&mut self, direction: Vec3) {
        let Some(dir) = direction.try_normalize() else {
            return;
        };
        self.yaw = dir.x.atan2(dir.z).to_degrees();
        self.pitch = dir.y.asin().to_degrees().clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Unit forward vector.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos())
    }

    /// Unit vector to the right of the view direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.target().cross(Vec3::Y).normalize_or(Vec3::NEG_X)
    }

    /// Unit up vector of the view basis.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.target())
    }

    /// Viewport aspect ratio (width / height).
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.target(), Vec3::Y)
    }

    /// View-to-clip matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect(),
            self.znear,
            self.zfar,
        )
    }

    /// Combined `projection * view`.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn camera() -> Camera {
        Camera::from_options(&CameraOptions::default(), (800, 600))
    }

    #[test]
    fn zero_yaw_looks_down_positive_z() {
        let mut cam = camera();
        cam.yaw = 0.0;
        cam.pitch = 0.0;
        assert!(approx(cam.target(), Vec3::Z));
        assert!(approx(cam.right(), Vec3::NEG_X));
        assert!(approx(cam.up(), Vec3::Y));
    }

    #[test]
    fn look_along_recovers_direction() {
        let mut cam = camera();
        let dir = Vec3::new(1.0, -0.5, 2.0).normalize();
        cam.look_along(dir);
        assert!(approx(cam.target(), dir));
    }

    #[test]
    fn look_along_clamps_vertical() {
        let mut cam = camera();
        cam.look_along(Vec3::Y);
        assert_eq!(cam.pitch, MAX_PITCH);
    }

    #[test]
    fn point_ahead_projects_to_view_center() {
        let cam = camera();
        let ahead = cam.position + cam.target() * 10.0;
        let clip = cam.view_projection() * ahead.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn point_to_the_right_lands_right_of_center() {
        let cam = camera();
        let p = cam.position + cam.target() * 10.0 + cam.right() * 2.0;
        let clip = cam.view_projection() * p.extend(1.0);
        assert!(clip.x / clip.w > 0.0);
    }

    #[test]
    fn aspect_tracks_viewport() {
        let mut cam = camera();
        cam.viewport = (1920, 1080);
        assert!((cam.aspect() - 16.0 / 9.0).abs() < 1e-6);
        cam.viewport = (0, 0);
        assert_eq!(cam.aspect(), 1.0);
    }
}
