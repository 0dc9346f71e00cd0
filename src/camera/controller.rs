use glam::{Vec2, Vec3};

use super::core::{Camera, MAX_PITCH};
use crate::error::PickviewError;
use crate::input::KeyAction;
use crate::options::CameraOptions;

/// Lowest speed the speed-down key reaches.
const MIN_SPEED: f32 = 0.1;

/// Window edges the cursor currently rests against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Edges {
    left: bool,
    right: bool,
    top: bool,
    bottom: bool,
}

/// First-person controller: keys move and turn, right-drag looks around,
/// and the cursor near a window edge keeps turning toward it.
pub struct CameraController {
    /// The controlled camera.
    pub camera: Camera,
    speed: f32,
    speed_step: f32,
    turn_step: f32,
    mouse_sensitivity: f32,
    edge_scroll: bool,
    margin: f32,
    edge_step: f32,
    edges: Edges,
}

impl CameraController {
    /// Controller configured from `opts` for a viewport of the given size.
    #[must_use]
    pub fn new(opts: &CameraOptions, viewport: (u32, u32)) -> Self {
        Self {
            camera: Camera::from_options(opts, viewport),
            speed: opts.speed.max(MIN_SPEED),
            speed_step: opts.speed_step,
            turn_step: opts.turn_step,
            mouse_sensitivity: opts.mouse_sensitivity,
            edge_scroll: opts.edge_scroll,
            margin: opts.margin,
            edge_step: opts.edge_step,
            edges: Edges::default(),
        }
    }

    /// World units moved per key press.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the movement speed.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::InvalidArgument`] if `speed` is not a
    /// positive number.
    pub fn set_speed(&mut self, speed: f32) -> Result<(), PickviewError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PickviewError::InvalidArgument(format!(
                "camera speed must be positive, got {speed}"
            )));
        }
        self.speed = speed;
        Ok(())
    }

    /// Track a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.viewport = (width, height);
        }
    }

    /// Apply a bound key. Returns `false` for actions the camera does not
    /// handle.
    pub fn on_action(&mut self, action: KeyAction) -> bool {
        let step = self.speed;
        let camera = &mut self.camera;
        match action {
            KeyAction::MoveForward => camera.position += camera.target() * step,
            KeyAction::MoveBackward => {
                camera.position -= camera.target() * step;
            }
            KeyAction::StrafeLeft => camera.position -= camera.right() * step,
            KeyAction::StrafeRight => camera.position += camera.right() * step,
            KeyAction::MoveUp => camera.position.y += step,
            KeyAction::MoveDown => camera.position.y -= step,
            KeyAction::TurnLeft => self.turn(Vec2::new(self.turn_step, 0.0)),
            KeyAction::TurnRight => self.turn(Vec2::new(-self.turn_step, 0.0)),
            KeyAction::LookUp => self.turn(Vec2::new(0.0, self.turn_step)),
            KeyAction::LookDown => self.turn(Vec2::new(0.0, -self.turn_step)),
            KeyAction::SpeedUp => self.speed += self.speed_step,
            KeyAction::SpeedDown => {
                self.speed = (self.speed - self.speed_step).max(MIN_SPEED);
            }
            KeyAction::LogPosition => {
                let Camera { position, yaw, pitch, .. } = &self.camera;
                log::info!(
                    "camera at {position}, yaw {yaw:.1}, pitch {pitch:.1}, \
                     speed {:.2}",
                    self.speed
                );
            }
            KeyAction::ClearSelection | KeyAction::Quit => return false,
        }
        true
    }

    /// Change yaw (x) and pitch (y) by the given degrees.
    fn turn(&mut self, degrees: Vec2) {
        let camera = &mut self.camera;
        camera.yaw = (camera.yaw + degrees.x) % 360.0;
        camera.pitch = (camera.pitch + degrees.y).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Mouse look from a cursor delta in pixels (y grows downward).
    pub fn look(&mut self, delta: Vec2) {
        self.turn(Vec2::new(-delta.x, -delta.y) * self.mouse_sensitivity);
    }

    /// Record which edges the cursor is near, for edge scrolling.
    pub fn on_cursor(&mut self, x: f32, y: f32) {
        if !self.edge_scroll {
            return;
        }
        let (width, height) = self.camera.viewport;
        let (width, height) = (width as f32, height as f32);
        self.edges = Edges {
            left: x <= self.margin,
            right: x >= width - self.margin,
            top: y <= self.margin,
            bottom: y >= height - self.margin,
        };
    }

    /// Per-frame update: keep turning toward any edge the cursor rests on.
    pub fn on_render(&mut self) {
        if !self.edge_scroll || self.edges == Edges::default() {
            return;
        }
        let mut degrees = Vec2::ZERO;
        if self.edges.left {
            degrees.x += self.edge_step;
        }
        if self.edges.right {
            degrees.x -= self.edge_step;
        }
        if self.edges.top {
            degrees.y += self.edge_step;
        }
        if self.edges.bottom {
            degrees.y -= self.edge_step;
        }
        self.turn(degrees);
    }

    /// Current eye position.
    pub fn position(&self) -> Vec3 {
        self.camera.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        let mut ctl = CameraController::new(&CameraOptions::default(), (800, 600));
        ctl.camera.position = Vec3::ZERO;
        ctl.camera.yaw = 0.0;
        ctl.camera.pitch = 0.0;
        ctl
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn forward_and_strafe_follow_view_basis() {
        let mut ctl = controller();
        assert!(ctl.on_action(KeyAction::MoveForward));
        assert!(approx(ctl.position(), Vec3::Z));
        assert!(ctl.on_action(KeyAction::StrafeRight));
        assert!(approx(ctl.position(), Vec3::new(-1.0, 0.0, 1.0)));
        assert!(ctl.on_action(KeyAction::MoveUp));
        assert_eq!(ctl.position().y, 1.0);
    }

    #[test]
    fn turn_right_rotates_toward_right_vector() {
        let mut ctl = controller();
        let right = ctl.camera.right();
        let _ = ctl.on_action(KeyAction::TurnRight);
        assert!(ctl.camera.target().dot(right) > 0.0);
    }

    #[test]
    fn speed_keys_respect_floor() {
        let mut ctl = controller();
        for _ in 0..100 {
            let _ = ctl.on_action(KeyAction::SpeedDown);
        }
        assert_eq!(ctl.speed(), MIN_SPEED);
        let _ = ctl.on_action(KeyAction::SpeedUp);
        assert!(ctl.speed() > MIN_SPEED);
    }

    #[test]
    fn set_speed_rejects_non_positive() {
        let mut ctl = controller();
        assert!(matches!(
            ctl.set_speed(0.0),
            Err(PickviewError::InvalidArgument(_))
        ));
        assert!(ctl.set_speed(-2.0).is_err());
        assert!(ctl.set_speed(f32::NAN).is_err());
        ctl.set_speed(3.0).unwrap();
        assert_eq!(ctl.speed(), 3.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut ctl = controller();
        ctl.look(Vec2::new(0.0, -1.0e6));
        assert_eq!(ctl.camera.pitch, MAX_PITCH);
        ctl.look(Vec2::new(0.0, 1.0e6));
        assert_eq!(ctl.camera.pitch, -MAX_PITCH);
    }

    #[test]
    fn mouse_look_scales_by_sensitivity() {
        let mut ctl = controller();
        ctl.look(Vec2::new(20.0, 0.0));
        assert!((ctl.camera.yaw + 1.0).abs() < 1e-5);
    }

    #[test]
    fn edge_scroll_turns_each_frame_only_when_enabled() {
        let mut ctl = controller();
        ctl.on_cursor(1.0, 300.0);
        ctl.on_render();
        assert_eq!(ctl.camera.yaw, 0.0);

        ctl.edge_scroll = true;
        ctl.on_cursor(1.0, 300.0);
        ctl.on_render();
        ctl.on_render();
        assert!((ctl.camera.yaw - 2.0 * ctl.edge_step).abs() < 1e-5);

        ctl.on_cursor(400.0, 300.0);
        ctl.on_render();
        assert!((ctl.camera.yaw - 2.0 * ctl.edge_step).abs() < 1e-5);
    }

    #[test]
    fn bottom_edge_pitches_down() {
        let mut ctl = controller();
        ctl.edge_scroll = true;
        ctl.on_cursor(400.0, 599.0);
        ctl.on_render();
        assert!(ctl.camera.pitch < 0.0);
    }

    #[test]
    fn selection_actions_are_not_camera_actions() {
        let mut ctl = controller();
        assert!(!ctl.on_action(KeyAction::ClearSelection));
        assert!(!ctl.on_action(KeyAction::Quit));
    }
}
