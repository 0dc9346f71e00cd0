/// Picking state driven by the left mouse button.
///
/// ```text
/// Idle --press--> MouseDown --first frame--> Picking --release--> Idle
///                     |                         ^ each frame re-picks
///                     +--------release----------+-> Idle (one pending pick)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PickState {
    /// Button up; nothing to pick.
    #[default]
    Idle,
    /// Pressed at `(x, y)`, not yet picked.
    MouseDown {
        /// Cursor x at the latest event.
        x: f32,
        /// Cursor y at the latest event.
        y: f32,
    },
    /// Held; the picking pass runs every frame at the latest cursor.
    Picking {
        /// Cursor x at the latest event.
        x: f32,
        /// Cursor y at the latest event.
        y: f32,
    },
}

impl PickState {
    /// Left button pressed at `(x, y)`.
    pub fn press(&mut self, x: f32, y: f32) {
        *self = Self::MouseDown { x, y };
    }

    /// Cursor moved; tracked only while the button is held.
    pub fn moved(&mut self, x: f32, y: f32) {
        match self {
            Self::MouseDown { x: px, y: py } | Self::Picking { x: px, y: py } => {
                *px = x;
                *py = y;
            }
            Self::Idle => {}
        }
    }

    /// Left button released. Returns the press position if no frame has
    /// picked it yet, so a click shorter than a frame still resolves.
    pub fn release(&mut self) -> Option<(f32, f32)> {
        let pending = match *self {
            Self::MouseDown { x, y } => Some((x, y)),
            _ => None,
        };
        *self = Self::Idle;
        pending
    }

    /// Advance one frame. Returns the cursor position to pick at, if any.
    pub fn frame(&mut self) -> Option<(f32, f32)> {
        match *self {
            Self::Idle => None,
            Self::MouseDown { x, y } | Self::Picking { x, y } => {
                *self = Self::Picking { x, y };
                Some((x, y))
            }
        }
    }

    /// Whether the button is held.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_hold_release_cycle() {
        let mut state = PickState::default();
        assert_eq!(state.frame(), None);

        state.press(10.0, 20.0);
        assert_eq!(state, PickState::MouseDown { x: 10.0, y: 20.0 });
        assert_eq!(state.frame(), Some((10.0, 20.0)));
        assert_eq!(state, PickState::Picking { x: 10.0, y: 20.0 });

        state.moved(11.0, 25.0);
        assert_eq!(state.frame(), Some((11.0, 25.0)));
        assert_eq!(state.frame(), Some((11.0, 25.0)));

        assert_eq!(state.release(), None);
        assert_eq!(state, PickState::Idle);
        assert_eq!(state.frame(), None);
    }

    #[test]
    fn release_before_first_frame_leaves_pending_pick() {
        let mut state = PickState::default();
        state.press(3.0, 4.0);
        state.moved(5.0, 6.0);
        assert_eq!(state.release(), Some((5.0, 6.0)));
        assert!(!state.is_active());
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut state = PickState::default();
        state.moved(1.0, 1.0);
        assert_eq!(state, PickState::Idle);
    }
}
