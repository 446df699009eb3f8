use glam::Vec2;

/// Wheel units reported per scroll line, matching browser `wheelDelta`.
pub const WHEEL_UNITS_PER_LINE: f32 = 120.0;

/// Pointer events as delivered by the host, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    /// Positive values scroll away from the user and zoom in.
    Wheel { delta_y: f32 },
}

impl PointerInput {
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            PointerInput::Down { x, y } | PointerInput::Move { x, y } => Some(Vec2::new(x, y)),
            PointerInput::Up | PointerInput::Wheel { .. } => None,
        }
    }

    pub fn wheel_lines(lines: f32) -> Self {
        PointerInput::Wheel {
            delta_y: lines * WHEEL_UNITS_PER_LINE,
        }
    }
}
