//! Orbit camera with spherical coordinates.
//!
//! Y-up coordinate system, pointer drag for rotation, wheel for zoom.
//! Yaw spins around Y and is unbounded; pitch tilts around X and is clamped
//! onto the closed range `[-(π/2 - ε), π/2 - ε]`, with ε the pitch margin,
//! so it always stays strictly inside `(-π/2, π/2)`. Non-finite pointer or
//! wheel input is ignored.
//!
//! The eye sits at `Ry(yaw) * Rx(pitch) * T(0, 0, radius)` applied to the
//! origin, offset by the target. In closed form:
//!
//! ```text
//! eye = target + radius * (cos(pitch) * sin(yaw), -sin(pitch), cos(pitch) * cos(yaw))
//! ```
//!
//! so yaw = pitch = 0 puts the eye on +Z looking back at the target.

use crate::error::{Result, ViewerError};
use crate::input::PointerInput;
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

pub const DRAG_SENSITIVITY: f32 = 1.0 / 100.0;
pub const ZOOM_SENSITIVITY: f32 = 1.0 / 30.0;
pub const MIN_RADIUS: f32 = 1.0;
pub const MAX_RADIUS: f32 = 10.0;
pub const DEFAULT_RADIUS: f32 = 3.0;
pub const PITCH_MARGIN: f32 = 0.01;
const UP_VECTOR_STEP_DEGREES: f32 = 1.0;

/// Anything that can produce a view for the composer.
pub trait CameraRig {
    fn eye_position(&self) -> Vec3;

    fn target(&self) -> Vec3;

    fn up_vector(&self) -> Vec3;

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target(), self.up_vector())
    }

    /// Rigs that ignore pointer input keep the default.
    fn handle_input(&mut self, _input: PointerInput) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub target: Vec3,
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Radius units per wheel unit.
    pub zoom_sensitivity: f32,
    /// Distance kept from the poles, in radians.
    pub pitch_margin: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: DEFAULT_RADIUS,
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            sensitivity: DRAG_SENSITIVITY,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            pitch_margin: PITCH_MARGIN,
        }
    }
}

impl OrbitSettings {
    pub fn max_pitch(&self) -> f32 {
        FRAC_PI_2 - self.pitch_margin
    }

    fn validate(&self) -> Result<()> {
        let radius_ok = self.min_radius > 0.0
            && self.min_radius <= self.max_radius
            && (self.min_radius..=self.max_radius).contains(&self.radius);
        let margin_ok = self.pitch_margin > 0.0 && self.pitch_margin < FRAC_PI_2;

        if radius_ok && margin_ok && self.target.is_finite() {
            Ok(())
        } else {
            // A fresh camera starts level.
            Err(ViewerError::OutOfRangeOrbit {
                pitch: 0.0,
                radius: self.radius,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { last_pointer: Vec2 },
}

/// Orbit camera around a fixed target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    settings: OrbitSettings,
    yaw: f32,
    pitch: f32,
    radius: f32,
    drag: DragState,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let settings = OrbitSettings::default();
        Self {
            settings,
            yaw: 0.0,
            pitch: 0.0,
            radius: settings.radius,
            drag: DragState::Idle,
        }
    }
}

impl OrbitCamera {
    pub fn new(settings: OrbitSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            yaw: 0.0,
            pitch: 0.0,
            radius: settings.radius,
            drag: DragState::Idle,
        })
    }

    /// Places the camera at the given orbit, clamping pitch and radius.
    /// Non-finite components keep their current value.
    pub fn with_orbit(mut self, yaw: f32, pitch: f32, radius: f32) -> Self {
        if yaw.is_finite() {
            self.yaw = yaw;
        }
        if pitch.is_finite() {
            self.pitch = self.clamp_pitch(pitch);
        }
        if radius.is_finite() {
            self.radius = self.clamp_radius(radius);
        }
        self
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        if !pointer.is_finite() {
            log::warn!("ignoring drag start at ({}, {})", pointer.x, pointer.y);
            return;
        }
        if self.drag == DragState::Idle {
            log::debug!("orbit drag started at ({}, {})", pointer.x, pointer.y);
        }
        self.drag = DragState::Dragging { last_pointer: pointer };
    }

    pub fn drag(&mut self, pointer: Vec2) {
        let DragState::Dragging { last_pointer } = self.drag else {
            return;
        };

        let delta = pointer - last_pointer;
        let yaw = self.yaw - delta.x * self.settings.sensitivity;
        if !delta.is_finite() || !yaw.is_finite() {
            log::warn!("ignoring non-finite drag to ({}, {})", pointer.x, pointer.y);
            return;
        }
        self.yaw = yaw;
        self.pitch = self.clamp_pitch(self.pitch - delta.y * self.settings.sensitivity);
        self.drag = DragState::Dragging { last_pointer: pointer };
    }

    pub fn end_drag(&mut self) {
        if self.drag != DragState::Idle {
            log::debug!("orbit drag ended (yaw {:.3}, pitch {:.3})", self.yaw, self.pitch);
        }
        self.drag = DragState::Idle;
    }

    pub fn zoom(&mut self, wheel_delta: f32) {
        if !wheel_delta.is_finite() {
            log::warn!("ignoring non-finite wheel delta {}", wheel_delta);
            return;
        }
        self.radius = self.clamp_radius(self.radius - wheel_delta * self.settings.zoom_sensitivity);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    /// Confirms pitch and radius sit inside their clamped ranges.
    pub fn check_invariants(&self) -> Result<()> {
        let max_pitch = self.settings.max_pitch();
        let pitch_ok = (-max_pitch..=max_pitch).contains(&self.pitch);
        let radius_ok = self.radius > 0.0
            && (self.settings.min_radius..=self.settings.max_radius).contains(&self.radius);

        if pitch_ok && radius_ok {
            Ok(())
        } else {
            Err(ViewerError::OutOfRangeOrbit {
                pitch: self.pitch,
                radius: self.radius,
            })
        }
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        let max_pitch = self.settings.max_pitch();
        pitch.clamp(-max_pitch, max_pitch)
    }

    fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.settings.min_radius, self.settings.max_radius)
    }

    fn eye_at_pitch(&self, pitch: f32) -> Vec3 {
        let orbit = Mat4::from_rotation_y(self.yaw)
            * Mat4::from_rotation_x(pitch)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.radius));
        self.settings.target + orbit.transform_point3(Vec3::ZERO)
    }
}

impl CameraRig for OrbitCamera {
    fn eye_position(&self) -> Vec3 {
        self.eye_at_pitch(self.pitch)
    }

    fn target(&self) -> Vec3 {
        self.settings.target
    }

    /// Approximates the up vector by stepping pitch back one degree and
    /// taking the direction the eye moves. Stays well defined at the poles
    /// where a cross-product construction collapses.
    fn up_vector(&self) -> Vec3 {
        let stepped = self.eye_at_pitch(self.pitch - UP_VECTOR_STEP_DEGREES.to_radians());
        (stepped - self.eye_position()).normalize()
    }

    fn view_matrix(&self) -> Mat4 {
        debug_assert!(self.check_invariants().is_ok(), "orbit invariants violated: {:?}", self);
        Mat4::look_at_rh(self.eye_position(), self.settings.target, self.up_vector())
    }

    fn handle_input(&mut self, input: PointerInput) {
        match input {
            PointerInput::Down { x, y } => self.begin_drag(Vec2::new(x, y)),
            PointerInput::Move { x, y } => self.drag(Vec2::new(x, y)),
            PointerInput::Up => self.end_drag(),
            PointerInput::Wheel { delta_y } => self.zoom(delta_y),
        }
    }
}

/// A camera that never moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCamera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
}

impl FixedCamera {
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { eye, target, up }
    }

    /// Eye at the origin facing -Z, which yields an identity view matrix.
    pub fn clip_space() -> Self {
        Self::looking_at(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
    }
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self::clip_space()
    }
}

impl CameraRig for FixedCamera {
    fn eye_position(&self) -> Vec3 {
        self.eye
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn up_vector(&self) -> Vec3 {
        self.up
    }
}
