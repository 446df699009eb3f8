use approx::assert_abs_diff_eq;
use glam::{Vec2, Vec3};
use orbit_viewer::camera::{CameraRig, DragState, FixedCamera, OrbitCamera, OrbitSettings, DRAG_SENSITIVITY};
use orbit_viewer::{PointerInput, ViewerError};
use std::f32::consts::FRAC_PI_2;

fn assert_finite(matrix: [[f32; 4]; 4]) {
    for row in &matrix {
        for &val in row {
            assert!(val.is_finite(), "Camera matrix contains non-finite values");
        }
    }
}

#[test]
fn test_default_eye_on_positive_z() {
    let camera = OrbitCamera::default();
    assert_eq!(camera.radius(), 3.0);

    let eye = camera.eye_position();
    assert_abs_diff_eq!(eye.x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(eye.y, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(eye.z, 3.0, epsilon = 1e-6);
}

#[test]
fn test_eye_offset_by_target() {
    let settings = OrbitSettings {
        target: Vec3::new(1.0, 2.0, 3.0),
        ..OrbitSettings::default()
    };
    let camera = OrbitCamera::new(settings).unwrap();
    assert!(camera.eye_position().abs_diff_eq(Vec3::new(1.0, 2.0, 6.0), 1e-5));
    assert_abs_diff_eq!((camera.eye_position() - camera.target()).length(), camera.radius(), epsilon = 1e-5);
}

#[test]
fn test_horizontal_drag_only_changes_yaw() {
    let mut camera = OrbitCamera::default();
    let initial_yaw = camera.yaw();
    let initial_pitch = camera.pitch();

    camera.begin_drag(Vec2::new(0.0, 0.0));
    camera.drag(Vec2::new(10.0, 0.0));
    camera.end_drag();

    assert_abs_diff_eq!(camera.yaw(), initial_yaw - 10.0 * DRAG_SENSITIVITY, epsilon = 1e-6);
    assert_eq!(camera.pitch(), initial_pitch);
    assert!(!camera.is_dragging());
}

#[test]
fn test_drag_without_begin_is_ignored() {
    let mut camera = OrbitCamera::default();
    let before = camera.clone();

    camera.drag(Vec2::new(250.0, -40.0));

    assert_eq!(camera, before);
}

#[test]
fn test_drag_tracks_last_pointer() {
    let mut camera = OrbitCamera::default();
    camera.begin_drag(Vec2::new(5.0, 5.0));
    camera.drag(Vec2::new(15.0, 5.0));
    camera.drag(Vec2::new(25.0, 5.0));

    assert_abs_diff_eq!(camera.yaw(), -20.0 * DRAG_SENSITIVITY, epsilon = 1e-6);
    assert_eq!(
        camera.drag_state(),
        DragState::Dragging {
            last_pointer: Vec2::new(25.0, 5.0)
        }
    );
}

#[test]
fn test_begin_drag_twice_overwrites_last_pointer() {
    let mut camera = OrbitCamera::default();
    camera.begin_drag(Vec2::new(0.0, 0.0));
    camera.begin_drag(Vec2::new(100.0, 0.0));
    camera.drag(Vec2::new(110.0, 0.0));

    assert_abs_diff_eq!(camera.yaw(), -10.0 * DRAG_SENSITIVITY, epsilon = 1e-6);
}

#[test]
fn test_end_drag_is_idempotent() {
    let mut once = OrbitCamera::default();
    once.begin_drag(Vec2::new(1.0, 2.0));
    once.end_drag();

    let mut twice = once.clone();
    twice.end_drag();

    assert_eq!(once, twice);
    assert_eq!(twice.drag_state(), DragState::Idle);
}

#[test]
fn test_extreme_drags_keep_pitch_inside_poles() {
    let mut camera = OrbitCamera::default();
    let max_pitch = camera.settings().max_pitch();

    camera.begin_drag(Vec2::ZERO);
    let mut y = 0.0;
    for step in 0..50 {
        y += if step % 2 == 0 { 1.0e5 } else { -3.0e5 };
        camera.drag(Vec2::new(0.0, y));

        assert!(camera.pitch() >= -max_pitch && camera.pitch() <= max_pitch);
        assert!(camera.pitch().abs() < FRAC_PI_2);
        assert!(camera.check_invariants().is_ok());
    }
}

#[test]
fn test_non_finite_drag_is_ignored() {
    let mut camera = OrbitCamera::default();
    camera.begin_drag(Vec2::ZERO);
    camera.drag(Vec2::new(10.0, 20.0));
    let (yaw, pitch) = (camera.yaw(), camera.pitch());

    for pointer in [
        Vec2::new(0.0, f32::NAN),
        Vec2::new(f32::NAN, 0.0),
        Vec2::new(f32::INFINITY, 20.0),
        Vec2::new(10.0, f32::NEG_INFINITY),
    ] {
        camera.drag(pointer);
        assert_eq!((camera.yaw(), camera.pitch()), (yaw, pitch));
        assert!(camera.check_invariants().is_ok());
    }

    // The last finite pointer stays the drag anchor.
    assert_eq!(camera.drag_state(), DragState::Dragging { last_pointer: Vec2::new(10.0, 20.0) });
    camera.drag(Vec2::new(10.0, 30.0));
    assert_abs_diff_eq!(camera.pitch(), pitch - 10.0 * DRAG_SENSITIVITY, epsilon = 1e-6);
    assert_finite(camera.view_matrix().to_cols_array_2d());
}

#[test]
fn test_non_finite_drag_start_is_ignored() {
    let mut camera = OrbitCamera::default();
    camera.handle_input(PointerInput::Down { x: f32::NAN, y: 0.0 });
    assert!(!camera.is_dragging());

    camera.handle_input(PointerInput::Move { x: 50.0, y: 50.0 });
    assert_eq!((camera.yaw(), camera.pitch()), (0.0, 0.0));
    assert!(camera.check_invariants().is_ok());
}

#[test]
fn test_with_orbit_keeps_current_value_for_non_finite_components() {
    let camera = OrbitCamera::default().with_orbit(f32::NAN, f32::INFINITY, f32::NAN);
    assert_eq!((camera.yaw(), camera.pitch(), camera.radius()), (0.0, 0.0, 3.0));
    assert!(camera.check_invariants().is_ok());
}

#[test]
fn test_zoom_clamps_to_min_radius() {
    let mut camera = OrbitCamera::default();
    camera.zoom(300.0);
    assert_eq!(camera.radius(), 1.0);
}

#[test]
fn test_zoom_clamps_to_max_radius() {
    let mut camera = OrbitCamera::default();
    camera.zoom(-1.0e6);
    assert_eq!(camera.radius(), 10.0);
}

#[test]
fn test_repeated_zoom_stays_in_range() {
    let mut camera = OrbitCamera::default();
    for delta in [120.0, -360.0, 45.0, 1.0e4, -7.5, -1.0e4, 0.0, 33.3] {
        camera.zoom(delta);
        assert!((1.0..=10.0).contains(&camera.radius()));
    }
}

#[test]
fn test_non_finite_zoom_is_ignored() {
    let mut camera = OrbitCamera::default();
    camera.zoom(30.0);
    let radius = camera.radius();
    for delta in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        camera.zoom(delta);
        assert_eq!(camera.radius(), radius);
        assert!(camera.check_invariants().is_ok());
    }
    assert_finite(camera.view_matrix().to_cols_array_2d());
}

#[test]
fn test_zoom_moves_eye_along_view_direction() {
    let mut camera = OrbitCamera::default().with_orbit(0.4, 0.2, 5.0);
    let before = camera.eye_position().normalize();
    camera.zoom(30.0);
    let after = camera.eye_position();

    assert_abs_diff_eq!(after.length(), 4.0, epsilon = 1e-5);
    assert!(after.normalize().abs_diff_eq(before, 1e-5));
}

#[test]
fn test_up_vector_is_unit_length_across_pitch_range() {
    let max_pitch = OrbitSettings::default().max_pitch();
    let steps = 200;
    for i in 0..=steps {
        let pitch = -max_pitch + 2.0 * max_pitch * i as f32 / steps as f32;
        for yaw in [0.0, 1.3, -2.7, 12.0] {
            let camera = OrbitCamera::default().with_orbit(yaw, pitch, 3.0);
            assert_abs_diff_eq!(camera.up_vector().length(), 1.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn test_up_vector_at_clamp_boundary() {
    for pitch in [FRAC_PI_2, -FRAC_PI_2, 10.0, -10.0] {
        let camera = OrbitCamera::default().with_orbit(0.0, pitch, 10.0);
        let up = camera.up_vector();
        assert!(up.is_finite());
        assert_abs_diff_eq!(up.length(), 1.0, epsilon = 1e-5);
        assert_finite(camera.view_matrix().to_cols_array_2d());
    }
}

#[test]
fn test_up_vector_is_finite_difference_of_one_degree() {
    let camera = OrbitCamera::default().with_orbit(0.0, 0.0, 3.0);
    let step = 1.0_f32.to_radians();
    // Stepping pitch back by one degree raises the eye along a chord of the orbit.
    let expected = Vec3::new(0.0, step.sin(), step.cos() - 1.0).normalize();
    assert!(camera.up_vector().abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_view_matrix_maps_target_in_front_of_eye() {
    let camera = OrbitCamera::default().with_orbit(0.8, -0.4, 6.0);
    let view = camera.view_matrix();

    let target_in_view = view.transform_point3(camera.target());
    assert_abs_diff_eq!(target_in_view.x, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(target_in_view.y, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(target_in_view.z, -6.0, epsilon = 1e-4);

    let eye_in_view = view.transform_point3(camera.eye_position());
    assert!(eye_in_view.abs_diff_eq(Vec3::ZERO, 1e-4));
}

#[test]
fn test_pointer_input_routes_to_orbit() {
    let mut camera = OrbitCamera::default();
    camera.handle_input(PointerInput::Down { x: 0.0, y: 0.0 });
    assert!(camera.is_dragging());

    camera.handle_input(PointerInput::Move { x: 0.0, y: 20.0 });
    assert_abs_diff_eq!(camera.pitch(), -20.0 * DRAG_SENSITIVITY, epsilon = 1e-6);

    camera.handle_input(PointerInput::Up);
    assert!(!camera.is_dragging());

    camera.handle_input(PointerInput::Wheel { delta_y: 30.0 });
    assert_abs_diff_eq!(camera.radius(), 2.0, epsilon = 1e-6);
}

#[test]
fn test_invalid_settings_rejected() {
    let inverted = OrbitSettings {
        min_radius: 5.0,
        max_radius: 2.0,
        ..OrbitSettings::default()
    };
    assert!(matches!(OrbitCamera::new(inverted), Err(ViewerError::OutOfRangeOrbit { .. })));

    let non_positive = OrbitSettings {
        min_radius: 0.0,
        radius: 0.0,
        ..OrbitSettings::default()
    };
    assert!(matches!(OrbitCamera::new(non_positive), Err(ViewerError::OutOfRangeOrbit { .. })));

    let outside = OrbitSettings {
        radius: 20.0,
        ..OrbitSettings::default()
    };
    assert!(OrbitCamera::new(outside).is_err());

    let no_margin = OrbitSettings {
        pitch_margin: f32::NAN,
        ..OrbitSettings::default()
    };
    assert!(matches!(
        OrbitCamera::new(no_margin),
        Err(ViewerError::OutOfRangeOrbit { pitch, radius }) if pitch == 0.0 && radius == 3.0
    ));
}

#[test]
fn test_with_orbit_clamps() {
    let camera = OrbitCamera::default().with_orbit(100.0, 4.0, 0.1);
    assert_eq!(camera.yaw(), 100.0);
    assert_eq!(camera.pitch(), camera.settings().max_pitch());
    assert_eq!(camera.radius(), 1.0);
}

#[test]
fn test_fixed_camera_ignores_input() {
    let mut camera = FixedCamera::looking_at(Vec3::new(2.0, 4.0, 4.0), Vec3::ZERO, Vec3::Y);
    let before = camera;

    camera.handle_input(PointerInput::Down { x: 0.0, y: 0.0 });
    camera.handle_input(PointerInput::Move { x: 50.0, y: 50.0 });
    camera.handle_input(PointerInput::Wheel { delta_y: 120.0 });

    assert_eq!(camera, before);
    assert_finite(camera.view_matrix().to_cols_array_2d());
}
