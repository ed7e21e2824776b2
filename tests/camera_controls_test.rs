use instant::Duration;
use strut::camera::{Camera, OrbitController, Projection};
use strut::{Deg, Point3};

fn default_rig() -> (Camera, OrbitController) {
    let camera = Camera::new(Point3::new(0.0, 1.0, 4.0), Point3::new(0.0, 0.0, 0.0));
    let controller = OrbitController::from_view(camera.position, camera.target, 0.08, 8.0);
    (camera, controller)
}

#[test]
fn projection_tracks_resizes() {
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 1000.0);
    assert!((projection.aspect() - 800.0 / 600.0).abs() < 1e-6);
    projection.resize(1024, 768);
    assert!((projection.aspect() - 1024.0 / 768.0).abs() < 1e-6);
}

#[test]
fn controller_preserves_the_initial_pose() {
    let (mut camera, mut controller) = default_rig();
    // No input: updating must keep the camera where it started.
    controller.update(&mut camera, Duration::from_millis(16));
    assert!((camera.position.x - 0.0).abs() < 1e-4);
    assert!((camera.position.y - 1.0).abs() < 1e-4);
    assert!((camera.position.z - 4.0).abs() < 1e-4);
}

#[test]
fn drag_orbits_and_damping_brings_it_to_rest() {
    let (mut camera, mut controller) = default_rig();
    let start_yaw = controller.yaw();

    controller.handle_mouse(40.0, 0.0);
    controller.update(&mut camera, Duration::from_millis(16));
    let after_drag = controller.yaw();
    assert!(after_drag != start_yaw);

    // With no further input the yaw must settle.
    let mut last = after_drag;
    for _ in 0..500 {
        controller.update(&mut camera, Duration::from_millis(16));
        last = controller.yaw();
    }
    let settled = last;
    controller.update(&mut camera, Duration::from_millis(16));
    assert!((controller.yaw() - settled).abs() < 1e-4);

    // Distance to the target never drifts while orbiting.
    let offset = camera.position - camera.target;
    let distance = (offset.x * offset.x + offset.y * offset.y + offset.z * offset.z).sqrt();
    assert!((distance - controller.distance()).abs() < 1e-4);
}

#[test]
fn pitch_never_reaches_the_poles() {
    let (mut camera, mut controller) = default_rig();
    for _ in 0..100 {
        controller.handle_mouse(0.0, 500.0);
        controller.update(&mut camera, Duration::from_millis(16));
    }
    assert!(controller.pitch() < std::f32::consts::FRAC_PI_2);
    for _ in 0..200 {
        controller.handle_mouse(0.0, -500.0);
        controller.update(&mut camera, Duration::from_millis(16));
    }
    assert!(controller.pitch() > -std::f32::consts::FRAC_PI_2);
}

#[test]
fn zoom_stays_within_its_limits() {
    let (mut camera, mut controller) = default_rig();
    let start = controller.distance();
    for _ in 0..1000 {
        controller.handle_window_events(&zoom_event(-10.0));
        controller.update(&mut camera, Duration::from_millis(16));
    }
    assert!(controller.distance() > start);
    assert!(controller.distance() <= 100.0);
}

fn zoom_event(lines: f32) -> strut::WindowEvent {
    strut::WindowEvent::MouseWheel {
        device_id: winit::event::DeviceId::dummy(),
        delta: winit::event::MouseScrollDelta::LineDelta(0.0, lines),
        phase: winit::event::TouchPhase::Moved,
    }
}
