//! Free-flying camera with collision-checked movement

use glam::{Quat, Vec2, Vec3};
use vantage_core::Transform;
use vantage_physics::{BodyHandle, PhysicsBackend, SphereCollisionDetector};

use crate::input::{ControlIntent, ControlScheme, InputSnapshot, KeyboardGesture, TouchGesture};

use super::FreeCameraConfig;

/// Free camera controller
pub struct FreeCamera {
    /// Configuration
    pub config: FreeCameraConfig,
    /// Collision-checked mover for the camera body
    detector: SphereCollisionDetector,
    /// Heading in degrees within [0, 360), positive turns right
    yaw: f32,
    /// Pitch in degrees, positive looks down
    pitch: f32,
    /// Field of view in degrees
    fov: f32,
}

impl FreeCamera {
    /// Create a free camera driving `body`.
    ///
    /// Returns `None` if the body does not exist in the backend.
    pub fn new(config: FreeCameraConfig, body: BodyHandle, backend: &impl PhysicsBackend) -> Option<Self> {
        let detector = SphereCollisionDetector::new(config.collision_radius, body, backend)?;
        let fov = config.initial_fov.clamp(config.fov_min, config.fov_max);
        Some(Self {
            config,
            detector,
            yaw: 0.0,
            pitch: 0.0,
            fov,
        })
    }

    /// Heading in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// The collision detector moving the camera body
    pub fn detector(&self) -> &SphereCollisionDetector {
        &self.detector
    }

    /// Get the rotation quaternion (yaw around world up, then pitch, no roll)
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians()) * Quat::from_rotation_x(-self.pitch.to_radians())
    }

    /// Camera pose, if the camera body exists
    pub fn transform(&self, backend: &impl PhysicsBackend) -> Option<Transform> {
        backend
            .body_position(self.detector.body())
            .map(|position| Transform::from_position_rotation(position, self.rotation()))
    }

    /// Turn by `delta * speed * dt` degrees; up input raises the view
    pub fn rotate(&mut self, delta: Vec2, speed: f32, dt: f32) {
        let yaw = (self.yaw + delta.x * speed * dt).rem_euclid(360.0);
        self.yaw = if yaw >= 360.0 { 0.0 } else { yaw };
        self.pitch = (self.pitch - delta.y * speed * dt).clamp(self.config.pitch_min, self.config.pitch_max);
    }

    /// Move along `delta` in the camera's own frame (x right, y forward).
    ///
    /// Returns `false` if the move was blocked.
    pub fn translate(&mut self, backend: &mut impl PhysicsBackend, delta: Vec2) -> bool {
        let movement = self.rotation() * Vec3::new(delta.x, 0.0, -delta.y);
        self.detector
            .try_move(backend, movement, self.config.move_speed, self.config.move_timestep)
    }

    /// Narrow the field of view by `delta` degrees
    pub fn zoom(&mut self, delta: f32) {
        self.fov = (self.fov - delta).clamp(self.config.fov_min, self.config.fov_max);
    }

    /// Run one frame of input
    pub fn update(&mut self, backend: &mut impl PhysicsBackend, snapshot: &InputSnapshot, dt: f32) {
        for intent in self.intents(snapshot) {
            match intent {
                ControlIntent::Rotate { delta, speed } => self.rotate(delta, speed, dt),
                ControlIntent::Move { delta, .. } => {
                    self.translate(backend, delta);
                }
                ControlIntent::Zoom { delta } => self.zoom(delta),
            }
        }
    }
}

impl ControlScheme for FreeCamera {
    fn keyboard_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent> {
        let axis = snapshot.axis();
        match snapshot.keyboard_gesture() {
            KeyboardGesture::Arrows => Some(ControlIntent::Rotate {
                delta: axis * self.config.move_speed,
                speed: self.config.rotation_speed,
            }),
            KeyboardGesture::ShiftHeld => Some(ControlIntent::Move {
                delta: axis * self.config.move_speed * self.config.sprint_multiplier,
                speed: self.config.move_speed,
            }),
            KeyboardGesture::SpaceHeld => Some(ControlIntent::Zoom {
                delta: axis.y * self.config.keyboard_zoom_sensitivity,
            }),
            KeyboardGesture::None => None,
        }
    }

    fn touch_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent> {
        match snapshot.touch_gesture() {
            TouchGesture::SingleSwipe => Some(ControlIntent::Rotate {
                delta: snapshot.single_swipe_delta(self.config.touch_rotation_sensitivity),
                speed: self.config.rotation_speed,
            }),
            TouchGesture::HoldAndSwipe => Some(ControlIntent::Move {
                delta: snapshot.hold_and_swipe_delta(self.config.touch_move_sensitivity),
                speed: self.config.move_speed,
            }),
            TouchGesture::Pinch => Some(ControlIntent::Zoom {
                delta: snapshot.pinch_delta(self.config.touch_zoom_sensitivity),
            }),
            TouchGesture::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use vantage_physics::PhysicsWorld;

    use super::*;
    use crate::input::{KeyStates, TouchPoint, TrackedKey};

    fn setup() -> (PhysicsWorld, FreeCamera) {
        let mut world = PhysicsWorld::new();
        let config = FreeCameraConfig::default();
        let body = world.spawn_sphere(Vec3::ZERO, config.collision_radius);
        world.update_query_pipeline();
        let camera = FreeCamera::new(config, body, &world).unwrap();
        (world, camera)
    }

    #[test]
    fn test_yaw_turns_right() {
        let (_world, mut camera) = setup();
        camera.rotate(Vec2::new(90.0, 0.0), 1.0, 1.0);

        let forward = camera.rotation() * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_yaw_wraps() {
        let (_world, mut camera) = setup();

        camera.rotate(Vec2::new(400.0, 0.0), 1.0, 1.0);
        assert!((camera.yaw() - 40.0).abs() < 1e-4);

        camera.rotate(Vec2::new(-70.0, 0.0), 1.0, 1.0);
        assert!((camera.yaw() - 330.0).abs() < 1e-4);

        for _ in 0..10_000 {
            camera.rotate(Vec2::new(7.3, 0.0), 20.0, 0.5);
            assert!((0.0..360.0).contains(&camera.yaw()));
        }
    }

    #[test]
    fn test_pitch_clamping() {
        let (_world, mut camera) = setup();
        camera.rotate(Vec2::new(0.0, 1.0), 20.0, 1.0);
        assert!((camera.pitch() + 20.0).abs() < 1e-4);
        assert!((camera.rotation() * Vec3::NEG_Z).y > 0.0);

        camera.rotate(Vec2::new(0.0, 100.0), 20.0, 1.0);
        assert_eq!(camera.pitch(), camera.config.pitch_min);

        camera.rotate(Vec2::new(0.0, -100.0), 20.0, 1.0);
        assert_eq!(camera.pitch(), camera.config.pitch_max);
    }

    #[test]
    fn test_zoom_clamping() {
        let (_world, mut camera) = setup();
        assert_eq!(camera.fov(), 60.0);

        camera.zoom(10.0);
        assert_eq!(camera.fov(), 50.0);
        camera.zoom(100.0);
        assert_eq!(camera.fov(), camera.config.fov_min);
        camera.zoom(-500.0);
        assert_eq!(camera.fov(), camera.config.fov_max);
    }

    #[test]
    fn test_translate_forward_and_blocked() {
        let (mut world, mut camera) = setup();
        let body = camera.detector().body();

        assert!(camera.translate(&mut world, Vec2::new(0.0, 1.0)));
        let expected = Vec3::new(0.0, 0.0, -camera.config.move_speed * camera.config.move_timestep);
        assert!(world.body_position(body).unwrap().abs_diff_eq(expected, 1e-5));

        world.create_static_box(Vec3::splat(0.5), expected + Vec3::new(0.0, 0.0, -2.5));
        world.update_query_pipeline();
        assert!(!camera.translate(&mut world, Vec2::new(0.0, 1.0)));
        assert!(world.body_position(body).unwrap().abs_diff_eq(expected, 1e-5));
        assert_eq!(camera.detector().last_valid_position(), expected);
    }

    #[test]
    fn test_intent_mapping() {
        let (_world, camera) = setup();

        let mut keys = KeyStates::default();
        keys.set(TrackedKey::ShiftLeft, true);
        let shift = InputSnapshot::new(Vec2::Y, Vec::new(), keys);
        assert!(matches!(
            camera.keyboard_intent(&shift),
            Some(ControlIntent::Move { delta, .. }) if delta == Vec2::new(0.0, 30.0)
        ));

        let mut keys = KeyStates::default();
        keys.set(TrackedKey::Space, true);
        let space = InputSnapshot::new(Vec2::new(0.0, -1.0), Vec::new(), keys);
        assert_eq!(camera.keyboard_intent(&space), Some(ControlIntent::Zoom { delta: -4.0 }));

        let pinch = InputSnapshot::new(
            Vec2::ZERO,
            vec![
                TouchPoint { id: 1, position: Vec2::new(-10.0, 0.0), delta: Vec2::new(-5.0, 0.0) },
                TouchPoint { id: 2, position: Vec2::new(10.0, 0.0), delta: Vec2::new(5.0, 0.0) },
            ],
            KeyStates::default(),
        );
        match camera.touch_intent(&pinch) {
            Some(ControlIntent::Zoom { delta }) => assert!((delta - 0.1).abs() < 1e-5),
            other => panic!("expected zoom, got {other:?}"),
        }
    }

    #[test]
    fn test_update_zooms_with_space() {
        let (mut world, mut camera) = setup();
        let mut keys = KeyStates::default();
        keys.set(TrackedKey::Space, true);
        let snapshot = InputSnapshot::new(Vec2::Y, Vec::new(), keys);

        camera.update(&mut world, &snapshot, 0.016);
        assert_eq!(camera.fov(), 56.0);
    }
}
