//! Input snapshot and collection
//!
//! Raw window events are folded into an [`InputCollector`]; once per frame the
//! collector hands out an immutable [`InputSnapshot`] that every controller
//! reads. Controllers turn the snapshot into [`ControlIntent`]s through their
//! [`ControlScheme`], so keyboard and touch input share one code path.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, Touch, TouchPhase};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A touch finger counts as holding still below this per-frame motion, in pixels
pub const STATIONARY_TOUCH_THRESHOLD: f32 = 0.5;

/// Keys whose state is packed into [`KeyStates`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedKey {
    ShiftLeft,
    ShiftRight,
    AltLeft,
    AltRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
}

impl TrackedKey {
    /// All tracked keys
    pub const ALL: [TrackedKey; 9] = [
        TrackedKey::ShiftLeft,
        TrackedKey::ShiftRight,
        TrackedKey::AltLeft,
        TrackedKey::AltRight,
        TrackedKey::ArrowUp,
        TrackedKey::ArrowDown,
        TrackedKey::ArrowLeft,
        TrackedKey::ArrowRight,
        TrackedKey::Space,
    ];

    /// Map a physical key code to a tracked key
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ShiftLeft => Some(Self::ShiftLeft),
            KeyCode::ShiftRight => Some(Self::ShiftRight),
            KeyCode::AltLeft => Some(Self::AltLeft),
            KeyCode::AltRight => Some(Self::AltRight),
            KeyCode::ArrowUp => Some(Self::ArrowUp),
            KeyCode::ArrowDown => Some(Self::ArrowDown),
            KeyCode::ArrowLeft => Some(Self::ArrowLeft),
            KeyCode::ArrowRight => Some(Self::ArrowRight),
            KeyCode::Space => Some(Self::Space),
            _ => None,
        }
    }

    fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Bitmask of tracked keys that are held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStates(u32);

impl KeyStates {
    /// Mark a key as held or released
    pub fn set(&mut self, key: TrackedKey, down: bool) {
        if down {
            self.0 |= key.bit();
        } else {
            self.0 &= !key.bit();
        }
    }

    /// Check if a key is held
    pub fn is_down(self, key: TrackedKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Raw bitmask
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Keyboard gesture, by precedence: shift, then space, then plain arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardGesture {
    None,
    /// Arrow keys without modifiers
    Arrows,
    /// Either shift key held
    ShiftHeld,
    /// Space held (and no shift)
    SpaceHeld,
}

/// Touch gesture classified from the active touch points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchGesture {
    None,
    /// One finger moving
    SingleSwipe,
    /// Two fingers, at least one of them holding still
    HoldAndSwipe,
    /// Two fingers, both moving
    Pinch,
}

/// An active touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Platform touch id
    pub id: u64,
    /// Screen position in pixels, y up
    pub position: Vec2,
    /// Motion accumulated during the current frame
    pub delta: Vec2,
}

/// Immutable capture of the input for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    axis: Vec2,
    touches: Vec<TouchPoint>,
    keys: KeyStates,
}

impl InputSnapshot {
    /// Create a snapshot from already collected data
    pub fn new(axis: Vec2, touches: Vec<TouchPoint>, keys: KeyStates) -> Self {
        Self { axis, touches, keys }
    }

    /// Axis input, each component in [-1, 1] (x right, y up/forward)
    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    /// Active touch points in the order they started
    pub fn touches(&self) -> &[TouchPoint] {
        &self.touches
    }

    /// Packed key states
    pub fn key_states(&self) -> KeyStates {
        self.keys
    }

    /// Check if a tracked key is held
    pub fn is_key_down(&self, key: TrackedKey) -> bool {
        self.keys.is_down(key)
    }

    /// Classify the keyboard state
    pub fn keyboard_gesture(&self) -> KeyboardGesture {
        let shift = self.is_key_down(TrackedKey::ShiftLeft) || self.is_key_down(TrackedKey::ShiftRight);
        let arrows = [
            TrackedKey::ArrowUp,
            TrackedKey::ArrowDown,
            TrackedKey::ArrowLeft,
            TrackedKey::ArrowRight,
        ]
        .into_iter()
        .any(|key| self.is_key_down(key));

        if shift {
            KeyboardGesture::ShiftHeld
        } else if self.is_key_down(TrackedKey::Space) {
            KeyboardGesture::SpaceHeld
        } else if arrows {
            KeyboardGesture::Arrows
        } else {
            KeyboardGesture::None
        }
    }

    /// Classify the touch state
    pub fn touch_gesture(&self) -> TouchGesture {
        match self.touches.as_slice() {
            [_] => TouchGesture::SingleSwipe,
            [first, second] => {
                let holding = first.delta.length() < STATIONARY_TOUCH_THRESHOLD
                    || second.delta.length() < STATIONARY_TOUCH_THRESHOLD;
                if holding {
                    TouchGesture::HoldAndSwipe
                } else {
                    TouchGesture::Pinch
                }
            }
            _ => TouchGesture::None,
        }
    }

    /// Swipe motion of a single finger, zero unless exactly one touch is active
    pub fn single_swipe_delta(&self, sensitivity: f32) -> Vec2 {
        match self.touches.as_slice() {
            [touch] => touch.delta * sensitivity,
            _ => Vec2::ZERO,
        }
    }

    /// Motion of the second finger while the first one holds
    pub fn hold_and_swipe_delta(&self, sensitivity: f32) -> Vec2 {
        match self.touches.as_slice() {
            [_, swipe] => swipe.delta * sensitivity,
            _ => Vec2::ZERO,
        }
    }

    /// Change of finger separation this frame, positive when spreading
    pub fn pinch_delta(&self, sensitivity: f32) -> f32 {
        match self.touches.as_slice() {
            [a, b] => {
                let previous = (a.position - a.delta).distance(b.position - b.delta);
                let current = a.position.distance(b.position);
                (current - previous) * sensitivity
            }
            _ => 0.0,
        }
    }
}

/// What a controller wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlIntent {
    /// Rotate by `delta * speed * dt`
    Rotate { delta: Vec2, speed: f32 },
    /// Move by `delta` in the controller's own frame at `speed`
    Move { delta: Vec2, speed: f32 },
    /// Zoom by `delta`
    Zoom { delta: f32 },
}

/// How a controller maps gestures onto intents
pub trait ControlScheme {
    /// Intent produced by the keyboard, if any
    fn keyboard_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent>;

    /// Intent produced by touch, if any
    fn touch_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent>;

    /// All intents for this frame, keyboard first
    fn intents(&self, snapshot: &InputSnapshot) -> Vec<ControlIntent> {
        self.keyboard_intent(snapshot)
            .into_iter()
            .chain(self.touch_intent(snapshot))
            .collect()
    }
}

/// Direction contributing to the axis input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum AxisDirection {
    Up,
    Down,
    Left,
    Right,
}

impl AxisDirection {
    fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ArrowUp | KeyCode::KeyW => Some(Self::Up),
            KeyCode::ArrowDown | KeyCode::KeyS => Some(Self::Down),
            KeyCode::ArrowLeft | KeyCode::KeyA => Some(Self::Left),
            KeyCode::ArrowRight | KeyCode::KeyD => Some(Self::Right),
            _ => None,
        }
    }
}

/// Folds raw window events into per-frame snapshots
#[derive(Debug, Default)]
pub struct InputCollector {
    keys: KeyStates,
    held_axes: HashSet<AxisDirection>,
    touches: Vec<TouchPoint>,
}

impl InputCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        let PhysicalKey::Code(key_code) = physical_key else {
            return;
        };
        let pressed = element_state == ElementState::Pressed;

        if let Some(key) = TrackedKey::from_key_code(key_code) {
            self.keys.set(key, pressed);
        }
        if let Some(direction) = AxisDirection::from_key_code(key_code) {
            if pressed {
                self.held_axes.insert(direction);
            } else {
                self.held_axes.remove(&direction);
            }
        }
    }

    /// Handle a touch event from the window
    pub fn handle_touch(&mut self, touch: &Touch) {
        let location = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        self.handle_touch_event(touch.id, touch.phase, location);
    }

    /// Handle a touch event given its parts; `location` is in window pixels, y down
    pub fn handle_touch_event(&mut self, id: u64, phase: TouchPhase, location: Vec2) {
        let position = Vec2::new(location.x, -location.y);
        match phase {
            TouchPhase::Started => {
                self.touches.retain(|touch| touch.id != id);
                self.touches.push(TouchPoint {
                    id,
                    position,
                    delta: Vec2::ZERO,
                });
            }
            TouchPhase::Moved => {
                if let Some(touch) = self.touches.iter_mut().find(|touch| touch.id == id) {
                    touch.delta += position - touch.position;
                    touch.position = position;
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|touch| touch.id != id);
            }
        }
    }

    /// Current axis input from the held direction keys
    pub fn axis(&self) -> Vec2 {
        let held = |direction: AxisDirection| f32::from(u8::from(self.held_axes.contains(&direction)));
        Vec2::new(
            held(AxisDirection::Right) - held(AxisDirection::Left),
            held(AxisDirection::Up) - held(AxisDirection::Down),
        )
    }

    /// Capture the current state
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::new(self.axis(), self.touches.clone(), self.keys)
    }

    /// Clear per-frame touch motion (call after the frame consumed its snapshot)
    pub fn end_frame(&mut self) {
        for touch in &mut self.touches {
            touch.delta = Vec2::ZERO;
        }
    }

    /// Drop all held keys and touches
    pub fn clear_all(&mut self) {
        self.keys = KeyStates::default();
        self.held_axes.clear();
        self.touches.clear();
    }
}
