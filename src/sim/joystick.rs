//! On-screen virtual joystick input mapper
//!
//! Translates raw touch coordinates into a normalized direction vector.
//! The tricky part is multi-touch: the joystick must keep following the
//! contact that started on its base and ignore any other fingers (the boost
//! button is usually held at the same time).

use glam::Vec2;

use crate::consts::JOYSTICK_MAX_RADIUS;

/// Virtual joystick state
///
/// Tracks a single contact by identifier and exposes a direction vector with
/// magnitude <= 1. The vector snaps back to zero the moment the tracked
/// contact is released - no decay.
#[derive(Debug, Clone)]
pub struct VirtualJoystick {
    /// Center of the joystick base in screen coordinates
    base: Vec2,
    /// Maximum knob displacement in pixels
    max_radius: f32,
    /// Identifier of the contact being tracked, if any
    contact: Option<i32>,
    /// Current normalized output
    vector: Vec2,
}

impl VirtualJoystick {
    pub fn new(base: Vec2) -> Self {
        Self {
            base,
            max_radius: JOYSTICK_MAX_RADIUS,
            contact: None,
            vector: Vec2::ZERO,
        }
    }

    #[cfg(test)]
    fn with_radius(base: Vec2, max_radius: f32) -> Self {
        Self {
            base,
            max_radius,
            contact: None,
            vector: Vec2::ZERO,
        }
    }

    /// Move the base center (layout change or window resize)
    pub fn rebase(&mut self, base: Vec2) {
        self.base = base;
    }

    /// Whether a contact is currently being tracked
    pub fn is_active(&self) -> bool {
        self.contact.is_some()
    }

    /// Current direction vector, magnitude <= 1
    pub fn vector(&self) -> Vec2 {
        self.vector
    }

    /// Knob offset from the base center in pixels (for drawing the knob)
    pub fn knob_offset(&self) -> Vec2 {
        self.vector * self.max_radius
    }

    /// A contact touched down on the joystick base
    ///
    /// First contact wins: if another contact is already tracked, this one
    /// is ignored.
    pub fn contact_down(&mut self, id: i32, pos: Vec2) {
        if self.contact.is_some() {
            return;
        }
        self.contact = Some(id);
        self.vector = self.map(pos);
    }

    /// A contact moved; only the tracked contact updates the vector
    pub fn contact_move(&mut self, id: i32, pos: Vec2) {
        if self.contact == Some(id) {
            self.vector = self.map(pos);
        }
    }

    /// A contact lifted; releasing the tracked contact resets instantly
    pub fn contact_up(&mut self, id: i32) {
        if self.contact == Some(id) {
            self.contact = None;
            self.vector = Vec2::ZERO;
        }
    }

    /// Map an absolute position to the normalized direction vector
    ///
    /// `|v| = min(distance, R) / R` along the raw displacement; zero
    /// displacement maps to zero (no NaN from normalizing a zero vector).
    fn map(&self, pos: Vec2) -> Vec2 {
        let delta = pos - self.base;
        let distance = delta.length();
        if distance == 0.0 {
            return Vec2::ZERO;
        }
        let limited = distance.min(self.max_radius);
        (delta / distance) * (limited / self.max_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_displacement_maps_to_zero() {
        let mut js = VirtualJoystick::with_radius(Vec2::new(100.0, 100.0), 40.0);
        js.contact_down(0, Vec2::new(100.0, 100.0));
        assert_eq!(js.vector(), Vec2::ZERO);
    }

    #[test]
    fn displacement_within_radius_scales_linearly() {
        let mut js = VirtualJoystick::with_radius(Vec2::new(100.0, 100.0), 40.0);
        js.contact_down(0, Vec2::new(120.0, 100.0));
        let v = js.vector();
        assert!((v.x - 0.5).abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn displacement_beyond_radius_clamps_to_unit() {
        let mut js = VirtualJoystick::with_radius(Vec2::new(100.0, 100.0), 40.0);
        js.contact_down(0, Vec2::new(100.0, 500.0));
        let v = js.vector();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(v.y > 0.0);
    }

    #[test]
    fn release_resets_instantly() {
        let mut js = VirtualJoystick::with_radius(Vec2::new(0.0, 0.0), 40.0);
        js.contact_down(3, Vec2::new(30.0, 0.0));
        assert!(js.vector().length() > 0.0);
        js.contact_up(3);
        assert_eq!(js.vector(), Vec2::ZERO);
        assert!(!js.is_active());
    }

    #[test]
    fn unrelated_contacts_are_ignored() {
        let mut js = VirtualJoystick::with_radius(Vec2::new(0.0, 0.0), 40.0);
        js.contact_down(1, Vec2::new(20.0, 0.0));
        let tracked = js.vector();

        // Second finger lands on the base: ignored
        js.contact_down(2, Vec2::new(0.0, 40.0));
        assert_eq!(js.vector(), tracked);

        // Moves and releases of the other finger: ignored
        js.contact_move(2, Vec2::new(0.0, -40.0));
        assert_eq!(js.vector(), tracked);
        js.contact_up(2);
        assert!(js.is_active());

        // The tracked finger still works
        js.contact_move(1, Vec2::new(40.0, 0.0));
        assert!((js.vector().x - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn magnitude_never_exceeds_one(
            bx in -2000.0f32..2000.0,
            by in -2000.0f32..2000.0,
            px in -2000.0f32..2000.0,
            py in -2000.0f32..2000.0,
        ) {
            let mut js = VirtualJoystick::with_radius(Vec2::new(bx, by), 40.0);
            js.contact_down(0, Vec2::new(px, py));
            let v = js.vector();
            prop_assert!(v.length() <= 1.0 + 1e-5);
            prop_assert!(v.x.is_finite() && v.y.is_finite());
        }

        #[test]
        fn magnitude_is_zero_only_at_origin(
            dx in -500.0f32..500.0,
            dy in -500.0f32..500.0,
        ) {
            let base = Vec2::new(100.0, 100.0);
            let mut js = VirtualJoystick::with_radius(base, 40.0);
            js.contact_down(0, base + Vec2::new(dx, dy));
            let zero_displacement = dx == 0.0 && dy == 0.0;
            prop_assert_eq!(js.vector() == Vec2::ZERO, zero_displacement);
        }
    }
}
