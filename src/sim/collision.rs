//! Collision detection for round-ish entities
//!
//! Everything on the field collides as a disc: two entities overlap when
//! their center distance is less than the sum of their half-extents. The
//! player's square hull uses its half-width, which matches how the original
//! canvas sprites read on screen.

use glam::Vec2;

/// Center-distance overlap test
#[inline]
pub fn entities_overlap(a: Vec2, half_a: f32, b: Vec2, half_b: f32) -> bool {
    a.distance(b) < half_a + half_b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_centers_collide() {
        assert!(entities_overlap(
            Vec2::new(100.0, 100.0),
            20.0,
            Vec2::new(105.0, 100.0),
            6.0
        ));
    }

    #[test]
    fn touching_at_exact_sum_is_not_overlap() {
        // Strict less-than: centers exactly half_a + half_b apart miss
        assert!(!entities_overlap(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(16.0, 0.0),
            6.0
        ));
    }

    #[test]
    fn distant_entities_miss() {
        assert!(!entities_overlap(
            Vec2::new(0.0, 0.0),
            20.0,
            Vec2::new(100.0, 100.0),
            12.5
        ));
    }

    #[test]
    fn diagonal_distance_is_euclidean() {
        // 3-4-5 triangle: distance 5, halves sum 5.1 -> overlap
        assert!(entities_overlap(
            Vec2::new(0.0, 0.0),
            2.6,
            Vec2::new(3.0, 4.0),
            2.5
        ));
        // halves sum 4.9 -> miss
        assert!(!entities_overlap(
            Vec2::new(0.0, 0.0),
            2.4,
            Vec2::new(3.0, 4.0),
            2.5
        ));
    }
}
