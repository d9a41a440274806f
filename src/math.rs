//! Axis-aligned rectangles stored as (centre, size)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel space (+y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    /// (width, height)
    pub size: Vec2,
}

impl Rect {
    pub const fn from_center(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        0.5 * self.size
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_size()
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_size()
    }

    /// Corners in winding order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ]
    }

    /// Strict overlap test (shared edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_follow_winding_order() {
        let rect = Rect::from_center(Vec2::new(50.0, 360.0), Vec2::new(20.0, 50.0));
        let [tl, tr, br, bl] = rect.corners();
        assert_eq!(tl, Vec2::new(40.0, 335.0));
        assert_eq!(tr, Vec2::new(60.0, 335.0));
        assert_eq!(br, Vec2::new(60.0, 385.0));
        assert_eq!(bl, Vec2::new(40.0, 385.0));
    }

    #[test]
    fn test_intersects() {
        let a = Rect::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let overlapping = Rect::from_center(Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        let touching = Rect::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_lerp() {
        let a = Vec2::new(0.0, 10.0);
        let b = Vec2::new(10.0, 30.0);
        assert_eq!(lerp_vec2(a, b, 0.0), a);
        assert_eq!(lerp_vec2(a, b, 1.0), b);
        assert_eq!(lerp_vec2(a, b, 0.5), Vec2::new(5.0, 20.0));
    }
}
