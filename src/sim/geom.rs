//! Axis-aligned geometry and bounded random draws
//!
//! World space: origin at the bottom-left of the screen, y pointing up.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Closest point of the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
    }

    /// Whether a circle touches the box, counting gaps up to `slop` as touching
    pub fn touches_circle(&self, center: Vec2, radius: f32, slop: f32) -> bool {
        let d = center - self.closest_point(center);
        d.length_squared() <= (radius + slop) * (radius + slop)
    }

    /// Minimal translation that moves a penetrating circle out of the box
    ///
    /// Returns `None` when the circle does not penetrate.
    pub fn circle_push_out(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        let closest = self.closest_point(center);
        let d = center - closest;
        let dist_sq = d.length_squared();

        if dist_sq > 0.0 {
            // Center outside the box: push along the separating direction
            let dist = dist_sq.sqrt();
            if dist >= radius {
                return None;
            }
            return Some(d / dist * (radius - dist));
        }

        // Center inside the box: leave through the nearest face
        let to_left = center.x - self.min.x + radius;
        let to_right = self.max.x - center.x + radius;
        let to_bottom = center.y - self.min.y + radius;
        let to_top = self.max.y - center.y + radius;

        let min = to_left.min(to_right).min(to_bottom).min(to_top);
        let push = if min == to_top {
            Vec2::new(0.0, to_top)
        } else if min == to_bottom {
            Vec2::new(0.0, -to_bottom)
        } else if min == to_left {
            Vec2::new(-to_left, 0.0)
        } else {
            Vec2::new(to_right, 0.0)
        };
        Some(push)
    }
}

/// Uniform draw from `[center - range/2, center + range/2]`
pub fn uniform_in_band<R: Rng>(rng: &mut R, center: f32, range: f32) -> f32 {
    let half = range.abs() / 2.0;
    if half == 0.0 {
        return center;
    }
    rng.random_range(center - half..=center + half)
}

/// Independent uniform draws on both axes around `center`
pub fn uniform_in_box<R: Rng>(rng: &mut R, center: Vec2, range: Vec2) -> Vec2 {
    let x = uniform_in_band(rng, center.x, range.x);
    let y = uniform_in_band(rng, center.y, range.y);
    Vec2::new(x, y)
}
