//! Collision tests between circles, points, line segments and the arena rectangle.

use super::Vector2;
use crate::constants::SEGMENT_TOLERANCE;

/// Whether two circles overlap. Circles who only touch do not overlap.
#[inline]
pub fn circle_overlap(c1: &Vector2, r1: f64, c2: &Vector2, r2: f64) -> bool {
    c2.distance(c1) < r1 + r2
}

/// Whether `point` lies inside or on the edge of a circle
#[inline]
pub fn point_in_circle(center: &Vector2, radius: f64, point: &Vector2) -> bool {
    point.distance(center) <= radius
}

/// Whether the segment `l1`..`l2` intersects a circle.
///
/// Either endpoint inside the circle is a hit. Otherwise the circle's center is projected onto
/// the line through both endpoints, and the projection only counts if it lies on the segment
/// within [SEGMENT_TOLERANCE].
pub fn segment_circle_intersect(center: &Vector2, radius: f64, l1: &Vector2, l2: &Vector2) -> bool {
    if point_in_circle(center, radius, l1) || point_in_circle(center, radius, l2) {
        return true;
    }

    let length = l1.distance(l2);
    if length <= f64::EPSILON {
        return false;
    }

    let delta = *l2 - *l1;
    let dot = ((center.x - l1.x) * delta.x + (center.y - l1.y) * delta.y) / length.powi(2);
    let closest = *l1 + delta * dot;

    on_segment(l1, l2, &closest, length) && closest.distance(center) <= radius
}

#[inline]
fn on_segment(l1: &Vector2, l2: &Vector2, p: &Vector2, length: f64) -> bool {
    let d = p.distance(l1) + p.distance(l2);
    d >= length - SEGMENT_TOLERANCE && d <= length + SEGMENT_TOLERANCE
}

/// Whether `p` lies in the half-open rectangle `[x0, x1) × [y0, y1)`
#[inline]
pub fn point_in_bounds(p: &Vector2, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
    p.x >= x0 && p.x < x1 && p.y >= y0 && p.y < y1
}
