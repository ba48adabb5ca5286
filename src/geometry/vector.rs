use core::ops::{Add, AddAssign, Mul, Sub};
use serde::{Deserialize, Serialize};

/// A mutable point or direction in world space.
///
/// Mutating operations return `&mut Self` so they may be chained, the way entities integrate
/// their motion: `velocity.offset(acceleration).limit(max)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0., y: 0. };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `rad`
    #[inline]
    pub fn from_angle(rad: f64) -> Self {
        Self::new(rad.cos(), rad.sin())
    }

    #[inline]
    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    #[inline]
    pub fn offset(&mut self, other: Self) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    #[inline]
    pub fn scale(&mut self, scalar: f64) -> &mut Self {
        self.x *= scalar;
        self.y *= scalar;
        self
    }

    /// Scale to unit length. The zero vector has no direction, and normalises to NaN.
    #[inline]
    pub fn normalise(&mut self) -> &mut Self {
        let mag = self.length();
        self.x /= mag;
        self.y /= mag;
        self
    }

    /// The unit vector along self, or None if self has no usable direction
    pub fn try_normalise(self) -> Option<Self> {
        let mag = self.length();
        (mag.is_finite() && mag > f64::EPSILON).then(|| Self::new(self.x / mag, self.y / mag))
    }

    /// Clamp the magnitude to at most `max`, keeping the direction
    pub fn limit(&mut self, max: f64) -> &mut Self {
        let len_sq = self.length_squared();
        if len_sq > max * max {
            let factor = max / len_sq.sqrt();
            self.scale(factor);
        }
        self
    }

    /// Toroidal wrap. A coordinate leaving one side reappears on the opposite edge.
    pub fn wrap(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        if self.x < min_x {
            self.x = max_x;
        } else if self.x > max_x {
            self.x = min_x;
        }

        if self.y < min_y {
            self.y = max_y;
        } else if self.y > max_y {
            self.y = min_y;
        }
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (other.x - self.x).powi(2) + (other.y - self.y).powi(2)
    }

    #[inline]
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Rotate by `rad` about the origin
    pub fn rotated(self, rad: f64) -> Self {
        let (sin, cos) = rad.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.offset(rhs);
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}
