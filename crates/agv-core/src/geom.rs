//! Planar geometry in abstract pixel units.
//!
//! The warehouse floor is a flat plane, so all spatial math is plain
//! Euclidean `f64`.  Headings follow `atan2` convention: radians, measured
//! from the positive x axis, positive toward positive y.

/// A position on the warehouse floor, in pixel units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation from `self` toward `other` by fraction `t`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Heading in radians of the vector from `self` to `other`.
    #[inline]
    pub fn heading_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// The point reached by advancing `dist` from `self` along `heading`.
    #[inline]
    pub fn advance(self, heading: f64, dist: f64) -> Point {
        Point {
            x: self.x + heading.cos() * dist,
            y: self.y + heading.sin() * dist,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Normalize an angle difference into `(-π, π]`.
///
/// Used by the front-sensor cone test: two headings compare as "within ±π/2"
/// when the normalized difference has absolute value below π/2.
#[inline]
pub fn normalize_angle(mut a: f64) -> f64 {
    use std::f64::consts::PI;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Convert a heading in radians to degrees (vehicle orientation unit).
#[inline]
pub fn to_degrees(rad: f64) -> f64 {
    rad.to_degrees()
}
