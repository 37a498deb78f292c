//! Cube-coordinate hex math.
//!
//! A `Hex` is a point in the three-axis `(q, r, s)` system with the
//! invariant `q + r + s == 0`. Only `q` and `r` are stored on the wire;
//! `s` is always derived, so a deserialized hex can never break the
//! invariant.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A hex cell addressed in cube coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Hex {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

/// The six neighbor directions, counter-clockwise starting at +q.
pub const DIRECTIONS: [Hex; 6] = [
    Hex { q: 1, r: 0, s: -1 },
    Hex { q: 1, r: -1, s: 0 },
    Hex { q: 0, r: -1, s: 1 },
    Hex { q: -1, r: 0, s: 1 },
    Hex { q: -1, r: 1, s: 0 },
    Hex { q: 0, r: 1, s: -1 },
];

/// The six diagonal offsets (two steps away, between two directions).
pub const DIAGONALS: [Hex; 6] = [
    Hex { q: 2, r: -1, s: -1 },
    Hex { q: 1, r: -2, s: 1 },
    Hex { q: -1, r: -1, s: 2 },
    Hex { q: -2, r: 1, s: 1 },
    Hex { q: -1, r: 2, s: -1 },
    Hex { q: 1, r: 1, s: -2 },
];

impl Hex {
    pub const ORIGIN: Self = Self { q: 0, r: 0, s: 0 };

    /// Axial constructor; `s` is derived.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Full cube constructor. Returns `None` if `q + r + s != 0`.
    pub fn try_new(q: i32, r: i32, s: i32) -> Option<Self> {
        (q + r + s == 0).then_some(Self { q, r, s })
    }

    pub fn scale(self, k: i32) -> Self {
        Self {
            q: self.q * k,
            r: self.r * k,
            s: self.s * k,
        }
    }

    /// Rotate 60° counter-clockwise around the origin.
    pub fn rotate_left(self) -> Self {
        Self {
            q: -self.s,
            r: -self.q,
            s: -self.r,
        }
    }

    /// Rotate 60° clockwise around the origin.
    pub fn rotate_right(self) -> Self {
        Self {
            q: -self.r,
            r: -self.s,
            s: -self.q,
        }
    }

    /// Unit vector for a direction index. Indices wrap modulo 6.
    pub fn direction(index: i32) -> Self {
        DIRECTIONS[index.rem_euclid(6) as usize]
    }

    pub fn neighbor(self, direction: i32) -> Self {
        self + Self::direction(direction)
    }

    pub fn neighbors(self) -> [Hex; 6] {
        DIRECTIONS.map(|d| self + d)
    }

    pub fn diagonal_neighbor(self, index: i32) -> Self {
        self + DIAGONALS[index.rem_euclid(6) as usize]
    }

    /// Distance from the origin in hex steps.
    pub fn length(self) -> i32 {
        (self.q.abs() + self.r.abs() + self.s.abs()) / 2
    }

    pub fn distance(self, other: Self) -> i32 {
        (self - other).length()
    }

    /// Hexes on the straight line from `self` to `other`, both ends included.
    pub fn line_to(self, other: Self) -> Vec<Hex> {
        let n = self.distance(other);
        // Nudge both ends off the exact edges so ties round the same way.
        let a = FractionalHex::new(
            self.q as f64 + 1e-6,
            self.r as f64 + 1e-6,
            self.s as f64 - 2e-6,
        );
        let b = FractionalHex::new(
            other.q as f64 + 1e-6,
            other.r as f64 + 1e-6,
            other.s as f64 - 2e-6,
        );
        let step = 1.0 / n.max(1) as f64;
        (0..=n).map(|i| a.lerp(b, step * i as f64).round()).collect()
    }

    /// Every hex within `radius` steps, including the center.
    pub fn range(self, radius: i32) -> Vec<Hex> {
        let radius = radius.max(0);
        let mut out = Vec::with_capacity((3 * radius * (radius + 1) + 1) as usize);
        for dq in -radius..=radius {
            let lo = (-radius).max(-dq - radius);
            let hi = radius.min(-dq + radius);
            for dr in lo..=hi {
                out.push(self + Hex::new(dq, dr));
            }
        }
        out
    }

    /// Hexes exactly `radius` steps away. Radius 0 is the center alone.
    pub fn ring(self, radius: i32) -> Vec<Hex> {
        if radius <= 0 {
            return vec![self];
        }
        let mut out = Vec::with_capacity(6 * radius as usize);
        let mut hex = self + Self::direction(4).scale(radius);
        for side in 0..6 {
            for _ in 0..radius {
                out.push(hex);
                hex = hex.neighbor(side);
            }
        }
        out
    }

    /// Center followed by each ring out to `radius`.
    pub fn spiral(self, radius: i32) -> Vec<Hex> {
        let mut out = vec![self];
        for k in 1..=radius {
            out.extend(self.ring(k));
        }
        out
    }
}

impl Add for Hex {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            q: self.q + other.q,
            r: self.r + other.r,
            s: self.s + other.s,
        }
    }
}

impl Sub for Hex {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            q: self.q - other.q,
            r: self.r - other.r,
            s: self.s - other.s,
        }
    }
}

impl Mul<i32> for Hex {
    type Output = Self;
    fn mul(self, k: i32) -> Self {
        self.scale(k)
    }
}

impl Neg for Hex {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            q: -self.q,
            r: -self.r,
            s: -self.s,
        }
    }
}

impl From<(i32, i32)> for Hex {
    fn from((q, r): (i32, i32)) -> Self {
        Self::new(q, r)
    }
}

impl From<Hex> for (i32, i32) {
    fn from(hex: Hex) -> Self {
        (hex.q, hex.r)
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

/// A hex position with fractional components, e.g. the result of a pixel lookup.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FractionalHex {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl FractionalHex {
    pub fn new(q: f64, r: f64, s: f64) -> Self {
        Self { q, r, s }
    }

    /// Round to the nearest hex, keeping `q + r + s == 0`.
    pub fn round(self) -> Hex {
        let mut qi = self.q.round();
        let mut ri = self.r.round();
        let mut si = self.s.round();
        let dq = (qi - self.q).abs();
        let dr = (ri - self.r).abs();
        let ds = (si - self.s).abs();
        // Recompute the component that drifted furthest.
        if dq > dr && dq > ds {
            qi = -ri - si;
        } else if dr > ds {
            ri = -qi - si;
        } else {
            si = -qi - ri;
        }
        Hex {
            q: qi as i32,
            r: ri as i32,
            s: si as i32,
        }
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            q: self.q * (1.0 - t) + other.q * t,
            r: self.r * (1.0 - t) + other.r * t,
            s: self.s * (1.0 - t) + other.s * t,
        }
    }
}

impl From<Hex> for FractionalHex {
    fn from(hex: Hex) -> Self {
        Self::new(hex.q as f64, hex.r as f64, hex.s as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant() {
        assert!(Hex::try_new(1, -1, 0).is_some());
        assert!(Hex::try_new(1, 1, 1).is_none());
        let h = Hex::new(3, -7);
        assert_eq!(h.q + h.r + h.s, 0);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Hex::new(1, -3) + Hex::new(3, -7), Hex::new(4, -10));
        assert_eq!(Hex::new(1, -3) - Hex::new(3, -7), Hex::new(-2, 4));
        assert_eq!(Hex::new(1, -3) * 2, Hex::new(2, -6));
        assert_eq!(-Hex::new(1, -3), Hex::new(-1, 3));
    }

    #[test]
    fn test_rotation() {
        let h = Hex::try_new(1, -3, 2).unwrap();
        assert_eq!(h.rotate_right(), Hex::try_new(3, -2, -1).unwrap());
        assert_eq!(h.rotate_left(), Hex::try_new(-2, -1, 3).unwrap());
        let mut spun = h;
        for _ in 0..6 {
            spun = spun.rotate_left();
        }
        assert_eq!(spun, h);
    }

    #[test]
    fn test_direction_wraps() {
        assert_eq!(Hex::direction(2), Hex::new(0, -1));
        assert_eq!(Hex::direction(8), Hex::direction(2));
        assert_eq!(Hex::direction(-1), Hex::direction(5));
    }

    #[test]
    fn test_neighbors() {
        let h = Hex::new(1, -2);
        assert_eq!(h.neighbor(2), Hex::new(1, -3));
        assert!(h.neighbors().iter().all(|n| h.distance(*n) == 1));
        assert_eq!(h.diagonal_neighbor(3), Hex::new(-1, -1));
        assert_eq!(h.distance(h.diagonal_neighbor(0)), 2);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Hex::new(3, -7).distance(Hex::ORIGIN), 7);
        assert_eq!(Hex::new(-4, 0).distance(Hex::new(0, 0)), 4);
        assert_eq!(Hex::new(2, 2).length(), 4);
    }

    #[test]
    fn test_round() {
        let a = FractionalHex::new(0.0, 0.0, 0.0);
        let b = FractionalHex::new(1.0, -1.0, 0.0);
        let c = FractionalHex::new(0.0, -1.0, 1.0);
        let mixed = a.lerp(b, 0.5).lerp(c, 0.5);
        // Whatever it rounds to must satisfy the invariant and be adjacent.
        let rounded = mixed.round();
        assert_eq!(rounded.q + rounded.r + rounded.s, 0);
        assert_eq!(
            FractionalHex::new(0.0, 0.0, 0.0)
                .lerp(FractionalHex::new(10.0, -20.0, 10.0), 0.5)
                .round(),
            Hex::new(5, -10)
        );
        assert_eq!(
            a.lerp(b, 0.499).round(),
            Hex::ORIGIN
        );
        assert_eq!(a.lerp(b, 0.501).round(), Hex::new(1, -1));
    }

    #[test]
    fn test_line() {
        let line = Hex::new(0, 0).line_to(Hex::new(1, -5));
        assert_eq!(
            line,
            vec![
                Hex::new(0, 0),
                Hex::new(0, -1),
                Hex::new(0, -2),
                Hex::new(1, -3),
                Hex::new(1, -4),
                Hex::new(1, -5),
            ]
        );
        assert_eq!(Hex::new(2, 2).line_to(Hex::new(2, 2)), vec![Hex::new(2, 2)]);
    }

    #[test]
    fn test_range_and_ring_sizes() {
        let c = Hex::new(2, -1);
        assert_eq!(c.range(0), vec![c]);
        assert_eq!(c.range(3).len(), 37);
        assert!(c.range(3).iter().all(|h| c.distance(*h) <= 3));
        assert_eq!(c.ring(0), vec![c]);
        assert_eq!(c.ring(2).len(), 12);
        assert!(c.ring(2).iter().all(|h| c.distance(*h) == 2));
        assert_eq!(c.spiral(2).len(), 19);
    }

    #[test]
    fn test_serde_keeps_invariant() {
        let h = Hex::new(4, -9);
        let pair: (i32, i32) = h.into();
        assert_eq!(pair, (4, -9));
        assert_eq!(Hex::from(pair), h);
    }
}
