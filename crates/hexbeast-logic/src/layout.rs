//! Mapping between hex coordinates and world/pixel space.

use serde::{Deserialize, Serialize};

use crate::hex::{FractionalHex, Hex};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Forward (`f*`) and inverse (`b*`) 2x2 matrices plus the corner start angle
/// in units of 60°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub f0: f64,
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub start_angle: f64,
}

impl Orientation {
    pub const POINTY: Self = Self {
        f0: SQRT_3,
        f1: SQRT_3 / 2.0,
        f2: 0.0,
        f3: 3.0 / 2.0,
        b0: SQRT_3 / 3.0,
        b1: -1.0 / 3.0,
        b2: 0.0,
        b3: 2.0 / 3.0,
        start_angle: 0.5,
    };

    pub const FLAT: Self = Self {
        f0: 3.0 / 2.0,
        f1: 0.0,
        f2: SQRT_3 / 2.0,
        f3: SQRT_3,
        b0: 2.0 / 3.0,
        b1: 0.0,
        b2: -1.0 / 3.0,
        b3: SQRT_3 / 3.0,
        start_angle: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub orientation: Orientation,
    /// Cell radius along each axis; unequal values stretch the grid.
    pub size: Point,
    pub origin: Point,
}

impl Layout {
    pub fn new(orientation: Orientation, size: Point, origin: Point) -> Self {
        Self {
            orientation,
            size,
            origin,
        }
    }

    pub fn pointy(size: f64) -> Self {
        Self::new(Orientation::POINTY, Point::new(size, size), Point::default())
    }

    pub fn flat(size: f64) -> Self {
        Self::new(Orientation::FLAT, Point::new(size, size), Point::default())
    }

    /// Center of a hex in world space.
    pub fn hex_to_pixel(&self, h: Hex) -> Point {
        let m = &self.orientation;
        let q = h.q as f64;
        let r = h.r as f64;
        Point {
            x: (m.f0 * q + m.f1 * r) * self.size.x + self.origin.x,
            y: (m.f2 * q + m.f3 * r) * self.size.y + self.origin.y,
        }
    }

    /// Inverse of [`Layout::hex_to_pixel`]; round the result to pick a cell.
    pub fn pixel_to_hex(&self, p: Point) -> FractionalHex {
        let m = &self.orientation;
        let x = (p.x - self.origin.x) / self.size.x;
        let y = (p.y - self.origin.y) / self.size.y;
        let q = m.b0 * x + m.b1 * y;
        let r = m.b2 * x + m.b3 * y;
        FractionalHex::new(q, r, -q - r)
    }

    pub fn hex_corner_offset(&self, corner: usize) -> Point {
        let angle =
            2.0 * std::f64::consts::PI * (self.orientation.start_angle - corner as f64) / 6.0;
        Point {
            x: self.size.x * angle.cos(),
            y: self.size.y * angle.sin(),
        }
    }

    pub fn polygon_corners(&self, h: Hex) -> [Point; 6] {
        let center = self.hex_to_pixel(h);
        std::array::from_fn(|i| {
            let offset = self.hex_corner_offset(i);
            Point::new(center.x + offset.x, center.y + offset.y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_pixel_round_trip() {
        let h = Hex::new(3, 4);
        let size = Point::new(10.0, 15.0);
        let origin = Point::new(35.0, 71.0);
        let flat = Layout::new(Orientation::FLAT, size, origin);
        assert_eq!(flat.pixel_to_hex(flat.hex_to_pixel(h)).round(), h);
        let pointy = Layout::new(Orientation::POINTY, size, origin);
        assert_eq!(pointy.pixel_to_hex(pointy.hex_to_pixel(h)).round(), h);
    }

    #[test]
    fn test_origin_maps_to_layout_origin() {
        let layout = Layout::new(Orientation::POINTY, Point::new(1.0, 1.0), Point::new(5.0, -2.0));
        assert_close(layout.hex_to_pixel(Hex::ORIGIN), Point::new(5.0, -2.0));
    }

    #[test]
    fn test_pointy_neighbor_spacing() {
        let layout = Layout::pointy(1.0);
        let east = layout.hex_to_pixel(Hex::new(1, 0));
        assert_close(east, Point::new(SQRT_3, 0.0));
    }

    #[test]
    fn test_corners_lie_on_radius() {
        let layout = Layout::flat(2.0);
        let center = layout.hex_to_pixel(Hex::new(-2, 1));
        for corner in layout.polygon_corners(Hex::new(-2, 1)) {
            let d = ((corner.x - center.x).powi(2) + (corner.y - center.y).powi(2)).sqrt();
            assert!((d - 2.0).abs() < 1e-9);
        }
        // Flat-top: first corner points along +x.
        assert_close(layout.hex_corner_offset(0), Point::new(2.0, 0.0));
    }
}
