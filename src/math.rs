use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn dist_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Rotate about `center` by `angle` radians, clockwise on a y-down surface.
    pub fn rotate_about(&self, center: Point, angle: f64) -> Point {
        let (s, c) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(
            c * dx - s * dy + center.x,
            s * dx + c * dy + center.y,
        )
    }
}

pub fn degrees(deg: f64) -> f64 {
    deg * PI / 180.0
}
