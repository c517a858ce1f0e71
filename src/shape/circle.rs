pub use super::*;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: impl Into<Point2<f32>>, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "Circle radius ({}) cannot be negative", radius);
        Circle {
            center: center.into(),
            radius,
        }
    }

    pub fn bbox(&self) -> AABB {
        AABB {
            ll: Point2 {
                x: self.center.x - self.radius,
                y: self.center.y - self.radius,
            },
            ur: Point2 {
                x: self.center.x + self.radius,
                y: self.center.y + self.radius,
            },
        }
    }
}

// A squared distance can round down to "touching" while the boxes that pick the cells are
// disjoint, boxes are checked first so the grid never misses a pair reported here.

impl Intersect<AABB> for Circle {
    fn intersects(&self, b: AABB) -> bool {
        if !self.bbox().intersects(b) {
            return false;
        }
        let v = sub(b.closest_point(self.center), self.center);
        dot(v, v) <= self.radius * self.radius
    }
}

impl Intersect<Circle> for Circle {
    fn intersects(&self, c: Circle) -> bool {
        if !self.bbox().intersects(c.bbox()) {
            return false;
        }
        let v = sub(self.center, c.center);
        let r = self.radius + c.radius;

        dot(v, v) <= r * r
    }
}
