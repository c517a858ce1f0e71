pub use super::*;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    /// Lower left of the AABB
    pub ll: Point2<f32>,
    /// Upper right of the AABB
    pub ur: Point2<f32>,
}

impl AABB {
    /// Builds the box spanned by two opposite corners, in any order.
    pub fn new(p1: Point2<f32>, p2: Point2<f32>) -> Self {
        debug_assert!(p1.x.is_finite() && p1.y.is_finite());
        debug_assert!(p2.x.is_finite() && p2.y.is_finite());
        AABB {
            ll: Point2 {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
            },
            ur: Point2 {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
            },
        }
    }

    pub fn contains(&self, p: Point2<f32>) -> bool {
        p.x >= self.ll.x && p.y >= self.ll.y && p.x <= self.ur.x && p.y <= self.ur.y
    }

    /// Point of the box closest to `p`.
    pub fn closest_point(&self, p: Point2<f32>) -> Point2<f32> {
        Point2 {
            x: p.x.clamp(self.ll.x, self.ur.x),
            y: p.y.clamp(self.ll.y, self.ur.y),
        }
    }
}

impl Intersect<AABB> for AABB {
    fn intersects(&self, b: AABB) -> bool {
        let a = self;
        let x = a.ll.x <= b.ur.x && b.ll.x <= a.ur.x;
        let y = a.ll.y <= b.ur.y && b.ll.y <= a.ur.y;

        x && y
    }
}

impl Intersect<Circle> for AABB {
    fn intersects(&self, shape: Circle) -> bool {
        shape.intersects(*self)
    }
}
