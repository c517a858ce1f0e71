use mint::Point2;

mod aabb;
mod circle;

pub use aabb::*;
pub use circle::*;

fn dot(a: Point2<f32>, b: Point2<f32>) -> f32 {
    a.x * b.x + a.y * b.y
}

fn sub(a: Point2<f32>, b: Point2<f32>) -> Point2<f32> {
    Point2 {
        x: a.x - b.x,
        y: a.y - b.y,
    }
}

/// Exact intersection test between two shape kinds.
/// Touching boundaries count as an intersection.
pub trait Intersect<T> {
    fn intersects(&self, shape: T) -> bool;
}

/// The closed set of shapes the grid can store and be queried with.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Aabb(AABB),
}

impl Shape {
    pub fn circle(center: impl Into<Point2<f32>>, radius: f32) -> Self {
        Shape::Circle(Circle::new(center, radius))
    }

    pub fn aabb(p1: impl Into<Point2<f32>>, p2: impl Into<Point2<f32>>) -> Self {
        Shape::Aabb(AABB::new(p1.into(), p2.into()))
    }

    /// Smallest axis-aligned box containing the shape.
    /// Only used to find the covered cells, never as an intersection test.
    pub fn bbox(&self) -> AABB {
        match *self {
            Shape::Circle(c) => c.bbox(),
            Shape::Aabb(b) => b,
        }
    }
}

impl Intersect<Shape> for Shape {
    fn intersects(&self, other: Shape) -> bool {
        match (*self, other) {
            (Shape::Circle(a), Shape::Circle(b)) => a.intersects(b),
            (Shape::Circle(a), Shape::Aabb(b)) => a.intersects(b),
            (Shape::Aabb(a), Shape::Circle(b)) => a.intersects(b),
            (Shape::Aabb(a), Shape::Aabb(b)) => a.intersects(b),
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<AABB> for Shape {
    fn from(b: AABB) -> Self {
        Shape::Aabb(b)
    }
}
