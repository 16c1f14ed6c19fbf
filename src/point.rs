use rand::random;
use std::ops::{Sub, Mul, Add};
use std::fmt;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// A point in two dimensions.
///
/// Backed by an `OrderedFloat`-wrapped `euclid` vector so `Point` gets a
/// total order for free: sites and circle events both sort by this order
/// (spec §4.2, §5), and a `Point` can key a `HashSet`/`HashMap` without
/// going through a float-comparison footgun.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point(euclid::default::Vector2D<ordered_float::OrderedFloat<f64>>);

impl Point {
    /// Constructs a new `Point`.
    pub fn new(x: f64, y: f64) -> Self {
        Point(euclid::Vector2D::new(OrderedFloat::<f64>(x), OrderedFloat::<f64>(y)))
    }

    /// Getter for the x coordinate.
    pub fn x(&self) -> f64 {
        self.0.x.into_inner()
    }

    /// Getter for the y coordinate.
    pub fn y(&self) -> f64 {
        self.0.y.into_inner()
    }

    /// A uniformly random point in `[0, 1) x [0, 1)`. Used by tests and the
    /// Lloyd-relaxation fixtures, never by the sweep itself.
    pub fn rand() -> Self {
        Point::new(random::<f64>(), random::<f64>())
    }

    /// Euclidean distance to another point.
    pub fn distance(self, rhs: Point) -> f64 {
        self.distance_squared(rhs).sqrt()
    }

    /// Squared Euclidean distance; avoids the `sqrt` where only comparisons
    /// or equality checks are needed.
    pub fn distance_squared(self, rhs: Point) -> f64 {
        let dx = self.x() - rhs.x();
        let dy = self.y() - rhs.y();
        dx * dx + dy * dy
    }

    /// The midpoint of two points.
    pub fn midpoint(self, rhs: Point) -> Point {
        Point::new((self.x() + rhs.x()) * 0.5, (self.y() + rhs.y()) * 0.5)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({0:.1}, {1:.1})", self.x(), self.y())
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, _rhs: f64) -> Point {
        Point::new(self.0.x.into_inner() * _rhs, self.0.y.into_inner() * _rhs)
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    fn sub(self, _rhs: Point) -> Point {
        Point::new(self.x() - _rhs.x(), self.y() - _rhs.y())
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, _rhs: Point) -> Point {
        Point::new(self.x() + _rhs.x(), self.y() + _rhs.y())
    }
}

impl Point {
    /// Computes the cross product of two points, viewed as vectors from the origin.
    pub fn cross(self, rhs: Point) -> f64 {
        self.x() * rhs.y() - self.y() * rhs.x()
    }

    /// Computes the dot product of two points, viewed as vectors from the origin.
    pub fn dot(self, rhs: Point) -> f64 {
        self.x() * rhs.x() + self.y() * rhs.y()
    }
}

/// Natural ascending order on `(y, x)`.
///
/// The sweep wants to *visit* sites y-descending, x-descending (spec §4.2).
/// Rather than bake that traversal direction into `Ord` itself, `Point`
/// keeps the plain ascending order and the driver (§4.6) sorts ascending
/// then walks its site stack with `pop()`, which yields the maximum first —
/// i.e. exactly the required descending visitation order. The circle-event
/// queue (`events.rs`) relies on the same convention for its tree's "first"
/// pointer.
impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Point) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Point) -> Ordering {
        (self.0.y, self.0.x).cmp(&(other.0.y, other.0.x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_pop_visits_descending_y_then_descending_x() {
        let mut sites = vec![
            Point::new(0.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        sites.sort();
        let visited: Vec<Point> = std::iter::from_fn(|| sites.pop()).collect();
        assert_eq!(
            visited,
            vec![
                Point::new(0.0, 10.0),
                Point::new(5.0, 5.0),
                Point::new(0.0, 5.0),
                Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn midpoint_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.midpoint(b), Point::new(1.5, 2.0));
    }
}
