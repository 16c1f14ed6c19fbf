//! Geometry primitives: epsilon policy, segments, bounding boxes, and the
//! circumcircle math the beachline and circle-event queue both need.

use crate::point::Point;
use ordered_float::OrderedFloat;

/// Tolerance used throughout the engine for float comparisons (site
/// coincidence, edge-clip degeneracy, co-circularity).
pub const EPSILON: f64 = 1e-9;

/// Stricter threshold used only for the circle-orientation test in
/// `events.rs`: a triple whose cross product sits in `(-2e-12, 0]` is
/// treated as degenerate (colinear-or-reflex) rather than convergent, since
/// the circumcenter solve is numerically unstable that close to zero.
pub const CIRCLE_ORIENTATION_EPSILON: f64 = -2e-12;

/// `true` if `a` and `b` are within [`EPSILON`] of each other.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// `true` if `a < b` once [`EPSILON`] slop is discounted.
pub fn less_eps(a: f64, b: f64) -> bool {
    b - a > EPSILON
}

/// `true` if `a > b` once [`EPSILON`] slop is discounted.
pub fn greater_eps(a: f64, b: f64) -> bool {
    a - b > EPSILON
}

pub type Segment = [Point; 2];
type TripleSite = (Point, Point, Point);

/// An axis-aligned clipping region. Sites outside it are still accepted as
/// input; only edges and cell polygons are clipped to it (spec §4.7).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        BoundingBox { min, max }
    }

    /// `false` when `min.x < max.x && min.y < max.y` does not hold.
    pub fn is_valid(&self) -> bool {
        self.min.x() < self.max.x() && self.min.y() < self.max.y()
    }

    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x() >= self.min.x() - EPSILON
            && p.x() <= self.max.x() + EPSILON
            && p.y() >= self.min.y() - EPSILON
            && p.y() <= self.max.y() + EPSILON
    }

    /// Clips a segment to this box using Liang-Barsky, per spec §4.7 Step B.
    /// Returns `None` if the segment lies entirely outside the box.
    pub fn clip_segment(&self, seg: Segment) -> Option<Segment> {
        let [a, b] = seg;
        let dx = b.x() - a.x();
        let dy = b.y() - a.y();

        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        let checks = [
            (-dx, a.x() - self.min.x()),
            (dx, self.max.x() - a.x()),
            (-dy, a.y() - self.min.y()),
            (dy, self.max.y() - a.y()),
        ];

        for (p, q) in checks {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }

        if t0 > t1 {
            return None;
        }

        let clipped_a = Point::new(a.x() + t0 * dx, a.y() + t0 * dy);
        let clipped_b = Point::new(a.x() + t1 * dx, a.y() + t1 * dy);
        Some([clipped_a, clipped_b])
    }
}

/// Intersection point of two finite segments, or `None` if they don't cross
/// within both segments' extents (parallel segments never intersect here,
/// even if colinear).
pub fn segment_intersection(seg1: Segment, seg2: Segment) -> Option<Point> {
    let a = seg1[0];
    let c = seg2[0];
    let r = seg1[1] - a;
    let s = seg2[1] - c;

    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }

    let numer_a = (c - a).cross(s);
    let numer_c = (c - a).cross(r);

    let t = numer_a / denom;
    let u = numer_c / denom;

    if t < 0.0 || t > 1.0 || u < 0.0 || u > 1.0 {
        return None;
    }

    Some(a + r * t)
}

/// The y-coordinate of the bottom of the circle through three sites; this is
/// the value a circle event fires at (the sweepline is tangent to the
/// circle's lowest point when the shrinking arc disappears).
pub fn circle_bottom(triple_site: TripleSite) -> Option<OrderedFloat<f64>> {
    let center = circle_center(triple_site)?;

    let (_, _, p3) = triple_site;
    let x3 = p3.x();
    let y3 = p3.y();
    let x_cen = center.x();
    let y_cen = center.y();

    let r = ((x3 - x_cen) * (x3 - x_cen) + (y3 - y_cen) * (y3 - y_cen)).sqrt();

    Some(OrderedFloat::<f64>(y_cen - r))
}

/// The circumcenter of three sites, or `None` if they are colinear.
pub fn circle_center(triple_site: TripleSite) -> Option<Point> {
    let (p1, p2, p3) = triple_site;
    let x1 = p1.x();
    let x2 = p2.x();
    let x3 = p3.x();
    let y1 = p1.y();
    let y2 = p2.y();
    let y3 = p3.y();

    let c1 = x3 * x3 + y3 * y3 - x1 * x1 - y1 * y1;
    let c2 = x3 * x3 + y3 * y3 - x2 * x2 - y2 * y2;
    let a1 = -2. * (x1 - x3);
    let a2 = -2. * (x2 - x3);
    let b1 = -2. * (y1 - y3);
    let b2 = -2. * (y2 - y3);

    let numer = c1 * a2 - c2 * a1;
    let denom = b1 * a2 - b2 * a1;

    if denom == 0.0 {
        return None;
    }
    let y_cen = numer / denom;

    let x_cen = if a2 != 0.0 {
        (c2 - b2 * y_cen) / a2
    } else {
        (c1 - b1 * y_cen) / a1
    };

    Some(Point::new(x_cen, y_cen))
}

/// Signed orientation of the triple `(a, b, c)`: positive if `b` is a left
/// turn from `a` to `c`, negative if a right turn, zero if colinear. Used by
/// `events.rs` to decide whether a beachline triple is converging.
pub fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}
