//! The beachline: a single ordered tree of [`BeachArc`]s. Unlike the
//! original viewer's petgraph tree (which materialized separate breakpoint
//! and arc node kinds), this tree holds exactly one node per arc; the
//! breakpoint between two arcs is derived on demand from their sites and the
//! current directrix, using the tree's threaded predecessor/successor
//! pointers to find the immediate neighbors in O(1).

use crate::diagram::{EdgeId, SiteId};
use crate::geom::{approx_eq, greater_eps, less_eps};
use crate::point::Point;
use crate::tree::{NodeId, OrderedTree};

/// One piecewise-parabolic segment of the beachline, owned by one site.
#[derive(Clone, Copy, Debug)]
pub struct BeachArc {
    pub site: SiteId,
    pub site_point: Point,
    /// The edge currently being traced by this arc's left boundary, if any.
    pub edge: Option<EdgeId>,
    /// A weak back-reference to this arc's pending circle event: the node
    /// id within the circle-event tree (`events.rs`), not a separate
    /// generational handle — `slab::Slab::remove` already invalidates keys
    /// immediately in this single-threaded driver.
    pub circle_event: Option<NodeId>,
}

impl BeachArc {
    fn new(site: SiteId, site_point: Point) -> Self {
        BeachArc { site, site_point, edge: None, circle_event: None }
    }
}

/// Result of searching the beachline for where a new site lands.
pub enum Locate {
    /// The site falls strictly inside this arc; split it.
    Inside(NodeId),
    /// The site falls exactly on the breakpoint between this arc and its
    /// predecessor.
    OnLeftBreak(NodeId),
    /// The site falls exactly on the breakpoint between this arc and its
    /// successor.
    OnRightBreak(NodeId),
}

pub struct Beachline {
    tree: OrderedTree<BeachArc>,
}

impl Beachline {
    pub fn new() -> Self {
        Beachline { tree: OrderedTree::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn arc(&self, node: NodeId) -> &BeachArc {
        self.tree.get(node)
    }

    pub fn arc_mut(&mut self, node: NodeId) -> &mut BeachArc {
        self.tree.get_mut(node)
    }

    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.tree.prev(node)
    }

    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next(node)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.tree.first()
    }

    /// Inserts the lone first arc when the beachline is empty.
    pub fn insert_first(&mut self, site: SiteId, point: Point) -> NodeId {
        self.tree.insert_after(None, BeachArc::new(site, point))
    }

    pub fn insert_after(&mut self, anchor: NodeId, site: SiteId, point: Point) -> NodeId {
        self.tree.insert_after(Some(anchor), BeachArc::new(site, point))
    }

    /// Inserts a new arc immediately before `node` in in-order (spatial)
    /// position — i.e. between `node`'s current predecessor and `node`
    /// itself. Used by the trailing-collinear site case (spec §4.3), where
    /// the new site always lands to the left of the leftmost arc under this
    /// crate's x-descending visitation order.
    pub fn insert_before(&mut self, node: NodeId, site: SiteId, point: Point) -> NodeId {
        let anchor = self.tree.prev(node);
        self.tree.insert_after(anchor, BeachArc::new(site, point))
    }

    pub fn remove(&mut self, node: NodeId) -> BeachArc {
        self.tree.remove(node)
    }

    /// Breakpoint x-coordinate between two arcs with foci `left`/`right`
    /// under directrix `d`, shifting the frame to the origin to keep the
    /// quadratic well conditioned (matches the classic "shift and solve"
    /// derivation).
    pub fn breakpoint_x(left: Point, right: Point, directrix: f64) -> f64 {
        let ax = left.x();
        let bx = right.x();
        let ay = left.y();
        let by = right.y();

        if approx_eq(ay, directrix) {
            return ax;
        }
        if approx_eq(by, directrix) {
            return bx;
        }

        let bx_s = bx - ax;
        let ay_s = ay - directrix;
        let by_s = by - directrix;

        let discrim = ay_s * by_s * ((ay_s - by_s) * (ay_s - by_s) + bx_s * bx_s);
        let numer = ay_s * bx_s - discrim.sqrt();
        let denom = ay_s - by_s;

        let x_bp = if denom != 0.0 { numer / denom } else { bx_s / 2.0 };
        x_bp + ax
    }

    /// Locates the arc (or breakpoint) that a new site at `(x, directrix)`
    /// lands on, per spec §4.3's four sub-cases.
    pub fn locate(&self, x: f64, directrix: f64) -> Locate {
        let mut current = self.tree.root().expect("locate requires a non-empty beachline");
        loop {
            let site_point = self.arc(current).site_point;

            let left_break = self.prev(current).map(|p| Self::breakpoint_x(self.arc(p).site_point, site_point, directrix));
            let right_break = self.next(current).map(|n| Self::breakpoint_x(site_point, self.arc(n).site_point, directrix));

            if let Some(lb) = left_break {
                if less_eps(x, lb) {
                    current = self.tree.left(current).expect("descent must have a left child here");
                    continue;
                }
                if approx_eq(x, lb) {
                    return Locate::OnLeftBreak(current);
                }
            }
            if let Some(rb) = right_break {
                if greater_eps(x, rb) {
                    current = self.tree.right(current).expect("descent must have a right child here");
                    continue;
                }
                if approx_eq(x, rb) {
                    return Locate::OnRightBreak(current);
                }
            }
            return Locate::Inside(current);
        }
    }
}
