//! The circle-event priority queue: a second [`OrderedTree`] instance keyed
//! by `(y, x)`, reusing the same ascending-then-pop-from-the-back convention
//! documented on [`crate::point::Point`]'s `Ord` impl. The tree's own `last`
//! pointer (already O(1), threaded) serves as the "first event to fire"
//! cache the spec calls for — no separate bookkeeping needed.

use crate::beachline::Beachline;
use crate::geom::CIRCLE_ORIENTATION_EPSILON;
use crate::point::Point;
use crate::tree::{NodeId, OrderedTree};

/// The predicted collapse of three consecutive beachline arcs.
#[derive(Clone, Copy, Debug)]
pub struct CircleEvent {
    /// `(x, bottom-of-circle-y)`: the coordinate the sweep fires this event
    /// at.
    pub point: Point,
    /// The circumcenter itself, where the Voronoi vertex will be placed.
    pub center: Point,
    /// The beachline node (middle arc of the converging triple) that
    /// vanishes when this event fires.
    pub arc: NodeId,
}

impl CircleEvent {
    fn key(&self) -> Point {
        self.point
    }
}

pub struct EventQueue {
    tree: OrderedTree<CircleEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue { tree: OrderedTree::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The event with the greatest `(y, x)` key, i.e. the next one the
    /// driver should process.
    pub fn first(&self) -> Option<NodeId> {
        self.tree.last()
    }

    pub fn event(&self, node: NodeId) -> &CircleEvent {
        self.tree.get(node)
    }

    pub fn remove(&mut self, node: NodeId) -> CircleEvent {
        self.tree.remove(node)
    }

    fn locate_predecessor(&self, key: Point) -> Option<NodeId> {
        let mut current = self.tree.root()?;
        loop {
            let node_key = self.tree.get(current).key();
            if key < node_key {
                match self.tree.left(current) {
                    Some(l) => current = l,
                    None => return self.tree.prev(current),
                }
            } else {
                match self.tree.right(current) {
                    Some(r) => current = r,
                    None => return Some(current),
                }
            }
        }
    }

    fn insert(&mut self, event: CircleEvent) -> NodeId {
        let anchor = self.locate_predecessor(event.key());
        self.tree.insert_after(anchor, event)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates and enqueues a circle event for `arc_node`'s current neighbors,
/// if they exist, have distinct sites, and form a strictly converging
/// (counter-clockwise) triple. Stores the resulting event's node id back
/// onto the arc so it can be found and invalidated in O(log n) later.
pub fn attach_circle_event(beachline: &mut Beachline, queue: &mut EventQueue, arc_node: NodeId) {
    let (left, right) = match (beachline.prev(arc_node), beachline.next(arc_node)) {
        (Some(l), Some(r)) => (l, r),
        _ => return,
    };

    let left_site = beachline.arc(left).site_point;
    let center_site = beachline.arc(arc_node).site_point;
    let right_site = beachline.arc(right).site_point;
    if left_site == right_site {
        return;
    }

    let ax = left_site.x() - center_site.x();
    let ay = left_site.y() - center_site.y();
    let cx = right_site.x() - center_site.x();
    let cy = right_site.y() - center_site.y();

    let d = 2.0 * (ax * cy - ay * cx);
    if d >= CIRCLE_ORIENTATION_EPSILON {
        // Not a strictly-left (counter-clockwise) triple: it will never
        // collapse, or is too close to collinear to trust.
        return;
    }

    let a2 = ax * ax + ay * ay;
    let c2 = cx * cx + cy * cy;
    let x = (cy * a2 - ay * c2) / d;
    let y = (ax * c2 - cx * a2) / d;

    let radius = (x * x + y * y).sqrt();
    let ycenter = y + center_site.y();
    let event = CircleEvent {
        point: Point::new(center_site.x() + x, ycenter + radius),
        center: Point::new(center_site.x() + x, ycenter),
        arc: arc_node,
    };

    let node = queue.insert(event);
    beachline.arc_mut(arc_node).circle_event = Some(node);
}

/// Removes `arc_node`'s pending event, if any, and clears its back-pointer.
pub fn detach_circle_event(beachline: &mut Beachline, queue: &mut EventQueue, arc_node: NodeId) {
    let pending = beachline.arc_mut(arc_node).circle_event.take();
    if let Some(node) = pending {
        queue.remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    #[test]
    fn attach_skips_collinear_triple() {
        let mut beachline = Beachline::new();
        let mut queue = EventQueue::new();
        let a = beachline.insert_first(0, Point::new(-1.0, 0.0));
        let b = beachline.insert_after(a, 1, Point::new(0.0, 0.0));
        let _c = beachline.insert_after(b, 2, Point::new(1.0, 0.0));
        attach_circle_event(&mut beachline, &mut queue, b);
        assert!(queue.is_empty());
        assert!(beachline.arc(b).circle_event.is_none());
    }

    #[test]
    fn attach_creates_event_for_convergent_triple() {
        let mut beachline = Beachline::new();
        let mut queue = EventQueue::new();
        let a = beachline.insert_first(0, Point::new(-1.0, 0.0));
        let b = beachline.insert_after(a, 1, Point::new(0.0, 1.0));
        let _c = beachline.insert_after(b, 2, Point::new(1.0, 0.0));
        attach_circle_event(&mut beachline, &mut queue, b);
        assert!(!queue.is_empty());
        assert!(beachline.arc(b).circle_event.is_some());

        detach_circle_event(&mut beachline, &mut queue, b);
        assert!(queue.is_empty());
        assert!(beachline.arc(b).circle_event.is_none());
    }
}
