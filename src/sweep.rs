//! The sweepline driver: merges the sorted site stack with the live
//! circle-event queue and dispatches `addArc`/`removeArc` on the beachline.

use crate::beachline::{Beachline, Locate};
use crate::diagram::Diagram;
use crate::error::VoronoiError;
use crate::events::{attach_circle_event, detach_circle_event, CircleEvent, EventQueue};
use crate::geom::{approx_eq, circle_center};
use crate::point::Point;
use crate::tree::NodeId;

/// Runs Fortune's sweep to completion over `sites`, producing the raw
/// (unclipped, unclosed) diagram. Callers normally follow this with
/// [`crate::finalize::finish`] (or call [`crate::compute`], which folds both
/// steps together).
pub fn sweep(sites: &[Point]) -> Result<Diagram, VoronoiError> {
    if sites.is_empty() {
        return Err(VoronoiError::EmptyInput);
    }

    let start = std::time::Instant::now();

    let mut pending: Vec<Point> = sites.to_vec();
    // Ascending sort, then pop-from-the-back: yields descending (y, x)
    // visitation order, per Point's documented convention.
    pending.sort();

    let mut diagram = Diagram::new();
    let mut beachline = Beachline::new();
    let mut queue = EventQueue::new();
    let mut last_site: Option<Point> = None;

    loop {
        let next_site = pending.last().copied();
        let next_event = queue.first();

        let process_site = match (next_site, next_event) {
            (Some(site), Some(event_node)) => site > queue.event(event_node).point,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        if process_site {
            let site = pending.pop().expect("next_site was Some");
            if last_site == Some(site) {
                continue;
            }
            last_site = Some(site);
            handle_site_event(&mut diagram, &mut beachline, &mut queue, site);
        } else {
            let event_node = next_event.expect("process_site is false only when an event exists");
            let event = *queue.event(event_node);
            handle_circle_event(&mut beachline, &mut queue, &mut diagram, event);
        }
    }

    diagram.exec_time = start.elapsed();
    Ok(diagram)
}

fn handle_site_event(diagram: &mut Diagram, beachline: &mut Beachline, queue: &mut EventQueue, point: Point) {
    let site_id = diagram.push_site(point);

    if beachline.is_empty() {
        beachline.insert_first(site_id, point);
        return;
    }

    match beachline.locate(point.x(), point.y()) {
        Locate::Inside(node) => {
            let existing_site_point = beachline.arc(node).site_point;
            let existing_site_id = beachline.arc(node).site;

            // Trailing co-linear case (spec §4.3): sites are visited
            // y-descending, x-descending (point.rs's `Ord` impl, driven
            // pop-from-the-back in `sweep`), so a site lying on the same
            // directrix as every arc processed so far always lands to the
            // *left* of the current leftmost arc — never to the right. The
            // located arc has no predecessor in that case. No split, no
            // vertex yet: just a border edge, traced by `node`'s (now
            // shifted) left breakpoint against its brand-new left neighbor.
            if beachline.prev(node).is_none()
                && approx_eq(existing_site_point.y(), point.y())
                && point.x() < existing_site_point.x()
            {
                detach_circle_event(beachline, queue, node);
                let edge = diagram.push_edge(existing_site_id, Some(site_id));
                diagram.attach_cell_edge(existing_site_id, edge);
                diagram.attach_cell_edge(site_id, edge);
                beachline.insert_before(node, site_id, point);
                beachline.arc_mut(node).edge = Some(edge);
                attach_circle_event(beachline, queue, node);
                return;
            }

            detach_circle_event(beachline, queue, node);

            let edge = diagram.push_edge(existing_site_id, Some(site_id));
            diagram.attach_cell_edge(existing_site_id, edge);
            diagram.attach_cell_edge(site_id, edge);

            // `node` stays as the left copy of the split arc; insert the new
            // arc and a fresh right copy immediately after it. Both new
            // arcs trace the same new edge from opposite sides until a
            // later event differentiates them.
            let new_node = beachline.insert_after(node, site_id, point);
            beachline.arc_mut(new_node).edge = Some(edge);

            let right_copy = beachline.insert_after(new_node, existing_site_id, existing_site_point);
            beachline.arc_mut(right_copy).edge = Some(edge);

            attach_circle_event(beachline, queue, node);
            attach_circle_event(beachline, queue, right_copy);
        }
        Locate::OnLeftBreak(node) => {
            let left_arc = beachline.prev(node).expect("OnLeftBreak implies a predecessor");
            handle_exact_breakpoint(diagram, beachline, queue, left_arc, node, site_id, point);
        }
        Locate::OnRightBreak(node) => {
            let right_arc = beachline.next(node).expect("OnRightBreak implies a successor");
            handle_exact_breakpoint(diagram, beachline, queue, node, right_arc, site_id, point);
        }
    }
}

/// The new site lands exactly on the breakpoint between `left_arc` and
/// `right_arc` (spec §4.3's second sub-case).
fn handle_exact_breakpoint(
    diagram: &mut Diagram,
    beachline: &mut Beachline,
    queue: &mut EventQueue,
    left_arc: NodeId,
    right_arc: NodeId,
    new_site_id: usize,
    point: Point,
) {
    detach_circle_event(beachline, queue, left_arc);
    detach_circle_event(beachline, queue, right_arc);

    let left_site_point = beachline.arc(left_arc).site_point;
    let left_site_id = beachline.arc(left_arc).site;
    let right_site_point = beachline.arc(right_arc).site_point;
    let right_site_id = beachline.arc(right_arc).site;
    let existing_edge = beachline.arc(right_arc).edge;

    let vertex = circle_center((left_site_point, point, right_site_point)).map(|center| diagram.push_vertex(center));

    if vertex.is_none() {
        // Open Question 2: a circumcenter that fails to exist (a near-
        // degenerate, nearly collinear triple). We still split the
        // beachline but leave the bordered edge unterminated; finalize()
        // will connect or drop it like any other dangling edge.
        log::warn!(
            "exact-breakpoint site event at {:?} produced a collinear triple; leaving edge unterminated",
            point
        );
    } else if let Some(edge_id) = existing_edge {
        diagram.set_edge_start(edge_id, left_site_id, right_site_id, vertex.unwrap());
    }

    let edge_left_new = diagram.push_edge(left_site_id, Some(new_site_id));
    diagram.attach_cell_edge(left_site_id, edge_left_new);
    diagram.attach_cell_edge(new_site_id, edge_left_new);

    let edge_new_right = diagram.push_edge(new_site_id, Some(right_site_id));
    diagram.attach_cell_edge(new_site_id, edge_new_right);
    diagram.attach_cell_edge(right_site_id, edge_new_right);

    if let Some(vertex) = vertex {
        diagram.set_edge_start(edge_left_new, left_site_id, new_site_id, vertex);
        diagram.set_edge_start(edge_new_right, new_site_id, right_site_id, vertex);
    }

    let new_node = beachline.insert_after(left_arc, new_site_id, point);
    beachline.arc_mut(new_node).edge = Some(edge_left_new);
    beachline.arc_mut(right_arc).edge = Some(edge_new_right);

    attach_circle_event(beachline, queue, left_arc);
    attach_circle_event(beachline, queue, right_arc);
}

fn points_coincide(a: Point, b: Point) -> bool {
    approx_eq(a.x(), b.x()) && approx_eq(a.y(), b.y())
}

/// The arc collapses; spec §4.3's `removeArc`. Accumulates the run of
/// adjacent arcs sharing the same collapse point so co-circular quadruples
/// (and beyond) resolve in one step, per scenario 5.
fn handle_circle_event(beachline: &mut Beachline, queue: &mut EventQueue, diagram: &mut Diagram, event: CircleEvent) {
    let vanish_point = event.point;

    let mut run = vec![event.arc];
    while let Some(candidate) = beachline.prev(*run.first().unwrap()) {
        match beachline.arc(candidate).circle_event {
            Some(ev_node) if points_coincide(queue.event(ev_node).point, vanish_point) => run.insert(0, candidate),
            _ => break,
        }
    }
    while let Some(candidate) = beachline.next(*run.last().unwrap()) {
        match beachline.arc(candidate).circle_event {
            Some(ev_node) if points_coincide(queue.event(ev_node).point, vanish_point) => run.push(candidate),
            _ => break,
        }
    }

    let left_survivor = beachline.prev(*run.first().unwrap());
    let right_survivor = beachline.next(*run.last().unwrap());

    let vertex = diagram.push_vertex(event.center);

    let mut chain = Vec::with_capacity(run.len() + 2);
    if let Some(l) = left_survivor {
        chain.push(l);
    }
    chain.extend_from_slice(&run);
    if let Some(r) = right_survivor {
        chain.push(r);
    }

    for pair in chain.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if let Some(edge_id) = beachline.arc(b).edge {
            let a_site = beachline.arc(a).site;
            let b_site = beachline.arc(b).site;
            diagram.set_edge_start(edge_id, a_site, b_site, vertex);
        }
    }

    for &node in &run {
        detach_circle_event(beachline, queue, node);
    }
    if let Some(l) = left_survivor {
        detach_circle_event(beachline, queue, l);
    }
    if let Some(r) = right_survivor {
        detach_circle_event(beachline, queue, r);
    }

    for &node in &run {
        beachline.remove(node);
    }

    if let (Some(l), Some(r)) = (left_survivor, right_survivor) {
        let l_site = beachline.arc(l).site;
        let r_site = beachline.arc(r).site;

        let new_edge = diagram.push_edge(l_site, Some(r_site));
        diagram.attach_cell_edge(l_site, new_edge);
        diagram.attach_cell_edge(r_site, new_edge);
        diagram.set_edge_start(new_edge, l_site, r_site, vertex);
        beachline.arc_mut(r).edge = Some(new_edge);

        attach_circle_event(beachline, queue, l);
        attach_circle_event(beachline, queue, r);
    }
}
