//! General invariant checks for spec §8's P1-P7, run across several site
//! configurations rather than pinned to one. The seven concrete scenarios
//! (and P8/P9) live in `tests/scenarios.rs`; this file is the "for every
//! finished diagram" half of §8.

use sweepline_voronoi::{compute, BoundingBox, Diagram, Point};

const EPS: f64 = 1e-6;

fn bbox(min: (f64, f64), max: (f64, f64)) -> BoundingBox {
    BoundingBox::new(Point::new(min.0, min.1), Point::new(max.0, max.1))
}

/// P1: exactly one Cell per (deduplicated) input site.
fn check_unique_cell_per_site(diagram: &Diagram) {
    assert_eq!(diagram.cells.len(), diagram.sites.len());
    let mut owners: Vec<usize> = diagram.cells.iter().map(|c| c.site).collect();
    owners.sort_unstable();
    owners.dedup();
    assert_eq!(owners.len(), diagram.cells.len(), "every site must own exactly one cell");
}

/// P2: for every closed cell, consecutive CellEdges meet end-to-start.
fn check_closed_cells(diagram: &Diagram) {
    for cell in &diagram.cells {
        if !cell.closed || cell.edges.len() < 3 {
            continue;
        }
        let n = cell.edges.len();
        for i in 0..n {
            let current = &cell.edges[i];
            let next = &cell.edges[(i + 1) % n];
            let end = cell.edge_end(current, diagram).expect("closed cell edge must have an end");
            let start = cell.edge_start(next, diagram).expect("closed cell edge must have a start");
            assert!(end.distance(start) < EPS, "gap between consecutive cell edges: {end:?} -> {start:?}");
        }
    }
}

/// P3: every closed cell's polygon winds counter-clockwise (positive signed
/// area, not the absolute value `Cell::area` reports).
fn check_counter_clockwise(diagram: &Diagram) {
    for cell in &diagram.cells {
        if !cell.closed || cell.edges.len() < 3 {
            continue;
        }
        let site = diagram.sites[cell.site].point;
        let mut signed = 0.0;
        for ce in &cell.edges {
            let (a, b) = (cell.edge_start(ce, diagram).unwrap(), cell.edge_end(ce, diagram).unwrap());
            signed += (a - site).cross(b - site);
        }
        assert!(signed > 0.0, "cell at site {site:?} is not counter-clockwise (signed area {signed})");
    }
}

/// P4: every vertex referenced by a closed cell lies inside the box.
fn check_inside_box(diagram: &Diagram, bbox: &BoundingBox) {
    for cell in &diagram.cells {
        if !cell.closed {
            continue;
        }
        for ce in &cell.edges {
            if let Some(p) = cell.edge_start(ce, diagram) {
                assert!(bbox.contains(p), "vertex {p:?} outside box");
            }
            if let Some(p) = cell.edge_end(ce, diagram) {
                assert!(bbox.contains(p), "vertex {p:?} outside box");
            }
        }
    }
}

/// P5: every interior edge with both sites set appears in exactly the two
/// cells whose sites are `left` and `right`; every border edge appears in
/// exactly one cell.
fn check_edge_sharing(diagram: &Diagram) {
    let mut counts = vec![0usize; diagram.edges.len()];
    for cell in &diagram.cells {
        for ce in &cell.edges {
            counts[ce.edge] += 1;
        }
    }
    for (id, edge) in diagram.edges.iter().enumerate() {
        let referenced = counts[id];
        if referenced == 0 {
            // Dropped during clipping/closure; not part of any live cell.
            continue;
        }
        if edge.right.is_some() {
            assert_eq!(referenced, 2, "interior edge {id} must be shared by exactly two cells");
        } else {
            assert_eq!(referenced, 1, "border edge {id} must belong to exactly one cell");
        }
    }
}

/// P6: every point of an interior edge is equidistant (within tolerance
/// proportional to edge length) from its two sites.
fn check_bisector_property(diagram: &Diagram) {
    for cell in &diagram.cells {
        if !cell.closed {
            continue;
        }
        for ce in &cell.edges {
            let edge = &diagram.edges[ce.edge];
            let right = match edge.right {
                Some(r) => r,
                None => continue,
            };
            let (a, b) = match (cell.edge_start(ce, diagram), cell.edge_end(ce, diagram)) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            let left_site = diagram.sites[edge.left].point;
            let right_site = diagram.sites[right].point;
            let length = a.distance(b).max(1.0);
            let tol = length * 1e-6 + 1e-6;
            for p in [a, b, a.midpoint(b)] {
                let da = p.distance(left_site);
                let db = p.distance(right_site);
                assert!((da - db).abs() < tol, "point {p:?} not equidistant: {da} vs {db}");
            }
        }
    }
}

/// P7: closed cell areas sum to the box area, within slop proportional to
/// the box perimeter.
fn check_area_conservation(diagram: &Diagram, bbox: &BoundingBox) {
    if !diagram.cells.iter().all(|c| c.closed) {
        return;
    }
    let box_area = bbox.width() * bbox.height();
    let total: f64 = diagram.cells.iter().map(|c| c.area(diagram)).sum();
    let tol = (bbox.width() + bbox.height()) * 2.0 * 1e-6 + 1e-3;
    assert!((total - box_area).abs() < tol, "cell areas summed to {total}, expected {box_area}");
}

fn check_all_properties(diagram: &Diagram, bbox: &BoundingBox) {
    check_unique_cell_per_site(diagram);
    check_closed_cells(diagram);
    check_counter_clockwise(diagram);
    check_inside_box(diagram, bbox);
    check_edge_sharing(diagram);
    check_bisector_property(diagram);
    check_area_conservation(diagram, bbox);
}

#[test]
fn properties_hold_for_two_sites() {
    let sites = vec![Point::new(100.0, 100.0), Point::new(300.0, 300.0)];
    let b = bbox((0.0, 0.0), (400.0, 400.0));
    let diagram = compute(&sites, &b).unwrap();
    check_all_properties(&diagram, &b);
}

#[test]
fn properties_hold_for_three_collinear_sites() {
    let sites = vec![Point::new(100.0, 200.0), Point::new(200.0, 200.0), Point::new(300.0, 200.0)];
    let b = bbox((0.0, 0.0), (400.0, 400.0));
    let diagram = compute(&sites, &b).unwrap();
    check_all_properties(&diagram, &b);
}

#[test]
fn properties_hold_for_square_of_four_sites() {
    let sites = vec![
        Point::new(100.0, 100.0),
        Point::new(300.0, 100.0),
        Point::new(100.0, 300.0),
        Point::new(300.0, 300.0),
    ];
    let b = bbox((0.0, 0.0), (400.0, 400.0));
    let diagram = compute(&sites, &b).unwrap();
    check_all_properties(&diagram, &b);
}

#[test]
fn properties_hold_for_co_circular_quadruple() {
    let sites =
        vec![Point::new(100.0, 200.0), Point::new(200.0, 100.0), Point::new(300.0, 200.0), Point::new(200.0, 300.0)];
    let b = bbox((0.0, 0.0), (400.0, 400.0));
    let diagram = compute(&sites, &b).unwrap();
    check_all_properties(&diagram, &b);
}

#[test]
fn properties_hold_for_an_irregular_scattered_set() {
    let sites = vec![
        Point::new(40.0, 370.0),
        Point::new(120.0, 90.0),
        Point::new(210.0, 260.0),
        Point::new(280.0, 40.0),
        Point::new(330.0, 320.0),
        Point::new(180.0, 180.0),
        Point::new(60.0, 60.0),
        Point::new(370.0, 150.0),
    ];
    let b = bbox((0.0, 0.0), (400.0, 400.0));
    let diagram = compute(&sites, &b).unwrap();
    check_all_properties(&diagram, &b);
}

#[test]
fn properties_hold_for_sites_outside_the_box() {
    // Sites outside the box still get cells; those cells may clip away to
    // nothing, but whatever survives must still satisfy every property.
    let sites =
        vec![Point::new(-50.0, 200.0), Point::new(200.0, 200.0), Point::new(450.0, 200.0), Point::new(200.0, -50.0)];
    let b = bbox((0.0, 0.0), (400.0, 400.0));
    let diagram = compute(&sites, &b).unwrap();
    check_all_properties(&diagram, &b);
}
