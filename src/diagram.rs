//! The output aggregate: sites, vertices, edges and cells produced by the
//! sweep, plus the finalizer's clipped/closed view of the same data.

use crate::geom::BoundingBox;
use crate::point::Point;

pub type SiteId = usize;
pub type VertexId = usize;
pub type EdgeId = usize;

/// An input point, augmented with a back-reference to the Cell it owns once
/// `addArc` has processed it.
#[derive(Clone, Copy, Debug)]
pub struct Site {
    pub point: Point,
    pub cell: Option<usize>,
}

/// A point shared by two or more edges: either a true circle-event
/// circumcenter or a fabricated point dropped on the bounding box during
/// closure.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub point: Point,
}

/// An unordered pair of sites and (eventually) two vertex endpoints.
/// `right` is absent for box-closure edges fabricated during finalization.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub left: SiteId,
    pub right: Option<SiteId>,
    pub start: Option<VertexId>,
    pub end: Option<VertexId>,
}

impl Edge {
    fn new(left: SiteId, right: Option<SiteId>) -> Self {
        Edge { left, right, start: None, end: None }
    }

    pub fn is_border(&self) -> bool {
        self.right.is_none()
    }
}

/// A site-oriented view of an [`Edge`]: `start`/`end` are given in
/// counter-clockwise orientation around `site`, which may be either of the
/// edge's two sites. Per spec this is deliberately a thin view rather than
/// an owner of its own start/end fields, so there is nothing to keep in
/// sync — only `edge` and the sort key are stored.
#[derive(Clone, Copy, Debug)]
pub struct CellEdge {
    pub edge: EdgeId,
    pub site: SiteId,
    /// `atan2(other.y - site.y, other.x - site.x)`, or (for border edges)
    /// the outward angle used to sort around the cell. Computed once, when
    /// the edge's sites are known; `start`/`end` are still derived live.
    pub angle: f64,
}

/// Owns one Site and an ordered, counter-clockwise sequence of CellEdges.
#[derive(Clone, Debug)]
pub struct Cell {
    pub site: SiteId,
    pub edges: Vec<CellEdge>,
    pub closed: bool,
}

impl Cell {
    fn new(site: SiteId) -> Self {
        Cell { site, edges: Vec::new(), closed: false }
    }

    /// The CellEdge's `start`, oriented so this cell's site is on the left.
    pub fn edge_start(&self, ce: &CellEdge, diagram: &Diagram) -> Option<Point> {
        let edge = &diagram.edges[ce.edge];
        let (start, end) = (edge.start, edge.end);
        if edge.left == ce.site {
            start.map(|v| diagram.vertices[v].point)
        } else {
            end.map(|v| diagram.vertices[v].point)
        }
    }

    /// The CellEdge's `end`, oriented so this cell's site is on the left.
    pub fn edge_end(&self, ce: &CellEdge, diagram: &Diagram) -> Option<Point> {
        let edge = &diagram.edges[ce.edge];
        let (start, end) = (edge.start, edge.end);
        if edge.left == ce.site {
            end.map(|v| diagram.vertices[v].point)
        } else {
            start.map(|v| diagram.vertices[v].point)
        }
    }

    /// Sum of edge lengths; `0.0` for edges missing an endpoint.
    pub fn perimeter(&self, diagram: &Diagram) -> f64 {
        self.edges
            .iter()
            .filter_map(|ce| match (self.edge_start(ce, diagram), self.edge_end(ce, diagram)) {
                (Some(a), Some(b)) => Some(a.distance(b)),
                _ => None,
            })
            .sum()
    }

    /// Shoelace-formula area of the closed polygon. `0.0` if not closed.
    pub fn area(&self, diagram: &Diagram) -> f64 {
        if !self.closed || self.edges.len() < 3 {
            return 0.0;
        }
        let site = diagram.sites[self.site].point;
        let mut total = 0.0;
        for ce in &self.edges {
            if let (Some(a), Some(b)) = (self.edge_start(ce, diagram), self.edge_end(ce, diagram)) {
                total += (a - site).cross(b - site);
            }
        }
        total.abs() * 0.5
    }

    /// Weighted average of fan-triangle (site, start, end) centroids,
    /// weighted by signed triangle area, per spec §4.2.
    pub fn centroid(&self, diagram: &Diagram) -> Point {
        let site = diagram.sites[self.site].point;
        if !self.closed || self.edges.is_empty() {
            return site;
        }
        let mut acc_x = 0.0;
        let mut acc_y = 0.0;
        let mut acc_area = 0.0;
        for ce in &self.edges {
            if let (Some(a), Some(b)) = (self.edge_start(ce, diagram), self.edge_end(ce, diagram)) {
                let signed_area = (a - site).cross(b - site) * 0.5;
                let tri_cx = (site.x() + a.x() + b.x()) / 3.0;
                let tri_cy = (site.y() + a.y() + b.y()) / 3.0;
                acc_x += tri_cx * signed_area;
                acc_y += tri_cy * signed_area;
                acc_area += signed_area;
            }
        }
        if acc_area.abs() < f64::EPSILON {
            return site;
        }
        Point::new(acc_x / acc_area, acc_y / acc_area)
    }

    /// Sites of every neighboring cell sharing an interior edge.
    pub fn neighbors(&self, diagram: &Diagram) -> Vec<SiteId> {
        self.edges
            .iter()
            .filter_map(|ce| {
                let edge = &diagram.edges[ce.edge];
                edge.right.and_then(|r| if edge.left == self.site { Some(r) } else { Some(edge.left) })
            })
            .collect()
    }

    /// Axis-aligned bounding box of this cell's vertices.
    pub fn bounding_aabb(&self, diagram: &Diagram) -> Option<BoundingBox> {
        let mut min = None;
        let mut max = None;
        for ce in &self.edges {
            for p in [self.edge_start(ce, diagram), self.edge_end(ce, diagram)].into_iter().flatten() {
                min = Some(match min {
                    None => p,
                    Some(m) => Point::new(m.x().min(p.x()), m.y().min(p.y())),
                });
                max = Some(match max {
                    None => p,
                    Some(m) => Point::new(m.x().max(p.x()), m.y().max(p.y())),
                });
            }
        }
        match (min, max) {
            (Some(min), Some(max)) => Some(BoundingBox::new(min, max)),
            _ => None,
        }
    }

    /// Point-in-polygon test via winding (cross-product sign must agree for
    /// every edge of a convex, counter-clockwise cell).
    pub fn contains(&self, point: Point, diagram: &Diagram) -> bool {
        if !self.closed {
            return false;
        }
        for ce in &self.edges {
            if let (Some(a), Some(b)) = (self.edge_start(ce, diagram), self.edge_end(ce, diagram)) {
                if (b - a).cross(point - a) < 0.0 {
                    return false;
                }
            }
        }
        true
    }
}

/// Top-level owner of everything the sweep and finalizer produce.
#[derive(Clone, Debug)]
pub struct Diagram {
    pub sites: Vec<Site>,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub cells: Vec<Cell>,
    /// Wall-clock time the sweep took; telemetry only, never read for
    /// correctness.
    pub exec_time: std::time::Duration,
    pub(crate) finished: bool,
}

impl Diagram {
    pub(crate) fn new() -> Self {
        Diagram {
            sites: Vec::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
            cells: Vec::new(),
            exec_time: std::time::Duration::ZERO,
            finished: false,
        }
    }

    pub(crate) fn push_site(&mut self, point: Point) -> SiteId {
        let id = self.sites.len();
        self.sites.push(Site { point, cell: None });
        let cell_id = self.cells.len();
        self.cells.push(Cell::new(id));
        self.sites[id].cell = Some(cell_id);
        id
    }

    pub(crate) fn push_vertex(&mut self, point: Point) -> VertexId {
        let id = self.vertices.len();
        self.vertices.push(Vertex { point });
        id
    }

    pub(crate) fn push_edge(&mut self, left: SiteId, right: Option<SiteId>) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(Edge::new(left, right));
        id
    }

    /// Registers a CellEdge view of `edge` on the cell owning `site`,
    /// caching its sort angle.
    pub(crate) fn attach_cell_edge(&mut self, site: SiteId, edge: EdgeId) {
        let angle = self.cell_edge_angle(site, edge);
        let cell = self.sites[site].cell.expect("site always owns a cell");
        self.cells[cell].edges.push(CellEdge { edge, site, angle });
    }

    fn cell_edge_angle(&self, site: SiteId, edge: EdgeId) -> f64 {
        let e = &self.edges[edge];
        let this = self.sites[site].point;
        let other_site = if e.left == site { e.right } else { Some(e.left) };
        match other_site {
            Some(other) => {
                let other = self.sites[other].point;
                (other.y() - this.y()).atan2(other.x() - this.x())
            }
            // Border edge: no opposite site yet (fabricated during
            // finalization) falls back to the perpendicular direction of
            // whatever endpoints exist so far.
            None => match (e.start, e.end) {
                (Some(a), Some(b)) => {
                    let (a, b) = (self.vertices[a].point, self.vertices[b].point);
                    let mid = a.midpoint(b);
                    (mid.y() - this.y()).atan2(mid.x() - this.x())
                }
                _ => 0.0,
            },
        }
    }

    /// Sets the endpoint an edge-traversal from `left_site` to `right_site`
    /// would reach first. If neither endpoint is set yet, that's `start`.
    /// Otherwise dispatch on which side of the edge `right_site` is on: if
    /// the edge's recorded `left` is `right_site`, this call is filling in
    /// the far endpoint (`end`); otherwise it's still filling in `start`.
    pub(crate) fn set_edge_start(&mut self, edge: EdgeId, _left_site: SiteId, right_site: SiteId, vertex: VertexId) {
        let e = &mut self.edges[edge];
        if e.start.is_none() && e.end.is_none() {
            e.start = Some(vertex);
        } else if e.left == right_site {
            e.end = Some(vertex);
        } else {
            e.start = Some(vertex);
        }
    }

    /// `set_edge_start` with the two sites swapped — spec §4.4.
    pub(crate) fn set_edge_end(&mut self, edge: EdgeId, left_site: SiteId, right_site: SiteId, vertex: VertexId) {
        self.set_edge_start(edge, right_site, left_site, vertex);
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Clips dangling edges to `bbox` and closes every cell into a
    /// counter-clockwise polygon (spec §4.7). Idempotent (spec P8): calling
    /// this twice on the same diagram is a no-op the second time.
    pub fn finish(&mut self, bbox: &BoundingBox) {
        crate::finalize::finish(self, bbox);
    }

    /// Lloyd relaxation (spec §4.8): each site moved a fraction `t` of the
    /// way toward its cell's centroid. `None` if [`Diagram::finish`] has not
    /// run yet — unclosed cells have no well-defined centroid.
    pub fn relaxed_sites(&self, t: f64) -> Option<Vec<Point>> {
        crate::relax::relaxed_sites(self, t)
    }
}
