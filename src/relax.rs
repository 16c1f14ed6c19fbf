//! Lloyd relaxation: nudges each site toward its cell's centroid without
//! mutating the diagram, so callers can re-run [`crate::compute`] on the
//! result and iterate. Spec §4.8.

use crate::diagram::Diagram;
use crate::point::Point;

/// Each site's position after moving a fraction `t` of the way toward its
/// cell's centroid (`t = 1.0` is a full Lloyd step, `t = 0.0` the identity).
/// Returns `None` if `diagram` hasn't been finalized — unclosed cells have
/// no well-defined centroid, and silently defaulting to the raw site would
/// look like a normal relaxation result rather than a misuse of the API.
pub fn relaxed_sites(diagram: &Diagram, t: f64) -> Option<Vec<Point>> {
    if !diagram.finished() {
        return None;
    }

    Some(
        diagram
            .cells
            .iter()
            .map(|cell| {
                let site = diagram.sites[cell.site].point;
                if !cell.closed {
                    return site;
                }
                let centroid = cell.centroid(diagram);
                site + (centroid - site) * t
            })
            .collect(),
    )
}
