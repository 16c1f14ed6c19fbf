//! 2D Voronoi diagrams via Fortune's sweepline algorithm.
//!
//! The sweep ([`sweep::sweep`]) produces a raw diagram with every interior
//! vertex placed but edges running off to infinity; the finalizer
//! ([`finalize::finish`]) clips that against a bounding box and closes each
//! cell into a polygon. [`compute`] folds both steps together, which is
//! almost always what you want — the two-step split exists for callers who
//! want to inspect or relax the raw diagram before committing to a box.

pub mod beachline;
pub mod diagram;
pub mod error;
pub mod events;
pub mod finalize;
pub mod geom;
pub mod point;
pub mod relax;
pub mod sweep;
pub mod tree;

pub use diagram::Diagram;
pub use error::VoronoiError;
pub use geom::BoundingBox;
pub use point::Point;

/// Runs the full pipeline: sweep then finalize. `bbox` must be a valid,
/// non-degenerate box (see [`BoundingBox::is_valid`]); sites outside it are
/// accepted; their cells are simply clipped away if entirely out of bounds.
pub fn compute(sites: &[Point], bbox: &BoundingBox) -> Result<Diagram, VoronoiError> {
    if !bbox.is_valid() {
        return Err(VoronoiError::DegenerateBoundingBox);
    }

    let mut diagram = sweep::sweep(sites)?;
    diagram.finish(bbox);
    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_rejects_degenerate_bbox() {
        let sites = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let bbox = BoundingBox::new(Point::new(5.0, 5.0), Point::new(5.0, 10.0));
        assert!(matches!(compute(&sites, &bbox), Err(VoronoiError::DegenerateBoundingBox)));
    }

    #[test]
    fn compute_rejects_empty_sites() {
        let bbox = BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(matches!(compute(&[], &bbox), Err(VoronoiError::EmptyInput)));
    }

    #[test]
    fn compute_finishes_the_diagram() {
        let sites = vec![Point::new(2.0, 2.0), Point::new(8.0, 8.0)];
        let bbox = BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let diagram = compute(&sites, &bbox).unwrap();
        assert!(diagram.finished());
        assert!(diagram.cells.iter().all(|c| c.closed));
    }
}
