use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Coordinate, Line};

/// A canonical point produced by an [`Adjuster`].
///
/// Wraps a [`Coordinate`] to support the sweep ordering and use as a
/// map key. The ordering is lexicographic by `y` and then by `x`: the
/// sweep advances along the y-axis, with x as tie-break.
///
/// `Eq`, `Ord` and `Hash` all work on the coordinate bit patterns.
/// This is consistent because the adjuster hands out the exact stored
/// representative for every point of an equivalence class.
#[derive(Debug, Clone, Copy)]
pub struct SweepPoint(Coordinate<f64>);

impl SweepPoint {
    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn coord(&self) -> Coordinate<f64> {
        self.0
    }
}

/// Create from a `Coordinate` while checking the components are finite.
impl From<Coordinate<f64>> for SweepPoint {
    fn from(pt: Coordinate<f64>) -> Self {
        assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}

impl PartialEq for SweepPoint {
    fn eq(&self, other: &Self) -> bool {
        self.0.x.to_bits() == other.0.x.to_bits() && self.0.y.to_bits() == other.0.y.to_bits()
    }
}

impl Eq for SweepPoint {}

/// Lexicographic ordering by `y` and then by `x` coordinate.
impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .y
            .total_cmp(&other.0.y)
            .then_with(|| self.0.x.total_cmp(&other.0.x))
    }
}

impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for SweepPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.x.to_bits().hash(state);
        self.0.y.to_bits().hash(state);
    }
}

/// Canonicalizes points so that coordinates within tolerance of each
/// other map to a single representative that compares and hashes
/// identically.
///
/// Two hash grids are kept: the tolerance grid itself, and the same
/// grid displaced by half a cell. A point close to a cell boundary of
/// one grid sits well inside a cell of the other, so repeated queries
/// for the same mathematical point (up to floating-point noise) find
/// the stored representative in at least one of the two maps.
///
/// Intersection queries return raw coordinates; callers pass them
/// through [`adjust`](Adjuster::adjust) before using them as map or
/// set keys.
#[derive(Debug, Clone)]
pub struct Adjuster {
    scale: f64,
    base: HashMap<(i64, i64), SweepPoint>,
    displaced: HashMap<(i64, i64), SweepPoint>,
}

impl Default for Adjuster {
    fn default() -> Self {
        Adjuster::new(6)
    }
}

impl Adjuster {
    /// Create an adjuster rounding coordinates to `digits` decimal
    /// places.
    pub fn new(digits: u32) -> Self {
        Adjuster {
            scale: 10f64.powi(digits as i32),
            base: HashMap::new(),
            displaced: HashMap::new(),
        }
    }

    /// Return the canonical representative for the equivalence class
    /// containing `point`, creating a new class if none is within
    /// tolerance.
    ///
    /// Idempotent: adjusting a representative returns it unchanged.
    pub fn adjust(&mut self, point: Coordinate<f64>) -> SweepPoint {
        let base_key = self.key(point, 0.);
        if let Some(&rep) = self.base.get(&base_key) {
            return rep;
        }
        let displaced_key = self.key(point, 0.5);
        if let Some(&rep) = self.displaced.get(&displaced_key) {
            return rep;
        }
        let rep = SweepPoint::from(Coordinate {
            x: (point.x * self.scale).round() / self.scale,
            y: (point.y * self.scale).round() / self.scale,
        });
        self.base.insert(base_key, rep);
        self.displaced.insert(displaced_key, rep);
        rep
    }

    fn key(&self, c: Coordinate<f64>, shift: f64) -> (i64, i64) {
        (
            (c.x * self.scale + shift).round() as i64,
            (c.y * self.scale + shift).round() as i64,
        )
    }
}

/// Finite intersection point of two bounded segments.
///
/// Parallel and disjoint pairs yield `None`, as do collinear
/// overlaps, unless the overlap degenerates to a single shared
/// endpoint, which is a valid (if degenerate) intersection. Endpoint
/// touches are reported like any other single-point intersection.
pub fn segment_intersection(a: &Line<f64>, b: &Line<f64>) -> Option<Coordinate<f64>> {
    match line_intersection(*a, *b)? {
        LineIntersection::SinglePoint { intersection, .. } => Some(intersection),
        LineIntersection::Collinear { intersection } => {
            if intersection.start == intersection.end {
                Some(intersection.start)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_is_idempotent() {
        let mut adjuster = Adjuster::default();
        let p = adjuster.adjust(Coordinate {
            x: 1.000000049,
            y: 2.,
        });
        assert_eq!(adjuster.adjust(p.coord()), p);
        let q = adjuster.adjust(p.coord());
        assert_eq!(adjuster.adjust(q.coord()), q);
    }

    #[test]
    fn nearby_points_share_a_representative() {
        let mut adjuster = Adjuster::default();
        let p = adjuster.adjust((1., 1.).into());
        let q = adjuster.adjust((1. + 1e-9, 1. - 1e-9).into());
        assert_eq!(p, q);
    }

    #[test]
    fn distant_points_stay_distinct() {
        let mut adjuster = Adjuster::default();
        let p = adjuster.adjust((0., 0.).into());
        let q = adjuster.adjust((1., 0.).into());
        assert_ne!(p, q);
    }

    #[test]
    fn sweep_order_is_y_then_x() {
        let p1 = SweepPoint::from(Coordinate { x: 5., y: 0. });
        let p2 = SweepPoint::from(Coordinate { x: 0., y: 1. });
        let p3 = SweepPoint::from(Coordinate { x: 1., y: 1. });

        assert!(p1 < p2);
        assert!(p2 < p3);
        assert!(p1 < p3);
    }

    #[test]
    fn crossing_segments_intersect() {
        let a = Line::from([(0., 0.), (4., 4.)]);
        let b = Line::from([(0., 4.), (4., 0.)]);
        assert_eq!(segment_intersection(&a, &b), Some((2., 2.).into()));
    }

    #[test]
    fn parallel_and_disjoint_segments_do_not() {
        let a = Line::from([(0., 0.), (2., 2.)]);
        let b = Line::from([(1., 0.), (3., 2.)]);
        assert_eq!(segment_intersection(&a, &b), None);

        let c = Line::from([(10., 10.), (11., 12.)]);
        assert_eq!(segment_intersection(&a, &c), None);
    }

    #[test]
    fn endpoint_touch_is_reported() {
        let a = Line::from([(0., 0.), (1., 1.)]);
        let b = Line::from([(0., 0.), (1., -1.)]);
        assert_eq!(segment_intersection(&a, &b), Some((0., 0.).into()));
    }

    #[test]
    fn collinear_overlap_is_ignored() {
        let a = Line::from([(0., 0.), (2., 2.)]);
        let b = Line::from([(1., 1.), (3., 3.)]);
        assert_eq!(segment_intersection(&a, &b), None);

        // A single-point overlap is still a valid intersection.
        let c = Line::from([(2., 2.), (3., 3.)]);
        assert_eq!(segment_intersection(&a, &c), Some((2., 2.).into()));
    }
}
