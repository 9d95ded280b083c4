use std::f64::consts::PI;
use std::fmt;

use geo::Line;

use crate::adjuster::{Adjuster, SweepPoint};

/// Identifies an input segment by its position in the input sequence.
pub type SegmentId = usize;

/// Invalid input, rejected before the sweep starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Both endpoints of the input line canonicalize to the same
    /// point.
    DegenerateSegment { index: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DegenerateSegment { index } => {
                write!(f, "segment {} has two identical endpoints", index)
            }
        }
    }
}

impl std::error::Error for Error {}

/// An input segment with the attributes the sweep derives from it.
///
/// Endpoints are canonicalized once at construction; the geometry is
/// never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    pub(crate) line: Line<f64>,
    /// Smaller endpoint in sweep order (`y`, then `x`).
    pub(crate) lower: SweepPoint,
    /// Larger endpoint in sweep order.
    pub(crate) upper: SweepPoint,
    /// Both endpoints share the sweep-axis coordinate.
    pub(crate) horizontal: bool,
}

impl Segment {
    /// Canonicalize the endpoints of `line` and derive the sweep
    /// attributes. Rejects segments that collapse to a point.
    pub(crate) fn new(index: usize, line: Line<f64>, adjuster: &mut Adjuster) -> Result<Self, Error> {
        let start = adjuster.adjust(line.start);
        let end = adjuster.adjust(line.end);
        if start == end {
            return Err(Error::DegenerateSegment { index });
        }
        let (lower, upper) = if start < end { (start, end) } else { (end, start) };
        Ok(Segment {
            line: Line::new(start.coord(), end.coord()),
            lower,
            upper,
            horizontal: lower.y() == upper.y(),
        })
    }

    /// Clockwise angle, mod π, between the segment and the
    /// horizontal. Independent of endpoint order.
    pub(crate) fn angle(&self) -> f64 {
        let d = self.line.start - self.line.end;
        let a = d.y.atan2(d.x);
        if a >= 0. {
            PI - a
        } else {
            -a
        }
    }

    /// Where the supporting line crosses a horizontal probe at height
    /// `y`.
    ///
    /// Only meaningful for non-horizontal segments; the status
    /// structure never queries a horizontal one.
    pub(crate) fn crossing_x(&self, y: f64) -> f64 {
        debug_assert!(!self.horizontal, "horizontal segments have no probe crossing");
        let d = self.upper.coord() - self.lower.coord();
        self.lower.x() + (y - self.lower.y()) * d.x / d.y
    }

    /// Whether the canonical point is one of the segment's endpoints.
    pub(crate) fn has_endpoint(&self, p: SweepPoint) -> bool {
        p == self.lower || p == self.upper
    }
}
