//! Detects all pairwise crossings in a set of 2-D line segments.
//!
//! The core is [`Sweep`], an implementation of the [Bentley-Ottmann]
//! plane sweep: events are popped in order along the y-axis, the
//! segments currently crossing the sweep line are kept left-to-right,
//! and candidate crossings are tested only between structurally
//! adjacent segments. The brute-force [`naive()`] baseline produces the
//! same output shape, so the two can be compared point-for-point (see
//! the `rand-line-crossings` bench).
//!
//! All point identity goes through an [`Adjuster`], which
//! canonicalizes coordinates up to a tolerance so that floating-point
//! noise cannot split one geometric point into several map keys.
//! Sharing one adjuster between algorithms makes their outputs
//! directly comparable.
//!
//! Runs are bounded by a wall-clock budget ([`DEFAULT_BUDGET`], 20
//! minutes, unless overridden). On expiry the partial results are
//! returned with [`Outcome::TimedOut`] rather than an error, together
//! with the progress trace of `(elapsed seconds, unique crossings)`
//! samples accumulated so far.
//!
//! ```rust
//! use geo::Line;
//! use sweep_crossings::{crossings, Adjuster};
//!
//! let mut adjuster = Adjuster::default();
//! let lines = vec![
//!     Line::from([(0., 0.), (4., 4.)]),
//!     Line::from([(0., 4.), (4., 0.)]),
//!     Line::from([(0., 2.), (4., 2.)]),
//! ];
//! let report = crossings(&lines, &mut adjuster).unwrap();
//! // All three pairs cross at (2, 2).
//! assert_eq!(report.crossing_count(), 3);
//! assert_eq!(report.unique_points().len(), 1);
//! ```
//!
//! [Bentley-Ottmann]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm

mod active;
mod adjuster;
mod events;
mod naive;
mod segment;
mod sweep;

pub use adjuster::{segment_intersection, Adjuster, SweepPoint};
pub use naive::{naive, naive_with_budget};
pub use segment::{Error, SegmentId};
pub use sweep::{crossings, Outcome, ProgressSample, Report, Sweep, DEFAULT_BUDGET};

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub(crate) mod random;
