use std::collections::HashSet;
use std::time::{Duration, Instant};

use geo::Line;
use itertools::Itertools;
use log::debug;

use crate::adjuster::{segment_intersection, Adjuster};
use crate::segment::{Error, Segment};
use crate::sweep::{Outcome, ProgressSample, Report, DEFAULT_BUDGET};

/// Brute-force baseline: test every pair of segments.
///
/// Produces the same [`Report`] shape as the sweep and applies the
/// same endpoint-skip and canonicalization rules, so running both
/// against one [`Adjuster`] gives directly comparable output.
pub fn naive(lines: &[Line<f64>], adjuster: &mut Adjuster) -> Result<Report, Error> {
    naive_with_budget(lines, adjuster, DEFAULT_BUDGET)
}

/// [`naive`] with an explicit wall-clock budget, checked once per
/// pair.
pub fn naive_with_budget(
    lines: &[Line<f64>],
    adjuster: &mut Adjuster,
    budget: Duration,
) -> Result<Report, Error> {
    let mut segments = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        segments.push(Segment::new(index, *line, adjuster)?);
    }
    debug!("naive scan over {} segments", segments.len());

    let mut report = Report::new();
    let mut discovered = HashSet::new();
    let start = Instant::now();

    for (a, b) in (0..segments.len()).tuple_combinations() {
        let elapsed = start.elapsed();
        if elapsed >= budget {
            report.outcome = Outcome::TimedOut;
            report.samples.push(ProgressSample {
                elapsed: elapsed.as_secs_f64(),
                unique: discovered.len(),
            });
            return Ok(report);
        }

        if let Some(raw) = segment_intersection(&segments[a].line, &segments[b].line) {
            let crossing = adjuster.adjust(raw);
            // Endpoint touches are input relationships, not crossings.
            if !segments[a].has_endpoint(crossing) && !segments[b].has_endpoint(crossing) {
                report.results.entry(a).or_default().push(crossing);
                report.results.entry(b).or_default().push(crossing);
                discovered.insert(crossing);
            }
        }
        report.samples.push(ProgressSample {
            elapsed: start.elapsed().as_secs_f64(),
            unique: discovered.len(),
        });
    }
    Ok(report)
}
