use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use geo::Line;
use log::{debug, trace};

use crate::active::Active;
use crate::adjuster::{segment_intersection, Adjuster, SweepPoint};
use crate::events::{Event, Schedule};
use crate::segment::{Error, Segment, SegmentId};

/// Wall-clock budget applied when none is given explicitly.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(20 * 60);

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event schedule ran to exhaustion.
    Complete,
    /// The wall-clock budget expired. The report holds whatever was
    /// accumulated up to that point; this is a recognized partial
    /// outcome, not an error.
    TimedOut,
}

/// One progress sample, recorded after every processed event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Seconds elapsed since the run started.
    pub elapsed: f64,
    /// Unique intersection points discovered so far.
    pub unique: usize,
}

/// Discovered crossings plus the progress trace of the run that found
/// them.
///
/// The [`naive()`](crate::naive()) baseline produces the same shape
/// from the same adjuster, so the two outputs compare directly.
#[derive(Debug, Clone)]
pub struct Report {
    /// Intersection points per input segment, in discovery order. A
    /// segment participating in k crossings has k entries, and each
    /// crossing appears in both participants' lists.
    pub results: HashMap<SegmentId, Vec<SweepPoint>>,
    /// Chronological progress samples, starting at `(0, 0)`.
    pub samples: Vec<ProgressSample>,
    pub outcome: Outcome,
}

impl Report {
    pub(crate) fn new() -> Self {
        Report {
            results: HashMap::new(),
            samples: vec![ProgressSample {
                elapsed: 0.,
                unique: 0,
            }],
            outcome: Outcome::Complete,
        }
    }

    /// Distinct canonical intersection points across all segments.
    pub fn unique_points(&self) -> HashSet<SweepPoint> {
        self.results.values().flatten().copied().collect()
    }

    /// Number of pairwise crossings. Each crossing is listed by both
    /// of its segments.
    pub fn crossing_count(&self) -> usize {
        self.results.values().map(|pts| pts.len()).sum::<usize>() / 2
    }
}

/// Bentley-Ottmann sweep over a set of line segments.
///
/// Events are ordered along the y-axis; the set of segments currently
/// crossing the sweep line is kept left-to-right, and candidate
/// crossings are tested only between structurally adjacent segments.
/// All point identity goes through the caller's [`Adjuster`], which
/// the brute-force baseline can share to produce comparable output.
///
/// ```rust
/// use geo::Line;
/// use sweep_crossings::{Adjuster, Sweep};
///
/// let mut adjuster = Adjuster::default();
/// let lines = vec![
///     Line::from([(0., 0.), (4., 4.)]),
///     Line::from([(0., 4.), (4., 0.)]),
/// ];
/// let report = Sweep::new(&lines, &mut adjuster)?.run();
/// assert_eq!(report.unique_points().len(), 1);
/// # Ok::<(), sweep_crossings::Error>(())
/// ```
pub struct Sweep<'a> {
    adjuster: &'a mut Adjuster,
    segments: Vec<Segment>,
    schedule: Schedule,
    active: Active,
    report: Report,
    discovered: HashSet<SweepPoint>,
    recorded_pairs: HashSet<(SegmentId, SegmentId)>,
    budget: Duration,
}

impl<'a> Sweep<'a> {
    /// Canonicalize the input and pre-populate the event schedule.
    ///
    /// Each non-horizontal segment schedules its lower and upper
    /// endpoints; a horizontal segment schedules only its (single,
    /// shared-y) lower endpoint. Rejects segments whose endpoints
    /// canonicalize to one point.
    pub fn new(lines: &[Line<f64>], adjuster: &'a mut Adjuster) -> Result<Self, Error> {
        let mut segments = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            segments.push(Segment::new(index, *line, adjuster)?);
        }

        let mut schedule = Schedule::default();
        for (id, segment) in segments.iter().enumerate() {
            if segment.horizontal {
                schedule.schedule(Some(segment.lower), Event::horizontal(id));
            } else {
                schedule.schedule(Some(segment.lower), Event::lower(id));
                schedule.schedule(Some(segment.upper), Event::upper(id));
            }
        }
        debug!(
            "sweep over {} segments, {} initial events",
            segments.len(),
            schedule.len()
        );

        Ok(Sweep {
            adjuster,
            segments,
            schedule,
            active: Active::default(),
            report: Report::new(),
            discovered: HashSet::new(),
            recorded_pairs: HashSet::new(),
            budget: DEFAULT_BUDGET,
        })
    }

    /// Replace the default wall-clock budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Run the sweep to completion or budget expiry.
    pub fn run(mut self) -> Report {
        let start = Instant::now();
        loop {
            if self.schedule.is_empty() {
                break;
            }
            let elapsed = start.elapsed();
            if elapsed >= self.budget {
                debug!("budget expired after {} events", self.report.samples.len() - 1);
                self.report.outcome = Outcome::TimedOut;
                self.record_sample(elapsed);
                break;
            }

            let (point, event) = self.schedule.pop().expect("schedule checked non-empty");
            trace!("event at {:?}: {:?}", point, event);
            self.handle_event(point, event);
            self.record_sample(start.elapsed());
        }
        self.report
    }

    /// Process one event's four segment sets, in the fixed order that
    /// keeps the status structure consistent: closing segments leave
    /// before new adjacencies are derived.
    fn handle_event(&mut self, point: SweepPoint, event: Event) {
        // Segments opening or crossing here pass through the event
        // point; the resorts pin their probe x to it.
        let at_point: Vec<SegmentId> = event
            .lower
            .iter()
            .chain(event.intersection.iter())
            .copied()
            .collect();

        // Horizontal segments exist only at this one event and never
        // enter the status order; test them against everything alive.
        let living: Vec<SegmentId> = self.active.iter().collect();
        for &seg in &event.horizontal {
            for &other in &living {
                self.test_pair(Some(seg), Some(other), point);
            }
        }

        // Closing segments: the two neighbors become adjacent once
        // the segment leaves, so test them against each other first.
        for &seg in &event.upper {
            let (left, right) = self.active.neighbors(seg);
            self.test_pair(left, right, point);
            self.active.remove(seg);
        }

        // Opening segments: insert, re-establish the order at this
        // point, then test against both new neighbors.
        for &seg in &event.lower {
            self.active.insert(seg);
            self.active
                .resort(point, &at_point, &self.segments, self.adjuster);
            let (left, right) = self.active.neighbors(seg);
            self.test_pair(Some(seg), right, point);
            self.test_pair(left, Some(seg), point);
        }

        // Pass-through crossings: positions swap past this point, so
        // re-sort and test against the new neighbors.
        for &seg in &event.intersection {
            // Canonicalization can merge a crossing with the same
            // segment's upper endpoint; it is already gone then.
            if !self.active.contains(seg) {
                continue;
            }
            self.active
                .resort(point, &at_point, &self.segments, self.adjuster);
            let (left, right) = self.active.neighbors(seg);
            self.test_pair(Some(seg), right, point);
            self.test_pair(left, Some(seg), point);
        }
    }

    /// Test a candidate pair for a crossing; schedule and record it.
    ///
    /// `None` arguments (missing neighbors) are no-ops. An
    /// intersection canonicalizing onto an endpoint of either segment
    /// is an input relationship, not a discovery, and is skipped. A
    /// strictly-future point on the sweep axis is scheduled as a new
    /// event and recorded, once per pair; a point at or behind the
    /// sweep is recorded only when `first` is horizontal, since a
    /// horizontal segment has no future along the sweep axis to
    /// revisit. Only `first` is checked; the asymmetry is kept as-is.
    fn test_pair(
        &mut self,
        first: Option<SegmentId>,
        second: Option<SegmentId>,
        point: SweepPoint,
    ) {
        let (first, second) = match (first, second) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };
        let s1 = self.segments[first];
        let s2 = self.segments[second];

        let raw = match segment_intersection(&s1.line, &s2.line) {
            Some(c) => c,
            None => return,
        };
        let crossing = self.adjuster.adjust(raw);
        if s1.has_endpoint(crossing) || s2.has_endpoint(crossing) {
            return;
        }

        if crossing.y() > point.y() {
            let pair = (first.min(second), first.max(second));
            if !self.recorded_pairs.insert(pair) {
                return;
            }
            debug!("crossing of {} and {} at {:?}", first, second, crossing);
            self.schedule
                .schedule(Some(crossing), Event::crossing(first, second));
            self.record(first, crossing);
            self.record(second, crossing);
        } else if s1.horizontal {
            debug!(
                "horizontal crossing of {} and {} at {:?}",
                first, second, crossing
            );
            self.record(first, crossing);
            self.record(second, crossing);
        }
    }

    fn record(&mut self, id: SegmentId, point: SweepPoint) {
        self.report.results.entry(id).or_default().push(point);
        self.discovered.insert(point);
    }

    fn record_sample(&mut self, elapsed: Duration) {
        self.report.samples.push(ProgressSample {
            elapsed: elapsed.as_secs_f64(),
            unique: self.discovered.len(),
        });
    }
}

/// Run a sweep over `lines` with the default budget.
pub fn crossings(lines: &[Line<f64>], adjuster: &mut Adjuster) -> Result<Report, Error> {
    Ok(Sweep::new(lines, adjuster)?.run())
}
