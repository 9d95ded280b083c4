use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use smallvec::{smallvec, SmallVec};

use crate::adjuster::SweepPoint;
use crate::segment::SegmentId;

type IdSet = SmallVec<[SegmentId; 2]>;

/// All segments relevant to one sweep stop, split by the role the
/// stop plays for each of them. Each set keeps segment identity
/// unique; insertion order is irrelevant.
#[derive(Debug, Default, Clone)]
pub(crate) struct Event {
    /// Segments whose lower endpoint is this point (to be inserted
    /// into the status structure).
    pub(crate) lower: IdSet,
    /// Segments whose upper endpoint is this point (to be removed).
    pub(crate) upper: IdSet,
    /// Segments passing through this point at neither endpoint (to be
    /// reordered in place).
    pub(crate) intersection: IdSet,
    /// Horizontal segments with an endpoint here; these never enter
    /// the status structure.
    pub(crate) horizontal: IdSet,
}

impl Event {
    pub(crate) fn lower(id: SegmentId) -> Self {
        Event {
            lower: smallvec![id],
            ..Default::default()
        }
    }

    pub(crate) fn upper(id: SegmentId) -> Self {
        Event {
            upper: smallvec![id],
            ..Default::default()
        }
    }

    pub(crate) fn horizontal(id: SegmentId) -> Self {
        Event {
            horizontal: smallvec![id],
            ..Default::default()
        }
    }

    pub(crate) fn crossing(a: SegmentId, b: SegmentId) -> Self {
        Event {
            intersection: smallvec![a, b],
            ..Default::default()
        }
    }

    /// Union `other` into `self`, keeping each set duplicate-free.
    fn merge(&mut self, other: Event) {
        fn extend(set: &mut IdSet, other: IdSet) {
            for id in other {
                if !set.contains(&id) {
                    set.push(id);
                }
            }
        }
        extend(&mut self.lower, other.lower);
        extend(&mut self.upper, other.upper);
        extend(&mut self.intersection, other.intersection);
        extend(&mut self.horizontal, other.horizontal);
    }
}

/// Heap entry ordering events by `(y, x, counter)`. The comparison is
/// reversed so that `BinaryHeap`, a max-heap, pops the least entry.
///
/// The counter only gives the queue a strict total order when two
/// entries tie on both coordinates; it carries no other meaning.
#[derive(Debug, PartialEq, Eq)]
struct QueueEntry {
    point: SweepPoint,
    counter: u64,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.point
            .cmp(&other.point)
            .then_with(|| self.counter.cmp(&other.counter))
            .reverse()
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of sweep events, with at most one live event per
/// canonical point.
///
/// Scheduling an already known point merges the new segment sets into
/// the existing event instead of inserting a second queue entry. The
/// sweep only schedules points strictly ahead of its position, so a
/// popped point is never scheduled again.
#[derive(Debug, Default)]
pub(crate) struct Schedule {
    heap: BinaryHeap<QueueEntry>,
    finder: HashMap<SweepPoint, Event>,
    counter: u64,
}

impl Schedule {
    /// Register `ev` at `point`, merging into an event already
    /// scheduled for the same point. A `None` point is a no-op, so
    /// callers can pass missing neighbors through unconditionally.
    pub(crate) fn schedule(&mut self, point: Option<SweepPoint>, ev: Event) {
        let point = match point {
            Some(p) => p,
            None => return,
        };
        match self.finder.entry(point) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(ev),
            Entry::Vacant(entry) => {
                entry.insert(ev);
                self.heap.push(QueueEntry {
                    point,
                    counter: self.counter,
                });
                self.counter += 1;
            }
        }
    }

    /// Remove and return the least event in sweep order, deleting it
    /// from the point lookup. `None` when no events remain.
    pub(crate) fn pop(&mut self) -> Option<(SweepPoint, Event)> {
        self.heap.pop().map(|entry| {
            let ev = self
                .finder
                .remove(&entry.point)
                .expect("scheduled point missing from the event finder");
            (entry.point, ev)
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
