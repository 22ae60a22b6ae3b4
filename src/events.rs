use crate::geometry::{Point, Site};
use ordered_float::OrderedFloat;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A pending circle event: the arc `arc` shrinks to a point at `center`.
///
/// `generation` is the generation of the arc when the event was registered. Any later
/// change to the arc bumps its generation, which turns this event stale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleEvent {
    pub center: Point,
    pub radius: f64,
    pub arc: usize,
    pub generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventKind {
    /// The sweep line reaches the site with this index.
    Site(usize),
    Circle(CircleEvent),
}

/// An event of the sweep, positioned at the sweep coordinate `y`.
#[derive(Clone, Copy, Debug)]
pub struct Event {
    pub y: f64,
    pub x: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn site(index: usize, site: &Site) -> Event {
        Event {
            y: site.y,
            x: site.x,
            kind: EventKind::Site(index),
        }
    }

    pub fn circle(y: f64, circle: CircleEvent) -> Event {
        Event {
            y,
            x: circle.center.x,
            kind: EventKind::Circle(circle),
        }
    }

    pub fn is_site(&self) -> bool {
        matches!(self.kind, EventKind::Site(_))
    }

    // Larger y first. At equal y circle events go before site events, then smaller x first.
    fn key(&self) -> (OrderedFloat<f64>, bool, Reverse<OrderedFloat<f64>>) {
        (OrderedFloat(self.y), !self.is_site(), Reverse(OrderedFloat(self.x)))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Priority queue of sweep events, popping the event with the greatest y first.
#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
}

impl EventQueue {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.heap.push(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
