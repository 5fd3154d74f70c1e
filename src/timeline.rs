//! The timeline — a sparse, ordered map from time to events.
//!
//! This is the core's output artifact: everything upstream (patterns,
//! chains, sequencers) exists to fill one of these. Keys are canonical
//! rational [`Time`]s, so positions written as integers, fractions, or
//! floats land on the same entry. Values are ordered event lists; events
//! added at the same time keep their insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::time::Time;
use crate::values::Duration;

/// A time-ordered collection of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    entries: BTreeMap<Time, Vec<Event>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event at a time, creating the entry if absent.
    pub fn add(&mut self, time: impl Into<Time>, event: Event) {
        self.entries.entry(time.into()).or_default().push(event);
    }

    /// Append several events at a time, preserving their order.
    pub fn add_all(&mut self, time: impl Into<Time>, events: impl IntoIterator<Item = Event>) {
        self.entries.entry(time.into()).or_default().extend(events);
    }

    /// Replace the event list at a time.
    pub fn set(&mut self, time: impl Into<Time>, events: Vec<Event>) {
        self.entries.insert(time.into(), events);
    }

    /// The events at an exact time, if any.
    pub fn events_at(&self, time: impl Into<Time>) -> Option<&[Event]> {
        self.entries.get(&time.into()).map(Vec::as_slice)
    }

    /// Number of distinct times.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All times in ascending order.
    pub fn times(&self) -> impl Iterator<Item = Time> + '_ {
        self.entries.keys().copied()
    }

    /// Entries in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = (Time, &[Event])> {
        self.entries.iter().map(|(t, evs)| (*t, evs.as_slice()))
    }

    /// Add every entry of `other` into this timeline; co-located lists
    /// concatenate.
    pub fn merge(&mut self, other: &Timeline) {
        for (time, events) in other.iter() {
            self.add_all(time, events.iter().cloned());
        }
    }

    /// A new timeline with every time snapped to the nearest multiple of
    /// `interval`; exact half-intervals round up. Entries that collide
    /// concatenate their event lists in original time order.
    pub fn quantize(&self, interval: impl Into<Time>) -> Timeline {
        let interval = interval.into();
        let mut out = Timeline::new();
        for (time, events) in self.iter() {
            out.add_all(time.round_to_multiple_of(interval), events.iter().cloned());
        }
        out
    }

    pub fn quantize_in_place(&mut self, interval: impl Into<Time>) {
        *self = self.quantize(interval);
    }

    /// A new timeline with every time offset by `delta`.
    pub fn shift(&self, delta: impl Into<Time>) -> Timeline {
        let delta = delta.into();
        let mut out = Timeline::new();
        for (time, events) in self.iter() {
            out.add_all(time + delta, events.iter().cloned());
        }
        out
    }

    pub fn shift_in_place(&mut self, delta: impl Into<Time>) {
        *self = self.shift(delta);
    }

    /// A new timeline shifted so the earliest entry lands at `time`.
    pub fn shift_to(&self, time: impl Into<Time>) -> Timeline {
        match self.times().next() {
            None => self.clone(),
            Some(earliest) => self.shift(time.into() - earliest),
        }
    }

    pub fn shift_to_in_place(&mut self, time: impl Into<Time>) {
        *self = self.shift_to(time);
    }

    /// A new timeline with every nested-timeline event expanded in place:
    /// a child entry at `ct` inside an event at `t` lands at `t + ct`.
    /// Expansion recurses through arbitrary nesting depth; the placeholder
    /// events themselves are discarded.
    pub fn flatten(&self) -> Timeline {
        let mut out = Timeline::new();
        for (time, events) in self.iter() {
            for event in events {
                match event {
                    Event::Timeline(nested) => {
                        for (child_time, child_events) in nested.flatten().iter() {
                            out.add_all(time + child_time, child_events.iter().cloned());
                        }
                    }
                    other => out.add(time, other.clone()),
                }
            }
        }
        out
    }

    /// Drop entries whose event list is empty.
    pub fn compact(&mut self) {
        self.entries.retain(|_, events| !events.is_empty());
    }

    /// Total extent: the latest time plus the longest (absolute) duration
    /// sounding there.
    pub fn length(&self) -> Duration {
        self.iter()
            .map(|(time, events)| {
                let longest = events
                    .iter()
                    .map(|e| e.duration().abs().beats())
                    .fold(0.0, f64::max);
                time.to_f64() + longest
            })
            .fold(0.0, f64::max)
            .into()
    }
}

impl From<Vec<(Time, Vec<Event>)>> for Timeline {
    fn from(entries: Vec<(Time, Vec<Event>)>) -> Self {
        let mut out = Timeline::new();
        for (time, events) in entries {
            out.add_all(time, events);
        }
        out
    }
}

/// Structural comparison against a plain mapping literal.
impl PartialEq<Vec<(Time, Vec<Event>)>> for Timeline {
    fn eq(&self, other: &Vec<(Time, Vec<Event>)>) -> bool {
        *self == Timeline::from(other.clone())
    }
}

impl fmt::Display for Timeline {
    /// One line per time, ascending, with the separator column aligned.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.times().map(|t| t.to_string()).collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0);
        for (label, (_, events)) in labels.iter().zip(self.iter()) {
            let rendered: Vec<String> = events.iter().map(Event::to_string).collect();
            writeln!(f, "{label:>width$} => [{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}
