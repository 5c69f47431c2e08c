// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layer timestamps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time, in milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Create a timestamp from epoch milliseconds
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Get the epoch milliseconds
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Absolute distance to another timestamp in milliseconds
    pub fn distance(self, other: Timestamp) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

/// The discrete times a layer has data for, sorted and without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Timestamp>", into = "Vec<Timestamp>")]
pub struct TimestampSet {
    times: Vec<Timestamp>,
}

impl TimestampSet {
    /// Create a set from timestamps in any order
    pub fn new(times: impl IntoIterator<Item = Timestamp>) -> Self {
        let mut times: Vec<_> = times.into_iter().collect();
        times.sort_unstable();
        times.dedup();
        Self { times }
    }

    /// Number of timestamps
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check whether there are no timestamps
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Timestamp at an index
    pub fn get(&self, index: usize) -> Option<Timestamp> {
        self.times.get(index).copied()
    }

    /// Earliest timestamp
    pub fn first(&self) -> Option<Timestamp> {
        self.times.first().copied()
    }

    /// Latest timestamp
    pub fn last(&self) -> Option<Timestamp> {
        self.times.last().copied()
    }

    /// Index of an exact timestamp
    pub fn index_of(&self, time: Timestamp) -> Option<usize> {
        self.times.binary_search(&time).ok()
    }

    /// Index of the timestamp closest to `time`; ties go to the earlier one
    pub fn nearest(&self, time: Timestamp) -> Option<usize> {
        match self.times.binary_search(&time) {
            Ok(index) => Some(index),
            Err(_) if self.times.is_empty() => None,
            Err(0) => Some(0),
            Err(index) if index == self.times.len() => Some(index - 1),
            Err(index) => {
                let before = self.times[index - 1];
                let after = self.times[index];
                if time.distance(before) <= time.distance(after) {
                    Some(index - 1)
                } else {
                    Some(index)
                }
            }
        }
    }

    /// Iterate in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.times.iter().copied()
    }
}

impl From<Vec<Timestamp>> for TimestampSet {
    fn from(times: Vec<Timestamp>) -> Self {
        Self::new(times)
    }
}

impl From<TimestampSet> for Vec<Timestamp> {
    fn from(set: TimestampSet) -> Self {
        set.times
    }
}

impl FromIterator<Timestamp> for TimestampSet {
    fn from_iter<I: IntoIterator<Item = Timestamp>>(iter: I) -> Self {
        Self::new(iter)
    }
}
