// ── Bounded traffic history ──
//
// Fixed-capacity FIFO window of requests-per-second samples. One point
// is appended per poll cycle; once the window is full the oldest point
// is discarded, so memory stays constant no matter how long the
// monitor runs.

use std::collections::VecDeque;

/// A single requests-per-second sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficPoint {
    /// Wall-clock label captured when the sample was recorded (`HH:MM:SS`).
    pub label: String,
    /// Floored requests-per-second value.
    pub value: u64,
}

impl TrafficPoint {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self { label: label.into(), value }
    }
}

/// Sliding window of the most recent traffic samples.
///
/// Holds at most [`TrafficHistory::CAPACITY`] points. Pushing into a
/// full window evicts the oldest point first, keeping insertion order
/// (oldest to newest) for chart rendering.
#[derive(Debug, Clone)]
pub struct TrafficHistory {
    points: VecDeque<TrafficPoint>,
}

impl TrafficHistory {
    /// Maximum number of samples retained. At one sample per poll
    /// cycle this covers the last minute of traffic.
    pub const CAPACITY: usize = 30;

    pub fn new() -> Self {
        Self { points: VecDeque::with_capacity(Self::CAPACITY) }
    }

    /// Appends a sample, evicting the oldest one when full.
    pub fn push(&mut self, point: TrafficPoint) {
        if self.points.len() >= Self::CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&TrafficPoint> {
        self.points.back()
    }

    pub fn oldest(&self) -> Option<&TrafficPoint> {
        self.points.front()
    }

    /// Iterates samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TrafficPoint> {
        self.points.iter()
    }

    /// Largest sample value in the window, or 0 when empty.
    pub fn max_value(&self) -> u64 {
        self.points.iter().map(|p| p.value).max().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for TrafficHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a TrafficHistory {
    type Item = &'a TrafficPoint;
    type IntoIter = std::collections::vec_deque::Iter<'a, TrafficPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
