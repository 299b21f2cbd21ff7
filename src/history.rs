//! Undo history: ordered raster snapshots of one surface.
//!
//! The first entry is always the blank surface captured at engine
//! initialization, so the list is never empty and a full undo chain always
//! lands on blank. A snapshot is taken once per completed stroke, never per
//! pointer-move.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use serde::{Deserialize, Serialize};

use crate::surface::Snapshot;

/// How many post-stroke snapshots an engine keeps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryPolicy {
    /// Keep every snapshot for the lifetime of the engine (quiz answers).
    Unbounded,
    /// Keep at most this many entries in total; the oldest non-initial
    /// entry is dropped first, so the blank baseline always survives
    /// (notebook annotations).
    Capped(usize),
    /// Keep only the baseline; undo is permanently a no-op (legacy canvas).
    Disabled,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self::Unbounded
    }
}

/// The undo stack for one surface.
///
/// The baseline is stored apart from the per-stroke entries, which encodes
/// structurally that it can never be popped or capped away.
pub struct History {
    baseline: Snapshot,
    strokes: Vec<Snapshot>,
    policy: HistoryPolicy,
}

impl History {
    /// Start a history from the blank baseline snapshot.
    #[must_use]
    pub fn new(baseline: Snapshot, policy: HistoryPolicy) -> Self {
        Self { baseline, strokes: Vec::new(), policy }
    }

    /// Number of entries, counting the baseline. Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.strokes.len()
    }

    /// Always `false`: the baseline entry is never discarded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether there is a stroke to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    /// The snapshot the surface currently reflects.
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        self.strokes.last().unwrap_or(&self.baseline)
    }

    /// Append a post-stroke snapshot, honoring the retention policy.
    pub fn record(&mut self, snapshot: Snapshot) {
        match self.policy {
            HistoryPolicy::Disabled => {}
            HistoryPolicy::Unbounded => self.strokes.push(snapshot),
            HistoryPolicy::Capped(cap) => {
                self.strokes.push(snapshot);
                while self.len() > cap && !self.strokes.is_empty() {
                    self.strokes.remove(0);
                }
            }
        }
    }

    /// Discard the most recent stroke and expose the entry to repaint from,
    /// or `None` when only the baseline remains (nothing to undo).
    pub fn undo(&mut self) -> Option<&Snapshot> {
        self.strokes.pop()?;
        Some(self.current())
    }

    /// Reset to a single blank entry.
    pub fn reset(&mut self, baseline: Snapshot) {
        self.baseline = baseline;
        self.strokes.clear();
    }
}
