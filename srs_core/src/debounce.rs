//! Command-history persistence filtering ("trend" detection).
//!
//! A single misclassified boundary pulse must not twitch an actuator. Each
//! actuator keeps a bounded, insertion-ordered window of recent commands and
//! only acts once the newest command has persisted through roughly half of
//! it. Failing the pattern is not an error; it simply yields `Invalid`
//! (hold) for that cycle.

use std::collections::VecDeque;

use crate::command::PositionCommand;

/// Persistence pattern required before a command is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceMode {
    /// The newest half of the window (indices `len/2..`) must uniformly
    /// equal the newest entry.
    ContinuousCheck,
    /// Additionally, the oldest `len/2` entries must uniformly equal the
    /// oldest entry and differ from the newest: a genuine transition, not a
    /// uniform window.
    SplitCheck,
}

/// Fixed-capacity, insertion-ordered window of recent position commands.
///
/// Owned exclusively by one actuator's pipeline; never shared. Seeded with
/// `Mid` (hold) across its full length so the first decisions after startup
/// are well-defined and no actuation happens before live data fills the
/// window.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    buf: VecDeque<PositionCommand>,
    depth: usize,
}

impl CommandHistory {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        let mut buf = VecDeque::with_capacity(depth);
        buf.extend(std::iter::repeat_n(PositionCommand::Mid, depth));
        Self { buf, depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Snapshot of the window, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = PositionCommand> + '_ {
        self.buf.iter().copied()
    }

    /// Append `cmd` (evicting the oldest entry) and return the debounced
    /// trend, or `Invalid` when the persistence pattern is not met.
    pub fn update(&mut self, cmd: PositionCommand, mode: DebounceMode) -> PositionCommand {
        self.buf.push_back(cmd);
        if self.buf.len() > self.depth {
            self.buf.pop_front();
        }

        let len = self.buf.len();
        let half = len / 2;
        // push_back guarantees non-empty
        let newest = *self.buf.back().unwrap_or(&PositionCommand::Invalid);

        let newest_run_ok = |span: usize| self.buf.iter().skip(len - span).all(|&c| c == newest);

        match mode {
            DebounceMode::ContinuousCheck => {
                // Persisted unbroken through at least half the window.
                if newest_run_ok(len - half) {
                    newest
                } else {
                    PositionCommand::Invalid
                }
            }
            DebounceMode::SplitCheck => {
                let oldest = *self.buf.front().unwrap_or(&PositionCommand::Invalid);
                let oldest_run_ok = self.buf.iter().take(half).all(|&c| c == oldest);
                if oldest_run_ok && newest_run_ok(half) && oldest != newest {
                    newest
                } else {
                    PositionCommand::Invalid
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(codes: &[i8]) -> CommandHistory {
        let mut h = CommandHistory::new(codes.len());
        // Overwrite the Mid seed by pushing a full window.
        for &c in codes {
            h.update(PositionCommand::from_code(c), DebounceMode::ContinuousCheck);
        }
        assert_eq!(
            h.entries().map(|c| c.as_code()).collect::<Vec<_>>(),
            codes.to_vec()
        );
        h
    }

    #[test]
    fn seed_prevents_actuation_until_window_fills() {
        let mut h = CommandHistory::new(5);
        // Three consecutive Max pushes needed before the newest half (3 of 5)
        // is uniform.
        assert_eq!(
            h.update(PositionCommand::Max, DebounceMode::ContinuousCheck),
            PositionCommand::Invalid
        );
        assert_eq!(
            h.update(PositionCommand::Max, DebounceMode::ContinuousCheck),
            PositionCommand::Invalid
        );
        assert_eq!(
            h.update(PositionCommand::Max, DebounceMode::ContinuousCheck),
            PositionCommand::Max
        );
    }

    #[test]
    fn depth_one_continuous_always_trusts_newest() {
        let mut h = CommandHistory::new(1);
        assert_eq!(
            h.update(PositionCommand::Min, DebounceMode::ContinuousCheck),
            PositionCommand::Min
        );
    }

    #[test]
    fn split_rejects_uniform_window() {
        let mut h = history_of(&[1, 1, 1, 1]);
        assert_eq!(
            h.update(PositionCommand::Mid, DebounceMode::SplitCheck),
            PositionCommand::Invalid
        );
    }
}
