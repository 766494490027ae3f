//! Property tests for signal folding, classification, and debounce.

use std::time::Duration;

use proptest::prelude::*;
use srs_core::config::SignalCfg;
use srs_core::{classify, fold_into_period, CommandHistory, DebounceMode, PositionCommand};

fn any_command() -> impl Strategy<Value = PositionCommand> {
    prop_oneof![
        Just(PositionCommand::Min),
        Just(PositionCommand::Mid),
        Just(PositionCommand::Max),
        Just(PositionCommand::Invalid),
    ]
}

proptest! {
    /// Folding always lands in [0, period) and preserves the width modulo
    /// the period.
    #[test]
    fn fold_is_congruent_and_bounded(
        width_us in 0u64..200_000,
        period_us in 1_000u64..50_000,
    ) {
        let width = Duration::from_micros(width_us);
        let period = Duration::from_micros(period_us);
        let folded = fold_into_period(width, period);
        prop_assert!(folded < period);
        prop_assert_eq!(
            folded.as_micros() % u128::from(period_us),
            u128::from(width_us) % u128::from(period_us)
        );
    }

    /// Every width classifies to exactly one command; no width panics or
    /// falls through.
    #[test]
    fn classification_is_total(width_us in 0u64..100_000) {
        let cfg = SignalCfg::default();
        let cmd = classify(Duration::from_micros(width_us), &cfg);
        prop_assert!(matches!(
            cmd,
            PositionCommand::Min
                | PositionCommand::Mid
                | PositionCommand::Max
                | PositionCommand::Invalid
        ));
    }

    /// Widths inside a band's safe interior always classify to that band.
    #[test]
    fn interior_widths_are_stable(offset_us in 0u64..390) {
        let cfg = SignalCfg::default();
        // Max band interior: [1800, 2200) us, stay 5 us clear of both edges.
        let w = Duration::from_micros(1_805 + offset_us);
        prop_assert_eq!(classify(w, &cfg), PositionCommand::Max);
    }

    /// The debounced trend is always either the newest entry or Invalid,
    /// in both modes.
    #[test]
    fn trend_is_newest_or_invalid(
        cmds in proptest::collection::vec(any_command(), 1..20),
        depth in 1usize..8,
        split in proptest::bool::ANY,
    ) {
        let mode = if split {
            DebounceMode::SplitCheck
        } else {
            DebounceMode::ContinuousCheck
        };
        let mut h = CommandHistory::new(depth);
        for cmd in cmds {
            let trend = h.update(cmd, mode);
            prop_assert!(trend == cmd || trend == PositionCommand::Invalid);
        }
    }

    /// A command repeated depth times is always trusted by ContinuousCheck.
    #[test]
    fn continuous_trusts_a_persistent_command(
        cmd in any_command(),
        depth in 1usize..8,
    ) {
        let mut h = CommandHistory::new(depth);
        let mut trend = PositionCommand::Invalid;
        for _ in 0..depth {
            trend = h.update(cmd, DebounceMode::ContinuousCheck);
        }
        prop_assert_eq!(trend, cmd);
    }

    /// SplitCheck never trusts a window without a transition.
    #[test]
    fn split_requires_a_transition(
        cmd in any_command(),
        depth in 2usize..8,
    ) {
        let mut h = CommandHistory::new(depth);
        for _ in 0..(depth * 2) {
            let trend = h.update(cmd, DebounceMode::SplitCheck);
            // The window converges to uniform `cmd`; oldest == newest, so the
            // pattern can never be met.
            if h.entries().all(|c| c == cmd) {
                prop_assert_eq!(trend, PositionCommand::Invalid);
            }
        }
    }
}
