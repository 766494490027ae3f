//! Static drive tables for the actuator outputs.

use srs_traits::Level::{self, High, Low};

/// Direction rows for the linear actuator driver (CH1, CH2). The hold state
/// is both channels low, reached through `OutputBank::set_all_low`.
pub const LA_EXTEND: [Level; 2] = [High, Low];
pub const LA_RETRACT: [Level; 2] = [Low, High];

/// Half-stepping sequence for a two-phase unipolar stepper
/// (phase A switch 1/2, phase B switch 1/2). One full electrical cycle.
pub const HALF_STEP_SEQUENCE: [[Level; 4]; 8] = [
    [High, Low, Low, Low],
    [High, Low, High, Low],
    [Low, Low, High, Low],
    [Low, High, High, Low],
    [Low, High, Low, Low],
    [Low, High, Low, High],
    [Low, Low, Low, High],
    [High, Low, Low, High],
];

pub const SEQUENCE_LEN: usize = HALF_STEP_SEQUENCE.len();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_rows_change_one_switch() {
        // Half-stepping toggles exactly one switch between consecutive rows,
        // including the wrap from the last row back to the first.
        for i in 0..SEQUENCE_LEN {
            let a = HALF_STEP_SEQUENCE[i];
            let b = HALF_STEP_SEQUENCE[(i + 1) % SEQUENCE_LEN];
            let changed = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
            assert_eq!(changed, 1, "rows {i} and {} differ by {changed}", (i + 1) % SEQUENCE_LEN);
        }
    }

    #[test]
    fn no_row_shorts_a_phase() {
        // Both switches of one phase must never be on together.
        for (i, row) in HALF_STEP_SEQUENCE.iter().enumerate() {
            assert!(
                !(row[0] == High && row[1] == High),
                "row {i} shorts phase A"
            );
            assert!(
                !(row[2] == High && row[3] == High),
                "row {i} shorts phase B"
            );
        }
    }
}
