//! The discrete position command decoded from the RC signal.

/// Three-level position command, plus the indeterminate case.
///
/// `Invalid` must never cause physical motion: every consumer treats it as
/// "hold outputs low".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionCommand {
    /// Minimum pulse width (e.g. extend the gripper / tilt up).
    Min,
    /// Intermediate pulse width; lock the current position.
    Mid,
    /// Maximum pulse width (e.g. retract the gripper / tilt down).
    Max,
    /// Pulse outside every tolerance band, or debounce not yet persistent.
    Invalid,
}

impl PositionCommand {
    /// Stable numeric code used in logs and telemetry (matches the original
    /// controller's convention: 0/1/2, -1 for invalid).
    pub const fn as_code(self) -> i8 {
        match self {
            Self::Min => 0,
            Self::Mid => 1,
            Self::Max => 2,
            Self::Invalid => -1,
        }
    }

    pub const fn from_code(code: i8) -> Self {
        match code {
            0 => Self::Min,
            1 => Self::Mid,
            2 => Self::Max,
            _ => Self::Invalid,
        }
    }

    /// Whether this command may drive an actuator at all.
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::Min | Self::Max)
    }
}

impl std::fmt::Display for PositionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Min => "min",
            Self::Mid => "mid",
            Self::Max => "max",
            Self::Invalid => "invalid",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::PositionCommand;

    #[test]
    fn codes_round_trip() {
        for cmd in [
            PositionCommand::Min,
            PositionCommand::Mid,
            PositionCommand::Max,
            PositionCommand::Invalid,
        ] {
            assert_eq!(PositionCommand::from_code(cmd.as_code()), cmd);
        }
    }

    #[test]
    fn unknown_codes_are_invalid() {
        assert_eq!(PositionCommand::from_code(7), PositionCommand::Invalid);
        assert_eq!(PositionCommand::from_code(-3), PositionCommand::Invalid);
    }
}
