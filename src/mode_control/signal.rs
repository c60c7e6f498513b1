use crate::flight_control::ModeKind;

/// Result of one controller frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSignal {
    /// Time is paused or no level is active, nothing was touched.
    Idle,
    Continue,
    Transition(ModeKind),
    Terminated,
}
