// ABOUTME: StepState - where a step is in the decide/validate/execute protocol.
// ABOUTME: Reported by cancellation and timeout errors.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Position of a step within the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepState {
    AwaitingDecision,
    Responding,
    ToolSelected,
    ValidatingArguments,
    ExecutingTool,
    ToolCompleted,
    ToolFailed,
    Done,
}

impl StepState {
    const ALL: [StepState; 8] = [
        StepState::AwaitingDecision,
        StepState::Responding,
        StepState::ToolSelected,
        StepState::ValidatingArguments,
        StepState::ExecutingTool,
        StepState::ToolCompleted,
        StepState::ToolFailed,
        StepState::Done,
    ];

    fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepState::AwaitingDecision => "awaiting decision",
            StepState::Responding => "responding",
            StepState::ToolSelected => "tool selected",
            StepState::ValidatingArguments => "validating arguments",
            StepState::ExecutingTool => "executing tool",
            StepState::ToolCompleted => "tool completed",
            StepState::ToolFailed => "tool failed",
            StepState::Done => "done",
        };
        f.write_str(s)
    }
}

/// Shared cell recording the current state of a running step.
#[derive(Debug)]
pub(crate) struct StateTracker(AtomicU8);

impl StateTracker {
    pub(crate) fn new(state: StepState) -> Self {
        Self(AtomicU8::new(state.index()))
    }

    pub(crate) fn set(&self, state: StepState) {
        tracing::trace!(%state, "step state");
        self.0.store(state.index(), Ordering::Release);
    }

    pub(crate) fn get(&self) -> StepState {
        let index = usize::from(self.0.load(Ordering::Acquire));
        StepState::ALL.get(index).copied().unwrap_or(StepState::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_round_trips_every_state() {
        let tracker = StateTracker::new(StepState::AwaitingDecision);
        for state in StepState::ALL {
            tracker.set(state);
            assert_eq!(tracker.get(), state);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(StepState::ExecutingTool.to_string(), "executing tool");
        assert_eq!(StepState::AwaitingDecision.to_string(), "awaiting decision");
    }
}
