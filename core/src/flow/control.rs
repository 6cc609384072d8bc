// storefront/src/flow/control.rs

//! Signals for controlling flow progress and the outcome of a flow run.

/// Returned by a stage handler to say whether the flow should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Run the remaining handlers of this stage and then the following stages.
  Continue,
  /// Halt immediately. No further handlers or stages run.
  Stop,
}

/// Outcome of a full flow execution that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every non-skipped stage ran to completion.
  Completed,
  /// A handler returned `FlowControl::Stop`.
  Stopped { at_stage: &'static str },
}
