// storefront/src/flow/stage.rs

//! Definition of a single stage within a flow.

use super::FlowContext;
use std::fmt;
use std::sync::Arc;

/// The tag each stage carries, reported to `Flow::run_observed` observers when
/// it changes. Flows that don't need one use `()`.
pub trait StagePhase: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<P> StagePhase for P where P: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// Evaluated against the flow's context right before a stage runs. `true` skips it.
pub type SkipCondition<T> = Arc<dyn Fn(&FlowContext<T>) -> bool + Send + Sync + 'static>;

/// A named stage, the phase it belongs to, whether it may run without
/// handlers, and an optional skip condition.
#[derive(Clone)]
pub struct StageDef<T: 'static + Send + Sync, P: StagePhase = ()> {
  pub name: &'static str,
  pub phase: P,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync, P: StagePhase> StageDef<T, P> {
  pub fn required(name: &'static str, phase: P) -> Self {
    Self {
      name,
      phase,
      optional: false,
      skip_if: None,
    }
  }

  pub fn optional(name: &'static str, phase: P) -> Self {
    Self {
      name,
      phase,
      optional: true,
      skip_if: None,
    }
  }

  pub fn skip_if(mut self, condition: impl Fn(&FlowContext<T>) -> bool + Send + Sync + 'static) -> Self {
    self.skip_if = Some(Arc::new(condition));
    self
  }
}

// SkipCondition has no Debug; print its presence instead.
impl<T: 'static + Send + Sync, P: StagePhase> fmt::Debug for StageDef<T, P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StageDef")
      .field("name", &self.name)
      .field("phase", &self.phase)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
