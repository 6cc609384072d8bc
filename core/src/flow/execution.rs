// storefront/src/flow/execution.rs

//! `Flow::run()`: executes stages in order against a shared context.

use super::definition::{Flow, Handler};
use super::hooks::HookPhase;
use super::{FlowContext, FlowControl, FlowOutcome, StagePhase};
use crate::error::FlowError;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<T, Err, P> Flow<T, Err, P>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
  P: StagePhase,
{
  /// Runs every stage in order.
  pub async fn run(&self, ctx: FlowContext<T>) -> Result<FlowOutcome, Err> {
    self.run_observed(ctx, &|_| {}).await
  }

  /// Runs every stage in order, calling `on_phase` each time execution enters a
  /// stage whose phase differs from the previous executed stage.
  ///
  /// A required stage with no handlers at all fails with `FlowError::HandlerMissing`.
  /// An optional stage with no handlers is skipped.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<T>(),
      num_stages = self.stages.len(),
    ),
    err(Display)
  )]
  pub async fn run_observed(
    &self,
    ctx: FlowContext<T>,
    on_phase: &(dyn Fn(P) + Send + Sync),
  ) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");
    let mut current_phase: Option<P> = None;

    for (stage_idx, stage) in self.stages.iter().enumerate() {
      if let Some(skip) = &stage.skip_if {
        if skip(&ctx) {
          event!(Level::DEBUG, stage = stage.name, "Stage skipped by its skip condition.");
          continue;
        }
      }

      if !self.has_handlers(stage.name) {
        if stage.optional {
          event!(Level::DEBUG, stage = stage.name, "Optional stage has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, stage = stage.name, "Required stage has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          stage_name: stage.name.to_string(),
        }));
      }

      if current_phase != Some(stage.phase) {
        current_phase = Some(stage.phase);
        on_phase(stage.phase);
      }

      let span = info_span!("flow_stage", stage = stage.name, stage_index = stage_idx, phase = ?stage.phase);
      let control = self.run_stage(stage.name, &ctx).instrument(span).await?;
      if control == FlowControl::Stop {
        event!(Level::INFO, stage = stage.name, "Flow stopped by a handler.");
        return Ok(FlowOutcome::Stopped { at_stage: stage.name });
      }
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_stage(&self, stage_name: &'static str, ctx: &FlowContext<T>) -> Result<FlowControl, Err> {
    for (hook, map) in [
      (HookPhase::Before, &self.before),
      (HookPhase::On, &self.on),
      (HookPhase::After, &self.after),
    ] {
      let handlers: &[Handler<T, Err>] = map.get(stage_name).map(Vec::as_slice).unwrap_or_default();
      for (handler_idx, handler) in handlers.iter().enumerate() {
        match handler(ctx.clone()).await {
          Ok(FlowControl::Continue) => {}
          Ok(FlowControl::Stop) => {
            event!(Level::DEBUG, ?hook, handler_index = handler_idx, "Handler requested stop.");
            return Ok(FlowControl::Stop);
          }
          Err(e) => {
            event!(Level::ERROR, ?hook, handler_index = handler_idx, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }
    Ok(FlowControl::Continue)
  }
}
