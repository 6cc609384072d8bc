// storefront/src/checkout/flow.rs

//! The checkout flow: one stage per step of a purchase, each tagged with the
//! checkout phase it belongs to.

use super::{CheckoutCtx, CheckoutError, CheckoutPhase};
use crate::flow::{Flow, FlowContext, FlowControl, FlowOutcome, StageDef};
use crate::metadata::{
  nft_collection_json, receipt_asset_name, NftReceipt, PurchaseMemo, LABEL_NFT, LABEL_PURCHASE_MEMO,
};
use crate::money::to_lovelace;
use crate::wallet::{MintInstruction, MintPolicy, Payment, TxHash, WalletApi};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const VALIDATE_PRECONDITIONS: &str = "validate_preconditions";
pub const RESOLVE_PAYER: &str = "resolve_payer";
pub const BUILD_PAYMENT: &str = "build_payment";
pub const ATTACH_PURCHASE_MEMO: &str = "attach_purchase_memo";
pub const MINT_RECEIPTS: &str = "mint_receipts";
pub const BUILD_TRANSACTION: &str = "build_transaction";
pub const SIGN_TRANSACTION: &str = "sign_transaction";
pub const SUBMIT_TRANSACTION: &str = "submit_transaction";

fn wallet_of(ctx: &FlowContext<CheckoutCtx>) -> Result<Arc<dyn WalletApi>, CheckoutError> {
  ctx.read().wallet.clone().ok_or(CheckoutError::NoWallet)
}

fn payer_of(ctx: &FlowContext<CheckoutCtx>) -> Result<String, CheckoutError> {
  ctx.read().payer.clone().ok_or(CheckoutError::NoPayerAddress)
}

/// Builds the checkout flow with all handlers registered.
///
/// Memo and receipt stages are skipped according to the run's `CheckoutSettings`.
pub fn checkout_flow() -> Flow<CheckoutCtx, CheckoutError, CheckoutPhase> {
  let mut flow = Flow::<CheckoutCtx, CheckoutError, CheckoutPhase>::new(vec![
    StageDef::required(VALIDATE_PRECONDITIONS, CheckoutPhase::Validating),
    StageDef::required(RESOLVE_PAYER, CheckoutPhase::Validating),
    StageDef::required(BUILD_PAYMENT, CheckoutPhase::Building),
    StageDef::optional(ATTACH_PURCHASE_MEMO, CheckoutPhase::Building)
      .skip_if(|ctx: &FlowContext<CheckoutCtx>| !ctx.read().settings.attach_memo),
    StageDef::optional(MINT_RECEIPTS, CheckoutPhase::Building)
      .skip_if(|ctx: &FlowContext<CheckoutCtx>| !ctx.read().settings.mint_receipts),
    StageDef::required(BUILD_TRANSACTION, CheckoutPhase::Building),
    StageDef::required(SIGN_TRANSACTION, CheckoutPhase::Signing),
    StageDef::required(SUBMIT_TRANSACTION, CheckoutPhase::Submitting),
  ]);

  // Local checks only. Nothing here may touch the wallet.
  flow.on(VALIDATE_PRECONDITIONS, |ctx: FlowContext<CheckoutCtx>| async move {
    let guard = ctx.read();
    if guard.wallet.is_none() {
      return Err(CheckoutError::NoWallet);
    }
    if guard.lines.is_empty() {
      return Err(CheckoutError::EmptyCart);
    }
    debug!(lines = guard.lines.len(), total = %guard.total, "Checkout preconditions satisfied.");
    Ok(FlowControl::Continue)
  });

  flow.on(RESOLVE_PAYER, |ctx: FlowContext<CheckoutCtx>| async move {
    let wallet = wallet_of(&ctx)?;
    let used = wallet.used_addresses().await?;
    let payer = used.into_iter().next().ok_or(CheckoutError::NoPayerAddress)?;
    debug!(payer = %payer, "Payer address resolved.");
    ctx.write().payer = Some(payer);
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  flow.on(BUILD_PAYMENT, |ctx: FlowContext<CheckoutCtx>| async move {
    ctx.update(|c| {
      let amount = to_lovelace(c.total)?;
      info!(recipient = %c.settings.seller_address, lovelace = %amount, "Payment added.");
      c.draft.payments.push(Payment {
        recipient: c.settings.seller_address.clone(),
        amount,
      });
      Ok::<_, CheckoutError>(())
    })?;
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  flow.on(ATTACH_PURCHASE_MEMO, |ctx: FlowContext<CheckoutCtx>| async move {
    let payer = payer_of(&ctx)?;
    ctx.update(|c| {
      let memo = PurchaseMemo::build(&c.lines, c.total, &payer, &c.settings.seller_address, c.started_at)?;
      debug!(lines = memo.msg.len(), "Purchase memo attached.");
      c.draft.metadata.insert(LABEL_PURCHASE_MEMO, memo.to_json());
      Ok::<_, CheckoutError>(())
    })?;
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  // One mint per purchased unit, never in place of the payment.
  flow.on(MINT_RECEIPTS, |ctx: FlowContext<CheckoutCtx>| async move {
    let payer = payer_of(&ctx)?;
    ctx.update(|c| {
      let mut entries = Vec::new();
      for line in &c.lines {
        let receipt = NftReceipt::for_product(&line.product, &c.settings.seller_name)?;
        for unit in 0..line.quantity {
          let asset_name = receipt_asset_name(&c.settings.nft_prefix, c.started_at, line.product.id, unit)?;
          c.draft.mints.push(MintInstruction {
            policy: MintPolicy::OneSignature { address: payer.clone() },
            asset_name: asset_name.clone(),
            quantity: 1,
          });
          entries.push((asset_name, receipt.clone()));
        }
      }
      if !entries.is_empty() {
        c.draft.metadata.insert(LABEL_NFT, nft_collection_json(&entries));
      }
      info!(receipts = entries.len(), "Receipt mints added.");
      Ok::<_, CheckoutError>(())
    })?;
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  flow.before(BUILD_TRANSACTION, |ctx: FlowContext<CheckoutCtx>| async move {
    let guard = ctx.read();
    debug!(
      payments = guard.draft.payments.len(),
      mints = guard.draft.mints.len(),
      labels = ?guard.draft.metadata.keys().collect::<Vec<_>>(),
      lovelace = %guard.draft.total_paid(),
      "Transaction draft ready for building."
    );
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  flow.on(BUILD_TRANSACTION, |ctx: FlowContext<CheckoutCtx>| async move {
    let wallet = wallet_of(&ctx)?;
    let draft = ctx.read().draft.clone();
    let unsigned = wallet.build_tx(&draft).await?;
    ctx.write().unsigned = Some(unsigned);
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  flow.on(SIGN_TRANSACTION, |ctx: FlowContext<CheckoutCtx>| async move {
    let wallet = wallet_of(&ctx)?;
    let unsigned = ctx
      .read()
      .unsigned
      .clone()
      .ok_or_else(|| CheckoutError::Flow("no unsigned transaction to sign".to_string()))?;
    let signed = wallet.sign_tx(&unsigned).await?;
    ctx.write().signed = Some(signed);
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  flow.on(SUBMIT_TRANSACTION, |ctx: FlowContext<CheckoutCtx>| async move {
    let wallet = wallet_of(&ctx)?;
    let signed = ctx
      .read()
      .signed
      .clone()
      .ok_or_else(|| CheckoutError::Flow("no signed transaction to submit".to_string()))?;
    let tx_hash = wallet.submit_tx(&signed).await?;
    info!(tx_hash = %tx_hash, "Transaction submitted.");
    ctx.write().tx_hash = Some(tx_hash);
    Ok::<_, CheckoutError>(FlowControl::Continue)
  });

  flow
}

/// Runs `flow` over `ctx` and returns the submitted transaction's hash.
#[instrument(name = "checkout::run", skip_all)]
pub async fn run_checkout(
  flow: &Flow<CheckoutCtx, CheckoutError, CheckoutPhase>,
  ctx: FlowContext<CheckoutCtx>,
  on_phase: &(dyn Fn(CheckoutPhase) + Send + Sync),
) -> Result<TxHash, CheckoutError> {
  match flow.run_observed(ctx.clone(), on_phase).await? {
    FlowOutcome::Completed => {
      let tx_hash = ctx.read().tx_hash.clone();
      tx_hash.ok_or_else(|| CheckoutError::Flow("checkout completed without a transaction hash".to_string()))
    }
    FlowOutcome::Stopped { at_stage } => {
      warn!(stage = at_stage, "Checkout stopped before submission.");
      Err(CheckoutError::Flow(format!("checkout stopped at stage '{}'", at_stage)))
    }
  }
}
