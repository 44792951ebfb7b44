//! `vitalnet settle`: settle one authorized card.
//!
//! Authorization results can be given one by one or read from a saved raw
//! authorization response with `--from-response`; explicit flags win.

use anyhow::{Context, bail};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use vitalnet_client::Gateway;
use vitalnet_core::Amount;
use vitalnet_protocol::{Response, ResponseKind, ResponseParser, SettlementRequest};

use super::{HostTransport, print_json, reply_json, wire_hex};
use crate::config::Config;

#[derive(clap::Args, Debug, Default)]
pub struct SettleArgs {
    /// Card number
    #[arg(long)]
    pub card: String,

    /// Amount in dollars, e.g. 10.99
    #[arg(long)]
    pub amount: Option<Amount>,

    /// Transaction sequence number of the authorization
    #[arg(long)]
    pub sequence: String,

    /// Batch number (001-999)
    #[arg(long, default_value = "1")]
    pub batch: String,

    /// Raw authorization response to take the approval details from
    #[arg(long)]
    pub from_response: Option<PathBuf>,

    #[arg(long)]
    pub response_code: Option<String>,

    #[arg(long)]
    pub approval_code: Option<String>,

    #[arg(long)]
    pub avs_code: Option<String>,

    #[arg(long)]
    pub returned_aci: Option<String>,

    #[arg(long)]
    pub auth_source: Option<String>,

    #[arg(long)]
    pub transaction_id: Option<String>,

    #[arg(long)]
    pub validation_code: Option<String>,

    /// Purchase identifier (order number)
    #[arg(long, default_value = "")]
    pub purchase_id: String,

    /// Settle as a void
    #[arg(long)]
    pub void: bool,

    /// Transmission time, e.g. 2025-11-28T09:30:00 (default: now)
    #[arg(long)]
    pub at: Option<NaiveDateTime>,

    /// Print the encoded request as hex instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl SettleArgs {
    /// Build the request on top of an optional parsed authorization.
    pub fn request(&self, authorization: Option<&Response>) -> SettlementRequest {
        let base = authorization
            .map(SettlementRequest::from_authorization)
            .unwrap_or_default();
        let pick = |flag: &Option<String>, fallback: String| flag.clone().unwrap_or(fallback);

        SettlementRequest {
            card_number: self.card.clone(),
            transaction_sequence: self.sequence.clone(),
            batch_number: self.batch.clone(),
            returned_aci: pick(&self.returned_aci, base.returned_aci),
            auth_source_code: pick(&self.auth_source, base.auth_source_code),
            response_code: pick(&self.response_code, base.response_code),
            approval_code: pick(&self.approval_code, base.approval_code),
            avs_result_code: pick(&self.avs_code, base.avs_result_code),
            transaction_identifier: pick(&self.transaction_id, base.transaction_identifier),
            validation_code: pick(&self.validation_code, base.validation_code),
            amount: self.amount,
            purchase_id: self.purchase_id.clone(),
            void: self.void,
            at: self.at,
        }
    }

    fn authorization(&self) -> anyhow::Result<Option<Response>> {
        let Some(path) = &self.from_response else {
            return Ok(None);
        };

        let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let response = ResponseParser::parse_bytes(&raw)?;
        if response.kind() != ResponseKind::Authorization {
            bail!("{} holds a {} response", path.display(), response.kind());
        }
        Ok(Some(response))
    }
}

pub async fn run(args: SettleArgs, config: Config) -> anyhow::Result<()> {
    let authorization = args.authorization()?;
    let mut request = args.request(authorization.as_ref());

    if args.dry_run {
        if request.at.is_none() {
            request.at = Some(Local::now().naive_local());
        }
        let message = request
            .build(&config.merchant)
            .context("Failed to build settlement request")?;
        println!("{}", wire_hex(&message));
        return Ok(());
    }

    let transport = HostTransport::from_config(&config.gateway)?;
    let gateway = Gateway::new(config.merchant, transport);
    let reply = gateway.settle(&request).await?;

    print_json(&reply_json(&reply))
}
