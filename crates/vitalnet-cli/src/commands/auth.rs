//! `vitalnet auth`: authorize a card-not-present purchase.

use anyhow::Context;
use vitalnet_client::Gateway;
use vitalnet_core::Amount;
use vitalnet_protocol::AuthorizationRequest;

use super::{HostTransport, print_json, reply_json, wire_hex};
use crate::config::Config;

#[derive(clap::Args, Debug)]
pub struct AuthArgs {
    /// Card number
    #[arg(long)]
    pub card: String,

    /// Expiration date (MMYY)
    #[arg(long)]
    pub expiration: String,

    /// Amount in dollars, e.g. 10.99
    #[arg(long)]
    pub amount: Amount,

    /// Transaction sequence number (4 digits)
    #[arg(long, default_value = "0001")]
    pub sequence: String,

    /// Cardholder street address for AVS
    #[arg(long, default_value = "")]
    pub address: String,

    /// Cardholder zip code for AVS
    #[arg(long, default_value = "")]
    pub zip: String,

    /// Print the encoded request as hex instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl AuthArgs {
    pub fn request(&self) -> AuthorizationRequest {
        AuthorizationRequest {
            transaction_sequence: self.sequence.clone(),
            card_number: self.card.clone(),
            expiration: self.expiration.clone(),
            address: self.address.clone(),
            zip: self.zip.clone(),
            amount: self.amount,
        }
    }
}

pub async fn run(args: AuthArgs, config: Config) -> anyhow::Result<()> {
    let request = args.request();

    if args.dry_run {
        let message = request
            .build(&config.merchant)
            .context("Failed to build authorization request")?;
        println!("{}", wire_hex(&message));
        return Ok(());
    }

    let transport = HostTransport::from_config(&config.gateway)?;
    let gateway = Gateway::new(config.merchant, transport);
    let reply = gateway.authorize(&request).await?;

    print_json(&reply_json(&reply))
}
