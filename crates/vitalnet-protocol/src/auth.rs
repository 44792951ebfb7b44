//! Authorization request (D format, card not present).
//!
//! The body is a 64-character fixed header followed by a variable customer
//! data section whose sub-fields are separated by FS:
//!
//! ```text
//! D4.<BIN><merchant><store><terminal>Q<industry>840840<zip 9>00<tz><MCC>Y<seq>56N@
//! <card>FS<exp>FS FS<address zip>FS FS<amount>FS FS FS<name 25><city 13><ST>FS FS FS 0147
//! ```

use crate::builder::RecordBuilder;
use crate::codes::{CountryCode, CurrencyCode, DeviceCode, Language};
use crate::field::{alphanumeric, ensure_ascii};
use crate::frame::{Terminator, frame};
use vitalnet_core::{Amount, Merchant, Result, constants::*};

/// Merchant zip width in the header
const ZIP_WIDTH: usize = 9;
/// Merchant city width in the customer data section
const CITY_WIDTH: usize = 13;
/// Merchant state width
const STATE_WIDTH: usize = 2;

/// One card-not-present authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Four-digit transaction sequence number, placed verbatim
    pub transaction_sequence: String,
    pub card_number: String,
    /// Expiration as printed on the card (MMYY)
    pub expiration: String,
    /// Cardholder street address; punctuation and spaces are dropped
    pub address: String,
    /// Cardholder zip
    pub zip: String,
    pub amount: Amount,
}

impl AuthorizationRequest {
    /// The 64-character fixed header.
    ///
    /// # Errors
    /// Returns `Error::InvalidField` for non-ASCII text, then
    /// `Error::LengthMismatch` ("Content") if merchant fields or the
    /// sequence number have the wrong widths.
    pub fn header(&self, merchant: &Merchant) -> Result<String> {
        self.ensure_ascii(merchant)?;

        RecordBuilder::new()
            .text(AUTH_RECORD_PREFIX)
            .text(&merchant.bin)
            .text(&merchant.merchant_number)
            .text(&merchant.store)
            .text(&merchant.terminal)
            .text(DeviceCode::ThirdPartySoftware.code())
            .text(&merchant.industry_code)
            .text(CurrencyCode::UsDollar.code())
            .text(CountryCode::UnitedStates.code())
            .left(&merchant.zip, ZIP_WIDTH)
            .text(Language::English.code())
            .text(&merchant.time_zone)
            .text(&merchant.category_code)
            .char(REQUESTED_ACI)
            .text(&self.transaction_sequence)
            .text(TRANSACTION_CODE_CARD_NOT_PRESENT)
            .char(CARDHOLDER_ID_AVS)
            .char(ACCOUNT_SOURCE_NO_READER)
            .build_exact("Content", AUTH_HEADER_LENGTH)
    }

    /// Every request and merchant field must be US-ASCII.
    ///
    /// # Errors
    /// `InvalidField` naming the first offending field.
    pub fn ensure_ascii(&self, merchant: &Merchant) -> Result<()> {
        ensure_ascii([
            ("transaction sequence number", self.transaction_sequence.as_str()),
            ("card number", self.card_number.as_str()),
            ("expiration date", self.expiration.as_str()),
            ("cardholder address", self.address.as_str()),
            ("cardholder zip", self.zip.as_str()),
        ])?;
        merchant.ensure_ascii()
    }

    /// Address verification block: sanitized address, a space, the zip.
    ///
    /// The address is cut so that address and zip together fit the budget.
    pub fn avs_data(&self) -> String {
        let address = alphanumeric(&self.address);
        let room = AVS_DATA_BUDGET.saturating_sub(self.zip.len());
        let address: String = address.chars().take(room).collect();
        format!("{address} {}", self.zip)
    }

    /// Unframed body: header plus customer data section.
    ///
    /// # Errors
    /// Propagates the header checks.
    pub fn body(&self, merchant: &Merchant) -> Result<String> {
        let header = self.header(merchant)?;

        let name: String = merchant
            .name
            .chars()
            .take(AUTH_MERCHANT_NAME_PRECISION)
            .collect();

        Ok(RecordBuilder::new()
            .text(&header)
            .text(&self.card_number)
            .separator()
            .text(&self.expiration)
            .separator()
            .separator()
            .text(&self.avs_data())
            .separators(2)
            .text(&self.amount.digits())
            .separators(3)
            .left(&name, AUTH_MERCHANT_NAME_WIDTH)
            .left(&merchant.city, CITY_WIDTH)
            .left(&merchant.state.to_ascii_uppercase(), STATE_WIDTH)
            .separators(3)
            .text(GROUP_III_MOTO_ECOMMERCE)
            .char(MOTO_INDICATOR)
            .build())
    }

    /// Framed request ready for parity encoding.
    ///
    /// # Errors
    /// Propagates the header checks.
    pub fn build(&self, merchant: &Merchant) -> Result<String> {
        let body = self.body(merchant)?;
        Ok(frame(&body, Terminator::EndOfText))
    }
}
