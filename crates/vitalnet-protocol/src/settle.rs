//! Single-card settlement batch (K format).
//!
//! A batch is four framed records sent as one message: header, parameters,
//! detail and trailer. Every record is checked against its exact length
//! before it is framed; the first three end in ETB, the trailer in ETX.

use crate::builder::RecordBuilder;
use crate::codes::{CountryCode, CurrencyCode, DeviceCode, Language};
use crate::field::ensure_ascii;
use crate::frame::Terminator;
use crate::response::{Response, keys};
use chrono::NaiveDateTime;
use vitalnet_core::{Amount, Error, Merchant, Result, constants::*};

const ZIP_WIDTH: usize = 9;
const NAME_WIDTH: usize = 25;
const CITY_WIDTH: usize = 13;
const STATE_WIDTH: usize = 2;
const BATCH_NUMBER_WIDTH: usize = 3;
const SEQUENCE_WIDTH: usize = 4;
const CARD_WIDTH: usize = 22;
const APPROVAL_CODE_WIDTH: usize = 6;
const TRANSACTION_ID_WIDTH: usize = 15;
const DETAIL_AMOUNT_WIDTH: usize = 12;
const PURCHASE_ID_WIDTH: usize = 25;
const RECORD_COUNT_WIDTH: usize = 9;
const TRAILER_AMOUNT_WIDTH: usize = 16;

/// Settlement of one previously authorized card.
///
/// Empty optional fields fall back to their protocol defaults. The
/// transaction sequence number and AVS result code are mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementRequest {
    pub card_number: String,
    pub transaction_sequence: String,
    /// Batch number, 001 to 999
    pub batch_number: String,
    /// Returned ACI from the authorization (default space)
    pub returned_aci: String,
    /// Authorization source code (default `6`)
    pub auth_source_code: String,
    pub response_code: String,
    pub approval_code: String,
    pub avs_result_code: String,
    /// Transaction identifier (default fifteen zeros)
    pub transaction_identifier: String,
    /// Validation code (default four spaces)
    pub validation_code: String,
    pub amount: Option<Amount>,
    pub purchase_id: String,
    pub void: bool,
    /// Transmission time; dates and times in every record derive from it
    pub at: Option<NaiveDateTime>,
}

impl SettlementRequest {
    /// Prefill the authorization-derived fields from an approved response.
    ///
    /// Card, sequence, batch, amount and purchase id stay for the caller.
    pub fn from_authorization(response: &Response) -> Self {
        let field = |name: &str| response.get(name).unwrap_or_default().to_string();

        SettlementRequest {
            returned_aci: field(keys::RETURNED_ACI),
            auth_source_code: field(keys::AUTH_SOURCE_CODE),
            response_code: field(keys::RESPONSE_CODE),
            approval_code: field(keys::APPROVAL_CODE),
            avs_result_code: field(keys::AVS_RESULT_CODE),
            transaction_identifier: field(keys::TRANSACTION_IDENTIFIER),
            validation_code: field(keys::VALIDATION_CODE),
            ..SettlementRequest::default()
        }
    }

    /// Every text field must be US-ASCII.
    ///
    /// # Errors
    /// `InvalidField` naming the first offending field.
    pub fn ensure_ascii(&self) -> Result<()> {
        ensure_ascii([
            ("card number", self.card_number.as_str()),
            ("transaction sequence number", self.transaction_sequence.as_str()),
            ("batch number", self.batch_number.as_str()),
            ("returned ACI", self.returned_aci.as_str()),
            ("authorization source code", self.auth_source_code.as_str()),
            ("response code", self.response_code.as_str()),
            ("approval code", self.approval_code.as_str()),
            ("AVS result code", self.avs_result_code.as_str()),
            ("transaction identifier", self.transaction_identifier.as_str()),
            ("validation code", self.validation_code.as_str()),
            ("purchase identifier", self.purchase_id.as_str()),
        ])
    }

    fn at(&self) -> Result<NaiveDateTime> {
        self.at
            .ok_or_else(|| Error::MissingField("Transmission Time".to_string()))
    }

    fn amount(&self) -> Result<Amount> {
        self.amount
            .ok_or_else(|| Error::MissingField("Amount".to_string()))
    }

    /// Header record (65).
    ///
    /// # Errors
    /// `InvalidField` for non-ASCII text, otherwise `LengthMismatch`
    /// naming `Header`.
    pub fn header(&self, merchant: &Merchant) -> Result<String> {
        self.ensure_ascii()?;
        merchant.ensure_ascii()?;
        let at = self.at()?;

        RecordBuilder::new()
            .text(SETTLE_HEADER_PREFIX)
            .text(&merchant.bin)
            .text(&merchant.agent_bank)
            .text(&merchant.agent_chain)
            .text(&merchant.merchant_number)
            .text(&merchant.store)
            .text(&merchant.terminal)
            .text(DeviceCode::Unknown.code())
            .text(&merchant.industry_code)
            .text(CurrencyCode::UsDollar.code())
            .text(Language::English.code())
            .text(&merchant.time_zone)
            .text(&at.format("%m%d").to_string())
            .right_zero(&self.batch_number, BATCH_NUMBER_WIDTH)
            .char(BLOCKING_NOT_BLOCKED)
            .build_framed("Header", SETTLE_HEADER_LENGTH, Terminator::EndOfBlock)
    }

    /// Parameter record (78).
    ///
    /// # Errors
    /// `InvalidField` for non-ASCII text, otherwise `LengthMismatch`
    /// naming `Parameters`.
    pub fn parameters(&self, merchant: &Merchant) -> Result<String> {
        merchant.ensure_ascii()?;

        RecordBuilder::new()
            .text(SETTLE_PARAMETER_PREFIX)
            .text(CountryCode::UnitedStates.code())
            .left(&merchant.zip, ZIP_WIDTH)
            .text(&merchant.category_code)
            .left(&merchant.name.to_ascii_uppercase(), NAME_WIDTH)
            .left(&merchant.city.to_ascii_uppercase(), CITY_WIDTH)
            .left(&merchant.state.to_ascii_uppercase(), STATE_WIDTH)
            .text(MERCHANT_LOCATION_NUMBER)
            .text(&merchant.v_number)
            .build_framed("Parameters", SETTLE_PARAMETER_LENGTH, Terminator::EndOfBlock)
    }

    /// Detail record (151).
    ///
    /// # Errors
    /// `MissingField` for the sequence number or AVS code, `InvalidField`
    /// for non-ASCII text, otherwise `LengthMismatch` naming `Detail`.
    pub fn detail(&self) -> Result<String> {
        if self.transaction_sequence.is_empty() {
            return Err(Error::MissingField(
                "Transaction Sequence Number".to_string(),
            ));
        }
        if self.avs_result_code.is_empty() {
            return Err(Error::MissingField(
                "Address Verification Result Code".to_string(),
            ));
        }

        self.ensure_ascii()?;
        let at = self.at()?;
        let amount = self.amount()?.digits();

        RecordBuilder::new()
            .text(SETTLE_DETAIL_PREFIX)
            .text(TRANSACTION_CODE_CARD_NOT_PRESENT)
            .char(CARDHOLDER_ID_AVS)
            .char(ACCOUNT_SOURCE_NO_READER)
            .left(&self.card_number, CARD_WIDTH)
            .char(REQUESTED_ACI)
            .text(or_default(&self.returned_aci, DEFAULT_RETURNED_ACI))
            .text(or_default(&self.auth_source_code, DEFAULT_AUTH_SOURCE_CODE))
            .right_zero(&self.transaction_sequence, SEQUENCE_WIDTH)
            .text(&self.response_code)
            .left(&self.approval_code, APPROVAL_CODE_WIDTH)
            .text(&at.format("%m%d").to_string())
            .text(&at.format("%H%M%S").to_string())
            .text(&self.avs_result_code)
            .left(
                or_default(&self.transaction_identifier, DEFAULT_TRANSACTION_ID),
                TRANSACTION_ID_WIDTH,
            )
            .text(or_default(&self.validation_code, DEFAULT_VALIDATION_CODE))
            .char(if self.void { VOID_MARKER } else { ' ' })
            .text(TRANSACTION_STATUS)
            .char(REIMBURSEMENT_ATTRIBUTE)
            .right_zero(&amount, DETAIL_AMOUNT_WIDTH)
            .right_zero(&amount, DETAIL_AMOUNT_WIDTH)
            .right_zero(&amount, DETAIL_AMOUNT_WIDTH)
            .char(PURCHASE_ID_FORMAT)
            .left(&self.purchase_id, PURCHASE_ID_WIDTH)
            .text(CLEARING_SEQUENCE)
            .text(CLEARING_SEQUENCE)
            .char(MOTO_INDICATOR)
            .build_framed("Detail", SETTLE_DETAIL_LENGTH, Terminator::EndOfBlock)
    }

    /// Trailer record (73).
    ///
    /// # Errors
    /// `InvalidField` for non-ASCII text, otherwise `LengthMismatch`
    /// naming `Trailer`.
    pub fn trailer(&self) -> Result<String> {
        self.ensure_ascii()?;
        let at = self.at()?;
        let amount = self.amount()?.digits();

        RecordBuilder::new()
            .text(SETTLE_TRAILER_PREFIX)
            .text(&at.format("%m%d").to_string())
            .right_zero(&self.batch_number, BATCH_NUMBER_WIDTH)
            .right_zero(&BATCH_RECORD_COUNT.to_string(), RECORD_COUNT_WIDTH)
            .right_zero(&amount, TRAILER_AMOUNT_WIDTH)
            .right_zero("", TRAILER_AMOUNT_WIDTH)
            .right_zero(&amount, TRAILER_AMOUNT_WIDTH)
            .build_framed("Trailer", SETTLE_TRAILER_LENGTH, Terminator::EndOfText)
    }

    /// All four framed records, concatenated.
    ///
    /// # Errors
    /// The first failing record's error.
    pub fn build(&self, merchant: &Merchant) -> Result<String> {
        let mut message = self.header(merchant)?;
        message.push_str(&self.parameters(merchant)?);
        message.push_str(&self.detail()?);
        message.push_str(&self.trailer()?);
        Ok(message)
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::response::ResponseKind;
    use chrono::NaiveDate;

    fn merchant() -> Merchant {
        Merchant {
            bin: "999995".to_string(),
            agent_bank: "000000".to_string(),
            agent_chain: "111111".to_string(),
            merchant_number: "999999999911".to_string(),
            store: "5999".to_string(),
            terminal: "1515".to_string(),
            industry_code: "D".to_string(),
            category_code: "5999".to_string(),
            name: "Acme Widgets".to_string(),
            city: "Gainesville".to_string(),
            state: "fl".to_string(),
            zip: "32601".to_string(),
            v_number: "00000001".to_string(),
            time_zone: "705".to_string(),
        }
    }

    fn request() -> SettlementRequest {
        SettlementRequest {
            card_number: "4111111111111111".to_string(),
            transaction_sequence: "1".to_string(),
            batch_number: "7".to_string(),
            response_code: "00".to_string(),
            approval_code: "12345".to_string(),
            avs_result_code: "Y".to_string(),
            amount: Some("12.34".parse().unwrap()),
            purchase_id: "INV-1".to_string(),
            at: NaiveDate::from_ymd_opt(2025, 3, 9)
                .unwrap()
                .and_hms_opt(14, 5, 6),
            ..SettlementRequest::default()
        }
    }

    fn body(framed: &str) -> String {
        let frame = Frame::parse(framed.as_bytes()).unwrap();
        String::from_utf8(frame.body().to_vec()).unwrap()
    }

    #[test]
    fn test_header_record() {
        let framed = request().header(&merchant()).unwrap();
        let header = body(&framed);

        assert_eq!(header.len(), 65);
        assert!(header.starts_with("K1.ZH@@@@999995000000111111999999999911"));
        assert_eq!(&header[47..48], "0");
        assert_eq!(&header[49..52], "840");
        assert_eq!(&header[57..61], "0309");
        assert_eq!(&header[61..64], "007");
        assert_eq!(&header[64..65], "0");
        assert_eq!(framed.as_bytes()[66], ETB);
    }

    #[test]
    fn test_parameter_record() {
        let params = body(&request().parameters(&merchant()).unwrap());

        assert_eq!(params.len(), 78);
        assert_eq!(&params[9..12], "840");
        assert_eq!(&params[12..21], "32601    ");
        assert_eq!(&params[25..50], format!("{:<25}", "ACME WIDGETS"));
        assert_eq!(&params[50..63], "GAINESVILLE  ");
        assert_eq!(&params[63..65], "FL");
        assert_eq!(&params[65..78], "0000100000001");
    }

    #[test]
    fn test_detail_record_defaults() {
        let detail = body(&request().detail().unwrap());

        assert_eq!(detail.len(), 151);
        assert_eq!(&detail[0..13], "K1.ZD@@`D56N@");
        assert_eq!(&detail[13..35], format!("{:<22}", "4111111111111111"));
        assert_eq!(&detail[35..36], "Y");
        assert_eq!(&detail[36..37], " ");
        assert_eq!(&detail[37..38], "6");
        assert_eq!(&detail[38..42], "0001");
        assert_eq!(&detail[42..44], "00");
        assert_eq!(&detail[44..50], "12345 ");
        assert_eq!(&detail[50..54], "0309");
        assert_eq!(&detail[54..60], "140506");
        assert_eq!(&detail[60..61], "Y");
        assert_eq!(&detail[61..76], "000000000000000");
        assert_eq!(&detail[76..80], "    ");
        assert_eq!(&detail[80..81], " ");
        assert_eq!(&detail[81..84], "000");
        assert_eq!(&detail[84..96], "000000001234");
        assert_eq!(&detail[96..108], "000000001234");
        assert_eq!(&detail[108..120], "000000001234");
        assert_eq!(&detail[120..121], "0");
        assert_eq!(&detail[121..146], format!("{:<25}", "INV-1"));
        assert_eq!(&detail[146..151], "01017");
    }

    #[test]
    fn test_detail_void_and_overrides() {
        let request = SettlementRequest {
            void: true,
            returned_aci: "E".to_string(),
            auth_source_code: "5".to_string(),
            transaction_identifier: "012345678901234".to_string(),
            validation_code: "AB12".to_string(),
            ..request()
        };
        let detail = body(&request.detail().unwrap());

        assert_eq!(&detail[36..38], "E5");
        assert_eq!(&detail[61..76], "012345678901234");
        assert_eq!(&detail[76..80], "AB12");
        assert_eq!(&detail[80..81], "V");
    }

    #[test]
    fn test_detail_missing_sequence() {
        let request = SettlementRequest {
            transaction_sequence: String::new(),
            ..request()
        };
        match request.detail() {
            Err(Error::MissingField(name)) => assert_eq!(name, "Transaction Sequence Number"),
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_detail_missing_avs() {
        let request = SettlementRequest {
            avs_result_code: String::new(),
            ..request()
        };
        match request.build(&merchant()) {
            Err(Error::MissingField(name)) => {
                assert_eq!(name, "Address Verification Result Code")
            }
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_non_ascii_purchase_id_rejected() {
        let request = SettlementRequest {
            purchase_id: "Commande-é".to_string(),
            ..request()
        };

        match request.detail() {
            Err(Error::InvalidField { field, .. }) => assert_eq!(field, "purchase identifier"),
            other => panic!("Expected InvalidField, got {other:?}"),
        }
        assert!(request.build(&merchant()).is_err());
    }

    #[test]
    fn test_non_ascii_merchant_rejected() {
        let merchant = Merchant {
            city: "Montréal".to_string(),
            ..merchant()
        };

        let err = request().build(&merchant).unwrap_err();
        assert_eq!(err.to_string(), "Invalid merchant city: must be US-ASCII");
        assert!(request().parameters(&merchant).is_err());
    }

    #[test]
    fn test_detail_bad_response_code_length() {
        let request = SettlementRequest {
            response_code: "0".to_string(),
            ..request()
        };
        let err = request.detail().unwrap_err();
        assert_eq!(err.to_string(), "Detail length is 150 and should be 151");
    }

    #[test]
    fn test_trailer_record() {
        let trailer = body(&request().trailer().unwrap());

        assert_eq!(trailer.len(), 73);
        assert_eq!(&trailer[0..9], "K1.ZT@@@@");
        assert_eq!(&trailer[9..13], "0309");
        assert_eq!(&trailer[13..16], "007");
        assert_eq!(&trailer[16..25], "000000004");
        assert_eq!(&trailer[25..41], "0000000000001234");
        assert_eq!(&trailer[41..57], "0000000000000000");
        assert_eq!(&trailer[57..73], "0000000000001234");
    }

    #[test]
    fn test_build_concatenates_four_records() {
        let message = request().build(&merchant()).unwrap();
        let bytes = message.as_bytes();

        assert_eq!(bytes.len(), 65 + 78 + 151 + 73 + 4 * FRAME_OVERHEAD);
        assert_eq!(bytes.iter().filter(|&&b| b == STX).count(), 4);
        assert_eq!(bytes.iter().filter(|&&b| b == ETB).count(), 3);
        assert_eq!(bytes[bytes.len() - 2], ETX);
    }

    #[test]
    fn test_bad_merchant_fails_header() {
        let merchant = Merchant {
            bin: "9999".to_string(),
            ..merchant()
        };
        let err = request().build(&merchant).unwrap_err();
        assert_eq!(err.to_string(), "Header length is 63 and should be 65");
    }

    #[test]
    fn test_from_authorization() {
        let mut auth = Response::new(ResponseKind::Authorization);
        auth.push(keys::RETURNED_ACI, "E");
        auth.push(keys::AUTH_SOURCE_CODE, "5");
        auth.push(keys::RESPONSE_CODE, "00");
        auth.push(keys::APPROVAL_CODE, "TAS123");
        auth.push(keys::AVS_RESULT_CODE, "Y");
        auth.push(keys::TRANSACTION_IDENTIFIER, "012345678901234");
        auth.push(keys::VALIDATION_CODE, "AB12");

        let request = SettlementRequest::from_authorization(&auth);

        assert_eq!(request.returned_aci, "E");
        assert_eq!(request.auth_source_code, "5");
        assert_eq!(request.response_code, "00");
        assert_eq!(request.approval_code, "TAS123");
        assert_eq!(request.avs_result_code, "Y");
        assert_eq!(request.transaction_identifier, "012345678901234");
        assert_eq!(request.validation_code, "AB12");
        assert!(request.card_number.is_empty());
        assert!(request.amount.is_none());
    }
}
