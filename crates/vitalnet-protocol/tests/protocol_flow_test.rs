//! End-to-end request and response flows at the protocol layer.
//!
//! Authorize, parse the host's answer, carry it into a settlement, and
//! parse the batch answer, without any transport in between.

mod common;

use rstest::rstest;
use vitalnet_core::{Error, constants::*};
use vitalnet_protocol::{
    Frame, ResponseKind, ResponseParser, SettlementRequest, Terminator, apply_even_parity, keys,
    lrc,
};

#[test]
fn test_authorization_request_wire_layout() {
    let request = common::authorization("0001", "10.99");
    let framed = request.build(&common::merchant()).unwrap();
    let bytes = framed.as_bytes();
    let n = bytes.len();

    assert_eq!(bytes[0], STX);
    assert_eq!(bytes[n - 2], ETX);
    assert_eq!(bytes[n - 1], lrc(&bytes[1..n - 1]));

    // 1-based positions 32-34 and 35-37 of the body
    let body = &framed[1..n - 2];
    assert_eq!(&body[31..34], "840");
    assert_eq!(&body[34..37], "840");
    assert!(body.contains("\x1C1099\x1C"));
    assert!(body.contains("8320Hwy441 85284"));
    assert!(body.ends_with("\x1C\x1C\x1C0147"));
}

#[test]
fn test_authorize_then_settle() {
    let merchant = common::merchant();

    let auth_response = ResponseParser::parse(&common::approved_response('Y')).unwrap();
    assert!(auth_response.is_approved());

    let settlement = SettlementRequest {
        card_number: "4111111111111111".to_string(),
        transaction_sequence: "0001".to_string(),
        batch_number: "1".to_string(),
        amount: Some(common::amount("10.99")),
        purchase_id: "ORDER-1".to_string(),
        at: Some(common::transmitted_at()),
        ..SettlementRequest::from_authorization(&auth_response)
    };
    let message = settlement.build(&merchant).unwrap();

    let detail_start =
        SETTLE_HEADER_LENGTH + SETTLE_PARAMETER_LENGTH + 2 * FRAME_OVERHEAD + 1;
    let detail = &message[detail_start..detail_start + SETTLE_DETAIL_LENGTH];
    assert!(detail.starts_with(SETTLE_DETAIL_PREFIX));
    assert_eq!(&detail[36..38], "A5");
    assert_eq!(&detail[44..50], "123456");
    assert_eq!(&detail[60..61], "Y");
    assert_eq!(&detail[61..76], "123456789012345");
    assert_eq!(&detail[76..80], "XY12");

    let batch_response = ResponseParser::parse(&common::accepted_response()).unwrap();
    assert!(batch_response.is_accepted());
    assert_eq!(batch_response.get(keys::BATCH_NET_DEPOSIT), Some("0000000000001099"));
}

#[test]
fn test_settlement_records_frame_individually() {
    let message = common::settlement("12", "5.00")
        .build(&common::merchant())
        .unwrap();
    let bytes = message.as_bytes();

    let mut offset = 0;
    for (expected_len, terminator) in [
        (SETTLE_HEADER_LENGTH, Terminator::EndOfBlock),
        (SETTLE_PARAMETER_LENGTH, Terminator::EndOfBlock),
        (SETTLE_DETAIL_LENGTH, Terminator::EndOfBlock),
        (SETTLE_TRAILER_LENGTH, Terminator::EndOfText),
    ] {
        let end = offset + expected_len + FRAME_OVERHEAD;
        let frame = Frame::parse(&bytes[offset..end]).unwrap();

        assert_eq!(frame.body().len(), expected_len);
        assert_eq!(frame.terminator(), terminator);
        assert!(frame.verify_checksum().is_ok());
        offset = end;
    }
    assert_eq!(offset, bytes.len());
}

#[rstest]
#[case::sequence(SettlementRequest { transaction_sequence: String::new(), ..common::settlement("1", "1.00") }, "Transaction Sequence Number")]
#[case::avs(SettlementRequest { avs_result_code: String::new(), ..common::settlement("1", "1.00") }, "Address Verification Result Code")]
fn test_settlement_mandatory_fields(#[case] request: SettlementRequest, #[case] field: &str) {
    match request.build(&common::merchant()) {
        Err(Error::MissingField(name)) => assert_eq!(name, field),
        other => panic!("Expected MissingField, got {other:?}"),
    }
}

#[test]
fn test_response_over_parity_link() {
    let wire = apply_even_parity(common::approved_response('Z').as_bytes());
    assert!(wire.iter().all(|b| b.count_ones() % 2 == 0));

    let response = ResponseParser::parse_bytes(&wire).unwrap();
    assert_eq!(response.kind(), ResponseKind::Authorization);
    assert_eq!(
        response.get(keys::AVS_RESULT_TEXT),
        Some("Five-digit zip match, address does not match")
    );
}

#[test]
fn test_rejected_batch_flow() {
    let text = common::batch_response("RB", "V0001H04");
    let response = ResponseParser::parse(&text).unwrap();

    assert_eq!(response.kind(), ResponseKind::BatchRejected);
    assert!(!response.is_accepted());
    assert_eq!(response.get(keys::ERROR_TYPE), Some("Routing error"));
    assert_eq!(response.get(keys::ERROR_RECORD_TYPE), Some("Header record"));
    assert_eq!(response.get(keys::ERROR_DATA_FIELD), Some("04"));
}

#[test]
fn test_duplicate_batch_flow() {
    let text = common::batch_response("QD", &format!("1128{:21}", ""));
    let response = ResponseParser::parse(&text).unwrap();

    assert_eq!(response.kind(), ResponseKind::BatchDuplicate);
    assert_eq!(response.get(keys::BATCH_NUMBER), Some("001"));
    assert_eq!(response.get(keys::BATCH_DATE), Some("1128"));
}

#[test]
fn test_unmatched_response_is_reported() {
    let text = "\x02K1.ZR@@@@garbled\x03?";

    match ResponseParser::parse(text) {
        Err(err @ Error::UnparseableResponse { .. }) => {
            assert!(err.to_string().starts_with("Un-matched response"));
        }
        other => panic!("Expected UnparseableResponse, got {other:?}"),
    }
}
