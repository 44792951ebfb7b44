//! Shared fixtures for the protocol integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use vitalnet_core::{Amount, Merchant};
use vitalnet_protocol::{AuthorizationRequest, SettlementRequest, Terminator, frame};

/// Test merchant as assigned by the acquirer's certification desk.
pub fn merchant() -> Merchant {
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
        state: "FL".to_string(),
        zip: "32601".to_string(),
        v_number: "00000001".to_string(),
        time_zone: "705".to_string(),
    }
}

pub fn amount(value: &str) -> Amount {
    value.parse().unwrap()
}

pub fn transmitted_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 28)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn authorization(sequence: &str, value: &str) -> AuthorizationRequest {
    AuthorizationRequest {
        transaction_sequence: sequence.to_string(),
        card_number: "4111111111111111".to_string(),
        expiration: "1228".to_string(),
        address: "8320 Hwy 441".to_string(),
        zip: "85284".to_string(),
        amount: amount(value),
    }
}

pub fn settlement(sequence: &str, value: &str) -> SettlementRequest {
    SettlementRequest {
        card_number: "4111111111111111".to_string(),
        transaction_sequence: sequence.to_string(),
        batch_number: "1".to_string(),
        response_code: "00".to_string(),
        approval_code: "123456".to_string(),
        avs_result_code: "Y".to_string(),
        amount: Some(amount(value)),
        purchase_id: "ORDER-1".to_string(),
        at: Some(transmitted_at()),
        ..SettlementRequest::default()
    }
}

/// An approved E-format authorization response as the host frames it.
pub fn approved_response(avs: char) -> String {
    let body = format!(
        "E4.A599915155000100{approval}112825093000APPROVAL {approval} {avs}533214000017A123456789012345\x1CXY12\x1C014",
        approval = "123456",
    );
    frame(&body, Terminator::EndOfText)
}

/// A batch trailer response with the given code and tail.
pub fn batch_response(code: &str, tail: &str) -> String {
    let body = format!("K1.ZR@@@@0000000040000000000001099{code}00001{tail}");
    frame(&body, Terminator::EndOfText)
}

pub fn accepted_response() -> String {
    batch_response("GB", &format!("{:<9}{:16}", "_ACCEPTED", ""))
}
