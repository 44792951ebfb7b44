//! Response classifier and parser.
//!
//! Inbound text is matched against five response shapes, always in this
//! order; the first match wins:
//!
//! 1. authorization (`E` format)
//! 2. batch accepted (`GB`)
//! 3. batch duplicate (`QD`)
//! 4. batch rejected (`RB`)
//! 5. generic gateway error (`<code> - <text>`)
//!
//! The three batch shapes share the prefix
//!
//! ```text
//! STX K1.ZR@@@@ <record count 9><net deposit 16><GB|QD|RB>00<batch 3>
//! ```
//!
//! The ETX/ETB and LRC that close a frame are removed before matching, and
//! the LRC is not checked.
//!
//! # Example
//!
//! ```
//! use vitalnet_protocol::{ResponseKind, ResponseParser};
//!
//! let response = ResponseParser::parse("906 - System error").unwrap();
//! assert_eq!(response.kind(), ResponseKind::Error);
//! assert_eq!(response.get("Code"), Some("906"));
//! assert_eq!(response.get("Text"), Some("System error"));
//!
//! assert!(ResponseParser::parse("garbage").is_err());
//! ```

use crate::codes::{AvsResult, BatchErrorRecordType, BatchErrorType};
use crate::parity::strip_parity;
use crate::response::{Response, ResponseKind, keys};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use vitalnet_core::{Error, Result, constants::*};

/// Regex escape for a control character
fn ctl(byte: u8) -> String {
    format!(r"\x{byte:02X}")
}

fn batch_prefix(code: &str) -> String {
    format!(
        r"(?s)\A{stx}K[13]\.ZR@@@@([0-9]{{9}})([0-9]{{16}}){code}00([0-9]{{3}})",
        stx = ctl(STX)
    )
}

/// Panics on a malformed pattern; every pattern is a literal compiled in tests.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => panic!("invalid response pattern {pattern:?}: {e}"),
    }
}

static AUTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        concat!(
            r"(?s)\A{stx}E[024]\.",
            r"([A-Z ])",             // returned ACI
            r"[0-9 ]{{4}}[0-9 ]{{4}}", // store, terminal
            r"(.)",                  // authorization source code
            r"[0-9 ]{{4}}",          // transaction sequence
            r"([0-9]{{2}})",         // response code
            r"([0-9A-Za-z ]{{6}})",  // approval code
            r"[0-9]{{6}}[0-9]{{6}}", // local date, local time
            r"([0-9A-Za-z ]{{16}})", // response text
            r"([0-9A-Z ])",          // AVS result code
            r"([0-9A-Za-z ]{{12}})", // retrieval reference number
            r"[0-9A-Za-z ]",         // market data identifier
            r"([0-9A-Za-z ]{{0,15}}){fs}",
            r"([0-9A-Za-z ]{{0,4}}){fs}",
            r"([0-9]{{3}})?",
            r"(.*)\z",
        ),
        stx = ctl(STX),
        fs = ctl(FS)
    ))
});

static ACCEPTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"{}([ _A-Z0-9]{{9}})[ 0-9]{{16}}(.*)\z",
        batch_prefix("GB")
    ))
});

static DUPLICATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"{}([0-9]{{4}}) {{21}}.*\z",
        batch_prefix("QD")
    ))
});

static REJECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"{}([A-Z])([0-9]{{4}})([A-Z])([0-9]{{2}})(.*)\z",
        batch_prefix("RB")
    ))
});

static ERROR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?s)\A([0-9]+)\s+-\s+(\S.*?)\s*\z"));

/// One response shape: the kind it yields, its pattern and its extractor.
struct Shape {
    kind: ResponseKind,
    pattern: &'static LazyLock<Regex>,
    extract: fn(&Captures<'_>, &mut Response),
}

/// Tried top to bottom.
static SHAPES: [Shape; 5] = [
    Shape {
        kind: ResponseKind::Authorization,
        pattern: &AUTH_RE,
        extract: extract_authorization,
    },
    Shape {
        kind: ResponseKind::BatchAccepted,
        pattern: &ACCEPTED_RE,
        extract: extract_accepted,
    },
    Shape {
        kind: ResponseKind::BatchDuplicate,
        pattern: &DUPLICATE_RE,
        extract: extract_duplicate,
    },
    Shape {
        kind: ResponseKind::BatchRejected,
        pattern: &REJECTED_RE,
        extract: extract_rejected,
    },
    Shape {
        kind: ResponseKind::Error,
        pattern: &ERROR_RE,
        extract: extract_error,
    },
];

/// Parser for gateway responses
pub struct ResponseParser;

impl ResponseParser {
    /// Classify and parse parity-stripped response text.
    ///
    /// # Errors
    /// Returns `Error::UnparseableResponse` carrying the raw text when no
    /// shape matches.
    pub fn parse(text: &str) -> Result<Response> {
        let body = without_trailer(text);

        for shape in &SHAPES {
            if let Some(caps) = shape.pattern.captures(body) {
                let mut response = Response::new(shape.kind);
                (shape.extract)(&caps, &mut response);
                return Ok(response);
            }
        }

        Err(Error::UnparseableResponse {
            raw: text.to_string(),
        })
    }

    /// Strip parity from raw wire bytes, then parse.
    ///
    /// # Errors
    /// Same as [`ResponseParser::parse`].
    pub fn parse_bytes(raw: &[u8]) -> Result<Response> {
        Self::parse(&decode(raw))
    }

    /// Which shape the text matches, without extracting fields.
    pub fn classify(text: &str) -> Option<ResponseKind> {
        let body = without_trailer(text);
        SHAPES
            .iter()
            .find(|shape| shape.pattern.is_match(body))
            .map(|shape| shape.kind)
    }
}

/// Strip parity and read the bytes as text.
pub fn decode(raw: &[u8]) -> String {
    String::from_utf8_lossy(&strip_parity(raw)).into_owned()
}

/// Drop a closing ETX/ETB and the LRC byte after it.
fn without_trailer(text: &str) -> &str {
    let bytes = text.as_bytes();
    let n = bytes.len();

    if n >= 2 && matches!(bytes[n - 2], ETX | ETB) && text.is_char_boundary(n - 1) {
        &text[..n - 2]
    } else if n >= 1 && matches!(bytes[n - 1], ETX | ETB) {
        &text[..n - 1]
    } else {
        text
    }
}

/// Trim spaces and control characters from both ends.
fn trim(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_ascii_whitespace() || c.is_ascii_control())
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn extract_authorization(caps: &Captures<'_>, response: &mut Response) {
    const FIELDS: [&str; 11] = [
        keys::RETURNED_ACI,
        keys::AUTH_SOURCE_CODE,
        keys::RESPONSE_CODE,
        keys::APPROVAL_CODE,
        keys::AUTH_RESPONSE_TEXT,
        keys::AVS_RESULT_CODE,
        keys::RETRIEVAL_REFERENCE_NUMBER,
        keys::TRANSACTION_IDENTIFIER,
        keys::VALIDATION_CODE,
        keys::GROUP_III_VERSION,
        keys::REMAINING,
    ];

    for (i, name) in FIELDS.iter().enumerate() {
        let value = group(caps, i + 1);
        response.push(*name, trim(value));

        if *name == keys::AVS_RESULT_CODE
            && let Some(avs) = AvsResult::from_code(value)
        {
            response.push(keys::AVS_RESULT_TEXT, avs.label());
        }
    }
}

fn push_batch_prefix(caps: &Captures<'_>, response: &mut Response) {
    response.push(keys::BATCH_RECORD_COUNT, trim(group(caps, 1)));
    response.push(keys::BATCH_NET_DEPOSIT, trim(group(caps, 2)));
    response.push(keys::BATCH_NUMBER, trim(group(caps, 3)));
}

fn extract_accepted(caps: &Captures<'_>, response: &mut Response) {
    push_batch_prefix(caps, response);
    response.push(keys::BATCH_RESPONSE_TEXT, trim(group(caps, 4)));
}

fn extract_duplicate(caps: &Captures<'_>, response: &mut Response) {
    push_batch_prefix(caps, response);
    response.push(keys::BATCH_DATE, group(caps, 4));
}

fn extract_rejected(caps: &Captures<'_>, response: &mut Response) {
    push_batch_prefix(caps, response);

    let error_type = group(caps, 4);
    response.push(
        keys::ERROR_TYPE,
        BatchErrorType::from_code(error_type).map_or(error_type, |t| t.label()),
    );
    response.push(keys::ERROR_RECORD_SEQUENCE, trim(group(caps, 5)));

    let record_type = group(caps, 6);
    response.push(
        keys::ERROR_RECORD_TYPE,
        BatchErrorRecordType::from_code(record_type).map_or(record_type, |t| t.label()),
    );
    response.push(keys::ERROR_DATA_FIELD, trim(group(caps, 7)));
    response.push(keys::ERROR_DATA, trim(group(caps, 8)));
}

fn extract_error(caps: &Captures<'_>, response: &mut Response) {
    response.push(keys::CODE, group(caps, 1));
    response.push(keys::TEXT, group(caps, 2));
}
