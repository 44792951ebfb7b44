//! Core constants for the VitalNet EIS 1080/1081 protocol implementation.
//!
//! This module defines the control characters, record lengths and fixed
//! protocol literals shared by the request builders and the response parser.
//!
//! # Protocol Structure
//!
//! Every record travels inside the same framing:
//!
//! ```text
//! <STX>BODY<ETX|ETB><LRC>
//! ```
//!
//! Where:
//! - `<STX>` - Start of text marker (0x02)
//! - `BODY` - Fixed-width fields, optionally separated by `<FS>` / `<GS>`
//! - `<ETX>` - End of text (0x03), closes the last record of a message
//! - `<ETB>` - End of transmission block (0x17), closes intermediate records
//! - `<LRC>` - XOR of every byte of `BODY` plus the terminator
//!
//! # Control Characters
//!
//! | Constant | Value | Purpose |
//! |----------|-------|---------|
//! | `STX` | 0x02 | Opens every record |
//! | `ETX` | 0x03 | Closes the final record |
//! | `ETB` | 0x17 | Closes header/parameter/detail settlement records |
//! | `FS`  | 0x1C | Separates variable authorization fields |
//! | `GS`  | 0x1D | Separates Group III addenda |
//!
//! # Usage
//!
//! ```
//! use vitalnet_core::constants::*;
//!
//! assert_eq!(STX, 0x02);
//! assert_eq!(AUTH_HEADER_LENGTH, 64);
//! assert_eq!(MIME_AUTH, "x-Visa-II/x-auth");
//! ```

// ============================================================================
// Control Characters
// ============================================================================

/// Start of text marker (STX).
pub const STX: u8 = 0x02;

/// End of text marker (ETX).
///
/// Terminates an authorization record and the trailer record of a
/// settlement message.
pub const ETX: u8 = 0x03;

/// End of transmission block marker (ETB).
///
/// Terminates every settlement record except the trailer.
pub const ETB: u8 = 0x17;

/// Field separator (FS).
pub const FS: u8 = 0x1C;

/// Group separator (GS).
pub const GS: u8 = 0x1D;

/// Mask that clears the parity bit of a transmitted byte.
pub const DATA_BITS_MASK: u8 = 0x7F;

/// Parity bit of a transmitted byte.
pub const PARITY_BIT: u8 = 0x80;

/// Bytes added by framing around a record body: STX, terminator and LRC.
pub const FRAME_OVERHEAD: usize = 3;

// ============================================================================
// Record Lengths
// ============================================================================

/// Fixed header length of a "D" format authorization request.
pub const AUTH_HEADER_LENGTH: usize = 64;

/// Length of the "K" format settlement header record.
pub const SETTLE_HEADER_LENGTH: usize = 65;

/// Length of the "K" format settlement parameter record.
pub const SETTLE_PARAMETER_LENGTH: usize = 78;

/// Length of the "K" format settlement detail record.
pub const SETTLE_DETAIL_LENGTH: usize = 151;

/// Length of the "K" format settlement trailer record.
pub const SETTLE_TRAILER_LENGTH: usize = 73;

/// Combined budget for address text plus zip in the AVS block.
///
/// The address is truncated so that `address.len() + zip.len()` never
/// exceeds this value; a single space then separates the two.
pub const AVS_DATA_BUDGET: usize = 28;

// ============================================================================
// Authorization Literals
// ============================================================================

/// Record format `D`, application type `4` (interleaved), delimiter `.`.
pub const AUTH_RECORD_PREFIX: &str = "D4.";

/// Requested ACI: device is CPS capable.
pub const REQUESTED_ACI: char = 'Y';

/// Transaction code 56: card not present.
pub const TRANSACTION_CODE_CARD_NOT_PRESENT: &str = "56";

/// Cardholder identification code `N`: address verification data.
pub const CARDHOLDER_ID_AVS: char = 'N';

/// Account data source `@`: no card reader.
pub const ACCOUNT_SOURCE_NO_READER: char = '@';

/// Group III version 014: MOTO / electronic commerce.
pub const GROUP_III_MOTO_ECOMMERCE: &str = "014";

/// MOTO / electronic commerce indicator 7: channel encrypted, non-authenticated.
pub const MOTO_INDICATOR: char = '7';

/// Merchant name characters carried in an authorization request.
pub const AUTH_MERCHANT_NAME_PRECISION: usize = 15;

/// Width of the merchant name block in an authorization request.
pub const AUTH_MERCHANT_NAME_WIDTH: usize = 25;

// ============================================================================
// Settlement Literals
// ============================================================================

/// Header record prefix: format `K`, single batch, delimiter, routing `Z`, type `H@@@@`.
pub const SETTLE_HEADER_PREFIX: &str = "K1.ZH@@@@";

/// Parameter record prefix.
pub const SETTLE_PARAMETER_PREFIX: &str = "K1.ZP@@@@";

/// Detail record prefix (electronic commerce detail `D@@` + "`D").
pub const SETTLE_DETAIL_PREFIX: &str = "K1.ZD@@`D";

/// Trailer record prefix.
pub const SETTLE_TRAILER_PREFIX: &str = "K1.ZT@@@@";

/// Blocking indicator: not blocked.
pub const BLOCKING_NOT_BLOCKED: char = '0';

/// Merchant location number.
pub const MERCHANT_LOCATION_NUMBER: &str = "00001";

/// Void indicator marker; a space means not voided.
pub const VOID_MARKER: char = 'V';

/// Transaction status code.
pub const TRANSACTION_STATUS: &str = "00";

/// Reimbursement attribute.
pub const REIMBURSEMENT_ATTRIBUTE: char = '0';

/// Purchase identifier format code.
pub const PURCHASE_ID_FORMAT: char = '0';

/// Multiple clearing sequence number and count (single clearing).
pub const CLEARING_SEQUENCE: &str = "01";

/// Records in a single-card batch: header, parameters, detail, trailer.
pub const BATCH_RECORD_COUNT: u32 = 4;

/// Default returned ACI when the authorization did not return one.
pub const DEFAULT_RETURNED_ACI: &str = " ";

/// Default authorization source code.
pub const DEFAULT_AUTH_SOURCE_CODE: &str = "6";

/// Default transaction identifier.
pub const DEFAULT_TRANSACTION_ID: &str = "000000000000000";

/// Default validation code.
pub const DEFAULT_VALIDATION_CODE: &str = "    ";

// ============================================================================
// Transport
// ============================================================================

/// Content type of an authorization exchange.
pub const MIME_AUTH: &str = "x-Visa-II/x-auth";

/// Content type of a settlement exchange.
pub const MIME_SETTLE: &str = "x-Visa-II/x-settle";

/// Default acquirer gateway endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "https://ssl1.tsysacquiring.net/scripts/gateway.dll?transact";

/// Default timeout for a gateway exchange (milliseconds).
pub const DEFAULT_EXCHANGE_TIMEOUT: u64 = 30_000;

/// Largest inbound frame accepted by the stream codec.
pub const MAX_FRAME_SIZE: usize = 4 * 1024;
