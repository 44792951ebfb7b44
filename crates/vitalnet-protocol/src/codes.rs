//! Coded value tables.
//!
//! Closed enumerations that map a short wire code to its meaning. They are
//! read-only and process-wide; lookups of unknown codes return `None` so the
//! caller can pass the raw code through.
//!
//! # Example
//!
//! ```
//! use vitalnet_protocol::codes::{AvsResult, BatchErrorType};
//!
//! let avs = AvsResult::from_code("Y").unwrap();
//! assert_eq!(avs, AvsResult::Y);
//! assert_eq!(avs.label(), "Address and five-digit zip match");
//!
//! assert_eq!(BatchErrorType::from_code("S").map(|t| t.label()), Some("Sequence error"));
//! assert!(BatchErrorType::from_code("Q").is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! coded_table {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every entry in table order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Wire code
            pub fn code(self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Human-readable meaning
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            /// Look up a wire code; `None` if the table does not know it
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        }
    };
}

coded_table! {
    /// Device type reported in request headers
    DeviceCode {
        Unknown => ("0", "Unknown or unsure"),
        Pc => ("C", "P.C."),
        DialTerminal => ("D", "Dial terminal"),
        ElectronicCashRegister => ("E", "Electronic cash register"),
        InStoreProcessor => ("I", "In-store processor"),
        Mainframe => ("M", "Main frame"),
        ReservedPosPort => ("P", "Reserved POS-Port"),
        ThirdPartySoftware => ("Q", "Third party software developer"),
        PosPort => ("R", "POS-Port"),
        PosPartner => ("S", "POS Partner"),
        SuppressResponseFields => ("Z", "Suppress PS2000/Merit response fields"),
    }
}

coded_table! {
    /// ISO numeric country code
    CountryCode {
        UnitedStates => ("840", "United States"),
    }
}

coded_table! {
    /// ISO numeric currency code
    CurrencyCode {
        UsDollar => ("840", "U.S. dollar"),
    }
}

coded_table! {
    /// Time zone differential from GMT
    TimeZone {
        Eastern => ("705", "Eastern Standard Time"),
        Central => ("706", "Central Standard Time"),
        Mountain => ("707", "Mountain Standard Time"),
        Pacific => ("708", "Pacific Standard Time"),
    }
}

coded_table! {
    /// Language indicator
    Language {
        English => ("00", "English"),
    }
}

coded_table! {
    /// Address verification result returned on an authorization
    AvsResult {
        NotRequested => ("0", "Approved/declined, address verification not requested"),
        A => ("A", "Address match only"),
        B => ("B", "Street address match, postal code not verified (international)"),
        C => ("C", "Street address and postal code not verified (international)"),
        D => ("D", "Street address and postal code match (international)"),
        E => ("E", "Error, ineligible"),
        F => ("F", "Street address and postal code match (UK)"),
        G => ("G", "Non-US issuer does not participate"),
        I => ("I", "Address information not verified (international)"),
        M => ("M", "Street address and postal code match (international)"),
        N => ("N", "No address or zip match"),
        P => ("P", "Postal code match, street address not verified"),
        R => ("R", "Retry, issuer system unavailable"),
        S => ("S", "Service not supported"),
        U => ("U", "Address unavailable"),
        W => ("W", "Nine-digit zip match, address does not match"),
        X => ("X", "Exact match, nine-digit zip"),
        Y => ("Y", "Address and five-digit zip match"),
        Z => ("Z", "Five-digit zip match, address does not match"),
    }
}

coded_table! {
    /// Why a settlement batch was rejected
    BatchErrorType {
        BlockedTerminal => ("B", "Blocked terminal"),
        CardType => ("C", "Card type error"),
        Device => ("D", "Device error"),
        Batch => ("E", "Error in batch"),
        Sequence => ("S", "Sequence error"),
        Transmission => ("T", "Transmission error"),
        Unknown => ("U", "Unknown error"),
        Routing => ("V", "Routing error"),
    }
}

coded_table! {
    /// Which settlement record a rejection points at
    BatchErrorRecordType {
        Header => ("H", "Header record"),
        Parameter => ("P", "Parameter record"),
        Detail => ("D", "Detail record"),
        Trailer => ("T", "Trailer record"),
        LineItemDetail => ("L", "Line item detail record"),
    }
}
