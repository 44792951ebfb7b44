pub mod auth;
pub mod builder;
pub mod codec;
pub mod codes;
pub mod field;
pub mod frame;
pub mod parity;
pub mod parser;
pub mod response;
pub mod settle;

pub use auth::AuthorizationRequest;
pub use builder::RecordBuilder;
pub use codec::VitalNetCodec;
pub use frame::{Frame, Terminator, frame, lrc};
pub use parity::{apply_even_parity, strip_parity};
pub use parser::{ResponseParser, decode};
pub use response::{Response, ResponseKind, keys};
pub use settle::SettlementRequest;
