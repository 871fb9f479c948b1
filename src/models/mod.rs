//! Wire types exchanged with the remote services.
//!
//! One file per message family. Field names follow the JSON the services
//! emit (camelCase), renamed to Rust conventions via serde attributes.

pub mod auth;
pub mod holding;
pub mod price;
pub mod risk;
pub mod transaction;

pub use auth::{LoginRequest, LoginResponse, SignupRequest};
pub use holding::Holding;
pub use price::PriceQuote;
pub use risk::{RiskHistoryPoint, RiskReport};
pub use transaction::{NewTransaction, TradeSide, Transaction};
