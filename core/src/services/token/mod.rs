//! Token issuance, validation, and refresh

pub mod codec;
pub mod service;

pub use codec::{decode_claim_set, TokenCodec};
pub use service::TokenService;
