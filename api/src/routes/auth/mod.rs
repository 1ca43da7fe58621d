//! Authentication route handlers
//!
//! - Login with username/password
//! - Token refresh
//! - Machine-to-machine token generation (API-key gated)

pub mod generate_token;
pub mod login;
pub mod refresh;

pub use generate_token::generate_token;
pub use login::login;
pub use refresh::refresh;
