//! Domain entities and value objects

pub mod kpi;
pub mod roles;
pub mod token;

pub use kpi::KpiSnapshot;
pub use roles::UserRole;
pub use token::{ClaimSet, Claims, IssuedToken};
