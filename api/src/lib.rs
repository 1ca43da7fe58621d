//! Pulseboard API layer: HTTP routes, JWT middleware, and the realtime
//! dashboard channel.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
