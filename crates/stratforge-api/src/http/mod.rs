//! REST API surface: router, envelope responses, error mapping, handlers.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
