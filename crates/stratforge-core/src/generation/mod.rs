//! Generation boundary: the `TextGenerator` port trait and the service
//! that compiles wizard state and submits it.

pub mod provider;
pub mod service;
