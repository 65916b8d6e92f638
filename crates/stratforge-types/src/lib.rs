//! Shared domain types for Stratforge.
//!
//! This crate contains the core domain types used across the Stratforge
//! workspace: the wizard stage model, per-stage strategy data bags,
//! generation request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod error;
pub mod generation;
pub mod strategy;
pub mod wizard;
