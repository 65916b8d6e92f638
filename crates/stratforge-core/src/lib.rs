//! Business logic for Stratforge.
//!
//! This crate owns the wizard stage registry, the deterministic prompt
//! compiler, and the generation service, plus the `TextGenerator` port trait
//! that the infrastructure layer implements. It depends only on
//! `stratforge-types` -- never on `stratforge-infra` or any HTTP/IO crate.

pub mod generation;
pub mod wizard;
