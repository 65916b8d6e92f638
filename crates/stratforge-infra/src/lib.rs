//! Infrastructure implementations for Stratforge.
//!
//! Concrete `TextGenerator` backends (OpenAI-compatible, Anthropic, and a
//! fixed-delay mock for offline use) plus the `config.toml` loader. The
//! `stratforge-core` crate defines the ports; this crate plugs in the IO.

pub mod config;
pub mod generation;
