//! The configuration wizard: stage registry, state operations, and the
//! prompt compiler.
//!
//! The wizard is a fixed, ordered list of skippable stages. The registry
//! (`state`) owns all mutation of `WizardState`; the compiler reads a state
//! snapshot and renders the prompt artifact sent to the generation provider.

pub mod catalog;
pub mod compiler;
pub mod format;
pub mod stages;
pub mod state;
