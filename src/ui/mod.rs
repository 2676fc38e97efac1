//! ui
//!
//! User-facing output and diagnostics.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`logging`] - Diagnostic log setup for the binary
//!
//! # Design
//!
//! Command results go to stdout through [`output`]. Diagnostics from the
//! library are `tracing` events and go to stderr, so `--json` output stays
//! parseable.

pub mod logging;
pub mod output;
