//! Diagnostic ID constants.
//!
//! Generated from `spec/diagnostics.jsonc` at build time. Use these instead
//! of string literals to get compile-time typo detection.

include!(concat!(env!("OUT_DIR"), "/generated_codes.rs"));
