//! lox_core: Shared source-position types for the lox toolchain.
//!
//! Tokens and diagnostics both point back into the source text with the
//! byte spans defined here.

pub mod text;

pub use text::{text_pos, LineMap, TextPos, TextSpan};
