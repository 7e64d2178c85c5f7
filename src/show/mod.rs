//! Unparsing: syntax nodes back to source text.
//!
//! Rendering is structural only. No parentheses are added for precedence and
//! string literals always come out single-quoted, so the text is not guaranteed
//! to re-parse into an identical tree.

pub mod expr;
pub mod stmt;

pub use expr::{render, show_expr};
pub use stmt::{render_signature, show_function_def};
