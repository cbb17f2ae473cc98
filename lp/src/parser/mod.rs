//! Response recovery parser
//!
//! Model output is adversarial by construction: valid JSON on a good day,
//! fenced, truncated, comma-littered, or phase-bucketed on a bad one. The
//! recovery chain in [`recovery`] accepts whenever the text is structurally
//! recoverable and fails loudly otherwise; it never invents tasks and never
//! degrades to an empty plan.

mod error;
mod recovery;
mod repair;

pub use error::ParseError;
pub use recovery::recover;
pub use repair::{extract_balanced_array, strip_trailing_commas};
