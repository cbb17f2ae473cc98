//! Prompt composition
//!
//! Builds the instruction payload for one generation from the launch
//! context and the runway length. Pure: same context and day count, same
//! prompt.

mod composer;
mod embedded;

pub use composer::{PromptContext, RunwayBucket, compose, system_prompt};
