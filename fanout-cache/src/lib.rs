#![forbid(unsafe_code)]

mod engine;
mod error;
pub mod keys;

pub use engine::*;
pub use error::*;
