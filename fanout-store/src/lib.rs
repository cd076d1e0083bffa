#![forbid(unsafe_code)]

mod engine;
mod error;
mod query;
mod store;
mod subscription;

pub use engine::*;
pub use error::*;
pub use query::*;
pub use store::*;
pub use subscription::*;
