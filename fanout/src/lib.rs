#![forbid(unsafe_code)]

mod config;
mod diff;
mod error;
mod index;
mod probe;
mod publisher;
mod registry;
mod statistics;

pub use config::*;
pub use diff::*;
pub use error::*;
pub use index::*;
pub use probe::*;
pub use publisher::*;
pub use registry::*;
pub use statistics::*;

pub use fanout_cache as cache;
pub use fanout_store as store;
pub use fanout_store::{ConfirmMode, FindArgs, Page, Statistics, Subscription};
