#![forbid(unsafe_code)]

mod envelope;
mod extract;
mod router;

pub use envelope::*;
pub use extract::*;
pub use router::*;
