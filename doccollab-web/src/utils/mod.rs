pub mod dom;
pub mod error;
pub mod timer;

pub use error::{Result, WebError};
