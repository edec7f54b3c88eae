//! Reviews module: verified reviews and host responses

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
