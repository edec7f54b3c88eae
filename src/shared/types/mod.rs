pub mod errors;
pub mod money;
pub mod pagination;
pub mod time;

pub use errors::*;
pub use money::*;
pub use pagination::*;
pub use time::*;
