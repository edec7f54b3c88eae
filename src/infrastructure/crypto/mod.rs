pub mod password;

pub use password::{hash_password, hash_password_with_cost, verify_password};
