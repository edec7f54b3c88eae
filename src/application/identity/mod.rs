//! Identity: user management
//!
//! Contains the `UserService` which orchestrates the user-related
//! use-cases: registration, profile updates, deletion.

pub mod service;

pub use service::UserService;
