//! Core domain for the Project Updater.
//!
//! Holds the authentication session state machine and the project form
//! controller. All I/O happens behind the traits in [`session`] and
//! [`project`]; concrete adapters live in `updater-infrastructure`.

pub mod config;
pub mod error;
pub mod project;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{Result, UpdaterError};
