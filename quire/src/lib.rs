//! Expose quire's internals for integration tests. The supported interface
//! is the `quire` binary.
pub mod cli;
pub mod config;
pub mod error;
pub mod html;
pub mod site;
