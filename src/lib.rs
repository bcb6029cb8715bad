//! pin-updater - Automated update pull requests for pinned dependencies
//!
//! This library reads a pin manifest (a JSON map of dependency name to source
//! location and revision) from a host repository, asks an external pin-update
//! tool whether each dependency has a newer revision, and publishes every
//! outdated dependency as its own branch and pull request.
//!
//! # Architecture
//!
//! The workflow in [`update`] is written against two seams:
//! - [`platform::PlatformService`] for every hosting-API read and write
//! - [`tool::PinTool`] for the external pin-update tool
//!
//! All I/O is async and state is passed explicitly (no globals).

pub mod auth;
pub mod config;
pub mod error;
pub mod platform;
pub mod tool;
pub mod types;
pub mod update;

pub use error::{Error, Result};
pub use types::*;
