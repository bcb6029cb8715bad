//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod fake_tool;
pub mod fixtures;
pub mod mock_platform;

pub use fake_tool::FakePinTool;
pub use fixtures::*;
pub use mock_platform::MockPlatformService;
