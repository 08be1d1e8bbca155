//! MCP tool implementations.
//!
//! This module contains all tools exposed by the userdeck server.

pub mod page;
pub mod refresh;
