//! Common test utilities for Shipyard scenario tests.
//!
//! This module provides:
//! - `Site`: a server tree in a temp directory, reached through `LocalConnection`
//! - Fixtures: releases, archives and configuration snippets

#![allow(dead_code)]

pub mod fixtures;
pub mod site;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use site::*;
