// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Viewin integration tests.
//!
//! Provides in-process adapters and a harness so workflow and gateway tests
//! run without an object store or account service.
//!
//! # Components
//!
//! - [`MemoryStorage`] - In-memory job-report repository
//! - [`MockPresigner`] - Deterministic presigner with failure injection
//! - [`StaticTokenAuth`] - Fixed token-to-user mapping
//! - [`TestHarness`] - Workflow wired to a temp SQLite database

pub mod harness;
pub mod memory_storage;
pub mod mock_auth;
pub mod mock_presigner;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_storage::MemoryStorage;
pub use mock_auth::StaticTokenAuth;
pub use mock_presigner::{MockPresigner, PresignCall};
