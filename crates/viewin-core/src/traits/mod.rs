// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod auth;
pub mod presigner;
pub mod storage;

pub use adapter::PluginAdapter;
pub use auth::AuthAdapter;
pub use presigner::PresignerAdapter;
pub use storage::StorageAdapter;
