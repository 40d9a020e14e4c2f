// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the job-report workflow.
//!
//! Clients create job reports, request presigned upload URLs, and poll status
//! with user bearer tokens. The processing pipeline reports progress through
//! callback endpoints guarded by a shared token.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::CallbackAuth;
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, ServerConfig, router, start_server};
