// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `viewin token` command implementation.

use viewin_auth::JwtAuthAdapter;
use viewin_config::ViewinConfig;
use viewin_core::{UserId, ViewinError};

/// Prints a signed bearer token for `user_id`.
pub fn run_token(config: &ViewinConfig, user_id: i64, ttl_secs: i64) -> Result<(), ViewinError> {
    println!("{}", mint(config, user_id, ttl_secs)?);
    Ok(())
}

fn mint(config: &ViewinConfig, user_id: i64, ttl_secs: i64) -> Result<String, ViewinError> {
    if ttl_secs <= 0 {
        return Err(ViewinError::Validation("ttl_secs must be positive".into()));
    }
    JwtAuthAdapter::from_config(&config.auth)?.issue(UserId(user_id), ttl_secs)
}
