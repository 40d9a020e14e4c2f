// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./viewin.toml` > `~/.config/viewin/viewin.toml` > `/etc/viewin/viewin.toml`
//! with environment variable overrides via the `VIEWIN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ViewinConfig;

/// Config sections addressable from the environment, in mapping order.
const ENV_SECTIONS: &[&str] = &[
    "service",
    "storage",
    "gateway",
    "auth",
    "object_store",
    "workflow",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/viewin/viewin.toml`
/// 3. `~/.config/viewin/viewin.toml`
/// 4. `./viewin.toml`
/// 5. `VIEWIN_*` environment variables
pub fn load_config() -> Result<ViewinConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the compiled defaults.
///
/// No files and no environment are consulted.
pub fn load_config_from_str(toml_content: &str) -> Result<ViewinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ViewinConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ViewinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ViewinConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ViewinConfig::default()))
        .merge(Toml::file("/etc/viewin/viewin.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("viewin/viewin.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("viewin.toml"))
        .merge(env_provider())
}

/// Maps a prefix-stripped env var name to its dotted config key.
///
/// Figment hands over the name in its original case, so it is lowercased
/// first. Only the first `section_` occurrence becomes a dot, so
/// `OBJECT_STORE_SECRET_ACCESS_KEY` maps to `object_store.secret_access_key`.
pub fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

/// Environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// `Env::split("_")` would break keys that contain underscores.
fn env_provider() -> Env {
    Env::prefixed("VIEWIN_").map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(
            map_env_key("object_store_secret_access_key"),
            "object_store.secret_access_key"
        );
        assert_eq!(map_env_key("gateway_callback_token"), "gateway.callback_token");
        assert_eq!(map_env_key("workflow_upload_url_ttl_secs"), "workflow.upload_url_ttl_secs");
    }

    #[test]
    fn env_keys_are_matched_case_insensitively() {
        assert_eq!(map_env_key("GATEWAY_PORT"), "gateway.port");
        assert_eq!(map_env_key("AUTH_JWT_SECRET"), "auth.jwt_secret");
        assert_eq!(
            map_env_key("OBJECT_STORE_SECRET_ACCESS_KEY"),
            "object_store.secret_access_key"
        );
    }

    #[test]
    fn unknown_env_key_is_left_alone() {
        assert_eq!(map_env_key("something_else"), "something_else");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("viewin.toml", "[gateway]\nport = 9000\n")?;
            jail.set_env("VIEWIN_GATEWAY_PORT", "9100");
            jail.set_env("VIEWIN_OBJECT_STORE_BUCKET", "from-env");
            jail.set_env("VIEWIN_GATEWAY_CALLBACK_TOKEN", "pipeline-secret");
            let config = load_config_from_path(Path::new("viewin.toml"))?;
            assert_eq!(config.gateway.port, 9100);
            assert_eq!(config.object_store.bucket, "from-env");
            assert_eq!(config.gateway.callback_token.as_deref(), Some("pipeline-secret"));
            Ok(())
        });
    }
}
