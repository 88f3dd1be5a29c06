// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scope file loading.
//!
//! A scope file nests capture directives three levels deep:
//!
//! ```toml
//! [capture]                    # root scope, path ""
//! skip_status = ["2xx"]
//!
//! [[servers]]                  # path "api"
//! name = "api"
//! capture = { enabled = true }
//!
//! [[servers.locations]]        # path "api/upload"
//! name = "upload"
//! capture = { buffer_size = "64 KiB" }
//! ```
//!
//! Each scope is compiled and folded over its parent once, at load time.

use respcap_capture::{ConfigError, PredicateSet, ResolvedScope, ScopeDirectives, ScopeTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a scope file.
#[derive(Debug, Error)]
pub enum ScopeFileError {
    #[error("Failed to read scope file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scope '{}': {source}", display_path(.path))]
    Scope {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

/// Raw scope file contents.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeFile {
    /// Root scope directives
    #[serde(default)]
    pub capture: ScopeDirectives,

    #[serde(default)]
    pub servers: Vec<ServerScope>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerScope {
    pub name: String,

    #[serde(default)]
    pub capture: ScopeDirectives,

    #[serde(default)]
    pub locations: Vec<LocationScope>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocationScope {
    pub name: String,

    #[serde(default)]
    pub capture: ScopeDirectives,
}

/// Every scope of a file, resolved, in declaration order (parents first).
#[derive(Clone, Debug, Default)]
pub struct ResolvedScopes {
    scopes: Vec<(String, ResolvedScope)>,
}

impl ResolvedScopes {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedScope)> {
        self.scopes.iter().map(|(path, scope)| (path.as_str(), scope))
    }

    pub fn get(&self, path: &str) -> Option<&ResolvedScope> {
        self.iter().find(|(p, _)| *p == path).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Build the lookup table used by the capture stage.
    pub fn table(&self) -> ScopeTable {
        let mut table = ScopeTable::new();
        for (path, scope) in &self.scopes {
            table.insert(path.clone(), scope);
        }
        table
    }
}

impl ScopeFile {
    /// Load a scope file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ScopeFileError> {
        let content = std::fs::read_to_string(path)?;
        let file = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        Ok(file)
    }

    /// Compile and fold every scope over its parent.
    pub fn resolve(&self) -> Result<ResolvedScopes, ScopeFileError> {
        let mut scopes = Vec::new();

        let root = ResolvedScope::root(compile("", &self.capture)?);
        scopes.push((String::new(), root.clone()));

        let mut server_names = HashSet::new();
        for server in &self.servers {
            validate_name("server", &server.name, &mut server_names)?;
            let path = server.name.clone();
            let resolved = root.nest(&compile(&path, &server.capture)?);

            let mut location_names = HashSet::new();
            let mut locations = Vec::new();
            for location in &server.locations {
                validate_name("location", &location.name, &mut location_names)?;
                let path = format!("{}/{}", server.name, location.name);
                let nested = resolved.nest(&compile(&path, &location.capture)?);
                locations.push((path, nested));
            }

            scopes.push((path, resolved));
            scopes.extend(locations);
        }

        Ok(ResolvedScopes { scopes })
    }
}

fn compile(path: &str, directives: &ScopeDirectives) -> Result<PredicateSet, ScopeFileError> {
    PredicateSet::compile(directives).map_err(|source| ScopeFileError::Scope {
        path: path.to_string(),
        source,
    })
}

fn validate_name<'a>(
    kind: &str,
    name: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), ScopeFileError> {
    if name.is_empty() {
        return Err(ScopeFileError::Validation(format!(
            "{} name must not be empty",
            kind
        )));
    }
    if name.contains('/') {
        return Err(ScopeFileError::Validation(format!(
            "{} name '{}' must not contain '/'",
            kind, name
        )));
    }
    if !seen.insert(name) {
        return Err(ScopeFileError::Validation(format!(
            "duplicate {} name '{}'",
            kind, name
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
