// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scope inheritance.
//!
//! A child scope's predicates are folded over its parent's once, when the
//! scope is activated. Each option has a fixed merge rule:
//!
//! | option                 | rule                               |
//! |------------------------|------------------------------------|
//! | `enabled`, `variable`  | child overrides when set           |
//! | status class flags     | OR                                 |
//! | `latency_floor`        | minimum when both set              |
//! | `buffer_size`          | maximum when both set              |
//! | condition lists        | parent's, then child's             |
//!
//! The result of a fold is still a [`PredicateSet`] so it can be folded again
//! for deeper scopes; [`CaptureConfig`] is the finalized form with defaults
//! applied that the decision engine reads.

use crate::predicate::{HeaderCondition, PredicateSet, ValueCondition};
use crate::status::StatusClassSet;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Name of the exposed value when a scope does not set one.
pub const DEFAULT_VARIABLE: &str = "response_body";

/// Default capture capacity: one memory page.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

fn override_if_set<T: Clone>(parent: &Option<T>, child: &Option<T>) -> Option<T> {
    child.clone().or_else(|| parent.clone())
}

fn min_if_both<T: Ord + Copy>(parent: Option<T>, child: Option<T>) -> Option<T> {
    match (parent, child) {
        (Some(p), Some(c)) => Some(p.min(c)),
        (p, c) => c.or(p),
    }
}

fn max_if_both<T: Ord + Copy>(parent: Option<T>, child: Option<T>) -> Option<T> {
    match (parent, child) {
        (Some(p), Some(c)) => Some(p.max(c)),
        (p, c) => c.or(p),
    }
}

fn concat<T: Clone>(parent: &[T], child: &[T]) -> Vec<T> {
    parent.iter().chain(child).cloned().collect()
}

/// Fold `child` over `parent`.
pub fn merge(parent: &PredicateSet, child: &PredicateSet) -> PredicateSet {
    PredicateSet {
        enabled: override_if_set(&parent.enabled, &child.enabled),
        variable: override_if_set(&parent.variable, &child.variable),
        skip_classes: parent.skip_classes.union(child.skip_classes),
        skip_codes: concat(&parent.skip_codes, &child.skip_codes),
        latency_floor: min_if_both(parent.latency_floor, child.latency_floor),
        buffer_size: max_if_both(parent.buffer_size, child.buffer_size),
        request_headers: concat(&parent.request_headers, &child.request_headers),
        response_headers: concat(&parent.response_headers, &child.response_headers),
        values: concat(&parent.values, &child.values),
    }
}

/// Finalized, immutable capture configuration for one scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    pub enabled: bool,
    pub variable: String,
    pub skip_classes: StatusClassSet,
    pub skip_codes: Vec<u16>,
    /// Zero disables the latency check
    pub latency_floor: Duration,
    pub buffer_size: usize,
    pub request_headers: Vec<HeaderCondition>,
    pub response_headers: Vec<HeaderCondition>,
    pub values: Vec<ValueCondition>,
}

impl CaptureConfig {
    /// Apply defaults to a (possibly merged) predicate set.
    pub fn from_predicates(set: &PredicateSet) -> Self {
        Self {
            enabled: set.enabled.unwrap_or(false),
            variable: set
                .variable
                .clone()
                .unwrap_or_else(|| DEFAULT_VARIABLE.to_string()),
            skip_classes: set.skip_classes,
            skip_codes: set.skip_codes.clone(),
            latency_floor: set.latency_floor.map_or(Duration::ZERO, whole_millis),
            buffer_size: set.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE),
            request_headers: set.request_headers.clone(),
            response_headers: set.response_headers.clone(),
            values: set.values.clone(),
        }
    }
}

/// Truncate a floor to the millisecond resolution of the clock. A nonzero
/// floor never truncates to zero, which would disable the check.
fn whole_millis(floor: Duration) -> Duration {
    if floor.is_zero() {
        return floor;
    }
    let millis = u64::try_from(floor.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(millis.max(1))
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::from_predicates(&PredicateSet::default())
    }
}

/// An activated scope: its merged predicates (for nesting further scopes)
/// and the shared finalized config.
#[derive(Clone, Debug)]
pub struct ResolvedScope {
    merged: PredicateSet,
    config: Arc<CaptureConfig>,
}

impl ResolvedScope {
    /// Activate an outermost scope.
    pub fn root(set: PredicateSet) -> Self {
        let config = Arc::new(CaptureConfig::from_predicates(&set));
        Self {
            merged: set,
            config,
        }
    }

    /// Activate a scope nested inside this one.
    pub fn nest(&self, child: &PredicateSet) -> Self {
        Self::root(merge(&self.merged, child))
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.merged
    }

    pub fn config(&self) -> &Arc<CaptureConfig> {
        &self.config
    }
}

/// Activated scopes addressed by path, e.g. `""`, `"api"`, `"api/v1"`.
#[derive(Clone, Debug, Default)]
pub struct ScopeTable {
    configs: HashMap<String, Arc<CaptureConfig>>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, scope: &ResolvedScope) {
        self.configs.insert(path.into(), Arc::clone(scope.config()));
    }

    /// Config for `path`, falling back to the nearest registered ancestor.
    ///
    /// When nothing matches, not even the root, capture is disabled.
    pub fn lookup(&self, path: &str) -> Arc<CaptureConfig> {
        let mut current = path;
        loop {
            if let Some(config) = self.configs.get(current) {
                return Arc::clone(config);
            }
            match current.rfind('/') {
                Some(idx) => current = &current[..idx],
                None if !current.is_empty() => current = "",
                None => return Arc::new(CaptureConfig::default()),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
