// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preferred-order table: writer identity (or dotted prefix) -> priority.

use std::collections::HashMap;

use capreg_config::model::{PriorityValue, WriterConfig};
use tracing::warn;

/// Priority used when no entry matches or a value does not parse.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Maps writer identities and dotted prefixes to priorities, higher first.
///
/// Values are kept as written and parsed at resolution time, so a bad value
/// degrades one writer to [`DEFAULT_PRIORITY`] instead of rejecting the table.
#[derive(Debug, Clone, Default)]
pub struct PreferredOrder {
    entries: HashMap<String, String>,
}

impl PreferredOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_config(config: &WriterConfig) -> Self {
        Self::from_entries(
            config
                .preferred_order
                .iter()
                .map(|(key, value)| (key.clone(), raw_value(value))),
        )
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves the priority of `identity`.
    ///
    /// Tries the full identity, then drops the last dotted segment and
    /// retries until a key matches or no segments remain.
    pub fn priority_for(&self, identity: &str) -> i32 {
        let mut key = identity;
        loop {
            if let Some(value) = self.entries.get(key) {
                return parse_priority(identity, key, value);
            }
            match key.rfind('.') {
                Some(pos) => key = &key[..pos],
                None => return DEFAULT_PRIORITY,
            }
        }
    }
}

fn raw_value(value: &PriorityValue) -> String {
    match value {
        PriorityValue::Number(n) => n.to_string(),
        PriorityValue::Text(s) => s.clone(),
    }
}

fn parse_priority(identity: &str, key: &str, value: &str) -> i32 {
    match value.trim().parse::<i32>() {
        Ok(priority) => priority,
        Err(err) => {
            warn!(
                identity,
                key,
                value,
                error = %err,
                "unparseable preferred-order value, using default priority"
            );
            DEFAULT_PRIORITY
        }
    }
}
