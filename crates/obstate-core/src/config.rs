#![forbid(unsafe_code)]

//! Per-instance configuration for [`ObservableState`](crate::ObservableState).
//!
//! # Environment overrides
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `OBSTATE_NOTIFY_POLICY` | `on-change`, `always` | `on-change` |
//! | `OBSTATE_MAX_DISPATCH_DEPTH` | positive integer | `32` |
//!
//! Unset or blank variables fall back to the default. Unparseable values are
//! rejected with [`StateError::InvalidConfig`].

use crate::error::StateError;

/// Environment variable selecting the [`NotifyPolicy`].
pub const ENV_NOTIFY_POLICY: &str = "OBSTATE_NOTIFY_POLICY";
/// Environment variable overriding [`StateConfig::max_dispatch_depth`].
pub const ENV_MAX_DISPATCH_DEPTH: &str = "OBSTATE_MAX_DISPATCH_DEPTH";

/// Default bound on nested (re-entrant) dispatches.
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 32;

/// When a property setter raises a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Notify only when the new value differs from the stored one.
    #[default]
    OnChange,
    /// Notify on every write, even if the value is unchanged.
    Always,
}

impl NotifyPolicy {
    /// Stable lowercase name, as accepted by [`NotifyPolicy::parse`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnChange => "on-change",
            Self::Always => "always",
        }
    }

    /// Parse a policy name. Case and surrounding whitespace are ignored;
    /// `on_change` and `onchange` are accepted as aliases.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on-change" | "on_change" | "onchange" => Some(Self::OnChange),
            "always" => Some(Self::Always),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotifyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one state instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateConfig {
    /// Setter notification policy.
    pub notify_policy: NotifyPolicy,
    /// Maximum nesting of dispatches caused by listeners mutating the same
    /// state. Exceeding it panics.
    pub max_dispatch_depth: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            notify_policy: NotifyPolicy::OnChange,
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
        }
    }
}

impl StateConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the notification policy.
    #[must_use]
    pub fn with_notify_policy(mut self, policy: NotifyPolicy) -> Self {
        self.notify_policy = policy;
        self
    }

    /// Set the maximum dispatch depth (clamped to at least 1).
    #[must_use]
    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = depth.max(1);
        self
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self, StateError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, StateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = get_env(ENV_NOTIFY_POLICY).filter(|v| !v.trim().is_empty()) {
            config.notify_policy =
                NotifyPolicy::parse(&raw).ok_or_else(|| StateError::InvalidConfig {
                    key: ENV_NOTIFY_POLICY,
                    value: raw.clone(),
                })?;
        }

        if let Some(raw) = get_env(ENV_MAX_DISPATCH_DEPTH).filter(|v| !v.trim().is_empty()) {
            let depth = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| StateError::InvalidConfig {
                    key: ENV_MAX_DISPATCH_DEPTH,
                    value: raw.clone(),
                })?;
            config.max_dispatch_depth = depth;
        }

        Ok(config)
    }
}
