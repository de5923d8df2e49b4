#![forbid(unsafe_code)]

//! Error type for subscription and configuration failures.

/// Errors surfaced by observable state operations.
///
/// Every variant describes a programmer or deployment error. None of them is
/// retried by the core; they are returned to the immediate caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A selector did not resolve to a declared property of the state type.
    ///
    /// Raised at subscription time. No listener is registered.
    InvalidSelector {
        /// The property name the selector resolved to (may be empty).
        property: String,
        /// Type name of the state the subscription targeted.
        model: &'static str,
    },
    /// An environment override could not be parsed.
    InvalidConfig {
        /// Environment variable name.
        key: &'static str,
        /// The rejected raw value.
        value: String,
    },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelector { property, model } if property.is_empty() => {
                write!(f, "invalid property selector for {model}: empty property name")
            }
            Self::InvalidSelector { property, model } => {
                write!(
                    f,
                    "invalid property selector for {model}: '{property}' is not a declared property"
                )
            }
            Self::InvalidConfig { key, value } => {
                write!(f, "invalid value for {key}: '{value}'")
            }
        }
    }
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_property_and_model() {
        let err = StateError::InvalidSelector {
            property: "full_name".to_string(),
            model: "CustomerState",
        };
        let msg = err.to_string();
        assert!(msg.contains("full_name"));
        assert!(msg.contains("CustomerState"));
    }

    #[test]
    fn display_empty_selector() {
        let err = StateError::InvalidSelector {
            property: String::new(),
            model: "CustomerState",
        };
        assert!(err.to_string().contains("empty property name"));
    }

    #[test]
    fn display_invalid_config() {
        let err = StateError::InvalidConfig {
            key: "OBSTATE_NOTIFY_POLICY",
            value: "sometimes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for OBSTATE_NOTIFY_POLICY: 'sometimes'"
        );
    }
}
