#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `OBSTATE_DEMO_*` prefix; flags win over the
//! environment.

use std::env;
use std::process;

use obstate_core::NotifyPolicy;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
obstate demo: a customer store shared by two simulated components

USAGE:
    obstate-demo [OPTIONS]

OPTIONS:
    --first-name=NAME    First name the weather panel writes (default: John)
    --last-name=NAME     Last name the weather panel writes (default: Dereck)
    --policy=POLICY      Setter notification policy: 'on-change' or 'always'
                         (default: OBSTATE_NOTIFY_POLICY, else on-change)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    OBSTATE_DEMO_FIRST_NAME      Override --first-name
    OBSTATE_DEMO_LAST_NAME       Override --last-name
    OBSTATE_NOTIFY_POLICY        Store notification policy
    OBSTATE_MAX_DISPATCH_DEPTH   Bound on nested notifications
    RUST_LOG                     Log filter (default: info)";

/// Parsed demo options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// First name the weather panel writes into the store.
    pub first_name: String,
    /// Last name the weather panel writes into the store.
    pub last_name: String,
    /// Overrides the policy from the environment when set.
    pub policy: Option<NotifyPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            first_name: "John".into(),
            last_name: "Dereck".into(),
            policy: None,
        }
    }
}

impl Opts {
    /// Parse process args and environment, exiting on `--help`, `--version`
    /// or invalid input.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("obstate-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = get_env("OBSTATE_DEMO_FIRST_NAME")
            && !val.trim().is_empty()
        {
            opts.first_name = val;
        }
        if let Some(val) = get_env("OBSTATE_DEMO_LAST_NAME")
            && !val.trim().is_empty()
        {
            opts.last_name = val;
        }

        // Parse command-line args (override env vars)
        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => {
                    return Err(ParseError::Help);
                }
                "--version" | "-V" => {
                    return Err(ParseError::Version);
                }
                other => {
                    if let Some(val) = other.strip_prefix("--first-name=") {
                        opts.first_name = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--last-name=") {
                        opts.last_name = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--policy=") {
                        match NotifyPolicy::parse(val) {
                            Some(policy) => opts.policy = Some(policy),
                            None => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--policy",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }
}
