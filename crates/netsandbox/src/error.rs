//! CLI error types with miette diagnostics.
//!
//! Maps engine, synthesis, and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use netsandbox_config::ConfigError;
use netsandbox_core::{CoreError, SynthesisError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID_DOCUMENT: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netsandbox::not_found),
        help("Run: netsandbox {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(netsandbox::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Operation not supported: {reason}")]
    #[diagnostic(code(netsandbox::unsupported))]
    Unsupported { reason: String },

    // ── Documents ────────────────────────────────────────────────────
    #[error("Invalid sandbox document {path}")]
    #[diagnostic(
        code(netsandbox::invalid_document),
        help("{reason}\nCable endpoints must point at each other and ids must be unique.")
    )]
    InvalidDocument { path: String, reason: String },

    #[error("Could not parse {path}")]
    #[diagnostic(code(netsandbox::parse), help("{reason}"))]
    Parse { path: String, reason: String },

    // ── Build ────────────────────────────────────────────────────────
    #[error("Cannot build store network")]
    #[diagnostic(
        code(netsandbox::build),
        help("{reason}\nEvery connectTo must name a router or switch declared in the same request.")
    )]
    Build { reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netsandbox::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Store preset '{name}' not found in configuration")]
    #[diagnostic(
        code(netsandbox::store_not_found),
        help(
            "Available stores: {available}\n\
             Create one with: netsandbox config init"
        )
    )]
    StoreNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(netsandbox::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netsandbox::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(netsandbox::json))]
    Json(#[from] serde_json::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(netsandbox::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(netsandbox::toml))]
    Toml(#[from] toml::ser::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::StoreNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::InvalidDocument { .. } | Self::Parse { .. } | Self::Build { .. } => {
                exit_code::INVALID_DOCUMENT
            }
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the offending file to a bare invariant failure.
    pub fn in_document(self, path: &std::path::Path) -> Self {
        match self {
            Self::InvalidDocument { reason, .. } => Self::InvalidDocument {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list <DOCUMENT>".into(),
            },

            CoreError::PortNotFound { identifier } => CliError::NotFound {
                resource_type: "port".into(),
                identifier,
                list_command: "devices get <DOCUMENT> <DEVICE>".into(),
            },

            CoreError::DuplicateDevice { id } => CliError::Conflict {
                resource_type: "device".into(),
                identifier: id.to_string(),
            },

            err @ (CoreError::SelfConnection { .. }
            | CoreError::NotControllable { .. }
            | CoreError::Unsupported { .. }) => CliError::Unsupported {
                reason: err.to_string(),
            },

            CoreError::Invariant(violation) => CliError::InvalidDocument {
                path: String::new(),
                reason: violation.to_string(),
            },
        }
    }
}

impl From<SynthesisError> for CliError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Graph(inner) => inner.into(),
            other => CliError::Build {
                reason: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownStore { name, available } => CliError::StoreNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::NoStore => CliError::Validation {
                field: "store".into(),
                reason: "no --store given and no default_store configured".into(),
            },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Serialization(err) => CliError::Toml(err),
            ConfigError::Io(err) => CliError::Io(err),
        }
    }
}
