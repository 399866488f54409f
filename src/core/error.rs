//! Error handling for the release tool
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** for the failures callers branch on
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`ReleaseError`] - Enumerated error types for every fatal failure
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! # Error Categories
//!
//! - **Git**: [`ReleaseError::GitNotFound`], [`ReleaseError::GitCommandError`]
//! - **Manifests**: [`ReleaseError::ManifestNotFound`], [`ReleaseError::ManifestFormat`],
//!   [`ReleaseError::InvalidVersion`]
//! - **Remote resolution**: [`ReleaseError::RevisionNotFound`],
//!   [`ReleaseError::OriginResolution`]
//! - **External tools**: [`ReleaseError::ToolNotFound`], [`ReleaseError::MakeFailed`]
//! - **Configuration and rendering**: [`ReleaseError::ReleaseFileNotFound`],
//!   [`ReleaseError::ConfigError`], [`ReleaseError::TemplateError`]
//!
//! Remote resolution errors are mostly absorbed by the resolver (an unresolvable
//! dependency degrades to an empty commit); they are still typed so the resolver
//! can log them precisely.
//!
//! # Examples
//!
//! ```rust,no_run
//! use release_tool::core::{ReleaseError, user_friendly_error};
//!
//! let error = anyhow::Error::from(ReleaseError::ManifestNotFound {
//!     revision: "v1.0.0".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for release tool operations.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// A git command returned a non-zero exit code
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g., "show", "log", "ls-remote")
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// Git executable not found in PATH
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// An external tool other than git is missing
    #[error("Required tool '{tool}' was not found in PATH")]
    ToolNotFound {
        /// Name of the executable
        tool: String,
    },

    /// None of the supported dependency manifests exist at a revision
    #[error("No dependency manifest found at revision '{revision}'")]
    ManifestNotFound {
        /// Revision that was searched
        revision: String,
    },

    /// A manifest line does not match its format
    #[error("Unknown file format in {file}: {line}")]
    ManifestFormat {
        /// Manifest file the line came from
        file: String,
        /// The offending line
        line: String,
    },

    /// A version token could not be normalized
    #[error("Poorly formatted version in {section}: {version}")]
    InvalidVersion {
        /// Where the version was found (e.g. "require section")
        section: String,
        /// The rejected token
        version: String,
    },

    /// `git ls-remote` answered, but with nothing usable
    #[error("Revision '{reference}' not found at {url}")]
    RevisionNotFound {
        /// Remote that was queried
        url: String,
        /// Ref that was requested
        reference: String,
    },

    /// A vanity import path did not yield a git clone URL
    #[error("Unable to resolve git origin for '{module}': {reason}")]
    OriginResolution {
        /// Module path that was looked up
        module: String,
        /// Why the lookup failed
        reason: String,
    },

    /// Evaluating a Makefile variable failed or produced an unusable value
    #[error("Unable to read Makefile variable '{variable}': {reason}")]
    MakeFailed {
        /// Makefile variable name
        variable: String,
        /// Failure description
        reason: String,
    },

    /// The release file passed on the command line does not exist
    #[error("Release file not found: {path}")]
    ReleaseFileNotFound {
        /// Path that was given
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Template loading or rendering failed
    #[error("Template error: {message}")]
    TemplateError {
        /// Rendered description of the tera failure
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for ReleaseError {
    fn clone(&self) -> Self {
        match self {
            Self::GitCommandError {
                operation,
                stderr,
            } => Self::GitCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::GitNotFound => Self::GitNotFound,
            Self::ToolNotFound {
                tool,
            } => Self::ToolNotFound {
                tool: tool.clone(),
            },
            Self::ManifestNotFound {
                revision,
            } => Self::ManifestNotFound {
                revision: revision.clone(),
            },
            Self::ManifestFormat {
                file,
                line,
            } => Self::ManifestFormat {
                file: file.clone(),
                line: line.clone(),
            },
            Self::InvalidVersion {
                section,
                version,
            } => Self::InvalidVersion {
                section: section.clone(),
                version: version.clone(),
            },
            Self::RevisionNotFound {
                url,
                reference,
            } => Self::RevisionNotFound {
                url: url.clone(),
                reference: reference.clone(),
            },
            Self::OriginResolution {
                module,
                reason,
            } => Self::OriginResolution {
                module: module.clone(),
                reason: reason.clone(),
            },
            Self::MakeFailed {
                variable,
                reason,
            } => Self::MakeFailed {
                variable: variable.clone(),
                reason: reason.clone(),
            },
            Self::ReleaseFileNotFound {
                path,
            } => Self::ReleaseFileNotFound {
                path: path.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::TemplateError {
                message,
            } => Self::TemplateError {
                message: message.clone(),
            },
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::TomlError(e) => Self::TomlError(e.clone()),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show the main message in red, optional details in
/// yellow and an optional suggestion in green.
///
/// ```rust,no_run
/// use release_tool::core::{ErrorContext, ReleaseError};
///
/// let context = ErrorContext::new(ReleaseError::GitNotFound)
///     .with_suggestion("Install git from https://git-scm.com/")
///     .with_details("The release tool reads history through the git CLI");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ReleaseError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ReleaseError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`ReleaseError`] anywhere in the chain; everything else is
/// reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // The typed error is often wrapped in `.context(...)`; look through the chain
    // but keep the outermost message as details so the reader knows what was running.
    if let Some(release_error) = error.chain().find_map(|e| e.downcast_ref::<ReleaseError>()) {
        let ctx = create_error_context(release_error.clone());
        let outer = error.to_string();
        if outer != release_error.to_string() && ctx.details.is_none() {
            return ctx.with_details(outer);
        }
        return ctx;
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ReleaseError::Other {
        message,
    })
}

fn create_error_context(error: ReleaseError) -> ErrorContext {
    match &error {
        ReleaseError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("History, tags and remote refs are all read through the git CLI"),

        ReleaseError::GitCommandError {
            operation,
            stderr,
        } => {
            let suggestion = match operation.as_str() {
                "show" => "Verify the commit and previous revisions in the release file exist in this repository",
                "ls-remote" | "clone" | "fetch" => "Check your internet connection and access to the dependency repository",
                _ => "Run the command from the root of the project repository, or try the git command manually for more details",
            };
            let details = stderr.trim().to_string();
            let ctx = ErrorContext::new(error.clone()).with_suggestion(suggestion);
            if details.is_empty() { ctx } else { ctx.with_details(details) }
        }

        ReleaseError::ToolNotFound {
            tool,
        } => {
            let suggestion = format!("Install '{tool}' or remove the options that require it from the release file");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        ReleaseError::ManifestNotFound {
            revision,
        } => {
            let details = format!(
                "Looked for vendor.conf, vendor/modules.txt and go.mod at revision '{revision}'"
            );
            ErrorContext::new(error)
                .with_suggestion("Check the 'commit' and 'previous' fields of the release file")
                .with_details(details)
        }

        ReleaseError::ManifestFormat {
            ..
        }
        | ReleaseError::InvalidVersion {
            ..
        } => ErrorContext::new(error)
            .with_details("Dependency manifests are read at historical revisions and must be well formed there"),

        ReleaseError::MakeFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the 'make_deps' entries of the release file against the Makefile at that revision"),

        ReleaseError::ReleaseFileNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Please specify the release file as the first argument"),

        ReleaseError::TemplateError {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check template syntax: variables use {{ var }}, control flow uses {% %}",
        ),

        ReleaseError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorContext::new(error)
            .with_suggestion("Check that the file or directory exists and the path is correct"),

        ReleaseError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax of the release file. Verify quotes, brackets, and table names"),

        _ => ErrorContext::new(error),
    }
}
