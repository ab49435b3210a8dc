//! Error types with rich diagnostics using miette

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::NumericError;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Build Errors
// ============================================================================

/// Errors raised before anything is drawn
#[derive(Error, Diagnostic, Debug)]
pub enum BuildError {
    #[error("invalid {name}: {value}")]
    #[diagnostic(
        code(tuckbox::build::invalid_dimension),
        help("card width, card length and box depth must be finite and greater than zero")
    )]
    InvalidDimension {
        name: &'static str,
        value: f64,
        #[source]
        reason: NumericError,
    },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors from exporting or persisting a finished document
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("failed to write {}", path.display())]
    #[diagnostic(code(tuckbox::render::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize drawing commands")]
    #[diagnostic(code(tuckbox::render::serialize))]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// Config Errors
// ============================================================================

/// Errors from loading a configuration file
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(tuckbox::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(tuckbox::config::parse))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("unsupported image {}", path.display())]
    #[diagnostic(code(tuckbox::config::image), help("images must be .png, .jpg or .jpeg files"))]
    UnsupportedImage { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn from_toml(ctx: &SourceContext, err: toml::de::Error) -> Self {
        ConfigError::Parse {
            message: err.message().to_string(),
            src: ctx.named_source(),
            span: err.span().map(SourceSpan::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimension_names_the_field() {
        let err = BuildError::InvalidDimension {
            name: "box depth",
            value: -1.0,
            reason: NumericError::Negative,
        };
        assert_eq!(err.to_string(), "invalid box depth: -1");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("tuckbox::build::invalid_dimension")
        );
    }

    #[test]
    fn toml_errors_keep_their_span() {
        let ctx = SourceContext::new("tuckbox.toml", "card-width = \"wide\"\n");
        let err = toml::from_str::<toml::Table>("card-width = = 1").unwrap_err();
        match ConfigError::from_toml(&ctx, err) {
            ConfigError::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
