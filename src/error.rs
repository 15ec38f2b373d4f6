// ==============================================================================
// Error and Warning Diagnostics
// ==============================================================================
//
// Two kinds of fatal conversion errors exist: a referenced type that cannot be
// found anywhere in the reflection graph, and input whose shape violates an
// assumption the converter relies on. Neither is recoverable; the pass is
// aborted and no partial output is returned.
//
// Descriptor JSON that fails to parse is reported as a `ParseDiagnostic` with
// a source span so the user sees the offending line.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, NamedSource, Severity, SourceSpan};

/// A fatal error raised while converting the reflection graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// A referenced qualified name is absent from both the supplied node list
    /// and the root lookup.
    TypeNotFound {
        name: String,
        /// Optional "did you mean" hint.
        help: Option<String>,
    },
    /// The input graph has an unexpected shape.
    Malformed { message: String },
}

impl ConvertError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ConvertError::Malformed {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::TypeNotFound { name, .. } => {
                write!(f, "can't find type `{name}` in the schema")
            }
            ConvertError::Malformed { message } => write!(f, "malformed schema: {message}"),
        }
    }
}

impl std::error::Error for ConvertError {}

impl Diagnostic for ConvertError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            ConvertError::TypeNotFound { .. } => "protoshape::type_not_found",
            ConvertError::Malformed { .. } => "protoshape::malformed",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            ConvertError::TypeNotFound { help: Some(h), .. } => Some(Box::new(h)),
            _ => None,
        }
    }
}

/// A parse error with source location information for rich diagnostics.
#[derive(Debug)]
pub struct ParseDiagnostic {
    pub src: NamedSource<String>,
    pub span: SourceSpan,
    pub message: String,
    pub label: Option<String>,
    pub help: Option<String>,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseDiagnostic {}

impl Diagnostic for ParseDiagnostic {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.label.clone().unwrap_or_else(|| self.message.clone());
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label),
            self.span,
        ))))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }
}

/// A non-fatal condition noticed during a pass. Rendered by miette with
/// warning severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub help: Option<String>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Warning {}

impl Diagnostic for Warning {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Warning)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_not_found_carries_code_and_help() {
        let err = ConvertError::TypeNotFound {
            name: "shop.Ordr".to_string(),
            help: Some("did you mean `shop.Order`?".to_string()),
        };
        assert_eq!(err.to_string(), "can't find type `shop.Ordr` in the schema");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("protoshape::type_not_found")
        );
        assert_eq!(
            err.help().map(|h| h.to_string()).as_deref(),
            Some("did you mean `shop.Order`?")
        );
    }

    #[test]
    fn malformed_has_no_help() {
        let err = ConvertError::malformed("field `x` has no type");
        assert_eq!(err.to_string(), "malformed schema: field `x` has no type");
        assert!(err.help().is_none());
    }

    #[test]
    fn warning_severity() {
        let w = Warning {
            message: "dangling".to_string(),
            help: None,
        };
        assert_eq!(w.severity(), Some(Severity::Warning));
    }
}
