//! Miette-based error diagnostics for CLI error presentation.
//!
//! Config parse errors point into the TOML source; planner errors carry a
//! hint about the command that usually fixes them.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError as ConfigFailure, Error, PlannerError};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(larder::config))]
pub struct ConfigError {
    pub message: String,

    #[source_code]
    pub src: miette::NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

/// Planner operation error.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(larder::planner))]
pub struct PlannerDiagnostic {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

/// Render a config load failure, pointing into `src` when the TOML parser
/// reported a location.
#[must_use]
pub fn config_report(path: &str, src: String, err: Error) -> miette::Report {
    let (span, help) = match &err {
        Error::Config(ConfigFailure::Parse(parse)) => (
            parse.span().map(|range| SourceSpan::from(range.start..range.end)),
            None,
        ),
        Error::Config(ConfigFailure::InvalidValue { field, .. }) => {
            let span = src.find(field).map(|at| SourceSpan::from(at..at + field.len()));
            (span, Some(format!("fix `{field}` in {path}")))
        }
        _ => (None, None),
    };
    ConfigError {
        message: err.to_string(),
        src: miette::NamedSource::new(path, src),
        span,
        help,
    }
    .into()
}

/// Render any other failure.
#[must_use]
pub fn report(err: Error) -> miette::Report {
    let help = err.as_planner().and_then(help_for);
    PlannerDiagnostic {
        message: err.to_string(),
        help,
    }
    .into()
}

fn help_for(err: &PlannerError) -> Option<String> {
    let help = match err {
        PlannerError::StoreNotFound { .. } => "list stores with `larder store list`",
        PlannerError::StoreKindMismatch { .. } => {
            "stock is tracked in explicit stores; definition stores only carry a description"
        }
        PlannerError::RecipeNotFound { .. } => "list recipes with `larder recipe list <session>`",
        PlannerError::ClaimNotFound { .. } => "list claims with `larder claim list <recipe>`",
        PlannerError::StockReserved { .. } => {
            "release or consume the claims holding this stock first"
        }
        PlannerError::InvalidRecipeTransition(_) => "cooked and abandoned recipes are final",
        PlannerError::InvalidClaimTransition(_) => "consumed and released claims are final",
        _ => return None,
    };
    Some(help.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::StoreId;
    use crate::infrastructure::config::settings::Config;

    #[test]
    fn parse_error_points_into_source() {
        let src = "database = \"x.db\"\n[planner\n".to_string();
        let err = Config::parse_toml(&src).unwrap_err();
        let report = config_report("larder.toml", src, err);
        let diagnostic = report.downcast_ref::<ConfigError>().unwrap();
        assert!(diagnostic.span.is_some());
    }

    #[test]
    fn invalid_value_names_the_field() {
        let src = "[planner]\ninference_timeout_ms = 0\n".to_string();
        let err = Config::parse_toml(&src).unwrap_err();
        let report = config_report("larder.toml", src, err);
        let diagnostic = report.downcast_ref::<ConfigError>().unwrap();
        assert_eq!(diagnostic.span.map(|s| s.offset()), Some(10));
    }

    #[test]
    fn planner_errors_get_hints() {
        let err: Error = PlannerError::StoreNotFound {
            store: StoreId::from("garage"),
        }
        .into();
        let report = report(err);
        let diagnostic = report.downcast_ref::<PlannerDiagnostic>().unwrap();
        assert!(diagnostic.help.as_deref().unwrap().contains("store list"));
    }
}
