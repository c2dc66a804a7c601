//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the CLI's standard error type and
//! miette's rich diagnostic formatting. Scenario parse errors carry the
//! scenario source so the offending TOML is shown with a label.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};

use corral::CorralError;

use crate::error::CliError;

/// Adapter wrapping a [`CliError`] for miette rendering.
pub struct ErrorAdapter(pub CliError);

impl fmt::Debug for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl Diagnostic for ErrorAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Io(_) => "corral::io",
            CliError::Config(_) => "corral::config",
            CliError::Scenario { .. } => "corral::scenario",
            CliError::Setup { .. } => "corral::setup",
            CliError::Step { .. } => "corral::step",
        };
        Some(Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0.engine_error()? {
            CorralError::DanglingParent { .. } => {
                "declare parent nodes before the nodes they contain"
            }
            CorralError::HasChildren { .. } => {
                "move the children to another container before removing it"
            }
            CorralError::DuplicateNode(_) => "node ids must be unique",
            CorralError::MissingNode(_) | CorralError::MissingConnection(_) => {
                "check the id against the nodes and connections declared so far"
            }
            CorralError::MissingView(_) | CorralError::View(_) => return None,
        };
        Some(Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            CliError::Scenario { source_code, .. } => Some(source_code as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let CliError::Scenario {
            message,
            span: Some(span),
            ..
        } = &self.0
        else {
            return None;
        };
        let span = SourceSpan::from(span.start..span.end);
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(message.clone()),
            span,
        ))))
    }
}
