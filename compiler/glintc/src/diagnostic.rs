//! Diagnostic formatting — this crate's concrete rendering of
//! [`glint_codegen::CodegenError`], the ambient layer this driver adds
//! around the core's error taxonomy. Source-map generation and
//! pretty-printing to a terminal are themselves out of scope; this is
//! the structured shape a real renderer would consume.

use glint_codegen::{CodegenError, FunctionFailure};

/// One function's compilation failure, named and ready to print.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{function}: {error}")]
pub struct Diagnostic {
    pub function: String,
    #[source]
    pub error: CodegenError,
}

impl Diagnostic {
    #[must_use]
    pub fn from_failure(failure: FunctionFailure) -> Self {
        Self { function: failure.function, error: failure.error }
    }
}

#[cfg(test)]
mod tests {
    use glint_ast::Span;

    use super::*;

    #[test]
    fn renders_function_name_and_error() {
        let diagnostic = Diagnostic {
            function: "add".to_owned(),
            error: CodegenError::UnresolvedSymbol { span: Span::DUMMY },
        };
        let rendered = diagnostic.to_string();
        assert!(rendered.starts_with("add:"));
    }
}
