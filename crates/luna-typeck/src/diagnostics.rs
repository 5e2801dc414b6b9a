//! Ariadne-based diagnostic rendering for semantic errors.
//!
//! The report message is the error's fixed Portuguese sentence; labels
//! point at the constraint's origin spans and carry the expected/found
//! detail. Output is colorless so tests and piped output stay stable.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::error::{ConstraintOrigin, TypeError};

/// Convert a rowan TextRange to a Rust Range<usize> for ariadne.
fn text_range_to_range(range: rowan::TextRange) -> Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    start..end
}

/// Render a semantic error into a formatted diagnostic string.
pub fn render_diagnostic(error: &TypeError, source: &str) -> String {
    let config = Config::default().with_color(false);
    let source_len = source.len();

    // Clamp a range to the source and keep it at least one character wide
    // so ariadne has something to underline.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        if s == e {
            s..e.saturating_add(1).min(source_len)
        } else {
            s..e
        }
    };

    let primary = clamp(
        error
            .primary_span()
            .map(text_range_to_range)
            .unwrap_or(0..source_len),
    );

    let mut builder = Report::<Range<usize>>::build(ReportKind::Error, primary.clone())
        .with_config(config)
        .with_message(error.to_string());

    match error {
        TypeError::UndeclaredVariable { name, .. } => {
            builder.add_label(
                Label::new(primary).with_message(format!("'{name}' é referenciada aqui")),
            );
        }
        TypeError::InfiniteType { ty, .. } => {
            builder.add_label(
                Label::new(primary)
                    .with_message(format!("a variável de tipo ocorreria dentro de `{ty}`")),
            );
        }
        TypeError::PrimMismatch {
            expected,
            found,
            origin,
        } => match origin {
            ConstraintOrigin::IfBranches {
                then_span,
                else_span,
                ..
            } => {
                builder.add_label(
                    Label::new(clamp(text_range_to_range(*then_span)))
                        .with_message(format!("este ramo tem tipo `{expected}`")),
                );
                builder.add_label(
                    Label::new(clamp(text_range_to_range(*else_span)))
                        .with_message(format!("este ramo tem tipo `{found}`")),
                );
            }
            _ => {
                builder.add_label(
                    Label::new(primary)
                        .with_message(format!("esperado `{expected}`, encontrado `{found}`")),
                );
            }
        },
        TypeError::ShapeMismatch {
            expected, found, ..
        } => {
            builder.add_label(
                Label::new(primary)
                    .with_message(format!("esperado `{expected}`, encontrado `{found}`")),
            );
        }
    }

    let mut buf = Vec::new();
    let _ = builder.finish().write(Source::from(source), &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_error(source: &str) -> TypeError {
        let parse = luna_parser::parse(source);
        let result = crate::check(&parse);
        result
            .errors
            .into_iter()
            .next()
            .expect("expected a semantic error")
    }

    #[test]
    fn undeclared_variable_report_carries_the_message() {
        let source = "y = z + 1";
        let rendered = render_diagnostic(&first_error(source), source);
        assert!(rendered.contains("Erro: variável 'z' não declarada."));
        assert!(rendered.contains("referenciada aqui"));
    }

    #[test]
    fn branch_mismatch_report_labels_both_arms() {
        let source = "if 1 == 1 then return 1 else return \"oi\" end";
        let rendered = render_diagnostic(&first_error(source), source);
        assert!(rendered.contains("Erro: tipos primitivos incompatíveis."));
        assert!(rendered.contains("este ramo tem tipo `number`"));
        assert!(rendered.contains("este ramo tem tipo `string`"));
    }

    #[test]
    fn assignment_mismatch_report_shows_expected_and_found() {
        let source = "local a = 0 a = \"oi\"";
        let rendered = render_diagnostic(&first_error(source), source);
        assert!(rendered.contains("Erro: tipos primitivos incompatíveis."));
        assert!(rendered.contains("esperado `number`, encontrado `string`"));
    }
}
