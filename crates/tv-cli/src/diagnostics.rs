//! Pretty rendering of notation errors.

use std::io::IsTerminal;
use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use tracing::debug;
use tv_dice::NotationError;

const SOURCE_NAME: &str = "notation";

/// Render a notation error as an ariadne report pointing into `input`.
///
/// Returns an empty string when there is nothing to point at, and the plain
/// error message if the report cannot be written.
pub fn render_notation_error(input: &str, err: &NotationError) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let span = label_span(input, err);

    let message = err.to_string();
    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, (SOURCE_NAME, span.clone()))
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(std::io::stderr().is_terminal()),
        )
        .with_message(&message)
        .with_label(
            Label::new((SOURCE_NAME, span))
                .with_message(label_for(err))
                .with_color(Color::Red),
        )
        .finish()
        .write((SOURCE_NAME, Source::from(input)), &mut output);

    if let Err(e) = written {
        debug!(error = %e, "failed to render notation report");
        return format!("error: {message}\n");
    }
    String::from_utf8(output).unwrap_or_else(|_| format!("error: {message}\n"))
}

/// A non-empty span on char boundaries. Zero-width spans are widened to the
/// next character, or to the last one when they sit at the end of input.
fn label_span(input: &str, err: &NotationError) -> Range<usize> {
    let mut span = err.span();
    span.start = span.start.min(input.len());
    while !input.is_char_boundary(span.start) {
        span.start -= 1;
    }
    span.end = span.end.clamp(span.start, input.len());
    if span.is_empty() {
        if let Some(ch) = input[span.start..].chars().next() {
            span.end = span.start + ch.len_utf8();
        } else if let Some(ch) = input[..span.start].chars().next_back() {
            span.start -= ch.len_utf8();
        }
    }
    while span.end < input.len() && !input.is_char_boundary(span.end) {
        span.end += 1;
    }
    span
}

fn label_for(err: &NotationError) -> &'static str {
    match err {
        NotationError::Empty => "nothing to roll",
        NotationError::MissingSeparator { .. } => "expected 'd' here",
        NotationError::MissingSides { .. } => "expected a number of sides",
        NotationError::CountTooSmall { .. } | NotationError::CountTooLarge { .. } => {
            "die count out of range"
        }
        NotationError::TooFewSides { .. } | NotationError::SidesOutOfRange { .. } => {
            "sides out of range"
        }
        NotationError::MissingOperationCount { .. } => "expected a count",
        NotationError::ZeroOperationCount { .. }
        | NotationError::OperationCountOutOfRange { .. } => "count out of range",
        NotationError::UnknownOperation { .. } => "try kh, kl, dh or dl",
        NotationError::MissingModifier { .. } => "expected a number",
        NotationError::ModifierOutOfRange { .. } => "modifier out of range",
        NotationError::UnexpectedCharacter { .. } => "unexpected",
    }
}
