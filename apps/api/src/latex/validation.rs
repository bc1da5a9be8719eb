use thiserror::Error;

/// Markers every compilable LaTeX document must contain.
pub const REQUIRED_MARKERS: [&str; 3] = [r"\documentclass", r"\begin{document}", r"\end{document}"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("No LaTeX content provided")]
    Empty,

    #[error("Invalid LaTeX structure: missing {}", .0.join(", "))]
    MissingMarkers(Vec<&'static str>),
}

/// Rejects markup that cannot possibly compile, before any toolchain process is spawned.
pub fn validate_markup(markup: &str) -> Result<(), MarkupError> {
    if markup.trim().is_empty() {
        return Err(MarkupError::Empty);
    }

    let missing: Vec<&'static str> = REQUIRED_MARKERS
        .iter()
        .copied()
        .filter(|marker| !markup.contains(marker))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MarkupError::MissingMarkers(missing))
    }
}
