//! Pulls the human-relevant error lines out of pdflatex's console output.
//!
//! pdflatex reports errors as a line starting with `!`, usually followed a few
//! lines later by a `l.<n>` line naming the offending source line.

/// Upper bound on reported error lines; a broken preamble can cascade into hundreds.
pub const MAX_ERROR_LINES: usize = 20;

/// How far past a `!` line to look for its `l.<n>` location line.
const LOCATION_LOOKAHEAD: usize = 4;

/// Returns the toolchain's error lines, each joined with its location line when one follows.
pub fn summarize_errors(output: &str) -> Vec<String> {
    let lines: Vec<&str> = output.lines().collect();
    let mut errors = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(message) = line.strip_prefix('!') else {
            continue;
        };
        let message = message.trim();
        if message.is_empty() {
            continue;
        }

        let location = lines
            .iter()
            .skip(idx + 1)
            .take(LOCATION_LOOKAHEAD)
            .take_while(|l| !l.starts_with('!'))
            .find(|l| is_location_line(l));

        errors.push(match location {
            Some(loc) => format!("{message} ({})", loc.trim()),
            None => message.to_string(),
        });

        if errors.len() == MAX_ERROR_LINES {
            break;
        }
    }

    errors
}

fn is_location_line(line: &str) -> bool {
    line.strip_prefix("l.")
        .map(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(false)
}
