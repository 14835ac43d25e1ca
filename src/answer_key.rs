use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Sentinel returned when a descriptor cannot be mapped to any option.
/// Callers must treat this as "cannot determine correctness", never as a
/// wrong answer.
pub const NO_MATCH: i32 = -1;

// Leading one-based ordinal followed by a single punctuation delimiter,
// optionally separated by one space: "2)", "2.", "2:", "2 -", "12) ...".
// Bare digits with no delimiter are NOT an ordinal; they fall through to
// exact matching so an option that is literally "42" still resolves.
static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s?[).:\]-]").expect("ordinal prefix regex is valid"));

/// Map a stored correct-answer descriptor to the index of the matching
/// option.
///
/// The authoring pipeline does not keep descriptor text byte-identical to
/// the option text, but the ordinal prefix is stable, so the ordinal wins
/// whenever one is present regardless of what the remaining text says.
/// Without an ordinal, the descriptor must equal an option exactly.
pub fn resolve_correct_index(options: &[String], descriptor: &str) -> i32 {
    if let Some(captures) = ORDINAL_PREFIX.captures(descriptor) {
        // Capture group is all digits; overflow means a garbage descriptor.
        if let Ok(ordinal) = captures[1].parse::<usize>() {
            if ordinal >= 1 && ordinal <= options.len() {
                return (ordinal - 1) as i32;
            }
            debug!(
                descriptor = %descriptor,
                ordinal,
                option_count = options.len(),
                "Ordinal prefix out of range for option list"
            );
            return NO_MATCH;
        }
    }

    options
        .iter()
        .position(|option| option == descriptor)
        .map(|index| index as i32)
        .unwrap_or(NO_MATCH)
}
