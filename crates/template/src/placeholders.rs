use crate::error::{ErrorKind, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

// Only purely numeric placeholders count. `\d` would also match non-ASCII digits.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{([0-9]+)\}\}").unwrap());

/// Outcome of scanning a template body for numbered placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholders {
    /// Number of in-sequence placeholders seen before the scan finished or
    /// hit the first out-of-sequence one.
    pub count: usize,
    pub valid: bool,
}
impl Placeholders {
    /// Scans `text` left to right; see [`count_and_validate`].
    pub fn scan(text: &str) -> Self {
        match first_violation(text) {
            Ok(count) => Self { count, valid: true },
            Err((count, _)) => Self { count, valid: false },
        }
    }
}
impl From<Placeholders> for (usize, bool) {
    fn from(placeholders: Placeholders) -> Self {
        (placeholders.count, placeholders.valid)
    }
}

/// Counts the `{{n}}` placeholders in `text` and checks they run `1, 2, 3, ...`
/// in order of appearance.
///
/// Anything between braces that is not purely digits (`{a}`, `{ {1} }`, a
/// lone `{`) is ignored rather than flagged. The scan stops at the first
/// placeholder out of sequence, in which case the count covers only the
/// placeholders before it, not every placeholder in the text.
///
/// ```
/// use wabaman_template::count_and_validate;
///
/// assert_eq!(count_and_validate("Hi {{1}}, your order {{2}} shipped"), (2, true));
/// assert_eq!(count_and_validate("Hi {{1}}, your order {{3}} shipped"), (1, false));
/// assert_eq!(count_and_validate("No placeholders"), (0, true));
/// ```
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn count_and_validate(text: &str) -> (usize, bool) {
    Placeholders::scan(text).into()
}

/// Like [`count_and_validate`], but reports an out-of-sequence placeholder as
/// an error naming what was expected and what was found.
pub fn validate(text: &str) -> Result<usize> {
    match first_violation(text) {
        Ok(count) => Ok(count),
        Err((count, found)) => exn::bail!(ErrorKind::OutOfSequence {
            expected: count + 1,
            found: found.to_string(),
        }),
    }
}

/// Returns the placeholder count, or the count so far and the offending digits.
fn first_violation(text: &str) -> std::result::Result<usize, (usize, &str)> {
    let mut count = 0;
    for captures in PLACEHOLDER_REGEX.captures_iter(text) {
        let digits = captures.get(1).map_or("", |m| m.as_str());
        // Numbers too large to represent can never be the next expected one.
        if digits.parse::<usize>().ok() != Some(count + 1) {
            tracing::debug!(expected = count + 1, found = digits, "Placeholder out of sequence");
            return Err((count, digits));
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bolovo {{1}} pegue 2 pague {{2}}", 2, true)]
    #[case("", 0, true)]
    #[case("{", 0, true)]
    #[case("}", 0, true)]
    #[case("{}", 0, true)]
    #[case("{a}", 0, true)]
    #[case("{a}{b}", 0, true)]
    #[case("hello { {{1}}", 1, true)]
    #[case("hello { {{1}} }", 1, true)]
    #[case("hello { {{1}} {{2}} }", 2, true)]
    #[case("hello { {{3}} {{2}} {{1}} }", 0, false)]
    fn test_count_and_validate(#[case] text: &str, #[case] count: usize, #[case] valid: bool) {
        assert_eq!(count_and_validate(text), (count, valid));
    }

    #[rstest]
    // Partial count: only placeholders before the violation are counted.
    #[case("{{1}} {{2}} {{4}} {{3}}", 2, false)]
    #[case("{{1}} {{1}}", 1, false)]
    #[case("{{0}}", 0, false)]
    #[case("{{1}}{{2}}{{3}}", 3, true)]
    #[case("{{{1}}}", 1, true)]
    #[case("{{ 1 }} {{x}} {{1a}}", 0, true)]
    #[case("{{1}} {{99999999999999999999999999}}", 1, false)]
    #[case("{{1}} {{٢}}", 1, true)]
    #[case("{{01}} {{002}}", 2, true)]
    fn test_edge_cases(#[case] text: &str, #[case] count: usize, #[case] valid: bool) {
        assert_eq!(Placeholders::scan(text), Placeholders { count, valid });
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate("{{1}} and {{2}}").unwrap(), 2);

        let err = validate("{{1}} then {{3}}").unwrap_err();
        assert_eq!(*err, ErrorKind::OutOfSequence { expected: 2, found: "3".to_string() });
    }
}
