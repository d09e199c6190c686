use std::collections::HashMap;

use nom::{
    IResult, Parser,
    bytes::complete::{is_not, tag, take_till1},
    character::complete::{char, space0},
    combinator::{all_consuming, rest},
    sequence::{delimited, separated_pair, terminated},
};
use tracing::trace;

/// Parses a value wrapped in double quotes, e.g. `"My Pack"`
pub fn parse_between_double_quotes(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), is_not("\""), char('"')).parse(input)
}

/// Parses a `[Section]` header line
pub fn parse_section_header(line: &str) -> IResult<&str, &str> {
    all_consuming(delimited(tag("["), is_not("]"), tag("]"))).parse(line)
}

/// Parses a single `key=value` line into its (untrimmed) key and value
pub fn parse_key_value_cfg(line: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        terminated(take_till1(|c| c == '='), space0),
        char('='),
        rest,
    )
    .parse(line)
}

/// Cleans up a raw value from a settings file, removing surrounding whitespace and quotes
fn clean_value_cfg(raw: &str) -> &str {
    let trimmed = raw.trim();
    match all_consuming(parse_between_double_quotes).parse(trimmed) {
        Ok((_, unquoted)) => unquoted,
        Err(_) => trimmed,
    }
}

fn is_ignored_line(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with(';')
        || parse_section_header(line).is_ok()
}

/// Key-value settings read from one of the launcher's `.cfg` files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings(HashMap<String, String>);

impl Settings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the value of the first of the given keys which is present and non-empty
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.get(key).filter(|value| !value.is_empty()))
    }
}

/// For general parsing of the launcher's `key=value` config files.
///
/// Blank lines, `#`/`;` comments and `[Section]` headers are skipped, as are lines which are
/// not assignments. Later assignments of the same key override earlier ones.
#[tracing::instrument(level = "trace", skip(file_content))]
pub fn parse_settings_cfg(file_content: &str) -> Settings {
    let mut settings = HashMap::new();

    for line in file_content.lines().map(str::trim) {
        if is_ignored_line(line) {
            continue;
        }

        match parse_key_value_cfg(line) {
            Ok((_, (key, value))) => {
                settings.insert(key.trim().to_owned(), clean_value_cfg(value).to_owned());
            }
            Err(_) => trace!("Skipping unparsable settings line: {line:?}"),
        }
    }

    Settings(settings)
}
