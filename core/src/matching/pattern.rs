use log::warn;
use regex::{Regex, RegexBuilder};

const DELIMITERS: &[char] = &['/', '#', '~', '%', '@', '!', '|', '+'];
const FLAGS: &str = "imsxuUDAJn";

/// **DELIMITED PATTERN IDENTIFIER**
///
/// `/body/flags` style identifier compiled once. Flags are mapped onto the
/// regex builder; `u`, `D`, `J` and `n` are accepted and have no effect.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Returns `None` when `id` is not a pattern or does not compile.
    pub fn parse(id: &str) -> Option<Pattern> {
        let (body, flags) = split(id)?;

        let source = if flags.contains('A') {
            format!(r"\A(?:{})", body)
        } else {
            body.to_string()
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .ignore_whitespace(flags.contains('x'))
            .swap_greed(flags.contains('U'))
            .build();

        match regex {
            Ok(regex) => Some(Pattern {
                source: id.to_string(),
                regex,
            }),
            Err(e) => {
                warn!("Pattern identifier {} does not compile and will never match: {}", id, e);
                None
            }
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// True if `id` has the shape of a delimiter-wrapped pattern.
pub fn is_pattern(id: &str) -> bool {
    split(id).is_some()
}

fn split(id: &str) -> Option<(&str, &str)> {
    let delimiter = id.chars().next()?;
    if !DELIMITERS.contains(&delimiter) {
        return None;
    }
    let rest = &id[delimiter.len_utf8()..];
    let close = rest.rfind(delimiter)?;
    let flags = &rest[close + delimiter.len_utf8()..];
    if !flags.chars().all(|c| FLAGS.contains(c)) {
        return None;
    }
    Some((&rest[..close], flags))
}
