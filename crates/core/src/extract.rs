//! Structured candidate recovery from raw model output.
//!
//! Completions are rarely clean JSON: they arrive wrapped in prose,
//! single-quoted, truncated mid-object, or followed by commentary. Recovery
//! runs three stages in increasing order of leniency, so well-formed output
//! is never touched by the repair paths:
//!
//! 1. strict parse of the whole text as a JSON object
//! 2. strict parse of the first balanced brace-delimited region
//! 3. lenient repair (quote normalization, truncation closing, trailing
//!    comma removal) of that region, then one final parse

use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// The last recovery stage attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    Strict,
    BraceScan,
    Lenient,
}

impl ExtractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStage::Strict => "strict",
            ExtractionStage::BraceScan => "brace_scan",
            ExtractionStage::Lenient => "lenient",
        }
    }
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// No recovery stage produced a parseable mapping.
#[derive(Debug, Clone, Error)]
#[error("no parseable structure in model output ({stage} stage)")]
pub struct ExtractionError {
    /// Stage at which recovery gave up.
    pub stage: ExtractionStage,
    /// The unmodified model output, kept for diagnostics.
    pub raw: String,
}

static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Recover a candidate mapping from raw model text.
pub fn extract(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    if let Some(map) = parse_object(raw.trim()) {
        return Ok(map);
    }

    if let Scan::Complete(region) = scan_object(raw) {
        if let Some(map) = parse_object(region) {
            return Ok(map);
        }
    }

    lenient(raw).ok_or_else(|| ExtractionError {
        stage: if raw.contains('{') {
            ExtractionStage::Lenient
        } else {
            ExtractionStage::BraceScan
        },
        raw: raw.to_string(),
    })
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

enum Scan<'a> {
    /// The first balanced brace-delimited region. Leading prose and
    /// trailing commentary fall outside it.
    Complete(&'a str),
    /// Text ran out before the object closed.
    Truncated {
        body: &'a str,
        /// Closing delimiters still owed, innermost last.
        closers: Vec<char>,
        in_string: bool,
    },
    /// No opening brace at all.
    NoObject,
}

/// Walk the text from its first `{`, tracking nesting depth and skipping
/// delimiters inside double-quoted strings (with escape handling).
fn scan_object(text: &str) -> Scan<'_> {
    let start = match text.find('{') {
        Some(i) => i,
        None => return Scan::NoObject,
    };

    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                // Mismatched closers are treated as content; the final
                // parse decides whether the region is usable.
                if closers.last() == Some(&c) {
                    closers.pop();
                    if closers.is_empty() {
                        return Scan::Complete(&text[start..start + offset + c.len_utf8()]);
                    }
                }
            }
            _ => {}
        }
    }

    Scan::Truncated {
        body: &text[start..],
        closers,
        in_string,
    }
}

fn lenient(raw: &str) -> Option<Map<String, Value>> {
    let start = raw.find('{')?;
    let normalized = normalize_quotes(&raw[start..]);

    let candidate = match scan_object(&normalized) {
        Scan::Complete(region) => region.to_string(),
        Scan::Truncated { body, closers, in_string } => close_truncated(body, &closers, in_string),
        Scan::NoObject => return None,
    };

    let cleaned = TRAILING_COMMA.replace_all(&candidate, "$1");
    parse_object(&cleaned)
}

/// Close an object that was cut off mid-stream: terminate an open string,
/// then append the owed closing delimiters innermost-first.
fn close_truncated(body: &str, closers: &[char], in_string: bool) -> String {
    let mut repaired = String::with_capacity(body.len() + closers.len() + 1);
    repaired.push_str(body);
    if in_string {
        repaired.push('"');
    }
    for c in closers.iter().rev() {
        repaired.push(*c);
    }
    repaired
}

/// Replace smart quotes with straight ones and convert single-quoted
/// strings to double-quoted, leaving apostrophes inside double-quoted
/// strings untouched.
fn normalize_quotes(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            c => c,
        })
        .collect();

    let mut out = String::with_capacity(flat.len());
    let mut chars = flat.chars().peekable();
    let mut in_double = false;
    let mut in_single = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if in_single && chars.peek() == Some(&'\'') => {
                // Escaped quote inside a single-quoted string becomes a
                // plain apostrophe.
                chars.next();
                out.push('\'');
            }
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '"' if in_single => out.push_str("\\\""),
            '"' => {
                in_double = !in_double;
                out.push('"');
            }
            '\'' if in_double => out.push('\''),
            '\'' => {
                in_single = !in_single;
                out.push('"');
            }
            c => out.push(c),
        }
    }

    out
}
