//! Base-name glob matching for archive filters
//!
//! Patterns are matched against a single path segment (the file name), so
//! `*` never spans directories. They use shell syntax: `*`, `?`, `[...]`
//! classes negated with `^`, and `\` escapes. Anything else is literal text
//! and is escaped before the pattern is handed to wax.

use std::iter::Peekable;
use std::str::Chars;

use wax::{CandidatePath, Glob, Pattern};

/// A compiled list of glob patterns
#[derive(Debug)]
pub struct GlobSet {
    globs: Vec<Glob<'static>>,
}

impl GlobSet {
    /// Compile `patterns`, failing on the first invalid one
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, String> {
        let globs = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                let invalid = |e: &dyn std::fmt::Display| format!("invalid glob '{pattern}': {e}");
                let expression = to_wax(pattern).map_err(|e| invalid(&e))?;
                Glob::new(&expression)
                    .map(Glob::into_owned)
                    .map_err(|e| invalid(&e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { globs })
    }

    /// True if `name` matches at least one pattern
    pub fn matches_any(&self, name: &str) -> bool {
        let candidate = CandidatePath::from(name);
        self.globs.iter().any(|glob| glob.matched(&candidate).is_some())
    }
}

/// Rewrite a shell-style pattern as a wax expression matching the same names
fn to_wax(pattern: &str) -> Result<String, String> {
    let mut expression = String::with_capacity(pattern.len());
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if matches!(c, '*' | '?' | '[') {
            expression.push_str(&wax::escape(&literal));
            literal.clear();
        }
        match c {
            '*' => {
                // wax rejects adjacent `*`, and a run means the same as one
                while chars.next_if_eq(&'*').is_some() {}
                expression.push('*');
            }
            '?' => expression.push('?'),
            '[' => expression.push_str(&class(&mut chars)?),
            '\\' => literal.push(escaped(&mut chars)?),
            _ => literal.push(c),
        }
    }
    expression.push_str(&wax::escape(&literal));

    Ok(expression)
}

fn escaped(chars: &mut Peekable<Chars<'_>>) -> Result<char, String> {
    match chars.next() {
        None => Err("trailing escape".to_string()),
        Some('\\') => Err("literal backslash is not supported".to_string()),
        Some(c) => Ok(c),
    }
}

/// Translate a character class; the opening `[` is already consumed
fn class(chars: &mut Peekable<Chars<'_>>) -> Result<String, String> {
    let negated = chars.next_if_eq(&'^').is_some();
    let mut ranges: Vec<(char, char)> = Vec::new();

    loop {
        match chars.peek() {
            None => return Err("unterminated character class".to_string()),
            Some(']') if !ranges.is_empty() => {
                chars.next();
                break;
            }
            _ => {}
        }
        let lo = class_char(chars)?;
        let hi = if chars.next_if_eq(&'-').is_some() {
            class_char(chars)?
        } else {
            lo
        };
        ranges.push((lo, hi));
    }

    // A leading `!` negates a wax class, so move it out of first position
    if !negated && ranges[0].0 == '!' {
        match ranges.iter().position(|&(lo, hi)| lo != '!' || hi > '!') {
            Some(i) => {
                ranges.swap(0, i);
                if ranges[0].0 == '!' {
                    ranges[0].0 = '"';
                    ranges.push(('!', '!'));
                }
            }
            None => return Ok("!".to_string()),
        }
    }

    let mut out = String::from("[");
    if negated {
        out.push('!');
    }
    for (lo, hi) in ranges {
        push_class_char(&mut out, lo)?;
        if hi != lo {
            out.push('-');
            push_class_char(&mut out, hi)?;
        }
    }
    out.push(']');

    Ok(out)
}

fn class_char(chars: &mut Peekable<Chars<'_>>) -> Result<char, String> {
    match chars.next() {
        None => Err("unterminated character class".to_string()),
        Some('-' | ']') => Err("malformed range in character class".to_string()),
        Some('\\') => escaped(chars),
        Some(c) => Ok(c),
    }
}

fn push_class_char(out: &mut String, c: char) -> Result<(), String> {
    match c {
        '[' | ']' | '-' => {
            out.push('\\');
            out.push(c);
        }
        '\\' => return Err("literal backslash is not supported".to_string()),
        _ => out.push(c),
    }
    Ok(())
}

/// Include/exclude decision for file names
#[derive(Debug)]
pub struct NameFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl NameFilter {
    pub fn new(include: GlobSet, exclude: GlobSet) -> Self {
        Self { include, exclude }
    }

    /// A file is archived iff its name matches an include pattern and no
    /// exclude pattern.
    pub fn should_include(&self, name: &str) -> bool {
        self.include.matches_any(name) && !self.exclude.matches_any(name)
    }
}
