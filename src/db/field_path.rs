// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore field paths for update masks.
//!
//! A path is a dot-separated list of segments. Segments that are not plain
//! identifiers (`[A-Za-z_][A-Za-z0-9_]*`) are wrapped in backticks, with
//! backticks and backslashes inside them escaped by a backslash.

/// Quote a single segment if needed.
pub fn segment(name: &str) -> String {
    if is_simple(name) {
        return name.to_string();
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for c in name.chars() {
        if c == '`' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('`');
    quoted
}

/// Build a path from raw (unquoted) segments.
pub fn join(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| segment(s))
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a path back into raw segments.
pub fn split(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '`' => quoted = !quoted,
            '\\' if quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '.' if !quoted => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

fn is_simple(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
