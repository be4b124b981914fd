#![allow(clippy::module_inception)]

use std::{fmt::Write, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod codegen;
pub mod driver;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

const NULL_FILE: &str = "<null>";

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from(NULL_FILE)))
    }

    pub fn is_null(&self) -> bool {
        self.1.as_str() == NULL_FILE
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Finds the line containing byte offset `position` in `source`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line, or `None` when `position` is past the end.
/// The end of the source itself maps to the end of the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut last = None;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        last = Some((index + 1, line, start));
        start = end;
    }

    last.map(|(line_number, line, line_start)| {
        let line_pos = (pos - line_start).min(line.trim_end_matches('\n').len());
        (line_number, line.to_string(), line_pos)
    })
}

/// Renders an error the way the compiler reports it:
///
/// ```text
/// Error: ExpectedCloseParen (Unexpected token: `EOF`, ...)
/// -> test.ash
///   |
/// 1 | def foo(x) (x + 1
///   | ---------------^
/// ```
///
/// Errors without a position (or pointing past the source) only get the
/// header line.
pub fn format_error(error: &Error, source: &str) -> String {
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }

    let position = error.get_position();
    if position.is_null() {
        return out;
    }

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        let _ = writeln!(out, "-> {}", position.1);
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let _ = writeln!(out, "-> {}", position.1);
    let _ = writeln!(out, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());

    let column = line_text
        .get(..line_pos)
        .map_or(line_pos, |prefix| prefix.chars().count());
    let arrows = column.saturating_sub(removed_whitespace) + 1;

    let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");
    out
}

/// Prints [`format_error`] to stderr.
pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", format_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
