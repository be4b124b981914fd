//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_SPAN!` - Creates a Span covering `len` bytes from the lexer position
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a Span starting at the lexer's current position.
///
/// # Arguments
///
/// * `$lexer` - The lexer whose position and file are used
/// * `$len` - Length of the spanned text in bytes
#[macro_export]
macro_rules! MK_SPAN {
    ($lexer:expr, $len:expr) => {
        Span {
            start: Position($lexer.pos as u32, Rc::clone(&$lexer.file)),
            end: Position(($lexer.pos + $len) as u32, Rc::clone(&$lexer.file)),
        }
    };
}
