//! JSONC pre-processing for hand-written command tables and the diagnostics
//! catalogue.
//!
//! Supports:
//! - `//` line comments
//! - `/* ... */` block comments (newlines inside are kept so that
//!   `serde_json` error positions still point at the original line)
//! - trailing commas before `}` or `]`
//! - string literal preservation (including escapes)

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Str,
    StrEscape,
    LineComment,
    BlockComment,
}

/// Strip `//` and `/* */` comments from JSONC input.
///
/// Comment-like sequences inside string literals are left untouched.
#[must_use]
pub fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut mode = Mode::Code;

    while let Some(c) = chars.next() {
        match mode {
            Mode::Code => match (c, chars.peek()) {
                ('"', _) => {
                    out.push(c);
                    mode = Mode::Str;
                }
                ('/', Some('/')) => {
                    chars.next();
                    mode = Mode::LineComment;
                }
                ('/', Some('*')) => {
                    chars.next();
                    mode = Mode::BlockComment;
                }
                _ => out.push(c),
            },
            Mode::Str => {
                out.push(c);
                match c {
                    '\\' => mode = Mode::StrEscape,
                    '"' => mode = Mode::Code,
                    _ => {}
                }
            }
            Mode::StrEscape => {
                out.push(c);
                mode = Mode::Str;
            }
            Mode::LineComment => {
                if c == '\n' {
                    out.push(c);
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    mode = Mode::Code;
                } else if c == '\n' {
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Remove commas that directly precede a closing `}` or `]` (ignoring
/// whitespace). Expects comment-free input, i.e. the output of
/// [`strip_jsonc`].
#[must_use]
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_str = false;
    let mut escaped = false;
    // Byte offset in `out` of a comma that may turn out to be trailing.
    let mut pending_comma: Option<usize> = None;

    for c in input.chars() {
        if in_str {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_str = false;
            }
            continue;
        }
        match c {
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
            }
            '}' | ']' => {
                if let Some(at) = pending_comma.take() {
                    out.remove(at);
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                pending_comma = None;
                if c == '"' {
                    in_str = true;
                }
                out.push(c);
            }
        }
    }
    out
}

/// Full JSONC normalization: comments, then trailing commas.
#[must_use]
pub fn normalize_jsonc(input: &str) -> String {
    strip_trailing_commas(&strip_jsonc(input))
}
