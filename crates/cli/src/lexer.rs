//! Shell-like splitting of a typed line into validator tokens.
//!
//! Words are separated by runs of whitespace, and every run becomes one
//! `Whitespace` token. Single quotes are literal, double quotes allow
//! backslash escapes, and a backslash outside quotes escapes the next
//! character. An unterminated quote runs to the end of the line, since the
//! line is usually still being typed.
//!
//! The first word is the command. An unquoted word starting with `-` (other
//! than a lone `-`) is an option until a bare `--` ends option parsing.
//! `--name=value` splits into an option and an argument with no whitespace
//! between them.

use argspec_core::{Span, Token, TokenId, TokenKind};

struct Word {
    start: usize,
    end: usize,
    text: String,
    /// First character was an unquoted `-`.
    dashed: bool,
    /// Line offset and text length at the first unquoted `=`.
    eq: Option<(usize, usize)>,
}

fn read_word(line: &str, start: usize) -> Word {
    let mut text = String::new();
    let mut dashed = false;
    let mut eq = None;
    let mut quote: Option<char> = None;
    let mut chars = line[start..].char_indices().peekable();
    let mut end = line.len();

    while let Some((rel, c)) = chars.next() {
        let at = start + rel;
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    text.push(c);
                }
            }
            Some(_) => match c {
                '"' => quote = None,
                '\\' => {
                    if let Some((_, next)) = chars.next() {
                        text.push(next);
                    }
                }
                _ => text.push(c),
            },
            None => match c {
                c if c.is_whitespace() => {
                    end = at;
                    break;
                }
                '\'' | '"' => quote = Some(c),
                '\\' => {
                    if let Some((_, next)) = chars.next() {
                        text.push(next);
                    }
                }
                _ => {
                    if rel == 0 && c == '-' {
                        dashed = true;
                    }
                    if c == '=' && eq.is_none() {
                        eq = Some((at, text.len()));
                    }
                    text.push(c);
                }
            },
        }
    }

    Word {
        start,
        end,
        text,
        dashed,
        eq,
    }
}

#[derive(Default)]
struct Tokens {
    out: Vec<Token>,
}

impl Tokens {
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let id = TokenId(self.out.len());
        self.out.push(Token::new(id, kind, Span::new(start, end)));
    }
}

/// Split `line` into tokens with sequential ids and byte spans.
pub(crate) fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Tokens::default();
    let mut seen_command = false;
    let mut options_done = false;
    let mut pos = 0;

    while let Some(c) = line[pos..].chars().next() {
        if c.is_whitespace() {
            let run: usize = line[pos..]
                .chars()
                .take_while(|c| c.is_whitespace())
                .map(char::len_utf8)
                .sum();
            tokens.push(TokenKind::Whitespace, pos, pos + run);
            pos += run;
            continue;
        }

        let word = read_word(line, pos);
        pos = word.end;

        if !seen_command {
            seen_command = true;
            tokens.push(TokenKind::Command(word.text), word.start, word.end);
            continue;
        }
        if options_done || !word.dashed || word.text == "-" {
            tokens.push(TokenKind::Argument(word.text), word.start, word.end);
            continue;
        }
        if word.text == "--" {
            options_done = true;
            continue;
        }
        match word.eq {
            Some((at, split)) if word.text.starts_with("--") => {
                let (name, value) = word.text.split_at(split);
                tokens.push(TokenKind::Option(name.to_string()), word.start, at);
                tokens.push(
                    TokenKind::Argument(value[1..].to_string()),
                    at + 1,
                    word.end,
                );
            }
            _ => tokens.push(TokenKind::Option(word.text), word.start, word.end),
        }
    }
    tokens.out
}
