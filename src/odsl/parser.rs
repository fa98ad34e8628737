//! Parser for the scheduling command language
//!
//! Accepts exactly one command of the form `name("arg", "arg", ...)`. There is
//! no recovery: unknown names, wrong argument counts, unquoted arguments,
//! unbalanced parentheses and trailing text are all errors.

use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::delimited,
    IResult, Parser,
};

use crate::odsl::ast::{Command, CommandName};
use crate::odsl::ParseError;

/// Parse a single command
pub fn parse(text: &str) -> Result<Command, ParseError> {
    let (rest, name_text) = ws(identifier)
        .parse(text)
        .map_err(|e| error_at(text, e, "expected a command name"))?;

    let name = CommandName::from_str(name_text).map_err(|_| {
        ParseError::new(
            format!("unknown command `{}`", name_text),
            offset_of(text, name_text),
        )
    })?;

    let arguments_offset = text.len() - rest.len();
    let (rest, arguments) = argument_list(rest).map_err(|e| {
        error_at(
            text,
            e,
            "expected a parenthesized, comma-separated list of quoted strings",
        )
    })?;

    if !rest.is_empty() {
        return Err(ParseError::new(
            format!("unexpected trailing content `{}`", rest.trim_end()),
            text.len() - rest.len(),
        ));
    }

    Command::new(name, arguments).map_err(|e| ParseError::new(e.message, arguments_offset))
}

/// Whether the text mentions any command name at all
pub fn contains_command_name(text: &str) -> bool {
    CommandName::ALL
        .iter()
        .any(|name| text.contains(name.as_str()))
}

/// Strip the markup a model tends to wrap a command in: surrounding
/// whitespace, inline backticks and fenced code blocks.
pub fn strip_code_markup(reply: &str) -> &str {
    let mut text = reply.trim();

    if let Some(fenced) = text.strip_prefix("```") {
        // Drop an info string such as ```text
        let body = match fenced.find('\n') {
            Some(nl) if !fenced[..nl].contains('(') => &fenced[nl + 1..],
            _ => fenced,
        };
        text = body.strip_suffix("```").unwrap_or(body).trim();
    }

    text.trim_matches('`').trim()
}

/// Split the arguments of a command call without validating them.
///
/// Takes the text between the first `(` and the last `)`, splits on commas
/// that are not inside quotes and trims each piece. Quotes are kept.
pub fn split_arguments(text: &str) -> Option<Vec<String>> {
    let open = text.find('(')?;
    let close = text.rfind(')')?;
    if close < open {
        return None;
    }

    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in text[open + 1..close].chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                ',' => {
                    arguments.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    arguments.push(current.trim().to_string());

    if arguments.len() == 1 && arguments[0].is_empty() {
        arguments.clear();
    }
    Some(arguments)
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_').parse(input)
}

fn argument_list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), ws(string_literal)),
        ws(char(')')),
    )
    .parse(input)
}

/// A single- or double-quoted string. A backslash escapes the next character.
fn string_literal(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('"' | '\''))) => c,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut value = String::new();
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            value.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[idx + c.len_utf8()..], value));
        } else {
            value.push(c);
        }
    }

    // Unterminated
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn offset_of(text: &str, fragment: &str) -> usize {
    (fragment.as_ptr() as usize).saturating_sub(text.as_ptr() as usize)
}

fn error_at(text: &str, err: nom::Err<Error<&str>>, expected: &str) -> ParseError {
    let offset = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => text.len() - e.input.len(),
        nom::Err::Incomplete(_) => text.len(),
    };
    ParseError::new(expected.to_string(), offset)
}
