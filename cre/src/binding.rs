//! Declarative event bindings.
//!
//! Widget markup wires DOM events to actions with attributes of the form
//! `@click="increment"` or `@click="setCount(5, foo)"`. The attribute name is
//! the [`PREFIX`] followed by the event type, the value follows this grammar:
//!
//! ```text
//! binding := ws* ident ws* [ "(" args ")" ] ws*
//! ident   := [A-Za-z0-9_]+
//! args    := <empty> | arg ( "," arg )*
//! arg     := any characters except "," "(" ")"
//! ```
//!
//! Arguments are trimmed. An argument that parses as a finite number becomes
//! [`Arg::Number`], anything else is kept verbatim as [`Arg::Text`].
//! There is no quoting and no expression evaluation.
//!
//! Number detection uses Rust's `f64` parser, not JavaScript's `Number()`
//! coercion, and empty arguments are rejected instead of coerced to `0`:
//!
//! | value        | here                          | `Number()` coercion |
//! |--------------|-------------------------------|---------------------|
//! | `f(0x10)`    | `Text("0x10")`                | `16`                |
//! | `f(Infinity)`| `Text("Infinity")`            | `Infinity`          |
//! | `f(a, )`     | [`ParseError::EmptyArgument`] | `["a", 0]`          |
//! | `reset()`    | no arguments                  | `[0]`               |

use std::str::FromStr;

/// Attribute name prefix marking a declarative event binding.
pub const PREFIX: char = '@';

/// Extract the event type from a binding attribute name.
///
/// Returns `None` if the attribute is not a binding.
pub fn event_type(attr_name: &str) -> Option<&str> {
    attr_name
        .strip_prefix(PREFIX)
        .filter(|event| !event.is_empty())
}

/// A literal argument of a binding call.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Number(f64),
    Text(String),
}

impl Arg {
    fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }
}

/// A parsed binding value: the action to invoke and its arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub action: String,
    pub args: Vec<Arg>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("binding is empty")]
    Empty,
    #[error("invalid action name '{0}'")]
    InvalidIdentifier(String),
    #[error("argument list is missing a closing parenthesis")]
    Unclosed,
    #[error("unexpected input after argument list: '{0}'")]
    TrailingInput(String),
    #[error("argument {0} is empty")]
    EmptyArgument(usize),
    #[error("nested parenthesis in argument list")]
    Nested,
}

fn is_ident(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Binding {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let (name, rest) = match input.find('(') {
            Some(open) => (input[..open].trim_end(), Some(&input[open + 1..])),
            None => (input, None),
        };
        if !is_ident(name) {
            return Err(ParseError::InvalidIdentifier(name.to_string()));
        }

        let args = match rest {
            Some(rest) => {
                let close = rest.find(')').ok_or(ParseError::Unclosed)?;
                let args = Self::parse_args(&rest[..close])?;
                let trailing = &rest[close + 1..];
                if !trailing.is_empty() {
                    return Err(ParseError::TrailingInput(trailing.to_string()));
                }
                args
            }
            None => Vec::new(),
        };

        Ok(Self {
            action: name.to_string(),
            args,
        })
    }

    fn parse_args(list: &str) -> Result<Vec<Arg>, ParseError> {
        if list.contains('(') {
            return Err(ParseError::Nested);
        }
        if list.trim().is_empty() {
            return Ok(Vec::new());
        }

        list.split(',')
            .enumerate()
            .map(|(index, raw)| {
                let raw = raw.trim();
                if raw.is_empty() {
                    Err(ParseError::EmptyArgument(index))
                } else {
                    Ok(Arg::parse(raw))
                }
            })
            .collect()
    }
}

impl FromStr for Binding {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Arg {
        Arg::Text(s.to_string())
    }

    #[test]
    fn test_parse_call_with_mixed_args() {
        let b = Binding::parse("setCount(5, foo)").unwrap();
        assert_eq!(b.action, "setCount");
        assert_eq!(b.args, vec![Arg::Number(5.0), text("foo")]);
    }

    #[test]
    fn test_parse_bare_name() {
        let b: Binding = "reset".parse().unwrap();
        assert_eq!(b.action, "reset");
        assert!(b.args.is_empty());

        let b = Binding::parse("  reset  ").unwrap();
        assert_eq!(b.action, "reset");
    }

    #[test]
    fn test_parse_empty_call() {
        let b = Binding::parse("reset()").unwrap();
        assert_eq!(b.action, "reset");
        assert!(b.args.is_empty());

        let b = Binding::parse("reset ( ) ").unwrap();
        assert!(b.args.is_empty());
    }

    #[test]
    fn test_numeric_coercion() {
        let b = Binding::parse("f(-1.5, 2e3, 0x10, Infinity, NaN, 'q')").unwrap();
        assert_eq!(
            b.args,
            vec![
                Arg::Number(-1.5),
                Arg::Number(2000.0),
                text("0x10"),
                text("Infinity"),
                text("NaN"),
                text("'q'"),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Binding::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            Binding::parse("do it"),
            Err(ParseError::InvalidIdentifier("do it".into()))
        );
        assert_eq!(
            Binding::parse("(1)"),
            Err(ParseError::InvalidIdentifier("".into()))
        );
        assert_eq!(Binding::parse("f(1, 2"), Err(ParseError::Unclosed));
        assert_eq!(
            Binding::parse("f(1) + g()"),
            Err(ParseError::TrailingInput(" + g()".into()))
        );
        assert_eq!(Binding::parse("f(1,,2)"), Err(ParseError::EmptyArgument(1)));
        assert_eq!(Binding::parse("f(a, )"), Err(ParseError::EmptyArgument(1)));
        assert_eq!(Binding::parse("f(g(1))"), Err(ParseError::Nested));
    }

    #[test]
    fn test_event_type() {
        assert_eq!(event_type("@click"), Some("click"));
        assert_eq!(event_type("@"), None);
        assert_eq!(event_type("onclick"), None);
        assert_eq!(event_type("class"), None);
    }
}
