//! Restricted literal parser for default values.
//!
//! Only literal forms are accepted: numbers, strings, booleans, `None` and
//! nested list / tuple / dict displays. Names, calls, operators and every
//! other expression are rejected, so a default value is never evaluated.

use crate::inference::TypeLabel;
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, tag_no_case, take, take_until},
    character::complete::{char, digit1, hex_digit1, multispace0, one_of},
    combinator::{all_consuming, map, opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    /// An integer outside the `i64` range, kept as its normalized source text.
    BigInt(String),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// The vocabulary label of this literal's type; `None` for the `None` literal.
    pub fn type_label(&self) -> Option<TypeLabel> {
        match self {
            Literal::None => None,
            Literal::Bool(_) => Some(TypeLabel::Boolean),
            Literal::Int(_) | Literal::BigInt(_) => Some(TypeLabel::Integer),
            Literal::Float(_) => Some(TypeLabel::Float),
            Literal::Str(_) => Some(TypeLabel::String),
            Literal::List(_) | Literal::Tuple(_) => Some(TypeLabel::List),
            Literal::Dict(_) => Some(TypeLabel::Dict),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Literal::None => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::from(*i),
            Literal::BigInt(text) => text
                .parse::<u64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(text.clone())),
            Literal::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::Str(s) => Value::String(s.clone()),
            Literal::List(items) | Literal::Tuple(items) => {
                Value::Array(items.iter().map(Literal::to_json).collect())
            }
            Literal::Dict(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, val)| {
                        let key = match key {
                            Literal::Str(s) => s.clone(),
                            other => other.to_json().to_string(),
                        };
                        (key, val.to_json())
                    })
                    .collect(),
            ),
        }
    }
}

/// Parse the complete text as one literal.
pub fn parse_literal(text: &str) -> Option<Literal> {
    all_consuming(ws(literal))(text)
        .ok()
        .map(|(_, literal)| literal)
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((keyword, string, number, list, tuple_display, dict))(input)
}

fn keyword(input: &str) -> IResult<&str, Literal> {
    alt((
        value(Literal::None, tag("None")),
        value(Literal::Bool(true), alt((tag("True"), tag("true")))),
        value(Literal::Bool(false), alt((tag("False"), tag("false")))),
    ))(input)
}

fn string(input: &str) -> IResult<&str, Literal> {
    let (input, _) = opt(one_of("rRuU"))(input)?;
    map(
        alt((
            triple_quoted("\"\"\""),
            triple_quoted("'''"),
            quoted('"', "\\\""),
            quoted('\'', "\\'"),
        )),
        Literal::Str,
    )(input)
}

fn triple_quoted<'a>(quote: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    map(
        delimited(tag(quote), take_until(quote), tag(quote)),
        str::to_string,
    )
}

fn quoted<'a>(
    quote: char,
    stop: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    map(
        delimited(
            char(quote),
            opt(escaped_transform(
                is_not(stop),
                '\\',
                alt((
                    value("\\", tag("\\")),
                    value("\"", tag("\"")),
                    value("'", tag("'")),
                    value("\n", tag("n")),
                    value("\t", tag("t")),
                    value("\r", tag("r")),
                    take(1usize),
                )),
            )),
            char(quote),
        ),
        Option::unwrap_or_default,
    )
}

fn digits(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        digit1,
        nom::bytes::complete::take_while(|c: char| c.is_ascii_digit() || c == '_'),
    ))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digits)))(input)
}

fn number(input: &str) -> IResult<&str, Literal> {
    alt((hex_integer, decimal))(input)
}

fn hex_integer(input: &str) -> IResult<&str, Literal> {
    map(preceded(tag_no_case("0x"), hex_digit1), |digits: &str| {
        integer(digits, 16).unwrap_or_else(|| Literal::BigInt(format!("0x{}", digits)))
    })(input)
}

/// Integers never overflow into a parse failure; values past `i64` become
/// `BigInt`.
fn integer(digits: &str, radix: u32) -> Option<Literal> {
    if let Ok(value) = i64::from_str_radix(digits, radix) {
        return Some(Literal::Int(value));
    }
    let unsigned = digits.strip_prefix('+').unwrap_or(digits);
    u64::from_str_radix(unsigned, radix)
        .ok()
        .map(|value| Literal::BigInt(value.to_string()))
}

fn decimal(input: &str) -> IResult<&str, Literal> {
    let (rest, text) = recognize(pair(
        opt(one_of("+-")),
        alt((
            recognize(tuple((
                digits,
                opt(pair(char('.'), opt(digits))),
                opt(exponent),
            ))),
            recognize(tuple((char('.'), digits, opt(exponent)))),
        )),
    ))(input)?;

    let cleaned = text.replace('_', "");
    let is_float = cleaned.contains(['.', 'e', 'E']);
    let parsed = if is_float {
        cleaned.parse::<f64>().ok().map(Literal::Float)
    } else {
        integer(&cleaned, 10).or_else(|| {
            let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
            Some(Literal::BigInt(unsigned.to_string()))
        })
    };

    match parsed {
        Some(literal) => Ok((rest, literal)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn elements(input: &str) -> IResult<&str, (Vec<Literal>, bool)> {
    pair(
        separated_list0(char(','), ws(literal)),
        map(opt(ws(char(','))), |comma| comma.is_some()),
    )(input)
}

fn list(input: &str) -> IResult<&str, Literal> {
    map(
        delimited(char('['), ws(elements), char(']')),
        |(items, _)| Literal::List(items),
    )(input)
}

fn tuple_display(input: &str) -> IResult<&str, Literal> {
    let (rest, (mut items, trailing_comma)) = delimited(char('('), ws(elements), char(')'))(input)?;
    // `(x)` is a parenthesized expression, not a one-element tuple.
    if items.len() == 1 && !trailing_comma {
        if let Some(only) = items.pop() {
            return Ok((rest, only));
        }
    }
    Ok((rest, Literal::Tuple(items)))
}

fn dict(input: &str) -> IResult<&str, Literal> {
    map(
        delimited(
            char('{'),
            ws(terminated(
                separated_list0(
                    char(','),
                    ws(separated_pair(literal, ws(char(':')), literal)),
                ),
                opt(ws(char(','))),
            )),
            char('}'),
        ),
        Literal::Dict,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(parse_literal("42"), Some(Literal::Int(42)));
        assert_eq!(parse_literal("-7"), Some(Literal::Int(-7)));
        assert_eq!(parse_literal("1_000"), Some(Literal::Int(1000)));
        assert_eq!(parse_literal("0x1F"), Some(Literal::Int(31)));
        assert_eq!(parse_literal("3.5"), Some(Literal::Float(3.5)));
        assert_eq!(parse_literal("1e-3"), Some(Literal::Float(0.001)));
        assert_eq!(parse_literal(".5"), Some(Literal::Float(0.5)));
        assert_eq!(parse_literal("True"), Some(Literal::Bool(true)));
        assert_eq!(parse_literal("false"), Some(Literal::Bool(false)));
        assert_eq!(parse_literal("None"), Some(Literal::None));
    }

    #[test]
    fn test_integers_past_i64_stay_integers() {
        let parsed = parse_literal("12345678901234567890").unwrap();
        assert_eq!(parsed, Literal::BigInt("12345678901234567890".into()));
        assert_eq!(parsed.type_label(), Some(TypeLabel::Integer));
        assert_eq!(parsed.to_json(), serde_json::json!(12345678901234567890u64));

        let huge = parse_literal("-123456789012345678901234567890").unwrap();
        assert_eq!(huge.type_label(), Some(TypeLabel::Integer));
        assert_eq!(huge.to_json(), serde_json::json!("-123456789012345678901234567890"));

        assert_eq!(
            parse_literal("0xFFFFFFFFFFFFFFFF"),
            Some(Literal::BigInt("18446744073709551615".into()))
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse_literal("'abc'"), Some(Literal::Str("abc".into())));
        assert_eq!(parse_literal("\"a\\\"b\""), Some(Literal::Str("a\"b".into())));
        assert_eq!(parse_literal("''"), Some(Literal::Str(String::new())));
        assert_eq!(parse_literal("r'raw'"), Some(Literal::Str("raw".into())));
        assert_eq!(
            parse_literal("\"\"\"multi\nline\"\"\""),
            Some(Literal::Str("multi\nline".into()))
        );
    }

    #[test]
    fn test_nested_containers() {
        let parsed = parse_literal("[1, (2, 'x'), {'k': [True, None]}]").unwrap();
        assert_eq!(
            parsed,
            Literal::List(vec![
                Literal::Int(1),
                Literal::Tuple(vec![Literal::Int(2), Literal::Str("x".into())]),
                Literal::Dict(vec![(
                    Literal::Str("k".into()),
                    Literal::List(vec![Literal::Bool(true), Literal::None]),
                )]),
            ])
        );
    }

    #[test]
    fn test_empty_and_trailing_comma_containers() {
        assert_eq!(parse_literal("[]"), Some(Literal::List(vec![])));
        assert_eq!(parse_literal("[ ]"), Some(Literal::List(vec![])));
        assert_eq!(parse_literal("{}"), Some(Literal::Dict(vec![])));
        assert_eq!(parse_literal("()"), Some(Literal::Tuple(vec![])));
        assert_eq!(
            parse_literal("[1, 2,]"),
            Some(Literal::List(vec![Literal::Int(1), Literal::Int(2)]))
        );
        assert_eq!(parse_literal("(1,)"), Some(Literal::Tuple(vec![Literal::Int(1)])));
        assert_eq!(parse_literal("(1)"), Some(Literal::Int(1)));
    }

    #[test]
    fn test_expressions_are_rejected() {
        assert_eq!(parse_literal("os.getcwd()"), None);
        assert_eq!(parse_literal("float('inf')"), None);
        assert_eq!(parse_literal("1 + 2"), None);
        assert_eq!(parse_literal("__import__('os').system('ls')"), None);
        assert_eq!(parse_literal("SOME_CONSTANT"), None);
        assert_eq!(parse_literal(""), None);
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(Literal::Int(1).type_label(), Some(TypeLabel::Integer));
        assert_eq!(Literal::Tuple(vec![]).type_label(), Some(TypeLabel::List));
        assert_eq!(Literal::None.type_label(), None);
    }

    #[test]
    fn test_json_rendering() {
        let parsed = parse_literal("{'a': (1, 2.5), 3: 'x'}").unwrap();
        assert_eq!(
            parsed.to_json(),
            serde_json::json!({"a": [1, 2.5], "3": "x"})
        );
    }
}
