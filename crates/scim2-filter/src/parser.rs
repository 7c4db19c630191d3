//! Tokenizer and recursive-descent parser for SCIM filter expressions.
//!
//! Grammar (RFC 7644 §3.4.2.2, value-filter subset):
//!
//! ```text
//! filter  = or
//! or      = and *( "or" and )
//! and     = unary *( "and" unary )
//! unary   = "not" "(" or ")" / "(" or ")" / compare
//! compare = attrPath ( "pr" / compareOp literal )
//! literal = string / number / "true" / "false" / "null"
//! ```
//!
//! Keywords (`and`, `or`, `not`, `pr`, comparison operators) are matched
//! case-insensitively.

use serde_json::{Number, Value};

use crate::ast::{AttrPath, CompareOp, Filter};
use crate::error::FilterError;

// ── Tokens ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Attribute path, keyword, or bare literal (`true`, `false`, `null`).
    Ident(String),
    /// Double-quoted string literal, unescaped.
    Str(String),
    Num(Number),
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::Str(s) => format!("\"{s}\""),
            Token::Num(n) => n.to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// True for characters that may appear in an attribute path token: the URN
/// prefix (colons, dots, dashes) and names like `$ref` or `x509Certificates`.
fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '$')
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '"' => {
                chars.next();
                tokens.push(Token::Str(lex_string(&mut chars)?));
            }
            '-' | '0'..='9' => {
                tokens.push(Token::Num(lex_number(input, &mut chars)?));
            }
            c if c.is_ascii_alphabetic() || c == '$' || c == '_' => {
                let start = pos;
                let mut end = pos;
                while let Some(&(i, ch)) = chars.peek() {
                    if is_path_char(ch) {
                        end = i + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(input[start..end].to_string()));
            }
            other => return Err(FilterError::UnexpectedChar(other, pos)),
        }
    }
    Ok(tokens)
}

fn lex_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices>,
) -> Result<String, FilterError> {
    let mut out = String::new();
    loop {
        let (_, c) = chars.next().ok_or(FilterError::UnterminatedString)?;
        match c {
            '"' => return Ok(out),
            '\\' => {
                let (_, esc) = chars.next().ok_or(FilterError::UnterminatedString)?;
                match esc {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    '/' => out.push('/'),
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{0008}'),
                    'f' => out.push('\u{000C}'),
                    'u' => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let (_, h) = chars.next().ok_or(FilterError::UnterminatedString)?;
                            let digit =
                                h.to_digit(16).ok_or(FilterError::InvalidEscape(h))?;
                            code = code * 16 + digit;
                        }
                        out.push(
                            char::from_u32(code).ok_or(FilterError::InvalidEscape('u'))?,
                        );
                    }
                    other => return Err(FilterError::InvalidEscape(other)),
                }
            }
            other => out.push(other),
        }
    }
}

fn lex_number(
    input: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices>,
) -> Result<Number, FilterError> {
    let start = chars.peek().map(|&(i, _)| i).unwrap_or(0);
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
            end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    let text = &input[start..end];
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Number::from(i));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| FilterError::InvalidNumber(text.to_string()))
}

// ── Parser ─────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, FilterError> {
        let t = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FilterError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(t)
    }

    /// True if the next token is the given keyword (case-insensitive).
    fn at_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(s)) if s.eq_ignore_ascii_case(kw))
    }

    fn or_expr(&mut self) -> Result<Filter, FilterError> {
        let mut left = self.and_expr()?;
        while self.at_keyword("or") {
            self.pos += 1;
            let right = self.and_expr()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Filter, FilterError> {
        let mut left = self.unary_expr()?;
        while self.at_keyword("and") {
            self.pos += 1;
            let right = self.unary_expr()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary_expr(&mut self) -> Result<Filter, FilterError> {
        if self.at_keyword("not") {
            self.pos += 1;
            let inner = self.group()?;
            return Ok(Filter::Not(Box::new(inner)));
        }
        if matches!(self.peek(), Some(Token::LParen)) {
            return self.group();
        }
        self.compare_expr()
    }

    fn group(&mut self) -> Result<Filter, FilterError> {
        match self.next()? {
            Token::LParen => {}
            other => return Err(FilterError::UnexpectedToken(other.describe())),
        }
        let inner = self.or_expr()?;
        match self.next() {
            Ok(Token::RParen) => Ok(inner),
            Ok(other) => Err(FilterError::UnexpectedToken(other.describe())),
            Err(_) => Err(FilterError::UnbalancedParen),
        }
    }

    fn compare_expr(&mut self) -> Result<Filter, FilterError> {
        let path = match self.next()? {
            Token::Ident(s) => AttrPath::parse(&s),
            other => return Err(FilterError::UnexpectedToken(other.describe())),
        };
        let op_token = match self.next()? {
            Token::Ident(s) => s,
            other => return Err(FilterError::UnexpectedToken(other.describe())),
        };
        if op_token.eq_ignore_ascii_case("pr") {
            return Ok(Filter::Present(path));
        }
        let op = CompareOp::from_ident(&op_token)
            .ok_or_else(|| FilterError::UnknownOperator(op_token.clone()))?;
        let value = self.literal()?;
        Ok(Filter::Compare { path, op, value })
    }

    fn literal(&mut self) -> Result<Value, FilterError> {
        match self.next()? {
            Token::Str(s) => Ok(Value::String(s)),
            Token::Num(n) => Ok(Value::Number(n)),
            Token::Ident(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Token::Ident(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            Token::Ident(s) if s.eq_ignore_ascii_case("null") => Ok(Value::Null),
            other => Err(FilterError::UnexpectedToken(other.describe())),
        }
    }
}

/// Parse a filter string into a [`Filter`] expression tree.
///
/// # Example
///
/// ```
/// use scim2_filter::{parse, CompareOp, Filter};
///
/// let f = parse("type eq \"work\"").unwrap();
/// match f {
///     Filter::Compare { path, op, value } => {
///         assert_eq!(path.attribute, "type");
///         assert_eq!(op, CompareOp::Eq);
///         assert_eq!(value, serde_json::json!("work"));
///     }
///     _ => panic!("expected comparison"),
/// }
/// ```
pub fn parse(input: &str) -> Result<Filter, FilterError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FilterError::UnexpectedEnd);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let filter = parser.or_expr()?;
    if let Some(extra) = parser.peek() {
        return Err(FilterError::TrailingInput(extra.describe()));
    }
    Ok(filter)
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compare(attr: &str, op: CompareOp, value: Value) -> Filter {
        Filter::Compare {
            path: AttrPath::parse(attr),
            op,
            value,
        }
    }

    #[test]
    fn parses_string_equality() {
        let f = parse("type eq \"work\"").unwrap();
        assert_eq!(f, compare("type", CompareOp::Eq, json!("work")));
    }

    #[test]
    fn operator_keywords_are_case_insensitive() {
        let f = parse("type EQ \"work\"").unwrap();
        assert_eq!(f, compare("type", CompareOp::Eq, json!("work")));
    }

    #[test]
    fn parses_number_and_boolean_literals() {
        assert_eq!(
            parse("weight gt 42").unwrap(),
            compare("weight", CompareOp::Gt, json!(42)),
        );
        assert_eq!(
            parse("primary eq true").unwrap(),
            compare("primary", CompareOp::Eq, json!(true)),
        );
    }

    #[test]
    fn parses_null_literal() {
        assert_eq!(
            parse("type eq null").unwrap(),
            compare("type", CompareOp::Eq, Value::Null),
        );
    }

    #[test]
    fn parses_presence() {
        assert_eq!(
            parse("displayName pr").unwrap(),
            Filter::Present(AttrPath::parse("displayName")),
        );
    }

    #[test]
    fn parses_and_or_with_precedence() {
        // and binds tighter than or
        let f = parse("a eq 1 or b eq 2 and c eq 3").unwrap();
        match f {
            Filter::Or(left, right) => {
                assert_eq!(*left, compare("a", CompareOp::Eq, json!(1)));
                assert!(matches!(*right, Filter::And(_, _)));
            }
            other => panic!("expected or at the top, got {other:?}"),
        }
    }

    #[test]
    fn parses_not_group() {
        let f = parse("not (type eq \"work\")").unwrap();
        assert!(matches!(f, Filter::Not(_)));
    }

    #[test]
    fn parses_parenthesized_group() {
        let f = parse("(a eq 1 or b eq 2) and c pr").unwrap();
        assert!(matches!(f, Filter::And(_, _)));
    }

    #[test]
    fn parses_sub_attribute_path() {
        let f = parse("name.givenName sw \"Jo\"").unwrap();
        match f {
            Filter::Compare { path, .. } => {
                assert_eq!(path.attribute, "name");
                assert_eq!(path.sub_attribute.as_deref(), Some("givenName"));
            }
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn string_escapes_are_unescaped() {
        let f = parse(r#"value eq "a\"b\\c""#).unwrap();
        assert_eq!(f, compare("value", CompareOp::Eq, json!("a\"b\\c")));
    }

    #[test]
    fn brackets_inside_string_literals_are_plain_text() {
        let f = parse(r#"value co "any[...]thing""#).unwrap();
        assert_eq!(f, compare("value", CompareOp::Co, json!("any[...]thing")));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse(""), Err(FilterError::UnexpectedEnd));
        assert_eq!(parse("   "), Err(FilterError::UnexpectedEnd));
    }

    #[test]
    fn rejects_unknown_operator() {
        assert_eq!(
            parse("type zz \"work\""),
            Err(FilterError::UnknownOperator("zz".to_string())),
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        assert_eq!(parse("type eq \"work"), Err(FilterError::UnterminatedString));
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(matches!(
            parse("type eq \"work\" extra"),
            Err(FilterError::TrailingInput(_)),
        ));
    }

    #[test]
    fn rejects_unbalanced_paren() {
        assert_eq!(parse("(type eq \"x\""), Err(FilterError::UnbalancedParen));
    }
}
