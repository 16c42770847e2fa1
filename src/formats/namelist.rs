//! Fortran namelist adapter.
//!
//! Groups (`&name ... /`, or `$name ... $end`) map to top-level keys and
//! their assignments to scalars or lists. Output is written in the layout
//! downstream model readers expect: one assignment per line, four-space
//! indent, single-quoted strings, `.true.`/`.false.` logicals, and bare
//! commas for unset slots.

use super::Format;
use crate::config::{FileType, Tree, Value};
use crate::error::{ConfigError, Result};

const TEMPLATE: &str = "\
# Each top-level key is a namelist group; each entry is one assignment.
# Lists become comma-joined values and ~ (null) becomes an unset slot.
group_name:
  string_var: 'text'
  int_var: 12
  real_var: 1.5
  logical_var: false
  list_var: [1, 2, 3]
  unset_var: ~
";

/// Largest `n` accepted in an `n*value` repeat.
const MAX_REPEAT: usize = 1 << 20;

/// Reads and writes Fortran namelist files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamelistFormat;

impl Format for NamelistFormat {
    fn file_type(&self) -> FileType {
        FileType::F90
    }

    fn parse(&self, text: &str, source_name: &str) -> Result<Tree> {
        let tokens = Lexer::new(text, source_name).tokenize()?;
        Parser {
            tokens,
            pos: 0,
            source_name,
        }
        .parse()
    }

    fn render(&self, tree: &Tree) -> Result<String> {
        let mut out = String::new();
        for (i, (group, value)) in tree.iter().enumerate() {
            let Value::Map(vars) = value else {
                return Err(ConfigError::serialization(
                    "F90",
                    format!(
                        "top-level key '{}' is a {}; namelist top-level keys must be groups",
                        group,
                        value.kind()
                    ),
                ));
            };

            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("&{}\n", group));
            for (name, value) in vars {
                let rendered = render_value(value, &format!("{}.{}", group, name))?;
                out.push_str(&format!("    {} = {}\n", name, rendered));
            }
            out.push_str("/\n");
        }
        Ok(out)
    }

    fn template(&self) -> String {
        TEMPLATE.to_string()
    }
}

fn render_value(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::Null => Ok(",".to_string()),
        Value::List(items) if items.is_empty() => Ok(",".to_string()),
        Value::List(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                if !item.is_scalar() {
                    return Err(ConfigError::serialization(
                        "F90",
                        format!("'{}' contains a nested {}", path, item.kind()),
                    ));
                }
                parts.push(render_scalar(item));
            }
            let mut joined = parts.join(", ");
            if matches!(items.last(), Some(Value::Null)) {
                joined.push(',');
            }
            Ok(joined)
        }
        Value::Map(_) => Err(ConfigError::serialization(
            "F90",
            format!("'{}' is a mapping; derived types are not supported", path),
        )),
        scalar => Ok(render_scalar(scalar)),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => ".true.".to_string(),
        Value::Bool(false) => ".false.".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(x) if x.is_nan() => "NaN".to_string(),
        Value::Float(x) if x.is_infinite() => {
            if x.is_sign_negative() { "-Infinity" } else { "Infinity" }.to_string()
        }
        Value::Float(x) => format!("{:?}", x),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::List(_) | Value::Map(_) => unreachable!("render_scalar called on a container"),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    GroupStart(String),
    GroupEnd,
    Equals,
    Comma,
    Quoted(String),
    Word(String),
}

#[derive(Debug)]
struct Spanned {
    token: Token,
    line: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    source_name: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str, source_name: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            source_name,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Spanned>> {
        let mut tokens = Vec::new();

        while let Some(&c) = self.chars.peek() {
            let line = self.line;
            let token = match c {
                '\n' => {
                    self.line += 1;
                    self.chars.next();
                    continue;
                }
                c if c.is_whitespace() => {
                    self.chars.next();
                    continue;
                }
                '!' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                    continue;
                }
                '&' | '$' => {
                    self.chars.next();
                    let name = self.take_word();
                    if name.is_empty() {
                        return Err(self.error(line, format!("missing group name after '{}'", c)));
                    }
                    if name.eq_ignore_ascii_case("end") {
                        Token::GroupEnd
                    } else {
                        Token::GroupStart(name)
                    }
                }
                '/' => {
                    self.chars.next();
                    Token::GroupEnd
                }
                '=' => {
                    self.chars.next();
                    Token::Equals
                }
                ',' => {
                    self.chars.next();
                    Token::Comma
                }
                '\'' | '"' => Token::Quoted(self.take_quoted(c, line)?),
                _ => Token::Word(self.take_word()),
            };
            tokens.push(Spanned { token, line });
        }

        Ok(tokens)
    }

    fn take_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, ',' | '=' | '/' | '!' | '\'' | '"' | '&' | '$') {
                break;
            }
            word.push(c);
            self.chars.next();
        }
        word
    }

    fn take_quoted(&mut self, quote: char, start_line: usize) -> Result<String> {
        self.chars.next();
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => {
                    // A doubled quote is an escaped literal quote.
                    if self.chars.peek() == Some(&quote) {
                        self.chars.next();
                        text.push(quote);
                    } else {
                        return Ok(text);
                    }
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    text.push(c);
                }
                None => {
                    return Err(self.error(start_line, "unterminated string".to_string()));
                }
            }
        }
    }

    fn error(&self, line: usize, message: String) -> ConfigError {
        ConfigError::parse(self.source_name, format!("line {}: {}", line, message))
    }
}

struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    source_name: &'a str,
}

impl Parser<'_> {
    fn parse(mut self) -> Result<Tree> {
        let mut tree = Tree::new();

        while let Some((token, line)) = self.next() {
            let Token::GroupStart(name) = token else {
                return Err(self.error(
                    line,
                    format!("expected '&group', found {}", describe(&token)),
                ));
            };
            // Fortran names are case-insensitive.
            let name = name.to_ascii_lowercase();
            let group = self.parse_group(&name, line)?;
            // Repeated groups merge, later assignments win.
            match tree.get_mut(&name) {
                Some(Value::Map(existing)) => existing.extend(group),
                _ => {
                    tree.insert(name, Value::Map(group));
                }
            }
        }

        Ok(tree)
    }

    fn parse_group(&mut self, group: &str, start_line: usize) -> Result<Tree> {
        let mut vars = Tree::new();

        loop {
            let Some((token, line)) = self.next() else {
                return Err(self.error(
                    start_line,
                    format!("unbalanced namelist group '{}': missing '/'", group),
                ));
            };
            match token {
                Token::GroupEnd => return Ok(vars),
                Token::Word(name) => {
                    let name = name.to_ascii_lowercase();
                    if !matches!(self.next(), Some((Token::Equals, _))) {
                        return Err(self.error(
                            line,
                            format!("expected '=' after '{}' in group '{}'", name, group),
                        ));
                    }
                    let value = self.parse_values()?;
                    vars.insert(name, value);
                }
                Token::GroupStart(inner) => {
                    return Err(self.error(
                        line,
                        format!(
                            "unbalanced namelist group '{}': '&{}' starts before '/'",
                            group, inner
                        ),
                    ));
                }
                other => {
                    return Err(self.error(
                        line,
                        format!(
                            "expected a variable name in group '{}', found {}",
                            group,
                            describe(&other)
                        ),
                    ));
                }
            }
        }
    }

    /// Collect the values of one assignment, stopping before the next
    /// `name =`, the group end, or the end of input.
    fn parse_values(&mut self) -> Result<Value> {
        let mut items: Vec<Value> = Vec::new();
        let mut pending: Option<Vec<Value>> = None;

        loop {
            let starts_assignment = matches!(
                (self.peek(0), self.peek(1)),
                (Some(Token::Word(_)), Some(Token::Equals))
            );
            if starts_assignment {
                break;
            }

            match self.peek(0).cloned() {
                None | Some(Token::GroupEnd) | Some(Token::GroupStart(_)) => break,
                Some(Token::Comma) => {
                    self.pos += 1;
                    match pending.take() {
                        Some(values) => items.extend(values),
                        None => items.push(Value::Null),
                    }
                }
                Some(Token::Equals) => {
                    let line = self.tokens[self.pos].line;
                    return Err(self.error(line, "unexpected '='".to_string()));
                }
                Some(Token::Quoted(text)) => {
                    self.pos += 1;
                    if let Some(values) = pending.replace(vec![Value::String(text)]) {
                        items.extend(values);
                    }
                }
                Some(Token::Word(word)) => {
                    let line = self.tokens[self.pos].line;
                    self.pos += 1;
                    let values = self.word_values(&word, line)?;
                    if let Some(previous) = pending.replace(values) {
                        items.extend(previous);
                    }
                }
            }
        }

        if let Some(values) = pending {
            items.extend(values);
        }

        Ok(match items.len() {
            0 => Value::Null,
            1 => items.remove(0),
            _ => Value::List(items),
        })
    }

    /// Expand one unquoted word, handling `n*value` repeat counts.
    fn word_values(&mut self, word: &str, line: usize) -> Result<Vec<Value>> {
        if let Some((count, rest)) = word.split_once('*')
            && !count.is_empty()
            && count.bytes().all(|b| b.is_ascii_digit())
        {
            let count = count
                .parse::<usize>()
                .ok()
                .filter(|count| *count <= MAX_REPEAT)
                .ok_or_else(|| {
                    self.error(
                        line,
                        format!("repeat count too large in '{}' (limit {})", word, MAX_REPEAT),
                    )
                })?;
            let value = if !rest.is_empty() {
                scalar_from_word(rest)
            } else {
                match self.peek(0).cloned() {
                    Some(Token::Quoted(text)) => {
                        self.pos += 1;
                        Value::String(text)
                    }
                    _ => Value::Null,
                }
            };
            return Ok(vec![value; count]);
        }
        Ok(vec![scalar_from_word(word)])
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let spanned = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some((spanned.token.clone(), spanned.line))
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn error(&self, line: usize, message: String) -> ConfigError {
        ConfigError::parse(self.source_name, format!("line {}: {}", line, message))
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::GroupStart(name) => format!("'&{}'", name),
        Token::GroupEnd => "'/'".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Comma => "','".to_string(),
        Token::Quoted(text) => format!("'{}'", text),
        Token::Word(word) => format!("'{}'", word),
    }
}

fn scalar_from_word(word: &str) -> Value {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        ".true." | ".t." | "t" => return Value::Bool(true),
        ".false." | ".f." | "f" => return Value::Bool(false),
        "nan" => return Value::Float(f64::NAN),
        "inf" | "infinity" | "+inf" | "+infinity" => return Value::Float(f64::INFINITY),
        "-inf" | "-infinity" => return Value::Float(f64::NEG_INFINITY),
        _ => {}
    }

    if let Ok(i) = word.parse::<i64>() {
        return Value::Integer(i);
    }

    let numeric_start = lower
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'));
    if numeric_start && let Ok(x) = lower.replace('d', "e").parse::<f64>() {
        return Value::Float(x);
    }

    Value::String(word.to_string())
}
