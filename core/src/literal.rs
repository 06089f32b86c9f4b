//! Decoder for Python-style literals.
//!
//! Movie dumps store nested lists as text such as
//! `"[{'id': 1721, 'name': 'fight'}, {'id': 4344, 'name': 'musical'}]"`.
//! This turns that text into a [`serde_json::Value`] so the rest of the
//! pipeline only ever deals with structured data.

use crate::error::{PrepError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Number, Value};

lazy_static! {
    static ref NUMBER: Regex =
        Regex::new(r"^[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?").expect("valid regex");
}

/// Decode one literal value. Lists and tuples become arrays, dicts become
/// objects, `None` becomes null.
pub fn decode_literal(text: &str) -> Result<Value> {
    let mut p = Parser { src: text, pos: 0 };
    p.skip_ws();
    let value = p.value()?;
    p.skip_ws();
    if p.pos != p.src.len() {
        return Err(PrepError::literal(p.pos, "trailing characters after value"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn unexpected(&self, c: Option<char>, wanted: &str) -> PrepError {
        match c {
            Some(c) => PrepError::literal(self.pos - c.len_utf8(), format!("expected {wanted}, found '{c}'")),
            None => PrepError::literal(self.pos, format!("expected {wanted}, found end of input")),
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('[') => {
                self.bump();
                self.sequence(']').map(Value::Array)
            }
            Some('(') => {
                self.bump();
                self.sequence(')').map(Value::Array)
            }
            Some('{') => {
                self.bump();
                self.dict()
            }
            Some(q @ ('\'' | '"')) => {
                self.bump();
                self.string(q).map(Value::String)
            }
            Some(c) if c.is_ascii_alphabetic() => self.name(),
            Some(c) => self.number(c),
            None => Err(PrepError::literal(self.pos, "unexpected end of input")),
        }
    }

    fn sequence(&mut self, close: char) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(items),
                other => return Err(self.unexpected(other, &format!("',' or '{close}'"))),
            }
        }
    }

    fn dict(&mut self) -> Result<Value> {
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }
            let key_at = self.pos;
            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(PrepError::literal(key_at, "dict keys must be strings or numbers")),
            };
            self.skip_ws();
            match self.bump() {
                Some(':') => {}
                other => return Err(self.unexpected(other, "':'")),
            }
            self.skip_ws();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                other => return Err(self.unexpected(other, "',' or '}'")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String> {
        let start = self.pos - 1;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(PrepError::literal(start, "unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let at = self.pos - 1;
                    match self.bump() {
                        Some('\\') => out.push('\\'),
                        Some('\'') => out.push('\''),
                        Some('"') => out.push('"'),
                        Some('n') => out.push('\n'),
                        Some('r') => out.push('\r'),
                        Some('t') => out.push('\t'),
                        Some('a') => out.push('\u{7}'),
                        Some('b') => out.push('\u{8}'),
                        Some('f') => out.push('\u{c}'),
                        Some('v') => out.push('\u{b}'),
                        Some(d @ '0'..='7') => out.push(self.octal_escape(d, at)?),
                        Some('x') => out.push(self.hex_escape(2, at)?),
                        Some('u') => out.push(self.hex_escape(4, at)?),
                        Some('U') => out.push(self.hex_escape(8, at)?),
                        // line continuation
                        Some('\n') => {}
                        // unknown escapes are kept verbatim
                        Some(c) => {
                            out.push('\\');
                            out.push(c);
                        }
                        None => return Err(PrepError::literal(start, "unterminated string")),
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize, at: usize) -> Result<char> {
        let hex = self
            .rest()
            .get(..digits)
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| PrepError::literal(at, "truncated hex escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|e| PrepError::literal(at, e.to_string()))?;
        self.pos += digits;
        char::from_u32(code).ok_or_else(|| PrepError::literal(at, format!("invalid code point {code:#x}")))
    }

    /// Up to three octal digits, the first already consumed.
    fn octal_escape(&mut self, first: char, at: usize) -> Result<char> {
        let mut code = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    code = code * 8 + d;
                    self.pos += 1;
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or_else(|| PrepError::literal(at, format!("invalid code point {code:#o}")))
    }

    fn name(&mut self) -> Result<Value> {
        let start = self.pos;
        let word: &str = {
            let rest = self.rest();
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            &rest[..end]
        };
        self.pos += word.len();
        match word {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            _ => Err(PrepError::literal(start, format!("unknown name '{word}'"))),
        }
    }

    fn number(&mut self, first: char) -> Result<Value> {
        let start = self.pos;
        let text = NUMBER
            .find(self.rest())
            .map(|m| m.as_str())
            .ok_or_else(|| PrepError::literal(start, format!("unexpected character '{first}'")))?;
        self.pos += text.len();
        if !text.contains(['.', 'e', 'E']) {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
        }
        let f: f64 = text
            .parse()
            .map_err(|_| PrepError::literal(start, format!("invalid number '{text}'")))?;
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| PrepError::literal(start, format!("non-finite number '{text}'")))
    }
}
