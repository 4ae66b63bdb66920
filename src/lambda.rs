//! Tokenizer for one-argument lambda source text.
//!
//! Accessors and predicates are handed to us as *text* (usually captured with
//! `stringify!`), never as compiled closures. This module splits that text into
//! the parameter name and the tokens of the single expression it returns.
//! Both `|m| body` and `m => body` spellings are accepted, as are block bodies
//! (`{ return body; }`) and `function (m) { ... }`.

use crate::error::{Result, SchemaError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Tok {
    Ident(String),
    Num(String),
    Str(String),
    Op(&'static str),
}

impl Tok {
    pub(crate) fn is_op(&self, op: &str) -> bool {
        matches!(self, Tok::Op(o) if *o == op)
    }

    pub(crate) fn is_ident(&self, name: &str) -> bool {
        matches!(self, Tok::Ident(s) if s == name)
    }
}

// longest first
const OPS: &[&str] = &[
    "===", "!==", "=>", "==", "!=", ">=", "<=", "&&", "||", "<", ">", "|", "(", ")", "{", "}",
    "[", "]", ".", ";", ":", "&", "-", "+", ",", "!", "=", "*", "/", "%", "?",
];

/// A lambda split into its single parameter and its (unwrapped) body tokens.
#[derive(Debug, Clone)]
pub(crate) struct Lambda {
    pub param: String,
    pub body: Vec<Tok>,
}

// ————————————————————————————————————————————————————————————————————————————
// LEXER
// ————————————————————————————————————————————————————————————————————————————

pub(crate) fn lex(src: &str) -> Result<Vec<Tok>> {
    let chars: Vec<char> = src.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            out.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '_') {
                i += 1;
            }
            // fraction only when a digit follows, so `1.max` style access stays separate
            if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '_') {
                    i += 1;
                }
            }
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            out.push(Tok::Num(chars[start..i].iter().collect()));
            continue;
        }

        if c == '"' || c == '\'' {
            let quote = c;
            let mut text = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(SchemaError::parse(src, "unterminated string literal")),
                    Some('\\') => {
                        match chars.get(i + 1) {
                            Some(escaped) => text.push(*escaped),
                            None => return Err(SchemaError::parse(src, "unterminated string literal")),
                        }
                        i += 2;
                    }
                    Some(ch) if *ch == quote => {
                        i += 1;
                        break;
                    }
                    Some(ch) => {
                        text.push(*ch);
                        i += 1;
                    }
                }
            }
            out.push(Tok::Str(text));
            continue;
        }

        let rest: String = chars[i..chars.len().min(i + 3)].iter().collect();
        match OPS.iter().find(|op| rest.starts_with(**op)) {
            Some(op) => {
                out.push(Tok::Op(op));
                i += op.chars().count();
            }
            None => {
                return Err(SchemaError::parse(src, format!("unexpected character `{c}`")));
            }
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// LAMBDA SPLITTING
// ————————————————————————————————————————————————————————————————————————————

pub(crate) fn split(src: &str) -> Result<Lambda> {
    let toks = lex(src)?;
    let mut it = Cursor { toks: &toks, pos: 0 };

    let not_a_lambda = || SchemaError::parse(src, "expected a one-argument lambda");

    let (param, needs_block) = match it.next() {
        // |m| body   or   |m: &Model| body
        Some(Tok::Op("|")) => {
            let param = it.ident().ok_or_else(not_a_lambda)?;
            if it.eat_op(":") {
                it.skip_until_op("|").ok_or_else(not_a_lambda)?;
            } else if !it.eat_op("|") {
                return Err(not_a_lambda());
            }
            (param, false)
        }
        // function (m) { ... }   or   function m { ... }
        Some(Tok::Ident(kw)) if kw == "function" => {
            let param = if it.eat_op("(") {
                let param = it.ident().ok_or_else(not_a_lambda)?;
                it.skip_until_op(")").ok_or_else(not_a_lambda)?;
                param
            } else {
                it.ident().ok_or_else(not_a_lambda)?
            };
            (param, true)
        }
        // (m) => body   or   (m: Model) => body
        Some(Tok::Op("(")) => {
            let param = it.ident().ok_or_else(not_a_lambda)?;
            it.skip_until_op(")").ok_or_else(not_a_lambda)?;
            if !it.eat_op("=>") {
                return Err(not_a_lambda());
            }
            (param, false)
        }
        // m => body
        Some(Tok::Ident(name)) => {
            let param = name.clone();
            if !it.eat_op("=>") {
                return Err(not_a_lambda());
            }
            (param, false)
        }
        _ => return Err(not_a_lambda()),
    };

    let body = unwrap_block(src, it.rest(), needs_block)?;
    if body.is_empty() {
        return Err(SchemaError::parse(src, "lambda body is empty"));
    }
    Ok(Lambda { param, body })
}

/// Strip `{ [return] expr [;] }` down to `expr`, rejecting multi-statement blocks.
fn unwrap_block(src: &str, body: &[Tok], needs_block: bool) -> Result<Vec<Tok>> {
    let is_block = body.first().is_some_and(|t| t.is_op("{")) && body.last().is_some_and(|t| t.is_op("}"));
    if !is_block {
        if needs_block {
            return Err(SchemaError::parse(src, "expected a block body"));
        }
        return Ok(body.to_vec());
    }

    let mut inner = &body[1..body.len() - 1];
    if inner.first().is_some_and(|t| t.is_ident("return")) {
        inner = &inner[1..];
    }
    if inner.last().is_some_and(|t| t.is_op(";")) {
        inner = &inner[..inner.len() - 1];
    }
    if inner.iter().any(|t| t.is_op(";") || t.is_op("{")) {
        return Err(SchemaError::parse(src, "expected a single statement"));
    }
    Ok(inner.to_vec())
}

/// Minimal forward cursor over a token slice.
pub(crate) struct Cursor<'a> {
    pub toks: &'a [Tok],
    pub pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(toks: &'a [Tok]) -> Self {
        Self { toks, pos: 0 }
    }

    pub(crate) fn next(&mut self) -> Option<&'a Tok> {
        let t = self.toks.get(self.pos)?;
        self.pos += 1;
        Some(t)
    }

    pub(crate) fn peek(&self) -> Option<&'a Tok> {
        self.toks.get(self.pos)
    }

    pub(crate) fn ident(&mut self) -> Option<String> {
        match self.peek() {
            Some(Tok::Ident(s)) => {
                self.pos += 1;
                Some(s.clone())
            }
            _ => None,
        }
    }

    pub(crate) fn eat_op(&mut self, op: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_ident(&mut self, name: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_ident(name)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_until_op(&mut self, op: &str) -> Option<()> {
        while let Some(t) = self.next() {
            if t.is_op(op) {
                return Some(());
            }
        }
        None
    }

    fn rest(&self) -> &'a [Tok] {
        &self.toks[self.pos.min(self.toks.len())..]
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pos >= self.toks.len()
    }
}
