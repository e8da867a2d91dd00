//! Query-string grammar accepted by [`LicenseIndex`](super::LicenseIndex).
//!
//! ```text
//! query  := clause*                      (whitespace separated)
//! clause := ("+" | "-")? (field ":")? (term | '"' phrase '"')
//! field  := "id" | "name" | "text"
//! ```
//!
//! A backslash makes the next character literal. Any other unescaped
//! reserved character is a syntax error, which is what lets callers retry
//! with [`sanitize`](crate::license::sanitize::sanitize)d text.
//!
//! Parsed queries are compiled to an SQLite FTS5 `MATCH` expression.

use std::collections::HashSet;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::QueryError;
use crate::license::sanitize::is_reserved;

/// Dropped from terms before matching; phrases keep them.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    Should,
    Must,
    MustNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Text,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Field::Id),
            "name" => Some(Field::Name),
            "text" => Some(Field::Text),
            _ => None,
        }
    }

    /// FTS5 column backing this field.
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "license_id",
            Field::Name => "name",
            Field::Text => "body",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Term(String),
    Phrase(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub occur: Occur,
    pub field: Option<Field>,
    pub value: Value,
}

#[derive(Debug, Default, PartialEq)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let mut parser = Parser {
            chars: input.char_indices().peekable(),
        };
        let mut clauses = Vec::new();
        loop {
            parser.skip_whitespace();
            if parser.peek().is_none() {
                break;
            }
            clauses.push(parser.clause()?);
        }
        Ok(Query { clauses })
    }

    /// Render as an FTS5 `MATCH` expression, or `None` when no clause can
    /// produce a hit (empty query, only stop words, only exclusions).
    ///
    /// Required clauses decide matching on their own when present; optional
    /// clauses are OR-ed otherwise.
    pub fn to_fts5(&self) -> Option<String> {
        let mut should = Vec::new();
        let mut must = Vec::new();
        let mut must_not = Vec::new();
        let mut seen = HashSet::new();

        for clause in &self.clauses {
            for phrase in clause_phrases(&clause.value) {
                let expr = match clause.field {
                    Some(field) => format!("{} : \"{}\"", field.column(), phrase),
                    None => format!("\"{}\"", phrase),
                };
                if !seen.insert((clause.occur, expr.clone())) {
                    continue;
                }
                match clause.occur {
                    Occur::Should => should.push(expr),
                    Occur::Must => must.push(expr),
                    Occur::MustNot => must_not.push(expr),
                }
            }
        }

        let positive = if !must.is_empty() {
            must.join(" AND ")
        } else if !should.is_empty() {
            should.join(" OR ")
        } else {
            return None;
        };

        let mut expr = format!("({})", positive);
        for excluded in must_not {
            expr.push_str(" NOT ");
            expr.push_str(&excluded);
        }
        Some(expr)
    }
}

/// Lower-cased alphanumeric words. FTS5 re-tokenizes quoted strings with the
/// table tokenizer, so this only has to keep quotes out of them.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn clause_phrases(value: &Value) -> Vec<String> {
    match value {
        Value::Term(term) => words(term)
            .filter(|w| !STOP_WORDS.contains(&w.as_str()))
            .collect(),
        Value::Phrase(phrase) => {
            let words: Vec<String> = words(phrase).collect();
            if words.is_empty() {
                Vec::new()
            } else {
                vec![words.join(" ")]
            }
        }
    }
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn clause(&mut self) -> Result<Clause, QueryError> {
        let occur = match self.peek() {
            Some((_, '+')) => {
                self.chars.next();
                Occur::Must
            }
            Some((_, '-')) => {
                self.chars.next();
                Occur::MustNot
            }
            _ => Occur::Should,
        };

        if matches!(self.peek(), Some((_, '"'))) {
            let value = self.phrase()?;
            self.expect_clause_end()?;
            return Ok(Clause {
                occur,
                field: None,
                value,
            });
        }

        let start = self.offset();
        let head = self.term()?;

        let (field, value) = match self.peek() {
            Some((colon, ':')) => {
                if head.is_empty() {
                    return Err(syntax(colon, "missing field name before `:`"));
                }
                let field =
                    Field::from_name(&head).ok_or_else(|| QueryError::UnknownField(head.clone()))?;
                self.chars.next();
                let value = if matches!(self.peek(), Some((_, '"'))) {
                    self.phrase()?
                } else {
                    let at = self.offset();
                    let term = self.term()?;
                    if term.is_empty() {
                        return Err(syntax(at, "expected a term after `:`"));
                    }
                    Value::Term(term)
                };
                (Some(field), value)
            }
            _ => {
                if head.is_empty() {
                    self.expect_clause_end()?;
                    return Err(syntax(start, "expected a term"));
                }
                (None, Value::Term(head))
            }
        };

        self.expect_clause_end()?;
        Ok(Clause {
            occur,
            field,
            value,
        })
    }

    /// Read term characters up to whitespace, end of input, or an unescaped
    /// reserved character (left unconsumed).
    fn term(&mut self) -> Result<String, QueryError> {
        let mut term = String::new();
        while let Some((offset, c)) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            if c == '\\' {
                self.chars.next();
                term.push(self.escaped(offset)?);
                continue;
            }
            if is_reserved(c) {
                break;
            }
            term.push(c);
            self.chars.next();
        }
        Ok(term)
    }

    fn phrase(&mut self) -> Result<Value, QueryError> {
        let start = self.offset();
        self.chars.next();
        let mut phrase = String::new();
        loop {
            match self.chars.next() {
                None => return Err(syntax(start, "unterminated phrase")),
                Some((offset, '\\')) => phrase.push(self.escaped(offset)?),
                Some((_, '"')) => return Ok(Value::Phrase(phrase)),
                Some((_, c)) => phrase.push(c),
            }
        }
    }

    fn escaped(&mut self, backslash: usize) -> Result<char, QueryError> {
        self.chars
            .next()
            .map(|(_, c)| c)
            .ok_or_else(|| syntax(backslash, "dangling escape"))
    }

    fn expect_clause_end(&mut self) -> Result<(), QueryError> {
        match self.peek() {
            None => Ok(()),
            Some((_, c)) if c.is_whitespace() => Ok(()),
            Some((offset, c)) => Err(syntax(offset, format!("unexpected `{}`", c))),
        }
    }

    fn offset(&mut self) -> usize {
        self.peek().map(|(offset, _)| offset).unwrap_or(usize::MAX)
    }
}

fn syntax(offset: usize, message: impl Into<String>) -> QueryError {
    QueryError::Syntax {
        offset,
        message: message.into(),
    }
}
