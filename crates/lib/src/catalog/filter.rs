//! Listing filter expressions.
//!
//! Filters narrow a listing to resources whose fields satisfy a boolean
//! expression:
//!
//! ```text
//! mime_type.contains('openapi') && !(api_id == "internal" || name.endsWith('/draft'))
//! ```
//!
//! # Grammar
//!
//! ```text
//! or      := and ('||' and)*
//! and     := unary ('&&' unary)*
//! unary   := '!' unary | primary
//! primary := '(' or ')' | FIELD ('==' | '!=') STRING | FIELD '.' METHOD '(' STRING ')'
//! ```
//!
//! Fields: `name`, `project_id`, `api_id`, `version_id`, `spec_id`,
//! `artifact_id`, `mime_type`. Methods: `contains`, `startsWith`, `endsWith`.
//! Absent fields evaluate as the empty string.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::resource::{Entity, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("filter syntax error at position {position}: {message}")]
pub struct FilterError {
  pub position: usize,
  pub message: String,
}

impl FilterError {
  fn new(position: usize, message: impl Into<String>) -> Self {
    Self {
      position,
      message: message.into(),
    }
  }
}

/// A resource field a filter can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  ProjectId,
  EntityId(Entity),
  MimeType,
}

impl Field {
  fn parse(ident: &str) -> Option<Field> {
    match ident {
      "name" => Some(Field::Name),
      "project_id" => Some(Field::ProjectId),
      "api_id" => Some(Field::EntityId(Entity::Api)),
      "version_id" => Some(Field::EntityId(Entity::Version)),
      "spec_id" => Some(Field::EntityId(Entity::Spec)),
      "artifact_id" => Some(Field::EntityId(Entity::Artifact)),
      "mime_type" => Some(Field::MimeType),
      _ => None,
    }
  }

  fn value<'a>(&self, resource: &'a Resource) -> &'a str {
    match self {
      Field::Name => resource.name(),
      Field::ProjectId => resource.name.project_id(),
      Field::EntityId(entity) => resource.name.id(*entity).unwrap_or(""),
      Field::MimeType => resource.mime_type.as_deref().unwrap_or(""),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
  Eq,
  Ne,
  Contains,
  StartsWith,
  EndsWith,
}

impl StringOp {
  fn method(ident: &str) -> Option<StringOp> {
    match ident {
      "contains" => Some(StringOp::Contains),
      "startsWith" => Some(StringOp::StartsWith),
      "endsWith" => Some(StringOp::EndsWith),
      _ => None,
    }
  }

  fn apply(self, value: &str, operand: &str) -> bool {
    match self {
      StringOp::Eq => value == operand,
      StringOp::Ne => value != operand,
      StringOp::Contains => value.contains(operand),
      StringOp::StartsWith => value.starts_with(operand),
      StringOp::EndsWith => value.ends_with(operand),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
  /// Matches everything; produced by an empty filter.
  All,
  Test { field: Field, op: StringOp, operand: String },
  Not(Box<Expr>),
  And(Box<Expr>, Box<Expr>),
  Or(Box<Expr>, Box<Expr>),
}

impl Expr {
  fn eval(&self, resource: &Resource) -> bool {
    match self {
      Expr::All => true,
      Expr::Test { field, op, operand } => op.apply(field.value(resource), operand),
      Expr::Not(inner) => !inner.eval(resource),
      Expr::And(lhs, rhs) => lhs.eval(resource) && rhs.eval(resource),
      Expr::Or(lhs, rhs) => lhs.eval(resource) || rhs.eval(resource),
    }
  }
}

/// A parsed listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
  source: String,
  expr: Expr,
}

impl Filter {
  /// Parse a filter expression. Blank input matches every resource.
  pub fn parse(source: &str) -> Result<Self, FilterError> {
    let tokens = tokenize(source)?;
    let expr = if tokens.len() == 1 {
      Expr::All
    } else {
      let mut parser = Parser { tokens, pos: 0 };
      let expr = parser.parse_or()?;
      parser.expect_eof()?;
      expr
    };
    Ok(Self {
      source: source.to_string(),
      expr,
    })
  }

  pub fn matches(&self, resource: &Resource) -> bool {
    self.expr.eval(resource)
  }

  pub fn expr(&self) -> &Expr {
    &self.expr
  }
}

impl fmt::Display for Filter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

impl FromStr for Filter {
  type Err = FilterError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

// =============================================================================
// Lexer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
  Ident(String),
  Str(String),
  EqEq,
  NotEq,
  AndAnd,
  OrOr,
  Bang,
  Dot,
  LParen,
  RParen,
  Eof,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TokenKind::Ident(s) => write!(f, "identifier '{s}'"),
      TokenKind::Str(s) => write!(f, "string '{s}'"),
      TokenKind::EqEq => f.write_str("'=='"),
      TokenKind::NotEq => f.write_str("'!='"),
      TokenKind::AndAnd => f.write_str("'&&'"),
      TokenKind::OrOr => f.write_str("'||'"),
      TokenKind::Bang => f.write_str("'!'"),
      TokenKind::Dot => f.write_str("'.'"),
      TokenKind::LParen => f.write_str("'('"),
      TokenKind::RParen => f.write_str("')'"),
      TokenKind::Eof => f.write_str("end of input"),
    }
  }
}

#[derive(Debug, Clone)]
struct Token {
  kind: TokenKind,
  pos: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
  let mut tokens = Vec::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    let kind = match ch {
      c if c.is_whitespace() => continue,
      '(' => TokenKind::LParen,
      ')' => TokenKind::RParen,
      '.' => TokenKind::Dot,
      '=' | '&' | '|' => match chars.next_if(|(_, next)| *next == ch) {
        Some(_) => match ch {
          '=' => TokenKind::EqEq,
          '&' => TokenKind::AndAnd,
          _ => TokenKind::OrOr,
        },
        None => return Err(FilterError::new(pos, format!("expected '{ch}{ch}'"))),
      },
      '!' => match chars.next_if(|(_, next)| *next == '=') {
        Some(_) => TokenKind::NotEq,
        None => TokenKind::Bang,
      },
      '\'' | '"' => {
        let mut text = String::new();
        let mut closed = false;
        while let Some((_, c)) = chars.next() {
          if c == ch {
            closed = true;
            break;
          }
          if c == '\\'
            && let Some((_, escaped)) = chars.next()
          {
            text.push(escaped);
            continue;
          }
          text.push(c);
        }
        if !closed {
          return Err(FilterError::new(pos, "unterminated string literal"));
        }
        TokenKind::Str(text)
      }
      c if c.is_ascii_alphabetic() || c == '_' => {
        let mut ident = String::from(c);
        while let Some((_, c)) = chars.next_if(|(_, c)| c.is_ascii_alphanumeric() || *c == '_') {
          ident.push(c);
        }
        TokenKind::Ident(ident)
      }
      other => return Err(FilterError::new(pos, format!("unexpected character '{other}'"))),
    };
    tokens.push(Token { kind, pos });
  }

  tokens.push(Token {
    kind: TokenKind::Eof,
    pos: input.len(),
  });
  Ok(tokens)
}

// =============================================================================
// Parser
// =============================================================================

struct Parser {
  tokens: Vec<Token>,
  pos: usize,
}

impl Parser {
  fn peek(&self) -> &Token {
    &self.tokens[self.pos.min(self.tokens.len() - 1)]
  }

  fn advance(&mut self) -> Token {
    let token = self.peek().clone();
    if self.pos < self.tokens.len() - 1 {
      self.pos += 1;
    }
    token
  }

  fn unexpected(&self, expected: &str) -> FilterError {
    let token = self.peek();
    FilterError::new(token.pos, format!("expected {expected}, found {}", token.kind))
  }

  fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), FilterError> {
    if self.peek().kind == kind {
      self.advance();
      Ok(())
    } else {
      Err(self.unexpected(expected))
    }
  }

  fn expect_eof(&self) -> Result<(), FilterError> {
    match self.peek().kind {
      TokenKind::Eof => Ok(()),
      _ => Err(self.unexpected("end of input")),
    }
  }

  fn expect_string(&mut self) -> Result<String, FilterError> {
    match self.peek().kind.clone() {
      TokenKind::Str(s) => {
        self.advance();
        Ok(s)
      }
      _ => Err(self.unexpected("string literal")),
    }
  }

  fn parse_or(&mut self) -> Result<Expr, FilterError> {
    let mut lhs = self.parse_and()?;
    while self.peek().kind == TokenKind::OrOr {
      self.advance();
      let rhs = self.parse_and()?;
      lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
  }

  fn parse_and(&mut self) -> Result<Expr, FilterError> {
    let mut lhs = self.parse_unary()?;
    while self.peek().kind == TokenKind::AndAnd {
      self.advance();
      let rhs = self.parse_unary()?;
      lhs = Expr::And(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
  }

  fn parse_unary(&mut self) -> Result<Expr, FilterError> {
    if self.peek().kind == TokenKind::Bang {
      self.advance();
      return Ok(Expr::Not(Box::new(self.parse_unary()?)));
    }
    self.parse_primary()
  }

  fn parse_primary(&mut self) -> Result<Expr, FilterError> {
    let token = self.advance();
    match token.kind {
      TokenKind::LParen => {
        let inner = self.parse_or()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(inner)
      }
      TokenKind::Ident(ident) => {
        let field =
          Field::parse(&ident).ok_or_else(|| FilterError::new(token.pos, format!("unknown field '{ident}'")))?;
        self.parse_test(field)
      }
      other => Err(FilterError::new(
        token.pos,
        format!("expected field or '(', found {other}"),
      )),
    }
  }

  fn parse_test(&mut self, field: Field) -> Result<Expr, FilterError> {
    let op = match self.peek().kind.clone() {
      TokenKind::EqEq => {
        self.advance();
        StringOp::Eq
      }
      TokenKind::NotEq => {
        self.advance();
        StringOp::Ne
      }
      TokenKind::Dot => {
        self.advance();
        let method = self.advance();
        let op = match &method.kind {
          TokenKind::Ident(name) => StringOp::method(name),
          _ => None,
        };
        let op = op.ok_or_else(|| {
          FilterError::new(method.pos, "expected one of contains, startsWith, endsWith")
        })?;
        self.expect(TokenKind::LParen, "'('")?;
        let operand = self.expect_string()?;
        self.expect(TokenKind::RParen, "')'")?;
        return Ok(Expr::Test { field, op, operand });
      }
      _ => return Err(self.unexpected("'==', '!=' or '.'")),
    };

    let operand = self.expect_string()?;
    Ok(Expr::Test { field, op, operand })
  }
}
