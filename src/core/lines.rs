//! Line cursor for the positional text formats (levels and meshes).
//!
//! Both formats are read one line at a time with values at fixed token
//! positions. Every accessor reports the 1-based line number and what was
//! expected when the input does not match.

use crate::core::types::{Result, Vec2, Vec3, Vec4};
use crate::core::Error;

/// One line of input, split on whitespace
#[derive(Clone, Debug)]
pub struct Line<'a> {
    source_name: &'a str,
    /// 1-based line number
    pub number: usize,
    pub text: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Line<'a> {
    fn new(source_name: &'a str, number: usize, text: &'a str) -> Self {
        Self {
            source_name,
            number,
            text,
            tokens: text.split_whitespace().collect(),
        }
    }

    /// Parse error pointing at this line
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(self.source_name, self.number, message)
    }

    #[inline]
    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// First token, or "" for a blank line
    #[inline]
    pub fn keyword(&self) -> &'a str {
        self.tokens.first().copied().unwrap_or("")
    }

    /// Text following the first token, trimmed
    pub fn rest(&self) -> &'a str {
        let trimmed = self.text.trim_start();
        trimmed[self.keyword().len()..].trim()
    }

    pub fn token(&self, index: usize, what: &str) -> Result<&'a str> {
        self.tokens
            .get(index)
            .copied()
            .ok_or_else(|| self.error(format!("expected {} at token {}", what, index + 1)))
    }

    pub fn f32_at(&self, index: usize, what: &str) -> Result<f32> {
        let token = self.token(index, what)?;
        token
            .parse::<f32>()
            .map_err(|_| self.error(format!("expected number for {}, found '{}'", what, token)))
    }

    pub fn usize_at(&self, index: usize, what: &str) -> Result<usize> {
        let token = self.token(index, what)?;
        token
            .parse::<usize>()
            .map_err(|_| self.error(format!("expected count for {}, found '{}'", what, token)))
    }

    pub fn vec2_at(&self, index: usize, what: &str) -> Result<Vec2> {
        Ok(Vec2::new(self.f32_at(index, what)?, self.f32_at(index + 1, what)?))
    }

    pub fn vec3_at(&self, index: usize, what: &str) -> Result<Vec3> {
        Ok(Vec3::new(
            self.f32_at(index, what)?,
            self.f32_at(index + 1, what)?,
            self.f32_at(index + 2, what)?,
        ))
    }

    pub fn vec4_at(&self, index: usize, what: &str) -> Result<Vec4> {
        Ok(Vec4::new(
            self.f32_at(index, what)?,
            self.f32_at(index + 1, what)?,
            self.f32_at(index + 2, what)?,
            self.f32_at(index + 3, what)?,
        ))
    }
}

/// Forward-only cursor over the lines of a document
pub struct LineReader<'a> {
    source_name: &'a str,
    lines: Vec<&'a str>,
    next: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(source_name: &'a str, text: &'a str) -> Self {
        Self {
            source_name,
            lines: text.lines().collect(),
            next: 0,
        }
    }

    #[inline]
    pub fn source_name(&self) -> &'a str {
        self.source_name
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.lines.len()
    }

    /// Next line, if any
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        let text = *self.lines.get(self.next)?;
        self.next += 1;
        Some(Line::new(self.source_name, self.next, text))
    }

    /// Next line, failing at end of input with what was expected
    pub fn expect_line(&mut self, what: &str) -> Result<Line<'a>> {
        let at_end = self.lines.len() + 1;
        self.next_line()
            .ok_or_else(|| Error::parse(self.source_name, at_end, format!("unexpected end of input, expected {}", what)))
    }

    /// Discard `count` lines, failing if the input runs out
    pub fn skip(&mut self, count: usize, what: &str) -> Result<()> {
        for _ in 0..count {
            self.expect_line(what)?;
        }
        Ok(())
    }

    /// Consume the next line only if it is blank
    pub fn skip_blank(&mut self) {
        if self.peek().is_some_and(|l| l.trim().is_empty()) {
            self.next += 1;
        }
    }

    /// Raw text of the next line without consuming it
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.next).copied()
    }

    /// First character of the next line
    pub fn peek_char(&self) -> Option<char> {
        self.peek().and_then(|l| l.chars().next())
    }
}
