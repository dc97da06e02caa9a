//! Top-level stylesheet syntax trees.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Name discovery only cares about the statements at the root of a file:
//! variable declarations and `@import` directives. This module parses both
//! dialects into the same flat list of [`Node`]s. Blocks (style rules,
//! mixins, control flow) are checked for balance and then skipped, so
//! anything declared inside them never shows up as a top-level node.
//!
//! ```text
//! $primary: blue !default;        → Node::Variable
//! @import "colors";               → Node::AtRule { keyword: "import" }
//! .btn { color: $primary; }       → Node::Rule
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dialect::Dialect;
use crate::error::{Result, SassVarsError};

/// Valid SASS variable identifiers (after the `$`).
static VARIABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:[A-Za-z_-]|[^\x00-\x7F])(?:[A-Za-z0-9_-]|[^\x00-\x7F])*$").unwrap()
});

/// Whether `name` can follow `$` in a variable reference.
pub(crate) fn is_variable_name(name: &str) -> bool {
    VARIABLE_NAME.is_match(name)
}

/// A parsed stylesheet: its top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

impl Stylesheet {
    /// Variable declarations at the root of the file.
    pub fn variables(&self) -> impl Iterator<Item = &VariableDecl> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Variable(decl) => Some(decl),
            _ => None,
        })
    }

    /// Paths of the `@import` directives that name a single quoted path.
    pub fn imports(&self) -> impl Iterator<Item = String> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::AtRule(rule) => rule.import_path(),
            _ => None,
        })
    }
}

/// One top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Variable(VariableDecl),
    AtRule(AtRule),
    /// A statement followed by a block, e.g. a style rule
    Rule { prelude: String, line: usize },
    /// A block-less statement that is neither of the above
    Statement { text: String, line: usize },
}

/// `$name: value [!default] [!global]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    /// The declared name without the `$`, exactly as written
    pub name: String,
    /// Value expression text, flags removed
    pub value: String,
    pub is_default: bool,
    pub is_global: bool,
    pub line: usize,
}

/// `@keyword params` with or without a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub keyword: String,
    pub params: String,
    pub has_block: bool,
    pub line: usize,
}

impl AtRule {
    /// The path of an `@import` whose sole argument is a quoted string.
    ///
    /// Returns `None` for any other directive, for `@import url(...)`,
    /// comma-separated or media-qualified imports, and for interpolated
    /// paths (those are only known at compile time).
    pub fn import_path(&self) -> Option<String> {
        if self.keyword != "import" || self.has_block {
            return None;
        }
        let path = parse_quoted_literal(&self.params)?;
        if path.contains("#{") {
            tracing::trace!(path = %path, line = self.line, "Skipping interpolated import");
            return None;
        }
        Some(path)
    }
}

/// A syntax error before the file path is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SyntaxError {
    line: usize,
    message: String,
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parse stylesheet `source` written in `dialect`.
///
/// `path` only labels errors.
pub fn parse_stylesheet(source: &str, dialect: Dialect, path: &Path) -> Result<Stylesheet> {
    let nodes = match dialect {
        Dialect::Scss => ScssParser::new(source).parse(),
        Dialect::Sass => parse_indented(source),
    };

    nodes
        .map(|nodes| Stylesheet { nodes })
        .map_err(|e| SassVarsError::Parse {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })
}

/// Build a node from the text of one top-level statement.
fn classify(
    text: &str,
    has_block: bool,
    line: usize,
) -> std::result::Result<Option<Node>, SyntaxError> {
    if text.is_empty() && !has_block {
        return Ok(None);
    }

    if let Some(rest) = text.strip_prefix('$') {
        let name_end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()))
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        if !VARIABLE_NAME.is_match(name) {
            return Err(SyntaxError::new(line, "Expected identifier."));
        }

        let Some(value) = rest[name_end..].trim_start().strip_prefix(':') else {
            return Err(SyntaxError::new(line, "expected \":\"."));
        };
        if has_block {
            return Err(SyntaxError::new(
                line,
                "Nothing may be nested beneath variable declarations.",
            ));
        }

        let (value, is_default, is_global) = strip_flags(value.trim());
        if value.is_empty() {
            return Err(SyntaxError::new(line, "Expected expression."));
        }

        return Ok(Some(Node::Variable(VariableDecl {
            name: name.to_string(),
            value: value.to_string(),
            is_default,
            is_global,
            line,
        })));
    }

    if let Some(rest) = text.strip_prefix('@') {
        let keyword_end = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        if keyword_end == 0 {
            return Err(SyntaxError::new(line, "Expected identifier."));
        }
        return Ok(Some(Node::AtRule(AtRule {
            keyword: rest[..keyword_end].to_string(),
            params: rest[keyword_end..].trim().to_string(),
            has_block,
            line,
        })));
    }

    if has_block {
        Ok(Some(Node::Rule {
            prelude: text.to_string(),
            line,
        }))
    } else {
        Ok(Some(Node::Statement {
            text: text.to_string(),
            line,
        }))
    }
}

fn strip_flags(mut value: &str) -> (&str, bool, bool) {
    let mut is_default = false;
    let mut is_global = false;
    loop {
        if let Some(rest) = value.strip_suffix("!default") {
            is_default = true;
            value = rest.trim_end();
        } else if let Some(rest) = value.strip_suffix("!global") {
            is_global = true;
            value = rest.trim_end();
        } else {
            return (value, is_default, is_global);
        }
    }
}

/// Parse `"path"` or `'path'` when it is the entire argument.
fn parse_quoted_literal(params: &str) -> Option<String> {
    let mut chars = params.trim().chars();
    let quote = chars.next().filter(|&c| c == '"' || c == '\'')?;

    let mut literal = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => literal.push(chars.next()?),
            c if c == quote => {
                return chars.as_str().is_empty().then_some(literal);
            }
            c => literal.push(c),
        }
    }
    None
}

/// What ended a SCSS statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    Block,
    /// A `}` with nothing open; left for the caller to report
    CloseBrace,
    Eof,
}

struct ScssParser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl ScssParser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn parse(mut self) -> std::result::Result<Vec<Node>, SyntaxError> {
        let mut nodes = Vec::new();

        loop {
            self.skip_trivia()?;
            let Some(c) = self.peek() else {
                break;
            };
            match c {
                '}' => return Err(SyntaxError::new(self.line, "unmatched \"}\".")),
                ';' => {
                    self.bump();
                    continue;
                }
                _ => {}
            }

            let line = self.line;
            let (text, terminator) = self.read_statement()?;
            let has_block = terminator == Terminator::Block;
            if has_block {
                self.skip_block()?;
            }
            if let Some(node) = classify(text.trim(), has_block, line)? {
                nodes.push(node);
            }
        }

        Ok(nodes)
    }

    fn skip_trivia(&mut self) -> std::result::Result<(), SyntaxError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> std::result::Result<(), SyntaxError> {
        let start = self.line;
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(SyntaxError::new(start, "expected more input.")),
            }
        }
    }

    /// Read a quoted string, appending it (quotes included) to `out`.
    fn read_string(&mut self, out: &mut String) -> std::result::Result<(), SyntaxError> {
        let Some(quote) = self.bump() else {
            return Ok(());
        };
        out.push(quote);
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(SyntaxError::new(self.line, format!("Expected {}.", quote)));
                }
                Some('\\') => {
                    out.push('\\');
                    self.bump();
                    match self.bump() {
                        Some(escaped) => out.push(escaped),
                        None => {
                            return Err(SyntaxError::new(self.line, format!("Expected {}.", quote)));
                        }
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.bump();
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn read_statement(&mut self) -> std::result::Result<(String, Terminator), SyntaxError> {
        let mut text = String::new();
        // Closers we still expect, innermost last
        let mut open: Vec<char> = Vec::new();

        loop {
            let Some(c) = self.peek() else {
                return match open.last() {
                    Some(closer) => Err(SyntaxError::new(
                        self.line,
                        format!("expected \"{}\".", closer),
                    )),
                    None => Ok((text, Terminator::Eof)),
                };
            };

            match c {
                '"' | '\'' => self.read_string(&mut text)?,
                '/' if self.peek_at(1) == Some('*') => {
                    self.skip_block_comment()?;
                    text.push(' ');
                }
                '/' if self.peek_at(1) == Some('/') && !open.contains(&')') => {
                    self.skip_line_comment();
                    text.push(' ');
                }
                '#' if self.peek_at(1) == Some('{') => {
                    self.bump();
                    self.bump();
                    text.push_str("#{");
                    open.push('}');
                }
                '(' | '[' => {
                    self.bump();
                    text.push(c);
                    open.push(if c == '(' { ')' } else { ']' });
                }
                '{' if open.is_empty() => {
                    self.bump();
                    return Ok((text, Terminator::Block));
                }
                '{' => {
                    self.bump();
                    text.push(c);
                    open.push('}');
                }
                ')' | ']' | '}' => {
                    if open.last() == Some(&c) {
                        open.pop();
                        self.bump();
                        text.push(c);
                    } else if c == '}' && open.is_empty() {
                        return Ok((text, Terminator::CloseBrace));
                    } else {
                        return Err(SyntaxError::new(self.line, format!("unmatched \"{}\".", c)));
                    }
                }
                ';' if open.is_empty() => {
                    self.bump();
                    return Ok((text, Terminator::Semicolon));
                }
                _ => {
                    self.bump();
                    text.push(c);
                }
            }
        }
    }

    /// Skip a block body; the opening `{` is already consumed.
    fn skip_block(&mut self) -> std::result::Result<(), SyntaxError> {
        let start = self.line;
        let mut depth = 1usize;
        let mut parens = 0usize;
        let mut scratch = String::new();

        loop {
            let Some(c) = self.peek() else {
                return Err(SyntaxError::new(start, "expected \"}\"."));
            };
            match c {
                '"' | '\'' => {
                    scratch.clear();
                    self.read_string(&mut scratch)?;
                }
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment()?,
                '/' if self.peek_at(1) == Some('/') && parens == 0 => self.skip_line_comment(),
                '(' => {
                    parens += 1;
                    self.bump();
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    self.bump();
                }
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }
}

fn parse_indented(source: &str) -> std::result::Result<Vec<Node>, SyntaxError> {
    let lines: Vec<&str> = source.lines().collect();
    let is_blank = |line: &str| line.trim().is_empty();
    let is_indented = |line: &str| line.starts_with([' ', '\t']);

    let mut nodes = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_blank(lines[i]) {
            i += 1;
            continue;
        }
        if is_indented(lines[i]) {
            // Only reachable before the first top-level statement
            return Err(SyntaxError::new(
                i + 1,
                "Indenting at the beginning of the document is illegal.",
            ));
        }

        let line_no = i + 1;
        let trimmed = lines[i].trim();

        // Comments own every line indented beneath them
        if trimmed.starts_with("//") || trimmed.starts_with("/*") {
            i += 1;
            while i < lines.len() && (is_blank(lines[i]) || is_indented(lines[i])) {
                i += 1;
            }
            continue;
        }

        // A statement continues onto following lines while brackets are open
        let mut text = String::new();
        let mut open: Vec<char> = Vec::new();
        loop {
            text.push_str(&strip_indented_line(lines[i], i + 1, &mut open)?);
            text.push(' ');
            i += 1;
            if open.is_empty() {
                break;
            }
            if i >= lines.len() {
                let closer = open.last().copied().unwrap_or(')');
                return Err(SyntaxError::new(i, format!("expected \"{}\".", closer)));
            }
        }

        let mut has_block = false;
        while i < lines.len() && (is_blank(lines[i]) || is_indented(lines[i])) {
            has_block |= !is_blank(lines[i]);
            i += 1;
        }

        let text = text.trim();
        if text.ends_with(';') {
            return Err(SyntaxError::new(
                line_no,
                "semicolons aren't allowed in the indented syntax.",
            ));
        }
        if let Some(node) = classify(text, has_block, line_no)? {
            nodes.push(node);
        }
    }

    Ok(nodes)
}

/// Remove comments from one indented-syntax line, tracking open brackets.
fn strip_indented_line(
    line: &str,
    line_no: usize,
    open: &mut Vec<char>,
) -> std::result::Result<String, SyntaxError> {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '"' | '\'' => {
                out.push(c);
                i += 1;
                loop {
                    let Some(&s) = chars.get(i) else {
                        return Err(SyntaxError::new(line_no, format!("Expected {}.", c)));
                    };
                    out.push(s);
                    i += 1;
                    if s == '\\' {
                        if let Some(&escaped) = chars.get(i) {
                            out.push(escaped);
                            i += 1;
                        }
                    } else if s == c {
                        break;
                    }
                }
                continue;
            }
            '/' if next == Some('/') && !open.contains(&')') => break,
            '/' if next == Some('*') => {
                let rest: String = chars[i + 2..].iter().collect();
                match rest.find("*/") {
                    Some(end) => {
                        i += 2 + rest[..end].chars().count() + 2;
                        out.push(' ');
                        continue;
                    }
                    None => break,
                }
            }
            '#' if next == Some('{') => {
                out.push_str("#{");
                open.push('}');
                i += 2;
                continue;
            }
            '(' => open.push(')'),
            '[' => open.push(']'),
            '{' => open.push('}'),
            ')' | ']' | '}' => {
                if open.last() == Some(&c) {
                    open.pop();
                } else {
                    return Err(SyntaxError::new(line_no, format!("unmatched \"{}\".", c)));
                }
            }
            _ => {}
        }
        out.push(c);
        i += 1;
    }

    Ok(out)
}
