//! Line-oriented port declaration scanner.
//!
//! Each line goes through three stages: comment stripping (which may open or
//! close block-comment scopes), directive handling (which may open or close
//! conditional scopes), and, for consumable lines only, declaration
//! classification. The scan stops at the first consumable line holding `);`.

use crate::error::ScanError;
use crate::header::locate_port_list;
use crate::scope::{ScopeKind, ScopeStack};
use crate::ScanOptions;
use stitch_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use stitch_ir::{is_clock_or_reset, Port, PortDirection};

/// Scans a bare port list (or the inside of a module header).
pub fn scan_ports(
    text: &str,
    opts: &ScanOptions,
    sink: &DiagnosticSink,
) -> Result<Vec<Port>, ScanError> {
    Scanner::new(opts, sink, 1).run(text)
}

/// Locates `module <module>` in a whole file and scans its port list.
///
/// Reported line numbers are relative to the whole file.
pub fn scan_module_ports(
    text: &str,
    module: &str,
    opts: &ScanOptions,
    sink: &DiagnosticSink,
) -> Result<Vec<Port>, ScanError> {
    let list = locate_port_list(text, module)?;
    Scanner::new(opts, sink, list.first_line).run(list.text)
}

/// Removes a trailing `//` comment and trailing whitespace.
pub fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => line[..idx].trim_end(),
        None => line.trim_end(),
    }
}

/// Drops commas and the untyped `wire` keyword, and collapses whitespace.
pub fn normalize(line: &str) -> String {
    line.replace(',', "")
        .split_whitespace()
        .filter(|word| *word != "wire")
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Range(&'a str),
    Other,
}

fn lex_declaration(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_whitespace() {
            pos += 1;
        } else if b == b'[' {
            let end = text[pos..].find(']').map_or(bytes.len(), |n| pos + n);
            tokens.push(Token::Range(&text[pos + 1..end]));
            pos = (end + 1).min(bytes.len());
        } else if is_word_byte(b) {
            let start = pos;
            while pos < bytes.len() && is_word_byte(bytes[pos]) {
                pos += 1;
            }
            tokens.push(Token::Word(&text[start..pos]));
        } else {
            tokens.push(Token::Other);
            pos += 1;
        }
    }
    tokens
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// The size of a `[hi:lo]` range: `hi + 1`, whatever `lo` is.
///
/// `None` when `hi` is not a literal or there is no `:`.
fn range_size(range: &str) -> Option<u32> {
    let (hi, _) = range.split_once(':')?;
    hi.trim().parse::<u32>().ok()?.checked_add(1)
}

/// The element count after a name: a `[hi:lo]` range or the `[n]` size form.
fn unpacked_size(range: &str) -> Option<u32> {
    if range.contains(':') {
        range_size(range)
    } else {
        range.trim().parse().ok().filter(|&n| n > 0)
    }
}

const NON_NUMERIC_RANGE: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 101,
};

struct Scanner<'a> {
    opts: &'a ScanOptions,
    sink: &'a DiagnosticSink,
    first_line: usize,
    scopes: ScopeStack,
}

impl<'a> Scanner<'a> {
    fn new(opts: &'a ScanOptions, sink: &'a DiagnosticSink, first_line: usize) -> Self {
        Self {
            opts,
            sink,
            first_line,
            scopes: ScopeStack::new(),
        }
    }

    fn run(mut self, text: &str) -> Result<Vec<Port>, ScanError> {
        let mut ports = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = self.first_line + idx;
            let code = self.strip_comments(raw, line)?;
            let code = code.trim();
            if code.is_empty() {
                continue;
            }
            if let Some(directive) = code.strip_prefix('`') {
                self.directive(directive, line)?;
                continue;
            }
            if self.scopes.in_conditional() {
                log::trace!("{}:{line}: skipped in conditional block", self.opts.source);
                continue;
            }
            self.check_forbidden(code, line)?;

            let end = code.find(");").or_else(|| code.starts_with(')').then_some(0));
            let declaration = end.map_or(code, |idx| &code[..idx]);
            if let Some(port) = self.classify(declaration, line)? {
                ports.push(port);
            }
            if end.is_some() {
                log::debug!(
                    "{}:{line}: end of port list, {} ports",
                    self.opts.source,
                    ports.len()
                );
                return Ok(ports);
            }
        }
        self.scopes.finish()?;
        log::debug!("{}: {} ports", self.opts.source, ports.len());
        Ok(ports)
    }

    /// Returns the code outside comments, updating block-comment scopes.
    fn strip_comments(&mut self, raw: &str, line: usize) -> Result<String, ScanError> {
        let mut code = String::new();
        let mut rest = raw;
        loop {
            if self.scopes.in_comment() {
                match rest.find("*/") {
                    Some(idx) => {
                        self.scopes.close_comment(line)?;
                        rest = &rest[idx + 2..];
                        code.push(' ');
                    }
                    None => return Ok(code),
                }
                continue;
            }

            let open = rest.find("/*");
            let close = rest.find("*/");
            let line_comment = rest.find("//");
            let first = [open, close, line_comment].into_iter().flatten().min();
            match first {
                None => {
                    code.push_str(rest);
                    return Ok(code);
                }
                Some(idx) if Some(idx) == line_comment => {
                    code.push_str(strip_line_comment(rest));
                    return Ok(code);
                }
                Some(idx) if Some(idx) == open => {
                    code.push_str(&rest[..idx]);
                    self.scopes.push(ScopeKind::BlockComment, line);
                    rest = &rest[idx + 2..];
                }
                Some(_) => {
                    return Err(ScanError::UnbalancedScope {
                        line,
                        marker: "*/".to_string(),
                    })
                }
            }
        }
    }

    fn directive(&mut self, text: &str, line: usize) -> Result<(), ScanError> {
        let word = text
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .next()
            .unwrap_or_default();
        match word {
            "ifdef" => self.scopes.push(ScopeKind::Ifdef, line),
            "ifndef" => self.scopes.push(ScopeKind::Ifndef, line),
            "else" | "elsif" => self.scopes.expect_conditional(&format!("`{word}"), line)?,
            "endif" => self.scopes.close_conditional(line)?,
            _ => log::trace!("{}:{line}: skipped `{word}", self.opts.source),
        }
        Ok(())
    }

    fn check_forbidden(&self, code: &str, line: usize) -> Result<(), ScanError> {
        match self.opts.forbidden.iter().find(|t| code.contains(t.as_str())) {
            Some(token) => Err(ScanError::ForbiddenToken {
                line,
                token: token.clone(),
            }),
            None => Ok(()),
        }
    }

    fn classify(&self, declaration: &str, line: usize) -> Result<Option<Port>, ScanError> {
        let text = normalize(declaration);
        let tokens = lex_declaration(&text);
        if !tokens.iter().any(|t| matches!(t, Token::Word(_))) {
            return Ok(None);
        }

        let directions: Vec<PortDirection> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word(w) => PortDirection::ALL.into_iter().find(|d| d.keyword() == *w),
                _ => None,
            })
            .collect();
        let direction = match directions.as_slice() {
            [direction] => *direction,
            [] => return Err(ScanError::UnknownDirection { line, text: text.clone() }),
            _ => return Err(ScanError::AmbiguousDirection { line, text: text.clone() }),
        };

        let mut registered = false;
        let mut name_at = None;
        for (idx, token) in tokens.iter().enumerate() {
            let Token::Word(word) = *token else { continue };
            match word {
                "input" | "output" | "inout" | "wire" | "signed" | "unsigned" | "var" => {}
                "logic" | "reg" => registered = true,
                _ if word.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                    name_at = Some((idx, word));
                    break;
                }
                _ => {}
            }
        }
        let Some((name_at, name)) = name_at else {
            return Err(ScanError::MissingIdentifier {
                line,
                text: text.clone(),
            });
        };

        if is_clock_or_reset(name) {
            log::trace!("{}:{line}: dropped clock/reset `{name}`", self.opts.source);
            return Ok(None);
        }

        let packed = tokens[..name_at].iter().find_map(|t| match t {
            Token::Range(r) => Some(*r),
            _ => None,
        });
        let unpacked = tokens[name_at + 1..].iter().find_map(|t| match t {
            Token::Range(r) => Some(*r),
            _ => None,
        });
        let width = packed.map_or(1, |r| self.size_or_one(range_size(r), r, name, line));
        let arity = unpacked.map_or(1, |r| self.size_or_one(unpacked_size(r), r, name, line));

        Ok(Some(
            Port::new(name, direction, width, arity)
                .registered(registered)
                .at_line(line),
        ))
    }

    fn size_or_one(&self, size: Option<u32>, range: &str, name: &str, line: usize) -> u32 {
        size.unwrap_or_else(|| {
            log::warn!("{}:{line}: non-numeric range `[{range}]`", self.opts.source);
            self.sink.emit(
                Diagnostic::warning(
                    NON_NUMERIC_RANGE,
                    format!("non-numeric range `[{range}]` on `{name}`, assuming 1"),
                )
                .at(Location::new(self.opts.source.as_str(), line)),
            );
            1
        })
    }
}
