//! Nesting of block comments and conditional-compilation blocks.

use crate::error::ScanError;
use std::fmt;

/// The kind of an open scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// `/* ... */`
    BlockComment,
    /// `` `ifdef ... `endif ``
    Ifdef,
    /// `` `ifndef ... `endif ``
    Ifndef,
}

impl ScopeKind {
    /// Returns `true` for `` `ifdef`` and `` `ifndef`` scopes.
    pub fn is_conditional(self) -> bool {
        matches!(self, ScopeKind::Ifdef | ScopeKind::Ifndef)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::BlockComment => write!(f, "block comment"),
            ScopeKind::Ifdef => write!(f, "`ifdef"),
            ScopeKind::Ifndef => write!(f, "`ifndef"),
        }
    }
}

/// A stack of open scopes with the line each was opened on.
///
/// Closing markers validate the top of the stack, so `` `endif`` cannot
/// close a comment and `*/` cannot close a conditional.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<(ScopeKind, usize)>,
}

impl ScopeStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope on `line`.
    pub fn push(&mut self, kind: ScopeKind, line: usize) {
        self.frames.push((kind, line));
    }

    /// The innermost open scope.
    pub fn top(&self) -> Option<ScopeKind> {
        self.frames.last().map(|(kind, _)| *kind)
    }

    /// Returns `true` while inside a block comment.
    pub fn in_comment(&self) -> bool {
        self.top() == Some(ScopeKind::BlockComment)
    }

    /// Returns `true` while any conditional block is open.
    pub fn in_conditional(&self) -> bool {
        self.frames.iter().any(|(kind, _)| kind.is_conditional())
    }

    /// Nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Closes the innermost block comment at `*/`.
    pub fn close_comment(&mut self, line: usize) -> Result<(), ScanError> {
        match self.top() {
            Some(ScopeKind::BlockComment) => {
                self.frames.pop();
                Ok(())
            }
            _ => Err(ScanError::UnbalancedScope {
                line,
                marker: "*/".to_string(),
            }),
        }
    }

    /// Checks that a branch marker (`` `else``, `` `elsif``) has an open conditional.
    pub fn expect_conditional(&self, marker: &str, line: usize) -> Result<(), ScanError> {
        match self.top() {
            Some(kind) if kind.is_conditional() => Ok(()),
            _ => Err(ScanError::UnbalancedScope {
                line,
                marker: marker.to_string(),
            }),
        }
    }

    /// Closes the innermost conditional at `` `endif``.
    pub fn close_conditional(&mut self, line: usize) -> Result<(), ScanError> {
        self.expect_conditional("`endif", line)?;
        self.frames.pop();
        Ok(())
    }

    /// Fails if any scope is still open at the end of input.
    pub fn finish(&self) -> Result<(), ScanError> {
        match self.frames.first() {
            Some(&(scope, line)) => Err(ScanError::UnterminatedScope { line, scope }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_close() {
        let mut s = ScopeStack::new();
        s.push(ScopeKind::Ifdef, 1);
        s.push(ScopeKind::BlockComment, 2);
        assert!(s.in_comment());
        assert!(s.in_conditional());
        s.close_comment(3).unwrap();
        assert!(!s.in_comment());
        s.close_conditional(4).unwrap();
        assert_eq!(s.depth(), 0);
        s.finish().unwrap();
    }

    #[test]
    fn endif_cannot_close_comment() {
        let mut s = ScopeStack::new();
        s.push(ScopeKind::BlockComment, 1);
        let err = s.close_conditional(2).unwrap_err();
        assert_eq!(
            err,
            ScanError::UnbalancedScope {
                line: 2,
                marker: "`endif".into()
            }
        );
    }

    #[test]
    fn comment_close_without_opener() {
        let mut s = ScopeStack::new();
        assert!(matches!(
            s.close_comment(7),
            Err(ScanError::UnbalancedScope { line: 7, .. })
        ));
    }

    #[test]
    fn else_needs_conditional() {
        let mut s = ScopeStack::new();
        assert!(s.expect_conditional("`else", 1).is_err());
        s.push(ScopeKind::Ifndef, 1);
        assert!(s.expect_conditional("`else", 2).is_ok());
    }

    #[test]
    fn finish_reports_outermost() {
        let mut s = ScopeStack::new();
        s.push(ScopeKind::Ifndef, 3);
        s.push(ScopeKind::Ifdef, 5);
        assert_eq!(
            s.finish(),
            Err(ScanError::UnterminatedScope {
                line: 3,
                scope: ScopeKind::Ifndef
            })
        );
    }
}
