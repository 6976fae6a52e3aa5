//! Right-hand-side expressions of generated assignments.

use std::fmt;

/// An expression driving a generated wire.
///
/// The set is closed on purpose: width adaptation only ever zero-extends or
/// truncates, readiness gating only ever ANDs, and tie-offs are literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A named net or port.
    Net(String),
    /// One element of an array (or one bit of a vector): `base[index]`.
    Index {
        /// The addressed net.
        base: String,
        /// The element index.
        index: u32,
    },
    /// An all-zero or all-one literal.
    Const {
        /// Literal width in bits.
        width: u32,
        /// `true` for all ones.
        ones: bool,
    },
    /// A macro defined elsewhere, referenced as `` `NAME ``.
    Macro(String),
    /// Zero-extension by `pad` high bits: `{pad'b0, inner}`.
    ZeroExtend {
        /// Number of zero bits prepended.
        pad: u32,
        /// The extended expression.
        inner: Box<Expr>,
    },
    /// The low `width` bits of an addressable expression.
    Truncate {
        /// The truncated expression.
        inner: Box<Expr>,
        /// Number of bits kept.
        width: u32,
    },
    /// Bitwise AND of two equal-width expressions.
    And(Box<Expr>, Box<Expr>),
    /// An unpacked-array assignment pattern: `'{a, b, ...}`.
    Pattern(Vec<Expr>),
}

impl Expr {
    /// Returns `true` for expressions that can be part-selected.
    pub fn is_addressable(&self) -> bool {
        matches!(self, Expr::Net(_) | Expr::Index { .. })
    }

    /// Returns `true` for an all-ones literal.
    pub fn is_all_ones(&self) -> bool {
        matches!(self, Expr::Const { ones: true, .. })
    }

    /// Evaluates the expression against net values.
    ///
    /// `lookup` receives net names, with elements rendered as `base[index]`.
    /// Macros and patterns have no scalar value and yield `None`. Values are
    /// limited to 128 bits.
    pub fn eval(&self, lookup: &dyn Fn(&str) -> Option<u128>) -> Option<u128> {
        match self {
            Expr::Net(name) => lookup(name),
            Expr::Index { base, index } => lookup(&format!("{base}[{index}]")),
            Expr::Const { width, ones } => Some(if *ones { mask(*width) } else { 0 }),
            Expr::Macro(_) | Expr::Pattern(_) => None,
            Expr::ZeroExtend { inner, .. } => inner.eval(lookup),
            Expr::Truncate { inner, width } => inner.eval(lookup).map(|v| v & mask(*width)),
            Expr::And(a, b) => Some(a.eval(lookup)? & b.eval(lookup)?),
        }
    }
}

fn mask(width: u32) -> u128 {
    if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Net(name) => f.write_str(name),
            Expr::Index { base, index } => write!(f, "{base}[{index}]"),
            Expr::Const { width, ones: false } => write!(f, "{width}'b0"),
            Expr::Const { width, ones: true } => {
                write!(f, "{width}'b{}", "1".repeat(*width as usize))
            }
            Expr::Macro(name) => write!(f, "`{name}"),
            Expr::ZeroExtend { pad, inner } => write!(f, "{{{pad}'b0, {inner}}}"),
            Expr::Truncate { inner, width } => write!(f, "{inner}[{}:0]", width - 1),
            Expr::And(a, b) => write!(f, "({a} & {b})"),
            Expr::Pattern(items) => {
                f.write_str("'{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
