//! Generated signals and their width-aware connection rules.
//!
//! A [`Wire`] tracks how many of its elements have been driven. Every driving
//! operation checks the occupancy contract and returns a [`Statement`]; a
//! violation is an [`InternalError`], never a user-facing error.

use crate::expr::Expr;
use crate::port::Port;
use crate::stmt::{Declaration, Statement};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use stitch_common::{InternalError, StitchResult};

/// How assignments to a wire are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireKind {
    /// Continuous assignment.
    Net,
    /// Non-blocking assignment on the rising edge of `clock`.
    Reg {
        /// The clock net.
        clock: String,
    },
}

/// A named signal in the generated module, or an operand view of one.
///
/// Equality and hashing use the name only.
#[derive(Debug, Clone)]
pub struct Wire {
    name: String,
    width: u32,
    arity: u32,
    kind: WireKind,
    expr: Expr,
    occupancy: u32,
    history: Vec<String>,
}

impl PartialEq for Wire {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Wire {}

impl Hash for Wire {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Wire {
    /// Creates a continuously assigned wire. Width and arity below 1 are raised to 1.
    pub fn new(name: impl Into<String>, width: u32, arity: u32) -> Self {
        let name = name.into();
        Self {
            expr: Expr::Net(name.clone()),
            name,
            width: width.max(1),
            arity: arity.max(1),
            kind: WireKind::Net,
            occupancy: 0,
            history: Vec::new(),
        }
    }

    /// Creates a register clocked by `clock`.
    pub fn reg(name: impl Into<String>, width: u32, arity: u32, clock: impl Into<String>) -> Self {
        Self {
            kind: WireKind::Reg {
                clock: clock.into(),
            },
            ..Self::new(name, width, arity)
        }
    }

    /// An all-zero or all-one literal operand.
    pub fn constant(width: u32, ones: bool) -> Self {
        let width = width.max(1);
        Self::view(Expr::Const { width, ones }, width)
    }

    /// A macro operand of the given width.
    pub fn from_macro(name: &str, width: u32) -> Self {
        Self::view(Expr::Macro(name.to_string()), width)
    }

    /// The wire standing for an existing port, registered when `clock` is given.
    pub fn from_port(port: &Port, clock: Option<&str>) -> Self {
        match clock {
            Some(clock) => Self::reg(&port.name, port.width, port.arity, clock),
            None => Self::new(&port.name, port.width, port.arity),
        }
    }

    fn view(expr: Expr, width: u32) -> Self {
        Self {
            name: expr.to_string(),
            width,
            arity: 1,
            kind: WireKind::Net,
            expr,
            occupancy: 0,
            history: Vec::new(),
        }
    }

    /// The wire name; for views, the rendered expression.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bit width of one element.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of elements.
    pub fn arity(&self) -> u32 {
        self.arity
    }

    /// Assignment form.
    pub fn kind(&self) -> &WireKind {
        &self.kind
    }

    /// The expression this wire contributes when used as an operand.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Number of elements driven so far.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Rendered operands driven into this wire, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Returns `true` once every element is driven.
    pub fn is_driven(&self) -> bool {
        self.occupancy >= self.arity
    }

    /// The declaration of this wire.
    pub fn declaration(&self) -> Declaration {
        Declaration {
            name: self.name.clone(),
            width: self.width,
            arity: self.arity,
        }
    }

    /// Drives this wire from `operand`, adapting the width.
    ///
    /// A narrower operand is zero-extended. A wider one is truncated to the
    /// low `width` bits, which requires an addressable operand or a literal.
    pub fn assign(&mut self, operand: &Wire) -> StitchResult<Statement> {
        if self.arity != 1 {
            return Err(InternalError::new(format!(
                "cannot assign to array `{}` [{}] as a whole",
                self.name, self.arity
            )));
        }
        if operand.arity != 1 {
            return Err(InternalError::new(format!(
                "array operand `{}` [{}] assigned to `{}`",
                operand.name, operand.arity, self.name
            )));
        }
        let value = self.adapt(operand)?;
        self.occupy()?;
        self.history.push(operand.name.clone());
        self.statement(value)
    }

    fn adapt(&self, operand: &Wire) -> StitchResult<Expr> {
        match operand.width.cmp(&self.width) {
            Ordering::Equal => Ok(operand.expr.clone()),
            Ordering::Less => Ok(match operand.expr {
                Expr::Const { ones: false, .. } => Expr::Const {
                    width: self.width,
                    ones: false,
                },
                _ => Expr::ZeroExtend {
                    pad: self.width - operand.width,
                    inner: Box::new(operand.expr.clone()),
                },
            }),
            Ordering::Greater => match operand.expr {
                Expr::Const { ones, .. } => Ok(Expr::Const {
                    width: self.width,
                    ones,
                }),
                ref expr if expr.is_addressable() => Ok(Expr::Truncate {
                    inner: Box::new(expr.clone()),
                    width: self.width,
                }),
                _ => Err(InternalError::new(format!(
                    "cannot truncate `{}` from {} to {} bits",
                    operand.name, operand.width, self.width
                ))),
            },
        }
    }

    /// Counts one more driven element.
    pub fn occupy(&mut self) -> StitchResult<()> {
        if self.occupancy >= self.arity {
            return Err(InternalError::new(format!(
                "`{}` already driven {} of {} times",
                self.name, self.occupancy, self.arity
            )));
        }
        self.occupancy += 1;
        Ok(())
    }

    /// Marks every element as driven by something outside the generated body.
    pub fn mark_driven(&mut self) {
        self.occupancy = self.arity;
    }

    /// Drives every element to all zeros or all ones.
    pub fn tie_off(&mut self, ones: bool) -> StitchResult<Statement> {
        if self.occupancy != 0 {
            return Err(InternalError::new(format!(
                "cannot tie off `{}`: {} of {} elements already driven",
                self.name, self.occupancy, self.arity
            )));
        }
        let literal = Expr::Const {
            width: self.width,
            ones,
        };
        let value = if self.arity > 1 {
            Expr::Pattern(vec![literal; self.arity as usize])
        } else {
            literal
        };
        self.history.push(value.to_string());
        self.occupancy = self.arity;
        self.statement(value)
    }

    fn statement(&self, value: Expr) -> StitchResult<Statement> {
        if !self.expr.is_addressable() {
            return Err(InternalError::new(format!(
                "`{}` cannot be driven",
                self.name
            )));
        }
        let target = self.expr.to_string();
        Ok(match &self.kind {
            WireKind::Net => Statement::Assign { target, value },
            WireKind::Reg { clock } => Statement::Clocked {
                clock: clock.clone(),
                target,
                value,
            },
        })
    }

    /// A scalar view of element `index`.
    ///
    /// On an array the view has the element width; on a scalar vector it is
    /// a single bit.
    pub fn element(&self, index: u32) -> StitchResult<Wire> {
        let Expr::Net(base) = &self.expr else {
            return Err(InternalError::new(format!(
                "cannot index `{}`",
                self.name
            )));
        };
        let (bound, width) = if self.arity > 1 {
            (self.arity, self.width)
        } else {
            (self.width, 1)
        };
        if index >= bound {
            return Err(InternalError::new(format!(
                "index {index} out of range for `{}` ({bound} elements)",
                self.name
            )));
        }
        let mut view = Self::view(
            Expr::Index {
                base: base.clone(),
                index,
            },
            width,
        );
        view.kind = self.kind.clone();
        Ok(view)
    }

    /// Bitwise AND of two scalar wires of equal width.
    ///
    /// An all-ones literal on either side yields the other operand unchanged.
    pub fn and(&self, other: &Wire) -> StitchResult<Wire> {
        if self.arity != 1 || other.arity != 1 || self.width != other.width {
            return Err(InternalError::new(format!(
                "cannot AND `{}` ({}x{}) with `{}` ({}x{})",
                self.name, self.width, self.arity, other.name, other.width, other.arity
            )));
        }
        if self.expr.is_all_ones() {
            return Ok(other.clone());
        }
        if other.expr.is_all_ones() {
            return Ok(self.clone());
        }
        Ok(Self::view(
            Expr::And(Box::new(self.expr.clone()), Box::new(other.expr.clone())),
            self.width,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortDirection;
    use std::collections::HashSet;

    #[test]
    fn equality_by_name() {
        let a = Wire::new("x", 8, 1);
        let b = Wire::new("x", 16, 2);
        assert_eq!(a, b);
        let set: HashSet<Wire> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn assign_equal_width() {
        let mut t = Wire::new("t", 8, 1);
        let s = t.assign(&Wire::new("s", 8, 1)).unwrap();
        assert_eq!(
            s,
            Statement::Assign {
                target: "t".into(),
                value: Expr::Net("s".into())
            }
        );
        assert_eq!(t.occupancy(), 1);
        assert_eq!(t.history(), ["s"]);
        assert!(t.is_driven());
    }

    #[test]
    fn occupancy_is_monotonic() {
        let mut t = Wire::new("t", 1, 1);
        t.assign(&Wire::new("a", 1, 1)).unwrap();
        let err = t.assign(&Wire::new("b", 1, 1)).unwrap_err();
        assert!(err.message.contains("already driven"));
        assert_eq!(t.occupancy(), 1);
        assert_eq!(t.history().len(), 1);
    }

    #[test]
    fn element_occupancy_reaches_arity() {
        let mut arr = Wire::new("arr", 4, 3);
        for _ in 0..3 {
            arr.occupy().unwrap();
        }
        assert!(arr.is_driven());
        assert!(arr.occupy().is_err());
    }

    #[test]
    fn zero_extension_keeps_low_bits() {
        let mut t = Wire::new("t", 16, 1);
        let stmt = t.assign(&Wire::new("s", 6, 1)).unwrap();
        assert_eq!(stmt.value().to_string(), "{10'b0, s}");
        for v in [0u128, 1, 0b10_1010, 0b11_1111] {
            let got = stmt.value().eval(&|n| (n == "s").then_some(v));
            assert_eq!(got, Some(v));
        }
    }

    #[test]
    fn truncation_keeps_low_bits() {
        let mut t = Wire::new("t", 6, 1);
        let stmt = t.assign(&Wire::new("id", 16, 1)).unwrap();
        assert_eq!(stmt.value().to_string(), "id[5:0]");
        let got = stmt.value().eval(&|_| Some(0xabcd));
        assert_eq!(got, Some(0xabcd & 0x3f));
    }

    #[test]
    fn truncating_non_addressable_fails() {
        let a = Wire::new("a", 8, 1);
        let b = Wire::new("b", 8, 1);
        let both = a.and(&b).unwrap();
        let mut t = Wire::new("t", 4, 1);
        assert!(t.assign(&both).is_err());
        assert_eq!(t.occupancy(), 0);
    }

    #[test]
    fn constants_resize() {
        let mut t = Wire::new("t", 8, 1);
        let stmt = t.assign(&Wire::constant(1, false)).unwrap();
        assert_eq!(stmt.value().to_string(), "8'b0");
        let mut u = Wire::new("u", 2, 1);
        let stmt = u.assign(&Wire::constant(4, true)).unwrap();
        assert_eq!(stmt.value().to_string(), "2'b11");
    }

    #[test]
    fn array_operand_rejected() {
        let mut t = Wire::new("t", 8, 1);
        assert!(t.assign(&Wire::new("arr", 8, 2)).is_err());
        let mut arr = Wire::new("arr", 8, 2);
        assert!(arr.assign(&Wire::new("s", 8, 1)).is_err());
    }

    #[test]
    fn reg_emits_clocked() {
        let port = Port::new("cl_sh_status0", PortDirection::Output, 32, 1).registered(true);
        let mut r = Wire::from_port(&port, Some("clk_main_a0"));
        let stmt = r.assign(&Wire::new("x", 32, 1)).unwrap();
        assert_eq!(
            stmt,
            Statement::Clocked {
                clock: "clk_main_a0".into(),
                target: "cl_sh_status0".into(),
                value: Expr::Net("x".into())
            }
        );
    }

    #[test]
    fn tie_off_scalar_and_array() {
        let mut s = Wire::new("ack", 1, 1);
        let stmt = s.tie_off(true).unwrap();
        assert_eq!(stmt.value().to_string(), "1'b1");
        assert!(s.is_driven());

        let mut arr = Wire::new("ids", 4, 2);
        let stmt = arr.tie_off(false).unwrap();
        assert_eq!(stmt.value().to_string(), "'{4'b0, 4'b0}");
        assert_eq!(arr.occupancy(), 2);
    }

    #[test]
    fn tie_off_requires_unoccupied() {
        let mut arr = Wire::new("ids", 4, 2);
        arr.occupy().unwrap();
        assert!(arr.tie_off(false).is_err());
    }

    #[test]
    fn element_views() {
        let arr = Wire::new("arr", 16, 3);
        let e = arr.element(2).unwrap();
        assert_eq!(e.name(), "arr[2]");
        assert_eq!((e.width(), e.arity()), (16, 1));
        assert!(arr.element(3).is_err());

        let vec = Wire::new("ready", 3, 1);
        let bit = vec.element(1).unwrap();
        assert_eq!((bit.name(), bit.width()), ("ready[1]", 1));
        assert!(vec.element(3).is_err());
        assert!(bit.element(0).is_err());
    }

    #[test]
    fn element_view_is_assignable() {
        let arr = Wire::new("arr", 8, 2);
        let mut e = arr.element(1).unwrap();
        let stmt = e.assign(&Wire::new("s", 8, 1)).unwrap();
        assert_eq!(stmt.target(), "arr[1]");
    }

    #[test]
    fn and_composition() {
        let a = Wire::new("a", 1, 1);
        let b = Wire::new("b", 1, 1);
        let both = a.and(&b).unwrap();
        assert_eq!(both.name(), "(a & b)");
        assert!(a.and(&Wire::new("c", 2, 1)).is_err());
        assert!(a.and(&Wire::new("d", 1, 2)).is_err());
    }

    #[test]
    fn and_with_true_is_identity() {
        let a = Wire::new("a", 1, 1);
        let t = Wire::constant(1, true);
        assert_eq!(t.and(&a).unwrap().expr(), a.expr());
        assert_eq!(a.and(&t).unwrap().expr(), a.expr());
    }

    #[test]
    fn macro_operand() {
        let mut t = Wire::new("cl_sh_id0", 32, 1);
        let stmt = t.assign(&Wire::from_macro("CL_SH_ID0", 32)).unwrap();
        assert_eq!(stmt.value().to_string(), "`CL_SH_ID0");
    }

    #[test]
    fn declaration_shape() {
        let d = Wire::new("w", 8, 4).declaration();
        assert_eq!((d.name.as_str(), d.width, d.arity), ("w", 8, 4));
    }
}
