//! Port and wire model for the interconnect generator.
//!
//! Scanned port declarations become [`Port`]s; everything the synthesizer
//! generates is a [`Wire`] stored in a [`WireArena`]. Wires never render text
//! themselves: assigning or tying off a wire yields a [`Statement`] over an
//! [`Expr`], which the emitter serializes later.

#![warn(missing_docs)]

pub mod arena;
pub mod expr;
pub mod port;
pub mod role;
pub mod stmt;
pub mod wire;

pub use arena::{WireArena, WireId};
pub use expr::Expr;
pub use port::{is_clock_or_reset, Port, PortDirection};
pub use role::{PortRole, RoleClassifier};
pub use stmt::{Connection, Declaration, Instance, Statement};
pub use wire::{Wire, WireKind};

