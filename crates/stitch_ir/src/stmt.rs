//! Declarations, statements and instances of a generated module body.

use crate::expr::Expr;

/// A generated wire declaration: `wire [width-1:0] name [arity-1:0];`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The declared name.
    pub name: String,
    /// Element width in bits.
    pub width: u32,
    /// Number of array elements.
    pub arity: u32,
}

/// One driver of a generated or external signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A continuous assignment: `assign target = value;`.
    Assign {
        /// The driven net, possibly an element reference.
        target: String,
        /// The driving expression.
        value: Expr,
    },
    /// A registered assignment on the rising edge of `clock`.
    Clocked {
        /// The clock net.
        clock: String,
        /// The driven register.
        target: String,
        /// The driving expression.
        value: Expr,
    },
}

impl Statement {
    /// The net this statement drives.
    pub fn target(&self) -> &str {
        match self {
            Statement::Assign { target, .. } | Statement::Clocked { target, .. } => target,
        }
    }

    /// The driving expression.
    pub fn value(&self) -> &Expr {
        match self {
            Statement::Assign { value, .. } | Statement::Clocked { value, .. } => value,
        }
    }
}

/// A named port connection of an instance: `.port(net)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// The port on the instantiated module.
    pub port: String,
    /// The net connected to it.
    pub net: String,
}

/// A module instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// The instantiated module type.
    pub module: String,
    /// The instance name.
    pub name: String,
    /// Parameter overrides, in emission order.
    pub parameters: Vec<(String, String)>,
    /// Port connections, in emission order.
    pub connections: Vec<Connection>,
}

impl Instance {
    /// Creates an instance with no parameters or connections.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            parameters: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Adds a parameter override.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Connects `port` to `net`.
    pub fn connect(&mut self, port: impl Into<String>, net: impl Into<String>) {
        self.connections.push(Connection {
            port: port.into(),
            net: net.into(),
        });
    }
}
