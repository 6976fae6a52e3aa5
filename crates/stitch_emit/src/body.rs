//! The sections of a generated module body.

use stitch_ir::{Declaration, Instance, Statement};

/// Everything the synthesizer generates, grouped by emission section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleBody {
    /// Wire declarations.
    pub declarations: Vec<Declaration>,
    /// Point-to-point wiring between the accelerator, controller and shell.
    pub assignments: Vec<Statement>,
    /// Module instantiations, accelerator first.
    pub instances: Vec<Instance>,
    /// Identity and version constants driven into the shell.
    pub constants: Vec<Statement>,
    /// Final tie-off of undriven shell outputs.
    pub tie_offs: Vec<Statement>,
}

impl ModuleBody {
    /// Creates an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of statements across all statement sections.
    pub fn statement_count(&self) -> usize {
        self.assignments.len() + self.constants.len() + self.tie_offs.len()
    }

    /// Every statement in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.assignments
            .iter()
            .chain(&self.constants)
            .chain(&self.tie_offs)
    }

    /// Returns `true` if nothing has been generated.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.instances.is_empty() && self.statement_count() == 0
    }
}
