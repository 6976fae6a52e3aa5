//! The owned state of one generation run.

use std::collections::HashMap;
use stitch_common::{InternalError, StitchResult};
use stitch_emit::ModuleBody;
use stitch_ir::{Instance, Statement, Wire, WireArena, WireId};

/// The body section a statement is emitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Point-to-point wiring.
    Assignments,
    /// Identity and version constants.
    Constants,
    /// Final tie-off of undriven shell outputs.
    TieOffs,
}

/// Wires, name counters and the body under construction.
///
/// Every wire of a run lives in one arena. Element views are cached per
/// `(wire, index)` so that a view driven twice is caught by its occupancy.
#[derive(Debug)]
pub struct GenContext {
    prefix: String,
    wires: WireArena,
    by_name: HashMap<String, WireId>,
    views: HashMap<(WireId, u32), WireId>,
    parents: HashMap<WireId, WireId>,
    counter: u32,
    body: ModuleBody,
}

impl GenContext {
    /// Creates a context whose generated names start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            wires: WireArena::new(),
            by_name: HashMap::new(),
            views: HashMap::new(),
            parents: HashMap::new(),
            counter: 0,
            body: ModuleBody::new(),
        }
    }

    /// `name` with the generated-wire prefix.
    pub fn prefixed(&self, name: &str) -> String {
        format!("{}_{name}", self.prefix)
    }

    /// Declares a wire named `{prefix}_{tag}_{n}`.
    pub fn fresh(&mut self, tag: &str, width: u32, arity: u32) -> WireId {
        let name = format!("{}_{tag}_{}", self.prefix, self.counter);
        self.counter += 1;
        self.declare(Wire::new(name, width, arity))
    }

    /// Declares `wire` in the body and registers it by name.
    pub fn declare(&mut self, wire: Wire) -> WireId {
        self.body.declarations.push(wire.declaration());
        self.external(wire)
    }

    /// Registers a wire declared elsewhere, such as a port of the generated module.
    pub fn external(&mut self, wire: Wire) -> WireId {
        let name = wire.name().to_string();
        let id = self.wires.alloc(wire);
        self.by_name.insert(name, id);
        id
    }

    /// Stores an operand that has no name of its own.
    pub fn operand(&mut self, wire: Wire) -> WireId {
        self.wires.alloc(wire)
    }

    /// An all-zero or all-one literal operand.
    pub fn constant(&mut self, width: u32, ones: bool) -> WireId {
        self.operand(Wire::constant(width, ones))
    }

    /// Looks up a registered wire by name.
    pub fn lookup(&self, name: &str) -> Option<WireId> {
        self.by_name.get(name).copied()
    }

    /// The wire behind `id`.
    pub fn wire(&self, id: WireId) -> &Wire {
        &self.wires[id]
    }

    /// Returns `true` once every element of `id` is driven.
    pub fn is_driven(&self, id: WireId) -> bool {
        self.wires[id].is_driven()
    }

    /// The cached view of element `index` of `id`.
    pub fn element(&mut self, id: WireId, index: u32) -> StitchResult<WireId> {
        if let Some(&view) = self.views.get(&(id, index)) {
            return Ok(view);
        }
        let counts_toward_parent = self.wires[id].arity() > 1;
        let element = self.wires[id].element(index)?;
        let view = self.wires.alloc(element);
        self.views.insert((id, index), view);
        // bit selects of a vector do not count toward its occupancy
        if counts_toward_parent {
            self.parents.insert(view, id);
        }
        Ok(view)
    }

    /// The scalar views of `id`: the wire itself, or one view per array element.
    pub fn elements(&mut self, id: WireId) -> StitchResult<Vec<WireId>> {
        let arity = self.wires[id].arity();
        if arity == 1 {
            return Ok(vec![id]);
        }
        (0..arity).map(|index| self.element(id, index)).collect()
    }

    /// The AND of two scalar operands, reusing an operand when the other is constant true.
    pub fn and(&mut self, a: WireId, b: WireId) -> StitchResult<WireId> {
        let result = self.wires[a].and(&self.wires[b])?;
        if result.name() == self.wires[a].name() {
            Ok(a)
        } else if result.name() == self.wires[b].name() {
            Ok(b)
        } else {
            Ok(self.operand(result))
        }
    }

    /// Drives `target` from `operand`.
    pub fn assign(&mut self, target: WireId, operand: WireId, section: Section) -> StitchResult<()> {
        let operand = self.wires[operand].clone();
        let stmt = self.wires[target].assign(&operand)?;
        self.occupy_parent(target)?;
        self.push(stmt, section);
        Ok(())
    }

    /// Ties every element of `target` to zeros or ones.
    pub fn tie_off(&mut self, target: WireId, ones: bool, section: Section) -> StitchResult<()> {
        let stmt = self.wires[target].tie_off(ones)?;
        self.occupy_parent(target)?;
        self.push(stmt, section);
        Ok(())
    }

    /// Records that an instance output drives `id`.
    pub fn claim(&mut self, id: WireId) -> StitchResult<()> {
        let wire = &mut self.wires[id];
        if wire.occupancy() != 0 {
            return Err(InternalError::new(format!(
                "`{}` is driven by an instance and by the generated body",
                wire.name()
            )));
        }
        wire.mark_driven();
        Ok(())
    }

    /// Appends an instantiation.
    pub fn instantiate(&mut self, instance: Instance) {
        self.body.instances.push(instance);
    }

    /// The finished body.
    pub fn into_body(self) -> ModuleBody {
        self.body
    }

    fn occupy_parent(&mut self, view: WireId) -> StitchResult<()> {
        match self.parents.get(&view) {
            Some(&parent) => self.wires[parent].occupy(),
            None => Ok(()),
        }
    }

    fn push(&mut self, stmt: Statement, section: Section) {
        match section {
            Section::Assignments => self.body.assignments.push(stmt),
            Section::Constants => self.body.constants.push(stmt),
            Section::TieOffs => self.body.tie_offs.push(stmt),
        }
    }
}
