//! DDR slots and the per-part join of an accelerator port with its counterpart.

use crate::classify::{is_training_signal, Flow, ShellPortKind};
use crate::context::{GenContext, Section};
use crate::shell::ShellPorts;
use std::fmt;
use stitch_common::StitchResult;
use stitch_ir::WireId;

/// Where a memory interface can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// The DDR interface the shell itself exposes.
    Shell,
    /// One channel of the memory controller.
    Channel(u32),
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Shell => write!(f, "the shell DDR interface"),
            SlotKind::Channel(k) => write!(f, "controller channel {k}"),
        }
    }
}

/// One channel part available in a slot.
#[derive(Debug, Clone)]
pub struct SlotPart {
    /// The channel part (`awvalid`).
    pub part: String,
    /// The port the part was taken from, for messages.
    pub port: String,
    /// The wire or channel view carrying it.
    pub wire: WireId,
    /// Which way it flows relative to the accelerator.
    pub flow: Flow,
}

/// A DDR attachment point for one memory interface.
#[derive(Debug, Clone)]
pub struct Slot {
    /// The slot's origin.
    pub kind: SlotKind,
    /// Its training-complete signal, if it has one.
    pub training: Option<WireId>,
    parts: Vec<SlotPart>,
}

impl Slot {
    /// An empty slot.
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            training: None,
            parts: Vec::new(),
        }
    }

    /// Adds a part. The first part with a given name wins lookups.
    pub fn push(&mut self, part: SlotPart) {
        self.parts.push(part);
    }

    /// The counterpart for `part`.
    pub fn find(&self, part: &str) -> Option<&SlotPart> {
        self.parts.iter().find(|p| p.part == part)
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if the slot carries no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The shell's DDR interface as a slot, if the shell has one.
    pub fn of_shell(shell: &ShellPorts, training_signal: &str) -> Option<Slot> {
        let mut slot = Slot::new(SlotKind::Shell);
        for entry in shell.of_kind(ShellPortKind::Ddr) {
            if is_training_signal(&entry.port.name, training_signal) {
                slot.training = Some(entry.wire);
                continue;
            }
            let Some(flow) = Flow::of_shell(entry.port.direction) else {
                log::debug!("skipping inout shell DDR port `{}`", entry.port.name);
                continue;
            };
            slot.push(SlotPart {
                part: entry.port.channel_part(),
                port: entry.port.name.clone(),
                wire: entry.wire,
                flow,
            });
        }
        if slot.is_empty() {
            None
        } else {
            Some(slot)
        }
    }
}

/// One accelerator port joined with its counterpart in a slot.
#[derive(Debug, Clone)]
pub struct InterconnectGroup {
    /// The accelerator's interface class.
    pub class: String,
    /// The channel part shared by both sides.
    pub part: String,
    /// Which side drives.
    pub flow: Flow,
    /// Width of the driven side; the driver is extended or truncated to it.
    pub width: u32,
    /// The accelerator-side wire.
    pub top: WireId,
    /// The counterpart on a controller channel.
    pub controller: Option<WireId>,
    /// The counterpart on the shell.
    pub shell: Option<WireId>,
}

impl InterconnectGroup {
    /// Joins `top` with `counterpart`, taken from a slot of kind `slot`.
    pub fn new(
        ctx: &GenContext,
        class: &str,
        part: &str,
        flow: Flow,
        top: WireId,
        counterpart: WireId,
        slot: SlotKind,
    ) -> Self {
        let driven = match flow {
            Flow::Outbound => counterpart,
            Flow::Inbound => top,
        };
        let (controller, shell) = match slot {
            SlotKind::Shell => (None, Some(counterpart)),
            SlotKind::Channel(_) => (Some(counterpart), None),
        };
        Self {
            class: class.to_string(),
            part: part.to_string(),
            flow,
            width: ctx.wire(driven).width(),
            top,
            controller,
            shell,
        }
    }

    /// The non-accelerator side.
    pub fn counterpart(&self) -> Option<WireId> {
        self.controller.or(self.shell)
    }

    /// Emits the assignment in the direction of flow, one per element.
    pub fn connect(&self, ctx: &mut GenContext) -> StitchResult<()> {
        let Some(other) = self.counterpart() else {
            return Ok(());
        };
        log::trace!(
            "{} {}: {:?} at width {}",
            self.class,
            self.part,
            self.flow,
            self.width
        );
        let (target, source) = match self.flow {
            Flow::Outbound => (other, self.top),
            Flow::Inbound => (self.top, other),
        };
        let targets = ctx.elements(target)?;
        let sources = ctx.elements(source)?;
        for (target, source) in targets.into_iter().zip(sources) {
            ctx.assign(target, source, Section::Assignments)?;
        }
        Ok(())
    }
}

/// The AND of every slot's training signal, as a wire.
///
/// Returns a constant-true operand when no slot has a training signal.
pub fn readiness<'a>(
    ctx: &mut GenContext,
    slots: impl IntoIterator<Item = &'a Slot>,
) -> StitchResult<WireId> {
    let mut ready = ctx.constant(1, true);
    for slot in slots {
        if let Some(training) = slot.training {
            ready = ctx.and(ready, training)?;
        }
    }
    if ctx.wire(ready).expr().is_addressable() || ctx.wire(ready).expr().is_all_ones() {
        return Ok(ready);
    }
    let combined = ctx.fresh("ready", 1, 1);
    ctx.assign(combined, ready, Section::Assignments)?;
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_ir::Wire;

    fn slot_with_training(ctx: &mut GenContext, name: &str) -> Slot {
        let mut slot = Slot::new(SlotKind::Channel(0));
        slot.training = Some(ctx.external(Wire::new(name, 1, 1)));
        slot
    }

    #[test]
    fn slot_kind_names() {
        assert_eq!(SlotKind::Shell.to_string(), "the shell DDR interface");
        assert_eq!(SlotKind::Channel(2).to_string(), "controller channel 2");
    }

    #[test]
    fn group_directions() {
        let mut ctx = GenContext::new("stitch");
        let top = ctx.fresh("top", 64, 1);
        let ddr = ctx.external(Wire::new("cl_sh_ddr_awaddr", 64, 1));
        let group =
            InterconnectGroup::new(&ctx, "M00", "awaddr", Flow::Outbound, top, ddr, SlotKind::Shell);
        assert_eq!(group.shell, Some(ddr));
        group.connect(&mut ctx).unwrap();

        let rdata = ctx.external(Wire::new("sh_cl_ddr_rdata", 512, 1));
        let top_r = ctx.fresh("top", 256, 1);
        let group = InterconnectGroup::new(
            &ctx,
            "M00",
            "rdata",
            Flow::Inbound,
            top_r,
            rdata,
            SlotKind::Channel(0),
        );
        assert_eq!(group.width, 256);
        group.connect(&mut ctx).unwrap();

        let body = ctx.into_body();
        assert_eq!(body.assignments[0].target(), "cl_sh_ddr_awaddr");
        assert_eq!(body.assignments[1].target(), "stitch_top_1");
        assert_eq!(body.assignments[1].value().to_string(), "sh_cl_ddr_rdata[255:0]");
    }

    #[test]
    fn array_groups_connect_per_element() {
        let mut ctx = GenContext::new("stitch");
        let top = ctx.fresh("top", 4, 2);
        let shell = ctx.external(Wire::new("cl_sh_ddr_wstrb", 8, 2));
        let group =
            InterconnectGroup::new(&ctx, "M00", "wstrb", Flow::Outbound, top, shell, SlotKind::Shell);
        group.connect(&mut ctx).unwrap();
        assert!(ctx.is_driven(shell));
        let body = ctx.into_body();
        let lines: Vec<String> = body
            .assignments
            .iter()
            .map(|s| format!("{} = {}", s.target(), s.value()))
            .collect();
        assert_eq!(
            lines,
            vec![
                "cl_sh_ddr_wstrb[0] = {4'b0, stitch_top_0[0]}",
                "cl_sh_ddr_wstrb[1] = {4'b0, stitch_top_0[1]}",
            ]
        );
    }

    #[test]
    fn readiness_without_training_is_constant() {
        let mut ctx = GenContext::new("stitch");
        let slots = vec![Slot::new(SlotKind::Shell)];
        let ready = readiness(&mut ctx, &slots).unwrap();
        assert!(ctx.wire(ready).expr().is_all_ones());
        assert!(ctx.into_body().assignments.is_empty());
    }

    #[test]
    fn readiness_single_signal_is_used_directly() {
        let mut ctx = GenContext::new("stitch");
        let slots = vec![slot_with_training(&mut ctx, "sh_cl_ddr_is_ready")];
        let ready = readiness(&mut ctx, &slots).unwrap();
        assert_eq!(ctx.wire(ready).name(), "sh_cl_ddr_is_ready");
    }

    #[test]
    fn readiness_combines_signals() {
        let mut ctx = GenContext::new("stitch");
        let slots = vec![
            slot_with_training(&mut ctx, "a_is_ready"),
            slot_with_training(&mut ctx, "b_is_ready"),
        ];
        let ready = readiness(&mut ctx, &slots).unwrap();
        assert_eq!(ctx.wire(ready).name(), "stitch_ready_0");
        let body = ctx.into_body();
        assert_eq!(body.assignments.len(), 1);
        assert_eq!(
            body.assignments[0].value().to_string(),
            "(a_is_ready & b_is_ready)"
        );
    }
}
