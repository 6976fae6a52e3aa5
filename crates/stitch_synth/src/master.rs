//! Binding of accelerator memory interfaces to DDR slots.

use crate::classify::Flow;
use crate::context::{GenContext, Section};
use crate::error::{SynthError, DEGRADED_INTERFACE, OPTIONAL_PART};
use crate::group::{InterconnectGroup, Slot};
use crate::top::{MasterInterface, TopPort, TopPorts};
use stitch_config::SynthConfig;
use stitch_diagnostics::{Diagnostic, DiagnosticSink};

/// Binds interface `i` to `slots[i]`, returning the number of slots used.
///
/// Interfaces beyond the last slot have their inputs tied to zero and are
/// reported as degraded.
pub fn bind_masters(
    ctx: &mut GenContext,
    top: &TopPorts,
    slots: &[Slot],
    synth: &SynthConfig,
    sink: &DiagnosticSink,
) -> Result<usize, SynthError> {
    for (i, interface) in top.masters.iter().enumerate() {
        match slots.get(i) {
            Some(slot) => bind(ctx, top, interface, slot, synth, sink)?,
            None => degrade(ctx, top, interface, slots.len(), sink)?,
        }
    }
    let bound = top.masters.len().min(slots.len());
    log::debug!("bound {bound} of {} memory interfaces", top.masters.len());
    Ok(bound)
}

fn members<'a>(
    top: &'a TopPorts,
    interface: &'a MasterInterface,
) -> impl Iterator<Item = &'a TopPort> {
    interface.members.iter().map(|&idx| &top.ports[idx])
}

fn flow_of(entry: &TopPort) -> Result<Flow, SynthError> {
    Flow::of_top(entry.port.direction).ok_or_else(|| SynthError::DirectionMismatch {
        port: entry.port.name.clone(),
        counterpart: "any memory port".to_string(),
    })
}

fn bind(
    ctx: &mut GenContext,
    top: &TopPorts,
    interface: &MasterInterface,
    slot: &Slot,
    synth: &SynthConfig,
    sink: &DiagnosticSink,
) -> Result<(), SynthError> {
    log::debug!("binding {} to {}", interface.class, slot.kind);
    for entry in members(top, interface) {
        let flow = flow_of(entry)?;
        match slot.find(&entry.part) {
            Some(counterpart) => {
                if counterpart.flow != flow {
                    return Err(SynthError::DirectionMismatch {
                        port: entry.port.name.clone(),
                        counterpart: counterpart.port.clone(),
                    });
                }
                entry.check_arity(&counterpart.port, ctx.wire(counterpart.wire).arity())?;
                let group = InterconnectGroup::new(
                    ctx,
                    &entry.class,
                    &entry.part,
                    flow,
                    entry.wire,
                    counterpart.wire,
                    slot.kind,
                );
                group.connect(ctx)?;
            }
            None if synth.optional_parts.contains(&entry.part) => {
                sink.emit(Diagnostic::warning(
                    OPTIONAL_PART,
                    format!(
                        "`{}` ({}) has no counterpart on {}",
                        entry.port.name, entry.part, slot.kind
                    ),
                ));
                if flow == Flow::Inbound {
                    ctx.tie_off(entry.wire, false, Section::Assignments)?;
                }
            }
            None => {
                return Err(SynthError::MissingCounterpart {
                    port: entry.port.name.clone(),
                    part: entry.part.clone(),
                    slot: slot.kind.to_string(),
                })
            }
        }
    }
    Ok(())
}

fn degrade(
    ctx: &mut GenContext,
    top: &TopPorts,
    interface: &MasterInterface,
    available: usize,
    sink: &DiagnosticSink,
) -> Result<(), SynthError> {
    log::warn!("memory interface {} has no DDR slot", interface.class);
    sink.emit(
        Diagnostic::warning(
            DEGRADED_INTERFACE,
            format!("memory interface {} has no DDR slot", interface.class),
        )
        .with_note(format!("{available} slots are available"))
        .with_help("its inputs are tied to zero and its outputs are left unconnected"),
    );
    for entry in members(top, interface) {
        if flow_of(entry)? == Flow::Inbound {
            ctx.tie_off(entry.wire, false, Section::Assignments)?;
        }
    }
    Ok(())
}
