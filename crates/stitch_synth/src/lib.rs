//! Interconnect synthesis for stitch.
//!
//! Joins the ports of the accelerator top, the memory controller and the
//! platform shell into one [`ModuleBody`]: memory interfaces are bound to DDR
//! slots, the slave and DMA interfaces are wired one-to-one to the shell,
//! and every shell output left over is tied off.

#![warn(missing_docs)]

pub mod classify;
pub mod context;
pub mod ddr;
pub mod error;
pub mod group;
pub mod master;
pub mod shell;
pub mod slave;
pub mod tieoff;
pub mod top;

pub use classify::{Flow, ShellPortKind};
pub use context::{GenContext, Section};
pub use error::{SynthError, DEGRADED_INTERFACE, OPTIONAL_PART, UNDRIVEN_OUTPUT};
pub use group::{InterconnectGroup, Slot, SlotKind};

use ddr::Controller;
use shell::ShellPorts;
use stitch_config::{ProjectConfig, DEFAULT_TRAINING_SIGNAL};
use stitch_diagnostics::DiagnosticSink;
use stitch_emit::ModuleBody;
use stitch_ir::{Port, PortRole};
use top::TopPorts;

/// The scanned port lists of the three sources.
#[derive(Debug, Clone, Default)]
pub struct PortSets {
    /// Ports of the accelerator top.
    pub top: Vec<Port>,
    /// Ports of the memory controller; empty when none is configured.
    pub controller: Vec<Port>,
    /// Ports of the platform shell.
    pub shell: Vec<Port>,
}

/// Wires the three port sets together.
///
/// Non-fatal findings (degraded interfaces, unconnected outputs) are
/// reported to `sink`. The result is fully determined by the inputs.
pub fn synthesize(
    ports: &PortSets,
    config: &ProjectConfig,
    sink: &DiagnosticSink,
) -> Result<ModuleBody, SynthError> {
    let synth = &config.synth;
    let mut ctx = GenContext::new(&synth.wire_prefix);

    let shell = ShellPorts::collect(&mut ctx, &ports.shell, &config.shell, &synth.clock);
    let top = TopPorts::collect(&mut ctx, &ports.top, &config.top.prefixes)?;
    let controller = match &config.controller {
        Some(cfg) => Some(Controller::fuse(&mut ctx, &ports.controller, cfg)?),
        None => None,
    };

    let training_signal = config
        .controller
        .as_ref()
        .map_or(DEFAULT_TRAINING_SIGNAL, |c| c.training_signal.as_str());
    let mut slots: Vec<Slot> = Slot::of_shell(&shell, training_signal).into_iter().collect();
    if let Some(controller) = &controller {
        for channel in 0..controller.channels() {
            slots.push(controller.slot(&mut ctx, channel)?);
        }
    }
    log::debug!("{} DDR slots available", slots.len());

    master::bind_masters(&mut ctx, &top, &slots, synth, sink)?;
    let ready = group::readiness(&mut ctx, &slots)?;

    for (role, kind) in [
        (PortRole::Slave, ShellPortKind::Slave),
        (PortRole::Dma, ShellPortKind::Dma),
    ] {
        let members = top.single_interface(role)?;
        slave::connect_one_to_one(&mut ctx, &members, &shell, kind, ready, synth, sink)?;
    }

    if let Some(controller) = &controller {
        controller.tie_unbound_inputs(&mut ctx)?;
    }

    top.instantiate(&mut ctx, &config.top)?;
    if let (Some(controller), Some(cfg)) = (&controller, &config.controller) {
        controller.instantiate(&mut ctx, cfg, &shell)?;
    }

    tieoff::drive_identity(&mut ctx, &shell, &config.shell.identity)?;
    tieoff::tie_off_shell(&mut ctx, &shell, &config.shell.tie_high)?;

    Ok(ctx.into_body())
}
