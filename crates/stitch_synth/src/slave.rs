//! One-to-one wiring of the slave and DMA interfaces to the shell.

use crate::classify::{Flow, ShellPortKind};
use crate::context::{GenContext, Section};
use crate::error::{SynthError, UNDRIVEN_OUTPUT};
use crate::shell::ShellPorts;
use crate::top::TopPort;
use stitch_config::SynthConfig;
use stitch_diagnostics::{Diagnostic, DiagnosticSink};
use stitch_ir::WireId;

/// Matches each accelerator port to the shell port of `kind` with the same
/// channel part.
///
/// Ready handshakes into roles listed in `synth.gated_roles` are ANDed with
/// `ready`, so the accelerator sees no ready until DDR training completes.
pub fn connect_one_to_one(
    ctx: &mut GenContext,
    members: &[&TopPort],
    shell: &ShellPorts,
    kind: ShellPortKind,
    ready: WireId,
    synth: &SynthConfig,
    sink: &DiagnosticSink,
) -> Result<(), SynthError> {
    for entry in members {
        let flow = Flow::of_top(entry.port.direction).ok_or_else(|| {
            SynthError::DirectionMismatch {
                port: entry.port.name.clone(),
                counterpart: "any shell port".to_string(),
            }
        })?;
        let Some(pin) = shell.find_part(kind, &entry.part) else {
            match flow {
                Flow::Inbound => {
                    log::debug!(
                        "`{}` has no shell counterpart; tied to zero",
                        entry.port.name
                    );
                    ctx.tie_off(entry.wire, false, Section::Assignments)?;
                }
                Flow::Outbound => sink.emit(Diagnostic::warning(
                    UNDRIVEN_OUTPUT,
                    format!(
                        "`{}` has no shell counterpart and is left unconnected",
                        entry.port.name
                    ),
                )),
            }
            continue;
        };
        entry.check_arity(&pin.port.name, pin.port.arity)?;
        if Flow::of_shell(pin.port.direction) != Some(flow) {
            return Err(SynthError::DirectionMismatch {
                port: entry.port.name.clone(),
                counterpart: pin.port.name.clone(),
            });
        }
        let gated = flow == Flow::Inbound
            && synth.gated_roles.contains(&entry.role)
            && entry.part.ends_with(synth.gated_suffix.as_str());
        let pins = ctx.elements(pin.wire)?;
        let wires = ctx.elements(entry.wire)?;
        for (pin, wire) in pins.into_iter().zip(wires) {
            match flow {
                Flow::Outbound => ctx.assign(pin, wire, Section::Assignments)?,
                Flow::Inbound => {
                    let source = if gated { ctx.and(pin, ready)? } else { pin };
                    ctx.assign(wire, source, Section::Assignments)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::top::TopPorts;
    use stitch_config::{load_config_from_str, RolePrefixes};
    use stitch_ir::{Port, PortDirection, PortRole, Wire};

    struct Fixture {
        ctx: GenContext,
        top: TopPorts,
        shell: ShellPorts,
    }

    fn fixture(top_ports: &[Port], shell_ports: &[Port]) -> Fixture {
        let mut ctx = GenContext::new("stitch");
        let cfg = load_config_from_str(
            "[project]\nname = \"t\"\n[top]\nsource = \"t.v\"\n[shell]\nsource = \"s.vh\"\n",
        )
        .unwrap();
        let shell = ShellPorts::collect(&mut ctx, shell_ports, &cfg.shell, "clk");
        let top = TopPorts::collect(&mut ctx, top_ports, &RolePrefixes::default()).unwrap();
        Fixture { ctx, top, shell }
    }

    fn slave_ports() -> Vec<Port> {
        vec![
            Port::new("S00_AXI_awvalid", PortDirection::Input, 1, 1),
            Port::new("S00_AXI_awready", PortDirection::Output, 1, 1),
            Port::new("S00_AXI_bready", PortDirection::Input, 1, 1),
            Port::new("S00_AXI_rdata", PortDirection::Output, 32, 1),
        ]
    }

    fn shell_ports() -> Vec<Port> {
        vec![
            Port::new("sh_ocl_awvalid", PortDirection::Input, 1, 1),
            Port::new("ocl_sh_awready", PortDirection::Output, 1, 1),
            Port::new("sh_ocl_bready", PortDirection::Input, 1, 1),
        ]
    }

    #[test]
    fn gates_ready_inputs() {
        let Fixture {
            mut ctx,
            top,
            shell,
        } = fixture(&slave_ports(), &shell_ports());
        let ready = ctx.external(Wire::new("sh_cl_ddr_is_ready", 1, 1));
        let members = top.single_interface(PortRole::Slave).unwrap();
        let sink = DiagnosticSink::new();
        connect_one_to_one(
            &mut ctx,
            &members,
            &shell,
            ShellPortKind::Slave,
            ready,
            &SynthConfig::default(),
            &sink,
        )
        .unwrap();
        assert_eq!(sink.warning_count(), 1);

        let body = ctx.into_body();
        let lines: Vec<String> = body
            .assignments
            .iter()
            .map(|s| format!("{} = {}", s.target(), s.value()))
            .collect();
        assert_eq!(
            lines,
            vec![
                "stitch_top_0 = sh_ocl_awvalid",
                "ocl_sh_awready = stitch_top_1",
                "stitch_top_2 = (sh_ocl_bready & sh_cl_ddr_is_ready)",
            ]
        );
    }

    #[test]
    fn constant_ready_leaves_inputs_ungated() {
        let Fixture {
            mut ctx,
            top,
            shell,
        } = fixture(&slave_ports(), &shell_ports());
        let ready = ctx.constant(1, true);
        let members = top.single_interface(PortRole::Slave).unwrap();
        connect_one_to_one(
            &mut ctx,
            &members,
            &shell,
            ShellPortKind::Slave,
            ready,
            &SynthConfig::default(),
            &DiagnosticSink::new(),
        )
        .unwrap();
        let body = ctx.into_body();
        assert_eq!(body.assignments[2].value().to_string(), "sh_ocl_bready");
    }

    #[test]
    fn unmatched_input_is_tied() {
        let Fixture {
            mut ctx,
            top,
            shell,
        } = fixture(
            &[Port::new("dma_AXI_wvalid", PortDirection::Input, 1, 1)],
            &shell_ports(),
        );
        let ready = ctx.constant(1, true);
        let members = top.single_interface(PortRole::Dma).unwrap();
        let sink = DiagnosticSink::new();
        connect_one_to_one(
            &mut ctx,
            &members,
            &shell,
            ShellPortKind::Dma,
            ready,
            &SynthConfig::default(),
            &sink,
        )
        .unwrap();
        assert_eq!(sink.warning_count(), 0);
        assert!(ctx.is_driven(top.ports[0].wire));
    }

    #[test]
    fn array_ports_join_per_element() {
        let Fixture {
            mut ctx,
            top,
            shell,
        } = fixture(
            &[
                Port::new("S00_AXI_bready", PortDirection::Input, 1, 2),
                Port::new("S00_AXI_rdata", PortDirection::Output, 32, 2),
            ],
            &[
                Port::new("sh_ocl_bready", PortDirection::Input, 1, 2),
                Port::new("ocl_sh_rdata", PortDirection::Output, 32, 2),
            ],
        );
        let ready = ctx.external(Wire::new("sh_cl_ddr_is_ready", 1, 1));
        let members = top.single_interface(PortRole::Slave).unwrap();
        connect_one_to_one(
            &mut ctx,
            &members,
            &shell,
            ShellPortKind::Slave,
            ready,
            &SynthConfig::default(),
            &DiagnosticSink::new(),
        )
        .unwrap();
        assert!(ctx.is_driven(top.ports[0].wire));
        let body = ctx.into_body();
        let lines: Vec<String> = body
            .assignments
            .iter()
            .map(|s| format!("{} = {}", s.target(), s.value()))
            .collect();
        assert_eq!(
            lines,
            vec![
                "stitch_top_0[0] = (sh_ocl_bready[0] & sh_cl_ddr_is_ready)",
                "stitch_top_0[1] = (sh_ocl_bready[1] & sh_cl_ddr_is_ready)",
                "ocl_sh_rdata[0] = stitch_top_1[0]",
                "ocl_sh_rdata[1] = stitch_top_1[1]",
            ]
        );
    }

    #[test]
    fn mismatched_array_shape_rejected() {
        let Fixture {
            mut ctx,
            top,
            shell,
        } = fixture(
            &[Port::new("S00_AXI_awvalid", PortDirection::Input, 1, 1)],
            &[Port::new("sh_ocl_awvalid", PortDirection::Input, 1, 2)],
        );
        let ready = ctx.constant(1, true);
        let members = top.single_interface(PortRole::Slave).unwrap();
        let err = connect_one_to_one(
            &mut ctx,
            &members,
            &shell,
            ShellPortKind::Slave,
            ready,
            &SynthConfig::default(),
            &DiagnosticSink::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SynthError::ArityMismatch {
                port: "S00_AXI_awvalid".into(),
                arity: 1,
                counterpart: "sh_ocl_awvalid".into(),
                counterpart_arity: 2,
            }
        );
    }
}
