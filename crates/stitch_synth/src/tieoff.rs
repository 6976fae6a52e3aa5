//! Identity constants and the final tie-off of undriven shell outputs.

use crate::context::{GenContext, Section};
use crate::error::SynthError;
use crate::shell::ShellPorts;
use std::collections::BTreeMap;
use stitch_common::tokens;
use stitch_ir::Wire;

/// Drives each identity output from its macro.
pub fn drive_identity(
    ctx: &mut GenContext,
    shell: &ShellPorts,
    identity: &BTreeMap<String, String>,
) -> Result<(), SynthError> {
    for (port, macro_name) in identity {
        let pin = shell.get(port).ok_or_else(|| SynthError::MissingShellPin {
            port: port.clone(),
        })?;
        if !pin.port.is_output() {
            return Err(SynthError::DirectionMismatch {
                port: port.clone(),
                counterpart: format!("`{macro_name}"),
            });
        }
        let value = ctx.operand(Wire::from_macro(macro_name, pin.port.width));
        ctx.assign(pin.wire, value, Section::Constants)?;
    }
    Ok(())
}

/// Returns `true` if a token of `name` starts with one of `patterns`.
pub fn ties_high(name: &str, patterns: &[String]) -> bool {
    tokens(name)
        .iter()
        .any(|token| patterns.iter().any(|p| token.starts_with(p.as_str())))
}

/// Ties every still-undriven shell output, in port order.
///
/// Acknowledge-style outputs matched by `tie_high` get all ones; everything
/// else gets zero.
pub fn tie_off_shell(
    ctx: &mut GenContext,
    shell: &ShellPorts,
    tie_high: &[String],
) -> Result<usize, SynthError> {
    let mut tied = 0;
    for pin in shell.iter() {
        if !pin.port.is_output() || ctx.is_driven(pin.wire) {
            continue;
        }
        let ones = ties_high(&pin.port.name, tie_high);
        ctx.tie_off(pin.wire, ones, Section::TieOffs)?;
        tied += 1;
    }
    log::debug!("tied off {tied} unused shell outputs");
    Ok(tied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_config::load_config_from_str;
    use stitch_ir::{Port, PortDirection};

    fn shell(ctx: &mut GenContext, ports: &[Port]) -> ShellPorts {
        let cfg = load_config_from_str(
            "[project]\nname = \"t\"\n[top]\nsource = \"t.v\"\n[shell]\nsource = \"s.vh\"\n",
        )
        .unwrap();
        ShellPorts::collect(ctx, ports, &cfg.shell, "clk")
    }

    #[test]
    fn ack_tokens_tie_high() {
        let high = vec!["ack".to_string()];
        assert!(ties_high("ddr_sh_stat_ack0", &high));
        assert!(!ties_high("cl_sh_status_vled", &high));
        assert!(!ties_high("cl_sh_back", &high));
    }

    #[test]
    fn identity_from_macros() {
        let mut ctx = GenContext::new("stitch");
        let shell = shell(
            &mut ctx,
            &[Port::new("cl_sh_id0", PortDirection::Output, 32, 1)],
        );
        let mut identity = BTreeMap::new();
        identity.insert("cl_sh_id0".to_string(), "CL_SH_ID0".to_string());
        drive_identity(&mut ctx, &shell, &identity).unwrap();
        assert_eq!(tie_off_shell(&mut ctx, &shell, &[]).unwrap(), 0);
        let body = ctx.into_body();
        assert_eq!(body.constants[0].value().to_string(), "`CL_SH_ID0");
    }

    #[test]
    fn identity_needs_an_output() {
        let mut ctx = GenContext::new("stitch");
        let shell = shell(&mut ctx, &[Port::new("sh_cl_id", PortDirection::Input, 32, 1)]);
        let mut identity = BTreeMap::new();
        identity.insert("sh_cl_id".to_string(), "ID".to_string());
        assert!(drive_identity(&mut ctx, &shell, &identity).is_err());
        identity.clear();
        identity.insert("missing".to_string(), "ID".to_string());
        assert_eq!(
            drive_identity(&mut ctx, &shell, &identity).unwrap_err(),
            SynthError::MissingShellPin {
                port: "missing".into()
            }
        );
    }

    #[test]
    fn ties_remaining_outputs_in_order() {
        let mut ctx = GenContext::new("stitch");
        let shell = shell(
            &mut ctx,
            &[
                Port::new("cl_sh_status0", PortDirection::Output, 32, 1),
                Port::new("sh_cl_status_vdip", PortDirection::Input, 16, 1),
                Port::new("ddr_sh_stat_ack0", PortDirection::Output, 1, 1),
                Port::new("cl_sh_ddr_wid", PortDirection::Output, 16, 2),
            ],
        );
        let tied = tie_off_shell(&mut ctx, &shell, &["ack".to_string()]).unwrap();
        assert_eq!(tied, 3);
        let body = ctx.into_body();
        let lines: Vec<String> = body
            .tie_offs
            .iter()
            .map(|s| format!("{} = {}", s.target(), s.value()))
            .collect();
        assert_eq!(
            lines,
            vec![
                "cl_sh_status0 = 32'b0",
                "ddr_sh_stat_ack0 = 1'b1",
                "cl_sh_ddr_wid = '{16'b0, 16'b0}",
            ]
        );
    }
}
