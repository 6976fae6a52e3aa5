//! Classification of shell and controller ports.

use stitch_common::has_token_run;
use stitch_config::ShellConfig;
use stitch_ir::{Port, PortDirection};

/// What a shell port is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPortKind {
    /// DDR statistics port, passed through to the controller by name.
    Stat,
    /// Part of the shell's DMA interface.
    Dma,
    /// Part of the shell's control/status interface.
    Slave,
    /// Part of the shell's own DDR interface, usable as a memory slot.
    Ddr,
    /// Anything else: physical pins, identity outputs, unused interfaces.
    Other,
}

/// Classifies a shell port. Checks run in declaration order of [`ShellPortKind`].
pub fn classify_shell(port: &Port, shell: &ShellConfig) -> ShellPortKind {
    if port.is_stat() {
        ShellPortKind::Stat
    } else if has_token_run(&port.name, &shell.dma) {
        ShellPortKind::Dma
    } else if has_token_run(&port.name, &shell.slave) {
        ShellPortKind::Slave
    } else if has_token_run(&port.name, &shell.ddr) && port.crosses_boundary() {
        ShellPortKind::Ddr
    } else {
        ShellPortKind::Other
    }
}

/// Returns `true` if `name` is the training-complete signal `signal` or ends in `_{signal}`.
pub fn is_training_signal(name: &str, signal: &str) -> bool {
    name == signal
        || name
            .strip_suffix(signal)
            .is_some_and(|head| head.ends_with('_'))
}

/// What a controller port is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPortKind {
    /// Fabric-side AXI port, fused into per-channel views.
    Fabric,
    /// Statistics port, passed through to the same-named shell port.
    Stat,
    /// Physical DDR pin, passed through to the same-named shell port.
    Physical,
}

/// Classifies a memory-controller port.
pub fn classify_controller(port: &Port) -> ControllerPortKind {
    if port.is_stat() {
        ControllerPortKind::Stat
    } else if port.crosses_boundary() {
        ControllerPortKind::Fabric
    } else {
        ControllerPortKind::Physical
    }
}

/// Which way data moves relative to the accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Driven by the accelerator towards memory or the shell.
    Outbound,
    /// Driven towards the accelerator.
    Inbound,
}

impl Flow {
    /// Flow of an accelerator port.
    pub fn of_top(direction: PortDirection) -> Option<Flow> {
        match direction {
            PortDirection::Output => Some(Flow::Outbound),
            PortDirection::Input => Some(Flow::Inbound),
            PortDirection::InOut => None,
        }
    }

    /// Flow of a port the accelerator's outputs drive into (controller
    /// inputs) or receive from (controller outputs).
    pub fn of_controller(direction: PortDirection) -> Option<Flow> {
        match direction {
            PortDirection::Input => Some(Flow::Outbound),
            PortDirection::Output => Some(Flow::Inbound),
            PortDirection::InOut => None,
        }
    }

    /// Flow of a port of the generated module itself: its outputs carry
    /// accelerator data out, its inputs carry data in.
    pub fn of_shell(direction: PortDirection) -> Option<Flow> {
        Flow::of_top(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_config::load_config_from_str;

    fn shell() -> ShellConfig {
        load_config_from_str(
            "[project]\nname = \"t\"\n[top]\nsource = \"t.v\"\n[shell]\nsource = \"s.vh\"\n",
        )
        .unwrap()
        .shell
    }

    fn port(name: &str) -> Port {
        Port::new(name, PortDirection::Input, 1, 1)
    }

    #[test]
    fn shell_kinds() {
        let s = shell();
        assert_eq!(classify_shell(&port("sh_ddr_stat_addr0"), &s), ShellPortKind::Stat);
        assert_eq!(classify_shell(&port("sh_cl_dma_pcis_awvalid"), &s), ShellPortKind::Dma);
        assert_eq!(classify_shell(&port("sh_ocl_awvalid"), &s), ShellPortKind::Slave);
        assert_eq!(classify_shell(&port("ocl_sh_rdata"), &s), ShellPortKind::Slave);
        assert_eq!(classify_shell(&port("cl_sh_ddr_awid"), &s), ShellPortKind::Ddr);
        assert_eq!(classify_shell(&port("sh_cl_ddr_is_ready"), &s), ShellPortKind::Ddr);
        assert_eq!(classify_shell(&port("cl_sh_id0"), &s), ShellPortKind::Other);
        assert_eq!(classify_shell(&port("M_A_DQ"), &s), ShellPortKind::Other);
    }

    #[test]
    fn controller_kinds() {
        assert_eq!(classify_controller(&port("cl_sh_ddr_awid")), ControllerPortKind::Fabric);
        assert_eq!(classify_controller(&port("sh_ddr_stat_wr0")), ControllerPortKind::Stat);
        assert_eq!(classify_controller(&port("M_A_DQS_DP")), ControllerPortKind::Physical);
    }

    #[test]
    fn training_signal_suffix() {
        assert!(is_training_signal("sh_cl_ddr_is_ready", "is_ready"));
        assert!(is_training_signal("is_ready", "is_ready"));
        assert!(!is_training_signal("sh_cl_ddr_this_ready", "is_ready"));
        assert!(!is_training_signal("sh_cl_ddr_awready", "is_ready"));
    }

    #[test]
    fn flows() {
        assert_eq!(Flow::of_top(PortDirection::Output), Some(Flow::Outbound));
        assert_eq!(Flow::of_controller(PortDirection::Input), Some(Flow::Outbound));
        assert_eq!(Flow::of_shell(PortDirection::Input), Some(Flow::Inbound));
        assert_eq!(Flow::of_top(PortDirection::InOut), None);
    }
}
