//! Ports of the platform shell, which are the ports of the generated module.

use crate::classify::{classify_shell, ShellPortKind};
use crate::context::GenContext;
use std::collections::HashMap;
use stitch_config::ShellConfig;
use stitch_ir::{Port, Wire, WireId};

/// A shell port with its wire and classification.
#[derive(Debug, Clone)]
pub struct ShellPort {
    /// The scanned port.
    pub port: Port,
    /// Its wire in the generation context.
    pub wire: WireId,
    /// What it is wired to.
    pub kind: ShellPortKind,
}

/// The classified shell ports, in scan order.
#[derive(Debug, Default)]
pub struct ShellPorts {
    ports: Vec<ShellPort>,
    index: HashMap<String, usize>,
}

impl ShellPorts {
    /// Registers a wire per shell port. Registered outputs become clocked
    /// when `shell.registered_outputs` is set.
    pub fn collect(ctx: &mut GenContext, ports: &[Port], shell: &ShellConfig, clock: &str) -> Self {
        let mut collected = Self::default();
        for port in ports {
            let clocked = shell.registered_outputs && port.registered && port.is_output();
            let wire = ctx.external(Wire::from_port(port, clocked.then_some(clock)));
            let kind = classify_shell(port, shell);
            log::trace!("shell port `{}`: {kind:?}", port.name);
            collected.index.insert(port.name.clone(), collected.ports.len());
            collected.ports.push(ShellPort {
                port: port.clone(),
                wire,
                kind,
            });
        }
        collected
    }

    /// All shell ports in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &ShellPort> {
        self.ports.iter()
    }

    /// The shell port named `name`.
    pub fn get(&self, name: &str) -> Option<&ShellPort> {
        self.index.get(name).map(|&idx| &self.ports[idx])
    }

    /// Shell ports of one kind, in scan order.
    pub fn of_kind(&self, kind: ShellPortKind) -> impl Iterator<Item = &ShellPort> {
        self.ports.iter().filter(move |p| p.kind == kind)
    }

    /// The first port of `kind` whose channel part is `part`.
    pub fn find_part(&self, kind: ShellPortKind, part: &str) -> Option<&ShellPort> {
        self.of_kind(kind).find(|p| p.port.channel_part() == part)
    }
}
