//! Ports of the accelerator top-level module.

use crate::context::GenContext;
use crate::error::SynthError;
use stitch_config::{PortSource, RolePrefixes, TopConfig};
use stitch_ir::{Instance, Port, PortRole, RoleClassifier, WireId};

/// An accelerator port with its generated wire and join keys.
#[derive(Debug, Clone)]
pub struct TopPort {
    /// The scanned port.
    pub port: Port,
    /// The wire connected to it on the accelerator instance.
    pub wire: WireId,
    /// Its interface role.
    pub role: PortRole,
    /// Its interface class (`M00`, `S00`, `dma`).
    pub class: String,
    /// Its channel part (`awvalid`, `rdata`).
    pub part: String,
}

impl TopPort {
    /// Fails unless a counterpart of `arity` elements can be joined element by element.
    pub fn check_arity(&self, counterpart: &str, arity: u32) -> Result<(), SynthError> {
        if self.port.arity == arity {
            return Ok(());
        }
        Err(SynthError::ArityMismatch {
            port: self.port.name.clone(),
            arity: self.port.arity,
            counterpart: counterpart.to_string(),
            counterpart_arity: arity,
        })
    }
}

/// One logical memory interface: the master ports sharing an interface class.
#[derive(Debug, Clone)]
pub struct MasterInterface {
    /// The interface class.
    pub class: String,
    /// Indices into [`TopPorts::ports`], in port order.
    pub members: Vec<usize>,
}

/// The accelerator ports, partitioned by role.
#[derive(Debug, Default)]
pub struct TopPorts {
    /// Every port in scan order.
    pub ports: Vec<TopPort>,
    /// Master interfaces in order of first appearance.
    pub masters: Vec<MasterInterface>,
}

impl TopPorts {
    /// Classifies every port and declares one fresh wire per port.
    pub fn collect(
        ctx: &mut GenContext,
        ports: &[Port],
        prefixes: &RolePrefixes,
    ) -> Result<Self, SynthError> {
        let classifier = RoleClassifier::new(prefixes.pairs());
        let mut top = Self::default();
        for port in ports {
            let (Some(role), Some(class)) = (classifier.classify(port), port.interface_class())
            else {
                return Err(SynthError::UnrecognizedRole {
                    port: port.name.clone(),
                });
            };
            let wire = ctx.fresh("top", port.width, port.arity);
            let idx = top.ports.len();
            if role == PortRole::Master {
                match top.masters.iter_mut().find(|m| m.class == class) {
                    Some(interface) => interface.members.push(idx),
                    None => top.masters.push(MasterInterface {
                        class: class.clone(),
                        members: vec![idx],
                    }),
                }
            }
            top.ports.push(TopPort {
                part: port.channel_part(),
                port: port.clone(),
                wire,
                role,
                class,
            });
        }
        log::debug!(
            "accelerator: {} ports, {} memory interfaces",
            top.ports.len(),
            top.masters.len()
        );
        Ok(top)
    }

    /// The ports of a role that must form a single interface.
    pub fn single_interface(&self, role: PortRole) -> Result<Vec<&TopPort>, SynthError> {
        let members: Vec<&TopPort> = self.ports.iter().filter(|p| p.role == role).collect();
        let mut classes: Vec<String> = Vec::new();
        for member in &members {
            if !classes.contains(&member.class) {
                classes.push(member.class.clone());
            }
        }
        if classes.len() > 1 {
            return Err(SynthError::MultipleInterfaces { role, classes });
        }
        Ok(members)
    }

    /// Instantiates the accelerator, connecting every port to its wire.
    ///
    /// Configured connections (clock, reset) come first.
    pub fn instantiate(&self, ctx: &mut GenContext, config: &TopConfig) -> Result<(), SynthError> {
        let mut instance = Instance::new(config.module_name(), &config.instance);
        for (port, net) in &config.connections {
            instance.connect(port, net);
        }
        for entry in &self.ports {
            instance.connect(&entry.port.name, ctx.wire(entry.wire).name());
            if entry.port.is_output() {
                ctx.claim(entry.wire)?;
            }
        }
        ctx.instantiate(instance);
        Ok(())
    }
}
