//! The memory controller: channel fusion and instantiation.

use crate::classify::{classify_controller, is_training_signal, ControllerPortKind, Flow};
use crate::context::{GenContext, Section};
use crate::error::SynthError;
use crate::group::{Slot, SlotKind, SlotPart};
use crate::shell::ShellPorts;
use stitch_config::{ControllerConfig, PortSource};
use stitch_ir::{Instance, Port, Wire, WireId};

/// How a fused fabric port is split into channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// One array element per channel.
    Element,
    /// One bit per channel.
    Bit,
    /// A single channel uses the whole port.
    Whole,
}

impl Fanout {
    /// The fanout of a `width` x `arity` port across `channels`.
    pub fn of(width: u32, arity: u32, channels: u32) -> Option<Fanout> {
        match (arity, width) {
            (a, _) if a > 1 && a == channels => Some(Fanout::Element),
            (1, w) if w > 1 && w == channels => Some(Fanout::Bit),
            (1, _) if channels == 1 => Some(Fanout::Whole),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Fused {
    wire: WireId,
    fanout: Fanout,
    flow: Flow,
}

#[derive(Debug, Clone)]
struct ControllerPort {
    port: Port,
    kind: ControllerPortKind,
    fused: Option<Fused>,
}

/// The controller's ports with their fused channel wires.
#[derive(Debug)]
pub struct Controller {
    channels: u32,
    training: usize,
    ports: Vec<ControllerPort>,
}

impl Controller {
    /// Declares one wire per fabric port, shaped like the port, and checks
    /// that every fabric port splits evenly across the channels.
    pub fn fuse(
        ctx: &mut GenContext,
        ports: &[Port],
        config: &ControllerConfig,
    ) -> Result<Self, SynthError> {
        let training = ports
            .iter()
            .position(|p| {
                classify_controller(p) == ControllerPortKind::Fabric
                    && is_training_signal(&p.name, &config.training_signal)
            })
            .ok_or_else(|| SynthError::MissingTrainingSignal {
                signal: config.training_signal.clone(),
            })?;
        let channels = config.channels.unwrap_or_else(|| {
            let signal = &ports[training];
            if signal.arity > 1 {
                signal.arity
            } else {
                signal.width
            }
        });

        let mut fused_ports = Vec::with_capacity(ports.len());
        for port in ports {
            let kind = classify_controller(port);
            let fused = if kind == ControllerPortKind::Fabric {
                Some(Self::fuse_port(ctx, port, channels)?)
            } else {
                None
            };
            fused_ports.push(ControllerPort {
                port: port.clone(),
                kind,
                fused,
            });
        }
        log::debug!(
            "controller: {channels} channels, {} fabric ports",
            fused_ports.iter().filter(|p| p.fused.is_some()).count()
        );
        Ok(Self {
            channels,
            training,
            ports: fused_ports,
        })
    }

    fn fuse_port(ctx: &mut GenContext, port: &Port, channels: u32) -> Result<Fused, SynthError> {
        let fanout =
            Fanout::of(port.width, port.arity, channels).ok_or_else(|| SynthError::ChannelShape {
                port: port.name.clone(),
                width: port.width,
                arity: port.arity,
                channels,
            })?;
        let flow = Flow::of_controller(port.direction).ok_or_else(|| {
            SynthError::DirectionMismatch {
                port: port.name.clone(),
                counterpart: "the accelerator".to_string(),
            }
        })?;
        let name = ctx.prefixed(&port.name);
        let wire = ctx.declare(Wire::new(name, port.width, port.arity));
        if port.is_output() {
            ctx.claim(wire)?;
        }
        Ok(Fused { wire, fanout, flow })
    }

    /// The number of controller channels.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    fn view(ctx: &mut GenContext, fused: &Fused, channel: u32) -> Result<WireId, SynthError> {
        match fused.fanout {
            Fanout::Whole => Ok(fused.wire),
            Fanout::Element | Fanout::Bit => Ok(ctx.element(fused.wire, channel)?),
        }
    }

    /// Channel `channel` as a slot.
    pub fn slot(&self, ctx: &mut GenContext, channel: u32) -> Result<Slot, SynthError> {
        let mut slot = Slot::new(SlotKind::Channel(channel));
        for (idx, entry) in self.ports.iter().enumerate() {
            let Some(fused) = &entry.fused else {
                continue;
            };
            let wire = Self::view(ctx, fused, channel)?;
            if idx == self.training {
                slot.training = Some(wire);
                continue;
            }
            slot.push(SlotPart {
                part: entry.port.channel_part(),
                port: entry.port.name.clone(),
                wire,
                flow: fused.flow,
            });
        }
        Ok(slot)
    }

    /// Ties every undriven channel of every fabric input to zero.
    pub fn tie_unbound_inputs(&self, ctx: &mut GenContext) -> Result<usize, SynthError> {
        let mut tied = 0;
        for entry in &self.ports {
            let Some(fused) = &entry.fused else {
                continue;
            };
            if !entry.port.is_input() {
                continue;
            }
            for channel in 0..self.channels {
                let view = Self::view(ctx, fused, channel)?;
                if !ctx.is_driven(view) {
                    ctx.tie_off(view, false, Section::Assignments)?;
                    tied += 1;
                }
            }
        }
        log::debug!("tied off {tied} unbound controller channel inputs");
        Ok(tied)
    }

    /// Instantiates the controller.
    ///
    /// Fabric ports connect to their fused wires. Statistics and physical
    /// ports pass through to the same-named shell port.
    pub fn instantiate(
        &self,
        ctx: &mut GenContext,
        config: &ControllerConfig,
        shell: &ShellPorts,
    ) -> Result<(), SynthError> {
        let mut instance = Instance::new(config.module_name(), &config.instance);
        for (name, value) in &config.parameters {
            instance = instance.with_parameter(name, value);
        }
        for (port, net) in &config.connections {
            instance.connect(port, net);
        }
        for entry in &self.ports {
            match &entry.fused {
                Some(fused) => {
                    instance.connect(&entry.port.name, ctx.wire(fused.wire).name());
                }
                None => {
                    let pin = shell.get(&entry.port.name).ok_or_else(|| {
                        SynthError::MissingShellPin {
                            port: entry.port.name.clone(),
                        }
                    })?;
                    if pin.port.direction != entry.port.direction {
                        return Err(SynthError::DirectionMismatch {
                            port: entry.port.name.clone(),
                            counterpart: pin.port.name.clone(),
                        });
                    }
                    log::trace!(
                        "controller {:?} port `{}` passes through",
                        entry.kind,
                        entry.port.name
                    );
                    instance.connect(&entry.port.name, &pin.port.name);
                    if pin.port.is_output() {
                        ctx.claim(pin.wire)?;
                    }
                }
            }
        }
        ctx.instantiate(instance);
        Ok(())
    }
}
