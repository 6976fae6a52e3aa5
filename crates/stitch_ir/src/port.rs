//! Port declarations recovered from a scanned port list.
//!
//! A [`Port`] is immutable once scanned. Its join keys (interface class and
//! channel part) are derived from the name on demand rather than stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use stitch_common::{has_token_run, tokens};

/// AXI channel tags that may be split from their field by an underscore
/// (`aw_valid`); they are joined back into a single channel part.
const AXI_CHANNEL_TAGS: [&str; 5] = ["aw", "w", "b", "ar", "r"];

/// The direction of a port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// An input port (data flows into the module).
    Input,
    /// An output port (data flows out of the module).
    Output,
    /// A bidirectional port (data flows both ways).
    InOut,
}

impl PortDirection {
    /// All directions, in keyword-lookup order.
    pub const ALL: [PortDirection; 3] = [
        PortDirection::Input,
        PortDirection::Output,
        PortDirection::InOut,
    ];

    /// Returns the Verilog keyword for this direction.
    pub fn keyword(self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
            PortDirection::InOut => "inout",
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One declared interface pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// Bit width of one array element; always at least 1.
    pub width: u32,
    /// Number of array elements; always at least 1.
    pub arity: u32,
    /// Declared with a `logic`/`reg` qualifier.
    pub registered: bool,
    /// 1-based line of the declaration in its source, 0 when synthetic.
    pub line: usize,
}

impl Port {
    /// Creates a port. Widths and arities below 1 are raised to 1.
    pub fn new(name: impl Into<String>, direction: PortDirection, width: u32, arity: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            width: width.max(1),
            arity: arity.max(1),
            registered: false,
            line: 0,
        }
    }

    /// Marks the port as declared with a register-type qualifier.
    pub fn registered(mut self, registered: bool) -> Self {
        self.registered = registered;
        self
    }

    /// Records the declaration line.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Returns `true` for input ports.
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    /// Returns `true` for output ports.
    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    /// The name with the first Chisel `bits` token removed.
    ///
    /// `M00_AXI_aw_bits_addr` becomes `M00_AXI_aw_addr`.
    pub fn clean_name(&self) -> String {
        let toks: Vec<&str> = self.name.split('_').collect();
        match toks.iter().position(|t| *t == "bits") {
            Some(i) if i + 1 < toks.len() => {
                let mut kept = toks.clone();
                kept.remove(i);
                kept.join("_")
            }
            _ => self.name.clone(),
        }
    }

    /// The grouping prefix: everything before the first underscore of the
    /// cleaned name, or `None` for a name without underscores.
    pub fn interface_class(&self) -> Option<String> {
        let clean = self.clean_name();
        clean.find('_').map(|idx| clean[..idx].to_string())
    }

    /// The trailing role token used as the cross-module join key.
    ///
    /// `sh_cl_ddr_awvalid` and `M00_AXI_aw_bits_valid` both yield `awvalid`.
    pub fn channel_part(&self) -> String {
        let clean = self.clean_name();
        let toks = tokens(&clean);
        match toks.as_slice() {
            [] => clean.clone(),
            [.., tag, field] if AXI_CHANNEL_TAGS.contains(tag) => format!("{tag}{field}"),
            [.., last] => (*last).to_string(),
        }
    }

    /// DDR statistics ports, which pass straight through by name.
    pub fn is_stat(&self) -> bool {
        let toks = tokens(&self.name);
        toks.contains(&"ddr") && toks.contains(&"stat")
    }

    /// Ports on the fabric side of the shell boundary (`sh_cl_*`, `cl_sh_*`).
    pub fn crosses_boundary(&self) -> bool {
        has_token_run(&self.name, "sh_cl") || has_token_run(&self.name, "cl_sh")
    }
}

/// Returns `true` for clock- and reset-class signal names.
///
/// Matching is case-sensitive, so physical pins such as `CLK_300M_DIMM0_DP`
/// survive the scan and can be passed through to the controller.
pub fn is_clock_or_reset(name: &str) -> bool {
    name.contains("clk")
        || name.contains("clock")
        || name.contains("reset")
        || tokens(name).iter().any(|t| t.starts_with("rst"))
}
