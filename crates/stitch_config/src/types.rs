//! Configuration types deserialized from `stitch.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use stitch_ir::PortRole;

/// The top-level configuration parsed from `stitch.toml`.
///
/// Names the three port-list sources (accelerator top, memory controller,
/// platform shell) and the policies used to wire them together.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Output naming and file layout.
    pub project: ProjectMeta,
    /// The accelerator top-level module.
    pub top: TopConfig,
    /// The DDR memory-controller module. Absent means no controller channels.
    #[serde(default)]
    pub controller: Option<ControllerConfig>,
    /// The platform shell port list.
    pub shell: ShellConfig,
    /// Port scanner settings.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Interconnect synthesis settings.
    #[serde(default)]
    pub synth: SynthConfig,
}

/// Output metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// Project name, used in the generated header comment.
    pub name: String,
    /// Path of the generated source file, relative to the config directory.
    #[serde(default = "default_output")]
    pub output: String,
    /// Files `` `include``d at the top of the generated source.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Whether to prefix the output with a "generated by" comment.
    #[serde(default = "default_true")]
    pub header: bool,
}

/// Where a port list comes from.
///
/// When `module` is set the source is a whole file and the scanner first
/// locates `module <name>`; otherwise the file is a bare port list.
pub trait PortSource {
    /// Path of the source text, relative to the config directory.
    fn source(&self) -> &str;
    /// Module whose header introduces the port list, if any.
    fn module(&self) -> Option<&str>;

    /// The module type to instantiate: `module` if set, else the source file stem.
    fn module_name(&self) -> String {
        match self.module() {
            Some(module) => module.to_string(),
            None => Path::new(self.source())
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.source().to_string()),
        }
    }
}

/// The accelerator top-level module.
#[derive(Debug, Deserialize)]
pub struct TopConfig {
    /// Path to the source holding the module.
    pub source: String,
    /// Module name; also used as the instantiated module type.
    pub module: Option<String>,
    /// Instance name in the generated body.
    #[serde(default = "default_top_instance")]
    pub instance: String,
    /// Extra named connections (typically clock and reset).
    #[serde(default)]
    pub connections: BTreeMap<String, String>,
    /// Name prefixes identifying the interface role of each top port.
    #[serde(default)]
    pub prefixes: RolePrefixes,
}

impl PortSource for TopConfig {
    fn source(&self) -> &str {
        &self.source
    }

    fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }
}

/// Interface-class prefixes for the three accelerator port roles.
#[derive(Debug, Clone, Deserialize)]
pub struct RolePrefixes {
    /// Control/status slave interfaces (e.g. `S00_AXI_...`).
    #[serde(default = "default_slave_prefix")]
    pub slave: String,
    /// Memory master interfaces (e.g. `M00_AXI_...`).
    #[serde(default = "default_master_prefix")]
    pub master: String,
    /// The DMA interface (e.g. `dma_...`).
    #[serde(default = "default_dma_prefix")]
    pub dma: String,
}

impl Default for RolePrefixes {
    fn default() -> Self {
        Self {
            slave: default_slave_prefix(),
            master: default_master_prefix(),
            dma: default_dma_prefix(),
        }
    }
}

impl RolePrefixes {
    /// Returns `(role, prefix)` pairs in declaration order.
    pub fn pairs(&self) -> [(PortRole, &str); 3] {
        [
            (PortRole::Slave, self.slave.as_str()),
            (PortRole::Master, self.master.as_str()),
            (PortRole::Dma, self.dma.as_str()),
        ]
    }
}

/// Training-complete signal suffix used when no controller overrides it.
pub const DEFAULT_TRAINING_SIGNAL: &str = "is_ready";

/// The DDR memory-controller module.
#[derive(Debug, Deserialize)]
pub struct ControllerConfig {
    /// Path to the source holding the module.
    pub source: String,
    /// Module name; also used as the instantiated module type.
    pub module: Option<String>,
    /// Instance name in the generated body.
    #[serde(default = "default_controller_instance")]
    pub instance: String,
    /// Number of controller channels. Inferred from the training signal when absent.
    pub channels: Option<u32>,
    /// Name suffix of the per-channel training-complete output.
    #[serde(default = "default_training_signal")]
    pub training_signal: String,
    /// Parameter overrides for the instantiation.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Extra named connections (clocks, resets).
    #[serde(default)]
    pub connections: BTreeMap<String, String>,
}

impl PortSource for ControllerConfig {
    fn source(&self) -> &str {
        &self.source
    }

    fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }
}

/// The platform shell port list.
#[derive(Debug, Deserialize)]
pub struct ShellConfig {
    /// Path to the shell port list.
    pub source: String,
    /// Module name, when the source is a full module rather than a bare list.
    pub module: Option<String>,
    /// Token run marking the shell's control/status interface.
    #[serde(default = "default_shell_slave")]
    pub slave: String,
    /// Token run marking the shell's DMA interface.
    #[serde(default = "default_shell_dma")]
    pub dma: String,
    /// Token run marking the shell's own DDR interface.
    #[serde(default = "default_shell_ddr")]
    pub ddr: String,
    /// Drive `output logic` shell ports from clocked processes.
    #[serde(default)]
    pub registered_outputs: bool,
    /// Name tokens whose undriven outputs are tied to all ones.
    #[serde(default = "default_tie_high")]
    pub tie_high: Vec<String>,
    /// Identity outputs driven from macros, port name to macro name.
    #[serde(default)]
    pub identity: BTreeMap<String, String>,
}

impl PortSource for ShellConfig {
    fn source(&self) -> &str {
        &self.source
    }

    fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }
}

/// Port scanner settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Tokens that abort a scan when they appear in a port list.
    #[serde(default = "default_forbidden")]
    pub forbidden: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            forbidden: default_forbidden(),
        }
    }
}

/// Interconnect synthesis settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthConfig {
    /// Prefix of every generated wire name.
    #[serde(default = "default_wire_prefix")]
    pub wire_prefix: String,
    /// Clock net used by registered assignments.
    #[serde(default = "default_clock")]
    pub clock: String,
    /// Channel parts allowed to lack a counterpart.
    #[serde(default = "default_optional_parts")]
    pub optional_parts: Vec<String>,
    /// Accelerator roles whose ready inputs wait for DDR training.
    #[serde(default = "default_gated_roles")]
    pub gated_roles: Vec<PortRole>,
    /// Channel-part suffix identifying ready handshakes.
    #[serde(default = "default_gated_suffix")]
    pub gated_suffix: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            wire_prefix: default_wire_prefix(),
            clock: default_clock(),
            optional_parts: default_optional_parts(),
            gated_roles: default_gated_roles(),
            gated_suffix: default_gated_suffix(),
        }
    }
}

fn default_output() -> String {
    "generated/stitched.sv".to_string()
}

fn default_true() -> bool {
    true
}

fn default_top_instance() -> String {
    "top".to_string()
}

fn default_controller_instance() -> String {
    "ddr".to_string()
}

fn default_slave_prefix() -> String {
    "S".to_string()
}

fn default_master_prefix() -> String {
    "M".to_string()
}

fn default_dma_prefix() -> String {
    "dma".to_string()
}

fn default_training_signal() -> String {
    DEFAULT_TRAINING_SIGNAL.to_string()
}

fn default_shell_slave() -> String {
    "ocl".to_string()
}

fn default_shell_dma() -> String {
    "dma_pcis".to_string()
}

fn default_shell_ddr() -> String {
    "ddr".to_string()
}

fn default_tie_high() -> Vec<String> {
    vec!["ack".to_string()]
}

fn default_forbidden() -> Vec<String> {
    vec!["NUM_GTY".to_string()]
}

fn default_wire_prefix() -> String {
    "stitch".to_string()
}

fn default_clock() -> String {
    "clk".to_string()
}

fn default_optional_parts() -> Vec<String> {
    [
        "awlock", "awcache", "awprot", "awqos", "awregion", "awuser", "arlock", "arcache",
        "arprot", "arqos", "arregion", "aruser", "wuser", "buser", "ruser", "wid",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_gated_roles() -> Vec<PortRole> {
    vec![PortRole::Slave]
}

fn default_gated_suffix() -> String {
    "ready".to_string()
}
