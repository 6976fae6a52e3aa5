//! Interface roles of accelerator top-level ports.

use crate::port::Port;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The interface role of an accelerator port, derived from its name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortRole {
    /// Control/status slave interface, wired one-to-one to the shell.
    Slave,
    /// Memory master interface, bound to DDR channels.
    Master,
    /// DMA interface, wired one-to-one to the shell's DMA group.
    Dma,
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRole::Slave => write!(f, "slave"),
            PortRole::Master => write!(f, "master"),
            PortRole::Dma => write!(f, "dma"),
        }
    }
}

/// Maps a port's interface class to its [`PortRole`].
///
/// Prefixes are tried longest first, so `dma` wins over a hypothetical `d`.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    prefixes: Vec<(PortRole, String)>,
}

impl RoleClassifier {
    /// Creates a classifier from `(role, prefix)` pairs.
    pub fn new<'a>(pairs: impl IntoIterator<Item = (PortRole, &'a str)>) -> Self {
        let mut prefixes: Vec<(PortRole, String)> = pairs
            .into_iter()
            .map(|(role, prefix)| (role, prefix.to_string()))
            .collect();
        prefixes.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));
        Self { prefixes }
    }

    /// Returns the role whose prefix starts the port's interface class.
    pub fn classify(&self, port: &Port) -> Option<PortRole> {
        let class = port.interface_class()?;
        self.prefixes
            .iter()
            .find(|(_, prefix)| class.starts_with(prefix.as_str()))
            .map(|(role, _)| *role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortDirection;

    fn classifier() -> RoleClassifier {
        RoleClassifier::new([
            (PortRole::Slave, "S"),
            (PortRole::Master, "M"),
            (PortRole::Dma, "dma"),
        ])
    }

    fn port(name: &str) -> Port {
        Port::new(name, PortDirection::Input, 1, 1)
    }

    #[test]
    fn classify_each_role() {
        let c = classifier();
        assert_eq!(c.classify(&port("S00_AXI_awvalid")), Some(PortRole::Slave));
        assert_eq!(c.classify(&port("M01_AXI_rdata")), Some(PortRole::Master));
        assert_eq!(c.classify(&port("dma_awvalid")), Some(PortRole::Dma));
    }

    #[test]
    fn unrecognized_prefix() {
        let c = classifier();
        assert_eq!(c.classify(&port("ocl_awvalid")), None);
        assert_eq!(c.classify(&port("noprefix")), None);
    }

    #[test]
    fn longest_prefix_wins() {
        let c = RoleClassifier::new([(PortRole::Dma, "d"), (PortRole::Slave, "dm")]);
        assert_eq!(c.classify(&port("dma_awvalid")), Some(PortRole::Slave));
    }

    #[test]
    fn role_display_and_serde() {
        assert_eq!(format!("{}", PortRole::Master), "master");
        let role: PortRole = serde_json::from_str("\"dma\"").unwrap();
        assert_eq!(role, PortRole::Dma);
    }
}
