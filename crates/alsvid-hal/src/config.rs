//! QPU configuration schema.
//!
//! Configuration files are TOML with two required sections:
//!
//! ```toml
//! [qpu]
//! name = "pfaff_v1"
//! location = "lab42"
//! topology = "linear"
//! qubit_count = 4
//! qubits = [0, 1, 2, 3]
//! couplings = [[0, 1], [1, 2], [2, 3]]
//! exclusions = []
//!
//! [network]
//! address = "127.0.0.1"   # `ip` accepted as an alias
//! port = 5555
//! username = "operator"
//! client_cert_dir = "/etc/alsvid/certs"
//! server_cert = "/etc/alsvid/certs/server.pem"
//! ```
//!
//! A missing section or field fails with
//! [`HalError::BadQpuConfiguration`].

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HalError, HalResult};

/// The `[qpu]` section: device identity and connectivity.
#[derive(Debug, Clone, Deserialize)]
pub struct QpuSection {
    /// Machine name, selecting the native gate set.
    pub name: String,
    /// Physical location label.
    pub location: String,
    /// Topology type name (e.g. `linear`).
    pub topology: String,
    /// Number of virtual qubits programs address by default.
    pub qubit_count: u32,
    /// Physical qubit indices.
    pub qubits: Vec<u32>,
    /// Physical couplings as index pairs.
    pub couplings: Vec<(u32, u32)>,
    /// Physical indices to exclude from use.
    pub exclusions: Vec<u32>,
}

/// The `[network]` section: how to reach the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSection {
    /// Backend host.
    #[serde(alias = "ip")]
    pub address: String,
    /// Backend port.
    pub port: u16,
    /// Account the client authenticates as.
    pub username: String,
    /// Directory holding the client certificate material.
    pub client_cert_dir: PathBuf,
    /// Path to the server certificate to pin.
    pub server_cert: PathBuf,
}

/// Everything a QPU handle needs to operate.
#[derive(Debug, Clone, Deserialize)]
pub struct QpuConfig {
    /// Device identity and connectivity.
    pub qpu: QpuSection,
    /// Backend endpoint.
    pub network: NetworkSection,
}

impl QpuConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> HalResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> HalResult<Self> {
        let value: toml::Value = text.parse().map_err(|e: toml::de::Error| {
            HalError::BadQpuConfiguration {
                expected: "valid TOML".to_string(),
                present: e.to_string(),
            }
        })?;

        let table = value.as_table().ok_or_else(|| HalError::BadQpuConfiguration {
            expected: "sections [qpu] and [network]".to_string(),
            present: "no top-level table".to_string(),
        })?;
        for section in ["qpu", "network"] {
            if !table.contains_key(section) {
                return Err(HalError::BadQpuConfiguration {
                    expected: "sections [qpu] and [network]".to_string(),
                    present: format!("missing section [{section}]"),
                });
            }
        }

        value
            .try_into()
            .map_err(|e: toml::de::Error| HalError::BadQpuConfiguration {
                expected: "the complete [qpu] and [network] schema".to_string(),
                present: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
        [qpu]
        name = "pfaff_v1"
        location = "testlab"
        topology = "linear"
        qubit_count = 4
        qubits = [0, 1, 2, 3]
        couplings = [[0, 1], [1, 2], [2, 3]]
        exclusions = []

        [network]
        ip = "127.0.0.1"
        port = 5555
        username = "operator"
        client_cert_dir = "/tmp/certs"
        server_cert = "/tmp/certs/server.pem"
    "#;

    #[test]
    fn test_valid_config_parses() {
        let config = QpuConfig::from_toml(VALID).unwrap();
        assert_eq!(config.qpu.name, "pfaff_v1");
        assert_eq!(config.qpu.qubit_count, 4);
        assert_eq!(config.qpu.couplings, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(config.network.address, "127.0.0.1");
        assert_eq!(config.network.port, 5555);
    }

    #[test]
    fn test_address_spelling_accepted() {
        let text = VALID.replace("ip = ", "address = ");
        let config = QpuConfig::from_toml(&text).unwrap();
        assert_eq!(config.network.address, "127.0.0.1");
    }

    #[test]
    fn test_missing_section_rejected() {
        let text = r#"
            [qpu]
            name = "pfaff_v1"
            location = "testlab"
            topology = "linear"
            qubit_count = 2
            qubits = [0, 1]
            couplings = [[0, 1]]
            exclusions = []
        "#;
        let err = QpuConfig::from_toml(text).unwrap_err();
        match err {
            HalError::BadQpuConfiguration { present, .. } => {
                assert!(present.contains("network"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_field_rejected() {
        let text = VALID.replace("location = \"testlab\"\n", "");
        let err = QpuConfig::from_toml(&text).unwrap_err();
        assert!(matches!(err, HalError::BadQpuConfiguration { .. }));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            QpuConfig::from_toml("== not toml =="),
            Err(HalError::BadQpuConfiguration { .. })
        ));
    }
}
