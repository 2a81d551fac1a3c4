//! Backend trait and the HTTPS transport.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use tracing::{debug, info};

use alsvid_ir::{Control, Gate, Instruction, Kind, Test};

use crate::config::QpuConfig;
use crate::error::{HalError, HalResult};

/// States the QPU can be in.
///
/// Positive states can still run programs; error states are worse the
/// more negative their wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QpuStatus {
    /// Booted and ready for first tuning.
    Initialized,
    /// Calibration in progress.
    Tuning,
    /// Executing someone's program.
    Busy,
    /// Ready for work.
    Idle,
    /// Calibration failed.
    BadTuning,
    /// Control stack not responding.
    Unresponsive,
    /// No answer at the transport level.
    NoAnswer,
}

impl QpuStatus {
    /// Whether the device can accept work in this state.
    pub fn is_workable(&self) -> bool {
        matches!(
            self,
            QpuStatus::Initialized | QpuStatus::Tuning | QpuStatus::Busy | QpuStatus::Idle
        )
    }
}

/// The backend a QPU handle talks to.
///
/// Backend calls are the only blocking points in the core: the core
/// never retries, times out, or cancels them, and any error propagates
/// as-is to the scope owner.
pub trait Backend {
    /// Execute a transpiled gate list and return the outcome counts,
    /// keyed by fixed-width binary strings.
    fn exec_circuit(&self, gates: &[Gate], shots: u32) -> HalResult<FxHashMap<String, i64>>;

    /// Execute a single instruction (a test primitive, a gate issued
    /// as a test, or a QPU state control) and return the backend's
    /// record for it.
    fn exec_single(&self, instruction: &Instruction, shots: u32) -> HalResult<Value>;

    /// Check whether the device can accept work.
    fn ping(&self) -> HalResult<bool>;
}

#[derive(Debug, Serialize)]
struct CircuitRequest<'a> {
    gates: &'a [Gate],
    shots: u32,
}

#[derive(Debug, Deserialize)]
struct PingReply {
    status: QpuStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
    #[serde(default)]
    requested: u32,
    #[serde(default)]
    available: u32,
}

/// HTTPS transport to the QPU control stack.
///
/// One backend instance serves a single QPU handle; the connection is
/// mutually authenticated with the certificate material named in the
/// `[network]` section.
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base: String,
}

impl HttpBackend {
    /// Build the client and verify the device answers.
    pub fn connect(config: &QpuConfig) -> HalResult<Self> {
        let network = &config.network;

        let server_cert = fs::read(&network.server_cert)?;
        let identity_path = network
            .client_cert_dir
            .join(format!("{}.pem", network.username));
        let identity = fs::read(&identity_path)?;

        let client = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .add_root_certificate(reqwest::Certificate::from_pem(&server_cert)?)
            .identity(reqwest::Identity::from_pem(&identity)?)
            .build()?;

        let backend = Self {
            base: format!("https://{}:{}", network.address, network.port),
            client,
        };

        if !backend.ping()? {
            return Err(HalError::ConnectionFailed(format!(
                "device at {} is not in a workable state",
                backend.base
            )));
        }
        info!(endpoint = %backend.base, "connected to QPU backend");
        Ok(backend)
    }

    fn check(response: reqwest::blocking::Response) -> HalResult<reqwest::blocking::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        if let Ok(reply) = response.json::<ErrorReply>() {
            if reply.error == "insufficient_good_qubits" {
                return Err(HalError::InsufficientGoodQubits {
                    requested: reply.requested,
                    available: reply.available,
                });
            }
            return Err(HalError::Backend(reply.error));
        }
        Err(HalError::Backend(format!("backend returned {status}")))
    }
}

impl Backend for HttpBackend {
    fn exec_circuit(&self, gates: &[Gate], shots: u32) -> HalResult<FxHashMap<String, i64>> {
        debug!(gates = gates.len(), shots, "submitting circuit");
        let response = self
            .client
            .post(format!("{}/circuit", self.base))
            .json(&CircuitRequest { gates, shots })
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn exec_single(&self, instruction: &Instruction, shots: u32) -> HalResult<Value> {
        // State controls cross as Control records, everything else as
        // Test records; plain gates issued under a test context return
        // a measurement automatically.
        let body = match instruction.kind {
            Kind::QpuState => serde_json::to_value(Control::new(
                instruction.symbol,
                instruction.params.clone(),
            ))
            .expect("control record serialization cannot fail"),
            _ => serde_json::to_value(Test::new(
                instruction.symbol,
                instruction.params.clone(),
                shots,
            ))
            .expect("test record serialization cannot fail"),
        };
        debug!(symbol = %instruction.symbol, shots, "submitting single instruction");
        let response = self
            .client
            .post(format!("{}/instruction", self.base))
            .json(&body)
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn ping(&self) -> HalResult<bool> {
        let response = self.client.get(format!("{}/ping", self.base)).send()?;
        let reply: PingReply = Self::check(response)?.json()?;
        Ok(reply.status.is_workable())
    }
}
