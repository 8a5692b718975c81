// ── Core error types ──
//
// Expected failures of mutations, document loading, and topology
// synthesis. Wireless failures are not errors at all; they are
// connection states.

use thiserror::Error;

use crate::model::EntityId;

/// Unified error type for sandbox mutations.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Port not found: {identifier}")]
    PortNotFound { identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Cannot connect port {port} to itself")]
    SelfConnection { port: EntityId },

    #[error("Device {device} is not user-controllable: {reason}")]
    NotControllable { device: EntityId, reason: String },

    #[error("Device {device} ({device_type}) has no {capability} capability")]
    Unsupported {
        device: EntityId,
        device_type: String,
        capability: String,
    },

    #[error("Device id already in use: {id}")]
    DuplicateDevice { id: EntityId },

    // ── Document errors ──────────────────────────────────────────────
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// A broken structural invariant in a device list.
///
/// Inside the pipeline these are programming errors and trip an
/// assertion; `graph::validate` reports them as values so externally
/// supplied documents can be rejected cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("port {port} points at {peer}, which does not point back")]
    AsymmetricConnection { port: EntityId, peer: EntityId },

    #[error("port {port} points at unknown port {peer}")]
    DanglingReference { port: EntityId, peer: EntityId },

    #[error("port {port} is connected to itself")]
    SelfLoop { port: EntityId },

    #[error("duplicate identifier {id}")]
    DuplicateId { id: EntityId },
}

/// A build request that cannot be turned into a device graph.
///
/// Returned before any device is simulated; a failed build never yields a
/// partial graph.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("build request contains no devices")]
    EmptyRequest,

    #[error("device id {id:?} is used more than once")]
    DuplicateId { id: String },

    #[error("device id {id:?} is invalid: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("only one router may be declared, found {count}")]
    MultipleRouters { count: usize },

    #[error("{device}: role {role} cannot be a {device_type}")]
    RoleMismatch {
        device: String,
        role: String,
        device_type: String,
    },

    #[error("{device}: connectTo {target:?} does not name a declared device")]
    UnknownConnectTo { device: String, target: String },

    #[error("{device}: cannot connect to {target:?}: {reason}")]
    InvalidConnectTo {
        device: String,
        target: String,
        reason: String,
    },

    #[error("switch {device} is part of an uplink loop")]
    SwitchLoop { device: String },

    #[error("{device}: {target} has no downstream port named {port:?}")]
    UnknownPort {
        device: String,
        target: String,
        port: String,
    },

    #[error("{device}: port {port:?} on {target} is already occupied")]
    PortOccupied {
        device: String,
        target: String,
        port: String,
    },

    #[error("{device}: no free port left on {target}")]
    NoFreePort { device: String, target: String },

    #[error(transparent)]
    Graph(#[from] CoreError),
}
