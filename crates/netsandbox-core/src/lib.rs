//! Store-network simulation engine.
//!
//! This crate owns the domain model, the simulation pipeline, and the
//! generators that build a sandbox from high-level requirements:
//!
//! - **[`Sandbox`]** — Central facade. [`dispatch()`](Sandbox::dispatch)
//!   applies a [`Command`] to a copy of the device list, reruns the whole
//!   pipeline, and publishes the result as a new [`Snapshot`].
//!
//! - **[`DeviceStream`]** — Subscription handle vended by the sandbox.
//!   Exposes `current()` / `latest()` / `changed()` for reactive front-ends.
//!
//! - **Simulation pipeline** ([`simulation`]) — Four pure stages: power
//!   propagation, link status, wireless association, and connection-state
//!   derivation. Deterministic and idempotent.
//!
//! - **[`planner`]** — Sizes switches, outlets, and wireless
//!   infrastructure from aggregate endpoint counts.
//!
//! - **[`synth`]** — Turns a role-tagged device list into a fully wired,
//!   simulated device graph, or a typed [`SynthesisError`].
//!
//! - **Domain model** ([`model`]) — `Device`, `Port`, the per-type
//!   capability table, and the persisted [`Document`] shape, with
//!   [`EntityId`] supporting both generated UUIDs and stable string ids.

pub mod command;
pub mod error;
pub mod graph;
pub mod model;
pub mod planner;
pub mod sandbox;
pub mod simulation;
pub mod stream;
pub mod synth;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use error::{CoreError, InvariantViolation, SynthesisError};
pub use planner::{InfrastructurePlan, PlanRequest, plan};
pub use sandbox::Sandbox;
pub use simulation::simulate;
pub use stream::{DeviceStream, Snapshot};
pub use synth::{
    AbstractDevice, AbstractRole, Advisory, BuildRequest, Synthesis, synthesize,
    synthesize_from_plan,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ConnectionState, Device, DeviceStatus, DeviceType, Document, EntityId, LinkStatus, Port,
    PortRole, PowerAction, Room, WirelessConfig,
};
