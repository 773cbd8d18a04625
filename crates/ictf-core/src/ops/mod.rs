//! Operations that sit between the reconciler and the raw client.
//!
//! `mgmt` attaches the operation name and canister id to every remote call
//! and logs it; `wasm` loads and verifies module files. The reconciler only
//! talks to the IC through these wrappers.

pub mod mgmt;
pub mod wasm;

pub use mgmt::{MgmtOps, RemoteOp};
pub use wasm::{WasmModule, WasmOps};
