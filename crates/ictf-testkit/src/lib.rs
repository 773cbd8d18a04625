//! Test utilities and fixtures for exercising the ictf provider core.
//!
//! Provides stable dummy principals, PEM identity fixtures, an in-memory
//! management canister ([`fake::FakeIc`]) and a PocketIC harness for
//! end-to-end runs against a live HTTP gateway.

pub mod fake;
pub mod pem;
pub mod pic;

use candid::Principal;

/// Path to the PocketIC server binary; PocketIC tests are skipped without it.
pub const POCKET_IC_BIN_ENV: &str = "POCKET_IC_BIN";

/// Path to the compiled `hello_world` fixture canister.
pub const HELLO_WORLD_WASM_ENV: &str = "ICTF_HELLO_WORLD_WASM";

///
/// Deterministic dummy-value generator for tests.
///
/// Produces stable principals derived from a numeric seed, which makes
/// tests reproducible without hardcoding raw byte arrays.
///

pub struct Fake;

impl Fake {
    ///
    /// Deterministically derive a [`Principal`] from `seed`.
    ///
    #[must_use]
    pub fn principal(seed: u32) -> Principal {
        let mut buf = [0u8; 29];
        buf[..4].copy_from_slice(&seed.to_be_bytes());

        Principal::from_slice(&buf)
    }

    ///
    /// Deterministically derive a canister id from `seed`.
    ///
    #[must_use]
    pub fn canister_id(seed: u32) -> Principal {
        let mut buf = [0u8; 10];
        buf[4..8].copy_from_slice(&seed.to_be_bytes());
        buf[8] = 0x01;
        buf[9] = 0x01;

        Principal::from_slice(&buf)
    }
}

///
/// TESTS
///
