use crate::{HELLO_WORLD_WASM_ENV, POCKET_IC_BIN_ENV};
use candid::Principal;
use derive_more::{Deref, DerefMut};
use pocket_ic::{PocketIc, PocketIcBuilder};
use std::path::PathBuf;

///
/// PicBuilder
///

pub struct PicBuilder(PocketIcBuilder);

#[allow(clippy::new_without_default)]
impl PicBuilder {
    /// Start a new PicBuilder with sensible defaults
    #[must_use]
    pub fn new() -> Self {
        Self(PocketIcBuilder::new())
    }

    #[must_use]
    pub fn with_application_subnet(mut self) -> Self {
        self.0 = self.0.with_application_subnet();
        self
    }

    #[must_use]
    pub fn with_nns_subnet(mut self) -> Self {
        self.0 = self.0.with_nns_subnet();
        self
    }

    /// Finish building the PocketIC instance and wrap it
    #[must_use]
    pub fn build(self) -> Pic {
        Pic(self.0.build())
    }
}

///
/// Pic
///
/// PocketIC instance. Call [`Pic::live_endpoint`] before handing the URL to
/// an agent; the blocking PocketIC API must not be used from inside an
/// async runtime.
///

#[derive(Deref, DerefMut)]
pub struct Pic(PocketIc);

impl Pic {
    /// Serve the instance over HTTP and return the gateway URL.
    pub fn live_endpoint(&mut self) -> String {
        self.0.make_live(None).to_string()
    }

    /// Canister id provisional creation should be routed through.
    #[must_use]
    pub fn effective_canister_id(&self) -> Principal {
        let topology = self.0.topology();

        Principal::from_slice(&topology.default_effective_canister_id.canister_id)
    }
}

///
/// PicEnv
/// What an end-to-end run needs from the environment.
///

#[derive(Clone, Debug)]
pub struct PicEnv {
    pub hello_world_wasm: PathBuf,
}

impl PicEnv {
    /// `None` unless both the PocketIC server and the fixture wasm are set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var_os(POCKET_IC_BIN_ENV)?;
        let wasm = std::env::var_os(HELLO_WORLD_WASM_ENV)?;

        Some(Self {
            hello_world_wasm: PathBuf::from(wasm),
        })
    }
}
