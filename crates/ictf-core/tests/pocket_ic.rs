//! End-to-end lifecycle against a live PocketIC gateway.
//!
//! Skipped unless `POCKET_IC_BIN` and `ICTF_HELLO_WORLD_WASM` are set.

use candid::{Decode, Encode, Principal};
use ictf_core::{
    api::{CanisterResource, Provider},
    config::{ProviderConfig, ProviderEnv},
    domain::wasm::sha256_hex,
    dto::{Attr, CanisterModel, CanisterState, DynamicValue},
    infra::CanisterClient,
};
use ictf_testkit::{
    pem,
    pic::{PicBuilder, PicEnv},
};
use std::path::Path;
use tokio::runtime::Runtime;

struct Live<'a> {
    rt: &'a Runtime,
    provider: Provider,
    resource: CanisterResource,
}

impl Live<'_> {
    fn hello(&self, state: &CanisterState) -> String {
        let id = Principal::from_text(&state.id).unwrap();
        let arg = Encode!(&Some("terraform".to_string())).unwrap();

        let reply = self
            .rt
            .block_on(self.provider.client().call(id, "hello", &arg))
            .unwrap();

        Decode!(&reply, String).unwrap()
    }

    fn apply(&self, prior: Option<&CanisterState>, plan: &CanisterModel) -> CanisterState {
        let report = match prior {
            None => self.rt.block_on(self.resource.create(plan)),
            Some(prior) => {
                let mut plan = plan.clone();
                plan.id = Attr::Known(prior.id.clone());
                if plan.controllers.is_unset() {
                    plan.controllers = Attr::Known(prior.controllers.clone());
                }
                self.rt.block_on(self.resource.update(prior, &plan))
            }
        };
        assert!(report.is_success(), "{:?}", report.error);

        report.state.unwrap()
    }
}

fn plan(wasm: &Path, greeter: Option<&str>) -> CanisterModel {
    CanisterModel {
        arg: greeter.map(DynamicValue::from).into(),
        wasm_file: Attr::Known(wasm.display().to_string()),
        ..Default::default()
    }
}

#[test]
fn hello_world_lifecycle() {
    let Some(env) = PicEnv::from_env() else {
        eprintln!("skipping hello_world_lifecycle: PocketIC not configured");
        return;
    };

    // the blocking PocketIC API stays outside the runtime
    let mut pic = PicBuilder::new()
        .with_nns_subnet()
        .with_application_subnet()
        .build();
    let endpoint = pic.live_endpoint();
    let effective = pic.effective_canister_id();

    let dir = tempfile::tempdir().unwrap();
    let identity = dir.path().join("identity.pem");
    std::fs::write(&identity, pem::ED25519).unwrap();

    let config = ProviderConfig {
        endpoint: Some(endpoint),
        identity_pem: Some(identity),
        effective_canister_id: Some(effective.to_text()),
    };

    let rt = Runtime::new().unwrap();
    let provider = rt
        .block_on(Provider::configure(&config, &ProviderEnv::default()))
        .unwrap();
    let live = Live {
        rt: &rt,
        resource: provider.canister_resource(),
        provider,
    };
    let manager = live.provider.principal().to_text();
    let wasm = env.hello_world_wasm.as_path();
    let module_sha = sha256_hex(&std::fs::read(wasm).unwrap());

    // empty canister
    let empty = live.apply(None, &CanisterModel::default());
    assert_eq!(empty.controllers, vec![manager.clone()]);
    assert_eq!(empty.wasm_sha256, "");

    // install with an init argument, then upgrade with a new one
    let state = live.apply(None, &plan(wasm, Some("Salut")));
    assert_eq!(live.hello(&state), "Salut, terraform!");
    assert_eq!(state.wasm_sha256, module_sha);

    let state = live.apply(Some(&state), &plan(wasm, Some("Hello")));
    assert_eq!(live.hello(&state), "Hello, terraform!");

    // import reports what the canister actually runs
    let imported = rt.block_on(live.resource.import_state(&state.id));
    let imported = imported.state.unwrap();
    assert_eq!(imported.wasm_sha256, module_sha);
    assert_eq!(imported.controllers, vec![manager]);

    // remove the module
    let state = live.apply(Some(&state), &CanisterModel::default());
    assert_eq!(state.wasm_sha256, "");
    let hash = rt
        .block_on(
            live.provider
                .client()
                .module_hash(Principal::from_text(&state.id).unwrap()),
        )
        .unwrap();
    assert!(hash.is_empty());

    for prior in [&state, &empty] {
        let report = rt.block_on(live.resource.delete(prior));
        assert!(report.is_success(), "{:?}", report.error);
    }
}
