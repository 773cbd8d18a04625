//! `ic-agent` backed [`CanisterClient`].
//!
//! Management canister calls are raw update calls to `aaaaa-aa` routed with
//! the target canister as effective canister id. Module hash and controllers
//! come from the certified `read_state` tree.

use crate::{
    Error,
    config::{ClientConfig, Network},
    infra::{
        CanisterClient, ClientError, InstallMode,
        account::{AccountIdentifier, principal_subaccount},
    },
    log,
    log::Topic,
    spec::{
        cmc::{
            CMC_CANISTER_ID, GET_ICP_XDR_CONVERSION_RATE, IcpXdrConversionRateResponse,
            MEMO_CREATE_CANISTER, NOTIFY_CREATE_CANISTER, NotifyCreateCanisterArg,
            NotifyCreateCanisterResult,
        },
        ledger::{
            LEDGER_CANISTER_ID, TRANSFER, TRANSFER_FEE_E8S, Tokens, TransferArgs, TransferResult,
        },
        mgmt::{
            self, CanisterIdRecord, CanisterSettings, InstallCodeArgs,
            ProvisionalCreateCanisterWithCyclesArgs, UpdateSettingsArgs,
        },
        prelude::ByteBuf,
    },
};
use async_trait::async_trait;
use candid::{CandidType, Principal, decode_one, encode_args, encode_one};
use ic_agent::{Agent, AgentError};
use serde::de::DeserializeOwned;

/// `read_state` leaves under `/canister/<id>/`.
const MODULE_HASH_PATH: &str = "module_hash";
const CONTROLLERS_PATH: &str = "controllers";

/// Cycles bought for a metered creation (0.1T creation fee, the rest funds the canister).
pub const CREATION_CYCLES: u64 = 1_000_000_000_000;

///
/// AgentClient
///

pub struct AgentClient {
    agent: Agent,
    sender: Principal,
    network: Network,
    provisional_effective_canister_id: Principal,
}

impl AgentClient {
    /// Build the agent and, off mainnet, fetch the replica root key.
    pub async fn connect(config: &ClientConfig) -> Result<Self, Error> {
        let sender = config.sender()?;

        let agent = Agent::builder()
            .with_url(config.endpoint.clone())
            .with_arc_identity(config.identity.clone())
            .build()
            .map_err(|err| connect_error(config, err))?;

        if config.fetch_root_key {
            agent
                .fetch_root_key()
                .await
                .map_err(|err| connect_error(config, err))?;
        }

        log!(
            Topic::Mgmt,
            Info,
            "connected to {} as {sender}",
            config.endpoint
        );

        Ok(Self {
            agent,
            sender,
            network: config.network,
            provisional_effective_canister_id: config.provisional_effective_canister_id,
        })
    }

    async fn mgmt_update<A: CandidType>(
        &self,
        method: &str,
        effective_canister_id: Principal,
        arg: &A,
    ) -> Result<Vec<u8>, ClientError> {
        let reply = self
            .agent
            .update(&Principal::management_canister(), method)
            .with_effective_canister_id(effective_canister_id)
            .with_arg(encode_one(arg)?)
            .call_and_wait()
            .await?;

        Ok(reply)
    }

    async fn update_candid<A, R>(
        &self,
        canister_id: Principal,
        method: &str,
        arg: &A,
    ) -> Result<R, ClientError>
    where
        A: CandidType,
        R: CandidType + DeserializeOwned,
    {
        let reply = self
            .agent
            .update(&canister_id, method)
            .with_arg(encode_one(arg)?)
            .call_and_wait()
            .await?;

        Ok(decode_one(&reply)?)
    }

    async fn create_provisional(&self) -> Result<Principal, ClientError> {
        let reply = self
            .mgmt_update(
                mgmt::PROVISIONAL_CREATE_CANISTER_WITH_CYCLES,
                self.provisional_effective_canister_id,
                &ProvisionalCreateCanisterWithCyclesArgs::default(),
            )
            .await?;
        let record: CanisterIdRecord = decode_one(&reply)?;

        Ok(record.canister_id)
    }

    /// Pay for a canister through the ledger and the cycles minting canister.
    async fn create_metered(&self) -> Result<Principal, ClientError> {
        let rate_reply = self
            .agent
            .query(&CMC_CANISTER_ID, GET_ICP_XDR_CONVERSION_RATE)
            .with_arg(encode_args(())?)
            .call()
            .await?;
        let rate: IcpXdrConversionRateResponse = decode_one(&rate_reply)?;

        let e8s = creation_price_e8s(rate.data.xdr_permyriad_per_icp)?;
        let to = AccountIdentifier::new(CMC_CANISTER_ID, &principal_subaccount(self.sender));

        log!(
            Topic::Payment,
            Info,
            "paying {e8s} e8s to {to} for canister creation"
        );

        let transfer = TransferArgs {
            memo: MEMO_CREATE_CANISTER,
            amount: Tokens { e8s },
            fee: Tokens {
                e8s: TRANSFER_FEE_E8S,
            },
            from_subaccount: None,
            to: ByteBuf::from(to.as_bytes().to_vec()),
        };
        let result: TransferResult = self
            .update_candid(LEDGER_CANISTER_ID, TRANSFER, &transfer)
            .await?;
        let block_index =
            result.map_err(|err| ClientError::LedgerRejected(format!("{err:?}")))?;

        log!(Topic::Payment, Ok, "transfer landed in block {block_index}");

        let notify = NotifyCreateCanisterArg {
            block_index,
            controller: self.sender,
        };
        let created: NotifyCreateCanisterResult = self
            .update_candid(CMC_CANISTER_ID, NOTIFY_CREATE_CANISTER, &notify)
            .await?;

        created.map_err(|err| ClientError::CmcRejected(format!("{err:?}")))
    }
}

#[async_trait]
impl CanisterClient for AgentClient {
    fn sender(&self) -> Principal {
        self.sender
    }

    async fn create_canister(&self) -> Result<Principal, ClientError> {
        match self.network {
            Network::Mainnet => self.create_metered().await,
            Network::Custom => self.create_provisional().await,
        }
    }

    async fn install_code(
        &self,
        canister_id: Principal,
        mode: InstallMode,
        wasm_module: &[u8],
        arg: &[u8],
    ) -> Result<(), ClientError> {
        let args = InstallCodeArgs {
            mode: mode.into(),
            canister_id,
            wasm_module: ByteBuf::from(wasm_module.to_vec()),
            arg: ByteBuf::from(arg.to_vec()),
        };

        self.mgmt_update(mgmt::INSTALL_CODE, canister_id, &args)
            .await?;

        Ok(())
    }

    async fn uninstall_code(&self, canister_id: Principal) -> Result<(), ClientError> {
        self.mgmt_update(
            mgmt::UNINSTALL_CODE,
            canister_id,
            &CanisterIdRecord { canister_id },
        )
        .await?;

        Ok(())
    }

    async fn update_controllers(
        &self,
        canister_id: Principal,
        controllers: &[Principal],
    ) -> Result<(), ClientError> {
        let args = UpdateSettingsArgs {
            canister_id,
            settings: CanisterSettings {
                controllers: Some(controllers.to_vec()),
            },
        };

        self.mgmt_update(mgmt::UPDATE_SETTINGS, canister_id, &args)
            .await?;

        Ok(())
    }

    async fn stop_canister(&self, canister_id: Principal) -> Result<(), ClientError> {
        self.mgmt_update(
            mgmt::STOP_CANISTER,
            canister_id,
            &CanisterIdRecord { canister_id },
        )
        .await?;

        Ok(())
    }

    async fn delete_canister(&self, canister_id: Principal) -> Result<(), ClientError> {
        self.mgmt_update(
            mgmt::DELETE_CANISTER,
            canister_id,
            &CanisterIdRecord { canister_id },
        )
        .await?;

        Ok(())
    }

    async fn module_hash(&self, canister_id: Principal) -> Result<Vec<u8>, ClientError> {
        match self
            .agent
            .read_state_canister_info(canister_id, MODULE_HASH_PATH)
            .await
        {
            Ok(hash) => Ok(hash),
            // an empty canister has no module_hash leaf
            Err(AgentError::LookupPathAbsent(_)) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn controllers(&self, canister_id: Principal) -> Result<Vec<Principal>, ClientError> {
        let blob = self
            .agent
            .read_state_canister_info(canister_id, CONTROLLERS_PATH)
            .await?;

        decode_controllers(&blob)
    }

    async fn call(
        &self,
        canister_id: Principal,
        method: &str,
        arg: &[u8],
    ) -> Result<Vec<u8>, ClientError> {
        Ok(self
            .agent
            .update(&canister_id, method)
            .with_arg(arg.to_vec())
            .call_and_wait()
            .await?)
    }
}

/// ICP (in e8s) needed to buy [`CREATION_CYCLES`] at the given rate.
///
/// `xdr_permyriad_per_icp` is the number of 1e8-cycle units one e8s buys,
/// scaled by 1e4 on both sides, so the ratio is direct.
pub fn creation_price_e8s(xdr_permyriad_per_icp: u64) -> Result<u64, ClientError> {
    if xdr_permyriad_per_icp == 0 {
        return Err(ClientError::ZeroConversionRate);
    }

    Ok(CREATION_CYCLES / xdr_permyriad_per_icp)
}

/// The `controllers` leaf is a CBOR array of principal byte strings.
pub fn decode_controllers(blob: &[u8]) -> Result<Vec<Principal>, ClientError> {
    Ok(serde_cbor::from_slice(blob)?)
}

fn connect_error(config: &ClientConfig, err: AgentError) -> Error {
    Error::Connect {
        endpoint: config.endpoint.clone(),
        source: err.into(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_divides_cycles_by_rate() {
        // 1 ICP = 5 XDR -> 50_000 permyriad
        assert_eq!(creation_price_e8s(50_000).unwrap(), 20_000_000);
    }

    #[test]
    fn controllers_decode_from_cbor() {
        let controllers = vec![
            Principal::from_slice(&[1; 29]),
            Principal::management_canister(),
            Principal::from_slice(&[0, 0, 0, 0, 0, 0, 0, 1, 1, 1]),
        ];
        let blob = serde_cbor::to_vec(&controllers).unwrap();

        assert_eq!(decode_controllers(&blob).unwrap(), controllers);
    }

    #[test]
    fn controllers_decode_with_self_describe_tag() {
        let controllers = vec![Principal::from_slice(&[7; 29])];
        // certified state prefixes CBOR with tag 55799
        let mut blob = vec![0xd9, 0xd9, 0xf7];
        blob.extend(serde_cbor::to_vec(&controllers).unwrap());

        assert_eq!(decode_controllers(&blob).unwrap(), controllers);
    }

    #[test]
    fn garbage_controllers_are_a_cbor_error() {
        assert!(matches!(
            decode_controllers(&[0xff, 0x00]),
            Err(ClientError::Cbor(_))
        ));
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(matches!(
            creation_price_e8s(0),
            Err(ClientError::ZeroConversionRate)
        ));
    }
}
