use crate::{
    ThisError, config::ConfigError, did::EncodeError, domain::ValidationError,
    infra::{ClientError, identity::IdentityError},
    ops::mgmt::RemoteOp,
};
use derive_more::Display;

///
/// Error
///
/// Crate-level error returned by every lifecycle operation.
///
/// Local failures (config, encoding, identity, validation) are raised before
/// any remote call is made. Remote failures carry the operation and the
/// canister they were issued against.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("could not connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: ClientError,
    },

    #[error("{op} failed for canister {canister}: {source}")]
    Remote {
        op: RemoteOp,
        canister: String,
        #[source]
        source: ClientError,
    },
}

impl Error {
    pub fn remote(op: RemoteOp, canister: impl ToString, source: ClientError) -> Self {
        Self::Remote {
            op,
            canister: canister.to_string(),
            source,
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) => ErrorClass::Config,
            Self::Encode(_) => ErrorClass::Encoding,
            Self::Identity(_) => ErrorClass::Identity,
            Self::Validation(_) => ErrorClass::Validation,
            Self::Connect { .. } | Self::Remote { .. } => ErrorClass::Remote,
        }
    }

    /// True when the failure happened before anything was sent to the IC.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Connect { .. } | Self::Remote { .. })
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    Config,
    Encoding,
    Identity,
    Validation,
    Remote,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_name_operation_and_canister() {
        let err = Error::remote(
            RemoteOp::InstallCode,
            "rrkah-fqaaa-aaaaa-aaaaq-cai",
            ClientError::Rejected("canister is stopped".to_string()),
        );

        assert_eq!(err.class(), ErrorClass::Remote);
        assert!(!err.is_local());

        let msg = err.to_string();
        assert!(msg.contains("install_code"), "{msg}");
        assert!(msg.contains("rrkah-fqaaa-aaaaa-aaaaq-cai"), "{msg}");
        assert!(msg.contains("canister is stopped"), "{msg}");
    }

    #[test]
    fn validation_errors_are_local() {
        let err = Error::from(ValidationError::ArgConflict);

        assert_eq!(err.class(), ErrorClass::Validation);
        assert!(err.is_local());
    }
}
