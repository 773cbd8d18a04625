//! PEM identity loading.

use crate::{ThisError, log, log::Topic};
use ic_agent::{
    Identity,
    identity::{BasicIdentity, Prime256v1Identity, Secp256k1Identity},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

///
/// IdentityError
///

#[derive(Debug, ThisError)]
pub enum IdentityError {
    #[error("could not read identity file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "could not parse identity: ed25519: {ed25519}; secp256k1: {secp256k1}; prime256v1: {prime256v1}"
    )]
    Unparseable {
        ed25519: String,
        secp256k1: String,
        prime256v1: String,
    },

    #[error("identity has no usable sender: {0}")]
    Sender(String),
}

///
/// load_identity
/// Parse PEM bytes as Ed25519, then secp256k1, then prime256v1.
///

pub fn load_identity(pem: &[u8]) -> Result<Arc<dyn Identity>, IdentityError> {
    let ed25519 = match BasicIdentity::from_pem(pem) {
        Ok(identity) => return Ok(loaded("ed25519", identity)),
        Err(err) => err.to_string(),
    };

    let secp256k1 = match Secp256k1Identity::from_pem(pem) {
        Ok(identity) => return Ok(loaded("secp256k1", identity)),
        Err(err) => err.to_string(),
    };

    let prime256v1 = match Prime256v1Identity::from_pem(pem) {
        Ok(identity) => return Ok(loaded("prime256v1", identity)),
        Err(err) => err.to_string(),
    };

    Err(IdentityError::Unparseable {
        ed25519,
        secp256k1,
        prime256v1,
    })
}

/// Read a PEM file and load it with [`load_identity`].
pub fn load_identity_file(path: &Path) -> Result<Arc<dyn Identity>, IdentityError> {
    let pem = std::fs::read(path).map_err(|source| IdentityError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    load_identity(&pem)
}

fn loaded(kind: &str, identity: impl Identity + 'static) -> Arc<dyn Identity> {
    log!(Topic::Identity, Debug, "loaded {kind} identity");

    Arc::new(identity)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use ictf_testkit::pem;

    fn sender_of(identity: &dyn Identity) -> candid::Principal {
        identity.sender().unwrap()
    }

    #[test]
    fn ed25519_is_tried_first() {
        let identity = load_identity(pem::ED25519.as_bytes()).unwrap();
        let expected = BasicIdentity::from_pem(pem::ED25519.as_bytes()).unwrap();

        assert_eq!(sender_of(identity.as_ref()), sender_of(&expected));
    }

    #[test]
    fn secp256k1_is_the_first_fallback() {
        let identity = load_identity(pem::SECP256K1.as_bytes()).unwrap();
        let expected = Secp256k1Identity::from_pem(pem::SECP256K1.as_bytes()).unwrap();

        assert_eq!(sender_of(identity.as_ref()), sender_of(&expected));
    }

    #[test]
    fn prime256v1_is_the_last_fallback() {
        let identity = load_identity(pem::PRIME256V1.as_bytes()).unwrap();
        let expected = Prime256v1Identity::from_pem(pem::PRIME256V1.as_bytes()).unwrap();

        assert_eq!(sender_of(identity.as_ref()), sender_of(&expected));
    }

    #[test]
    fn ec_keys_only_load_through_the_fallbacks() {
        for ec in [pem::SECP256K1, pem::PRIME256V1] {
            assert!(BasicIdentity::from_pem(ec.as_bytes()).is_err());
            assert!(load_identity(ec.as_bytes()).is_ok());
        }
    }

    #[test]
    fn garbage_reports_every_attempt() {
        let err = load_identity(b"not a pem").err().expect("expected an error");

        let IdentityError::Unparseable {
            ed25519,
            secp256k1,
            prime256v1,
        } = &err
        else {
            panic!("expected unparseable, got {err:?}");
        };
        assert!(!ed25519.is_empty());
        assert!(!secp256k1.is_empty());
        assert!(!prime256v1.is_empty());

        let msg = err.to_string();
        assert!(msg.contains("ed25519") && msg.contains("prime256v1"), "{msg}");
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pem");

        let err = load_identity_file(&path).err().expect("expected an error");
        assert!(err.to_string().contains("absent.pem"));
    }

    #[test]
    fn file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.pem");
        std::fs::write(&path, pem::ED25519).unwrap();

        assert!(load_identity_file(&path).is_ok());
    }
}
