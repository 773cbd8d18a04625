use candid::Principal;
use sha2::{Digest, Sha224};
use std::fmt;

pub type Subaccount = [u8; 32];

const ACCOUNT_DOMAIN_SEPARATOR: &[u8] = b"\x0Aaccount-id";

///
/// AccountIdentifier
/// ICP ledger account: CRC32 (big endian) followed by the SHA-224 of
/// the domain separator, owner and subaccount.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccountIdentifier([u8; 32]);

impl AccountIdentifier {
    #[must_use]
    pub fn new(owner: Principal, subaccount: &Subaccount) -> Self {
        let mut hasher = Sha224::new();
        hasher.update(ACCOUNT_DOMAIN_SEPARATOR);
        hasher.update(owner.as_slice());
        hasher.update(subaccount);
        let hash = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&crc32fast::hash(&hash).to_be_bytes());
        bytes[4..].copy_from_slice(&hash);

        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Subaccount naming `principal`: its length byte then its raw bytes.
#[must_use]
pub fn principal_subaccount(principal: Principal) -> Subaccount {
    let raw = principal.as_slice();
    let mut subaccount = [0u8; 32];
    subaccount[0] = u8::try_from(raw.len()).unwrap_or(u8::MAX);
    subaccount[1..=raw.len()].copy_from_slice(raw);

    subaccount
}

///
/// TESTS
///
