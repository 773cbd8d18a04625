use crate::infra::client::InstallMode;

/// Pre-upgrade hooks are skipped when the provider upgrades a canister.
pub const SKIP_PRE_UPGRADE: bool = true;

///
/// plan_install
/// Pick the install mode from the module hash currently on the canister.
///

#[must_use]
pub const fn plan_install(current_module_hash: &[u8]) -> InstallMode {
    if current_module_hash.is_empty() {
        InstallMode::Install
    } else {
        InstallMode::Upgrade {
            skip_pre_upgrade: SKIP_PRE_UPGRADE,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_installs() {
        assert_eq!(plan_install(&[]), InstallMode::Install);
    }

    #[test]
    fn present_hash_upgrades() {
        assert_eq!(
            plan_install(&[0xab; 32]),
            InstallMode::Upgrade {
                skip_pre_upgrade: true
            }
        );
    }
}
