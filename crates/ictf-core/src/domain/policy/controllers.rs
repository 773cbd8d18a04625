use crate::{domain::ValidationError, dto::Attr};
use candid::Principal;

///
/// LockoutRisk
/// The planned controller set leaves out the identity the provider signs with.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockoutRisk {
    pub manager: Principal,
}

impl LockoutRisk {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Target set of controllers does not include principal used by Terraform: {}",
            self.manager
        )
    }
}

/// True if `manager` appears in `controllers` (compared as principals).
#[must_use]
pub fn includes_manager(controllers: &[String], manager: Principal) -> bool {
    controllers
        .iter()
        .any(|c| Principal::from_text(c).is_ok_and(|p| p == manager))
}

///
/// check_lockout
/// Plan-time check; null or unknown controller sets are not judged.
///

#[must_use]
pub fn check_lockout(planned: &Attr<Vec<String>>, manager: Principal) -> Option<LockoutRisk> {
    let controllers = planned.as_known()?;

    if includes_manager(controllers, manager) {
        None
    } else {
        Some(LockoutRisk { manager })
    }
}

///
/// resolve_for_create
/// Unspecified controllers default to the identity performing the create.
/// An explicitly empty list is kept as is (no controllers at all).
///

#[must_use]
pub fn resolve_for_create(planned: &Attr<Vec<String>>, manager: Principal) -> Vec<String> {
    match planned {
        Attr::Known(controllers) => controllers.clone(),
        Attr::Null | Attr::Unknown => vec![manager.to_text()],
    }
}

///
/// resolve_for_update
/// After creation the controller set is always known.
///

pub fn resolve_for_update(planned: &Attr<Vec<String>>) -> Result<Vec<String>, ValidationError> {
    planned
        .as_known()
        .cloned()
        .ok_or(ValidationError::ControllersNotSet)
}

/// Parse textual controllers, keeping order and duplicates.
pub fn parse(controllers: &[String]) -> Result<Vec<Principal>, ValidationError> {
    controllers
        .iter()
        .map(|text| {
            Principal::from_text(text).map_err(|err| ValidationError::InvalidPrincipal {
                attribute: "controllers",
                value: text.clone(),
                reason: err.to_string(),
            })
        })
        .collect()
}

///
/// TESTS
///
