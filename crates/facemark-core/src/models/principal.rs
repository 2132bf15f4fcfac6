use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Authenticated identity making a request.
///
/// Produced by an [`Authenticator`](crate::Authenticator) from a bearer credential and
/// treated as opaque everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Principal(Uuid);

impl Principal {
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Authorization check: the principal may only act on resources it owns.
    pub fn ensure_owns(&self, claimed_owner: Principal) -> Result<(), AppError> {
        if *self == claimed_owner {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Authenticated principal does not match the claimed owner".to_string(),
            ))
        }
    }
}

impl From<Uuid> for Principal {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_check_rejects_other_principal() {
        let a = Principal::new(Uuid::new_v4());
        let b = Principal::new(Uuid::new_v4());
        assert!(a.ensure_owns(a).is_ok());
        assert!(matches!(a.ensure_owns(b), Err(AppError::Forbidden(_))));
    }
}
