use crate::utils::error::CustomError;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Deletes are destructive and hard (no soft-delete), so every delete route
/// demands `confirm=true`. A request without it is rejected before any
/// database call is issued.
#[derive(Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmQuery {
    pub fn ensure_confirmed(&self) -> Result<(), CustomError> {
        if self.confirm {
            Ok(())
        } else {
            Err(CustomError::ValidationError(
                "Deletion requires explicit confirmation (confirm=true)".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_delete_passes() {
        assert!(ConfirmQuery { confirm: true }.ensure_confirmed().is_ok());
    }

    #[test]
    fn unconfirmed_delete_is_rejected() {
        let err = ConfirmQuery { confirm: false }
            .ensure_confirmed()
            .unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));
    }
}
