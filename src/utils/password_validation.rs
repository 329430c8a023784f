use crate::utils::error::CustomError;

pub fn validate_password(password: &str) -> Result<(), CustomError> {
    if password.len() < 8 || password.len() > 20 {
        return Err(CustomError::BadRequestError(
            "Password must be between 8 and 20 characters long.".into(),
        ));
    }

    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_lowercase || !has_uppercase || !has_digit {
        return Err(CustomError::BadRequestError(
            "Password must include at least one uppercase letter, one lowercase letter, and one number.".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_case_with_digit() {
        assert!(validate_password("Abcdef12").is_ok());
    }

    #[test]
    fn rejects_too_short() {
        assert!(validate_password("Ab1").is_err());
    }

    #[test]
    fn rejects_missing_uppercase() {
        assert!(validate_password("abcdef12").is_err());
    }

    #[test]
    fn rejects_missing_digit() {
        assert!(validate_password("Abcdefgh").is_err());
    }
}
