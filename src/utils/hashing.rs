use bcrypt::{BcryptError, DEFAULT_COST, hash, verify};

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    verify(password, hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hashed = hash_password("Sup3rSecret").unwrap();
        assert!(verify_password("Sup3rSecret", &hashed).unwrap());
        assert!(!verify_password("wrong-password", &hashed).unwrap());
    }
}
