//! Password hashing

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, BcryptError> {
    verify(password, password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hashed).unwrap());
        assert!(!verify_password("wrong horse", &hashed).unwrap());
    }
}
