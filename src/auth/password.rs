use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hash a password with a fresh random salt. Stored format: `salt$hexdigest`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password);
    format!("{}${}", salt, digest)
}

/// Check a candidate password against a stored `salt$hexdigest` value.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => salted_digest(salt, password) == digest,
        None => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_correct_password() {
        let stored = hash_password("test123");
        assert!(verify_password("test123", &stored));
    }

    #[test]
    fn rejects_wrong_password() {
        let stored = hash_password("test123");
        assert!(!verify_password("test124", &stored));
    }

    #[test]
    fn rejects_malformed_stored_value() {
        assert!(!verify_password("anything", "no-separator-here"));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }
}
