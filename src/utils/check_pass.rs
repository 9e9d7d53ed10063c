use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand_core::OsRng;

pub fn check_pass(real: &str, input: &str) -> bool {
    match PasswordHash::new(real) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(input.as_bytes(), &parsed_hash)
            .map_or(false, |_| true),
        Err(_) => false,
    }
}

pub fn hash_pass(input: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(input.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("Error while hashing password: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_pass("hunter2").unwrap();
        assert!(check_pass(&hash, "hunter2"));
        assert!(!check_pass(&hash, "hunter3"));
    }

    #[test]
    fn junk_hash_never_verifies() {
        assert!(!check_pass("not-a-phc-string", "hunter2"));
    }
}
