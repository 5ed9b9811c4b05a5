use journal_core::auth::{AuthError, Credentials, Identity, Result};

/// The one account allowed to write to the journal.
///
/// Only a bcrypt hash of the password is kept.
#[derive(Debug, Clone)]
pub struct AdminDirectory {
    email: String,
    password_hash: String,
}

impl AdminDirectory {
    /// Hashes `password` with bcrypt's default cost.
    pub fn new(email: impl Into<String>, password: &str) -> Result<Self> {
        Self::with_cost(email, password, bcrypt::DEFAULT_COST)
    }

    pub fn with_cost(email: impl Into<String>, password: &str, cost: u32) -> Result<Self> {
        let password_hash =
            bcrypt::hash(password, cost).map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(Self {
            email: email.into(),
            password_hash,
        })
    }

    /// Checks credentials. Emails compare case-insensitively.
    pub fn verify(&self, credentials: &Credentials) -> Result<Identity> {
        if !credentials.email.eq_ignore_ascii_case(&self.email) {
            return Err(AuthError::InvalidCredentials);
        }
        if !bcrypt::verify(&credentials.password, &self.password_hash).unwrap_or(false) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Identity {
            email: self.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> AdminDirectory {
        AdminDirectory::with_cost("admin@example.com", "secret", 4).unwrap()
    }

    #[test]
    fn test_verify_accepts_matching_credentials() {
        let identity = directory()
            .verify(&Credentials::new("Admin@Example.com", "secret"))
            .unwrap();
        assert_eq!(identity.email, "admin@example.com");
    }

    #[test]
    fn test_verify_rejects_wrong_password_or_email() {
        let directory = directory();
        assert_eq!(
            directory.verify(&Credentials::new("admin@example.com", "nope")),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            directory.verify(&Credentials::new("other@example.com", "secret")),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_password_is_not_stored_in_plain_text() {
        assert_ne!(directory().password_hash, "secret");
    }
}
