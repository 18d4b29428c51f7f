//! Domain model for accounts and credentials.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered, non-admin account
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub password_updated_at: Option<DateTime<Utc>>,
}

/// The identity a successful credential check resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    /// The single configured superuser, never stored as an account
    ConfiguredAdmin { username: String },
    RegisteredUser(UserAccount),
}

impl Credential {
    pub fn username(&self) -> &str {
        match self {
            Credential::ConfiguredAdmin { username } => username,
            Credential::RegisteredUser(account) => &account.username,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Credential::ConfiguredAdmin { .. })
    }

    pub fn role(&self) -> Role {
        if self.is_admin() {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// What a session is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AccountError {
    #[error("Username and password are required")]
    MissingFields,
    #[error("Username must be at least 3 characters")]
    UsernameTooShort,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Username is required")]
    UsernameRequired,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("User not found")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Admin access required")]
    AdminRequired,
}

/// Check the registration rules for a new username/password pair
pub fn validate_new_account(username: &str, password: &str) -> Result<(), AccountError> {
    if username.is_empty() || password.is_empty() {
        return Err(AccountError::MissingFields);
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AccountError::UsernameTooShort);
    }
    validate_password(password)
}

pub fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::PasswordTooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_account_rules() {
        assert_eq!(validate_new_account("", "secret1"), Err(AccountError::MissingFields));
        assert_eq!(validate_new_account("bob", ""), Err(AccountError::MissingFields));
        assert_eq!(validate_new_account("bo", "secret1"), Err(AccountError::UsernameTooShort));
        assert_eq!(validate_new_account("bob", "12345"), Err(AccountError::PasswordTooShort));
        assert_eq!(validate_new_account("bob", "123456"), Ok(()));
    }

    #[test]
    fn test_credential_accessors() {
        let admin = Credential::ConfiguredAdmin {
            username: "admin".to_string(),
        };
        assert!(admin.is_admin());
        assert_eq!(admin.username(), "admin");
        assert_eq!(admin.role(), Role::Admin);

        let user = Credential::RegisteredUser(UserAccount {
            username: "clerk".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            password_updated_at: None,
        });
        assert!(!user.is_admin());
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.username(), "clerk");
    }
}
