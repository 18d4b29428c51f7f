use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::calendar::CalendarService;
use crate::domain::commands::accounts::{RegisterCommand, ResetPasswordCommand};
use crate::domain::models::user::{validate_new_account, validate_password, AccountError, UserAccount};
use crate::domain::password::PasswordHasher;
use crate::storage::UserStorage;

/// Registration and administration of non-admin accounts
#[derive(Clone)]
pub struct UserService {
    user_storage: Arc<dyn UserStorage>,
    hasher: PasswordHasher,
    /// Reserved: the configured admin never exists as a stored account
    admin_username: String,
    calendar: CalendarService,
}

impl UserService {
    pub fn new(
        user_storage: Arc<dyn UserStorage>,
        hasher: PasswordHasher,
        admin_username: String,
        calendar: CalendarService,
    ) -> Self {
        Self {
            user_storage,
            hasher,
            admin_username,
            calendar,
        }
    }

    pub async fn register(&self, command: RegisterCommand) -> Result<UserAccount> {
        validate_new_account(&command.username, &command.password)?;

        if command.username == self.admin_username
            || self.user_storage.get_user(&command.username).await?.is_some()
        {
            return Err(AccountError::UsernameTaken.into());
        }

        let account = UserAccount {
            username: command.username,
            password_hash: self.hasher.hash(&command.password).await?,
            created_at: self.calendar.now_utc(),
            password_updated_at: None,
        };
        self.user_storage.store_user(&account).await?;

        info!("Registered account {}", account.username);
        Ok(account)
    }

    pub async fn list_users(&self) -> Result<Vec<UserAccount>> {
        self.user_storage.list_users().await
    }

    pub async fn delete_user(&self, username: &str) -> Result<()> {
        if username.is_empty() {
            return Err(AccountError::UsernameRequired.into());
        }

        if !self.user_storage.delete_user(username).await? {
            return Err(AccountError::NotFound.into());
        }
        Ok(())
    }

    pub async fn reset_password(&self, command: ResetPasswordCommand) -> Result<UserAccount> {
        if command.username.is_empty() || command.new_password.is_empty() {
            return Err(AccountError::MissingFields.into());
        }
        validate_password(&command.new_password)?;

        let mut account = self
            .user_storage
            .get_user(&command.username)
            .await?
            .ok_or(AccountError::NotFound)?;

        account.password_hash = self.hasher.hash(&command.new_password).await?;
        account.password_updated_at = Some(self.calendar.now_utc());
        self.user_storage.update_user(&account).await?;

        info!("Password reset for {}", account.username);
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::FixedClock;
    use crate::storage::json::test_utils::TestEnvironment;
    use crate::storage::UserRepository;
    use chrono::{TimeZone, Utc};

    fn setup_test(env: &TestEnvironment) -> (UserService, UserRepository) {
        let tz = CalendarService::parse_timezone("America/New_York").unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 2, 1, 15, 0, 0).unwrap());
        let repo = UserRepository::new(env.connection.clone());
        let service = UserService::new(
            Arc::new(repo.clone()),
            PasswordHasher::fast(),
            "admin".to_string(),
            CalendarService::with_clock(tz, Arc::new(clock)),
        );
        (service, repo)
    }

    fn register(username: &str, password: &str) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn account_error(err: anyhow::Error) -> AccountError {
        err.downcast::<AccountError>().unwrap()
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let env = TestEnvironment::new().unwrap();
        let (service, repo) = setup_test(&env);

        let account = service.register(register("clerk", "secret1")).await.unwrap();

        assert_eq!(account.created_at, Utc.with_ymd_and_hms(2024, 2, 1, 15, 0, 0).unwrap());
        let stored = repo.get_user("clerk").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(PasswordHasher::fast()
            .verify(&stored.password_hash, "secret1")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_admin_name() {
        let env = TestEnvironment::new().unwrap();
        let (service, _) = setup_test(&env);
        service.register(register("clerk", "secret1")).await.unwrap();

        let err = service.register(register("clerk", "other12")).await.unwrap_err();
        assert_eq!(account_error(err), AccountError::UsernameTaken);

        let err = service.register(register("admin", "secret1")).await.unwrap_err();
        assert_eq!(account_error(err), AccountError::UsernameTaken);

        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let env = TestEnvironment::new().unwrap();
        let (service, _) = setup_test(&env);

        let err = service.register(register("ab", "secret1")).await.unwrap_err();
        assert_eq!(account_error(err), AccountError::UsernameTooShort);

        let err = service.register(register("clerk", "12345")).await.unwrap_err();
        assert_eq!(account_error(err), AccountError::PasswordTooShort);

        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let env = TestEnvironment::new().unwrap();
        let (service, _) = setup_test(&env);
        service.register(register("clerk", "secret1")).await.unwrap();

        service.delete_user("clerk").await.unwrap();
        assert!(service.list_users().await.unwrap().is_empty());

        let err = service.delete_user("clerk").await.unwrap_err();
        assert_eq!(account_error(err), AccountError::NotFound);

        let err = service.delete_user("").await.unwrap_err();
        assert_eq!(account_error(err), AccountError::UsernameRequired);
    }

    #[tokio::test]
    async fn test_reset_password() {
        let env = TestEnvironment::new().unwrap();
        let (service, repo) = setup_test(&env);
        service.register(register("clerk", "secret1")).await.unwrap();

        let updated = service
            .reset_password(ResetPasswordCommand {
                username: "clerk".to_string(),
                new_password: "secret2".to_string(),
            })
            .await
            .unwrap();
        assert!(updated.password_updated_at.is_some());

        let stored = repo.get_user("clerk").await.unwrap().unwrap();
        let hasher = PasswordHasher::fast();
        assert!(hasher.verify(&stored.password_hash, "secret2").await.unwrap());
        assert!(!hasher.verify(&stored.password_hash, "secret1").await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_password_errors() {
        let env = TestEnvironment::new().unwrap();
        let (service, _) = setup_test(&env);

        let reset = |username: &str, password: &str| ResetPasswordCommand {
            username: username.to_string(),
            new_password: password.to_string(),
        };

        let err = service.reset_password(reset("ghost", "secret2")).await.unwrap_err();
        assert_eq!(account_error(err), AccountError::NotFound);

        let err = service.reset_password(reset("ghost", "123")).await.unwrap_err();
        assert_eq!(account_error(err), AccountError::PasswordTooShort);

        let err = service.reset_password(reset("", "secret2")).await.unwrap_err();
        assert_eq!(account_error(err), AccountError::MissingFields);
    }
}
