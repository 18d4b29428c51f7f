use crate::domain::models::user::UserAccount;
use shared::UserSummary;

pub struct UserMapper;

impl UserMapper {
    /// Password-free view of an account
    pub fn to_summary(account: &UserAccount) -> UserSummary {
        UserSummary {
            username: account.username.clone(),
            created_at: account.created_at.to_rfc3339(),
            password_updated_at: account.password_updated_at.map(|t| t.to_rfc3339()),
        }
    }
}
