//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ROLE_CODE_DEFAULT, ROLE_CODE_HR, ROLE_CODE_INTERVIEWER, ROLE_CODE_MODERATOR,
};
use crate::error::DomainError;

/// Account roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    Default,
    HR,
    Interviewer,
    Moderator,
}

impl AccountRole {
    /// Integer code used by the persistence layer
    pub fn code(self) -> i32 {
        match self {
            AccountRole::Default => ROLE_CODE_DEFAULT,
            AccountRole::HR => ROLE_CODE_HR,
            AccountRole::Interviewer => ROLE_CODE_INTERVIEWER,
            AccountRole::Moderator => ROLE_CODE_MODERATOR,
        }
    }
}

impl TryFrom<i32> for AccountRole {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            ROLE_CODE_DEFAULT => Ok(AccountRole::Default),
            ROLE_CODE_HR => Ok(AccountRole::HR),
            ROLE_CODE_INTERVIEWER => Ok(AccountRole::Interviewer),
            ROLE_CODE_MODERATOR => Ok(AccountRole::Moderator),
            other => Err(DomainError::UnknownRole(other)),
        }
    }
}

impl From<AccountRole> for i32 {
    fn from(role: AccountRole) -> Self {
        role.code()
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Default => write!(f, "default"),
            AccountRole::HR => write!(f, "hr"),
            AccountRole::Interviewer => write!(f, "interviewer"),
            AccountRole::Moderator => write!(f, "moderator"),
        }
    }
}

/// Account domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Canonical form of an email address used as the lookup key.
///
/// Surrounding whitespace is dropped and ASCII letters are lowercased, so two
/// addresses differing only in case name the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes_round_trip() {
        for role in [
            AccountRole::Default,
            AccountRole::HR,
            AccountRole::Interviewer,
            AccountRole::Moderator,
        ] {
            assert_eq!(AccountRole::try_from(role.code()), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_code_rejected() {
        assert_eq!(AccountRole::try_from(7), Err(DomainError::UnknownRole(7)));
        assert_eq!(AccountRole::try_from(-1), Err(DomainError::UnknownRole(-1)));
    }

    #[test]
    fn test_default_role() {
        assert_eq!(AccountRole::default(), AccountRole::Default);
        assert_eq!(AccountRole::default().code(), 0);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.com "), "a@x.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn test_serialization_hides_password_hash() {
        let account = Account {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: AccountRole::HR,
            is_active: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"hr\""));
    }
}
