//! User entity

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::validation::{
    check_email, check_optional_length, check_password, normalize_email, MAX_TEXT_LEN,
};
use crate::domain::{DomainError, FieldUpdate};

/// Row of the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
    pub hashed_password: String,
}

impl User {
    pub fn new(input: UserCreate, hashed_password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(&input.email),
            is_active: input.is_active,
            is_superuser: input.is_superuser,
            full_name: input.full_name,
            hashed_password,
        }
    }

    /// Apply a profile update. Call [`UserUpdateMe::validate`] first.
    pub fn apply_update(&mut self, changes: UserUpdateMe) -> Result<(), DomainError> {
        changes
            .email
            .map(|email| normalize_email(&email))
            .apply_required("email", &mut self.email)?;
        changes.full_name.apply_optional(&mut self.full_name);
        Ok(())
    }

    /// Apply a superuser update. `changes.password` is ignored: the caller
    /// hashes it and passes the result as `hashed_password`.
    pub fn apply_admin_update(
        &mut self,
        changes: UserUpdate,
        hashed_password: Option<String>,
    ) -> Result<(), DomainError> {
        changes
            .email
            .map(|email| normalize_email(&email))
            .apply_required("email", &mut self.email)?;
        changes.full_name.apply_optional(&mut self.full_name);
        changes.is_active.apply_required("is_active", &mut self.is_active)?;
        changes
            .is_superuser
            .apply_required("is_superuser", &mut self.is_superuser)?;
        if let Some(hashed) = hashed_password {
            self.hashed_password = hashed;
        }
        Ok(())
    }
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            full_name: user.full_name,
        }
    }
}

/// User creation by a superuser
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub full_name: Option<String>,
}

fn default_true() -> bool {
    true
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_email("email", &self.email)?;
        check_password("password", &self.password)?;
        check_optional_length("full_name", self.full_name.as_deref(), MAX_TEXT_LEN)
    }
}

/// Open sign-up payload
#[derive(Debug, Clone, Deserialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl From<UserRegister> for UserCreate {
    fn from(register: UserRegister) -> Self {
        Self {
            email: register.email,
            password: register.password,
            is_active: true,
            is_superuser: false,
            full_name: register.full_name,
        }
    }
}

/// Profile update of the current user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdateMe {
    #[serde(default)]
    pub full_name: FieldUpdate<String>,
    #[serde(default)]
    pub email: FieldUpdate<String>,
}

impl UserUpdateMe {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.email.reject_null("email")?;
        if let Some(email) = self.email.value() {
            check_email("email", email)?;
        }
        if let Some(full_name) = self.full_name.value() {
            check_optional_length("full_name", Some(full_name.as_str()), MAX_TEXT_LEN)?;
        }
        Ok(())
    }
}

/// Update of any user by a superuser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: FieldUpdate<String>,
    #[serde(default)]
    pub password: FieldUpdate<String>,
    #[serde(default)]
    pub full_name: FieldUpdate<String>,
    #[serde(default)]
    pub is_active: FieldUpdate<bool>,
    #[serde(default)]
    pub is_superuser: FieldUpdate<bool>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.email.reject_null("email")?;
        self.password.reject_null("password")?;
        self.is_active.reject_null("is_active")?;
        self.is_superuser.reject_null("is_superuser")?;

        if let Some(email) = self.email.value() {
            check_email("email", email)?;
        }
        if let Some(password) = self.password.value() {
            check_password("password", password)?;
        }
        if let Some(full_name) = self.full_name.value() {
            check_optional_length("full_name", Some(full_name.as_str()), MAX_TEXT_LEN)?;
        }
        Ok(())
    }
}

/// Password change of the current user
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePassword {
    pub current_password: String,
    pub new_password: String,
}

impl UpdatePassword {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_password("current_password", &self.current_password)?;
        check_password("new_password", &self.new_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            is_active: true,
            is_superuser: false,
            full_name: Some("Alice".to_string()),
            hashed_password: "hash".to_string(),
        }
    }

    #[test]
    fn test_user_create_deserialize_defaults() {
        let json = r#"{"email": "bob@example.com", "password": "changethis"}"#;
        let input: UserCreate = serde_json::from_str(json).unwrap();

        assert!(input.is_active);
        assert!(!input.is_superuser);
        assert!(input.full_name.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_user_create_validation() {
        let input = UserCreate {
            email: "not-an-email".to_string(),
            password: "changethis".to_string(),
            is_active: true,
            is_superuser: false,
            full_name: None,
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::InvalidField { field: "email", .. })
        ));

        let input = UserCreate {
            email: "bob@example.com".to_string(),
            password: "short".to_string(),
            ..input
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::InvalidField { field: "password", .. })
        ));
    }

    #[test]
    fn test_register_is_never_superuser() {
        let register = UserRegister {
            email: "carol@example.com".to_string(),
            password: "changethis".to_string(),
            full_name: None,
        };
        let input = UserCreate::from(register);
        assert!(input.is_active);
        assert!(!input.is_superuser);
    }

    #[test]
    fn test_public_projection_omits_password() {
        let public = UserPublic::from(sample_user());
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn test_apply_update_is_partial() {
        let mut user = sample_user();
        let changes: UserUpdateMe = serde_json::from_str(r#"{"full_name": null}"#).unwrap();
        assert!(changes.validate().is_ok());

        user.apply_update(changes).unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(user.full_name.is_none());
    }

    #[test]
    fn test_update_rejects_null_email() {
        let changes: UserUpdateMe = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_new_user_email_is_normalized() {
        let input = UserCreate {
            email: "Bob@Example.COM".to_string(),
            password: "changethis".to_string(),
            is_active: true,
            is_superuser: false,
            full_name: None,
        };
        let user = User::new(input, "hash".to_string());
        assert_eq!(user.email, "bob@example.com");

        let mut user = sample_user();
        let changes: UserUpdateMe =
            serde_json::from_str(r#"{"email": "Alice.New@Example.com"}"#).unwrap();
        user.apply_update(changes).unwrap();
        assert_eq!(user.email, "alice.new@example.com");
    }

    #[test]
    fn test_admin_update_is_partial() {
        let mut user = sample_user();
        let changes: UserUpdate = serde_json::from_str(r#"{"is_active": false}"#).unwrap();
        assert!(changes.validate().is_ok());

        user.apply_admin_update(changes, None).unwrap();
        assert!(!user.is_active);
        assert!(!user.is_superuser);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.full_name.as_deref(), Some("Alice"));
        assert_eq!(user.hashed_password, "hash");

        let changes: UserUpdate =
            serde_json::from_str(r#"{"is_superuser": true, "password": "brand-new-pass"}"#)
                .unwrap();
        user.apply_admin_update(changes, Some("new-hash".to_string()))
            .unwrap();
        assert!(user.is_superuser);
        assert_eq!(user.hashed_password, "new-hash");
    }

    #[test]
    fn test_admin_update_validation() {
        let changes: UserUpdate = serde_json::from_str(r#"{"is_active": null}"#).unwrap();
        assert!(matches!(
            changes.validate(),
            Err(DomainError::InvalidField { field: "is_active", .. })
        ));

        let changes: UserUpdate = serde_json::from_str(r#"{"password": "short"}"#).unwrap();
        assert!(matches!(
            changes.validate(),
            Err(DomainError::InvalidField { field: "password", .. })
        ));
    }

    #[test]
    fn test_update_password_validation() {
        let input = UpdatePassword {
            current_password: "changethis".to_string(),
            new_password: "tiny".to_string(),
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::InvalidField { field: "new_password", .. })
        ));

        let input = UpdatePassword {
            current_password: "p".repeat(41),
            new_password: "changethat".to_string(),
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::InvalidField { field: "current_password", .. })
        ));
    }
}
