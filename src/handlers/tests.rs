//! Handler tests that must fail before any database access.
//!
//! The pool points at an unreachable address and connects lazily, so any
//! test that reached storage would fail with a database error instead.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::domain::{CurrentUser, DomainError, FieldUpdate, OperationContext};
    use crate::error::AppError;
    use crate::handlers::{EventHandler, ItemHandler, UserHandler};
    use crate::model::{
        EventCreate, EventUpdate, ItemCreate, UpdatePassword, UserCreate, UserRegister, UserUpdate,
    };

    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://nobody@127.0.0.1:1/unused")
            .unwrap()
    }

    fn user(is_superuser: bool) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            full_name: None,
            is_active: true,
            is_superuser,
        }
    }

    fn assert_invalid_field(result: Result<impl std::fmt::Debug, AppError>, expected: &str) {
        match result {
            Err(AppError::Domain(DomainError::InvalidField { field, .. })) => {
                assert_eq!(field, expected)
            }
            other => panic!("Expected InvalidField({}), got: {:?}", expected, other),
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[tokio::test]
    async fn test_create_event_rejects_empty_title() {
        let handler = EventHandler::new(unreachable_pool());
        let input = EventCreate {
            title: String::new(),
            description: None,
            date: Utc.with_ymd_and_hms(2026, 12, 1, 10, 0, 0).unwrap(),
            location: "Lisbon".to_string(),
        };

        let result = handler
            .create(input, &user(false), &OperationContext::new())
            .await;
        assert_invalid_field(result, "title");
    }

    #[tokio::test]
    async fn test_create_event_rejects_long_location() {
        let handler = EventHandler::new(unreachable_pool());
        let input = EventCreate {
            title: "Conference".to_string(),
            description: None,
            date: Utc.with_ymd_and_hms(2026, 12, 1, 10, 0, 0).unwrap(),
            location: "x".repeat(256),
        };

        let result = handler
            .create(input, &user(false), &OperationContext::new())
            .await;
        assert_invalid_field(result, "location");
    }

    #[tokio::test]
    async fn test_update_event_rejects_null_title() {
        let handler = EventHandler::new(unreachable_pool());
        let changes = EventUpdate {
            title: FieldUpdate::Null,
            ..Default::default()
        };

        let result = handler
            .update(Uuid::new_v4(), changes, &user(false), &OperationContext::new())
            .await;
        assert_invalid_field(result, "title");
    }

    // =========================================================================
    // Users
    // =========================================================================

    #[tokio::test]
    async fn test_create_user_requires_superuser() {
        let handler = UserHandler::new(unreachable_pool());
        let input = UserCreate {
            email: "new@example.com".to_string(),
            password: "changethis".to_string(),
            is_active: true,
            is_superuser: true,
            full_name: None,
        };

        let result = handler
            .create(input, &user(false), &OperationContext::new())
            .await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::SuperuserRequired))
        ));
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let handler = UserHandler::new(unreachable_pool());
        let input = UserRegister {
            email: "new@example.com".to_string(),
            password: "short".to_string(),
            full_name: None,
        };

        let result = handler.signup(input, &OperationContext::new()).await;
        assert_invalid_field(result, "password");
    }

    #[tokio::test]
    async fn test_superuser_cannot_delete_self() {
        let handler = UserHandler::new(unreachable_pool());
        let admin = user(true);

        let result = handler
            .delete(admin.id, &admin, &OperationContext::new())
            .await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::SuperuserSelfDelete))
        ));

        let result = handler.delete_me(&admin, &OperationContext::new()).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::SuperuserSelfDelete))
        ));
    }

    #[tokio::test]
    async fn test_delete_user_requires_superuser() {
        let handler = UserHandler::new(unreachable_pool());

        let result = handler
            .delete(Uuid::new_v4(), &user(false), &OperationContext::new())
            .await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::SuperuserRequired))
        ));
    }

    #[tokio::test]
    async fn test_update_user_requires_superuser() {
        let handler = UserHandler::new(unreachable_pool());
        let changes = UserUpdate {
            is_superuser: FieldUpdate::Value(true),
            ..Default::default()
        };

        let result = handler
            .update(Uuid::new_v4(), changes, &user(false), &OperationContext::new())
            .await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::SuperuserRequired))
        ));
    }

    #[tokio::test]
    async fn test_update_user_rejects_null_password() {
        let handler = UserHandler::new(unreachable_pool());
        let changes = UserUpdate {
            password: FieldUpdate::Null,
            ..Default::default()
        };

        let result = handler
            .update(Uuid::new_v4(), changes, &user(true), &OperationContext::new())
            .await;
        assert_invalid_field(result, "password");
    }

    #[tokio::test]
    async fn test_update_password_rejects_short_password() {
        let handler = UserHandler::new(unreachable_pool());
        let input = UpdatePassword {
            current_password: "long enough".to_string(),
            new_password: "short".to_string(),
        };

        let result = handler
            .update_password(input, &user(false), &OperationContext::new())
            .await;
        assert_invalid_field(result, "new_password");
    }

    // =========================================================================
    // Items
    // =========================================================================

    #[tokio::test]
    async fn test_create_item_rejects_long_description() {
        let handler = ItemHandler::new(unreachable_pool());
        let input = ItemCreate {
            title: "Notebook".to_string(),
            description: Some("d".repeat(256)),
        };

        let result = handler
            .create(input, &user(false), &OperationContext::new())
            .await;
        assert_invalid_field(result, "description");
    }
}
