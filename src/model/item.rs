//! Item entity

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::validation::{check_length, check_optional_length, MAX_TEXT_LEN};
use crate::domain::{CurrentUser, DomainError, FieldUpdate};

/// Row of the `items` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

impl Item {
    pub fn new(input: ItemCreate, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            owner_id,
        }
    }

    /// Owners and superusers may read and modify an item
    pub fn ensure_access(&self, user: &CurrentUser) -> Result<(), DomainError> {
        if self.owner_id != user.id && !user.is_superuser {
            return Err(DomainError::NotOwner);
        }
        Ok(())
    }

    pub fn apply_update(&mut self, changes: ItemUpdate) -> Result<(), DomainError> {
        changes.title.apply_required("title", &mut self.title)?;
        changes.description.apply_optional(&mut self.description);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPublic {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

impl From<Item> for ItemPublic {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            owner_id: item.owner_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemCreate {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_length("title", &self.title, 1, MAX_TEXT_LEN)?;
        check_optional_length("description", self.description.as_deref(), MAX_TEXT_LEN)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub title: FieldUpdate<String>,
    #[serde(default)]
    pub description: FieldUpdate<String>,
}

impl ItemUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.title.reject_null("title")?;
        if let Some(title) = self.title.value() {
            check_length("title", title, 1, MAX_TEXT_LEN)?;
        }
        if let Some(description) = self.description.value() {
            check_optional_length("description", Some(description.as_str()), MAX_TEXT_LEN)?;
        }
        Ok(())
    }
}
