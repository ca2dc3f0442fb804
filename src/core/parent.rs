//! Parent (guardian) business logic.

use crate::{
    entities::{ContactChannel, Parent, parent},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

const COLLECTION: &str = "parents";

/// Payload for registering a guardian.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParent {
    /// Full name
    pub name: String,
    /// Phone number
    #[serde(default)]
    pub phone: String,
    /// E-mail address
    #[serde(default)]
    pub email: String,
    /// Defaults to `phone`
    #[serde(default)]
    pub preferred_channel: ContactChannel,
    /// KVKK consent flag
    #[serde(default)]
    pub kvkk_consent: bool,
}

/// Partial update for a parent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferred_channel: Option<ContactChannel>,
    pub kvkk_consent: Option<bool>,
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Parent name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Retrieves all parents ordered by name.
pub async fn get_all_parents(db: &DatabaseConnection) -> Result<Vec<parent::Model>> {
    Parent::find()
        .order_by_asc(parent::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a parent by id.
pub async fn get_parent_by_id(
    db: &DatabaseConnection,
    parent_id: i64,
) -> Result<Option<parent::Model>> {
    Parent::find_by_id(parent_id).one(db).await.map_err(Into::into)
}

/// Registers a guardian.
pub async fn create_parent(db: &DatabaseConnection, input: NewParent) -> Result<parent::Model> {
    let model = parent::ActiveModel {
        name: Set(validate_name(&input.name)?),
        phone: Set(input.phone),
        email: Set(input.email),
        preferred_channel: Set(input.preferred_channel),
        kvkk_consent: Set(input.kvkk_consent),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(parent_id = created.id, "Parent created");
    Ok(created)
}

/// Applies a partial update and stamps `updated_at`.
pub async fn update_parent(
    db: &DatabaseConnection,
    parent_id: i64,
    changes: ParentUpdate,
) -> Result<parent::Model> {
    let existing = get_parent_by_id(db, parent_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, parent_id))?;

    let mut model: parent::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        model.name = Set(validate_name(&name)?);
    }
    if let Some(phone) = changes.phone {
        model.phone = Set(phone);
    }
    if let Some(email) = changes.email {
        model.email = Set(email);
    }
    if let Some(channel) = changes.preferred_channel {
        model.preferred_channel = Set(channel);
    }
    if let Some(consent) = changes.kvkk_consent {
        model.kvkk_consent = Set(consent);
    }
    model.updated_at = Set(Some(Utc::now()));

    let updated = model.update(db).await?;
    tracing::info!(parent_id, "Parent updated");
    Ok(updated)
}

/// Hard-deletes a parent. Students keep their `parent_id`.
pub async fn delete_parent(db: &DatabaseConnection, parent_id: i64) -> Result<()> {
    let result = Parent::delete_by_id(parent_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, parent_id));
    }
    tracing::info!(parent_id, "Parent deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_parent_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;

        let parent = create_parent(
            &db,
            NewParent {
                name: " Zeynep Kaya ".to_string(),
                phone: "0555 111 22 33".to_string(),
                email: "zeynep@example.com".to_string(),
                preferred_channel: ContactChannel::Whatsapp,
                kvkk_consent: true,
            },
        )
        .await?;
        assert_eq!(parent.name, "Zeynep Kaya");
        assert_eq!(parent.preferred_channel, ContactChannel::Whatsapp);

        let updated = update_parent(
            &db,
            parent.id,
            ParentUpdate {
                preferred_channel: Some(ContactChannel::Email),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.preferred_channel, ContactChannel::Email);
        assert!(updated.kvkk_consent);

        delete_parent(&db, parent.id).await?;
        assert!(get_parent_by_id(&db, parent.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_parent_keeps_student_reference() -> Result<()> {
        let db = setup_test_db().await?;
        let parent = create_parent(
            &db,
            NewParent {
                name: "Zeynep Kaya".to_string(),
                ..Default::default()
            },
        )
        .await?;
        let student = crate::core::student::create_student(
            &db,
            crate::core::student::NewStudent {
                first_name: "Elif".to_string(),
                last_name: "Kaya".to_string(),
                parent_id: Some(parent.id),
                ..Default::default()
            },
        )
        .await?;

        delete_parent(&db, parent.id).await?;
        let reloaded = crate::core::student::get_student_by_id(&db, student.id)
            .await?
            .unwrap();
        assert_eq!(reloaded.parent_id, Some(parent.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_parent_rejects_blank_name() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_parent(&db, NewParent::default()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }
}
