//! Package business logic - sellable bundles that contracts are written against.

use super::money::{discounted_price, ensure_non_negative, ensure_percentage};
use crate::{
    entities::{Package, package},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "packages";

/// Payload for creating a package.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    pub name: String,
    pub duration_months: i32,
    #[serde(default)]
    pub included_units: i32,
    pub list_price: f64,
    #[serde(default)]
    pub discount_percent: f64,
}

/// Partial update for a package.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageUpdate {
    pub name: Option<String>,
    pub duration_months: Option<i32>,
    pub included_units: Option<i32>,
    pub list_price: Option<f64>,
    pub discount_percent: Option<f64>,
}

/// A package with its discounted price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageView {
    #[serde(flatten)]
    pub package: package::Model,
    /// `list_price` after `discount_percent`
    pub net_price: f64,
}

impl From<package::Model> for PackageView {
    fn from(package: package::Model) -> Self {
        let net_price = discounted_price(package.list_price, package.discount_percent);
        Self { package, net_price }
    }
}

fn validate_counts(duration_months: i32, included_units: i32) -> Result<()> {
    if duration_months < 1 {
        return Err(Error::validation(format!(
            "durationMonths must be at least 1, got {duration_months}"
        )));
    }
    if included_units < 0 {
        return Err(Error::validation(format!(
            "includedUnits cannot be negative, got {included_units}"
        )));
    }
    Ok(())
}

/// Retrieves all packages ordered by name.
pub async fn get_all_packages(db: &DatabaseConnection) -> Result<Vec<package::Model>> {
    Package::find()
        .order_by_asc(package::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a package by id.
pub async fn get_package_by_id(
    db: &DatabaseConnection,
    package_id: i64,
) -> Result<Option<package::Model>> {
    Package::find_by_id(package_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a package.
pub async fn create_package(db: &DatabaseConnection, input: NewPackage) -> Result<package::Model> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Package name cannot be empty"));
    }
    validate_counts(input.duration_months, input.included_units)?;

    let model = package::ActiveModel {
        name: Set(name),
        duration_months: Set(input.duration_months),
        included_units: Set(input.included_units),
        list_price: Set(ensure_non_negative(input.list_price)?),
        discount_percent: Set(ensure_percentage(input.discount_percent)?),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(package_id = created.id, "Package created");
    Ok(created)
}

/// Applies a partial update and stamps `updated_at`.
pub async fn update_package(
    db: &DatabaseConnection,
    package_id: i64,
    changes: PackageUpdate,
) -> Result<package::Model> {
    let existing = get_package_by_id(db, package_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, package_id))?;

    validate_counts(
        changes.duration_months.unwrap_or(existing.duration_months),
        changes.included_units.unwrap_or(existing.included_units),
    )?;

    let mut model: package::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Package name cannot be empty"));
        }
        model.name = Set(name);
    }
    if let Some(months) = changes.duration_months {
        model.duration_months = Set(months);
    }
    if let Some(units) = changes.included_units {
        model.included_units = Set(units);
    }
    if let Some(price) = changes.list_price {
        model.list_price = Set(ensure_non_negative(price)?);
    }
    if let Some(discount) = changes.discount_percent {
        model.discount_percent = Set(ensure_percentage(discount)?);
    }
    model.updated_at = Set(Some(Utc::now()));

    let updated = model.update(db).await?;
    tracing::info!(package_id, "Package updated");
    Ok(updated)
}

/// Hard-deletes a package. Contracts keep their `package_id`.
pub async fn delete_package(db: &DatabaseConnection, package_id: i64) -> Result<()> {
    let result = Package::delete_by_id(package_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, package_id));
    }
    tracing::info!(package_id, "Package deleted");
    Ok(())
}
