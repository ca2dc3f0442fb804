//! Database configuration module for the ledger service.
//!
//! This module handles `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{
    Coach, Contract, Invoice, Package, Parent, Payment, PaymentSchedule, Student,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

/// Default location of the store when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/academico.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to [`DEFAULT_DATABASE_URL`] if the variable is not set. The
/// parent directory of a file-backed `SQLite` URL is created if missing.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    ensure_sqlite_directory(&database_url)?;
    tracing::debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

fn ensure_sqlite_directory(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    match std::path::Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
        _ => {}
    }
    Ok(())
}

/// Creates every collection table that does not exist yet.
///
/// Safe to call on each startup: existing tables and their rows are left alone.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Student).await?;
    create_table(db, Parent).await?;
    create_table(db, Coach).await?;
    create_table(db, Package).await?;
    create_table(db, Contract).await?;
    create_table(db, Invoice).await?;
    create_table(db, Payment).await?;
    create_table(db, PaymentSchedule).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CoachModel, ContractModel, InvoiceModel, PackageModel, ParentModel, PaymentModel,
        PaymentScheduleModel, StudentModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<StudentModel> = Student::find().limit(1).all(&db).await?;
        let _: Vec<ParentModel> = Parent::find().limit(1).all(&db).await?;
        let _: Vec<CoachModel> = Coach::find().limit(1).all(&db).await?;
        let _: Vec<PackageModel> = Package::find().limit(1).all(&db).await?;
        let _: Vec<ContractModel> = Contract::find().limit(1).all(&db).await?;
        let _: Vec<InvoiceModel> = Invoice::find().limit(1).all(&db).await?;
        let _: Vec<PaymentModel> = Payment::find().limit(1).all(&db).await?;
        let _: Vec<PaymentScheduleModel> = PaymentSchedule::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_ensure_sqlite_directory_ignores_memory_urls() -> Result<()> {
        ensure_sqlite_directory("sqlite::memory:")?;
        Ok(())
    }
}
