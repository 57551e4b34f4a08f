//! Database transaction utilities
//!
//! Session creation writes three tables; [`TransactionGuard`] makes sure those
//! writes land together or not at all.

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Transaction};
use std::ops::{Deref, DerefMut};

/// A database transaction wrapper that must be explicitly committed
///
/// Dropping the guard without committing rolls the transaction back when
/// sqlx returns the connection to the pool.
///
/// # Example
///
/// ```ignore
/// use sharebox_db::db::transaction::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> anyhow::Result<()> {
///     let mut tx = TransactionGuard::begin(pool).await?;
///     sqlx::query("INSERT INTO ...").execute(&mut **tx).await?;
///     tx.commit().await?;
///     Ok(())
/// }
/// ```
pub struct TransactionGuard<'a> {
    transaction: Option<Transaction<'a, Postgres>>,
    operation: &'static str,
}

impl<'a> TransactionGuard<'a> {
    /// Begin a new database transaction for the named operation
    pub async fn begin(pool: &'a PgPool, operation: &'static str) -> Result<Self> {
        let transaction = pool
            .begin()
            .await
            .with_context(|| format!("Failed to begin transaction for {}", operation))?;

        Ok(Self {
            transaction: Some(transaction),
            operation,
        })
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> Result<()> {
        if let Some(tx) = self.transaction.take() {
            tx.commit()
                .await
                .with_context(|| format!("Failed to commit transaction for {}", self.operation))?;
        }
        Ok(())
    }

    /// Rollback the transaction
    pub async fn rollback(mut self) -> Result<()> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback().await.with_context(|| {
                format!("Failed to rollback transaction for {}", self.operation)
            })?;
        }
        Ok(())
    }
}

impl<'a> Deref for TransactionGuard<'a> {
    type Target = Transaction<'a, Postgres>;

    fn deref(&self) -> &Self::Target {
        self.transaction
            .as_ref()
            .expect("Transaction was already committed or rolled back")
    }
}

impl<'a> DerefMut for TransactionGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.transaction
            .as_mut()
            .expect("Transaction was already committed or rolled back")
    }
}

impl<'a> Drop for TransactionGuard<'a> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            tracing::warn!(
                operation = self.operation,
                "Transaction dropped without commit - rolling back"
            );
        }
    }
}
