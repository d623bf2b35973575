//! Book persistence contract and its SQLite implementation.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::{Book, BookPayload};

pub type RepoResult<T> = Result<T, sqlx::Error>;

/// Storage operations the books handlers depend on.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All rows in storage-native order.
    async fn list(&self) -> RepoResult<Vec<Book>>;

    async fn get(&self, id: i64) -> RepoResult<Option<Book>>;

    /// Insert a row and return its assigned id.
    async fn insert(&self, payload: &BookPayload) -> RepoResult<i64>;

    /// Replace title and author. Returns `false` when no row has `id`;
    /// rewriting identical values still counts as a match.
    async fn update(&self, id: i64, payload: &BookPayload) -> RepoResult<bool>;

    /// Returns `true` when a row was removed.
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

/// SQLite-backed book repository.
///
/// Each call borrows a pooled connection for its statements only.
#[derive(Debug, Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn list(&self) -> RepoResult<Vec<Book>> {
        sqlx::query_as::<_, Book>("SELECT id, title, author FROM books")
            .fetch_all(&self.pool)
            .await
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT id, title, author FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert(&self, payload: &BookPayload) -> RepoResult<i64> {
        let result = sqlx::query("INSERT INTO books (title, author) VALUES (?, ?)")
            .bind(payload.title.as_str())
            .bind(payload.author.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, payload: &BookPayload) -> RepoResult<bool> {
        // SQLite counts matched rows, so identical values still report 1.
        let result = sqlx::query("UPDATE books SET title = ?, author = ? WHERE id = ?")
            .bind(payload.title.as_str())
            .bind(payload.author.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
