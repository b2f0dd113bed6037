use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::core::{
    error::{KwameError, Result},
    NewUser, User,
};
use crate::storage::UserRepository;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_table(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS ix_users_username ON users (username)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, user), fields(email = %user.email)))]
    async fn insert(&self, user: &NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email) VALUES (?, ?)
             RETURNING id, username, email",
        )
        .bind(&user.username)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                KwameError::Conflict("email already registered".to_string())
            }
            other => KwameError::Database(other),
        })?;
        #[cfg(feature = "tracing")]
        debug!(id = created.id, "Inserted user");
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, email FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, username, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connect;

    async fn repo() -> SqliteUserRepository {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        let repo = SqliteUserRepository::new(pool);
        repo.create_table().await.unwrap();
        repo
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_persists() {
        let repo = repo().await;
        let first = repo.insert(&new_user("a", "a@example.com")).await.unwrap();
        let second = repo.insert(&new_user("b", "b@example.com")).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(repo.list().await.unwrap(), vec![first.clone(), second]);
        assert_eq!(repo.find_by_email("a@example.com").await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = repo().await;
        repo.insert(&new_user("a", "dup@example.com")).await.unwrap();
        let err = repo.insert(&new_user("b", "dup@example.com")).await.unwrap_err();
        assert!(matches!(err, KwameError::Conflict(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_table_is_idempotent() {
        let repo = repo().await;
        repo.create_table().await.unwrap();
        assert!(repo.find_by_email("ghost@example.com").await.unwrap().is_none());
    }
}
