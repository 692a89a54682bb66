//! DDL and first-run seeding.

use anyhow::Context;
use tracing::{debug, info};

use crate::{auth::password::hash_password, config::SeedConfig, repo::Repository};

/// Postgres schema. Every statement is idempotent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(50) UNIQUE NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS students (
    id SERIAL PRIMARY KEY,
    roll_no VARCHAR(30) UNIQUE NOT NULL,
    name VARCHAR(100) NOT NULL,
    course VARCHAR(100),
    email VARCHAR(120),
    phone VARCHAR(20),
    dob DATE,
    address TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

/// Split `SCHEMA` into single statements; the executor binds one at a time.
pub fn statements() -> impl Iterator<Item = &'static str> {
    SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Create the tables, then seed the admin account if `users` is empty.
/// Returns whether an account was seeded.
pub async fn init(repo: &dyn Repository, seed: &SeedConfig) -> anyhow::Result<bool> {
    repo.init_schema().await.context("create tables")?;

    let users = repo.count_users().await.context("count users")?;
    if users > 0 {
        debug!(users, "users present; skipping seed");
        return Ok(false);
    }

    let hash = hash_password(&seed.admin_password)?;
    let user = repo
        .create_user(&seed.admin_username, &hash)
        .await
        .context("seed admin user")?;
    info!(user_id = user.id, username = %user.username, "seeded default admin user");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::verify_password, repo::MemoryRepository};

    fn seed() -> SeedConfig {
        SeedConfig {
            admin_username: "admin".into(),
            admin_password: "admin123".into(),
        }
    }

    #[test]
    fn schema_splits_into_two_create_statements() {
        let stmts: Vec<_> = statements().collect();
        assert_eq!(stmts.len(), 2);
        assert!(stmts.iter().all(|s| s.starts_with("CREATE TABLE IF NOT EXISTS")));
    }

    #[tokio::test]
    async fn seeds_admin_into_empty_store() {
        let repo = MemoryRepository::new();
        assert!(init(&repo, &seed()).await.unwrap());

        let admin = repo.find_user_by_username("admin").await.unwrap().unwrap();
        assert!(verify_password("admin123", &admin.password_hash).unwrap());
        assert_ne!(admin.password_hash, "admin123");
    }

    #[tokio::test]
    async fn second_run_seeds_nothing() {
        let repo = MemoryRepository::new();
        assert!(init(&repo, &seed()).await.unwrap());
        assert!(!init(&repo, &seed()).await.unwrap());
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn existing_user_blocks_seed() {
        let repo = MemoryRepository::new();
        repo.create_user("principal", "$argon2id$placeholder").await.unwrap();
        assert!(!init(&repo, &seed()).await.unwrap());
        assert!(repo.find_user_by_username("admin").await.unwrap().is_none());
    }
}
