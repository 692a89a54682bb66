//! Storage seam between handlers and the relational store.

mod memory;
mod pg;

use async_trait::async_trait;

use crate::{
    auth::repo_types::User,
    students::repo_types::{Student, StudentInput},
};

pub use memory::MemoryRepository;
pub use pg::PgRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    /// Create the tables if they do not exist yet.
    async fn init_schema(&self) -> anyhow::Result<()>;

    async fn count_users(&self) -> anyhow::Result<i64>;
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, username: &str, password_hash: &str) -> anyhow::Result<User>;

    /// Newest first. `search` filters on name, roll_no, course and email.
    async fn list_students(&self, search: Option<&str>) -> anyhow::Result<Vec<Student>>;
    async fn get_student(&self, id: i32) -> anyhow::Result<Option<Student>>;
    async fn insert_student(&self, input: &StudentInput) -> anyhow::Result<Student>;
    /// `false` when no row has this id.
    async fn update_student(&self, id: i32, input: &StudentInput) -> anyhow::Result<bool>;
    /// `false` when no row has this id.
    async fn delete_student(&self, id: i32) -> anyhow::Result<bool>;
}
