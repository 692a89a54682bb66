use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};

use super::Repository;
use crate::{
    auth::repo_types::User,
    db::{execute, schema, Fetch, SqlParam},
    students::repo_types::{Student, StudentInput},
};

const STUDENT_COLUMNS: &str =
    "id, roll_no, name, course, email, phone, dob, address, created_at";

/// `students` and `users` in Postgres, through the query executor.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `%term%` with LIKE wildcards in `term` matched literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn student_params(input: &StudentInput) -> Vec<SqlParam> {
    vec![
        input.roll_no.as_str().into(),
        input.name.as_str().into(),
        input.course.as_str().into(),
        input.email.as_str().into(),
        input.phone.as_str().into(),
        input.dob.into(),
        input.address.as_str().into(),
    ]
}

#[async_trait]
impl Repository for PgRepository {
    async fn init_schema(&self) -> anyhow::Result<()> {
        for stmt in schema::statements() {
            execute(&self.pool, stmt, &[], Fetch::None)
                .await
                .with_context(|| format!("run DDL: {}", stmt.lines().next().unwrap_or(stmt)))?;
        }
        Ok(())
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        let row = execute(&self.pool, "SELECT COUNT(*) AS c FROM users", &[], Fetch::One)
            .await
            .context("count users")?
            .into_one()
            .context("count returned no row")?;
        Ok(row.try_get("c")?)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let row = execute(
            &self.pool,
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
            &[username.into()],
            Fetch::One,
        )
        .await
        .context("find user by username")?
        .into_one();
        Ok(row.map(|r| User::from_row(&r)).transpose()?)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> anyhow::Result<User> {
        let row = execute(
            &self.pool,
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
            &[username.into(), password_hash.into()],
            Fetch::One,
        )
        .await
        .context("insert user")?
        .into_one()
        .context("insert user returned no row")?;
        Ok(User::from_row(&row)?)
    }

    async fn list_students(&self, search: Option<&str>) -> anyhow::Result<Vec<Student>> {
        let mut sql = format!("SELECT {STUDENT_COLUMNS} FROM students");
        let mut params = Vec::new();
        if let Some(term) = search {
            sql.push_str(
                " WHERE name ILIKE $1 OR roll_no ILIKE $1 OR course ILIKE $1 OR email ILIKE $1",
            );
            params.push(SqlParam::from(like_pattern(term)));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let rows = execute(&self.pool, &sql, &params, Fetch::All)
            .await
            .context("list students")?
            .into_all();
        rows.iter()
            .map(|r| Student::from_row(r).map_err(Into::into))
            .collect()
    }

    async fn get_student(&self, id: i32) -> anyhow::Result<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        let row = execute(&self.pool, &sql, &[id.into()], Fetch::One)
            .await
            .context("get student")?
            .into_one();
        Ok(row.map(|r| Student::from_row(&r)).transpose()?)
    }

    async fn insert_student(&self, input: &StudentInput) -> anyhow::Result<Student> {
        let sql = format!(
            r#"
            INSERT INTO students (roll_no, name, course, email, phone, dob, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STUDENT_COLUMNS}
            "#
        );
        let row = execute(&self.pool, &sql, &student_params(input), Fetch::One)
            .await
            .context("insert student")?
            .into_one()
            .context("insert student returned no row")?;
        Ok(Student::from_row(&row)?)
    }

    async fn update_student(&self, id: i32, input: &StudentInput) -> anyhow::Result<bool> {
        let mut params = student_params(input);
        params.push(id.into());
        let row = execute(
            &self.pool,
            r#"
            UPDATE students
               SET roll_no = $1, name = $2, course = $3, email = $4,
                   phone = $5, dob = $6, address = $7
             WHERE id = $8
            RETURNING id
            "#,
            &params,
            Fetch::One,
        )
        .await
        .context("update student")?
        .into_one();
        Ok(row.is_some())
    }

    async fn delete_student(&self, id: i32) -> anyhow::Result<bool> {
        let row = execute(
            &self.pool,
            "DELETE FROM students WHERE id = $1 RETURNING id",
            &[id.into()],
            Fetch::One,
        )
        .await
        .context("delete student")?
        .into_one();
        Ok(row.is_some())
    }
}
