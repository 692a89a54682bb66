//! Parameterized statement execution over the shared pool.
//!
//! Every call checks a connection out of the pool, binds the parameters
//! positionally and hands it back when the call returns, on success or error.
//! Mutating statements run inside a transaction that is committed after the
//! fetch; an early return drops the transaction, which rolls it back.

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    Connection, PgConnection, PgPool, Postgres,
};
use time::Date;
use tracing::trace;

/// How many rows the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    None,
    One,
    All,
}

pub enum Fetched {
    Nothing,
    One(Option<PgRow>),
    All(Vec<PgRow>),
}

impl Fetched {
    pub fn into_one(self) -> Option<PgRow> {
        match self {
            Fetched::One(row) => row,
            Fetched::All(rows) => rows.into_iter().next(),
            Fetched::Nothing => None,
        }
    }

    pub fn into_all(self) -> Vec<PgRow> {
        match self {
            Fetched::All(rows) => rows,
            Fetched::One(row) => row.into_iter().collect(),
            Fetched::Nothing => Vec::new(),
        }
    }
}

/// Positional parameter. Covers the value kinds stored in `users` and `students`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    Text(Option<String>),
    Date(Option<Date>),
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(Some(v.to_owned()))
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(Some(v))
    }
}

impl From<Option<Date>> for SqlParam {
    fn from(v: Option<Date>) -> Self {
        SqlParam::Date(v)
    }
}

const MUTATING: [&str; 6] = ["insert", "update", "delete", "create", "drop", "alter"];

/// True when the leading keyword of `sql` changes data or schema.
pub fn is_mutating(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    MUTATING.contains(&keyword.as_str())
}

pub async fn execute(
    pool: &PgPool,
    sql: &str,
    params: &[SqlParam],
    fetch: Fetch,
) -> Result<Fetched, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    if is_mutating(sql) {
        let mut tx = conn.begin().await?;
        let fetched = run(&mut tx, sql, params, fetch).await?;
        tx.commit().await?;
        trace!(params = params.len(), ?fetch, "statement committed");
        Ok(fetched)
    } else {
        run(&mut conn, sql, params, fetch).await
    }
}

async fn run(
    conn: &mut PgConnection,
    sql: &str,
    params: &[SqlParam],
    fetch: Fetch,
) -> Result<Fetched, sqlx::Error> {
    let query = bind_all(sqlx::query(sql), params);
    let fetched = match fetch {
        Fetch::None => {
            query.execute(&mut *conn).await?;
            Fetched::Nothing
        }
        Fetch::One => Fetched::One(query.fetch_optional(&mut *conn).await?),
        Fetch::All => Fetched::All(query.fetch_all(&mut *conn).await?),
    };
    Ok(fetched)
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[SqlParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.clone()),
            SqlParam::Date(v) => query.bind(*v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutating_keywords_are_detected() {
        assert!(is_mutating("INSERT INTO students (roll_no) VALUES ($1)"));
        assert!(is_mutating("  update students SET name = $1"));
        assert!(is_mutating("\n\tDELETE FROM students WHERE id = $1"));
        assert!(is_mutating("CREATE TABLE IF NOT EXISTS users (id SERIAL)"));
        assert!(is_mutating("drop table students"));
        assert!(is_mutating("Alter TABLE students ADD COLUMN x INT"));
    }

    #[test]
    fn reads_are_not_mutating() {
        assert!(!is_mutating("SELECT * FROM students"));
        assert!(!is_mutating("select count(*) from users"));
        assert!(!is_mutating(""));
        assert!(!is_mutating("   "));
        // keyword must stand alone, not just prefix a longer word
        assert!(!is_mutating("inserted_rows"));
    }

    #[test]
    fn fetched_conversions() {
        assert!(Fetched::Nothing.into_one().is_none());
        assert!(Fetched::Nothing.into_all().is_empty());
        assert!(Fetched::One(None).into_all().is_empty());
        assert!(Fetched::All(Vec::new()).into_one().is_none());
    }

    #[test]
    fn params_from_values() {
        assert_eq!(SqlParam::from(7), SqlParam::Int(7));
        assert_eq!(SqlParam::from("x"), SqlParam::Text(Some("x".into())));
        assert_eq!(SqlParam::from(None::<Date>), SqlParam::Date(None));
    }
}
