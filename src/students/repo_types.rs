use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Row of `students`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Student {
    pub id: i32,
    pub roll_no: String,
    pub name: String,
    pub course: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<Date>,
    pub address: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Validated field set written by insert and update. `roll_no` and `name`
/// are non-empty; the other text fields are stored as submitted (trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentInput {
    pub roll_no: String,
    pub name: String,
    pub course: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<Date>,
    pub address: String,
}

impl Student {
    /// Case-insensitive substring match on name, roll_no, course or email.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [
            Some(self.name.as_str()),
            Some(self.roll_no.as_str()),
            self.course.as_deref(),
            self.email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student {
            id: 1,
            roll_no: "CS-101".into(),
            name: "Ada Lovelace".into(),
            course: Some("Mathematics".into()),
            email: Some("ada@example.org".into()),
            phone: Some("555-0100".into()),
            dob: None,
            address: Some("Marylebone".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn matches_searchable_fields_case_insensitively() {
        let s = student();
        assert!(s.matches("lovelace"));
        assert!(s.matches("cs-1"));
        assert!(s.matches("MATH"));
        assert!(s.matches("example.org"));
    }

    #[test]
    fn ignores_phone_and_address() {
        let s = student();
        assert!(!s.matches("555"));
        assert!(!s.matches("Marylebone"));
    }
}
