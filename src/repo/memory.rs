use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::Repository;
use crate::{
    auth::repo_types::User,
    students::repo_types::{Student, StudentInput},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    students: Vec<Student>,
    next_user_id: i32,
    next_student_id: i32,
}

/// Process-local store with the same constraints as the Postgres schema
/// (unique `username`, unique `roll_no`). Used by tests.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| anyhow::anyhow!("memory repository lock poisoned"))
    }
}

fn ensure_unique_roll_no(tables: &Tables, roll_no: &str, except: Option<i32>) -> anyhow::Result<()> {
    let taken = tables
        .students
        .iter()
        .any(|s| s.roll_no == roll_no && Some(s.id) != except);
    anyhow::ensure!(
        !taken,
        "duplicate key value violates unique constraint \"students_roll_no_key\""
    );
    Ok(())
}

fn apply(student: &mut Student, input: &StudentInput) {
    student.roll_no = input.roll_no.clone();
    student.name = input.name.clone();
    student.course = Some(input.course.clone());
    student.email = Some(input.email.clone());
    student.phone = Some(input.phone.clone());
    student.dob = input.dob;
    student.address = Some(input.address.clone());
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn init_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        Ok(self.lock()?.users.len() as i64)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> anyhow::Result<User> {
        let mut t = self.lock()?;
        anyhow::ensure!(
            !t.users.iter().any(|u| u.username == username),
            "duplicate key value violates unique constraint \"users_username_key\""
        );
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn list_students(&self, search: Option<&str>) -> anyhow::Result<Vec<Student>> {
        let t = self.lock()?;
        let mut rows: Vec<Student> = t
            .students
            .iter()
            .filter(|s| search.map_or(true, |term| s.matches(term)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_student(&self, id: i32) -> anyhow::Result<Option<Student>> {
        Ok(self.lock()?.students.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_student(&self, input: &StudentInput) -> anyhow::Result<Student> {
        let mut t = self.lock()?;
        ensure_unique_roll_no(&t, &input.roll_no, None)?;
        t.next_student_id += 1;
        let mut student = Student {
            id: t.next_student_id,
            roll_no: String::new(),
            name: String::new(),
            course: None,
            email: None,
            phone: None,
            dob: None,
            address: None,
            created_at: OffsetDateTime::now_utc(),
        };
        apply(&mut student, input);
        t.students.push(student.clone());
        Ok(student)
    }

    async fn update_student(&self, id: i32, input: &StudentInput) -> anyhow::Result<bool> {
        let mut t = self.lock()?;
        ensure_unique_roll_no(&t, &input.roll_no, Some(id))?;
        match t.students.iter_mut().find(|s| s.id == id) {
            Some(student) => {
                apply(student, input);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_student(&self, id: i32) -> anyhow::Result<bool> {
        let mut t = self.lock()?;
        let before = t.students.len();
        t.students.retain(|s| s.id != id);
        Ok(t.students.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(roll_no: &str, name: &str, course: &str) -> StudentInput {
        StudentInput {
            roll_no: roll_no.into(),
            name: name.into(),
            course: course.into(),
            email: format!("{}@school.test", roll_no.to_lowercase()),
            phone: String::new(),
            dob: None,
            address: String::new(),
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = MemoryRepository::new();
        repo.insert_student(&input("R1", "Ada", "Maths")).await.unwrap();
        repo.insert_student(&input("R2", "Grace", "CS")).await.unwrap();
        repo.insert_student(&input("R3", "Alan", "CS")).await.unwrap();

        let names: Vec<_> = repo
            .list_students(None)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Alan", "Grace", "Ada"]);
    }

    #[tokio::test]
    async fn search_filters_rows() {
        let repo = MemoryRepository::new();
        repo.insert_student(&input("R1", "Ada", "Maths")).await.unwrap();
        repo.insert_student(&input("R2", "Grace", "CS")).await.unwrap();

        let hits = repo.list_students(Some("cs")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Grace");
        assert!(repo.list_students(Some("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn roll_no_is_unique() {
        let repo = MemoryRepository::new();
        let a = repo.insert_student(&input("R1", "Ada", "Maths")).await.unwrap();
        let b = repo.insert_student(&input("R2", "Grace", "CS")).await.unwrap();

        assert!(repo.insert_student(&input("R1", "Other", "")).await.is_err());
        // updating a row to its own roll_no is fine, stealing another's is not
        assert!(repo.update_student(a.id, &input("R1", "Ada L.", "Maths")).await.unwrap());
        assert!(repo.update_student(b.id, &input("R1", "Grace", "CS")).await.is_err());
        assert_eq!(repo.list_students(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let repo = MemoryRepository::new();
        assert!(!repo.update_student(42, &input("R1", "Ada", "")).await.unwrap());
        assert!(!repo.delete_student(42).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_only_target() {
        let repo = MemoryRepository::new();
        let a = repo.insert_student(&input("R1", "Ada", "Maths")).await.unwrap();
        let b = repo.insert_student(&input("R2", "Grace", "CS")).await.unwrap();

        assert!(repo.delete_student(a.id).await.unwrap());
        let left = repo.list_students(None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b.id);
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let repo = MemoryRepository::new();
        repo.create_user("admin", "h").await.unwrap();
        assert!(repo.create_user("admin", "h2").await.is_err());
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }
}
