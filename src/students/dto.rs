use serde::Deserialize;
use time::{macros::format_description, Date};

use crate::{flash::Flash, students::repo_types::{Student, StudentInput}};

fn parse_dob(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
}

fn format_dob(d: Date) -> String {
    d.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Raw add/edit form. Also the value set a re-rendered form is filled from.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct StudentForm {
    #[serde(default)]
    pub roll_no: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub address: String,
}

impl StudentForm {
    pub fn trimmed(self) -> Self {
        fn t(s: String) -> String {
            s.trim().to_owned()
        }
        Self {
            roll_no: t(self.roll_no),
            name: t(self.name),
            course: t(self.course),
            email: t(self.email),
            phone: t(self.phone),
            dob: t(self.dob),
            address: t(self.address),
        }
    }

    /// Expects an already trimmed form.
    pub fn validate(&self) -> Result<StudentInput, Flash> {
        if self.roll_no.is_empty() || self.name.is_empty() {
            return Err(Flash::RequiredFields);
        }
        let dob = if self.dob.is_empty() {
            None
        } else {
            Some(parse_dob(&self.dob).map_err(|_| Flash::InvalidDob)?)
        };
        Ok(StudentInput {
            roll_no: self.roll_no.clone(),
            name: self.name.clone(),
            course: self.course.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            dob,
            address: self.address.clone(),
        })
    }
}

impl From<&Student> for StudentForm {
    fn from(s: &Student) -> Self {
        Self {
            roll_no: s.roll_no.clone(),
            name: s.name.clone(),
            course: s.course.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
            dob: s.dob.map(format_dob).unwrap_or_default(),
            address: s.address.clone().unwrap_or_default(),
        }
    }
}

/// `GET /?q=`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

impl SearchQuery {
    pub fn term(&self) -> Option<&str> {
        Some(self.q.trim()).filter(|q| !q.is_empty())
    }
}
