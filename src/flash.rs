//! One-shot notices shown on the next rendered page.
//!
//! A notice survives a redirect as a short key in the `rollbook_flash` cookie;
//! the page that renders it removes the cookie.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const FLASH_COOKIE: &str = "rollbook_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    LoginRequired,
    Welcome,
    InvalidCredentials,
    LoggedOut,
    RequiredFields,
    InvalidDob,
    StudentAdded,
    StudentUpdated,
    StudentNotFound,
    StudentDeleted,
}

const ALL: [Flash; 10] = [
    Flash::LoginRequired,
    Flash::Welcome,
    Flash::InvalidCredentials,
    Flash::LoggedOut,
    Flash::RequiredFields,
    Flash::InvalidDob,
    Flash::StudentAdded,
    Flash::StudentUpdated,
    Flash::StudentNotFound,
    Flash::StudentDeleted,
];

impl Flash {
    pub fn level(self) -> Level {
        match self {
            Flash::Welcome | Flash::StudentAdded | Flash::StudentUpdated => Level::Success,
            Flash::LoggedOut | Flash::StudentDeleted => Level::Info,
            Flash::LoginRequired | Flash::RequiredFields | Flash::InvalidDob => Level::Warning,
            Flash::InvalidCredentials | Flash::StudentNotFound => Level::Danger,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::LoginRequired => "Please log in to continue.",
            Flash::Welcome => "Welcome back!",
            Flash::InvalidCredentials => "Invalid username or password.",
            Flash::LoggedOut => "Logged out.",
            Flash::RequiredFields => "Roll No and Name are required.",
            Flash::InvalidDob => "Date of birth must be YYYY-MM-DD.",
            Flash::StudentAdded => "Student added successfully.",
            Flash::StudentUpdated => "Student updated.",
            Flash::StudentNotFound => "Student not found.",
            Flash::StudentDeleted => "Student deleted.",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Flash::LoginRequired => "login_required",
            Flash::Welcome => "welcome",
            Flash::InvalidCredentials => "invalid_credentials",
            Flash::LoggedOut => "logged_out",
            Flash::RequiredFields => "required_fields",
            Flash::InvalidDob => "invalid_dob",
            Flash::StudentAdded => "student_added",
            Flash::StudentUpdated => "student_updated",
            Flash::StudentNotFound => "student_not_found",
            Flash::StudentDeleted => "student_deleted",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        ALL.into_iter().find(|f| f.key() == key)
    }
}

pub fn set(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.key()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Read the pending notice, if any, and clear it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(flash) = jar.get(FLASH_COOKIE).map(|c| Flash::from_key(c.value())) else {
        return (jar, None);
    };
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}

/// `303 See Other` to `to`, carrying `flash` along.
pub fn redirect(jar: CookieJar, flash: Flash, to: &str) -> Response {
    (set(jar, flash), Redirect::to(to)).into_response()
}
