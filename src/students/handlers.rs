use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::AuthSession,
    error::AppError,
    flash::{self, Flash},
    state::AppState,
    students::dto::{SearchQuery, StudentForm},
    views::{self, FormMode},
};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/add", get(add_form).post(add_student))
        .route("/edit/:id", get(edit_form).post(edit_student))
        .route("/delete/:id", post(delete_student))
}

#[instrument(skip(state, session, jar))]
pub async fn list_students(
    State(state): State<AppState>,
    session: AuthSession,
    jar: CookieJar,
    Query(query): Query<SearchQuery>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let students = state.repo.list_students(query.term()).await?;
    let (jar, notice) = flash::take(jar);
    let page = views::student_list(
        notice,
        &session.username,
        &students,
        query.term().unwrap_or_default(),
    );
    Ok((jar, page))
}

pub async fn add_form(_session: AuthSession, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = flash::take(jar);
    (
        jar,
        views::student_form(notice, FormMode::Add, &StudentForm::default()),
    )
}

#[instrument(skip_all, fields(user_id = session.user_id))]
pub async fn add_student(
    State(state): State<AppState>,
    session: AuthSession,
    jar: CookieJar,
    Form(form): Form<StudentForm>,
) -> Result<Response, AppError> {
    let form = form.trimmed();
    let input = match form.validate() {
        Ok(input) => input,
        Err(notice) => {
            warn!(?notice, "add rejected");
            return Ok(views::student_form(Some(notice), FormMode::Add, &form).into_response());
        }
    };

    let student = state.repo.insert_student(&input).await?;
    info!(student_id = student.id, roll_no = %student.roll_no, "student added");
    Ok(flash::redirect(jar, Flash::StudentAdded, "/"))
}

#[instrument(skip(state, _session, jar))]
pub async fn edit_form(
    State(state): State<AppState>,
    _session: AuthSession,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let Some(student) = state.repo.get_student(id).await? else {
        warn!("student not found");
        return Ok(flash::redirect(jar, Flash::StudentNotFound, "/"));
    };
    let (jar, notice) = flash::take(jar);
    let page = views::student_form(notice, FormMode::Edit(id), &StudentForm::from(&student));
    Ok((jar, page).into_response())
}

#[instrument(skip_all, fields(user_id = session.user_id, student_id = id))]
pub async fn edit_student(
    State(state): State<AppState>,
    session: AuthSession,
    jar: CookieJar,
    Path(id): Path<i32>,
    Form(form): Form<StudentForm>,
) -> Result<Response, AppError> {
    if state.repo.get_student(id).await?.is_none() {
        warn!("student not found");
        return Ok(flash::redirect(jar, Flash::StudentNotFound, "/"));
    }

    let form = form.trimmed();
    let input = match form.validate() {
        Ok(input) => input,
        Err(notice) => {
            warn!(?notice, "edit rejected");
            return Ok(views::student_form(Some(notice), FormMode::Edit(id), &form).into_response());
        }
    };

    // the row can vanish between the lookup and the update
    if !state.repo.update_student(id, &input).await? {
        warn!("student deleted before update");
        return Ok(flash::redirect(jar, Flash::StudentNotFound, "/"));
    }
    info!("student updated");
    Ok(flash::redirect(jar, Flash::StudentUpdated, "/"))
}

#[instrument(skip_all, fields(user_id = session.user_id, student_id = id))]
pub async fn delete_student(
    State(state): State<AppState>,
    session: AuthSession,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let removed = state.repo.delete_student(id).await?;
    info!(removed, "student delete");
    Ok(flash::redirect(jar, Flash::StudentDeleted, "/"))
}
