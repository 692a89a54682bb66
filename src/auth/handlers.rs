use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::LoginForm,
        password::verify_password,
        session::{self, SessionKeys},
    },
    error::AppError,
    flash::{self, Flash},
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

pub async fn login_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = flash::take(jar);
    (jar, views::login_page(notice, ""))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    let user = state.repo.find_user_by_username(username).await?;
    let verified = match &user {
        Some(u) => match verify_password(&form.password, &u.password_hash) {
            Ok(ok) => ok,
            Err(e) => {
                error!(error = %e, user_id = u.id, "stored password hash is unreadable");
                false
            }
        },
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        warn!(%username, "login rejected");
        return Ok(views::login_page(Some(Flash::InvalidCredentials), username).into_response());
    };

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.username)?;
    let jar = jar.add(keys.cookie(token));

    info!(user_id = user.id, "user logged in");
    Ok(flash::redirect(jar, Flash::Welcome, "/"))
}

pub async fn logout(jar: CookieJar) -> Response {
    let jar = session::clear(jar);
    flash::redirect(jar, Flash::LoggedOut, "/login")
}
