use axum::{
    Form,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use club_server_domain::{ServiceError, app::AppState, session::SessionUser};
use log::{debug, info};
use serde::Deserialize;

use crate::{
    error::{ApiResult, found},
    pages,
    session::{Session, clear_session_cookie, session_cookie},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    username: String,
    email: String,
    password: String,
}

pub async fn login_form() -> impl IntoResponse {
    pages::login_page(None, "")
}

pub async fn login(State(app): State<AppState>, Form(form): Form<LoginForm>) -> ApiResult<Response> {
    let user = match app
        .user_service
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e @ ServiceError::InvalidCredentials) => {
            let page = pages::login_page(Some(&e.to_string()), &form.username);
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let session_user = SessionUser {
        user_id: user.id,
        username: user.username,
    };
    let token = app.session_service.issue_token(&session_user)?;
    debug!("Issued session for {}", session_user.username);

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/dashboard".to_string()),
            (header::SET_COOKIE, session_cookie(&token)),
        ],
    )
        .into_response())
}

pub async fn signup_form() -> impl IntoResponse {
    pages::signup_page(None, "", "")
}

pub async fn signup(
    State(app): State<AppState>,
    Form(form): Form<SignupForm>,
) -> ApiResult<Response> {
    match app
        .user_service
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(_) => Ok(found("/login")),
        Err(e) if e.is_recoverable() => {
            let page = pages::signup_page(Some(&e.to_string()), &form.username, &form.email);
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(Session(ctx): Session) -> ApiResult<Response> {
    let user = ctx.require_user()?;
    info!("User {} logged out", user.username);
    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, clear_session_cookie()),
        ],
    )
        .into_response())
}
