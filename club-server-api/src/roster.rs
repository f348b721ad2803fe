use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Local;
use club_server_domain::{
    app::AppState,
    player::{Player, PlayerForm},
};

use crate::{
    error::{ApiResult, form_input, found},
    pages,
    session::Session,
};

pub async fn dashboard(State(app): State<AppState>, Session(ctx): Session) -> ApiResult<Response> {
    let players = app.player_service.list_players(&ctx).await?;
    let user = ctx.require_user()?;
    Ok(pages::dashboard_page(user, &players, Local::now().date_naive()).into_response())
}

pub async fn add_player_form(Session(ctx): Session) -> ApiResult<Response> {
    let user = ctx.require_user()?;
    Ok(pages::add_player_page(user, None, &PlayerForm::default()).into_response())
}

pub async fn add_player(
    State(app): State<AppState>,
    Session(ctx): Session,
    form: Result<Form<PlayerForm>, FormRejection>,
) -> ApiResult<Response> {
    ctx.require_user()?;
    let form = form_input(form)?;
    match app.player_service.add_player(&ctx, &form).await {
        Ok(_) => Ok(found("/dashboard")),
        Err(e) if e.is_recoverable() => {
            let user = ctx.require_user()?;
            let page = pages::add_player_page(user, Some(&e.to_string()), &form);
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn players_json(
    State(app): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<Json<Vec<Player>>> {
    let players = app.player_service.list_players(&ctx).await?;
    Ok(Json(players))
}
