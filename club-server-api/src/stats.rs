use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use club_server_domain::{
    app::AppState,
    statistics::{MatchStatisticForm, TeamStatistics},
};

use crate::{
    error::{ApiResult, form_input, found},
    pages,
    session::Session,
};

pub async fn add_match_statistic_form(
    State(app): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<Response> {
    let players = app.player_service.list_players(&ctx).await?;
    let user = ctx.require_user()?;
    let page =
        pages::add_match_statistic_page(user, &players, None, &MatchStatisticForm::default());
    Ok(page.into_response())
}

pub async fn add_match_statistic(
    State(app): State<AppState>,
    Session(ctx): Session,
    form: Result<Form<MatchStatisticForm>, FormRejection>,
) -> ApiResult<Response> {
    ctx.require_user()?;
    let form = form_input(form)?;
    match app.statistics_service.add_match_statistic(&ctx, &form).await {
        Ok(_) => Ok(found("/dashboard")),
        Err(e) if e.is_recoverable() => {
            let players = app.player_service.list_players(&ctx).await?;
            let user = ctx.require_user()?;
            let page = pages::add_match_statistic_page(user, &players, Some(&e.to_string()), &form);
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn team_statistics(
    State(app): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<Response> {
    let stats = app.statistics_service.team_statistics(&ctx).await?;
    let user = ctx.require_user()?;
    Ok(pages::team_statistics_page(user, &stats).into_response())
}

pub async fn team_statistics_json(
    State(app): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<Json<TeamStatistics>> {
    Ok(Json(app.statistics_service.team_statistics(&ctx).await?))
}
