use std::sync::Arc;

use crate::{
    diagnostics::ArcStorageProbe,
    player::{ArcPlayerRepository, ArcPlayerService, PlayerServiceImpl},
    session::ArcSessionService,
    statistics::{ArcStatisticRepository, ArcStatisticsService, StatisticsServiceImpl},
    user::{ArcUserRepository, ArcUserService, UserServiceImpl},
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: ArcUserService,
    pub player_service: ArcPlayerService,
    pub statistics_service: ArcStatisticsService,
    pub session_service: ArcSessionService,

    pub storage_probe: ArcStorageProbe,
}

pub struct Repositories {
    pub user_repository: ArcUserRepository,
    pub player_repository: ArcPlayerRepository,
    pub statistic_repository: ArcStatisticRepository,
    pub storage_probe: ArcStorageProbe,
}

pub fn construct_app(repositories: Repositories, session_service: ArcSessionService) -> AppState {
    let user_service: ArcUserService = Arc::new(Box::new(UserServiceImpl::new(
        repositories.user_repository.clone(),
    )));
    build_app(repositories, session_service, user_service)
}

/// Same as [`construct_app`] with a cheap password hash cost, for tests and
/// tooling that create many accounts.
pub fn construct_app_with_hash_cost(
    repositories: Repositories,
    session_service: ArcSessionService,
    hash_cost: u32,
) -> AppState {
    let user_service: ArcUserService = Arc::new(Box::new(UserServiceImpl::with_hash_cost(
        repositories.user_repository.clone(),
        hash_cost,
    )));
    build_app(repositories, session_service, user_service)
}

fn build_app(
    repositories: Repositories,
    session_service: ArcSessionService,
    user_service: ArcUserService,
) -> AppState {
    let player_service: ArcPlayerService = Arc::new(Box::new(PlayerServiceImpl::new(
        repositories.player_repository.clone(),
    )));

    let statistics_service: ArcStatisticsService = Arc::new(Box::new(
        StatisticsServiceImpl::new(
            repositories.player_repository.clone(),
            repositories.statistic_repository.clone(),
        ),
    ));

    AppState {
        user_service,
        player_service,
        statistics_service,
        session_service,

        storage_probe: repositories.storage_probe,
    }
}
