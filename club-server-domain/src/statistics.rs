use std::sync::Arc;

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    ServiceError, ServiceResult,
    player::{ArcPlayerRepository, PlayerId},
    session::RequestContext,
    util::{parse_count, parse_date, parse_number},
};

pub type MatchStatisticId = i64;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchStatistic {
    pub id: MatchStatisticId,
    pub player_id: PlayerId,
    pub match_date: NaiveDate,
    pub minutes_played: i64,
    pub points_scored: i64,
    pub rebounds: i64,
    pub assists: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMatchStatistic {
    pub player_id: PlayerId,
    pub match_date: NaiveDate,
    pub minutes_played: i64,
    pub points_scored: i64,
    pub rebounds: i64,
    pub assists: i64,
}

/// Raw "add match statistic" input as submitted by a form.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MatchStatisticForm {
    pub player_id: String,
    pub match_date: String,
    pub minutes_played: String,
    pub points_scored: String,
    pub rebounds: String,
    pub assists: String,
}

impl MatchStatisticForm {
    pub fn parse(&self) -> ServiceResult<NewMatchStatistic> {
        Ok(NewMatchStatistic {
            player_id: parse_number("Player", &self.player_id)?,
            match_date: parse_date("Match date", &self.match_date)?,
            minutes_played: parse_count("Minutes played", &self.minutes_played)?,
            points_scored: parse_count("Points scored", &self.points_scored)?,
            rebounds: parse_count("Rebounds", &self.rebounds)?,
            assists: parse_count("Assists", &self.assists)?,
        })
    }
}

/// Averages over every statistic row. `None` when there are no rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeamAverages {
    pub avg_points: Option<f64>,
    pub avg_rebounds: Option<f64>,
    pub avg_assists: Option<f64>,
}

/// Per-player aggregate as produced by storage, one entry per player
/// including players without any statistic rows.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerAggregate {
    pub player_id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub games_played: i64,
    pub avg_points: Option<f64>,
    pub avg_rebounds: Option<f64>,
    pub avg_assists: Option<f64>,
    pub avg_minutes: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerStatLine {
    pub player_id: PlayerId,
    pub player_name: String,
    pub games_played: i64,
    pub avg_points: f64,
    pub avg_rebounds: f64,
    pub avg_assists: f64,
    pub avg_minutes: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamStatistics {
    pub total_games: i64,
    pub avg_points: f64,
    pub avg_rebounds: f64,
    pub avg_assists: f64,
    pub player_stats: Vec<PlayerStatLine>,
}

impl TeamStatistics {
    /// Drops players without games, fills missing averages with 0 and orders
    /// the remaining players by average points, best first. The sort is
    /// stable so equal averages keep the storage order.
    pub fn summarize(
        total_games: i64,
        team: TeamAverages,
        players: Vec<PlayerAggregate>,
    ) -> Self {
        let mut player_stats: Vec<PlayerStatLine> = players
            .into_iter()
            .filter(|p| p.games_played > 0)
            .map(|p| PlayerStatLine {
                player_id: p.player_id,
                player_name: format!("{} {}", p.first_name, p.last_name),
                games_played: p.games_played,
                avg_points: p.avg_points.unwrap_or(0.0),
                avg_rebounds: p.avg_rebounds.unwrap_or(0.0),
                avg_assists: p.avg_assists.unwrap_or(0.0),
                avg_minutes: p.avg_minutes.unwrap_or(0.0),
            })
            .collect();
        player_stats.sort_by(|a, b| b.avg_points.total_cmp(&a.avg_points));

        Self {
            total_games,
            avg_points: team.avg_points.unwrap_or(0.0),
            avg_rebounds: team.avg_rebounds.unwrap_or(0.0),
            avg_assists: team.avg_assists.unwrap_or(0.0),
            player_stats,
        }
    }
}

pub type ArcStatisticRepository = Arc<Box<dyn StatisticRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait StatisticRepository {
    async fn create_statistic(&self, stat: &NewMatchStatistic) -> ServiceResult<MatchStatistic>;
    async fn count_distinct_match_dates(&self) -> ServiceResult<i64>;
    async fn team_averages(&self) -> ServiceResult<TeamAverages>;
    async fn player_aggregates(&self) -> ServiceResult<Vec<PlayerAggregate>>;
}

pub type ArcStatisticsService = Arc<Box<dyn StatisticsService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait StatisticsService {
    async fn add_match_statistic(
        &self,
        ctx: &RequestContext,
        form: &MatchStatisticForm,
    ) -> ServiceResult<MatchStatistic>;
    async fn team_statistics(&self, ctx: &RequestContext) -> ServiceResult<TeamStatistics>;
}

pub struct StatisticsServiceImpl {
    player_repository: ArcPlayerRepository,
    statistic_repository: ArcStatisticRepository,
}

impl StatisticsServiceImpl {
    pub fn new(
        player_repository: ArcPlayerRepository,
        statistic_repository: ArcStatisticRepository,
    ) -> Self {
        Self {
            player_repository,
            statistic_repository,
        }
    }
}

#[async_trait::async_trait]
impl StatisticsService for StatisticsServiceImpl {
    async fn add_match_statistic(
        &self,
        ctx: &RequestContext,
        form: &MatchStatisticForm,
    ) -> ServiceResult<MatchStatistic> {
        let user = ctx.require_user()?;
        let new_stat = form.parse()?;
        if self
            .player_repository
            .get_player(new_stat.player_id)
            .await?
            .is_none()
        {
            return ServiceError::invalid_reference(format!(
                "Player {} does not exist",
                new_stat.player_id
            ));
        }
        let stat = self.statistic_repository.create_statistic(&new_stat).await?;
        info!(
            "User {} recorded statistic {} for player {} on {}",
            user.username, stat.id, stat.player_id, stat.match_date
        );
        Ok(stat)
    }

    async fn team_statistics(&self, ctx: &RequestContext) -> ServiceResult<TeamStatistics> {
        ctx.require_user()?;
        let total_games = self.statistic_repository.count_distinct_match_dates().await?;
        let team = self.statistic_repository.team_averages().await?;
        let players = self.statistic_repository.player_aggregates().await?;
        Ok(TeamStatistics::summarize(total_games, team, players))
    }
}
