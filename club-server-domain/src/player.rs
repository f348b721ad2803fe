use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    ServiceError, ServiceResult,
    session::RequestContext,
    util::{parse_date, parse_number, required_text},
};

pub type PlayerId = i64;

const MAX_NAME_LEN: usize = 50;
const MAX_POSITION_LEN: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub height: f64,
    pub position: String,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in completed years on the given day.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.date_of_birth.year();
        if (today.month(), today.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub height: f64,
    pub position: String,
}

/// Raw "add player" input as submitted by a form.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlayerForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub height: String,
    pub position: String,
}

impl PlayerForm {
    pub fn parse(&self) -> ServiceResult<NewPlayer> {
        let height: f64 = parse_number("Height", &self.height)?;
        if !height.is_finite() || height <= 0.0 {
            return ServiceError::validation("Height must be a positive number");
        }
        Ok(NewPlayer {
            first_name: required_text("First name", &self.first_name, MAX_NAME_LEN)?,
            last_name: required_text("Last name", &self.last_name, MAX_NAME_LEN)?,
            date_of_birth: parse_date("Date of birth", &self.date_of_birth)?,
            height,
            position: required_text("Position", &self.position, MAX_POSITION_LEN)?,
        })
    }
}

pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, player: &NewPlayer) -> ServiceResult<Player>;
    async fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>>;
    async fn get_players(&self) -> ServiceResult<Vec<Player>>;
}

pub type ArcPlayerService = Arc<Box<dyn PlayerService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerService {
    async fn add_player(&self, ctx: &RequestContext, form: &PlayerForm) -> ServiceResult<Player>;
    async fn list_players(&self, ctx: &RequestContext) -> ServiceResult<Vec<Player>>;
}

pub struct PlayerServiceImpl {
    player_repository: ArcPlayerRepository,
}

impl PlayerServiceImpl {
    pub fn new(player_repository: ArcPlayerRepository) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl PlayerService for PlayerServiceImpl {
    async fn add_player(&self, ctx: &RequestContext, form: &PlayerForm) -> ServiceResult<Player> {
        let user = ctx.require_user()?;
        let new_player = form.parse()?;
        let player = self.player_repository.create_player(&new_player).await?;
        info!(
            "User {} added player {} (id {})",
            user.username,
            player.full_name(),
            player.id
        );
        Ok(player)
    }

    async fn list_players(&self, ctx: &RequestContext) -> ServiceResult<Vec<Player>> {
        ctx.require_user()?;
        self.player_repository.get_players().await
    }
}
