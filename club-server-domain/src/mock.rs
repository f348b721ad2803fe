use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    ServiceError, ServiceResult,
    player::{NewPlayer, Player, PlayerId, PlayerRepository},
    statistics::{
        MatchStatistic, NewMatchStatistic, PlayerAggregate, StatisticRepository, TeamAverages,
    },
    user::{NewUser, User, UserRepository},
};

#[derive(Default)]
struct MockData {
    users: Vec<User>,
    players: Vec<Player>,
    statistics: Vec<MatchStatistic>,
}

/// In-memory stand-in for all repositories, mirroring the storage
/// constraints (unique users, player foreign key).
#[derive(Default, Clone)]
pub struct MockStore {
    data: Arc<Mutex<MockData>>,
}

impl MockStore {
    fn lock(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().expect("mock store poisoned")
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn player_count(&self) -> usize {
        self.lock().players.len()
    }

    pub fn statistic_count(&self) -> usize {
        self.lock().statistics.len()
    }
}

fn average(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0i64), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

#[async_trait::async_trait]
impl UserRepository for MockStore {
    async fn create_user(&self, user: &NewUser) -> ServiceResult<User> {
        let mut data = self.lock();
        if data.users.iter().any(|u| u.username == user.username) {
            return Err(ServiceError::DuplicateUser);
        }
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(ServiceError::DuplicateEmail);
        }
        let user = User {
            id: data.users.len() as i64 + 1,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        };
        data.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockStore {
    async fn create_player(&self, player: &NewPlayer) -> ServiceResult<Player> {
        let mut data = self.lock();
        let player = Player {
            id: data.players.len() as i64 + 1,
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
            date_of_birth: player.date_of_birth,
            height: player.height,
            position: player.position.clone(),
        };
        data.players.push(player.clone());
        Ok(player)
    }

    async fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        Ok(self.lock().players.iter().find(|p| p.id == id).cloned())
    }

    async fn get_players(&self) -> ServiceResult<Vec<Player>> {
        Ok(self.lock().players.clone())
    }
}

#[async_trait::async_trait]
impl StatisticRepository for MockStore {
    async fn create_statistic(&self, stat: &NewMatchStatistic) -> ServiceResult<MatchStatistic> {
        let mut data = self.lock();
        if !data.players.iter().any(|p| p.id == stat.player_id) {
            return ServiceError::invalid_reference("foreign key constraint failed");
        }
        let stat = MatchStatistic {
            id: data.statistics.len() as i64 + 1,
            player_id: stat.player_id,
            match_date: stat.match_date,
            minutes_played: stat.minutes_played,
            points_scored: stat.points_scored,
            rebounds: stat.rebounds,
            assists: stat.assists,
        };
        data.statistics.push(stat.clone());
        Ok(stat)
    }

    async fn count_distinct_match_dates(&self) -> ServiceResult<i64> {
        let data = self.lock();
        let dates: HashSet<_> = data.statistics.iter().map(|s| s.match_date).collect();
        Ok(dates.len() as i64)
    }

    async fn team_averages(&self) -> ServiceResult<TeamAverages> {
        let data = self.lock();
        let stats = &data.statistics;
        Ok(TeamAverages {
            avg_points: average(stats.iter().map(|s| s.points_scored)),
            avg_rebounds: average(stats.iter().map(|s| s.rebounds)),
            avg_assists: average(stats.iter().map(|s| s.assists)),
        })
    }

    async fn player_aggregates(&self) -> ServiceResult<Vec<PlayerAggregate>> {
        let data = self.lock();
        Ok(data
            .players
            .iter()
            .map(|player| {
                let rows = || data.statistics.iter().filter(|s| s.player_id == player.id);
                PlayerAggregate {
                    player_id: player.id,
                    first_name: player.first_name.clone(),
                    last_name: player.last_name.clone(),
                    games_played: rows().count() as i64,
                    avg_points: average(rows().map(|s| s.points_scored)),
                    avg_rebounds: average(rows().map(|s| s.rebounds)),
                    avg_assists: average(rows().map(|s| s.assists)),
                    avg_minutes: average(rows().map(|s| s.minutes_played)),
                }
            })
            .collect())
    }
}
