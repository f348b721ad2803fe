use club_server_domain::{
    ServiceError, ServiceResult,
    statistics::{
        MatchStatistic, NewMatchStatistic, PlayerAggregate, StatisticRepository, TeamAverages,
    },
};
use sqlx::{
    Row,
    AnyPool,
    any::AnyRow,
};

use crate::{date_to_db, map_db_error};

// AVG yields NUMERIC on PostgreSQL, the cast keeps both backends on f64.
const TEAM_AVERAGES: &str = "SELECT \
    CAST(AVG(points_scored) AS DOUBLE PRECISION) AS avg_points, \
    CAST(AVG(rebounds) AS DOUBLE PRECISION) AS avg_rebounds, \
    CAST(AVG(assists) AS DOUBLE PRECISION) AS avg_assists \
    FROM match_statistics";

const PLAYER_AGGREGATES: &str = "SELECT p.id, p.first_name, p.last_name, \
    COUNT(s.id) AS games_played, \
    CAST(AVG(s.points_scored) AS DOUBLE PRECISION) AS avg_points, \
    CAST(AVG(s.rebounds) AS DOUBLE PRECISION) AS avg_rebounds, \
    CAST(AVG(s.assists) AS DOUBLE PRECISION) AS avg_assists, \
    CAST(AVG(s.minutes_played) AS DOUBLE PRECISION) AS avg_minutes \
    FROM players p LEFT JOIN match_statistics s ON s.player_id = p.id \
    GROUP BY p.id, p.first_name, p.last_name \
    ORDER BY p.id";

pub struct SqlStatisticRepository {
    pool: AnyPool,
}

impl SqlStatisticRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    fn aggregate_from_row(row: &AnyRow) -> sqlx::Result<PlayerAggregate> {
        Ok(PlayerAggregate {
            player_id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            games_played: row.try_get("games_played")?,
            avg_points: row.try_get("avg_points")?,
            avg_rebounds: row.try_get("avg_rebounds")?,
            avg_assists: row.try_get("avg_assists")?,
            avg_minutes: row.try_get("avg_minutes")?,
        })
    }
}

#[async_trait::async_trait]
impl StatisticRepository for SqlStatisticRepository {
    async fn create_statistic(&self, stat: &NewMatchStatistic) -> ServiceResult<MatchStatistic> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO match_statistics \
             (player_id, match_date, minutes_played, points_scored, rebounds, assists) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(stat.player_id)
        .bind(date_to_db(&stat.match_date))
        .bind(stat.minutes_played)
        .bind(stat.points_scored)
        .bind(stat.rebounds)
        .bind(stat.assists)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(MatchStatistic {
            id,
            player_id: stat.player_id,
            match_date: stat.match_date,
            minutes_played: stat.minutes_played,
            points_scored: stat.points_scored,
            rebounds: stat.rebounds,
            assists: stat.assists,
        })
    }

    async fn count_distinct_match_dates(&self) -> ServiceResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT match_date) FROM match_statistics")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn team_averages(&self) -> ServiceResult<TeamAverages> {
        let row = sqlx::query(TEAM_AVERAGES)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        let read = |e: sqlx::Error| ServiceError::Storage(e.to_string());
        Ok(TeamAverages {
            avg_points: row.try_get("avg_points").map_err(read)?,
            avg_rebounds: row.try_get("avg_rebounds").map_err(read)?,
            avg_assists: row.try_get("avg_assists").map_err(read)?,
        })
    }

    async fn player_aggregates(&self) -> ServiceResult<Vec<PlayerAggregate>> {
        let rows = sqlx::query(PLAYER_AGGREGATES)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter()
            .map(Self::aggregate_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use club_server_domain::player::{NewPlayer, PlayerId};

    use crate::test_database;

    use super::*;

    fn stat(player_id: PlayerId, day: u32, points: i64) -> NewMatchStatistic {
        NewMatchStatistic {
            player_id,
            match_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            minutes_played: 20 + day as i64,
            points_scored: points,
            rebounds: 4,
            assists: points / 5,
        }
    }

    async fn add_player(db: &crate::Database, first_name: &str) -> PlayerId {
        db.repositories()
            .player_repository
            .create_player(&NewPlayer {
                first_name: first_name.to_string(),
                last_name: "Tester".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2000, 6, 1).unwrap(),
                height: 1.85,
                position: "Forward".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_foreign_key_is_enforced() {
        let db = test_database().await;
        let repo = db.repositories().statistic_repository;

        assert!(matches!(
            repo.create_statistic(&stat(404, 1, 10)).await,
            Err(ServiceError::InvalidReference(_))
        ));
        assert_eq!(repo.count_distinct_match_dates().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_aggregates() {
        let db = test_database().await;
        let p1 = add_player(&db, "Ada").await;
        let repo = db.repositories().statistic_repository;

        assert_eq!(repo.count_distinct_match_dates().await.unwrap(), 0);
        assert_eq!(repo.team_averages().await.unwrap(), TeamAverages::default());

        let aggregates = repo.player_aggregates().await.unwrap();
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].player_id, p1);
        assert_eq!(aggregates[0].games_played, 0);
        assert_eq!(aggregates[0].avg_points, None);
    }

    #[tokio::test]
    async fn test_aggregates() {
        let db = test_database().await;
        let p1 = add_player(&db, "Ada").await;
        let p2 = add_player(&db, "Bea").await;
        let repo = db.repositories().statistic_repository;

        for new_stat in [
            stat(p1, 1, 10),
            stat(p1, 2, 20),
            stat(p1, 3, 30),
            stat(p2, 3, 5),
            stat(p2, 4, 15),
        ] {
            let created = repo.create_statistic(&new_stat).await.unwrap();
            assert_eq!(created.match_date, new_stat.match_date);
        }

        assert_eq!(repo.count_distinct_match_dates().await.unwrap(), 4);

        let team = repo.team_averages().await.unwrap();
        assert_eq!(team.avg_points, Some(16.0));
        assert_eq!(team.avg_rebounds, Some(4.0));
        assert_eq!(team.avg_assists, Some(3.2));

        let aggregates = repo.player_aggregates().await.unwrap();
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].player_id, p1);
        assert_eq!(aggregates[0].games_played, 3);
        assert_eq!(aggregates[0].avg_points, Some(20.0));
        assert_eq!(aggregates[0].avg_minutes, Some(22.0));
        assert_eq!(aggregates[1].player_id, p2);
        assert_eq!(aggregates[1].games_played, 2);
        assert_eq!(aggregates[1].avg_points, Some(10.0));
        assert_eq!(aggregates[1].avg_assists, Some(2.0));
    }
}
