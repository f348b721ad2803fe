use club_server_domain::{
    ServiceError, ServiceResult,
    player::{NewPlayer, Player, PlayerId, PlayerRepository},
};
use sqlx::{
    Row,
    AnyPool,
    any::AnyRow,
};

use crate::{date_from_db, date_to_db, map_db_error};

const PLAYER_COLUMNS: &str = "id, first_name, last_name, date_of_birth, height, position";

pub struct SqlPlayerRepository {
    pool: AnyPool,
}

impl SqlPlayerRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    fn player_from_row(row: &AnyRow) -> ServiceResult<Player> {
        let read = |e: sqlx::Error| ServiceError::Storage(e.to_string());
        let date_of_birth: String = row.try_get("date_of_birth").map_err(read)?;
        Ok(Player {
            id: row.try_get("id").map_err(read)?,
            first_name: row.try_get("first_name").map_err(read)?,
            last_name: row.try_get("last_name").map_err(read)?,
            date_of_birth: date_from_db(&date_of_birth)?,
            height: row.try_get("height").map_err(read)?,
            position: row.try_get("position").map_err(read)?,
        })
    }
}

#[async_trait::async_trait]
impl PlayerRepository for SqlPlayerRepository {
    async fn create_player(&self, player: &NewPlayer) -> ServiceResult<Player> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO players (first_name, last_name, date_of_birth, height, position) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(date_to_db(&player.date_of_birth))
        .bind(player.height)
        .bind(&player.position)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Player {
            id,
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
            date_of_birth: player.date_of_birth,
            height: player.height,
            position: player.position.clone(),
        })
    }

    async fn get_player(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        let row = sqlx::query(&format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.as_ref().map(Self::player_from_row).transpose()
    }

    async fn get_players(&self) -> ServiceResult<Vec<Player>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM players ORDER BY last_name, first_name, id",
            PLAYER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;
        rows.iter().map(Self::player_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::test_database;

    use super::*;

    fn new_player(first_name: &str, last_name: &str) -> NewPlayer {
        NewPlayer {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2005, 3, 14).unwrap(),
            height: 1.91,
            position: "Center".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_players() {
        let db = test_database().await;
        let repo = db.repositories().player_repository;

        let zed = repo.create_player(&new_player("Zed", "Young")).await.unwrap();
        let ada = repo.create_player(&new_player("Ada", "Baker")).await.unwrap();
        assert_ne!(zed.id, ada.id);

        let fetched = repo.get_player(ada.id).await.unwrap().unwrap();
        assert_eq!(fetched, ada);
        assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(2005, 3, 14).unwrap());
        assert_eq!(fetched.height, 1.91);

        let players = repo.get_players().await.unwrap();
        assert_eq!(players, vec![ada, zed]);
        assert!(repo.get_player(999).await.unwrap().is_none());
    }
}
