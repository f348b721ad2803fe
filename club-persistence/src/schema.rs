use crate::config::Backend;

const SQLITE_SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        date_of_birth TEXT NOT NULL,
        height REAL NOT NULL,
        position TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS match_statistics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        player_id INTEGER NOT NULL REFERENCES players(id),
        match_date TEXT NOT NULL,
        minutes_played INTEGER NOT NULL,
        points_scored INTEGER NOT NULL,
        rebounds INTEGER NOT NULL,
        assists INTEGER NOT NULL
    )",
];

const POSTGRES_SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(80) NOT NULL UNIQUE,
        email VARCHAR(120) NOT NULL UNIQUE,
        password_hash VARCHAR(128) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS players (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(50) NOT NULL,
        last_name VARCHAR(50) NOT NULL,
        date_of_birth VARCHAR(10) NOT NULL,
        height DOUBLE PRECISION NOT NULL,
        position VARCHAR(20) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS match_statistics (
        id BIGSERIAL PRIMARY KEY,
        player_id BIGINT NOT NULL REFERENCES players(id),
        match_date VARCHAR(10) NOT NULL,
        minutes_played BIGINT NOT NULL,
        points_scored BIGINT NOT NULL,
        rebounds BIGINT NOT NULL,
        assists BIGINT NOT NULL
    )",
];

/// Table definitions in creation order. Dates are ISO `YYYY-MM-DD` text.
pub fn statements(backend: Backend) -> &'static [&'static str] {
    match backend {
        Backend::Sqlite => &SQLITE_SCHEMA,
        Backend::Postgres => &POSTGRES_SCHEMA,
    }
}
