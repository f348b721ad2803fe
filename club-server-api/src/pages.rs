use axum::response::Html;
use chrono::NaiveDate;
use club_server_domain::{
    player::{Player, PlayerForm},
    session::SessionUser,
    statistics::{MatchStatisticForm, TeamStatistics},
};

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, user: Option<&SessionUser>, content: &str) -> Html<String> {
    let nav = match user {
        Some(user) => format!(
            "<a href=\"/dashboard\">Dashboard</a> | \
             <a href=\"/add_player\">Add player</a> | \
             <a href=\"/add_match_statistic\">Add statistic</a> | \
             <a href=\"/team_statistics\">Team statistics</a> | \
             <a href=\"/logout\">Log out {}</a>",
            escape(&user.username)
        ),
        None => "<a href=\"/login\">Log in</a> | <a href=\"/signup\">Sign up</a>".to_string(),
    };
    Html(format!(
        "<!DOCTYPE html>\n\
         <html>\n<head><meta charset=\"utf-8\"><title>{} - Basketball Club</title></head>\n\
         <body>\n<nav><a href=\"/\">Basketball Club</a> | {}</nav>\n\
         <main>\n<h1>{}</h1>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        nav,
        escape(title),
        content
    ))
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default()
}

fn input(label: &str, name: &str, kind: &str, value: &str) -> String {
    format!(
        "<label>{} <input type=\"{}\" name=\"{}\" value=\"{}\" required></label><br>",
        escape(label),
        kind,
        name,
        escape(value)
    )
}

pub fn landing_page(user: Option<&SessionUser>) -> Html<String> {
    let content = match user {
        Some(user) => format!(
            "<p>Welcome back, {}. Head to the <a href=\"/dashboard\">dashboard</a>.</p>",
            escape(&user.username)
        ),
        None => "<p>Track the club roster and match statistics. \
                 <a href=\"/login\">Log in</a> or <a href=\"/signup\">create an account</a>.</p>"
            .to_string(),
    };
    layout("Welcome", user, &content)
}

pub fn login_page(error: Option<&str>, username: &str) -> Html<String> {
    let content = format!(
        "{}<form method=\"post\" action=\"/login\">{}{}<button type=\"submit\">Log in</button></form>",
        error_block(error),
        input("Username", "username", "text", username),
        input("Password", "password", "password", ""),
    );
    layout("Log in", None, &content)
}

pub fn signup_page(error: Option<&str>, username: &str, email: &str) -> Html<String> {
    let content = format!(
        "{}<form method=\"post\" action=\"/signup\">{}{}{}<button type=\"submit\">Sign up</button></form>",
        error_block(error),
        input("Username", "username", "text", username),
        input("Email", "email", "email", email),
        input("Password", "password", "password", ""),
    );
    layout("Sign up", None, &content)
}

pub fn dashboard_page(user: &SessionUser, players: &[Player], today: NaiveDate) -> Html<String> {
    let content = if players.is_empty() {
        "<p>No players yet. <a href=\"/add_player\">Add the first one</a>.</p>".to_string()
    } else {
        let rows: String = players
            .iter()
            .map(|p| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                    escape(&p.full_name()),
                    p.date_of_birth,
                    p.age_on(today),
                    p.height,
                    escape(&p.position)
                )
            })
            .collect();
        format!(
            "<table>\n<tr><th>Name</th><th>Date of birth</th><th>Age</th><th>Height (m)</th><th>Position</th></tr>\n{}\n</table>",
            rows
        )
    };
    layout("Dashboard", Some(user), &content)
}

pub fn add_player_page(user: &SessionUser, error: Option<&str>, form: &PlayerForm) -> Html<String> {
    let content = format!(
        "{}<form method=\"post\" action=\"/add_player\">{}{}{}{}{}<button type=\"submit\">Add player</button></form>",
        error_block(error),
        input("First name", "first_name", "text", &form.first_name),
        input("Last name", "last_name", "text", &form.last_name),
        input("Date of birth", "date_of_birth", "date", &form.date_of_birth),
        input("Height (m)", "height", "number\" step=\"0.01", &form.height),
        input("Position", "position", "text", &form.position),
    );
    layout("Add player", Some(user), &content)
}

pub fn add_match_statistic_page(
    user: &SessionUser,
    players: &[Player],
    error: Option<&str>,
    form: &MatchStatisticForm,
) -> Html<String> {
    let options: String = players
        .iter()
        .map(|p| {
            let selected = if p.id.to_string() == form.player_id {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{}>{}</option>",
                p.id,
                selected,
                escape(&p.full_name())
            )
        })
        .collect();
    let content = format!(
        "{}<form method=\"post\" action=\"/add_match_statistic\">\
         <label>Player <select name=\"player_id\" required>{}</select></label><br>\
         {}{}{}{}{}<button type=\"submit\">Add statistic</button></form>",
        error_block(error),
        options,
        input("Match date", "match_date", "date", &form.match_date),
        input("Minutes played", "minutes_played", "number", &form.minutes_played),
        input("Points scored", "points_scored", "number", &form.points_scored),
        input("Rebounds", "rebounds", "number", &form.rebounds),
        input("Assists", "assists", "number", &form.assists),
    );
    layout("Add match statistic", Some(user), &content)
}

pub fn team_statistics_page(user: &SessionUser, stats: &TeamStatistics) -> Html<String> {
    let rows: String = stats
        .player_stats
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td></tr>",
                escape(&s.player_name),
                s.games_played,
                s.avg_points,
                s.avg_rebounds,
                s.avg_assists,
                s.avg_minutes
            )
        })
        .collect();
    let content = format!(
        "<section><p>Total games: {}</p>\
         <p>Average points: {:.1}</p><p>Average rebounds: {:.1}</p><p>Average assists: {:.1}</p></section>\n\
         <table>\n<tr><th>Player</th><th>Games</th><th>Points</th><th>Rebounds</th><th>Assists</th><th>Minutes</th></tr>\n{}\n</table>",
        stats.total_games, stats.avg_points, stats.avg_rebounds, stats.avg_assists, rows
    );
    layout("Team statistics", Some(user), &content)
}
