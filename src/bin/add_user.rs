use club_persistence::{Database, config::database_url_from_env};
use club_server_domain::user::{UserService, UserServiceImpl};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: add_user <username> <email> <password>");
        std::process::exit(1);
    }

    let db = match Database::connect(&database_url_from_env()).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = db.ensure_schema().await {
        eprintln!("Failed to create tables: {}", e);
        std::process::exit(1);
    }

    let users = UserServiceImpl::new(db.repositories().user_repository);
    match users.register(&args[1], &args[2], &args[3]).await {
        Ok(user) => println!("Created user [{}] with id {}", user.username, user.id),
        Err(e) => {
            eprintln!("Failed to create user: {}", e);
            std::process::exit(1);
        }
    }
}
