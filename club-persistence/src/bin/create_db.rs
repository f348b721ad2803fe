use club_persistence::{
    Database,
    config::{database_url_from_env, mask_credentials},
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = database_url_from_env();
    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", mask_credentials(&url), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db.ensure_schema().await {
        eprintln!("Failed to create tables: {}", e);
        std::process::exit(1);
    }

    println!("Created tables in {}", mask_credentials(&url));
}
