use anyhow::Context;

use userlog::{
    config::AppConfig,
    db,
    logs::repo::list_logs,
    users::{repo, NewUser, User, UserChanges},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "userlog=debug,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::debug!(db = ?config.db.source, "config loaded");

    let pool = db::connect(&config.db).await?;
    db::ping(&pool).await?;
    db::migrate(&pool).await?;

    let draft = NewUser {
        name: "Name".into(),
        email: "a@a.com".into(),
        password: "secret".into(),
    };
    repo::insert_user(&pool, &draft).await?;

    let users = repo::list_users(&pool).await?;
    print_users(&users)?;

    // insert does not hand back the id, so pick the newest row with our email
    let created = users
        .iter()
        .filter(|u| u.email == draft.email)
        .max_by_key(|u| u.id)
        .context("inserted user missing from listing")?;

    let changes = UserChanges {
        name: "Anton".into(),
        email: "e@e.com".into(),
    };
    repo::update_user(&pool, created.id, &changes).await?;

    let updated = repo::get_user_by_id(&pool, created.id).await?;
    tracing::info!(id = updated.id, name = %updated.name, email = %updated.email, "user updated");

    let users = repo::list_users(&pool).await?;
    print_users(&users)?;

    let logs = list_logs(&pool).await?;
    tracing::info!(entries = logs.len(), "audit log size");

    pool.close().await;
    Ok(())
}

fn print_users(users: &[User]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(users)?);
    Ok(())
}
