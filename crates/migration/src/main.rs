use sea_orm::Database;
use sea_orm_migration::prelude::*;

use migration::Migrator;

const DEFAULT_DATABASE_URL: &str = "sqlite:./pocketbook.db?mode=rwc";
const USAGE: &str = "usage: migration [up [N]|down [N]|refresh|reset|fresh|status]";

/// Schema command, `up` when none is given.
enum Command {
    Up(Option<u32>),
    Down(Option<u32>),
    Refresh,
    Reset,
    Fresh,
    Status,
}

fn parse(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let name = args.next().unwrap_or_else(|| "up".to_string());
    let steps = args
        .next()
        .map(|n| n.parse::<u32>().map_err(|_| format!("invalid step count {n:?}")))
        .transpose()?;

    match (name.as_str(), steps) {
        ("up", steps) => Ok(Command::Up(steps)),
        ("down", steps) => Ok(Command::Down(steps.or(Some(1)))),
        ("refresh", None) => Ok(Command::Refresh),
        ("reset", None) => Ok(Command::Reset),
        ("fresh", None) => Ok(Command::Fresh),
        ("status", None) => Ok(Command::Status),
        _ => Err(USAGE.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = parse(std::env::args().skip(1))?;
    let url = std::env::var("POCKETBOOK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&url).await?;
    match command {
        Command::Up(steps) => Migrator::up(&db, steps).await?,
        Command::Down(steps) => Migrator::down(&db, steps).await?,
        Command::Refresh => Migrator::refresh(&db).await?,
        Command::Reset => Migrator::reset(&db).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Status => Migrator::status(&db).await?,
    }
    Ok(())
}
