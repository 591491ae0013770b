use crate::seed::{Seeder, run_seeder};
use crate::seeds::{profiles::ProfileSeeder, tickets::TicketSeeder};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::process::ExitCode;
use util::config;

mod seed;
mod seeds;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let db = match db::connect(&config::database_path()).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to {}: {e}", config::database_path());
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("Migrations failed: {e}");
        return ExitCode::FAILURE;
    }

    for (seeder, name) in [
        (Box::new(ProfileSeeder) as Box<dyn Seeder + Send + Sync>, "Profile"),
        (Box::new(TicketSeeder), "Ticket"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
    ExitCode::SUCCESS
}
