mod cli;
mod infra;
mod render;
mod routes;
mod server;

use salary_health::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
