mod cli;
mod infra;
mod routes;
mod scoring;
mod server;

use career_cat::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
