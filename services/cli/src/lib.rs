mod cli;
mod infra;
mod output;

use obe_attainment::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
