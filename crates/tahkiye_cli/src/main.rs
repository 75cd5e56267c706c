//! Timeline render entry point.
//!
//! # Responsibility
//! - Wire environment config, logging and the core crate together.
//! - Print the timeline HTML fragment for the configured database.
//!
//! `tahkiye_cli ping` prints linkage info without touching the database.

use log::error;
use std::process::ExitCode;
use tahkiye_core::db::open_db;
use tahkiye_core::{
    core_version, init_logging, ping, AppConfig, SqliteTopicRepository, TimelineHtml,
    TimelineService,
};

fn main() -> ExitCode {
    if std::env::args().nth(1).as_deref() == Some("ping") {
        println!("tahkiye_core ping={}", ping());
        println!("tahkiye_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::from(2);
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.database_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=cli_run module=cli status=error error_code={} error={err}",
                err.code()
            );
            eprintln!("database error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = TimelineService::new(SqliteTopicRepository::new(&conn));
    print!("{}", TimelineHtml(&service.timeline()));
    ExitCode::SUCCESS
}
