//! Interactive mode for the server.
//!
//! Prompts for bind address, port, and database file before starting the
//! server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::{ServerConfig, ServerError};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Defaults for each prompt come from the environment (see
/// [`ServerConfig::from_env`]).
///
/// # Errors
///
/// Returns [`ServerError`] if the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), ServerError> {
    println!("Shamba Server");
    println!();

    let mut config = ServerConfig::from_env();

    config.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or(config.bind_addr);

    config.port = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(config.port);

    let db_path: String = Input::new()
        .with_prompt("Database file")
        .default(config.db_path.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| config.db_path.display().to_string());
    config.db_path = PathBuf::from(db_path);

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.bind_addr, config.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    crate::run_server(config).await
}
