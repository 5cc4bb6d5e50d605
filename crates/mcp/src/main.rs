use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use postgsail_client::{PostgSailClient, Session};

use postgsail_mcp::config::{Auth, Config};
use postgsail_mcp::server::{self, McpServer};
use postgsail_mcp::{SERVER_NAME, SERVER_VERSION};

fn main() -> Result<()> {
    let config = Config::parse();

    // stdout carries protocol frames only
    let env = env_logger::Env::default().default_filter_or(config.log_level().to_string());
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .init();

    ctrlc::set_handler(|| {
        log::info!("Received shutdown signal, exiting");
        std::process::exit(0);
    })
    .context("failed to install signal handler")?;

    serve(&config).inspect_err(|e| log::error!("{:#}", e))
}

fn serve(config: &Config) -> Result<()> {
    let base_url = config.base_url()?;
    let auth = config.auth()?;
    log::info!("Starting {} {} against {}", SERVER_NAME, SERVER_VERSION, base_url);

    let mut client = PostgSailClient::new(Session::new(base_url, None));
    match auth {
        Auth::Token(token) => client.set_token(token),
        Auth::Login { email, password } => {
            log::info!("Logging in as {}", email);
            let token = client
                .login(&email, &password)
                .context("authentication failed")?;
            client.set_token(token);
        }
    }

    let mut server = McpServer::new(client);
    let stdin = io::stdin();
    server::run(&mut server, stdin.lock(), io::stdout()).context("stdio transport failed")?;

    log::info!("stdin closed, exiting");
    Ok(())
}
