//! HTTP server for the cash-flow planner
//!
//! Reads BASIC_AUTH_USER, BASIC_AUTH_PASS and PLANNER_ADDR from the
//! environment; `--addr` overrides the listen address.

use anyhow::{Context, Result};
use clap::Parser;

use cashflow_planner::config::{parse_addr, ServerConfig};
use cashflow_planner::server;

#[derive(Parser, Debug)]
#[command(name = "planner_server", about = "Serve the cash-flow planner over HTTP")]
struct Args {
    /// Listen address (`host:port` or a bare port)
    #[arg(short, long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("reading server configuration")?;
    if let Some(raw) = args.addr.as_deref() {
        config = config.with_addr(parse_addr(raw)?);
    }

    server::serve(config).await.context("server error")?;
    Ok(())
}
