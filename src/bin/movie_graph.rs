//! Provision the movie graph and walk through it
//!
//! Creates a database, a graph with a `moviegraph` edge definition from `movies`
//! to `cast`, stores one movie and one actor, reads the movie back and links the
//! two. The first failure ends the run.

use anyhow::{Context, Result};
use clap::Parser;
use movie_graph::components::movie::{movie_graph_definition, CAST, MOVIES};
use movie_graph::config::{DEFAULT_DATABASE, DEFAULT_ENDPOINT, DEFAULT_USER};
use movie_graph::demo::run_movie_demo;
use movie_graph::infrastructure::provision;
use movie_graph::{ConnectionConfig, Credentials, GraphSession, TransportOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "movie-graph")]
#[command(
    about = "Create an ArangoDB movie graph and store a first movie and actor\n\
             Flags take two dashes (--dbname), the single-dash form (-dbname) is not accepted",
    long_about = None
)]
#[command(version)]
struct Args {
    /// name of the db to be created
    #[arg(long, default_value = DEFAULT_DATABASE)]
    dbname: String,

    /// database user
    #[arg(long, default_value = DEFAULT_USER)]
    dbuser: String,

    /// database password
    #[arg(long, default_value = "")]
    dbpass: String,

    /// db host name
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    dbhost: String,
}

impl Args {
    fn into_config(self) -> ConnectionConfig {
        ConnectionConfig {
            endpoint: self.dbhost,
            database: self.dbname,
            credentials: Credentials::new(self.dbuser, self.dbpass),
            transport: TransportOptions::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run(Args::parse().into_config()).await
}

async fn run(config: ConnectionConfig) -> Result<()> {
    let store = provision(&config, movie_graph_definition())
        .await
        .with_context(|| {
            format!(
                "failed to provision database '{}' on {}",
                config.database, config.endpoint
            )
        })?;

    let session = GraphSession::new(store);
    let token = session.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            token.cancel();
        }
    });

    let outcome = run_movie_demo(&session).await;
    interrupt.abort();
    session.close().await;
    let report = outcome.context("movie graph walkthrough failed")?;

    println!(
        "Created document in collection '{}' in database '{}'",
        MOVIES, report.database
    );
    println!("Read movie '{:?}'", report.movie_read_back);
    println!(
        "Created document in collection '{}' in database '{}'",
        CAST, report.database
    );
    println!("from: {} to: {}", report.movie, report.actor);
    println!("Created edge '{}'", report.edge);

    Ok(())
}
