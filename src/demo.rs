//! Movie graph walkthrough
//!
//! Stores *Apocalypse Now* and Marlon Brando, reads the movie back and links the
//! two with a `moviegraph` edge.

use crate::components::movie::{CAST, MOVIES, MOVIE_EDGES};
use crate::components::{Cast, CastType, Production};
use crate::errors::GraphSessionResult;
use crate::session::GraphSession;
use crate::store::GraphStore;
use crate::value_objects::{Edge, Identity, Vertex};
use tracing::info;

/// What the walkthrough stored and read
#[derive(Debug, Clone)]
pub struct MovieDemoReport {
    pub database: String,
    pub movie: Identity<Vertex>,
    pub movie_read_back: Production,
    pub actor: Identity<Vertex>,
    pub edge: Identity<Edge>,
}

/// Run the walkthrough against an already provisioned graph
pub async fn run_movie_demo<S: GraphStore>(
    session: &GraphSession<S>,
) -> GraphSessionResult<MovieDemoReport> {
    let movie = session
        .create_vertex(
            MOVIES,
            Production {
                title: "Apocalypse Now".to_string(),
                year: 1979,
            },
        )
        .await?;

    let movie_read_back: Production = session.read_vertex(MOVIES, &movie.identity).await?;
    info!("Read back {}", movie_read_back);

    let actor = session
        .create_vertex(
            CAST,
            Cast {
                name: "Marlon Brando".to_string(),
                cast_type: CastType::Actor,
            },
        )
        .await?;

    let edge = session
        .create_edge(MOVIE_EDGES, &movie.identity, &actor.identity, ())
        .await?;

    Ok(MovieDemoReport {
        database: session.database().to_string(),
        movie: movie.identity,
        movie_read_back,
        actor: actor.identity,
        edge: edge.identity,
    })
}
