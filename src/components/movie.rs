//! Movie graph records
//!
//! Productions live in the `movies` collection, cast members in `cast`, and the
//! `moviegraph` edge collection links a production to the people in it.

use crate::value_objects::{EdgeDefinition, GraphDefinition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Graph provisioned by the demo
pub const GRAPH_NAME: &str = "myGraph";
/// Vertex collection for productions
pub const MOVIES: &str = "movies";
/// Vertex collection for cast members
pub const CAST: &str = "cast";
/// Edge collection from productions to cast members
pub const MOVIE_EDGES: &str = "moviegraph";

/// The `myGraph` definition: `moviegraph` edges from `movies` to `cast`
pub fn movie_graph_definition() -> GraphDefinition {
    GraphDefinition::new(GRAPH_NAME, EdgeDefinition::new(MOVIE_EDGES, MOVIES, CAST))
}

/// A film or show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub title: String,
    pub year: i64,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

/// What a cast member does on a production, stored as its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CastType {
    Actor = 1,
    Director = 2,
    Producer = 3,
}

impl From<CastType> for u8 {
    fn from(cast_type: CastType) -> Self {
        cast_type as u8
    }
}

impl TryFrom<u8> for CastType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CastType::Actor),
            2 => Ok(CastType::Director),
            3 => Ok(CastType::Producer),
            other => Err(format!("unknown cast type {other}")),
        }
    }
}

/// A person credited on a production
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cast {
    pub name: String,
    #[serde(rename = "type")]
    pub cast_type: CastType,
}
