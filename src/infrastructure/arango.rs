//! ArangoDB graph store
//!
//! Talks to the server's HTTP API with `reqwest`: `/_api/version` to check the
//! connection, `/_api/database` to create the database and the gharial graph API
//! for the graph, its vertices and its edges.

use crate::components::Document;
use crate::config::{ConnectionConfig, Credentials};
use crate::errors::{GraphSessionError, GraphSessionResult};
use crate::store::GraphStore;
use crate::value_objects::{CollectionRef, CollectionRole, DocumentMeta, GraphDefinition};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SYSTEM_DATABASE: &str = "_system";

/// Error body the server returns with non-2xx responses
#[derive(Debug, Deserialize)]
struct ArangoErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    #[serde(rename = "errorNum")]
    error_num: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    server: String,
    version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGraphBody<'a> {
    name: &'a str,
    edge_definitions: Vec<EdgeDefinitionBody<'a>>,
}

#[derive(Serialize)]
struct EdgeDefinitionBody<'a> {
    collection: &'a str,
    from: Vec<&'a str>,
    to: Vec<&'a str>,
}

impl<'a> CreateGraphBody<'a> {
    fn from_definition(graph: &'a GraphDefinition) -> Self {
        let edges = &graph.edge_definition;
        Self {
            name: &graph.name,
            edge_definitions: vec![EdgeDefinitionBody {
                collection: &edges.collection,
                from: vec![edges.from.as_str()],
                to: vec![edges.to.as_str()],
            }],
        }
    }
}

/// Authenticated connection to one server
#[derive(Clone)]
pub struct ArangoConnection {
    http: Client,
    base_url: Url,
    credentials: Credentials,
}

impl ArangoConnection {
    /// Build the HTTP client and check the server answers with these credentials
    pub async fn connect(config: &ConnectionConfig) -> GraphSessionResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.transport.timeout())
            .danger_accept_invalid_certs(config.transport.accept_invalid_certs)
            .build()
            .map_err(|e| GraphSessionError::Config(e.to_string()))?;
        let base_url = Url::parse(config.base_url())
            .map_err(|e| GraphSessionError::Config(e.to_string()))?;

        let connection = Self {
            http,
            base_url,
            credentials: config.credentials.clone(),
        };

        let url = connection.api_url(SYSTEM_DATABASE, &["_api", "version"])?;
        let response = connection.send("connect", connection.http.get(url)).await?;
        let response = expect_success("connect", response, None).await?;
        let version: VersionInfo = decode("connect", response).await?;
        tracing::info!(
            "Connected to {} {} at {}",
            version.server,
            version.version,
            connection.base_url
        );

        Ok(connection)
    }

    /// Create a database; an existing database with that name is an error
    pub async fn create_database(&self, name: &str) -> GraphSessionResult<ArangoDatabase> {
        let url = self.api_url(SYSTEM_DATABASE, &["_api", "database"])?;
        let body = serde_json::json!({ "name": name });
        let response = self
            .send("create database", self.http.post(url).json(&body))
            .await?;
        expect_success("create database", response, None).await?;
        tracing::info!("Created database '{}'", name);

        Ok(ArangoDatabase {
            connection: self.clone(),
            name: name.to_string(),
        })
    }

    /// Handle on a database that already exists
    pub fn database(&self, name: &str) -> ArangoDatabase {
        ArangoDatabase {
            connection: self.clone(),
            name: name.to_string(),
        }
    }

    /// `<base>/_db/<database>/<segments...>` with every segment escaped
    fn api_url(&self, database: &str, segments: &[&str]) -> GraphSessionResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GraphSessionError::Config(format!("endpoint '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .push("_db")
            .push(database)
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> GraphSessionResult<Response> {
        request
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(|e| GraphSessionError::unavailable(operation, e.to_string()))
    }
}

/// One database on the server
#[derive(Clone)]
pub struct ArangoDatabase {
    connection: ArangoConnection,
    name: String,
}

impl ArangoDatabase {
    /// Create the graph; the server creates its vertex and edge collections
    pub async fn create_graph(self, graph: GraphDefinition) -> GraphSessionResult<ArangoGraphStore> {
        let url = self.connection.api_url(&self.name, &["_api", "gharial"])?;
        let body = CreateGraphBody::from_definition(&graph);
        let response = self
            .connection
            .send("create graph", self.connection.http.post(url).json(&body))
            .await?;
        expect_success("create graph", response, None).await?;
        tracing::info!(
            "Created graph '{}' with edge definition {}: {} -> {}",
            graph.name,
            graph.edge_definition.collection,
            graph.edge_definition.from,
            graph.edge_definition.to
        );

        Ok(ArangoGraphStore {
            database: self,
            graph,
        })
    }
}

/// Connect, create the database and create the graph in one go
pub async fn provision(
    config: &ConnectionConfig,
    graph: GraphDefinition,
) -> GraphSessionResult<ArangoGraphStore> {
    let connection = ArangoConnection::connect(config).await?;
    let database = connection.create_database(&config.database).await?;
    database.create_graph(graph).await
}

/// Graph store backed by the gharial API of one graph
pub struct ArangoGraphStore {
    database: ArangoDatabase,
    graph: GraphDefinition,
}

impl ArangoGraphStore {
    fn collection_url(
        &self,
        collection: &CollectionRef,
        key: Option<&str>,
    ) -> GraphSessionResult<Url> {
        let kind = envelope_field(collection.role);
        let mut segments: Vec<&str> = vec![
            "_api",
            "gharial",
            self.graph.name.as_str(),
            kind,
            collection.name.as_str(),
        ];
        if let Some(key) = key {
            segments.push(key);
        }
        self.database
            .connection
            .api_url(&self.database.name, &segments)
    }
}

#[async_trait]
impl GraphStore for ArangoGraphStore {
    fn database(&self) -> &str {
        &self.database.name
    }

    fn graph(&self) -> &GraphDefinition {
        &self.graph
    }

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document: Document,
    ) -> GraphSessionResult<DocumentMeta> {
        let operation = "create document";
        let url = self.collection_url(collection, None)?;
        tracing::debug!("POST {}", url);

        let connection = &self.database.connection;
        let response = connection
            .send(operation, connection.http.post(url).json(&document))
            .await?;
        let response = expect_success(operation, response, None).await?;
        let envelope: Map<String, Value> = decode(operation, response).await?;
        let meta = unwrap_envelope(operation, envelope, collection.role)?;
        serde_json::from_value(Value::Object(meta))
            .map_err(|source| GraphSessionError::Serialization { operation, source })
    }

    async fn read_document(
        &self,
        collection: &CollectionRef,
        key: &str,
    ) -> GraphSessionResult<Document> {
        let operation = "read document";
        let url = self.collection_url(collection, Some(key))?;
        tracing::debug!("GET {}", url);

        let identity = format!("{}/{}", collection.name, key);
        let connection = &self.database.connection;
        let response = connection.send(operation, connection.http.get(url)).await?;
        let missing = Some((collection.name.as_str(), identity.as_str()));
        let response = expect_success(operation, response, missing).await?;
        let envelope: Map<String, Value> = decode(operation, response).await?;
        unwrap_envelope(operation, envelope, collection.role)
    }

    // the reqwest client's pool is freed when the store is dropped
    async fn close(&self) {
        tracing::debug!(
            "Closing connection to {} (database '{}')",
            self.database.connection.base_url,
            self.database.name
        );
    }
}

/// Gharial path segment and response field for a collection role
fn envelope_field(role: CollectionRole) -> &'static str {
    match role {
        CollectionRole::Edge => "edge",
        CollectionRole::VertexSource | CollectionRole::VertexTarget => "vertex",
    }
}

fn unwrap_envelope(
    operation: &'static str,
    mut envelope: Map<String, Value>,
    role: CollectionRole,
) -> GraphSessionResult<Document> {
    let field = envelope_field(role);
    match envelope.remove(field) {
        Some(Value::Object(document)) => Ok(document),
        _ => Err(GraphSessionError::unavailable(
            operation,
            format!("malformed response: missing '{field}' object"),
        )),
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> GraphSessionResult<T> {
    response
        .json()
        .await
        .map_err(|e| GraphSessionError::unavailable(operation, format!("malformed response: {e}")))
}

async fn expect_success(
    operation: &'static str,
    response: Response,
    missing: Option<(&str, &str)>,
) -> GraphSessionResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(operation, status, &error_message(&body), missing))
}

/// Human-readable message from an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ArangoErrorBody>(body) {
        Ok(ArangoErrorBody {
            error_message: Some(message),
            error_num: Some(number),
        }) => format!("{message} (error {number})"),
        Ok(ArangoErrorBody {
            error_message: Some(message),
            ..
        }) => message,
        _ => body.trim().to_string(),
    }
}

/// Map a non-success status onto the session error taxonomy.
///
/// A 404 is `NotFound` only when the request addressed a single document;
/// otherwise it means a collection, graph or database is missing.
fn status_error(
    operation: &'static str,
    status: StatusCode,
    message: &str,
    missing: Option<(&str, &str)>,
) -> GraphSessionError {
    match status {
        StatusCode::NOT_FOUND => match missing {
            Some((collection, identity)) => GraphSessionError::not_found(collection, identity),
            None => GraphSessionError::validation(operation, message),
        },
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
            GraphSessionError::validation(operation, message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GraphSessionError::unavailable(
            operation,
            format!("authentication rejected: {message}"),
        ),
        other => GraphSessionError::unavailable(operation, format!("HTTP {other}: {message}")),
    }
}
