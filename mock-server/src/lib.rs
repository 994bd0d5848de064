use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::debug;

/// Collections by name (`posts`, `pages`, ...), each a list of JSON entities
/// carrying at least `id` and `slug`. Read-only once the router is built.
pub type Db = Arc<HashMap<String, Vec<Value>>>;

/// Collections served by `app()`.
pub fn seed() -> HashMap<String, Vec<Value>> {
    HashMap::from([
        (
            "posts".to_string(),
            vec![
                json!({"id": 1, "slug": "hello-world", "title": "Hello world", "categories": [1]}),
                json!({"id": 2, "slug": "second-post", "title": "Second post", "categories": [2]}),
                json!({"id": 3, "slug": "third-post", "title": "Third post", "categories": [1, 2]}),
            ],
        ),
        (
            "pages".to_string(),
            vec![json!({"id": 10, "slug": "about", "title": "About"})],
        ),
        (
            "categories".to_string(),
            vec![
                json!({"id": 1, "slug": "news", "name": "News", "taxonomy": "category"}),
                json!({"id": 2, "slug": "events", "name": "Events", "taxonomy": "category"}),
            ],
        ),
        (
            "tags".to_string(),
            vec![json!({"id": 5, "slug": "rust", "name": "Rust", "taxonomy": "post_tag"})],
        ),
    ])
}

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(collections: HashMap<String, Vec<Value>>) -> Router {
    let db: Db = Arc::new(collections);
    Router::new()
        .route("/wp/v2/all-terms", get(all_terms))
        .route("/wp/v2/{collection}", get(list_entities))
        .route("/wp/v2/{collection}/{id}", get(get_entity))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type ApiError = (StatusCode, Json<Value>);

fn not_found(code: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"code": code, "data": {"status": 404}})))
}

/// Filters understood by collection routes. Bare flags such as `embed` are
/// accepted and ignored.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub slug: Option<String>,
    pub ids: Vec<u64>,
}

impl ListFilter {
    pub fn parse(query: Option<&str>) -> Result<Self, String> {
        let mut filter = Self::default();
        for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (pair, None),
            };
            let key = urlencoding::decode(key).map_err(|e| e.to_string())?;
            let value = value
                .map(|v| urlencoding::decode(v).map(|v| v.into_owned()))
                .transpose()
                .map_err(|e| e.to_string())?;

            match (&*key, value) {
                ("slug", Some(slug)) => filter.slug = Some(slug),
                ("idFilter[]", Some(id)) => {
                    let id = id.parse().map_err(|_| format!("invalid id filter \"{id}\""))?;
                    filter.ids.push(id);
                }
                _ => {}
            }
        }
        Ok(filter)
    }

    fn matches(&self, entity: &Value) -> bool {
        let slug_ok = self
            .slug
            .as_deref()
            .map_or(true, |slug| entity["slug"].as_str() == Some(slug));
        let id_ok = self.ids.is_empty()
            || entity["id"].as_u64().is_some_and(|id| self.ids.contains(&id));
        slug_ok && id_ok
    }
}

async fn list_entities(
    State(db): State<Db>,
    Path(collection): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Value>>, ApiError> {
    debug!(collection = %collection, query = ?query, "list request");
    let filter = ListFilter::parse(query.as_deref()).map_err(|message| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "rest_invalid_param", "message": message})),
        )
    })?;

    let entities = db.get(&collection).ok_or_else(|| not_found("rest_no_route"))?;
    Ok(Json(
        entities.iter().filter(|e| filter.matches(e)).cloned().collect(),
    ))
}

async fn get_entity(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, u64)>,
) -> Result<Json<Value>, ApiError> {
    debug!(collection = %collection, id, "get request");
    let entities = db.get(&collection).ok_or_else(|| not_found("rest_no_route"))?;
    entities
        .iter()
        .find(|e| e["id"].as_u64() == Some(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("rest_invalid_id"))
}

/// Every term of every taxonomy, grouped by taxonomy and keyed by id.
async fn all_terms(State(db): State<Db>) -> Json<Value> {
    let mut grouped: Map<String, Value> = Map::new();
    for collection in ["categories", "tags"] {
        for term in db.get(collection).into_iter().flatten() {
            let taxonomy = term["taxonomy"].as_str().unwrap_or(collection).to_string();
            let id = term["id"].to_string();
            if let Value::Object(terms) = grouped
                .entry(taxonomy)
                .or_insert_with(|| Value::Object(Map::new()))
            {
                terms.insert(id, term.clone());
            }
        }
    }
    Json(Value::Object(grouped))
}
