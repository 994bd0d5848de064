//! Domain types shared by the resolver, the executor and the orchestration loop.
//!
//! # Design
//! Descriptors deserialize from the external content-type contract
//! (`{name:{canonical}, slug:{singular, plural}}`) so host applications can
//! register types from JSON. Subjects deserialize untagged from the raw JSON
//! id carried by trigger messages; a list keeps non-numeric entries so the
//! classifier can report them instead of serde rejecting the whole message.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::QueryMap;

/// Message type emitted by every orchestration loop.
pub const RECEIVE_DATA: &str = "RECEIVE_DATA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeName {
    pub canonical: String,
}

/// Collection and entity paths of a content type, relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugPaths {
    pub singular: String,
    pub plural: String,
}

/// Describes one category of remote content. Registered once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDescriptor {
    pub name: ContentTypeName,
    pub slug: SlugPaths,
    #[serde(default)]
    pub queryable_by_slug: bool,
}

impl ContentTypeDescriptor {
    pub fn new(canonical: &str, singular: &str, plural: &str, queryable_by_slug: bool) -> Self {
        Self {
            name: ContentTypeName {
                canonical: canonical.to_string(),
            },
            slug: SlugPaths {
                singular: singular.to_string(),
                plural: plural.to_string(),
            },
            queryable_by_slug,
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.name.canonical
    }
}

/// A single entry of a list subject. Anything that is neither a non-negative
/// integer nor a string decodes as `Other` and is reported as non-numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Id(u64),
    Slug(String),
    Other(Value),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{id}"),
            Identifier::Slug(slug) => write!(f, "{slug}"),
            Identifier::Other(value) => write!(f, "{value}"),
        }
    }
}

/// What a request is about: one entity by id or slug, or several by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Id(u64),
    Slug(String),
    List(Vec<Identifier>),
}

impl From<u64> for Subject {
    fn from(id: u64) -> Self {
        Subject::Id(id)
    }
}

impl From<&str> for Subject {
    fn from(slug: &str) -> Self {
        Subject::Slug(slug.to_string())
    }
}

impl From<Vec<u64>> for Subject {
    fn from(ids: Vec<u64>) -> Self {
        Subject::List(ids.into_iter().map(Identifier::Id).collect())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Id(id) => write!(f, "{id}"),
            Subject::Slug(slug) => write!(f, "{slug}"),
            Subject::List(entries) => {
                let joined: Vec<String> = entries.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

/// Per-call request options. `params` feed route placeholders such as `:id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub query: QueryMap,
    pub params: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: QueryMap) -> Self {
        self.query = query;
        self
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// A kind of resource served by one orchestration loop, e.g. `terms`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKind(String);

impl ResourceKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Trigger message type this resource listens for, e.g. `REQUEST_TERMS`.
    pub fn request_type(&self) -> String {
        format!("REQUEST_{}", self.0.to_uppercase().replace('-', "_"))
    }

    /// Key under which received data is merged into the store.
    pub fn store_key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inbound request for a resource, e.g. `{"type":"REQUEST_TERMS"}`. Loops
/// match on `type` alone; `resource` is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Subject>,
}

impl TriggerMessage {
    pub fn request(resource: &ResourceKind) -> Self {
        Self {
            kind: resource.request_type(),
            resource: Some(resource.clone()),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<Subject>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Outbound message carrying fetched data into the store reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub request: ResourceKind,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Subject>,
}

impl ReceiveMessage {
    pub fn new(request: ResourceKind, data: Value, id: Option<Subject>) -> Self {
        Self {
            kind: RECEIVE_DATA.to_string(),
            request,
            data,
            id,
        }
    }
}

/// WP-API content types known out of the box. Only posts and pages can be
/// queried by slug.
pub fn builtins() -> Vec<ContentTypeDescriptor> {
    vec![
        ContentTypeDescriptor::new("post", "/posts/:id", "/posts", true),
        ContentTypeDescriptor::new("page", "/pages/:id", "/pages", true),
        ContentTypeDescriptor::new("category", "/categories/:id", "/categories", false),
        ContentTypeDescriptor::new("tag", "/tags/:id", "/tags", false),
        ContentTypeDescriptor::new("media", "/media/:id", "/media", false),
        ContentTypeDescriptor::new("user", "/users/:id", "/users", false),
        ContentTypeDescriptor::new("comment", "/comments/:id", "/comments", false),
        ContentTypeDescriptor::new("taxonomy", "/taxonomies/:id", "/taxonomies", false),
        ContentTypeDescriptor::new("type", "/types/:id", "/types", false),
    ]
}
