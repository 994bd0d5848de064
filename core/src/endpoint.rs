//! Canonical endpoint resolution.
//!
//! # Design
//! Resolution is pure string building: classify the subject, pick the path
//! variant, append the encoded query, append id filters for plural requests,
//! then substitute route placeholders. Slug requests always target the
//! collection path filtered by `slug=`, because the remote API only exposes
//! slug lookup on collections.

use crate::classify::{classify, Plurality, RequestShape};
use crate::error::ValidationError;
use crate::query::{self, QueryMap};
use crate::types::{ContentTypeDescriptor, RequestOptions, Subject};

/// Query key forced onto every request so related entities come back embedded.
pub const EMBED_KEY: &str = "embed";

/// Query key of a single id filter clause, repeated once per requested id.
pub const ID_FILTER_KEY: &str = "idFilter[]";

/// Route placeholder names substituted from `RequestOptions::params`.
pub const ROUTE_PARAMS: &[&str] = &["id", "parent", "post"];

/// A fully resolved endpoint plus the classification that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub shape: RequestShape,
}

impl ResolvedEndpoint {
    pub fn is_slug_request(&self) -> bool {
        self.shape.is_slug_request()
    }
}

/// Resolve `subject` of `descriptor` into a canonical URL under `base_url`.
///
/// Fails only on validation; no I/O happens here.
pub fn resolve(
    base_url: &str,
    descriptor: &ContentTypeDescriptor,
    subject: &Subject,
    options: &RequestOptions,
) -> Result<ResolvedEndpoint, ValidationError> {
    let shape = classify(descriptor, subject)?;

    let mut query: QueryMap = options.query.clone();
    query.insert(EMBED_KEY, "true");
    if let RequestShape::Slug(slug) = &shape {
        query.insert("slug", slug.as_str());
    }

    let path = match (shape.is_slug_request(), shape.plurality()) {
        (true, _) | (false, Plurality::Plural) => &descriptor.slug.plural,
        (false, Plurality::Singular) => &descriptor.slug.singular,
    };

    let querystring = query::encode(&query);
    let mut url = format!("{base_url}{path}{querystring}");

    let mut params = options.params.clone();
    match &shape {
        RequestShape::Single(id) => {
            let supplied = params.get("id").is_some_and(|value| !value.is_empty());
            if !supplied {
                params.insert("id".to_string(), id.to_string());
            }
        }
        RequestShape::Multiple(ids) if !ids.is_empty() => {
            let filters: Vec<String> = ids.iter().map(|id| format!("{ID_FILTER_KEY}={id}")).collect();
            url.push(if querystring.is_empty() { '?' } else { '&' });
            url.push_str(&filters.join("&"));
        }
        RequestShape::Multiple(_) | RequestShape::Slug(_) => {}
    }

    for name in ROUTE_PARAMS {
        if let Some(value) = params.get(*name).filter(|value| !value.is_empty()) {
            url = url.replacen(&format!(":{name}"), value, 1);
        }
    }

    Ok(ResolvedEndpoint { url, shape })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;

    const BASE: &str = "https://site/api";

    fn post() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new("post", "/posts/:id", "/posts", true)
    }

    fn revision() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new("revision", "/posts/:parent/revisions/:id", "/posts/:parent/revisions", false)
    }

    #[test]
    fn singular_id_fills_the_id_placeholder() {
        let resolved = resolve(BASE, &post(), &Subject::Id(42), &RequestOptions::new()).unwrap();
        assert_eq!(resolved.url, "https://site/api/posts/42?embed=true");
        assert!(!resolved.is_slug_request());
    }

    #[test]
    fn plural_ids_append_one_filter_per_id_in_order() {
        let resolved =
            resolve(BASE, &post(), &Subject::from(vec![1u64, 2, 3]), &RequestOptions::new()).unwrap();
        assert!(resolved
            .url
            .ends_with("?embed=true&idFilter[]=1&idFilter[]=2&idFilter[]=3"));
        assert_eq!(resolved.url.matches("idFilter[]=").count(), 3);
    }

    #[test]
    fn slug_request_targets_the_collection() {
        let resolved = resolve(BASE, &post(), &Subject::from("hello world"), &RequestOptions::new()).unwrap();
        assert_eq!(resolved.url, "https://site/api/posts?embed=true&slug=hello%20world");
        assert!(resolved.is_slug_request());
    }

    #[test]
    fn slug_request_against_non_queryable_type_fails() {
        let tag = ContentTypeDescriptor::new("tag", "/tags/:id", "/tags", false);
        let err = resolve(BASE, &tag, &Subject::from("news"), &RequestOptions::new()).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidSlugQuery);
    }

    #[test]
    fn caller_query_comes_before_forced_entries() {
        let options = RequestOptions::new()
            .with_query(QueryMap::new().with("context", "view").with("orderby", "date"));
        let resolved = resolve(BASE, &post(), &Subject::from("x"), &options).unwrap();
        assert_eq!(
            resolved.url,
            "https://site/api/posts?context=view&orderby=date&embed=true&slug=x"
        );
    }

    #[test]
    fn explicit_id_param_wins_over_subject() {
        let options = RequestOptions::new().with_param("id", "7");
        let resolved = resolve(BASE, &post(), &Subject::Id(42), &options).unwrap();
        assert_eq!(resolved.url, "https://site/api/posts/7?embed=true");
    }

    #[test]
    fn unresolved_placeholders_stay_verbatim() {
        let resolved = resolve(BASE, &revision(), &Subject::Id(9), &RequestOptions::new()).unwrap();
        assert_eq!(resolved.url, "https://site/api/posts/:parent/revisions/9?embed=true");
    }

    #[test]
    fn extra_route_params_are_substituted() {
        let options = RequestOptions::new().with_param("parent", "5");
        let resolved = resolve(BASE, &revision(), &Subject::from(vec![1u64, 2]), &options).unwrap();
        assert_eq!(
            resolved.url,
            "https://site/api/posts/5/revisions?embed=true&idFilter[]=1&idFilter[]=2"
        );
    }

    #[test]
    fn singular_endpoint_never_carries_id_filters() {
        let resolved = resolve(BASE, &post(), &Subject::Id(11), &RequestOptions::new()).unwrap();
        assert_eq!(resolved.url.matches("11").count(), 1);
        assert!(!resolved.url.contains(ID_FILTER_KEY));
    }

    #[test]
    fn empty_id_list_adds_no_filter() {
        let resolved = resolve(BASE, &post(), &Subject::List(Vec::new()), &RequestOptions::new()).unwrap();
        assert_eq!(resolved.url, "https://site/api/posts?embed=true");
    }
}
