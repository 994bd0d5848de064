//! Precondition checks shared by the classifier, resolver and registry.
//!
//! # Design
//! Each check takes the name of the thing under test and the observed value,
//! and either returns `Ok` with no effect or a `ValidationError` whose message
//! names both. Nothing here coerces or substitutes defaults.

use crate::error::{ValidationError, ValidationKind};
use crate::types::{ContentTypeDescriptor, Identifier};

/// Fail with `kind` and a lazily built message unless `predicate` holds.
pub fn ensure(
    predicate: bool,
    kind: ValidationKind,
    message: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if predicate {
        Ok(())
    } else {
        Err(ValidationError::new(kind, message()))
    }
}

/// A slug subject is only allowed for slug-queryable content types.
pub fn slug_queryable(
    subject_name: &str,
    descriptor: &ContentTypeDescriptor,
    slug: &str,
) -> Result<(), ValidationError> {
    ensure(descriptor.queryable_by_slug, ValidationKind::InvalidSlugQuery, || {
        format!(
            "Got a slug (\"{slug}\") as the {subject_name}, but the content type \"{}\" cannot be \
             queried by slug. Provide the slug as a query parameter in the request options instead.",
            descriptor.canonical_name()
        )
    })
}

/// Every entry of a list subject must be a numeric id. Returns the ids in
/// input order.
pub fn numeric_identifiers(
    subject_name: &str,
    entries: &[Identifier],
) -> Result<Vec<u64>, ValidationError> {
    let offending: Vec<String> = entries
        .iter()
        .filter_map(|entry| match entry {
            Identifier::Id(_) => None,
            Identifier::Slug(slug) => Some(slug.clone()),
            Identifier::Other(value) => Some(value.to_string()),
        })
        .collect();

    if !offending.is_empty() {
        let message = format!(
            "A request for multiple content items should use numeric identifiers. \
             The {subject_name} contains {} non-numeric identifiers: {}",
            offending.len(),
            offending.join(", ")
        );
        return Err(ValidationError::new(
            ValidationKind::InvalidIdentifierList { offending },
            message,
        ));
    }

    Ok(entries
        .iter()
        .filter_map(|entry| match entry {
            Identifier::Id(id) => Some(*id),
            Identifier::Slug(_) | Identifier::Other(_) => None,
        })
        .collect())
}

/// A descriptor needs a canonical name and absolute paths for both variants.
pub fn content_type_shape(descriptor: &ContentTypeDescriptor) -> Result<(), ValidationError> {
    let name = descriptor.canonical_name();
    ensure(!name.trim().is_empty(), ValidationKind::InvalidContentType, || {
        "Invalid content type: the canonical name is empty.".to_string()
    })?;

    for (variant, path) in [
        ("singular", &descriptor.slug.singular),
        ("plural", &descriptor.slug.plural),
    ] {
        ensure(path.starts_with('/'), ValidationKind::InvalidContentType, || {
            format!("Invalid content type \"{name}\": the {variant} path \"{path}\" must start with '/'.")
        })?;
    }
    Ok(())
}

/// A canonical name may only be registered once.
pub fn new_content_type(already_registered: bool, name: &str) -> Result<(), ValidationError> {
    ensure(!already_registered, ValidationKind::DuplicateContentType, || {
        format!("Content type with name \"{name}\" already exists.")
    })
}

/// Unwrap a registry lookup, naming the missing content type on failure.
pub fn known_content_type<'a>(
    found: Option<&'a ContentTypeDescriptor>,
    name: &str,
) -> Result<&'a ContentTypeDescriptor, ValidationError> {
    found.ok_or_else(|| {
        ValidationError::new(
            ValidationKind::UnknownContentType,
            format!("Content type \"{name}\" is not recognised. Register it before requesting it."),
        )
    })
}
