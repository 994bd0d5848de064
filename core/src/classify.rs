//! Request-shape classification of a subject.

use crate::error::ValidationError;
use crate::types::{ContentTypeDescriptor, Subject};
use crate::validate;

/// Whether a request targets one entity or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plurality {
    Singular,
    Plural,
}

/// A validated subject, ready for endpoint resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestShape {
    Single(u64),
    Slug(String),
    Multiple(Vec<u64>),
}

impl RequestShape {
    pub fn plurality(&self) -> Plurality {
        match self {
            RequestShape::Single(_) | RequestShape::Slug(_) => Plurality::Singular,
            RequestShape::Multiple(_) => Plurality::Plural,
        }
    }

    pub fn is_slug_request(&self) -> bool {
        matches!(self, RequestShape::Slug(_))
    }
}

/// Classify `subject` against `descriptor`.
///
/// A list is plural, anything else singular; a singular string is a slug
/// request and requires a slug-queryable descriptor. Plural subjects must be
/// all numeric.
pub fn classify(
    descriptor: &ContentTypeDescriptor,
    subject: &Subject,
) -> Result<RequestShape, ValidationError> {
    match subject {
        Subject::Id(id) => Ok(RequestShape::Single(*id)),
        Subject::Slug(slug) => {
            validate::slug_queryable("identifier", descriptor, slug)?;
            Ok(RequestShape::Slug(slug.clone()))
        }
        Subject::List(entries) => {
            let ids = validate::numeric_identifiers("subject list", entries)?;
            Ok(RequestShape::Multiple(ids))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;
    use crate::types::Identifier;

    fn post() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new("post", "/posts/:id", "/posts", true)
    }

    fn tag() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new("tag", "/tags/:id", "/tags", false)
    }

    #[test]
    fn numeric_subject_is_singular() {
        let shape = classify(&post(), &Subject::Id(42)).unwrap();
        assert_eq!(shape, RequestShape::Single(42));
        assert_eq!(shape.plurality(), Plurality::Singular);
        assert!(!shape.is_slug_request());
    }

    #[test]
    fn string_subject_is_a_singular_slug_request() {
        let shape = classify(&post(), &Subject::from("hello-world")).unwrap();
        assert_eq!(shape.plurality(), Plurality::Singular);
        assert!(shape.is_slug_request());
    }

    #[test]
    fn slug_against_non_queryable_type_fails() {
        let err = classify(&tag(), &Subject::from("news")).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidSlugQuery);
    }

    #[test]
    fn list_subject_is_plural() {
        let shape = classify(&tag(), &Subject::from(vec![1u64, 2, 3])).unwrap();
        assert_eq!(shape, RequestShape::Multiple(vec![1, 2, 3]));
        assert_eq!(shape.plurality(), Plurality::Plural);
    }

    #[test]
    fn empty_list_is_still_plural() {
        let shape = classify(&tag(), &Subject::List(Vec::new())).unwrap();
        assert_eq!(shape, RequestShape::Multiple(Vec::new()));
    }

    #[test]
    fn non_numeric_list_reports_offending_entries() {
        let subject = Subject::List(vec![
            Identifier::Slug("a".to_string()),
            Identifier::Slug("b".to_string()),
        ]);
        let err = classify(&post(), &subject).unwrap_err();
        match err.kind {
            ValidationKind::InvalidIdentifierList { offending } => {
                assert_eq!(offending, vec!["a", "b"]);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
