use super::{json, Documentation, Error};
use graphql_parser::schema as parsed_schema;
use std::convert::TryFrom;
use std::fmt;

/// A possibly list/non-null wrapped reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        TypeRef::Named(name.to_string())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Name of the leaf type, under all list and non-null layers
    pub fn leaf_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.leaf_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Number of list layers between this reference and its leaf
    pub fn list_depth(&self) -> usize {
        match self {
            TypeRef::Named(_) => 0,
            TypeRef::List(inner) => 1 + inner.list_depth(),
            TypeRef::NonNull(inner) => inner.list_depth(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl<'a> From<&parsed_schema::Type<'a, String>> for TypeRef {
    fn from(parsed: &parsed_schema::Type<'a, String>) -> Self {
        match parsed {
            parsed_schema::Type::NamedType(name) => TypeRef::Named(name.clone()),
            parsed_schema::Type::ListType(inner) => TypeRef::list(inner.as_ref().into()),
            parsed_schema::Type::NonNullType(inner) => TypeRef::non_null(inner.as_ref().into()),
        }
    }
}

impl TryFrom<json::TypeReference> for TypeRef {
    type Error = Error;
    fn try_from(json: json::TypeReference) -> Result<Self, Self::Error> {
        match json.kind.as_ref() {
            "NON_NULL" => {
                let inner = *json.of_type.ok_or(Error::MissingTypeOfForNonNull)?;
                Ok(TypeRef::non_null(TypeRef::try_from(inner)?))
            }
            "LIST" => {
                let inner = *json.of_type.ok_or(Error::MissingTypeOfForList)?;
                Ok(TypeRef::list(TypeRef::try_from(inner)?))
            }
            _ => json.name.map(TypeRef::Named).ok_or(Error::MissingNameForField),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deprecation {
    Current,
    Deprecated(Option<String>),
}

impl Deprecation {
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated(_))
    }

    pub(super) fn from_directives<'a>(directives: &[parsed_schema::Directive<'a, String>]) -> Self {
        let directive = match directives.iter().find(|d| d.name == "deprecated") {
            Some(d) => d,
            None => return Deprecation::Current,
        };
        let reason = directive
            .arguments
            .iter()
            .find(|(name, _)| name == "reason")
            .and_then(|(_, value)| match value {
                parsed_schema::Value::String(reason) => Some(reason.clone()),
                _ => None,
            });
        Deprecation::Deprecated(reason)
    }

    pub(super) fn from_json(is_deprecated: Option<bool>, reason: Option<String>) -> Self {
        if is_deprecated.unwrap_or(false) {
            Deprecation::Deprecated(reason)
        } else {
            Deprecation::Current
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub documentation: Documentation,
    pub type_ref: TypeRef,
    pub arguments: Vec<Field>,
    pub deprecation: Deprecation,
}

impl Field {
    pub(super) fn new_type_name() -> Self {
        Field {
            name: "__typename".to_string(),
            documentation: None,
            type_ref: TypeRef::non_null(TypeRef::named("String")),
            arguments: Vec::new(),
            deprecation: Deprecation::Current,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_deprecated()
    }

    /// Reserved introspection fields like `__typename` or `__schema`
    pub fn is_reserved(&self) -> bool {
        self.name.starts_with("__")
    }
}

pub(super) fn normalize_documentation(description: Option<String>) -> Documentation {
    description
        .map(|docs| {
            docs.lines()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|docs| !docs.is_empty())
}

impl<'a> From<&parsed_schema::Field<'a, String>> for Field {
    fn from(parsed: &parsed_schema::Field<'a, String>) -> Self {
        Field {
            name: parsed.name.clone(),
            documentation: normalize_documentation(parsed.description.clone()),
            type_ref: (&parsed.field_type).into(),
            arguments: parsed.arguments.iter().map(Field::from).collect(),
            deprecation: Deprecation::from_directives(&parsed.directives),
        }
    }
}

impl<'a> From<&parsed_schema::InputValue<'a, String>> for Field {
    fn from(parsed: &parsed_schema::InputValue<'a, String>) -> Self {
        Field {
            name: parsed.name.clone(),
            documentation: normalize_documentation(parsed.description.clone()),
            type_ref: (&parsed.value_type).into(),
            arguments: Vec::new(),
            deprecation: Deprecation::from_directives(&parsed.directives),
        }
    }
}

impl TryFrom<json::FieldDescription> for Field {
    type Error = Error;
    fn try_from(json: json::FieldDescription) -> Result<Self, Error> {
        let json::FieldDescription {
            type_reference,
            name,
            description,
            args,
            is_deprecated,
            deprecation_reason,
        } = json;
        Ok(Field {
            name,
            documentation: normalize_documentation(description),
            type_ref: TypeRef::try_from(type_reference)?,
            arguments: args
                .unwrap_or_default()
                .into_iter()
                .map(Field::try_from)
                .collect::<Result<_, _>>()?,
            deprecation: Deprecation::from_json(is_deprecated, deprecation_reason),
        })
    }
}
