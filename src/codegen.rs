//! Compile a schema and its operation documents into declarations
use crate::graphql::fragment::{self, collect_fragments};
use crate::graphql::schema::{Schema, Type};
use crate::graphql::{Pos, QueryDocument};
use crate::ir::Declaration;
use ident::IdentScope;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

pub mod definition;
pub mod ident;
pub mod operation;
pub mod type_mapper;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("type `{0}` is not defined in the schema")]
    MissingType(String),
    #[error("field aliases are not supported (`{alias}: {field}`)")]
    UnsupportedAlias {
        field: String,
        alias: String,
        position: Pos,
    },
    #[error("unknown fragment `{name}`")]
    UnknownFragment { name: String, position: Pos },
    #[error("{kind} selections are not supported at the top level of operation `{operation}`")]
    UnsupportedSelection {
        operation: String,
        kind: &'static str,
        position: Pos,
    },
    #[error("variable `${name}` is bound more than once in operation `{operation}`")]
    DuplicateVariable {
        operation: String,
        name: String,
        position: Pos,
    },
    #[error("`{first}` and `{second}` both map to the identifier `{ident}` in {context}")]
    DuplicateIdentifier {
        context: String,
        first: String,
        second: String,
        ident: String,
    },
    #[error("upload variable `${name}` is nested in more than one list")]
    NestedUploadList { name: String, position: Pos },
    #[error("anonymous operations are not supported")]
    AnonymousOperation { position: Pos },
    #[error("{source}")]
    InDocument {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn position(&self) -> Option<Pos> {
        match self {
            Error::UnsupportedAlias { position, .. }
            | Error::UnknownFragment { position, .. }
            | Error::UnsupportedSelection { position, .. }
            | Error::DuplicateVariable { position, .. }
            | Error::NestedUploadList { position, .. }
            | Error::AnonymousOperation { position } => Some(*position),
            Error::InDocument { source, .. } => source.position(),
            Error::MissingType(_) | Error::DuplicateIdentifier { .. } => None,
        }
    }

    fn in_document(self, path: PathBuf) -> Self {
        Error::InDocument {
            path,
            source: Box::new(self),
        }
    }
}

impl From<fragment::Error> for Error {
    fn from(error: fragment::Error) -> Self {
        match error {
            fragment::Error::UnsupportedAlias {
                field,
                alias,
                position,
            } => Error::UnsupportedAlias {
                field,
                alias,
                position,
            },
            fragment::Error::UnknownFragment { name, position } => {
                Error::UnknownFragment { name, position }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Leave deprecated fields and enum values out of the declarations
    pub omit_deprecated: bool,
}

/// Whether a declaration is generated for the type. Root operation types are
/// skipped unless another generated type refers to them.
fn is_generated(schema: &Schema, schema_type: &Type, referenced_roots: &HashSet<&str>) -> bool {
    !schema_type.built_in
        && (!schema.is_root_type(&schema_type.name)
            || referenced_roots.contains(schema_type.name.as_str()))
}

fn referenced_roots(schema: &Schema) -> HashSet<&str> {
    schema
        .types()
        .filter(|schema_type| !schema_type.built_in && !schema.is_root_type(&schema_type.name))
        .flat_map(|schema_type| {
            let field_types = schema_type
                .definition
                .fields()
                .unwrap_or_default()
                .iter()
                .map(|field| field.type_ref.leaf_name());
            let possible_types = schema_type
                .definition
                .possible_types()
                .unwrap_or_default()
                .iter()
                .map(String::as_str);
            field_types.chain(possible_types)
        })
        .filter(|name| schema.is_root_type(name))
        .collect()
}

/// Declarations for every generated schema type, sorted by type name,
/// followed by one function per operation in document order.
pub fn generate(
    schema: &Schema,
    documents: &[QueryDocument<'_>],
    options: &Options,
) -> Result<Vec<Declaration>> {
    let referenced_roots = referenced_roots(schema);
    let mut types = schema
        .types()
        .filter(|schema_type| is_generated(schema, schema_type, &referenced_roots))
        .collect::<Vec<_>>();
    types.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    debug!(count = types.len(), "generating type definitions");

    let mut declarations = Vec::new();
    for schema_type in types {
        declarations.extend(definition::generate_definition(schema, schema_type, options)?);
    }
    for document in documents {
        for resolved in &document.operations {
            let declaration = collect_fragments(&document.document, resolved.selection_set())
                .map_err(Error::from)
                .and_then(|fragments| operation::generate_operation(schema, resolved, &fragments))
                .map_err(|error| error.in_document(document.path.to_owned()))?;
            declarations.push(declaration);
        }
        debug!(
            path = %document.path.display(),
            operations = document.operations.len(),
            "generated operations"
        );
    }

    let mut scope = IdentScope::new("the generated module");
    for declaration in &declarations {
        if let Some(name) = declaration.declared_name() {
            scope.claim(name, name)?;
        }
        if let Declaration::Enum { name, constants, .. } = declaration {
            for constant in constants {
                scope.claim(&format!("{name}.{}", constant.value), &constant.ident)?;
            }
        }
    }
    Ok(declarations)
}
