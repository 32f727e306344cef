//! Resolving the operations of an executable document against a schema
use super::schema::{Field, OperationKind, Schema, TypeRef};
use super::{closest_name, Error as LoadError, Pos, SourceFile};
use graphql_parser::query::{
    Definition, Document, FragmentDefinition, OperationDefinition, Selection, SelectionSet,
    TypeCondition,
};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown field `{field}` on type `{parent}`")]
    UnknownField {
        parent: String,
        field: String,
        suggestion: Option<String>,
        position: Pos,
    },
    #[error("unknown fragment `{name}`")]
    UnknownFragment {
        name: String,
        suggestion: Option<String>,
        position: Pos,
    },
    #[error("unknown type `{name}`")]
    UnknownType {
        name: String,
        suggestion: Option<String>,
        position: Pos,
    },
    #[error("fragment `{name}` is defined more than once")]
    DuplicateFragment { name: String, position: Pos },
    #[error("the schema does not define a {} root type", kind.keyword())]
    MissingRootType { kind: OperationKind, position: Pos },
}

impl Error {
    pub fn position(&self) -> Pos {
        match self {
            Error::UnknownField { position, .. }
            | Error::UnknownFragment { position, .. }
            | Error::UnknownType { position, .. }
            | Error::DuplicateFragment { position, .. }
            | Error::MissingRootType { position, .. } => *position,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Error::UnknownField { suggestion, .. }
            | Error::UnknownFragment { suggestion, .. }
            | Error::UnknownType { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Non-fatal findings, printed only when asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    DeprecatedFieldUse {
        field: String,
        parent: String,
        position: Pos,
    },
}

impl Warning {
    pub fn position(&self) -> Pos {
        match self {
            Warning::DeprecatedFieldUse { position, .. } => *position,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DeprecatedFieldUse { field, parent, .. } => {
                write!(f, "use of deprecated field `{field}` on type `{parent}`")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub type_ref: TypeRef,
    pub position: Pos,
}

#[derive(Debug, Clone)]
pub struct TopLevelField {
    pub name: String,
    pub alias: Option<String>,
    /// Schema definition of the selected field
    pub field: Field,
    pub position: Pos,
}

#[derive(Debug, Clone)]
pub enum TopLevelSelection {
    Field(TopLevelField),
    FragmentSpread { name: String, position: Pos },
    InlineFragment { position: Pos },
}

#[derive(Debug, Clone)]
pub struct ResolvedOperation<'a> {
    pub name: Option<String>,
    pub kind: OperationKind,
    pub position: Pos,
    pub variables: Vec<Variable>,
    pub selections: Vec<TopLevelSelection>,
    pub definition: OperationDefinition<'a, String>,
}

impl<'a> ResolvedOperation<'a> {
    pub fn selection_set(&self) -> &SelectionSet<'a, String> {
        match &self.definition {
            OperationDefinition::SelectionSet(set) => set,
            OperationDefinition::Query(query) => &query.selection_set,
            OperationDefinition::Mutation(mutation) => &mutation.selection_set,
            OperationDefinition::Subscription(subscription) => &subscription.selection_set,
        }
    }
}

/// A parsed executable document whose operations have been resolved
#[derive(Debug)]
pub struct QueryDocument<'a> {
    pub path: &'a Path,
    pub document: Document<'a, String>,
    pub operations: Vec<ResolvedOperation<'a>>,
    pub warnings: Vec<Warning>,
}

impl<'a> QueryDocument<'a> {
    pub fn load(schema: &Schema, source: &'a SourceFile) -> super::Result<Self> {
        let in_source = |error: Error| LoadError::Query {
            path: source.path.clone(),
            source: error,
        };
        let document = graphql_parser::parse_query::<String>(&source.contents).map_err(|error| {
            LoadError::QuerySyntax {
                path: source.path.clone(),
                message: error.to_string(),
            }
        })?;
        let (operations, warnings) = {
            let resolver = Resolver::new(schema, &document).map_err(in_source)?;
            resolver.check_fragments().map_err(in_source)?;
            let operations = document
                .definitions
                .iter()
                .filter_map(|definition| match definition {
                    Definition::Operation(operation) => Some(operation),
                    Definition::Fragment(_) => None,
                })
                .map(|operation| resolver.resolve_operation(operation))
                .collect::<Result<Vec<_>>>()
                .map_err(in_source)?;
            (operations, resolver.deprecation_warnings(&document))
        };
        debug!(
            path = %source.path.display(),
            operations = operations.len(),
            "resolved query document"
        );
        Ok(QueryDocument {
            path: &source.path,
            document,
            operations,
            warnings,
        })
    }
}

struct Resolver<'s, 'd, 'a> {
    schema: &'s Schema,
    fragments: HashMap<&'d str, &'d FragmentDefinition<'a, String>>,
}

impl<'s, 'd, 'a> Resolver<'s, 'd, 'a> {
    fn new(schema: &'s Schema, document: &'d Document<'a, String>) -> Result<Self> {
        let mut fragments = HashMap::new();
        for definition in &document.definitions {
            if let Definition::Fragment(fragment) = definition {
                if fragments.insert(fragment.name.as_str(), fragment).is_some() {
                    return Err(Error::DuplicateFragment {
                        name: fragment.name.clone(),
                        position: fragment.position,
                    });
                }
            }
        }
        Ok(Resolver { schema, fragments })
    }

    fn check_type_exists(&self, name: &str, position: Pos) -> Result<()> {
        if self.schema.get_type_for_name(name).is_some() {
            return Ok(());
        }
        Err(Error::UnknownType {
            name: name.to_string(),
            suggestion: closest_name(name, self.schema.type_names()),
            position,
        })
    }

    fn check_fragments(&self) -> Result<()> {
        for fragment in self.fragments.values() {
            let TypeCondition::On(type_name) = &fragment.type_condition;
            self.check_type_exists(type_name, fragment.position)?;
            self.check_selection_set(type_name, &fragment.selection_set)?;
        }
        Ok(())
    }

    fn check_selection_set(&self, parent: &str, selection_set: &SelectionSet<'a, String>) -> Result<()> {
        for selection in &selection_set.items {
            match selection {
                Selection::Field(field) => {
                    let schema_field = self.resolve_field(parent, &field.name, field.position)?;
                    if !field.selection_set.items.is_empty() {
                        self.check_selection_set(schema_field.type_ref.leaf_name(), &field.selection_set)?;
                    }
                }
                Selection::FragmentSpread(spread) => {
                    if !self.fragments.contains_key(spread.fragment_name.as_str()) {
                        return Err(Error::UnknownFragment {
                            name: spread.fragment_name.clone(),
                            suggestion: closest_name(
                                &spread.fragment_name,
                                self.fragments.keys().copied(),
                            ),
                            position: spread.position,
                        });
                    }
                }
                Selection::InlineFragment(inline) => {
                    let type_name = match &inline.type_condition {
                        Some(TypeCondition::On(type_name)) => {
                            self.check_type_exists(type_name, inline.position)?;
                            type_name.as_str()
                        }
                        None => parent,
                    };
                    self.check_selection_set(type_name, &inline.selection_set)?;
                }
            }
        }
        Ok(())
    }

    /// Uses of deprecated fields, in document order
    fn deprecation_warnings(&self, document: &Document<'a, String>) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for definition in &document.definitions {
            let (parent, selection_set) = match definition {
                Definition::Operation(operation) => {
                    let kind = match operation {
                        OperationDefinition::Mutation(_) => OperationKind::Mutation,
                        OperationDefinition::Subscription(_) => OperationKind::Subscription,
                        _ => OperationKind::Query,
                    };
                    let Some(root) = self.schema.root_type_name(kind) else {
                        continue;
                    };
                    let selection_set = match operation {
                        OperationDefinition::SelectionSet(set) => set,
                        OperationDefinition::Query(query) => &query.selection_set,
                        OperationDefinition::Mutation(mutation) => &mutation.selection_set,
                        OperationDefinition::Subscription(subscription) => &subscription.selection_set,
                    };
                    (root, selection_set)
                }
                Definition::Fragment(fragment) => {
                    let TypeCondition::On(type_name) = &fragment.type_condition;
                    (type_name.as_str(), &fragment.selection_set)
                }
            };
            self.collect_deprecated_uses(parent, selection_set, &mut warnings);
        }
        warnings
    }

    fn collect_deprecated_uses(
        &self,
        parent: &str,
        selection_set: &SelectionSet<'a, String>,
        warnings: &mut Vec<Warning>,
    ) {
        for selection in &selection_set.items {
            match selection {
                Selection::Field(field) => {
                    let Some(schema_field) = self.schema.get_field(parent, &field.name) else {
                        continue;
                    };
                    if schema_field.is_deprecated() {
                        warnings.push(Warning::DeprecatedFieldUse {
                            field: field.name.clone(),
                            parent: parent.to_string(),
                            position: field.position,
                        });
                    }
                    self.collect_deprecated_uses(
                        schema_field.type_ref.leaf_name(),
                        &field.selection_set,
                        warnings,
                    );
                }
                Selection::InlineFragment(inline) => {
                    let type_name = match &inline.type_condition {
                        Some(TypeCondition::On(type_name)) => type_name.as_str(),
                        None => parent,
                    };
                    self.collect_deprecated_uses(type_name, &inline.selection_set, warnings);
                }
                Selection::FragmentSpread(_) => {}
            }
        }
    }

    fn resolve_field(&self, parent: &str, name: &str, position: Pos) -> Result<Field> {
        self.schema.get_field(parent, name).ok_or_else(|| {
            let candidates = self
                .schema
                .get_type_for_name(parent)
                .and_then(|parent_type| parent_type.definition.fields())
                .unwrap_or_default()
                .iter()
                .map(|field| field.name.as_str());
            Error::UnknownField {
                parent: parent.to_string(),
                field: name.to_string(),
                suggestion: closest_name(name, candidates),
                position,
            }
        })
    }

    fn resolve_operation(&self, operation: &OperationDefinition<'a, String>) -> Result<ResolvedOperation<'a>> {
        let (kind, name, position, variable_definitions, selection_set) = match operation {
            OperationDefinition::SelectionSet(set) => (OperationKind::Query, None, set.span.0, &[][..], set),
            OperationDefinition::Query(query) => (
                OperationKind::Query,
                query.name.clone(),
                query.position,
                &query.variable_definitions[..],
                &query.selection_set,
            ),
            OperationDefinition::Mutation(mutation) => (
                OperationKind::Mutation,
                mutation.name.clone(),
                mutation.position,
                &mutation.variable_definitions[..],
                &mutation.selection_set,
            ),
            OperationDefinition::Subscription(subscription) => (
                OperationKind::Subscription,
                subscription.name.clone(),
                subscription.position,
                &subscription.variable_definitions[..],
                &subscription.selection_set,
            ),
        };
        let root = self
            .schema
            .root_type_name(kind)
            .ok_or(Error::MissingRootType { kind, position })?;
        let variables = variable_definitions
            .iter()
            .map(|variable| {
                let type_ref = TypeRef::from(&variable.var_type);
                self.check_type_exists(type_ref.leaf_name(), variable.position)?;
                Ok(Variable {
                    name: variable.name.clone(),
                    type_ref,
                    position: variable.position,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.check_selection_set(root, selection_set)?;
        let selections = selection_set
            .items
            .iter()
            .map(|selection| {
                Ok(match selection {
                    Selection::Field(field) => TopLevelSelection::Field(TopLevelField {
                        name: field.name.clone(),
                        alias: field.alias.clone(),
                        field: self.resolve_field(root, &field.name, field.position)?,
                        position: field.position,
                    }),
                    Selection::FragmentSpread(spread) => TopLevelSelection::FragmentSpread {
                        name: spread.fragment_name.clone(),
                        position: spread.position,
                    },
                    Selection::InlineFragment(inline) => TopLevelSelection::InlineFragment {
                        position: inline.position,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedOperation {
            name,
            kind,
            position,
            variables,
            selections,
            definition: operation.clone(),
        })
    }
}
