//! Functions executing the operations of a query document
use super::definition::record_field;
use super::ident::{value_ident, IdentScope};
use super::type_mapper::map_type;
use super::{Error, Result};
use crate::graphql::operation::{ResolvedOperation, TopLevelSelection};
use crate::graphql::schema::Schema;
use crate::ir::{Declaration, Function, Param, Statement};
use graphql_parser::query::{Definition, Document, FragmentDefinition};
use std::collections::HashSet;

const RESPONSE_SHAPE: &str = "__Response";

/// Locals and parameters of every generated function
const RESERVED_IDENTS: [&str; 4] = ["client", "ctx", "op", "response"];

/// Text of a document holding exactly the operation and its fragments
fn canonical_query<'a>(
    operation: &ResolvedOperation<'a>,
    fragments: &[&FragmentDefinition<'a, String>],
) -> String {
    let definitions = std::iter::once(Definition::Operation(operation.definition.clone()))
        .chain(
            fragments
                .iter()
                .map(|fragment| Definition::Fragment((*fragment).clone())),
        )
        .collect();
    Document { definitions }.to_string()
}

pub fn generate_operation<'a>(
    schema: &Schema,
    operation: &ResolvedOperation<'a>,
    fragments: &[&FragmentDefinition<'a, String>],
) -> Result<Declaration> {
    let operation_name = operation
        .name
        .as_deref()
        .ok_or(Error::AnonymousOperation {
            position: operation.position,
        })?;
    let context = format!("operation `{operation_name}`");

    let mut params = vec![Param::Client, Param::Context];
    let mut body = vec![Statement::NewOperation {
        query: canonical_query(operation, fragments),
    }];
    let mut bound = HashSet::new();
    let mut param_scope = IdentScope::new(&context);
    for reserved in RESERVED_IDENTS {
        param_scope.claim(reserved, reserved)?;
    }
    for variable in &operation.variables {
        if !bound.insert(variable.name.as_str()) {
            return Err(Error::DuplicateVariable {
                operation: operation_name.to_string(),
                name: variable.name.clone(),
                position: variable.position,
            });
        }
        if variable.type_ref.leaf_name() == "Upload" && variable.type_ref.list_depth() > 1 {
            return Err(Error::NestedUploadList {
                name: variable.name.clone(),
                position: variable.position,
            });
        }
        let mut ident = value_ident(&variable.name);
        if RESERVED_IDENTS.contains(&ident.as_str()) {
            ident.push('_');
        }
        param_scope.claim(&variable.name, &ident)?;
        params.push(Param::Variable {
            ident: ident.clone(),
            type_expr: map_type(schema, &variable.type_ref)?,
        });
        body.push(Statement::BindVariable {
            name: variable.name.clone(),
            ident,
        });
    }

    let mut shape_scope = IdentScope::new(&context);
    let mut selected = HashSet::new();
    let mut fields = Vec::new();
    for selection in &operation.selections {
        let top_level = match selection {
            TopLevelSelection::Field(top_level) => top_level,
            TopLevelSelection::FragmentSpread { position, .. } => {
                return Err(Error::UnsupportedSelection {
                    operation: operation_name.to_string(),
                    kind: "fragment spread",
                    position: *position,
                })
            }
            TopLevelSelection::InlineFragment { position } => {
                return Err(Error::UnsupportedSelection {
                    operation: operation_name.to_string(),
                    kind: "inline fragment",
                    position: *position,
                })
            }
        };
        if let Some(alias) = &top_level.alias {
            return Err(Error::UnsupportedAlias {
                field: top_level.name.clone(),
                alias: alias.clone(),
                position: top_level.position,
            });
        }
        // Repeated selections of one field merge into a single response field
        if !selected.insert(top_level.name.as_str()) {
            continue;
        }
        let field = record_field(schema, &top_level.field)?;
        shape_scope.claim(&top_level.name, &field.ident)?;
        fields.push(field);
    }

    let returns = fields.iter().map(|field| field.type_expr.clone()).collect();
    let returned = fields.iter().map(|field| field.ident.clone()).collect();
    body.push(Statement::DeclareShape {
        name: RESPONSE_SHAPE.to_string(),
        fields,
    });
    body.push(Statement::Execute {
        shape: RESPONSE_SHAPE.to_string(),
    });
    body.push(Statement::Return(returned));

    Ok(Declaration::Function(Function {
        name: value_ident(operation_name),
        documentation: Some(format!(
            "Runs the `{operation_name}` {}.",
            operation.kind.keyword()
        )),
        params,
        returns,
        body,
    }))
}
