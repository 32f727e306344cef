//! Mapping schema type references to Rust type expressions
use super::ident::type_ident;
use super::{Error, Result};
use crate::graphql::schema::{Schema, TypeKind, TypeRef};
use crate::ir::{Convenience, TypeExpr};

/// Map a reference appearing directly on a field, argument or variable
pub fn map_type(schema: &Schema, type_ref: &TypeRef) -> Result<TypeExpr> {
    map_layer(schema, type_ref, true)
}

fn map_layer(schema: &Schema, type_ref: &TypeRef, toplevel: bool) -> Result<TypeExpr> {
    let (inner, non_null) = match type_ref {
        TypeRef::NonNull(inner) => (inner.as_ref(), true),
        other => (other, false),
    };
    match inner {
        TypeRef::NonNull(_) => map_layer(schema, inner, toplevel),
        TypeRef::List(element) => {
            let list = TypeExpr::list(map_layer(schema, element, false)?);
            Ok(if non_null {
                list
            } else {
                TypeExpr::optional(list)
            })
        }
        TypeRef::Named(name) => map_leaf(schema, name, non_null, toplevel),
    }
}

fn map_leaf(schema: &Schema, name: &str, non_null: bool, toplevel: bool) -> Result<TypeExpr> {
    let kind = schema
        .get_type_for_name(name)
        .map(|leaf| leaf.kind())
        .ok_or_else(|| Error::MissingType(name.to_string()))?;
    let expr = match (kind, name) {
        (TypeKind::Scalar, "Int") => TypeExpr::Int32,
        (TypeKind::Scalar, "Float") => TypeExpr::Float64,
        (TypeKind::Scalar, "String" | "ID") => TypeExpr::Text,
        (TypeKind::Scalar, "Boolean") => TypeExpr::Boolean,
        (TypeKind::Scalar, _) => match Convenience::from_scalar_name(name) {
            // Convenience types have their own absent value
            Some(convenience) => return Ok(TypeExpr::Convenience(convenience)),
            None => TypeExpr::Named(type_ident(name)),
        },
        _ => TypeExpr::Named(type_ident(name)),
    };
    let may_recurse = matches!(kind, TypeKind::Object | TypeKind::Interface);
    if non_null && !(toplevel && may_recurse) {
        return Ok(expr);
    }
    let indirect = toplevel
        && matches!(
            kind,
            TypeKind::Object | TypeKind::Interface | TypeKind::InputObject
        );
    Ok(if indirect {
        TypeExpr::indirect(expr)
    } else {
        TypeExpr::optional(expr)
    })
}
