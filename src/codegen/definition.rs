//! Declarations for the named types of a schema
use super::ident::{constant_ident, marker_ident, type_ident, value_ident, IdentScope};
use super::type_mapper::map_type;
use super::{Options, Result};
use crate::graphql::schema::{
    is_convenience_scalar, EnumValue, Field, Schema, Type, TypeDefinition,
};
use crate::ir::{
    AbstractKind, Declaration, EnumConstant, Polymorphic, PossibleType, RecordField, Statement,
};

const VALUE_FIELD: &str = "value";
const COMMON_RECORD: &str = "__Common";

/// One record field for a schema field, named and typed the way every record is
pub(super) fn record_field(schema: &Schema, field: &Field) -> Result<RecordField> {
    Ok(RecordField {
        ident: value_ident(&field.name),
        serialized_name: field.name.clone(),
        type_expr: map_type(schema, &field.type_ref)?,
        omit_when_absent: !field.type_ref.is_non_null(),
        documentation: field.documentation.clone(),
    })
}

fn record_fields(
    schema: &Schema,
    scope: &mut IdentScope<'_>,
    fields: &[Field],
    options: &Options,
) -> Result<Vec<RecordField>> {
    fields
        .iter()
        .filter(|field| !field.is_reserved())
        .filter(|field| !(options.omit_deprecated && field.is_deprecated()))
        .map(|field| {
            let record_field = record_field(schema, field)?;
            scope.claim(&field.name, &record_field.ident)?;
            Ok(record_field)
        })
        .collect()
}

fn enum_constants(enum_name: &str, values: &[EnumValue], options: &Options) -> Result<Vec<EnumConstant>> {
    let context = format!("enum `{enum_name}`");
    let mut scope = IdentScope::new(&context);
    values
        .iter()
        .filter(|value| !(options.omit_deprecated && value.deprecation.is_deprecated()))
        .map(|value| {
            let ident = constant_ident(enum_name, &value.name);
            scope.claim(&value.name, &ident)?;
            Ok(EnumConstant {
                ident,
                value: value.name.clone(),
                documentation: value.documentation.clone(),
            })
        })
        .collect()
}

fn polymorphic(
    schema: &Schema,
    schema_type: &Type,
    kind: AbstractKind,
    fields: &[Field],
    possible_types: &[String],
    options: &Options,
) -> Result<Vec<Declaration>> {
    let name = type_ident(&schema_type.name);
    let context = format!("{} `{}`", kind.name(), schema_type.name);
    let mut scope = IdentScope::new(&context);
    let fields = record_fields(schema, &mut scope, fields, options)?;
    let value_field = if scope.contains(VALUE_FIELD) {
        format!("{VALUE_FIELD}_")
    } else {
        VALUE_FIELD.to_string()
    };
    scope.claim(VALUE_FIELD, &value_field)?;
    let marker = marker_ident(&schema_type.name);
    let possible_types = possible_types
        .iter()
        .map(|graphql_name| PossibleType {
            graphql_name: graphql_name.clone(),
            type_name: type_ident(graphql_name),
        })
        .collect::<Vec<_>>();
    let marker_documentation = format!(
        "{marker} is one of: {}",
        possible_types
            .iter()
            .map(|possible| possible.graphql_name.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    );
    let mut decode = vec![Statement::ReadTypeName];
    if !fields.is_empty() {
        decode.push(Statement::DecodeCommon {
            name: COMMON_RECORD.to_string(),
            fields: fields.clone(),
        });
    }
    decode.push(Statement::Dispatch {
        kind,
        container: schema_type.name.clone(),
        marker: marker.clone(),
        possible_types,
    });
    decode.push(Statement::Construct {
        container: name.clone(),
        fields: fields.iter().map(|field| field.ident.clone()).collect(),
        value_field: value_field.clone(),
    });
    Ok(vec![
        Declaration::Polymorphic(Polymorphic {
            name,
            documentation: schema_type.documentation.clone(),
            kind,
            fields,
            value_field,
            marker: marker.clone(),
            decode,
        }),
        Declaration::Marker {
            name: marker,
            documentation: Some(marker_documentation),
        },
    ])
}

/// Marker implementations for every interface or union `type_name` belongs to
fn marker_impls(schema: &Schema, type_name: &str) -> Vec<Declaration> {
    let mut markers = schema
        .abstract_types_of(type_name)
        .into_iter()
        .map(marker_ident)
        .collect::<Vec<_>>();
    markers.sort_unstable();
    markers
        .into_iter()
        .map(|marker| Declaration::MarkerImpl {
            type_name: type_ident(type_name),
            marker,
        })
        .collect()
}

/// Generate the declarations for one schema type, followed by the marker
/// implementations it needs. Convenience scalars generate nothing.
pub fn generate_definition(
    schema: &Schema,
    schema_type: &Type,
    options: &Options,
) -> Result<Vec<Declaration>> {
    let name = type_ident(&schema_type.name);
    let documentation = schema_type.documentation.clone();
    let mut declarations = match &schema_type.definition {
        TypeDefinition::Scalar if is_convenience_scalar(&schema_type.name) => Vec::new(),
        TypeDefinition::Scalar => vec![Declaration::Scalar {
            name,
            documentation,
        }],
        TypeDefinition::Enum(values) => vec![Declaration::Enum {
            constants: enum_constants(&schema_type.name, values, options)?,
            name,
            documentation,
        }],
        TypeDefinition::Object(object) => {
            let context = format!("type `{}`", schema_type.name);
            let mut scope = IdentScope::new(&context);
            vec![Declaration::Record {
                fields: record_fields(schema, &mut scope, &object.fields, options)?,
                name,
                documentation,
            }]
        }
        TypeDefinition::InputObject(fields) => {
            let context = format!("input `{}`", schema_type.name);
            let mut scope = IdentScope::new(&context);
            vec![Declaration::Record {
                fields: record_fields(schema, &mut scope, fields, options)?,
                name,
                documentation,
            }]
        }
        TypeDefinition::Interface(interface) => polymorphic(
            schema,
            schema_type,
            AbstractKind::Interface,
            &interface.fields,
            &interface.possible_types,
            options,
        )?,
        TypeDefinition::Union(union_type) => polymorphic(
            schema,
            schema_type,
            AbstractKind::Union,
            &[],
            &union_type.possible_types,
            options,
        )?,
    };
    declarations.extend(marker_impls(schema, &schema_type.name));
    Ok(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Error;
    use crate::ir::TypeExpr;

    const SCHEMA: &str = r#"
        "A train"
        type Train implements Vehicle {
            name: String!
            maxSpeed: Int!
            "Old name"
            oldName: String @deprecated(reason: "use name")
            type: String
            __internal: Int
        }
        type Bus implements Vehicle & Named { name: String! }
        interface Vehicle { name: String! }
        interface Named { name: String! }
        union Ride = Train | Bus
        enum Episode { NEW_HOPE EMPIRE JEDI @deprecated }
        enum Clash { NEW_HOPE newHope }
        scalar Date
        scalar Time
        input Filter { name: String first: Int! }
        type Valued implements Boxed { value: Int }
        interface Boxed { value: Int }
        type Doubled { maxSpeed: Int max_speed: Int }
    "#;

    fn schema() -> Schema {
        let document = graphql_parser::parse_schema::<String>(SCHEMA).unwrap();
        Schema::from_sdl_documents(&[document]).unwrap()
    }

    fn generate(name: &str, omit_deprecated: bool) -> Result<Vec<Declaration>> {
        let schema = schema();
        let schema_type = schema.get_type_for_name(name).unwrap();
        generate_definition(&schema, schema_type, &Options { omit_deprecated })
    }

    fn record_fields_of(declaration: &Declaration) -> &[RecordField] {
        match declaration {
            Declaration::Record { fields, .. } => fields,
            Declaration::Polymorphic(polymorphic) => &polymorphic.fields,
            other => panic!("not a record: {other:?}"),
        }
    }

    #[test]
    fn object_becomes_record_with_tagged_fields() {
        let declarations = generate("Train", false).unwrap();
        let fields = record_fields_of(&declarations[0]);
        let summary = fields
            .iter()
            .map(|f| (f.ident.as_str(), f.serialized_name.as_str(), f.omit_when_absent))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("name", "name", false),
                ("max_speed", "maxSpeed", false),
                ("old_name", "oldName", true),
                ("r#type", "type", true),
            ]
        );
        assert_eq!(fields[0].type_expr, TypeExpr::Text);
        assert_eq!(fields[1].type_expr, TypeExpr::Int32);
        assert_eq!(fields[2].documentation.as_deref(), Some("Old name"));
        match &declarations[0] {
            Declaration::Record { documentation, .. } => {
                assert_eq!(documentation.as_deref(), Some("A train"))
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            declarations[1..],
            [Declaration::MarkerImpl {
                type_name: "Train".to_string(),
                marker: "RideValue".to_string(),
            },
            Declaration::MarkerImpl {
                type_name: "Train".to_string(),
                marker: "VehicleValue".to_string(),
            }]
        );
    }

    #[test]
    fn marker_impls_are_sorted_by_marker() {
        let declarations = generate("Bus", false).unwrap();
        let markers = declarations
            .iter()
            .filter_map(|declaration| match declaration {
                Declaration::MarkerImpl { marker, .. } => Some(marker.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(markers, vec!["NamedValue", "RideValue", "VehicleValue"]);
    }

    #[test]
    fn deprecated_members_are_omitted_when_filtering() {
        let train = generate("Train", true).unwrap();
        assert!(record_fields_of(&train[0])
            .iter()
            .all(|field| field.serialized_name != "oldName"));
        match &generate("Episode", true).unwrap()[0] {
            Declaration::Enum { constants, .. } => {
                let values = constants.iter().map(|c| c.value.as_str()).collect::<Vec<_>>();
                assert_eq!(values, vec!["NEW_HOPE", "EMPIRE"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn enum_constants_are_prefixed_and_keep_values() {
        match &generate("Episode", false).unwrap()[0] {
            Declaration::Enum { name, constants, .. } => {
                assert_eq!(name, "Episode");
                let pairs = constants
                    .iter()
                    .map(|c| (c.ident.as_str(), c.value.as_str()))
                    .collect::<Vec<_>>();
                assert_eq!(
                    pairs,
                    vec![
                        ("EPISODE_NEW_HOPE", "NEW_HOPE"),
                        ("EPISODE_EMPIRE", "EMPIRE"),
                        ("EPISODE_JEDI", "JEDI"),
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn colliding_enum_constants_are_rejected() {
        let error = generate("Clash", false).unwrap_err();
        assert!(matches!(error, Error::DuplicateIdentifier { ref ident, .. } if ident == "CLASH_NEW_HOPE"));
    }

    #[test]
    fn colliding_field_identifiers_are_rejected() {
        let error = generate("Doubled", false).unwrap_err();
        assert!(matches!(error, Error::DuplicateIdentifier { ref ident, .. } if ident == "max_speed"));
    }

    #[test]
    fn scalars_are_named_except_convenience() {
        assert_eq!(
            generate("Date", false).unwrap(),
            vec![Declaration::Scalar {
                name: "Date".to_string(),
                documentation: None,
            }]
        );
        assert!(generate("Time", false).unwrap().is_empty());
    }

    #[test]
    fn input_object_fields_use_input_rules() {
        let declarations = generate("Filter", false).unwrap();
        let fields = record_fields_of(&declarations[0]);
        assert_eq!(fields[0].type_expr, TypeExpr::optional(TypeExpr::Text));
        assert!(fields[0].omit_when_absent);
        assert_eq!(fields[1].type_expr, TypeExpr::Int32);
        assert!(!fields[1].omit_when_absent);
    }

    #[test]
    fn union_becomes_polymorphic_record_and_marker() {
        let declarations = generate("Ride", false).unwrap();
        let polymorphic = match &declarations[0] {
            Declaration::Polymorphic(polymorphic) => polymorphic,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(polymorphic.kind, AbstractKind::Union);
        assert!(polymorphic.fields.is_empty());
        assert_eq!(polymorphic.value_field, "value");
        assert_eq!(polymorphic.marker, "RideValue");
        assert_eq!(polymorphic.decode.len(), 3);
        match &polymorphic.decode[1] {
            Statement::Dispatch {
                possible_types,
                container,
                ..
            } => {
                assert_eq!(container, "Ride");
                let names = possible_types
                    .iter()
                    .map(|p| p.graphql_name.as_str())
                    .collect::<Vec<_>>();
                assert_eq!(names, vec!["Train", "Bus"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            declarations[1],
            Declaration::Marker {
                name: "RideValue".to_string(),
                documentation: Some("RideValue is one of: Train | Bus".to_string()),
            }
        );
    }

    #[test]
    fn interface_keeps_common_fields_and_avoids_value_collision() {
        let declarations = generate("Vehicle", false).unwrap();
        match &declarations[0] {
            Declaration::Polymorphic(polymorphic) => {
                assert_eq!(polymorphic.kind, AbstractKind::Interface);
                assert_eq!(polymorphic.fields[0].ident, "name");
                assert_eq!(polymorphic.fields[0].type_expr, TypeExpr::Text);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &generate("Boxed", false).unwrap()[0] {
            Declaration::Polymorphic(polymorphic) => {
                assert_eq!(polymorphic.value_field, "value_");
                assert_eq!(polymorphic.decode[0], Statement::ReadTypeName);
                assert!(matches!(
                    &polymorphic.decode[1],
                    Statement::DecodeCommon { name, fields } if name == "__Common" && fields.len() == 1
                ));
                assert_eq!(
                    polymorphic.decode[3],
                    Statement::Construct {
                        container: "Boxed".to_string(),
                        fields: vec!["value".to_string()],
                        value_field: "value_".to_string(),
                    }
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
