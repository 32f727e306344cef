use super::declaration::record_field;
use super::SourceWriter;
use crate::ir::{AbstractKind, PossibleType, RecordField, Statement};

const MAP_DECODE_ERROR: &str = ".map_err(::serde::de::Error::custom)?";

/// Raw string literal with enough `#` that `text` cannot terminate it early
fn raw_string_literal(text: &str) -> String {
    let mut hashes = 1;
    while text.contains(&format!("\"{}", "#".repeat(hashes))) {
        hashes += 1;
    }
    let fence = "#".repeat(hashes);
    format!("r{fence}\"{text}\"{fence}")
}

fn local_record(writer: &mut SourceWriter<'_>, name: &str, fields: &[RecordField]) {
    writer.line("#[derive(Default, ::serde::Deserialize)]");
    writer.line("#[serde(default)]");
    writer.open(format!("struct {name} {{"));
    for field in fields {
        record_field(writer, field, false);
    }
    writer.close("}");
}

fn dispatch(
    writer: &mut SourceWriter<'_>,
    kind: AbstractKind,
    container: &str,
    marker: &str,
    possible_types: &[PossibleType],
) {
    writer.open(format!(
        "let value: Option<Box<dyn {marker}>> = match type_name.as_deref() {{"
    ));
    for possible in possible_types {
        writer.line(format!(
            "Some({:?}) => Some(Box::new(::serde_json::from_value::<{type_name}>(payload){MAP_DECODE_ERROR}) as Box<dyn {marker}>),",
            possible.graphql_name,
            type_name = possible.type_name,
        ));
    }
    let kind = match kind {
        AbstractKind::Interface => "Interface",
        AbstractKind::Union => "Union",
    };
    writer.line(format!(
        "type_name => {}({}::{kind}, {container:?}, type_name){MAP_DECODE_ERROR},",
        writer.client_item("unmatched_type_name"),
        writer.client_item("AbstractKind"),
    ));
    writer.close("};");
}

pub(super) fn render(writer: &mut SourceWriter<'_>, statement: &Statement, mutable_operation: bool) {
    match statement {
        Statement::NewOperation { query } => {
            let binding = if mutable_operation { "let mut op" } else { "let op" };
            writer.line(format!(
                "{binding} = {}({});",
                writer.client_item("Operation::new"),
                raw_string_literal(query)
            ));
        }
        Statement::BindVariable { name, ident } => {
            writer.line(format!("op.var({name:?}, {ident})?;"));
        }
        Statement::DeclareShape { name, fields } => local_record(writer, name, fields),
        Statement::Execute { shape } => {
            writer.line(format!("let response: {shape} = client.execute(ctx, &op)?;"));
        }
        Statement::Return(fields) => {
            let values = fields
                .iter()
                .map(|field| format!("response.{field}"))
                .collect::<Vec<_>>();
            match values.as_slice() {
                [single] => writer.line(format!("Ok({single})")),
                several => writer.line(format!("Ok(({}))", several.join(", "))),
            }
        }
        Statement::ReadTypeName => {
            writer.line(
                "let payload = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;",
            );
            writer.line(
                "let type_name = payload.get(\"__typename\").and_then(::serde_json::Value::as_str).map(::std::string::ToString::to_string);",
            );
        }
        Statement::DecodeCommon { name, fields } => {
            local_record(writer, name, fields);
            writer.line(format!(
                "let common = <{name} as ::serde::Deserialize>::deserialize(&payload){MAP_DECODE_ERROR};"
            ));
            writer.line("let mut payload = payload;");
            writer.open("if let Some(object) = payload.as_object_mut() {");
            let keys = fields
                .iter()
                .map(|field| format!("{:?}", field.serialized_name))
                .collect::<Vec<_>>();
            writer.open(format!("for key in [{}] {{", keys.join(", ")));
            writer.line("object.remove(key);");
            writer.close("}");
            writer.close("}");
        }
        Statement::Dispatch {
            kind,
            container,
            marker,
            possible_types,
        } => dispatch(writer, *kind, container, marker, possible_types),
        Statement::Construct {
            container,
            fields,
            value_field,
        } => {
            let assigned = fields
                .iter()
                .map(|field| format!("{field}: common.{field}"))
                .chain(std::iter::once(format!("{value_field}: value")))
                .collect::<Vec<_>>();
            writer.line(format!("Ok({container} {{ {} }})", assigned.join(", ")));
        }
    }
}
