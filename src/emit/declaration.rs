use super::statement;
use super::SourceWriter;
use crate::ir::{Declaration, Function, Param, Polymorphic, RecordField, Statement};

const SERDE_DERIVES: &str = "::serde::Serialize, ::serde::Deserialize";

pub(super) fn render(writer: &mut SourceWriter<'_>, declaration: &Declaration) {
    match declaration {
        Declaration::Scalar {
            name,
            documentation,
        } => {
            writer.docs(documentation);
            writer.line(format!(
                "#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, {SERDE_DERIVES})]"
            ));
            writer.line("#[serde(transparent)]");
            writer.line(format!("pub struct {name}(pub String);"));
        }
        Declaration::Enum {
            name,
            documentation,
            constants,
        } => {
            writer.docs(documentation);
            writer.line(format!(
                "#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, {SERDE_DERIVES})]"
            ));
            writer.line("#[serde(transparent)]");
            writer.line(format!(
                "pub struct {name}(pub ::std::borrow::Cow<'static, str>);"
            ));
            for constant in constants {
                writer.line("");
                writer.docs(&constant.documentation);
                writer.line(format!(
                    "pub const {}: {name} = {name}(::std::borrow::Cow::Borrowed({:?}));",
                    constant.ident, constant.value
                ));
            }
        }
        Declaration::Record {
            name,
            documentation,
            fields,
        } => {
            writer.docs(documentation);
            writer.line(format!("#[derive(Debug, Default, {SERDE_DERIVES})]"));
            writer.line("#[serde(default)]");
            writer.open(format!("pub struct {name} {{"));
            for field in fields {
                record_field(writer, field, true);
            }
            writer.close("}");
        }
        Declaration::Polymorphic(polymorphic) => render_polymorphic(writer, polymorphic),
        Declaration::Marker {
            name,
            documentation,
        } => {
            writer.docs(documentation);
            writer.line(format!(
                "pub trait {name}: ::std::fmt::Debug + ::std::any::Any {{}}"
            ));
        }
        Declaration::MarkerImpl { type_name, marker } => {
            writer.line(format!("impl {marker} for {type_name} {{}}"));
        }
        Declaration::Function(function) => render_function(writer, function),
    }
}

/// A field of a record. Public records skip absent values when serialized.
pub(super) fn record_field(writer: &mut SourceWriter<'_>, field: &RecordField, public: bool) {
    writer.docs(&field.documentation);
    if public && field.omit_when_absent {
        writer.line(format!(
            "#[serde(rename = {:?}, skip_serializing_if = \"{}\")]",
            field.serialized_name,
            writer.client_item("Absent::is_absent")
        ));
    } else {
        writer.line(format!("#[serde(rename = {:?})]", field.serialized_name));
    }
    let visibility = if public { "pub " } else { "" };
    let type_expr = writer.type_expr(&field.type_expr);
    writer.line(format!("{visibility}{}: {type_expr},", field.ident));
}

fn render_polymorphic(writer: &mut SourceWriter<'_>, polymorphic: &Polymorphic) {
    let Polymorphic {
        name,
        documentation,
        kind,
        fields,
        value_field,
        marker,
        decode,
    } = polymorphic;
    writer.docs(documentation);
    writer.line("#[derive(Debug, Default, ::serde::Serialize)]");
    writer.open(format!("pub struct {name} {{"));
    for field in fields {
        record_field(writer, field, true);
    }
    writer.line(format!("/// Underlying value of the GraphQL {}", kind.name()));
    writer.line("#[serde(skip)]");
    writer.line(format!("pub {value_field}: Option<Box<dyn {marker}>>,"));
    writer.close("}");
    writer.line("");
    writer.open(format!("impl<'de> ::serde::Deserialize<'de> for {name} {{"));
    writer.line("fn deserialize<__D>(deserializer: __D) -> Result<Self, __D::Error>");
    writer.line("where");
    writer.line("    __D: ::serde::Deserializer<'de>,");
    writer.open("{");
    for step in decode {
        statement::render(writer, step, false);
    }
    writer.close("}");
    writer.close("}");
}

fn render_function(writer: &mut SourceWriter<'_>, function: &Function) {
    writer.docs(&function.documentation);
    writer.open(format!("pub fn {}(", function.name));
    for param in &function.params {
        let rendered = match param {
            Param::Client => format!("client: &{},", writer.client_item("Client")),
            Param::Context => format!("ctx: &{},", writer.client_item("Context")),
            Param::Variable { ident, type_expr } => {
                format!("{ident}: {},", writer.type_expr(type_expr))
            }
        };
        writer.line(rendered);
    }
    let returns = match function.returns.as_slice() {
        [single] => writer.type_expr(single),
        several => format!(
            "({})",
            several
                .iter()
                .map(|returned| writer.type_expr(returned))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    writer.close(format!(
        ") -> Result<{returns}, {}> {{",
        writer.client_item("Error")
    ));
    writer.depth += 1;
    let binds_variables = function
        .body
        .iter()
        .any(|step| matches!(step, Statement::BindVariable { .. }));
    for step in &function.body {
        statement::render(writer, step, binds_variables);
    }
    writer.close("}");
}
