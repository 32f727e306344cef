//! Shapes of an introspection query result
use serde::Deserialize;
use std::io::Read;

/// `__Type` as it appears in a field or argument position
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub kind: String,
    pub name: Option<String>,
    pub of_type: Option<Box<TypeReference>>,
}

/// `__Field` and `__InputValue`
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_reference: TypeReference,
    pub args: Option<Vec<FieldDescription>>,
    pub is_deprecated: Option<bool>,
    pub deprecation_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct NamedReference {
    pub name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueDescription {
    pub name: String,
    pub description: Option<String>,
    pub is_deprecated: Option<bool>,
    pub deprecation_reason: Option<String>,
}

/// `__Type` in the top level `types` list
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescription {
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub fields: Option<Vec<FieldDescription>>,
    pub input_fields: Option<Vec<FieldDescription>>,
    pub interfaces: Option<Vec<NamedReference>>,
    pub possible_types: Option<Vec<NamedReference>>,
    pub enum_values: Option<Vec<EnumValueDescription>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescription {
    pub query_type: Option<NamedReference>,
    pub mutation_type: Option<NamedReference>,
    pub subscription_type: Option<NamedReference>,
    pub types: Vec<TypeDescription>,
}

#[derive(Deserialize)]
struct Envelope {
    data: EnvelopeData,
}

#[derive(Deserialize)]
struct EnvelopeData {
    #[serde(rename = "__schema")]
    schema: SchemaDescription,
}

impl SchemaDescription {
    /// Read `{"data": {"__schema": ...}}`
    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_reader(reader)?;
        Ok(envelope.data.schema)
    }
}
