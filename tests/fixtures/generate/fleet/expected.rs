// Code generated by qlgen - DO NOT EDIT.

#![allow(dead_code, non_camel_case_types, non_snake_case, clippy::all)]

#[derive(Debug, Default, ::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Bus {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "line", skip_serializing_if = "qlgen::client::Absent::is_absent")]
    pub line: Option<i32>,
}
impl VehicleValue for Bus {}

#[derive(Debug, Default, ::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Train {
    #[serde(rename = "name")]
    pub name: String,
}
impl VehicleValue for Train {}

#[derive(Debug, Default, ::serde::Serialize)]
pub struct Vehicle {
    /// Underlying value of the GraphQL union
    #[serde(skip)]
    pub value: Option<Box<dyn VehicleValue>>,
}

impl<'de> ::serde::Deserialize<'de> for Vehicle {
    fn deserialize<__D>(deserializer: __D) -> Result<Self, __D::Error>
    where
        __D: ::serde::Deserializer<'de>,
    {
        let payload = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
        let type_name = payload.get("__typename").and_then(::serde_json::Value::as_str).map(::std::string::ToString::to_string);
        let value: Option<Box<dyn VehicleValue>> = match type_name.as_deref() {
            Some("Train") => Some(Box::new(::serde_json::from_value::<Train>(payload).map_err(::serde::de::Error::custom)?) as Box<dyn VehicleValue>),
            Some("Bus") => Some(Box::new(::serde_json::from_value::<Bus>(payload).map_err(::serde::de::Error::custom)?) as Box<dyn VehicleValue>),
            type_name => qlgen::client::unmatched_type_name(qlgen::client::AbstractKind::Union, "Vehicle", type_name).map_err(::serde::de::Error::custom)?,
        };
        Ok(Vehicle { value: value })
    }
}

/// VehicleValue is one of: Train | Bus
pub trait VehicleValue: ::std::fmt::Debug + ::std::any::Any {}

/// Runs the `Fleet` query.
pub fn fleet(
    client: &qlgen::client::Client,
    ctx: &qlgen::client::Context,
) -> Result<Vec<Vehicle>, qlgen::client::Error> {
    let op = qlgen::client::Operation::new(r#"query Fleet {
  vehicles {
    __typename
    ... on Bus {
      line
    }
  }
}
"#);
    #[derive(Default, ::serde::Deserialize)]
    #[serde(default)]
    struct __Response {
        #[serde(rename = "vehicles")]
        vehicles: Vec<Vehicle>,
    }
    let response: __Response = client.execute(ctx, &op)?;
    Ok(response.vehicles)
}
