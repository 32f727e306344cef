// Code generated by qlgen - DO NOT EDIT.

#![allow(dead_code, non_camel_case_types, non_snake_case, clippy::all)]

#[derive(Debug, Default, ::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Halt {
    #[serde(rename = "code")]
    pub code: String,
    #[serde(rename = "parent", skip_serializing_if = "qlgen::client::Absent::is_absent")]
    pub parent: Option<Box<Stop>>,
}
impl StopValue for Halt {}

#[derive(Debug, Default, ::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Station {
    #[serde(rename = "code")]
    pub code: String,
    #[serde(rename = "parent", skip_serializing_if = "qlgen::client::Absent::is_absent")]
    pub parent: Option<Box<Stop>>,
    #[serde(rename = "platforms", skip_serializing_if = "qlgen::client::Absent::is_absent")]
    pub platforms: Option<i32>,
}
impl StopValue for Station {}

#[derive(Debug, Default, ::serde::Serialize)]
pub struct Stop {
    #[serde(rename = "code")]
    pub code: String,
    #[serde(rename = "parent", skip_serializing_if = "qlgen::client::Absent::is_absent")]
    pub parent: Option<Box<Stop>>,
    /// Underlying value of the GraphQL interface
    #[serde(skip)]
    pub value: Option<Box<dyn StopValue>>,
}

impl<'de> ::serde::Deserialize<'de> for Stop {
    fn deserialize<__D>(deserializer: __D) -> Result<Self, __D::Error>
    where
        __D: ::serde::Deserializer<'de>,
    {
        let payload = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
        let type_name = payload.get("__typename").and_then(::serde_json::Value::as_str).map(::std::string::ToString::to_string);
        #[derive(Default, ::serde::Deserialize)]
        #[serde(default)]
        struct __Common {
            #[serde(rename = "code")]
            code: String,
            #[serde(rename = "parent")]
            parent: Option<Box<Stop>>,
        }
        let common = <__Common as ::serde::Deserialize>::deserialize(&payload).map_err(::serde::de::Error::custom)?;
        let mut payload = payload;
        if let Some(object) = payload.as_object_mut() {
            for key in ["code", "parent"] {
                object.remove(key);
            }
        }
        let value: Option<Box<dyn StopValue>> = match type_name.as_deref() {
            Some("Halt") => Some(Box::new(::serde_json::from_value::<Halt>(payload).map_err(::serde::de::Error::custom)?) as Box<dyn StopValue>),
            Some("Station") => Some(Box::new(::serde_json::from_value::<Station>(payload).map_err(::serde::de::Error::custom)?) as Box<dyn StopValue>),
            type_name => qlgen::client::unmatched_type_name(qlgen::client::AbstractKind::Interface, "Stop", type_name).map_err(::serde::de::Error::custom)?,
        };
        Ok(Stop { code: common.code, parent: common.parent, value: value })
    }
}

/// StopValue is one of: Halt | Station
pub trait StopValue: ::std::fmt::Debug + ::std::any::Any {}
