// Code generated by qlgen - DO NOT EDIT.

#![allow(dead_code, non_camel_case_types, non_snake_case, clippy::all)]

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
#[serde(transparent)]
pub struct Color(pub ::std::borrow::Cow<'static, str>);

pub const COLOR_RED: Color = Color(::std::borrow::Cow::Borrowed("RED"));

pub const COLOR_BLUE: Color = Color(::std::borrow::Cow::Borrowed("BLUE"));

/// A passenger train
#[derive(Debug, Default, ::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct Train {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "maxSpeed")]
    pub max_speed: i32,
    #[serde(rename = "color", skip_serializing_if = "qlgen::client::Absent::is_absent")]
    pub color: Option<Color>,
}

/// Runs the `fetchTrain` query.
pub fn fetch_train(
    client: &qlgen::client::Client,
    ctx: &qlgen::client::Context,
    name: String,
) -> Result<Option<Box<Train>>, qlgen::client::Error> {
    let mut op = qlgen::client::Operation::new(r#"query fetchTrain($name: String!) {
  train(name: $name) {
    maxSpeed
  }
}
"#);
    op.var("name", name)?;
    #[derive(Default, ::serde::Deserialize)]
    #[serde(default)]
    struct __Response {
        #[serde(rename = "train")]
        train: Option<Box<Train>>,
    }
    let response: __Response = client.execute(ctx, &op)?;
    Ok(response.train)
}
