// Code generated by qlgen - DO NOT EDIT.

pub mod api {
    #![allow(dead_code, non_camel_case_types, non_snake_case, clippy::all)]

    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
    #[serde(transparent)]
    pub struct Role(pub ::std::borrow::Cow<'static, str>);

    pub const ROLE_ADMIN: Role = Role(::std::borrow::Cow::Borrowed("ADMIN"));

    /// Someone with an account
    #[derive(Debug, Default, ::serde::Serialize, ::serde::Deserialize)]
    #[serde(default)]
    pub struct User {
        /// Display name
        #[serde(rename = "name")]
        pub name: String,
        #[serde(rename = "role")]
        pub role: Role,
    }

    /// Runs the `Me` query.
    pub fn me(
        client: &crate::gql::Client,
        ctx: &crate::gql::Context,
    ) -> Result<Option<Box<User>>, crate::gql::Error> {
        let op = crate::gql::Operation::new(r#"query Me {
  me {
    name
  }
}
"#);
        #[derive(Default, ::serde::Deserialize)]
        #[serde(default)]
        struct __Response {
            #[serde(rename = "me")]
            me: Option<Box<User>>,
        }
        let response: __Response = client.execute(ctx, &op)?;
        Ok(response.me)
    }
}
