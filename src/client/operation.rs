use super::{Absent, Error, Upload};
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;

/// A GraphQL document together with its bound variables
#[derive(Debug, Clone, Default)]
pub struct Operation {
    query: String,
    variables: BTreeMap<String, serde_json::Value>,
    uploads: BTreeMap<String, Upload>,
}

impl Operation {
    pub fn new(query: impl Into<String>) -> Self {
        Operation {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn variables(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.variables
    }

    /// Files bound through upload variables, keyed by `name` or `name.index`
    pub fn uploads(&self) -> &BTreeMap<String, Upload> {
        &self.uploads
    }

    /// Bind the variable `name`. Uploads are collected from an `Upload` or
    /// from one list level of them, either of which may be optional.
    /// Absent uploads are skipped.
    pub fn var<V: Serialize + Any>(&mut self, name: &str, value: V) -> Result<(), Error> {
        if self.variables.contains_key(name) {
            return Err(Error::DuplicateVariable(name.to_string()));
        }
        let encoded = serde_json::to_value(&value).map_err(Error::Encode)?;
        self.collect_uploads(name, &value);
        self.variables.insert(name.to_string(), encoded);
        Ok(())
    }

    fn collect_uploads(&mut self, name: &str, value: &dyn Any) {
        if let Some(upload) = value.downcast_ref::<Upload>() {
            self.insert_upload(name.to_string(), Some(upload));
        } else if let Some(upload) = value.downcast_ref::<Option<Upload>>() {
            self.insert_upload(name.to_string(), upload.as_ref());
        } else if let Some(uploads) = value.downcast_ref::<Vec<Upload>>() {
            self.collect_list(name, uploads.iter().map(Some));
        } else if let Some(uploads) = value.downcast_ref::<Vec<Option<Upload>>>() {
            self.collect_list(name, uploads.iter().map(Option::as_ref));
        } else if let Some(uploads) = value.downcast_ref::<Option<Vec<Upload>>>() {
            self.collect_list(name, uploads.iter().flatten().map(Some));
        } else if let Some(uploads) = value.downcast_ref::<Option<Vec<Option<Upload>>>>() {
            self.collect_list(name, uploads.iter().flatten().map(Option::as_ref));
        }
    }

    fn collect_list<'u>(&mut self, name: &str, uploads: impl Iterator<Item = Option<&'u Upload>>) {
        for (index, upload) in uploads.enumerate() {
            self.insert_upload(format!("{name}.{index}"), upload);
        }
    }

    fn insert_upload(&mut self, key: String, upload: Option<&Upload>) {
        if let Some(upload) = upload.filter(|upload| !upload.is_absent()) {
            self.uploads.insert(key, upload.clone());
        }
    }
}
