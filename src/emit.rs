//! Rendering declarations as Rust source and writing them out
use crate::graphql::schema::Documentation;
use crate::ir::{Declaration, TypeExpr};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

mod declaration;
mod statement;

pub const DEFAULT_CLIENT_PATH: &str = "qlgen::client";
const HEADER: &str = "// Code generated by qlgen - DO NOT EDIT.";
const LINT_ALLOWANCES: &str =
    "#![allow(dead_code, non_camel_case_types, non_snake_case, clippy::all)]";
const INDENT: &str = "    ";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Wrap the output in `pub mod <module>`
    pub module: Option<String>,
    /// Path of the runtime client module generated code refers to
    pub client_path: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            module: None,
            client_path: DEFAULT_CLIENT_PATH.to_string(),
        }
    }
}

pub(crate) struct SourceWriter<'c> {
    out: String,
    depth: usize,
    client: &'c str,
}

impl<'c> SourceWriter<'c> {
    fn new(client: &'c str) -> Self {
        SourceWriter {
            out: String::new(),
            depth: 0,
            client,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn docs(&mut self, documentation: &Documentation) {
        if let Some(documentation) = documentation {
            for doc_line in documentation.lines() {
                self.line(format!("/// {doc_line}"));
            }
        }
    }

    /// Path of an item in the runtime client module
    fn client_item(&self, item: &str) -> String {
        format!("{}::{item}", self.client)
    }

    fn type_expr(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::Int32 => "i32".to_string(),
            TypeExpr::Float64 => "f64".to_string(),
            TypeExpr::Text => "String".to_string(),
            TypeExpr::Boolean => "bool".to_string(),
            TypeExpr::Convenience(convenience) => self.client_item(convenience.name()),
            TypeExpr::Named(name) => name.clone(),
            TypeExpr::List(inner) => format!("Vec<{}>", self.type_expr(inner)),
            TypeExpr::Optional(inner) => format!("Option<{}>", self.type_expr(inner)),
            TypeExpr::Indirect(inner) => format!("Option<Box<{}>>", self.type_expr(inner)),
        }
    }
}

/// Render declarations as the text of one Rust source file
pub fn render(declarations: &[Declaration], config: &EmitConfig) -> String {
    let mut writer = SourceWriter::new(&config.client_path);
    writer.line(HEADER);
    writer.line("");
    if let Some(module) = &config.module {
        writer.open(format!("pub mod {module} {{"));
    }
    writer.line(LINT_ALLOWANCES);
    for declaration in declarations {
        if !matches!(declaration, Declaration::MarkerImpl { .. }) {
            writer.line("");
        }
        declaration::render(&mut writer, declaration);
    }
    if config.module.is_some() {
        writer.close("}");
    }
    writer.out
}

/// Render the declarations into `path`, replacing any previous contents
pub fn write_file(declarations: &[Declaration], config: &EmitConfig, path: &Path) -> Result<(), Error> {
    let into_error = |source| Error::Write {
        path: path.to_owned(),
        source,
    };
    let contents = render(declarations, config);
    let file = File::create(path).map_err(into_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes()).map_err(into_error)?;
    writer.flush().map_err(into_error)?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote generated source");
    Ok(())
}
