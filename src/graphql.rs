//! Reading schema and operation documents from disk
use schema::Schema;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod fragment;
pub mod operation;
pub mod schema;

pub use graphql_parser::Pos;
pub use operation::QueryDocument;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no schema file was provided")]
    NoSchema,
    #[error("introspection JSON `{}` cannot be combined with other schema files", path.display())]
    MixedSchemaSources { path: PathBuf },
    #[error("{message}")]
    SchemaSyntax { path: PathBuf, message: String },
    #[error("malformed schema: {0}")]
    Schema(#[from] schema::Error),
    #[error("{message}")]
    QuerySyntax { path: PathBuf, message: String },
    #[error("{source}")]
    Query {
        path: PathBuf,
        #[source]
        source: operation::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// File the error originates from, when it can be attributed to one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Read { path, .. }
            | Error::MixedSchemaSources { path }
            | Error::SchemaSyntax { path, .. }
            | Error::QuerySyntax { path, .. }
            | Error::Query { path, .. } => Some(path),
            Error::NoSchema | Error::Schema(_) => None,
        }
    }
}

/// Text of one input file, kept alive for the documents that borrow from it
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        File::open(path)
            .and_then(|file| {
                let mut buf_reader = BufReader::new(file);
                let mut contents = String::new();
                buf_reader.read_to_string(&mut contents)?;
                Ok(contents)
            })
            .map(|contents| SourceFile {
                path: path.to_owned(),
                contents,
            })
            .map_err(|source| Error::Read {
                path: path.to_owned(),
                source,
            })
    }

    pub fn read_all(paths: &[PathBuf]) -> Result<Vec<Self>> {
        paths.iter().map(|path| SourceFile::read(path)).collect()
    }
}

fn is_introspection_json(path: &Path) -> bool {
    path.extension().map_or(false, |extension| extension == "json")
}

/// Load a schema from either one introspection JSON file or any number of SDL
/// files, which are merged into one schema.
pub fn load_schema(paths: &[PathBuf]) -> Result<Schema> {
    match paths {
        [] => Err(Error::NoSchema),
        [path] if is_introspection_json(path) => {
            debug!(path = %path.display(), "loading introspection schema");
            let file = File::open(path).map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
            Ok(Schema::from_reader(BufReader::new(file))?)
        }
        _ => {
            if let Some(path) = paths.iter().find(|path| is_introspection_json(path)) {
                return Err(Error::MixedSchemaSources { path: path.clone() });
            }
            let sources = SourceFile::read_all(paths)?;
            let documents = sources
                .iter()
                .map(|source| {
                    debug!(path = %source.path.display(), "parsing schema document");
                    graphql_parser::parse_schema::<String>(&source.contents).map_err(|error| {
                        Error::SchemaSyntax {
                            path: source.path.clone(),
                            message: error.to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Schema::from_sdl_documents(&documents)?)
        }
    }
}

/// Parse and resolve every operation document against the schema
pub fn load_query_documents<'a>(
    schema: &Schema,
    sources: &'a [SourceFile],
) -> Result<Vec<QueryDocument<'a>>> {
    sources
        .iter()
        .map(|source| QueryDocument::load(schema, source))
        .collect()
}

/// The candidate most similar to `name`, if any is similar enough to suggest
pub(crate) fn closest_name<'c>(
    name: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate))
        .filter(|(score, _)| *score > 0.8)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, candidate)| candidate.to_string())
}
