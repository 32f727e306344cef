use crate::codegen::{self, Options};
use crate::emit::{self, EmitConfig, DEFAULT_CLIENT_PATH};
use crate::graphql::{self, SourceFile};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod printable_message;

pub use printable_message::{similar_help_suggestion, LocationInformation, PrintableMessage};

const DEFAULT_RC_PATH: &str = ".qlgenrc.json";

/// Generates Rust types and operation functions from GraphQL schemas and documents.
#[derive(Debug, Parser)]
#[command(name = "qlgen", version, author)]
pub struct Args {
    /// Schema file: one introspection JSON file or any number of SDL files
    #[arg(short = 's', long = "schema", value_name = "FILE")]
    schema_files: Vec<PathBuf>,

    /// Document of operations to generate functions for
    #[arg(short = 'q', long = "query", value_name = "FILE")]
    query_files: Vec<PathBuf>,

    /// Rust source file to write
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Wrap the generated items in `pub mod NAME`
    #[arg(short = 'n', long, value_name = "NAME")]
    module: Option<String>,

    /// Leave deprecated fields and enum values out
    #[arg(short = 'd', long)]
    omit_deprecated: bool,

    /// Path of the runtime client module used by generated code
    #[arg(long, value_name = "PATH")]
    client_path: Option<String>,

    /// JSON config file (defaults to .qlgenrc.json when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report uses of deprecated fields in the documents
    #[arg(long)]
    show_deprecation_warnings: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Settings read from the config file. Relative paths are relative to the file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RcFile {
    #[serde(default)]
    schema_files: Vec<PathBuf>,
    #[serde(default)]
    query_files: Vec<PathBuf>,
    output: Option<PathBuf>,
    module: Option<String>,
    omit_deprecated: Option<bool>,
    client_path: Option<String>,
    show_deprecation_warnings: Option<bool>,
}

impl RcFile {
    fn load(explicit_path: Option<&Path>) -> Result<Self, PrintableMessage> {
        let path = match explicit_path {
            Some(path) => path,
            None if Path::new(DEFAULT_RC_PATH).exists() => Path::new(DEFAULT_RC_PATH),
            None => return Ok(RcFile::default()),
        };
        let contents = File::open(path)
            .and_then(|file| {
                let mut buf_reader = BufReader::new(file);
                let mut contents = String::new();
                buf_reader.read_to_string(&mut contents)?;
                Ok(contents)
            })
            .map_err(|io_error| PrintableMessage::new_compile_error_from_read_io_error(&io_error, path))?;
        let rc_file: RcFile = serde_json::from_str(&contents).map_err(|error| {
            PrintableMessage::new_simple_program_error(&format!(
                "error in config file `{}`: {error}",
                path.display()
            ))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(rc_file.relative_to(path.parent().unwrap_or_else(|| Path::new(""))))
    }

    fn relative_to(mut self, directory: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = directory.join(&*path);
            }
        };
        self.schema_files.iter_mut().for_each(&resolve);
        self.query_files.iter_mut().for_each(&resolve);
        if let Some(output) = self.output.as_mut() {
            resolve(output);
        }
        self
    }
}

/// User configured runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    schema_files: Vec<PathBuf>,
    query_files: Vec<PathBuf>,
    output: PathBuf,
    module: Option<String>,
    omit_deprecated: bool,
    client_path: String,
    show_deprecation_warnings: bool,
}

impl RuntimeConfig {
    /// Merge the arguments over the config file, the arguments winning.
    /// Missing required settings exit with a usage error.
    pub fn from_args(args: Args) -> Result<Self, PrintableMessage> {
        let rc_file = RcFile::load(args.config.as_deref())?;
        Ok(RuntimeConfig::merge(args, rc_file).unwrap_or_else(|error| error.exit()))
    }

    fn merge(args: Args, rc_file: RcFile) -> Result<Self, clap::Error> {
        let schema_files = if args.schema_files.is_empty() {
            rc_file.schema_files
        } else {
            args.schema_files
        };
        if schema_files.is_empty() {
            return Err(Args::command().error(
                ErrorKind::MissingRequiredArgument,
                "a schema file is required: pass `--schema <FILE>` or set `schemaFiles` in the config file",
            ));
        }
        let output = args.output.or(rc_file.output).ok_or_else(|| {
            Args::command().error(
                ErrorKind::MissingRequiredArgument,
                "an output file is required: pass `--output <FILE>` or set `output` in the config file",
            )
        })?;
        Ok(RuntimeConfig {
            schema_files,
            query_files: if args.query_files.is_empty() {
                rc_file.query_files
            } else {
                args.query_files
            },
            output,
            module: args.module.or(rc_file.module),
            omit_deprecated: args.omit_deprecated || rc_file.omit_deprecated.unwrap_or(false),
            client_path: args
                .client_path
                .or(rc_file.client_path)
                .unwrap_or_else(|| DEFAULT_CLIENT_PATH.to_string()),
            show_deprecation_warnings: args.show_deprecation_warnings
                || rc_file.show_deprecation_warnings.unwrap_or(false),
        })
    }

    fn codegen_options(&self) -> Options {
        Options {
            omit_deprecated: self.omit_deprecated,
        }
    }

    fn emit_config(&self) -> EmitConfig {
        EmitConfig {
            module: self.module.clone(),
            client_path: self.client_path.clone(),
        }
    }
}

/// Messages produced by one run of the generator
#[derive(Debug, Default)]
pub struct CompileReport {
    pub messages: Vec<PrintableMessage>,
}

impl CompileReport {
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(PrintableMessage::is_error)
    }
}

/// Load the inputs, generate and write the output file
pub fn compile(config: &RuntimeConfig) -> CompileReport {
    let mut report = CompileReport::default();
    if let Err(message) = compile_into(config, &mut report.messages) {
        report.messages.push(message);
    }
    report
}

fn compile_into(config: &RuntimeConfig, messages: &mut Vec<PrintableMessage>) -> Result<(), PrintableMessage> {
    let no_sources: &[SourceFile] = &[];
    let schema = graphql::load_schema(&config.schema_files)
        .map_err(|error| PrintableMessage::from((no_sources, error)))?;
    let sources = SourceFile::read_all(&config.query_files)
        .map_err(|error| PrintableMessage::from((no_sources, error)))?;
    let documents = graphql::load_query_documents(&schema, &sources)
        .map_err(|error| PrintableMessage::from((&sources[..], error)))?;
    if config.show_deprecation_warnings {
        for (source, document) in sources.iter().zip(&documents) {
            messages.extend(
                document
                    .warnings
                    .iter()
                    .map(|warning| PrintableMessage::from((source, warning))),
            );
        }
    }
    let declarations = codegen::generate(&schema, &documents, &config.codegen_options())
        .map_err(|error| PrintableMessage::from((&sources[..], error)))?;
    emit::write_file(&declarations, &config.emit_config(), &config.output)?;
    info!(
        declarations = declarations.len(),
        output = %config.output.display(),
        "generated bindings"
    );
    Ok(())
}
