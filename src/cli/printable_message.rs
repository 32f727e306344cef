use crate::codegen;
use crate::emit;
use crate::graphql::operation::{self, Warning};
use crate::graphql::{self, Pos, SourceFile};
use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    CompileError,
    CompileWarning,
    ProgramError,
}

/// A line of source and the column a message points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInformation {
    line: usize,
    column: usize,
    line_text: String,
}

impl LocationInformation {
    pub fn new_from_contents_and_position(contents: &str, position: &Pos) -> Self {
        let line_text = contents
            .lines()
            .nth(position.line.saturating_sub(1))
            .unwrap_or_default()
            .to_string();
        LocationInformation {
            line: position.line,
            column: position.column,
            line_text,
        }
    }
}

/// A user facing message rendered in the style of rustc diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableMessage {
    severity: Severity,
    message: String,
    file_path: Option<PathBuf>,
    location: Option<LocationInformation>,
    help_text: Option<String>,
}

impl PrintableMessage {
    fn new(severity: Severity, message: &str) -> Self {
        PrintableMessage {
            severity,
            message: message.to_string(),
            file_path: None,
            location: None,
            help_text: None,
        }
    }

    fn new_located(
        severity: Severity,
        message: &str,
        file_path: &Path,
        contents: &str,
        position: &Pos,
        help: Option<&str>,
    ) -> Self {
        let mut printable = PrintableMessage::new(severity, message);
        printable.with_source_information(
            file_path,
            Some(LocationInformation::new_from_contents_and_position(
                contents, position,
            )),
        );
        printable.help_text = help.map(str::to_string);
        printable
    }

    pub fn new_compile_error(
        message: &str,
        file_path: &Path,
        contents: &str,
        position: &Pos,
        help: Option<&str>,
    ) -> Self {
        PrintableMessage::new_located(Severity::CompileError, message, file_path, contents, position, help)
    }

    pub fn new_compile_warning(
        message: &str,
        file_path: &Path,
        contents: &str,
        position: &Pos,
        help: Option<&str>,
    ) -> Self {
        PrintableMessage::new_located(Severity::CompileWarning, message, file_path, contents, position, help)
    }

    pub fn new_simple_compile_error(message: &str) -> Self {
        PrintableMessage::new(Severity::CompileError, message)
    }

    pub fn new_simple_program_error(message: &str) -> Self {
        PrintableMessage::new(Severity::ProgramError, message)
    }

    pub fn new_compile_error_from_read_io_error(io_error: &std::io::Error, path: &Path) -> Self {
        PrintableMessage::new_simple_compile_error(&format!(
            "could not read `{}`: {io_error}",
            path.display()
        ))
    }

    pub fn with_source_information(&mut self, file_path: &Path, location: Option<LocationInformation>) -> &mut Self {
        self.file_path = Some(file_path.to_owned());
        self.location = location;
        self
    }

    pub fn with_help_text(&mut self, help: &str) -> &mut Self {
        self.help_text = Some(help.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        !matches!(self.severity, Severity::CompileWarning)
    }

    fn in_file(message: &str, file_path: &Path, help: Option<&str>) -> Self {
        let mut printable = PrintableMessage::new_simple_compile_error(message);
        printable.with_source_information(file_path, None);
        printable.help_text = help.map(str::to_string);
        printable
    }
}

impl fmt::Display for PrintableMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::CompileError => "error".red().bold(),
            Severity::CompileWarning => "warning".yellow().bold(),
            Severity::ProgramError => "program error".red().bold(),
        };
        write!(f, "{label}: {}", self.message.bold())?;
        let width = self
            .location
            .as_ref()
            .map_or(1, |location| location.line.to_string().len());
        let gutter = " ".repeat(width);
        let bar = "|".blue().bold();
        if let Some(file_path) = &self.file_path {
            let arrow = "-->".blue().bold();
            match &self.location {
                Some(location) => write!(
                    f,
                    "\n{gutter}{arrow} {}:{}:{}",
                    file_path.display(),
                    location.line,
                    location.column
                )?,
                None => write!(f, "\n{gutter}{arrow} {}", file_path.display())?,
            }
        }
        if let Some(location) = &self.location {
            let caret = format!("{}^", " ".repeat(location.column.saturating_sub(1)));
            write!(f, "\n{gutter} {bar}")?;
            write!(
                f,
                "\n{} {bar} {}",
                location.line.to_string().blue().bold(),
                location.line_text
            )?;
            write!(f, "\n{gutter} {bar} {}", caret.red().bold())?;
        }
        if let Some(help) = &self.help_text {
            write!(f, "\n{gutter} {} {help}", "= help:".bold())?;
        }
        Ok(())
    }
}

/// Help text pointing at the closest known name, if there was one
pub fn similar_help_suggestion(suggestion: Option<&str>) -> String {
    suggestion
        .map(|name| format!(" Did you mean `{name}`?"))
        .unwrap_or_default()
}

fn contents_of<'s>(sources: &'s [SourceFile], path: &Path) -> Option<&'s str> {
    sources
        .iter()
        .find(|source| source.path == path)
        .map(|source| source.contents.as_str())
}

fn query_error_help(error: &operation::Error) -> String {
    let extra = similar_help_suggestion(error.suggestion());
    match error {
        operation::Error::UnknownField { parent, .. } => {
            format!("Check the fields of `{parent}`.{extra}")
        }
        operation::Error::UnknownFragment { .. } => {
            format!("This fragment name is not defined in this document.{extra}")
        }
        operation::Error::UnknownType { .. } => {
            format!("This type is not defined in the schema.{extra}")
        }
        operation::Error::DuplicateFragment { .. } => {
            "Fragment names must be unique within a document.".to_string()
        }
        operation::Error::MissingRootType { kind, .. } => format!(
            "Declare a `{}` type or a `schema` definition naming the {} root.",
            kind.default_root_name(),
            kind.keyword()
        ),
    }
}

impl From<(&[SourceFile], graphql::Error)> for PrintableMessage {
    fn from((sources, error): (&[SourceFile], graphql::Error)) -> Self {
        match error {
            graphql::Error::Read { path, source } => {
                PrintableMessage::new_compile_error_from_read_io_error(&source, &path)
            }
            graphql::Error::MixedSchemaSources { ref path } => PrintableMessage::in_file(
                &error.to_string(),
                path,
                Some("Pass either one introspection JSON file or any number of SDL files."),
            ),
            graphql::Error::SchemaSyntax { ref path, .. }
            | graphql::Error::QuerySyntax { ref path, .. } => {
                PrintableMessage::in_file(&error.to_string(), path, None)
            }
            graphql::Error::Query { path, source } => match contents_of(sources, &path) {
                Some(contents) => PrintableMessage::new_compile_error(
                    &source.to_string(),
                    &path,
                    contents,
                    &source.position(),
                    Some(&query_error_help(&source)),
                ),
                None => PrintableMessage::in_file(&source.to_string(), &path, None),
            },
            graphql::Error::NoSchema | graphql::Error::Schema(_) => {
                PrintableMessage::new_simple_compile_error(&error.to_string())
            }
        }
    }
}

fn codegen_error_help(error: &codegen::Error) -> Option<&'static str> {
    match error {
        codegen::Error::UnsupportedAlias { .. } => Some("Select the field under its schema name."),
        codegen::Error::UnsupportedSelection { .. } => {
            Some("Select the fields of the root type directly.")
        }
        codegen::Error::AnonymousOperation { .. } => {
            Some("The operation name becomes the name of the generated function.")
        }
        codegen::Error::NestedUploadList { .. } => {
            Some("Uploads can be passed alone or in a single list.")
        }
        codegen::Error::DuplicateIdentifier { .. } => {
            Some("Rename one of them in the schema or the document.")
        }
        codegen::Error::InDocument { source, .. } => codegen_error_help(source),
        codegen::Error::MissingType(_)
        | codegen::Error::UnknownFragment { .. }
        | codegen::Error::DuplicateVariable { .. } => None,
    }
}

impl From<(&[SourceFile], codegen::Error)> for PrintableMessage {
    fn from((sources, error): (&[SourceFile], codegen::Error)) -> Self {
        let help = codegen_error_help(&error);
        match error {
            codegen::Error::InDocument { path, source } => {
                match (contents_of(sources, &path), source.position()) {
                    (Some(contents), Some(position)) => PrintableMessage::new_compile_error(
                        &source.to_string(),
                        &path,
                        contents,
                        &position,
                        help,
                    ),
                    _ => PrintableMessage::in_file(&source.to_string(), &path, help),
                }
            }
            codegen::Error::MissingType(type_name) => PrintableMessage::new_simple_program_error(
                &format!("failed lookup of type `{type_name}`"),
            ),
            other => {
                let mut printable = PrintableMessage::new_simple_compile_error(&other.to_string());
                if let Some(help) = help {
                    printable.with_help_text(help);
                }
                printable
            }
        }
    }
}

impl From<emit::Error> for PrintableMessage {
    fn from(error: emit::Error) -> Self {
        PrintableMessage::new_simple_compile_error(&error.to_string())
    }
}

impl From<(&SourceFile, &Warning)> for PrintableMessage {
    fn from((source, warning): (&SourceFile, &Warning)) -> Self {
        PrintableMessage::new_compile_warning(
            &warning.to_string(),
            &source.path,
            &source.contents,
            &warning.position(),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(message: &PrintableMessage) -> String {
        colored::control::set_override(false);
        message.to_string()
    }

    #[test]
    fn located_messages_point_at_the_column() {
        let contents = "query Me {\n  user {\n    name\n    publicRSAKey\n  }\n}\n";
        let message = PrintableMessage::new_compile_warning(
            "use of deprecated field `publicRSAKey` on type `User`",
            Path::new("me.graphql"),
            contents,
            &Pos { line: 4, column: 5 },
            None,
        );
        assert_eq!(
            plain(&message),
            "warning: use of deprecated field `publicRSAKey` on type `User`
 --> me.graphql:4:5
  |
4 |     publicRSAKey
  |     ^"
        );
        assert!(!message.is_error());
    }

    #[test]
    fn help_follows_the_location() {
        let message = PrintableMessage::new_compile_error(
            "unknown field `nam`",
            Path::new("q.graphql"),
            "query Q { nam }",
            &Pos { line: 1, column: 11 },
            Some("Check the fields of `Query`. Did you mean `name`?"),
        );
        assert!(plain(&message).ends_with(
            "1 | query Q { nam }\n  |           ^\n  = help: Check the fields of `Query`. Did you mean `name`?"
        ));
    }

    #[test]
    fn read_errors_name_the_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let message =
            PrintableMessage::new_compile_error_from_read_io_error(&io_error, Path::new("a.graphql"));
        assert_eq!(plain(&message), "error: could not read `a.graphql`: gone");
    }

    #[test]
    fn program_errors_have_their_own_label() {
        let message = PrintableMessage::new_simple_program_error("error in config file `.qlgenrc.json`");
        assert_eq!(
            plain(&message),
            "program error: error in config file `.qlgenrc.json`"
        );
    }

    #[test]
    fn codegen_errors_in_documents_are_located() {
        let sources = [SourceFile {
            path: PathBuf::from("ops.graphql"),
            contents: "{ trains { name } }".to_string(),
        }];
        let error = codegen::Error::InDocument {
            path: PathBuf::from("ops.graphql"),
            source: Box::new(codegen::Error::AnonymousOperation {
                position: Pos { line: 1, column: 1 },
            }),
        };
        let rendered = plain(&PrintableMessage::from((&sources[..], error)));
        assert!(rendered.starts_with("error: anonymous operations are not supported\n --> ops.graphql:1:1"));
        assert!(rendered.contains("= help: The operation name becomes the name of the generated function."));
    }
}
