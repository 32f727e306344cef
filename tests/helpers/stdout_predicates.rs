use predicates::prelude::*;
use predicates::str as p_str;
use std::path::Path;

const NOT_FOUND: &str = "No such file or directory (os error 2)";

fn arrow(file_path: &Path) -> String {
    format!(" --> {}", file_path.display())
}

/// The io failure message printed when an input file cannot be read
pub fn contains_no_such_file_error(file_path: impl AsRef<Path>) -> impl Predicate<str> {
    p_str::contains(format!(
        "error: could not read `{}`: {NOT_FOUND}",
        file_path.as_ref().display()
    ))
}

/// A message pointing at a whole file, without a line and column
pub fn contains_graphql_file_error_without_location(
    file_path: impl AsRef<Path>,
) -> impl Predicate<str> {
    p_str::contains(format!("{}\n", arrow(file_path.as_ref())))
}

pub fn contains_graphql_file_error_with_location(
    file_path: impl AsRef<Path>,
    (line, column): (usize, usize),
) -> impl Predicate<str> {
    p_str::contains(format!("{}:{line}:{column}\n", arrow(file_path.as_ref())))
}
