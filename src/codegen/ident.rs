//! Turning GraphQL names into Rust identifiers
use super::Error;
use std::collections::HashMap;

const KEYWORDS: [&str; 51] = [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: [&str; 4] = ["self", "Self", "super", "crate"];

/// Prelude names generated code refers to unqualified
const PRELUDE_NAMES: [&str; 9] = [
    "Option", "Result", "Box", "Vec", "String", "Some", "None", "Ok", "Err",
];

fn escape_keyword(ident: String) -> String {
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) || ident == "_" {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// `maxSpeed` becomes `max_speed`, `HTTPServer` becomes `http_server`
pub fn to_snake_case(name: &str) -> String {
    let chars = name.chars().collect::<Vec<_>>();
    let mut snake = String::with_capacity(name.len() + 4);
    for (index, &current) in chars.iter().enumerate() {
        if current.is_uppercase() && index > 0 {
            let previous = chars[index - 1];
            let next_is_lower = chars.get(index + 1).map_or(false, |next| next.is_lowercase());
            let boundary = previous.is_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_uppercase() && next_is_lower);
            if boundary && !snake.ends_with('_') {
                snake.push('_');
            }
        }
        snake.extend(current.to_lowercase());
    }
    snake
}

pub fn to_screaming_snake_case(name: &str) -> String {
    to_snake_case(name).to_uppercase()
}

/// Identifier for a field, parameter or function
pub fn value_ident(name: &str) -> String {
    escape_keyword(to_snake_case(name))
}

/// Identifier for a generated type, kept as written in the schema
pub fn type_ident(name: &str) -> String {
    if PRELUDE_NAMES.contains(&name) {
        return format!("{name}_");
    }
    escape_keyword(name.to_string())
}

/// Identifier of the marker trait for an interface or union
pub fn marker_ident(name: &str) -> String {
    format!("{}Value", type_ident(name).trim_start_matches("r#"))
}

/// Identifier of an enum constant: the enum name and value, upper snake cased
pub fn constant_ident(enum_name: &str, value: &str) -> String {
    format!(
        "{}_{}",
        to_screaming_snake_case(enum_name),
        to_screaming_snake_case(value)
    )
}

/// Tracks identifiers already taken within one scope
#[derive(Debug)]
pub struct IdentScope<'c> {
    context: &'c str,
    taken: HashMap<String, String>,
}

impl<'c> IdentScope<'c> {
    pub fn new(context: &'c str) -> Self {
        IdentScope {
            context,
            taken: HashMap::new(),
        }
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.taken.contains_key(ident)
    }

    /// Claim `ident` for the GraphQL name `source`
    pub fn claim(&mut self, source: &str, ident: &str) -> Result<(), Error> {
        if let Some(first) = self.taken.get(ident) {
            return Err(Error::DuplicateIdentifier {
                context: self.context.to_string(),
                first: first.clone(),
                second: source.to_string(),
                ident: ident.to_string(),
            });
        }
        self.taken.insert(ident.to_string(), source.to_string());
        Ok(())
    }
}
