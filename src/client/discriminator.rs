use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbstractKind {
    Interface,
    Union,
}

impl fmt::Display for AbstractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractKind::Interface => write!(f, "interface"),
            AbstractKind::Union => write!(f, "union"),
        }
    }
}

/// A polymorphic value whose `__typename` does not select a concrete type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{kind} {container}: missing __typename field")]
    MissingTypeName {
        kind: AbstractKind,
        container: String,
    },
    #[error("{kind} {container}: unknown __typename {type_name:?}")]
    UnknownTypeName {
        kind: AbstractKind,
        container: String,
        type_name: String,
    },
}

/// Outcome of decoding an interface or union whose `__typename` matched none
/// of its possible types. A missing discriminator leaves an interface without
/// a value; everything else is an error.
pub fn unmatched_type_name<V: ?Sized>(
    kind: AbstractKind,
    container: &str,
    type_name: Option<&str>,
) -> Result<Option<Box<V>>, DecodeError> {
    match (kind, type_name) {
        (AbstractKind::Interface, None) => Ok(None),
        (AbstractKind::Union, None) => Err(DecodeError::MissingTypeName {
            kind,
            container: container.to_string(),
        }),
        (_, Some(type_name)) => Err(DecodeError::UnknownTypeName {
            kind,
            container: container.to_string(),
            type_name: type_name.to_string(),
        }),
    }
}
