//! Declarations produced by code generation, before they are rendered as source
use crate::graphql::schema::Documentation;

/// Scalars whose representation ships with the runtime client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convenience {
    Time,
    Map,
    Upload,
    Any,
}

impl Convenience {
    pub fn from_scalar_name(name: &str) -> Option<Self> {
        match name {
            "Time" => Some(Convenience::Time),
            "Map" => Some(Convenience::Map),
            "Upload" => Some(Convenience::Upload),
            "Any" => Some(Convenience::Any),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Convenience::Time => "Time",
            Convenience::Map => "Map",
            Convenience::Upload => "Upload",
            Convenience::Any => "Any",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Int32,
    Float64,
    Text,
    Boolean,
    Convenience(Convenience),
    /// A generated declaration
    Named(String),
    List(Box<TypeExpr>),
    /// Explicit optionality
    Optional(Box<TypeExpr>),
    /// Optional heap indirection, breaking cycles between records
    Indirect(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn list(inner: TypeExpr) -> Self {
        TypeExpr::List(Box::new(inner))
    }

    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Optional(Box::new(inner))
    }

    pub fn indirect(inner: TypeExpr) -> Self {
        TypeExpr::Indirect(Box::new(inner))
    }

    pub fn list_depth(&self) -> usize {
        match self {
            TypeExpr::List(inner) => 1 + inner.list_depth(),
            TypeExpr::Optional(inner) | TypeExpr::Indirect(inner) => inner.list_depth(),
            _ => 0,
        }
    }

    /// Optional and indirect layers directly around the leaf
    pub fn leaf_pointer_layers(&self) -> usize {
        match self {
            TypeExpr::List(inner) => inner.leaf_pointer_layers(),
            TypeExpr::Optional(inner) | TypeExpr::Indirect(inner) => match inner.as_ref() {
                TypeExpr::List(_) => inner.leaf_pointer_layers(),
                _ => 1 + inner.leaf_pointer_layers(),
            },
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub ident: String,
    /// Key of the field in the JSON payload
    pub serialized_name: String,
    pub type_expr: TypeExpr,
    pub omit_when_absent: bool,
    pub documentation: Documentation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub ident: String,
    pub value: String,
    pub documentation: Documentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbstractKind {
    Interface,
    Union,
}

impl AbstractKind {
    pub fn name(self) -> &'static str {
        match self {
            AbstractKind::Interface => "interface",
            AbstractKind::Union => "union",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PossibleType {
    /// Value of `__typename` selecting this type
    pub graphql_name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Client,
    Context,
    Variable { ident: String, type_expr: TypeExpr },
}

/// Steps of a generated function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Start a request from canonical query text
    NewOperation { query: String },
    BindVariable { name: String, ident: String },
    /// Declare a local record the response data decodes into
    DeclareShape { name: String, fields: Vec<RecordField> },
    Execute { shape: String },
    /// Return the listed fields of the decoded shape
    Return(Vec<String>),
    /// Buffer the payload and read its `__typename`
    ReadTypeName,
    /// Decode the shared `fields` into a local record and remove them from
    /// the payload, so no subtree is decoded twice
    DecodeCommon { name: String, fields: Vec<RecordField> },
    /// Branch on `__typename`, decoding the payload as the matched type
    Dispatch {
        kind: AbstractKind,
        container: String,
        marker: String,
        possible_types: Vec<PossibleType>,
    },
    /// Build the container from the common fields and the dispatched value
    Construct {
        container: String,
        fields: Vec<String>,
        value_field: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polymorphic {
    pub name: String,
    pub documentation: Documentation,
    pub kind: AbstractKind,
    pub fields: Vec<RecordField>,
    pub value_field: String,
    pub marker: String,
    pub decode: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub documentation: Documentation,
    pub params: Vec<Param>,
    pub returns: Vec<TypeExpr>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Scalar {
        name: String,
        documentation: Documentation,
    },
    Enum {
        name: String,
        documentation: Documentation,
        constants: Vec<EnumConstant>,
    },
    Record {
        name: String,
        documentation: Documentation,
        fields: Vec<RecordField>,
    },
    Polymorphic(Polymorphic),
    Marker {
        name: String,
        documentation: Documentation,
    },
    MarkerImpl {
        type_name: String,
        marker: String,
    },
    Function(Function),
}

impl Declaration {
    /// Name the declaration introduces into the output module, if any
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Declaration::Scalar { name, .. }
            | Declaration::Enum { name, .. }
            | Declaration::Record { name, .. }
            | Declaration::Marker { name, .. } => Some(name),
            Declaration::Polymorphic(polymorphic) => Some(&polymorphic.name),
            Declaration::Function(function) => Some(&function.name),
            Declaration::MarkerImpl { .. } => None,
        }
    }
}
