//! Produce a consumable schema from SDL documents or introspection JSON
use field::normalize_documentation;
pub use field::{Deprecation, Field, TypeRef};
use graphql_parser::schema as parsed_schema;
use std::collections::HashMap;
use std::convert::{TryFrom, TryInto};
use std::io::Read;

pub mod field;
mod json;

pub type Documentation = Option<String>;

pub const BUILT_IN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Scalars with a representation supplied by the runtime client
pub const CONVENIENCE_SCALARS: [&str; 4] = ["Time", "Map", "Upload", "Any"];

pub fn is_convenience_scalar(name: &str) -> bool {
    CONVENIENCE_SCALARS.contains(&name)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing `ofType` on a LIST type reference")]
    MissingTypeOfForList,
    #[error("missing `ofType` on a NON_NULL type reference")]
    MissingTypeOfForNonNull,
    #[error("missing `name` on a named type reference")]
    MissingNameForField,
    #[error("unknown kind `{kind}` for type `{name}`")]
    UnknownType { name: String, kind: String },
    #[error("enum `{0}` is missing its values")]
    EnumMissingValues(String),
    #[error("JSON parse error: {0}")]
    JSONParseError(#[from] serde_json::Error),
    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),
    #[error("cannot extend undefined type `{0}`")]
    ExtensionOfUnknownType(String),
    #[error("extension of `{0}` does not match the kind of its definition")]
    ExtensionKindMismatch(String),
    #[error("unknown type `{type_name}` referenced by `{referrer}`")]
    UnknownTypeReference { type_name: String, referrer: String },
    #[error("`{member}` in union `{union_name}` is not an object type")]
    InvalidUnionMember { union_name: String, member: String },
    #[error("`{implementor}` implements `{interface_name}`, which is not an interface")]
    InvalidImplementation {
        implementor: String,
        interface_name: String,
    },
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn default_root_name(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    InputObject,
    Interface,
    Union,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub documentation: Documentation,
    pub deprecation: Deprecation,
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub fields: Vec<Field>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub fields: Vec<Field>,
    /// Object types implementing this interface, sorted by name
    pub possible_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UnionType {
    /// Members in declaration order
    pub possible_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum TypeDefinition {
    Scalar,
    Enum(Vec<EnumValue>),
    Object(ObjectType),
    InputObject(Vec<Field>),
    Interface(InterfaceType),
    Union(UnionType),
}

impl TypeDefinition {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDefinition::Scalar => TypeKind::Scalar,
            TypeDefinition::Enum(_) => TypeKind::Enum,
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::InputObject(_) => TypeKind::InputObject,
            TypeDefinition::Interface(_) => TypeKind::Interface,
            TypeDefinition::Union(_) => TypeKind::Union,
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            TypeDefinition::Object(ObjectType { fields, .. })
            | TypeDefinition::Interface(InterfaceType { fields, .. })
            | TypeDefinition::InputObject(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn possible_types(&self) -> Option<&[String]> {
        match self {
            TypeDefinition::Interface(InterfaceType { possible_types, .. })
            | TypeDefinition::Union(UnionType { possible_types }) => Some(possible_types),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Type {
    pub name: String,
    pub documentation: Documentation,
    pub built_in: bool,
    pub definition: TypeDefinition,
}

impl Type {
    fn new_built_in_scalar(name: &str) -> Self {
        Type {
            name: name.to_string(),
            documentation: None,
            built_in: true,
            definition: TypeDefinition::Scalar,
        }
    }

    pub fn kind(&self) -> TypeKind {
        self.definition.kind()
    }
}

fn enum_values_from_parsed<'a>(values: &[parsed_schema::EnumValue<'a, String>]) -> Vec<EnumValue> {
    values
        .iter()
        .map(|value| EnumValue {
            name: value.name.clone(),
            documentation: normalize_documentation(value.description.clone()),
            deprecation: Deprecation::from_directives(&value.directives),
        })
        .collect()
}

impl<'a> From<&parsed_schema::TypeDefinition<'a, String>> for Type {
    fn from(parsed: &parsed_schema::TypeDefinition<'a, String>) -> Self {
        let (name, description, definition) = match parsed {
            parsed_schema::TypeDefinition::Scalar(scalar) => {
                (&scalar.name, &scalar.description, TypeDefinition::Scalar)
            }
            parsed_schema::TypeDefinition::Enum(enum_type) => (
                &enum_type.name,
                &enum_type.description,
                TypeDefinition::Enum(enum_values_from_parsed(&enum_type.values)),
            ),
            parsed_schema::TypeDefinition::Object(object) => (
                &object.name,
                &object.description,
                TypeDefinition::Object(ObjectType {
                    fields: object.fields.iter().map(Field::from).collect(),
                    interfaces: object.implements_interfaces.clone(),
                }),
            ),
            parsed_schema::TypeDefinition::InputObject(input) => (
                &input.name,
                &input.description,
                TypeDefinition::InputObject(input.fields.iter().map(Field::from).collect()),
            ),
            parsed_schema::TypeDefinition::Interface(interface) => (
                &interface.name,
                &interface.description,
                TypeDefinition::Interface(InterfaceType {
                    fields: interface.fields.iter().map(Field::from).collect(),
                    possible_types: Vec::new(),
                }),
            ),
            parsed_schema::TypeDefinition::Union(union_type) => (
                &union_type.name,
                &union_type.description,
                TypeDefinition::Union(UnionType {
                    possible_types: union_type.types.clone(),
                }),
            ),
        };
        Type {
            name: name.clone(),
            documentation: normalize_documentation(description.clone()),
            built_in: BUILT_IN_SCALARS.contains(&name.as_str()),
            definition,
        }
    }
}

impl TryFrom<json::TypeDescription> for Type {
    type Error = Error;
    fn try_from(json: json::TypeDescription) -> Result<Self> {
        let json::TypeDescription {
            kind,
            name,
            description,
            possible_types,
            input_fields,
            interfaces,
            fields,
            enum_values,
        } = json;
        let convert_fields = |fields: Option<Vec<json::FieldDescription>>| {
            fields
                .unwrap_or_default()
                .into_iter()
                .map(Field::try_from)
                .collect::<Result<Vec<_>>>()
        };
        let named = |descriptions: Option<Vec<json::NamedReference>>| {
            descriptions
                .unwrap_or_default()
                .into_iter()
                .map(|description| description.name)
                .collect::<Vec<_>>()
        };
        let definition = match kind.as_ref() {
            "SCALAR" => TypeDefinition::Scalar,
            "ENUM" => {
                let values = enum_values
                    .ok_or_else(|| Error::EnumMissingValues(name.clone()))?
                    .into_iter()
                    .map(|value| EnumValue {
                        name: value.name,
                        documentation: normalize_documentation(value.description),
                        deprecation: Deprecation::from_json(
                            value.is_deprecated,
                            value.deprecation_reason,
                        ),
                    })
                    .collect();
                TypeDefinition::Enum(values)
            }
            "OBJECT" => TypeDefinition::Object(ObjectType {
                fields: convert_fields(fields)?,
                interfaces: named(interfaces),
            }),
            "INPUT_OBJECT" => TypeDefinition::InputObject(convert_fields(input_fields)?),
            "INTERFACE" => {
                let mut possible_types = named(possible_types);
                possible_types.sort_unstable();
                TypeDefinition::Interface(InterfaceType {
                    fields: convert_fields(fields)?,
                    possible_types,
                })
            }
            "UNION" => TypeDefinition::Union(UnionType {
                possible_types: named(possible_types),
            }),
            _ => return Err(Error::UnknownType { name, kind }),
        };
        Ok(Type {
            built_in: name.starts_with("__") || BUILT_IN_SCALARS.contains(&name.as_str()),
            documentation: normalize_documentation(description),
            name,
            definition,
        })
    }
}

#[derive(Debug)]
pub struct Schema {
    types: HashMap<String, Type>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    /// Merge one or more parsed SDL documents into a single schema.
    ///
    /// Type extensions are applied after every definition has been collected, so
    /// an extension may appear in a different document than the type it extends.
    pub fn from_sdl_documents<'a>(documents: &[parsed_schema::Document<'a, String>]) -> Result<Self> {
        let mut types = HashMap::new();
        let mut roots: [Option<String>; 3] = [None, None, None];
        let mut extensions = Vec::new();
        for definition in documents.iter().flat_map(|document| &document.definitions) {
            match definition {
                parsed_schema::Definition::TypeDefinition(type_def) => {
                    let new_type = Type::from(type_def);
                    if types.contains_key(&new_type.name) {
                        return Err(Error::DuplicateType(new_type.name));
                    }
                    types.insert(new_type.name.clone(), new_type);
                }
                parsed_schema::Definition::SchemaDefinition(schema_def) => {
                    let declared = [
                        &schema_def.query,
                        &schema_def.mutation,
                        &schema_def.subscription,
                    ];
                    for (root, declared) in roots.iter_mut().zip(declared) {
                        if declared.is_some() {
                            *root = declared.clone();
                        }
                    }
                }
                parsed_schema::Definition::TypeExtension(extension) => extensions.push(extension),
                parsed_schema::Definition::DirectiveDefinition(_) => {}
            }
        }
        for extension in extensions {
            apply_extension(&mut types, extension)?;
        }
        for name in BUILT_IN_SCALARS {
            types
                .entry(name.to_string())
                .or_insert_with(|| Type::new_built_in_scalar(name));
        }
        let [query_type, mutation_type, subscription_type] = roots;
        let default_root = |declared: Option<String>, kind: OperationKind| {
            declared.or_else(|| {
                let name = kind.default_root_name();
                types.contains_key(name).then(|| name.to_string())
            })
        };
        let query_type = default_root(query_type, OperationKind::Query);
        let mutation_type = default_root(mutation_type, OperationKind::Mutation);
        let subscription_type = default_root(subscription_type, OperationKind::Subscription);
        let mut schema = Schema {
            types,
            query_type,
            mutation_type,
            subscription_type,
        };
        schema.collect_interface_implementations()?;
        schema.validate()?;
        Ok(schema)
    }

    /// Build a schema from introspection query result JSON
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let json_schema = json::SchemaDescription::from_reader(reader)?;
        let mut types = HashMap::with_capacity(json_schema.types.len());
        for json_type in json_schema.types {
            let schema_type: Type = json_type.try_into()?;
            types.insert(schema_type.name.clone(), schema_type);
        }
        for name in BUILT_IN_SCALARS {
            types
                .entry(name.to_string())
                .or_insert_with(|| Type::new_built_in_scalar(name));
        }
        let schema = Schema {
            types,
            query_type: json_schema.query_type.map(|t| t.name),
            mutation_type: json_schema.mutation_type.map(|t| t.name),
            subscription_type: json_schema.subscription_type.map(|t| t.name),
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn get_type_for_name(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// All types in unspecified order
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        [
            OperationKind::Query,
            OperationKind::Mutation,
            OperationKind::Subscription,
        ]
        .into_iter()
        .any(|kind| self.root_type_name(kind) == Some(name))
    }

    /// Look up a field of a type, including the implicit `__typename` field
    pub fn get_field(&self, type_name: &str, field_name: &str) -> Option<Field> {
        if field_name == "__typename" {
            return self.types.contains_key(type_name).then(Field::new_type_name);
        }
        self.types
            .get(type_name)?
            .definition
            .fields()?
            .iter()
            .find(|field| field.name == field_name)
            .cloned()
    }

    /// Interfaces and unions that list `type_name` as a possible type, sorted by name
    pub fn abstract_types_of(&self, type_name: &str) -> Vec<&str> {
        let mut names = self
            .types
            .values()
            .filter(|candidate| {
                candidate
                    .definition
                    .possible_types()
                    .map_or(false, |possible| possible.iter().any(|p| p == type_name))
            })
            .map(|candidate| candidate.name.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    fn collect_interface_implementations(&mut self) -> Result<()> {
        let mut implementations: HashMap<String, Vec<String>> = HashMap::new();
        for object in self.types.values() {
            if let TypeDefinition::Object(ObjectType { interfaces, .. }) = &object.definition {
                for interface_name in interfaces {
                    implementations
                        .entry(interface_name.clone())
                        .or_default()
                        .push(object.name.clone());
                }
            }
        }
        for (interface_name, mut implementors) in implementations {
            match self.types.get_mut(&interface_name).map(|t| &mut t.definition) {
                Some(TypeDefinition::Interface(interface)) => {
                    implementors.sort_unstable();
                    interface.possible_types = implementors;
                }
                Some(_) => {
                    return Err(Error::InvalidImplementation {
                        implementor: implementors.swap_remove(0),
                        interface_name,
                    })
                }
                None => {
                    return Err(Error::UnknownTypeReference {
                        type_name: interface_name,
                        referrer: implementors.swap_remove(0),
                    })
                }
            }
        }
        Ok(())
    }

    /// Every type reference must resolve; union members must be objects.
    fn validate(&self) -> Result<()> {
        let check = |type_ref: &TypeRef, referrer: String| {
            let type_name = type_ref.leaf_name();
            if self.types.contains_key(type_name) {
                Ok(())
            } else {
                Err(Error::UnknownTypeReference {
                    type_name: type_name.to_string(),
                    referrer,
                })
            }
        };
        for schema_type in self.types.values().filter(|t| !t.name.starts_with("__")) {
            for field in schema_type.definition.fields().unwrap_or_default() {
                check(&field.type_ref, format!("{}.{}", schema_type.name, field.name))?;
                for argument in &field.arguments {
                    check(
                        &argument.type_ref,
                        format!("{}.{}({}:)", schema_type.name, field.name, argument.name),
                    )?;
                }
            }
            if let TypeDefinition::Union(UnionType { possible_types }) = &schema_type.definition {
                for member in possible_types {
                    match self.types.get(member).map(Type::kind) {
                        Some(TypeKind::Object) => {}
                        Some(_) => {
                            return Err(Error::InvalidUnionMember {
                                union_name: schema_type.name.clone(),
                                member: member.clone(),
                            })
                        }
                        None => {
                            return Err(Error::UnknownTypeReference {
                                type_name: member.clone(),
                                referrer: schema_type.name.clone(),
                            })
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn apply_extension<'a>(
    types: &mut HashMap<String, Type>,
    extension: &parsed_schema::TypeExtension<'a, String>,
) -> Result<()> {
    let name = match extension {
        parsed_schema::TypeExtension::Scalar(ext) => &ext.name,
        parsed_schema::TypeExtension::Object(ext) => &ext.name,
        parsed_schema::TypeExtension::Interface(ext) => &ext.name,
        parsed_schema::TypeExtension::Union(ext) => &ext.name,
        parsed_schema::TypeExtension::Enum(ext) => &ext.name,
        parsed_schema::TypeExtension::InputObject(ext) => &ext.name,
    };
    let extended = types
        .get_mut(name)
        .ok_or_else(|| Error::ExtensionOfUnknownType(name.clone()))?;
    match (extension, &mut extended.definition) {
        (parsed_schema::TypeExtension::Scalar(_), TypeDefinition::Scalar) => {}
        (parsed_schema::TypeExtension::Object(ext), TypeDefinition::Object(object)) => {
            object.fields.extend(ext.fields.iter().map(Field::from));
            object
                .interfaces
                .extend(ext.implements_interfaces.iter().cloned());
        }
        (parsed_schema::TypeExtension::Interface(ext), TypeDefinition::Interface(interface)) => {
            interface.fields.extend(ext.fields.iter().map(Field::from));
        }
        (parsed_schema::TypeExtension::InputObject(ext), TypeDefinition::InputObject(fields)) => {
            fields.extend(ext.fields.iter().map(Field::from));
        }
        (parsed_schema::TypeExtension::Union(ext), TypeDefinition::Union(union_type)) => {
            union_type.possible_types.extend(ext.types.iter().cloned());
        }
        (parsed_schema::TypeExtension::Enum(ext), TypeDefinition::Enum(values)) => {
            values.extend(enum_values_from_parsed(&ext.values));
        }
        _ => return Err(Error::ExtensionKindMismatch(name.clone())),
    }
    Ok(())
}
