/*!
Composable schema descriptions.

A [`Schema`] is one of three shapes: a keyed composite ([`ObjectSchema`]), a
homogeneous container ([`ContainerSchema`]) or an opaque scalar
([`LeafSchema`]). Trees are owned by the caller and never mutated; naming and
rendering build new values.
*/

use std::fmt;

/// A data shape described by an API
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Keyed record
    Object(ObjectSchema),
    /// Sequence or set of one element schema
    Container(ContainerSchema),
    /// Scalar, enum or other primitive handled by the leaf encoder
    Leaf(LeafSchema),
}

/// Name carried by a keyed composite
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelName {
    /// Given by the schema's author
    Intrinsic(String),
    /// Synthesized from the schema's path
    Derived(String),
}

/// Keyed composite schema
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Intrinsic or derived model name
    pub name: Option<ModelName>,
    /// Model description
    pub description: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<Field>,
}

/// One entry of a keyed composite
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: FieldKey,
    pub schema: Schema,
    pub description: Option<String>,
}

/// Key of a composite entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Required(String),
    Optional(String),
    /// Wildcard or validation key, never a concrete property
    Predicate(PredicateKey),
}

/// Wildcard keys accepted by a composite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateKey {
    AnyString,
    AnyKeyword,
    /// Any key matching the given pattern
    Matching(String),
}

/// Container schema wrapping exactly one element schema
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSchema {
    pub kind: ContainerKind,
    pub item: Box<Schema>,
}

/// Container flavor, preserved into `uniqueItems` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered, duplicates allowed
    Sequence,
    /// Unordered, unique
    Set,
}

/// Scalar schemas understood by the leaf encoder
#[derive(Debug, Clone, PartialEq)]
pub enum LeafSchema {
    String,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Uuid,
    Date,
    DateTime,
    /// String matching a regular expression
    Pattern(String),
    /// One of a fixed set of string values
    Enum(Vec<String>),
    /// Anything at all
    Any,
    /// Leaf that may also be null
    Nullable(Box<LeafSchema>),
    /// Application type resolved through custom mappings
    Custom(String),
}

impl Schema {
    /// Wrap an element schema into an ordered sequence
    pub fn sequence(item: impl Into<Schema>) -> Self {
        Schema::Container(ContainerSchema {
            kind: ContainerKind::Sequence,
            item: Box::new(item.into()),
        })
    }

    /// Wrap an element schema into a set
    pub fn set(item: impl Into<Schema>) -> Self {
        Schema::Container(ContainerSchema {
            kind: ContainerKind::Set,
            item: Box::new(item.into()),
        })
    }

    /// Model name of a keyed composite, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Schema::Object(object) => object.name(),
            _ => None,
        }
    }

    /// Look through one container level
    pub fn peek(&self) -> &Schema {
        match self {
            Schema::Container(container) => &container.item,
            other => other,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

impl From<LeafSchema> for Schema {
    fn from(leaf: LeafSchema) -> Self {
        Schema::Leaf(leaf)
    }
}

impl From<ContainerSchema> for Schema {
    fn from(container: ContainerSchema) -> Self {
        Schema::Container(container)
    }
}

impl ModelName {
    pub fn as_str(&self) -> &str {
        match self {
            ModelName::Intrinsic(name) | ModelName::Derived(name) => name,
        }
    }

    pub fn is_intrinsic(&self) -> bool {
        matches!(self, ModelName::Intrinsic(_))
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ObjectSchema {
    /// Create an anonymous composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composite with an intrinsic name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(ModelName::Intrinsic(name.into())),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(ModelName::as_str)
    }

    /// Set the model description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a required field
    pub fn required(self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.field(Field::new(FieldKey::Required(key.into()), schema))
    }

    /// Add an optional field
    pub fn optional(self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.field(Field::new(FieldKey::Optional(key.into()), schema))
    }

    /// Add a wildcard entry
    pub fn predicate(self, key: PredicateKey, schema: impl Into<Schema>) -> Self {
        self.field(Field::new(FieldKey::Predicate(key), schema))
    }

    /// Add a prepared field
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields naming concrete properties, in declaration order
    pub fn property_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.key.is_predicate())
    }

    /// Wildcard entries
    pub fn predicate_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.key.is_predicate())
    }
}

impl Field {
    pub fn new(key: FieldKey, schema: impl Into<Schema>) -> Self {
        Self {
            key,
            schema: schema.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl FieldKey {
    /// Raw property name, `None` for predicate keys
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldKey::Required(name) | FieldKey::Optional(name) => Some(name),
            FieldKey::Predicate(_) => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldKey::Optional(_))
    }

    pub fn is_predicate(&self) -> bool {
        matches!(self, FieldKey::Predicate(_))
    }
}

impl fmt::Display for PredicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateKey::AnyString => f.write_str("<any string>"),
            PredicateKey::AnyKeyword => f.write_str("<any keyword>"),
            PredicateKey::Matching(pattern) => write!(f, "<matching {}>", pattern),
        }
    }
}

impl fmt::Display for LeafSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafSchema::String => f.write_str("String"),
            LeafSchema::Int => f.write_str("Int"),
            LeafSchema::Long => f.write_str("Long"),
            LeafSchema::Float => f.write_str("Float"),
            LeafSchema::Double => f.write_str("Double"),
            LeafSchema::Boolean => f.write_str("Boolean"),
            LeafSchema::Uuid => f.write_str("Uuid"),
            LeafSchema::Date => f.write_str("Date"),
            LeafSchema::DateTime => f.write_str("DateTime"),
            LeafSchema::Pattern(pattern) => write!(f, "Pattern({})", pattern),
            LeafSchema::Enum(values) => write!(f, "Enum({})", values.join(", ")),
            LeafSchema::Any => f.write_str("Any"),
            LeafSchema::Nullable(inner) => write!(f, "Nullable({})", inner),
            LeafSchema::Custom(name) => f.write_str(name),
        }
    }
}
