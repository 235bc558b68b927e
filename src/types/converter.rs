//! Converters that give a type constraint its meaning.
//!
//! # Responsibilities
//! - Name the target type a constraint resolves to
//! - Enumerate declared values for closed types (enums, booleans)
//! - Decide whether a raw argument is acceptable for the type

use std::fmt;

/// What a type constraint converts arguments into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    String,
    Integer,
    Float,
    Boolean,
    File,
    Directory,
    Enum,
    /// A host-defined type the core knows nothing about.
    Custom(String),
}

impl TargetType {
    /// Returns true if `raw` parses as this type.
    ///
    /// Enum membership is checked by [`ResolvedType::accepts`], which knows
    /// the declared values.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            TargetType::Integer => raw.parse::<i64>().is_ok(),
            TargetType::Float => raw.parse::<f64>().is_ok(),
            TargetType::Boolean => matches!(raw.to_ascii_lowercase().as_str(), "true" | "false"),
            TargetType::String
            | TargetType::File
            | TargetType::Directory
            | TargetType::Enum
            | TargetType::Custom(_) => true,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::String => write!(f, "string"),
            TargetType::Integer => write!(f, "integer"),
            TargetType::Float => write!(f, "float"),
            TargetType::Boolean => write!(f, "boolean"),
            TargetType::File => write!(f, "file"),
            TargetType::Directory => write!(f, "directory"),
            TargetType::Enum => write!(f, "enum"),
            TargetType::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Converts raw arguments for one named type.
pub trait TypeConverter: Send + Sync + fmt::Debug {
    /// The type arguments convert into.
    fn target_type(&self) -> TargetType;

    /// Declared values, for closed types only.
    fn enumerate_values(&self) -> Option<Vec<String>> {
        None
    }

    /// Returns true if `raw` converts successfully.
    fn accepts(&self, raw: &str) -> bool {
        self.target_type().accepts(raw)
    }
}

/// Converter for the built-in scalar and path types.
#[derive(Debug, Clone)]
pub struct BuiltinConverter {
    target: TargetType,
}

impl BuiltinConverter {
    pub fn new(target: TargetType) -> Self {
        Self { target }
    }
}

impl TypeConverter for BuiltinConverter {
    fn target_type(&self) -> TargetType {
        self.target.clone()
    }

    fn enumerate_values(&self) -> Option<Vec<String>> {
        match self.target {
            TargetType::Boolean => Some(vec!["false".to_string(), "true".to_string()]),
            _ => None,
        }
    }
}

/// Converter for a closed set of declared values.
///
/// Matching is case-insensitive; the declared spelling is what gets
/// suggested.
#[derive(Debug, Clone)]
pub struct EnumConverter {
    values: Vec<String>,
}

impl EnumConverter {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeConverter for EnumConverter {
    fn target_type(&self) -> TargetType {
        TargetType::Enum
    }

    fn enumerate_values(&self) -> Option<Vec<String>> {
        Some(self.values.clone())
    }

    fn accepts(&self, raw: &str) -> bool {
        let raw = raw.to_lowercase();
        self.values.iter().any(|v| v.to_lowercase() == raw)
    }
}

/// Snapshot of a converter taken when a route is registered.
///
/// Routes hold this instead of the converter itself so a compiled route is
/// a plain value that can be cloned and compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// The constraint as written in the pattern.
    pub name: String,
    pub target: TargetType,
    pub values: Option<Vec<String>>,
}

impl ResolvedType {
    pub fn from_converter(name: impl Into<String>, converter: &dyn TypeConverter) -> Self {
        Self {
            name: name.into(),
            target: converter.target_type(),
            values: converter.enumerate_values(),
        }
    }

    /// Type identity used to key completion sources (lowercased name).
    pub fn identity(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    pub fn accepts(&self, raw: &str) -> bool {
        match &self.values {
            Some(values) => {
                let raw = raw.to_lowercase();
                values.iter().any(|v| v.to_lowercase() == raw)
            }
            None => self.target.accepts(raw),
        }
    }
}
