//! Configuration schema definitions.
//!
//! This module defines the configuration of a hosted application: its
//! routes, extra types and static completion sources. All types derive Serde
//! traits for deserialization from TOML.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{BuiltinConverter, EnumConverter, TargetType, TypeConverter};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display name, and the command the generated scripts complete.
    pub app_name: String,

    /// Callback behaviour.
    pub completion: CompletionConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Type converters registered on top of the built-ins.
    pub types: Vec<TypeConfig>,

    /// Route patterns in registration order.
    pub routes: Vec<RouteConfig>,

    /// Static completion sources.
    pub sources: Vec<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "tabroute".to_string(),
            completion: CompletionConfig::default(),
            logging: LoggingConfig::default(),
            types: Vec::new(),
            routes: Vec::new(),
            sources: Vec::new(),
        }
    }
}

/// Callback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Whether the callback's cursor index counts the program name as
    /// word 0.
    pub cursor_includes_program: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            cursor_includes_program: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `TABROUTE_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Kind of a configured type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Enum,
    String,
    Integer,
    Float,
    Boolean,
    File,
    Directory,
}

/// A named type available to `{name:Type}` constraints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypeConfig {
    pub name: String,
    pub kind: TypeKind,

    /// Declared values (enums only).
    #[serde(default)]
    pub values: Vec<String>,
}

impl TypeConfig {
    /// Build the converter this entry describes.
    pub fn converter(&self) -> Arc<dyn TypeConverter> {
        let target = match self.kind {
            TypeKind::Enum => return Arc::new(EnumConverter::new(self.values.clone())),
            TypeKind::String => TargetType::String,
            TypeKind::Integer => TargetType::Integer,
            TypeKind::Float => TargetType::Float,
            TypeKind::Boolean => TargetType::Boolean,
            TypeKind::File => TargetType::File,
            TypeKind::Directory => TargetType::Directory,
        };
        Arc::new(BuiltinConverter::new(target))
    }
}

/// A route pattern.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    pub pattern: String,

    /// Shown next to the command in completions.
    #[serde(default)]
    pub description: Option<String>,

    /// Opaque handler identity; defaults to the pattern.
    #[serde(default)]
    pub handler: Option<String>,
}

/// A fixed list of completion values for a parameter name or a type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub parameter: Option<String>,

    #[serde(default, rename = "type")]
    pub type_name: Option<String>,

    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,
}
