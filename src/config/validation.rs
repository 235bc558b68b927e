//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check type declarations (unique, no built-in shadowing, enums non-empty)
//! - Check that every source targets exactly one parameter or type
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Route patterns are left to the compiler; a bad pattern skips one route

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{AppConfig, TypeKind};
use crate::types::TypeRegistry;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("app_name must be non-empty and contain no whitespace (got `{0}`)")]
    InvalidAppName(String),

    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("type `{0}` shadows a built-in type")]
    ShadowsBuiltin(String),

    #[error("enum type `{0}` declares no values")]
    EmptyEnum(String),

    #[error("type name must not be empty")]
    EmptyTypeName,

    #[error("source #{index} must name exactly one of `parameter` or `type`")]
    AmbiguousSource { index: usize },

    #[error("source #{index} declares no values")]
    EmptySource { index: usize },

    #[error("source #{index} refers to unknown type `{type_name}`")]
    UnknownSourceType { index: usize, type_name: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.app_name.is_empty() || config.app_name.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidAppName(config.app_name.clone()));
    }

    let mut declared = HashSet::new();
    for ty in &config.types {
        if ty.name.trim().is_empty() {
            errors.push(ValidationError::EmptyTypeName);
            continue;
        }
        if TypeRegistry::is_builtin(&ty.name) {
            errors.push(ValidationError::ShadowsBuiltin(ty.name.clone()));
        }
        if !declared.insert(ty.name.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateType(ty.name.clone()));
        }
        if ty.kind == TypeKind::Enum && ty.values.is_empty() {
            errors.push(ValidationError::EmptyEnum(ty.name.clone()));
        }
    }

    for (index, source) in config.sources.iter().enumerate() {
        match (&source.parameter, &source.type_name) {
            (Some(_), None) => {}
            (None, Some(type_name)) => {
                let known = TypeRegistry::is_builtin(type_name)
                    || declared.contains(&type_name.to_ascii_lowercase());
                if !known {
                    errors.push(ValidationError::UnknownSourceType {
                        index,
                        type_name: type_name.clone(),
                    });
                }
            }
            _ => errors.push(ValidationError::AmbiguousSource { index }),
        }
        if source.values.is_empty() {
            errors.push(ValidationError::EmptySource { index });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
