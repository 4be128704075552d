//! Field types and the schema contract used to resolve identifiers.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

/// Type a query expression resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedType {
    Boolean,
    String,
    Number,
    Date,
    /// Type could not be determined because of an earlier error
    Invalid,
}

impl ResolvedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedType::Boolean => "Boolean",
            ResolvedType::String => "String",
            ResolvedType::Number => "Number",
            ResolvedType::Date => "Date",
            ResolvedType::Invalid => "Invalid",
        }
    }

    /// Whether a value of this type can appear on either side of a comparison
    pub fn is_value_type(&self) -> bool {
        !matches!(self, ResolvedType::Boolean)
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps field names of an entity kind to their declared types.
///
/// Implementations must be free of side effects: the processor may query the
/// same schema repeatedly, and several processors may share one schema across
/// threads.
pub trait FieldTypeSchema {
    /// Returns the declared type of `name`, or `None` if no such field exists
    fn field_type(&self, name: &str) -> Option<ResolvedType>;
}

impl<S: BuildHasher> FieldTypeSchema for HashMap<String, ResolvedType, S> {
    fn field_type(&self, name: &str) -> Option<ResolvedType> {
        self.get(name).copied()
    }
}

impl FieldTypeSchema for BTreeMap<String, ResolvedType> {
    fn field_type(&self, name: &str) -> Option<ResolvedType> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher + Clone> FieldTypeSchema for DashMap<String, ResolvedType, S> {
    fn field_type(&self, name: &str) -> Option<ResolvedType> {
        self.get(name).map(|entry| *entry.value())
    }
}

impl<T: FieldTypeSchema + ?Sized> FieldTypeSchema for &T {
    fn field_type(&self, name: &str) -> Option<ResolvedType> {
        (**self).field_type(name)
    }
}

impl<T: FieldTypeSchema + ?Sized> FieldTypeSchema for Arc<T> {
    fn field_type(&self, name: &str) -> Option<ResolvedType> {
        (**self).field_type(name)
    }
}
