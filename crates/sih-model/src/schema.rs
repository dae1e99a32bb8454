//! Canonical schema: the fixed, ordered list of output fields.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::lookup::LookupKind;

/// Analytical role of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// A measured quantity (values, durations, counts).
    Metric,
    /// A descriptive attribute used to slice metrics.
    Dimension,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Metric => "metric",
            FieldRole::Dimension => "dimension",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Type a field is coerced to before output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "lookup", rename_all = "snake_case")]
pub enum TargetType {
    /// Fixed-point cents rendered with two decimals.
    Currency,
    /// Compact `YYYYMMDD` date.
    Date,
    Integer,
    /// Code resolved to a label through a dictionary.
    Coded(LookupKind),
    /// Passed through as text.
    Text,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Currency => f.write_str("currency"),
            TargetType::Date => f.write_str("date"),
            TargetType::Integer => f.write_str("integer"),
            TargetType::Coded(kind) => write!(f, "coded ({kind})"),
            TargetType::Text => f.write_str("text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalField {
    pub name: String,
    pub description: String,
    pub role: FieldRole,
    pub target: TargetType,
}

impl CanonicalField {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        role: FieldRole,
        target: TargetType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            role,
            target,
        }
    }

    /// The dictionary this field is resolved through, if any.
    pub fn lookup_kind(&self) -> Option<LookupKind> {
        match self.target {
            TargetType::Coded(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Ordered canonical fields. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    fields: Vec<CanonicalField>,
}

impl CanonicalSchema {
    /// Builds a schema, rejecting an empty list or duplicate names.
    pub fn new(fields: Vec<CanonicalField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields whose target type matches, in schema order.
    pub fn fields_with_target(&self, target: TargetType) -> impl Iterator<Item = &CanonicalField> {
        self.fields.iter().filter(move |field| field.target == target)
    }

    /// Coded fields with their dictionary, in schema order.
    pub fn coded_fields(&self) -> impl Iterator<Item = (&CanonicalField, LookupKind)> {
        self.fields
            .iter()
            .filter_map(|field| field.lookup_kind().map(|kind| (field, kind)))
    }
}
