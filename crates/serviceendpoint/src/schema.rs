//! Attribute schema for service endpoint resources.
//!
//! A [`ResourceSchema`] declares which attributes a resource accepts and how
//! the host should treat them (required, computed, sensitive, replacement on
//! change, defaults, diff suppression). The host engine owns planning and
//! diffing; this module only declares the contract and applies defaults and
//! presence checks to a configuration before the first lifecycle call.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{ResourceData, SchemaError};

/// Decides whether a proposed change from `old` to `new` for attribute `key`
/// should be ignored by the host's planner.
pub type DiffSuppressFn = fn(key: &str, old: &str, new: &str, data: &ResourceData) -> bool;

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// Value type of an attribute. Service endpoint resources only use strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// A UTF-8 string.
    String,
}

/// Where an unset attribute takes its value from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeDefault {
    /// A literal value.
    Value(String),
    /// An environment variable; an unset or empty variable yields no default.
    Env {
        /// Variable name.
        var: String,
    },
}

impl AttributeDefault {
    /// Resolves the default against the process environment.
    pub fn resolve(&self) -> Option<String> {
        match self {
            Self::Value(v) => Some(v.clone()),
            Self::Env { var } => std::env::var(var).ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Declaration of a single resource attribute.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    /// Value type.
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Configuration must supply a non-empty value.
    pub required: bool,
    /// Configuration may supply a value.
    pub optional: bool,
    /// The provider may set the value from the service response.
    pub computed: bool,
    /// The value is a secret.
    pub sensitive: bool,
    /// A change replaces the resource.
    pub force_new: bool,
    /// Human-readable description shown by the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source of the value when configuration leaves it unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<AttributeDefault>,
    /// Planner hook deciding whether a change is noise.
    #[serde(skip)]
    pub diff_suppress: Option<DiffSuppressFn>,
}

impl Attribute {
    fn string() -> Self {
        Self {
            kind: AttributeType::String,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            force_new: false,
            description: None,
            default: None,
            diff_suppress: None,
        }
    }

    /// A string the configuration must supply.
    pub fn required_string() -> Self {
        Self {
            required: true,
            ..Self::string()
        }
    }

    /// A string the configuration may supply.
    pub fn optional_string() -> Self {
        Self {
            optional: true,
            ..Self::string()
        }
    }

    /// A string only the provider sets.
    pub fn computed_string() -> Self {
        Self {
            computed: true,
            ..Self::string()
        }
    }

    /// A string the configuration may supply; otherwise the provider fills it.
    pub fn optional_computed_string() -> Self {
        Self {
            optional: true,
            computed: true,
            ..Self::string()
        }
    }

    /// Marks the attribute as sensitive (redacted by the host in plan output).
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Changing this attribute replaces the resource instead of updating it.
    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Sets the description shown by the host.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Uses `value` when the configuration leaves the attribute unset.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(AttributeDefault::Value(value.into()));
        self
    }

    /// Reads the value from environment variable `var` when the configuration
    /// leaves the attribute unset.
    #[must_use]
    pub fn with_env_default(mut self, var: impl Into<String>) -> Self {
        self.default = Some(AttributeDefault::Env { var: var.into() });
        self
    }

    /// Installs a diff-suppress hook, replacing any previous one.
    #[must_use]
    pub fn with_diff_suppress(mut self, f: DiffSuppressFn) -> Self {
        self.diff_suppress = Some(f);
        self
    }

    /// Returns `true` when configuration may set this attribute.
    pub fn is_configurable(&self) -> bool {
        self.required || self.optional
    }
}

// ---------------------------------------------------------------------------
// Resource schema
// ---------------------------------------------------------------------------

/// Attribute declarations of one resource type, keyed by attribute name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceSchema {
    attributes: BTreeMap<String, Attribute>,
}

impl ResourceSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an attribute declaration.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.insert(name, attribute);
        self
    }

    /// Adds or replaces an attribute declaration in place.
    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.attributes.insert(name.into(), attribute);
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.get_mut(name)
    }

    /// Iterates declarations in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Applies defaults to unset configurable attributes, then checks the
    /// record against the declarations.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnknownAttribute`] for an undeclared attribute.
    /// - [`SchemaError::TypeMismatch`] for a non-string, non-null value.
    /// - [`SchemaError::MissingRequired`] for a required attribute that is
    ///   still empty once defaults are applied.
    pub fn prepare(&self, data: &mut ResourceData) -> Result<(), SchemaError> {
        for (name, value) in data.attributes() {
            let attribute = self
                .attributes
                .get(name)
                .ok_or_else(|| SchemaError::UnknownAttribute {
                    attribute: name.to_owned(),
                })?;
            match (attribute.kind, value) {
                (AttributeType::String, Value::String(_) | Value::Null) => {}
                (AttributeType::String, _) => {
                    return Err(SchemaError::TypeMismatch {
                        attribute: name.to_owned(),
                        expected: "string",
                    })
                }
            }
        }

        for (name, attribute) in &self.attributes {
            if !attribute.is_configurable() || data.get_non_empty(name).is_some() {
                continue;
            }
            if let Some(value) = attribute.default.as_ref().and_then(AttributeDefault::resolve) {
                data.set(name.as_str(), value);
            }
            if attribute.required && data.get_non_empty(name).is_none() {
                return Err(SchemaError::MissingRequired {
                    attribute: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Asks the attribute's suppress hook whether a change should be ignored.
    ///
    /// Returns `false` for undeclared attributes and attributes without a hook.
    pub fn suppresses_diff(&self, key: &str, old: &str, new: &str, data: &ResourceData) -> bool {
        self.attributes
            .get(key)
            .and_then(|a| a.diff_suppress)
            .is_some_and(|suppress| suppress(key, old, new, data))
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
