use crate::context::ENTITY_CONTEXT;
use crate::error::DisplayError;
use entity_embed_model::DisplaySettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Which entity types a display plugin supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntityTypesDeclaration", into = "EntityTypesDeclaration")]
pub enum EntityTypeConstraint {
    /// Any entity type.
    #[default]
    Any,
    /// Only the listed entity types.
    Only(BTreeSet<String>),
}

impl EntityTypeConstraint {
    pub fn only<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(types.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, entity_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(types) => types.contains(entity_type),
        }
    }
}

/// `entity_types` as written in declarative metadata: `false` for any type,
/// a single type name, or a list of names. Normalized on load; `true` is
/// rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityTypesDeclaration {
    Unrestricted(bool),
    Single(String),
    List(Vec<String>),
}

impl TryFrom<EntityTypesDeclaration> for EntityTypeConstraint {
    type Error = String;

    fn try_from(declaration: EntityTypesDeclaration) -> Result<Self, Self::Error> {
        match declaration {
            EntityTypesDeclaration::Unrestricted(false) => Ok(Self::Any),
            EntityTypesDeclaration::Unrestricted(true) => {
                Err("entity_types must be false, a type name or a list of names".to_string())
            }
            EntityTypesDeclaration::Single(entity_type) => Ok(Self::only([entity_type])),
            EntityTypesDeclaration::List(types) => Ok(Self::only(types)),
        }
    }
}

impl From<EntityTypeConstraint> for EntityTypesDeclaration {
    fn from(constraint: EntityTypeConstraint) -> Self {
        match constraint {
            EntityTypeConstraint::Any => Self::Unrestricted(false),
            EntityTypeConstraint::Only(types) => Self::List(types.into_iter().collect()),
        }
    }
}

/// One choice of a select option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// The input type of a configuration option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionKind {
    Select { options: Vec<SelectOption> },
    Checkbox,
    Textfield,
}

/// A configurable setting of a display plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigOption {
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: OptionKind,
    pub default: Value,
}

impl ConfigOption {
    /// Shorthand for a select with `(value, label)` choices.
    pub fn select(name: &str, title: &str, choices: &[(&str, &str)], default: &str) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind: OptionKind::Select {
                options: choices
                    .iter()
                    .map(|(value, label)| SelectOption {
                        value: (*value).into(),
                        label: (*label).into(),
                    })
                    .collect(),
            },
            default: Value::String(default.into()),
        }
    }

    /// Shorthand for a checkbox.
    pub fn checkbox(name: &str, title: &str, default: bool) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind: OptionKind::Checkbox,
            default: Value::Bool(default),
        }
    }

    /// Shorthand for a free-text field.
    pub fn textfield(name: &str, title: &str, default: &str) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind: OptionKind::Textfield,
            default: Value::String(default.into()),
        }
    }

    /// Checks `value` against this option and returns its normalized form.
    /// Checkboxes accept booleans and the numbers 0/1.
    pub fn normalize(&self, value: &Value) -> Result<Value, String> {
        match (&self.kind, value) {
            (OptionKind::Select { options }, Value::String(s)) => {
                if options.iter().any(|o| &o.value == s) {
                    Ok(value.clone())
                } else {
                    Err(format!("has no choice '{s}'"))
                }
            }
            (OptionKind::Select { .. }, _) => Err("must be a string".into()),
            (OptionKind::Checkbox, Value::Bool(_)) => Ok(value.clone()),
            (OptionKind::Checkbox, Value::Number(n)) => match n.as_u64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(format!("must be 0 or 1, got {n}")),
            },
            (OptionKind::Checkbox, _) => Err("must be a boolean".into()),
            (OptionKind::Textfield, Value::String(_)) => Ok(value.clone()),
            (OptionKind::Textfield, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (OptionKind::Textfield, _) => Err("must be a string".into()),
        }
    }
}

fn default_contexts() -> BTreeSet<String> {
    BTreeSet::from([ENTITY_CONTEXT.to_string()])
}

/// Registry entry describing one display strategy.
///
/// Definitions are immutable once registered. Per-request configuration is
/// a separate [`DisplaySettings`] value bound when an instance is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPluginDefinition {
    /// Unique id, optionally namespaced as `group:subtype`.
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub entity_types: EntityTypeConstraint,
    /// Context names an instance accepts.
    #[serde(default = "default_contexts")]
    pub contexts: BTreeSet<String>,
    #[serde(default)]
    pub options: Vec<ConfigOption>,
}

impl DisplayPluginDefinition {
    /// A definition for any entity type that accepts the `entity` context.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            entity_types: EntityTypeConstraint::Any,
            contexts: default_contexts(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entity_types(mut self, entity_types: EntityTypeConstraint) -> Self {
        self.entity_types = entity_types;
        self
    }

    #[must_use]
    pub fn with_context(mut self, name: impl Into<String>) -> Self {
        self.contexts.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: ConfigOption) -> Self {
        self.options.push(option);
        self
    }

    /// The `group` part of a `group:subtype` id, if namespaced.
    pub fn group(&self) -> Option<&str> {
        self.id.split_once(':').map(|(group, _)| group)
    }

    pub fn option(&self, name: &str) -> Option<&ConfigOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Produces the full configuration for an instance: defaults for every
    /// option, overridden by validated values from `supplied`. Keys that name
    /// no option are dropped.
    pub fn resolve_configuration(
        &self,
        supplied: &DisplaySettings,
    ) -> Result<DisplaySettings, DisplayError> {
        let mut configuration = DisplaySettings::new();
        for option in &self.options {
            let value = match supplied.get(&option.name) {
                Some(value) => option.normalize(value).map_err(|reason| {
                    DisplayError::InvalidConfiguration {
                        plugin_id: self.id.clone(),
                        option: option.name.clone(),
                        reason,
                    }
                })?,
                None => option.default.clone(),
            };
            configuration.insert(option.name.clone(), value);
        }
        Ok(configuration)
    }
}
