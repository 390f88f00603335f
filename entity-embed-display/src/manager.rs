//! Display plugin registry and context-based selection.
//!
//! The registry is an explicit table of id → (definition, factory), built
//! once at startup and immutable afterwards. Selection instantiates each
//! definition independently; one plugin failing never affects the others.

use crate::builtin::{DefaultDisplay, EntityIdDisplay, EntityViewDisplay, LabelDisplay};
use crate::context::DisplayContext;
use crate::definition::DisplayPluginDefinition;
use crate::error::DisplayError;
use crate::plugin::{DisplayBase, DisplayFactory, DisplayPlugin, DisplayServices};
use crate::policy::DisplayPolicy;
use entity_embed_model::{DisplaySettings, Entity, EntityTypeRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Why a definition was left out of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// The site policy does not offer this plugin.
    PolicyDenied,
    /// The factory or configuration rejected the instance.
    Instantiation(DisplayError),
    /// A context value could not be bound.
    Context(DisplayError),
    /// The access check itself failed.
    AccessCheck(DisplayError),
    /// The access check ran and said no.
    AccessDenied,
}

/// Outcome of evaluating one definition against a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Excluded(ExclusionReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

fn builtin_table() -> [(DisplayPluginDefinition, DisplayFactory); 4] {
    [
        (DefaultDisplay::definition(), DefaultDisplay::create),
        (EntityIdDisplay::definition(), EntityIdDisplay::create),
        (EntityViewDisplay::definition(), EntityViewDisplay::create),
        (LabelDisplay::definition(), LabelDisplay::create),
    ]
}

struct RegisteredDisplay {
    definition: DisplayPluginDefinition,
    factory: DisplayFactory,
}

/// Collects definitions before the registry is frozen.
#[derive(Default)]
pub struct DisplayPluginManagerBuilder {
    entries: BTreeMap<String, RegisteredDisplay>,
    services: DisplayServices,
    policy: DisplayPolicy,
}

impl DisplayPluginManagerBuilder {
    #[must_use]
    pub fn services(mut self, services: DisplayServices) -> Self {
        self.services = services;
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: DisplayPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Adds a definition. Ids must be unique.
    pub fn register(
        mut self,
        definition: DisplayPluginDefinition,
        factory: DisplayFactory,
    ) -> Result<Self, DisplayError> {
        if self.entries.contains_key(&definition.id) {
            return Err(DisplayError::DuplicatePlugin(definition.id));
        }
        self.entries.insert(
            definition.id.clone(),
            RegisteredDisplay {
                definition,
                factory,
            },
        );
        Ok(self)
    }

    /// Adds the built-in displays (default, entity id, rendered entity, label).
    pub fn register_builtins(self) -> Result<Self, DisplayError> {
        builtin_table()
            .into_iter()
            .try_fold(self, |builder, (definition, factory)| {
                builder.register(definition, factory)
            })
    }

    pub fn build(self) -> DisplayPluginManager {
        info!(count = self.entries.len(), "Display plugin registry built");
        DisplayPluginManager {
            entries: self.entries,
            services: self.services,
            policy: self.policy,
        }
    }
}

/// Registry of display plugins, queried per render or selection request.
pub struct DisplayPluginManager {
    entries: BTreeMap<String, RegisteredDisplay>,
    services: DisplayServices,
    policy: DisplayPolicy,
}

impl DisplayPluginManager {
    pub fn builder() -> DisplayPluginManagerBuilder {
        DisplayPluginManagerBuilder::default()
    }

    /// A registry holding only the built-in displays.
    pub fn with_builtins(entity_types: Arc<EntityTypeRegistry>) -> Self {
        let mut builder = Self::builder().services(DisplayServices::new(entity_types));
        for (definition, factory) in builtin_table() {
            builder
                .entries
                .insert(definition.id.clone(), RegisteredDisplay { definition, factory });
        }
        builder.build()
    }

    pub fn policy(&self) -> &DisplayPolicy {
        &self.policy
    }

    pub fn services(&self) -> &DisplayServices {
        &self.services
    }

    pub fn definition(&self, plugin_id: &str) -> Option<&DisplayPluginDefinition> {
        self.entries.get(plugin_id).map(|e| &e.definition)
    }

    /// All definitions in registry order.
    pub fn definitions(&self) -> impl Iterator<Item = &DisplayPluginDefinition> {
        self.entries.values().map(|e| &e.definition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiates `plugin_id` with `configuration` resolved against the
    /// definition's options. No context is bound yet.
    pub fn create_instance(
        &self,
        plugin_id: &str,
        configuration: &DisplaySettings,
    ) -> Result<Box<dyn DisplayPlugin>, DisplayError> {
        let entry = self
            .entries
            .get(plugin_id)
            .ok_or_else(|| DisplayError::PluginNotFound(plugin_id.to_string()))?;
        let configuration = entry.definition.resolve_configuration(configuration)?;
        let base = DisplayBase::new(
            entry.definition.clone(),
            configuration,
            self.services.clone(),
        );
        (entry.factory)(base)
    }

    /// Evaluates one definition against `contexts` with its default
    /// configuration.
    pub fn evaluate(&self, plugin_id: &str, contexts: &DisplayContext) -> Eligibility {
        if !self.policy.is_allowed(plugin_id) {
            return Eligibility::Excluded(ExclusionReason::PolicyDenied);
        }

        let mut display = match self.create_instance(plugin_id, &DisplaySettings::new()) {
            Ok(display) => display,
            Err(e) => return Eligibility::Excluded(ExclusionReason::Instantiation(e)),
        };
        if let Err(e) = display.bind_context(contexts) {
            return Eligibility::Excluded(ExclusionReason::Context(e));
        }
        match display.access() {
            Ok(true) => Eligibility::Eligible,
            Ok(false) => Eligibility::Excluded(ExclusionReason::AccessDenied),
            Err(e) => Eligibility::Excluded(ExclusionReason::AccessCheck(e)),
        }
    }

    /// Evaluates every definition against `contexts`.
    pub fn evaluate_for_contexts(&self, contexts: &DisplayContext) -> BTreeMap<String, Eligibility> {
        self.entries
            .keys()
            .map(|id| {
                let eligibility = self.evaluate(id, contexts);
                if let Eligibility::Excluded(reason) = &eligibility {
                    debug!(plugin_id = %id, ?reason, "Display plugin excluded");
                }
                (id.clone(), eligibility)
            })
            .collect()
    }

    /// Definitions whose instance binds `contexts` and passes its access
    /// check.
    pub fn definitions_for_contexts(
        &self,
        contexts: &DisplayContext,
    ) -> BTreeMap<String, &DisplayPluginDefinition> {
        self.evaluate_for_contexts(contexts)
            .into_iter()
            .filter(|(_, eligibility)| eligibility.is_eligible())
            .filter_map(|(id, _)| self.definition(&id).map(|d| (id, d)))
            .collect()
    }

    /// Labels of the displays usable for `entity`, keyed by plugin id.
    pub fn definition_options_for_entity(&self, entity: &Entity) -> BTreeMap<String, String> {
        self.definitions_for_contexts(&DisplayContext::for_entity(entity.clone()))
            .into_iter()
            .map(|(id, definition)| (id, definition.label.clone()))
            .collect()
    }
}
