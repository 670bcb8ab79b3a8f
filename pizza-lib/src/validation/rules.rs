//! Schema builder for fluent rule declarations.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use regex::Regex;

use super::field::Field;
use super::result::ValidationResult;
use crate::error::FieldValidationError;
use crate::model::OrderValues;

/// Type alias for sync validation rule closures.
type SyncRule<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

/// Type alias for async validation rule closures.
type AsyncRule<V> = Box<dyn Fn(V) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Type-erased rule set for one field.
struct FieldRules {
    field: Field,
    validate_sync: Box<dyn Fn(&OrderValues) -> Vec<String> + Send + Sync>,
    validate_async: Box<dyn Fn(&OrderValues) -> BoxFuture<'static, Vec<String>> + Send + Sync>,
}

/// Declarative rule set for the order form.
///
/// Built once and shared by reference; validation never mutates it.
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    /// Starts declaring a new schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Runs the synchronous rules of one field.
    ///
    /// Returns the first failing rule's message. Fields without rules are
    /// always valid.
    pub fn validate_field(&self, field: Field, values: &OrderValues) -> Result<(), String> {
        match self.rules_for(field) {
            Some(rules) => first_error((rules.validate_sync)(values)),
            None => Ok(()),
        }
    }

    /// Runs every rule of one field, including async rules.
    pub async fn validate_field_async(
        &self,
        field: Field,
        values: &OrderValues,
    ) -> Result<(), String> {
        match self.rules_for(field) {
            Some(rules) => first_error((rules.validate_async)(values).await),
            None => Ok(()),
        }
    }

    /// Runs the synchronous rules of every field.
    pub fn validate(&self, values: &OrderValues) -> ValidationResult {
        let errors = self
            .fields
            .iter()
            .filter_map(|rules| {
                first_error((rules.validate_sync)(values))
                    .err()
                    .map(|msg| FieldValidationError::new(rules.field, msg))
            })
            .collect();

        ValidationResult::from_errors(errors)
    }

    /// Runs every rule of every field, including async rules.
    pub async fn validate_async(&self, values: &OrderValues) -> ValidationResult {
        let mut errors = Vec::new();

        for rules in &self.fields {
            if let Err(msg) = first_error((rules.validate_async)(values).await) {
                errors.push(FieldValidationError::new(rules.field, msg));
            }
        }

        ValidationResult::from_errors(errors)
    }

    /// Returns `true` if every field passes its synchronous rules.
    pub fn is_valid(&self, values: &OrderValues) -> bool {
        self.fields
            .iter()
            .all(|rules| (rules.validate_sync)(values).is_empty())
    }

    /// Returns `true` if every field passes all of its rules.
    pub async fn is_valid_async(&self, values: &OrderValues) -> bool {
        self.validate_async(values).await.is_valid()
    }

    fn rules_for(&self, field: Field) -> Option<&FieldRules> {
        self.fields.iter().find(|rules| rules.field == field)
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field(
                "fields",
                &self.fields.iter().map(|r| r.field).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn first_error(errors: Vec<String>) -> Result<(), String> {
    match errors.into_iter().next() {
        Some(msg) => Err(msg),
        None => Ok(()),
    }
}

/// Builder for a [`Schema`].
pub struct SchemaBuilder {
    fields: Vec<FieldRules>,
}

impl SchemaBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare rules for a field.
    ///
    /// `extract` pulls the value the rules look at out of the order.
    pub fn field<V, F>(self, field: Field, extract: F) -> FieldBuilder<V>
    where
        V: Clone + Send + Sync + 'static,
        F: Fn(&OrderValues) -> V + Send + Sync + 'static,
    {
        FieldBuilder {
            builder: self,
            field,
            extract: Arc::new(extract),
            sync_rules: Vec::new(),
            async_rules: Vec::new(),
        }
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for adding validation rules to a single field.
pub struct FieldBuilder<V> {
    builder: SchemaBuilder,
    field: Field,
    extract: Arc<dyn Fn(&OrderValues) -> V + Send + Sync>,
    sync_rules: Vec<SyncRule<V>>,
    async_rules: Vec<AsyncRule<V>>,
}

impl<V: Clone + Send + Sync + 'static> FieldBuilder<V> {
    /// Add a custom synchronous validation rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.sync_rules
            .push(Box::new(move |v: &V| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Add a custom asynchronous validation rule.
    pub fn rule_async<F, Fut>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let msg = msg.into();
        self.async_rules.push(Box::new(move |v: V| {
            let fut = f(v);
            let msg = msg.clone();
            Box::pin(async move { if fut.await { Ok(()) } else { Err(msg) } })
        }));
        self
    }

    /// Continue to the next field.
    pub fn field<V2, F>(self, field: Field, extract: F) -> FieldBuilder<V2>
    where
        V2: Clone + Send + Sync + 'static,
        F: Fn(&OrderValues) -> V2 + Send + Sync + 'static,
    {
        self.finalize().field(field, extract)
    }

    /// Finish this field and the schema.
    pub fn build(self) -> Schema {
        self.finalize().build()
    }

    /// Finalize this field and return the schema builder.
    fn finalize(self) -> SchemaBuilder {
        let sync_rules = Arc::new(self.sync_rules);
        let async_rules = Arc::new(self.async_rules);

        let extract_for_sync = Arc::clone(&self.extract);
        let sync_rules_for_sync = Arc::clone(&sync_rules);

        let validate_sync: Box<dyn Fn(&OrderValues) -> Vec<String> + Send + Sync> =
            Box::new(move |values: &OrderValues| {
                let value = extract_for_sync(values);
                sync_rules_for_sync
                    .iter()
                    .filter_map(|rule| rule(&value).err())
                    .collect()
            });

        let extract_for_async = self.extract;

        let validate_async: Box<
            dyn Fn(&OrderValues) -> BoxFuture<'static, Vec<String>> + Send + Sync,
        > = Box::new(move |values: &OrderValues| {
            let value = extract_for_async(values);
            let sync_rules = Arc::clone(&sync_rules);
            let async_rules = Arc::clone(&async_rules);

            Box::pin(async move {
                let mut errors = Vec::new();

                for rule in sync_rules.iter() {
                    if let Err(msg) = rule(&value) {
                        errors.push(msg);
                    }
                }

                for rule in async_rules.iter() {
                    if let Err(msg) = rule(value.clone()).await {
                        errors.push(msg);
                    }
                }

                errors
            })
        });

        let mut builder = self.builder;
        builder.fields.push(FieldRules {
            field: self.field,
            validate_sync,
            validate_async,
        });

        builder
    }
}

// Built-in rules for String values
impl FieldBuilder<String> {
    /// Require the field to be non-blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() >= min, msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Require the value to be exactly one of `allowed`.
    pub fn one_of(self, allowed: &[&str], msg: impl Into<String>) -> Self {
        let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
        self.rule(move |v| allowed.iter().any(|a| a == v), msg)
    }
}

// Built-in rules for lists of strings
impl FieldBuilder<Vec<String>> {
    /// Require every element to match a regex. An empty list passes.
    pub fn each_matches(self, re: Regex, msg: impl Into<String>) -> Self {
        self.rule(move |items| items.iter().all(|item| re.is_match(item)), msg)
    }
}
