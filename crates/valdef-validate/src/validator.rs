use std::sync::OnceLock;

use tracing::debug;
use valdef_definition::{Definition, DefinitionError};
use valdef_value::Value;

use crate::config::{ValidateOptions, ValidatorConfig};
use crate::engine::{check, validate};
use crate::error::{Result, ValidateError, Violation};
use crate::meta::meta_definition;

/// Root token of paths reported against definitions.
const DEFINITION_PREFIX: &str = "definition";

/// A definition paired with the options it is run with.
///
/// Unless [`ValidatorConfig::self_validate`] is turned off, the definition is
/// checked against the [`meta_definition`] on construction, so authoring
/// mistakes surface here as [`DefinitionError::Invalid`] rather than during
/// the first validation.
#[derive(Debug, Clone)]
pub struct Validator {
    definition: Definition,
    config: ValidatorConfig,
}

impl Validator {
    /// Build a validator with default config.
    pub fn new(definition: impl Into<Definition>) -> std::result::Result<Self, DefinitionError> {
        Self::with_config(definition, ValidatorConfig::default())
    }

    /// Build a validator with explicit config.
    pub fn with_config(
        definition: impl Into<Definition>,
        config: ValidatorConfig,
    ) -> std::result::Result<Self, DefinitionError> {
        let definition = definition.into();
        if config.self_validate {
            meta_check(&definition.to_value())?;
        }
        Ok(Self { definition, config })
    }

    /// Build a validator from a definition written as JSON.
    pub fn from_json(json: &serde_json::Value) -> std::result::Result<Self, DefinitionError> {
        Self::from_json_with_config(json, ValidatorConfig::default())
    }

    /// Build a validator from JSON with explicit config. The raw JSON is
    /// meta-checked before it is converted.
    pub fn from_json_with_config(
        json: &serde_json::Value,
        config: ValidatorConfig,
    ) -> std::result::Result<Self, DefinitionError> {
        if config.self_validate {
            meta_check(&Value::from(json))?;
        }
        let definition = Definition::from_json(json)?;
        Ok(Self { definition, config })
    }

    /// The validator for definitions themselves. It does not check its own
    /// definition on construction.
    pub fn meta() -> &'static Validator {
        static META_VALIDATOR: OnceLock<Validator> = OnceLock::new();
        META_VALIDATOR.get_or_init(|| Validator {
            definition: meta_definition().clone(),
            config: ValidatorConfig {
                options: ValidateOptions::default().with_prefix(DEFINITION_PREFIX),
                self_validate: false,
            },
        })
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `value` and return it, with defaults and transforms applied.
    /// Any violation turns into [`ValidateError::Rejected`].
    pub fn validate(&self, value: Value) -> Result<Value> {
        let outcome = check(value, &self.definition, &self.config.options)?;
        if outcome.is_valid() {
            Ok(outcome.value)
        } else {
            Err(ValidateError::Rejected(outcome.violations))
        }
    }

    /// Violations of `value`, or `None` when it is valid.
    pub fn errors(&self, value: &Value) -> Result<Option<Vec<Violation>>> {
        validate(value, &self.definition, &self.config.options)
    }
}

fn meta_check(lowered: &Value) -> std::result::Result<(), DefinitionError> {
    let rejected = match Validator::meta().errors(lowered) {
        Ok(None) => return Ok(()),
        Ok(Some(violations)) => violations,
        Err(ValidateError::Definition(err)) => return Err(err),
        Err(err) => err.violations().to_vec(),
    };

    let messages: Vec<String> = rejected.iter().flat_map(Violation::flatten).collect();
    debug!(count = rejected.len(), "definition rejected by meta-definition");
    Err(DefinitionError::Invalid(messages))
}
