use valdef_definition::ResolvePolicy;

/// Root path token used when no prefix is configured.
pub const DEFAULT_PREFIX: &str = "value";

/// Options for a single validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Root token of every reported path.
    pub prefix: String,
    /// When true, the first violation fails the call with
    /// `ValidateError::Assertion` instead of being collected.
    pub assert: bool,
    /// Keyword defaults and root-default policy.
    pub policy: ResolvePolicy,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            assert: false,
            policy: ResolvePolicy::default(),
        }
    }
}

impl ValidateOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_assert(mut self, assert: bool) -> Self {
        self.assert = assert;
        self
    }

    pub fn with_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Controls how a [`Validator`](crate::Validator) is built and run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub options: ValidateOptions,
    /// Check the definition against the meta-definition before use.
    pub self_validate: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            options: ValidateOptions::default(),
            self_validate: true,
        }
    }
}
