use tracing::debug;
use valdef_definition::{resolve, Definition, DefinitionError};
use valdef_value::Value;

use crate::config::ValidateOptions;
use crate::context::Context;
use crate::error::{Result, Violation};
use crate::keywords::DISPATCH;

/// Result of a validation call that completed.
#[derive(Debug)]
pub struct Outcome {
    /// The root value after defaults, coercions and transforms. Containers
    /// are the caller's own, mutated in place.
    pub value: Value,
    /// Violations in depth-first, keyword-dispatch order.
    pub violations: Vec<Violation>,
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// `None` when valid; never `Some` of an empty list.
    pub fn into_violations(self) -> Option<Vec<Violation>> {
        if self.violations.is_empty() {
            None
        } else {
            Some(self.violations)
        }
    }
}

/// Validate `value` against `definition`, returning the possibly replaced
/// root together with the violations.
pub fn check(value: Value, definition: &Definition, options: &ValidateOptions) -> Result<Outcome> {
    let mut ctx = Context::new(options);
    let value = check_value(&mut ctx, value, definition)?;
    let violations = ctx.into_errors();
    if !violations.is_empty() {
        debug!(
            prefix = %options.prefix,
            count = violations.len(),
            "validation produced violations"
        );
    }
    Ok(Outcome { value, violations })
}

/// Validate `value` against `definition`.
///
/// Returns `Ok(None)` when the value is valid and `Ok(Some(violations))`
/// otherwise. Containers inside `value` are shared with the caller, so
/// filled defaults and coerced fields are visible through the caller's
/// handle afterwards, valid or not.
pub fn validate(
    value: &Value,
    definition: &Definition,
    options: &ValidateOptions,
) -> Result<Option<Vec<Violation>>> {
    check(value.clone(), definition, options).map(Outcome::into_violations)
}

/// Interpret one definition node against `value` and return the value the
/// parent should hold afterwards.
pub(crate) fn check_value(ctx: &mut Context<'_>, value: Value, definition: &Definition) -> Result<Value> {
    ctx.visit(|ctx| check_node(ctx, value, definition))
}

fn check_node(ctx: &mut Context<'_>, value: Value, definition: &Definition) -> Result<Value> {
    let policy = ctx.options().policy;
    let node = resolve(definition, &policy)?;
    let mut value = value;

    if value.is_absent() {
        if let Some(default) = &node.default {
            if ctx.at_root() && !policy.allow_root_default {
                return Err(DefinitionError::RootDefault {
                    path: ctx.current_path(),
                }
                .into());
            }
            value = default.produce();
            debug!(path = %ctx.current_path(), kind = value.kind(), "applied default");
        }
    }

    if value.is_absent() {
        if node.required {
            ctx.report("is required")?;
        }
        return Ok(value);
    }

    for (_, keyword) in DISPATCH {
        value = keyword(ctx, &node, value)?;
    }
    Ok(value)
}
