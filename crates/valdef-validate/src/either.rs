use tracing::trace;
use valdef_definition::Resolved;
use valdef_value::Value;

use crate::context::Context;
use crate::engine::check_value;
use crate::error::{Result, Violation};

/// `either`: the value must satisfy at least one alternative.
///
/// Each alternative is tried in order on a deep copy of the value and a fork
/// of the context, so a failed trial neither reports nor mutates anything.
/// The first clean alternative is then run once more on the value itself,
/// which applies its defaults and transforms. When every trial fails, one
/// violation is reported carrying each trial's violations as `inner`.
pub(crate) fn check_either(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(alternatives) = &node.either else {
        return Ok(value);
    };

    let mut failures = Vec::with_capacity(alternatives.len());
    for (index, alternative) in alternatives.iter().enumerate() {
        let (copy, copies) = value.deep_clone_with_origins();
        let mut trial = ctx.fork();
        trial.adopt_copies(&copies);
        check_value(&mut trial, copy, alternative)?;
        let errors = trial.into_errors();
        trace!(
            path = %ctx.current_path(),
            alternative = index,
            violations = errors.len(),
            "either trial"
        );
        if errors.is_empty() {
            return check_value(ctx, value, alternative);
        }
        failures.push(errors);
    }

    let path = ctx.current_path();
    let message = format!("{path} does not match any valid criteria");
    ctx.push(Violation::new(path, message).with_inner(failures))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use valdef_definition::{Definition, DefinitionError, Node, TypeName};
    use valdef_value::Value;

    use crate::config::ValidateOptions;
    use crate::engine::{check, validate};
    use crate::error::ValidateError;

    fn function_object_or_array() -> Definition {
        Node::new()
            .either([TypeName::Function, TypeName::Object, TypeName::Array])
            .into()
    }

    #[test]
    fn any_matching_alternative_passes() {
        let options = ValidateOptions::default();
        let definition = function_object_or_array();

        for value in [
            Value::function(|_| Value::Null),
            Value::from(json!({})),
            Value::from(json!([])),
        ] {
            assert!(validate(&value, &definition, &options).unwrap().is_none());
        }
    }

    #[test]
    fn total_failure_nests_each_alternative() {
        let violations = validate(
            &Value::from("string"),
            &function_object_or_array(),
            &ValidateOptions::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(violations.len(), 1);
        let violation = &violations[0];
        assert_eq!(violation.message, "value does not match any valid criteria");
        assert_eq!(violation.inner.len(), 3);
        assert_eq!(violation.inner[0][0].message, "value is not function");
        assert_eq!(violation.inner[1][0].message, "value is not object");
        assert_eq!(violation.inner[2][0].message, "value is not array");
    }

    #[test]
    fn winning_alternative_supplies_the_value() {
        let definition: Definition = Node::new()
            .either([
                Node::of_type(TypeName::Number),
                Node::of_type(TypeName::DateTime),
            ])
            .into();

        let outcome = check(Value::from("2024-01-02"), &definition, &ValidateOptions::default()).unwrap();
        assert!(outcome.is_valid());
        assert_eq!(outcome.value.kind(), "datetime");
    }

    #[test]
    fn failed_trials_leave_the_value_untouched() {
        let definition = Definition::from_json(&json!({
            "either": [
                { "schema": { "a": "datetime", "b": "string" } },
                { "schema": { "a": "number", "c": { "type": "string", "default": "filled" } } }
            ]
        }))
        .unwrap();
        let value = Value::from(json!({ "a": 5, "b": 1 }));

        assert!(validate(&value, &definition, &ValidateOptions::default())
            .unwrap()
            .is_none());
        assert_eq!(value.to_json(), json!({ "a": 5, "b": 1, "c": "filled" }));
    }

    #[test]
    fn a_total_failure_mutates_nothing() {
        let definition = Definition::from_json(&json!({
            "either": [
                { "schema": { "a": "datetime", "b": "string" } },
                { "schema": { "a": "string", "d": { "default": 0 } } }
            ]
        }))
        .unwrap();
        let value = Value::from(json!({ "a": 5, "b": 1 }));

        assert!(validate(&value, &definition, &ValidateOptions::default())
            .unwrap()
            .is_some());
        assert_eq!(value.to_json(), json!({ "a": 5, "b": 1 }));
    }

    #[test]
    fn left_recursive_alternatives_are_a_definition_error() {
        fn looping() -> Definition {
            Node::new().either([Definition::lazy(looping)]).into()
        }

        assert!(matches!(
            check(Value::from(1), &looping(), &ValidateOptions::default()),
            Err(ValidateError::Definition(DefinitionError::LeftRecursion { path })) if path == "value"
        ));
    }

    #[test]
    fn nested_violations_keep_their_paths() {
        let definition = Definition::from_json(&json!({
            "schema": {
                "target": { "either": [{ "schema": { "id": "string" } }, "string"] }
            }
        }))
        .unwrap();

        let violations = validate(
            &Value::from(json!({ "target": { "id": 3 } })),
            &definition,
            &ValidateOptions::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(violations[0].path, "value.target");
        assert_eq!(violations[0].inner[0][0].message, "value.target.id is not string");
        assert_eq!(violations[0].inner[1][0].message, "value.target is not string");
    }

    #[test]
    fn trials_do_not_assert() {
        let options = ValidateOptions::default().with_assert(true);

        assert!(check(Value::from(json!([])), &function_object_or_array(), &options).is_ok());
        match check(Value::from(1), &function_object_or_array(), &options) {
            Err(ValidateError::Assertion(violation)) => {
                assert_eq!(violation.message, "value does not match any valid criteria");
                assert_eq!(violation.inner.len(), 3);
            }
            other => panic!("expected an assertion, got {other:?}"),
        }
    }
}
