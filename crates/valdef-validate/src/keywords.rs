//! One validator per keyword.
//!
//! Every validator takes the value the node currently holds and returns the
//! value it should hold next, so coercions and transforms flow into the
//! keywords after them. A validator whose keyword is not set passes the
//! value through untouched. `default` and `required` run before this table,
//! in the interpreter, because they decide whether anything else runs.

use chrono::{DateTime, NaiveDate, Utc};
use valdef_definition::{Resolved, TypeName};
use valdef_value::{Accessor, Array, Object, Value};

use crate::context::Context;
use crate::either::check_either;
use crate::engine::check_value;
use crate::error::Result;

pub(crate) type KeywordFn = fn(&mut Context<'_>, &Resolved, Value) -> Result<Value>;

/// Keyword validators in dispatch order.
pub(crate) const DISPATCH: [(&str, KeywordFn); 9] = [
    ("type", check_type),
    ("in", check_in),
    ("bounds", check_bounds),
    ("either", check_either),
    ("schema", check_schema),
    ("require", check_require),
    ("restrict", check_restrict),
    ("items", check_items),
    ("custom", check_custom),
];

fn check_type(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(kind) = node.kind else {
        return Ok(value);
    };

    let matches = match kind {
        TypeName::DateTime => return coerce_datetime(ctx, value),
        TypeName::String => matches!(value, Value::String(_)),
        TypeName::Number => matches!(value, Value::Number(_)),
        TypeName::Boolean => matches!(value, Value::Bool(_)),
        TypeName::Array => matches!(value, Value::Array(_)),
        TypeName::Object => matches!(value, Value::Object(_)),
        TypeName::Function => matches!(value, Value::Function(_)),
    };
    if !matches {
        ctx.report(format_args!("is not {kind}"))?;
    }
    Ok(value)
}

/// `datetime` replaces the raw value with a parsed one: epoch milliseconds,
/// RFC 3339 or a bare `YYYY-MM-DD` date.
fn coerce_datetime(ctx: &mut Context<'_>, value: Value) -> Result<Value> {
    let parsed = match &value {
        Value::DateTime(_) => return Ok(value),
        Value::Number(millis) if millis.is_finite() => DateTime::from_timestamp_millis(*millis as i64),
        Value::String(text) => parse_datetime(text),
        _ => None,
    };

    match parsed {
        Some(datetime) => Ok(Value::DateTime(datetime)),
        None => {
            ctx.report("is not datetime")?;
            Ok(value)
        }
    }
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

fn check_in(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(allowed) = &node.allowed else {
        return Ok(value);
    };

    if !allowed.iter().any(|literal| Value::from(literal) == value) {
        let listed = serde_json::Value::Array(allowed.clone());
        ctx.report(format_args!("is not one of {listed}"))?;
    }
    Ok(value)
}

fn check_bounds(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(bounds) = &node.bounds else {
        return Ok(value);
    };
    let Some(number) = value.as_f64() else {
        if node.kind.is_none() {
            ctx.report("is not number")?;
        }
        return Ok(value);
    };

    for (comparator, bound) in bounds.iter() {
        if !comparator.holds(number, bound) {
            ctx.report(format_args!("must be {} {bound}", comparator.describe()))?;
        }
    }
    Ok(value)
}

fn check_schema(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(fields) = &node.schema else {
        return Ok(value);
    };
    let Some(object) = expect_object(ctx, node, &value)? else {
        return Ok(value);
    };
    let fields = fields.resolve()?;

    ctx.descend(object.id(), |ctx| {
        for (name, definition) in &fields {
            let accessor = Accessor::Key(name.clone());
            let current = object.get(name);
            let present = current.is_some();
            let checked = ctx.scoped(&accessor, |ctx| {
                check_value(ctx, current.unwrap_or_default(), definition)
            })?;
            if present || !checked.is_absent() {
                object.insert(name.clone(), checked);
            }
        }

        if node.strict {
            for key in object.keys() {
                if !fields.iter().any(|(name, _)| *name == key) {
                    ctx.report_child(&Accessor::Key(key), "is not allowed")?;
                }
            }
        }
        Ok(())
    })?;

    Ok(value)
}

fn check_require(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(names) = &node.require else {
        return Ok(value);
    };
    let Some(object) = expect_object(ctx, node, &value)? else {
        return Ok(value);
    };

    for name in names {
        if object.get(name).is_none_or(|field| field.is_absent()) {
            ctx.report_child(&Accessor::Key(name.clone()), "is required")?;
        }
    }
    Ok(value)
}

fn check_restrict(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(names) = &node.restrict else {
        return Ok(value);
    };
    let Some(object) = expect_object(ctx, node, &value)? else {
        return Ok(value);
    };

    for name in names {
        if object.get(name).is_some_and(|field| !field.is_absent()) {
            ctx.report_child(&Accessor::Key(name.clone()), "is restricted")?;
        }
    }
    Ok(value)
}

/// Runtime shape of a value as far as `items` cares.
enum Shape {
    Sequence(Array),
    Keyed(Object),
    Other,
}

impl Shape {
    fn of(value: &Value) -> Self {
        match value {
            Value::Array(array) => Shape::Sequence(array.clone()),
            Value::Object(object) => Shape::Keyed(object.clone()),
            _ => Shape::Other,
        }
    }
}

fn check_items(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(definition) = &node.items else {
        return Ok(value);
    };

    match Shape::of(&value) {
        Shape::Sequence(array) => {
            ctx.descend(array.id(), |ctx| {
                for (index, item) in array.to_vec().into_iter().enumerate() {
                    let checked =
                        ctx.scoped(&Accessor::Index(index), |ctx| check_value(ctx, item, definition))?;
                    array.set(index, checked);
                }
                Ok(())
            })?;
        }
        Shape::Keyed(object) => {
            ctx.descend(object.id(), |ctx| {
                for (key, item) in object.entries() {
                    let accessor = Accessor::Key(key.clone());
                    let checked = ctx.scoped(&accessor, |ctx| check_value(ctx, item, definition))?;
                    object.insert(key, checked);
                }
                Ok(())
            })?;
        }
        Shape::Other => ctx.report("is not iterable")?,
    }
    Ok(value)
}

fn check_custom(ctx: &mut Context<'_>, node: &Resolved, value: Value) -> Result<Value> {
    let Some(transform) = &node.custom else {
        return Ok(value);
    };

    match transform.apply(value.clone()) {
        Ok(transformed) => Ok(transformed),
        Err(reason) => {
            ctx.report(format_args!("is invalid: {reason}"))?;
            Ok(value)
        }
    }
}

/// The object behind `value`. A non-object is reported here only when the
/// node declares no `type`; otherwise `type` has already said so.
fn expect_object(ctx: &mut Context<'_>, node: &Resolved, value: &Value) -> Result<Option<Object>> {
    match value {
        Value::Object(object) => Ok(Some(object.clone())),
        _ => {
            if node.kind.is_none() {
                ctx.report("is not object")?;
            }
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use valdef_definition::{Definition, Node};

    use super::*;
    use crate::config::ValidateOptions;
    use crate::engine::validate;

    fn run(value: &Value, definition: impl Into<Definition>) -> Vec<String> {
        validate(value, &definition.into(), &ValidateOptions::default())
            .unwrap()
            .unwrap_or_default()
            .into_iter()
            .map(|violation| violation.message)
            .collect()
    }

    fn json_def(json: serde_json::Value) -> Definition {
        Definition::from_json(&json).unwrap()
    }

    #[test]
    fn type_checks_each_kind() {
        let function = Value::function(|_| Value::Null);
        assert!(run(&function, TypeName::Function).is_empty());
        assert!(run(&Value::from(json!([])), TypeName::Array).is_empty());
        assert!(run(&Value::from(json!({})), TypeName::Object).is_empty());
        assert!(run(&Value::from(true), TypeName::Boolean).is_empty());

        assert_eq!(run(&Value::from(json!([])), TypeName::Object), vec!["value is not object"]);
        assert_eq!(run(&Value::from(json!({})), TypeName::Array), vec!["value is not array"]);
        assert_eq!(run(&function, TypeName::Object), vec!["value is not object"]);
    }

    #[test]
    fn datetime_accepts_strings_and_rejects_garbage() {
        let value = Value::from(json!({ "at": "2024-05-01T10:00:00+02:00", "day": "2024-05-01", "bad": "soon" }));
        let definition = json_def(json!({
            "schema": { "at": "datetime", "day": "datetime", "bad": "datetime" }
        }));

        assert_eq!(run(&value, definition), vec!["value.bad is not datetime"]);
        assert_eq!(
            value.field("at").as_datetime().unwrap().to_rfc3339(),
            "2024-05-01T08:00:00+00:00"
        );
        assert_eq!(value.field("day").kind(), "datetime");
        assert_eq!(value.field("bad"), Value::from("soon"));
    }

    #[test]
    fn membership_uses_structural_equality() {
        let definition = json_def(json!({ "in": ["left", "right", { "x": 1 }] }));
        assert!(run(&Value::from("left"), definition.clone()).is_empty());
        assert!(run(&Value::from(json!({ "x": 1 })), definition.clone()).is_empty());
        assert_eq!(
            run(&Value::from("center"), definition),
            vec![r#"value is not one of ["left","right",{"x":1}]"#]
        );
    }

    #[test]
    fn bounds_report_each_failing_comparator() {
        assert_eq!(
            run(&Value::from(10), json_def(json!({ "bounds": { "gt": 10 } }))),
            vec!["value must be greater than 10"]
        );
        assert!(run(&Value::from(10), json_def(json!({ "bounds": { "gte": 10 } }))).is_empty());
        assert!(!run(&Value::from(9), json_def(json!({ "bounds": { "gte": 10 } }))).is_empty());
        assert!(!run(&Value::from(10), json_def(json!({ "bounds": { "lt": 10 } }))).is_empty());
        assert!(!run(&Value::from(11), json_def(json!({ "bounds": { "lte": 10 } }))).is_empty());

        assert_eq!(
            run(&Value::from(50), json_def(json!({ "bounds": { "gt": 60, "lt": 40 } }))),
            vec!["value must be greater than 60", "value must be less than 40"]
        );
    }

    #[test]
    fn type_and_bounds_fail_together() {
        assert_eq!(
            run(&Value::from(0.5), json_def(json!({ "type": "string", "bounds": { "gte": 1 } }))),
            vec!["value is not string", "value must be greater than or equal to 1"]
        );
        assert_eq!(
            run(&Value::from("x"), json_def(json!({ "bounds": { "gte": 1 } }))),
            vec!["value is not number"]
        );
    }

    #[test]
    fn strict_rejects_undeclared_fields() {
        let value = Value::from(json!({ "a": "x", "b": "y" }));
        let strict = json_def(json!({ "strict": true, "schema": { "a": "string" } }));
        let loose = json_def(json!({ "strict": false, "schema": { "a": "string" } }));

        assert_eq!(run(&value, strict), vec!["value.b is not allowed"]);
        assert!(run(&value, loose).is_empty());
        assert!(run(&value, json_def(json!({ "schema": { "a": "string" } }))).is_empty());
    }

    #[test]
    fn require_and_restrict_name_fields() {
        let value = Value::from(json!({ "anotherField": "x", "secret": 1 }));
        let definition = json_def(json!({
            "type": "object",
            "require": ["aField"],
            "restrict": ["secret", "absent"]
        }));

        assert_eq!(
            run(&value, definition),
            vec!["value.aField is required", "value.secret is restricted"]
        );
    }

    #[test]
    fn items_walk_arrays_and_objects() {
        let per_entry = json_def(json!({ "items": { "schema": { "some_field": "string" } } }));
        let object = Value::from(json!({
            "fieldA": { "some_field": "some_string" },
            "fieldB": { "some_field": 1 }
        }));
        assert_eq!(run(&object, per_entry.clone()), vec!["value.fieldB.some_field is not string"]);

        let array = Value::from(json!([{ "some_field": "a" }, 3]));
        assert_eq!(run(&array, per_entry.clone()), vec!["value[1] is not object"]);

        assert_eq!(run(&Value::from(3), per_entry), vec!["value is not iterable"]);
    }

    #[test]
    fn custom_transforms_replace_or_reject() {
        let trimmed = Node::new().kind(TypeName::String).custom(|value| match value {
            Value::String(text) => Ok(Value::from(text.trim())),
            other => Err(format!("cannot trim {}", other.kind())),
        });
        let value = Value::from(json!({ "name": "  padded  ", "other": 5 }));
        let definition = Node::new()
            .field("name", trimmed.clone())
            .field("other", trimmed);

        assert_eq!(
            run(&value, definition),
            vec!["value.other is not string", "value.other is invalid: cannot trim number"]
        );
        assert_eq!(value.field("name"), Value::from("padded"));
        assert_eq!(value.field("other"), Value::from(5));
    }

    #[test]
    fn lazy_fields_and_default_thunks_run_per_visit() {
        static PRODUCED: AtomicUsize = AtomicUsize::new(0);
        let definition: Definition = Node::new()
            .schema_with(|| {
                Ok(vec![(
                    "n".to_string(),
                    Node::new()
                        .default_with(|| {
                            Value::from(PRODUCED.fetch_add(1, Ordering::SeqCst) as i64)
                        })
                        .into(),
                )])
            })
            .into();

        let first = Value::from(json!({}));
        let second = Value::from(json!({}));
        let options = ValidateOptions::default();
        assert!(validate(&first, &definition, &options).unwrap().is_none());
        assert!(validate(&second, &definition, &options).unwrap().is_none());
        assert_eq!(first.field("n"), Value::from(0));
        assert_eq!(second.field("n"), Value::from(1));
    }
}
