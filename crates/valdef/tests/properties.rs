use chrono::{TimeZone, Utc};
use serde_json::json;
use valdef::definition::Node;
use valdef::{check, validate, Definition, TypeName, ValidateOptions, Value, Violation};

fn def(json: serde_json::Value) -> Definition {
    Definition::from_json(&json).unwrap()
}

fn errors(value: &Value, definition: &Definition) -> Option<Vec<Violation>> {
    validate(value, definition, &ValidateOptions::default()).unwrap()
}

#[test]
fn repeated_validation_is_deterministic() {
    let definition = def(json!({
        "schema": {
            "id": "string",
            "tags": { "items": { "type": "string", "in": ["a", "b"] } },
            "size": { "type": "number", "bounds": { "gt": 0, "lt": 10 } }
        }
    }));
    let value = Value::from(json!({ "id": 7, "tags": ["a", "c", 3], "size": 12 }));

    let first = errors(&value, &definition).unwrap();
    for _ in 0..3 {
        assert_eq!(errors(&value, &definition).unwrap(), first);
    }
    assert_eq!(
        first.iter().map(|v| v.message.as_str()).collect::<Vec<_>>(),
        vec![
            "value.id is not string",
            r#"value.tags[1] is not one of ["a","b"]"#,
            "value.tags[2] is not string",
            r#"value.tags[2] is not one of ["a","b"]"#,
            "value.size must be less than 10",
        ]
    );
}

#[test]
fn defaults_are_applied_once() {
    let definition = def(json!({
        "schema": { "mode": { "type": "string", "default": "fast" }, "level": "number" }
    }));
    let value = Value::from(json!({ "level": "high" }));

    let first = errors(&value, &definition).unwrap();
    assert_eq!(value.field("mode"), Value::from("fast"));

    value.as_object().unwrap().insert("mode", Value::from("slow"));
    let second = errors(&value, &definition).unwrap();
    assert_eq!(first, second);
    assert_eq!(value.field("mode"), Value::from("slow"));
}

#[test]
fn datetime_round_trips_epoch_milliseconds() {
    let moment = Utc.with_ymd_and_hms(2021, 3, 14, 15, 9, 26).unwrap();
    let value = Value::from(json!({ "field": moment.timestamp_millis() }));

    assert!(errors(&value, &def(json!({ "schema": { "field": "datetime" } }))).is_none());
    assert_eq!(value.field("field").as_datetime(), Some(&moment));
}

#[test]
fn strict_mode_names_undeclared_fields() {
    let value = Value::from(json!({ "a": "x", "b": "y" }));

    let strict = errors(&value, &def(json!({ "strict": true, "schema": { "a": "string" } }))).unwrap();
    assert!(strict.iter().any(|v| v.path == "value.b"));

    assert!(errors(&value, &def(json!({ "schema": { "a": "string" } }))).is_none());
    assert!(errors(&value, &def(json!({ "strict": false, "schema": { "a": "string" } }))).is_none());
}

#[test]
fn either_commits_to_the_first_match() {
    let definition = def(json!({
        "either": [
            { "type": "object", "schema": { "field": "string" } },
            "function",
            { "type": "array", "items": "number" }
        ]
    }));

    assert!(errors(&Value::function(|_| Value::Null), &definition).is_none());
    assert!(errors(&Value::from(json!({ "field": "s" })), &definition).is_none());
    assert!(errors(&Value::from(json!([1, 2, 3])), &definition).is_none());

    let failed = errors(&Value::from("raw string"), &definition).unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].inner.len(), 3);
}

#[test]
fn bounds_boundaries() {
    let ten = Value::from(10);
    assert!(errors(&ten, &def(json!({ "bounds": { "gt": 10 } }))).is_some());
    assert!(errors(&ten, &def(json!({ "bounds": { "gte": 10 } }))).is_none());
    assert!(errors(&ten, &def(json!({ "bounds": { "lt": 10 } }))).is_some());
    assert!(errors(&ten, &def(json!({ "bounds": { "lte": 10 } }))).is_none());
}

#[test]
fn fields_are_required_unless_optional() {
    let empty = Value::from(json!({}));
    assert!(errors(&empty, &def(json!({ "schema": { "field": "string" } }))).is_some());
    assert!(errors(&empty, &def(json!({ "schema": { "field": { "optional": true } } }))).is_none());
    assert!(errors(&empty, &def(json!({ "schema": { "field": { "required": false } } }))).is_none());
}

#[test]
fn self_referencing_values_terminate() {
    fn node() -> Definition {
        Node::of_type(TypeName::Object)
            .field("next", Node::new().optional().either([Definition::lazy(node)]))
            .field("items", Node::new().optional().items(Definition::lazy(node)))
            .into()
    }

    let value = Value::from(json!({ "items": [] }));
    value.as_object().unwrap().insert("next", value.clone());
    value.field("items").as_array().unwrap().push(value.clone());

    let violations = errors(&value, &node()).unwrap();
    let messages: Vec<String> = violations.iter().flat_map(Violation::flatten).collect();
    assert!(messages.contains(&"value.next contains a reference cycle".to_string()));
    assert!(messages.contains(&"value.items[0] contains a reference cycle".to_string()));
}

#[test]
fn transforms_flow_into_the_returned_value() {
    let definition: Definition = Node::of_type(TypeName::String)
        .custom(|value| Ok(Value::from(value.as_str().unwrap_or_default().to_uppercase())))
        .into();

    let outcome = check(Value::from("loud"), &definition, &ValidateOptions::default()).unwrap();
    assert!(outcome.is_valid());
    assert_eq!(outcome.value, Value::from("LOUD"));
}
