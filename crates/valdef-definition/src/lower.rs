//! Lowering definitions into plain values.
//!
//! The meta-definition describes definitions as data, so a typed definition
//! must be presented to it as a [`Value`]. Thunks, lazy fields, default
//! producers and transforms all lower to function values; nothing is forced.

use valdef_value::{Object, Value};

use crate::definition::{DefaultValue, Definition, Fields, Node};

impl Definition {
    /// The definition as data: shorthands become strings, nodes become
    /// keyword objects and deferred parts become functions.
    pub fn to_value(&self) -> Value {
        match self {
            Definition::Shorthand(name) => Value::from(name.as_str()),
            Definition::Thunk(thunk) => {
                let thunk = thunk.clone();
                Value::function(move |_| match thunk.force() {
                    Ok(def) => def.to_value(),
                    Err(_) => Value::Null,
                })
            }
            Definition::Node(node) => node.to_value(),
        }
    }
}

impl Node {
    /// The node as a keyword object. Unset keywords are left out.
    pub fn to_value(&self) -> Value {
        let object = Object::new();

        if self.optional {
            object.insert("optional", Value::Bool(true));
        }
        if let Some(required) = self.required {
            object.insert("required", Value::Bool(required));
        }
        if let Some(default) = &self.default {
            let lowered = match default {
                DefaultValue::Literal(json) => Value::from(json),
                DefaultValue::Thunk(_) => {
                    let default = default.clone();
                    Value::function(move |_| default.produce())
                }
            };
            object.insert("default", lowered);
        }
        if let Some(kind) = self.kind {
            object.insert("type", Value::from(kind.as_str()));
        }
        if let Some(fields) = &self.schema {
            object.insert("schema", lower_fields(fields));
        }
        if let Some(items) = &self.items {
            object.insert("items", items.to_value());
        }
        if let Some(allowed) = &self.allowed {
            object.insert("in", Value::array(allowed.iter().map(Value::from)));
        }
        if let Some(bounds) = &self.bounds {
            let comparators = bounds
                .iter()
                .map(|(comparator, bound)| (comparator.as_str(), Value::Number(bound)));
            object.insert("bounds", Value::object(comparators));
        }
        if let Some(either) = &self.either {
            object.insert("either", Value::array(either.iter().map(Definition::to_value)));
        }
        if let Some(strict) = self.strict {
            object.insert("strict", Value::Bool(strict));
        }
        if let Some(require) = &self.require {
            object.insert("require", names(require));
        }
        if let Some(restrict) = &self.restrict {
            object.insert("restrict", names(restrict));
        }
        if let Some(custom) = &self.custom {
            let custom = custom.clone();
            object.insert(
                "custom",
                Value::function(move |args| {
                    let input = args.first().cloned().unwrap_or_default();
                    custom.apply(input).unwrap_or_default()
                }),
            );
        }

        Value::Object(object)
    }
}

fn lower_fields(fields: &Fields) -> Value {
    match fields {
        Fields::Declared(fields) => {
            Value::object(fields.iter().map(|(name, def)| (name.clone(), def.to_value())))
        }
        Fields::Lazy(_) => {
            let fields = fields.clone();
            Value::function(move |_| match fields.resolve() {
                Ok(fields) => lower_fields(&Fields::Declared(fields)),
                Err(_) => Value::Null,
            })
        }
    }
}

fn names(names: &[String]) -> Value {
    Value::array(names.iter().map(|name| Value::from(name.as_str())))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::keyword::TypeName;

    #[test]
    fn json_definitions_lower_to_equivalent_data() {
        let source = json!({
            "type": "object",
            "schema": {
                "id": "string",
                "size": { "bounds": { "gt": 0 }, "optional": true }
            },
            "in": [{ "id": "a" }]
        });
        let lowered = Definition::from_json(&source).unwrap().to_value();

        assert_eq!(lowered.field("type"), Value::from("object"));
        assert_eq!(lowered.field("schema").field("id"), Value::from("string"));
        assert_eq!(
            lowered.field("schema").field("size").to_json(),
            json!({ "optional": true, "bounds": { "gt": 0 } })
        );
        assert_eq!(lowered.field("in").to_json(), json!([{ "id": "a" }]));
    }

    #[test]
    fn deferred_parts_lower_to_functions() {
        let def: Definition = Node::new()
            .items(Definition::lazy(|| TypeName::Number.into()))
            .custom(Ok)
            .into();
        let lowered = def.to_value();

        let items = lowered.field("items");
        assert_eq!(items.kind(), "function");
        assert_eq!(items.as_function().unwrap().call(&[]), Value::from("number"));
        assert_eq!(lowered.field("custom").kind(), "function");
    }
}
