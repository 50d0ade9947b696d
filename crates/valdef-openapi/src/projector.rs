use serde_json::{json, Map, Value};
use tracing::trace;
use valdef_definition::{
    resolve, Comparator, DefaultValue, Definition, DefinitionError, Fields, Node, ResolvePolicy,
    TypeName,
};

/// Project `definition` into an OpenAPI schema object.
///
/// | keyword | projection |
/// |---|---|
/// | `type` | `type`; `datetime` is `string` with `format: date-time`, `function` is dropped |
/// | `in` / `enum` | `enum` |
/// | `require` | `required` |
/// | `schema` / `properties` | `properties`, each field projected |
/// | `items` | `items` on arrays, `additionalProperties` on objects |
/// | `strict: true` | `additionalProperties: false` |
/// | `bounds` | `minimum`, `exclusiveMinimum`, `maximum`, `exclusiveMaximum` |
/// | literal `default` | `default` |
///
/// Deferred parts (thunks and lazy fields) are expanded one level deep:
/// anything deferred inside an expansion projects to `{}`, which is how
/// recursive definitions terminate.
pub fn project(definition: &Definition) -> Result<Value, DefinitionError> {
    Projector::default().definition(definition)
}

#[derive(Default)]
struct Projector {
    expanding: bool,
}

impl Projector {
    fn definition(&mut self, definition: &Definition) -> Result<Value, DefinitionError> {
        match definition {
            Definition::Shorthand(name) => self.node(&Node::of_type(*name)),
            Definition::Node(node) => self.node(node),
            Definition::Thunk(thunk) => {
                if self.expanding {
                    trace!(thunk = thunk.id(), "deferred definition left open");
                    return Ok(json!({}));
                }
                self.expanding = true;
                let projected = resolve(definition, &ResolvePolicy::default())
                    .and_then(|resolved| self.node(resolved.node()));
                self.expanding = false;
                projected
            }
        }
    }

    fn node(&mut self, node: &Node) -> Result<Value, DefinitionError> {
        let mut schema = Map::new();

        match node.kind {
            Some(TypeName::Function) | None => {}
            Some(TypeName::DateTime) => {
                schema.insert("type".to_string(), json!("string"));
                schema.insert("format".to_string(), json!("date-time"));
            }
            Some(kind) => {
                schema.insert("type".to_string(), json!(kind.as_str()));
            }
        }

        if let Some(allowed) = &node.allowed {
            schema.insert("enum".to_string(), Value::Array(allowed.clone()));
        }

        if let Some(require) = &node.require {
            schema.insert("required".to_string(), json!(require));
        }

        if let Some(fields) = &node.schema {
            if let Some(properties) = self.fields(fields)? {
                schema.insert("properties".to_string(), Value::Object(properties));
            }
        }

        if let Some(items) = &node.items {
            let key = if node.kind == Some(TypeName::Object) {
                "additionalProperties"
            } else {
                "items"
            };
            let projected = self.definition(items)?;
            schema.insert(key.to_string(), projected);
        }

        if node.strict == Some(true) && !schema.contains_key("additionalProperties") {
            schema.insert("additionalProperties".to_string(), Value::Bool(false));
        }

        if let Some(bounds) = &node.bounds {
            for (comparator, bound) in bounds.iter() {
                let key = match comparator {
                    Comparator::Gt => "exclusiveMinimum",
                    Comparator::Gte => "minimum",
                    Comparator::Lt => "exclusiveMaximum",
                    Comparator::Lte => "maximum",
                };
                schema.insert(key.to_string(), json!(bound));
            }
        }

        if let Some(DefaultValue::Literal(default)) = &node.default {
            schema.insert("default".to_string(), default.clone());
        }

        Ok(Value::Object(schema))
    }

    /// `None` when the fields are lazy and left open.
    fn fields(&mut self, fields: &Fields) -> Result<Option<Map<String, Value>>, DefinitionError> {
        let declared = match fields {
            Fields::Declared(declared) => declared.clone(),
            Fields::Lazy(_) if self.expanding => return Ok(None),
            Fields::Lazy(_) => {
                self.expanding = true;
                let resolved = fields.resolve();
                let projected = resolved.and_then(|declared| self.properties(&declared));
                self.expanding = false;
                return projected.map(Some);
            }
        };
        self.properties(&declared).map(Some)
    }

    fn properties(
        &mut self,
        declared: &[(String, Definition)],
    ) -> Result<Map<String, Value>, DefinitionError> {
        let mut properties = Map::new();
        for (name, definition) in declared {
            properties.insert(name.clone(), self.definition(definition)?);
        }
        Ok(properties)
    }
}
