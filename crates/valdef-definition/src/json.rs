//! Definitions authored as in-memory JSON.

use serde_json::{Map, Value as Json};

use crate::definition::{DefaultValue, Definition, Fields, Node};
use crate::error::{DefinitionError, Result};
use crate::keyword::{Bounds, Comparator};

impl Definition {
    /// Convert a JSON definition.
    ///
    /// Strings are type-name shorthands, objects are keyword nodes. Nested
    /// definitions are converted eagerly; thunks and `custom` transforms have
    /// no JSON form and need the typed API.
    pub fn from_json(json: &Json) -> Result<Definition> {
        match json {
            Json::String(name) => Ok(Definition::Shorthand(name.parse()?)),
            Json::Object(map) => node_from_json(map).map(Definition::from),
            other => Err(DefinitionError::NotADefinition(json_kind(other))),
        }
    }
}

impl TryFrom<&Json> for Definition {
    type Error = DefinitionError;

    fn try_from(json: &Json) -> Result<Self> {
        Definition::from_json(json)
    }
}

impl TryFrom<Json> for Definition {
    type Error = DefinitionError;

    fn try_from(json: Json) -> Result<Self> {
        Definition::from_json(&json)
    }
}

fn node_from_json(map: &Map<String, Json>) -> Result<Node> {
    let mut node = Node::new();

    for (keyword, arg) in map {
        match keyword.as_str() {
            "optional" => node.optional = bool_arg(keyword, arg)?,
            "required" => node.required = Some(bool_arg(keyword, arg)?),
            "strict" => node.strict = Some(bool_arg(keyword, arg)?),
            "default" => node.default = Some(DefaultValue::Literal(arg.clone())),
            "type" => {
                let name = arg
                    .as_str()
                    .ok_or_else(|| DefinitionError::invalid_argument(keyword, "expected a type name"))?;
                node.kind = Some(name.parse()?);
            }
            "schema" | "properties" => {
                if node.schema.is_some() {
                    return Err(alias_conflict("schema", "properties"));
                }
                node.schema = Some(fields_arg(keyword, arg)?);
            }
            "items" => node.items = Some(Definition::from_json(arg)?),
            "in" | "enum" => {
                if node.allowed.is_some() {
                    return Err(alias_conflict("in", "enum"));
                }
                let allowed = arg
                    .as_array()
                    .ok_or_else(|| DefinitionError::invalid_argument(keyword, "expected an array"))?;
                node.allowed = Some(allowed.clone());
            }
            "bounds" => node.bounds = Some(bounds_arg(arg)?),
            "either" => node.either = Some(either_arg(arg)?),
            "require" => node.require = Some(names_arg(keyword, arg)?),
            "restrict" => node.restrict = Some(names_arg(keyword, arg)?),
            "custom" => {
                return Err(DefinitionError::invalid_argument(
                    keyword,
                    "transforms cannot be expressed in JSON",
                ))
            }
            _ => return Err(DefinitionError::UnknownKeyword(keyword.clone())),
        }
    }

    Ok(node)
}

fn bool_arg(keyword: &str, arg: &Json) -> Result<bool> {
    arg.as_bool()
        .ok_or_else(|| DefinitionError::invalid_argument(keyword, "expected a boolean"))
}

fn fields_arg(keyword: &str, arg: &Json) -> Result<Fields> {
    let map = arg
        .as_object()
        .ok_or_else(|| DefinitionError::invalid_argument(keyword, "expected an object of field definitions"))?;
    let fields = map
        .iter()
        .map(|(name, def)| Ok((name.clone(), Definition::from_json(def)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Fields::Declared(fields))
}

fn bounds_arg(arg: &Json) -> Result<Bounds> {
    let map = arg
        .as_object()
        .ok_or_else(|| DefinitionError::invalid_argument("bounds", "expected an object of comparators"))?;
    let mut bounds = Bounds::default();
    for (name, bound) in map {
        let comparator: Comparator = name.parse()?;
        let bound = bound.as_f64().ok_or_else(|| {
            DefinitionError::invalid_argument("bounds", format!("`{name}` expects a number"))
        })?;
        bounds.set(comparator, bound);
    }
    Ok(bounds)
}

fn either_arg(arg: &Json) -> Result<Vec<Definition>> {
    let alternatives = arg
        .as_array()
        .ok_or_else(|| DefinitionError::invalid_argument("either", "expected an array of definitions"))?;
    if alternatives.is_empty() {
        return Err(DefinitionError::invalid_argument(
            "either",
            "expected at least one alternative",
        ));
    }
    alternatives
        .iter()
        .enumerate()
        .map(|(index, alternative)| {
            Definition::from_json(alternative).map_err(|source| DefinitionError::MalformedEither {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

fn names_arg(keyword: &str, arg: &Json) -> Result<Vec<String>> {
    let names = arg
        .as_array()
        .ok_or_else(|| DefinitionError::invalid_argument(keyword, "expected an array of field names"))?;
    names
        .iter()
        .map(|name| {
            name.as_str()
                .map(str::to_string)
                .ok_or_else(|| DefinitionError::invalid_argument(keyword, "field names must be strings"))
        })
        .collect()
}

fn alias_conflict(a: &str, b: &str) -> DefinitionError {
    DefinitionError::invalid_argument(a, format!("`{a}` and `{b}` are aliases; declare only one"))
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
