//! The meta-definition: the grammar of definitions, written as a definition.
//!
//! A definition is a function (a thunk), a type name, or a strict object of
//! keywords. Every position that holds a nested definition is a thunk back
//! to the meta-definition itself, so the tree is finite however deep the
//! definitions it checks.

use std::sync::OnceLock;

use serde_json::json;
use valdef_definition::{Definition, Node, TypeName, KEYWORDS};
use valdef_value::Value;

static META: OnceLock<Definition> = OnceLock::new();

/// The process-wide meta-definition.
pub fn meta_definition() -> &'static Definition {
    META.get_or_init(build)
}

fn definition_ref() -> Definition {
    Definition::lazy(|| meta_definition().clone())
}

fn build() -> Definition {
    let type_name = Node::of_type(TypeName::String)
        .one_of(TypeName::ALL.iter().map(|name| json!(name.as_str())));

    let keywords = KEYWORDS
        .into_iter()
        .fold(Node::of_type(TypeName::Object).strict(true), |node, keyword| {
            node.field(keyword, keyword_argument(keyword, &type_name))
        });

    Node::new()
        .either([
            Definition::from(TypeName::Function),
            type_name.into(),
            keywords.into(),
        ])
        .into()
}

/// What the argument of `keyword` must look like. Every argument is
/// optional.
fn keyword_argument(keyword: &str, type_name: &Node) -> Definition {
    let flag = || Node::of_type(TypeName::Boolean).optional();
    let fields = || {
        Node::new().optional().either([
            Definition::from(TypeName::Function),
            Node::of_type(TypeName::Object).items(definition_ref()).into(),
        ])
    };
    let names = || {
        Node::of_type(TypeName::Array)
            .optional()
            .items(TypeName::String)
    };
    let bound = || Node::of_type(TypeName::Number).optional();

    let argument = match keyword {
        "optional" | "required" | "strict" => flag(),
        "type" => type_name.clone().optional(),
        "schema" | "properties" => fields(),
        "items" => Node::new().optional().either([definition_ref()]),
        "in" | "enum" => Node::of_type(TypeName::Array).optional(),
        "bounds" => Node::of_type(TypeName::Object)
            .optional()
            .strict(true)
            .field("gt", bound())
            .field("gte", bound())
            .field("lt", bound())
            .field("lte", bound()),
        "either" => Node::of_type(TypeName::Array)
            .optional()
            .items(definition_ref())
            .custom(non_empty),
        "require" | "restrict" => names(),
        "custom" => Node::of_type(TypeName::Function).optional(),
        // `default` takes any value.
        _ => Node::new().optional(),
    };
    argument.into()
}

fn non_empty(value: Value) -> Result<Value, String> {
    match value.as_array() {
        Some(alternatives) if alternatives.is_empty() => {
            Err("must list at least one alternative".to_string())
        }
        _ => Ok(value),
    }
}
