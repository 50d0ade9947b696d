use std::ops::Deref;
use std::sync::Arc;

use tracing::trace;

use crate::config::ResolvePolicy;
use crate::definition::{Definition, Node};
use crate::error::{DefinitionError, Result};

/// Maximum number of thunks followed in a row before giving up.
pub const MAX_THUNK_CHAIN: usize = 64;

/// A definition normalized to a structured node with its implicit keyword
/// defaults applied.
#[derive(Debug, Clone)]
pub struct Resolved {
    node: Arc<Node>,
    /// `required` as declared, else `!optional`.
    pub required: bool,
    /// `strict` as declared, else the policy default.
    pub strict: bool,
}

impl Resolved {
    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl Deref for Resolved {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

/// Normalize `def`.
///
/// Thunks are invoked (and their results resolved in turn), shorthands are
/// wrapped as `{type: name}`. Nothing is cached: a thunk is invoked again on
/// every call.
pub fn resolve(def: &Definition, policy: &ResolvePolicy) -> Result<Resolved> {
    let mut current = def.clone();
    let mut forced = 0usize;

    let node = loop {
        match current {
            Definition::Node(node) => break node,
            Definition::Shorthand(name) => break Arc::new(Node::of_type(name)),
            Definition::Thunk(thunk) => {
                forced += 1;
                if forced > MAX_THUNK_CHAIN {
                    return Err(DefinitionError::ThunkChainTooDeep(MAX_THUNK_CHAIN));
                }
                trace!(thunk = thunk.id(), depth = forced, "forcing thunk");
                current = thunk.force()?;
            }
        }
    };

    Ok(Resolved {
        required: node.required.unwrap_or(!node.optional),
        strict: node.strict.unwrap_or(policy.default_strict),
        node,
    })
}
