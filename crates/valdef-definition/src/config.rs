/// Policy knobs that shape how definitions are resolved and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// `strict` for nodes that do not declare it. When true, objects reject
    /// fields their `schema` does not declare.
    pub default_strict: bool,
    /// When false, a `default` that would replace the root value raises
    /// `DefinitionError::RootDefault` instead.
    pub allow_root_default: bool,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            default_strict: false,
            allow_root_default: true,
        }
    }
}

impl ResolvePolicy {
    /// The stricter lineage: strict objects, defaults only inside containers.
    pub fn strict() -> Self {
        Self {
            default_strict: true,
            allow_root_default: false,
        }
    }
}
