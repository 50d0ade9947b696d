use std::fmt;
use std::sync::Arc;

use valdef_value::Value;

use crate::error::Result;
use crate::keyword::{Bounds, TypeName};

type Producer = dyn Fn() -> Result<Definition> + Send + Sync;
type FieldsProducer = dyn Fn() -> Result<Vec<(String, Definition)>> + Send + Sync;
type DefaultProducer = dyn Fn() -> Value + Send + Sync;
type TransformFn = dyn Fn(Value) -> std::result::Result<Value, String> + Send + Sync;

/// A node in a definition tree.
///
/// Definitions are immutable, cheap to clone, and `Send + Sync`: the same
/// tree can back any number of concurrent validation calls.
#[derive(Clone, Debug)]
pub enum Definition {
    /// A bare type name, equivalent to a node with only `type` set.
    Shorthand(TypeName),
    /// A deferred definition, produced again on every visit.
    Thunk(Thunk),
    /// A structured node of keywords.
    Node(Arc<Node>),
}

impl Definition {
    /// Defer `f` until the definition is visited.
    ///
    /// This is how a definition refers to itself:
    ///
    /// ```
    /// use valdef_definition::{Definition, Node, TypeName};
    ///
    /// fn tree() -> Definition {
    ///     Node::new()
    ///         .field("name", TypeName::String)
    ///         .field("children", Node::new().optional().items(Definition::lazy(tree)))
    ///         .into()
    /// }
    /// # let _ = tree();
    /// ```
    pub fn lazy(f: impl Fn() -> Definition + Send + Sync + 'static) -> Self {
        Definition::Thunk(Thunk::new(f))
    }

    /// Like [`Definition::lazy`], for producers that can fail, such as one
    /// converting JSON on demand.
    pub fn try_lazy(f: impl Fn() -> Result<Definition> + Send + Sync + 'static) -> Self {
        Definition::Thunk(Thunk::try_new(f))
    }
}

impl From<TypeName> for Definition {
    fn from(name: TypeName) -> Self {
        Definition::Shorthand(name)
    }
}

impl From<Node> for Definition {
    fn from(node: Node) -> Self {
        Definition::Node(Arc::new(node))
    }
}

impl From<Thunk> for Definition {
    fn from(thunk: Thunk) -> Self {
        Definition::Thunk(thunk)
    }
}

/// Zero-argument deferred producer of a definition.
#[derive(Clone)]
pub struct Thunk(Arc<Producer>);

impl Thunk {
    pub fn new(f: impl Fn() -> Definition + Send + Sync + 'static) -> Self {
        Self(Arc::new(move || Ok(f())))
    }

    pub fn try_new(f: impl Fn() -> Result<Definition> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the producer.
    pub fn force(&self) -> Result<Definition> {
        (self.0)()
    }

    /// Identity of the producer, shared by clones.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thunk({:#x})", self.id())
    }
}

/// Argument of `schema` / `properties`: declared fields, in declaration order.
#[derive(Clone)]
pub enum Fields {
    Declared(Vec<(String, Definition)>),
    /// Fields produced on each visit.
    Lazy(Arc<FieldsProducer>),
}

impl Fields {
    /// The declared fields, invoking the producer when lazy.
    pub fn resolve(&self) -> Result<Vec<(String, Definition)>> {
        match self {
            Fields::Declared(fields) => Ok(fields.clone()),
            Fields::Lazy(producer) => producer(),
        }
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fields::Declared(fields) => f
                .debug_map()
                .entries(fields.iter().map(|(name, def)| (name, def)))
                .finish(),
            Fields::Lazy(_) => f.write_str("Fields::Lazy"),
        }
    }
}

/// Argument of `default`.
#[derive(Clone)]
pub enum DefaultValue {
    /// Converted into a fresh value on each application, so two defaulted
    /// fields never share a container.
    Literal(serde_json::Value),
    Thunk(Arc<DefaultProducer>),
}

impl DefaultValue {
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Literal(json) => Value::from(json),
            DefaultValue::Thunk(producer) => producer(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(json) => write!(f, "Literal({json})"),
            DefaultValue::Thunk(_) => f.write_str("Thunk"),
        }
    }
}

/// Argument of `custom`: replaces the value, or rejects it with a message.
#[derive(Clone)]
pub struct Transform(Arc<TransformFn>);

impl Transform {
    pub fn new(f: impl Fn(Value) -> std::result::Result<Value, String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value) -> std::result::Result<Value, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform")
    }
}

/// A structured definition node. Unset keywords do not apply.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub optional: bool,
    /// Derived as `!optional` when unset.
    pub required: Option<bool>,
    pub default: Option<DefaultValue>,
    pub kind: Option<TypeName>,
    pub schema: Option<Fields>,
    pub items: Option<Definition>,
    /// Argument of `in` / `enum`.
    pub allowed: Option<Vec<serde_json::Value>>,
    pub bounds: Option<Bounds>,
    pub either: Option<Vec<Definition>>,
    /// Defaulted by `ResolvePolicy::default_strict` when unset.
    pub strict: Option<bool>,
    pub require: Option<Vec<String>>,
    pub restrict: Option<Vec<String>>,
    pub custom: Option<Transform>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node with only `type` set.
    pub fn of_type(kind: TypeName) -> Self {
        Self::new().kind(kind)
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_value(mut self, json: serde_json::Value) -> Self {
        self.default = Some(DefaultValue::Literal(json));
        self
    }

    pub fn default_with(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::Thunk(Arc::new(f)));
        self
    }

    pub fn kind(mut self, kind: TypeName) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Declare one `schema` field. Replaces a lazy `schema`.
    pub fn field(mut self, name: impl Into<String>, def: impl Into<Definition>) -> Self {
        let entry = (name.into(), def.into());
        match &mut self.schema {
            Some(Fields::Declared(fields)) => fields.push(entry),
            _ => self.schema = Some(Fields::Declared(vec![entry])),
        }
        self
    }

    pub fn schema_with(
        mut self,
        f: impl Fn() -> Result<Vec<(String, Definition)>> + Send + Sync + 'static,
    ) -> Self {
        self.schema = Some(Fields::Lazy(Arc::new(f)));
        self
    }

    pub fn items(mut self, def: impl Into<Definition>) -> Self {
        self.items = Some(def.into());
        self
    }

    /// Set `in` / `enum`.
    pub fn one_of(mut self, allowed: impl IntoIterator<Item = serde_json::Value>) -> Self {
        self.allowed = Some(allowed.into_iter().collect());
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn gt(self, bound: f64) -> Self {
        self.bound(crate::keyword::Comparator::Gt, bound)
    }

    pub fn gte(self, bound: f64) -> Self {
        self.bound(crate::keyword::Comparator::Gte, bound)
    }

    pub fn lt(self, bound: f64) -> Self {
        self.bound(crate::keyword::Comparator::Lt, bound)
    }

    pub fn lte(self, bound: f64) -> Self {
        self.bound(crate::keyword::Comparator::Lte, bound)
    }

    fn bound(mut self, comparator: crate::keyword::Comparator, bound: f64) -> Self {
        self.bounds.get_or_insert_with(Bounds::default).set(comparator, bound);
        self
    }

    pub fn either<I, D>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Definition>,
    {
        self.either = Some(alternatives.into_iter().map(Into::into).collect());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn require<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn restrict<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restrict = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn custom(
        mut self,
        f: impl Fn(Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.custom = Some(Transform::new(f));
        self
    }
}
