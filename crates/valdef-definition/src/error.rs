/// Errors in a definition itself, as opposed to the data being validated.
///
/// These always abort the current call; they are never collected into a
/// violation list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    /// A structured node carries a keyword the engine does not know.
    #[error("unknown keyword `{0}`")]
    UnknownKeyword(String),

    /// `type` (or a shorthand) names a type the engine does not know.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// `bounds` carries a comparator other than `gt`, `gte`, `lt`, `lte`.
    #[error("unknown bounds comparator `{0}`")]
    UnknownComparator(String),

    /// A keyword argument has the wrong shape.
    #[error("invalid argument for `{keyword}`: {reason}")]
    InvalidArgument { keyword: String, reason: String },

    /// An `either` alternative is not a usable definition.
    #[error("malformed either alternative #{index}: {source}")]
    MalformedEither {
        index: usize,
        #[source]
        source: Box<DefinitionError>,
    },

    /// The JSON value is neither a type name nor a keyword object.
    #[error("a definition must be a type name or an object, found {0}")]
    NotADefinition(&'static str),

    /// `default` targeted the root value while root defaults are disabled.
    #[error("default is only valid for composed values (no parent container at {path})")]
    RootDefault { path: String },

    /// A thunk kept producing thunks.
    #[error("thunk chain exceeds {0} indirections")]
    ThunkChainTooDeep(usize),

    /// Definitions kept nesting at one path without descending into the
    /// value, as a left-recursive `either` does.
    #[error("definition recurses at {path} without descending into the value")]
    LeftRecursion { path: String },

    /// The definition failed meta-validation.
    #[error("invalid definition: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl DefinitionError {
    pub(crate) fn invalid_argument(keyword: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DefinitionError>;
