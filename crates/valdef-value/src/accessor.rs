use std::fmt;

/// A single step from a container into one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// Object field.
    Key(String),
    /// Array element.
    Index(usize),
}

impl Accessor {
    /// Path token for this step: `.key` or `[index]`.
    pub fn token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Key(key) => write!(f, ".{key}"),
            Accessor::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for Accessor {
    fn from(key: &str) -> Self {
        Accessor::Key(key.to_string())
    }
}

impl From<String> for Accessor {
    fn from(key: String) -> Self {
        Accessor::Key(key)
    }
}

impl From<usize> for Accessor {
    fn from(index: usize) -> Self {
        Accessor::Index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_render_like_property_access() {
        assert_eq!(Accessor::from("body").token(), ".body");
        assert_eq!(Accessor::from(3).token(), "[3]");
    }
}
