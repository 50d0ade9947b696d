use std::fmt;
use std::str::FromStr;

use crate::error::DefinitionError;

/// Every keyword a structured node may carry.
pub const KEYWORDS: [&str; 15] = [
    "optional",
    "required",
    "default",
    "type",
    "schema",
    "properties",
    "items",
    "in",
    "enum",
    "bounds",
    "either",
    "strict",
    "require",
    "restrict",
    "custom",
];

/// Type names accepted by `type` and by the shorthand form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Function,
    /// Not a check but a coercion into a date/time value.
    DateTime,
}

impl TypeName {
    pub const ALL: [TypeName; 7] = [
        TypeName::String,
        TypeName::Number,
        TypeName::Boolean,
        TypeName::Array,
        TypeName::Object,
        TypeName::Function,
        TypeName::DateTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::String => "string",
            TypeName::Number => "number",
            TypeName::Boolean => "boolean",
            TypeName::Array => "array",
            TypeName::Object => "object",
            TypeName::Function => "function",
            TypeName::DateTime => "datetime",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeName {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DefinitionError::UnknownType(s.to_string()))
    }
}

/// A numeric comparison inside `bounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparator {
    pub const ALL: [Comparator; 4] = [Comparator::Gt, Comparator::Gte, Comparator::Lt, Comparator::Lte];

    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Gt => "gt",
            Comparator::Gte => "gte",
            Comparator::Lt => "lt",
            Comparator::Lte => "lte",
        }
    }

    /// Phrase used in violation messages.
    pub fn describe(self) -> &'static str {
        match self {
            Comparator::Gt => "greater than",
            Comparator::Gte => "greater than or equal to",
            Comparator::Lt => "less than",
            Comparator::Lte => "less than or equal to",
        }
    }

    /// Whether `value` satisfies this comparison against `bound`.
    pub fn holds(self, value: f64, bound: f64) -> bool {
        match self {
            Comparator::Gt => value > bound,
            Comparator::Gte => value >= bound,
            Comparator::Lt => value < bound,
            Comparator::Lte => value <= bound,
        }
    }
}

impl FromStr for Comparator {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparator::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DefinitionError::UnknownComparator(s.to_string()))
    }
}

/// Argument of `bounds`. Each present comparator is checked on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub gt: Option<f64>,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
}

impl Bounds {
    pub fn get(&self, comparator: Comparator) -> Option<f64> {
        match comparator {
            Comparator::Gt => self.gt,
            Comparator::Gte => self.gte,
            Comparator::Lt => self.lt,
            Comparator::Lte => self.lte,
        }
    }

    pub fn set(&mut self, comparator: Comparator, bound: f64) {
        let slot = match comparator {
            Comparator::Gt => &mut self.gt,
            Comparator::Gte => &mut self.gte,
            Comparator::Lt => &mut self.lt,
            Comparator::Lte => &mut self.lte,
        };
        *slot = Some(bound);
    }

    /// Present comparators in `gt, gte, lt, lte` order.
    pub fn iter(&self) -> impl Iterator<Item = (Comparator, f64)> + '_ {
        Comparator::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|bound| (c, bound)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip_through_strings() {
        for name in TypeName::ALL {
            assert_eq!(name.as_str().parse::<TypeName>().unwrap(), name);
        }
        assert!(matches!(
            "integer".parse::<TypeName>(),
            Err(DefinitionError::UnknownType(name)) if name == "integer"
        ));
    }

    #[test]
    fn comparators_are_strict_or_inclusive() {
        assert!(!Comparator::Gt.holds(10.0, 10.0));
        assert!(Comparator::Gte.holds(10.0, 10.0));
        assert!(!Comparator::Lt.holds(10.0, 10.0));
        assert!(Comparator::Lte.holds(10.0, 10.0));
        assert!(matches!(
            "ge".parse::<Comparator>(),
            Err(DefinitionError::UnknownComparator(_))
        ));
    }

    #[test]
    fn bounds_iterate_present_comparators_only() {
        let mut bounds = Bounds::default();
        bounds.set(Comparator::Lte, 5.0);
        bounds.set(Comparator::Gt, 1.0);

        let present: Vec<_> = bounds.iter().collect();
        assert_eq!(present, vec![(Comparator::Gt, 1.0), (Comparator::Lte, 5.0)]);
    }
}
