use serde::{Serialize, Serializer};
use std::fmt;

/// Target-language-agnostic type assigned to a column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericType {
    /// Integer, floating point, decimal and money values
    Number,
    /// Textual values, and anything only representable as text
    String,
    /// `true` / `false`
    Boolean,
    /// A point in time
    Date,
    /// Raw bytes
    Binary,
    /// A structured value, e.g. a JSON document
    Object,
    /// A value without a useful static type, e.g. an interval
    Any,
    /// One label of an enumeration
    Literal(String),
    /// A sequence of the inner type
    Array(Box<GenericType>),
}

/// The generic type of a column: one or more alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    alternatives: Vec<GenericType>,
}

impl GenericType {
    /// Wrap this type into a sequence of itself
    pub fn into_array(self) -> Self {
        GenericType::Array(Box::new(self))
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "Date"),
            Self::Binary => write!(f, "Buffer"),
            Self::Object => write!(f, "object"),
            Self::Any => write!(f, "any"),
            Self::Literal(label) => write!(
                f,
                "\"{}\"",
                label.replace('\\', "\\\\").replace('"', "\\\"")
            ),
            Self::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

impl FieldType {
    /// A single, non-union type
    pub fn new(ty: GenericType) -> Self {
        Self {
            alternatives: vec![ty],
        }
    }

    /// A union of the given alternatives, in order
    pub fn union<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = GenericType>,
    {
        Self {
            alternatives: alternatives.into_iter().collect(),
        }
    }

    /// A union of one literal per enumeration label
    pub fn enumeration<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::union(labels.into_iter().map(|l| GenericType::Literal(l.into())))
    }

    pub fn alternatives(&self) -> &[GenericType] {
        &self.alternatives
    }

    pub fn is_union(&self) -> bool {
        self.alternatives.len() > 1
    }

    /// Turn every alternative into a sequence of itself: `string | object`
    /// becomes `string[] | object[]`, never `(string | object)[]`
    pub fn into_array(self) -> Self {
        Self::union(self.alternatives.into_iter().map(GenericType::into_array))
    }
}

impl From<GenericType> for FieldType {
    fn from(ty: GenericType) -> Self {
        Self::new(ty)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
