use crate::FieldType;
use serde::{Serialize, Serializer};
use std::{fmt, ops::Not};

/// Defines a Column of an Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(rename = "tscName")]
    pub(crate) name: String,
    #[serde(rename = "tscType")]
    pub(crate) field_type: FieldType,
    #[serde(rename = "type")]
    pub(crate) col_type: String,
    #[serde(skip_serializing_if = "Not::not")]
    pub(crate) generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) default: Option<ColumnDefault>,
    pub(crate) options: ColumnOptions,
}

/// Optional attributes of a column. Absent means "not set", e.g. a column
/// without `nullable` is not nullable and one without `length` uses the
/// generic default length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Not::not")]
    pub nullable: bool,
    #[serde(skip_serializing_if = "Not::not")]
    pub unique: bool,
    #[serde(skip_serializing_if = "Not::not")]
    pub array: bool,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

/// Default value of a column as it should be emitted by code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnDefault {
    /// Literal JSON payload, emitted as is
    Json(String),
    /// SQL expression, emitted as a deferred expression `() => "<expr>"`
    Expression(String),
}

impl Column {
    /// A generated column never carries a default
    pub fn new<N, T>(
        name: N,
        field_type: FieldType,
        col_type: T,
        generated: bool,
        default: Option<ColumnDefault>,
        options: ColumnOptions,
    ) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            field_type,
            col_type: col_type.into(),
            generated,
            default: if generated { None } else { default },
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Normalized storage type, e.g. `varchar`, `char` (for `bpchar`) or `enum`
    pub fn col_type(&self) -> &str {
        &self.col_type
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn default(&self) -> Option<&ColumnDefault> {
        self.default.as_ref()
    }

    pub fn options(&self) -> &ColumnOptions {
        &self.options
    }
}

impl fmt::Display for ColumnDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(payload) => write!(f, "{payload}"),
            Self::Expression(expr) => write!(f, "() => \"{expr}\""),
        }
    }
}

impl Serialize for ColumnDefault {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
