//! Native PostgreSQL column type to [FieldType] mapping

use crate::{FieldType, GenericType};
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

/// Extension types stored as text, matched case-insensitively on the udt name
const EXTENSION_TYPES: [&str; 5] = ["citext", "hstore", "geography", "geometry", "ltree"];

/// Storage type recorded for enumeration columns
pub const ENUM_STORAGE_TYPE: &str = "enum";

/// Native type names as reported by `information_schema.columns.data_type`
/// (long form) or `udt_name` (short form, used for array elements)
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum NativeType {
    #[strum(serialize = "int2", serialize = "smallint")]
    SmallInt,
    #[strum(serialize = "int4", serialize = "integer")]
    Integer,
    #[strum(serialize = "int8", serialize = "bigint")]
    BigInt,
    #[strum(serialize = "decimal", serialize = "numeric")]
    Decimal,
    #[strum(serialize = "real", serialize = "float4")]
    Real,
    #[strum(serialize = "float", serialize = "float8", serialize = "double precision")]
    Double,
    #[strum(serialize = "money")]
    Money,
    #[strum(serialize = "character varying", serialize = "varchar")]
    VarChar,
    #[strum(serialize = "character", serialize = "char")]
    Char,
    #[strum(serialize = "bpchar")]
    BpChar,
    #[strum(serialize = "text")]
    Text,
    #[strum(serialize = "citext")]
    CiText,
    #[strum(serialize = "hstore")]
    HStore,
    #[strum(serialize = "bytea")]
    Bytea,
    #[strum(serialize = "bit")]
    Bit,
    #[strum(serialize = "varbit", serialize = "bit varying")]
    VarBit,
    #[strum(serialize = "timestamptz", serialize = "timestamp with time zone")]
    TimestampTz,
    #[strum(serialize = "timestamp without time zone")]
    TimestampNaive,
    /// Short udt name of `timestamp without time zone`, surfaced as text
    #[strum(serialize = "timestamp")]
    Timestamp,
    #[strum(serialize = "date")]
    Date,
    #[strum(
        serialize = "time",
        serialize = "time without time zone",
        serialize = "timetz",
        serialize = "time with time zone"
    )]
    Time,
    #[strum(serialize = "interval")]
    Interval,
    #[strum(serialize = "bool", serialize = "boolean")]
    Boolean,
    #[strum(serialize = "point", serialize = "box", serialize = "circle")]
    GeometricObject,
    #[strum(serialize = "lseg")]
    LineSegment,
    #[strum(serialize = "line", serialize = "path", serialize = "polygon")]
    GeometricText,
    #[strum(
        serialize = "cidr",
        serialize = "inet",
        serialize = "macaddr",
        serialize = "macaddr8"
    )]
    NetworkAddress,
    #[strum(serialize = "tsvector", serialize = "tsquery")]
    TextSearch,
    #[strum(serialize = "uuid")]
    Uuid,
    #[strum(serialize = "xml")]
    Xml,
    #[strum(serialize = "json", serialize = "jsonb")]
    Json,
    #[strum(
        serialize = "int4range",
        serialize = "int8range",
        serialize = "numrange",
        serialize = "tsrange",
        serialize = "tstzrange",
        serialize = "daterange"
    )]
    Range,
    #[strum(serialize = "ARRAY")]
    Array,
    #[strum(serialize = "USER-DEFINED")]
    UserDefined,
}

/// A column type the mapper could resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// Generic type of a single value; see [MappedType::field_type]
    pub element_type: FieldType,
    /// Normalized storage type, e.g. `char` for `bpchar` or `enum`
    pub col_type: String,
    pub is_array: bool,
    /// Enumeration labels in declaration order
    pub enum_values: Vec<String>,
}

/// A column type the mapper could not resolve
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported column type {data_type} ({udt_name})")]
pub struct UnsupportedType {
    pub kind: UnsupportedKind,
    pub data_type: String,
    pub udt_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedKind {
    /// `USER-DEFINED` type that is neither a known extension nor an enum
    UserDefined,
    /// Array whose element type cannot be resolved
    Array,
    /// Anything else missing from the type table
    Unrecognized,
}

impl NativeType {
    /// Generic type of a scalar native type; `None` for the array and
    /// user-defined wrappers, which need more context
    pub fn generic_type(self) -> Option<FieldType> {
        use GenericType as G;
        let ty = match self {
            Self::SmallInt
            | Self::Integer
            | Self::BigInt
            | Self::Decimal
            | Self::Real
            | Self::Double
            | Self::Money => G::Number.into(),
            Self::VarChar
            | Self::Char
            | Self::BpChar
            | Self::Text
            | Self::CiText
            | Self::HStore
            | Self::Bit
            | Self::VarBit
            | Self::Timestamp
            | Self::Date
            | Self::Time
            | Self::GeometricText
            | Self::NetworkAddress
            | Self::TextSearch
            | Self::Uuid
            | Self::Xml
            | Self::Range => G::String.into(),
            Self::Bytea => G::Binary.into(),
            Self::TimestampTz | Self::TimestampNaive => G::Date.into(),
            Self::Interval => G::Any.into(),
            Self::Boolean => G::Boolean.into(),
            Self::GeometricObject => FieldType::union([G::String, G::Object]),
            Self::LineSegment => FieldType::union([G::String, G::String.into_array()]),
            Self::Json => G::Object.into(),
            Self::Array | Self::UserDefined => return None,
        };
        Some(ty)
    }
}

impl MappedType {
    fn scalar(element_type: FieldType, col_type: &str) -> Self {
        Self {
            element_type,
            col_type: col_type.to_owned(),
            is_array: false,
            enum_values: Vec::new(),
        }
    }

    /// Generic type of the column: the element type, with every alternative
    /// turned into a sequence when the column is an array
    pub fn field_type(&self) -> FieldType {
        if self.is_array {
            self.element_type.clone().into_array()
        } else {
            self.element_type.clone()
        }
    }
}

/// Resolve a column's native type.
///
/// `data_type` is the catalog's type name, `udt_name` the underlying type
/// name (array element types carry a leading `_`), and `enum_values` the
/// comma joined labels when the underlying type is an enumeration.
pub fn map_column_type(
    data_type: &str,
    udt_name: &str,
    enum_values: Option<&str>,
) -> Result<MappedType, UnsupportedType> {
    let unsupported = |kind| UnsupportedType {
        kind,
        data_type: data_type.to_owned(),
        udt_name: udt_name.to_owned(),
    };

    let native = NativeType::from_str(data_type)
        .map_err(|_| unsupported(UnsupportedKind::Unrecognized))?;

    match native {
        NativeType::Array => {
            let element = udt_name.strip_prefix('_').unwrap_or(udt_name);
            let element_type = NativeType::from_str(element)
                .ok()
                .and_then(NativeType::generic_type)
                .ok_or_else(|| unsupported(UnsupportedKind::Array))?;
            let mut mapped = MappedType::scalar(element_type, storage_type(element));
            mapped.is_array = true;
            Ok(mapped)
        }
        NativeType::UserDefined => {
            if EXTENSION_TYPES
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(udt_name))
            {
                return Ok(MappedType::scalar(GenericType::String.into(), udt_name));
            }
            match enum_values.filter(|labels| !labels.is_empty()) {
                Some(labels) => {
                    let enum_values: Vec<String> =
                        labels.split(',').map(ToOwned::to_owned).collect();
                    Ok(MappedType {
                        element_type: FieldType::enumeration(enum_values.iter().cloned()),
                        col_type: ENUM_STORAGE_TYPE.to_owned(),
                        is_array: false,
                        enum_values,
                    })
                }
                None => Err(unsupported(UnsupportedKind::UserDefined)),
            }
        }
        scalar => match scalar.generic_type() {
            Some(ty) => Ok(MappedType::scalar(ty, storage_type(data_type))),
            None => Err(unsupported(UnsupportedKind::Unrecognized)),
        },
    }
}

fn storage_type(name: &str) -> &str {
    match name {
        "bpchar" => "char",
        other => other,
    }
}
