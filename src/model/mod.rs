//! Typed object template model
//!
//! Two schema generations are modelled side by side and never merged:
//! [`legacy`] (the original `TemplateId`/`TemplateName` shape) and
//! [`current`] (the `GUID`/`Name` shape with per-type templates, lights and
//! snap point modes). Shared leaf types live in [`basic`] and
//! [`components`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Defines an enum serialized as its integer code, with a matching schema.
macro_rules! integer_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            /// Every variant in code order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Integer code used in documents
            pub fn code(self) -> u8 {
                self as u8
            }

            /// Look up a variant by its integer code
            pub fn from_code(code: u64) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = <u64 as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_code(code).ok_or_else(|| {
                    serde::de::Error::invalid_value(
                        serde::de::Unexpected::Unsigned(code),
                        &concat!("a ", stringify!($name), " code"),
                    )
                })
            }
        }

        impl schemars::JsonSchema for $name {
            fn schema_name() -> String {
                stringify!($name).to_owned()
            }

            fn json_schema(_gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
                schemars::schema::SchemaObject {
                    instance_type: Some(schemars::schema::InstanceType::Integer.into()),
                    enum_values: Some(vec![$( serde_json::Value::from($code as u8) ),+]),
                    ..Default::default()
                }
                .into()
            }
        }
    };
}

pub mod basic;
pub mod components;
pub mod current;
pub mod defaults;
pub mod legacy;

pub use basic::{CollisionBehavior, Color, ObjectType, PhysicalSurface, Vector};
pub use components::{
    CollisionDetails, ConvexCollision, ModelDetails, MultistateModelDetails, SphereCollision,
};
pub use current::ObjectTemplate;
pub use legacy::LegacyObjectTemplate;

/// `int32` schema with an inclusive lower bound, capped at `i32::MAX`
fn integer_at_least(minimum: f64) -> schemars::schema::Schema {
    let mut schema = schemars::schema::SchemaObject {
        instance_type: Some(schemars::schema::InstanceType::Integer.into()),
        format: Some("int32".to_owned()),
        ..Default::default()
    };
    schema.number().minimum = Some(minimum);
    schema.number().maximum = Some(f64::from(i32::MAX));
    schema.into()
}

/// `Indices`: at least one `uint32` atlas index
pub(crate) fn atlas_indices_schema(
    _gen: &mut schemars::gen::SchemaGenerator,
) -> schemars::schema::Schema {
    let mut index = schemars::schema::SchemaObject {
        instance_type: Some(schemars::schema::InstanceType::Integer.into()),
        format: Some("uint32".to_owned()),
        ..Default::default()
    };
    index.number().minimum = Some(0.0);
    index.number().maximum = Some(f64::from(u32::MAX));

    let mut schema = schemars::schema::SchemaObject {
        instance_type: Some(schemars::schema::InstanceType::Array.into()),
        ..Default::default()
    };
    schema.array().items = Some(schemars::schema::Schema::from(index).into());
    schema.array().min_items = Some(1);
    schema.into()
}

/// `BackIndex`: -1 reuse front, -2 separate file, -3 separate file same index
pub(crate) fn back_index_schema(_gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
    integer_at_least(-3.0)
}

/// `HiddenIndex`: -1 standard blur, -2 separate file
pub(crate) fn hidden_index_schema(
    _gen: &mut schemars::gen::SchemaGenerator,
) -> schemars::schema::Schema {
    integer_at_least(-2.0)
}

/// Schema generation a document is written against
///
/// Always chosen explicitly by the caller; documents are never classified by
/// which fields they happen to contain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// `TemplateId`/`TemplateName` documents
    #[serde(alias = "v1")]
    #[value(alias = "v1")]
    Legacy,
    /// `GUID`/`Name` documents with per-type templates
    #[default]
    #[serde(alias = "v2")]
    #[value(alias = "v2")]
    Current,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::Legacy => write!(f, "legacy"),
            Generation::Current => write!(f, "current"),
        }
    }
}

/// A decoded template of either generation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Template {
    Legacy(LegacyObjectTemplate),
    Current(ObjectTemplate),
}

impl Template {
    pub fn generation(&self) -> Generation {
        match self {
            Template::Legacy(_) => Generation::Legacy,
            Template::Current(_) => Generation::Current,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Template::Legacy(t) => t.object_type,
            Template::Current(t) => t.object_type(),
        }
    }

    /// Unique ID of the template (`TemplateId` or `GUID`)
    pub fn id(&self) -> &str {
        match self {
            Template::Legacy(t) => &t.template_id,
            Template::Current(t) => &t.base().guid,
        }
    }

    /// Display name of the template (`TemplateName` or `Name`)
    pub fn name(&self) -> &str {
        match self {
            Template::Legacy(t) => &t.template_name,
            Template::Current(t) => &t.base().name,
        }
    }
}
