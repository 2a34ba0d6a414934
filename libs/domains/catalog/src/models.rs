use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A producible catalog item, identified by its stock-keeping code.
///
/// Missing and `null` JSON fields deserialize to empty strings so that an
/// incomplete payload surfaces as a validation failure rather than a parse
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Product {
    /// Stock-keeping code, unique across the catalog
    #[serde(rename = "sku", alias = "code", default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "sku is required"))]
    #[schema(example = "sku1")]
    pub code: String,

    /// Universal product code
    #[serde(
        rename = "upc",
        alias = "universalId",
        default,
        deserialize_with = "null_as_empty"
    )]
    #[validate(length(min = 1, message = "upc is required"))]
    #[schema(example = "upc1")]
    pub universal_id: String,

    /// Display name
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "name1")]
    pub name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    pub fn new(
        code: impl Into<String>,
        universal_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            universal_id: universal_id.into(),
            name: name.into(),
        }
    }
}
