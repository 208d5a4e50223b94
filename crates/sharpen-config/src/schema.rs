use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::SharpenConfig;

/// JSON schema for `sharpen.toml`, for editor TOML integrations.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(SharpenConfig)
}

/// The schema rendered as pretty JSON.
pub fn json_schema_string() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json_schema())
}
