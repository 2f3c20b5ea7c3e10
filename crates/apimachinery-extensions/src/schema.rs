use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{RawJson, SchemaOrArray, SchemaOrBool, SchemaOrStringArray};

/// A JSON-schema node as carried in extension-resource definitions.
///
/// Field names on the wire are the JSON names; unset fields are elided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, rename = "$schema", skip_serializing_if = "String::is_empty")]
    pub schema: String,

    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<RawJson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(
        default,
        rename = "exclusiveMaximum",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub exclusive_maximum: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(
        default,
        rename = "exclusiveMinimum",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub exclusive_minimum: bool,

    #[serde(default, rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,

    #[serde(default, rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pattern: String,

    #[serde(default, rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,

    #[serde(default, rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,

    #[serde(
        default,
        rename = "uniqueItems",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub unique_items: bool,

    #[serde(default, rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<RawJson>,

    #[serde(
        default,
        rename = "maxProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_properties: Option<i64>,

    #[serde(
        default,
        rename = "minProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_properties: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrArray>>,

    #[serde(default, rename = "allOf", skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<JsonSchema>,

    #[serde(default, rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<JsonSchema>,

    #[serde(default, rename = "anyOf", skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<JsonSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<JsonSchema>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchema>,

    #[serde(
        default,
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Box<SchemaOrBool>>,

    #[serde(
        default,
        rename = "additionalItems",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_items: Option<Box<SchemaOrBool>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, SchemaOrStringArray>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<RawJson>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}
