//! GraphQL operation plumbing and the two queries the SDK issues.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use super::error::GraphqlError;

/// Typed GraphQL operation definition.
pub trait GraphqlOperation {
    type Variables: Serialize + Send + Sync;
    type ResponseData: DeserializeOwned + Send;

    const QUERY: &'static str;
    const OPERATION_NAME: &'static str;
}

/// GraphQL request payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
    pub operation_name: &'a str,
}

/// GraphQL response container.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

// ---------------------------------------------------------------------------
// GetAppByPublicKey
// ---------------------------------------------------------------------------

pub struct GetAppByPublicKey;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyVars {
    pub public_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppByPublicKeyData {
    #[serde(rename = "getAppByPublicKey", default)]
    pub app: Option<ApplicationNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationNode {
    #[serde(rename = "appName", default)]
    pub app_name: String,
    /// Int64 scalar; servers send it either as a JSON number or a string.
    #[serde(rename = "gandalfID", default, deserialize_with = "int64_as_string")]
    pub gandalf_id: String,
}

fn int64_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) => Ok(s),
        other => Err(de::Error::custom(format!(
            "expected Int64 for gandalfID, got {other}"
        ))),
    }
}

impl GraphqlOperation for GetAppByPublicKey {
    type Variables = PublicKeyVars;
    type ResponseData = AppByPublicKeyData;

    const QUERY: &'static str = "query GetAppByPublicKey($publicKey: String!) { getAppByPublicKey(publicKey: $publicKey) { __typename appName gandalfID } }";
    const OPERATION_NAME: &'static str = "GetAppByPublicKey";
}

// ---------------------------------------------------------------------------
// GetSupportedServices (schema introspection)
// ---------------------------------------------------------------------------

pub struct GetSupportedServices;

#[derive(Debug, Clone, Default, Serialize)]
pub struct NoVars {}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportedServicesData {
    #[serde(rename = "__sourceType", default)]
    pub source_type: Option<IntrospectedEnum>,
    #[serde(rename = "__traitType", default)]
    pub trait_type: Option<IntrospectedEnum>,
    #[serde(rename = "__activityType", default)]
    pub activity_type: Option<IntrospectedEnum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectedEnum {
    #[serde(rename = "enumValues", default)]
    pub enum_values: Option<Vec<IntrospectedEnumValue>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectedEnumValue {
    pub name: String,
}

impl IntrospectedEnum {
    pub fn value_names(&self) -> Vec<String> {
        self.enum_values
            .iter()
            .flatten()
            .map(|v| v.name.clone())
            .collect()
    }
}

impl GraphqlOperation for GetSupportedServices {
    type Variables = NoVars;
    type ResponseData = SupportedServicesData;

    const QUERY: &'static str = r#"query GetSupportedServices { __sourceType: __type(name: "Source") { __typename name enumValues(includeDeprecated: false) { __typename name } } __traitType: __type(name: "TraitLabel") { __typename name enumValues(includeDeprecated: false) { __typename name } } __activityType: __type(name: "ActivityType") { __typename name enumValues(includeDeprecated: false) { __typename name } } }"#;
    const OPERATION_NAME: &'static str = "GetSupportedServices";
}
