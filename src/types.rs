//! Envelope and per-trigger request/response types
//!
//! All types use camelCase JSON serialization, matching the identity
//! service's wire format.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::collections::HashMap;

/// User attributes as sent by the identity service (attribute name → value)
///
/// Lookups are explicit: a missing key is `None`, never an empty string.
pub type UserAttributes = HashMap<String, String>;

/// Decodes an explicit `null` the same way as a missing key
///
/// The identity service sends `null` for unset maps and strings
/// (`"validationData": null` is common on sign-up and sign-in).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Generic lifecycle event envelope
///
/// `request` and `response` are kept as raw JSON so one envelope type can
/// carry every trigger's payload shape. They are only parsed once the
/// trigger source has picked a handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Event schema version
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,

    /// Lifecycle event discriminant (e.g. `PreSignUp_SignUp`)
    ///
    /// Missing sources decode as an empty string and pass through.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger_source: String,

    /// Region of the user pool
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,

    /// User pool identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_pool_id: String,

    /// Calling client details
    #[serde(default, deserialize_with = "null_as_default")]
    pub caller_context: CallerContext,

    /// Target user
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,

    /// Trigger-specific request, not yet parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Box<RawValue>>,

    /// Trigger-specific response, populated by dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Box<RawValue>>,
}

/// Client details attached to every envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aws_sdk_version: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub client_id: String,
}

/// Pre-signup request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreSignUpRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_attributes: UserAttributes,

    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_data: HashMap<String, String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub client_metadata: HashMap<String, String>,
}

/// Pre-signup response
///
/// The override flags are always `false`: this service never auto-confirms
/// or auto-verifies users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreSignUpResponse {
    pub auto_confirm_user: bool,
    pub auto_verify_email: bool,
    pub auto_verify_phone: bool,
}

/// Pre-authentication request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreAuthenticationRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_attributes: UserAttributes,

    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_data: HashMap<String, String>,
}

/// Pre-authentication response (empty acknowledgment)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreAuthenticationResponse {}

/// Group and role configuration presented to the pre-token trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfiguration {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub groups_to_override: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub iam_roles_to_override: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_role: Option<String>,
}

/// Pre-token-generation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreTokenGenRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_attributes: UserAttributes,

    #[serde(default, deserialize_with = "null_as_default")]
    pub group_configuration: GroupConfiguration,

    #[serde(default, deserialize_with = "null_as_default")]
    pub client_metadata: HashMap<String, String>,
}

/// Claim and group overrides a pre-token trigger may return
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsOverrideDetails {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub claims_to_add_or_override: HashMap<String, String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub claims_to_suppress: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_override_details: Option<GroupConfiguration>,
}

/// Pre-token-generation response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreTokenGenResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims_override_details: Option<ClaimsOverrideDetails>,
}

/// Post-confirmation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfirmationRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_attributes: UserAttributes,

    #[serde(default, deserialize_with = "null_as_default")]
    pub client_metadata: HashMap<String, String>,
}

/// Post-confirmation response (empty acknowledgment)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostConfirmationResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_acknowledgments_encode_as_objects() {
        assert_eq!(
            serde_json::to_string(&PreAuthenticationResponse::default()).unwrap(),
            "{}"
        );
        assert_eq!(
            serde_json::to_string(&PostConfirmationResponse::default()).unwrap(),
            "{}"
        );
        assert_eq!(
            serde_json::to_string(&PreTokenGenResponse::default()).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_pre_signup_response_flags() {
        let json = serde_json::to_string(&PreSignUpResponse::default()).unwrap();
        assert!(json.contains("\"autoConfirmUser\":false"));
        assert!(json.contains("\"autoVerifyEmail\":false"));
        assert!(json.contains("\"autoVerifyPhone\":false"));
    }

    #[test]
    fn test_request_missing_maps_default_empty() {
        let req: PreSignUpRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_attributes.is_empty());
        assert!(req.validation_data.is_empty());
        assert!(req.user_attributes.get("email").is_none());
    }

    #[test]
    fn test_pre_token_request_group_configuration() {
        let json = r#"{
            "userAttributes": {"email": "a@example.com"},
            "groupConfiguration": {
                "groupsToOverride": ["admins"],
                "iamRolesToOverride": [],
                "preferredRole": "arn:role/admin"
            }
        }"#;

        let req: PreTokenGenRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.group_configuration.groups_to_override, vec!["admins"]);
        assert_eq!(
            req.group_configuration.preferred_role.as_deref(),
            Some("arn:role/admin")
        );
    }

    #[test]
    fn test_claims_override_skips_empty_fields() {
        let res = PreTokenGenResponse {
            claims_override_details: Some(ClaimsOverrideDetails {
                claims_to_suppress: vec!["email".to_string()],
                ..Default::default()
            }),
        };

        let json = serde_json::to_string(&res).unwrap();
        assert_eq!(
            json,
            r#"{"claimsOverrideDetails":{"claimsToSuppress":["email"]}}"#
        );
    }

    #[test]
    fn test_envelope_tolerates_missing_fields() {
        let env: Envelope = serde_json::from_str(r#"{"userName": "bob"}"#).unwrap();
        assert_eq!(env.user_name, "bob");
        assert_eq!(env.trigger_source, "");
        assert!(env.request.is_none());
        assert!(env.response.is_none());
        assert_eq!(env.caller_context, CallerContext::default());
    }

    #[test]
    fn test_envelope_null_response_is_absent() {
        let env: Envelope =
            serde_json::from_str(r#"{"request": {"a": 1}, "response": null}"#).unwrap();
        assert_eq!(env.request.as_ref().unwrap().get(), r#"{"a": 1}"#);
        assert!(env.response.is_none());

        let json = serde_json::to_string(&env).unwrap();
        assert!(!json.contains("response"));
    }

    #[test]
    fn test_request_null_maps_default_empty() {
        let json = r#"{
            "userAttributes": {"email": "a@example.com"},
            "validationData": null,
            "clientMetadata": null
        }"#;

        let req: PreSignUpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_attributes.get("email").unwrap(), "a@example.com");
        assert!(req.validation_data.is_empty());
        assert!(req.client_metadata.is_empty());

        let req: PreAuthenticationRequest =
            serde_json::from_str(r#"{"userAttributes": null, "validationData": null}"#).unwrap();
        assert!(req.user_attributes.is_empty());
        assert!(req.validation_data.is_empty());

        let req: PreTokenGenRequest = serde_json::from_str(
            r#"{"groupConfiguration": {"groupsToOverride": null, "preferredRole": null}}"#,
        )
        .unwrap();
        assert!(req.group_configuration.groups_to_override.is_empty());
        assert!(req.group_configuration.preferred_role.is_none());
    }

    #[test]
    fn test_envelope_null_strings_default_empty() {
        let json = r#"{
            "version": null,
            "triggerSource": "PreSignUp_SignUp",
            "region": null,
            "userPoolId": null,
            "userName": null,
            "callerContext": {"awsSdkVersion": null, "clientId": "c1"},
            "request": {}
        }"#;

        let env: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.trigger_source, "PreSignUp_SignUp");
        assert_eq!(env.user_name, "");
        assert_eq!(env.region, "");
        assert_eq!(env.caller_context.aws_sdk_version, "");
        assert_eq!(env.caller_context.client_id, "c1");

        let env: Envelope =
            serde_json::from_str(r#"{"triggerSource": null, "callerContext": null}"#).unwrap();
        assert_eq!(env.trigger_source, "");
        assert_eq!(env.caller_context, CallerContext::default());
    }
}
