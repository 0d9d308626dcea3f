//! JSON shapes exchanged with the Iterable API.
//!
//! Field names follow the remote schema (camelCase). Optional fields are
//! skipped on output so `--format json` mirrors what the API returned.

use crate::domain::error::IterableError;
use crate::domain::value_objects::UserIdentifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Arbitrary profile attributes, keyed in lexicographic order.
pub type DataFields = BTreeMap<String, Value>;

/// An Iterable user profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_fields: DataFields,
}

/// `GET users/{email}` answer
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

/// Body of `POST users/update`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub data_fields: DataFields,
    pub create_new_fields: bool,
    pub merge_nested_objects: bool,
    pub prefer_user_id: bool,
}

impl UserUpdateRequest {
    /// The target profile must be addressable by email, user ID or both.
    pub fn validate(&self) -> Result<(), IterableError> {
        let has = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        if has(&self.email) || has(&self.user_id) {
            Ok(())
        } else {
            Err(IterableError::usage(
                "either --email or --user-id must be provided",
            ))
        }
    }
}

/// Body of `POST users/merge`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeUsersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_user_id: Option<String>,
}

impl MergeUsersRequest {
    pub fn new(source: UserIdentifier, destination: UserIdentifier) -> Self {
        let (source_email, source_user_id) = split_identifier(source);
        let (destination_email, destination_user_id) = split_identifier(destination);
        Self {
            source_email,
            source_user_id,
            destination_email,
            destination_user_id,
        }
    }

    /// Builds the request from the four CLI flags, rejecting zero or two
    /// identifiers on either side.
    pub fn from_flags(
        from_email: Option<&str>,
        from_user_id: Option<&str>,
        to_email: Option<&str>,
        to_user_id: Option<&str>,
    ) -> Result<Self, IterableError> {
        let source = UserIdentifier::from_flags(from_email, from_user_id, "source")?;
        let destination = UserIdentifier::from_flags(to_email, to_user_id, "destination")?;
        Ok(Self::new(source, destination))
    }

    /// Re-checks the one-identifier-per-side rule for requests built by hand.
    pub fn validate(&self) -> Result<(), IterableError> {
        UserIdentifier::from_flags(
            self.source_email.as_deref(),
            self.source_user_id.as_deref(),
            "source",
        )?;
        UserIdentifier::from_flags(
            self.destination_email.as_deref(),
            self.destination_user_id.as_deref(),
            "destination",
        )?;
        Ok(())
    }
}

fn split_identifier(identifier: UserIdentifier) -> (Option<String>, Option<String>) {
    match identifier {
        UserIdentifier::Email(email) => (Some(email), None),
        UserIdentifier::UserId(user_id) => (None, Some(user_id)),
    }
}

/// An Iterable mailing list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub list_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListsResponse {
    #[serde(default)]
    pub lists: Vec<List>,
}

/// An Iterable campaign. Timestamps are kept as the integers the API sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub campaign_state: String,
    #[serde(default)]
    pub message_medium: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppression_list_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub campaign_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_campaign_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignsResponse {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_survives_the_response_envelope() {
        let user = User {
            email: Some("ada@example.com".to_string()),
            user_id: Some("u-42".to_string()),
            data_fields: BTreeMap::from([
                ("firstName".to_string(), json!("Ada")),
                ("score".to_string(), json!(9.5)),
                ("prefs".to_string(), json!({"news": true, "tags": ["a", "b"]})),
                ("nothing".to_string(), Value::Null),
            ]),
        };
        let body = json!({ "user": user }).to_string();

        let decoded: UserResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(decoded.user, user);
    }

    #[test]
    fn empty_user_object_decodes() {
        let decoded: UserResponse = serde_json::from_str(r#"{"user":{}}"#).unwrap();
        assert_eq!(decoded.user, User::default());
    }

    #[test]
    fn unknown_user_answer_is_rejected() {
        // Iterable answers an unknown email with an empty object.
        assert!(serde_json::from_str::<UserResponse>("{}").is_err());
    }

    #[test]
    fn update_request_uses_remote_field_names() {
        let request = UserUpdateRequest {
            user_id: Some("u-1".to_string()),
            merge_nested_objects: true,
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": "u-1",
                "dataFields": {},
                "createNewFields": false,
                "mergeNestedObjects": true,
                "preferUserId": false
            })
        );
    }

    #[test]
    fn update_request_needs_an_identifier() {
        let err = UserUpdateRequest::default().validate().unwrap_err();
        assert!(err.is_usage());

        let blank = UserUpdateRequest {
            email: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn merge_supports_all_four_combinations() {
        let cases = [
            (Some("a@x.com"), None, Some("b@x.com"), None),
            (Some("a@x.com"), None, None, Some("u-2")),
            (None, Some("u-1"), Some("b@x.com"), None),
            (None, Some("u-1"), None, Some("u-2")),
        ];
        for (from_email, from_id, to_email, to_id) in cases {
            let request = MergeUsersRequest::from_flags(from_email, from_id, to_email, to_id)
                .unwrap();
            assert!(request.validate().is_ok());
        }

        let request = MergeUsersRequest::from_flags(Some("a@x.com"), None, None, Some("u-2")).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"sourceEmail": "a@x.com", "destinationUserId": "u-2"})
        );
    }

    #[test]
    fn merge_rejects_both_or_neither() {
        assert!(
            MergeUsersRequest::from_flags(Some("a@x.com"), Some("u-1"), Some("b@x.com"), None)
                .unwrap_err()
                .is_usage()
        );
        assert!(
            MergeUsersRequest::from_flags(None, None, Some("b@x.com"), None)
                .unwrap_err()
                .is_usage()
        );
        assert!(
            MergeUsersRequest::from_flags(Some("a@x.com"), None, Some("b@x.com"), Some("u-2"))
                .unwrap_err()
                .is_usage()
        );
    }

    #[test]
    fn campaign_tolerates_sparse_and_unknown_fields() {
        let body = json!({
            "campaigns": [
                {"id": 1, "name": "Welcome", "campaignState": "Running", "messageMedium": "Email",
                 "listIds": [3, 4], "labels": ["onboarding"], "type": "Triggered", "somethingNew": 1},
                {"id": 2}
            ]
        });
        let decoded: CampaignsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(decoded.campaigns.len(), 2);
        assert_eq!(decoded.campaigns[0].list_ids, vec![3, 4]);
        assert_eq!(decoded.campaigns[0].campaign_type.as_deref(), Some("Triggered"));
        assert_eq!(decoded.campaigns[1].name, "");
    }
}
