use crate::domain::error::IterableError;
use crate::domain::records::{DataFields, UserUpdateRequest};
use crate::domain::value_objects::DataField;
use serde_json::Value;
use std::path::Path;

/// Assembles a `users/update` body from command-line pieces.
///
/// Inline `key=value` fields are applied first and the data file, when
/// given, is merged on top of them: on a duplicate key the file wins.
#[derive(Debug, Default)]
pub struct UserUpdateBuilder {
    request: UserUpdateRequest,
}

impl UserUpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.request.email = email.filter(|value| !value.is_empty());
        self
    }

    pub fn user_id(mut self, user_id: Option<String>) -> Self {
        self.request.user_id = user_id.filter(|value| !value.is_empty());
        self
    }

    pub fn data_fields(mut self, fields: &[DataField]) -> Self {
        for field in fields {
            self.request
                .data_fields
                .insert(field.key.clone(), Value::String(field.value.clone()));
        }
        self
    }

    pub fn data_file(self, path: Option<&Path>) -> Result<Self, IterableError> {
        match path {
            Some(path) => {
                let contents = std::fs::read(path).map_err(|source| IterableError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                self.data_json(&contents)
            }
            None => Ok(self),
        }
    }

    /// Merges a JSON document whose top level must be an object.
    pub fn data_json(mut self, contents: &[u8]) -> Result<Self, IterableError> {
        let fields: DataFields =
            serde_json::from_slice(contents).map_err(|source| IterableError::Decode {
                payload: "data file as a JSON object",
                source,
            })?;
        self.request.data_fields.extend(fields);
        Ok(self)
    }

    pub fn create_new_fields(mut self, enabled: bool) -> Self {
        self.request.create_new_fields = enabled;
        self
    }

    pub fn merge_nested_objects(mut self, enabled: bool) -> Self {
        self.request.merge_nested_objects = enabled;
        self
    }

    pub fn prefer_user_id(mut self, enabled: bool) -> Self {
        self.request.prefer_user_id = enabled;
        self
    }

    pub fn build(self) -> Result<UserUpdateRequest, IterableError> {
        self.request.validate()?;
        Ok(self.request)
    }
}
