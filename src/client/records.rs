//! Records returned by the downstream services.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, ClientResult};

/// A user as served by the user service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Remaining fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A notification template as served by the template service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(alias = "code")]
    pub template_code: String,

    /// Remaining fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Services may answer with the bare record or wrapped in `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<R> {
    Wrapped { data: R },
    Bare(R),
}

/// Decode a 2xx body into a record.
pub fn decode_record<R: DeserializeOwned>(body: &[u8]) -> ClientResult<R> {
    match serde_json::from_slice::<Envelope<R>>(body) {
        Ok(Envelope::Wrapped { data }) => Ok(data),
        Ok(Envelope::Bare(record)) => Ok(record),
        Err(e) => Err(ClientError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_user() {
        let user: UserRecord =
            decode_record(br#"{"user_id":"u-1","email":"a@example.com","name":"Ada"}"#).unwrap();
        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert_eq!(user.extra["name"], "Ada");
    }

    #[test]
    fn test_decode_wrapped_template() {
        let template: TemplateRecord =
            decode_record(br#"{"success":true,"data":{"code":"welcome","subject":"Hi"}}"#).unwrap();
        assert_eq!(template.template_code, "welcome");
        assert_eq!(template.extra["subject"], "Hi");
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let result: ClientResult<UserRecord> = decode_record(b"<html>oops</html>");
        assert!(matches!(result, Err(ClientError::Decode(_))));

        let result: ClientResult<UserRecord> = decode_record(br#"{"email":"x"}"#);
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }
}
