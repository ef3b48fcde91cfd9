use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal, immutable identifier of a service member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered national service member.
///
/// Serialized with camelCase keys; this is the payload persisted under the
/// session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: IdentityId,
    pub national_service_id: String,
    pub name: String,
    pub position: String,
    pub institution: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub photo_url: String,
    pub region: String,
    pub district: String,
    pub contact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Identity {
        Identity {
            id: IdentityId::new("1"),
            national_service_id: "NS12345".to_string(),
            name: "Kwame Mensah".to_string(),
            position: "Teaching Assistant".to_string(),
            institution: "University of Ghana".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
            photo_url: "/placeholder.svg".to_string(),
            region: "Greater Accra".to_string(),
            district: "Accra Metropolitan".to_string(),
            contact: "023-456-7890".to_string(),
        }
    }

    #[test]
    fn test_identity_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["nationalServiceId"], "NS12345");
        assert_eq!(json["startDate"], "2023-09-01");
        assert_eq!(json["photoUrl"], "/placeholder.svg");
    }

    #[test]
    fn test_identity_payload_deserialization() {
        let payload = serde_json::to_string(&sample()).unwrap();
        let parsed: Identity = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed.id, IdentityId::new("1"));
        assert_eq!(parsed, sample());
    }
}
