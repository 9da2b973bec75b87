use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Which hosted form a payload is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Inquiry,
    Application,
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::Inquiry => write!(f, "inquiry"),
            FormKind::Application => write!(f, "application"),
        }
    }
}

/// Contact inquiry from the index page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub message: String,
}

/// Open positions offered on the applications page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "Client Outreach Representative – reaching new clients")]
    ClientOutreach,
    #[serde(rename = "Digital Marketing Specialist – social media, ads, content promotion")]
    DigitalMarketing,
    #[serde(rename = "Account Manager / Client Success – manages relationships")]
    AccountManager,
}

impl Position {
    pub const ALL: [Position; 3] = [
        Position::ClientOutreach,
        Position::DigitalMarketing,
        Position::AccountManager,
    ];

    /// Label submitted with the form
    pub fn label(&self) -> &'static str {
        match self {
            Position::ClientOutreach => "Client Outreach Representative – reaching new clients",
            Position::DigitalMarketing => "Digital Marketing Specialist – social media, ads, content promotion",
            Position::AccountManager => "Account Manager / Client Success – manages relationships",
        }
    }

    /// Short command-line name
    pub fn slug(&self) -> &'static str {
        match self {
            Position::ClientOutreach => "outreach",
            Position::DigitalMarketing => "marketing",
            Position::AccountManager => "account-manager",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Accepts a slug, a 1-based index or the full label
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Position::ALL
            .into_iter()
            .enumerate()
            .find(|(i, p)| p.slug().eq_ignore_ascii_case(s) || p.label() == s || (i + 1).to_string() == s)
            .map(|(_, p)| p)
            .ok_or_else(|| Error::Validation(format!("unknown position '{}'", s)))
    }
}

/// Job application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    /// Already formatted, see [`super::phone::format_phone`]
    #[serde(default)]
    pub phone: String,
    pub position: Option<Position>,
    pub location: String,
    pub cover_letter: String,
    pub experience: String,
}

/// Anything that flattens into a key/value payload
pub trait FormPayload {
    fn kind(&self) -> FormKind;

    /// Flat string map posted as JSON
    fn payload(&self) -> Map<String, Value>;
}

impl FormPayload for InquiryForm {
    fn kind(&self) -> FormKind {
        FormKind::Inquiry
    }

    fn payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("email".into(), Value::String(self.email.clone()));
        // An empty optional field is still submitted, as a browser form would
        map.insert(
            "company".into(),
            Value::String(self.company.clone().unwrap_or_default()),
        );
        map.insert("message".into(), Value::String(self.message.clone()));
        map
    }
}

impl FormPayload for ApplicationForm {
    fn kind(&self) -> FormKind {
        FormKind::Application
    }

    fn payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("email".into(), Value::String(self.email.clone()));
        map.insert("phone".into(), Value::String(self.phone.clone()));
        map.insert(
            "position".into(),
            Value::String(self.position.map(|p| p.label().to_string()).unwrap_or_default()),
        );
        map.insert("location".into(), Value::String(self.location.clone()));
        map.insert("coverLetter".into(), Value::String(self.cover_letter.clone()));
        map.insert("experience".into(), Value::String(self.experience.clone()));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_payload_is_flat() {
        let form = ApplicationForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "+1 (234) - 567 - 8901".into(),
            position: Some(Position::AccountManager),
            location: "Boston, MA".into(),
            cover_letter: "Hello".into(),
            experience: "Plenty".into(),
        };
        let payload = form.payload();
        assert_eq!(payload.len(), 7);
        assert_eq!(payload["coverLetter"], "Hello");
        assert_eq!(payload["position"], Position::AccountManager.label());
        assert!(payload.values().all(|v| v.is_string()));
    }

    #[test]
    fn test_inquiry_payload_includes_empty_company() {
        let form = InquiryForm {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            company: None,
            message: "Website please".into(),
        };
        assert_eq!(form.payload()["company"], "");
        assert_eq!(form.kind(), FormKind::Inquiry);
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("marketing".parse::<Position>().unwrap(), Position::DigitalMarketing);
        assert_eq!("1".parse::<Position>().unwrap(), Position::ClientOutreach);
        assert_eq!(
            Position::AccountManager.label().parse::<Position>().unwrap(),
            Position::AccountManager
        );
        assert!("janitor".parse::<Position>().is_err());
    }
}
