use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Employee document as stored by the backend.
///
/// Field names follow the backend collection (`nom`, `prenom`, ...); numeric
/// fields stay optional so a record round-trips without gaining zeros.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Employee {
    #[serde(rename = "_id", default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(rename = "nom", default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(rename = "prenom", default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(
        rename = "anciennete",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub seniority: Option<f64>,
    #[serde(
        rename = "prime",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub bonus: Option<f64>,
    #[serde(rename = "adresse", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Body of a create or update call: an employee without identifier.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EmployeeDraft {
    #[serde(rename = "nom", default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(rename = "prenom", default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(
        rename = "anciennete",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub seniority: Option<f64>,
    #[serde(
        rename = "prime",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub bonus: Option<f64>,
    #[serde(rename = "adresse", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Address {
    #[serde(rename = "numero", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<AddressValue>,
    #[serde(rename = "rue", default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(rename = "codepostal", default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<AddressValue>,
    #[serde(rename = "ville", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Street numbers and postal codes arrive either as JSON numbers or strings.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AddressValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for AddressValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressValue::Number(n) => match n.as_f64() {
                Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", v as i64),
                _ => write!(f, "{n}"),
            },
            AddressValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for AddressValue {
    fn from(value: u32) -> Self {
        AddressValue::Number(value.into())
    }
}

impl From<&str> for AddressValue {
    fn from(value: &str) -> Self {
        AddressValue::Text(value.to_string())
    }
}

impl Employee {
    pub fn from_draft(id: impl Into<String>, draft: EmployeeDraft) -> Self {
        Self {
            id: id.into(),
            last_name: draft.last_name,
            first_name: draft.first_name,
            seniority: draft.seniority,
            bonus: draft.bonus,
            address: draft.address,
        }
    }

    /// Seniority in years; missing or non-finite values count as zero.
    pub fn seniority_years(&self) -> f64 {
        finite_or_zero(self.seniority)
    }

    /// Bonus amount; missing or non-finite values count as zero.
    pub fn bonus_amount(&self) -> f64 {
        finite_or_zero(self.bonus)
    }

    /// City name when present and not blank.
    pub fn city(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|addr| addr.city.as_deref())
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
            .trim()
            .to_string()
    }
}

impl From<&Employee> for EmployeeDraft {
    fn from(value: &Employee) -> Self {
        Self {
            last_name: value.last_name.clone(),
            first_name: value.first_name.clone(),
            seniority: value.seniority,
            bonus: value.bonus,
            address: value.address.clone(),
        }
    }
}

impl EmployeeDraft {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.last_name.trim().is_empty() {
            missing.push("nom");
        }
        if self.first_name.trim().is_empty() {
            missing.push("prenom");
        }
        missing
    }
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.street.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let street = [
            self.number.as_ref().map(ToString::to_string),
            self.street.clone(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        let town = [
            self.postal_code.as_ref().map(ToString::to_string),
            self.city.clone(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        match (street.is_empty(), town.is_empty()) {
            (false, false) => write!(f, "{street}, {town}"),
            (false, true) => f.write_str(&street),
            (true, false) => f.write_str(&town),
            (true, true) => Ok(()),
        }
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Numeric fields arrive as numbers, numeric strings (`"7"`, `"7,5"`) or
/// null; anything else reads as absent instead of failing the record.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(raw) => raw.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
