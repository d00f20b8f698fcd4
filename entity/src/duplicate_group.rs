use serde::{Deserialize, Serialize};

use crate::employee::Address;

/// Employees sharing a normalized `(last, first)` name.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DuplicateGroup {
    /// Normalized `last_first` key.
    pub key: String,
    pub ids: Vec<String>,
    pub last_names: Vec<String>,
    pub first_names: Vec<String>,
    pub addresses: Vec<Option<Address>>,
    pub count: usize,
    #[serde(rename = "adresses_differentes")]
    pub addresses_differ: bool,
}

impl DuplicateGroup {
    /// Display name taken from the first member.
    pub fn display_name(&self) -> String {
        match (self.last_names.first(), self.first_names.first()) {
            (Some(last), Some(first)) => format!("{last} {first}"),
            (Some(last), None) => last.clone(),
            (None, Some(first)) => first.clone(),
            (None, None) => self.key.clone(),
        }
    }
}
