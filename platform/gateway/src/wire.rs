//! Response shapes as the backend sends them, and their conversion into the
//! canonical records of the `entity` crate.

use entity::{Address, CityStatistic, DuplicateGroup, Employee};
use serde::{Deserialize, Serialize};

/// Employee lists arrive either bare or wrapped under `employees`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EmployeeList {
    Bare(Vec<Employee>),
    Wrapped { employees: Vec<Employee> },
}

impl From<EmployeeList> for Vec<Employee> {
    fn from(value: EmployeeList) -> Self {
        match value {
            EmployeeList::Bare(list) | EmployeeList::Wrapped { employees: list } => list,
        }
    }
}

/// `POST /employees` answers with an acknowledgement or the stored document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Created {
    Ack { id: String },
    Document(Employee),
}

/// Map-reduce style row: `{"_id": key, "value": {...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Keyed<T> {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CityStatValue {
    count: f64,
    sum: f64,
    avg: f64,
    min: f64,
    max: f64,
    variance: f64,
    std_dev: f64,
    senior_ratio: f64,
    junior_ratio: f64,
}

impl From<Keyed<CityStatValue>> for CityStatistic {
    fn from(row: Keyed<CityStatValue>) -> Self {
        let v = row.value;
        Self {
            city: row.key,
            count: v.count.max(0.0) as u64,
            sum: v.sum,
            avg: v.avg,
            min: v.min,
            max: v.max,
            variance: v.variance,
            std_dev: v.std_dev,
            senior_ratio: v.senior_ratio,
            junior_ratio: v.junior_ratio,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DuplicateValue {
    ids: Vec<String>,
    noms: Vec<Option<String>>,
    prenoms: Vec<Option<String>>,
    adresses: Vec<Option<Address>>,
    count: f64,
    adresses_differentes: bool,
}

impl From<Keyed<DuplicateValue>> for DuplicateGroup {
    fn from(row: Keyed<DuplicateValue>) -> Self {
        let v = row.value;
        let count = if v.count > 0.0 {
            v.count as usize
        } else {
            v.ids.len()
        };
        Self {
            key: row.key,
            ids: v.ids,
            last_names: v.noms.into_iter().map(Option::unwrap_or_default).collect(),
            first_names: v.prenoms.into_iter().map(Option::unwrap_or_default).collect(),
            addresses: v.adresses,
            count,
            addresses_differ: v.adresses_differentes,
        }
    }
}

/// Answer to update and delete calls.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct MutationAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "modified", alias = "deleted")]
    pub changed: Option<bool>,
}

/// Payload of the backend root.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl HealthStatus {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

/// Employees of one city, as grouped by the backend.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CityGroup {
    #[serde(rename(deserialize = "_id"))]
    pub city: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Count {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `{"error": "..."}` message of a failed call, if the body has one.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
}
