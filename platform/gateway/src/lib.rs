//! HTTP gateway to the employee backend.
//!
//! Every operation checks the base URL first and fails with
//! [`GatewayError::Configuration`] before any request is built when none was
//! resolved. Validation of required employee fields also happens before I/O.

mod error;
mod wire;

pub use error::{GatewayError, GatewayResult};
pub use wire::{CityGroup, HealthStatus, MutationAck};

use std::time::Duration;

use entity::{CityStatistic, DuplicateGroup, Employee, EmployeeDraft};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::wire::{
    CityStatValue, Count, Created, DuplicateValue, EmployeeList, Keyed, Message, error_message,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a first-name pattern must match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NamePosition {
    #[default]
    Start,
    End,
    Any,
}

impl NamePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamePosition::Start => "start",
            NamePosition::End => "end",
            NamePosition::Any => "any",
        }
    }
}

/// Client for the backend REST API rooted at `base_url` (e.g.
/// `http://localhost:5000/api`).
#[derive(Clone, Debug)]
pub struct EmployeeGateway {
    client: Client,
    base_url: Option<Url>,
}

impl EmployeeGateway {
    pub fn new(base_url: Option<Url>) -> GatewayResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    #[instrument(name = "gateway.list_employees", skip_all)]
    pub async fn list_employees(&self) -> GatewayResult<Vec<Employee>> {
        self.fetch_employees(self.endpoint(&["employees"])?).await
    }

    #[instrument(name = "gateway.get_employee", skip(self))]
    pub async fn get_employee(&self, id: &str) -> GatewayResult<Employee> {
        let url = self.endpoint(&["employees", require_id(id)?])?;
        self.send_to_record(self.client.get(url), "employee").await
    }

    #[instrument(name = "gateway.create_employee", skip_all)]
    pub async fn create_employee(&self, draft: &EmployeeDraft) -> GatewayResult<Employee> {
        validate(draft)?;
        let url = self.endpoint(&["employees"])?;
        let created: Created = self
            .send(self.client.post(url).json(draft), "created employee")
            .await?;
        match created {
            Created::Ack { id } => Ok(Employee::from_draft(id, draft.clone())),
            Created::Document(employee) if !employee.id.is_empty() => Ok(employee),
            Created::Document(_) => Err(GatewayError::Decode {
                what: "created employee",
                message: "response carries no identifier".into(),
            }),
        }
    }

    #[instrument(name = "gateway.update_employee", skip(self, draft))]
    pub async fn update_employee(
        &self,
        id: &str,
        draft: &EmployeeDraft,
    ) -> GatewayResult<MutationAck> {
        let id = require_id(id)?;
        validate(draft)?;
        let url = self.endpoint(&["employees", id])?;
        self.send_to_record(self.client.put(url).json(draft), "update")
            .await
    }

    #[instrument(name = "gateway.delete_employee", skip(self))]
    pub async fn delete_employee(&self, id: &str) -> GatewayResult<MutationAck> {
        let url = self.endpoint(&["employees", require_id(id)?])?;
        self.send_to_record(self.client.delete(url), "delete").await
    }

    #[instrument(name = "gateway.city_statistics", skip_all)]
    pub async fn city_statistics(&self) -> GatewayResult<Vec<CityStatistic>> {
        let url = self.endpoint(&["analytics", "ville-stats"])?;
        let rows: Vec<Keyed<CityStatValue>> =
            self.send(self.client.get(url), "city statistics").await?;
        Ok(rows.into_iter().map(CityStatistic::from).collect())
    }

    #[instrument(name = "gateway.duplicate_groups", skip_all)]
    pub async fn duplicate_groups(&self) -> GatewayResult<Vec<DuplicateGroup>> {
        let url = self.endpoint(&["analytics", "doublons"])?;
        let rows: Vec<Keyed<DuplicateValue>> =
            self.send(self.client.get(url), "duplicate groups").await?;
        Ok(rows.into_iter().map(DuplicateGroup::from).collect())
    }

    /// Liveness check against the backend root, outside the `/api` prefix.
    #[instrument(name = "gateway.health_check", skip_all)]
    pub async fn health_check(&self) -> GatewayResult<HealthStatus> {
        let url = self.root()?;
        self.send(self.client.get(url), "health").await
    }

    #[instrument(name = "gateway.count_employees", skip_all)]
    pub async fn count_employees(&self) -> GatewayResult<u64> {
        let url = self.endpoint(&["employees", "count"])?;
        let count: Count = self.send(self.client.get(url), "count").await?;
        Ok(count.count)
    }

    #[instrument(name = "gateway.collections", skip_all)]
    pub async fn collections(&self) -> GatewayResult<Vec<String>> {
        let url = self.endpoint(&["collections"])?;
        self.send(self.client.get(url), "collections").await
    }

    #[instrument(name = "gateway.find_by_first_name", skip(self))]
    pub async fn find_by_first_name(
        &self,
        pattern: &str,
        position: NamePosition,
    ) -> GatewayResult<Vec<Employee>> {
        let mut url = self.endpoint(&["employees", "name", pattern])?;
        url.query_pairs_mut()
            .append_pair("position", position.as_str());
        self.fetch_employees(url).await
    }

    #[instrument(name = "gateway.find_by_name_length", skip(self))]
    pub async fn find_by_name_length(
        &self,
        pattern: &str,
        length: usize,
    ) -> GatewayResult<Vec<Employee>> {
        let length = length.to_string();
        let url = self.endpoint(&["employees", "name-length", pattern, &length])?;
        self.fetch_employees(url).await
    }

    #[instrument(name = "gateway.seniority_above", skip(self))]
    pub async fn seniority_above(&self, years: u32) -> GatewayResult<Vec<Employee>> {
        let years = years.to_string();
        let url = self.endpoint(&["employees", "seniority", &years])?;
        self.fetch_employees(url).await
    }

    #[instrument(name = "gateway.with_street", skip_all)]
    pub async fn with_street(&self) -> GatewayResult<Vec<Employee>> {
        self.fetch_employees(self.endpoint(&["employees", "with-street"])?)
            .await
    }

    #[instrument(name = "gateway.oldest", skip(self))]
    pub async fn oldest(&self, limit: u32) -> GatewayResult<Vec<Employee>> {
        let limit = limit.to_string();
        let url = self.endpoint(&["employees", "oldest", &limit])?;
        self.fetch_employees(url).await
    }

    #[instrument(name = "gateway.employees_in_city", skip(self))]
    pub async fn employees_in_city(&self, city: &str) -> GatewayResult<Vec<CityGroup>> {
        let url = self.endpoint(&["employees", "city", city])?;
        self.send(self.client.get(url), "city group").await
    }

    #[instrument(name = "gateway.search", skip(self))]
    pub async fn search(
        &self,
        name_pattern: &str,
        cities: &[String],
    ) -> GatewayResult<Vec<Employee>> {
        let mut url = self.endpoint(&["employees", "search"])?;
        url.query_pairs_mut()
            .append_pair("name", name_pattern)
            .append_pair("cities", &cities.join(","));
        self.fetch_employees(url).await
    }

    /// Adds `amount` to every employee that already has a bonus.
    #[instrument(name = "gateway.increment_bonus", skip(self))]
    pub async fn increment_bonus(&self, amount: f64) -> GatewayResult<String> {
        let url = self.endpoint(&["employees", "increment-prime"])?;
        let body = serde_json::json!({ "amount": amount });
        let reply: Message = self
            .send(self.client.post(url).json(&body), "bonus increment")
            .await?;
        Ok(reply.message)
    }

    fn configured_base(&self) -> GatewayResult<&Url> {
        self.base_url
            .as_ref()
            .ok_or_else(GatewayError::missing_base_url)
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let base = self.configured_base()?;
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::Configuration(format!("backend url {base} cannot carry a path"))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Backend root: the base URL without a trailing `api` segment.
    fn root(&self) -> GatewayResult<Url> {
        let base = self.configured_base()?;
        let mut segments = base
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();
        if segments.last() == Some(&"api") {
            segments.pop();
        }
        let mut root = base.clone();
        let path = if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", segments.join("/"))
        };
        root.set_path(&path);
        root.set_query(None);
        Ok(root)
    }

    async fn fetch_employees(&self, url: Url) -> GatewayResult<Vec<Employee>> {
        let list: EmployeeList = self.send(self.client.get(url), "employee list").await?;
        let employees = Vec::from(list);
        debug!(count = employees.len(), "employees fetched");
        Ok(employees)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &'static str,
    ) -> GatewayResult<T> {
        self.exchange(request, what, Target::Route).await
    }

    /// Like [`Self::send`], but a 404 means the identified employee is gone.
    async fn send_to_record<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &'static str,
    ) -> GatewayResult<T> {
        self.exchange(request, what, Target::Record).await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &'static str,
        target: Target,
    ) -> GatewayResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "backend answered");

        if status == StatusCode::NOT_FOUND && target == Target::Record {
            let message = error_message(&body).unwrap_or_else(|| format!("{what} at {url}"));
            return Err(GatewayError::NotFound(message));
        }
        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(|reason| format!("{reason} ({url})")))
                .unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&body).map_err(|err| GatewayError::Decode {
            what,
            message: err.to_string(),
        })
    }
}

/// What a request addresses; only a missing record is a `NotFound`, a missing
/// route points at a wrong base URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Record,
    Route,
}

fn require_id(id: &str) -> GatewayResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(GatewayError::Validation("employee identifier is empty".into()));
    }
    Ok(id)
}

fn validate(draft: &EmployeeDraft) -> GatewayResult<()> {
    let missing = draft.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> EmployeeGateway {
        EmployeeGateway::new(Some(Url::parse(base).unwrap())).unwrap()
    }

    fn named(last: &str, first: &str) -> EmployeeDraft {
        EmployeeDraft {
            last_name: last.into(),
            first_name: first.into(),
            ..EmployeeDraft::default()
        }
    }

    #[tokio::test]
    async fn unconfigured_gateway_fails_fast() {
        let gw = EmployeeGateway::new(None).unwrap();
        assert!(matches!(
            gw.list_employees().await,
            Err(GatewayError::Configuration(_))
        ));
        assert!(matches!(
            gw.health_check().await,
            Err(GatewayError::Configuration(_))
        ));
        assert!(matches!(
            gw.delete_employee("abc").await,
            Err(GatewayError::Configuration(_))
        ));
        assert!(matches!(
            gw.city_statistics().await,
            Err(GatewayError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn validation_happens_before_any_request() {
        // Port 9 (discard) is not expected to answer; validation must win.
        let gw = gateway("http://127.0.0.1:9/api");
        let err = gw.create_employee(&named("", "Jean")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(ref msg) if msg.contains("nom")));

        let err = gw
            .update_employee("  ", &named("Martin", "Jean"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn endpoints_extend_the_base_path() {
        let gw = gateway("http://localhost:5000/api/");
        let url = gw.endpoint(&["employees", "name", "Jean Luc"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/employees/name/Jean%20Luc");

        let gw = gateway("http://localhost:5000/api");
        let url = gw.endpoint(&["analytics", "ville-stats"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/analytics/ville-stats");
    }

    #[test]
    fn root_drops_the_api_prefix() {
        assert_eq!(
            gateway("http://localhost:5000/api").root().unwrap().as_str(),
            "http://localhost:5000/"
        );
        assert_eq!(
            gateway("https://hr.example.com/backend/api/").root().unwrap().as_str(),
            "https://hr.example.com/backend/"
        );
        assert_eq!(
            gateway("http://localhost:5000").root().unwrap().as_str(),
            "http://localhost:5000/"
        );
    }
}
