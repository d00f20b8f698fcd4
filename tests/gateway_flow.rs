use anyhow::Result;
use entity::{Address, EmployeeDraft};
use platform_gateway::{EmployeeGateway, GatewayError, NamePosition};
use platform_settings::{ConfigSources, UrlSource};
use serde_json::json;
use staffboard_tests::{ListShape, MockBackend, employee_doc};

fn sample() -> Vec<serde_json::Value> {
    vec![
        employee_doc("1", "Martin", "Jean", 12.0, 1500.0, "Paris"),
        employee_doc("2", "Durand", "Marie", 3.0, 0.0, "Bordeaux"),
        employee_doc("3", "Petit", "Marc", 7.0, 800.0, "Paris"),
    ]
}

#[tokio::test]
async fn bare_and_wrapped_lists_yield_the_same_employees() -> Result<()> {
    let bare = MockBackend::start(sample()).await?;
    let wrapped = MockBackend::builder(sample())
        .shape(ListShape::Wrapped)
        .start()
        .await?;

    let from_bare = EmployeeGateway::new(Some(bare.api_url()))?
        .list_employees()
        .await?;
    let from_wrapped = EmployeeGateway::new(Some(wrapped.api_url()))?
        .list_employees()
        .await?;

    assert_eq!(from_bare.len(), 3);
    assert_eq!(from_bare, from_wrapped);
    assert_eq!(from_bare[0].city(), Some("Paris"));
    Ok(())
}

#[tokio::test]
async fn create_update_delete_round() -> Result<()> {
    let backend = MockBackend::start(Vec::new()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let draft = EmployeeDraft {
        last_name: "Leroy".into(),
        first_name: "Paul".into(),
        seniority: Some(2.0),
        bonus: None,
        address: Some(Address {
            city: Some("Lyon".into()),
            ..Address::default()
        }),
    };
    let created = gateway.create_employee(&draft).await?;
    assert_eq!(created.id, "emp-1");
    assert_eq!(created.last_name, "Leroy");
    assert_eq!(gateway.count_employees().await?, 1);

    let mut changed = EmployeeDraft::from(&created);
    changed.seniority = Some(3.0);
    let ack = gateway.update_employee(&created.id, &changed).await?;
    assert_eq!(ack.changed, Some(true));
    assert_eq!(backend.stored()[0]["anciennete"], json!(3.0));

    let ack = gateway.delete_employee(&created.id).await?;
    assert_eq!(ack.changed, Some(true));
    assert!(backend.stored().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_identifiers_report_not_found() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;
    let draft = EmployeeDraft {
        last_name: "Martin".into(),
        first_name: "Jean".into(),
        ..EmployeeDraft::default()
    };

    let err = gateway.update_employee("missing", &draft).await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(ref msg) if msg == "Employee not found"));
    assert_eq!(err.code(), "NOT_FOUND");

    let err = gateway.delete_employee("missing").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
    assert_eq!(backend.stored().len(), 3);
    Ok(())
}

#[tokio::test]
async fn analytics_rows_are_mapped() -> Result<()> {
    let backend = MockBackend::builder(sample())
        .city_stats(json!([
            {"_id": "Paris", "value": {"count": 2, "sum": 19, "avg": 9.5, "min": 7, "max": 12,
                                       "variance": 6.25, "std_dev": 2.5,
                                       "senior_ratio": 1.0, "junior_ratio": 0.0}}
        ]))
        .duplicates(json!([
            {"_id": "martin_jean", "value": {"ids": ["1", "9"], "noms": ["Martin", "MARTIN"],
                                             "prenoms": ["Jean", "jean"],
                                             "adresses": [null, {"ville": "Paris"}],
                                             "count": 2, "adresses_differentes": true}}
        ]))
        .start()
        .await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let stats = gateway.city_statistics().await?;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].city, "Paris");
    assert_eq!(stats[0].count, 2);
    assert_eq!(stats[0].std_dev, 2.5);

    let groups = gateway.duplicate_groups().await?;
    assert_eq!(groups[0].key, "martin_jean");
    assert_eq!(groups[0].count, 2);
    assert!(groups[0].addresses_differ);
    Ok(())
}

#[tokio::test]
async fn health_reads_the_root() -> Result<()> {
    let backend = MockBackend::start(Vec::new()).await?;
    let status = EmployeeGateway::new(Some(backend.api_url()))?
        .health_check()
        .await?;
    assert!(status.is_active());
    assert_eq!(status.message.as_deref(), Some("API is running"));
    Ok(())
}

#[tokio::test]
async fn search_sends_name_and_cities() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let hits = gateway
        .search("Ma", &["Paris".to_string(), "Bordeaux".to_string()])
        .await?;
    let mut ids = hits.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
    ids.sort_unstable();
    assert_eq!(ids, vec!["2", "3"]);
    Ok(())
}

#[tokio::test]
async fn runtime_config_file_points_the_gateway() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        json!({ "VITE_API_URL": backend.api_url().as_str() }).to_string(),
    )?;

    let resolved = ConfigSources::new(None, Some(path.display().to_string()))
        .resolve()
        .await?;
    assert_eq!(resolved.source, Some(UrlSource::RuntimeConfig));

    let employees = EmployeeGateway::new(resolved.base_url)?
        .list_employees()
        .await?;
    assert_eq!(employees.len(), 3);
    Ok(())
}

fn sorted_ids(employees: &[entity::Employee]) -> Vec<&str> {
    let mut ids = employees.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn get_employee_reads_one_record() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let employee = gateway.get_employee("2").await?;
    assert_eq!(employee.full_name(), "Durand Marie");
    assert_eq!(employee.seniority_years(), 3.0);

    let err = gateway.get_employee("missing").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn wrong_base_path_is_a_status_error() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let mut url = backend.api_url();
    url.set_path("/v2/api");
    let err = EmployeeGateway::new(Some(url))?
        .list_employees()
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Status { status: 404, .. }), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn first_name_position_is_forwarded() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let start = gateway.find_by_first_name("Ma", NamePosition::Start).await?;
    assert_eq!(sorted_ids(&start), vec!["2", "3"]);
    let end = gateway.find_by_first_name("rc", NamePosition::End).await?;
    assert_eq!(sorted_ids(&end), vec!["3"]);
    let any = gateway.find_by_first_name("ea", NamePosition::Any).await?;
    assert_eq!(sorted_ids(&any), vec!["1"]);
    Ok(())
}

#[tokio::test]
async fn name_length_filters_on_prefix_and_length() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let hits = gateway.find_by_name_length("Ma", 4).await?;
    assert_eq!(sorted_ids(&hits), vec!["3"]);
    assert!(gateway.find_by_name_length("Ma", 9).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn seniority_above_is_strict() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    assert_eq!(sorted_ids(&gateway.seniority_above(7).await?), vec!["1"]);
    assert_eq!(sorted_ids(&gateway.seniority_above(2).await?), vec!["1", "2", "3"]);
    Ok(())
}

#[tokio::test]
async fn with_street_skips_records_without_one() -> Result<()> {
    let mut docs = sample();
    docs.push(json!({"_id": "4", "nom": "Blanc", "prenom": "Eve", "adresse": {"ville": "Nice"}}));
    docs.push(json!({"_id": "5", "nom": "Noir", "prenom": "Ugo"}));
    let backend = MockBackend::builder(docs)
        .shape(ListShape::Wrapped)
        .start()
        .await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    assert_eq!(sorted_ids(&gateway.with_street().await?), vec!["1", "2", "3"]);
    Ok(())
}

#[tokio::test]
async fn oldest_returns_most_senior_first() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let oldest = gateway.oldest(2).await?;
    let ids = oldest.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "3"]);
    Ok(())
}

#[tokio::test]
async fn city_groups_decode_the_grouped_shape() -> Result<()> {
    let backend = MockBackend::start(sample()).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let groups = gateway.employees_in_city("Paris").await?;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].city, "Paris");
    assert_eq!(groups[0].count, 2);
    assert_eq!(sorted_ids(&groups[0].employees), vec!["1", "3"]);

    assert!(gateway.employees_in_city("Brest").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn increment_bonus_reports_the_backend_message() -> Result<()> {
    let mut docs = sample();
    docs.push(json!({"_id": "4", "nom": "Blanc", "prenom": "Eve"}));
    let backend = MockBackend::start(docs).await?;
    let gateway = EmployeeGateway::new(Some(backend.api_url()))?;

    let message = gateway.increment_bonus(200.0).await?;
    assert_eq!(message, "3 employees updated");
    let stored = backend.stored();
    assert_eq!(stored[0]["prime"], json!(1700.0));
    assert!(stored[3].get("prime").is_none());
    Ok(())
}
