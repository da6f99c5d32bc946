//! DNS Made Easy provider tests against a local mock API
//!
//! Run with:
//! ```bash
//! cargo test -p dme-sync-provider --test dnsmadeeasy_test
//! ```

mod common;

use std::time::{Duration, Instant};

use common::{
    DOMAIN_ID, a_rows, expected_zone, fixture, mount_domain_lookup, mount_domains, mount_get,
    mount_records, mount_writes, provider, provider_with, request_lines,
};
use dme_sync_provider::{
    DnsMadeEasyConfig, DnsProvider, DomainInfo, DomainLookup, ProviderError, Record, RecordData,
    SrvValue, Zone, create_provider,
};
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha1::Sha1;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn a_record(name: &str, ttl: u32, value: &str) -> Record {
    Record::new(name, ttl, RecordData::A(vec![value.to_string()]))
}

fn zone_with(records: Vec<Record>) -> Zone {
    let mut zone = Zone::new("unit.tests.").unwrap();
    for record in records {
        zone.add_record(record, false, false).unwrap();
    }
    zone
}

async fn requests_matching(server: &MockServer, verb: &str, route: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == route)
        .collect()
}

async fn populate_error(status: u16, body: &str) -> ProviderError {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    let mut zone = Zone::new("unit.tests.").unwrap();
    provider(&server)
        .populate(&mut zone, false)
        .await
        .unwrap_err()
}

// ============ Error mapping ============

#[tokio::test]
async fn test_populate_not_found() {
    let err = populate_error(404, r#"{"error": ["Not Found"]}"#).await;
    assert_eq!(
        err,
        ProviderError::NotFound {
            provider: "dnsmadeeasy".to_string(),
            resource: "/".to_string(),
        }
    );
}

#[tokio::test]
async fn test_populate_unauthorized() {
    let err = populate_error(401, r#"{"error": ["API key not found"]}"#).await;
    assert_eq!(
        err,
        ProviderError::Unauthorized {
            provider: "dnsmadeeasy".to_string(),
            raw_message: Some("API key not found".to_string()),
        }
    );
}

#[tokio::test]
async fn test_populate_bad_request() {
    let err = populate_error(400, r#"{"error": ["Rate limit exceeded"]}"#).await;
    assert_eq!(
        err,
        ProviderError::BadRequest {
            provider: "dnsmadeeasy".to_string(),
            messages: vec!["Rate limit exceeded".to_string()],
        }
    );
}

#[tokio::test]
async fn test_populate_server_error() {
    let err = populate_error(502, "Things caught fire").await;
    assert_eq!(
        err,
        ProviderError::Http {
            provider: "dnsmadeeasy".to_string(),
            status: 502,
            body: "Things caught fire".to_string(),
        }
    );
}

// ============ Populate ============

#[tokio::test]
async fn test_populate_matches_expected_zone() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_records(&server, fixture("dnsmadeeasy-records.json")).await;
    let provider = provider(&server);

    let mut zone = Zone::new("unit.tests.").unwrap();
    let exists = require_ok!(provider.populate(&mut zone, false).await);
    assert!(exists);
    // The HTTPRED row is skipped.
    assert_eq!(zone.len(), 14);
    assert_eq!(zone, expected_zone());
    assert!(zone.changes(&expected_zone(), &provider).is_empty());

    // Second populate and a plan are served from the caches.
    let mut again = Zone::new("unit.tests.").unwrap();
    require_ok!(provider.populate(&mut again, false).await);
    assert_eq!(again.len(), 14);
    let plan = require_ok!(provider.plan(&expected_zone()).await);
    assert!(plan.is_none());

    let lines = request_lines(&server).await;
    assert_eq!(
        lines,
        vec![
            ("GET".to_string(), "/".to_string(), None),
            ("GET".to_string(), format!("/{DOMAIN_ID}/records"), None),
        ]
    );
}

#[tokio::test]
async fn test_populate_unknown_zone_is_empty() {
    let server = MockServer::start().await;
    mount_get(&server, "/", fixture("dnsmadeeasy-no-domains.json")).await;
    let provider = provider(&server);

    let mut zone = Zone::new("unit.tests.").unwrap();
    let exists = require_ok!(provider.populate(&mut zone, false).await);
    assert!(!exists);
    assert!(zone.is_empty());
    assert_eq!(request_lines(&server).await.len(), 1);
}

// ============ Apply ============

#[tokio::test]
async fn test_apply_creates_domain_and_records() {
    let server = MockServer::start().await;
    mount_get(&server, "/", fixture("dnsmadeeasy-no-domains.json")).await;
    Mock::given(method("GET"))
        .and(path("/id/unit.tests"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error": ["Not Found"]}"#))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(201).set_body_string(fixture("dnsmadeeasy-domain-create.json")),
        )
        .mount(&server)
        .await;
    mount_writes(&server).await;

    let provider = provider(&server);
    let desired = zone_with(vec![
        a_record("", 300, "1.2.3.4"),
        Record::new("", 1800, RecordData::Alias("aname.unit.tests.".to_string())),
    ]);

    let plan = require_some!(require_ok!(provider.plan(&desired).await));
    assert!(!plan.exists);
    assert_eq!(plan.counts().creates, 2);
    assert_eq!(require_ok!(provider.apply(&plan).await), 2);

    let lines = request_lines(&server).await;
    let calls: Vec<(&str, &str)> = lines
        .iter()
        .map(|(m, p, _)| (m.as_str(), p.as_str()))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("GET", "/"),
            ("GET", "/id/unit.tests"),
            ("POST", "/"),
            ("POST", "/123123/records/createMulti"),
        ]
    );

    let created = requests_matching(&server, "POST", "/").await;
    assert_eq!(
        created[0].body_json::<Value>().unwrap(),
        json!({"name": "unit.tests"})
    );

    let batches = requests_matching(&server, "POST", "/123123/records/createMulti").await;
    assert_eq!(
        batches[0].body_json::<Value>().unwrap(),
        json!([
            {"name": "", "type": "A", "value": "1.2.3.4", "ttl": 300, "gtdLocation": "DEFAULT"},
            {
                "name": "",
                "type": "ANAME",
                "value": "aname.unit.tests.",
                "ttl": 1800,
                "gtdLocation": "DEFAULT"
            }
        ])
    );
}

#[tokio::test]
async fn test_apply_update_and_delete() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_domain_lookup(&server).await;
    mount_records(
        &server,
        a_rows(&[
            (11_189_897, "www", "1.2.3.4", 300),
            (11_189_898, "www", "2.2.3.4", 300),
            (11_189_899, "ttl", "3.2.3.4", 600),
        ]),
    )
    .await;
    mount_writes(&server).await;

    let provider = provider(&server);
    let desired = zone_with(vec![a_record("ttl", 300, "3.2.3.4")]);

    let plan = require_some!(require_ok!(provider.plan(&desired).await));
    assert!(plan.exists);
    assert_eq!(plan.changes.len(), 2);
    assert_eq!(plan.changes[0].kind(), "Update");
    assert_eq!(plan.changes[1].kind(), "Delete");
    assert_eq!(require_ok!(provider.apply(&plan).await), 2);

    let writes: Vec<(String, String, Option<String>)> = request_lines(&server)
        .await
        .into_iter()
        .filter(|(m, _, _)| m == "DELETE" || m == "POST")
        .collect();
    assert_eq!(
        writes,
        vec![
            (
                "DELETE".to_string(),
                "/123123/records".to_string(),
                Some("ids=11189899&ids=11189897&ids=11189898".to_string()),
            ),
            (
                "POST".to_string(),
                "/123123/records/createMulti".to_string(),
                None,
            ),
        ]
    );

    let batches = requests_matching(&server, "POST", "/123123/records/createMulti").await;
    assert_eq!(
        batches[0].body_json::<Value>().unwrap(),
        json!([{"name": "ttl", "type": "A", "value": "3.2.3.4", "ttl": 300, "gtdLocation": "DEFAULT"}])
    );

    // The listing cache was dropped, so the next read goes back to the API.
    let mut zone = Zone::new("unit.tests.").unwrap();
    require_ok!(provider.populate(&mut zone, false).await);
    assert_eq!(
        requests_matching(&server, "GET", "/123123/records").await.len(),
        2
    );
}

#[tokio::test]
async fn test_apply_delete_only() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_domain_lookup(&server).await;
    mount_records(&server, a_rows(&[(11_189_897, "www", "1.2.3.4", 300)])).await;
    mount_writes(&server).await;

    let provider = provider(&server);
    let plan = require_some!(require_ok!(
        provider.plan(&Zone::new("unit.tests.").unwrap()).await
    ));
    assert_eq!(plan.counts().deletes, 1);
    assert_eq!(require_ok!(provider.apply(&plan).await), 1);

    let deletes = requests_matching(&server, "DELETE", "/123123/records").await;
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].url.query(), Some("ids=11189897"));
    assert!(
        requests_matching(&server, "POST", "/123123/records/createMulti")
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_apply_batches_requests() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_domain_lookup(&server).await;
    mount_records(
        &server,
        a_rows(&[
            (11_189_897, "www", "1.2.3.4", 300),
            (11_189_898, "www", "2.2.3.4", 300),
            (11_189_899, "ttl", "3.2.3.4", 600),
        ]),
    )
    .await;
    mount_writes(&server).await;

    let provider = provider_with(&server, |b| b.batch_size(2).strict_supports(false));
    let desired = zone_with(
        (1..10)
            .map(|i| a_record(&format!("www{i}"), 300, &format!("3.2.3.{i}")))
            .collect(),
    );

    let plan = require_some!(require_ok!(provider.plan(&desired).await));
    assert_eq!(plan.changes.len(), 11);
    assert_eq!(require_ok!(provider.apply(&plan).await), 11);

    let deletes: Vec<Option<String>> = requests_matching(&server, "DELETE", "/123123/records")
        .await
        .iter()
        .map(|r| r.url.query().map(str::to_string))
        .collect();
    assert_eq!(
        deletes,
        vec![
            Some("ids=11189899&ids=11189897".to_string()),
            Some("ids=11189898".to_string()),
        ]
    );

    let batches: Vec<Vec<String>> =
        requests_matching(&server, "POST", "/123123/records/createMulti")
            .await
            .iter()
            .map(|r| {
                r.body_json::<Vec<Value>>()
                    .unwrap()
                    .iter()
                    .map(|row| row["name"].as_str().unwrap().to_string())
                    .collect()
            })
            .collect();
    assert_eq!(
        batches,
        vec![
            vec!["www1", "www2"],
            vec!["www3", "www4"],
            vec!["www5", "www6"],
            vec!["www7", "www8"],
            vec!["www9"],
        ]
    );

    // Deletes go out before any create.
    let lines = request_lines(&server).await;
    let last_delete = lines.iter().rposition(|(m, _, _)| m == "DELETE").unwrap();
    let first_create = lines.iter().position(|(m, _, _)| m == "POST").unwrap();
    assert!(last_delete < first_create);
}

#[tokio::test]
async fn test_apply_strips_txt_quotes_when_lenient() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_domain_lookup(&server).await;
    mount_records(&server, a_rows(&[])).await;
    mount_writes(&server).await;

    let desired = zone_with(vec![Record::new(
        "txt",
        42,
        RecordData::Txt(vec!["This has \"quote\" chars in it".to_string()]),
    )]);

    let strict = provider(&server);
    let err = strict.plan(&desired).await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::SupportsViolation {
            provider: "test".to_string(),
            message: "Quotes not supported in TXT values".to_string(),
        }
    );

    let lenient = provider_with(&server, |b| b.strict_supports(false));
    let plan = require_some!(require_ok!(lenient.plan(&desired).await));
    require_ok!(lenient.apply(&plan).await);

    let batches = requests_matching(&server, "POST", "/123123/records/createMulti").await;
    assert_eq!(
        batches[0].body_json::<Value>().unwrap(),
        json!([{
            "name": "txt",
            "type": "TXT",
            "value": "\"This has quote chars in it\"",
            "ttl": 42,
            "gtdLocation": "DEFAULT"
        }])
    );
}

#[tokio::test]
async fn test_null_srv_target_is_not_planned() {
    let server = MockServer::start().await;
    mount_get(&server, "/", fixture("dnsmadeeasy-no-domains.json")).await;

    let desired = zone_with(vec![Record::new(
        "_srv._tcp",
        600,
        RecordData::Srv(vec![SrvValue {
            priority: 0,
            weight: 0,
            port: 0,
            target: ".".to_string(),
        }]),
    )]);

    let plan = require_ok!(provider(&server).plan(&desired).await);
    assert!(plan.is_none());
}

#[tokio::test]
async fn test_null_srv_target_is_skipped_when_lenient() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_domain_lookup(&server).await;
    mount_records(&server, a_rows(&[])).await;
    mount_writes(&server).await;

    let desired = zone_with(vec![
        a_record("www", 300, "1.2.3.4"),
        Record::new(
            "_srv._tcp",
            600,
            RecordData::Srv(vec![SrvValue {
                priority: 0,
                weight: 0,
                port: 0,
                target: ".".to_string(),
            }]),
        ),
    ]);

    let provider = provider_with(&server, |b| b.strict_supports(false));
    let plan = require_some!(require_ok!(provider.plan(&desired).await));
    assert_eq!(plan.changes.len(), 1);
    assert_eq!(require_ok!(provider.apply(&plan).await), 1);

    let batches = requests_matching(&server, "POST", "/123123/records/createMulti").await;
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].body_json::<Value>().unwrap(),
        json!([{
            "name": "www",
            "type": "A",
            "value": "1.2.3.4",
            "ttl": 300,
            "gtdLocation": "DEFAULT"
        }])
    );
    assert!(requests_matching(&server, "DELETE", "/123123/records")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_null_srv_only_makes_no_writes_when_lenient() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_records(&server, a_rows(&[])).await;

    let desired = zone_with(vec![Record::new(
        "_srv._tcp",
        600,
        RecordData::Srv(vec![SrvValue {
            priority: 0,
            weight: 0,
            port: 0,
            target: ".".to_string(),
        }]),
    )]);

    let provider = provider_with(&server, |b| b.strict_supports(false));
    let plan = require_ok!(provider.plan(&desired).await);
    assert!(plan.is_none());

    let lines = request_lines(&server).await;
    assert!(lines.iter().all(|(m, _, _)| m == "GET"));
}

#[tokio::test]
async fn test_plan_keeps_remote_alias_below_apex() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_domain_lookup(&server).await;
    mount_records(
        &server,
        json!({"data": [
            {"id": 1, "name": "", "type": "A", "value": "1.2.3.4", "ttl": 300},
            {"id": 2, "name": "www", "type": "ANAME", "value": "aname.unit.tests.", "ttl": 300}
        ]})
        .to_string(),
    )
    .await;
    mount_writes(&server).await;

    let provider = provider(&server);
    let desired = zone_with(vec![a_record("", 300, "1.2.3.4")]);

    let plan = require_some!(require_ok!(provider.plan(&desired).await));
    let counts = plan.counts();
    assert_eq!((counts.creates, counts.updates, counts.deletes), (0, 0, 1));
    assert_eq!(require_ok!(provider.apply(&plan).await), 1);

    let deletes = requests_matching(&server, "DELETE", "/123123/records").await;
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].url.query(), Some("ids=2"));
    assert!(requests_matching(&server, "POST", "/123123/records/createMulti")
        .await
        .is_empty());
}

// ============ Client ============

#[tokio::test]
async fn test_requests_are_signed() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    let provider = provider(&server);

    let domains = require_ok!(provider.client().domains().await);
    assert_eq!(domains.get("unit.tests."), Some(&DOMAIN_ID));

    let requests = requests_matching(&server, "GET", "/").await;
    let headers = &requests[0].headers;
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    assert_eq!(header("x-dnsme-apikey"), common::API_KEY);
    assert!(header("user-agent").starts_with("dme-sync/"));

    let date = header("x-dnsme-requestdate");
    assert!(
        chrono::DateTime::parse_from_str(&date, "%a, %d %b %Y %H:%M:%S %z").is_ok(),
        "{date}"
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(common::SECRET_KEY.as_bytes()).unwrap();
    mac.update(date.as_bytes());
    assert_eq!(header("x-dnsme-hmac"), hex::encode(mac.finalize().into_bytes()));
}

#[tokio::test]
async fn test_domain_lookup() {
    let server = MockServer::start().await;
    mount_domain_lookup(&server).await;
    Mock::given(method("GET"))
        .and(path("/id/missing.tests"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let provider = provider(&server);

    assert_eq!(
        require_ok!(provider.client().domain("unit.tests").await),
        DomainLookup::Found(DomainInfo {
            id: Some(DOMAIN_ID),
            name: Some("unit.tests".to_string()),
        })
    );
    assert_eq!(
        require_ok!(provider.client().domain("missing.tests").await),
        DomainLookup::NotFound
    );
}

#[tokio::test]
async fn test_writes_to_unknown_zone_fail_without_request() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    let provider = provider(&server);

    let err = provider
        .client()
        .record_multi_delete("other.tests.", &[1])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ProviderError::NotFound {
            provider: "dnsmadeeasy".to_string(),
            resource: "other.tests.".to_string(),
        }
    );
    assert_eq!(request_lines(&server).await.len(), 1);
}

#[tokio::test]
async fn test_ratelimit_delay_after_success_only() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_records(&server, a_rows(&[])).await;

    let delay = Duration::from_millis(150);
    let provider = provider_with(&server, |b| b.ratelimit_delay(delay));
    let started = Instant::now();
    let mut zone = Zone::new("unit.tests.").unwrap();
    require_ok!(provider.populate(&mut zone, false).await);
    assert!(started.elapsed() >= delay * 2);

    let failing = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401))
        .mount(&failing)
        .await;
    let slow = provider_with(&failing, |b| b.ratelimit_delay(Duration::from_secs(30)));
    let started = Instant::now();
    let mut zone = Zone::new("unit.tests.").unwrap();
    assert!(slow.populate(&mut zone, false).await.is_err());
    assert!(started.elapsed() < Duration::from_secs(30));
}

// ============ Factory ============

#[tokio::test]
async fn test_create_provider_from_config() {
    let server = MockServer::start().await;
    mount_domains(&server).await;
    mount_records(&server, fixture("dnsmadeeasy-records.json")).await;

    let config: DnsMadeEasyConfig = serde_json::from_value(json!({
        "apiKey": common::API_KEY,
        "secretKey": common::SECRET_KEY,
        "baseUrl": server.uri(),
    }))
    .unwrap();
    let provider = create_provider("dme", &config).unwrap();
    assert_eq!(provider.id(), "dme");

    let mut zone = Zone::new("unit.tests.").unwrap();
    assert!(require_ok!(provider.populate(&mut zone, false).await));
    assert_eq!(zone.len(), 14);
}
