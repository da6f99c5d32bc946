//! Shared helpers for the wiremock-backed tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use dme_sync_provider::{
    CaaValue, DnsMadeEasyProvider, MxValue, Record, RecordData, SrvValue, Zone,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "api";
pub const SECRET_KEY: &str = "secret";
pub const DOMAIN_ID: u64 = 123_123;

/// Asserts that an `Option` is `Some` and unwraps it.
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Asserts that a `Result` is `Ok` and unwraps it.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Reads `tests/fixtures/<name>`.
pub fn fixture(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

/// Strict provider pointed at the mock server.
pub fn provider(server: &MockServer) -> DnsMadeEasyProvider {
    provider_with(server, |b| b)
}

/// Provider pointed at the mock server, with extra builder settings.
pub fn provider_with(
    server: &MockServer,
    configure: impl FnOnce(
        dme_sync_provider::DnsMadeEasyProviderBuilder,
    ) -> dme_sync_provider::DnsMadeEasyProviderBuilder,
) -> DnsMadeEasyProvider {
    let builder = DnsMadeEasyProvider::builder(
        "test".to_string(),
        API_KEY.to_string(),
        SECRET_KEY.to_string(),
    )
    .base_url(server.uri())
    .ratelimit_delay(Duration::ZERO);
    configure(builder).build().expect("provider builds")
}

/// Serves `body` for `GET <route>`.
pub async fn mount_get(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves the one-domain account listing.
pub async fn mount_domains(server: &MockServer) {
    mount_get(server, "/", fixture("dnsmadeeasy-domains.json")).await;
}

/// Serves a record listing for the `unit.tests` domain.
pub async fn mount_records(server: &MockServer, body: String) {
    mount_get(server, &format!("/{DOMAIN_ID}/records"), body).await;
}

/// Serves `GET /id/unit.tests` as an existing domain.
pub async fn mount_domain_lookup(server: &MockServer) {
    mount_get(server, "/id/unit.tests", fixture("dnsmadeeasy-domain-create.json")).await;
}

/// Accepts every bulk create and delete.
pub async fn mount_writes(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{DOMAIN_ID}/records/createMulti")))
        .respond_with(ResponseTemplate::new(201).set_body_string("[]"))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/{DOMAIN_ID}/records")))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Listing body with the given `(id, name, value, ttl)` A rows.
pub fn a_rows(rows: &[(u64, &str, &str, u32)]) -> String {
    let data: Vec<serde_json::Value> = rows
        .iter()
        .map(|(id, name, value, ttl)| {
            serde_json::json!({
                "id": id,
                "name": name,
                "type": "A",
                "value": value,
                "ttl": ttl,
            })
        })
        .collect();
    serde_json::json!({ "data": data }).to_string()
}

/// Requests the mock server received, as `(method, path, query)`.
pub async fn request_lines(server: &MockServer) -> Vec<(String, String, Option<String>)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| {
            (
                r.method.to_string(),
                r.url.path().to_string(),
                r.url.query().map(str::to_string),
            )
        })
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// The zone described by `dnsmadeeasy-records.json`.
pub fn expected_zone() -> Zone {
    let mut zone = Zone::new("unit.tests.").expect("valid zone name");
    let records = [
        Record::new("", 300, RecordData::A(strings(&["1.2.3.4", "1.2.3.5"]))),
        Record::new("", 1800, RecordData::Alias("aname.unit.tests.".to_string())),
        Record::new(
            "",
            3600,
            RecordData::Caa(vec![CaaValue {
                flags: 0,
                tag: "issue".to_string(),
                value: "ca.unit.tests".to_string(),
            }]),
        ),
        Record::new(
            "_srv._tcp",
            600,
            RecordData::Srv(vec![
                SrvValue {
                    priority: 10,
                    weight: 20,
                    port: 30,
                    target: "foo-1.unit.tests.".to_string(),
                },
                SrvValue {
                    priority: 12,
                    weight: 20,
                    port: 30,
                    target: "foo-2.unit.tests.".to_string(),
                },
            ]),
        ),
        Record::new(
            "aaaa",
            600,
            RecordData::Aaaa(strings(&["2601:644:500:e210:62f8:1dff:feb8:947a"])),
        ),
        Record::new("cname", 300, RecordData::Cname("unit.tests.".to_string())),
        Record::new("included", 3600, RecordData::Cname("unit.tests.".to_string())),
        Record::new(
            "mx",
            300,
            RecordData::Mx(
                [
                    (10, "smtp-4.unit.tests."),
                    (20, "smtp-2.unit.tests."),
                    (30, "smtp-3.unit.tests."),
                    (40, "smtp-1.unit.tests."),
                ]
                .iter()
                .map(|(preference, exchange)| MxValue {
                    preference: *preference,
                    exchange: (*exchange).to_string(),
                })
                .collect(),
            ),
        ),
        Record::new("ptr", 300, RecordData::Ptr("foo.bar.com.".to_string())),
        Record::new(
            "split",
            600,
            RecordData::Txt(strings(&[
                "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nunc porttitor, odio eleifend ullamcorper ultricies.",
            ])),
        ),
        Record::new(
            "txt",
            600,
            RecordData::Txt(strings(&[
                "Bah bah black sheep",
                "have you any wool.",
                "v=DKIM1\\;k=rsa\\;s=email\\;h=sha256\\;p=A/kinda+of/long/string+with+numb3rs",
            ])),
        ),
        Record::new(
            "under",
            3600,
            RecordData::Ns(strings(&["ns1.unit.tests.", "ns2.unit.tests."])),
        ),
        Record::new("www", 300, RecordData::A(strings(&["2.2.3.6"]))),
        Record::new("www.sub", 300, RecordData::A(strings(&["2.2.3.6"]))),
    ];
    for record in records {
        zone.add_record(record, false, false)
            .expect("expected zone record is valid");
    }
    zone
}
