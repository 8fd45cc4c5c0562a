//! Integration tests for the gateway client against a mock backend.
//!
//! These verify the wire conventions: query parameters for select/order and
//! row targeting, the representation-return preference on writes, the api-key
//! and service-role headers, and the storage/function surfaces.

use jobdesk::gateway::storage::BucketStore;
use jobdesk::gateway::{Collection, FunctionInvoker, Gateway, IdentityAdmin, ObjectStore};
use jobdesk::models::{BanDuration, JobCreate, JobType, MessageReadUpdate};
use jobdesk::Error;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer, service_role_key: Option<&str>) -> Gateway {
    Gateway::builder()
        .base_url(Url::parse(&server.uri()).unwrap())
        .api_key("anon-key".to_string())
        .maybe_service_role_key(service_role_key.map(str::to_string))
        .build()
}

fn job_json(id: Uuid, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "company": "Acme",
        "company_logo": null,
        "job_image": null,
        "location": "Remote",
        "job_type": "full-time",
        "category": "engineering",
        "description": "Build things",
        "requirements": "Rust",
        "salary_range": "competitive",
        "deadline": "2026-09-01T00:00:00Z",
        "is_active": true,
        "created_at": "2026-08-01T00:00:00Z",
        "updated_at": "2026-08-01T00:00:00Z",
    })
}

fn message_json(id: Uuid, is_read: bool) -> serde_json::Value {
    json!({
        "id": id,
        "full_name": "Jane Doe",
        "email": "jane@example.com",
        "subject": "Question",
        "message": "Is the position still open?",
        "message_type": "contact",
        "is_read": is_read,
        "created_at": "2026-08-01T00:00:00Z",
    })
}

#[test_log::test(tokio::test)]
async fn list_sends_select_order_and_api_key() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_json(id, "Backend Intern")])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = gateway(&server, None).jobs().list().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, id);
    assert_eq!(jobs[0].title, "Backend Intern");
    assert_eq!(jobs[0].job_type, JobType::FullTime);
}

#[test_log::test(tokio::test)]
async fn applications_list_embeds_the_job() {
    let server = MockServer::start().await;
    let job_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/rest/v1/applications"))
        .and(query_param("select", "*,job:jobs(id,title)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "status": "pending",
            "job_id": job_id,
            "job": {"id": job_id, "title": "Backend Intern"},
            "created_at": "2026-08-01T00:00:00Z",
        }])))
        .mount(&server)
        .await;

    let applications = gateway(&server, None).applications().list().await.unwrap();
    assert_eq!(applications[0].job_title(), "Backend Intern");
}

#[test_log::test(tokio::test)]
async fn insert_requests_the_stored_representation() {
    let server = MockServer::start().await;
    let create = JobCreate {
        title: "Backend Intern".to_string(),
        company: "Acme".to_string(),
        company_logo: None,
        job_image: None,
        location: "Remote".to_string(),
        job_type: JobType::Internship,
        category: "engineering".to_string(),
        description: "Build things".to_string(),
        requirements: "Rust".to_string(),
        salary_range: "competitive".to_string(),
        deadline: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
        is_active: true,
    };
    Mock::given(method("POST"))
        .and(path("/rest/v1/jobs"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(serde_json::to_value(&create).unwrap()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([job_json(Uuid::new_v4(), "Backend Intern")])))
        .expect(1)
        .mount(&server)
        .await;

    let job = gateway(&server, None).jobs().insert(&create).await.unwrap();
    assert_eq!(job.title, "Backend Intern");
}

#[test_log::test(tokio::test)]
async fn update_targets_a_single_row_by_id() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/application_messages"))
        .and(query_param("id", format!("eq.{id}")))
        .and(body_json(json!({"is_read": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([message_json(id, true)])))
        .expect(1)
        .mount(&server)
        .await;

    let message = gateway(&server, None)
        .messages()
        .update(id, &MessageReadUpdate { is_read: true })
        .await
        .unwrap();
    assert!(message.is_read);
}

#[test_log::test(tokio::test)]
async fn update_with_empty_representation_is_not_found() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/application_messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = gateway(&server, None).messages().update(id, &MessageReadUpdate { is_read: true }).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test_log::test(tokio::test)]
async fn delete_targets_a_single_row_by_id() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/jobs"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server, None).jobs().delete(id).await.unwrap();
}

#[test_log::test(tokio::test)]
async fn non_success_status_maps_to_a_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/jobs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let error = gateway(&server, None).jobs().list().await.unwrap_err();
    assert!(matches!(error, Error::Gateway { .. }));
    assert_eq!(error.user_message(), "Failed to fetch jobs");
}

#[test_log::test(tokio::test)]
async fn identity_listing_uses_the_service_role_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{
                "id": Uuid::new_v4(),
                "email": "user@example.com",
                "created_at": "2026-08-01T00:00:00Z",
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identities = gateway(&server, Some("service-key")).list_identities().await.unwrap();
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].email.as_deref(), Some("user@example.com"));
}

#[test_log::test(tokio::test)]
async fn identity_operations_fail_without_the_service_role_key() {
    let server = MockServer::start().await;

    let result = gateway(&server, None).list_identities().await;
    assert!(matches!(result, Err(Error::MissingCapability { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn permanent_ban_sends_the_wire_duration() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("PUT"))
        .and(path(format!("/auth/v1/admin/users/{id}")))
        .and(body_json(json!({"ban_duration": "876000h"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server, Some("service-key")).set_ban(id, BanDuration::Permanent).await.unwrap();
}

#[test_log::test(tokio::test)]
async fn upload_posts_bytes_and_returns_the_public_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/job-images/1724000000000-abcd1234.png"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "job-images/1724000000000-abcd1234.png"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = BucketStore::new(gateway(&server, None), "job-images");
    let url = store
        .upload("1724000000000-abcd1234.png", Bytes::from_static(b"fake image"), "image/png")
        .await
        .unwrap();
    assert_eq!(
        url,
        format!("{}/storage/v1/object/public/job-images/1724000000000-abcd1234.png", server.uri())
    );
}

#[test_log::test(tokio::test)]
async fn invoke_posts_the_json_payload() {
    let server = MockServer::start().await;
    let payload = json!({
        "to": "jane@example.com",
        "subject": "Regarding your application",
        "html": "<p>Hello</p>",
    });
    Mock::given(method("POST"))
        .and(path("/functions/v1/send-email"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server, None).invoke("send-email", &payload).await.unwrap();
}
