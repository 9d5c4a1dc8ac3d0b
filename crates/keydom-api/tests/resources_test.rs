#![allow(clippy::unwrap_used)]
// Integration tests for the resource clients using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use keydom_api::{AuthSession, Error, Outcome, TOKEN_HEADER, VisitInsert, VisitorInsert};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AuthSession) {
    let server = MockServer::start().await;
    let session = AuthSession::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, session)
}

async fn authenticated(token: &str) -> (MockServer, AuthSession) {
    let (server, session) = setup().await;
    session.set_token(SecretString::from(token.to_owned()));
    (server, session)
}

fn ok(body: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

// ── Access media ────────────────────────────────────────────────────

#[tokio::test]
async fn test_access_media_create_forwards_body_unchanged() {
    let (server, session) = authenticated("T").await;

    let fields = json!({
        "identifier": "CARD-0042",
        "mediaTypeCode": 1,
        "enabled": true,
        "validityStart": 1_700_000_000,
        "validityEnd": 1_800_000_000,
        "validityMode": 0,
        "antipassbackEnabled": false,
        "countingEnabled": false,
        "lifeCycleMode": 0,
        "vendorExtension": { "kept": true }
    });

    Mock::given(method("POST"))
        .and(path("/accessMedias/insert"))
        .and(header(TOKEN_HEADER, "T"))
        .and(header("content-type", "application/json"))
        .and(body_json(&fields))
        .respond_with(ok(&json!({ "data": { "uuid": "am-1" } })))
        .expect(1)
        .mount(&server)
        .await;

    let record = session.access_medias().create(&fields).await.record().unwrap();

    assert_eq!(record, json!({ "data": { "uuid": "am-1" } }));
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn test_access_media_get_by_key() {
    let (server, session) = authenticated("T").await;

    Mock::given(method("GET"))
        .and(path("/accessMedias/getByKey/"))
        .and(query_param("uuid", "am-1"))
        .and(header(TOKEN_HEADER, "T"))
        .respond_with(ok(&json!({ "data": { "uuid": "am-1", "enabled": true } })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session.access_medias().get_by_key("am-1").await;

    assert!(outcome.is_record());
    assert_eq!(outcome.as_record().unwrap()["data"]["enabled"], json!(true));
}

#[tokio::test]
async fn test_access_media_update_uses_put() {
    let (server, session) = authenticated("T").await;

    let fields = json!({ "uuid": "am-1", "identifier": "CARD-0042", "enabled": false });

    Mock::given(method("PUT"))
        .and(path("/accessMedias/update"))
        .and(body_json(&fields))
        .respond_with(ok(&json!({ "data": true })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session.access_medias().update(&fields).await;
    assert_eq!(outcome.record(), Some(json!({ "data": true })));
}

#[tokio::test]
async fn test_delete_escapes_reserved_characters() {
    let (server, session) = authenticated("T").await;

    let id = "a&b=c d";

    Mock::given(method("DELETE"))
        .and(path("/accessMedias/delete/"))
        .and(query_param("uuid", id))
        .respond_with(ok(&json!({ "data": true })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session.access_medias().delete(id).await;
    assert!(outcome.is_record(), "got: {outcome:?}");

    let received = server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = received[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(pairs, vec![("uuid".to_owned(), id.to_owned())]);
}

// ── Token handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_request_before_authentication_has_no_token_header() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/profiles/getAll"))
        .respond_with(ResponseTemplate::new(401).set_body_string("missing token"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session.profiles().get_all().await;

    match outcome {
        Outcome::TransportError(Error::Http { status, ref body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "missing token");
        }
        other => panic!("expected HTTP 401, got: {other:?}"),
    }

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get(TOKEN_HEADER).is_none());
}

#[tokio::test]
async fn test_clients_read_token_at_call_time() {
    let (server, session) = setup().await;
    let visits = session.visits();

    Mock::given(method("POST"))
        .and(path("/authentication/login"))
        .respond_with(ok(&json!({ "data": { "token": "late" } })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/visits/getByKey/"))
        .and(header(TOKEN_HEADER, "late"))
        .respond_with(ok(&json!({ "data": { "uuid": "v-1" } })))
        .expect(1)
        .mount(&server)
        .await;

    let password = SecretString::from("pw".to_owned());
    assert!(session.authenticate("operator", &password).await.is_some());

    let outcome = visits.get_by_key("v-1").await;
    assert!(outcome.is_record(), "got: {outcome:?}");
}

#[tokio::test]
async fn test_invalid_token_header_is_reported() {
    let (server, session) = authenticated("bad\ntoken").await;

    let outcome = session.profiles().get_all().await;

    assert!(
        matches!(outcome, Outcome::TransportError(Error::InvalidHeader)),
        "got: {outcome:?}"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Response classification ─────────────────────────────────────────

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let (server, session) = authenticated("T").await;

    Mock::given(method("GET"))
        .and(path("/users/visitor/getByKey/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let outcome = session.visitors().get_by_key("u-1").await;

    assert!(
        matches!(outcome, Outcome::ParseError(Error::Deserialization { .. })),
        "got: {outcome:?}"
    );
    assert_eq!(outcome.record(), None);
}

#[tokio::test]
async fn test_empty_body_is_empty() {
    let (server, session) = authenticated("T").await;

    Mock::given(method("DELETE"))
        .and(path("/users/delete/"))
        .and(query_param("uuid", "u-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session.visitors().delete("u-1").await;
    assert!(outcome.is_empty(), "got: {outcome:?}");
    assert_eq!(outcome.into_result().unwrap(), None);
}

#[tokio::test]
async fn test_transport_failure_is_reported() {
    let session = AuthSession::with_client("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let outcome = session.visits().delete("v-1").await;

    match outcome {
        Outcome::TransportError(ref err @ Error::Transport(_)) => {
            assert!(err.is_transient(), "connection refused should be transient");
        }
        other => panic!("expected Transport error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_status() {
    let (server, session) = authenticated("T").await;

    Mock::given(method("GET"))
        .and(path("/visits/getByKey/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "unknown uuid" })))
        .mount(&server)
        .await;

    let outcome = session.visits().get_by_key("nope").await;
    assert!(outcome.error().unwrap().is_not_found());
}

// ── Visitors and visits ─────────────────────────────────────────────

#[tokio::test]
async fn test_visitor_create_with_typed_payload() {
    let (server, session) = authenticated("T").await;

    let visitor = VisitorInsert {
        last_name: "Lovelace".into(),
        first_name: "Ada".into(),
        email: Some("ada@example.com".into()),
        ..VisitorInsert::default()
    };

    Mock::given(method("POST"))
        .and(path("/users/visitor/insert"))
        .and(body_json(json!({
            "lastName": "Lovelace",
            "firstName": "Ada",
            "email": "ada@example.com"
        })))
        .respond_with(ok(&json!({ "data": { "uuid": "u-9" } })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session.visitors().create(&visitor).await;
    assert_eq!(outcome.record().unwrap()["data"]["uuid"], json!("u-9"));
}

#[tokio::test]
async fn test_visitor_update_uses_put() {
    let (server, session) = authenticated("T").await;

    Mock::given(method("PUT"))
        .and(path("/users/visitor/update"))
        .respond_with(ok(&json!({ "data": true })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = session
        .visitors()
        .update(&json!({ "uuid": "u-9", "lastName": "Lovelace", "firstName": "Ada" }))
        .await;
    assert!(outcome.is_record());
}

#[tokio::test]
async fn test_visit_lifecycle() {
    let (server, session) = authenticated("T").await;
    let visits = session.visits();

    let visit = VisitInsert {
        user_uuid: Some("u-9".into()),
        initial_timestamp: 1_700_000_000,
        final_timestamp: 1_700_003_600,
        visit_first_access_media_type: Some(2),
        visit_first_access_media_identifier: Some("QR-77".into()),
        open_visit_now: Some(true),
        site_id: 1,
        ..VisitInsert::default()
    };

    Mock::given(method("POST"))
        .and(path("/visits/insert"))
        .and(body_json(json!({
            "userUuid": "u-9",
            "initialTimestamp": 1_700_000_000,
            "finalTimestamp": 1_700_003_600,
            "visitFirstAccessMediaType": 2,
            "visitFirstAccessMediaIdentifier": "QR-77",
            "openVisitNow": true,
            "siteId": 1
        })))
        .respond_with(ok(&json!({ "data": { "uuid": "v-1" } })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/visits/update"))
        .respond_with(ok(&json!({ "data": { "uuid": "v-1", "notes": "late" } })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/visits/delete/"))
        .and(query_param("uuid", "v-1"))
        .respond_with(ok(&json!({ "data": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(visits.create(&visit).await.is_record());

    let update = VisitInsert {
        uuid: Some("v-1".into()),
        notes: Some("late".into()),
        ..visit
    };
    assert!(visits.update(&update).await.is_record());
    assert!(visits.delete("v-1").await.is_record());
}

// ── Profiles ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_profiles_get_all() {
    let (server, session) = authenticated("T").await;

    let body = json!({
        "data": [
            { "uuid": "p-1", "name": "Staff" },
            { "uuid": "p-2", "name": "Visitors" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/profiles/getAll"))
        .and(header(TOKEN_HEADER, "T"))
        .respond_with(ok(&body))
        .expect(1)
        .mount(&server)
        .await;

    let record = session.profiles().get_all().await.record().unwrap();
    assert_eq!(record["data"].as_array().unwrap().len(), 2);
    assert_eq!(record["data"][1]["name"], json!("Visitors"));
}
