//! Integration tests for authenticated downloads
//!
//! The mock server plays both the data host and Earthdata Login; which of
//! the two it is depends on the `urs_host` the session is given.

use earthdata::{Credentials, DownloadError, DownloadOptions, EarthdataSession};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASIC_ALICE: &str = "Basic YWxpY2U6czNjcmV0";

fn credentials() -> Credentials {
    Credentials::new("alice", "s3cret")
}

fn session(urs_host: &str) -> EarthdataSession {
    EarthdataSession::new(
        credentials(),
        DownloadOptions {
            urs_host: urs_host.to_string(),
            ..Default::default()
        },
    )
    .unwrap()
}

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

// ============================================================================
// Redirect and authentication handling
// ============================================================================

#[tokio::test]
async fn test_credentials_not_sent_to_data_host() {
    let server = MockServer::start().await;
    let body = payload(70_000);
    Mock::given(method("GET"))
        .and(path("/data/VNP09GA.A2021290.h06v11.001.h5"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/data/VNP09GA.A2021290.h06v11.001.h5", server.uri());

    let outcome = session("urs.earthdata.nasa.gov")
        .download_file(&url, dir.path())
        .await
        .unwrap();

    assert_eq!(outcome.bytes, body.len() as u64);
    assert_eq!(std::fs::read(&outcome.path).unwrap(), body);
    assert_eq!(outcome.sha256, hex::encode(Sha256::digest(&body)));
    assert!(!dir.path().join("VNP09GA.A2021290.h06v11.001.h5.part").exists());

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.headers.contains_key("authorization")));
}

#[tokio::test]
async fn test_redirect_chain_authenticates_against_urs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/granule.h5"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/oauth/authorize?client_id=x"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .and(header("authorization", BASIC_ALICE))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/data/granule-signed.h5")
                .insert_header("Set-Cookie", "urs_session=abc; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/granule-signed.h5"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"HDF5".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/data/granule.h5", server.uri());

    // Same host plays URS here, so every hop is authenticated
    let outcome = session("127.0.0.1").download_file(&url, dir.path()).await.unwrap();

    assert_eq!(outcome.path, dir.path().join("granule.h5"));
    assert_eq!(outcome.bytes, 4);
}

#[tokio::test]
async fn test_redirect_loop_is_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop.h5"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop.h5"))
        .mount(&server)
        .await;

    let session = EarthdataSession::new(
        credentials(),
        DownloadOptions {
            max_redirects: 3,
            ..Default::default()
        },
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = session
        .download_file(&format!("{}/loop.h5", server.uri()), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::TooManyRedirects(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

// ============================================================================
// Batch downloads
// ============================================================================

#[tokio::test]
async fn test_download_all_collects_failures_in_order() {
    let server = MockServer::start().await;
    for name in ["a.h5", "c.h5"] {
        Mock::given(method("GET"))
            .and(path(format!("/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(name.as_bytes().to_vec()))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/b.h5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let urls: Vec<String> = ["a.h5", "b.h5", "c.h5"]
        .iter()
        .map(|n| format!("{}/{}", server.uri(), n))
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let report = session("urs.earthdata.nasa.gov")
        .download_all(&urls, dir.path(), 2)
        .await;

    let names: Vec<_> = report
        .succeeded
        .iter()
        .map(|o| o.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.h5", "c.h5"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].url, urls[1]);
    assert!(report.failed[0].reason.contains("404"));
    assert!(!dir.path().join("b.h5").exists());
}

#[tokio::test]
async fn test_download_all_rejects_shared_file_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/g.h5"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"first".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/y/g.h5"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second".to_vec()))
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/x/g.h5", server.uri()),
        format!("{}/y/g.h5", server.uri()),
    ];
    let dir = tempfile::tempdir().unwrap();
    let report = session("urs.earthdata.nasa.gov")
        .download_all(&urls, dir.path(), 2)
        .await;

    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.succeeded[0].url, urls[0]);
    assert_eq!(
        report.succeeded[0].sha256,
        hex::encode(Sha256::digest(b"first"))
    );
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].url, urls[1]);
    assert!(report.failed[0].reason.contains("overwrite"));
    assert_eq!(std::fs::read(dir.path().join("g.h5")).unwrap(), b"first");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_shutdown_skips_pending_downloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&server)
        .await;

    let running = Arc::new(AtomicBool::new(true));
    running.store(false, Ordering::Release);

    let urls = vec![format!("{}/a.h5", server.uri())];
    let dir = tempfile::tempdir().unwrap();
    let report = session("urs.earthdata.nasa.gov")
        .with_shutdown_flag(running)
        .download_all(&urls, dir.path(), 1)
        .await;

    assert!(report.succeeded.is_empty());
    assert_eq!(report.skipped, urls);
    assert!(server.received_requests().await.unwrap().is_empty());
}
