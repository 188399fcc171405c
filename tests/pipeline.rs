//! End-to-end tests: HTTP front-end → datagram → relay → store.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, LOCATION};

mod common;

#[tokio::test]
async fn posted_form_is_stored_with_date() {
    let harness = common::start().await;

    let res = common::client()
        .post(format!("http://{}/message", harness.http_addr))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("name=Alice&text=Hi+there")
        .send()
        .await
        .expect("front-end unreachable");

    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()[LOCATION], "/");
    assert!(res.bytes().await.unwrap().is_empty());

    common::wait_for_documents(&harness.store, 1).await;
    let docs = harness.store.documents("messages");
    assert_eq!(docs.len(), 1);

    let doc = docs[0].as_object().unwrap();
    assert_eq!(doc.len(), 3);
    assert_eq!(doc["name"], "Alice");
    assert_eq!(doc["text"], "Hi there");

    // DD/MM/YYYY HH:MM:SS:ffffff
    let date = doc["date"].as_str().unwrap();
    assert_eq!(date.len(), 26);
    assert_eq!(&date[2..3], "/");
    assert_eq!(&date[5..6], "/");
    assert_eq!(&date[19..20], ":");

    harness.shutdown.trigger();
}

#[tokio::test]
async fn missing_static_file_gets_error_page() {
    let harness = common::start().await;

    let res = common::client()
        .get(format!("http://{}/nonexistent.png", harness.http_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), common::ERROR_PAGE);

    harness.shutdown.trigger();
}

#[tokio::test]
async fn pages_and_static_files_are_served() {
    let harness = common::start().await;
    let client = common::client();

    for path in ["/", "/message"] {
        let res = client
            .get(format!("http://{}{}", harness.http_addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()[CONTENT_TYPE], "text/html");
    }

    let res = client
        .get(format!("http://{}/logo.png", harness.http_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()[CONTENT_TYPE], "image/png");

    harness.shutdown.trigger();
}

#[tokio::test]
async fn redirect_does_not_wait_for_store() {
    let harness = common::start().await;
    harness.store.fail_writes(true);

    let res = common::client()
        .post(format!("http://{}/", harness.http_addr))
        .body("name=Bob")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 302);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(harness.store.is_empty());
    assert_eq!(harness.store.opened(), harness.store.closed());

    harness.shutdown.trigger();
}

#[tokio::test]
async fn repeated_payloads_create_repeated_documents() {
    let harness = common::start().await;
    let client = common::client();

    for _ in 0..3 {
        let res = client
            .post(format!("http://{}/message", harness.http_addr))
            .body("name=Same&text=Same")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 302);
    }

    common::wait_for_documents(&harness.store, 3).await;
    assert_eq!(harness.store.documents("messages").len(), 3);

    harness.shutdown.trigger();
}
