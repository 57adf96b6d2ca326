//! End-to-end tests against a mocked Reader API

use reader_md::fetch::{enrich_highlights, fetch_documents};
use reader_md::{Config, Document, Error, Exporter, ReaderClient, Status};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        api_base: server.uri(),
        token: "test-token".into(),
        ..Config::default()
    }
}

fn doc_json(id: &str, title: &str, location: &str, category: &str, saved_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "source_url": format!("https://example.com/{id}"),
        "author": "Jane Doe",
        "category": category,
        "word_count": 500,
        "reading_progress": 0.2,
        "tags": {"rust": {}},
        "saved_at": saved_at,
        "location": location,
        "parent_id": null
    })
}

fn page(results: Vec<serde_json::Value>, cursor: Option<&str>) -> serde_json::Value {
    json!({"results": results, "nextPageCursor": cursor})
}

/// Mount an empty terminal page for each of the given locations
async fn mount_empty_locations(server: &MockServer, locations: &[&str]) {
    for location in locations {
        Mock::given(method("GET"))
            .and(path("/list/"))
            .and(query_param("location", *location))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![], None)))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn pagination_concatenates_pages_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "new"))
        .and(query_param_is_missing("pageCursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                doc_json("a", "A", "new", "article", "2024-03-04T00:00:00Z"),
                doc_json("b", "B", "new", "article", "2024-03-03T00:00:00Z"),
            ],
            Some("cursor-2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "new"))
        .and(query_param("pageCursor", "cursor-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                doc_json("c", "C", "new", "article", "2024-03-02T00:00:00Z"),
                doc_json("d", "D", "new", "article", "2024-03-01T00:00:00Z"),
            ],
            None,
        )))
        .mount(&server)
        .await;

    let client = ReaderClient::new(&config_for(&server)).unwrap();
    let documents = fetch_documents(&client, Some(Status::New), 100)
        .await
        .unwrap();

    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn requests_carry_the_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(header("Authorization", "Token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![], None)))
        .mount(&server)
        .await;

    let client = ReaderClient::new(&config_for(&server)).unwrap();
    let documents = fetch_documents(&client, Some(Status::New), 100)
        .await
        .unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn page_failure_is_fatal_and_carries_the_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "new"))
        .and(query_param_is_missing("pageCursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![doc_json("a", "A", "new", "article", "2024-03-04T00:00:00Z")],
            Some("cursor-2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("pageCursor", "cursor-2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ReaderClient::new(&config_for(&server)).unwrap();
    let err = fetch_documents(&client, Some(Status::New), 100)
        .await
        .unwrap_err();

    match err {
        Error::Fetch { cursor, .. } => assert_eq!(cursor.as_deref(), Some("cursor-2")),
        other => panic!("expected Fetch error, got {other}"),
    }
}

#[tokio::test]
async fn runaway_cursor_hits_the_safety_cap() {
    let server = MockServer::start().await;

    // Every page hands out another cursor and never terminates
    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![doc_json("a", "A", "new", "article", "2024-03-04T00:00:00Z")],
            Some("again"),
        )))
        .mount(&server)
        .await;

    let client = ReaderClient::new(&config_for(&server)).unwrap();
    let err = fetch_documents(&client, Some(Status::New), 3)
        .await
        .unwrap_err();

    match err {
        Error::Fetch { message, .. } => assert!(message.contains("safety cap")),
        other => panic!("expected Fetch error, got {other}"),
    }
}

#[tokio::test]
async fn rejected_token_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = ReaderClient::new(&config_for(&server)).unwrap();
    let err = fetch_documents(&client, Some(Status::New), 100)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn highlight_failure_degrades_only_the_affected_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("parent_id", "doc-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("parent_id", "doc-2"))
        .and(query_param("category", "highlight"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![json!({"content": "A striking sentence.", "notes": "so true"})],
            None,
        )))
        .mount(&server)
        .await;

    let mut documents: Vec<Document> = vec![
        serde_json::from_value(doc_json("doc-1", "One", "new", "article", "2024-03-04T00:00:00Z"))
            .unwrap(),
        serde_json::from_value(doc_json("doc-2", "Two", "new", "article", "2024-03-03T00:00:00Z"))
            .unwrap(),
    ];

    let client = ReaderClient::new(&config_for(&server)).unwrap();
    let degraded = enrich_highlights(&client, &mut documents).await;

    assert_eq!(degraded, 1);
    assert!(documents[0].highlights.is_empty());
    assert_eq!(documents[1].highlights.len(), 1);
    assert_eq!(documents[1].highlights[0].content, "A striking sentence.");
    assert_eq!(documents[1].highlights[0].note.as_deref(), Some("so true"));
}

#[tokio::test]
async fn end_to_end_renders_bucket_files_and_index() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![doc_json("n1", "Newest Piece", "new", "article", "2024-03-10T00:00:00Z")],
            None,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "later"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![doc_json("l1", "Older Piece", "later", "article", "2024-03-05T00:00:00Z")],
            None,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![doc_json("a1", "Finished Piece", "archive", "article", "2024-03-01T00:00:00Z")],
            None,
        )))
        .mount(&server)
        .await;
    mount_empty_locations(&server, &["shortlist", "feed"]).await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: output_dir.path().to_path_buf(),
        ..config_for(&server)
    };

    let summary = Exporter::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.queue, 2);
    assert_eq!(summary.archive, 1);
    assert_eq!(summary.feed, 0);
    assert!(summary.write_failures.is_empty());

    let queue = std::fs::read_to_string(output_dir.path().join("queue.md")).unwrap();
    assert!(queue.contains("Newest Piece"));
    assert!(queue.contains("Older Piece"));
    assert!(
        queue.find("Newest Piece").unwrap() < queue.find("Older Piece").unwrap(),
        "queue should be ordered newest saved first"
    );

    let archive = std::fs::read_to_string(output_dir.path().join("archive.md")).unwrap();
    assert!(archive.contains("Finished Piece"));

    assert!(
        !output_dir.path().join("feed.md").exists(),
        "empty feed bucket should not produce a file"
    );

    let readme = std::fs::read_to_string(output_dir.path().join("README.md")).unwrap();
    assert!(readme.contains("| [📋 Reading Queue](queue.md) | 2 |"));
    assert!(readme.contains("| [✅ Archive](archive.md) | 1 |"));
    assert!(readme.contains("| 📡 Feed | 0 |"));

    let backup = std::fs::read_to_string(output_dir.path().join("data.json")).unwrap();
    let documents: Vec<Document> = serde_json::from_str(&backup).unwrap();
    assert_eq!(documents.len(), 3);
}

#[tokio::test]
async fn category_filter_excludes_from_buckets_but_not_backup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                doc_json("art", "An Article", "new", "article", "2024-03-10T00:00:00Z"),
                doc_json("pdf", "A Paper", "new", "pdf", "2024-03-09T00:00:00Z"),
            ],
            None,
        )))
        .mount(&server)
        .await;
    mount_empty_locations(&server, &["later", "shortlist", "archive", "feed"]).await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: output_dir.path().to_path_buf(),
        categories: vec!["article".to_string()],
        ..config_for(&server)
    };

    let summary = Exporter::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.total, 2, "backup keeps every fetched document");
    assert_eq!(summary.queue, 1, "filtered document is in no bucket");

    let queue = std::fs::read_to_string(output_dir.path().join("queue.md")).unwrap();
    assert!(queue.contains("An Article"));
    assert!(!queue.contains("A Paper"));

    let backup = std::fs::read_to_string(output_dir.path().join("data.json")).unwrap();
    let documents: Vec<Document> = serde_json::from_str(&backup).unwrap();
    assert!(documents.iter().any(|d| d.id == "pdf"));
}

#[tokio::test]
async fn exporter_survives_a_failed_highlight_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                doc_json("doc-1", "Degraded", "new", "article", "2024-03-10T00:00:00Z"),
                doc_json("doc-2", "Enriched", "new", "article", "2024-03-09T00:00:00Z"),
            ],
            None,
        )))
        .mount(&server)
        .await;
    mount_empty_locations(&server, &["later", "shortlist", "archive", "feed"]).await;

    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("parent_id", "doc-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("parent_id", "doc-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![json!({"content": "Worth remembering."})],
            None,
        )))
        .mount(&server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: output_dir.path().to_path_buf(),
        with_highlights: true,
        ..config_for(&server)
    };

    let summary = Exporter::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.degraded_highlights, 1);

    let queue = std::fs::read_to_string(output_dir.path().join("queue.md")).unwrap();
    assert!(queue.contains("Worth remembering."));

    let backup = std::fs::read_to_string(output_dir.path().join("data.json")).unwrap();
    let documents: Vec<Document> = serde_json::from_str(&backup).unwrap();
    let degraded = documents.iter().find(|d| d.id == "doc-1").unwrap();
    assert!(degraded.highlights.is_empty());
    let enriched = documents.iter().find(|d| d.id == "doc-2").unwrap();
    assert_eq!(enriched.highlights.len(), 1);
}

#[tokio::test]
async fn fetch_drops_child_records_from_the_top_level() {
    let server = MockServer::start().await;

    let mut child = doc_json("child", "A Highlight", "archive", "highlight", "2024-03-01T00:00:00Z");
    child["parent_id"] = json!("some-parent");
    Mock::given(method("GET"))
        .and(path("/list/"))
        .and(query_param("location", "archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                doc_json("top", "A Document", "archive", "article", "2024-03-02T00:00:00Z"),
                child,
            ],
            None,
        )))
        .mount(&server)
        .await;
    mount_empty_locations(&server, &["new", "later", "shortlist", "feed"]).await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: output_dir.path().to_path_buf(),
        ..config_for(&server)
    };

    let summary = Exporter::new(config).unwrap().run().await.unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.archive, 1);
}
