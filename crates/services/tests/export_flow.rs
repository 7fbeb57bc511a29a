use std::sync::Arc;

use review_core::model::{Paper, PaperId, ResponseCollection, Responses, ReviewConfig};
use review_core::time::fixed_now;
use services::{Clock, ExportError, ExportService, ResponseService};
use storage::JsonFileRepository;

#[tokio::test]
async fn empty_store_exports_nothing_and_writes_no_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = Arc::new(JsonFileRepository::new(dir.path().join("responses.json")));
    let out = dir.path().join("exports");
    let export = ExportService::new(Clock::fixed(fixed_now()), repo);

    let err = export.export_to_dir(&out).await.unwrap_err();
    assert!(matches!(err, ExportError::NothingToExport));
    assert!(!out.exists());
}

#[tokio::test]
async fn export_writes_every_stored_paper() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = Arc::new(JsonFileRepository::new(dir.path().join("responses.json")));
    let clock = Clock::fixed(fixed_now());
    let responses = ResponseService::new(clock, repo.clone());
    let export = ExportService::new(clock, repo);

    let config = ReviewConfig::builtin();
    let questions = config.catalog().expect("catalog");
    let mut session = ResponseCollection::new();
    for (id, answer) in [(1, "first"), (3, "  ")] {
        let paper: &Paper = config.paper(PaperId::new(id)).expect("paper");
        let answers: Responses = [(questions[0].key(), answer)].into_iter().collect();
        let outcome = responses.save(&mut session, paper, answers, &questions).await;
        assert!(outcome.persisted());
    }

    let report = export.export_to_dir(dir.path()).await.expect("export");
    assert_eq!(
        report.path,
        dir.path().join("research_responses_20231114_221320.json")
    );
    assert_eq!((report.papers, report.answered), (2, 1));

    let raw = tokio::fs::read_to_string(&report.path).await.expect("read export");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["export_date"], "2023-11-14 22:13:20");
    assert_eq!(json["total_papers"], 2);
    assert_eq!(json["responses"]["3"]["responses"]["q_0"], "  ");
    assert_eq!(
        json["responses"]["1"]["paper_title"],
        "Attention Is All You Need"
    );
}

#[tokio::test]
async fn hand_edited_document_is_exported_as_stored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("responses.json");
    let stored = serde_json::json!({
        "4": {
            "paper_title": "AlphaFold",
            "responses": {"0": "protein folding", "1": null, "2": 4.5},
            "timestamp": "yesterday",
            "reviewer": "jl"
        },
        "9": {"responses": {"q_0": ""}}
    });
    tokio::fs::write(&path, serde_json::to_vec_pretty(&stored).expect("encode"))
        .await
        .expect("seed");

    let export = ExportService::new(
        Clock::fixed(fixed_now()),
        Arc::new(JsonFileRepository::new(&path)),
    );
    let report = export.export_to_dir(dir.path()).await.expect("export");
    assert_eq!((report.papers, report.answered), (2, 2));

    let raw = tokio::fs::read_to_string(&report.path).await.expect("read export");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["responses"], stored);
    assert!(json["responses"]["4"]["responses"].get("q_0").is_none());
}
