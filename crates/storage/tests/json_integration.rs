use review_core::model::{AnswerValue, Paper, PaperId, QuestionId, ResponseCollection, Responses};
use review_core::time::fixed_now;
use storage::{JsonFileRepository, ResponseRepository, StorageError};

fn sample_collection() -> ResponseCollection {
    let questions = review_core::model::ReviewConfig::builtin().catalog().unwrap();
    let mut collection = ResponseCollection::new();

    let first: Responses = [
        (QuestionId::new(0), AnswerValue::from("Sequence transduction")),
        (QuestionId::new(1), AnswerValue::from("   ")),
        (QuestionId::new(10), AnswerValue::from(4)),
    ]
    .into_iter()
    .collect();
    collection.save(
        &Paper::new(PaperId::new(1), "Attention Is All You Need"),
        first,
        questions.clone(),
        fixed_now(),
    );

    let second: Responses = [(QuestionId::new(3), "Computational")].into_iter().collect();
    collection.save(
        &Paper::new(PaperId::new(10), "AlphaFold"),
        second,
        questions,
        fixed_now(),
    );
    collection
}

#[tokio::test]
async fn json_roundtrip_preserves_collection() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("responses.json"));
    let collection = sample_collection();

    repo.persist_collection(&collection).await.expect("persist");
    let loaded = repo.load_collection().await.expect("load");

    assert_eq!(loaded, collection);
    let record = loaded.record(PaperId::new(1)).unwrap();
    assert_eq!(record.responses.get(QuestionId::new(1)), Some(&AnswerValue::from("   ")));
}

#[tokio::test]
async fn json_document_is_pretty_and_keyed_by_paper_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.json");
    let repo = JsonFileRepository::new(&path);
    repo.persist_collection(&sample_collection()).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  \"1\": {"));
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["10"]["paper_title"], "AlphaFold");
    assert_eq!(value["1"]["responses"]["q_10"], 4);
    assert_eq!(value["1"]["timestamp"], "2023-11-14 22:13:20");
    assert_eq!(value["1"]["questions"][3]["type"], "multiple_choice");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("absent.json"));
    let err = repo.load_collection().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn corrupt_document_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileRepository::new(&path)
        .load_collection()
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn legacy_document_loads_with_canonical_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.json");
    std::fs::write(
        &path,
        r#"{
  "2": {
    "paper_id": 2,
    "paper_title": "AlphaFold",
    "responses": {"0": "Protein folding", "10": 5},
    "questions": [],
    "timestamp": "2024-03-01 09:30:00",
    "completed": false
  }
}"#,
    )
    .unwrap();

    let loaded = JsonFileRepository::new(&path).load_collection().await.unwrap();
    let responses = loaded.load(PaperId::new(2));
    assert_eq!(
        responses.get(QuestionId::new(0)),
        Some(&AnswerValue::from("Protein folding"))
    );
    assert_eq!(responses.get(QuestionId::new(10)), Some(&AnswerValue::from(5)));

    let rewritten = serde_json::to_value(&loaded).unwrap();
    assert_eq!(rewritten["2"]["responses"]["q_0"], "Protein folding");
}

#[tokio::test]
async fn persist_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/data/responses.json");
    let repo = JsonFileRepository::new(&path);
    repo.persist_collection(&ResponseCollection::new()).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
}

#[tokio::test]
async fn persist_into_a_directory_path_fails_with_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("occupied");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), "x").unwrap();

    let err = JsonFileRepository::new(&target)
        .persist_collection(&sample_collection())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

const HAND_EDITED_DOCUMENT: &str = r#"{
  "2": {
    "paper_id": 2,
    "paper_title": "AlphaFold",
    "responses": {"0": "Protein folding", "1": null, "10": 4.5},
    "questions": [{"id": 0, "category": "understanding", "text": "Q?", "type": "slider"}],
    "timestamp": "2024-03-01 09:30:00",
    "completed": false,
    "reviewer": "dr-x"
  },
  "3": {"paper_id": 3, "paper_title": "BERT", "responses": {"q_0": "NER"}}
}"#;

#[tokio::test]
async fn off_schema_values_load_and_survive_a_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.json");
    std::fs::write(&path, HAND_EDITED_DOCUMENT).unwrap();
    let repo = JsonFileRepository::new(&path);

    let mut collection = repo.load_collection().await.expect("tolerant load");
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.record(PaperId::new(2)).unwrap().answered_count(), 2);

    collection.save(
        &Paper::new(PaperId::new(1), "Attention"),
        [(QuestionId::new(0), "new")].into_iter().collect(),
        Vec::new(),
        fixed_now(),
    );
    repo.persist_collection(&collection).await.unwrap();

    let value = repo.load_document().await.unwrap();
    assert_eq!(value.as_object().unwrap().len(), 3);
    assert_eq!(value["2"]["responses"]["q_1"], serde_json::Value::Null);
    assert_eq!(value["2"]["responses"]["q_10"], 4.5);
    assert_eq!(value["2"]["questions"][0]["type"], "slider");
    assert_eq!(value["2"]["reviewer"], "dr-x");
    assert_eq!(value["3"]["responses"]["q_0"], "NER");
}

#[tokio::test]
async fn raw_document_keeps_stored_keys_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.json");
    std::fs::write(&path, HAND_EDITED_DOCUMENT).unwrap();

    let value = JsonFileRepository::new(&path).load_document().await.unwrap();
    assert_eq!(value["2"]["responses"]["0"], "Protein folding");
    assert!(value["2"]["responses"].get("q_0").is_none());
}

#[tokio::test]
async fn set_aside_moves_the_document_out_of_the_way() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.json");
    std::fs::write(&path, "{ not json").unwrap();
    let repo = JsonFileRepository::new(&path);

    let moved = repo.set_aside("20231114_221320").await.unwrap().unwrap();
    assert_eq!(moved, dir.path().join("responses.json.corrupt-20231114_221320"));
    assert_eq!(std::fs::read_to_string(&moved).unwrap(), "{ not json");
    assert!(!path.exists());
    assert!(repo.set_aside("again").await.unwrap().is_none());
}
