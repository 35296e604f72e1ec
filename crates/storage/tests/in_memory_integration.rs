use storage::repository::{ActivityResultRecord, InMemoryRepository, Storage};
use vocab_core::model::{
    ActivityKind, AttemptResult, ClassId, ImageRef, ListId, StudentId, StudentIdentity,
    VocabularyItem, WordId,
};
use vocab_core::time::fixed_now;

#[tokio::test]
async fn storage_bundle_shares_one_backend() {
    let repo = InMemoryRepository::new();
    let list_id = ListId::new(1);
    let image = ImageRef::parse("https://cdn.example.com/cat.png").unwrap();
    repo.insert_list(
        list_id,
        vec![
            VocabularyItem::new(WordId::new(1), "cat", Some(image), None).unwrap(),
            VocabularyItem::text_only(WordId::new(2), "dog").unwrap(),
        ],
    )
    .unwrap();
    let class_id = ClassId::new(7);
    repo.enroll(class_id, StudentIdentity::new(StudentId::new(1), "Ana"))
        .unwrap();

    let storage = Storage::from_repository(repo.clone());

    let items = storage.vocabulary.fetch_vocabulary_items(list_id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items[0].has_image());

    let result =
        AttemptResult::new(WordId::new(2), ActivityKind::BubblePop, true, 2, fixed_now()).unwrap();
    storage
        .results
        .record_attempt_result(StudentId::new(1), class_id, &result)
        .await
        .unwrap();

    let roster = storage.roster.fetch_roster(class_id).await.unwrap();
    let ids: Vec<_> = roster.iter().map(|s| s.id).collect();
    let rows = storage.results.fetch_results_for_roster(&ids).await.unwrap();
    assert_eq!(rows, repo.records().unwrap());
    assert_eq!(rows[0].attempt_count, 2);
}

#[test]
fn record_serializes_with_table_column_names() {
    let result =
        AttemptResult::new(WordId::new(42), ActivityKind::PictureQuiz, false, 1, fixed_now())
            .unwrap();
    let record = ActivityResultRecord::from_result(StudentId::new(3), ClassId::new(9), &result);

    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["student_id"], 3);
    assert_eq!(json["class_id"], 9);
    assert_eq!(json["vocabulary_word_id"], 42);
    assert_eq!(json["activity_type"], "picture_quiz");
    assert_eq!(json["is_correct"], false);
    assert_eq!(json["attempt_count"], 1);

    let attempt = record.into_student_attempt();
    assert_eq!(attempt.student_id, StudentId::new(3));
    assert!(!attempt.is_correct);
}
