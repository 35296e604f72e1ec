use std::sync::{Arc, Mutex};

use services::activity::{Advance, SpellingLevel};
use services::{ActivityLauncher, ActivityRunner, Clock, RunnerState};
use storage::repository::InMemoryRepository;
use vocab_core::model::{
    ActivityKind, AttemptResult, ImageRef, ListId, Settings, VocabularyItem, WordId,
};
use vocab_core::time::fixed_now;

fn pictured(id: u64, word: &str) -> VocabularyItem {
    let image = ImageRef::parse(format!("https://cdn.example/words/{word}.jpg")).unwrap();
    VocabularyItem::new(WordId::new(id), word, Some(image), Some(format!("a {word}"))).unwrap()
}

fn animals() -> Vec<VocabularyItem> {
    ["cat", "dog", "owl", "fox"]
        .iter()
        .zip(1_u64..)
        .map(|(w, id)| pictured(id, w))
        .collect()
}

fn launcher(repo: &InMemoryRepository) -> ActivityLauncher {
    ActivityLauncher::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Settings::default(),
    )
    .with_seed(2024)
}

#[test]
fn runner_walks_the_whole_state_machine() {
    let mut runner = ActivityRunner::new(Clock::fixed(fixed_now())).with_seed(1);
    assert_eq!(runner.state(), RunnerState::Loading);

    runner.start(animals(), ActivityKind::Spelling).unwrap();
    assert_eq!(runner.state(), RunnerState::Presenting);

    let mut retries = 0;
    loop {
        let word = runner.current_item().unwrap().word().to_owned();
        if retries < 2 {
            retries += 1;
            let outcome = runner.submit_attempt("nope").unwrap();
            assert_eq!(outcome.advance, Advance::Retry);
        }
        let outcome = runner.submit_attempt(&word.to_uppercase()).unwrap();
        if outcome.advance == Advance::Complete {
            break;
        }
    }

    assert_eq!(runner.state(), RunnerState::Complete);
    assert!(runner.current_item().is_none());
    let summary = runner.summary().unwrap();
    assert_eq!(summary.correct_answers, 4);
    assert_eq!(summary.total_attempts, 6);
    assert_eq!(summary.percentage, 100);
}

#[test]
fn every_attempt_result_reaches_listeners_with_its_timestamp() {
    let seen: Arc<Mutex<Vec<AttemptResult>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let mut runner = ActivityRunner::new(Clock::fixed(fixed_now())).with_seed(3);
    runner.subscribe(move |r: &AttemptResult| sink.lock().unwrap().push(r.clone()));

    runner.start(animals(), ActivityKind::Matching).unwrap();
    while let Some(id) = runner.current_item().map(VocabularyItem::id) {
        runner.submit_choice(WordId::new(99)).unwrap();
        runner.submit_choice(id).unwrap();
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 8);
    assert_eq!(seen.iter().filter(|r| r.is_correct()).count(), 4);
    assert!(seen.iter().all(|r| r.timestamp() == fixed_now()));
    assert!(seen.iter().all(|r| r.kind() == ActivityKind::Matching));
    assert!(
        seen.chunks(2)
            .all(|pair| pair[0].attempt_count() == 1 && pair[1].attempt_count() == 2)
    );
}

#[tokio::test]
async fn launched_drills_play_to_completion() {
    let repo = InMemoryRepository::new();
    repo.insert_list(ListId::new(7), animals()).unwrap();
    let launcher = launcher(&repo);

    let mut quiz = launcher.picture_quiz(ListId::new(7)).await.unwrap();
    while let Some(current) = quiz.runner().current_item().map(VocabularyItem::id) {
        let index = quiz
            .options()
            .iter()
            .position(|o| o.item_id == current)
            .unwrap();
        quiz.choose(index).unwrap();
    }
    assert_eq!(quiz.summary().unwrap().percentage, 100);

    let mut spelling = launcher
        .spelling(ListId::new(7), SpellingLevel::Three)
        .await
        .unwrap();
    while let Some(word) = spelling.runner().current_item().map(|i| i.word().to_owned()) {
        assert_eq!(spelling.prompt().unwrap().word, None);
        spelling.type_answer(&format!("  {word} ")).unwrap();
    }
    assert_eq!(spelling.summary().unwrap().total_items, 4);
}

#[tokio::test]
async fn bubble_pop_from_a_stored_list() {
    let repo = InMemoryRepository::new();
    repo.insert_list(ListId::new(1), animals()).unwrap();
    let mut drill = launcher(&repo).bubble_pop(ListId::new(1)).await.unwrap();

    while let Some(word) = drill.runner().current_item().map(|i| i.word().to_owned()) {
        for letter in word.chars() {
            let index = drill
                .bubbles()
                .iter()
                .position(|b| b.letter == letter && !b.popped)
                .unwrap();
            drill.pop(index).unwrap();
        }
    }

    let summary = drill.summary().unwrap();
    assert_eq!(summary.total_attempts, 4);
    assert!(drill.bubbles().is_empty());
}
