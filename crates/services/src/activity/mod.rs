//! Learner-facing activities.
//!
//! `ActivityRunner` owns the shared queue/judge/advance machinery; each drill wraps a
//! runner and adds the interaction its activity needs (tiles, bubbles, cards, options).

mod bubble_pop;
mod listener;
mod matching;
mod picture_quiz;
mod runner;
mod spelling;

pub use bubble_pop::{Bubble, BubblePopDrill};
pub use listener::AttemptListener;
pub use matching::{MatchingDrill, PictureCard};
pub use picture_quiz::{PictureQuizDrill, QuizOption};
pub use runner::{
    ActivityRunner, ActivitySession, Advance, AttemptOutcome, Progress, RunnerState,
    SessionSummary,
};
pub use spelling::{LetterTile, SpellingDrill, SpellingLevel, SpellingPrompt};
