use vocab_core::model::AttemptResult;

/// Receives every attempt result the moment it is judged.
///
/// Called synchronously from the runner while it is in `Judging`, so implementations
/// must return quickly and hand any slow work (storage writes) off elsewhere.
pub trait AttemptListener: Send + Sync {
    fn on_attempt(&self, result: &AttemptResult);
}

impl<F> AttemptListener for F
where
    F: Fn(&AttemptResult) + Send + Sync,
{
    fn on_attempt(&self, result: &AttemptResult) {
        self(result);
    }
}
