use serde::{Deserialize, Serialize};

use crate::model::ids::StudentId;

/// A roster member as shown on the class leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentIdentity {
    pub id: StudentId,
    pub display_name: String,
}

impl StudentIdentity {
    #[must_use]
    pub fn new(id: StudentId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}
