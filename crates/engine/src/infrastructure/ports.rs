//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine, everything else is
//! concrete types. Ports exist for:
//! - Persistence (could swap the JSON store for SQLite)
//! - Clock (for testing)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use abitus_domain::{
    Achievement, Character, JournalEntry, JournalEntryId, Quest, QuestId, QuestStatus,
    QuestType,
};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Not found")]
    NotFound,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// Clock
// =============================================================================

pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// =============================================================================
// Persistence Ports (one per entity type)
// =============================================================================

/// Filter for quest listings. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestFilter {
    pub status: Option<QuestStatus>,
    pub quest_type: Option<QuestType>,
}

impl QuestFilter {
    pub fn with_status(status: QuestStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, quest: &Quest) -> bool {
        self.status.is_none_or(|s| quest.status == s)
            && self.quest_type.is_none_or(|t| quest.quest_type == t)
    }
}

/// The character store holds at most one character (single-player engine).
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn delete(&self) -> Result<(), RepoError>;
}

#[async_trait]
pub trait QuestRepo: Send + Sync {
    async fn get(&self, id: QuestId) -> Result<Option<Quest>, RepoError>;
    async fn save(&self, quest: &Quest) -> Result<(), RepoError>;
    async fn save_many(&self, quests: &[Quest]) -> Result<(), RepoError>;
    async fn list(&self, filter: QuestFilter) -> Result<Vec<Quest>, RepoError>;
    async fn delete(&self, id: QuestId) -> Result<(), RepoError>;
    /// Removes completed non-recurring quests, returning how many went.
    async fn clear_completed(&self) -> Result<usize, RepoError>;
}

#[async_trait]
pub trait AchievementRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Achievement>, RepoError>;
    async fn save(&self, achievement: &Achievement) -> Result<(), RepoError>;
    async fn save_many(&self, achievements: &[Achievement]) -> Result<(), RepoError>;
}

#[async_trait]
pub trait JournalRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<JournalEntry>, RepoError>;
    async fn get(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, RepoError>;
    async fn save(&self, entry: &JournalEntry) -> Result<(), RepoError>;
    async fn delete(&self, id: JournalEntryId) -> Result<(), RepoError>;
}

/// Free-form string preferences (theme, last screen, feature toggles).
#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), RepoError>;
    /// Drops every setting. Part of the full data reset.
    async fn clear(&self) -> Result<(), RepoError>;
}
