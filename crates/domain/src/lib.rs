//! Core domain model for the Abitus life gamification engine.
//!
//! Pure state and rules: characters with six stats of five sub-facets each,
//! quests with a small lifecycle state machine, journal entries that can
//! satisfy quests, and an achievement catalog. Everything here is
//! deterministic - wall-clock time and randomness are injected by the engine
//! crate, never read ambiently.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::Character;
pub use entities::{
    default_achievements, Achievement, AchievementType, JournalEntry, JournalEntryType,
    Quest, QuestStatus, QuestType, SatisfactionConfig, SatisfactionType,
    SUBSTANTIAL_WORD_COUNT,
};
pub use error::DomainError;
pub use ids::{CharacterId, JournalEntryId, QuestId};
pub use value_objects::{parse_score_key, Stat, StatType, SubFacet, SubFacetType, MAX_LEVEL};
