pub mod achievement;
pub mod journal;
pub mod quest;

pub use achievement::{default_achievements, Achievement, AchievementType};
pub use journal::{JournalEntry, JournalEntryType, SUBSTANTIAL_WORD_COUNT};
pub use quest::{Quest, QuestStatus, QuestType, SatisfactionConfig, SatisfactionType};
