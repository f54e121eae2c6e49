//! Journal entry entity - reflective writing with mood tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{JournalEntryId, QuestId};

/// Minimum word count for an entry to count as substantial.
pub const SUBSTANTIAL_WORD_COUNT: usize = 10;

/// Types of journal entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum JournalEntryType {
    /// Open-ended writing
    #[default]
    FreeForm,
    /// Gratitude list/reflection
    Gratitude,
    /// Daily/weekly reflection
    Reflection,
    /// Emotional check-in
    Emotion,
    /// Goal setting/tracking
    Goal,
    /// Lessons learned
    Lesson,
}

impl JournalEntryType {
    pub fn all() -> [JournalEntryType; 6] {
        [
            Self::FreeForm,
            Self::Gratitude,
            Self::Reflection,
            Self::Emotion,
            Self::Goal,
            Self::Lesson,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FreeForm => "Free Writing",
            Self::Gratitude => "Gratitude",
            Self::Reflection => "Reflection",
            Self::Emotion => "Emotional Check-in",
            Self::Goal => "Goal Setting",
            Self::Lesson => "Lesson Learned",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::FreeForm => "📝",
            Self::Gratitude => "🙏",
            Self::Reflection => "🪞",
            Self::Emotion => "💭",
            Self::Goal => "🎯",
            Self::Lesson => "📖",
        }
    }

    /// Writing prompts offered when composing an entry of this type.
    pub fn prompts(&self) -> &'static [&'static str] {
        match self {
            Self::FreeForm => &[
                "Let your quill flow freely upon this parchment...",
                "What weighs upon your mind this day?",
                "Chronicle the thoughts that swirl within your keep...",
            ],
            Self::Gratitude => &[
                "Name three blessings that have graced your path today...",
                "For what gifts of fortune do you give thanks?",
                "What kindnesses have the fates bestowed upon you?",
            ],
            Self::Reflection => &[
                "As the day draws to a close, what wisdom have you gathered?",
                "Reflect upon your deeds. What would you have done differently?",
                "What lessons has this chapter of your journey revealed?",
            ],
            Self::Emotion => &[
                "How fares your heart and spirit at this hour?",
                "What tempests or calms stir within your soul?",
                "Name the feelings that dwell within your castle walls...",
            ],
            Self::Goal => &[
                "What quest do you set before yourself?",
                "Declare your intentions for the days ahead...",
                "What mountain do you aim to conquer next?",
            ],
            Self::Lesson => &[
                "What hard-won wisdom have you claimed today?",
                "What truth has experience etched upon your soul?",
                "Record the knowledge gained through trial and triumph...",
            ],
        }
    }
}

/// A single journal entry.
///
/// `entry_type` is immutable after creation; content, mood, and tags are
/// updatable; entries can be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub content: String,
    pub entry_type: JournalEntryType,
    pub prompt_used: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// How you felt before writing (1-5 scale)
    pub mood_before: Option<u8>,
    /// How you felt after writing (1-5 scale)
    pub mood_after: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Quest this entry auto-completed, if any
    pub satisfied_quest_id: Option<QuestId>,
}

impl JournalEntry {
    pub fn new(entry_type: JournalEntryType, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: JournalEntryId::new(),
            content: content.into(),
            entry_type,
            prompt_used: None,
            created_at: now,
            updated_at: now,
            mood_before: None,
            mood_after: None,
            tags: Vec::new(),
            satisfied_quest_id: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_used = Some(prompt.into());
        self
    }

    pub fn with_mood_before(mut self, mood: u8) -> Self {
        self.mood_before = Some(mood);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Whitespace-tokenized word count.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Whether the entry has meaningful content (at least 10 words).
    pub fn is_substantial(&self) -> bool {
        self.word_count() >= SUBSTANTIAL_WORD_COUNT
    }

    /// Mood change from writing (positive = improved), when both ends were
    /// recorded.
    pub fn mood_change(&self) -> Option<i8> {
        match (self.mood_before, self.mood_after) {
            (Some(before), Some(after)) => Some(after as i8 - before as i8),
            _ => None,
        }
    }

    /// Non-empty lines, used for minimum-item satisfaction checks
    /// (gratitude lists and the like).
    pub fn item_count(&self) -> usize {
        self.content.lines().filter(|l| !l.trim().is_empty()).count()
    }

    pub fn update_content(&mut self, new_content: impl Into<String>, now: DateTime<Utc>) {
        self.content = new_content.into();
        self.updated_at = now;
    }
}
