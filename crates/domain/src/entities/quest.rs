//! Quest entity - lifecycle state machine and satisfaction policy.
//!
//! Status flow: `Available → Active → Completed`, with `Active → Available`
//! on abandon. Expiry is checked lazily against an injected `now`; there is
//! no background scheduler. `Locked` is an inert entry state for chained
//! quests; the chain fields are persisted but no unlock transition exists
//! yet.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::journal::JournalEntryType;
use crate::ids::QuestId;
use crate::value_objects::{StatType, SubFacetType};

/// Types of quests with different time commitments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    /// 5-15 min, repeatable
    #[default]
    Daily,
    /// Medium commitment
    Weekly,
    /// Multi-week pursuit
    Epic,
    /// Surprise encounters
    Random,
    /// Collaborative goals
    Party,
}

impl QuestType {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Daily => "🗡️",
            Self::Weekly => "🛡️",
            Self::Epic => "🏰",
            Self::Random => "🎲",
            Self::Party => "👥",
        }
    }
}

/// Quest completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Can be accepted
    #[default]
    Available,
    /// Currently in progress
    Active,
    /// Successfully finished
    Completed,
    /// Expired or abandoned permanently
    Failed,
    /// Not yet unlocked (chained quests)
    Locked,
}

/// How a quest can be satisfied/completed.
///
/// `app_*` variants are reserved for future external-service integrations;
/// they deserialize and persist but never auto-satisfy. Unknown persisted
/// values fall back to `Manual` rather than failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionType {
    /// Any journal entry
    JournalAny,
    /// Gratitude entry
    JournalGratitude,
    /// Reflection entry
    JournalReflection,
    /// Emotional check-in entry
    JournalEmotion,
    /// Goal setting entry
    JournalGoal,
    /// Lesson learned entry
    JournalLesson,
    // Future app integrations
    AppDuolingo,
    AppStrava,
    AppFitbit,
    AppHeadspace,
    AppCustom,
    /// User marks complete manually. Kept last: `#[serde(other)]` must sit
    /// on the final unit variant.
    #[default]
    #[serde(other)]
    Manual,
}

impl SatisfactionType {
    /// The satisfaction type a journal entry of the given type maps to.
    pub fn for_journal_entry(entry_type: JournalEntryType) -> SatisfactionType {
        match entry_type {
            JournalEntryType::FreeForm => Self::JournalAny,
            JournalEntryType::Gratitude => Self::JournalGratitude,
            JournalEntryType::Reflection => Self::JournalReflection,
            JournalEntryType::Emotion => Self::JournalEmotion,
            JournalEntryType::Goal => Self::JournalGoal,
            JournalEntryType::Lesson => Self::JournalLesson,
        }
    }

    /// Whether this quest completes via a journal entry.
    pub fn is_journal(&self) -> bool {
        matches!(
            self,
            Self::JournalAny
                | Self::JournalGratitude
                | Self::JournalReflection
                | Self::JournalEmotion
                | Self::JournalGoal
                | Self::JournalLesson
        )
    }
}

/// Requirements a journal entry must meet to satisfy a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionConfig {
    /// Reject entries with fewer words than this
    pub min_words: Option<u32>,
    /// Reject entries with fewer newline/bullet-separated items than this
    pub min_items: Option<u32>,
    /// Reject entries below the substantial-content threshold (10 words)
    #[serde(default = "default_require_substantial")]
    pub require_substantial: bool,
}

fn default_require_substantial() -> bool {
    true
}

impl Default for SatisfactionConfig {
    fn default() -> Self {
        Self {
            min_words: None,
            min_items: None,
            require_substantial: true,
        }
    }
}

impl SatisfactionConfig {
    pub fn with_min_words(mut self, words: u32) -> Self {
        self.min_words = Some(words);
        self
    }

    pub fn with_min_items(mut self, items: u32) -> Self {
        self.min_items = Some(items);
        self
    }
}

/// A quest that rewards XP for completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,

    // Identity
    pub title: String,
    pub description: String,
    pub icon: String,

    // Type and status
    pub quest_type: QuestType,
    pub status: QuestStatus,

    // Rewards
    pub primary_stat: StatType,
    pub xp_reward: i64,
    #[serde(default)]
    pub secondary_rewards: BTreeMap<StatType, i64>,
    /// Which sub-facets the reward XP should favor (advisory; storage fidelity)
    #[serde(default)]
    pub target_subfacets: BTreeSet<SubFacetType>,

    // Requirements
    pub duration_minutes: u32,
    /// 1-5 scale
    pub difficulty: u8,

    // Timing
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,

    // Recurrence for daily quests
    #[serde(default)]
    pub is_recurring: bool,
    pub last_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub times_completed: u32,

    // Quest chain support (stored, no unlock logic yet)
    pub chain_id: Option<String>,
    #[serde(default)]
    pub chain_order: u32,
    pub prerequisite_quest_id: Option<QuestId>,

    // Satisfaction/auto-completion
    #[serde(default)]
    pub satisfied_by: SatisfactionType,
    #[serde(default)]
    pub satisfaction_config: SatisfactionConfig,

    // Custom quest / weekly-repeatable support
    #[serde(default)]
    pub is_custom: bool,
    /// Completions wanted per week; 0 disables weekly repetition
    #[serde(default)]
    pub weekly_target: u32,
    #[serde(default)]
    pub weekly_completions: u32,

    // Progress tracking
    #[serde(default)]
    pub progress_trackable: bool,
    #[serde(default)]
    pub progress_current: i64,
    #[serde(default)]
    pub progress_target: i64,
    #[serde(default = "default_progress_unit")]
    pub progress_unit: String,
}

fn default_progress_unit() -> String {
    "units".to_string()
}

impl Quest {
    pub fn new(
        title: impl Into<String>,
        quest_type: QuestType,
        primary_stat: StatType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QuestId::new(),
            title: title.into(),
            description: String::new(),
            icon: "⚔️".to_string(),
            quest_type,
            status: QuestStatus::Available,
            primary_stat,
            xp_reward: 10,
            secondary_rewards: BTreeMap::new(),
            target_subfacets: BTreeSet::new(),
            duration_minutes: 15,
            difficulty: 1,
            created_at: now,
            accepted_at: None,
            completed_at: None,
            expires_at: None,
            is_recurring: false,
            last_completed: None,
            times_completed: 0,
            chain_id: None,
            chain_order: 0,
            prerequisite_quest_id: None,
            satisfied_by: SatisfactionType::Manual,
            satisfaction_config: SatisfactionConfig::default(),
            is_custom: false,
            weekly_target: 0,
            weekly_completions: 0,
            progress_trackable: false,
            progress_current: 0,
            progress_target: 0,
            progress_unit: default_progress_unit(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_xp_reward(mut self, xp: i64) -> Self {
        self.xp_reward = xp;
        self
    }

    pub fn with_secondary_reward(mut self, stat: StatType, xp: i64) -> Self {
        self.secondary_rewards.insert(stat, xp);
        self
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_satisfaction(
        mut self,
        satisfied_by: SatisfactionType,
        config: SatisfactionConfig,
    ) -> Self {
        self.satisfied_by = satisfied_by;
        self.satisfaction_config = config;
        self
    }

    pub fn with_target_subfacets(
        mut self,
        facets: impl IntoIterator<Item = SubFacetType>,
    ) -> Self {
        self.target_subfacets = facets.into_iter().collect();
        self
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    /// Marks this a user-authored quest repeatable `weekly_target` times a week.
    pub fn custom_weekly(mut self, weekly_target: u32) -> Self {
        self.is_custom = true;
        self.weekly_target = weekly_target;
        self
    }

    pub fn with_progress_target(mut self, target: i64, unit: impl Into<String>) -> Self {
        self.progress_trackable = true;
        self.progress_target = target;
        self.progress_unit = unit.into();
        self
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// Lazily evaluated expiry - pure function of the injected wall clock.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    pub fn can_accept(&self, now: DateTime<Utc>) -> bool {
        self.status == QuestStatus::Available && !self.is_expired(now)
    }

    pub fn can_complete(&self) -> bool {
        self.status == QuestStatus::Active
    }

    /// Total XP from all rewards.
    pub fn total_xp(&self) -> i64 {
        self.xp_reward + self.secondary_rewards.values().sum::<i64>()
    }

    pub fn is_auto_completable(&self) -> bool {
        self.satisfied_by != SatisfactionType::Manual
    }

    /// Whether this quest is satisfied by a journal entry.
    pub fn requires_journal(&self) -> bool {
        self.satisfied_by.is_journal()
    }

    pub fn difficulty_stars(&self) -> String {
        let filled = usize::from(self.difficulty.min(5));
        "★".repeat(filled) + &"☆".repeat(5 - filled)
    }

    /// Human-readable description of how to satisfy this quest.
    pub fn satisfaction_description(&self) -> String {
        let mut desc = match self.satisfied_by {
            SatisfactionType::Manual => "Mark as complete when done",
            SatisfactionType::JournalAny => "Write a journal entry",
            SatisfactionType::JournalGratitude => "Write a gratitude entry",
            SatisfactionType::JournalReflection => "Write a reflection",
            SatisfactionType::JournalEmotion => "Write an emotional check-in",
            SatisfactionType::JournalGoal => "Set a goal in your journal",
            SatisfactionType::JournalLesson => "Record a lesson learned",
            SatisfactionType::AppDuolingo => "Complete a Duolingo lesson",
            SatisfactionType::AppStrava => "Log a Strava activity",
            SatisfactionType::AppFitbit => "Log Fitbit activity",
            SatisfactionType::AppHeadspace => "Complete a Headspace session",
            SatisfactionType::AppCustom => "Via connected app",
        }
        .to_string();

        if let Some(min_words) = self.satisfaction_config.min_words {
            desc.push_str(&format!(" (min {min_words} words)"));
        }
        if let Some(min_items) = self.satisfaction_config.min_items {
            desc.push_str(&format!(" (at least {min_items} items)"));
        }
        desc
    }

    /// Whether a journal entry of the given type would satisfy this quest.
    ///
    /// `JournalAny` accepts every entry type; a specific `journal_*` type
    /// requires an exact match; `manual` and `app_*` never match.
    pub fn can_be_satisfied_by_journal(&self, entry_type: JournalEntryType) -> bool {
        if !self.requires_journal() {
            return false;
        }
        if self.satisfied_by == SatisfactionType::JournalAny {
            return true;
        }
        SatisfactionType::for_journal_entry(entry_type) == self.satisfied_by
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Accept the quest. No-op (returns false) unless available and unexpired.
    pub fn accept(&mut self, now: DateTime<Utc>) -> bool {
        if !self.can_accept(now) {
            return false;
        }
        self.status = QuestStatus::Active;
        self.accepted_at = Some(now);
        true
    }

    /// Complete the quest and return the merged XP rewards per stat.
    ///
    /// Returns an empty map (and mutates nothing) when the quest is not
    /// active. Weekly-repeatable quests that have not hit their target
    /// revert to `Available` so they can be completed again this week.
    pub fn complete(&mut self, now: DateTime<Utc>) -> BTreeMap<StatType, i64> {
        if !self.can_complete() {
            return BTreeMap::new();
        }

        self.status = QuestStatus::Completed;
        self.completed_at = Some(now);
        self.last_completed = Some(now);
        self.times_completed += 1;

        let mut rewards = BTreeMap::new();
        rewards.insert(self.primary_stat, self.xp_reward);
        for (stat, xp) in &self.secondary_rewards {
            *rewards.entry(*stat).or_insert(0) += xp;
        }

        if self.weekly_target > 0 {
            self.weekly_completions += 1;
            if self.weekly_completions < self.weekly_target {
                // Target unmet: make it completable again this week
                self.status = QuestStatus::Available;
                self.accepted_at = None;
                self.completed_at = None;
            }
        }

        rewards
    }

    /// Abandon an active quest, reverting it to available.
    pub fn abandon(&mut self) {
        if self.status == QuestStatus::Active {
            self.status = QuestStatus::Available;
            self.accepted_at = None;
        }
    }

    /// Reset a recurring quest for the next day.
    pub fn reset_for_recurrence(&mut self) {
        if self.is_recurring && self.status == QuestStatus::Completed {
            self.status = QuestStatus::Available;
            self.accepted_at = None;
            self.completed_at = None;
        }
    }

    /// Lazily marks an expired non-terminal quest as failed. Returns whether
    /// the transition happened.
    pub fn fail_if_expired(&mut self, now: DateTime<Utc>) -> bool {
        let non_terminal =
            matches!(self.status, QuestStatus::Available | QuestStatus::Active);
        if non_terminal && self.is_expired(now) {
            self.status = QuestStatus::Failed;
            return true;
        }
        false
    }

    /// Resets the weekly completion counter when the ISO week (Monday start)
    /// has rolled over since the last completion.
    pub fn check_weekly_reset(&mut self, now: DateTime<Utc>) {
        if self.weekly_target == 0 {
            return;
        }
        if let Some(last) = self.last_completed {
            let last_week = (last.iso_week().year(), last.iso_week().week());
            let this_week = (now.iso_week().year(), now.iso_week().week());
            if last_week != this_week {
                self.weekly_completions = 0;
            }
        }
    }

    /// Accumulates progress on an active quest. Returns true only when this
    /// call crosses the target for the first time (edge-triggered, never
    /// re-fires).
    pub fn add_progress(&mut self, amount: i64) -> bool {
        if self.status != QuestStatus::Active
            || !self.progress_trackable
            || self.progress_target <= 0
        {
            return false;
        }
        let was_met = self.progress_current >= self.progress_target;
        self.progress_current += amount;
        !was_met && self.progress_current >= self.progress_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid timestamp")
    }

    fn quest(now: DateTime<Utc>) -> Quest {
        Quest::new("Morning run", QuestType::Daily, StatType::Vitality, now)
            .with_xp_reward(20)
            .with_secondary_reward(StatType::Spirit, 5)
    }

    #[test]
    fn test_accept_only_from_available() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now);

        assert!(q.accept(now));
        assert_eq!(q.status, QuestStatus::Active);
        assert_eq!(q.accepted_at, Some(now));

        // Second accept is a no-op
        assert!(!q.accept(now));
        assert_eq!(q.status, QuestStatus::Active);
    }

    #[test]
    fn test_accept_refuses_expired() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now).with_expiry(at("2025-03-01T07:00:00Z"));
        assert!(!q.accept(now));
        assert_eq!(q.status, QuestStatus::Available);
    }

    #[test]
    fn test_complete_requires_active() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now);

        // Never accepted: empty rewards, nothing mutated
        let rewards = q.complete(now);
        assert!(rewards.is_empty());
        assert_eq!(q.times_completed, 0);
        assert_eq!(q.status, QuestStatus::Available);
    }

    #[test]
    fn test_complete_merges_rewards() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now).with_secondary_reward(StatType::Vitality, 7);
        q.accept(now);

        let rewards = q.complete(now);
        // Primary 20 + secondary 7 on the same stat are summed
        assert_eq!(rewards[&StatType::Vitality], 27);
        assert_eq!(rewards[&StatType::Spirit], 5);
        assert_eq!(q.status, QuestStatus::Completed);
        assert_eq!(q.times_completed, 1);
        assert_eq!(q.completed_at, Some(now));
    }

    #[test]
    fn test_abandon_reverts_to_available() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now);
        q.accept(now);
        q.abandon();
        assert_eq!(q.status, QuestStatus::Available);
        assert_eq!(q.accepted_at, None);

        // Abandon when not active is inert
        q.abandon();
        assert_eq!(q.status, QuestStatus::Available);
    }

    #[test]
    fn test_locked_quest_cannot_be_accepted() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now);
        q.status = QuestStatus::Locked;
        assert!(!q.accept(now));
        assert_eq!(q.status, QuestStatus::Locked);
    }

    #[test]
    fn test_fail_if_expired_lazy_transition() {
        let now = at("2025-03-02T08:00:00Z");
        let created = at("2025-03-01T08:00:00Z");
        let mut q = quest(created).with_expiry(at("2025-03-01T20:00:00Z"));
        q.accept(created);

        assert!(q.fail_if_expired(now));
        assert_eq!(q.status, QuestStatus::Failed);
        // Terminal state: no re-fire
        assert!(!q.fail_if_expired(now));
    }

    #[test]
    fn test_weekly_repeatable_reverts_until_target_met() {
        let now = at("2025-03-03T08:00:00Z"); // a Monday
        let mut q = quest(now).custom_weekly(3);

        for i in 1..3 {
            q.accept(now);
            let rewards = q.complete(now);
            assert!(!rewards.is_empty());
            assert_eq!(q.weekly_completions, i);
            // Target unmet: back to available with cleared stamps
            assert_eq!(q.status, QuestStatus::Available);
            assert_eq!(q.accepted_at, None);
            assert_eq!(q.completed_at, None);
        }

        q.accept(now);
        q.complete(now);
        assert_eq!(q.weekly_completions, 3);
        assert_eq!(q.status, QuestStatus::Completed);
    }

    #[test]
    fn test_weekly_reset_at_iso_week_boundary() {
        let monday = at("2025-03-03T08:00:00Z");
        let sunday = at("2025-03-09T23:00:00Z");
        let next_monday = at("2025-03-10T01:00:00Z");

        let mut q = quest(monday).custom_weekly(5);
        q.accept(monday);
        q.complete(monday);
        assert_eq!(q.weekly_completions, 1);

        // Same ISO week: counter survives
        q.check_weekly_reset(sunday);
        assert_eq!(q.weekly_completions, 1);

        // New ISO week (Monday start): counter resets
        q.check_weekly_reset(next_monday);
        assert_eq!(q.weekly_completions, 0);
    }

    #[test]
    fn test_add_progress_edge_triggered() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now).with_progress_target(10, "pages");
        q.accept(now);

        assert!(!q.add_progress(4));
        assert!(!q.add_progress(5));
        // Crosses 10 here, exactly once
        assert!(q.add_progress(1));
        assert!(!q.add_progress(5));
        assert_eq!(q.progress_current, 15);
    }

    #[test]
    fn test_add_progress_requires_active_quest() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now).with_progress_target(10, "pages");

        // Not accepted yet: nothing accumulates, the trigger stays armed
        assert!(!q.add_progress(12));
        assert_eq!(q.progress_current, 0);

        q.accept(now);
        assert!(q.add_progress(12));
        assert_eq!(q.progress_current, 12);
    }

    #[test]
    fn test_add_progress_ignored_when_not_trackable() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now);
        assert!(!q.add_progress(100));
        assert_eq!(q.progress_current, 0);
    }

    #[test]
    fn test_journal_satisfaction_type_matching() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = quest(now);

        q.satisfied_by = SatisfactionType::JournalGratitude;
        assert!(q.can_be_satisfied_by_journal(JournalEntryType::Gratitude));
        assert!(!q.can_be_satisfied_by_journal(JournalEntryType::FreeForm));
        assert!(!q.can_be_satisfied_by_journal(JournalEntryType::Reflection));

        q.satisfied_by = SatisfactionType::JournalAny;
        assert!(q.can_be_satisfied_by_journal(JournalEntryType::FreeForm));
        assert!(q.can_be_satisfied_by_journal(JournalEntryType::Gratitude));

        q.satisfied_by = SatisfactionType::Manual;
        assert!(!q.can_be_satisfied_by_journal(JournalEntryType::Gratitude));

        q.satisfied_by = SatisfactionType::AppStrava;
        assert!(!q.can_be_satisfied_by_journal(JournalEntryType::Gratitude));
    }

    #[test]
    fn test_serde_roundtrip_populated() {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = Quest::new("Read a chapter", QuestType::Weekly, StatType::Intellect, now)
            .with_description("Any book counts")
            .with_icon("📖")
            .with_xp_reward(100)
            .with_secondary_reward(StatType::Mastery, 25)
            .with_difficulty(3)
            .with_expiry(at("2025-03-08T08:00:00Z"))
            .with_satisfaction(
                SatisfactionType::JournalReflection,
                SatisfactionConfig::default().with_min_words(20),
            )
            .with_target_subfacets([SubFacetType::Learning, SubFacetType::Focus])
            .with_progress_target(7, "chapters")
            .custom_weekly(2);
        q.accept(now);

        let json = serde_json::to_string(&q).unwrap();
        let parsed: Quest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, q);
    }

    #[test]
    fn test_deserialize_backfills_extended_fields() {
        // A row persisted before custom/progress fields existed
        let json = r#"{
            "id": "7b3e3a9e-1f6a-4f7e-9c39-0a5b8e6b1c1d",
            "title": "Old quest",
            "description": "",
            "icon": "⚔️",
            "quest_type": "daily",
            "status": "available",
            "primary_stat": "intellect",
            "xp_reward": 10,
            "duration_minutes": 15,
            "difficulty": 1,
            "created_at": "2025-03-01T08:00:00Z"
        }"#;
        let q: Quest = serde_json::from_str(json).unwrap();
        assert!(!q.is_custom);
        assert_eq!(q.weekly_target, 0);
        assert_eq!(q.progress_unit, "units");
        assert_eq!(q.satisfied_by, SatisfactionType::Manual);
        assert!(q.satisfaction_config.require_substantial);
    }

    #[test]
    fn test_unknown_satisfaction_type_falls_back_to_manual() {
        let parsed: SatisfactionType =
            serde_json::from_str("\"app_future_thing\"").unwrap();
        assert_eq!(parsed, SatisfactionType::Manual);
    }

    #[test]
    fn test_satisfaction_description_includes_config() {
        let now = at("2025-03-01T08:00:00Z");
        let q = quest(now).with_satisfaction(
            SatisfactionType::JournalGratitude,
            SatisfactionConfig::default().with_min_words(20).with_min_items(3),
        );
        let desc = q.satisfaction_description();
        assert!(desc.contains("gratitude"));
        assert!(desc.contains("min 20 words"));
        assert!(desc.contains("at least 3 items"));
    }
}
