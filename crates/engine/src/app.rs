//! The application facade. One entry point per player action; each method
//! loads what it needs through the ports, runs the domain rules, and saves
//! everything it changed before returning.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use abitus_domain::{
    default_achievements, Achievement, Character, JournalEntry, JournalEntryId,
    JournalEntryType, Quest, QuestId, QuestStatus, QuestType,
};

use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::ports::{
    AchievementRepo, CharacterRepo, ClockPort, JournalRepo, QuestFilter, QuestRepo, RepoError,
    SettingsRepo,
};
use crate::services::{interview, journal, progression, quest_generator};

pub use crate::services::progression::StatChange;
pub use crate::services::quest_generator::GenerationConstraints;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("No character exists yet")]
    NoCharacter,
    #[error("Quest not found: {0}")]
    QuestNotFound(QuestId),
    #[error("Quest cannot be {action} in its current state")]
    InvalidQuestState { action: &'static str },
}

/// What a quest completion changed, for the UI to celebrate.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub quest: Quest,
    pub stat_changes: Vec<StatChange>,
    pub unlocked_achievements: Vec<String>,
    pub current_streak: u32,
}

/// A recorded journal entry plus the quest it satisfied, if any.
#[derive(Debug, Clone)]
pub struct JournalOutcome {
    pub entry: JournalEntry,
    pub completion: Option<CompletionOutcome>,
}

pub struct Engine {
    character_repo: Arc<dyn CharacterRepo>,
    quest_repo: Arc<dyn QuestRepo>,
    achievement_repo: Arc<dyn AchievementRepo>,
    journal_repo: Arc<dyn JournalRepo>,
    settings_repo: Arc<dyn SettingsRepo>,
    clock: Arc<dyn ClockPort>,
    rng: Mutex<StdRng>,
}

impl Engine {
    pub fn new(store: MemoryStore, clock: Arc<dyn ClockPort>) -> Self {
        Self::with_seed(store, clock, rand::random())
    }

    /// Seeded constructor: quest generation becomes reproducible.
    pub fn with_seed(store: MemoryStore, clock: Arc<dyn ClockPort>, seed: u64) -> Self {
        Self {
            character_repo: Arc::new(store.clone()),
            quest_repo: Arc::new(store.clone()),
            achievement_repo: Arc::new(store.clone()),
            journal_repo: Arc::new(store.clone()),
            settings_repo: Arc::new(store),
            clock,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn rng(&self) -> Result<MutexGuard<'_, StdRng>, EngineError> {
        self.rng
            .lock()
            .map_err(|_| RepoError::Storage("rng mutex poisoned".to_string()).into())
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Character
    // =========================================================================

    /// Returns the character, creating one on first run. First run also
    /// seeds the achievement catalog.
    pub async fn load_or_create_character(
        &self,
        name: &str,
    ) -> Result<Character, EngineError> {
        if let Some(character) = self.character_repo.get().await? {
            return Ok(character);
        }

        let now = self.now();
        let character = Character::new(name, now);
        self.character_repo.save(&character).await?;

        let persisted = self.achievement_repo.list().await?;
        let catalog = progression::merge_catalog(persisted);
        self.achievement_repo.save_many(&catalog).await?;

        tracing::info!(name = %character.name, "character created");
        Ok(character)
    }

    pub async fn character(&self) -> Result<Character, EngineError> {
        self.character_repo
            .get()
            .await?
            .ok_or(EngineError::NoCharacter)
    }

    /// Runs the founding interview: seeds facet scores from the answers and
    /// unlocks the founder achievement. Returns any score keys that were
    /// skipped as unknown.
    pub async fn complete_interview(
        &self,
        answers: &BTreeMap<String, u8>,
    ) -> Result<Vec<String>, EngineError> {
        let mut character = self.character().await?;
        let now = self.now();

        let scores = interview::score_answers(answers);
        let skipped = character.apply_interview_scores(&scores);
        if !skipped.is_empty() {
            tracing::warn!(?skipped, "interview scores with unknown keys skipped");
        }
        character.interview_responses = answers.clone();
        self.character_repo.save(&character).await?;

        let mut achievements = self.achievement_repo.list().await?;
        if let Some(founder) = achievements.iter_mut().find(|a| a.id == "special_founder") {
            founder.unlock(now);
            self.achievement_repo.save(founder).await?;
        }

        tracing::info!(answered = answers.len(), "interview completed");
        Ok(skipped)
    }

    // =========================================================================
    // Quests
    // =========================================================================

    pub async fn quests(&self, filter: QuestFilter) -> Result<Vec<Quest>, EngineError> {
        Ok(self.quest_repo.list(filter).await?)
    }

    async fn quest(&self, id: QuestId) -> Result<Quest, EngineError> {
        self.quest_repo
            .get(id)
            .await?
            .ok_or(EngineError::QuestNotFound(id))
    }

    pub async fn accept_quest(&self, id: QuestId) -> Result<Quest, EngineError> {
        let mut quest = self.quest(id).await?;
        if !quest.accept(self.now()) {
            return Err(EngineError::InvalidQuestState { action: "accepted" });
        }
        self.quest_repo.save(&quest).await?;
        tracing::info!(quest = %quest.title, "quest accepted");
        Ok(quest)
    }

    pub async fn complete_quest(&self, id: QuestId) -> Result<CompletionOutcome, EngineError> {
        let mut quest = self.quest(id).await?;
        self.finalize_completion(&mut quest).await
    }

    pub async fn abandon_quest(&self, id: QuestId) -> Result<Quest, EngineError> {
        let mut quest = self.quest(id).await?;
        if quest.status != QuestStatus::Active {
            return Err(EngineError::InvalidQuestState { action: "abandoned" });
        }
        quest.abandon();
        self.quest_repo.save(&quest).await?;
        Ok(quest)
    }

    /// Adds progress toward a trackable quest's target; when the target is
    /// crossed for the first time the quest completes on the spot.
    pub async fn add_quest_progress(
        &self,
        id: QuestId,
        amount: i64,
    ) -> Result<Option<CompletionOutcome>, EngineError> {
        let mut quest = self.quest(id).await?;
        let crossed = quest.add_progress(amount);
        if crossed && quest.can_complete() {
            return Ok(Some(self.finalize_completion(&mut quest).await?));
        }
        self.quest_repo.save(&quest).await?;
        Ok(None)
    }

    /// Lazy maintenance sweep: fails expired quests, resets weekly counters
    /// at the ISO week boundary, and re-offers recurring quests completed on
    /// an earlier day.
    pub async fn refresh_quests(&self) -> Result<(), EngineError> {
        let now = self.now();
        let mut quests = self.quest_repo.list(QuestFilter::default()).await?;
        let mut changed = Vec::new();

        for quest in quests.iter_mut() {
            let before = quest.clone();
            quest.fail_if_expired(now);
            quest.check_weekly_reset(now);
            let completed_earlier_day = quest
                .last_completed
                .is_some_and(|last| last.date_naive() < now.date_naive());
            if completed_earlier_day {
                quest.reset_for_recurrence();
            }
            if *quest != before {
                changed.push(quest.clone());
            }
        }

        if !changed.is_empty() {
            tracing::debug!(count = changed.len(), "quests refreshed");
            self.quest_repo.save_many(&changed).await?;
        }

        // With a character in play, keep one weekly quest on offer and roll
        // for a surprise quest when none is pending
        if let Some(character) = self.character_repo.get().await? {
            let quests = self.quest_repo.list(QuestFilter::default()).await?;
            let has_weekly = quests.iter().any(|q| {
                q.quest_type == QuestType::Weekly
                    && matches!(q.status, QuestStatus::Available | QuestStatus::Active)
            });
            if !has_weekly {
                let weekly = {
                    let mut rng = self.rng()?;
                    quest_generator::generate_weekly_quest(&character, &mut *rng, now)
                };
                tracing::info!(quest = %weekly.title, "weekly quest offered");
                self.quest_repo.save(&weekly).await?;
            }

            let has_pending_random = quests.iter().any(|q| {
                q.quest_type == QuestType::Random && q.status == QuestStatus::Available
            });
            if !has_pending_random {
                self.maybe_spawn_random_encounter().await?;
            }
        }
        Ok(())
    }

    /// Generates today's quest offers within the character's time and
    /// challenge preferences, and stores them as available.
    pub async fn generate_daily_quests(&self, count: usize) -> Result<Vec<Quest>, EngineError> {
        let character = self.character().await?;
        let constraints = GenerationConstraints {
            challenge_level: character.challenge_level,
            available_time_minutes: character.available_time_minutes,
        };
        let now = self.now();
        let batch = {
            let mut rng = self.rng()?;
            quest_generator::generate_daily_batch(&character, count, &constraints, &mut *rng, now)
        };
        self.quest_repo.save_many(&batch).await?;
        Ok(batch)
    }

    pub async fn clear_completed_quests(&self) -> Result<usize, EngineError> {
        Ok(self.quest_repo.clear_completed().await?)
    }

    /// Rolls the surprise-quest chance; on a hit, stores and returns a bonus
    /// quest with a four hour window.
    pub async fn maybe_spawn_random_encounter(&self) -> Result<Option<Quest>, EngineError> {
        let now = self.now();
        let quest = {
            let mut rng = self.rng()?;
            if !quest_generator::should_spawn_random_encounter(&mut *rng) {
                return Ok(None);
            }
            quest_generator::generate_random_encounter(&mut *rng, now)
        };
        self.quest_repo.save(&quest).await?;
        tracing::info!(quest = %quest.title, "random encounter spawned");
        Ok(Some(quest))
    }

    /// Offers a thirty day epic quest aimed at the character's most
    /// neglected stat.
    pub async fn generate_epic_quest(&self) -> Result<Quest, EngineError> {
        let character = self.character().await?;
        let now = self.now();
        let quest = {
            let mut rng = self.rng()?;
            quest_generator::generate_epic_quest(&character, &mut *rng, now)
        };
        self.quest_repo.save(&quest).await?;
        tracing::info!(quest = %quest.title, "epic quest offered");
        Ok(quest)
    }

    /// Offers a short special quest matched to the current time of day, if
    /// any template fits.
    pub async fn generate_special_quest(&self) -> Result<Option<Quest>, EngineError> {
        let now = self.now();
        let trigger = quest_generator::time_based_trigger(now);
        let quest = {
            let mut rng = self.rng()?;
            quest_generator::generate_special_quest(trigger, &mut *rng, now)
        };
        if let Some(quest) = &quest {
            self.quest_repo.save(quest).await?;
            tracing::info!(quest = %quest.title, ?trigger, "special quest offered");
        }
        Ok(quest)
    }

    /// Shared completion path: routes rewards into stats, updates the
    /// streak, re-evaluates achievements, and saves everything touched.
    async fn finalize_completion(
        &self,
        quest: &mut Quest,
    ) -> Result<CompletionOutcome, EngineError> {
        let now = self.now();
        let rewards = quest.complete(now);
        if rewards.is_empty() {
            return Err(EngineError::InvalidQuestState { action: "completed" });
        }

        let mut character = self.character().await?;
        let stat_changes = progression::apply_rewards(&mut character, &rewards);
        character.record_quest_completion(now);

        let mut achievements = self.achievement_repo.list().await?;
        let unlocked = progression::evaluate_achievements(&character, &mut achievements, now);

        self.quest_repo.save(quest).await?;
        self.character_repo.save(&character).await?;
        self.achievement_repo.save_many(&achievements).await?;

        tracing::info!(
            quest = %quest.title,
            xp = quest.total_xp(),
            streak = character.current_streak,
            "quest completed"
        );

        Ok(CompletionOutcome {
            quest: quest.clone(),
            stat_changes,
            unlocked_achievements: unlocked,
            current_streak: character.current_streak,
        })
    }

    // =========================================================================
    // Journal
    // =========================================================================

    pub async fn journal_entries(&self) -> Result<Vec<JournalEntry>, EngineError> {
        let mut entries = self.journal_repo.list().await?;
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    /// Records a journal entry and completes the oldest active quest it
    /// satisfies, linking the two.
    pub async fn record_journal_entry(
        &self,
        entry_type: JournalEntryType,
        content: &str,
    ) -> Result<JournalOutcome, EngineError> {
        let now = self.now();
        let mut entry = JournalEntry::new(entry_type, content, now);

        let mut active = self
            .quest_repo
            .list(QuestFilter::with_status(QuestStatus::Active))
            .await?;
        active.sort_by_key(|q| q.created_at);

        let satisfiable = journal::find_satisfiable_quests(&active, &entry);
        let completion = match satisfiable.first().copied() {
            Some(matched) => {
                let mut quest = matched.clone();
                entry.satisfied_quest_id = Some(quest.id);
                let outcome = self.finalize_completion(&mut quest).await?;
                tracing::info!(quest = %outcome.quest.title, "quest satisfied by journal entry");
                Some(outcome)
            }
            None => None,
        };

        self.journal_repo.save(&entry).await?;
        Ok(JournalOutcome { entry, completion })
    }

    pub async fn delete_journal_entry(&self, id: JournalEntryId) -> Result<(), EngineError> {
        Ok(self.journal_repo.delete(id).await?)
    }

    /// Consecutive calendar days with at least one journal entry, counted
    /// backward from today.
    pub async fn journal_streak(&self) -> Result<u32, EngineError> {
        let entries = self.journal_repo.list().await?;
        Ok(journal::journal_streak(&entries, self.now().date_naive()))
    }

    pub async fn journal_stats(&self) -> Result<journal::EntryStats, EngineError> {
        let entries = self.journal_repo.list().await?;
        Ok(journal::entry_stats(&entries, self.now()))
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn setting(&self, key: &str) -> Result<Option<String>, EngineError> {
        Ok(self.settings_repo.get(key).await?)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), EngineError> {
        Ok(self.settings_repo.set(key, value).await?)
    }

    // =========================================================================
    // Achievements / reset
    // =========================================================================

    pub async fn achievements(&self) -> Result<Vec<Achievement>, EngineError> {
        Ok(self.achievement_repo.list().await?)
    }

    /// Wipes every store back to a fresh state. The achievement catalog is
    /// restored last so a fresh character starts with it in place.
    pub async fn reset_all(&self) -> Result<(), EngineError> {
        self.character_repo.delete().await?;
        for quest in self.quest_repo.list(QuestFilter::default()).await? {
            self.quest_repo.delete(quest.id).await?;
        }
        for entry in self.journal_repo.list().await? {
            self.journal_repo.delete(entry.id).await?;
        }
        self.settings_repo.clear().await?;
        self.achievement_repo
            .save_many(&default_achievements())
            .await?;
        tracing::warn!("all progress reset");
        Ok(())
    }
}
