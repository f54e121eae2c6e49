//! In-memory store backing all repos. The default backend for tests and the
//! seed for a future file-backed adapter: it already owns the full persisted
//! shape, a JSON store only has to serialize `StoreState`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use abitus_domain::{
    Achievement, Character, JournalEntry, JournalEntryId, Quest, QuestId, QuestStatus,
};

use crate::infrastructure::ports::{
    AchievementRepo, CharacterRepo, JournalRepo, QuestFilter, QuestRepo, RepoError,
    SettingsRepo,
};

/// Everything the engine persists, in one serializable struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreState {
    pub character: Option<Character>,
    pub quests: BTreeMap<QuestId, Quest>,
    /// Keyed by catalog id
    pub achievements: BTreeMap<String, Achievement>,
    pub journal: BTreeMap<JournalEntryId, JournalEntry>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// Shared in-memory store. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Snapshot of the full state, for serialization or inspection.
    pub fn snapshot(&self) -> Result<StoreState, RepoError> {
        Ok(self.lock()?.clone())
    }

    /// Drops everything. All-or-nothing by construction: one state, one lock.
    pub fn clear(&self) -> Result<(), RepoError> {
        *self.lock()? = StoreState::default();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepoError> {
        self.state
            .lock()
            .map_err(|_| RepoError::Storage("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl CharacterRepo for MemoryStore {
    async fn get(&self) -> Result<Option<Character>, RepoError> {
        Ok(self.lock()?.character.clone())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.lock()?.character = Some(character.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<(), RepoError> {
        self.lock()?.character = None;
        Ok(())
    }
}

#[async_trait]
impl QuestRepo for MemoryStore {
    async fn get(&self, id: QuestId) -> Result<Option<Quest>, RepoError> {
        Ok(self.lock()?.quests.get(&id).cloned())
    }

    async fn save(&self, quest: &Quest) -> Result<(), RepoError> {
        self.lock()?.quests.insert(quest.id, quest.clone());
        Ok(())
    }

    async fn save_many(&self, quests: &[Quest]) -> Result<(), RepoError> {
        let mut state = self.lock()?;
        for quest in quests {
            state.quests.insert(quest.id, quest.clone());
        }
        Ok(())
    }

    async fn list(&self, filter: QuestFilter) -> Result<Vec<Quest>, RepoError> {
        Ok(self
            .lock()?
            .quests
            .values()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: QuestId) -> Result<(), RepoError> {
        self.lock()?.quests.remove(&id);
        Ok(())
    }

    async fn clear_completed(&self) -> Result<usize, RepoError> {
        let mut state = self.lock()?;
        let before = state.quests.len();
        state
            .quests
            .retain(|_, q| q.status != QuestStatus::Completed || q.is_recurring);
        Ok(before - state.quests.len())
    }
}

#[async_trait]
impl AchievementRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Achievement>, RepoError> {
        Ok(self.lock()?.achievements.values().cloned().collect())
    }

    async fn save(&self, achievement: &Achievement) -> Result<(), RepoError> {
        self.lock()?
            .achievements
            .insert(achievement.id.clone(), achievement.clone());
        Ok(())
    }

    async fn save_many(&self, achievements: &[Achievement]) -> Result<(), RepoError> {
        let mut state = self.lock()?;
        for achievement in achievements {
            state
                .achievements
                .insert(achievement.id.clone(), achievement.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl JournalRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<JournalEntry>, RepoError> {
        // BTreeMap order is id order; callers sort by created_at when shown
        Ok(self.lock()?.journal.values().cloned().collect())
    }

    async fn get(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, RepoError> {
        Ok(self.lock()?.journal.get(&id).cloned())
    }

    async fn save(&self, entry: &JournalEntry) -> Result<(), RepoError> {
        self.lock()?.journal.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn delete(&self, id: JournalEntryId) -> Result<(), RepoError> {
        self.lock()?.journal.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SettingsRepo for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError> {
        Ok(self.lock()?.settings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepoError> {
        self.lock()?
            .settings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepoError> {
        self.lock()?.settings.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abitus_domain::{QuestType, StatType};
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid timestamp")
    }

    // The store implements every repo trait, so same-named methods need
    // fully qualified calls here. Production code goes through Arc<dyn ...>
    // handles and never hits this.

    #[tokio::test]
    async fn test_quest_filter_listing() {
        let store = MemoryStore::new();
        let now = at("2025-03-01T08:00:00Z");

        let mut active = Quest::new("Run", QuestType::Daily, StatType::Vitality, now);
        active.accept(now);
        let available = Quest::new("Read", QuestType::Weekly, StatType::Intellect, now);
        QuestRepo::save_many(&store, &[active.clone(), available.clone()])
            .await
            .unwrap();

        let all = QuestRepo::list(&store, QuestFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let active_only = QuestRepo::list(&store, QuestFilter::with_status(QuestStatus::Active))
            .await
            .unwrap();
        assert_eq!(active_only.len(), 1);
        assert_eq!(active_only[0].id, active.id);
    }

    #[tokio::test]
    async fn test_clear_completed_keeps_recurring() {
        let store = MemoryStore::new();
        let now = at("2025-03-01T08:00:00Z");

        let mut done = Quest::new("Run", QuestType::Daily, StatType::Vitality, now);
        done.accept(now);
        done.complete(now);
        let mut done_recurring =
            Quest::new("Stretch", QuestType::Daily, StatType::Vitality, now).recurring();
        done_recurring.accept(now);
        done_recurring.complete(now);
        QuestRepo::save_many(&store, &[done, done_recurring]).await.unwrap();

        let removed = store.clear_completed().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            QuestRepo::list(&store, QuestFilter::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_snapshot_roundtrips_through_json() {
        let store = MemoryStore::new();
        let now = at("2025-03-01T08:00:00Z");
        QuestRepo::save(
            &store,
            &Quest::new("Run", QuestType::Daily, StatType::Vitality, now),
        )
        .await
        .unwrap();

        let snapshot = store.snapshot().unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: StoreState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.quests.len(), 1);
        assert!(restored.character.is_none());
    }
}
