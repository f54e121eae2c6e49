//! Journal satisfaction matching: deciding whether a written entry
//! completes an active journal-bound quest, plus the journaling streak.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use abitus_domain::{JournalEntry, JournalEntryType, Quest, QuestStatus};

/// Why an entry did not satisfy a quest. Surfaced to the UI so the player
/// knows what to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatisfactionCheck {
    Satisfied,
    /// Quest is not active or not journal-bound
    NotApplicable,
    WrongEntryType,
    TooFewWords { needed: u32, got: u32 },
    TooFewItems { needed: u32, got: u32 },
    NotSubstantial { needed: u32, got: u32 },
}

impl SatisfactionCheck {
    pub fn is_satisfied(&self) -> bool {
        *self == Self::Satisfied
    }
}

/// Checks one entry against one quest. Only active quests with a journal
/// satisfaction type can match; the entry then has to pass the quest's
/// word, item, and substance requirements.
pub fn check_satisfaction(quest: &Quest, entry: &JournalEntry) -> SatisfactionCheck {
    if quest.status != QuestStatus::Active || !quest.requires_journal() {
        return SatisfactionCheck::NotApplicable;
    }
    if !quest.can_be_satisfied_by_journal(entry.entry_type) {
        return SatisfactionCheck::WrongEntryType;
    }

    let config = &quest.satisfaction_config;
    let words = entry.word_count() as u32;

    if let Some(min_words) = config.min_words {
        if words < min_words {
            return SatisfactionCheck::TooFewWords {
                needed: min_words,
                got: words,
            };
        }
    }
    if let Some(min_items) = config.min_items {
        let items = entry.item_count() as u32;
        if items < min_items {
            return SatisfactionCheck::TooFewItems {
                needed: min_items,
                got: items,
            };
        }
    }
    if config.require_substantial && !entry.is_substantial() {
        return SatisfactionCheck::NotSubstantial {
            needed: abitus_domain::SUBSTANTIAL_WORD_COUNT as u32,
            got: words,
        };
    }

    SatisfactionCheck::Satisfied
}

/// Every quest this entry would satisfy, in the order given. Callers pass
/// quests sorted oldest first so long-waiting quests win.
pub fn find_satisfiable_quests<'a>(
    quests: &'a [Quest],
    entry: &JournalEntry,
) -> Vec<&'a Quest> {
    quests
        .iter()
        .filter(|quest| check_satisfaction(quest, entry).is_satisfied())
        .collect()
}

/// Consecutive calendar days with at least one entry, walking backward
/// from today until the first gap. No entry today means no streak.
pub fn journal_streak(entries: &[JournalEntry], today: NaiveDate) -> u32 {
    let days: std::collections::BTreeSet<NaiveDate> =
        entries.iter().map(|e| e.created_at.date_naive()).collect();

    let mut streak = 0u32;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Average mood change across recent entries that recorded both moods.
/// Positive means writing tends to improve mood. `None` when no recent
/// entry has the data.
pub fn mood_trend(entries: &[JournalEntry], now: DateTime<Utc>, days: i64) -> Option<f64> {
    let cutoff = now - Duration::days(days);
    let changes: Vec<i8> = entries
        .iter()
        .filter(|e| e.created_at >= cutoff)
        .filter_map(|e| e.mood_change())
        .collect();
    if changes.is_empty() {
        return None;
    }
    Some(changes.iter().map(|&c| f64::from(c)).sum::<f64>() / changes.len() as f64)
}

/// Aggregate numbers about the whole journal, for the stats screen.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryStats {
    pub total_entries: usize,
    pub total_words: usize,
    pub streak: u32,
    pub entries_by_type: BTreeMap<JournalEntryType, usize>,
    pub avg_mood_change: Option<f64>,
}

pub fn entry_stats(entries: &[JournalEntry], now: DateTime<Utc>) -> EntryStats {
    let mut entries_by_type = BTreeMap::new();
    for entry in entries {
        *entries_by_type.entry(entry.entry_type).or_insert(0) += 1;
    }
    EntryStats {
        total_entries: entries.len(),
        total_words: entries.iter().map(|e| e.word_count()).sum(),
        streak: journal_streak(entries, now.date_naive()),
        entries_by_type,
        avg_mood_change: mood_trend(entries, now, 7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abitus_domain::{
        QuestType, SatisfactionConfig, SatisfactionType, StatType,
    };

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid timestamp")
    }

    fn journal_quest(satisfied_by: SatisfactionType, config: SatisfactionConfig) -> Quest {
        let now = at("2025-03-01T08:00:00Z");
        let mut q = Quest::new("Evening pages", QuestType::Daily, StatType::Spirit, now)
            .with_satisfaction(satisfied_by, config);
        q.accept(now);
        q
    }

    fn entry(entry_type: JournalEntryType, content: &str) -> JournalEntry {
        JournalEntry::new(entry_type, content, at("2025-03-01T21:00:00Z"))
    }

    const LONG_TEXT: &str =
        "Today I noticed how much calmer the evening felt after a slow walk home";

    #[test]
    fn test_any_accepts_every_entry_type() {
        let q = journal_quest(SatisfactionType::JournalAny, SatisfactionConfig::default());
        for entry_type in [
            JournalEntryType::FreeForm,
            JournalEntryType::Gratitude,
            JournalEntryType::Lesson,
        ] {
            let check = check_satisfaction(&q, &entry(entry_type, LONG_TEXT));
            assert!(check.is_satisfied(), "{entry_type:?}: {check:?}");
        }
    }

    #[test]
    fn test_specific_type_requires_exact_match() {
        let q = journal_quest(
            SatisfactionType::JournalGratitude,
            SatisfactionConfig::default(),
        );
        assert!(check_satisfaction(&q, &entry(JournalEntryType::Gratitude, LONG_TEXT))
            .is_satisfied());
        assert_eq!(
            check_satisfaction(&q, &entry(JournalEntryType::Reflection, LONG_TEXT)),
            SatisfactionCheck::WrongEntryType
        );
        // FreeForm does not count as "any type matches"
        assert_eq!(
            check_satisfaction(&q, &entry(JournalEntryType::FreeForm, LONG_TEXT)),
            SatisfactionCheck::WrongEntryType
        );
    }

    #[test]
    fn test_manual_and_app_quests_never_match() {
        let manual = journal_quest(SatisfactionType::Manual, SatisfactionConfig::default());
        assert_eq!(
            check_satisfaction(&manual, &entry(JournalEntryType::Gratitude, LONG_TEXT)),
            SatisfactionCheck::NotApplicable
        );

        let app = journal_quest(SatisfactionType::AppStrava, SatisfactionConfig::default());
        assert_eq!(
            check_satisfaction(&app, &entry(JournalEntryType::FreeForm, LONG_TEXT)),
            SatisfactionCheck::NotApplicable
        );
    }

    #[test]
    fn test_inactive_quest_never_matches() {
        let now = at("2025-03-01T08:00:00Z");
        // Available, never accepted
        let q = Quest::new("Evening pages", QuestType::Daily, StatType::Spirit, now)
            .with_satisfaction(SatisfactionType::JournalAny, SatisfactionConfig::default());
        assert_eq!(
            check_satisfaction(&q, &entry(JournalEntryType::FreeForm, LONG_TEXT)),
            SatisfactionCheck::NotApplicable
        );
    }

    #[test]
    fn test_min_words_threshold() {
        let q = journal_quest(
            SatisfactionType::JournalAny,
            SatisfactionConfig::default().with_min_words(20),
        );
        let check = check_satisfaction(&q, &entry(JournalEntryType::FreeForm, LONG_TEXT));
        assert_eq!(check, SatisfactionCheck::TooFewWords { needed: 20, got: 14 });
    }

    #[test]
    fn test_min_items_counts_nonempty_lines() {
        let q = journal_quest(
            SatisfactionType::JournalGratitude,
            SatisfactionConfig::default().with_min_items(3),
        );
        let two_items = "warm bread in the morning\n\nan unbothered hour of reading quietly alone";
        assert_eq!(
            check_satisfaction(&q, &entry(JournalEntryType::Gratitude, two_items)),
            SatisfactionCheck::TooFewItems { needed: 3, got: 2 }
        );

        let three_items = "warm bread in the morning\na long letter from an old friend\nan unbothered hour of quiet reading";
        assert!(check_satisfaction(&q, &entry(JournalEntryType::Gratitude, three_items))
            .is_satisfied());
    }

    #[test]
    fn test_substantial_required_by_default() {
        let q = journal_quest(SatisfactionType::JournalAny, SatisfactionConfig::default());
        let check = check_satisfaction(&q, &entry(JournalEntryType::FreeForm, "good day today"));
        assert_eq!(check, SatisfactionCheck::NotSubstantial { needed: 10, got: 3 });

        let mut lax = SatisfactionConfig::default();
        lax.require_substantial = false;
        let q = journal_quest(SatisfactionType::JournalAny, lax);
        assert!(
            check_satisfaction(&q, &entry(JournalEntryType::FreeForm, "good day today"))
                .is_satisfied()
        );
    }

    #[test]
    fn test_find_satisfiable_quests_preserves_order() {
        let manual = {
            let mut q = journal_quest(SatisfactionType::Manual, SatisfactionConfig::default());
            q.title = "Manual".to_string();
            q
        };
        let gratitude = journal_quest(
            SatisfactionType::JournalGratitude,
            SatisfactionConfig::default(),
        );
        let any = journal_quest(SatisfactionType::JournalAny, SatisfactionConfig::default());

        let quests = vec![manual, gratitude.clone(), any.clone()];
        let e = entry(JournalEntryType::Gratitude, LONG_TEXT);
        let matched = find_satisfiable_quests(&quests, &e);
        // Manual filtered out, order preserved
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].id, gratitude.id);
        assert_eq!(matched[1].id, any.id);
    }

    #[test]
    fn test_journal_streak_walks_back_until_gap() {
        fn with_date(mut e: JournalEntry, when: chrono::DateTime<chrono::Utc>) -> JournalEntry {
            e.created_at = when;
            e
        }

        let entries = vec![
            with_date(entry(JournalEntryType::FreeForm, LONG_TEXT), at("2025-03-05T21:00:00Z")),
            with_date(entry(JournalEntryType::FreeForm, LONG_TEXT), at("2025-03-04T07:00:00Z")),
            with_date(entry(JournalEntryType::Gratitude, LONG_TEXT), at("2025-03-04T22:00:00Z")),
            // gap on 2025-03-03
            with_date(entry(JournalEntryType::FreeForm, LONG_TEXT), at("2025-03-02T09:00:00Z")),
        ];

        let today = at("2025-03-05T23:00:00Z").date_naive();
        assert_eq!(journal_streak(&entries, today), 2);

        // No entry today: the streak is already broken
        let tomorrow = at("2025-03-06T08:00:00Z").date_naive();
        assert_eq!(journal_streak(&entries, tomorrow), 0);
        assert_eq!(journal_streak(&[], today), 0);
    }

    #[test]
    fn test_mood_trend_averages_recent_tracked_entries() {
        let now = at("2025-03-05T21:00:00Z");
        let mut lifted = entry(JournalEntryType::Reflection, LONG_TEXT);
        lifted.mood_before = Some(2);
        lifted.mood_after = Some(5);
        let mut flat = entry(JournalEntryType::FreeForm, LONG_TEXT);
        flat.mood_before = Some(3);
        flat.mood_after = Some(4);
        // No mood data, ignored
        let untracked = entry(JournalEntryType::FreeForm, LONG_TEXT);
        // Outside the window, ignored
        let mut old = entry(JournalEntryType::FreeForm, LONG_TEXT);
        old.created_at = at("2025-02-01T21:00:00Z");
        old.mood_before = Some(1);
        old.mood_after = Some(5);

        let entries = vec![lifted, flat, untracked, old];
        assert_eq!(mood_trend(&entries, now, 7), Some(2.0));
        assert_eq!(mood_trend(&[], now, 7), None);
    }

    #[test]
    fn test_entry_stats_counts_by_type() {
        let now = at("2025-03-01T22:00:00Z");
        let entries = vec![
            entry(JournalEntryType::Gratitude, LONG_TEXT),
            entry(JournalEntryType::Gratitude, LONG_TEXT),
            entry(JournalEntryType::FreeForm, "short note"),
        ];

        let stats = entry_stats(&entries, now);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.total_words, 14 + 14 + 2);
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.entries_by_type[&JournalEntryType::Gratitude], 2);
        assert_eq!(stats.entries_by_type[&JournalEntryType::FreeForm], 1);
        assert_eq!(stats.avg_mood_change, None);
    }
}
