//! Progression rules: routing quest rewards into stats and re-evaluating
//! the achievement catalog against observed metrics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use abitus_domain::{Achievement, AchievementType, Character, StatType};

/// What one reward application did to one stat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatChange {
    pub stat_type: StatType,
    pub xp_gained: i64,
    pub new_xp: u32,
    pub new_level: u32,
    /// Whole levels crossed by this application, 0 when none
    pub levels_gained: u32,
}

/// Applies merged quest rewards to the character, one stat at a time,
/// recording the before/after level delta per stat.
pub fn apply_rewards(
    character: &mut Character,
    rewards: &BTreeMap<StatType, i64>,
) -> Vec<StatChange> {
    let mut changes = Vec::with_capacity(rewards.len());
    for (&stat_type, &xp) in rewards {
        let old_level = character.stat(stat_type).level();
        let (new_xp, _) = character.add_xp(stat_type, xp);
        let new_level = character.stat(stat_type).level();
        changes.push(StatChange {
            stat_type,
            xp_gained: xp,
            new_xp,
            new_level,
            levels_gained: new_level.saturating_sub(old_level),
        });
    }
    changes
}

/// The metric an achievement tracks, derived from its type:
/// - Quest: lifetime quests completed
/// - Streak: best streak ever seen (current or recorded longest)
/// - Milestone: total XP when the requirement mentions XP, otherwise the
///   highest stat level
/// - Balance: the lowest stat level
/// - Mastery: the highest stat level
/// - Special: no metric, unlocked explicitly
fn metric_for(achievement: &Achievement, character: &Character) -> Option<i64> {
    let value = match achievement.achievement_type {
        AchievementType::Quest => i64::from(character.total_quests_completed),
        AchievementType::Streak => {
            i64::from(character.current_streak.max(character.longest_streak))
        }
        AchievementType::Milestone => {
            if achievement.requirement_description.contains("XP") {
                character.total_xp() as i64
            } else {
                i64::from(character.highest_stat().1.level())
            }
        }
        AchievementType::Balance => i64::from(character.lowest_stat().1.level()),
        AchievementType::Mastery => i64::from(character.highest_stat().1.level()),
        AchievementType::Special => return None,
    };
    Some(value)
}

/// Where each catalog id sits in the catalog's declared order.
fn catalog_order() -> BTreeMap<String, usize> {
    abitus_domain::default_achievements()
        .into_iter()
        .enumerate()
        .map(|(index, a)| (a.id, index))
        .collect()
}

/// Feeds current character metrics into every locked achievement. Returns
/// the ids of achievements unlocked by this pass; running it again with the
/// same character is a no-op.
pub fn evaluate_achievements(
    character: &Character,
    achievements: &mut [Achievement],
    now: DateTime<Utc>,
) -> Vec<String> {
    // Unlocks announce in catalog order, not stored-id order; ids outside
    // the catalog sort after it
    let order = catalog_order();
    achievements.sort_by_key(|a| {
        (
            order.get(a.id.as_str()).copied().unwrap_or(usize::MAX),
            a.id.clone(),
        )
    });

    let mut unlocked = Vec::new();
    for achievement in achievements.iter_mut() {
        let Some(value) = metric_for(achievement, character) else {
            continue;
        };
        if achievement.update_progress(value, now) {
            tracing::info!(id = %achievement.id, name = %achievement.name, "achievement unlocked");
            unlocked.push(achievement.id.clone());
        }
    }
    unlocked
}

/// How evenly the six stats are developed, 0-100 where 100 is perfectly
/// even. The standard deviation of the levels is scored against half the
/// average level.
pub fn balance_score(character: &Character) -> f64 {
    let levels: Vec<f64> = character
        .stats
        .values()
        .map(|s| f64::from(s.level()))
        .collect();
    let avg = levels.iter().sum::<f64>() / levels.len() as f64;
    let variance = levels.iter().map(|l| (l - avg).powi(2)).sum::<f64>() / levels.len() as f64;
    // Levels clamp at 1 so avg is never zero
    let score = 100.0 - (variance.sqrt() / (avg / 2.0) * 100.0);
    (score.max(0.0) * 10.0).round() / 10.0
}

/// The visible locked achievement closest to unlocking, for the UI to dangle.
pub fn next_achievement(achievements: &[Achievement]) -> Option<&Achievement> {
    achievements
        .iter()
        .filter(|a| !a.is_unlocked && !a.is_hidden)
        .max_by(|a, b| {
            a.progress_percent()
                .partial_cmp(&b.progress_percent())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Merges the built-in catalog with a persisted set: persisted progress wins
/// per id, catalog entries missing from the store are added. The result
/// keeps the catalog's declared order, persisted-only rows last.
pub fn merge_catalog(persisted: Vec<Achievement>) -> Vec<Achievement> {
    let mut by_id: BTreeMap<String, Achievement> = persisted
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect();
    let mut merged: Vec<Achievement> = abitus_domain::default_achievements()
        .into_iter()
        .map(|entry| by_id.remove(&entry.id).unwrap_or(entry))
        .collect();
    merged.extend(by_id.into_values());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use abitus_domain::{default_achievements, SubFacetType};

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("valid timestamp")
    }

    fn character() -> Character {
        Character::new("Aldric", at("2025-01-01T08:00:00Z"))
    }

    #[test]
    fn test_apply_rewards_reports_per_stat() {
        let mut c = character();
        let mut rewards = BTreeMap::new();
        rewards.insert(StatType::Vitality, 20i64);
        rewards.insert(StatType::Spirit, 5i64);

        let changes = apply_rewards(&mut c, &rewards);
        assert_eq!(changes.len(), 2);
        assert!(changes
            .iter()
            .any(|ch| ch.stat_type == StatType::Vitality && ch.new_xp == 20));
        assert!(changes
            .iter()
            .any(|ch| ch.stat_type == StatType::Spirit && ch.new_xp == 5));
        assert_eq!(c.total_xp(), 25);
    }

    #[test]
    fn test_apply_rewards_counts_levels_per_stat() {
        let mut c = character();
        let mut rewards = BTreeMap::new();
        // 300 XP lifts Vitality a level (60 per facet -> facet level 2);
        // 5 XP moves Spirit not at all
        rewards.insert(StatType::Vitality, 300i64);
        rewards.insert(StatType::Spirit, 5i64);

        let changes = apply_rewards(&mut c, &rewards);
        let vitality = changes
            .iter()
            .find(|ch| ch.stat_type == StatType::Vitality)
            .expect("vitality change");
        assert_eq!(vitality.levels_gained, 1);
        assert_eq!(vitality.new_level, 2);
        let spirit = changes
            .iter()
            .find(|ch| ch.stat_type == StatType::Spirit)
            .expect("spirit change");
        assert_eq!(spirit.levels_gained, 0);
    }

    #[test]
    fn test_quest_count_unlocks_first_steps() {
        let mut c = character();
        c.record_quest_completion(at("2025-01-02T08:00:00Z"));
        let mut achievements = default_achievements();

        let unlocked = evaluate_achievements(&c, &mut achievements, at("2025-01-02T08:00:00Z"));
        assert!(unlocked.contains(&"quest_1".to_string()));
        assert!(!unlocked.contains(&"quest_10".to_string()));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let mut c = character();
        c.record_quest_completion(at("2025-01-02T08:00:00Z"));
        let mut achievements = default_achievements();
        let now = at("2025-01-02T08:00:00Z");

        let first = evaluate_achievements(&c, &mut achievements, now);
        assert!(!first.is_empty());
        let second = evaluate_achievements(&c, &mut achievements, now);
        assert!(second.is_empty());
    }

    #[test]
    fn test_streak_metric_uses_best_ever() {
        let mut c = character();
        c.longest_streak = 7;
        c.current_streak = 2;
        let mut achievements = default_achievements();

        let unlocked =
            evaluate_achievements(&c, &mut achievements, at("2025-01-02T08:00:00Z"));
        assert!(unlocked.contains(&"streak_3".to_string()));
        assert!(unlocked.contains(&"streak_7".to_string()));
        assert!(!unlocked.contains(&"streak_30".to_string()));
    }

    #[test]
    fn test_milestone_splits_xp_from_level() {
        let mut c = character();
        // 1200 XP into one stat: the XP milestone fires, and the stat level
        // rises enough for level_5 too (240 xp_bonus per facet -> total
        // score 24 -> facet level 5 -> stat level 5).
        c.add_xp(StatType::Intellect, 1200);
        let mut achievements = default_achievements();

        let unlocked =
            evaluate_achievements(&c, &mut achievements, at("2025-01-02T08:00:00Z"));
        assert!(unlocked.contains(&"xp_1000".to_string()));
        assert!(unlocked.contains(&"level_5".to_string()));
        assert!(!unlocked.contains(&"xp_10000".to_string()));
        assert!(!unlocked.contains(&"level_10".to_string()));
    }

    #[test]
    fn test_balance_needs_every_stat() {
        let mut c = character();
        // One strong stat is not balance
        c.add_xp(StatType::Intellect, 1200);
        let mut achievements = default_achievements();
        let now = at("2025-01-02T08:00:00Z");
        let unlocked = evaluate_achievements(&c, &mut achievements, now);
        assert!(!unlocked.contains(&"balance_5".to_string()));

        // Every stat raised: balance unlocks
        for stat_type in StatType::all() {
            for facet in SubFacetType::for_dimension(stat_type) {
                if let Some(stat) = c.stats.get_mut(&stat_type) {
                    stat.add_subfacet_score(facet, 25);
                }
            }
        }
        let unlocked = evaluate_achievements(&c, &mut achievements, now);
        assert!(unlocked.contains(&"balance_5".to_string()));
    }

    #[test]
    fn test_special_never_unlocks_automatically() {
        let mut c = character();
        c.total_quests_completed = 1000;
        c.longest_streak = 1000;
        let mut achievements = default_achievements();

        evaluate_achievements(&c, &mut achievements, at("2025-01-02T08:00:00Z"));
        let special = achievements
            .iter()
            .find(|a| a.id == "special_founder")
            .expect("catalog entry");
        assert!(!special.is_unlocked);
    }

    #[test]
    fn test_unlocks_announce_in_catalog_order() {
        let mut c = character();
        // Every stat to level 6: level_5 and balance_5 both fire
        for stat_type in StatType::all() {
            for facet in SubFacetType::for_dimension(stat_type) {
                if let Some(stat) = c.stats.get_mut(&stat_type) {
                    stat.add_subfacet_score(facet, 25);
                }
            }
        }
        let mut achievements = default_achievements();
        // Stored order should not leak into the announcement order
        achievements.reverse();

        let unlocked = evaluate_achievements(&c, &mut achievements, at("2025-01-02T08:00:00Z"));
        assert_eq!(unlocked, vec!["level_5".to_string(), "balance_5".to_string()]);
    }

    #[test]
    fn test_balance_score_drops_as_stats_diverge() {
        let mut c = character();
        assert_eq!(balance_score(&c), 100.0);

        c.add_xp(StatType::Intellect, 1200);
        assert!(balance_score(&c) < 100.0);
    }

    #[test]
    fn test_next_achievement_picks_closest_visible() {
        let mut achievements = default_achievements();
        if let Some(a) = achievements.iter_mut().find(|a| a.id == "quest_10") {
            a.progress = 9;
        }
        if let Some(a) = achievements.iter_mut().find(|a| a.id == "quest_1") {
            a.unlock(at("2025-01-02T08:00:00Z"));
        }

        let next = next_achievement(&achievements).expect("a locked achievement");
        assert_eq!(next.id, "quest_10");
    }

    #[test]
    fn test_merge_catalog_keeps_persisted_progress() {
        let mut persisted = default_achievements();
        if let Some(a) = persisted.iter_mut().find(|a| a.id == "quest_10") {
            a.progress = 7;
        }
        // Simulate an old save missing newer catalog entries
        persisted.retain(|a| a.id != "xp_100000");

        let merged = merge_catalog(persisted);
        let quest_10 = merged.iter().find(|a| a.id == "quest_10").expect("merged");
        assert_eq!(quest_10.progress, 7);
        assert!(merged.iter().any(|a| a.id == "xp_100000"));
    }
}
