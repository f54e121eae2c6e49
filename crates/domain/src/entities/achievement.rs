//! Achievements - long-horizon milestones unlocked by observed metrics.
//!
//! Achievements are catalog entities keyed by stable string ids (not UUIDs)
//! so the default catalog can be re-merged on load without duplicating rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categories of achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    /// Complete N quests
    #[default]
    Quest,
    /// Maintain an N-day streak
    Streak,
    /// Reach a stat level or total XP threshold
    Milestone,
    /// Keep all stats above a floor
    Balance,
    /// Max out a stat
    Mastery,
    /// One-off events, unlocked by hand
    Special,
}

impl AchievementType {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Quest => "⚔️",
            Self::Streak => "🔥",
            Self::Milestone => "🏔️",
            Self::Balance => "⚖️",
            Self::Mastery => "👑",
            Self::Special => "✨",
        }
    }
}

/// A single achievement with progress toward a requirement value.
///
/// `is_unlocked` is monotonic: once true it never reverts, and further
/// progress updates are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable catalog id, e.g. "quest_10" or "streak_30"
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub achievement_type: AchievementType,

    /// What the progress value means, shown in the UI
    pub requirement_description: String,
    pub requirement_value: i64,
    /// Latest observed metric value, clamped to the requirement on unlock
    #[serde(default)]
    pub progress: i64,

    #[serde(default)]
    pub is_unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,

    /// 1 common .. 5 legendary
    #[serde(default = "default_rarity")]
    pub rarity: u8,
    /// Hidden achievements show as "???" until unlocked
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub xp_bonus: i64,
}

fn default_rarity() -> u8 {
    1
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        achievement_type: AchievementType,
        requirement_value: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: achievement_type.icon().to_string(),
            achievement_type,
            requirement_description: String::new(),
            requirement_value,
            progress: 0,
            is_unlocked: false,
            unlocked_at: None,
            rarity: 1,
            is_hidden: false,
            xp_bonus: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirement_description = requirement.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_rarity(mut self, rarity: u8) -> Self {
        self.rarity = rarity.clamp(1, 5);
        self
    }

    pub fn with_xp_bonus(mut self, xp: i64) -> Self {
        self.xp_bonus = xp;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Feed the latest observed metric value. An unlocked achievement never
    /// re-fires. Returns true exactly when this call unlocks it.
    pub fn update_progress(&mut self, value: i64, now: DateTime<Utc>) -> bool {
        if self.is_unlocked {
            return false;
        }
        self.progress = value;
        if self.progress >= self.requirement_value {
            self.unlock(now);
            return true;
        }
        false
    }

    /// Unlock unconditionally, clamping progress to the requirement.
    pub fn unlock(&mut self, now: DateTime<Utc>) {
        if self.is_unlocked {
            return;
        }
        self.is_unlocked = true;
        self.unlocked_at = Some(now);
        self.progress = self.requirement_value;
    }

    /// Progress toward the requirement in [0.0, 100.0].
    pub fn progress_percent(&self) -> f64 {
        if self.requirement_value <= 0 {
            return if self.is_unlocked { 100.0 } else { 0.0 };
        }
        (self.progress as f64 / self.requirement_value as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn rarity_name(&self) -> &'static str {
        match self.rarity {
            1 => "Common",
            2 => "Uncommon",
            3 => "Rare",
            4 => "Epic",
            _ => "Legendary",
        }
    }
}

/// The built-in achievement catalog. Merged into the persisted set on load
/// by matching ids, so adding entries here surfaces them for existing saves.
pub fn default_achievements() -> Vec<Achievement> {
    let mut achievements = Vec::new();

    // Quest completion ladder
    let quest_ladder: &[(i64, &str, &str, u8, i64)] = &[
        (1, "quest_1", "First Steps", 1, 10),
        (10, "quest_10", "Adventurer", 2, 50),
        (50, "quest_50", "Seasoned Quester", 3, 200),
        (100, "quest_100", "Quest Master", 4, 500),
        (500, "quest_500", "Living Legend", 5, 2000),
    ];
    for &(requirement, id, name, rarity, xp) in quest_ladder {
        achievements.push(
            Achievement::new(id, name, AchievementType::Quest, requirement)
                .with_description(format!("Complete {requirement} quests"))
                .with_requirement(format!("{requirement} quests completed"))
                .with_rarity(rarity)
                .with_xp_bonus(xp),
        );
    }

    // Streak ladder
    let streak_ladder: &[(i64, &str, &str, u8, i64)] = &[
        (3, "streak_3", "Kindling", 1, 15),
        (7, "streak_7", "Steady Flame", 2, 50),
        (30, "streak_30", "Eternal Fire", 3, 300),
        (100, "streak_100", "Unbreakable", 4, 1000),
        (365, "streak_365", "Year of Devotion", 5, 5000),
    ];
    for &(requirement, id, name, rarity, xp) in streak_ladder {
        achievements.push(
            Achievement::new(id, name, AchievementType::Streak, requirement)
                .with_description(format!("Maintain a {requirement}-day streak"))
                .with_requirement(format!("{requirement} consecutive days"))
                .with_rarity(rarity)
                .with_xp_bonus(xp),
        );
    }

    // Stat level milestones
    let level_ladder: &[(i64, &str, &str, u8, i64)] = &[
        (5, "level_5", "Rising Star", 1, 25),
        (10, "level_10", "Proven Adept", 2, 100),
        (15, "level_15", "Renowned Expert", 3, 400),
        (20, "level_20", "Pinnacle", 5, 2000),
    ];
    for &(requirement, id, name, rarity, xp) in level_ladder {
        achievements.push(
            Achievement::new(id, name, AchievementType::Milestone, requirement)
                .with_description(format!("Reach level {requirement} in any stat"))
                .with_requirement(format!("Any stat at level {requirement}"))
                .with_rarity(rarity)
                .with_xp_bonus(xp),
        );
    }

    // Balance: every stat above a floor
    let balance_ladder: &[(i64, &str, &str, u8, i64)] = &[
        (5, "balance_5", "Well Rounded", 2, 100),
        (10, "balance_10", "Harmonious", 3, 400),
        (15, "balance_15", "Renaissance Soul", 4, 1500),
    ];
    for &(requirement, id, name, rarity, xp) in balance_ladder {
        achievements.push(
            Achievement::new(id, name, AchievementType::Balance, requirement)
                .with_description(format!("Raise every stat to level {requirement}"))
                .with_requirement(format!("All stats at level {requirement}"))
                .with_rarity(rarity)
                .with_xp_bonus(xp),
        );
    }

    // Mastery: cap a stat out
    achievements.push(
        Achievement::new("mastery_20", "Grandmaster", AchievementType::Mastery, 20)
            .with_description("Max out a stat at level 20")
            .with_requirement("Any stat at the level cap")
            .with_rarity(5)
            .with_xp_bonus(3000),
    );

    // Total XP ladder. "XP" in the requirement marks these as XP-metric
    // milestones for the evaluator.
    let xp_ladder: &[(i64, &str, &str, u8, i64)] = &[
        (1_000, "xp_1000", "Apprentice of Experience", 1, 50),
        (10_000, "xp_10000", "Veteran of Experience", 3, 500),
        (100_000, "xp_100000", "Paragon of Experience", 5, 5000),
    ];
    for &(requirement, id, name, rarity, xp) in xp_ladder {
        achievements.push(
            Achievement::new(id, name, AchievementType::Milestone, requirement)
                .with_description(format!("Earn {requirement} total experience"))
                .with_requirement(format!("{requirement} XP earned"))
                .with_rarity(rarity)
                .with_xp_bonus(xp),
        );
    }

    // Special: only unlocked explicitly
    achievements.push(
        Achievement::new("special_founder", "The Awakening", AchievementType::Special, 1)
            .with_description("Complete the founding interview")
            .with_requirement("Begin your story")
            .with_icon("🌅")
            .with_rarity(2)
            .with_xp_bonus(25)
            .hidden(),
    );

    achievements
}
