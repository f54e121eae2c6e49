//! The player character - root aggregate tying stats, streaks, and titles
//! together.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::CharacterId;
use crate::value_objects::{parse_score_key, Stat, StatType, SubFacetType, MAX_LEVEL};

fn default_available_time() -> u32 {
    30
}

fn default_challenge_level() -> u8 {
    2
}

/// The single player character. All six stats always exist; persisted rows
/// missing a stat are backfilled on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Current RPG title, refreshed whenever levels can change
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "deserialize_stats")]
    pub stats: BTreeMap<StatType, Stat>,

    // Lifetime progress
    #[serde(default)]
    pub total_quests_completed: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    /// Calendar day (not instant) of the last completed quest
    pub last_quest_date: Option<NaiveDate>,

    // Onboarding and preferences
    /// Whether the founding interview has been taken
    #[serde(default)]
    pub assessment_completed: bool,
    /// Question id -> selected answer on the 1-5 scale
    #[serde(default)]
    pub interview_responses: BTreeMap<String, u8>,
    /// Minutes per day the player wants to spend on quests
    #[serde(default = "default_available_time")]
    pub available_time_minutes: u32,
    /// How hard generated quests may be, 1-4
    #[serde(default = "default_challenge_level")]
    pub challenge_level: u8,
    /// Dimension the player chose to focus on, if any
    #[serde(default)]
    pub priority_dimension: Option<StatType>,
}

/// Backfills any stat missing from a persisted row so callers can index
/// `stats` by every `StatType` without a miss.
fn deserialize_stats<'de, D>(deserializer: D) -> Result<BTreeMap<StatType, Stat>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut stats: BTreeMap<StatType, Stat> = BTreeMap::deserialize(deserializer)?;
    for stat_type in StatType::all() {
        stats
            .entry(stat_type)
            .or_insert_with(|| Stat::new(stat_type));
    }
    Ok(stats)
}

impl Character {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let stats = StatType::all()
            .into_iter()
            .map(|stat_type| (stat_type, Stat::new(stat_type)))
            .collect();
        let mut character = Self {
            id: CharacterId::new(),
            name: name.into(),
            title: String::new(),
            created_at: now,
            last_active: None,
            stats,
            total_quests_completed: 0,
            current_streak: 0,
            longest_streak: 0,
            last_quest_date: None,
            assessment_completed: false,
            interview_responses: BTreeMap::new(),
            available_time_minutes: default_available_time(),
            challenge_level: default_challenge_level(),
            priority_dimension: None,
        };
        character.refresh_title();
        character
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    pub fn stat(&self, stat_type: StatType) -> &Stat {
        // Invariant: all six stats exist (constructor and deserializer both
        // guarantee it), so the lookup cannot miss.
        self.stats
            .get(&stat_type)
            .unwrap_or_else(|| unreachable!("stat map is total"))
    }

    pub fn total_level(&self) -> u32 {
        self.stats.values().map(Stat::level).sum()
    }

    pub fn average_level(&self) -> f64 {
        f64::from(self.total_level()) / StatType::all().len() as f64
    }

    /// Lifetime XP across every sub-facet.
    pub fn total_xp(&self) -> u64 {
        self.stats.values().map(|s| u64::from(s.current_xp())).sum()
    }

    /// The strongest stat by (level, total score); ties go to the earliest
    /// declared stat.
    pub fn highest_stat(&self) -> (StatType, &Stat) {
        self.stats
            .iter()
            .map(|(t, s)| (*t, s))
            .reduce(|best, cur| {
                if (cur.1.level(), cur.1.total_score()) > (best.1.level(), best.1.total_score()) {
                    cur
                } else {
                    best
                }
            })
            .unwrap_or_else(|| unreachable!("stat map is total"))
    }

    /// The weakest stat, same ordering and tie direction.
    pub fn lowest_stat(&self) -> (StatType, &Stat) {
        self.stats
            .iter()
            .map(|(t, s)| (*t, s))
            .reduce(|best, cur| {
                if (cur.1.level(), cur.1.total_score()) < (best.1.level(), best.1.total_score()) {
                    cur
                } else {
                    best
                }
            })
            .unwrap_or_else(|| unreachable!("stat map is total"))
    }

    /// RPG title built from overall progress and the dominant stat.
    pub fn compute_title(&self) -> String {
        let avg = self.average_level();
        let prefix = if avg < 3.0 {
            "Novice"
        } else if avg < 5.0 {
            "Apprentice"
        } else if avg < 8.0 {
            "Journeyman"
        } else if avg < 12.0 {
            "Expert"
        } else if avg < 16.0 {
            "Master"
        } else {
            "Legendary"
        };
        let (strongest, _) = self.highest_stat();
        format!("{prefix} {}", strongest.title_suffix())
    }

    fn refresh_title(&mut self) {
        self.title = self.compute_title();
    }

    /// Sub-facets most worth working on: the three globally weakest by total
    /// score, plus up to two weakest inside the priority dimension when one
    /// is set. Deduplicated, at most five.
    pub fn improvement_suggestions(&self) -> Vec<SubFacetType> {
        let mut all_facets: Vec<(SubFacetType, u32)> = Vec::with_capacity(30);
        for stat_type in StatType::all() {
            for facet in self.stat(stat_type).sub_facets.values() {
                all_facets.push((facet.facet_type, facet.total_score()));
            }
        }
        all_facets.sort_by_key(|&(_, score)| score);

        let mut picks: Vec<SubFacetType> =
            all_facets.iter().take(3).map(|&(f, _)| f).collect();
        if let Some(dimension) = self.priority_dimension {
            for facet in self.stat(dimension).weakest_facets(2) {
                if !picks.contains(&facet) {
                    picks.push(facet);
                }
            }
        }
        picks.truncate(5);
        picks
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Routes XP into a stat, spreading it across that stat's sub-facets.
    /// Returns the stat's new XP total and whether its level changed.
    pub fn add_xp(&mut self, stat_type: StatType, amount: i64) -> (u32, bool) {
        match self.stats.get_mut(&stat_type) {
            Some(stat) => stat.distribute_xp(amount),
            None => (0, false),
        }
    }

    /// Applies interview-derived base scores keyed as "dimension.subfacet".
    /// Unknown keys are skipped and returned for the caller to report.
    pub fn apply_interview_scores(
        &mut self,
        scores: &BTreeMap<String, i64>,
    ) -> Vec<String> {
        let mut skipped = Vec::new();
        for (key, amount) in scores {
            match parse_score_key(key) {
                Ok((stat_type, facet)) => {
                    if let Some(stat) = self.stats.get_mut(&stat_type) {
                        stat.add_subfacet_score(facet, *amount);
                    }
                }
                Err(_) => skipped.push(key.clone()),
            }
        }
        self.assessment_completed = true;
        self.refresh_title();
        skipped
    }

    /// Sets how far the player wants to push a stat (used by the generator's
    /// priority weighting).
    pub fn set_priority(&mut self, stat_type: StatType, target_level: u32) {
        if let Some(stat) = self.stats.get_mut(&stat_type) {
            stat.target_level = target_level.clamp(1, MAX_LEVEL);
        }
    }

    /// Records a quest completion for streak purposes. Streaks count whole
    /// calendar days: consecutive days extend, a same-day repeat is neutral,
    /// any gap restarts at one.
    pub fn record_quest_completion(&mut self, now: DateTime<Utc>) {
        self.total_quests_completed += 1;

        let today = now.date_naive();
        match self.last_quest_date {
            None => self.current_streak = 1,
            Some(last) => {
                let days_since = (today - last).num_days();
                if days_since == 1 {
                    self.current_streak += 1;
                } else if days_since > 1 {
                    self.current_streak = 1;
                }
                // days_since == 0: same day, streak unchanged
            }
        }
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_quest_date = Some(today);
        self.last_active = Some(now);
        self.refresh_title();
    }
}
