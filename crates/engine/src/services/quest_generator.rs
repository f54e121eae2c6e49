//! Quest generation: weighted stat selection plus a hand-written template
//! catalog. Randomness comes in through the caller's `Rng` so generation is
//! reproducible under a seeded generator.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use abitus_domain::{
    Character, Quest, QuestType, SatisfactionConfig, SatisfactionType, StatType, SubFacetType,
};

/// What the player can take on today.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConstraints {
    /// Caps template difficulty at min(3, challenge_level)
    pub challenge_level: u8,
    /// Skips templates longer than this
    pub available_time_minutes: u32,
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self {
            challenge_level: 3,
            available_time_minutes: 60,
        }
    }
}

struct QuestTemplate {
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    stat: StatType,
    facets: &'static [SubFacetType],
    duration_minutes: u32,
    difficulty: u8,
    xp: i64,
    satisfied_by: SatisfactionType,
    min_words: Option<u32>,
    min_items: Option<u32>,
}

impl QuestTemplate {
    const fn manual(
        title: &'static str,
        description: &'static str,
        icon: &'static str,
        stat: StatType,
        facets: &'static [SubFacetType],
        duration_minutes: u32,
        difficulty: u8,
        xp: i64,
    ) -> Self {
        Self {
            title,
            description,
            icon,
            stat,
            facets,
            duration_minutes,
            difficulty,
            xp,
            satisfied_by: SatisfactionType::Manual,
            min_words: None,
            min_items: None,
        }
    }

    fn fits(&self, constraints: &GenerationConstraints) -> bool {
        let max_difficulty = constraints.challenge_level.min(3);
        self.difficulty <= max_difficulty
            && self.duration_minutes <= constraints.available_time_minutes
    }

    fn build(&self, now: DateTime<Utc>) -> Quest {
        let config = SatisfactionConfig {
            min_words: self.min_words,
            min_items: self.min_items,
            ..SatisfactionConfig::default()
        };
        Quest::new(self.title, QuestType::Daily, self.stat, now)
            .with_description(self.description)
            .with_icon(self.icon)
            .with_xp_reward(self.xp)
            .with_difficulty(self.difficulty)
            .with_duration_minutes(self.duration_minutes)
            .with_satisfaction(self.satisfied_by, config)
            .with_target_subfacets(self.facets.iter().copied())
            .with_expiry(now + Duration::hours(24))
    }
}

fn catalog() -> Vec<QuestTemplate> {
    use StatType::*;
    use SubFacetType::*;

    let mut templates = vec![
        // Intellect
        QuestTemplate::manual(
            "Study the Tomes",
            "Read for 20 minutes on something that stretches you",
            "📚",
            Intellect,
            &[Learning, Focus],
            20,
            1,
            15,
        ),
        QuestTemplate::manual(
            "Riddle of the Day",
            "Work through one puzzle or hard problem without looking up the answer",
            "🧩",
            Intellect,
            &[ProblemSolving],
            15,
            2,
            20,
        ),
        QuestTemplate::manual(
            "Sketch an Idea",
            "Spend 15 minutes making something: a sketch, a melody, an outline",
            "🎨",
            Intellect,
            &[Creativity, Curiosity],
            15,
            1,
            15,
        ),
        QuestTemplate::manual(
            "Deep Work Incantation",
            "One 45 minute block with every distraction banished",
            "🔮",
            Intellect,
            &[Focus],
            45,
            3,
            35,
        ),
        // Vitality
        QuestTemplate::manual(
            "March of the Dawn",
            "Take a brisk 20 minute walk outside",
            "🥾",
            Vitality,
            &[Fitness, Energy],
            20,
            1,
            15,
        ),
        QuestTemplate::manual(
            "Train the Body",
            "A full workout: strength, cardio, or a long session of sport",
            "⚔️",
            Vitality,
            &[Fitness],
            45,
            3,
            35,
        ),
        QuestTemplate::manual(
            "Feast Wisely",
            "Cook a proper meal with vegetables instead of ordering in",
            "🍲",
            Vitality,
            &[Nutrition],
            30,
            2,
            20,
        ),
        QuestTemplate::manual(
            "Rest of the Righteous",
            "In bed before eleven, no screen in hand",
            "🛌",
            Vitality,
            &[Sleep, Recovery],
            10,
            1,
            15,
        ),
        // Spirit
        QuestTemplate {
            title: "Count Your Blessings",
            description: "Write down three things you are grateful for today",
            icon: "🙏",
            stat: Spirit,
            facets: &[Gratitude],
            duration_minutes: 10,
            difficulty: 1,
            xp: 15,
            satisfied_by: SatisfactionType::JournalGratitude,
            min_words: None,
            min_items: Some(3),
        },
        QuestTemplate {
            title: "Evening Reflection",
            description: "Reflect in writing on what today taught you",
            icon: "🕯️",
            stat: Spirit,
            facets: &[Mindfulness, Purpose],
            duration_minutes: 15,
            difficulty: 1,
            xp: 15,
            satisfied_by: SatisfactionType::JournalReflection,
            min_words: Some(30),
            min_items: None,
        },
        QuestTemplate::manual(
            "Still the Waters",
            "Ten minutes of meditation or slow breathing",
            "🧘",
            Spirit,
            &[Calm, Mindfulness],
            10,
            1,
            15,
        ),
        QuestTemplate::manual(
            "Weather the Storm",
            "Do the one task you have been dreading most",
            "⛈️",
            Spirit,
            &[Resilience],
            30,
            3,
            30,
        ),
        // Bonds
        QuestTemplate::manual(
            "Send a Raven",
            "Message or call someone you have not spoken to in a while",
            "🕊️",
            Bonds,
            &[Friendship, Communication],
            10,
            1,
            15,
        ),
        QuestTemplate::manual(
            "Hearth and Kin",
            "Spend undistracted time with family, phone out of reach",
            "🏡",
            Bonds,
            &[Family],
            30,
            2,
            20,
        ),
        QuestTemplate::manual(
            "Lend Your Shield",
            "Do something concrete to help a neighbor, colleague, or stranger",
            "🛡️",
            Bonds,
            &[Community, Empathy],
            20,
            2,
            20,
        ),
        // Prosperity
        QuestTemplate::manual(
            "Count the Coffers",
            "Review your spending for the week and note anything surprising",
            "💰",
            Prosperity,
            &[Finances, Planning],
            15,
            1,
            15,
        ),
        QuestTemplate::manual(
            "Sharpen the Trade",
            "Spend 30 minutes on a skill that matters to your work",
            "🛠️",
            Prosperity,
            &[Career],
            30,
            2,
            25,
        ),
        QuestTemplate::manual(
            "Court the Guilds",
            "Reach out to one professional contact, old or new",
            "🤝",
            Prosperity,
            &[Networking],
            15,
            2,
            20,
        ),
        QuestTemplate::manual(
            "Open Hand",
            "Give something away: time, money, or a genuine favor",
            "🎁",
            Prosperity,
            &[Generosity],
            15,
            1,
            15,
        ),
        // Mastery
        QuestTemplate::manual(
            "The Daily Forging",
            "Practice your craft deliberately for 25 minutes",
            "⚒️",
            Mastery,
            &[Craft, Practice],
            25,
            2,
            20,
        ),
        QuestTemplate::manual(
            "Keep the Vigil",
            "Do your keystone habit even though you do not feel like it",
            "🕰️",
            Mastery,
            &[Discipline, Consistency],
            15,
            1,
            15,
        ),
        QuestTemplate::manual(
            "Show Your Work",
            "Share something you made with at least one other person",
            "📜",
            Mastery,
            &[Expression],
            15,
            2,
            20,
        ),
    ];

    // Keep the catalog honest: every facet a template names belongs to its stat
    templates.retain(|t| t.facets.iter().all(|f| f.dimension() == t.stat));
    templates
}

/// Selection weight for a stat: baseline plus how far it sits under its
/// target, with a bonus for the overall weakest stat.
fn stat_priority(character: &Character, stat_type: StatType) -> f64 {
    let stat = character.stat(stat_type);
    let gap = f64::from(stat.target_level.saturating_sub(stat.level()));
    let mut priority = 1.0 + 0.3 * gap;
    if character.lowest_stat().0 == stat_type {
        priority *= 1.5;
    }
    priority
}

/// Picks a stat by cumulative-weight sampling over the priorities.
fn pick_stat(character: &Character, rng: &mut impl Rng) -> StatType {
    let stats = StatType::all();
    let weights: Vec<f64> = stats
        .iter()
        .map(|&s| stat_priority(character, s))
        .collect();
    let total: f64 = weights.iter().sum();
    let mut roll = rng.gen_range(0.0..total);
    for (stat, weight) in stats.iter().zip(&weights) {
        if roll < *weight {
            return *stat;
        }
        roll -= weight;
    }
    StatType::Mastery
}

/// Generates one quest for the given stat, or `None` when no template for
/// that stat fits the constraints.
pub fn generate_for_stat(
    stat: StatType,
    constraints: &GenerationConstraints,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Option<Quest> {
    let templates = catalog();
    let eligible: Vec<&QuestTemplate> = templates
        .iter()
        .filter(|t| t.stat == stat && t.fits(constraints))
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..eligible.len());
    Some(eligible[index].build(now))
}

/// Generates a batch of daily quests. Stats are drawn by priority weight,
/// and no two quests in a batch share a (stat, title) pair. When a drawn
/// stat has no unused eligible template left, every stat is scanned so the
/// batch still fills if any template anywhere is usable.
pub fn generate_daily_batch(
    character: &Character,
    count: usize,
    constraints: &GenerationConstraints,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Vec<Quest> {
    let templates = catalog();
    let mut used: Vec<(StatType, &str)> = Vec::new();
    let mut batch = Vec::with_capacity(count);

    while batch.len() < count {
        let preferred = pick_stat(character, rng);

        let pick_from = |stat: StatType, used: &[(StatType, &str)], rng: &mut dyn rand::RngCore| {
            let eligible: Vec<&QuestTemplate> = templates
                .iter()
                .filter(|t| t.stat == stat && t.fits(constraints))
                .filter(|t| !used.contains(&(t.stat, t.title)))
                .collect();
            if eligible.is_empty() {
                None
            } else {
                let index = rng.gen_range(0..eligible.len());
                Some(eligible[index])
            }
        };

        let template = pick_from(preferred, &used, rng).or_else(|| {
            // Fallback: any stat with something left
            StatType::all()
                .into_iter()
                .find_map(|stat| pick_from(stat, &used, rng))
        });

        let Some(template) = template else {
            // Catalog exhausted under these constraints
            break;
        };
        used.push((template.stat, template.title));
        batch.push(template.build(now));
    }

    tracing::debug!(requested = count, generated = batch.len(), "daily batch generated");
    batch
}

/// Template for week- and month-scale quests: no per-sitting duration,
/// usually progress-tracked.
struct LongTemplate {
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    stat: StatType,
    facets: &'static [SubFacetType],
    difficulty: u8,
    xp: i64,
    /// 0 disables progress tracking
    progress_target: i64,
    progress_unit: &'static str,
}

impl LongTemplate {
    fn build(&self, quest_type: QuestType, lifetime: Duration, now: DateTime<Utc>) -> Quest {
        let mut quest = Quest::new(self.title, quest_type, self.stat, now)
            .with_description(self.description)
            .with_icon(self.icon)
            .with_xp_reward(self.xp)
            .with_difficulty(self.difficulty)
            .with_target_subfacets(self.facets.iter().copied())
            .with_expiry(now + lifetime);
        if self.progress_target > 0 {
            quest = quest.with_progress_target(self.progress_target, self.progress_unit);
        }
        quest
    }
}

fn weekly_catalog() -> Vec<LongTemplate> {
    use StatType::*;
    use SubFacetType::*;

    vec![
        LongTemplate {
            title: "Week of the Scholar",
            description: "Read a total of three hours across the week",
            icon: "📖",
            stat: Intellect,
            facets: &[Learning, Curiosity],
            difficulty: 3,
            xp: 100,
            progress_target: 180,
            progress_unit: "minutes",
        },
        LongTemplate {
            title: "Trial of Endurance",
            description: "Train on four separate days this week",
            icon: "🏋️",
            stat: Vitality,
            facets: &[Fitness, Energy],
            difficulty: 3,
            xp: 100,
            progress_target: 4,
            progress_unit: "sessions",
        },
        LongTemplate {
            title: "Week of Stillness",
            description: "Meditate five days out of seven",
            icon: "🧘",
            stat: Spirit,
            facets: &[Mindfulness, Calm],
            difficulty: 3,
            xp: 100,
            progress_target: 5,
            progress_unit: "sessions",
        },
        LongTemplate {
            title: "Gather the Fellowship",
            description: "Share a proper meal with people you care about",
            icon: "🍻",
            stat: Bonds,
            facets: &[Friendship, Family],
            difficulty: 3,
            xp: 100,
            progress_target: 0,
            progress_unit: "units",
        },
        LongTemplate {
            title: "Master of Coin",
            description: "Track every expense for seven days",
            icon: "🪙",
            stat: Prosperity,
            facets: &[Finances, Planning],
            difficulty: 3,
            xp: 100,
            progress_target: 7,
            progress_unit: "days",
        },
        LongTemplate {
            title: "The Long Forging",
            description: "Practice your craft five days this week",
            icon: "⚒️",
            stat: Mastery,
            facets: &[Practice, Consistency],
            difficulty: 3,
            xp: 100,
            progress_target: 5,
            progress_unit: "sessions",
        },
    ]
}

fn epic_catalog() -> Vec<LongTemplate> {
    use StatType::*;
    use SubFacetType::*;

    vec![
        LongTemplate {
            title: "The Great Tome",
            description: "Finish an entire book that challenges you",
            icon: "🏰",
            stat: Intellect,
            facets: &[Learning, Focus],
            difficulty: 4,
            xp: 500,
            progress_target: 300,
            progress_unit: "pages",
        },
        LongTemplate {
            title: "Iron Pilgrimage",
            description: "Train twenty times within the month",
            icon: "⚔️",
            stat: Vitality,
            facets: &[Fitness, Recovery],
            difficulty: 4,
            xp: 500,
            progress_target: 20,
            progress_unit: "sessions",
        },
        LongTemplate {
            title: "The Hundred Breaths",
            description: "Meditate twenty days in a month",
            icon: "🕯️",
            stat: Spirit,
            facets: &[Mindfulness, Resilience],
            difficulty: 4,
            xp: 500,
            progress_target: 20,
            progress_unit: "days",
        },
        LongTemplate {
            title: "Masterwork",
            description: "Take a project from idea to something you can show",
            icon: "🗿",
            stat: Mastery,
            facets: &[Craft, Expression],
            difficulty: 4,
            xp: 500,
            progress_target: 0,
            progress_unit: "units",
        },
    ]
}

/// The stat with the highest selection priority; ties go to the earliest
/// declared stat.
fn top_priority_stat(character: &Character) -> StatType {
    StatType::all()
        .into_iter()
        .map(|s| (s, stat_priority(character, s)))
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .map(|(s, _)| s)
        .unwrap_or(StatType::Intellect)
}

/// A week-long quest aimed at the character's highest priority stat, with a
/// seven day window. Falls back to the whole catalog when that stat has no
/// weekly template.
pub fn generate_weekly_quest(
    character: &Character,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Quest {
    pick_long_template(&weekly_catalog(), character, rng)
        .build(QuestType::Weekly, Duration::days(7), now)
}

/// A month-scale quest for long term goals, same stat targeting as weekly.
pub fn generate_epic_quest(
    character: &Character,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Quest {
    pick_long_template(&epic_catalog(), character, rng)
        .build(QuestType::Epic, Duration::days(30), now)
}

fn pick_long_template<'a>(
    templates: &'a [LongTemplate],
    character: &Character,
    rng: &mut impl Rng,
) -> &'a LongTemplate {
    let top = top_priority_stat(character);
    let matching: Vec<&LongTemplate> = templates.iter().filter(|t| t.stat == top).collect();
    let pool: Vec<&LongTemplate> = if matching.is_empty() {
        templates.iter().collect()
    } else {
        matching
    };
    pool[rng.gen_range(0..pool.len())]
}

/// Context that makes a special quest appropriate right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialTrigger {
    Morning,
    Evening,
    Weekend,
    Random,
}

/// Maps the wall clock to a special-quest trigger: weekends first, then
/// before ten is morning, six in the evening onward is evening.
pub fn time_based_trigger(now: DateTime<Utc>) -> SpecialTrigger {
    use chrono::{Datelike, Timelike, Weekday};
    match now.weekday() {
        Weekday::Sat | Weekday::Sun => SpecialTrigger::Weekend,
        _ if now.hour() < 10 => SpecialTrigger::Morning,
        _ if now.hour() >= 18 => SpecialTrigger::Evening,
        _ => SpecialTrigger::Random,
    }
}

struct SpecialTemplate {
    trigger: SpecialTrigger,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    stat: StatType,
    facets: &'static [SubFacetType],
    duration_minutes: u32,
    difficulty: u8,
    xp: i64,
}

fn special_catalog() -> Vec<SpecialTemplate> {
    use SpecialTrigger::*;
    use StatType::*;
    use SubFacetType::*;

    vec![
        SpecialTemplate {
            trigger: Morning,
            title: "Dawn's First Light",
            description: "Step outside within an hour of waking",
            icon: "🌅",
            stat: Vitality,
            facets: &[Energy],
            duration_minutes: 15,
            difficulty: 2,
            xp: 25,
        },
        SpecialTemplate {
            trigger: Morning,
            title: "Break Fast Like a King",
            description: "Eat a real breakfast before the day's first task",
            icon: "🍳",
            stat: Vitality,
            facets: &[Nutrition],
            duration_minutes: 20,
            difficulty: 1,
            xp: 20,
        },
        SpecialTemplate {
            trigger: Evening,
            title: "Twilight Accounting",
            description: "Write down tomorrow's three most important tasks",
            icon: "🌙",
            stat: Prosperity,
            facets: &[Planning],
            duration_minutes: 10,
            difficulty: 1,
            xp: 20,
        },
        SpecialTemplate {
            trigger: Evening,
            title: "Candlelight Pages",
            description: "Read instead of scrolling for the last half hour",
            icon: "📖",
            stat: Intellect,
            facets: &[Learning],
            duration_minutes: 30,
            difficulty: 2,
            xp: 25,
        },
        SpecialTemplate {
            trigger: Weekend,
            title: "Day of the Wanderer",
            description: "Take a long walk somewhere you have never been",
            icon: "🗺️",
            stat: Intellect,
            facets: &[Curiosity],
            duration_minutes: 90,
            difficulty: 2,
            xp: 40,
        },
        SpecialTemplate {
            trigger: Weekend,
            title: "Open Hearth",
            description: "Host or visit someone instead of staying in",
            icon: "🏡",
            stat: Bonds,
            facets: &[Community],
            duration_minutes: 120,
            difficulty: 2,
            xp: 40,
        },
        SpecialTemplate {
            trigger: Random,
            title: "A Stranger's Errand",
            description: "Do one unplanned act of kindness today",
            icon: "✨",
            stat: Bonds,
            facets: &[Empathy],
            duration_minutes: 15,
            difficulty: 1,
            xp: 25,
        },
    ]
}

/// A one-day special quest matching the trigger, or `None` when no template
/// fits the moment.
pub fn generate_special_quest(
    trigger: SpecialTrigger,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Option<Quest> {
    let templates = special_catalog();
    let matching: Vec<&SpecialTemplate> =
        templates.iter().filter(|t| t.trigger == trigger).collect();
    let template = matching.get(rng.gen_range(0..matching.len().max(1))).copied()?;

    Some(
        Quest::new(template.title, QuestType::Random, template.stat, now)
            .with_description(template.description)
            .with_icon(template.icon)
            .with_xp_reward(template.xp)
            .with_difficulty(template.difficulty)
            .with_duration_minutes(template.duration_minutes)
            .with_target_subfacets(template.facets.iter().copied())
            .with_expiry(now + Duration::hours(24)),
    )
}

/// Rolls the 20% chance for a surprise quest.
pub fn should_spawn_random_encounter(rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < 0.20
}

/// A surprise quest drawn from the low-difficulty templates: half again the
/// normal XP, four hours to take it or lose it.
pub fn generate_random_encounter(rng: &mut impl Rng, now: DateTime<Utc>) -> Quest {
    let templates = catalog();
    let easy: Vec<&QuestTemplate> = templates.iter().filter(|t| t.difficulty <= 2).collect();
    let Some(template) = easy.get(rng.gen_range(0..easy.len().max(1))).copied() else {
        // Catalog somehow empty: a minimal stand-in quest
        return Quest::new("⚡ Quick Challenge", QuestType::Random, StatType::Mastery, now)
            .with_description("Complete a brief task of your choosing")
            .with_icon("🎲")
            .with_xp_reward(15)
            .with_duration_minutes(10)
            .with_expiry(now + Duration::hours(4));
    };

    let mut quest = template.build(now);
    quest.quest_type = QuestType::Random;
    quest.title = format!("⚡ {}", template.title);
    quest.icon = "🎲".to_string();
    quest.xp_reward += quest.xp_reward / 2;
    quest.expires_at = Some(now + Duration::hours(4));
    quest
}
