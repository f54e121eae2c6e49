//! The founding interview: a short self-assessment that seeds initial
//! sub-facet scores so a new character does not start from a blank sheet.

use std::collections::BTreeMap;

/// Answers are on a 1-5 agreement scale; each point seeds this much base
/// score into the question's facet (5 -> 20 score -> facet level 5).
const SCORE_PER_POINT: i64 = 4;

#[derive(Debug, Clone, Copy)]
pub struct InterviewQuestion {
    pub id: &'static str,
    pub prompt: &'static str,
    /// "dimension.subfacet" key the answer feeds
    pub score_key: &'static str,
}

/// The question set, two per stat.
pub fn default_interview() -> Vec<InterviewQuestion> {
    vec![
        InterviewQuestion {
            id: "int_learning",
            prompt: "I regularly make time to learn things outside my obligations",
            score_key: "intellect.learning",
        },
        InterviewQuestion {
            id: "int_focus",
            prompt: "I can hold deep focus on one task for long stretches",
            score_key: "intellect.focus",
        },
        InterviewQuestion {
            id: "vit_fitness",
            prompt: "I move my body vigorously several times a week",
            score_key: "vitality.fitness",
        },
        InterviewQuestion {
            id: "vit_sleep",
            prompt: "I wake up rested most mornings",
            score_key: "vitality.sleep",
        },
        InterviewQuestion {
            id: "spi_mindfulness",
            prompt: "I notice my own moods and thoughts as they happen",
            score_key: "spirit.mindfulness",
        },
        InterviewQuestion {
            id: "spi_resilience",
            prompt: "Setbacks knock me down but rarely keep me down",
            score_key: "spirit.resilience",
        },
        InterviewQuestion {
            id: "bon_friendship",
            prompt: "I stay in genuine touch with the people who matter to me",
            score_key: "bonds.friendship",
        },
        InterviewQuestion {
            id: "bon_empathy",
            prompt: "People come to me when they need to be heard",
            score_key: "bonds.empathy",
        },
        InterviewQuestion {
            id: "pro_finances",
            prompt: "I know where my money goes each month",
            score_key: "prosperity.finances",
        },
        InterviewQuestion {
            id: "pro_career",
            prompt: "My work is moving in a direction I chose",
            score_key: "prosperity.career",
        },
        InterviewQuestion {
            id: "mas_discipline",
            prompt: "I keep my core habits even on bad days",
            score_key: "mastery.discipline",
        },
        InterviewQuestion {
            id: "mas_craft",
            prompt: "There is a craft I practice deliberately to get better at",
            score_key: "mastery.craft",
        },
    ]
}

/// Turns answers (question id -> 1-5) into facet score seeds keyed as
/// "dimension.subfacet". Out-of-range answers clamp; unknown question ids
/// are ignored.
pub fn score_answers(answers: &BTreeMap<String, u8>) -> BTreeMap<String, i64> {
    let questions = default_interview();
    let mut scores = BTreeMap::new();
    for (id, answer) in answers {
        let Some(question) = questions.iter().find(|q| q.id == id.as_str()) else {
            continue;
        };
        let answer = i64::from((*answer).clamp(1, 5));
        *scores.entry(question.score_key.to_string()).or_insert(0) +=
            answer * SCORE_PER_POINT;
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use abitus_domain::parse_score_key;

    #[test]
    fn test_every_score_key_is_valid() {
        for q in default_interview() {
            assert!(parse_score_key(q.score_key).is_ok(), "{}", q.score_key);
        }
    }

    #[test]
    fn test_question_ids_unique() {
        let questions = default_interview();
        let mut ids: Vec<&str> = questions.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), questions.len());
    }

    #[test]
    fn test_score_answers_scales_and_clamps() {
        let mut answers = BTreeMap::new();
        answers.insert("int_learning".to_string(), 5u8);
        answers.insert("vit_sleep".to_string(), 0u8); // clamps to 1
        answers.insert("made_up_question".to_string(), 5u8);

        let scores = score_answers(&answers);
        assert_eq!(scores.get("intellect.learning"), Some(&20));
        assert_eq!(scores.get("vitality.sleep"), Some(&4));
        assert_eq!(scores.len(), 2);
    }
}
