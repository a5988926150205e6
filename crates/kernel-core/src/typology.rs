//! Categorical labels derived from the continuous OCEAN vector.

use contracts::personality::TRAIT_MIDPOINT;
use contracts::{EnneagramProfile, MbtiProfile, TraitVector};

const MBTI_TABLE: [(&str, &str, &str); 16] = [
    (
        "INTJ",
        "The Architect",
        "Strategic and independent, you build long-range plans and trust your own judgement.",
    ),
    (
        "INTP",
        "The Logician",
        "Curious and analytical, you chase ideas for their own sake and question every assumption.",
    ),
    (
        "ENTJ",
        "The Commander",
        "Decisive and driven, you organise people and resources toward ambitious goals.",
    ),
    (
        "ENTP",
        "The Debater",
        "Quick and inventive, you thrive on challenge and enjoy testing ideas against others.",
    ),
    (
        "INFJ",
        "The Advocate",
        "Insightful and principled, you look for meaning and quietly work toward a better world.",
    ),
    (
        "INFP",
        "The Mediator",
        "Idealistic and empathetic, you are guided by your values and a rich inner life.",
    ),
    ("ENFJ", "The Protagonist", "Warm and inspiring, you draw people together and help them grow."),
    (
        "ENFP",
        "The Campaigner",
        "Enthusiastic and imaginative, you see possibility everywhere and connect easily.",
    ),
    (
        "ISTJ",
        "The Logistician",
        "Dependable and thorough, you honour commitments and value proven methods.",
    ),
    (
        "ISFJ",
        "The Defender",
        "Caring and steady, you protect the people you love with quiet dedication.",
    ),
    (
        "ESTJ",
        "The Executive",
        "Practical and orderly, you bring structure and follow through on what matters.",
    ),
    (
        "ESFJ",
        "The Consul",
        "Sociable and attentive, you keep communities running and make others feel welcome.",
    ),
    (
        "ISTP",
        "The Virtuoso",
        "Hands-on and composed, you solve problems as they arise and learn by doing.",
    ),
    (
        "ISFP",
        "The Adventurer",
        "Gentle and spontaneous, you live in the moment and express yourself through experience.",
    ),
    (
        "ESTP",
        "The Entrepreneur",
        "Bold and energetic, you act fast, take risks and read situations instantly.",
    ),
    (
        "ESFP",
        "The Entertainer",
        "Lively and generous, you bring fun to every room and embrace what life offers.",
    ),
];

const MBTI_FALLBACK_LABEL: &str = "The Individual";
const MBTI_FALLBACK_DESCRIPTION: &str =
    "A unique blend of tendencies that does not fit neatly into a single type.";

const ENNEAGRAM_TABLE: [(&str, &str); 9] = [
    ("The Reformer", "Principled and purposeful, driven by a wish to get things right."),
    ("The Helper", "Generous and people-pleasing, motivated by being needed and loved."),
    ("The Achiever", "Adaptable and success-oriented, focused on accomplishment and image."),
    ("The Individualist", "Expressive and introspective, searching for identity and authenticity."),
    ("The Investigator", "Perceptive and private, seeking understanding and competence."),
    ("The Loyalist", "Committed and security-minded, looking for support and guidance."),
    ("The Enthusiast", "Spontaneous and versatile, chasing new experiences and avoiding pain."),
    ("The Challenger", "Self-confident and protective, determined to stay in control."),
    ("The Peacemaker", "Easygoing and receptive, wanting inner stability and harmony."),
];

/// Four-letter code; every axis treats exactly 50 as the "high" letter.
pub fn mbti_code(vector: &TraitVector) -> String {
    let pick = |value: f64, high: char, low: char| if value >= TRAIT_MIDPOINT { high } else { low };
    [
        pick(vector.extraversion, 'E', 'I'),
        pick(vector.openness, 'N', 'S'),
        pick(vector.agreeableness, 'F', 'T'),
        pick(vector.conscientiousness, 'J', 'P'),
    ]
    .into_iter()
    .collect()
}

pub fn mbti_profile_for(code: &str) -> MbtiProfile {
    let (label, description) = MBTI_TABLE
        .iter()
        .find(|(entry, _, _)| *entry == code)
        .map(|(_, label, description)| (*label, *description))
        .unwrap_or((MBTI_FALLBACK_LABEL, MBTI_FALLBACK_DESCRIPTION));
    MbtiProfile {
        code: code.to_string(),
        label: label.to_string(),
        description: description.to_string(),
    }
}

/// Scores for types 1..=9, index 0 holding type 1.
pub fn enneagram_scores(vector: &TraitVector) -> [f64; 9] {
    let o = vector.openness;
    let c = vector.conscientiousness;
    let e = vector.extraversion;
    let a = vector.agreeableness;
    let n = vector.neuroticism;
    [
        1.5 * c + 0.5 * (100.0 - a) - 0.3 * o,
        1.5 * a + 0.5 * e + 0.3 * n,
        c + e + 0.5 * (100.0 - a),
        o + n + 0.5 * (100.0 - e),
        o + (100.0 - e) + 0.5 * (100.0 - a),
        n + 0.5 * a + 0.5 * c,
        o + e + 0.5 * (100.0 - n),
        e + (100.0 - a) + 0.5 * (100.0 - n),
        a + (100.0 - n) + 0.3 * (100.0 - c),
    ]
}

/// Highest-scoring type; a later type must score strictly higher to win, so
/// ties go to the smaller type number.
pub fn enneagram_type(scores: &[f64; 9]) -> u8 {
    let mut best = 0;
    for (idx, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = idx;
        }
    }
    best as u8 + 1
}

pub fn enneagram_profile(vector: &TraitVector) -> EnneagramProfile {
    let scores = enneagram_scores(vector);
    let type_id = enneagram_type(&scores);
    let (name, description) = ENNEAGRAM_TABLE[usize::from(type_id - 1)];
    EnneagramProfile {
        type_id,
        name: name.to_string(),
        description: description.to_string(),
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(o: f64, c: f64, e: f64, a: f64, n: f64) -> TraitVector {
        TraitVector {
            openness: o,
            conscientiousness: c,
            extraversion: e,
            agreeableness: a,
            neuroticism: n,
        }
    }

    #[test]
    fn mbti_uses_inclusive_midpoint() {
        assert_eq!(mbti_code(&TraitVector::uniform(50.0)), "ENFJ");
        assert_eq!(mbti_code(&TraitVector::uniform(49.9)), "ISTP");
    }

    #[test]
    fn mbti_reads_each_axis_from_its_dimension() {
        assert_eq!(mbti_code(&vector(60.0, 40.0, 70.0, 30.0, 50.0)), "ENTP");
        assert_eq!(mbti_code(&vector(20.0, 80.0, 10.0, 90.0, 50.0)), "ISFJ");
    }

    #[test]
    fn every_derivable_code_has_a_table_entry() {
        for e in [0.0, 100.0] {
            for o in [0.0, 100.0] {
                for a in [0.0, 100.0] {
                    for c in [0.0, 100.0] {
                        let code = mbti_code(&vector(o, c, e, a, 50.0));
                        assert_ne!(mbti_profile_for(&code).label, MBTI_FALLBACK_LABEL, "{code}");
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_code_gets_fallback_profile() {
        let profile = mbti_profile_for("XXXX");
        assert_eq!(profile.code, "XXXX");
        assert_eq!(profile.label, MBTI_FALLBACK_LABEL);
    }

    #[test]
    fn enneagram_tie_goes_to_lowest_type() {
        // At the midpoint types 3, 4, 5, 7 and 8 all score 125.
        let scores = enneagram_scores(&TraitVector::uniform(50.0));
        assert_eq!(scores[2], 125.0);
        assert_eq!(scores[3], 125.0);
        assert_eq!(scores[7], 125.0);
        assert_eq!(enneagram_type(&scores), 3);
    }

    #[test]
    fn enneagram_tie_between_two_leaders() {
        let mut scores = [0.0; 9];
        scores[5] = 10.0;
        scores[8] = 10.0;
        assert_eq!(enneagram_type(&scores), 6);
    }

    #[test]
    fn enneagram_picks_clear_winner() {
        // High agreeableness and extraversion favours the Helper.
        let profile = enneagram_profile(&vector(50.0, 50.0, 80.0, 100.0, 80.0));
        assert_eq!(profile.type_id, 2);
        assert_eq!(profile.name, "The Helper");
    }
}
