//! Rule-based lexicon scorer tuned for short, informal social text.
//!
//! Word valences sit on a `[-4, 4]` scale. Boosters, negation, ALL-CAPS
//! emphasis, exclamation marks and "but" contrast all shift the per-word
//! valences before they are summed and squashed into a compound score.

/// Valence per lowercase word.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("outstanding", 3.0),
    ("incredible", 2.8),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("lovely", 2.8),
    ("like", 1.5),
    ("liked", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("delicious", 2.7),
    ("tasty", 2.1),
    ("yummy", 2.2),
    ("fresh", 1.3),
    ("friendly", 2.2),
    ("attentive", 1.6),
    ("welcoming", 2.0),
    ("cozy", 1.7),
    ("cosy", 1.7),
    ("clean", 1.7),
    ("nice", 1.8),
    ("fun", 2.3),
    ("happy", 2.7),
    ("glad", 2.0),
    ("pleasant", 2.3),
    ("recommend", 1.5),
    ("recommended", 1.6),
    ("favourite", 2.0),
    ("favorite", 2.0),
    ("impressive", 2.3),
    ("solid", 1.2),
    ("cool", 1.3),
    ("worth", 0.9),
    ("quick", 1.0),
    ("generous", 2.3),
    ("helpful", 1.8),
    ("beautiful", 2.9),
    ("gem", 2.4),
    ("okay", 0.9),
    ("ok", 1.2),
    ("fine", 0.8),
    ("decent", 1.1),
    ("thanks", 1.9),
    ("win", 2.8),
    // Negative signals
    ("bad", -2.5),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("worst", -3.1),
    ("worse", -2.1),
    ("hate", -2.7),
    ("hated", -3.2),
    ("disgusting", -2.4),
    ("gross", -2.1),
    ("rude", -2.0),
    ("dirty", -1.9),
    ("slow", -1.0),
    ("cold", -0.6),
    ("bitter", -1.8),
    ("bland", -1.1),
    ("stale", -1.6),
    ("soggy", -1.2),
    ("greasy", -1.1),
    ("burnt", -1.3),
    ("overpriced", -1.5),
    ("expensive", -0.9),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("mediocre", -1.0),
    ("meh", -0.3),
    ("poor", -2.1),
    ("wrong", -2.1),
    ("mistake", -1.4),
    ("sick", -1.9),
    ("avoid", -1.2),
    ("never", -0.3),
    ("ignored", -1.7),
    ("annoying", -1.9),
    ("angry", -2.3),
    ("sad", -2.1),
    ("unfriendly", -2.0),
    ("crowded", -0.8),
    ("loud", -0.4),
    ("noisy", -0.9),
    ("problem", -1.7),
    ("fail", -2.5),
    ("failed", -2.3),
    ("waste", -1.8),
    ("unacceptable", -2.0),
    ("ugh", -1.8),
];

/// Intensity modifiers: positive values boost, negative values dampen.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("amazingly", 0.293),
    ("completely", 0.293),
    ("extremely", 0.293),
    ("incredibly", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("super", 0.293),
    ("totally", 0.293),
    ("very", 0.293),
    ("most", 0.293),
    ("barely", -0.293),
    ("kinda", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("marginally", -0.293),
    ("little", -0.293),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nor", "none", "nothing", "nobody", "neither", "without", "cannot",
    "hardly", "isnt", "wasnt", "dont", "didnt", "doesnt", "cant", "wont", "wouldnt", "shouldnt",
    "arent", "werent", "aint",
];

const BOOSTER_DECAY: [f64; 3] = [1.0, 0.95, 0.9];
const NEGATION_SCALAR: f64 = -0.74;
const CAPS_INCREMENT: f64 = 0.733;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f64 = 0.18;
const MAX_QUESTION_AMPLIFIER: f64 = 0.96;
/// Normalization constant for the compound squash `x / sqrt(x² + alpha)`.
const COMPOUND_ALPHA: f64 = 15.0;

/// Output of the lexicon scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconScores {
    /// Normalized overall score in `[-1.0, 1.0]`.
    pub compound: f64,
    /// Share of sentiment mass that is positive, in `[0.0, 1.0]`.
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl LexiconScores {
    fn zero() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
        }
    }
}

struct Token<'a> {
    raw: &'a str,
    lower: String,
}

impl Token<'_> {
    fn is_shouted(&self) -> bool {
        self.raw.chars().any(char::is_alphabetic)
            && self
                .raw
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(char::is_uppercase)
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .filter_map(|word| {
            let raw = word.trim_matches(|c: char| !c.is_alphanumeric());
            if raw.is_empty() {
                return None;
            }
            let lower = raw
                .to_lowercase()
                .chars()
                .filter(|c| *c != '\'' && *c != '\u{2019}')
                .collect();
            Some(Token { raw, lower })
        })
        .collect()
}

fn valence(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, v)| v)
}

fn booster(word: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|&(_, v)| v)
}

/// Apostrophes are already stripped, so "wasn't" arrives as "wasnt".
fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}

/// Score `text` and return compound plus positive/negative/neutral shares.
///
/// Returns all zeros for text with no tokens.
#[must_use]
pub fn lexicon_scores(text: &str) -> LexiconScores {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return LexiconScores::zero();
    }

    let shouted = tokens.iter().filter(|t| t.is_shouted()).count();
    let caps_differential = shouted > 0 && shouted < tokens.len();

    let mut sentiments: Vec<f64> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let Some(base) = valence(&token.lower) else {
            sentiments.push(0.0);
            continue;
        };

        let mut v = base;
        if caps_differential && token.is_shouted() {
            v += CAPS_INCREMENT.copysign(v);
        }

        let mut negated = false;
        for (distance, decay) in BOOSTER_DECAY.iter().enumerate() {
            let Some(prev) = i.checked_sub(distance + 1).map(|j| &tokens[j]) else {
                break;
            };
            if let Some(scalar) = booster(&prev.lower) {
                let scalar = if v < 0.0 { -scalar } else { scalar };
                v += scalar * decay;
            }
            if is_negation(&prev.lower) {
                negated = true;
            }
        }
        if negated {
            v *= NEGATION_SCALAR;
        }

        sentiments.push(v);
    }

    apply_but_contrast(&tokens, &mut sentiments);

    let punctuation = punctuation_emphasis(text);
    let sum: f64 = sentiments.iter().sum();
    let emphasized = if sum > 0.0 {
        sum + punctuation
    } else if sum < 0.0 {
        sum - punctuation
    } else {
        sum
    };
    let compound = (emphasized / (emphasized * emphasized + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0);

    let (mut pos_sum, mut neg_sum, mut neu_count) = (0.0_f64, 0.0_f64, 0.0_f64);
    for &s in &sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += punctuation;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punctuation;
    }
    let total = pos_sum + neg_sum.abs() + neu_count;
    if total <= 0.0 {
        return LexiconScores {
            compound,
            ..LexiconScores::zero()
        };
    }

    LexiconScores {
        compound,
        positive: (pos_sum / total).abs(),
        negative: (neg_sum / total).abs(),
        neutral: (neu_count / total).abs(),
    }
}

/// Compound lexicon score in `[-1.0, 1.0]`. `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    lexicon_scores(text).compound
}

/// Words before a "but" count half, words after it count one and a half.
fn apply_but_contrast(tokens: &[Token<'_>], sentiments: &mut [f64]) {
    let Some(pivot) = tokens.iter().position(|t| t.lower == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *s *= 0.5;
        } else if i > pivot {
            *s *= 1.5;
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_amp = if questions > 1 {
        (questions as f64 * QUESTION_INCREMENT).min(MAX_QUESTION_AMPLIFIER)
    } else {
        0.0
    };
    exclamations as f64 * EXCLAMATION_INCREMENT + question_amp
}
