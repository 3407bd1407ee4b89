//! Averaged word-polarity scorer.
//!
//! Independent of the lexicon scorer: its own word list on a `[-1, 1]`
//! scale, multiplicative intensifiers, and a softer negation. The result is
//! the mean polarity of the scored words, so one strong word in a long
//! sentence still carries full weight.

/// Polarity per lowercase word.
const POLARITY: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("fantastic", 0.4),
    ("wonderful", 1.0),
    ("outstanding", 0.5),
    ("incredible", 0.9),
    ("perfect", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("enjoyed", 0.4),
    ("delicious", 1.0),
    ("tasty", 0.8),
    ("yummy", 0.8),
    ("fresh", 0.3),
    ("friendly", 0.375),
    ("attentive", 0.4),
    ("welcoming", 0.5),
    ("cozy", 0.5),
    ("cosy", 0.5),
    ("clean", 0.367),
    ("nice", 0.6),
    ("fun", 0.3),
    ("happy", 0.8),
    ("pleasant", 0.733),
    ("favourite", 0.5),
    ("favorite", 0.5),
    ("impressive", 1.0),
    ("solid", 0.3),
    ("cool", 0.35),
    ("quick", 0.333),
    ("fast", 0.2),
    ("generous", 0.5),
    ("helpful", 0.5),
    ("beautiful", 0.85),
    ("okay", 0.5),
    ("ok", 0.5),
    ("fine", 0.417),
    ("decent", 0.167),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("hate", -0.8),
    ("disgusting", -1.0),
    ("gross", -0.5),
    ("rude", -0.3),
    ("dirty", -0.6),
    ("slow", -0.3),
    ("cold", -0.6),
    ("bitter", -0.1),
    ("bland", -0.5),
    ("stale", -0.5),
    ("soggy", -0.4),
    ("greasy", -0.3),
    ("burnt", -0.4),
    ("salty", -0.2),
    ("dry", -0.067),
    ("overpriced", -0.5),
    ("expensive", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("mediocre", -0.3),
    ("poor", -0.4),
    ("wrong", -0.5),
    ("sick", -0.714),
    ("annoying", -0.8),
    ("angry", -0.5),
    ("sad", -0.5),
    ("crowded", -0.2),
    ("loud", -0.1),
    ("noisy", -0.3),
];

/// Multipliers applied to the next scored word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.4),
    ("too", 1.2),
    ("pretty", 1.1),
    ("quite", 1.1),
    ("slightly", 0.8),
    ("somewhat", 0.8),
    ("kinda", 0.8),
];

const NEGATORS: &[&str] = &[
    "not", "never", "no", "isnt", "wasnt", "dont", "didnt", "doesnt", "arent", "werent", "cant",
    "wont",
];

const NEGATION_FACTOR: f64 = -0.5;

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table.iter().find(|(w, _)| *w == word).map(|&(_, v)| v)
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
                .chars()
                .filter(|c| *c != '\'' && *c != '\u{2019}')
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Mean polarity of the known words in `text`, in `[-1.0, 1.0]`.
///
/// Each scored word looks back over the run of modifiers directly before it:
/// intensifiers multiply, a negator multiplies by `-0.5`. Returns `0.0` when
/// no word carries polarity.
#[must_use]
pub fn polarity_score(text: &str) -> f64 {
    let words = words(text);

    let mut assessed: Vec<f64> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let Some(mut polarity) = lookup(POLARITY, word) else {
            continue;
        };

        let mut j = i;
        while j > 0 {
            j -= 1;
            let prev = words[j].as_str();
            if let Some(factor) = lookup(INTENSIFIERS, prev) {
                polarity *= factor;
            } else if NEGATORS.contains(&prev) {
                polarity *= NEGATION_FACTOR;
            } else {
                break;
            }
        }

        assessed.push(polarity.clamp(-1.0, 1.0));
    }

    if assessed.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = assessed.iter().sum::<f64>() / assessed.len() as f64;
    mean.clamp(-1.0, 1.0)
}
