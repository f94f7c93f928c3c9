//! Synthetic row payloads.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::db::Value;

/// Upper bound (inclusive) of the random `b` column.
pub const MAX_B: i64 = 100_000;

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "ten", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 3] = [
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Spell `n` out in English words, e.g. `4021` is "four thousand twenty one".
pub fn number_name(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut words = Vec::new();
    push_words(n, &mut words);
    words.join(" ")
}

fn push_words(mut n: u64, words: &mut Vec<&'static str>) {
    for (scale, name) in SCALES {
        if n >= scale {
            push_words(n / scale, words);
            words.push(name);
            n %= scale;
        }
    }
    if n >= 100 {
        words.push(ONES[(n / 100) as usize]);
        words.push("hundred");
        n %= 100;
    }
    if n >= 20 {
        words.push(TENS[(n / 10) as usize]);
        n %= 10;
    }
    if n > 0 {
        words.push(ONES[n as usize]);
    }
}

pub fn round_to_two_digits(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub a: i64,
    pub b: i64,
    pub c: String,
}

impl Row {
    pub fn params(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.a),
            Value::Integer(self.b),
            Value::Text(self.c.clone()),
        ]
    }
}

/// Produces rows with a random `b` column.
///
/// Runs from the command line draw from entropy; a seeded generator makes the
/// exact row contents reproducible.
pub struct RowGenerator {
    rng: SmallRng,
}

impl RowGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Row for the `index`-th (0-based) insert of a workload.
    pub fn row(&mut self, index: usize) -> Row {
        let b = self.rng.gen_range(0..=MAX_B);
        Row {
            a: index as i64 + 1,
            b,
            c: number_name(b as u64),
        }
    }
}
