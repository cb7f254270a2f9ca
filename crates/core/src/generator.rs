use log::debug;
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::model::{MAX_FACTOR, MIN_FACTOR, Question};

/// Number of distinct questions in the 10×10 table.
pub const POOL_SIZE: usize = 100;

/// Relative selection weight of a single factor.
///
/// Factors 2 through 9 are twice as likely as 1 and 10.
#[must_use]
pub fn weight_factor(n: u8) -> u32 {
    if (2..=9).contains(&n) { 2 } else { 1 }
}

//
// ─── POOL ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy)]
struct PoolEntry {
    question: Question,
    weight: u32,
}

fn build_pool() -> Vec<PoolEntry> {
    let mut pool = Vec::with_capacity(POOL_SIZE);
    for a in MIN_FACTOR..=MAX_FACTOR {
        for b in MIN_FACTOR..=MAX_FACTOR {
            if let Ok(question) = Question::new(a, b) {
                pool.push(PoolEntry {
                    question,
                    weight: weight_factor(a) * weight_factor(b),
                });
            }
        }
    }
    pool
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Builds rounds by weighted sampling without replacement from the 10×10 table.
///
/// Each draw picks from the entries still in the pool with probability
/// proportional to their weight, then removes the pick. A round therefore never
/// repeats an `(a, b)` pair.
///
/// # Examples
///
/// ```
/// # use drill_core::generator::RoundGenerator;
/// # use rand::SeedableRng;
/// let mut generator = RoundGenerator::with_rng(rand::rngs::StdRng::seed_from_u64(1));
/// let questions = generator.generate(10);
/// assert_eq!(questions.len(), 10);
/// ```
#[derive(Debug)]
pub struct RoundGenerator<R = ThreadRng> {
    rng: R,
}

impl RoundGenerator<ThreadRng> {
    #[must_use]
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RoundGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RoundGenerator<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generates `min(count, 100)` distinct questions in draw order.
    ///
    /// Requests above the pool size are clamped; repeats are never used to
    /// pad a round.
    pub fn generate(&mut self, count: usize) -> Vec<Question> {
        let n = count.min(POOL_SIZE);
        if n < count {
            debug!("clamping round of {count} questions to pool size {POOL_SIZE}");
        }

        let mut pool = build_pool();
        let mut questions = Vec::with_capacity(n);

        for _ in 0..n {
            let total_weight: u32 = pool.iter().map(|entry| entry.weight).sum();
            let draw = self.rng.random_range(0..total_weight);

            let mut cursor = 0;
            let mut selected = pool.len() - 1;
            for (idx, entry) in pool.iter().enumerate() {
                cursor += entry.weight;
                if cursor > draw {
                    selected = idx;
                    break;
                }
            }

            questions.push(pool.remove(selected).question);
        }

        questions
    }
}
