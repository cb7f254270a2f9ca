use serde::Serialize;

/// Message shown when every question in a round was answered correctly.
pub const CELEBRATION_MESSAGE: &str = "Perfekt omgång! Alla rätt! 🎉";

//
// ─── RESULT TIER ───────────────────────────────────────────────────────────────
//

/// Message tier for a non-perfect round, picked by the share of correct answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTier {
    /// 90% or better.
    Top,
    /// 70% up to 90%.
    Mid,
    /// Below 70%.
    Encouragement,
}

impl ResultTier {
    /// Selects the tier for `score / total`.
    ///
    /// Thresholds are compared in integer percent space so that 18/20 lands
    /// exactly on the 90% boundary.
    #[must_use]
    pub fn for_score(score: usize, total: usize) -> Self {
        let scaled = score.saturating_mul(100);
        if scaled >= total.saturating_mul(90) {
            ResultTier::Top
        } else if scaled >= total.saturating_mul(70) {
            ResultTier::Mid
        } else {
            ResultTier::Encouragement
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Top => "Fantastiskt! Du är en multiplikationsmästare! 🏆",
            ResultTier::Mid => "Bra jobbat! Fortsätt träna så blir du ännu bättre. 👍",
            ResultTier::Encouragement => "Fortsätt öva tabellerna – du klarar nästa omgång! 💪",
        }
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Final result of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RoundOutcome {
    /// Perfect round.
    Celebration {
        score: usize,
        total: usize,
        message: &'static str,
    },
    Results {
        score: usize,
        total: usize,
        tier: ResultTier,
        message: &'static str,
    },
}

impl RoundOutcome {
    #[must_use]
    pub fn from_score(score: usize, total: usize) -> Self {
        if score == total {
            return RoundOutcome::Celebration {
                score,
                total,
                message: CELEBRATION_MESSAGE,
            };
        }
        let tier = ResultTier::for_score(score, total);
        RoundOutcome::Results {
            score,
            total,
            tier,
            message: tier.message(),
        }
    }

    #[must_use]
    pub fn score(&self) -> usize {
        match self {
            RoundOutcome::Celebration { score, .. } | RoundOutcome::Results { score, .. } => *score,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        match self {
            RoundOutcome::Celebration { total, .. } | RoundOutcome::Results { total, .. } => *total,
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            RoundOutcome::Celebration { message, .. } | RoundOutcome::Results { message, .. } => {
                message
            }
        }
    }

    #[must_use]
    pub fn is_celebration(&self) -> bool {
        matches!(self, RoundOutcome::Celebration { .. })
    }

    /// Tier of a non-perfect round; `None` for a celebration.
    #[must_use]
    pub fn tier(&self) -> Option<ResultTier> {
        match self {
            RoundOutcome::Celebration { .. } => None,
            RoundOutcome::Results { tier, .. } => Some(*tier),
        }
    }
}
