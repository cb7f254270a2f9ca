/// Aggregated view of round progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundProgress {
    pub total: usize,
    /// Zero-based index of the active question; equals `total` once complete.
    pub index: usize,
    pub score: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
