//! Display intensity: how strongly the UI should render the selected vibe.

use crate::result::SentimentScore;

pub const INTENSITY_FLOOR: f32 = 0.3;
pub const INTENSITY_CEILING: f32 = 1.0;

/// `0.6 * confidence + 0.3 * energy + 0.1 * polarity`, clamped to
/// `[INTENSITY_FLOOR, INTENSITY_CEILING]`, where polarity is the distance of
/// positivity from neutral scaled to `[0, 1]`.
pub fn intensity(confidence: f32, sentiment: &SentimentScore) -> f32 {
    let polarity = 2.0 * (sentiment.positivity() - 0.5).abs();
    let raw = 0.6 * confidence + 0.3 * sentiment.energy() + 0.1 * polarity;
    raw.clamp(INTENSITY_FLOOR, INTENSITY_CEILING)
}
