//! Output shapes of an analysis: sentiment triple, display
//! intensity and the final vibe verdict with explainability.
//!
//! Every numeric field is clamped when the value is built (including on
//! deserialization), so downstream consumers never see out-of-range values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyze::intensity::{INTENSITY_CEILING, INTENSITY_FLOOR};
use crate::vibe::Vibe;

/// Maximum number of keywords carried by a result.
pub const MAX_KEYWORDS: usize = 5;

/// Positivity / energy / complexity, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SentimentRepr")]
pub struct SentimentScore {
    positivity: f32,
    energy: f32,
    complexity: f32,
}

#[derive(Deserialize)]
struct SentimentRepr {
    positivity: f32,
    energy: f32,
    complexity: f32,
}

impl From<SentimentRepr> for SentimentScore {
    fn from(r: SentimentRepr) -> Self {
        Self::new(r.positivity, r.energy, r.complexity)
    }
}

impl SentimentScore {
    pub fn new(positivity: f32, energy: f32, complexity: f32) -> Self {
        Self {
            positivity: clamp01(positivity),
            energy: clamp01(energy),
            complexity: clamp01(complexity),
        }
    }

    /// Score used when there is nothing to read.
    pub fn neutral() -> Self {
        Self::new(0.5, 0.5, 0.0)
    }

    pub fn positivity(&self) -> f32 {
        self.positivity
    }
    pub fn energy(&self) -> f32 {
        self.energy
    }
    pub fn complexity(&self) -> f32 {
        self.complexity
    }
}

/// Display intensity for the selected vibe, in `[0.3, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IntensityRepr")]
pub struct IntensityInfo {
    vibe: Vibe,
    description: String,
    intensity: f32,
}

#[derive(Deserialize)]
struct IntensityRepr {
    vibe: Vibe,
    description: String,
    intensity: f32,
}

impl From<IntensityRepr> for IntensityInfo {
    fn from(r: IntensityRepr) -> Self {
        Self {
            vibe: r.vibe,
            description: r.description,
            intensity: clamp_intensity(r.intensity),
        }
    }
}

impl IntensityInfo {
    pub fn new(vibe: Vibe, intensity: f32) -> Self {
        Self {
            vibe,
            description: vibe.description().to_string(),
            intensity: clamp_intensity(intensity),
        }
    }

    pub fn vibe(&self) -> Vibe {
        self.vibe
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn intensity(&self) -> f32 {
        self.intensity
    }
}

/// Final verdict for one batch. Built fresh per analysis and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnalysisRepr")]
pub struct AnalysisResult {
    vibe: Vibe,
    confidence: f32,
    rationale: String,
    keywords: Vec<String>,
    sentiment: SentimentScore,
    analyzed_at: DateTime<Utc>,
    intensity_info: IntensityInfo,
}

#[derive(Deserialize)]
struct AnalysisRepr {
    vibe: Vibe,
    confidence: f32,
    rationale: String,
    #[serde(default)]
    keywords: Vec<String>,
    sentiment: SentimentScore,
    analyzed_at: DateTime<Utc>,
    intensity_info: IntensityInfo,
}

impl From<AnalysisRepr> for AnalysisResult {
    fn from(mut r: AnalysisRepr) -> Self {
        r.keywords.truncate(MAX_KEYWORDS);
        Self {
            vibe: r.vibe,
            confidence: clamp01(r.confidence),
            rationale: r.rationale,
            keywords: r.keywords,
            sentiment: r.sentiment,
            analyzed_at: r.analyzed_at,
            // Rebuilt so the display block always names the selected vibe.
            intensity_info: IntensityInfo::new(r.vibe, r.intensity_info.intensity),
        }
    }
}

impl AnalysisResult {
    pub fn new(
        vibe: Vibe,
        confidence: f32,
        rationale: impl Into<String>,
        mut keywords: Vec<String>,
        sentiment: SentimentScore,
        analyzed_at: DateTime<Utc>,
        intensity: f32,
    ) -> Self {
        keywords.truncate(MAX_KEYWORDS);
        Self {
            vibe,
            confidence: clamp01(confidence),
            rationale: rationale.into(),
            keywords,
            sentiment,
            analyzed_at,
            intensity_info: IntensityInfo::new(vibe, intensity),
        }
    }

    pub fn vibe(&self) -> Vibe {
        self.vibe
    }
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
    pub fn rationale(&self) -> &str {
        &self.rationale
    }
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
    pub fn sentiment(&self) -> &SentimentScore {
        &self.sentiment
    }
    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }
    pub fn intensity_info(&self) -> &IntensityInfo {
        &self.intensity_info
    }
}

/// NaN collapses to 0 so a bad upstream number cannot escape the range.
pub(crate) fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

fn clamp_intensity(x: f32) -> f32 {
    if x.is_nan() {
        INTENSITY_FLOOR
    } else {
        x.clamp(INTENSITY_FLOOR, INTENSITY_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts() -> DateTime<Utc> {
        "2025-08-16T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn sentiment_is_clamped_on_construction() {
        let s = SentimentScore::new(1.7, -0.2, f32::NAN);
        assert_eq!(s.positivity(), 1.0);
        assert_eq!(s.energy(), 0.0);
        assert_eq!(s.complexity(), 0.0);
    }

    #[test]
    fn deserialization_cannot_bypass_clamping() {
        let s: SentimentScore =
            serde_json::from_value(json!({"positivity": 3.0, "energy": 0.4, "complexity": -1.0}))
                .unwrap();
        assert_eq!(s.positivity(), 1.0);
        assert_eq!(s.complexity(), 0.0);

        let info: IntensityInfo = serde_json::from_value(
            json!({"vibe": "serene", "description": "x", "intensity": 0.01}),
        )
        .unwrap();
        assert_eq!(info.intensity(), INTENSITY_FLOOR);
    }

    #[test]
    fn result_shape_serializes_with_snake_case_tags() {
        let r = AnalysisResult::new(
            Vibe::Hopeful,
            1.4,
            "Bright day.",
            vec!["a", "b", "c", "d", "e", "f"]
                .into_iter()
                .map(String::from)
                .collect(),
            SentimentScore::new(0.9, 0.6, 0.4),
            ts(),
            0.75,
        );
        assert_eq!(r.confidence(), 1.0);
        assert_eq!(r.keywords().len(), MAX_KEYWORDS);

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["vibe"], json!("hopeful"));
        assert_eq!(v["intensity_info"]["vibe"], json!("hopeful"));
        assert!(v["sentiment"]["positivity"].as_f64().unwrap() > 0.89);
        assert_eq!(v["analyzed_at"], json!("2025-08-16T10:00:00Z"));

        let back: AnalysisResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn deserialized_intensity_follows_the_selected_vibe() {
        let v = json!({
            "vibe": "serene",
            "confidence": 0.4,
            "rationale": "Calm.",
            "keywords": [],
            "sentiment": {"positivity": 0.6, "energy": 0.2, "complexity": 0.1},
            "analyzed_at": "2025-08-16T10:00:00Z",
            "intensity_info": {"vibe": "chaotic", "description": "x", "intensity": 0.8}
        });
        let r: AnalysisResult = serde_json::from_value(v).unwrap();
        assert_eq!(r.intensity_info().vibe(), Vibe::Serene);
        assert_eq!(r.intensity_info().description(), Vibe::Serene.description());
        assert!((r.intensity_info().intensity() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn intensity_info_carries_vibe_description() {
        let info = IntensityInfo::new(Vibe::Somber, 2.0);
        assert_eq!(info.description(), Vibe::Somber.description());
        assert_eq!(info.intensity(), INTENSITY_CEILING);
    }
}
