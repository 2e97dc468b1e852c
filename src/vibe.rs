//! # Vibes
//! The closed set of mood categories and their static metadata.
//!
//! Metadata lives in `data/vibes.json` and is parsed once on first use. The
//! pipeline never branches on individual variants: adding a vibe means adding
//! a variant here and a record in the table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Discrete mood label assigned to a batch of news.
///
/// Declaration order matters: it is the tie-break order used by selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vibe {
    Hopeful,
    Melancholic,
    Uncertain,
    Chaotic,
    Celebratory,
    Tense,
    Reflective,
    Nostalgic,
    Anxious,
    Serene,
    Triumphant,
    Somber,
    Curious,
    Defiant,
    Whimsical,
    Resilient,
    Turbulent,
    Tender,
    Awestruck,
    Contemplative,
}

impl Vibe {
    pub const ALL: [Vibe; 20] = [
        Vibe::Hopeful,
        Vibe::Melancholic,
        Vibe::Uncertain,
        Vibe::Chaotic,
        Vibe::Celebratory,
        Vibe::Tense,
        Vibe::Reflective,
        Vibe::Nostalgic,
        Vibe::Anxious,
        Vibe::Serene,
        Vibe::Triumphant,
        Vibe::Somber,
        Vibe::Curious,
        Vibe::Defiant,
        Vibe::Whimsical,
        Vibe::Resilient,
        Vibe::Turbulent,
        Vibe::Tender,
        Vibe::Awestruck,
        Vibe::Contemplative,
    ];

    /// Fallback when a batch carries no usable signal.
    pub const NEUTRAL: Vibe = Vibe::Contemplative;

    /// Stable lowercase tag (same as the serde representation).
    pub fn tag(self) -> &'static str {
        match self {
            Vibe::Hopeful => "hopeful",
            Vibe::Melancholic => "melancholic",
            Vibe::Uncertain => "uncertain",
            Vibe::Chaotic => "chaotic",
            Vibe::Celebratory => "celebratory",
            Vibe::Tense => "tense",
            Vibe::Reflective => "reflective",
            Vibe::Nostalgic => "nostalgic",
            Vibe::Anxious => "anxious",
            Vibe::Serene => "serene",
            Vibe::Triumphant => "triumphant",
            Vibe::Somber => "somber",
            Vibe::Curious => "curious",
            Vibe::Defiant => "defiant",
            Vibe::Whimsical => "whimsical",
            Vibe::Resilient => "resilient",
            Vibe::Turbulent => "turbulent",
            Vibe::Tender => "tender",
            Vibe::Awestruck => "awestruck",
            Vibe::Contemplative => "contemplative",
        }
    }

    /// Case-insensitive reverse lookup of [`Vibe::tag`].
    pub fn from_tag(tag: &str) -> Option<Vibe> {
        let tag = tag.trim();
        Vibe::ALL
            .iter()
            .copied()
            .find(|v| v.tag().eq_ignore_ascii_case(tag))
    }

    pub fn profile(self) -> &'static VibeProfile {
        // Completeness is checked when the table is built.
        &TABLE[&self]
    }

    pub fn display_name(self) -> &'static str {
        &self.profile().display_name
    }

    pub fn description(self) -> &'static str {
        &self.profile().description
    }

    /// Vibes that read as bad news.
    pub fn is_negative_leaning(self) -> bool {
        matches!(
            self,
            Vibe::Melancholic
                | Vibe::Uncertain
                | Vibe::Chaotic
                | Vibe::Tense
                | Vibe::Anxious
                | Vibe::Somber
                | Vibe::Turbulent
        )
    }
}

impl std::fmt::Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Light/dark display gradients, two hex stops each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub light: [String; 2],
    pub dark: [String; 2],
}

/// Immutable metadata attached to every vibe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibeProfile {
    pub display_name: String,
    pub description: String,
    /// Poem prompt; `{keywords}` is replaced by [`VibeProfile::render_prompt`].
    pub prompt_template: String,
    pub emoji: String,
    /// Lowercase lexicon, ordered by importance (the first five seed the
    /// semantic definition).
    pub keywords: Vec<String>,
    pub title_templates: Vec<String>,
    pub gradient: Gradient,
    #[serde(skip)]
    keyword_set: HashSet<String>,
}

impl VibeProfile {
    pub fn keyword_set(&self) -> &HashSet<String> {
        &self.keyword_set
    }

    pub fn has_keyword(&self, token: &str) -> bool {
        self.keyword_set.contains(token)
    }

    /// Short definition embedded once per vibe for similarity scoring.
    pub fn definition(&self) -> String {
        let seeds: Vec<&str> = self.keywords.iter().take(5).map(String::as_str).collect();
        format!(
            "{}. {} Keywords: {}.",
            self.display_name,
            self.description,
            seeds.join(", ")
        )
    }

    /// Fill the prompt template with the detected keywords.
    pub fn render_prompt(&self, keywords: &[String]) -> String {
        let joined = if keywords.is_empty() {
            self.keywords.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        } else {
            keywords.join(", ")
        };
        self.prompt_template.replace("{keywords}", &joined)
    }
}

static TABLE: Lazy<HashMap<Vibe, VibeProfile>> = Lazy::new(|| {
    let raw = include_str!("../data/vibes.json");
    let parsed: HashMap<String, VibeProfile> =
        serde_json::from_str(raw).expect("valid vibe table");

    let mut table = HashMap::with_capacity(parsed.len());
    for (tag, mut profile) in parsed {
        let vibe = Vibe::from_tag(&tag)
            .unwrap_or_else(|| panic!("vibe table has unknown tag `{tag}`"));
        profile.keywords = profile
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        profile.keyword_set = profile.keywords.iter().cloned().collect();
        table.insert(vibe, profile);
    }
    for vibe in Vibe::ALL {
        assert!(
            table.contains_key(&vibe),
            "vibe table is missing `{}`",
            vibe.tag()
        );
    }
    table
});

/// All vibes with their profiles, in declaration order.
pub fn catalog() -> Vec<(Vibe, &'static VibeProfile)> {
    Vibe::ALL.iter().map(|v| (*v, v.profile())).collect()
}
