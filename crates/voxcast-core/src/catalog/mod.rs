//! Named voice presets and the read-only catalog resolving them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Preset used when a request names no preset or an unknown one.
pub const DEFAULT_PRESET: &str = "clear_neutral";

/// A named voice-transformation configuration.
///
/// `language` and `region_variant` select the synthesis voice; the remaining
/// fields drive the post-processing pipeline. When `robotic` is set the
/// pitch and speed fields are ignored entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicePreset {
    /// Synthesis locale code, e.g. `en` or `hi`.
    pub language: String,
    /// Synthesis accent sub-variant, e.g. `com` or `co.uk`.
    pub region_variant: String,
    /// Pitch shift in octaves, 0 = unchanged. Values near ±1.0 are a full
    /// octave; magnitude is bounded by audibility, not enforced.
    #[serde(default)]
    pub pitch_octaves: f32,
    /// Playback speed multiplier, 1.0 = unchanged, >1 faster.
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f32,
    /// Replace pitch/speed with the robotic timbre filter.
    #[serde(default)]
    pub robotic: bool,
}

fn default_speed_factor() -> f32 {
    1.0
}

impl VoicePreset {
    /// A neutral preset for the given voice: no pitch shift, no speed
    /// change, not robotic.
    pub fn neutral(language: &str, region_variant: &str) -> Self {
        Self {
            language: language.to_string(),
            region_variant: region_variant.to_string(),
            pitch_octaves: 0.0,
            speed_factor: 1.0,
            robotic: false,
        }
    }

    fn shaped(language: &str, region_variant: &str, pitch_octaves: f32, speed_factor: f32) -> Self {
        Self {
            pitch_octaves,
            speed_factor,
            ..Self::neutral(language, region_variant)
        }
    }

    fn robotic(language: &str, region_variant: &str) -> Self {
        Self {
            robotic: true,
            ..Self::neutral(language, region_variant)
        }
    }
}

/// Immutable name-to-preset mapping, built once at startup.
///
/// Lookups never fail: unknown names resolve to [`DEFAULT_PRESET`] so that
/// callers stay permissive about preset spelling. Safe to share across
/// concurrent requests, nothing here is ever mutated.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: HashMap<String, VoicePreset>,
    fallback: VoicePreset,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    /// The built-in voice table.
    pub fn builtin() -> Self {
        let mut presets = HashMap::new();
        let mut add = |name: &str, preset: VoicePreset| {
            presets.insert(name.to_string(), preset);
        };

        add("deep_american", VoicePreset::shaped("en", "com", -0.28, 0.92));
        add("deep_calm", VoicePreset::shaped("en", "com", -0.35, 0.9));
        add("clear_neutral", VoicePreset::neutral("en", "co.uk"));
        add("english_female", VoicePreset::shaped("en", "co.uk", 0.12, 1.02));
        add("hindi_male", VoicePreset::shaped("hi", "co.in", -0.05, 1.0));
        add("hindi_female", VoicePreset::shaped("hi", "co.in", 0.15, 1.03));
        add("robotic", VoicePreset::robotic("en", "com"));
        add("fast_narrator", VoicePreset::shaped("en", "com", 0.0, 1.35));
        add("mixed_deep", VoicePreset::shaped("en", "com", -0.2, 0.95));

        Self {
            fallback: VoicePreset::neutral("en", "co.uk"),
            presets,
        }
    }

    /// Look up a preset by name, falling back to the default preset for
    /// unknown names. Never an error.
    pub fn resolve(&self, name: &str) -> &VoicePreset {
        self.presets.get(name).unwrap_or(&self.fallback)
    }

    /// The preset unknown names resolve to.
    pub fn default_preset(&self) -> &VoicePreset {
        &self.fallback
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all (name, preset) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VoicePreset)> {
        self.presets.iter().map(|(name, preset)| (name.as_str(), preset))
    }
}
