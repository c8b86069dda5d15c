// src/analysis/mod.rs
use serde::{Deserialize, Serialize};

pub mod analyzer;
pub mod prompts;
pub mod scorer;

pub use analyzer::{AnalysisReport, ResumeAnalyzer, ResumeUpload};

/// Four-way résumé fit, each score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    pub skills: u8,
    pub experience: u8,
    pub projects: u8,
    pub education: u8,
    pub overall: u8,
}

impl CompatibilityBreakdown {
    /// Rounds and clamps each sub-score, then derives `overall` from the
    /// rounded values with weights 40/30/20/10.
    pub fn from_scores(skills: f64, experience: f64, projects: f64, education: f64) -> Self {
        let skills = to_percent(skills);
        let experience = to_percent(experience);
        let projects = to_percent(projects);
        let education = to_percent(education);

        Self {
            skills,
            experience,
            projects,
            education,
            overall: weighted_overall(skills, experience, projects, education),
        }
    }

    /// Every sub-score equal to `score`; used when only an overall figure exists.
    pub fn uniform(score: u8) -> Self {
        let score = score.min(100);
        Self {
            skills: score,
            experience: score,
            projects: score,
            education: score,
            overall: score,
        }
    }
}

/// `round(0.4*skills + 0.3*experience + 0.2*projects + 0.1*education)`,
/// computed in integers so halves always round up.
pub fn weighted_overall(skills: u8, experience: u8, projects: u8, education: u8) -> u8 {
    let tenths = 4 * u32::from(skills)
        + 3 * u32::from(experience)
        + 2 * u32::from(projects)
        + u32::from(education);
    ((tenths + 5) / 10).min(100) as u8
}

pub(crate) fn to_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Parsed from the language model's answer.
    Model,
    /// Produced by the keyword scorer because the model's answer was unusable.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub compatibility: CompatibilityBreakdown,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub improved_resume_text: String,
    pub source: AnalysisSource,
}
