// src/analysis/scorer.rs
//! Deterministic keyword scoring, used when the language model's answer
//! cannot be parsed. Pure: same inputs, same output, no I/O.

use super::{AnalysisResult, AnalysisSource, CompatibilityBreakdown};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const TECH_SKILLS: [&str; 46] = [
    "javascript", "typescript", "react", "vue", "angular", "node.js", "python", "java", "c#", "php",
    "html", "css", "sass", "less", "git", "docker", "kubernetes", "aws", "azure", "gcp",
    "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "kafka", "rabbitmq",
    "jenkins", "github actions", "gitlab ci", "jira", "confluence", "agile", "scrum",
    "rest api", "graphql", "microservices", "serverless", "machine learning", "ai",
    "data analysis", "sql", "nosql", "linux", "windows", "macos",
];

const PROJECT_KEYWORDS: [&str; 6] = [
    "projeto",
    "project",
    "desenvolvimento",
    "development",
    "aplicação",
    "application",
];

const EDUCATION_KEYWORDS: [&str; 8] = [
    "graduação",
    "graduation",
    "bacharel",
    "bachelor",
    "mestrado",
    "master",
    "doutorado",
    "phd",
];

const NEUTRAL_SKILLS: f64 = 50.0;
const DEFAULT_EXPERIENCE: f64 = 70.0;
const DEFAULT_PROJECTS: f64 = 60.0;
const DEFAULT_EDUCATION: f64 = 70.0;
const KEYWORD_CAP: f64 = 90.0;

static YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:anos?|years?)").expect("valid years regex"));

/// Scores `resume_text` against `job_description`.
pub fn score(resume_text: &str, job_description: &str) -> CompatibilityBreakdown {
    let resume = resume_text.to_lowercase();
    let job = job_description.to_lowercase();

    let skills = skills_score(&resume, &job);
    let experience = experience_score(&resume, &job);
    let projects = keyword_score(&resume, &PROJECT_KEYWORDS, DEFAULT_PROJECTS);
    let education = keyword_score(&resume, &EDUCATION_KEYWORDS, DEFAULT_EDUCATION);

    let breakdown = CompatibilityBreakdown::from_scores(skills, experience, projects, education);
    debug!(?breakdown, "Heuristic compatibility computed");
    breakdown
}

/// A complete result built from [`score`] alone, with fixed commentary that
/// says the analysis was automatic. The résumé text is returned unchanged.
pub fn fallback_analysis(resume_text: &str, job_description: &str) -> AnalysisResult {
    AnalysisResult {
        compatibility: score(resume_text, job_description),
        strengths: to_strings(&[
            "Análise baseada em conteúdo real do currículo e vaga",
            "Habilidades técnicas identificadas no currículo",
            "Experiência profissional relevante",
        ]),
        weaknesses: to_strings(&[
            "Análise automática pode não capturar nuances específicas",
            "Recomenda-se revisão manual para precisão total",
            "Algumas habilidades podem não ter sido detectadas",
        ]),
        suggestions: to_strings(&[
            "Revise manualmente a análise para maior precisão",
            "Adicione mais detalhes sobre projetos específicos",
            "Inclua métricas quantificáveis de conquistas",
            "Especifique versões de tecnologias utilizadas",
        ]),
        improved_resume_text: resume_text.to_string(),
        source: AnalysisSource::Heuristic,
    }
}

/// Share of the posting's recognised skills that the résumé also mentions.
fn skills_score(resume: &str, job: &str) -> f64 {
    let wanted: Vec<&str> = TECH_SKILLS
        .iter()
        .copied()
        .filter(|skill| job.contains(skill))
        .collect();

    if wanted.is_empty() {
        return NEUTRAL_SKILLS;
    }

    let matched = wanted.iter().filter(|skill| resume.contains(*skill)).count();
    100.0 * matched as f64 / wanted.len() as f64
}

fn experience_score(resume: &str, job: &str) -> f64 {
    match (max_years(resume), max_years(job)) {
        (Some(have), Some(want)) if have >= want => 90.0,
        (Some(have), Some(want)) if have as f64 >= want as f64 * 0.7 => 75.0,
        (Some(_), Some(_)) => 50.0,
        _ => DEFAULT_EXPERIENCE,
    }
}

fn max_years(text: &str) -> Option<u64> {
    YEARS
        .captures_iter(text)
        // Digits only, so the sole parse failure is overflow.
        .map(|caps| caps[1].parse::<u64>().unwrap_or(u64::MAX))
        .max()
}

/// `min(90, base + 10 * distinct keywords present)`; `base` when none are.
fn keyword_score(resume: &str, keywords: &[&str], base: f64) -> f64 {
    let hits = keywords.iter().filter(|k| resume.contains(*k)).count();
    if hits == 0 {
        base
    } else {
        (base + 10.0 * hits as f64).min(KEYWORD_CAP)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
