// src/analysis/prompts.rs
use super::{to_percent, AnalysisResult, AnalysisSource, CompatibilityBreakdown};
use serde::Deserialize;
use tracing::{debug, warn};

pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        r#"
Analise o currículo e a descrição da vaga fornecidos e retorne uma análise detalhada e específica em formato JSON com a seguinte estrutura:

{{
  "compatibility": 85,
  "compatibilityBreakdown": {{
    "skills": 90,
    "experience": 75,
    "projects": 80,
    "education": 85
  }},
  "strengths": [
    "Experiência específica em React.js (3 anos) - mencionada na vaga",
    "Habilidades técnicas alinhadas: TypeScript, Node.js",
    "Projetos relevantes: desenvolvimento de aplicações web"
  ],
  "weaknesses": [
    "Falta experiência específica em AWS (requerido na vaga)",
    "Não menciona experiência com Docker (desejável)",
    "Descrição de projetos muito genérica"
  ],
  "suggestions": [
    "Adicionar seção específica de projetos com tecnologias e resultados",
    "Incluir métricas de impacto (ex: 'Reduziu tempo de carregamento em 40%')",
    "Especificar versões de tecnologias e ferramentas usadas",
    "Destacar conquistas e responsabilidades em cada projeto"
  ],
  "improvedResume": "Texto do currículo melhorado com sugestões aplicadas"
}}

INSTRUÇÕES DETALHADAS:

1. COMPATIBILIDADE: Calcule baseado em:
   - Habilidades técnicas alinhadas (40% do total)
   - Experiência relevante (30% do total)
   - Projetos similares (20% do total)
   - Formação acadêmica (10% do total)

   COMPATIBILIDADE BREAKDOWN:
   - skills: Porcentagem de habilidades técnicas que aparecem na vaga
   - experience: Relevância da experiência profissional para a posição
   - projects: Alinhamento dos projetos com as responsabilidades da vaga
   - education: Adequação da formação acadêmica para a posição

2. PONTOS FORTES: Liste especificamente:
   - Habilidades que aparecem na vaga
   - Experiência relevante mencionada
   - Projetos que se alinham com a posição
   - Formação acadêmica adequada

3. PONTOS DE MELHORIA: Identifique especificamente:
   - Habilidades requeridas que estão faltando
   - Experiência que poderia ser mais detalhada
   - Projetos que precisam de mais contexto
   - Informações que estão muito genéricas

4. SUGESTÕES: Forneça ações práticas:
   - Como melhorar descrições específicas
   - Que projetos adicionar
   - Como quantificar conquistas
   - Que habilidades desenvolver

CURRÍCULO:
{}

DESCRIÇÃO DA VAGA:
{}

IMPORTANTE: Seja específico e detalhado. Não use frases genéricas como "experiência geral" ou "precisa de mais detalhes". Analise cada ponto e forneça feedback concreto e acionável.
"#,
        resume_text, job_description
    )
}

/// The JSON object the model is asked to answer with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAnalysis {
    pub compatibility: f64,
    #[serde(default)]
    pub compatibility_breakdown: Option<ModelBreakdown>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub improved_resume: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModelBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub projects: f64,
    pub education: f64,
}

/// Parses the model's reply. `None` means the reply is unusable and the
/// caller should score heuristically instead.
pub fn parse_model_response(text: &str) -> Option<ModelAnalysis> {
    let body = strip_code_fence(text);
    match serde_json::from_str::<ModelAnalysis>(body) {
        Ok(analysis) => {
            debug!("Model response parsed");
            Some(analysis)
        }
        Err(e) => {
            warn!("Model response is not a usable analysis: {}", e);
            None
        }
    }
}

/// Unwraps a reply of the form ```` ```json\n{...}\n``` ````.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match rest.find('\n') {
        Some(newline) => rest[newline + 1..].trim(),
        None => rest.trim(),
    }
}

impl From<ModelAnalysis> for AnalysisResult {
    fn from(model: ModelAnalysis) -> Self {
        let overall = to_percent(model.compatibility);
        let compatibility = match model.compatibility_breakdown {
            // The model's own overall figure is kept as reported.
            Some(b) => CompatibilityBreakdown {
                skills: to_percent(b.skills),
                experience: to_percent(b.experience),
                projects: to_percent(b.projects),
                education: to_percent(b.education),
                overall,
            },
            None => CompatibilityBreakdown::uniform(overall),
        };

        Self {
            compatibility,
            strengths: model.strengths,
            weaknesses: model.weaknesses,
            suggestions: model.suggestions,
            improved_resume_text: model.improved_resume,
            source: AnalysisSource::Model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "compatibility": 81,
        "compatibilityBreakdown": {"skills": 90, "experience": 75.4, "projects": 80, "education": 60},
        "strengths": ["Rust"],
        "weaknesses": ["AWS"],
        "suggestions": ["Add metrics"],
        "improvedResume": "Better résumé"
    }"#;

    #[test]
    fn test_prompt_embeds_both_texts() {
        let prompt = build_analysis_prompt("MY RESUME", "THE JOB");
        assert!(prompt.contains("CURRÍCULO:\nMY RESUME"));
        assert!(prompt.contains("DESCRIÇÃO DA VAGA:\nTHE JOB"));
        assert!(prompt.contains("\"improvedResume\""));
    }

    #[test]
    fn test_parse_full_reply() {
        let result: AnalysisResult = parse_model_response(REPLY).unwrap().into();
        assert_eq!(result.source, AnalysisSource::Model);
        assert_eq!(result.compatibility.overall, 81);
        assert_eq!(result.compatibility.experience, 75);
        assert_eq!(result.improved_resume_text, "Better résumé");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = format!("```json\n{}\n```", REPLY);
        assert!(parse_model_response(&fenced).is_some());
        let bare_fence = format!("```\n{}\n```", REPLY);
        assert!(parse_model_response(&bare_fence).is_some());
    }

    #[test]
    fn test_missing_breakdown_is_uniform() {
        let reply = r#"{"compatibility": 64, "strengths": [], "weaknesses": [],
                        "suggestions": [], "improvedResume": ""}"#;
        let result: AnalysisResult = parse_model_response(reply).unwrap().into();
        assert_eq!(result.compatibility, CompatibilityBreakdown::uniform(64));
    }

    #[test]
    fn test_unusable_replies() {
        assert!(parse_model_response("Sorry, I cannot help with that.").is_none());
        assert!(parse_model_response(r#"{"compatibility": 50}"#).is_none());
        assert!(parse_model_response("").is_none());
    }
}
