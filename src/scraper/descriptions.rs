// src/scraper/descriptions.rs
//! Job description text for résumé analysis. Stands in for a full scrape with
//! one fixed template per board.

use reqwest::Url;
use tracing::{info, warn};

const LINKEDIN_DESCRIPTION: &str = "Vaga do LinkedIn - Desenvolvedor Full Stack

REQUISITOS:
- 3+ anos de experiência com React, Node.js e TypeScript
- Conhecimento em AWS, Docker e Kubernetes
- Experiência com metodologias ágeis
- Graduação em Ciência da Computação ou áreas relacionadas

RESPONSABILIDADES:
- Desenvolver aplicações web escaláveis
- Trabalhar em equipe multidisciplinar
- Participar de code reviews e pair programming
- Implementar boas práticas de desenvolvimento

TECNOLOGIAS:
- Frontend: React, TypeScript, HTML, CSS
- Backend: Node.js, Express, TypeScript
- Cloud: AWS, Docker, Kubernetes
- Banco de dados: PostgreSQL, MongoDB
- Ferramentas: Git, Jira, Confluence";

const INDEED_DESCRIPTION: &str = "Vaga do Indeed - Desenvolvedor Full Stack

REQUISITOS:
- 2+ anos de experiência com desenvolvimento web
- Conhecimento em JavaScript, React e Node.js
- Experiência com APIs RESTful
- Graduação em tecnologia da informação

RESPONSABILIDADES:
- Desenvolver e manter aplicações web
- Colaborar com designers e product managers
- Otimizar performance das aplicações
- Implementar testes automatizados

TECNOLOGIAS:
- JavaScript, React, Node.js
- HTML, CSS, SASS
- APIs RESTful, GraphQL
- Git, GitHub
- Metodologias ágeis";

const GLASSDOOR_DESCRIPTION: &str = "Vaga do Glassdoor - Desenvolvedor Full Stack

REQUISITOS:
- 4+ anos de experiência em desenvolvimento
- Conhecimento avançado em React e Node.js
- Experiência com microserviços
- Graduação em engenharia de software

RESPONSABILIDADES:
- Arquitetar soluções escaláveis
- Liderar projetos de desenvolvimento
- Mentorar desenvolvedores júnior
- Participar de decisões técnicas

TECNOLOGIAS:
- React, TypeScript, Node.js
- Microserviços, Docker, Kubernetes
- AWS, Azure, GCP
- PostgreSQL, Redis, MongoDB
- CI/CD, Jenkins, GitHub Actions";

const GENERIC_DESCRIPTION: &str = "Vaga Genérica - Desenvolvedor Full Stack

REQUISITOS:
- Experiência com desenvolvimento web
- Conhecimento em JavaScript e frameworks modernos
- Capacidade de trabalhar em equipe
- Formação em tecnologia da informação

RESPONSABILIDADES:
- Desenvolver aplicações web
- Colaborar com a equipe
- Manter código limpo e documentado
- Participar de reuniões técnicas

TECNOLOGIAS:
- JavaScript, HTML, CSS
- Frameworks modernos (React, Vue, Angular)
- Node.js, Express
- Git e controle de versão
- Metodologias ágeis";

/// Never fails; an unparseable URL yields an explanatory sentence instead.
pub fn extract_job_description(url: &str) -> String {
    let host = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_lowercase(),
        Err(e) => {
            warn!("Cannot derive job description from {:?}: {}", url, e);
            return format!("Descrição da vaga não pôde ser extraída automaticamente de: {url}");
        }
    };

    info!("Using canned job description for host {}", host);

    if host.contains("linkedin.com") {
        LINKEDIN_DESCRIPTION
    } else if host.contains("indeed.com") {
        INDEED_DESCRIPTION
    } else if host.contains("glassdoor.com") {
        GLASSDOOR_DESCRIPTION
    } else {
        GENERIC_DESCRIPTION
    }
    .to_string()
}
