//! Heuristic field extraction over loosely formatted vaga text.
//!
//! Every field resolves through an ordered chain of label patterns — bold
//! (`**Empresa**: v`), plain (`Empresa: v`), then heading (`# Empresa`
//! followed by the value line) — and the first non-empty capture wins. The
//! chains live in one pattern table so the fallback order stays auditable.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Work-mode category, normalized from free-form labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modalidade {
    Presencial,
    Hibrido,
    Remoto,
}

/// Application status category, normalized from free-form labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pendente,
    Avancado,
    Reprovado,
    Contratado,
}

/// Partial vaga record produced by extraction. Absent fields are `None`,
/// never empty strings — the caller's merge policy relies on the difference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VagaDraft {
    pub empresa: Option<String>,
    pub cargo: Option<String>,
    pub localizacao: Option<String>,
    pub modalidade: Option<Modalidade>,
    /// Requirements-match score, 0–100.
    pub requisitos: Option<u8>,
    /// Fit score, native 0–10 range. Star-display rescaling is UI work.
    pub fit: Option<u8>,
    pub etapa: Option<String>,
    pub status: Option<Status>,
    pub observacoes: Option<String>,
}

impl VagaDraft {
    pub fn is_empty(&self) -> bool {
        *self == VagaDraft::default()
    }
}

/// Extracts whatever fields can be found in `text`. Never fails: unparsable
/// input yields a draft with every field absent. Fields are independent —
/// one label's absence never suppresses another's match.
pub fn extract_vaga_draft(text: &str) -> VagaDraft {
    let p = patterns();
    VagaDraft {
        empresa: first_capture(text, &p.empresa),
        cargo: first_capture(text, &p.cargo),
        localizacao: first_capture(text, &p.localizacao),
        modalidade: first_capture(text, &p.modalidade).and_then(|v| classify_modalidade(&v)),
        requisitos: first_capture(text, &p.requisitos).and_then(|v| bounded_int(&v, 0, 100)),
        fit: first_capture(text, &p.fit).and_then(|v| bounded_int(&v, 0, 10)),
        etapa: first_capture(text, &p.etapa),
        status: first_capture(text, &p.status).and_then(|v| classify_status(&v)),
        observacoes: extract_notes(text),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pattern table
// ────────────────────────────────────────────────────────────────────────────

// Label synonyms per field. Longer alternatives first so the more specific
// label claims the capture.
const EMPRESA: &str = "empresa|companhia|company|organiza[çc][ãa]o";
const CARGO: &str = "cargo|posi[çc][ãa]o|fun[çc][ãa]o|role|vaga";
const LOCALIZACAO: &str = "localiza[çc][ãa]o|localidade|cidade|local|location";
const MODALIDADE: &str = "modalidade|modelo de trabalho|regime de trabalho|regime|formato";
const REQUISITOS: &str =
    "atendimento aos requisitos|match de requisitos|requisitos atendidos|requisitos";
const FIT: &str = "fit cultural|fit|compatibilidade";
const ETAPA: &str = "etapa do processo|est[áa]gio do processo|etapa|fase";
const STATUS: &str = "status|situa[çc][ãa]o";
const NOTAS: &str = "observa[çc][õo]es|anota[çc][õo]es|notas|coment[áa]rios";

struct FieldPatterns {
    empresa: Vec<Regex>,
    cargo: Vec<Regex>,
    localizacao: Vec<Regex>,
    modalidade: Vec<Regex>,
    requisitos: Vec<Regex>,
    fit: Vec<Regex>,
    etapa: Vec<Regex>,
    status: Vec<Regex>,
    notes_header: Regex,
    bold_token: Regex,
    int: Regex,
}

impl FieldPatterns {
    fn build() -> Self {
        Self {
            empresa: label_chain(EMPRESA),
            cargo: label_chain(CARGO),
            localizacao: label_chain(LOCALIZACAO),
            modalidade: label_chain(MODALIDADE),
            requisitos: label_chain(REQUISITOS),
            fit: label_chain(FIT),
            etapa: label_chain(ETAPA),
            status: label_chain(STATUS),
            notes_header: compile(&format!(
                r"(?mi)^[ \t]*(?:\*\*[ \t]*(?:{NOTAS})[ \t]*:?[ \t]*\*\*[ \t]*:?|#{{1,6}}[ \t]*(?:{NOTAS})[ \t]*|(?:{NOTAS})[ \t]*:)[ \t]*"
            )),
            bold_token: compile(r"^\*\*\w"),
            int: compile(r"-?\d+"),
        }
    }
}

fn patterns() -> &'static FieldPatterns {
    static PATTERNS: OnceLock<FieldPatterns> = OnceLock::new();
    PATTERNS.get_or_init(FieldPatterns::build)
}

/// Builds the ordered fallback chain for one field:
/// bold label line, plain label line, heading followed by a value line.
fn label_chain(labels: &str) -> Vec<Regex> {
    vec![
        compile(&format!(
            r"(?mi)^[ \t]*\*\*[ \t]*(?:{labels})[ \t]*:?[ \t]*\*\*[ \t]*:?[ \t]*(.+)$"
        )),
        compile(&format!(r"(?mi)^[ \t]*(?:{labels})[ \t]*:[ \t]*(.+)$")),
        compile(&format!(
            r"(?mi)^#{{1,6}}[ \t]*(?:{labels})[ \t]*\n+[ \t]*([^#*\n].*)"
        )),
    ]
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid field pattern")
}

/// First non-empty trimmed capture across the chain, in priority order.
fn first_capture(text: &str, chain: &[Regex]) -> Option<String> {
    chain.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().trim_matches('*').trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// First (possibly signed) integer substring of `raw`, accepted only within
/// `[min, max]`. Out-of-range or non-integer values fall through to absent.
fn bounded_int(raw: &str, min: u8, max: u8) -> Option<u8> {
    let digits = patterns().int.find(raw)?;
    let value: i64 = digits.as_str().parse().ok()?;
    (i64::from(min)..=i64::from(max))
        .contains(&value)
        .then_some(value as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// Categorical normalization
// ────────────────────────────────────────────────────────────────────────────

const HIBRIDO_HINTS: &[&str] = &["híbrid", "hibrid", "hybrid"];
const REMOTO_HINTS: &[&str] = &["remot", "home office", "anywhere"];
const PRESENCIAL_HINTS: &[&str] = &[
    "presencial",
    "on-site",
    "onsite",
    "in-person",
    "in person",
    "escritório",
    "escritorio",
];

/// Hybrid hints win even when remote/on-site words also appear ("híbrido,
/// 2 dias remoto"); remote beats on-site for the remaining values.
fn classify_modalidade(raw: &str) -> Option<Modalidade> {
    let value = raw.to_lowercase();
    if contains_any(&value, HIBRIDO_HINTS) {
        Some(Modalidade::Hibrido)
    } else if contains_any(&value, REMOTO_HINTS) {
        Some(Modalidade::Remoto)
    } else if contains_any(&value, PRESENCIAL_HINTS) {
        Some(Modalidade::Presencial)
    } else {
        None
    }
}

const CONTRATADO_HINTS: &[&str] = &["contratad", "hired", "oferta aceita", "offer accepted"];
const AVANCADO_HINTS: &[&str] = &[
    "avançad",
    "avancad",
    "em progresso",
    "em processo",
    "em andamento",
    "in progress",
    "in process",
    "advanced",
];
const REPROVADO_HINTS: &[&str] = &[
    "reprovad",
    "rejeitad",
    "rejected",
    "recusad",
    "declined",
    "failed",
    "não aprovad",
    "nao aprovad",
];
const PENDENTE_HINTS: &[&str] = &[
    "pendente",
    "aguardando",
    "aplicad",
    "applied",
    "waiting",
    "pending",
    "em aberto",
];

/// Priority order: hired, then advanced, then rejected, then pending.
/// A raw value matching no rule is silently dropped.
fn classify_status(raw: &str) -> Option<Status> {
    let value = raw.to_lowercase();
    if contains_any(&value, CONTRATADO_HINTS) {
        Some(Status::Contratado)
    } else if contains_any(&value, AVANCADO_HINTS) {
        Some(Status::Avancado)
    } else if contains_any(&value, REPROVADO_HINTS) {
        Some(Status::Reprovado)
    } else if contains_any(&value, PENDENTE_HINTS) {
        Some(Status::Pendente)
    } else {
        None
    }
}

fn contains_any(value: &str, hints: &[&str]) -> bool {
    hints.iter().any(|hint| value.contains(hint))
}

// ────────────────────────────────────────────────────────────────────────────
// Notes block
// ────────────────────────────────────────────────────────────────────────────

/// Captures the free-text block after an "Observações"/"Notas" header, up to
/// the next section boundary (a `**Word` bold label or a `#` heading) or end
/// of input.
fn extract_notes(text: &str) -> Option<String> {
    let p = patterns();
    let header = p.notes_header.find(text)?;
    let rest = &text[header.end()..];

    let mut captured = String::new();
    for line in rest.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') || p.bold_token.is_match(trimmed) {
            break;
        }
        captured.push_str(line);
        captured.push('\n');
    }

    let captured = captured.trim().to_string();
    (!captured.is_empty()).then_some(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_label_extracts_company() {
        let draft = extract_vaga_draft("**Empresa**: Google");
        assert_eq!(draft.empresa.as_deref(), Some("Google"));
    }

    #[test]
    fn test_plain_label_extracts_company() {
        let draft = extract_vaga_draft("Empresa: Nubank");
        assert_eq!(draft.empresa.as_deref(), Some("Nubank"));
    }

    #[test]
    fn test_heading_block_extracts_company() {
        let draft = extract_vaga_draft("# Empresa\nStone Pagamentos\n");
        assert_eq!(draft.empresa.as_deref(), Some("Stone Pagamentos"));
    }

    #[test]
    fn test_colon_inside_bold_variant() {
        let draft = extract_vaga_draft("**Cargo:** Engenheira de Software");
        assert_eq!(draft.cargo.as_deref(), Some("Engenheira de Software"));
    }

    #[test]
    fn test_bold_value_is_unwrapped() {
        let draft = extract_vaga_draft("**Empresa**: **Google**");
        assert_eq!(draft.empresa.as_deref(), Some("Google"));
    }

    #[test]
    fn test_location_synonyms() {
        for input in [
            "Localização: São Paulo",
            "Localizacao: São Paulo",
            "Cidade: São Paulo",
            "Local: São Paulo",
        ] {
            let draft = extract_vaga_draft(input);
            assert_eq!(draft.localizacao.as_deref(), Some("São Paulo"), "{input}");
        }
    }

    #[test]
    fn test_company_english_synonym() {
        let draft = extract_vaga_draft("Company: Acme Corp");
        assert_eq!(draft.empresa.as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn test_requisitos_range_bounds() {
        assert_eq!(extract_vaga_draft("Requisitos: 150").requisitos, None);
        assert_eq!(extract_vaga_draft("Requisitos: 100").requisitos, Some(100));
        assert_eq!(extract_vaga_draft("Requisitos: 0").requisitos, Some(0));
        assert_eq!(extract_vaga_draft("Requisitos: 85%").requisitos, Some(85));
        assert_eq!(extract_vaga_draft("Requisitos: muitos").requisitos, None);
    }

    #[test]
    fn test_fit_range_bounds() {
        assert_eq!(extract_vaga_draft("Fit: 15").fit, None);
        assert_eq!(extract_vaga_draft("Fit: 10").fit, Some(10));
        assert_eq!(extract_vaga_draft("Fit: 7/10").fit, Some(7));
        assert_eq!(extract_vaga_draft("Fit cultural: 8").fit, Some(8));
    }

    #[test]
    fn test_negative_scores_fall_through_to_absent() {
        // The sign is part of the matched integer: "-5" must not pass as 5.
        assert_eq!(extract_vaga_draft("Requisitos: -5").requisitos, None);
        assert_eq!(extract_vaga_draft("Requisitos: -100").requisitos, None);
        assert_eq!(extract_vaga_draft("Fit: -1").fit, None);
    }

    #[test]
    fn test_status_synonym_classification() {
        let cases = [
            ("Status: Em progresso", Status::Avancado),
            ("Status: Reprovado", Status::Reprovado),
            ("Status: Contratado", Status::Contratado),
            ("Status: Aguardando retorno", Status::Pendente),
            ("Situação: rejeitada na triagem", Status::Reprovado),
        ];
        for (input, expected) in cases {
            assert_eq!(extract_vaga_draft(input).status, Some(expected), "{input}");
        }
    }

    #[test]
    fn test_status_classification_failure_is_silent() {
        // Raw label found, but no classification rule matches: field absent.
        assert_eq!(extract_vaga_draft("Status: ???").status, None);
    }

    #[test]
    fn test_modalidade_hybrid_takes_precedence() {
        let cases = [
            ("Modalidade: Híbrido", Some(Modalidade::Hibrido)),
            ("Modalidade: híbrido, 3 dias remoto", Some(Modalidade::Hibrido)),
            ("Modalidade: hybrid with on-site days", Some(Modalidade::Hibrido)),
            ("Modalidade: Remoto", Some(Modalidade::Remoto)),
            ("Modalidade: 100% home office", Some(Modalidade::Remoto)),
            ("Modalidade: Presencial", Some(Modalidade::Presencial)),
            ("Regime: escritório em SP", Some(Modalidade::Presencial)),
            ("Modalidade: flexível", None),
        ];
        for (input, expected) in cases {
            assert_eq!(extract_vaga_draft(input).modalidade, expected, "{input}");
        }
    }

    #[test]
    fn test_no_match_yields_empty_draft() {
        let draft = extract_vaga_draft("Random text without fields");
        assert!(draft.is_empty());
        assert_eq!(draft, VagaDraft::default());
    }

    #[test]
    fn test_empty_input_yields_empty_draft() {
        assert!(extract_vaga_draft("").is_empty());
    }

    #[test]
    fn test_notes_block_stops_at_bold_label() {
        let text = "**Observações**:\nGostei da vaga.\nSalário acima da média.\n\n**Status**: Pendente";
        let draft = extract_vaga_draft(text);
        assert_eq!(
            draft.observacoes.as_deref(),
            Some("Gostei da vaga.\nSalário acima da média.")
        );
        assert_eq!(draft.status, Some(Status::Pendente));
    }

    #[test]
    fn test_notes_block_stops_at_heading() {
        let text = "# Notas\nProcesso lento.\n# Etapa\nEntrevista";
        let draft = extract_vaga_draft(text);
        assert_eq!(draft.observacoes.as_deref(), Some("Processo lento."));
    }

    #[test]
    fn test_notes_block_runs_to_end_of_input() {
        let text = "Observações: primeira linha\nsegunda linha";
        let draft = extract_vaga_draft(text);
        assert_eq!(
            draft.observacoes.as_deref(),
            Some("primeira linha\nsegunda linha")
        );
    }

    #[test]
    fn test_notes_header_without_body_is_absent() {
        let draft = extract_vaga_draft("**Observações**:\n**Status**: Pendente");
        assert_eq!(draft.observacoes, None);
    }

    #[test]
    fn test_full_analysis_document() {
        let text = "\
# Análise da Vaga

**Empresa**: Nubank
**Cargo**: Engenheiro de Software Júnior
**Localização**: São Paulo, SP
**Modalidade**: Híbrido (2x por semana no escritório)

**Atendimento aos Requisitos**: 85%
**Fit**: 8

**Etapa**: Entrevista técnica
**Status**: Em processo

**Observações**:
Stack bate com o que estudei.
Pedir referral antes de aplicar.
";
        let draft = extract_vaga_draft(text);
        assert_eq!(draft.empresa.as_deref(), Some("Nubank"));
        assert_eq!(draft.cargo.as_deref(), Some("Engenheiro de Software Júnior"));
        assert_eq!(draft.localizacao.as_deref(), Some("São Paulo, SP"));
        assert_eq!(draft.modalidade, Some(Modalidade::Hibrido));
        assert_eq!(draft.requisitos, Some(85));
        assert_eq!(draft.fit, Some(8));
        assert_eq!(draft.etapa.as_deref(), Some("Entrevista técnica"));
        assert_eq!(draft.status, Some(Status::Avancado));
        assert_eq!(
            draft.observacoes.as_deref(),
            Some("Stack bate com o que estudei.\nPedir referral antes de aplicar.")
        );
    }

    #[test]
    fn test_fields_resolve_independently() {
        // A field with an invalid value must not suppress its neighbors.
        let text = "Empresa: Google\nRequisitos: 9999\nFit: 9";
        let draft = extract_vaga_draft(text);
        assert_eq!(draft.empresa.as_deref(), Some("Google"));
        assert_eq!(draft.requisitos, None);
        assert_eq!(draft.fit, Some(9));
    }
}
