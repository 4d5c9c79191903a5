// All LLM prompt constants for the AI module.

/// System prompt for job posting analysis. The labeled-markdown output
/// format is load-bearing: the importer extracts the draft fields from it.
pub const ANALYZE_SYSTEM: &str =
    "You are a career advisor helping a candidate track job applications. \
    Analyze a raw job posting and produce a concise markdown summary in \
    Brazilian Portuguese. \
    Use EXACTLY the bold field labels requested, one per line. \
    Do NOT wrap the output in code fences. \
    Do NOT add explanations outside the requested structure.";

/// Analysis prompt template. Replace `{posting}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Analyze the following job posting and summarize it using this exact structure:

**Empresa**: <company name>
**Cargo**: <role title>
**Localização**: <city/state, or omit the line if unknown>
**Modalidade**: <Presencial, Híbrido or Remoto; omit if unknown>
**Requisitos**: <0-100, how well a junior candidate typically matches>
**Fit**: <0-10, overall attractiveness of the role>
**Etapa**: <current or first process stage, if mentioned>
**Status**: Pendente

**Observações**:
<2-4 short lines with salary hints, red flags, and preparation tips>

Job posting:
---
{posting}
---"#;

/// System prompt for tailored resume generation.
pub const RESUME_SYSTEM: &str =
    "You are an expert resume writer. \
    Produce a tailored one-page resume in markdown, in the language of the \
    candidate profile. \
    Only use facts present in the profile — never invent experience. \
    Do NOT wrap the output in code fences.";

/// Resume prompt template. Replace `{vaga}` and `{profile}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Write a tailored resume for this application.

Target position:
{vaga}

Candidate profile (source of truth — do not invent beyond it):
---
{profile}
---

Emphasize the profile items most relevant to the target position and keep it to one page."#;
