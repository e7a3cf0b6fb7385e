//! Prompt construction for the external free-text evaluator.

use clinsim_contracts::{case::CaseDefinition, step::EvaluationStep};

fn step_instruction(step: EvaluationStep) -> &'static str {
    match step {
        EvaluationStep::Diagnosis => {
            "Evalúa si el diagnóstico del médico es correcto o al menos válido. Sé flexible con el \
             lenguaje: acepta diagnósticos clínicamente correctos aunque estén redactados diferente."
        }
        EvaluationStep::Differential => {
            "¿Los diagnósticos diferenciales que menciona el médico son válidos? Sé flexible: acepta \
             cualquier diagnóstico diferencial clínicamente relevante al cuadro."
        }
        EvaluationStep::Tests => {
            "¿Las pruebas que ordena el médico son apropiadas? Sé flexible: acepta variaciones razonables."
        }
        EvaluationStep::Treatment => {
            "¿El plan de tratamiento del médico es apropiado? Sé flexible: acepta variaciones \
             clínicamente válidas."
        }
        EvaluationStep::Followup => {
            "¿El plan de seguimiento incluye los elementos clave? Sé flexible: acepta variaciones razonables."
        }
    }
}

/// The evaluator prompt for one step of one case.
///
/// Carries the clinical context, the expected phrases for the step, the
/// answer, the maximum score, and the exact JSON reply shape.
pub fn build_step_prompt(case: &CaseDefinition, step: EvaluationStep, answer: &str) -> String {
    let max_score = case.weight_for(step);
    let expected = case.keywords_for(step).join(", ");

    format!(
        "Eres un médico experto evaluador. El paciente presenta: \"{complaint}\"\n\
         \n\
         Historia: {hpi}\n\
         \n\
         Paso evaluado: {label}\n\
         Elementos esperados: {expected}\n\
         \n\
         Respuesta del médico: \"{answer}\"\n\
         \n\
         {instruction}\n\
         \n\
         Responde SOLO en JSON válido (sin texto adicional):\n\
         {{\n\
         \x20 \"isCorrect\": boolean,\n\
         \x20 \"score\": número de 0 a {max_score},\n\
         \x20 \"feedback\": \"evaluación breve\",\n\
         \x20 \"explanation\": \"breve explicación educativa\",\n\
         \x20 \"clinicalReferences\": [\"referencia de guía clínica\"],\n\
         \x20 \"learnMore\": \"concepto clave o lectura recomendada\"\n\
         }}",
        complaint = case.presenting_complaint,
        hpi = case.history_of_present_illness,
        label = step.label(),
        expected = expected,
        answer = answer.trim(),
        instruction = step_instruction(step),
        max_score = max_score,
    )
}
