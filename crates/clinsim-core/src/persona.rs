//! Simulated-patient persona and transcript shaping.

use clinsim_contracts::{
    case::CaseDefinition,
    chat::{ChatTurn, Speaker},
    error::{ClinsimError, ClinsimResult},
};

fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

/// The system prompt that makes a conversational backend speak as the
/// case's patient.
pub fn patient_persona_prompt(case: &CaseDefinition) -> String {
    let patient = &case.patient;
    let vitals = &case.vital_signs;

    format!(
        "Eres {name}, un(a) paciente de {age} años con los siguientes datos:\n\
         \n\
         **Antecedentes:**\n\
         - Ocupación: {occupation}\n\
         - Medicaciones actuales: {medications}\n\
         - Alergias: {allergies}\n\
         - Antecedentes médicos: {history}\n\
         \n\
         **Presentación actual:**\n\
         - Queja principal: {complaint}\n\
         - Historia de la enfermedad actual: {hpi}\n\
         \n\
         **Signos vitales:**\n\
         - Temperatura: {temp}°C\n\
         - Presión arterial: {bp}\n\
         - Frecuencia cardíaca: {hr} lpm\n\
         - Frecuencia respiratoria: {rr} rpm\n\
         - Saturación O2: {sat}%\n\
         \n\
         **Examen físico:**\n\
         {exam}\n\
         \n\
         Mantén coherencia con estos datos. Responde brevemente como lo haría un paciente real. \
         Si el médico pregunta por síntomas, examen físico o historia, responde basándote en la \
         información arriba. Sé cooperativo pero realista con tus síntomas y limitaciones.",
        name = patient.name,
        age = patient.age,
        occupation = patient.occupation,
        medications = list_or(&patient.current_medications, "Ninguna"),
        allergies = list_or(&patient.allergies, "No conocidas"),
        history = list_or(&patient.past_medical_history, "Sin antecedentes relevantes"),
        complaint = case.presenting_complaint,
        hpi = case.history_of_present_illness,
        temp = vitals.temperature,
        bp = vitals.blood_pressure,
        hr = vitals.heart_rate,
        rr = vitals.respiratory_rate,
        sat = vitals.oxygen_saturation,
        exam = case.physical_exam,
    )
}

/// Shape a transcript for a backend that needs strict doctor/patient
/// alternation starting with the doctor.
///
/// Leading patient turns and repeated same-speaker turns are dropped. The
/// last turn must be a non-empty doctor question.
pub fn normalize_transcript(transcript: &[ChatTurn]) -> ClinsimResult<Vec<ChatTurn>> {
    match transcript.last() {
        Some(turn) if turn.speaker == Speaker::Doctor && !turn.content.trim().is_empty() => {}
        _ => {
            return Err(ClinsimError::InvalidAnswer {
                reason: "the conversation must end with a non-empty doctor question".to_string(),
            });
        }
    }

    let mut shaped: Vec<ChatTurn> = Vec::with_capacity(transcript.len());
    for turn in transcript {
        let previous = shaped.last().map(|t| t.speaker);
        match previous {
            None if turn.speaker != Speaker::Doctor => continue,
            Some(speaker) if speaker == turn.speaker => continue,
            _ => shaped.push(turn.clone()),
        }
    }

    // A trailing doctor turn can be swallowed by an earlier doctor turn.
    if let (Some(last_kept), Some(last)) = (shaped.last_mut(), transcript.last()) {
        if last_kept.speaker == Speaker::Doctor {
            *last_kept = last.clone();
        }
    }

    Ok(shaped)
}

#[cfg(test)]
mod tests {
    use clinsim_contracts::{chat::ChatTurn, error::ClinsimError};

    use crate::testing::sample_case;

    use super::{normalize_transcript, patient_persona_prompt};

    #[test]
    fn persona_mentions_patient_and_vitals() {
        let prompt = patient_persona_prompt(&sample_case("case-a"));
        assert!(prompt.starts_with("Eres Carlos"));
        assert!(prompt.contains("58 años"));
        assert!(prompt.contains("150/95"));
        assert!(prompt.contains("Alergias: No conocidas"));
        assert!(prompt.contains("Enalapril 10 mg"));
    }

    #[test]
    fn transcript_drops_leading_patient_and_repeats() {
        let transcript = vec![
            ChatTurn::patient("Buenos días"),
            ChatTurn::doctor("¿Qué le pasa?"),
            ChatTurn::patient("Me duele el pecho"),
            ChatTurn::patient("Mucho"),
            ChatTurn::doctor("¿Desde cuándo?"),
        ];
        let shaped = normalize_transcript(&transcript).unwrap();
        assert_eq!(
            shaped,
            vec![
                ChatTurn::doctor("¿Qué le pasa?"),
                ChatTurn::patient("Me duele el pecho"),
                ChatTurn::doctor("¿Desde cuándo?"),
            ]
        );
    }

    #[test]
    fn consecutive_doctor_turns_keep_latest_question() {
        let transcript = vec![ChatTurn::doctor("Hola"), ChatTurn::doctor("¿Le duele?")];
        let shaped = normalize_transcript(&transcript).unwrap();
        assert_eq!(shaped, vec![ChatTurn::doctor("¿Le duele?")]);
    }

    #[test]
    fn transcript_must_end_with_doctor() {
        let err = normalize_transcript(&[ChatTurn::patient("Hola")]).unwrap_err();
        assert!(matches!(err, ClinsimError::InvalidAnswer { .. }));
        assert!(normalize_transcript(&[]).is_err());
        assert!(normalize_transcript(&[ChatTurn::doctor("   ")]).is_err());
    }
}
