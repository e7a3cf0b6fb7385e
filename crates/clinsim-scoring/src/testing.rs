//! Shared fixtures for the in-crate tests.

use clinsim_contracts::case::{
    AlcoholUse, CaseDefinition, CaseId, Guidelines, PatientProfile, Sex, SmokingStatus,
    StepKeywords, StepWeights, VitalSigns,
};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// A chest-pain case with the default 40/20/15/15/10 weights.
pub fn chest_pain_case() -> CaseDefinition {
    let id = "chest-pain-001";
    CaseDefinition {
        id: CaseId::from(id),
        name: "Dolor torácico agudo".to_string(),
        specialization: "Cardiología".to_string(),
        patient: PatientProfile {
            name: "Carlos".to_string(),
            age: 58,
            sex: Sex::M,
            occupation: "Contador".to_string(),
            past_medical_history: words(&["Hipertensión"]),
            current_medications: words(&["Enalapril 10 mg"]),
            allergies: Vec::new(),
            family_history: words(&["Padre con infarto a los 60 años"]),
            smoking: SmokingStatus::Current,
            pack_years: Some(30),
            alcohol: AlcoholUse::Moderate,
        },
        presenting_complaint: "Dolor opresivo en el pecho de 2 horas".to_string(),
        history_of_present_illness: "Dolor irradiado a brazo izquierdo con diaforesis".to_string(),
        vital_signs: VitalSigns {
            temperature: 36.8,
            blood_pressure: "150/95".to_string(),
            heart_rate: 102,
            respiratory_rate: 20,
            oxygen_saturation: 95,
        },
        physical_exam: "Paciente diaforético, ruidos cardíacos rítmicos".to_string(),
        initial_assessment: "Sospecha de síndrome coronario agudo".to_string(),
        guidelines: Guidelines {
            source: "ESC 2023".to_string(),
            condition_code: "I21.9".to_string(),
            recommended_tests: words(&["ECG", "Troponina"]),
            treatment_options: words(&["Aspirina", "Angioplastia"]),
            referral_indications: words(&["Elevación del ST"]),
        },
        keywords: StepKeywords {
            diagnosis: words(&["infarto", "iam"]),
            differential: words(&["angina", "disección", "pericarditis"]),
            tests: words(&["ecg", "troponina", "radiografía", "ecocardiograma", "ck-mb"]),
            treatment: words(&["aspirina", "clopidogrel", "heparina", "angioplastia", "nitroglicerina"]),
            followup: words(&["rehabilitación", "estatina", "control"]),
        },
        weights: StepWeights::default(),
        education_points: words(&["El ECG debe obtenerse en los primeros 10 minutos"]),
    }
}
