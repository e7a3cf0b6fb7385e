//! Procedurally generated family-medicine cases.
//!
//! A synthetic patient is drawn from fixed name, occupation, and condition
//! tables. Chronic conditions are sampled with an age-weighted prevalence;
//! the first condition drawn becomes the index condition of the case and
//! drives its keyword sets. A patient with no condition gets a routine
//! review case.
//!
//! All randomness comes from the caller's RNG. `generate_cases` seeds a
//! `StdRng`, so the same seed always yields the same catalog and the same
//! case ids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use clinsim_contracts::case::{
    AlcoholUse, CaseDefinition, CaseId, Guidelines, PatientProfile, Sex, SmokingStatus,
    StepKeywords, StepWeights, VitalSigns,
};

// ── Tables ───────────────────────────────────────────────────────────────────

static MALE_NAMES: &[&str] = &[
    "Carlos", "Juan", "Antonio", "Miguel", "Pedro", "José", "Luis", "Fernando", "Andrés",
    "Ricardo", "Jorge", "Raúl",
];

static FEMALE_NAMES: &[&str] = &[
    "María", "Carmen", "Ana", "Isabel", "Rosa", "Teresa", "Patricia", "Magdalena", "Gloria",
    "Josefina", "Catalina",
];

static LAST_NAMES: &[&str] = &[
    "García", "Rodríguez", "Martínez", "Hernández", "López", "González", "Pérez", "Sánchez",
    "Ramírez", "Torres", "Flores", "Rivera", "Díaz", "Cruz", "Moreno", "Gutiérrez",
];

static OCCUPATIONS: &[&str] = &[
    "Ingeniero",
    "Docente",
    "Empleado de oficina",
    "Vendedor",
    "Técnico",
    "Abogado",
    "Contador",
    "Obrero",
    "Mecánico",
    "Electricista",
    "Profesor",
    "Administrativo",
    "Conductor",
    "Agricultor",
    "Empresario",
    "Jubilado",
    "Ama de casa",
];

static PRESENTING_COMPLAINTS: &[&str] = &[
    "Control de presión arterial",
    "Revisión de niveles de glucosa",
    "Dolor de cabeza persistente",
    "Cansancio y fatiga",
    "Tos persistente",
    "Molestias gástricas",
    "Dolor en el pecho",
    "Dificultad para respirar",
    "Mareos",
    "Insomnio",
    "Ansiedad",
    "Dolores articulares",
];

static COMMON_ALLERGIES: &[&str] = &["Penicilina", "Ibuprofeno", "Aspirina", "Dipirona", "Etoricoxib"];

static FOLLOWUP: &[&str] = &[
    "Seguimiento en 2-4 semanas",
    "Monitoreo de síntomas",
    "Ajustes de medicación",
];

/// One chronic condition the generator can assign.
#[derive(Debug)]
pub struct ConditionProfile {
    pub name: &'static str,
    /// ICD-10 code used as the case's condition code.
    pub code: &'static str,
    /// Percent prevalence at age 50. Scales linearly with age.
    pub prevalence: f64,
    /// Only sampled for patients older than 40.
    pub over_forty_only: bool,
    pub medications: &'static [&'static str],
    pub tests: &'static [&'static str],
    pub treatment: &'static [&'static str],
    pub differential: &'static [&'static str],
    pub referrals: &'static [&'static str],
}

static CONDITIONS: &[ConditionProfile] = &[
    ConditionProfile {
        name: "Diabetes tipo 2",
        code: "E11",
        prevalence: 30.0,
        over_forty_only: false,
        medications: &["Metformina 500mg", "Glibenclamida 5mg", "Insulina NPH"],
        tests: &["Glucosa en ayunas", "HbA1c", "Perfil lipídico", "Creatinina", "Microalbuminuria"],
        treatment: &["Metformina", "Sulfonilureas", "GLP-1", "Insulina"],
        differential: &["Intolerancia a la glucosa", "Diabetes tipo 1", "Diabetes secundaria"],
        referrals: &[
            "Endocrinología si mal control",
            "Oftalmología para cribado",
            "Nefrología si compromiso renal",
        ],
    },
    ConditionProfile {
        name: "Hipertensión",
        code: "I10",
        prevalence: 45.0,
        over_forty_only: false,
        medications: &["Enalapril 10mg", "Losartán 50mg", "Amlodipino 5mg", "Hidroclorotiazida 25mg"],
        tests: &["Presión arterial ambulatoria", "ECG", "Ecocardiograma", "Creatinina"],
        treatment: &["IECA", "ARA II", "Calcioantagonistas", "Diuréticos"],
        differential: &["Hipertensión secundaria", "Bata blanca", "Hipertensión enmascarada"],
        referrals: &[
            "Cardiología si HVI",
            "Nefrología si daño renal",
            "Neurología si accidente cerebrovascular",
        ],
    },
    ConditionProfile {
        name: "Dislipidemia",
        code: "E78",
        prevalence: 25.0,
        over_forty_only: false,
        medications: &["Atorvastatina 20mg", "Simvastatina 20mg"],
        tests: &["Perfil lipídico", "Glucosa", "TSH"],
        treatment: &["Estatinas", "Ezetimiba", "PCSK9"],
        differential: &["Hiperlipidemia familiar", "Dislipidemia secundaria"],
        referrals: &["Endocrinología si hipercolesterolemia familiar"],
    },
    ConditionProfile {
        name: "Síndrome metabólico",
        code: "E88.81",
        prevalence: 15.0,
        over_forty_only: true,
        medications: &["Metformina 500mg", "Enalapril 10mg", "Atorvastatina 20mg"],
        tests: &["Glucosa", "Perfil lipídico", "Presión arterial"],
        treatment: &["Modificación de estilos de vida", "Metformina", "Estatinas"],
        differential: &["Diabetes tipo 2", "Hipotiroidismo", "Síndrome de Cushing"],
        referrals: &["Especialista si no responde a tratamiento"],
    },
    ConditionProfile {
        name: "Enfermedad tiroidea",
        code: "E07.9",
        prevalence: 8.0,
        over_forty_only: true,
        medications: &["Levotiroxina 75mcg", "Propranolol 40mg"],
        tests: &["TSH", "T4 libre", "Ecografía tiroidea"],
        treatment: &["Levotiroxina", "Betabloqueantes"],
        differential: &["Hipotiroidismo subclínico", "Tiroiditis", "Bocio multinodular"],
        referrals: &["Endocrinología si nódulo tiroideo"],
    },
    ConditionProfile {
        name: "EPOC",
        code: "J44.9",
        prevalence: 10.0,
        over_forty_only: true,
        medications: &["Salbutamol inhalador", "Beclometasona inhalador", "Bromuro de ipratropio"],
        tests: &["Espirometría", "Gasometría arterial", "Radiografía de tórax"],
        treatment: &["Broncodilatadores", "Corticoides inhalados", "Teofilina"],
        differential: &["Asma", "Insuficiencia cardíaca", "Bronquiectasias"],
        referrals: &["Neumología si moderada-severa", "Cardiología si cor pulmonale"],
    },
];

static ROUTINE_REVIEW: ConditionProfile = ConditionProfile {
    name: "Revisión de rutina",
    code: "Z00.00",
    prevalence: 0.0,
    over_forty_only: false,
    medications: &[],
    tests: &["Hemograma completo", "Glucosa", "Perfil lipídico"],
    treatment: &["Tratamiento farmacológico", "Modificación de estilos de vida"],
    differential: &["Otras causas", "Variante normal"],
    referrals: &["Especialista si no responde a tratamiento"],
};

// ── Synthetic patient ────────────────────────────────────────────────────────

/// A sampled patient before it is turned into a case.
#[derive(Debug)]
pub struct SyntheticPatient {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub age: u8,
    pub sex: Sex,
    pub occupation: &'static str,
    /// Chronic conditions in table order.
    pub conditions: Vec<&'static ConditionProfile>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub family_history: Vec<String>,
    pub smoking: SmokingStatus,
    pub alcohol: AlcoholUse,
}

impl SyntheticPatient {
    /// The condition the case is built around.
    pub fn index_condition(&self) -> &'static ConditionProfile {
        self.conditions.first().copied().unwrap_or(&ROUTINE_REVIEW)
    }

    fn has_condition(&self, code: &str) -> bool {
        self.conditions.iter().any(|c| c.code == code)
    }

    fn history(&self) -> Vec<String> {
        self.conditions.iter().map(|c| c.name.to_string()).collect()
    }
}

fn pick(rng: &mut impl Rng, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

/// Draw one synthetic patient.
pub fn generate_patient(rng: &mut impl Rng) -> SyntheticPatient {
    let sex = if rng.gen_bool(0.5) { Sex::M } else { Sex::F };
    let first_name = match sex {
        Sex::M => pick(rng, MALE_NAMES),
        Sex::F => pick(rng, FEMALE_NAMES),
    };
    let last_name = pick(rng, LAST_NAMES);
    let age: u8 = rng.gen_range(18..86);

    let age_factor = f64::from(age) / 50.0;
    let conditions: Vec<&'static ConditionProfile> = CONDITIONS
        .iter()
        .filter(|c| age > 40 || !c.over_forty_only)
        .filter(|c| rng.gen_range(0.0..100.0) < c.prevalence * age_factor)
        .collect();

    let mut medications: Vec<String> = Vec::new();
    for condition in &conditions {
        let take = if rng.gen_bool(0.5) { 1 } else { 2 };
        for med in condition.medications.iter().take(take) {
            if !medications.iter().any(|m| m == med) {
                medications.push(med.to_string());
            }
        }
    }

    let mut allergies = Vec::new();
    if rng.gen_bool(0.3) {
        allergies.push(pick(rng, COMMON_ALLERGIES).to_string());
    }

    let mut family_history = Vec::new();
    if rng.gen_bool(0.4) {
        family_history.push("Diabetes tipo 2".to_string());
    }
    if rng.gen_bool(0.3) {
        family_history.push("Hipertensión".to_string());
    }
    if rng.gen_bool(0.2) {
        family_history.push("Enfermedad cardiovascular".to_string());
    }

    let smoking = if rng.gen_bool(0.4) {
        SmokingStatus::Current
    } else if rng.gen_bool(0.5) {
        SmokingStatus::Former
    } else {
        SmokingStatus::Never
    };

    let alcohol_roll: f64 = rng.gen();
    let alcohol = if alcohol_roll > 0.65 {
        AlcoholUse::None
    } else if alcohol_roll > 0.35 {
        AlcoholUse::Moderate
    } else {
        AlcoholUse::Heavy
    };

    SyntheticPatient {
        first_name,
        last_name,
        age,
        sex,
        occupation: pick(rng, OCCUPATIONS),
        conditions,
        medications,
        allergies,
        family_history,
        smoking,
        alcohol,
    }
}

// ── Case assembly ────────────────────────────────────────────────────────────

fn jitter(rng: &mut impl Rng, spread: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * spread
}

fn vital_signs(rng: &mut impl Rng, patient: &SyntheticPatient) -> VitalSigns {
    let age = f64::from(patient.age);
    let hypertensive = patient.has_condition("I10");
    let copd = patient.has_condition("J44.9");

    let (systolic_shift, diastolic_shift) = if hypertensive { (20.0, 10.0) } else { (0.0, 0.0) };
    let baseline_saturation = if copd { 94.0 } else { 98.0 };

    let temperature = 36.5 + jitter(rng, 0.8);
    let systolic = 110.0 + age * 0.5 + systolic_shift + jitter(rng, 10.0);
    let diastolic = 70.0 + age * 0.1 + diastolic_shift + jitter(rng, 8.0);
    let heart_rate = 60.0 + jitter(rng, 20.0);
    let respiratory_rate = 16.0 + jitter(rng, 4.0);
    let saturation: f64 = baseline_saturation + jitter(rng, 2.0);

    VitalSigns {
        temperature: ((temperature * 10.0).round() / 10.0) as f32,
        blood_pressure: format!("{}/{}", systolic.round() as u16, diastolic.round() as u16),
        heart_rate: heart_rate.round() as u16,
        respiratory_rate: respiratory_rate.round() as u16,
        oxygen_saturation: saturation.round().min(100.0) as u8,
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercase(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_lowercase()).collect()
}

/// Turn `patient` into case number `index`.
pub fn patient_to_case(rng: &mut impl Rng, patient: &SyntheticPatient, index: usize) -> CaseDefinition {
    let condition = patient.index_condition();
    let complaint = PRESENTING_COMPLAINTS[index % PRESENTING_COMPLAINTS.len()];
    let vitals = vital_signs(rng, patient);
    let history = patient.history();
    let history_text = if history.is_empty() {
        "sin antecedentes significativos".to_string()
    } else {
        history.join(", ")
    };

    let duration = rng.gen_range(1..21);
    let unit = if rng.gen_bool(0.5) { "días" } else { "semanas" };
    let onset = if rng.gen_bool(0.5) { "gradual" } else { "súbito" };
    let mut hpi = format!(
        "El paciente refiere {} de {} {} de evolución {}. Niega síntomas asociados graves.",
        complaint.to_lowercase(),
        duration,
        unit,
        onset
    );
    if !history.is_empty() {
        hpi.push_str(&format!(
            " Refiere control regular de sus condiciones de base ({}).",
            history_text
        ));
    }

    let bmi = 18.0 + rng.gen::<f64>() * 15.0;
    let physical_exam = format!(
        "Paciente {} de {} años, IMC aproximado {:.1}. Presión arterial: {} mmHg, FC: {} lpm, \
         saturación O2: {}%. Exploración neurológica normal. Auscultación cardiopulmonar sin \
         alteraciones. Abdomen blando, depresible, sin visceromegalias.",
        if patient.sex == Sex::M { "varón" } else { "mujer" },
        patient.age,
        bmi,
        vitals.blood_pressure,
        vitals.heart_rate,
        vitals.oxygen_saturation
    );

    let mut treatment = lowercase(condition.treatment);
    if history.len() > 1 {
        treatment.push("interacciones medicamentosas".to_string());
    }

    CaseDefinition {
        id: CaseId::new(format!("synthea-{}-{}", patient.first_name.to_lowercase(), index)),
        name: format!("Caso Synthea: {} {}", patient.first_name, patient.last_name),
        specialization: "medicina_familia".to_string(),
        patient: PatientProfile {
            name: format!("{} {}", patient.first_name, patient.last_name),
            age: patient.age,
            sex: patient.sex,
            occupation: patient.occupation.to_string(),
            past_medical_history: history,
            current_medications: patient.medications.clone(),
            allergies: patient.allergies.clone(),
            family_history: patient.family_history.clone(),
            smoking: patient.smoking,
            pack_years: None,
            alcohol: patient.alcohol,
        },
        presenting_complaint: complaint.to_string(),
        history_of_present_illness: hpi,
        vital_signs: vitals,
        physical_exam,
        initial_assessment: format!(
            "Paciente de {} años con antecedentes de {}, que acude por {}.",
            patient.age,
            history_text,
            complaint.to_lowercase()
        ),
        guidelines: Guidelines {
            source: "AAFP/GPC España/UpToDate".to_string(),
            condition_code: condition.code.to_string(),
            recommended_tests: owned(condition.tests),
            treatment_options: owned(condition.treatment),
            referral_indications: owned(condition.referrals),
        },
        keywords: StepKeywords {
            diagnosis: lowercase(&[condition.name]),
            differential: lowercase(condition.differential),
            tests: lowercase(condition.tests),
            treatment,
            followup: lowercase(FOLLOWUP),
        },
        weights: StepWeights::default(),
        education_points: vec![
            format!("{} requiere control regular", condition.name),
            "Importancia de la adherencia farmacológica".to_string(),
            "Modificación de estilos de vida".to_string(),
            "Seguimiento periódico de parámetros clínicos".to_string(),
        ],
    }
}

/// Generate `count` cases from `seed`.
///
/// Case indices run from 1 to `count`, so ids are unique within one call.
pub fn generate_cases(seed: u64, count: usize) -> Vec<CaseDefinition> {
    let mut rng = StdRng::seed_from_u64(seed);
    let cases: Vec<CaseDefinition> = (1..=count)
        .map(|index| {
            let patient = generate_patient(&mut rng);
            patient_to_case(&mut rng, &patient, index)
        })
        .collect();
    debug!(seed, count = cases.len(), "generated synthetic cases");
    cases
}
