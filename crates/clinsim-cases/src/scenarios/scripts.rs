//! Scripted trainee answers for the authored cases.
//!
//! Each script is five answers in step order. The expected totals noted on
//! each constant hold for the default rubric.

/// Full marks on every step: 100.
pub const HTA_STRONG: [&str; 5] = [
    "Hipertensión arterial estadio 2",
    "HTA esencial frente a HTA secundaria o efecto de bata blanca",
    "ECG, análisis de sangre con glucosa, creatinina, potasio, colesterol, LDL, triglicéridos, \
     proteinuria y MAPA",
    "Estilo de vida: reducir sal, ejercicio y pérdida de peso. Iniciar IECA (ramipril) o ARA II \
     (losartán)",
    "Revisión en 2 semanas con control de presión y ajuste de dosis",
];

/// Partial treatment, documented reasoning on the diagnosis: 92 plus a 5 bonus.
pub const HTA_WALKTHROUGH: [&str; 5] = [
    "Hipertensión arterial estadio 2, porque presenta cifras de 152/96 en consulta que concuerdan \
     con las automediciones domiciliarias de 150-160 mmHg y tiene varios factores de riesgo \
     cardiovascular.",
    "Descartar hipertensión de bata blanca y HTA secundaria.",
    "ECG, análisis de sangre con glucosa, creatinina, potasio, colesterol LDL y triglicéridos, \
     MAPA y proteinuria.",
    "Modificaciones del estilo de vida con dieta baja en sal, ejercicio y pérdida de peso; iniciar \
     IECA (ramipril).",
    "Revisión en 2 semanas para control de presión y ajuste de dosis.",
];

/// Only the diagnosis: 40.
pub const HTA_WEAK: [&str; 5] = ["Hipertensión", "No lo sé", "No lo sé", "No lo sé", "No lo sé"];

/// 100.
pub const DM2_STRONG: [&str; 5] = [
    "Diabetes mellitus tipo 2",
    "Diferenciar de diabetes tipo 1 y de diabetes secundaria",
    "Glucosa basal, HbA1c, creatinina, filtrado glomerular, potasio, colesterol con HDL, LDL y \
     triglicéridos, urianálisis y ECG",
    "Cambios en el estilo de vida con dieta mediterránea, ejercicio y pérdida de peso, educación \
     diabética y metformina",
    "Seguimiento en 4-6 semanas, educar sobre hipoglucemia y revisión anual en oftalmología",
];

/// Diagnosis plus partial tests and treatment: 54, not cleared.
pub const DM2_WEAK: [&str; 5] = [
    "Diabetes",
    "Anemia ferropénica",
    "Pediría una glucosa basal",
    "Metformina",
    "Volver si empeora",
];

/// 100.
pub const DEPRESSION_STRONG: [&str; 5] = [
    "Episodio de depresión mayor",
    "Descartar hipotiroidismo, distimia y trastorno bipolar",
    "PHQ-9, GAD-7, evaluación del riesgo suicida, TSH, hemoglobina y hematocrito",
    "Psicoterapia cognitivo conductual, ISRS como sertralina, actividad física y apoyo psicosocial",
    "Seguimiento en 2 semanas valorando respuesta al tratamiento, efectos adversos y riesgo suicida",
];

/// 100.
pub const BRONCHITIS_STRONG: [&str; 5] = [
    "Bronquitis aguda de probable origen viral",
    "Neumonía o exacerbación de EPOC",
    "Oximetría de pulso y radiografía de tórax si empeora",
    "Tratamiento sintomático con paracetamol, hidratación y reposo, salbutamol a demanda, no \
     antibióticos",
    "Revisión en 7-10 días si no mejora, explicar signos de alarma y actualizar vacunación",
];

/// 100.
pub const DYSMENORRHEA_STRONG: [&str; 5] = [
    "Dismenorrea primaria",
    "Descartar endometriosis y miomas",
    "Diagnóstico clínico; ecografía pélvica si no responde",
    "AINE como ibuprofeno o naproxeno, anticonceptivos hormonales, calor local y ejercicio",
    "Seguimiento en 1-2 ciclos valorando respuesta al tratamiento y derivar a ginecología si fracasa",
];
