//! Demo fallback engine.
//!
//! Produces a deterministic, keyword-matched analysis with no network access. Used whenever a
//! model call fails so callers always get a usable result. The output is illustrative only.

use dx_types::Confidence;

use crate::constants::MAX_FOLLOW_UP_QUESTIONS;
use crate::domain::{AnalysisResult, DiagnosisCandidate, Mode};

const PATIENT_FLAG_PREFIX: &str = "⚠️ ";

struct DiagnosisStub {
    name: &'static str,
    confidence: i64,
    category: &'static str,
}

/// One entry of the ordered symptom pattern table.
pub struct SymptomPattern {
    id: &'static str,
    keywords: &'static [&'static str],
    diagnoses: &'static [DiagnosisStub],
    questions: &'static [&'static str],
    red_flags: &'static [&'static str],
    tests: &'static [&'static str],
}

impl SymptomPattern {
    pub fn id(&self) -> &'static str {
        self.id
    }

    fn score(&self, lowered: &str) -> usize {
        self.keywords.iter().filter(|k| lowered.contains(**k)).count()
    }
}

// Order matters: ties go to the earlier entry and the first entry is the default.
static PATTERNS: [SymptomPattern; 5] = [
    SymptomPattern {
        id: "febrile",
        keywords: &["fever", "joint pain", "muscle ache"],
        diagnoses: &[
            DiagnosisStub { name: "Viral Fever", confidence: 75, category: "Infectious Disease" },
            DiagnosisStub { name: "Dengue Fever", confidence: 65, category: "Infectious Disease" },
            DiagnosisStub { name: "Chikungunya", confidence: 55, category: "Infectious Disease" },
        ],
        questions: &[
            "How high has the temperature been, and for how many days?",
            "Is there any rash, bleeding from the gums or nose, or easy bruising?",
            "Have you travelled recently or been exposed to mosquitoes?",
            "Are the joint pains in one joint or many, and is there swelling?",
        ],
        red_flags: &[
            "Bleeding gums, nosebleeds or blood in vomit or stool",
            "Severe abdominal pain or persistent vomiting",
            "Confusion, drowsiness or difficulty staying awake",
            "Fever above 40°C (104°F) or lasting more than 3 days",
        ],
        tests: &[
            "Complete blood count with platelet count",
            "Dengue NS1 antigen and IgM/IgG serology",
            "Chikungunya IgM serology",
            "Liver function tests",
        ],
    },
    SymptomPattern {
        id: "headache",
        keywords: &["headache", "migraine", "head pain"],
        diagnoses: &[
            DiagnosisStub { name: "Tension Headache", confidence: 80, category: "Neurological" },
            DiagnosisStub { name: "Migraine", confidence: 70, category: "Neurological" },
            DiagnosisStub { name: "Cluster Headache", confidence: 45, category: "Neurological" },
        ],
        questions: &[
            "Where exactly is the pain, and does it throb, press or stab?",
            "Is the headache accompanied by nausea, or sensitivity to light or sound?",
            "Did it start suddenly, or build up over hours or days?",
        ],
        red_flags: &[
            "Sudden, severe 'worst ever' headache",
            "Headache with fever and stiff neck",
            "New weakness, numbness, confusion or trouble speaking",
            "Headache after a head injury",
        ],
        tests: &[
            "Neurological examination",
            "Blood pressure measurement",
            "CT or MRI of the head if red flags are present",
        ],
    },
    SymptomPattern {
        id: "chest",
        keywords: &["chest pain", "breathing", "shortness of breath"],
        diagnoses: &[
            DiagnosisStub { name: "Costochondritis", confidence: 60, category: "Musculoskeletal" },
            DiagnosisStub { name: "Gastroesophageal Reflux", confidence: 55, category: "Gastrointestinal" },
            DiagnosisStub { name: "Angina Pectoris", confidence: 45, category: "Cardiovascular" },
        ],
        questions: &[
            "Does the pain spread to the arm, jaw, neck or back?",
            "Does it get worse with exertion, deep breaths or pressing on the chest?",
            "Is it related to meals or lying down?",
            "Is there sweating, nausea or light-headedness with the pain?",
        ],
        red_flags: &[
            "Crushing chest pain or pressure spreading to the arm or jaw",
            "Severe shortness of breath at rest",
            "Fainting, sweating or a racing or irregular heartbeat",
        ],
        tests: &[
            "12-lead ECG",
            "Cardiac troponin",
            "Chest X-ray",
            "Pulse oximetry",
        ],
    },
    SymptomPattern {
        id: "respiratory",
        keywords: &["cough", "sore throat", "runny nose", "congestion"],
        diagnoses: &[
            DiagnosisStub { name: "Common Cold", confidence: 80, category: "Respiratory" },
            DiagnosisStub { name: "Influenza", confidence: 65, category: "Respiratory" },
            DiagnosisStub { name: "Acute Sinusitis", confidence: 50, category: "Respiratory" },
        ],
        questions: &[
            "Is the cough dry, or are you bringing up phlegm? What colour is it?",
            "Have you had a fever or body aches along with it?",
            "How long have the symptoms been going on?",
        ],
        red_flags: &[
            "Difficulty breathing or lips turning blue",
            "Coughing up blood",
            "Symptoms improving then suddenly getting worse",
        ],
        tests: &[
            "Throat examination",
            "Rapid influenza or COVID-19 antigen test",
            "Chest X-ray if breathing is affected",
        ],
    },
    SymptomPattern {
        id: "digestive",
        keywords: &["stomach", "nausea", "vomiting", "diarrhea", "abdominal"],
        diagnoses: &[
            DiagnosisStub { name: "Gastroenteritis", confidence: 70, category: "Gastrointestinal" },
            DiagnosisStub { name: "Food Poisoning", confidence: 60, category: "Gastrointestinal" },
            DiagnosisStub { name: "Irritable Bowel Syndrome", confidence: 40, category: "Gastrointestinal" },
        ],
        questions: &[
            "When did the symptoms start, and did anyone who ate with you get sick too?",
            "Is there any blood in the stool or vomit?",
            "Are you able to keep fluids down?",
        ],
        red_flags: &[
            "Signs of dehydration: very little urine, dizziness, dry mouth",
            "Blood in stool or vomit",
            "Severe or constant abdominal pain",
        ],
        tests: &[
            "Stool culture",
            "Electrolytes and kidney function",
            "Abdominal examination",
        ],
    },
];

const DOCTOR_GENERIC_QUESTIONS: [&str; 3] = [
    "What are the current vital signs (temperature, heart rate, blood pressure, oxygen saturation)?",
    "Is there relevant past medical, surgical or family history?",
    "Which medications, including over-the-counter and supplements, are currently taken?",
];

const PATIENT_GENERIC_QUESTIONS: [&str; 3] = [
    "On a scale of 1 to 10, how bad is the discomfort?",
    "Have you noticed anything that triggers the symptoms or makes them worse?",
    "Are you taking any medicines or supplements right now?",
];

/// Doctor and patient phrasing for each diagnosis the table can produce.
fn descriptions(name: &str) -> Option<(&'static str, &'static str)> {
    let pair = match name {
        "Viral Fever" => (
            "Acute febrile illness of presumed viral aetiology (ICD-10 B34.9); usually self-limiting with supportive care.",
            "A common infection caused by a virus that brings on fever and aches. It usually gets better on its own with rest and fluids.",
        ),
        "Dengue Fever" => (
            "Arboviral infection (ICD-10 A90) with fever, myalgia and arthralgia; monitor platelets and haematocrit for progression.",
            "An infection spread by mosquitoes that causes high fever and strong body aches. It needs a blood test and close watching.",
        ),
        "Chikungunya" => (
            "Alphavirus infection (ICD-10 A92.0) presenting with fever and prominent, often symmetrical polyarthralgia.",
            "A mosquito-borne virus known for fever and very painful joints, which can last for weeks.",
        ),
        "Tension Headache" => (
            "Primary headache (ICD-10 G44.2), bilateral pressing quality, mild to moderate, without migrainous features.",
            "The most common kind of headache, often feeling like a tight band around the head. Stress and poor sleep can bring it on.",
        ),
        "Migraine" => (
            "Primary headache disorder (ICD-10 G43) with unilateral pulsating pain, nausea and photo/phonophobia.",
            "A strong, throbbing headache often on one side, sometimes with sickness and sensitivity to light or noise.",
        ),
        "Cluster Headache" => (
            "Trigeminal autonomic cephalalgia (ICD-10 G44.0): severe unilateral orbital pain with ipsilateral autonomic signs.",
            "Very severe pain around one eye that comes in bouts, sometimes with a watery eye or runny nose on the same side.",
        ),
        "Costochondritis" => (
            "Inflammation of costochondral junctions (ICD-10 M94.0); reproducible chest wall tenderness on palpation.",
            "Inflammation where the ribs join the breastbone. It hurts when you press on the chest and is not a heart problem.",
        ),
        "Gastroesophageal Reflux" => (
            "Gastro-oesophageal reflux disease (ICD-10 K21.9); retrosternal burning related to meals or recumbency.",
            "Stomach acid coming back up into the food pipe, causing a burning feeling in the chest, often after eating.",
        ),
        "Angina Pectoris" => (
            "Myocardial ischaemia (ICD-10 I20.9); exertional retrosternal pressure relieved by rest. Exclude acute coronary syndrome.",
            "Chest pain caused by the heart not getting enough blood, often during activity. This needs prompt medical checking.",
        ),
        "Common Cold" => (
            "Viral upper respiratory tract infection (ICD-10 J00); coryza and pharyngitis, self-limiting.",
            "A mild virus infection of the nose and throat. It usually clears up within a week or so.",
        ),
        "Influenza" => (
            "Influenza (ICD-10 J11.1) with abrupt fever, myalgia and cough; consider antivirals in high-risk patients.",
            "The flu: a virus that comes on quickly with fever, aches and a cough, and can make you feel very unwell.",
        ),
        "Acute Sinusitis" => (
            "Acute rhinosinusitis (ICD-10 J01.9); facial pain and purulent nasal discharge, mostly viral.",
            "Swelling of the spaces behind the nose and cheeks, causing a blocked nose and pressure in the face.",
        ),
        "Gastroenteritis" => (
            "Acute infectious gastroenteritis (ICD-10 A09); assess hydration status and electrolytes.",
            "A stomach bug that causes sickness and diarrhoea. Drinking plenty of fluids is the most important thing.",
        ),
        "Food Poisoning" => (
            "Foodborne illness (ICD-10 A05.9); rapid onset after exposure, often with shared-meal clusters.",
            "Illness from eating contaminated food, usually starting within hours and passing in a day or two.",
        ),
        "Irritable Bowel Syndrome" => (
            "Functional bowel disorder (ICD-10 K58); recurrent abdominal pain associated with altered bowel habit.",
            "A long-term gut condition causing cramps, bloating and changes in bowel habits that come and go.",
        ),
        _ => return None,
    };
    Some(pair)
}

fn describe(name: &str, mode: Mode) -> String {
    match (descriptions(name), mode) {
        (Some((doctor, _)), Mode::Doctor) => doctor.to_string(),
        (Some((_, patient)), Mode::Patient) => patient.to_string(),
        (None, Mode::Doctor) => format!("{name}: consider in the differential; correlate clinically."),
        (None, Mode::Patient) => {
            format!("{name} is one possible explanation. A clinician can tell you more.")
        }
    }
}

/// Select the pattern whose keywords best match `symptoms`.
///
/// Matching is case-insensitive substring search. Ties go to the earlier pattern; no match at
/// all selects the first pattern.
pub fn match_pattern(symptoms: &str) -> &'static SymptomPattern {
    let lowered = symptoms.to_lowercase();
    let mut best = &PATTERNS[0];
    let mut best_score = 0;
    for pattern in PATTERNS.iter() {
        let score = pattern.score(&lowered);
        if score > best_score {
            best = pattern;
            best_score = score;
        }
    }
    best
}

fn flags_for(pattern: &SymptomPattern, mode: Mode) -> Vec<String> {
    pattern
        .red_flags
        .iter()
        .map(|flag| match mode {
            Mode::Doctor => flag.to_string(),
            Mode::Patient => format!("{PATIENT_FLAG_PREFIX}{flag}"),
        })
        .collect()
}

fn questions_for(pattern: &SymptomPattern, mode: Mode) -> Vec<String> {
    let generic = match mode {
        Mode::Doctor => &DOCTOR_GENERIC_QUESTIONS,
        Mode::Patient => &PATIENT_GENERIC_QUESTIONS,
    };
    pattern
        .questions
        .iter()
        .chain(generic.iter())
        .take(MAX_FOLLOW_UP_QUESTIONS)
        .map(|q| q.to_string())
        .collect()
}

/// Build the full demo analysis for `symptoms`. Never fails.
pub fn demo_analysis(symptoms: &str, mode: Mode) -> AnalysisResult {
    let pattern = match_pattern(symptoms);
    let red_flags = flags_for(pattern, mode);
    let tests: Vec<String> = pattern.tests.iter().map(|t| t.to_string()).collect();

    let diagnoses: Vec<DiagnosisCandidate> = pattern
        .diagnoses
        .iter()
        .map(|stub| DiagnosisCandidate {
            name: stub.name.to_string(),
            description: describe(stub.name, mode),
            confidence: Confidence::saturating(stub.confidence),
            category: stub.category.to_string(),
            red_flags: red_flags.clone(),
            recommended_tests: tests.clone(),
        })
        .collect();
    let overall_confidence = Confidence::rounded_mean(diagnoses.iter().map(|d| d.confidence));

    AnalysisResult {
        diagnoses,
        follow_up_questions: questions_for(pattern, mode),
        red_flags,
        recommended_tests: tests,
        overall_confidence,
    }
}

/// Follow-up questions the demo analysis would attach, on their own.
pub fn demo_follow_up_questions(symptoms: &str, mode: Mode) -> Vec<String> {
    questions_for(match_pattern(symptoms), mode)
}

/// Canned patient-education text for `diagnosis`.
pub fn demo_education(diagnosis: &str) -> String {
    let name = diagnosis.trim();
    let about = describe(name, Mode::Patient);
    format!(
        "About {name}\n\n{about}\n\n\
         What you can do: rest, drink plenty of fluids and use simple pain relief if it is safe \
         for you.\n\n\
         Get medical help promptly if your symptoms get much worse, do not improve within a few \
         days, or you notice anything that worries you.\n\n\
         This information is general education and is not a diagnosis."
    )
}
