use serde::{Deserialize, Serialize};

/// One training session's report data. Every field is optional: a field left
/// out of the payload leaves the corresponding template cell untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affectation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semaine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formateur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horaires: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_redaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations_groupe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes_modules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previsions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apprenants: Option<Vec<Learner>>,
}

/// One row of the learner table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Learner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}
