use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionListQuery {
    #[serde(default = "default_true", alias = "solo_activas")]
    pub active_only: bool,
}

fn default_true() -> bool {
    true
}
