use serde::Serialize;

/// A named category of facility benefit (sauna, ice bath, pool, ...).
#[derive(Debug, Clone, Serialize)]
pub struct BenefitType {
    pub id: i64,
    pub code: String, // ⇔ benefit_types.code (unique, lowercase)
    pub name: String,
    pub icon: String,
    pub is_active: bool,
    pub created_at: String,
}

impl BenefitType {
    /// Normalize a user-supplied code: trimmed, lowercase, spaces → underscores.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_lowercase().replace([' ', '-'], "_")
    }
}
