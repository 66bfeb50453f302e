use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Institution {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    pub slug: String,
    /// Comma-separated, e.g. `unal.edu.co,un.edu.co`.
    pub email_domains: String,
    pub city: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Institution {
    pub fn domains(&self) -> Vec<String> {
        parse_domains(&self.email_domains)
    }

    /// Whether `email` belongs to one of this institution's accepted domains.
    pub fn accepts_email(&self, email: &str) -> bool {
        match email_domain(email) {
            Some(domain) => self.domains().iter().any(|d| *d == domain),
            None => false,
        }
    }
}

pub fn parse_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().trim_start_matches('@').to_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

/// Lower-cased domain part of an email address.
pub fn email_domain(email: &str) -> Option<String> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(domain.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn institution(domains: &str) -> Institution {
        Institution {
            id: Uuid::new_v4(),
            name: "Uni".into(),
            short_name: "U".into(),
            slug: "u".into(),
            email_domains: domains.into(),
            city: "Bogotá".into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn accepts_listed_domains_case_insensitively() {
        let uni = institution("unal.edu.co, UN.edu.co");
        assert!(uni.accepts_email("ana@unal.edu.co"));
        assert!(uni.accepts_email("Ana@UN.EDU.CO"));
        assert!(!uni.accepts_email("ana@gmail.com"));
        assert!(!uni.accepts_email("ana@sub.unal.edu.co"));
    }

    #[test]
    fn rejects_malformed_emails() {
        let uni = institution("uni.edu");
        assert!(!uni.accepts_email("uni.edu"));
        assert!(!uni.accepts_email("@uni.edu"));
        assert!(!uni.accepts_email("a@"));
    }

    #[test]
    fn domain_list_ignores_blanks_and_at_signs() {
        assert_eq!(parse_domains(" @a.edu,, b.edu "), vec!["a.edu", "b.edu"]);
    }
}
