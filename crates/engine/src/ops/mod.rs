use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod consensus;
mod expenses;
mod itinerary;
mod polls;
mod surveys;
mod trips;

pub use expenses::TripLedger;
pub use surveys::TripSurvey;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Trim `value` and check its length in characters is within `min..=max`.
fn normalize_required_text(
    value: &str,
    label: &str,
    min: usize,
    max: usize,
) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be between {min} and {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Lower-cased, trimmed email. Only the `local@domain.tld` shape is checked.
fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(EngineError::InvalidInput(format!("invalid email: {email}")));
    }
    Ok(email)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_counts_characters_after_trim() {
        assert_eq!(
            normalize_required_text("  Rome  ", "trip name", 3, 100).unwrap(),
            "Rome"
        );
        assert!(normalize_required_text(" ab ", "trip name", 3, 100).is_err());
        assert!(normalize_required_text("ééé", "trip name", 3, 3).is_ok());
        assert!(normalize_required_text(&"x".repeat(101), "trip name", 3, 100).is_err());
    }

    #[test]
    fn email_shape() {
        assert_eq!(
            normalize_email(" Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
        for bad in ["alice", "@example.com", "alice@", "alice@example", "a@b@c.d", "a b@c.d"] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
