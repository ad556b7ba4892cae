use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

fn postal_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{8}$").expect("postal code pattern is valid"))
}

fn state_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z]{2}$").expect("state pattern is valid"))
}

impl Address {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("street", &self.street),
            ("district", &self.district),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(format!("address.{} must not be blank", field));
            }
        }

        if !state_pattern().is_match(&self.state) {
            return Err("address.state must be a two-letter code".to_string());
        }

        if !postal_code_pattern().is_match(&self.postal_code) {
            return Err("address.postal_code must have exactly 8 digits".to_string());
        }

        Ok(())
    }

    /// Applies a partial update; only fields present in `changes` are replaced.
    pub fn merge(&mut self, changes: AddressUpdate) {
        if let Some(street) = changes.street {
            self.street = street;
        }
        if let Some(number) = changes.number {
            self.number = Some(number);
        }
        if let Some(complement) = changes.complement {
            self.complement = Some(complement);
        }
        if let Some(district) = changes.district {
            self.district = district;
        }
        if let Some(city) = changes.city {
            self.city = city;
        }
        if let Some(state) = changes.state {
            self.state = state;
        }
        if let Some(postal_code) = changes.postal_code {
            self.postal_code = postal_code;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}
