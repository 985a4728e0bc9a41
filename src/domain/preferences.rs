use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How flexible the buyer is about timing and criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlexibilityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl FlexibilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlexibilityLevel::Low => "LOW",
            FlexibilityLevel::Medium => "MEDIUM",
            FlexibilityLevel::High => "HIGH",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "LOW" => FlexibilityLevel::Low,
            "HIGH" => FlexibilityLevel::High,
            _ => FlexibilityLevel::Medium,
        }
    }
}

/// Buyer preferences collected through the intake form or edited by the
/// agent afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPreferences {
    #[serde(skip_serializing, default)]
    pub client_id: String,
    #[serde(rename = "propertyType")]
    pub property_types: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub desired_move_date: Option<DateTime<Utc>>,
    pub has_pool: Option<bool>,
    pub pet_friendly: Option<bool>,
    pub school_districts: Option<Vec<String>>,
    pub flexibility_level: FlexibilityLevel,
}

/// Incoming preference payload; every field is optional so partial forms
/// upsert cleanly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceInput {
    #[serde(rename = "propertyType", default)]
    pub property_types: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub desired_move_date: Option<DateTime<Utc>>,
    pub has_pool: Option<bool>,
    pub pet_friendly: Option<bool>,
    pub school_districts: Option<Vec<String>>,
    pub flexibility_level: Option<FlexibilityLevel>,
}

impl PreferenceInput {
    pub fn into_preferences(self, client_id: String) -> ClientPreferences {
        ClientPreferences {
            client_id,
            property_types: self.property_types,
            min_price: self.min_price,
            max_price: self.max_price,
            desired_move_date: self.desired_move_date,
            has_pool: self.has_pool,
            pet_friendly: self.pet_friendly,
            school_districts: self.school_districts,
            flexibility_level: self.flexibility_level.unwrap_or_default(),
        }
    }
}
