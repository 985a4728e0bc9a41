// ============================================================
// IMPORT TYPES
// ============================================================
// Value types for the bulk client import pipeline

use serde::{Deserialize, Serialize};

/// Hard cap on candidates per batch submission.
pub const MAX_BATCH_SIZE: usize = 200;

/// Tokenized rows of trimmed cells, before any semantic interpretation.
pub type RawGrid = Vec<Vec<String>>;

/// The semantic fields a source column can be mapped onto, in positional
/// fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportField {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
}

impl ImportField {
    pub const ALL: [ImportField; 4] = [
        ImportField::FirstName,
        ImportField::LastName,
        ImportField::Email,
        ImportField::PhoneNumber,
    ];
}

/// Assignment of semantic fields to source column positions. `None` means
/// the field is unmapped and resolves to an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub email: Option<usize>,
    pub phone_number: Option<usize>,
}

impl ColumnMapping {
    pub fn get(&self, field: ImportField) -> Option<usize> {
        match field {
            ImportField::FirstName => self.first_name,
            ImportField::LastName => self.last_name,
            ImportField::Email => self.email,
            ImportField::PhoneNumber => self.phone_number,
        }
    }

    pub fn set(&mut self, field: ImportField, index: usize) {
        match field {
            ImportField::FirstName => self.first_name = Some(index),
            ImportField::LastName => self.last_name = Some(index),
            ImportField::Email => self.email = Some(index),
            ImportField::PhoneNumber => self.phone_number = Some(index),
        }
    }

    /// Whether any field already claims the given column.
    pub fn claims(&self, index: usize) -> bool {
        ImportField::ALL
            .iter()
            .any(|field| self.get(*field) == Some(index))
    }
}

/// One normalized row, pending persistence. Only `first_name` is required
/// for admission into a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

/// A created client with its shareable onboarding URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedClient {
    pub name: String,
    pub url: String,
}

/// A record that was not created, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub name: String,
    pub reason: String,
}

/// Tri-partitioned result of one batch submission. Never mutated after the
/// batch finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success: Vec<ImportedClient>,
    pub skipped: Vec<RejectedRecord>,
    pub failed: Vec<RejectedRecord>,
}

/// The outcome plus its counts, as returned to the import screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: ImportOutcome,
}

impl From<ImportOutcome> for ImportReport {
    fn from(results: ImportOutcome) -> Self {
        Self {
            imported: results.success.len(),
            skipped: results.skipped.len(),
            failed: results.failed.len(),
            results,
        }
    }
}
