pub mod checklists;
pub mod import_clients;
pub mod onboarding;
pub mod preferences;
