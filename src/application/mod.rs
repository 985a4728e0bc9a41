pub mod use_cases;

pub use use_cases::checklists::ChecklistUseCase;
pub use use_cases::import_clients::BatchImportUseCase;
pub use use_cases::onboarding::OnboardingUseCase;
pub use use_cases::preferences::UpdatePreferencesUseCase;
