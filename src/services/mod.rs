pub mod content_extractor;
pub mod scorecard_registry;
pub mod template_synthesizer;
pub mod validation;

pub use content_extractor::{contains_media, extract_text, is_content_empty};
pub use template_synthesizer::{is_pristine, second_tab_name, synthesize_template};
pub use validation::{validate, FailureField, ValidationFailure};
