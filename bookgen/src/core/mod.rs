//! Book generation core logic

pub mod back_cover;
pub mod progress;
pub mod prompt;
pub mod templates;
pub mod urls;

pub use back_cover::{build_text_blocks, BackCoverTemplate, BackCoverValues, BlockTemplate};
pub use progress::{LoggingProgress, ProgressPlan, ProgressReporter};
pub use prompt::{PromptBuilder, PromptCatalog};
pub use templates::{load_template, load_templates, select_template_for_world};
pub use urls::strip_query;
