pub mod interface;
pub mod prompt;

pub use interface::*;
pub use prompt::build_translation_prompt;
