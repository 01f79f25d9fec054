pub mod interface;
pub mod gemini;
pub mod openai_compatible;
pub mod factory;

pub use interface::*;
pub use factory::ModelFactory;
