pub mod interface;
pub mod gemini;
pub mod factory;

pub use interface::{TranslationError, TranslatorInterface};
pub use gemini::GeminiTranslator;
pub use factory::TranslatorFactory;
