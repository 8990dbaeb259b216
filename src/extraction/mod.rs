mod extractor;
mod parser;
mod prompt;
mod schema;

pub use extractor::{ExtractError, QueryExtractor};
pub use prompt::PromptError;
