// extractor.rs
use crate::extraction::parser::{parse_structured, ParseError};
use crate::extraction::prompt::{PromptError, PromptTemplate};
use crate::extraction::schema::ExtractionSchema;
use crate::openai::{ChatMessage, ChatModel, OpenAiError};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

const QUERY_TEMPLATE: &str = "\
For the following search query, which a user typed into a real estate property listing \
website and which is delimited by three backticks, extract the information below.

text: ```{query}```

{format_instructions}

Important: for city, suburb and state answer only the place name, without the word \
\"city\", \"suburb\" or \"state\". For street, keep the street type (Road, Street, ...) \
if the query gives it.
";

/// Deterministic sampling; the same query should always map the same way.
const EXTRACTION_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Provider(#[from] OpenAiError),
    #[error("failed to parse model output: {0}")]
    Parse(#[from] ParseError),
    #[error("failed to build prompt: {0}")]
    Prompt(#[from] PromptError),
}

/// Turns a free-text property search into the schema's structured fields.
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct QueryExtractor {
    template: PromptTemplate,
    schema: ExtractionSchema,
    format_instructions: String,
}

impl QueryExtractor {
    pub fn property_search() -> Result<Self, PromptError> {
        Self::new(QUERY_TEMPLATE, ExtractionSchema::property_query())
    }

    pub fn new(template: &str, schema: ExtractionSchema) -> Result<Self, PromptError> {
        Ok(Self {
            template: PromptTemplate::parse(template)?,
            format_instructions: schema.format_instructions(),
            schema,
        })
    }

    pub fn build_messages(&self, query: &str) -> Result<Vec<ChatMessage>, PromptError> {
        let prompt = self.template.render(&[
            ("query", query),
            ("format_instructions", &self.format_instructions),
        ])?;
        Ok(vec![ChatMessage::user(prompt)])
    }

    /// One model call, one parse. A malformed reply is returned as an error.
    pub fn extract(
        &self,
        model: &dyn ChatModel,
        query: &str,
    ) -> Result<Map<String, Value>, ExtractError> {
        let messages = self.build_messages(query)?;
        let reply = model.complete(&messages, EXTRACTION_TEMPERATURE)?;
        debug!(reply = %reply, "model reply");
        Ok(parse_structured(&self.schema, &reply)?)
    }
}
