//! Prompt text and the fixed fallback messages.

use serde_json::Value;

pub const DOCUMENTATION_DISABLED: &str =
    "AI documentation generation is disabled. Please configure OPENAI_API_KEY in .env file.";
pub const EXPLANATION_DISABLED: &str =
    "AI error explanation is disabled. Please configure OPENAI_API_KEY in .env file.";
pub const DOCUMENTATION_FAILED: &str = "Failed to generate documentation. Please try again later.";
pub const EXPLANATION_FAILED: &str =
    "Failed to generate error explanation. Please try again later.";

pub fn documentation(method: &str, url: &str, status: u16, data: &Value) -> String {
    format!(
        "Generate a concise API documentation for:\n\
         Method: {method}\n\
         URL: {url}\n\
         Status: {status}\n\
         Response: {data}\n\n\
         Format the documentation in markdown."
    )
}

pub fn explanation(status: u16, data: &Value) -> String {
    format!(
        "Explain this API error in simple terms and suggest how to fix it:\n\
         Status Code: {status}\n\
         Error: {data}"
    )
}
