//! Fixed instruction and response schema sent with every extraction.

use serde_json::{Value, json};

/// Instruction asking for header text, the item/rate list and footer text.
pub const EXTRACTION_PROMPT: &str = r#"From the image of handwritten text, extract three distinct types of information based on their position relative to the main list.
1.  **Header Text**: Any text written *above* the main item-rate list.
2.  **Item List**: A list of items and their corresponding rates (in Indian Rupees, ₹).
3.  **Footer Text**: Any text written *below* the main item-rate list.

CRITICAL: For both "headerText" and "footerText", you MUST preserve the original line breaks from the handwriting. Use the newline character '\n' to separate distinct lines.

Structure the output as a single JSON object with three keys:
- "headerText": A single string containing all text found above the list. If none, this must be an empty string.
- "items": An array of objects, where each object has an "item" key (string) and a "rate" key (string, without currency symbols). If no item-rate list is found, this must be an empty array.
- "footerText": A single string containing all text found below the list. If none, this must be an empty string.

For example, if the note has "Crown Rates" at the top, a list of items, and "Min Qty 10" at the bottom, the output should be:
{"headerText": "Crown Rates", "items": [{"item": "...", "rate": "..."}], "footerText": "Min Qty 10\nFolder only Rate"}.
Return only the raw JSON object."#;

/// Strict JSON schema for the response, in the service's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "headerText": {
                "type": "STRING",
                "description": "Any text found above the item-rate list. Line breaks must be preserved with '\\n'."
            },
            "items": {
                "type": "ARRAY",
                "description": "An array of items and their rates.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": {
                            "type": "STRING",
                            "description": "The name of the item or service."
                        },
                        "rate": {
                            "type": "STRING",
                            "description": "The price of the item or service in INR, without symbols."
                        }
                    },
                    "required": ["item", "rate"]
                }
            },
            "footerText": {
                "type": "STRING",
                "description": "Any text found below the item-rate list. Line breaks must be preserved with '\\n'."
            }
        },
        "required": ["headerText", "items", "footerText"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["headerText", "items", "footerText"]));
        assert_eq!(schema["properties"]["items"]["items"]["required"], json!(["item", "rate"]));
    }

    #[test]
    fn test_prompt_asks_for_escaped_newlines() {
        assert!(EXTRACTION_PROMPT.contains(r"'\n'"));
        assert!(EXTRACTION_PROMPT.contains("without currency symbols"));
    }
}
