//! Structured content extracted from a handwritten note.

use serde::{Deserialize, Serialize};

/// Currency symbol prepended to rates in plain-text output.
pub const CURRENCY_SYMBOL: &str = "₹";

/// One row of the item/rate list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Name of the item or service.
    pub item: String,
    /// Rate without any currency symbol.
    pub rate: String,
}

impl Item {
    pub fn new(item: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            rate: rate.into(),
        }
    }
}

/// Header text, item/rate list and footer text recognised on a note.
///
/// Header and footer keep the line breaks of the handwriting as `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionResult {
    /// Text written above the list.
    pub header_text: String,
    /// The item/rate list in note order.
    pub items: Vec<Item>,
    /// Text written below the list.
    pub footer_text: String,
}

impl ExtractionResult {
    /// Check whether there is anything to render, copy or export.
    pub fn has_content(&self) -> bool {
        !self.items.is_empty() || !self.header_text.is_empty() || !self.footer_text.is_empty()
    }

    /// Header and footer split into display lines.
    pub fn header_lines(&self) -> Vec<&str> {
        self.header_text.split('\n').collect()
    }

    pub fn footer_lines(&self) -> Vec<&str> {
        self.footer_text.split('\n').collect()
    }

    /// Plain-text form used by "copy as text".
    ///
    /// Segments are separated by exactly one blank line and the whole text is
    /// trimmed. Returns `None` when nothing but whitespace would be copied.
    pub fn to_copy_text(&self) -> Option<String> {
        let rows = self
            .items
            .iter()
            .map(|i| format!("{}\t{}{}", i.item, CURRENCY_SYMBOL, i.rate))
            .collect::<Vec<_>>()
            .join("\n");

        // Rows keep their leading tab when an item name is blank
        let parts: Vec<&str> = [self.header_text.trim(), rows.as_str(), self.footer_text.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();

        let text = parts.join("\n\n");
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn crown_rates() -> ExtractionResult {
        ExtractionResult {
            header_text: "Crown Rates".to_string(),
            items: vec![Item::new("Pen", "10")],
            footer_text: "Min Qty 10\nFolder only Rate".to_string(),
        }
    }

    #[test]
    fn test_copy_text_scenario() {
        assert_eq!(
            crown_rates().to_copy_text().as_deref(),
            Some("Crown Rates\n\nPen\t₹10\n\nMin Qty 10\nFolder only Rate")
        );
    }

    #[test]
    fn test_copy_text_skips_empty_segments() {
        let result = ExtractionResult {
            header_text: String::new(),
            items: vec![Item::new("Pen", "10"), Item::new("Folder", "25")],
            footer_text: "Thanks".to_string(),
        };
        assert_eq!(
            result.to_copy_text().as_deref(),
            Some("Pen\t₹10\nFolder\t₹25\n\nThanks")
        );

        let header_only = ExtractionResult {
            header_text: "  Only header\n".to_string(),
            ..Default::default()
        };
        assert_eq!(header_only.to_copy_text().as_deref(), Some("Only header"));
    }

    #[test]
    fn test_copy_text_single_blank_line_between_padded_segments() {
        let result = ExtractionResult {
            header_text: "Header\n\n".to_string(),
            items: vec![],
            footer_text: "\nFooter".to_string(),
        };
        let text = result.to_copy_text().unwrap();
        assert_eq!(text, "Header\n\nFooter");
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn test_copy_text_keeps_tab_of_unnamed_first_row() {
        let result = ExtractionResult {
            header_text: "H".to_string(),
            items: vec![Item::new("", "10"), Item::new("Pen", "5")],
            footer_text: String::new(),
        };
        assert_eq!(result.to_copy_text().as_deref(), Some("H\n\n\t₹10\nPen\t₹5"));
    }

    #[test]
    fn test_empty_result_has_no_content() {
        let empty = ExtractionResult::default();
        assert!(!empty.has_content());
        assert_eq!(empty.to_copy_text(), None);
    }

    #[test]
    fn test_whitespace_only_copies_nothing() {
        let blank = ExtractionResult {
            header_text: "   ".to_string(),
            items: vec![],
            footer_text: "\n".to_string(),
        };
        assert!(blank.has_content());
        assert_eq!(blank.to_copy_text(), None);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_value(crown_rates()).unwrap();
        assert_eq!(json["headerText"], "Crown Rates");
        assert_eq!(json["items"][0]["rate"], "10");
        assert_eq!(json["footerText"], "Min Qty 10\nFolder only Rate");
    }

    #[test]
    fn test_footer_lines() {
        assert_eq!(crown_rates().footer_lines(), vec!["Min Qty 10", "Folder only Rate"]);
    }
}
