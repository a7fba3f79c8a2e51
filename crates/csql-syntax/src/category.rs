use std::fmt;
use std::ops::Range;

/// Highlighting category assigned to a piece of SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Keyword,
    Operator,
    String,
    Function,
    Number,
    Parameter,
    Comment,
    /// Text that carries no highlight (whitespace, identifiers, labels)
    Plain,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Keyword,
        Category::Operator,
        Category::String,
        Category::Function,
        Category::Number,
        Category::Parameter,
        Category::Comment,
        Category::Plain,
    ];

    /// Fixed lower-case label, as handed to the rendering layer.
    pub fn label(self) -> &'static str {
        match self {
            Category::Keyword => "keyword",
            Category::Operator => "operator",
            Category::String => "string",
            Category::Function => "function",
            Category::Number => "number",
            Category::Parameter => "parameter",
            Category::Comment => "comment",
            Category::Plain => "plain",
        }
    }

    /// Theme capture name used to look up a style for this category.
    pub fn capture_name(self) -> &'static str {
        match self {
            Category::Parameter => "variable.parameter",
            Category::Plain => "text",
            other => other.label(),
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A categorized absolute range in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationSpan {
    pub range: Range<usize>,
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("KEYWORD"), Some(Category::Keyword));
        assert_eq!(Category::from_label("sql-keyword"), None);
    }

    #[test]
    fn test_capture_names() {
        assert_eq!(Category::Parameter.capture_name(), "variable.parameter");
        assert_eq!(Category::Keyword.capture_name(), "keyword");
    }
}
