//! Flattens a parsed SQL tree back into categorized text.
//!
//! The concatenated output reproduces the parsed text: every leaf is
//! re-wrapped with the delimiters its backend stripped, so offsets computed
//! by summing output lengths line up with the source.

use std::sync::LazyLock;

use regex::Regex;

use crate::category::Category;
use crate::sql::token::push_quoted;
use crate::sql::tree::{NodeKind, SqlDocument, SqlNode};

/// Prepended to whole-document output when the parser reported errors.
pub const ERROR_OUTPUT_PREFIX: &str = "--WARNING! ERRORS ENCOUNTERED DURING SQL PARSING!\n";

/// `@name`, `@@name`, `?` and `?name`.
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@@?[a-zA-Z_][a-zA-Z0-9_]*@?@?|\?(?:[a-zA-Z_][a-zA-Z0-9_]*)?)$")
        .expect("variable pattern should compile")
});

/// Ordered `(category, text)` pieces.
pub type Projection = Vec<(Category, String)>;

/// Projects the document root. Returns nothing for a document without one.
pub fn project(doc: &SqlDocument) -> Projection {
    let mut projector = Projector::default();
    if let Some(root) = &doc.root {
        projector.node(root);
    }
    projector.out
}

/// Projects a single subtree.
pub fn project_node(node: &SqlNode) -> Projection {
    let mut projector = Projector::default();
    projector.node(node);
    projector.out
}

/// Whole-document rendering: like [`project`], but a document flagged as
/// erroneous gets [`ERROR_OUTPUT_PREFIX`] in front instead of being dropped.
pub fn format_document(doc: &SqlDocument) -> Projection {
    let mut out = Vec::new();
    if doc.error_found {
        out.push((Category::Plain, ERROR_OUTPUT_PREFIX.to_string()));
    }
    out.extend(project(doc));
    out
}

/// Concatenates the text of a projection.
pub fn render_projection(pieces: &[(Category, String)]) -> String {
    pieces.iter().map(|(_, text)| text.as_str()).collect()
}

/// Sum of the byte lengths of a projection.
pub fn projection_len(pieces: &[(Category, String)]) -> usize {
    pieces.iter().map(|(_, text)| text.len()).sum()
}

#[derive(Default)]
struct Projector {
    out: Projection,
}

impl Projector {
    fn emit(&mut self, category: Category, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.out.push((category, text));
        }
    }

    fn children(&mut self, node: &SqlNode) {
        for child in node.elements() {
            self.node(child);
        }
    }

    fn quoted(&mut self, category: Category, open: &str, text: &str, terminator: char) {
        let mut wrapped = String::with_capacity(text.len() + open.len() + 1);
        let escaped: String = [terminator, terminator].iter().collect();
        push_quoted(
            &mut wrapped,
            open,
            text,
            terminator,
            &escaped,
            &terminator.to_string(),
        );
        self.emit(category, wrapped);
    }

    fn node(&mut self, node: &SqlNode) {
        let text = node.text.as_str();
        match node.kind {
            NodeKind::DdlDetailParens
            | NodeKind::DdlParens
            | NodeKind::FunctionParens
            | NodeKind::InParens
            | NodeKind::ExpressionParens
            | NodeKind::SelectionTargetParens => {
                self.emit(Category::Plain, "(");
                self.children(node);
                self.emit(Category::Plain, ")");
            }

            NodeKind::SqlRoot
            | NodeKind::SqlStatement
            | NodeKind::SqlClause
            | NodeKind::BooleanExpression
            | NodeKind::DdlProceduralBlock
            | NodeKind::DdlOtherBlock
            | NodeKind::DdlDeclareBlock
            | NodeKind::CursorDeclaration
            | NodeKind::BeginEndBlock
            | NodeKind::TryBlock
            | NodeKind::CatchBlock
            | NodeKind::CaseStatement
            | NodeKind::CaseInput
            | NodeKind::CaseWhen
            | NodeKind::CaseThen
            | NodeKind::CaseElse
            | NodeKind::IfStatement
            | NodeKind::ElseClause
            | NodeKind::WhileLoop
            | NodeKind::DdlAsBlock
            | NodeKind::BetweenCondition
            | NodeKind::BetweenLowerBound
            | NodeKind::BetweenUpperBound
            | NodeKind::CteWithClause
            | NodeKind::CteAlias
            | NodeKind::CteAsBlock
            | NodeKind::CursorForBlock
            | NodeKind::CursorForOptions
            | NodeKind::TriggerCondition
            | NodeKind::CompoundKeyword
            | NodeKind::BeginTransaction
            | NodeKind::RollbackTransaction
            | NodeKind::SaveTransaction
            | NodeKind::CommitTransaction
            | NodeKind::BatchSeparator
            | NodeKind::SetOperatorClause
            | NodeKind::ContainerOpen
            | NodeKind::ContainerMultiStatement
            | NodeKind::ContainerSingleStatement
            | NodeKind::ContainerGeneralContent
            | NodeKind::ContainerClose
            | NodeKind::SelectionTarget
            | NodeKind::PermissionsBlock
            | NodeKind::PermissionsDetail
            | NodeKind::PermissionsTarget
            | NodeKind::PermissionsRecipient
            | NodeKind::DdlWithClause
            | NodeKind::MergeClause
            | NodeKind::MergeTarget
            | NodeKind::MergeUsing
            | NodeKind::MergeCondition
            | NodeKind::MergeWhen
            | NodeKind::MergeThen
            | NodeKind::MergeAction
            | NodeKind::JoinOnSection => self.children(node),

            NodeKind::CommentMultiline => self.emit(Category::Comment, format!("/*{text}*/")),
            NodeKind::CommentSingleline => self.emit(Category::Comment, format!("--{text}")),
            NodeKind::CommentSinglelineCStyle => self.emit(Category::Comment, format!("//{text}")),

            NodeKind::String => self.quoted(Category::String, "'", text, '\''),
            NodeKind::NString => self.quoted(Category::String, "N'", text, '\''),
            NodeKind::QuotedString => self.quoted(Category::Plain, "\"", text, '"'),
            NodeKind::BracketQuotedName => self.quoted(Category::Plain, "[", text, ']'),

            NodeKind::Comma
            | NodeKind::Period
            | NodeKind::Semicolon
            | NodeKind::Asterisk
            | NodeKind::EqualsSign
            | NodeKind::ScopeResolutionOperator
            | NodeKind::AndOperator
            | NodeKind::OrOperator
            | NodeKind::AlphaOperator
            | NodeKind::OtherOperator => self.emit(Category::Operator, text),

            NodeKind::FunctionKeyword => self.emit(Category::Function, text),

            NodeKind::OtherKeyword
            | NodeKind::DataTypeKeyword
            | NodeKind::DdlReturns
            | NodeKind::PseudoName => self.emit(Category::Keyword, text),

            NodeKind::NumberValue | NodeKind::MonetaryValue | NodeKind::BinaryValue => {
                self.emit(Category::Number, text)
            }

            // The text already carries its sigil.
            NodeKind::Parameter => self.emit(Category::Parameter, text),
            NodeKind::OtherNode if VARIABLE.is_match(text) => {
                self.emit(Category::Parameter, text)
            }
            NodeKind::OtherNode => self.emit(Category::Plain, text),

            NodeKind::Whitespace | NodeKind::Label => self.emit(Category::Plain, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{SqlParser, TsqlParser};
    use pretty_assertions::assert_eq;

    fn leaf(kind: NodeKind, text: &str) -> SqlNode {
        SqlNode::leaf(kind, text)
    }

    fn significant(pieces: Projection) -> Vec<(Category, String)> {
        pieces
            .into_iter()
            .filter(|(c, _)| *c != Category::Plain)
            .collect()
    }

    #[test]
    fn test_string_is_requoted() {
        let out = project_node(&leaf(NodeKind::String, "it's"));
        assert_eq!(out, vec![(Category::String, "'it''s'".to_string())]);
    }

    #[test]
    fn test_national_and_quoted_names() {
        assert_eq!(
            render_projection(&project_node(&leaf(NodeKind::NString, "x"))),
            "N'x'"
        );
        assert_eq!(
            render_projection(&project_node(&leaf(NodeKind::BracketQuotedName, "a]b"))),
            "[a]]b]"
        );
        assert_eq!(
            render_projection(&project_node(&leaf(NodeKind::QuotedString, "c\"d"))),
            "\"c\"\"d\""
        );
    }

    #[test]
    fn test_comments_keep_delimiters() {
        let node = SqlNode::container(
            NodeKind::SqlClause,
            vec![
                leaf(NodeKind::CommentMultiline, " a "),
                leaf(NodeKind::CommentSingleline, " b"),
                leaf(NodeKind::CommentSinglelineCStyle, " c"),
            ],
        );
        assert_eq!(
            render_projection(&project_node(&node)),
            "/* a */-- b// c"
        );
    }

    #[test]
    fn test_parens_are_emitted() {
        let node = SqlNode::container(
            NodeKind::FunctionParens,
            vec![leaf(NodeKind::Asterisk, "*")],
        );
        assert_eq!(
            project_node(&node),
            vec![
                (Category::Plain, "(".to_string()),
                (Category::Operator, "*".to_string()),
                (Category::Plain, ")".to_string()),
            ]
        );
    }

    #[test]
    fn test_parameters_keep_their_text() {
        for text in ["@id", "@@ROWCOUNT", "?", "?name"] {
            assert_eq!(
                project_node(&leaf(NodeKind::OtherNode, text)),
                vec![(Category::Parameter, text.to_string())]
            );
        }
        assert_eq!(
            project_node(&leaf(NodeKind::Parameter, "@id")),
            vec![(Category::Parameter, "@id".to_string())]
        );
        assert_eq!(
            project_node(&leaf(NodeKind::OtherNode, "users")),
            vec![(Category::Plain, "users".to_string())]
        );
    }

    #[test]
    fn test_full_statement_categories() {
        let doc = TsqlParser::new().parse("SELECT COUNT(*), 'a' FROM t WHERE id = @id -- x");
        assert_eq!(
            significant(project(&doc)),
            vec![
                (Category::Keyword, "SELECT".to_string()),
                (Category::Function, "COUNT".to_string()),
                (Category::Operator, "*".to_string()),
                (Category::Operator, ",".to_string()),
                (Category::String, "'a'".to_string()),
                (Category::Keyword, "FROM".to_string()),
                (Category::Keyword, "WHERE".to_string()),
                (Category::Operator, "=".to_string()),
                (Category::Parameter, "@id".to_string()),
                (Category::Comment, "-- x".to_string()),
            ]
        );
    }

    #[test]
    fn test_projection_is_length_exact() {
        let sql = "SELECT [a]]b], N'it''s', \"q\" FROM t /* c */ WHERE x IN (1, 2.5, 0xFF, $3)";
        let doc = TsqlParser::new().parse(sql);
        assert!(!doc.error_found);
        let out = project(&doc);
        assert_eq!(projection_len(&out), sql.len());
        assert_eq!(render_projection(&out), sql);
    }

    #[test]
    fn test_format_document_prefixes_errors() {
        let doc = TsqlParser::new().parse("SELECT (1");
        assert!(doc.error_found);
        let out = format_document(&doc);
        assert_eq!(out[0], (Category::Plain, ERROR_OUTPUT_PREFIX.to_string()));
        assert!(render_projection(&out).starts_with(ERROR_OUTPUT_PREFIX));

        let clean = TsqlParser::new().parse("SELECT 1");
        assert_eq!(render_projection(&format_document(&clean)), "SELECT 1");
    }

    #[test]
    fn test_missing_root_projects_nothing() {
        assert!(project(&SqlDocument::default()).is_empty());
    }
}
