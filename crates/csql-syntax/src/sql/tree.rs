//! Typed SQL parse tree produced by the parser backends.
//!
//! Container nodes hold children; leaf nodes hold their *unwrapped* text:
//! comment text without its delimiters, string content without quotes and
//! with doubled quotes collapsed, and so on. The projector re-wraps leaves,
//! so every backend must unwrap in the exact inverse way.

/// Kind of a node in the parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Parenthesised groups
    DdlDetailParens,
    DdlParens,
    FunctionParens,
    InParens,
    ExpressionParens,
    SelectionTargetParens,

    // Containers
    SqlRoot,
    SqlStatement,
    SqlClause,
    BooleanExpression,
    DdlProceduralBlock,
    DdlOtherBlock,
    DdlDeclareBlock,
    CursorDeclaration,
    BeginEndBlock,
    TryBlock,
    CatchBlock,
    CaseStatement,
    CaseInput,
    CaseWhen,
    CaseThen,
    CaseElse,
    IfStatement,
    ElseClause,
    WhileLoop,
    DdlAsBlock,
    BetweenCondition,
    BetweenLowerBound,
    BetweenUpperBound,
    CteWithClause,
    CteAlias,
    CteAsBlock,
    CursorForBlock,
    CursorForOptions,
    TriggerCondition,
    CompoundKeyword,
    BeginTransaction,
    RollbackTransaction,
    SaveTransaction,
    CommitTransaction,
    BatchSeparator,
    SetOperatorClause,
    ContainerOpen,
    ContainerMultiStatement,
    ContainerSingleStatement,
    ContainerGeneralContent,
    ContainerClose,
    SelectionTarget,
    PermissionsBlock,
    PermissionsDetail,
    PermissionsTarget,
    PermissionsRecipient,
    DdlWithClause,
    MergeClause,
    MergeTarget,
    MergeUsing,
    MergeCondition,
    MergeWhen,
    MergeThen,
    MergeAction,
    JoinOnSection,

    // Leaves
    CommentMultiline,
    CommentSingleline,
    CommentSinglelineCStyle,
    String,
    NString,
    QuotedString,
    BracketQuotedName,
    Comma,
    Period,
    Semicolon,
    Asterisk,
    EqualsSign,
    ScopeResolutionOperator,
    AndOperator,
    OrOperator,
    AlphaOperator,
    OtherOperator,
    FunctionKeyword,
    OtherKeyword,
    DataTypeKeyword,
    DdlReturns,
    PseudoName,
    NumberValue,
    MonetaryValue,
    BinaryValue,
    Parameter,
    OtherNode,
    Whitespace,
    Label,
}

impl NodeKind {
    /// Parenthesised group kinds, rendered as `(` children `)`.
    pub fn is_parens(self) -> bool {
        matches!(
            self,
            NodeKind::DdlDetailParens
                | NodeKind::DdlParens
                | NodeKind::FunctionParens
                | NodeKind::InParens
                | NodeKind::ExpressionParens
                | NodeKind::SelectionTargetParens
        )
    }
}

/// A child position inside a node.
///
/// Only elements carry content. Bare text and parse-level comments can appear
/// in container positions but are never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlChild {
    Element(SqlNode),
    Text(String),
    Comment(String),
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlNode {
    pub kind: NodeKind,
    /// Unwrapped text for leaves; empty for containers
    pub text: String,
    pub children: Vec<SqlChild>,
    /// Set on the node where the parser gave up
    pub has_error: bool,
}

impl SqlNode {
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            has_error: false,
        }
    }

    pub fn container(kind: NodeKind, children: Vec<SqlNode>) -> Self {
        Self {
            kind,
            text: String::new(),
            children: children.into_iter().map(SqlChild::Element).collect(),
            has_error: false,
        }
    }

    pub fn push(&mut self, node: SqlNode) {
        self.children.push(SqlChild::Element(node));
    }

    /// Element children, in order.
    pub fn elements(&self) -> impl Iterator<Item = &SqlNode> {
        self.children.iter().filter_map(|child| match child {
            SqlChild::Element(node) => Some(node),
            SqlChild::Text(_) | SqlChild::Comment(_) => None,
        })
    }

    /// Attribute lookup in the parser's vocabulary.
    pub fn attribute(&self, name: &str) -> Option<&'static str> {
        match name {
            "hasError" => Some(if self.has_error { "1" } else { "0" }),
            _ => None,
        }
    }
}

/// Output of a parser backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SqlDocument {
    /// `SqlRoot` node; `None` when nothing could be parsed
    pub root: Option<SqlNode>,
    /// The parser hit something it could not make sense of
    pub error_found: bool,
}

impl SqlDocument {
    pub fn new(root: SqlNode, error_found: bool) -> Self {
        Self {
            root: Some(root),
            error_found,
        }
    }

    /// Attribute lookup on the document root.
    pub fn attribute(&self, name: &str) -> Option<&'static str> {
        match name {
            "errorFound" => Some(if self.error_found { "1" } else { "0" }),
            _ => self.root.as_ref().and_then(|root| root.attribute(name)),
        }
    }
}
