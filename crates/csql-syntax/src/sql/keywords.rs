//! Word lists used to classify T-SQL words. All entries are upper case.

use std::collections::HashSet;
use std::sync::LazyLock;

static KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "ADD", "ALTER", "AS", "ASC", "AUTHORIZATION", "BACKUP", "BEGIN", "BREAK", "BROWSE",
        "BULK", "BY", "CASCADE", "CASE", "CHECK", "CHECKPOINT", "CLOSE", "CLUSTERED", "COLLATE",
        "COLUMN", "COMMIT", "COMPUTE", "CONSTRAINT", "CONTAINS", "CONTINUE", "CREATE", "CROSS",
        "CURSOR", "DATABASE", "DEALLOCATE", "DECLARE", "DEFAULT", "DELETE", "DENY", "DESC",
        "DISTINCT", "DISTRIBUTED", "DROP", "DUMP", "ELSE", "END", "ERRLVL", "ESCAPE", "EXCEPT",
        "EXEC", "EXECUTE", "EXIT", "EXTERNAL", "FETCH", "FILE", "FILLFACTOR", "FOR", "FOREIGN",
        "FROM", "FULL", "FUNCTION", "GOTO", "GRANT", "GROUP", "HAVING", "HOLDLOCK", "IDENTITY",
        "IDENTITY_INSERT", "IDENTITYCOL", "IF", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO",
        "JOIN", "KEY", "KILL", "LEFT", "LIMIT", "MATCHED", "MERGE", "NOCHECK", "NOCOUNT",
        "NONCLUSTERED", "NULL", "OF", "OFF", "OFFSET", "OFFSETS", "ON", "OPEN", "OPTION",
        "ORDER", "OUTER", "OUTPUT", "OVER", "PERCENT", "PIVOT", "PLAN", "PRIMARY", "PRINT",
        "PROC", "PROCEDURE", "PUBLIC", "RAISERROR", "READ", "RECONFIGURE", "REFERENCES",
        "REPLICATION", "RESTORE", "RESTRICT", "RETURN", "REVERT", "REVOKE", "RIGHT", "ROLLBACK",
        "ROWCOUNT", "ROWGUIDCOL", "RULE", "SAVE", "SCHEMA", "SELECT", "SET", "SHUTDOWN",
        "STATISTICS", "TABLE", "TABLESAMPLE", "TARGET", "TEXTSIZE", "THEN", "THROW", "TO",
        "TOP", "TRAN", "TRANSACTION", "TRIGGER", "TRUNCATE", "TRY", "CATCH", "UNION", "UNIQUE",
        "UNPIVOT", "UPDATE", "USE", "USING", "VALUES", "VIEW", "WAITFOR", "WHEN", "WHERE",
        "WHILE", "WITH", "NOLOCK", "ROWS", "ONLY", "NEXT", "FIRST", "APPLY",
        "SOURCE", "RECOMPILE", "GO", "TRUE", "FALSE",
    ]
    .into_iter()
    .collect()
});

static DATA_TYPES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "BIGINT", "BINARY", "BIT", "CHAR", "CHARACTER", "DATE", "DATETIME", "DATETIME2",
        "DATETIMEOFFSET", "DEC", "DECIMAL", "DOUBLE", "FLOAT", "GEOGRAPHY", "GEOMETRY",
        "HIERARCHYID", "IMAGE", "INT", "INTEGER", "MONEY", "NCHAR", "NTEXT", "NUMERIC",
        "NVARCHAR", "PRECISION", "REAL", "SMALLDATETIME", "SMALLINT", "SMALLMONEY",
        "SQL_VARIANT", "SYSNAME", "TEXT", "TIME", "TIMESTAMP", "TINYINT", "UNIQUEIDENTIFIER",
        "VARBINARY", "VARCHAR", "XML",
    ]
    .into_iter()
    .collect()
});

static FUNCTIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "ABS", "AVG", "CAST", "CEILING", "CHARINDEX", "CHECKSUM", "COALESCE", "CONCAT",
        "CONVERT", "COUNT", "COUNT_BIG", "CURRENT_TIMESTAMP", "CURRENT_USER", "DATEADD",
        "DATEDIFF", "DATENAME", "DATEPART", "DAY", "DENSE_RANK", "FLOOR", "FORMAT", "GETDATE",
        "GETUTCDATE", "ISDATE", "ISNULL", "ISNUMERIC", "LAG", "LEAD", "LEN", "LOWER", "LTRIM",
        "MAX", "MIN", "MONTH", "NEWID", "NTILE", "NULLIF", "OBJECT_ID", "RANK", "REPLACE",
        "REPLICATE", "REVERSE", "ROUND", "ROW_NUMBER", "RTRIM", "SCOPE_IDENTITY",
        "SESSION_USER", "SPACE", "STR", "STRING_AGG", "STUFF", "SUBSTRING", "SUM",
        "SYSDATETIME", "SYSTEM_USER", "TRIM", "TRY_CAST", "TRY_CONVERT", "UPPER", "USER_NAME",
        "YEAR", "IIF", "CHOOSE",
    ]
    .into_iter()
    .collect()
});

static ALPHA_OPERATORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["ALL", "ANY", "BETWEEN", "EXISTS", "IN", "IS", "LIKE", "NOT", "SOME"]
        .into_iter()
        .collect()
});

/// Words that start a new clause within a statement.
static CLAUSE_STARTERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "SELECT", "FROM", "WHERE", "GROUP", "HAVING", "ORDER", "INSERT", "VALUES", "UPDATE",
        "SET", "DELETE", "OUTPUT", "OPTION", "USING", "WHEN", "OFFSET", "FETCH",
    ]
    .into_iter()
    .collect()
});

static SET_OPERATORS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["UNION", "EXCEPT", "INTERSECT"].into_iter().collect());

/// Classification of a bare word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordClass {
    And,
    Or,
    AlphaOperator,
    DataType,
    Function,
    Returns,
    Keyword,
    Name,
}

pub(crate) fn classify_word(upper: &str) -> WordClass {
    match upper {
        "AND" => WordClass::And,
        "OR" => WordClass::Or,
        "RETURNS" => WordClass::Returns,
        _ if ALPHA_OPERATORS.contains(upper) => WordClass::AlphaOperator,
        _ if DATA_TYPES.contains(upper) => WordClass::DataType,
        _ if FUNCTIONS.contains(upper) => WordClass::Function,
        _ if KEYWORDS.contains(upper) => WordClass::Keyword,
        _ => WordClass::Name,
    }
}

pub(crate) fn starts_clause(upper: &str) -> bool {
    CLAUSE_STARTERS.contains(upper)
}

pub(crate) fn is_set_operator(upper: &str) -> bool {
    SET_OPERATORS.contains(upper)
}
