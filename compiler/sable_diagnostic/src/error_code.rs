use std::fmt;

/// The class of failure a diagnostic reports.
///
/// These are the exception kinds users see and tests assert on; several
/// error codes may share one kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    /// Malformed source text (lexer or parser).
    SyntaxException,
    /// Malformed declaration shape or misuse of a construct.
    StructureException,
    /// Empty, duplicate, or over-limit enum members.
    EnumDeclarationException,
    /// A top-level name is declared twice.
    NamespaceCollision,
    /// Access to an attribute or member that does not exist.
    UnknownAttribute,
    /// Incompatible types.
    TypeMismatch,
    /// Operator not defined for its operand types.
    InvalidOperation,
    /// Wrong number of arguments or fields.
    ArgumentException,
    /// A type used where a value is required, or vice versa.
    InvalidReference,
    /// Reference to a name or type that was never declared.
    UndeclaredDefinition,
    /// Internal compiler invariant violated.
    CompilerPanic,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::SyntaxException => "SyntaxException",
            ErrorKind::StructureException => "StructureException",
            ErrorKind::EnumDeclarationException => "EnumDeclarationException",
            ErrorKind::NamespaceCollision => "NamespaceCollision",
            ErrorKind::UnknownAttribute => "UnknownAttribute",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::InvalidOperation => "InvalidOperation",
            ErrorKind::ArgumentException => "ArgumentException",
            ErrorKind::InvalidReference => "InvalidReference",
            ErrorKind::UndeclaredDefinition => "UndeclaredDefinition",
            ErrorKind::CompilerPanic => "CompilerPanic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Declaration and type errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Invalid character in source
    E0001,
    /// Integer literal does not fit in 256 bits
    E0002,
    /// Tab used for indentation
    E0003,
    /// Dedent does not match any enclosing indentation level
    E0004,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Malformed declaration body
    E1005,
    /// Unknown or misplaced decorator
    E1006,

    // Declaration and Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Unknown type
    E2002,
    /// Unknown identifier
    E2003,
    /// Argument or field count mismatch
    E2004,
    /// Operator not supported for operand types
    E2005,
    /// Name already declared
    E2006,
    /// Unknown attribute or enum member
    E2007,
    /// Type used as a value, or value used as a type
    E2008,
    /// Invalid construct (attribute on enum value, conflicting decorators)
    E2009,
    /// Enum has no members
    E2010,
    /// Duplicate enum member
    E2011,
    /// Too many enum members
    E2012,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            // Parser
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            // Type
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            // Internal
            ErrorCode::E9001 => "E9001",
        }
    }

    /// The exception kind this code is reported as.
    pub fn kind(self) -> ErrorKind {
        match self {
            ErrorCode::E0001
            | ErrorCode::E0002
            | ErrorCode::E0003
            | ErrorCode::E0004
            | ErrorCode::E1001
            | ErrorCode::E1002
            | ErrorCode::E1003
            | ErrorCode::E1004 => ErrorKind::SyntaxException,
            ErrorCode::E1005 | ErrorCode::E1006 | ErrorCode::E2009 => {
                ErrorKind::StructureException
            }
            ErrorCode::E2001 => ErrorKind::TypeMismatch,
            ErrorCode::E2002 | ErrorCode::E2003 => ErrorKind::UndeclaredDefinition,
            ErrorCode::E2004 => ErrorKind::ArgumentException,
            ErrorCode::E2005 => ErrorKind::InvalidOperation,
            ErrorCode::E2006 => ErrorKind::NamespaceCollision,
            ErrorCode::E2007 => ErrorKind::UnknownAttribute,
            ErrorCode::E2008 => ErrorKind::InvalidReference,
            ErrorCode::E2010 | ErrorCode::E2011 | ErrorCode::E2012 => {
                ErrorKind::EnumDeclarationException
            }
            ErrorCode::E9001 => ErrorKind::CompilerPanic,
        }
    }

    /// Check if this is a lexer or parser error.
    pub fn is_syntax_error(self) -> bool {
        self.kind() == ErrorKind::SyntaxException
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
