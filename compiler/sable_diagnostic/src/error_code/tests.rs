use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2006.as_str(), "E2006");
}

#[test]
fn test_enum_codes_share_one_kind() {
    for code in [ErrorCode::E2010, ErrorCode::E2011, ErrorCode::E2012] {
        assert_eq!(code.kind(), ErrorKind::EnumDeclarationException);
    }
}

#[test]
fn test_kind_mapping() {
    assert_eq!(ErrorCode::E2001.kind(), ErrorKind::TypeMismatch);
    assert_eq!(ErrorCode::E2005.kind(), ErrorKind::InvalidOperation);
    assert_eq!(ErrorCode::E2006.kind(), ErrorKind::NamespaceCollision);
    assert_eq!(ErrorCode::E2007.kind(), ErrorKind::UnknownAttribute);
    assert_eq!(ErrorCode::E2008.kind(), ErrorKind::InvalidReference);
    assert_eq!(ErrorCode::E1005.kind(), ErrorKind::StructureException);
    assert_eq!(ErrorCode::E2004.kind(), ErrorKind::ArgumentException);
}

#[test]
fn test_syntax_errors() {
    assert!(ErrorCode::E0003.is_syntax_error());
    assert!(ErrorCode::E1002.is_syntax_error());
    assert!(!ErrorCode::E1005.is_syntax_error());
    assert!(!ErrorCode::E2001.is_syntax_error());
}

#[test]
fn test_kind_display() {
    assert_eq!(
        ErrorKind::EnumDeclarationException.to_string(),
        "EnumDeclarationException"
    );
}
