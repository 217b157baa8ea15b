//! Integration tests for `Plural-Forms` rules and CLDR plural data.

use pocat::parser::{BinaryOp, PluralExpr, PluralForms};
use pocat::{PluralFormsError, cldr_plural_count, plural_category};

// =========================================================================
// Common gettext rules
// =========================================================================

#[test]
fn single_form_languages() {
    let forms = PluralForms::parse("nplurals=1; plural=0;").unwrap();
    assert_eq!(forms.nplurals(), 1);
    for n in [0, 1, 2, 21, 1_000_000] {
        assert_eq!(forms.index(n), 0);
    }
}

#[test]
fn single_form_ignores_expression() {
    let forms = PluralForms::parse("nplurals=1; plural=n;").unwrap();
    assert_eq!(forms.index(7), 0);
}

#[test]
fn germanic_rule() {
    let forms = PluralForms::parse("nplurals=2; plural=(n != 1);").unwrap();
    assert_eq!(forms.index(0), 1);
    assert_eq!(forms.index(1), 0);
    assert_eq!(forms.index(2), 1);
}

#[test]
fn french_rule() {
    let forms = PluralForms::parse("nplurals=2; plural=(n > 1);").unwrap();
    assert_eq!(forms.index(0), 0);
    assert_eq!(forms.index(1), 0);
    assert_eq!(forms.index(2), 1);
}

#[test]
fn polish_rule() {
    let forms = PluralForms::parse(
        "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
    )
    .unwrap();
    let indices: Vec<usize> = [1, 2, 5, 12, 22, 25].into_iter().map(|n| forms.index(n)).collect();
    assert_eq!(indices, vec![0, 1, 2, 2, 1, 2]);
}

#[test]
fn arabic_rule_uses_six_forms() {
    let forms = PluralForms::parse(
        "nplurals=6; plural=(n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5);",
    )
    .unwrap();
    let indices: Vec<usize> = [0, 1, 2, 3, 11, 100].into_iter().map(|n| forms.index(n)).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn whitespace_and_missing_trailing_semicolon() {
    let forms = PluralForms::parse("  nplurals = 2 ;plural= n!=1").unwrap();
    assert_eq!(forms.nplurals(), 2);
    assert_eq!(forms.index(3), 1);
}

#[test]
fn display_is_canonical() {
    let forms = PluralForms::parse("nplurals=2; plural=n != 1;").unwrap();
    let reparsed = PluralForms::parse(&forms.to_string()).unwrap();
    assert_eq!(reparsed, forms);
}

// =========================================================================
// Expressions
// =========================================================================

#[test]
fn expression_tree_shape() {
    let expr = PluralExpr::parse("n % 10 == 1").unwrap();
    assert_eq!(
        expr,
        PluralExpr::Binary {
            op: BinaryOp::Eq,
            lhs: Box::new(PluralExpr::Binary {
                op: BinaryOp::Rem,
                lhs: Box::new(PluralExpr::N),
                rhs: Box::new(PluralExpr::Literal(10)),
            }),
            rhs: Box::new(PluralExpr::Literal(1)),
        }
    );
}

#[test]
fn logical_not() {
    let expr = PluralExpr::parse("!(n == 1)").unwrap();
    assert_eq!(expr.eval(1), 0);
    assert_eq!(expr.eval(2), 1);
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn missing_fields() {
    assert_eq!(
        PluralForms::parse("plural=0;").unwrap_err(),
        PluralFormsError::MissingNplurals
    );
    assert_eq!(
        PluralForms::parse("nplurals=2;").unwrap_err(),
        PluralFormsError::MissingPlural
    );
}

#[test]
fn invalid_nplurals() {
    for value in ["nplurals=0; plural=0;", "nplurals=two; plural=0;"] {
        assert!(matches!(
            PluralForms::parse(value).unwrap_err(),
            PluralFormsError::InvalidNplurals { .. }
        ));
    }
}

#[test]
fn unknown_field() {
    assert_eq!(
        PluralForms::parse("nplurals=2; plural=n!=1; extra=1;").unwrap_err(),
        PluralFormsError::UnknownField {
            name: "extra".to_string()
        }
    );
}

#[test]
fn index_beyond_nplurals_is_rejected() {
    let err = PluralForms::parse("nplurals=2; plural=n;").unwrap_err();
    assert_eq!(
        err,
        PluralFormsError::IndexOutOfRange {
            n: 2,
            index: 2,
            nplurals: 2
        }
    );
}

#[test]
fn malformed_expression() {
    assert!(matches!(
        PluralExpr::parse("n ==").unwrap_err(),
        PluralFormsError::InvalidExpression { .. }
    ));
    assert!(matches!(
        PluralExpr::parse("(n != 1").unwrap_err(),
        PluralFormsError::InvalidExpression { .. }
    ));
}

// =========================================================================
// CLDR data
// =========================================================================

#[test]
fn cldr_categories() {
    assert_eq!(plural_category("en", 1), Some("one"));
    assert_eq!(plural_category("en", 2), Some("other"));
    assert_eq!(plural_category("ru", 5), Some("many"));
    assert_eq!(plural_category("ar", 0), Some("zero"));
    assert_eq!(plural_category("pt_BR.UTF-8", 1), Some("one"));
}

#[test]
fn cldr_counts_match_common_gettext_rules() {
    assert_eq!(cldr_plural_count("ja_JP"), Some(1));
    assert_eq!(cldr_plural_count("de"), Some(2));
    assert_eq!(cldr_plural_count("pl"), Some(3));
    assert_eq!(cldr_plural_count("ar"), Some(6));
}

#[test]
fn unparseable_language_has_no_rules() {
    assert_eq!(cldr_plural_count("not a language"), None);
}
