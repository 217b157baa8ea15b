//! `Plural-Forms` header parsing and evaluation.
//!
//! gettext describes plural rules with a C expression over the count `n`,
//! for example `nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 &&
//! n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);` for Russian.

use std::fmt::{Display, Formatter, Result as FmtResult};

use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, delimited, opt, preceded, repeat, terminated};
use winnow::prelude::*;

use super::error::PluralFormsError;

/// Counts checked against `nplurals` when a rule is loaded.
const CHECKED_COUNTS: u64 = 1000;

/// Longest accepted expression. Real rules stay under a few hundred bytes.
pub const MAX_EXPRESSION_LEN: usize = 1024;

/// Deepest accepted nesting of parentheses, `?:` and `!`.
pub const MAX_NESTING: usize = 64;

/// A parsed `Plural-Forms` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForms {
    nplurals: usize,
    expr: PluralExpr,
}

impl PluralForms {
    /// Parse a header value such as `nplurals=2; plural=(n != 1);`.
    ///
    /// The expression is checked for every count in `0..=1000`; a rule that
    /// can select a form beyond `nplurals` is rejected.
    ///
    /// ```
    /// use pocat::parser::PluralForms;
    ///
    /// let forms = PluralForms::parse("nplurals=2; plural=(n != 1);").unwrap();
    /// assert_eq!(forms.nplurals(), 2);
    /// assert_eq!(forms.index(1), 0);
    /// assert_eq!(forms.index(5), 1);
    /// ```
    pub fn parse(value: &str) -> Result<PluralForms, PluralFormsError> {
        let mut nplurals = None;
        let mut expression = None;

        for field in value.split(';') {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let (name, body) = field.split_once('=').ok_or_else(|| PluralFormsError::UnknownField {
                name: field.to_string(),
            })?;
            match name.trim() {
                "nplurals" => {
                    let body = body.trim();
                    let count = body
                        .parse::<usize>()
                        .ok()
                        .filter(|count| *count > 0)
                        .ok_or_else(|| PluralFormsError::InvalidNplurals {
                            value: body.to_string(),
                        })?;
                    nplurals = Some(count);
                }
                "plural" => expression = Some(PluralExpr::parse(body)?),
                other => {
                    return Err(PluralFormsError::UnknownField {
                        name: other.to_string(),
                    });
                }
            }
        }

        let nplurals = nplurals.ok_or(PluralFormsError::MissingNplurals)?;
        let expr = expression.ok_or(PluralFormsError::MissingPlural)?;
        let forms = PluralForms { nplurals, expr };
        forms.check_range()?;
        Ok(forms)
    }

    /// Number of plural forms the catalog declares.
    pub fn nplurals(&self) -> usize {
        self.nplurals
    }

    /// The plural selection expression.
    pub fn expr(&self) -> &PluralExpr {
        &self.expr
    }

    /// Plural-form index for a count.
    ///
    /// Catalogs with a single plural form always select index 0.
    pub fn index(&self, n: u64) -> usize {
        if self.nplurals == 1 {
            return 0;
        }
        usize::try_from(self.expr.eval(n)).unwrap_or(usize::MAX)
    }

    fn check_range(&self) -> Result<(), PluralFormsError> {
        if self.nplurals == 1 {
            return Ok(());
        }
        for n in 0..=CHECKED_COUNTS {
            let index = self.expr.eval(n);
            if !usize::try_from(index).is_ok_and(|i| i < self.nplurals) {
                return Err(PluralFormsError::IndexOutOfRange {
                    n,
                    index,
                    nplurals: self.nplurals,
                });
            }
        }
        Ok(())
    }
}

impl Display for PluralForms {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "nplurals={}; plural={};", self.nplurals, self.expr)
    }
}

/// Binary operators allowed in plural expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    fn apply(self, lhs: u64, rhs: u64) -> u64 {
        match self {
            BinaryOp::Mul => lhs.wrapping_mul(rhs),
            BinaryOp::Div => lhs.checked_div(rhs).unwrap_or(0),
            BinaryOp::Rem => lhs.checked_rem(rhs).unwrap_or(0),
            BinaryOp::Add => lhs.wrapping_add(rhs),
            BinaryOp::Sub => lhs.wrapping_sub(rhs),
            BinaryOp::Lt => u64::from(lhs < rhs),
            BinaryOp::Le => u64::from(lhs <= rhs),
            BinaryOp::Gt => u64::from(lhs > rhs),
            BinaryOp::Ge => u64::from(lhs >= rhs),
            BinaryOp::Eq => u64::from(lhs == rhs),
            BinaryOp::Ne => u64::from(lhs != rhs),
            BinaryOp::And => u64::from(lhs != 0 && rhs != 0),
            BinaryOp::Or => u64::from(lhs != 0 || rhs != 0),
        }
    }
}

/// A plural expression AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluralExpr {
    /// The count being formatted.
    N,
    Literal(u64),
    Not(Box<PluralExpr>),
    Binary {
        op: BinaryOp,
        lhs: Box<PluralExpr>,
        rhs: Box<PluralExpr>,
    },
    Ternary {
        condition: Box<PluralExpr>,
        then: Box<PluralExpr>,
        otherwise: Box<PluralExpr>,
    },
}

impl PluralExpr {
    /// Parse a C plural expression.
    ///
    /// ```
    /// use pocat::parser::PluralExpr;
    ///
    /// let expr = PluralExpr::parse("n==1 ? 0 : n==2 ? 1 : 2").unwrap();
    /// assert_eq!(expr.eval(1), 0);
    /// assert_eq!(expr.eval(2), 1);
    /// assert_eq!(expr.eval(7), 2);
    /// ```
    pub fn parse(source: &str) -> Result<PluralExpr, PluralFormsError> {
        check_nesting(source)?;
        terminated(ternary, multispace0)
            .parse(source)
            .map_err(|e| PluralFormsError::InvalidExpression {
                expression: source.trim().to_string(),
                offset: e.offset(),
            })
    }

    /// Evaluate for count `n` with C unsigned semantics.
    ///
    /// Division or remainder by zero yields 0.
    pub fn eval(&self, n: u64) -> u64 {
        match self {
            PluralExpr::N => n,
            PluralExpr::Literal(value) => *value,
            PluralExpr::Not(inner) => u64::from(inner.eval(n) == 0),
            PluralExpr::Binary { op, lhs, rhs } => {
                let left = lhs.eval(n);
                // Short-circuit like C so `n != 0 && 10 / n` style rules hold.
                match op {
                    BinaryOp::And if left == 0 => 0,
                    BinaryOp::Or if left != 0 => 1,
                    _ => op.apply(left, rhs.eval(n)),
                }
            }
            PluralExpr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                if condition.eval(n) != 0 {
                    then.eval(n)
                } else {
                    otherwise.eval(n)
                }
            }
        }
    }

    fn binary(op: BinaryOp, lhs: PluralExpr, rhs: PluralExpr) -> PluralExpr {
        PluralExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl Display for PluralExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PluralExpr::N => write!(f, "n"),
            PluralExpr::Literal(value) => write!(f, "{value}"),
            PluralExpr::Not(inner) => write!(f, "!{inner}"),
            PluralExpr::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            PluralExpr::Ternary {
                condition,
                then,
                otherwise,
            } => write!(f, "({condition} ? {then} : {otherwise})"),
        }
    }
}

/// Reject input that would recurse too deeply in the parser or evaluator.
fn check_nesting(source: &str) -> Result<(), PluralFormsError> {
    if source.len() > MAX_EXPRESSION_LEN {
        return Err(PluralFormsError::TooLong {
            len: source.len(),
            limit: MAX_EXPRESSION_LEN,
        });
    }
    let mut parens = 0_usize;
    let mut chained = 0_usize;
    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        match c {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            '?' => chained += 1,
            '!' if chars.peek().is_none_or(|&(_, next)| next != '=') => chained += 1,
            _ => continue,
        }
        if parens + chained > MAX_NESTING {
            return Err(PluralFormsError::TooDeep {
                offset,
                limit: MAX_NESTING,
            });
        }
    }
    Ok(())
}

/// Parse `or ('?' ternary ':' ternary)?`, right-associative.
fn ternary(input: &mut &str) -> ModalResult<PluralExpr> {
    let condition = or_expr(input)?;
    let branches = opt((
        preceded(multispace0, '?'),
        ternary,
        preceded(multispace0, ':'),
        ternary,
    ))
    .parse_next(input)?;
    Ok(match branches {
        Some((_, then, _, otherwise)) => PluralExpr::Ternary {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        },
        None => condition,
    })
}

/// Fold a left-associative chain of operands.
fn fold_chain(first: PluralExpr, rest: Vec<(BinaryOp, PluralExpr)>) -> PluralExpr {
    rest.into_iter()
        .fold(first, |lhs, (op, rhs)| PluralExpr::binary(op, lhs, rhs))
}

fn or_expr(input: &mut &str) -> ModalResult<PluralExpr> {
    let first = and_expr(input)?;
    let rest: Vec<(BinaryOp, PluralExpr)> = repeat(
        0..,
        (preceded(multispace0, "||".value(BinaryOp::Or)), and_expr),
    )
    .parse_next(input)?;
    Ok(fold_chain(first, rest))
}

fn and_expr(input: &mut &str) -> ModalResult<PluralExpr> {
    let first = equality(input)?;
    let rest: Vec<(BinaryOp, PluralExpr)> = repeat(
        0..,
        (preceded(multispace0, "&&".value(BinaryOp::And)), equality),
    )
    .parse_next(input)?;
    Ok(fold_chain(first, rest))
}

fn equality(input: &mut &str) -> ModalResult<PluralExpr> {
    let first = relational(input)?;
    let rest: Vec<(BinaryOp, PluralExpr)> = repeat(
        0..,
        (
            preceded(
                multispace0,
                alt(("==".value(BinaryOp::Eq), "!=".value(BinaryOp::Ne))),
            ),
            relational,
        ),
    )
    .parse_next(input)?;
    Ok(fold_chain(first, rest))
}

fn relational(input: &mut &str) -> ModalResult<PluralExpr> {
    let first = additive(input)?;
    let rest: Vec<(BinaryOp, PluralExpr)> = repeat(
        0..,
        (
            preceded(
                multispace0,
                alt((
                    "<=".value(BinaryOp::Le),
                    ">=".value(BinaryOp::Ge),
                    "<".value(BinaryOp::Lt),
                    ">".value(BinaryOp::Gt),
                )),
            ),
            additive,
        ),
    )
    .parse_next(input)?;
    Ok(fold_chain(first, rest))
}

fn additive(input: &mut &str) -> ModalResult<PluralExpr> {
    let first = multiplicative(input)?;
    let rest: Vec<(BinaryOp, PluralExpr)> = repeat(
        0..,
        (
            preceded(
                multispace0,
                alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub))),
            ),
            multiplicative,
        ),
    )
    .parse_next(input)?;
    Ok(fold_chain(first, rest))
}

fn multiplicative(input: &mut &str) -> ModalResult<PluralExpr> {
    let first = unary(input)?;
    let rest: Vec<(BinaryOp, PluralExpr)> = repeat(
        0..,
        (
            preceded(
                multispace0,
                alt((
                    '*'.value(BinaryOp::Mul),
                    '/'.value(BinaryOp::Div),
                    '%'.value(BinaryOp::Rem),
                )),
            ),
            unary,
        ),
    )
    .parse_next(input)?;
    Ok(fold_chain(first, rest))
}

fn unary(input: &mut &str) -> ModalResult<PluralExpr> {
    preceded(
        multispace0,
        alt((
            preceded('!', unary).map(|inner| PluralExpr::Not(Box::new(inner))),
            primary,
        )),
    )
    .parse_next(input)
}

fn primary(input: &mut &str) -> ModalResult<PluralExpr> {
    alt((
        'n'.value(PluralExpr::N),
        digit1.try_map(str::parse::<u64>).map(PluralExpr::Literal),
        delimited('(', ternary, preceded(multispace0, ')')),
    ))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUSSIAN: &str = "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);";

    #[test]
    fn russian_rule_selects_three_forms() {
        let forms = PluralForms::parse(RUSSIAN).unwrap();
        assert_eq!(forms.nplurals(), 3);
        assert_eq!(forms.index(1), 0);
        assert_eq!(forms.index(21), 0);
        assert_eq!(forms.index(11), 2);
        assert_eq!(forms.index(3), 1);
        assert_eq!(forms.index(14), 2);
        assert_eq!(forms.index(22), 1);
        assert_eq!(forms.index(5), 2);
    }

    #[test]
    fn precedence_follows_c() {
        let expr = PluralExpr::parse("1 + 2 * 3 == 7 && !0").unwrap();
        assert_eq!(expr.eval(0), 1);
        let expr = PluralExpr::parse("(1 + 2) * 3").unwrap();
        assert_eq!(expr.eval(0), 9);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let expr = PluralExpr::parse("10 / n").unwrap();
        assert_eq!(expr.eval(0), 0);
        assert_eq!(expr.eval(5), 2);
    }

    #[test]
    fn display_reparses_to_same_behavior() {
        let forms = PluralForms::parse(RUSSIAN).unwrap();
        let reparsed = PluralForms::parse(&forms.to_string()).unwrap();
        for n in 0..200 {
            assert_eq!(forms.index(n), reparsed.index(n));
        }
    }

    #[test]
    fn deep_parentheses_are_rejected_before_parsing() {
        let depth = MAX_NESTING + 1;
        let source = format!("{}n{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            PluralExpr::parse(&source),
            Err(PluralFormsError::TooDeep {
                offset: MAX_NESTING,
                limit: MAX_NESTING,
            })
        );

        let source = format!("{}n{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(PluralExpr::parse(&source).unwrap().eval(3), 3);
    }

    #[test]
    fn long_negation_chains_are_rejected() {
        let source = format!("{}n", "!".repeat(MAX_NESTING + 1));
        assert!(matches!(
            PluralExpr::parse(&source),
            Err(PluralFormsError::TooDeep { .. })
        ));
        assert_eq!(PluralExpr::parse("n != 1 && n != 2").unwrap().eval(3), 1);
    }

    #[test]
    fn oversized_expressions_are_rejected() {
        let source = format!("{}n{}", "(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(
            PluralExpr::parse(&source),
            Err(PluralFormsError::TooLong {
                len: 100_001,
                limit: MAX_EXPRESSION_LEN,
            })
        );
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(matches!(
            PluralExpr::parse("n != 1 )"),
            Err(PluralFormsError::InvalidExpression { .. })
        ));
    }
}
