//! Case-insensitive substring search over names.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};
use serde::Serialize;

/// One name-search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl From<Vec<SearchHit>> for SearchResults {
    fn from(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// `%term%` with `\`, `%` and `_` escaped so they match literally.
///
/// Case is left alone: both sides are folded by the database's `LOWER`, so
/// the column and the term always go through the same folding rules.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// `LOWER(column) LIKE LOWER('%term%') ESCAPE '\'`
pub fn name_contains<T: IntoColumnRef>(column: T, term: &str) -> SimpleExpr {
    Expr::cust_with_exprs(
        "LOWER($1) LIKE LOWER($2) ESCAPE '\\'",
        [Expr::col(column).into(), Expr::val(like_pattern(term)).into()],
    )
}

/// `LOWER(column) = LOWER(name)`, used for the duplicate-name check.
pub fn name_equals<T: IntoColumnRef>(column: T, name: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(Func::lower(Expr::val(name.trim())))
}
