//! Parameterized statement construction
//!
//! Pure functions turning an entity name and parameter maps into
//! `(statement text, bound parameters)` tuples for SELECT/INSERT/UPDATE/
//! DELETE. Values are always bound, never interpolated. Entity and column
//! names are trusted schema identifiers inserted literally - they must never
//! come from untrusted input, and neither may the `order_by` literal.

use crate::params::Params;

/// Largest row count a 64-bit engine accepts in a LIMIT clause.
///
/// Used for the offset-without-cap idiom: some backends reject a bare
/// OFFSET, so the builder emits a limit large enough that the engine never
/// truncates instead of omitting the clause.
pub const MAX_ROW_COUNT: i64 = i64::MAX;

/// Build a placeholder expression (without the WHERE keyword).
///
/// Produces `"col1=:col1<separator>col2=:col2..."` in input column order.
/// Used for both WHERE clauses (separator `" AND "`) and SET clauses
/// (separator `", "`).
pub fn build_where_placeholders<'a>(
    columns: impl IntoIterator<Item = &'a str>,
    separator: &str,
) -> String {
    columns
        .into_iter()
        .map(|column| format!("{column}=:{column}"))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Build a SELECT statement.
///
/// `SELECT * FROM <entity>` plus an optional WHERE clause from `where_map`'s
/// keys, an optional `ORDER BY <order_by>` (caller-supplied literal, omitted
/// when empty), and a pagination clause:
///
/// - `limit > 0` -> ` LIMIT <offset>,<limit>`
/// - `limit == 0 && offset > 0` -> ` LIMIT <offset>,<MAX_ROW_COUNT>`
/// - both zero -> no clause
///
/// An empty `where_map` means match everything, not match nothing. The bound
/// map is returned unchanged: column transformation is the caller's job,
/// applied before building.
pub fn build_select_query(
    entity: &str,
    where_map: &Params,
    order_by: &str,
    limit: u64,
    offset: u64,
) -> (String, Params) {
    let where_clause = build_where_placeholders(where_map.keys(), " AND ");

    let limit_clause = if limit > 0 {
        format!(" LIMIT {offset},{limit}")
    } else if offset > 0 {
        format!(" LIMIT {offset},{MAX_ROW_COUNT}")
    } else {
        String::new()
    };

    let mut statement = format!("SELECT * FROM {entity}");
    if !where_clause.is_empty() {
        statement.push_str(" WHERE ");
        statement.push_str(&where_clause);
    }
    if !order_by.is_empty() {
        statement.push_str(" ORDER BY ");
        statement.push_str(order_by);
    }
    statement.push_str(&limit_clause);

    (statement, where_map.clone())
}

/// Build an INSERT statement preserving the map's key order.
///
/// `INSERT INTO <entity> (c1, c2, ...) VALUES (:c1, :c2, ...)`
pub fn build_insert_query(entity: &str, params: &Params) -> (String, Params) {
    let columns = params.keys().collect::<Vec<_>>().join(", ");
    let placeholders = params
        .keys()
        .map(|column| format!(":{column}"))
        .collect::<Vec<_>>()
        .join(", ");
    let statement = format!("INSERT INTO {entity} ({columns}) VALUES ({placeholders})");
    (statement, params.clone())
}

/// Build an UPDATE statement.
///
/// `UPDATE <entity> SET <set-list> WHERE <and-list>`. The bound map is the
/// union of `set_map` and `where_map`; on a key collision the SET-side
/// binding wins (colliding names are a caller error to avoid, since one
/// bound value then serves both clauses).
pub fn build_update_query(entity: &str, where_map: &Params, set_map: &Params) -> (String, Params) {
    let set_clause = build_where_placeholders(set_map.keys(), ", ");
    let where_clause = build_where_placeholders(where_map.keys(), " AND ");

    let mut statement = format!("UPDATE {entity} SET {set_clause}");
    if !where_clause.is_empty() {
        statement.push_str(" WHERE ");
        statement.push_str(&where_clause);
    }

    let mut bound = set_map.clone();
    for (key, value) in where_map.iter() {
        if !bound.contains_key(key) {
            bound.insert(key, value.clone());
        }
    }

    (statement, bound)
}

/// Build a DELETE statement.
///
/// `DELETE FROM <entity> WHERE <and-list>`; an empty where-map yields no
/// WHERE clause at all (delete-all semantics, symmetric with SELECT).
pub fn build_delete_query(entity: &str, where_map: &Params) -> (String, Params) {
    let where_clause = build_where_placeholders(where_map.keys(), " AND ");

    let mut statement = format!("DELETE FROM {entity}");
    if !where_clause.is_empty() {
        statement.push_str(" WHERE ");
        statement.push_str(&where_clause);
    }

    (statement, where_map.clone())
}
