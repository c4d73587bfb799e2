//! # DDL Components
//!
//! Building blocks of a creation script, leaves first:
//!
//! - [`column`]: one field → one column definition
//! - [`constraints`]: unique groups and indexes, plus constraint naming
//! - [`references`]: foreign-key clauses and many-to-many join tables
//! - [`comments`]: per-table comment accumulation
//! - [`table`]: one entity → one [`TableUnit`](table::TableUnit)
//! - [`ordering`]: dependency ordering of table units
//! - [`script`]: final script composition

pub mod column;
pub mod comments;
pub mod constraints;
pub mod ordering;
pub mod references;
pub mod script;
pub mod table;

pub use column::{ColumnDef, render_column};
pub use comments::CommentCollector;
pub use constraints::{build_indexes, build_unique_constraints, fk_name, index_name};
pub use ordering::order_units;
pub use references::{JoinTable, ReferenceClause, synthesize_join_table, synthesize_reference};
pub use script::compose_script;
pub use table::{TableUnit, assemble_table};

use crate::context::GenerationContext;

/// `CREATE TABLE` statement with one body line per column or constraint
pub(crate) fn create_table_statement(
    ctx: &GenerationContext<'_>,
    table_sql: &str,
    lines: &[String],
    comment: &str,
) -> String {
    format!(
        "CREATE TABLE {}{} (\n    {}\n){}{};",
        ctx.if_not_exists(),
        table_sql,
        lines.join(",\n    "),
        ctx.dialect().table_suffix(),
        comment
    )
}
