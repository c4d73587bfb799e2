//! Dependency ordering of table units.
//!
//! Greedy topological sort: repeatedly place the first pending unit, in
//! declaration order, whose dependencies are already placed (a unit may
//! depend on itself). Ties therefore always resolve by declaration order and
//! the result is stable across runs.

use schemagen_core::{EngineError, EngineResult, TableId};
use std::collections::HashSet;

use crate::ddl::table::TableUnit;

/// Order units so every table follows the tables it references.
///
/// Fails with [`EngineError::CyclicDependency`] naming the units that could
/// not be placed, in declaration order.
pub fn order_units(units: Vec<TableUnit>) -> EngineResult<Vec<TableUnit>> {
    let mut pending = units;
    let mut placed: HashSet<TableId> = HashSet::with_capacity(pending.len());
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let next = pending.iter().position(|unit| {
            unit.dependencies
                .iter()
                .all(|dep| dep == &unit.id || placed.contains(dep))
        });

        let Some(index) = next else {
            return Err(EngineError::CyclicDependency {
                tables: pending.iter().map(|unit| unit.id.to_string()).collect(),
            });
        };

        let unit = pending.remove(index);
        placed.insert(unit.id.clone());
        ordered.push(unit);
    }

    Ok(ordered)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn unit(table: &str, deps: &[&str]) -> TableUnit {
        TableUnit {
            id: TableId::unqualified(table),
            statement: format!("CREATE TABLE \"{}\" ();", table),
            dependencies: deps.iter().map(|d| TableId::unqualified(*d)).collect::<BTreeSet<_>>(),
            join_tables: Vec::new(),
        }
    }

    fn names(units: &[TableUnit]) -> Vec<&str> {
        units.iter().map(|u| u.id.table.as_str()).collect()
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        let ordered = order_units(vec![
            unit("event", &["tournament", "reporter"]),
            unit("tournament", &[]),
            unit("reporter", &[]),
            unit("team", &[]),
        ])
        .unwrap();

        assert_eq!(names(&ordered), vec!["tournament", "reporter", "event", "team"]);
    }

    #[test]
    fn test_self_reference_does_not_block() {
        let ordered = order_units(vec![unit("category", &["category"])]).unwrap();
        assert_eq!(names(&ordered), vec!["category"]);
    }

    #[test]
    fn test_chain_is_resolved() {
        let ordered = order_units(vec![
            unit("c", &["b"]),
            unit("b", &["a"]),
            unit("a", &[]),
        ])
        .unwrap();
        assert_eq!(names(&ordered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_lists_stuck_tables() {
        let err = order_units(vec![
            unit("root", &[]),
            unit("a", &["b"]),
            unit("b", &["a"]),
        ])
        .unwrap_err();

        assert!(err.is_cyclic());
        match err {
            EngineError::CyclicDependency { tables } => assert_eq!(tables, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_namespaced_tables_are_distinct() {
        let mut league_team = unit("team", &[]);
        league_team.id = TableId::new(Some("league"), "team");
        let mut event = unit("event", &[]);
        event.dependencies.insert(TableId::new(Some("league"), "team"));

        let ordered = order_units(vec![event, unit("team", &[]), league_team]).unwrap();
        assert_eq!(
            ordered.iter().map(|u| u.id.to_string()).collect::<Vec<_>>(),
            vec!["team", "league.team", "event"]
        );
    }
}
