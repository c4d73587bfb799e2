//! Script composition.

use crate::context::GenerationContext;
use crate::ddl::table::TableUnit;

/// `CREATE SCHEMA` statement for a namespace
pub fn schema_statement(ctx: &GenerationContext<'_>, namespace: &str) -> String {
    format!("CREATE SCHEMA {}{};", ctx.if_not_exists(), ctx.quote(namespace))
}

/// Join the final script: namespaces in discovery order, then the ordered
/// tables, then join tables in the order their owners were placed.
pub fn compose_script(ctx: &GenerationContext<'_>, ordered: &[TableUnit]) -> String {
    let schemas = ctx
        .namespaces()
        .iter()
        .map(|ns| schema_statement(ctx, ns));
    let tables = ordered.iter().map(|unit| unit.statement.clone());
    let joins = ordered
        .iter()
        .flat_map(|unit| unit.join_tables.iter())
        .map(|join| join.statement.clone());

    schemas.chain(tables).chain(joins).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;
    use crate::ddl::references::JoinTable;
    use pretty_assertions::assert_eq;
    use schemagen_core::TableId;
    use schemagen_ir::ModelGraph;
    use std::collections::BTreeSet;

    #[test]
    fn test_compose_order() {
        let model = ModelGraph::new("Compose");
        let config = GeneratorConfig::default();
        let mut ctx = GenerationContext::new(&model, &config);
        ctx.discover_namespace(Some("league")).unwrap();

        let units = vec![
            TableUnit {
                id: TableId::unqualified("event"),
                statement: "EVENT;".into(),
                dependencies: BTreeSet::new(),
                join_tables: vec![JoinTable {
                    id: TableId::unqualified("event_team"),
                    statement: "EVENT_TEAM;".into(),
                }],
            },
            TableUnit {
                id: TableId::new(Some("league"), "team"),
                statement: "TEAM;".into(),
                dependencies: BTreeSet::new(),
                join_tables: Vec::new(),
            },
        ];

        assert_eq!(
            compose_script(&ctx, &units),
            "CREATE SCHEMA IF NOT EXISTS \"league\";\nEVENT;\nTEAM;\nEVENT_TEAM;"
        );
    }

    #[test]
    fn test_empty_script() {
        let model = ModelGraph::new("Empty");
        let config = GeneratorConfig::new().unsafe_create();
        let ctx = GenerationContext::new(&model, &config);
        assert_eq!(compose_script(&ctx, &[]), "");
        assert_eq!(schema_statement(&ctx, "archive"), "CREATE SCHEMA \"archive\";");
    }
}
