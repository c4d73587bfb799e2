//! End-to-end tests for the `schemagen` binary

use assert_cmd::Command;
use predicates::prelude::*;
use schemagen_ir::{DataType, Entity, Field, ModelGraph, Relationship, save_model};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn tournament_model() -> ModelGraph {
    ModelGraph::new("tournaments")
        .with_entity(
            Entity::new("Tournament")
                .in_namespace("test_schema")
                .with_description("What Tournaments we have")
                .with_field(Field::new("name", DataType::Varchar(255))),
        )
        .with_entity(
            Entity::new("Event")
                .with_field(Field::new("name", DataType::Text))
                .with_relationship(Relationship::foreign_key("tournament", "Tournament"))
                .with_relationship(Relationship::many_to_many("participants", "Team")),
        )
        .with_entity(Entity::new("Team").with_field(Field::new("name", DataType::String)))
}

fn write_model(dir: &TempDir, model: &ModelGraph) -> PathBuf {
    let path = dir.path().join("model.json");
    save_model(model, &path).unwrap();
    path
}

fn schemagen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("schemagen").unwrap();
    cmd.current_dir(dir).env_remove("SCHEMAGEN_CONFIG").env("RUST_LOG", "off");
    cmd
}

#[test]
fn generate_prints_script() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, &tournament_model());

    schemagen(dir.path())
        .arg("generate")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "CREATE SCHEMA IF NOT EXISTS \"test_schema\";\nCREATE TABLE IF NOT EXISTS \"test_schema\".\"tournament\" (",
        ))
        .stdout(predicate::str::contains(
            "COMMENT ON TABLE \"test_schema\".\"tournament\" IS 'What Tournaments we have';",
        ))
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS \"event_team\" ("));
}

#[test]
fn generate_with_database_and_no_safe() {
    let dir = TempDir::new().unwrap();
    let model = ModelGraph::new("plain")
        .with_entity(Entity::new("Team").with_field(Field::new("name", DataType::String)));
    let path = write_model(&dir, &model);

    schemagen(dir.path())
        .args(["generate", "--database", "sqlite", "--no-safe"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("CREATE TABLE \"team\" ("))
        .stdout(predicate::str::contains("INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL"));
}

#[test]
fn generate_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let model = ModelGraph::new("plain").with_entity(Entity::new("Team"));
    let path = write_model(&dir, &model);
    std::fs::write(dir.path().join("schemagen.toml"), "database = \"mysql\"\n").unwrap();

    schemagen(dir.path())
        .arg("generate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS `team` ("));
}

#[test]
fn generate_writes_dated_file() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, &tournament_model());
    let out = dir.path().join("sql");

    schemagen(dir.path())
        .arg("generate")
        .arg(&model)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let files: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("000001_create_schema.sql"));

    let sql = std::fs::read_to_string(out.join(&files[0])).unwrap();
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS \"event\" ("));
}

#[test]
fn generate_reports_cycles() {
    let dir = TempDir::new().unwrap();
    let model = ModelGraph::new("cycle")
        .with_entity(Entity::new("A").with_relationship(Relationship::foreign_key("b", "B")))
        .with_entity(Entity::new("B").with_relationship(Relationship::foreign_key("a", "A")));
    let path = write_model(&dir, &model);

    schemagen(dir.path())
        .arg("generate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cyclic fk references"));
}

#[test]
fn validate_accepts_good_model() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, &tournament_model());

    schemagen(dir.path())
        .arg("validate")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("Model is valid"));
}

#[test]
fn validate_rejects_orphan_relationship() {
    let dir = TempDir::new().unwrap();
    let model = ModelGraph::new("broken").with_entity(
        Entity::new("Event").with_relationship(Relationship::foreign_key("ghost", "Ghost")),
    );
    let path = write_model(&dir, &model);

    schemagen(dir.path())
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Ghost"))
        .stderr(predicate::str::contains("error(s)"));
}

#[test]
fn info_lists_entities() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, &tournament_model());

    schemagen(dir.path())
        .arg("info")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("tournaments"))
        .stdout(predicate::str::contains("test_schema.tournament"))
        .stdout(predicate::str::contains("participants"));
}

#[test]
fn missing_model_file_fails() {
    let dir = TempDir::new().unwrap();

    schemagen(dir.path())
        .args(["generate", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load model"));
}
