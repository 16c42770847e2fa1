//! File-level tests for the config object model.

use crate::config::{Config, FileType, Value};
use crate::error::ConfigError;
use crate::test_support::{fixture, read, scratch_with};
use std::fs;
use tempfile::TempDir;

const SALAD: &str = "&salad
    base = 'kale'
    fruit = 'banana'
    vegetable = 'tomato'
    how_many = 12
    dressing = 'balsamic'
/
";

const SALAD_WITH_EXTRAS: &str = "&salad
    base = 'kale'
    fruit = 'banana'
    vegetable = 'tomato'
    how_many = 12
    dressing = 'balsamic'
    toppings = ,
    extras = 0
    dessert = .false.
    appetizer = ,
/
";

#[test]
fn test_namelist_dump_without_overlay_is_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out.nml");

    Config::f90(fixture("simple.nml"))
        .unwrap()
        .dump_file(&out)
        .unwrap();

    assert_eq!(read(&out), SALAD);
}

#[test]
fn test_namelist_overlay_onto_base_with_unset_slots() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out.nml");

    let update = Config::f90(fixture("simple.nml")).unwrap();
    let mut base = Config::f90(fixture("simple3.nml")).unwrap();
    base.update_values(&update);
    base.dereference_all().unwrap();
    base.dump_file(&out).unwrap();

    assert_eq!(read(&out), SALAD_WITH_EXTRAS);
}

#[test]
fn test_load_detects_type_from_extension() {
    let config = Config::load(&fixture("fruit_config.yaml"), None).unwrap();
    assert_eq!(config.file_type(), FileType::Yaml);

    let config = Config::load(&fixture("simple.ini"), None).unwrap();
    assert_eq!(config.file_type(), FileType::Ini);
    assert_eq!(config.tree()["fruit"], Value::from("banana"));
}

#[test]
fn test_load_missing_file_is_user_error() {
    let err = Config::load(&fixture("does_not_exist.yaml"), None).unwrap_err();
    assert!(matches!(err, ConfigError::UserError(_)));
    assert!(err.to_string().contains("does_not_exist.yaml"));
}

#[test]
fn test_round_trip_is_byte_identical() {
    let temp_dir = scratch_with(&["simple.nml", "simple.ini", "fruit_config.yaml"]);

    for name in ["simple.nml", "simple.ini", "fruit_config.yaml"] {
        let src = temp_dir.path().join(name);
        let out = temp_dir.path().join(format!("rt_{}", name));
        Config::load(&src, None).unwrap().dump_file(&out).unwrap();
        assert_eq!(read(&out), read(&src), "round trip changed {}", name);
    }
}

#[test]
fn test_yaml_overlay_merges_nested_keys() {
    let mut config = Config::yaml(fixture("fruit_config.yaml")).unwrap();
    config.update_values(&Config::yaml(fixture("fruit_config_similar.yaml")).unwrap());

    let salad = config.tree()["salad"].as_map().unwrap();
    assert_eq!(salad["base"], Value::from("kale"));
    assert_eq!(salad["fruit"], Value::from("papaya"));
    assert_eq!(salad["how_many"], Value::Integer(17));
    assert_eq!(
        salad["toppings"],
        Value::List(vec!["croutons".into(), "feta".into()])
    );
}

#[test]
fn test_convert_yaml_to_namelist() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("converted.nml");

    Config::yaml(fixture("fruit_config.yaml"))
        .unwrap()
        .dump_file_as(&out, FileType::F90)
        .unwrap();

    assert_eq!(read(&out), SALAD);
}

#[test]
fn test_failed_render_leaves_existing_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out.ini");
    fs::write(&out, "keep=me\n").unwrap();

    // Lists cannot be written as INI.
    let mut config = Config::yaml(fixture("fruit_config.yaml")).unwrap();
    config.update_values(&Config::yaml(fixture("fruit_config_similar.yaml")).unwrap());
    let err = config.dump_file_as(&out, FileType::Ini).unwrap_err();

    assert!(matches!(err, ConfigError::Serialization { .. }));
    assert_eq!(read(&out), "keep=me\n");
}

#[test]
fn test_failed_render_creates_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("field_table.FV3_GFS_v16");

    let err = Config::field_table(fixture("FV3_GFS_v16_update.yaml"))
        .unwrap()
        .dump_file(&out)
        .unwrap_err();

    assert!(matches!(err, ConfigError::Schema(_)));
    assert!(!out.exists());
}

#[test]
fn test_field_table_from_full_base() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("field_table.FV3_GFS_v16");

    let mut config = Config::field_table(fixture("FV3_GFS_v16.yaml")).unwrap();
    config.update_values(&Config::yaml(fixture("FV3_GFS_v16_update.yaml")).unwrap());
    config.dump_file(&out).unwrap();

    let text = read(&out);
    assert!(text.starts_with(" \"TRACER\", \"atmos_mod\", \"sphum\"\n"));
    assert_eq!(text.matches("\"TRACER\"").count(), 9);
}

#[test]
fn test_templated_fixture_dereferences() {
    let mut config = Config::yaml(fixture("templated.yaml")).unwrap();
    config.dereference_all().unwrap();

    let salad = config.tree()["salad"].as_map().unwrap();
    assert_eq!(salad["title"], Value::from("kale with banana"));
    assert_eq!(salad["count"], Value::Integer(4));
    assert_eq!(salad["dressing"], Value::from("{{ dressing_choice }}"));

    let report = config.values_needed();
    assert_eq!(
        report.templated,
        vec![(
            "salad.dressing".to_string(),
            "{{ dressing_choice }}".to_string()
        )]
    );
    assert_eq!(report.empty, vec!["salad.toppings"]);
}
