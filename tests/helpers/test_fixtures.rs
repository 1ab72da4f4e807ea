//! Project and settings fixtures shared by the generation tests.

#![allow(dead_code)]

use toppingmaker::host::memory::{MemoryLayer, MemoryProject};
use toppingmaker::host::{MapThemeLayerRecord, MapThemeRecord};
use toppingmaker::{ExportSettings, SettingLookup, ToppingType};

pub(crate) const SUB_DIR: &str = "freddys_projects/this_specific_project";

/// Layer tree of the reference project:
///
/// ```text
/// Big Group
///   Layer One
///   Medium Group
///     Layer Two
///     Small Group
///       Layer Three
///       Layer Four
///     Layer Five
/// All of em
///   Layer One    (unchecked)
///   Layer Two
///   Layer Three  (unchecked)
///   Layer Four
///   Layer Five
/// ```
///
/// plus a "Robot Theme" and a "French Theme".
pub(crate) fn reference_project() -> MemoryProject {
    let mut project = MemoryProject::new();
    let uri = "point?crs=epsg:4326&field=id:integer";
    project
        .add_layer(
            MemoryLayer::new("l1", "Layer One")
                .with_source("memory", uri)
                .with_styles(["french 1", "robot 1"]),
        )
        .unwrap();
    project
        .add_layer(MemoryLayer::new("l2", "Layer Two").with_source("memory", uri))
        .unwrap();
    project
        .add_layer(
            MemoryLayer::new("l3", "Layer Three")
                .with_source("memory", uri)
                .with_styles(["french 3", "robot 3"]),
        )
        .unwrap();
    project
        .add_layer(MemoryLayer::new("l4", "Layer Four").with_source("memory", uri))
        .unwrap();
    project
        .add_layer(MemoryLayer::new("l5", "Layer Five").with_source("memory", uri))
        .unwrap();

    let big = project.add_group(None, "Big Group").unwrap();
    project.add_layer_node(Some(big), "l1").unwrap();
    let medium = project.add_group(Some(big), "Medium Group").unwrap();
    project.add_layer_node(Some(medium), "l2").unwrap();
    let small = project.add_group(Some(medium), "Small Group").unwrap();
    project.add_layer_node(Some(small), "l3").unwrap();
    project.add_layer_node(Some(small), "l4").unwrap();
    project.add_layer_node(Some(medium), "l5").unwrap();

    let all = project.add_group(None, "All of em").unwrap();
    let one = project.add_layer_node(Some(all), "l1").unwrap();
    project.set_checked(one, false).unwrap();
    project.add_layer_node(Some(all), "l2").unwrap();
    let three = project.add_layer_node(Some(all), "l3").unwrap();
    project.set_checked(three, false).unwrap();
    project.add_layer_node(Some(all), "l4").unwrap();
    project.add_layer_node(Some(all), "l5").unwrap();

    project.insert_map_theme(MapThemeRecord {
        name: "Robot Theme".to_string(),
        layer_records: vec![
            theme_layer("Layer One", "robot 1", false),
            theme_layer("Layer Three", "robot 3", true),
        ],
        expanded_groups: vec!["Small Group".to_string(), "Big Group".to_string()],
    });
    project.insert_map_theme(MapThemeRecord {
        name: "French Theme".to_string(),
        layer_records: vec![
            theme_layer("Layer One", "french 1", true),
            theme_layer("Layer Three", "french 3", false),
        ],
        expanded_groups: vec!["Medium Group".to_string()],
    });
    project
}

fn theme_layer(layer: &str, style: &str, visible: bool) -> MapThemeLayerRecord {
    MapThemeLayerRecord {
        layer: layer.to_string(),
        style: Some(style.to_string()),
        visible,
        using_current_style: true,
    }
}

/// Name-keyed settings of the reference project.
///
/// - style: Layer One (default, french 1, robot 1), Layer Three (default,
///   french 3), Layer Five
/// - definition: Layer Three, Layer Four, Layer Five
/// - source: Layer One, Layer Two, Layer Three
/// - themes: French Theme, Robot Theme
pub(crate) fn reference_settings() -> ExportSettings {
    let mut settings = ExportSettings::new();
    let style = [
        ("Layer One", None),
        ("Layer One", Some("french 1")),
        ("Layer One", Some("robot 1")),
        ("Layer Three", None),
        ("Layer Three", Some("french 3")),
        ("Layer Five", None),
    ];
    for (name, variant) in style {
        let mut lookup = SettingLookup::name(name);
        if let Some(variant) = variant {
            lookup = lookup.with_variant(variant);
        }
        assert!(settings.set_setting_values(ToppingType::Style, lookup, true, None));
    }
    for name in ["Layer Three", "Layer Four", "Layer Five"] {
        settings.set_setting_values(ToppingType::Definition, SettingLookup::name(name), true, None);
    }
    for name in ["Layer One", "Layer Two", "Layer Three"] {
        settings.set_setting_values(ToppingType::Source, SettingLookup::name(name), true, None);
    }
    settings.map_themes = vec!["French Theme".to_string(), "Robot Theme".to_string()];
    settings
}

/// YAML description equivalent to a trimmed-down reference project, for CLI runs.
pub(crate) const PROJECT_YAML: &str = r#"
layers:
  - id: l1
    name: Layer One
    provider: memory
    uri: "point?crs=epsg:4326"
    styles: [french 1, robot 1]
  - id: l2
    name: Layer Two
    provider: memory
    uri: "point?crs=epsg:4326"
tree:
  - group: Big Group
    children:
      - layer: l1
      - layer: l2
  - group: All of em
    children:
      - layer: l1
        checked: false
themes:
  - name: Robot Theme
    layers:
      - { layer: l1, style: robot 1, visible: false }
    expanded_groups: [Big Group]
"#;
