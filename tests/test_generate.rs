// Integration tests for parsing a project and generating its topping.

mod helpers;

use helpers::test_fixtures::{SUB_DIR, reference_project, reference_settings};
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use toppingmaker::host::memory::{MemoryLayer, MemoryProject};
use toppingmaker::{
    AssetCategory, ExportSettings, HostProject, LayerTreeItem, ProjectTopping, SettingLookup,
    Target, ToppingError, ToppingResult, ToppingType, VersionedPathResolver,
};

fn generate_reference(temp: &TempDir) -> (Target, String) {
    let mut project = reference_project();
    let settings = reference_settings();
    let topping = ProjectTopping::parse_project(&project, Some(&settings));
    let mut target = Target::new("freddys", temp.path(), SUB_DIR);
    let path = topping
        .generate_files(&mut target, Some(&settings), &mut project)
        .expect("generation should succeed");
    (target, path)
}

fn read_document(target: &Target, path: &str) -> Value {
    let content = fs::read_to_string(target.main_dir.join(path)).expect("document is written");
    serde_yaml::from_str(&content).expect("document is valid YAML")
}

/// Value of the single-key node mapping `name` inside a node sequence.
fn node<'a>(nodes: &'a Value, name: &str) -> &'a Value {
    nodes
        .as_sequence()
        .expect("node list")
        .iter()
        .find_map(|entry| entry.get(name))
        .unwrap_or_else(|| panic!("node '{}' not found in {:?}", name, nodes))
}

fn children(node: &Value) -> &Value {
    node.get("child-nodes").expect("group has child-nodes")
}

#[test]
fn test_parse_keeps_tree_structure() {
    let project = reference_project();
    let topping = ProjectTopping::parse_project(&project, None);
    let tree = &topping.layertree;

    assert_eq!(tree.items.len(), 2);
    assert_eq!(tree.group_count(), 4);
    assert_eq!(tree.layer_count(), 10);
    assert_eq!(tree.depth(), 4);

    let Some(LayerTreeItem::Group(big)) = tree.find("Big Group") else {
        panic!("Big Group should be parsed as a group");
    };
    let names: Vec<_> = big.items.iter().map(LayerTreeItem::name).collect();
    assert_eq!(names, vec!["Layer One", "Medium Group"]);

    let Some(LayerTreeItem::Group(medium)) = tree.find("Medium Group") else {
        panic!("Medium Group should be parsed as a group");
    };
    assert_eq!(medium.items.len(), 3);
    let Some(LayerTreeItem::Group(small)) = tree.find("Small Group") else {
        panic!("Small Group should be parsed as a group");
    };
    assert_eq!(small.items.len(), 2);
}

#[test]
fn test_parse_without_settings_has_no_directives() {
    let project = reference_project();
    let topping = ProjectTopping::parse_project(&project, None);
    assert!(topping.theme_selection.is_empty());
    assert_eq!(topping.map_themes.len(), 2);
    let Some(LayerTreeItem::Layer(layer)) = topping.layertree.find("Layer One") else {
        panic!("Layer One should be parsed as a layer");
    };
    assert!(layer.directives.is_none());
    assert_eq!(layer.style_variants, vec!["french 1", "robot 1"]);
}

#[test]
fn test_document_mirrors_tree_and_checked_state() {
    let temp = TempDir::new().unwrap();
    let (target, path) = generate_reference(&temp);
    assert_eq!(
        path,
        "freddys_projects/this_specific_project/projecttopping/freddys.yaml"
    );

    let document = read_document(&target, &path);
    let layertree = document.get("layertree").expect("layertree key");

    let big = node(layertree, "Big Group");
    assert_eq!(big.get("group"), Some(&Value::Bool(true)));
    assert_eq!(children(big).as_sequence().unwrap().len(), 2);
    let medium = node(children(big), "Medium Group");
    assert_eq!(children(medium).as_sequence().unwrap().len(), 3);
    let small = node(children(medium), "Small Group");
    assert_eq!(children(small).as_sequence().unwrap().len(), 2);

    let all = node(layertree, "All of em");
    assert_eq!(children(all).as_sequence().unwrap().len(), 5);
    let one = node(children(all), "Layer One");
    assert_eq!(one.get("checked"), Some(&Value::Bool(false)));
    assert!(one.get("group").is_none());
    let two = node(children(all), "Layer Two");
    assert_eq!(two.get("checked"), Some(&Value::Bool(true)));
}

#[test]
fn test_document_references_exported_assets() {
    let temp = TempDir::new().unwrap();
    let (target, path) = generate_reference(&temp);
    let document = read_document(&target, &path);
    let big = node(document.get("layertree").unwrap(), "Big Group");
    let one = node(children(big), "Layer One");

    assert_eq!(
        one["style"]["path"].as_str(),
        Some("freddys_projects/this_specific_project/layerstyle/freddys_layer_one.qml")
    );
    assert_eq!(
        one["styles"]["french 1"]["path"].as_str(),
        Some("freddys_projects/this_specific_project/layerstyle/freddys_layer_one.french_1.qml")
    );
    assert!(one.get("styles").unwrap().get("robot 1").is_some());
    assert!(one.get("definition").is_none());
    assert_eq!(
        one["source"]["path"].as_str(),
        Some("freddys_projects/this_specific_project/layersource/freddys_layer_one.yaml")
    );

    let medium = node(children(big), "Medium Group");
    let small = node(children(medium), "Small Group");
    let three = node(children(small), "Layer Three");
    let styles = three["styles"].as_mapping().unwrap();
    assert_eq!(styles.len(), 1, "only the configured variant is exported");
    assert!(three["styles"].get("french 3").is_some());
    assert_eq!(
        three["definition"]["path"].as_str(),
        Some("freddys_projects/this_specific_project/layerdefinition/freddys_layer_three.qlr")
    );

    let four = node(children(small), "Layer Four");
    assert!(four.get("style").is_none());
    assert!(four.get("definition").is_some());
}

#[test]
fn test_document_lists_selected_themes_in_order() {
    let temp = TempDir::new().unwrap();
    let (target, path) = generate_reference(&temp);
    let document = read_document(&target, &path);

    let themes = document["mapthemes"].as_mapping().expect("mapthemes mapping");
    let names: Vec<_> = themes.keys().filter_map(Value::as_str).collect();
    assert_eq!(names, vec!["French Theme", "Robot Theme"]);

    let robot = &document["mapthemes"]["Robot Theme"];
    assert_eq!(robot["layers"]["Layer One"]["style"].as_str(), Some("robot 1"));
    assert_eq!(robot["layers"]["Layer One"]["visible"], Value::Bool(false));
    assert_eq!(robot["layers"]["Layer Three"]["visible"], Value::Bool(true));
    assert_eq!(
        robot["layers"]["Layer Three"]["using-current-style"],
        Value::Bool(true)
    );
    let expanded: Vec<_> = robot["expanded-groups"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(expanded, vec!["Small Group", "Big Group"]);
}

#[test]
fn test_registry_counts_every_occurrence() {
    let temp = TempDir::new().unwrap();
    let (target, _) = generate_reference(&temp);

    assert_eq!(target.toppingfileinfo_list.len(), 25);
    assert_eq!(target.files_of(AssetCategory::Style).count(), 12);
    assert_eq!(target.files_of(AssetCategory::Definition).count(), 6);
    assert_eq!(target.files_of(AssetCategory::Source).count(), 6);
    assert_eq!(target.files_of(AssetCategory::Topping).count(), 1);

    let layer_one_style = "freddys_projects/this_specific_project/layerstyle/freddys_layer_one.qml";
    let duplicates = target
        .toppingfileinfo_list
        .iter()
        .filter(|info| info.path == layer_one_style)
        .count();
    assert_eq!(duplicates, 2, "one entry per tree position");

    let last = target.toppingfileinfo_list.last().unwrap();
    assert_eq!(last.category, AssetCategory::Topping);
    assert!(last.id.is_none());
    assert!(last.version.is_none());
}

#[test]
fn test_registered_files_exist_on_disk() {
    let temp = TempDir::new().unwrap();
    let (target, _) = generate_reference(&temp);

    for info in &target.toppingfileinfo_list {
        let absolute = target.main_dir.join(&info.path);
        assert!(absolute.is_file(), "{} should exist", absolute.display());
    }

    let source = fs::read_to_string(temp.path().join(
        "freddys_projects/this_specific_project/layersource/freddys_layer_two.yaml",
    ))
    .unwrap();
    assert!(source.contains("kind: layersource"), "{}", source);
    assert!(source.contains("provider: memory"), "{}", source);
}

#[test]
fn test_versioned_resolver_numbers_repeated_files() {
    let temp = TempDir::new().unwrap();
    let mut project = reference_project();
    let settings = reference_settings();
    let topping = ProjectTopping::parse_project(&project, Some(&settings));
    let mut target = Target::new("freddys", temp.path(), SUB_DIR)
        .with_path_resolver(VersionedPathResolver::with_version("2022-07-17"));

    topping
        .generate_files(&mut target, None, &mut project)
        .unwrap();

    let ids: Vec<_> = target
        .toppingfileinfo_list
        .iter()
        .filter_map(|info| info.id.as_deref())
        .collect();
    assert_eq!(ids.len(), 25);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 25);
    assert!(ids.contains(&"layerstyle_freddys_layer_one.qml_001"));
    assert!(ids.contains(&"layerstyle_freddys_layer_one.qml_002"));
    assert!(ids.contains(&"projecttopping_freddys.yaml_001"));
    assert!(
        target
            .toppingfileinfo_list
            .iter()
            .all(|info| info.version.as_deref() == Some("2022-07-17"))
    );
}

#[test]
fn test_custom_closure_resolver_controls_paths() {
    let temp = TempDir::new().unwrap();
    let mut project = reference_project();
    let settings = reference_settings();
    let topping = ProjectTopping::parse_project(&project, Some(&settings));
    let resolver = |target: &mut Target, name: &str, category: AssetCategory| -> ToppingResult<String> {
        let path = format!("flat/{}", name);
        let id = target.unique_id(&format!("{}_{}_001", category, name));
        target
            .toppingfileinfo_list
            .push(toppingmaker::ToppingFileInfo {
                path: path.clone(),
                category,
                id: Some(id),
                version: None,
            });
        Ok(path)
    };
    let mut target = Target::new("freddys", temp.path(), SUB_DIR).with_path_resolver(resolver);

    let path = topping
        .generate_files(&mut target, Some(&settings), &mut project)
        .unwrap();
    assert_eq!(path, "flat/freddys.yaml");
    assert!(temp.path().join("flat/freddys.yaml").is_file());
    assert!(temp.path().join("flat/freddys_layer_three.qlr").is_file());
}

#[test]
fn test_round_trip_scenario() {
    let temp = TempDir::new().unwrap();
    let mut project = MemoryProject::new();
    for (id, name, styles) in [
        ("l1", "Layer One", vec![]),
        ("l2", "Layer Two", vec![]),
        ("l3", "Layer Three", vec!["french 3"]),
        ("l4", "Layer Four", vec![]),
        ("l5", "Layer Five", vec![]),
    ] {
        project
            .add_layer(MemoryLayer::new(id, name).with_styles(styles))
            .unwrap();
    }
    let big = project.add_group(None, "Big Group").unwrap();
    let medium = project.add_group(Some(big), "Medium Group").unwrap();
    let small = project.add_group(Some(medium), "Small Group").unwrap();
    project.add_layer_node(Some(small), "l3").unwrap();
    project.add_layer_node(Some(small), "l4").unwrap();
    project.add_layer_node(Some(medium), "l5").unwrap();
    project.add_layer_node(Some(big), "l2").unwrap();
    project.add_layer_node(None, "l1").unwrap();

    let mut settings = ExportSettings::new();
    settings.set_setting_values(ToppingType::Style, SettingLookup::name("Layer One"), true, None);
    settings.set_setting_values(
        ToppingType::Style,
        SettingLookup::name("Layer Three").with_variant("french 3"),
        true,
        None,
    );

    let topping = ProjectTopping::parse_project(&project, None);
    let mut target = Target::new("roundtrip", temp.path(), "");
    let path = topping
        .generate_files(&mut target, Some(&settings), &mut project)
        .unwrap();

    let document = read_document(&target, &path);
    let layertree = &document["layertree"];
    assert_eq!(children(node(layertree, "Big Group")).as_sequence().unwrap().len(), 2);
    let one = node(layertree, "Layer One");
    assert!(one.get("style").is_some());
    assert!(one.get("styles").is_none());

    let styles: Vec<_> = target
        .files_of(AssetCategory::Style)
        .map(|info| info.path.as_str())
        .collect();
    assert_eq!(
        styles,
        vec![
            "layerstyle/roundtrip_layer_three.french_3.qml",
            "layerstyle/roundtrip_layer_one.qml",
        ]
    );
}

#[test]
fn test_node_settings_shadow_name_settings() {
    let temp = TempDir::new().unwrap();
    let mut project = reference_project();
    let mut settings = reference_settings();

    // Second placement of Layer One exports its definition, the first does not.
    let placements = project.find_layer_nodes("Layer One");
    assert_eq!(placements.len(), 2);
    settings.set_setting_values(
        ToppingType::Definition,
        SettingLookup::node(placements[1]),
        true,
        None,
    );
    settings.set_setting_values(
        ToppingType::Style,
        SettingLookup::node(placements[1]),
        false,
        None,
    );

    let topping = ProjectTopping::parse_project(&project, None);
    let mut target = Target::new("freddys", temp.path(), SUB_DIR);
    let path = topping
        .generate_files(&mut target, Some(&settings), &mut project)
        .unwrap();
    let document = read_document(&target, &path);

    let big = node(&document["layertree"], "Big Group");
    let first = node(children(big), "Layer One");
    assert!(first.get("definition").is_none());
    assert!(first.get("style").is_some());

    let all = node(&document["layertree"], "All of em");
    let second = node(children(all), "Layer One");
    assert!(second.get("definition").is_some());
    assert!(second.get("style").is_none());
    assert!(second.get("styles").is_some(), "variant keys are not shadowed");
}

#[test]
fn test_parse_time_settings_match_explicit_settings() {
    let project = reference_project();
    let settings = reference_settings();
    let topping = ProjectTopping::parse_project(&project, Some(&settings));

    let with_embedded = TempDir::new().unwrap();
    let mut target_a = Target::new("freddys", with_embedded.path(), SUB_DIR);
    topping
        .generate_files(&mut target_a, None, &mut project.clone())
        .unwrap();

    let with_explicit = TempDir::new().unwrap();
    let mut target_b = Target::new("freddys", with_explicit.path(), SUB_DIR);
    topping
        .generate_files(&mut target_b, Some(&settings), &mut project.clone())
        .unwrap();

    assert_eq!(target_a.toppingfileinfo_list, target_b.toppingfileinfo_list);
}

#[test]
fn test_generation_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let (target_a, path_a) = generate_reference(&first);
    let (target_b, path_b) = generate_reference(&second);

    assert_eq!(path_a, path_b);
    assert_eq!(target_a.toppingfileinfo_list, target_b.toppingfileinfo_list);
    assert_eq!(
        fs::read_to_string(target_a.main_dir.join(&path_a)).unwrap(),
        fs::read_to_string(target_b.main_dir.join(&path_b)).unwrap()
    );
}

#[test]
fn test_empty_project_produces_empty_tree() {
    let temp = TempDir::new().unwrap();
    let mut project = MemoryProject::new();
    assert!(project.layer_tree_root().is_empty());

    let topping = ProjectTopping::parse_project(&project, None);
    let mut target = Target::new("empty", temp.path(), "");
    let path = topping.generate_files(&mut target, None, &mut project).unwrap();

    let content = fs::read_to_string(temp.path().join(&path)).unwrap();
    assert_eq!(content, "layertree: []\n");
    assert_eq!(target.toppingfileinfo_list.len(), 1);
}

#[test]
fn test_unwritable_main_dir_reports_io_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "file").unwrap();

    let mut project = reference_project();
    let settings = reference_settings();
    let topping = ProjectTopping::parse_project(&project, Some(&settings));
    let mut target = Target::new("freddys", &blocker, SUB_DIR);

    let result = topping.generate_files(&mut target, None, &mut project);
    assert!(
        matches!(result, Err(ToppingError::Io { .. })),
        "Expected an Io error, got {:?}",
        result
    );
}

fn export_default_styles(names: &[&str]) -> ExportSettings {
    let mut settings = ExportSettings::new();
    for name in names {
        settings.set_setting_values(ToppingType::Style, SettingLookup::name(name), true, None);
    }
    settings
}

#[test]
fn test_variant_file_never_collides_with_other_layer_style() {
    let temp = TempDir::new().unwrap();
    let mut project = MemoryProject::new();
    project
        .add_layer(MemoryLayer::new("a", "Roads").with_styles(["night"]))
        .unwrap();
    project.add_layer(MemoryLayer::new("b", "Roads Night")).unwrap();
    project.add_layer_node(None, "a").unwrap();
    project.add_layer_node(None, "b").unwrap();

    let mut settings = export_default_styles(&["Roads", "Roads Night"]);
    settings.set_setting_values(
        ToppingType::Style,
        SettingLookup::name("Roads").with_variant("night"),
        true,
        None,
    );

    let topping = ProjectTopping::parse_project(&project, None);
    let mut target = Target::new("demo", temp.path(), "");
    topping
        .generate_files(&mut target, Some(&settings), &mut project)
        .unwrap();

    let paths: Vec<_> = target
        .files_of(AssetCategory::Style)
        .map(|info| info.path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec![
            "layerstyle/demo_roads.qml",
            "layerstyle/demo_roads.night.qml",
            "layerstyle/demo_roads_night.qml",
        ]
    );
    let variant = fs::read_to_string(temp.path().join("layerstyle/demo_roads.night.qml")).unwrap();
    assert!(variant.contains("layer: a"), "{}", variant);
    assert!(variant.contains("style: night"), "{}", variant);
    let other = fs::read_to_string(temp.path().join("layerstyle/demo_roads_night.qml")).unwrap();
    assert!(other.contains("layer: b"), "{}", other);
}

#[test]
fn test_same_named_layers_get_distinct_files() {
    let temp = TempDir::new().unwrap();
    let mut project = MemoryProject::new();
    project.add_layer(MemoryLayer::new("a", "Roads")).unwrap();
    project.add_layer(MemoryLayer::new("b", "Roads")).unwrap();
    project.add_layer_node(None, "a").unwrap();
    project.add_layer_node(None, "b").unwrap();
    let group = project.add_group(None, "Again").unwrap();
    project.add_layer_node(Some(group), "b").unwrap();
    project.add_layer_node(Some(group), "a").unwrap();

    let settings = export_default_styles(&["Roads"]);
    let topping = ProjectTopping::parse_project(&project, None);
    let mut target = Target::new("demo", temp.path(), "");
    topping
        .generate_files(&mut target, Some(&settings), &mut project)
        .unwrap();

    let paths: Vec<_> = target
        .files_of(AssetCategory::Style)
        .map(|info| info.path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec![
            "layerstyle/demo_roads.qml",
            "layerstyle/demo_roads-2.qml",
            "layerstyle/demo_roads-2.qml",
            "layerstyle/demo_roads.qml",
        ]
    );
    let plain = fs::read_to_string(temp.path().join("layerstyle/demo_roads.qml")).unwrap();
    assert!(plain.contains("layer: a"), "{}", plain);
    let suffixed = fs::read_to_string(temp.path().join("layerstyle/demo_roads-2.qml")).unwrap();
    assert!(suffixed.contains("layer: b"), "{}", suffixed);
}

#[test]
fn test_theme_with_same_named_layers_reads_back() {
    let temp = TempDir::new().unwrap();
    let mut project = MemoryProject::from_yaml(
        r#"
layers:
  - id: a
    name: Same
  - id: b
    name: Same
tree:
  - layer: a
  - layer: b
themes:
  - name: T
    layers:
      - { layer: a, visible: true }
      - { layer: b, visible: false }
"#,
    )
    .unwrap();
    let mut settings = ExportSettings::new();
    settings.map_themes = vec!["T".to_string(), "T".to_string()];

    let topping = ProjectTopping::parse_project(&project, Some(&settings));
    let mut target = Target::new("demo", temp.path(), "");
    let path = topping.generate_files(&mut target, None, &mut project).unwrap();

    let document = read_document(&target, &path);
    let themes = document["mapthemes"].as_mapping().unwrap();
    assert_eq!(themes.len(), 1);
    let layers = document["mapthemes"]["T"]["layers"].as_mapping().unwrap();
    assert_eq!(layers.len(), 1);
    assert_eq!(document["mapthemes"]["T"]["layers"]["Same"]["visible"], Value::Bool(false));
}
