//! Tests for parsing single documents into typed files.
mod common;
use common::*;
use dyndep::builder::{FieldRule, NodeBuilder, NodeViews, PlainNodeBuilder};
use dyndep::error::BuildError;
use dyndep::model::UNKNOWN_CONCRETE_TYPE;
use dyndep::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn parser() -> FileParser {
    FileParser::new().expect("Failed to create parser")
}

#[test]
fn test_full_document_is_parsed() {
    let document = full_document(WALLS_UUID, "Walls", &[AREA_UUID, OFFSET_UUID]);
    let file = parser()
        .try_parse(&source("scripts/Walls.dyn", &document))
        .expect("Failed to parse document");

    assert_eq!(file.uuid(), WALLS_UUID);
    assert_eq!(file.name(), "Walls");
    assert_eq!(file.file_type(), FileType::Script);
    assert!(file.categories().is_empty());
    assert_eq!(file.dependencies(), &[AREA_UUID.to_string(), OFFSET_UUID.to_string()]);
    assert_eq!(file.nodes().len(), 4);

    let custom: Vec<_> = file
        .custom_node_instances()
        .filter_map(|node| node.custom_uuid())
        .collect();
    assert_eq!(custom, vec![AREA_UUID, OFFSET_UUID]);

    let code: Vec<_> = file.code_nodes().collect();
    assert_eq!(code.len(), 1);
    assert_eq!(code[0].name(), "Double It");
    assert_eq!(code[0].code(), Some(("OUT = IN[0] * 2", "IronPython2")));
}

#[test]
fn test_content_payload_keeps_node_and_view() {
    let document = full_document(WALLS_UUID, "Walls", &[]);
    let file = parser()
        .try_parse(&source("Walls.dyn", &document))
        .expect("Failed to parse document");

    let node = file.node("plain-1").expect("plain node exists");
    assert_eq!(node.content()["Node"]["Id"], json!("plain-1"));
    assert_eq!(node.content()["View"]["Name"], json!("Point.ByCoordinates"));
    assert_eq!(node.node_type, "FunctionNode");
}

#[test]
fn test_missing_type_tags_use_sentinels() {
    let document = json!({
        "Uuid": WALLS_UUID,
        "Name": "Walls",
        "Nodes": [{ "Id": "n1", "NodeType": "ExtensionNode" }],
        "View": { "NodeViews": [{ "Id": "n1", "Name": "Odd" }] }
    });
    let file = parser()
        .try_parse(&source("Walls.dyn", &document))
        .expect("Failed to parse document");
    let node = &file.nodes()[0];
    assert_eq!(node.concrete_type, UNKNOWN_CONCRETE_TYPE);
    assert_eq!(node.kind, NodeKind::Plain);
}

#[test]
fn test_group_members_point_at_their_annotation() {
    let document = full_document(WALLS_UUID, "Walls", &[AREA_UUID]);
    let file = parser()
        .try_parse(&source("Walls.dyn", &document))
        .expect("Failed to parse document");

    assert_eq!(file.groups().len(), 1);
    let group = &file.groups()[0];
    assert_eq!(group.name, "Scripting");
    assert_eq!(group.members, vec!["py-1".to_string()]);

    for node in file.nodes() {
        if node.uuid() == "py-1" {
            assert_eq!(node.group(), Some("group-1"));
            assert_eq!(file.group_of(node).map(|g| g.uuid.as_str()), Some("group-1"));
        } else {
            assert_eq!(node.group(), None);
            assert!(file.group_of(node).is_none());
        }
    }
}

#[test]
fn test_packages_are_shared_by_reference() {
    let mut document = full_document(WALLS_UUID, "Walls", &[AREA_UUID, OFFSET_UUID]);
    document["NodeLibraryDependencies"][0]["Nodes"] = json!(["cn-0", "cn-1"]);

    let file = parser()
        .try_parse(&source("Walls.dyn", &document))
        .expect("Failed to parse document");
    let packages: Vec<&Arc<Package>> = file
        .custom_node_instances()
        .filter_map(|node| node.package())
        .collect();

    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].to_string(), "Clockwork 2.4.0");
    assert!(Arc::ptr_eq(packages[0], packages[1]));
}

#[test]
fn test_custom_nodes_without_package_keep_the_unknown_package() {
    let document = full_document(WALLS_UUID, "Walls", &[AREA_UUID, OFFSET_UUID]);
    let file = parser()
        .try_parse(&source("Walls.dyn", &document))
        .expect("Failed to parse document");
    let second = file.node("cn-1").and_then(|node| node.package()).expect("custom node");
    assert!(second.is_unknown());
}

#[test]
fn test_document_without_view_has_no_nodes() {
    let mut document = full_document(AREA_UUID, "Area", &[OFFSET_UUID]);
    document.as_object_mut().expect("object").remove("View");

    let file = parser()
        .try_parse(&source("Area.dyf", &document))
        .expect("Failed to parse document");
    assert!(file.nodes().is_empty());
    assert!(file.groups().is_empty());
    assert_eq!(file.categories(), &["Geometry".to_string(), "Curves".to_string()]);
    assert!(file.has_dependency());
}

#[test]
fn test_missing_uuid_is_a_build_error() {
    let document = json!({ "Name": "Walls" });
    let err = parser()
        .try_parse(&source("Walls.dyn", &document))
        .expect_err("Parsing should fail");
    assert_eq!(
        err,
        ParseError::Build {
            file: "Walls.dyn".to_string(),
            source: BuildError::MissingRequiredField {
                field: "Uuid",
                context: "document".to_string(),
            },
        }
    );
    assert_eq!(err.file(), "Walls.dyn");
}

#[test]
fn test_missing_name_is_a_build_error() {
    let document = json!({ "Uuid": AREA_UUID, "Dependencies": [] });
    let err = parser()
        .try_parse(&source("Area.dyf", &document))
        .expect_err("Parsing should fail");
    assert_eq!(
        err,
        ParseError::Build {
            file: "Area.dyf".to_string(),
            source: BuildError::MissingRequiredField {
                field: "Name",
                context: "document".to_string(),
            },
        }
    );
}

#[test]
fn test_malformed_json_and_unsupported_files() {
    let parser = parser();

    let broken = InMemoryFile::new("Broken.dyn", "{ \"Uuid\": ");
    assert!(matches!(
        parser.try_parse(&broken),
        Err(ParseError::MalformedJson { .. })
    ));
    assert!(parser.parse(&broken).is_none());

    let other = InMemoryFile::new("notes.json", "{}");
    assert_eq!(
        parser.try_parse(&other).err(),
        Some(ParseError::UnsupportedFileType {
            file: "notes.json".to_string()
        })
    );
}

#[test]
fn test_byte_order_mark_is_tolerated() {
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend(bare_document(AREA_UUID, "Area", &[]).to_string().into_bytes());
    let file = parser()
        .try_parse(&InMemoryFile::new("Area.dyf", bytes))
        .expect("Failed to parse document");
    assert_eq!(file.uuid(), AREA_UUID);
}

#[test]
fn test_missing_view_policy() {
    let mut document = full_document(WALLS_UUID, "Walls", &[AREA_UUID]);
    document["View"]["NodeViews"]
        .as_array_mut()
        .expect("array")
        .retain(|view| view["Id"] != json!("plain-1"));
    let input = source("Walls.dyn", &document);

    let err = parser().try_parse(&input).expect_err("Parsing should fail");
    assert!(matches!(
        err,
        ParseError::Build {
            source: BuildError::MissingView { .. },
            ..
        }
    ));

    let lenient = FileParser::builder()
        .with_missing_view_policy(MissingViewPolicy::SkipNode)
        .build()
        .expect("Failed to create parser");
    let file = lenient.try_parse(&input).expect("Failed to parse document");
    assert_eq!(file.nodes().len(), 2);
    assert!(file.node("plain-1").is_none());
}

#[test]
fn test_legacy_engine_is_configurable() {
    let parser = FileParser::builder()
        .with_legacy_engine("CPython3")
        .build()
        .expect("Failed to create parser");
    let file = parser
        .try_parse(&source("Walls.dyn", &full_document(WALLS_UUID, "Walls", &[])))
        .expect("Failed to parse document");
    let code = file.code_nodes().next().and_then(|node| node.code());
    assert_eq!(code, Some(("OUT = IN[0] * 2", "CPython3")));
}

struct WatchNodeBuilder {
    rules: Vec<FieldRule>,
}

impl NodeBuilder for WatchNodeBuilder {
    fn name(&self) -> &str {
        "watch"
    }

    fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    fn build(
        &self,
        record: &Value,
        views: &NodeViews<'_>,
    ) -> std::result::Result<DynamoNode, BuildError> {
        let mut node = PlainNodeBuilder.build(record, views)?;
        node.base.name = format!("[watch] {}", node.base.name);
        Ok(node)
    }
}

#[test]
fn test_extra_builders_run_before_the_fallback() {
    let parser = FileParser::builder()
        .with_node_builder(Box::new(WatchNodeBuilder {
            rules: vec![FieldRule::equals("NodeType", "FunctionNode")],
        }))
        .build()
        .expect("Failed to create parser");
    assert_eq!(
        parser.registry().builder_names(),
        vec!["custom", "code", "watch", "plain"]
    );

    let file = parser
        .try_parse(&source("Walls.dyn", &full_document(WALLS_UUID, "Walls", &[AREA_UUID])))
        .expect("Failed to parse document");
    assert_eq!(file.node("plain-1").map(|n| n.name()), Some("[watch] Point.ByCoordinates"));
    // Custom node instances also carry NodeType FunctionNode but match the custom builder first.
    assert!(file.node("cn-0").is_some_and(|n| n.is_custom()));
}

#[test]
fn test_second_fallback_is_rejected_before_parsing() {
    let result = FileParser::builder()
        .with_node_builder(Box::new(PlainNodeBuilder))
        .build();
    assert_eq!(
        result.err(),
        Some(RegistryError::BuilderConfiguration { found: 2 })
    );
}
