//! Common test utilities for building Dynamo documents and sources.
use dyndep::prelude::*;
use serde_json::{Value, json};

pub const AREA_UUID: &str = "3f2a7c1e-5b9d-4e8a-9c1f-2d6b8e4a7f10";
pub const OFFSET_UUID: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";
pub const SPARE_UUID: &str = "0f0e0d0c-0b0a-4998-8776-655443322110";
pub const WALLS_UUID: &str = "9e8d7c6b-5a49-4382-a716-f5e4d3c2b1a0";

pub const PYTHON_CONCRETE_TYPE: &str = "PythonNodeModels.PythonNode, PythonNodeModels";
pub const CUSTOM_CONCRETE_TYPE: &str = "Dynamo.Graph.Nodes.CustomNodes.Function, DynamoCore";

/// A minimal document: identity and dependencies, no `View` section.
#[allow(dead_code)]
pub fn bare_document(uuid: &str, name: &str, dependencies: &[&str]) -> Value {
    json!({
        "Uuid": uuid,
        "Name": name,
        "Dependencies": dependencies
    })
}

/// A script that places one plain node, one Python node and one instance of
/// each dependency, groups the Python node and attributes the first instance
/// to a package.
///
/// Node ids: `plain-1`, `py-1`, then `cn-0`, `cn-1`, ... per dependency.
#[allow(dead_code)]
pub fn full_document(uuid: &str, name: &str, dependencies: &[&str]) -> Value {
    let mut nodes = vec![
        json!({
            "Id": "plain-1",
            "ConcreteType": "Dynamo.Graph.Nodes.ZeroTouch.DSFunction, DynamoCore",
            "NodeType": "FunctionNode"
        }),
        json!({
            "Id": "py-1",
            "ConcreteType": PYTHON_CONCRETE_TYPE,
            "NodeType": "PythonScriptNode",
            "Code": "OUT = IN[0] * 2"
        }),
    ];
    let mut views = vec![
        json!({ "Id": "plain-1", "Name": "Point.ByCoordinates" }),
        json!({ "Id": "py-1", "Name": "Double It" }),
    ];
    for (index, dependency) in dependencies.iter().enumerate() {
        let id = format!("cn-{}", index);
        nodes.push(json!({
            "Id": id,
            "ConcreteType": CUSTOM_CONCRETE_TYPE,
            "FunctionType": "Graph",
            "FunctionSignature": dependency,
            "NodeType": "FunctionNode"
        }));
        views.push(json!({ "Id": id, "Name": format!("Custom {}", index) }));
    }

    json!({
        "Uuid": uuid,
        "Name": name,
        "Category": "Geometry.Curves",
        "Dependencies": dependencies,
        "Nodes": nodes,
        "NodeLibraryDependencies": [
            { "Name": "Clockwork", "Version": "2.4.0", "ReferenceType": "Package", "Nodes": ["cn-0"] }
        ],
        "Annotations": [
            { "Id": "group-1", "Title": "Scripting", "Nodes": ["py-1", "not-a-node"] }
        ],
        "View": { "NodeViews": views }
    })
}

/// An in-memory source whose id is `id` and whose name is the last path segment.
#[allow(dead_code)]
pub fn source(id: &str, document: &Value) -> InMemoryFile {
    let name = id.rsplit('/').next().unwrap_or(id);
    InMemoryFile::new(name, document.to_string()).with_id(id)
}

/// Two custom nodes (Offset depends on Area), an unused one and a script using both.
#[allow(dead_code)]
pub fn sample_sources() -> Vec<InMemoryFile> {
    vec![
        source(
            "scripts/Walls.dyn",
            &full_document(WALLS_UUID, "Walls", &[AREA_UUID, OFFSET_UUID]),
        ),
        source("library/Area.dyf", &bare_document(AREA_UUID, "Area", &[])),
        source(
            "library/Offset.dyf",
            &bare_document(OFFSET_UUID, "Offset", &[AREA_UUID]),
        ),
        source("library/Spare.dyf", &bare_document(SPARE_UUID, "Spare", &[])),
    ]
}

#[allow(dead_code)]
pub fn sample_library() -> Library {
    let parser = FileParser::new().expect("built-in builders are valid");
    Library::load(&parser, &sample_sources())
}
