use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

const NODE_NAMES: &[&str] = &[
    "Point.ByCoordinates",
    "Line.ByStartPointEndPoint",
    "Number",
    "Code Block",
    "Watch",
    "List.Create",
    "Element.GetParameterValueByName",
];
const WORDS: &[&str] = &[
    "Wall", "Roof", "Floor", "Area", "Offset", "Grid", "Level", "Sheet", "Room", "Beam",
];
const CATEGORIES: &[&str] = &["Geometry.Curves", "Revit.Walls", "Utilities.Lists", "Analysis"];
const PACKAGES: &[(&str, &str)] = &[("Clockwork", "2.4.0"), ("archi-lab", "2023.1.1"), ("Rhythm", "1.1.3")];

/// A CLI tool to generate a synthetic batch of Dynamo files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The folder to write `scripts/` and `library/` into
    #[arg(short, long, default_value = "generated")]
    output: String,

    /// Number of custom node definitions to generate
    #[arg(long, default_value_t = 20)]
    custom_nodes: usize,

    /// Number of scripts to generate
    #[arg(long, default_value_t = 10)]
    scripts: usize,

    /// The maximum number of custom nodes a single file depends on
    #[arg(long, default_value_t = 4)]
    max_deps: usize,

    /// Number of deliberately malformed files to add to each folder
    #[arg(long, default_value_t = 0)]
    broken: usize,
}

struct Generated {
    uuid: String,
    file_name: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    let root = Path::new(&cli.output);
    let library_dir = root.join("library");
    let script_dir = root.join("scripts");
    fs::create_dir_all(&library_dir)?;
    fs::create_dir_all(&script_dir)?;

    println!(
        "Generating {} custom node(s) and {} script(s) in '{}'...",
        cli.custom_nodes, cli.scripts, cli.output
    );

    // Custom nodes only depend on earlier ones so the batch stays acyclic.
    let mut custom_nodes: Vec<Generated> = Vec::with_capacity(cli.custom_nodes);
    for index in 0..cli.custom_nodes {
        let name = format!("{} {}", WORDS.choose(&mut rng).unwrap_or(&"Node"), index);
        let deps = pick_dependencies(&mut rng, &custom_nodes, cli.max_deps);
        let uuid = guid(&mut rng);
        let category = CATEGORIES.choose(&mut rng).copied().unwrap_or("");
        let document = document(&mut rng, &uuid, &name, &deps, Some(category));

        let file_name = format!("{}.dyf", name.replace(' ', "_"));
        fs::write(library_dir.join(&file_name), serde_json::to_string_pretty(&document)?)?;
        custom_nodes.push(Generated { uuid, file_name });
    }
    println!("-> Generated {} custom node(s).", custom_nodes.len());

    // A backup copy shares the uuid of its original.
    if let Some(original) = custom_nodes.choose(&mut rng) {
        let backup_dir = library_dir.join("backup");
        fs::create_dir_all(&backup_dir)?;
        fs::copy(
            library_dir.join(&original.file_name),
            backup_dir.join(&original.file_name),
        )?;
        println!("-> Copied '{}' into backup/.", original.file_name);
    }

    for index in 0..cli.scripts {
        let name = format!("{} Script {}", WORDS.choose(&mut rng).unwrap_or(&"Main"), index);
        let deps = pick_dependencies(&mut rng, &custom_nodes, cli.max_deps);
        let uuid = guid(&mut rng);
        let document = document(&mut rng, &uuid, &name, &deps, None);
        let file_name = format!("{}.dyn", name.replace(' ', "_"));
        fs::write(script_dir.join(file_name), serde_json::to_string_pretty(&document)?)?;
    }
    println!("-> Generated {} script(s).", cli.scripts);

    for index in 0..cli.broken {
        fs::write(library_dir.join(format!("Broken_{}.dyf", index)), "{ \"Uuid\": ")?;
        fs::write(script_dir.join(format!("Broken_{}.dyn", index)), "not json")?;
    }
    if cli.broken > 0 {
        println!("-> Added {} malformed file(s) per folder.", cli.broken);
    }

    println!("Successfully generated test files in '{}'", cli.output);
    Ok(())
}

fn guid(rng: &mut ThreadRng) -> String {
    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        rng.random::<u32>(),
        rng.random::<u16>(),
        rng.random::<u16>(),
        rng.random::<u16>(),
        rng.random::<u64>() & 0xffff_ffff_ffff
    )
}

fn pick_dependencies<'a>(
    rng: &mut ThreadRng,
    candidates: &'a [Generated],
    max_deps: usize,
) -> Vec<&'a Generated> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let count = rng.random_range(0..=max_deps.min(candidates.len()));
    candidates.choose_multiple(rng, count).collect()
}

/// Builds one Dynamo document with plain nodes, a code node, one instance per
/// dependency, a group and, sometimes, package metadata.
fn document(
    rng: &mut ThreadRng,
    uuid: &str,
    name: &str,
    deps: &[&Generated],
    category: Option<&str>,
) -> Value {
    let mut nodes = Vec::new();
    let mut views = Vec::new();

    for _ in 0..rng.random_range(1..=4) {
        let id = guid(rng);
        nodes.push(json!({
            "Id": id,
            "ConcreteType": "Dynamo.Graph.Nodes.ZeroTouch.DSFunction, DynamoCore",
            "NodeType": "FunctionNode"
        }));
        views.push(json!({ "Id": id, "Name": NODE_NAMES.choose(rng).unwrap_or(&"Node") }));
    }

    let code_id = guid(rng);
    let mut code_node = json!({
        "Id": code_id,
        "ConcreteType": "PythonNodeModels.PythonNode, PythonNodeModels",
        "NodeType": "PythonScriptNode",
        "Code": format!("# {}\nOUT = IN[0]", name)
    });
    if rng.random_bool(0.5) {
        code_node["Engine"] = json!("CPython3");
    }
    nodes.push(code_node);
    views.push(json!({ "Id": code_id, "Name": "Python Script" }));

    let mut instance_ids = Vec::new();
    for dep in deps {
        let id = guid(rng);
        nodes.push(json!({
            "Id": id,
            "ConcreteType": "Dynamo.Graph.Nodes.CustomNodes.Function, DynamoCore",
            "FunctionType": "Graph",
            "FunctionSignature": dep.uuid,
            "NodeType": "FunctionNode"
        }));
        views.push(json!({ "Id": id, "Name": dep.file_name.trim_end_matches(".dyf") }));
        instance_ids.push(id);
    }

    let mut library_dependencies = Vec::new();
    if !instance_ids.is_empty() && rng.random_bool(0.4) {
        let (package, version) = PACKAGES.choose(rng).unwrap_or(&("Unknown", "0.0.0"));
        library_dependencies.push(json!({
            "Name": package,
            "Version": version,
            "ReferenceType": "Package",
            "Nodes": instance_ids
        }));
    }

    let mut document = json!({
        "Uuid": uuid,
        "Name": name,
        "Dependencies": deps.iter().map(|dep| dep.uuid.as_str()).collect::<Vec<_>>(),
        "NodeLibraryDependencies": library_dependencies,
        "Nodes": nodes,
        "Annotations": [{
            "Id": guid(rng),
            "Title": "Scripting",
            "Nodes": [code_id]
        }],
        "View": { "NodeViews": views }
    });
    if let Some(category) = category {
        document["Category"] = json!(category);
    }
    document
}
