use clap::{Parser, Subcommand, ValueEnum};
use dyndep::browse::FileSummary;
use dyndep::prelude::*;
use dyndep::source::collect_files;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Define CLI-specific enums for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryCli {
    Scripts,
    CustomNodes,
    Unused,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortCli {
    NodeName,
    FileName,
    Dependencies,
    UsedIn,
}

impl From<CategoryCli> for Category {
    fn from(value: CategoryCli) -> Self {
        match value {
            CategoryCli::Scripts => Category::Scripts,
            CategoryCli::CustomNodes => Category::CustomNodes,
            CategoryCli::Unused => Category::Unused,
        }
    }
}

impl From<SortCli> for SortOrder {
    fn from(value: SortCli) -> Self {
        match value {
            SortCli::NodeName => SortOrder::NodeName,
            SortCli::FileName => SortOrder::FileName,
            SortCli::Dependencies => SortOrder::DependencyCount,
            SortCli::UsedIn => SortOrder::UsedInCount,
        }
    }
}

/// Explore which Dynamo scripts depend on which custom nodes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Folder searched recursively for `.dyn` scripts
    #[arg(short, long)]
    scripts: Option<PathBuf>,

    /// Folder searched recursively for `.dyf` custom nodes
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Optional JSON file with parser options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log parsing and linking details
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the files of one category
    List {
        #[arg(value_enum, default_value = "scripts")]
        category: CategoryCli,
        #[arg(short = 'o', long, value_enum, default_value = "node-name")]
        sort: SortCli,
    },
    /// Show what a file depends on and what depends on it
    Graph {
        /// File id, file name or display name
        file: String,
        /// Print the graph view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the groups and the embedded code of a file
    Show {
        /// File id, file name or display name
        file: String,
    },
    /// List the files that could not be used
    Failures,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.scripts.is_none() && cli.library.is_none() {
        exit_with_error("At least one of --scripts or --library is required.");
    }

    let library = load_library(&cli);

    match cli.command {
        Command::List { category, sort } => print_list(&library, category.into(), sort.into()),
        Command::Graph { file, json } => print_graph(&library, &file, json),
        Command::Show { file } => print_file(&library, &file),
        Command::Failures => print_failures(&library),
    }
}

fn load_library(cli: &Cli) -> Library {
    let start = Instant::now();

    let options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            });
            serde_json::from_str::<ParserOptions>(&text)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse config JSON: {}", e)))
        }
        None => ParserOptions::default(),
    };

    let parser = FileParser::builder()
        .with_options(options)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to set up the parser: {}", e)));

    let mut sources = Vec::new();
    if let Some(dir) = &cli.scripts {
        sources.extend(collect_files(dir, Some(FileType::Script)));
    }
    if let Some(dir) = &cli.library {
        sources.extend(collect_files(dir, Some(FileType::CustomNode)));
    }

    let library = Library::load(&parser, &sources);
    tracing::info!(
        files = sources.len(),
        scripts = library.scripts().len(),
        custom_nodes = library.custom_nodes().len(),
        failures = library.failures().len(),
        elapsed = ?start.elapsed(),
        "loaded library"
    );
    library
}

fn find_or_exit<'a>(library: &'a Library, query: &str) -> &'a DynamoFile {
    library
        .find(query)
        .unwrap_or_else(|| exit_with_error(&format!("No file matches '{}'.", query)))
}

fn print_list(library: &Library, category: Category, sort: SortOrder) {
    if !category.sort_options().contains(&sort) {
        exit_with_error(&format!("{:?} is not a sort order for {}.", sort, category));
    }

    let rows = browse::summaries(library, category, sort);
    println!("--- {} ({}) ---", category, rows.len());
    for row in &rows {
        println!("{}", format_row(row, category, sort));
    }
}

fn format_row(row: &FileSummary, category: Category, sort: SortOrder) -> String {
    let marker = if row.dependency_count > 0 || row.used_in_count > 0 {
        ' '
    } else {
        '-'
    };
    let counts = match (category, sort) {
        (Category::Unused, _) => String::new(),
        (_, SortOrder::DependencyCount) => format!(" (dependencies: {})", row.dependency_count),
        (_, SortOrder::UsedInCount) => format!(" (used in: {})", row.used_in_count),
        (Category::Scripts, _) => format!(" (dependencies: {})", row.dependency_count),
        _ => format!(
            " (dependencies: {} / used in: {})",
            row.dependency_count, row.used_in_count
        ),
    };
    format!("{} {:>50}{}  [{}]", marker, row.name, counts, row.id)
}

fn print_graph(library: &Library, query: &str, json: bool) {
    let file = find_or_exit(library, query);
    let element = library.project(file);

    if json {
        let view = element.to_view();
        let text = serde_json::to_string_pretty(&view)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
        println!("{}", text);
        return;
    }

    println!("{} [{}]", file.name(), file.handle().id);
    println!("  depends on:");
    if element.dependencies.is_empty() {
        println!("    (nothing in the library)");
    }
    for dep in &element.dependencies {
        println!("    -> {} [{}]", dep.name(), dep.handle().id);
    }
    if file.is_custom_node() {
        println!("  used in:");
        if element.used_in.is_empty() {
            println!("    (nothing)");
        }
        for user in &element.used_in {
            println!("    <- {} [{}]", user.name(), user.handle().id);
        }
    }
}

fn print_file(library: &Library, query: &str) {
    let file = find_or_exit(library, query);

    println!("--- {} ---", file.name());
    println!("Id:           {}", file.handle().id);
    println!("Uuid:         {}", file.uuid());
    if !file.categories().is_empty() {
        println!("Category:     {}", file.categories().join(" > "));
    }
    println!("Nodes:        {}", file.nodes().len());
    println!("Dependencies: {}", file.dependencies().len());

    for group in file.groups() {
        println!("\nGroup '{}' ({} nodes)", group.name, group.members.len());
        for node in group.member_nodes(file.nodes()) {
            println!("  - {}", node.name());
        }
    }

    for node in file.custom_node_instances() {
        if let Some(package) = node.package().filter(|package| !package.is_unknown()) {
            println!("\nCustom node '{}' from {}", node.name(), package);
        }
    }

    for node in file.code_nodes() {
        if let Some((code, engine)) = node.code() {
            let group = file
                .group_of(node)
                .map(|group| format!(" in '{}'", group.name))
                .unwrap_or_default();
            println!("\n>>> {} [{}]{}", node.name(), engine, group);
            println!("{}", code);
        }
    }
}

fn print_failures(library: &Library) {
    println!("--- Failures ({}) ---", library.failures().len());
    for failure in library.failures() {
        println!("{}: {}", failure.handle.id, failure.error);
    }

    println!("\n--- Ambiguous custom nodes ({}) ---", library.ambiguous().len());
    for entry in library.ambiguous() {
        println!("{}", entry.uuid);
        for handle in &entry.files {
            println!("  {}", handle.id);
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
