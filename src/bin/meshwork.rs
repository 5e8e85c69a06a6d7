//! Meshwork CLI: scripted API walkthrough and exchange-format transcoding.
//!
//! Usage:
//!   meshwork demo [--lenient]
//!   meshwork convert --from matrix --to dict < matrix.json

use clap::{Parser, Subcommand, ValueEnum};
use meshwork::{builder, convert, Graph, GraphResult, Node, NodeId};
use serde_json::{json, Value};
use std::io::Read;

#[derive(Parser)]
#[command(
    name = "meshwork",
    version,
    about = "Directed graph container with exchange-format conversion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted walkthrough of the graph API
    Demo {
        /// Soft-fail mode: rejected mutations log a warning instead of erroring
        #[arg(long)]
        lenient: bool,
    },
    /// Read one exchange shape as JSON on stdin, write another on stdout
    Convert {
        /// Input shape
        #[arg(long = "from", value_enum)]
        from: Format,
        /// Output shape
        #[arg(long = "to", value_enum)]
        to: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Matrix,
    List,
    Dict,
}

fn cmd_demo(lenient: bool) -> i32 {
    match run_demo(lenient) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn run_demo(lenient: bool) -> GraphResult<()> {
    let mut graph: Graph<Value> = Graph::new();

    let a = graph.add_node(Node::new())?.expect("strict add yields an id");
    let b = graph.add_node(Node::new())?.expect("strict add yields an id");
    graph.add_edge(a, b, 5.0)?;

    for i in 0..5 {
        graph.add_node(Node::new().with_data(json!(i)))?;
    }

    // A candidate may cite its own not-yet-issued id alongside live ones.
    graph.add_node(Node::new().with_edge(0usize, 1.0).with_edge(5usize, 0.0))?;
    let tail = graph
        .add_node(Node::new().with_flag("tail"))?
        .expect("strict add yields an id");

    graph.add_edge(NodeId::new(7), NodeId::new(3), 0.0)?;
    graph.add_edge_symmetric(NodeId::new(7), tail, 5.0)?;
    graph.add_edge(tail, tail, 0.0)?;

    println!("nodes: {}  last id: {}", graph.node_count(), tail);
    println!("adjacency list: {:?}", convert::to_adjacency_list(&graph));

    graph.remove_node(NodeId::new(2))?;
    println!("after removing node 2:");
    println!("  nodes: {}  last id: {}", graph.node_count(), tail);
    let (dict, values) = convert::to_adjacency_dict_with_values(&graph);
    println!(
        "  adjacency dict: {}",
        serde_json::to_string(&dict).expect("adjacency shapes serialize to JSON")
    );
    println!(
        "  payloads: {}",
        serde_json::to_string(&values).expect("adjacency shapes serialize to JSON")
    );

    // Rebuild through the matrix shape; the retired id becomes an
    // explicit empty node.
    let matrix = vec![
        vec![Some(0.0), Some(1.0), Some(2.0)],
        vec![None, Some(4.0), Some(5.0)],
        vec![Some(6.0), None, Some(8.0)],
    ];
    let rebuilt: Graph<Value> = builder::from_adjacency_matrix(matrix)?;
    println!(
        "matrix-built graph as dict: {}",
        serde_json::to_string(&convert::to_adjacency_dict(&rebuilt))
            .expect("adjacency shapes serialize to JSON")
    );

    // Exercise the failure path against the retired id.
    graph.set_merciless(!lenient);
    match graph.add_edge(NodeId::new(2), a, 1.0) {
        Ok(applied) => println!("lenient add_edge on retired id: applied = {}", applied),
        Err(e) => println!("strict add_edge on retired id: {}", e),
    }

    Ok(())
}

fn cmd_convert(from: Format, to: Format) -> i32 {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("Error: failed to read stdin: {}", e);
        return 1;
    }
    let graph = match parse_graph(from, &input) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match render(to, &graph) {
        Ok(out) => {
            println!("{}", out);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn parse_graph(format: Format, input: &str) -> Result<Graph<Value>, String> {
    let graph = match format {
        Format::Matrix => {
            let matrix = serde_json::from_str(input).map_err(|e| format!("invalid matrix JSON: {}", e))?;
            builder::from_adjacency_matrix(matrix).map_err(|e| e.to_string())?
        }
        Format::List => {
            let list = serde_json::from_str(input).map_err(|e| format!("invalid list JSON: {}", e))?;
            builder::from_adjacency_list(list).map_err(|e| e.to_string())?
        }
        Format::Dict => {
            let dict = serde_json::from_str(input).map_err(|e| format!("invalid dict JSON: {}", e))?;
            builder::from_adjacency_dict(dict).map_err(|e| e.to_string())?
        }
    };
    Ok(graph)
}

fn render(format: Format, graph: &Graph<Value>) -> Result<String, String> {
    let out = match format {
        Format::Matrix => serde_json::to_string(&convert::to_adjacency_matrix(graph)),
        Format::List => serde_json::to_string(&convert::to_adjacency_list(graph)),
        Format::Dict => serde_json::to_string(&convert::to_adjacency_dict(graph)),
    };
    out.map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Demo { lenient } => cmd_demo(lenient),
        Commands::Convert { from, to } => cmd_convert(from, to),
    };
    std::process::exit(code);
}
