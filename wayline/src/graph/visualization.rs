//! Graph visualization utilities.
//!
//! Exports a compiled graph's structure to Graphviz DOT or a plain text listing
//! for debugging. Dynamic signals (`Goto`, `Repeat`) are not part of the edge
//! table and therefore not drawn.

use super::{CompiledGraph, Edge, END, START};

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('"', "\\\""))
}

/// Generate Graphviz DOT format representation of the graph.
///
/// Static edges are solid; branch candidates are dashed.
pub fn generate_dot(graph: &CompiledGraph) -> String {
    let mut dot = format!("digraph {} {{\n", quote(graph.name()));
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box];\n\n");

    dot.push_str(&format!(
        "  {} [label=\"START\", style=bold, fillcolor=lightgreen];\n",
        quote(START)
    ));
    dot.push_str(&format!(
        "  {} [label=\"END\", style=bold, fillcolor=lightcoral];\n",
        quote(END)
    ));
    for id in graph.node_ids() {
        if graph.terminals().contains(id) {
            dot.push_str(&format!("  {} [peripheries=2];\n", quote(id)));
        } else {
            dot.push_str(&format!("  {};\n", quote(id)));
        }
    }
    dot.push('\n');

    dot.push_str(&format!(
        "  {} -> {};\n",
        quote(START),
        quote(graph.entry())
    ));
    for id in graph.node_ids() {
        match graph.edges().get(id) {
            Some(Edge::To(to)) => {
                dot.push_str(&format!("  {} -> {};\n", quote(id), quote(to)));
            }
            Some(Edge::Branch(router)) => {
                for target in router.candidates() {
                    dot.push_str(&format!(
                        "  {} -> {} [style=dashed];\n",
                        quote(id),
                        quote(target)
                    ));
                }
            }
            Some(Edge::End) | None => {
                dot.push_str(&format!("  {} -> {};\n", quote(id), quote(END)));
            }
        }
    }

    dot.push_str("}\n");
    dot
}

/// Generate a simple text representation of the graph structure.
pub fn generate_text(graph: &CompiledGraph) -> String {
    let mut text = format!("Graph: {}\n", graph.name());
    text.push_str(&format!("Nodes: {}\n", graph.node_ids().len()));
    text.push_str(&format!("Entry: {}\n", graph.entry()));
    text.push_str(&format!("Max iterations: {}\n", graph.limits().max_iterations()));

    text.push_str("\nEdges:\n");
    text.push_str(&format!("  {} -> {}\n", START, graph.entry()));
    for id in graph.node_ids() {
        let line = match graph.edges().get(id) {
            Some(Edge::To(to)) => format!("  {} -> {}\n", id, to),
            Some(Edge::Branch(router)) => {
                format!("  {} -> one of [{}]\n", id, router.candidates().join(", "))
            }
            Some(Edge::End) | None => format!("  {} -> {}\n", id, END),
        };
        text.push_str(&line);
    }

    text
}
