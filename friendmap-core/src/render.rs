// Rendering of an assembled friend graph

use crate::error::{CoreError, Result};
use crate::graph::SocialGraph;
use crate::stats::compute_stats;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
    Dot,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "dot" | "graphviz" => Some(OutputFormat::Dot),
            _ => None,
        }
    }
}

/// Turns a finished graph into a document.
pub trait Renderer {
    fn render(&self, graph: &SocialGraph) -> Result<String>;
}

pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
        OutputFormat::Dot => Box::new(DotRenderer),
    }
}

pub fn render(graph: &SocialGraph, format: OutputFormat) -> Result<String> {
    renderer_for(format).render(graph)
}

/// Summary plus an adjacency list, root first.
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, graph: &SocialGraph) -> Result<String> {
        let stats = compute_stats(graph);
        let mut report = String::new();

        report.push_str(RULE);
        report.push('\n');
        report.push_str("                          FRIENDMAP GRAPH REPORT\n");
        report.push_str(RULE);
        report.push_str("\n\n");

        let root_label = graph.label(graph.root()).unwrap_or(graph.root());
        report.push_str(&format!("Root:            {} ({})\n", root_label, graph.root()));
        report.push_str(&format!("Profiles:        {}\n", stats.node_count));
        report.push_str(&format!("Friendships:     {}\n", stats.edge_count));
        report.push_str(&format!("Mutual links:    {}\n", stats.mutual_edges));
        report.push_str(&format!("Leaf friends:    {}\n", stats.leaf_count));
        if let Some((ref id, degree)) = stats.most_connected {
            let label = graph.label(id).unwrap_or(id);
            report.push_str(&format!("Most connected:  {} ({} links)\n", label, degree));
        }
        report.push('\n');

        report.push_str(RULE);
        report.push('\n');
        report.push_str("CONNECTIONS\n");
        report.push_str(RULE);
        report.push_str("\n\n");

        for node in graph.nodes() {
            report.push_str(&format!("{} [{}]\n", node.label, node.id));
            let neighbors = graph.neighbors(&node.id);
            if neighbors.is_empty() {
                report.push_str("  (no connections)\n");
            }
            for (i, neighbor) in neighbors.iter().enumerate() {
                let prefix = if i == neighbors.len() - 1 { "└── " } else { "├── " };
                let label = graph.label(neighbor).unwrap_or(neighbor);
                report.push_str(&format!("  {}{}\n", prefix, label));
            }
            report.push('\n');
        }

        Ok(report)
    }
}

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, graph: &SocialGraph) -> Result<String> {
        let edges: Vec<serde_json::Value> = graph
            .edges()
            .into_iter()
            .map(|(a, b)| serde_json::json!({ "source": a, "target": b }))
            .collect();

        let document = serde_json::json!({
            "metadata": {
                "generator": "Friendmap",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
            },
            "root": graph.root(),
            "nodes": graph.nodes(),
            "edges": edges,
            "summary": compute_stats(graph),
        });

        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Graphviz document for an external layout tool.
pub struct DotRenderer;

impl Renderer for DotRenderer {
    fn render(&self, graph: &SocialGraph) -> Result<String> {
        let mut dot = String::from("graph friendmap {\n");
        dot.push_str("  node [shape=ellipse, style=filled, fillcolor=skyblue];\n");
        dot.push_str("  edge [color=gray];\n");

        for node in graph.nodes() {
            let extra = if node.id == graph.root() {
                ", fillcolor=gold"
            } else {
                ""
            };
            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\"{}];\n",
                escape_dot(&node.id),
                escape_dot(&node.label),
                extra
            ));
        }
        for (a, b) in graph.edges() {
            dot.push_str(&format!("  \"{}\" -- \"{}\";\n", escape_dot(a), escape_dot(b)));
        }

        dot.push_str("}\n");
        Ok(dot)
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

pub fn save_output(content: &str, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .map_err(|e| CoreError::Render(format!("Cannot create {}: {}", path.display(), e)))?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
