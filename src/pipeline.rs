//! One generation run: discover, build, expand, select, sign and write.

use crate::builder::{BuiltComponent, NodeBuilder};
use crate::catalog::{LabelRegistry, NodeCatalog};
use crate::config::ProjectConfig;
use crate::construct;
use crate::core::{KeyAllocator, Node};
use crate::diagnostics::Diagnostics;
use crate::discovery::{ComponentSource, ExtractionUnit};
use crate::palette::{assemble, write_palette, Palette, PaletteHeader};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// All components in one palette file.
    #[default]
    Aggregate,
    /// One palette per extraction unit, written into a directory.
    Split,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub output: PathBuf,
    pub mode: OutputMode,
    /// Keep only components with this tag; empty keeps all.
    pub tag: String,
    pub project: ProjectConfig,
    pub author: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub nodes: usize,
    pub diagnostics: Diagnostics,
}

/// Nodes of a set of units, after construct expansion, dedup reporting and
/// tag selection. `labels` spans the whole run so repeats across units are
/// reported too.
pub fn build_nodes(
    units: &[ExtractionUnit],
    tag: &str,
    keys: &mut KeyAllocator,
    labels: &mut LabelRegistry,
    diagnostics: &mut Diagnostics,
) -> Vec<Node> {
    let mut built: Vec<BuiltComponent> = Vec::new();
    {
        let mut builder = NodeBuilder::new(keys, diagnostics);
        for unit in units {
            for component in &unit.components {
                if !component.is_substantive() {
                    log::debug!(
                        "Skipping {} in {}: no component data",
                        component.label().unwrap_or("<unlabelled>"),
                        component.origin
                    );
                    continue;
                }
                built.push(builder.build(component));
            }
        }
    }

    let expanded = construct::expand(built, keys, diagnostics);
    let mut catalog = NodeCatalog::new(labels);
    catalog.extend(expanded, diagnostics);
    catalog.select(tag)
}

/// Assemble one palette document for `nodes`.
pub fn palette_for(
    nodes: Vec<Node>,
    description: &str,
    path: &Path,
    request: &GenerationRequest,
) -> Result<Palette> {
    let file_path = path.display().to_string();
    let header = PaletteHeader {
        file_path: &file_path,
        description,
        project: &request.project,
        author: request.author.as_deref(),
        timestamp: request.timestamp,
    };
    assemble(nodes, &header).context("Failed to assemble palette")
}

fn unit_file_name(unit: &ExtractionUnit) -> String {
    format!("{}.palette", unit.name.replace(['.', ':'], "_"))
}

pub fn run(source: &dyn ComponentSource, request: &GenerationRequest) -> Result<GenerationReport> {
    let mut report = GenerationReport::default();
    let mut keys = KeyAllocator::new();
    let mut labels = LabelRegistry::new();

    log::info!("Discovering components from {}", source.describe());
    let units = source
        .discover(&mut report.diagnostics)
        .with_context(|| format!("Failed to discover components from {}", source.describe()))?;
    log::info!("Found {} extraction units", units.len());

    match request.mode {
        OutputMode::Aggregate => {
            let nodes = build_nodes(
                &units,
                &request.tag,
                &mut keys,
                &mut labels,
                &mut report.diagnostics,
            );
            let description = units.first().map(|u| u.description.as_str()).unwrap_or("");
            report.nodes = nodes.len();
            let palette = palette_for(nodes, description, &request.output, request)?;
            write_palette(&palette, &request.output)?;
            report.written.push(request.output.clone());
        }
        OutputMode::Split => {
            for unit in &units {
                let nodes = build_nodes(
                    std::slice::from_ref(unit),
                    &request.tag,
                    &mut keys,
                    &mut labels,
                    &mut report.diagnostics,
                );
                if nodes.is_empty() {
                    log::info!("No components in {}; not writing a palette", unit.name);
                    continue;
                }
                let path = request.output.join(unit_file_name(unit));
                report.nodes += nodes.len();
                let palette = palette_for(nodes, &unit.description, &path, request)?;
                write_palette(&palette, &path)?;
                report.written.push(path);
            }
        }
    }

    log::info!(
        "Generated {} components in {} palette(s) with {} warnings and {} failed units",
        report.nodes,
        report.written.len(),
        report.diagnostics.warning_count(),
        report.diagnostics.failure_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;
    use crate::discovery::{ComponentSignals, Signal};
    use tempfile::TempDir;

    struct FixedSource(Vec<ExtractionUnit>);

    impl ComponentSource for FixedSource {
        fn describe(&self) -> String {
            "fixed units".into()
        }

        fn discover(&self, _: &mut Diagnostics) -> Result<Vec<ExtractionUnit>> {
            Ok(self.0.clone())
        }
    }

    fn component(label: &str, tag: &str) -> ComponentSignals {
        let mut signals = ComponentSignals::new("test");
        signals.push(Signal::Label(label.into()));
        signals.push(Signal::Description("demo".into()));
        signals.push(Signal::Category("PythonApp".into()));
        signals.push(Signal::Tag(tag.into()));
        signals
    }

    fn unit(name: &str, components: Vec<ComponentSignals>) -> ExtractionUnit {
        ExtractionUnit {
            name: name.into(),
            description: format!("{} docs", name),
            components,
        }
    }

    fn request(output: PathBuf, mode: OutputMode) -> GenerationRequest {
        GenerationRequest {
            output,
            mode,
            tag: String::new(),
            project: ProjectConfig {
                name: "p".into(),
                version: "0.1".into(),
                repository: "p".into(),
            },
            author: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_build_nodes_skips_label_only_components() {
        let mut only_label = ComponentSignals::new("test");
        only_label.push(Signal::Label("Bare".into()));
        let units = vec![unit("m", vec![only_label, component("Real", "")])];

        let mut keys = KeyAllocator::new();
        let mut labels = LabelRegistry::new();
        let mut diagnostics = Diagnostics::new();
        let nodes = build_nodes(&units, "", &mut keys, &mut labels, &mut diagnostics);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text, "Real");
    }

    #[test]
    fn test_aggregate_writes_one_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("all.palette");
        let source = FixedSource(vec![
            unit("a", vec![component("A", "")]),
            unit("b", vec![component("B", "")]),
        ]);

        let report = run(&source, &request(output.clone(), OutputMode::Aggregate)).unwrap();
        assert_eq!(report.written, vec![output]);
        assert_eq!(report.nodes, 2);
    }

    #[test]
    fn test_split_writes_one_file_per_unit() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource(vec![
            unit("pkg.a", vec![component("A", "")]),
            unit("pkg.empty", vec![]),
            unit("pkg.b", vec![component("B", "")]),
        ]);

        let report = run(&source, &request(dir.path().to_path_buf(), OutputMode::Split)).unwrap();
        assert_eq!(
            report.written,
            vec![dir.path().join("pkg_a.palette"), dir.path().join("pkg_b.palette")]
        );
    }

    #[test]
    fn test_split_reports_duplicate_labels_across_units() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource(vec![
            unit("pkg.a", vec![component("Same", "")]),
            unit("pkg.b", vec![component("Same", "")]),
        ]);

        let report = run(&source, &request(dir.path().to_path_buf(), OutputMode::Split)).unwrap();
        assert_eq!(report.nodes, 2);
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.diagnostics.count(WarningKind::DuplicateLabel), 1);
    }
}
