//! The palette document: header plus node list.

use super::signature::BlockDag;
use crate::config::ProjectConfig;
use crate::core::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const GENERATOR_NAME: &str = env!("CARGO_PKG_NAME");
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: &str = "AppRef";
pub const FILE_TYPE: &str = "Palette";
const DEFAULT_AUTHOR: &str = "palettegen";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelData {
    pub file_path: String,
    pub file_type: String,
    pub short_description: String,
    pub detailed_description: String,
    pub repo_service: String,
    pub repo_branch: String,
    pub repo: String,
    pub generator_name: String,
    pub generator_version: String,
    pub generator_commit_hash: String,
    pub schema_version: String,
    pub readonly: bool,
    pub repository_url: String,
    pub commit_hash: String,
    pub download_url: String,
    pub signature: String,
    pub last_modified_name: String,
    pub last_modified_email: String,
    /// Seconds since the Unix epoch.
    pub last_modified_datetime: f64,
    #[serde(rename = "numLGNodes")]
    pub num_lg_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub model_data: ModelData,
    pub node_data_array: Vec<Node>,
    pub link_data_array: Vec<Value>,
}

/// Per-document inputs that do not come from the nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteHeader<'a> {
    pub file_path: &'a str,
    pub description: &'a str,
    pub project: &'a ProjectConfig,
    pub author: Option<&'a str>,
    pub timestamp: DateTime<Utc>,
}

fn epoch_seconds(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.timestamp_millis() as f64 / 1000.0
}

/// Assemble a signed palette from accepted nodes.
///
/// Empty repository and commit fields on nodes take the project defaults,
/// and every node is stamped with its data hash.
pub fn assemble(mut nodes: Vec<Node>, header: &PaletteHeader<'_>) -> serde_json::Result<Palette> {
    for node in &mut nodes {
        if node.repository_url.is_empty() {
            node.repository_url = header.project.repository.clone();
        }
        if node.commit_hash.is_empty() {
            node.commit_hash = header.project.version.clone();
        }
    }

    let dag = BlockDag::build(&nodes, &[])?;
    for (position, node) in nodes.iter_mut().enumerate() {
        if let Some(block) = dag.block(position) {
            node.data_hash = block.data_hash.clone();
        }
    }

    let model_data = ModelData {
        file_path: header.file_path.to_string(),
        file_type: FILE_TYPE.to_string(),
        short_description: String::new(),
        detailed_description: header.description.trim().to_string(),
        repo_service: String::new(),
        repo_branch: String::new(),
        repo: String::new(),
        generator_name: GENERATOR_NAME.to_string(),
        generator_version: GENERATOR_VERSION.to_string(),
        generator_commit_hash: String::new(),
        schema_version: SCHEMA_VERSION.to_string(),
        readonly: true,
        repository_url: header.project.repository.clone(),
        commit_hash: header.project.version.clone(),
        download_url: String::new(),
        signature: dag.signature(),
        last_modified_name: header.author.unwrap_or(DEFAULT_AUTHOR).to_string(),
        last_modified_email: String::new(),
        last_modified_datetime: epoch_seconds(&header.timestamp),
        num_lg_nodes: nodes.len(),
    };

    Ok(Palette {
        model_data,
        node_data_array: nodes,
        link_data_array: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, NodeKey};
    use chrono::TimeZone;

    fn project() -> ProjectConfig {
        ProjectConfig {
            name: "proj".into(),
            version: "1.2".into(),
            repository: "https://example.org/proj".into(),
        }
    }

    fn header(project: &ProjectConfig) -> PaletteHeader<'_> {
        PaletteHeader {
            file_path: "out.palette",
            description: "  Tools. \n",
            project,
            author: None,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_header_and_node_defaults() {
        let project = project();
        let mut custom = Node::new(NodeKey(2), Category::PythonApp, "B");
        custom.repository_url = "https://other".into();
        let nodes = vec![Node::new(NodeKey(1), Category::PythonApp, "A"), custom];

        let palette = assemble(nodes, &header(&project)).unwrap();
        let data = &palette.model_data;
        assert_eq!(data.num_lg_nodes, 2);
        assert_eq!(data.detailed_description, "Tools.");
        assert_eq!(data.commit_hash, "1.2");
        assert_eq!(data.last_modified_datetime, 1_704_067_200.0);
        assert_eq!(data.signature.len(), 64);

        assert_eq!(palette.node_data_array[0].repository_url, "https://example.org/proj");
        assert_eq!(palette.node_data_array[1].repository_url, "https://other");
        assert_eq!(palette.node_data_array[0].commit_hash, "1.2");
        assert!(!palette.node_data_array[0].data_hash.is_empty());
    }

    #[test]
    fn test_header_serializes_editor_names() {
        let project = project();
        let palette = assemble(Vec::new(), &header(&project)).unwrap();
        let value = serde_json::to_value(&palette).unwrap();

        assert_eq!(value["modelData"]["numLGNodes"], 0);
        assert_eq!(value["modelData"]["schemaVersion"], "AppRef");
        assert_eq!(value["modelData"]["fileType"], "Palette");
        assert!(value["linkDataArray"].as_array().unwrap().is_empty());
    }
}
