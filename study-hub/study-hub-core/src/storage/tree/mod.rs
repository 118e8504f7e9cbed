//! Folder/material tree kept as an arena of nodes.
//!
//! Every node is stored once in a map keyed by its id. Folders hold the ordered
//! ids of their children and every node except the root holds the id of its
//! parent; both links are always updated together. On disk and over HTTP the
//! tree travels as a single nested [`TreeDocument`] rooted at [`ROOT_ID`].

use crate::error::{Result, StoreError};
use crate::ids;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Id of the single, undeletable root folder.
pub const ROOT_ID: &str = "root";
const ROOT_NAME: &str = "root";

/// Deepest level a node may sit at, the root being level 0. Each level costs
/// the JSON document two nesting levels, which keeps the persisted tree well
/// inside what `serde_json` will parse back.
pub const MAX_DEPTH: usize = 48;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Material,
}

impl NodeKind {
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Material => "material",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Link,
}

/// Where a material's content lives. A material is either a link or a stored
/// upload, never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaterialSource {
    Link {
        url: String,
    },
    File {
        file_path: String,
        file_name: String,
        file_size: u64,
    },
}

impl MaterialSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            MaterialSource::Link { .. } => SourceKind::Link,
            MaterialSource::File { .. } => SourceKind::File,
        }
    }

    /// Build a source from loosely populated request or document fields.
    ///
    /// Exactly one of `url` and `file_path` must be non-blank. When `is_file`
    /// is given it must agree with the populated field.
    pub fn from_fields(fields: &SourceFields) -> Result<Self> {
        let url = non_blank(fields.url.as_deref());
        let file_path = non_blank(fields.file_path.as_deref());
        match (url, file_path) {
            (Some(_), Some(_)) => Err(StoreError::Validation(
                "a material cannot have both a url and a file".to_string(),
            )),
            (None, None) if fields.is_file == Some(true) => Err(StoreError::Validation(
                "filePath is required for file materials".to_string(),
            )),
            (None, None) => Err(StoreError::Validation(
                "url is required for link materials".to_string(),
            )),
            (Some(_), None) if fields.is_file == Some(true) => Err(StoreError::Validation(
                "filePath is required for file materials".to_string(),
            )),
            (Some(url), None) => Ok(MaterialSource::Link {
                url: url.to_string(),
            }),
            (None, Some(_)) if fields.is_file == Some(false) => Err(StoreError::Validation(
                "url is required for link materials".to_string(),
            )),
            (None, Some(path)) => Ok(MaterialSource::File {
                file_path: path.to_string(),
                file_name: non_blank(fields.file_name.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| file_name_of(path)),
                file_size: fields.file_size.unwrap_or(0),
            }),
        }
    }
}

/// The discriminant fields of a material as they arrive from clients or from
/// the persisted document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceFields {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub is_file: Option<bool>,
}

impl SourceFields {
    pub fn link(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn file(path: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            file_path: Some(path.into()),
            file_name: Some(name.into()),
            file_size: Some(size),
            is_file: Some(true),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Material {
    pub material_type: String,
    pub source: MaterialSource,
    pub description: String,
    pub date_added: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeBody {
    Folder { children: Vec<String> },
    Material(Material),
}

/// A single entry of the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: String,
    name: String,
    parent_id: Option<String>,
    body: NodeBody,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Folder { .. } => NodeKind::Folder,
            NodeBody::Material(_) => NodeKind::Material,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    /// Ordered child ids; empty for materials.
    pub fn children(&self) -> &[String] {
        match &self.body {
            NodeBody::Folder { children } => children,
            NodeBody::Material(_) => &[],
        }
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.body {
            NodeBody::Material(m) => Some(m),
            NodeBody::Folder { .. } => None,
        }
    }
}

/// Input for [`MaterialsTree::add_material`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewMaterial {
    pub name: String,
    pub material_type: String,
    pub description: String,
    pub source: SourceFields,
}

/// Partial update; blank or missing fields leave the node untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Nested wire form of a node, used for the persisted document and API
/// responses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<SourceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
}

/// The persisted document: `{ "root": Node }`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeDocument {
    pub root: NodeRecord,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialsTree {
    nodes: HashMap<String, Node>,
}

impl Default for MaterialsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialsTree {
    /// A tree holding only an empty root folder.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_ID.to_string(),
            Node {
                id: ROOT_ID.to_string(),
                name: ROOT_NAME.to_string(),
                parent_id: None,
                body: NodeBody::Folder {
                    children: Vec::new(),
                },
            },
        );
        Self { nodes }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().children().is_empty()
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT_ID]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// The folder whose children contain `id`. `None` for the root and for
    /// unknown ids.
    pub fn find_parent(&self, id: &str) -> Option<&Node> {
        let parent_id = self.nodes.get(id)?.parent_id.as_deref()?;
        self.nodes
            .get(parent_id)
            .filter(|parent| parent.children().iter().any(|c| c == id))
    }

    /// `id` followed by every node in its subtree, in pre-order. Empty when
    /// `id` is unknown.
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children().iter().rev().cloned());
                out.push(current);
            }
        }
        out
    }

    pub fn add_folder(&mut self, parent_id: &str, name: &str) -> Result<String> {
        self.require_folder(parent_id)?;
        let name = required_name(name)?;
        self.require_room(parent_id, 1)?;
        let id = self.fresh_id(NodeKind::Folder);
        self.attach(
            parent_id,
            Node {
                id: id.clone(),
                name,
                parent_id: Some(parent_id.to_string()),
                body: NodeBody::Folder {
                    children: Vec::new(),
                },
            },
        );
        info!(id = %id, parent = %parent_id, "folder created");
        Ok(id)
    }

    pub fn add_material(&mut self, parent_id: &str, material: NewMaterial) -> Result<String> {
        self.require_folder(parent_id)?;
        let name = required_name(&material.name)?;
        let source = MaterialSource::from_fields(&material.source)?;
        self.require_room(parent_id, 1)?;
        let id = self.fresh_id(NodeKind::Material);
        let kind = source.kind();
        self.attach(
            parent_id,
            Node {
                id: id.clone(),
                name,
                parent_id: Some(parent_id.to_string()),
                body: NodeBody::Material(Material {
                    material_type: material.material_type,
                    source,
                    description: material.description,
                    date_added: Utc::now().format("%Y-%m-%d").to_string(),
                }),
            },
        );
        info!(id = %id, parent = %parent_id, source = ?kind, "material created");
        Ok(id)
    }

    /// Apply the non-blank fields of `update`. Material-only fields are
    /// ignored on folders.
    pub fn update_node(&mut self, id: &str, update: &NodeUpdate) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let url = non_blank(update.url.as_deref());
        let file_path = non_blank(update.file_path.as_deref());
        if node.kind() == NodeKind::Material && url.is_some() && file_path.is_some() {
            return Err(StoreError::Validation(
                "a material cannot have both a url and a file".to_string(),
            ));
        }

        if let Some(name) = non_blank(update.name.as_deref()) {
            node.name = name.to_string();
        }
        if let NodeBody::Material(material) = &mut node.body {
            if let Some(material_type) = non_blank(update.material_type.as_deref()) {
                material.material_type = material_type.to_string();
            }
            if let Some(description) = non_blank(update.description.as_deref()) {
                material.description = description.to_string();
            }
            let file_name = non_blank(update.file_name.as_deref());
            match (url, file_path) {
                (Some(url), _) => {
                    material.source = MaterialSource::Link {
                        url: url.to_string(),
                    };
                }
                (None, Some(path)) => {
                    material.source = MaterialSource::File {
                        file_path: path.to_string(),
                        file_name: file_name
                            .map(str::to_string)
                            .unwrap_or_else(|| file_name_of(path)),
                        file_size: update.file_size.unwrap_or(0),
                    };
                }
                (None, None) => {
                    if let MaterialSource::File {
                        file_name: current_name,
                        file_size: current_size,
                        ..
                    } = &mut material.source
                    {
                        if let Some(name) = file_name {
                            *current_name = name.to_string();
                        }
                        if let Some(size) = update.file_size {
                            *current_size = size;
                        }
                    }
                }
            }
        }
        info!(id = %id, "node updated");
        Ok(())
    }

    /// Remove `id` and its whole subtree, returning the removed nodes.
    ///
    /// Uploaded files referenced by removed materials stay on disk.
    pub fn delete_node(&mut self, id: &str) -> Result<Vec<Node>> {
        if id == ROOT_ID {
            return Err(StoreError::Forbidden(
                "the root folder cannot be deleted".to_string(),
            ));
        }
        let parent_id = self
            .nodes
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .parent_id
            .clone()
            .ok_or_else(|| StoreError::Corrupt(format!("node {} has no parent", id)))?;

        if let Some(siblings) = self.children_mut(&parent_id) {
            siblings.retain(|c| c != id);
        }
        let removed: Vec<Node> = self
            .descendant_ids(id)
            .into_iter()
            .filter_map(|d| self.nodes.remove(&d))
            .collect();
        info!(id = %id, removed = removed.len(), "node deleted");
        Ok(removed)
    }

    /// Re-parent `id` under `new_parent_id`, appending it to the new parent's
    /// children.
    pub fn move_node(&mut self, id: &str, new_parent_id: &str) -> Result<()> {
        if id == ROOT_ID {
            return Err(StoreError::Forbidden(
                "the root folder cannot be moved".to_string(),
            ));
        }
        let old_parent = match self.nodes.get(id) {
            Some(node) => node.parent_id.clone(),
            None => return Err(StoreError::NotFound(id.to_string())),
        };
        let target_is_folder = match self.nodes.get(new_parent_id) {
            Some(target) => target.is_folder(),
            None => {
                return Err(StoreError::InvalidParent(format!(
                    "destination folder {} not found",
                    new_parent_id
                )))
            }
        };
        if id == new_parent_id {
            if !target_is_folder {
                return Err(StoreError::InvalidParent(format!(
                    "destination {} is not a folder",
                    new_parent_id
                )));
            }
            return Err(StoreError::Validation(
                "a node cannot be moved into itself".to_string(),
            ));
        }
        // a target inside the moved subtree would detach it from the root
        if self.descendant_ids(id).iter().any(|d| d == new_parent_id) {
            return Err(StoreError::Cycle {
                id: id.to_string(),
                target: new_parent_id.to_string(),
            });
        }
        if !target_is_folder {
            return Err(StoreError::InvalidParent(format!(
                "destination {} is not a folder",
                new_parent_id
            )));
        }
        self.require_room(new_parent_id, self.height(id) + 1)?;

        if let Some(pid) = old_parent.as_deref() {
            if let Some(siblings) = self.children_mut(pid) {
                siblings.retain(|c| c != id);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent_id = Some(new_parent_id.to_string());
        }
        if let Some(children) = self.children_mut(new_parent_id) {
            children.push(id.to_string());
        }
        info!(
            id = %id,
            from = old_parent.as_deref().unwrap_or_default(),
            to = %new_parent_id,
            "node moved"
        );
        Ok(())
    }

    /// Verify the structural invariants: a single folder root, symmetric
    /// parent/child links, every node reachable exactly once from the root,
    /// and a populated discriminant on every material.
    pub fn check_invariants(&self) -> Result<()> {
        let root = self
            .nodes
            .get(ROOT_ID)
            .ok_or_else(|| StoreError::Corrupt("root folder missing".to_string()))?;
        if !root.is_folder() || root.parent_id.is_some() {
            return Err(StoreError::Corrupt(
                "root must be a folder without a parent".to_string(),
            ));
        }

        for node in self.nodes.values() {
            if let Some(material) = node.material() {
                let populated = match &material.source {
                    MaterialSource::Link { url } => !url.trim().is_empty(),
                    MaterialSource::File { file_path, .. } => !file_path.trim().is_empty(),
                };
                if !populated {
                    return Err(StoreError::Corrupt(format!(
                        "material {} has no url or file",
                        node.id
                    )));
                }
            }
            if node.id == ROOT_ID {
                continue;
            }
            let parent = node
                .parent_id
                .as_deref()
                .and_then(|pid| self.nodes.get(pid))
                .ok_or_else(|| StoreError::Corrupt(format!("node {} has no parent", node.id)))?;
            let links = parent.children().iter().filter(|c| **c == node.id).count();
            if links != 1 {
                return Err(StoreError::Corrupt(format!(
                    "node {} is listed {} times by its parent {}",
                    node.id, links, parent.id
                )));
            }
        }

        let mut seen = HashSet::new();
        let mut stack = vec![ROOT_ID];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                return Err(StoreError::Corrupt(format!(
                    "node {} is reachable twice",
                    current
                )));
            }
            let node = self
                .nodes
                .get(current)
                .ok_or_else(|| StoreError::Corrupt(format!("dangling child {}", current)))?;
            for child in node.children() {
                stack.push(child.as_str());
            }
        }
        if seen.len() != self.nodes.len() {
            return Err(StoreError::Corrupt(format!(
                "{} nodes are not reachable from the root",
                self.nodes.len() - seen.len()
            )));
        }
        Ok(())
    }

    /// Nested record for `id` and everything below it.
    pub fn to_record(&self, id: &str) -> Option<NodeRecord> {
        let node = self.nodes.get(id)?;
        let mut record = NodeRecord {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind(),
            parent_id: node.parent_id.clone(),
            children: None,
            material_type: None,
            source_kind: None,
            url: None,
            file_path: None,
            file_name: None,
            file_size: None,
            description: None,
            date_added: None,
        };
        match &node.body {
            NodeBody::Folder { children } => {
                record.children = Some(
                    children
                        .iter()
                        .filter_map(|child| self.to_record(child))
                        .collect(),
                );
            }
            NodeBody::Material(material) => {
                record.material_type = Some(material.material_type.clone()).filter(|s| !s.is_empty());
                record.description = Some(material.description.clone()).filter(|s| !s.is_empty());
                record.date_added = Some(material.date_added.clone()).filter(|s| !s.is_empty());
                record.source_kind = Some(material.source.kind());
                match &material.source {
                    MaterialSource::Link { url } => record.url = Some(url.clone()),
                    MaterialSource::File {
                        file_path,
                        file_name,
                        file_size,
                    } => {
                        record.file_path = Some(file_path.clone());
                        record.file_name = Some(file_name.clone());
                        record.file_size = Some(*file_size);
                    }
                }
            }
        }
        Some(record)
    }

    pub fn to_document(&self) -> TreeDocument {
        TreeDocument {
            root: self
                .to_record(ROOT_ID)
                .expect("materials tree always holds a root"),
        }
    }

    /// Rebuild the arena from a nested document. Parent ids are taken from
    /// the nesting rather than from the stored `parentId` fields.
    pub fn from_document(document: TreeDocument) -> Result<Self> {
        if document.root.id != ROOT_ID || document.root.kind != NodeKind::Folder {
            return Err(StoreError::Corrupt(format!(
                "document root must be the folder {:?}",
                ROOT_ID
            )));
        }
        let mut nodes = HashMap::new();
        let mut stack = vec![(document.root, None::<String>)];
        while let Some((record, parent_id)) = stack.pop() {
            if record.id.trim().is_empty() {
                return Err(StoreError::Corrupt("node without an id".to_string()));
            }
            if nodes.contains_key(&record.id) {
                return Err(StoreError::Corrupt(format!("duplicate node id {}", record.id)));
            }
            if parent_id.is_some() && record.id == ROOT_ID {
                return Err(StoreError::Corrupt("root folder nested below itself".to_string()));
            }
            let children = record.children.unwrap_or_default();
            let body = match record.kind {
                NodeKind::Folder => NodeBody::Folder {
                    children: children.iter().map(|c| c.id.clone()).collect(),
                },
                NodeKind::Material => {
                    if !children.is_empty() {
                        return Err(StoreError::Corrupt(format!(
                            "material {} has children",
                            record.id
                        )));
                    }
                    let fields = SourceFields {
                        url: record.url,
                        file_path: record.file_path,
                        file_name: record.file_name,
                        file_size: record.file_size,
                        is_file: record.source_kind.map(|k| k == SourceKind::File),
                    };
                    let source = MaterialSource::from_fields(&fields).map_err(|e| {
                        StoreError::Corrupt(format!("material {}: {}", record.id, e))
                    })?;
                    NodeBody::Material(Material {
                        material_type: record.material_type.unwrap_or_default(),
                        source,
                        description: record.description.unwrap_or_default(),
                        date_added: record.date_added.unwrap_or_default(),
                    })
                }
            };
            for child in children.into_iter().rev() {
                stack.push((child, Some(record.id.clone())));
            }
            nodes.insert(
                record.id.clone(),
                Node {
                    id: record.id,
                    name: record.name,
                    parent_id,
                    body,
                },
            );
        }
        let tree = Self { nodes };
        tree.check_invariants()?;
        Ok(tree)
    }

    /// Level of `id` below the root; 0 for the root and for unknown ids.
    pub fn depth(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(|n| n.parent_id.as_deref());
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes.get(parent).and_then(|n| n.parent_id.as_deref());
        }
        depth
    }

    /// Levels below `id` in its subtree; 0 for a leaf.
    fn height(&self, id: &str) -> usize {
        let base = self.depth(id);
        self.descendant_ids(id)
            .iter()
            .map(|d| self.depth(d) - base)
            .max()
            .unwrap_or(0)
    }

    /// Fails with `Validation` when `levels` more levels under `parent_id`
    /// would pass [`MAX_DEPTH`].
    fn require_room(&self, parent_id: &str, levels: usize) -> Result<()> {
        if self.depth(parent_id) + levels > MAX_DEPTH {
            return Err(StoreError::Validation(format!(
                "folders cannot nest more than {} levels deep",
                MAX_DEPTH
            )));
        }
        Ok(())
    }

    fn require_folder(&self, id: &str) -> Result<()> {
        match self.nodes.get(id) {
            Some(node) if node.is_folder() => Ok(()),
            Some(_) => Err(StoreError::InvalidParent(format!("{} is not a folder", id))),
            None => Err(StoreError::InvalidParent(format!(
                "parent folder {} not found",
                id
            ))),
        }
    }

    fn children_mut(&mut self, id: &str) -> Option<&mut Vec<String>> {
        match self.nodes.get_mut(id).map(|n| &mut n.body) {
            Some(NodeBody::Folder { children }) => Some(children),
            _ => None,
        }
    }

    fn attach(&mut self, parent_id: &str, node: Node) {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        if let Some(children) = self.children_mut(parent_id) {
            children.push(id);
        }
    }

    fn fresh_id(&self, kind: NodeKind) -> String {
        loop {
            let id = ids::node_id(kind.id_prefix());
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_name(name: &str) -> Result<String> {
    non_blank(Some(name))
        .map(str::to_string)
        .ok_or_else(|| StoreError::Validation("name is required".to_string()))
}

fn file_name_of(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(path)
        .to_string()
}
