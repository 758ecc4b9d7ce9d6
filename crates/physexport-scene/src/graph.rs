//! Scene graph access for the exporter.
//!
//! [`SceneGraph`] is the seam between the host that owns the scene and the
//! export pipeline. [`Scene`] is an owned implementation backed by a node list
//! and a name index, loadable from a JSON scene description.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use physexport_core::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::node::SceneNode;

/// Gravity used when a scene description does not set one
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, 0.0, -9.81];

/// Read-only view of a scene
pub trait SceneGraph {
    /// Scene gravity vector
    fn gravity(&self) -> Vec3;

    /// All nodes in a stable traversal order
    fn nodes(&self) -> Box<dyn Iterator<Item = &SceneNode> + '_>;

    /// Look a node up by name
    fn find(&self, name: &str) -> Option<&SceneNode>;

    /// Number of nodes
    fn node_count(&self) -> usize {
        self.nodes().count()
    }
}

/// On-disk layout of a scene
#[derive(Debug, Serialize, Deserialize)]
struct SceneDescription {
    #[serde(default = "default_gravity")]
    gravity: [f32; 3],
    #[serde(default)]
    nodes: Vec<SceneNode>,
}

fn default_gravity() -> [f32; 3] {
    DEFAULT_GRAVITY
}

/// Owned scene graph
#[derive(Debug, Clone)]
pub struct Scene {
    gravity: Vec3,
    nodes: Vec<SceneNode>,
    /// Node name to index mapping
    index: HashMap<String, usize>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a scene from nodes, checking names and parent references
    pub fn from_nodes(gravity: Vec3, nodes: Vec<SceneNode>) -> SceneResult<Self> {
        let mut scene = Self::new(gravity);
        for node in nodes {
            scene.add_node(node)?;
        }
        scene.validate_hierarchy()?;
        Ok(scene)
    }

    /// Add a node at the end of the traversal order
    pub fn add_node(&mut self, node: SceneNode) -> SceneResult<usize> {
        if self.index.contains_key(&node.name) {
            return Err(SceneError::DuplicateNode(node.name));
        }

        let invalid = |source| SceneError::InvalidValue {
            node: node.name.clone(),
            source,
        };
        if let Some(body) = &node.rigid_body {
            body.validate().map_err(invalid)?;
        }
        if let Some(pose) = &node.armature_pose {
            pose.validate().map_err(invalid)?;
        }

        let idx = self.nodes.len();
        self.index.insert(node.name.clone(), idx);
        self.nodes.push(node);
        Ok(idx)
    }

    /// Check every parent reference resolves to another node
    pub fn validate_hierarchy(&self) -> SceneResult<()> {
        for node in &self.nodes {
            if let Some(parent) = &node.parent {
                if parent == &node.name {
                    return Err(SceneError::SelfParent(node.name.clone()));
                }
                if !self.index.contains_key(parent) {
                    return Err(SceneError::UnknownParent {
                        node: node.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse a JSON scene description
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        Self::from_description(description)
    }

    /// Read a JSON scene description
    pub fn from_reader(reader: impl Read) -> SceneResult<Self> {
        let description: SceneDescription = serde_json::from_reader(reader)?;
        Self::from_description(description)
    }

    /// Load a JSON scene description from disk
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SceneError::FileNotFound(path.to_path_buf()));
        }

        let scene = Self::from_reader(BufReader::new(File::open(path)?))?;
        tracing::debug!(
            path = %path.display(),
            nodes = scene.nodes.len(),
            "Loaded scene description"
        );
        Ok(scene)
    }

    fn from_description(description: SceneDescription) -> SceneResult<Self> {
        let [x, y, z] = description.gravity;
        Self::from_nodes(Vec3::new(x, y, z), description.nodes)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Take the nodes out in traversal order
    pub fn into_nodes(self) -> Vec<SceneNode> {
        self.nodes
    }

    /// Counts of the physics data carried by the scene
    pub fn summary(&self) -> SceneSummary {
        let mut summary = SceneSummary {
            node_count: self.nodes.len(),
            ..Default::default()
        };

        for node in &self.nodes {
            if node.rigid_body.is_some() {
                summary.rigid_body_count += 1;
            }
            if let Some(constraint) = &node.rigid_body_constraint {
                summary.constraint_count += 1;
                *summary
                    .constraints_by_kind
                    .entry(constraint.kind.as_str().to_string())
                    .or_insert(0) += 1;
            }
            if let Some(pose) = &node.armature_pose {
                summary.armature_count += 1;
                summary.bone_constraint_count += pose.child_of_constraints().count();
            }
        }

        summary
    }
}

impl Default for Scene {
    fn default() -> Self {
        let [x, y, z] = DEFAULT_GRAVITY;
        Self::new(Vec3::new(x, y, z))
    }
}

impl SceneGraph for Scene {
    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &SceneNode> + '_> {
        Box::new(self.nodes.iter())
    }

    fn find(&self, name: &str) -> Option<&SceneNode> {
        self.index.get(name).map(|&idx| &self.nodes[idx])
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Overview of a scene's physics content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub node_count: usize,
    pub rigid_body_count: usize,
    pub constraint_count: usize,
    pub armature_count: usize,
    pub bone_constraint_count: usize,
    pub constraints_by_kind: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBody;

    #[test]
    fn test_find_by_name() {
        let scene = Scene::from_nodes(
            Vec3::zeros(),
            vec![SceneNode::new("A"), SceneNode::new("B")],
        )
        .unwrap();

        assert_eq!(scene.find("B").map(|n| n.name.as_str()), Some("B"));
        assert!(scene.find("C").is_none());
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn test_traversal_order_is_insertion_order() {
        let mut scene = Scene::default();
        for name in ["c", "a", "b"] {
            scene.add_node(SceneNode::new(name)).unwrap();
        }
        let names: Vec<_> = scene.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut scene = Scene::default();
        scene.add_node(SceneNode::new("A")).unwrap();
        assert!(matches!(
            scene.add_node(SceneNode::new("A")),
            Err(SceneError::DuplicateNode(name)) if name == "A"
        ));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let child = SceneNode::new("B").with_parent("Missing", Default::default(), Default::default());
        assert!(matches!(
            Scene::from_nodes(Vec3::zeros(), vec![child]),
            Err(SceneError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_negative_mass_rejected() {
        let node = SceneNode::new("A").with_rigid_body(RigidBody::default().with_mass(-2.0));
        assert!(matches!(
            Scene::default().add_node(node),
            Err(SceneError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_default_gravity() {
        let scene = Scene::from_json_str(r#"{ "nodes": [] }"#).unwrap();
        assert_eq!(scene.gravity(), Vec3::new(0.0, 0.0, -9.81));
        assert!(scene.is_empty());
    }
}
