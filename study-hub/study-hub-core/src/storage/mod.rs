pub mod tree;
pub mod tree_store;

pub use tree::{
    MaterialSource, MaterialsTree, NewMaterial, Node, NodeKind, NodeRecord, NodeUpdate,
    SourceFields, SourceKind, TreeDocument, MAX_DEPTH, ROOT_ID,
};
pub use tree_store::TreeStore;
