// src/core/projection.rs

//! Projection of a command node into the display tree.
//!
//! The tree is arena-stored: every item lives in one `Vec`, addressed by
//! index. Parent links are plain lookup keys, never owning pointers, so the
//! whole arena drops in one piece when a refresh replaces it.

use crate::models::CommandNode;

pub type ItemId = usize;

/// Whether the rendered item gets an expander.
///
/// Fixed at construction time: expanded iff the node has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseState {
    None,
    Expanded,
}

/// Which context-action family applies to the item. A node carrying both a
/// command and children is tagged `Runnable`: the executable command wins
/// for context purposes while the children stay navigable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Runnable,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub id: ItemId,
    pub parent: Option<ItemId>,
    /// Owned children, in manifest order.
    pub children: Vec<ItemId>,
    pub label: String,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub collapse: CollapseState,
    pub kind: ItemKind,
    /// The schema fragment the item was projected from; the run and edit
    /// actions read it back.
    pub node: CommandNode,
}

/// One projected section tree. Discarded and rebuilt wholesale per refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeArena {
    items: Vec<TreeItem>,
}

impl TreeArena {
    pub fn root(&self) -> Option<&TreeItem> {
        self.items.first()
    }

    pub fn item(&self, id: ItemId) -> Option<&TreeItem> {
        self.items.get(id)
    }

    pub fn parent(&self, id: ItemId) -> Option<&TreeItem> {
        self.item(id).and_then(|item| item.parent).and_then(|p| self.item(p))
    }

    pub fn children(&self, id: ItemId) -> Vec<&TreeItem> {
        self.item(id)
            .map(|item| item.children.iter().filter_map(|&c| self.item(c)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolves a `/`-separated label path.
    ///
    /// The empty path is the root item. The first component may name the
    /// root itself (the panel shows the root as its top entry), after which
    /// each component selects a child by label.
    pub fn find_path(&self, path: &str) -> Option<&TreeItem> {
        let mut current = self.root()?;
        let mut parts = path.split('/').filter(|part| !part.is_empty()).peekable();
        if parts.peek() == Some(&current.label.as_str()) {
            parts.next();
        }
        for part in parts {
            current = self
                .children(current.id)
                .into_iter()
                .find(|child| child.label == part)?;
        }
        Some(current)
    }
}

/// Builds the display tree for one section root.
pub fn project(root: &CommandNode) -> TreeArena {
    let mut arena = TreeArena::default();
    push_node(&mut arena, root, None);
    arena
}

fn push_node(arena: &mut TreeArena, node: &CommandNode, parent: Option<ItemId>) -> ItemId {
    let id = arena.items.len();
    arena.items.push(TreeItem {
        id,
        parent,
        children: Vec::new(),
        label: node.name.clone(),
        description: node.description.clone(),
        tooltip: node.tooltip.clone(),
        collapse: if node.actions.is_empty() {
            CollapseState::None
        } else {
            CollapseState::Expanded
        },
        kind: if node.command.is_some() {
            ItemKind::Runnable
        } else {
            ItemKind::Group
        },
        node: node.clone(),
    });
    for child in &node.actions {
        let child_id = push_node(arena, child, Some(id));
        arena.items[id].children.push(child_id);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Runnable;

    fn leaf(name: &str, command: Option<&str>) -> CommandNode {
        CommandNode {
            name: name.to_string(),
            command: command.map(|c| Runnable::Single(c.to_string())),
            ..Default::default()
        }
    }

    fn group(name: &str, children: Vec<CommandNode>) -> CommandNode {
        CommandNode {
            name: name.to_string(),
            actions: children,
            ..Default::default()
        }
    }

    #[test]
    fn childless_node_projects_to_a_non_expandable_leaf() {
        let arena = project(&leaf("Build", Some("npm run build")));
        let root = arena.root().unwrap();
        assert!(root.children.is_empty());
        assert_eq!(root.collapse, CollapseState::None);
    }

    #[test]
    fn node_with_actions_is_expandable_and_preserves_order() {
        let arena = project(&group(
            "Develop",
            vec![leaf("Build", Some("b")), leaf("Watch", Some("w")), leaf("Docs", None)],
        ));
        let root = arena.root().unwrap();
        assert_eq!(root.collapse, CollapseState::Expanded);
        let labels: Vec<&str> = arena
            .children(root.id)
            .into_iter()
            .map(|child| child.label.as_str())
            .collect();
        assert_eq!(labels, ["Build", "Watch", "Docs"]);
    }

    #[test]
    fn classification_follows_command_presence() {
        let mut dual = group("Pack", vec![leaf("Step", Some("s"))]);
        dual.command = Some(Runnable::Single("pack-all".to_string()));
        let arena = project(&dual);
        // command + actions: runnable wins, children stay navigable
        let root = arena.root().unwrap();
        assert_eq!(root.kind, ItemKind::Runnable);
        assert_eq!(root.children.len(), 1);

        let inert = project(&leaf("Label", None));
        assert_eq!(inert.root().unwrap().kind, ItemKind::Group);
    }

    #[test]
    fn parent_links_point_upward() {
        let arena = project(&group("Root", vec![group("Mid", vec![leaf("Leaf", None)])]));
        let leaf_item = arena.find_path("Mid/Leaf").unwrap();
        let mid = arena.parent(leaf_item.id).unwrap();
        assert_eq!(mid.label, "Mid");
        assert_eq!(arena.parent(mid.id).unwrap().label, "Root");
        assert!(arena.parent(0).is_none());
    }

    #[test]
    fn find_path_accepts_the_root_label_prefix() {
        let arena = project(&group("Develop", vec![leaf("Build", Some("b"))]));
        assert_eq!(arena.find_path("").unwrap().label, "Develop");
        assert_eq!(arena.find_path("Develop").unwrap().label, "Develop");
        assert_eq!(arena.find_path("Build").unwrap().label, "Build");
        assert_eq!(arena.find_path("Develop/Build").unwrap().label, "Build");
        assert!(arena.find_path("Develop/Missing").is_none());
    }

    #[test]
    fn identical_input_projects_identical_trees() {
        let node = group(
            "Root",
            vec![leaf("A", Some("a")), group("B", vec![leaf("C", None)])],
        );
        assert_eq!(project(&node), project(&node));
    }

    #[test]
    fn description_and_tooltip_are_copied_verbatim() {
        let mut node = leaf("Build", Some("b"));
        node.description = Some("compile everything".to_string());
        node.tooltip = Some("runs webpack".to_string());
        let arena = project(&node);
        let root = arena.root().unwrap();
        assert_eq!(root.description.as_deref(), Some("compile everything"));
        assert_eq!(root.tooltip.as_deref(), Some("runs webpack"));
    }
}
