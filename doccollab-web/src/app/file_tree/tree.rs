use std::collections::{HashMap, HashSet};

use doccollab_protocol::{FileEntry, Folder, FolderId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Folder {0} is part of a parent cycle")]
    Cycle(FolderId),
}

/// A folder with its materialized children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub folder: Folder,
    pub folders: Vec<FolderNode>,
    pub files: Vec<FileEntry>,
}

impl FolderNode {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// The hierarchical view of a project, rebuilt from the flat listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTree {
    pub folders: Vec<FolderNode>,
    pub files: Vec<FileEntry>,
}

struct TreeBuilder<'a> {
    children: HashMap<Option<FolderId>, Vec<&'a Folder>>,
    files: HashMap<FolderId, Vec<&'a FileEntry>>,
    on_path: HashSet<FolderId>,
    placed: usize,
}

impl<'a> TreeBuilder<'a> {
    fn materialize(&mut self, parent: Option<FolderId>) -> Result<Vec<FolderNode>, TreeError> {
        let children = self.children.get(&parent).cloned().unwrap_or_default();
        let mut nodes = Vec::with_capacity(children.len());

        for folder in children {
            if !self.on_path.insert(folder.id) {
                return Err(TreeError::Cycle(folder.id));
            }

            let folders = self.materialize(Some(folder.id))?;
            self.on_path.remove(&folder.id);
            self.placed += 1;

            let files = self
                .files
                .get(&folder.id)
                .map(|files| files.iter().map(|f| (*f).clone()).collect())
                .unwrap_or_default();

            nodes.push(FolderNode {
                folder: folder.clone(),
                folders,
                files,
            });
        }

        Ok(nodes)
    }
}

/// Rebuilds the folder hierarchy from parent references.
///
/// Order follows the listing. Folders whose parent is unknown and files whose
/// folder is unknown are placed at the top level. Folders that can never be
/// reached from the top level form a cycle and make the whole tree invalid.
pub fn build_tree(files: &[FileEntry], folders: &[Folder]) -> Result<ProjectTree, TreeError> {
    let known: HashSet<FolderId> = folders.iter().map(|f| f.id).collect();

    let mut children: HashMap<Option<FolderId>, Vec<&Folder>> = HashMap::new();
    for folder in folders {
        let parent = folder.parent_id.filter(|id| known.contains(id));
        children.entry(parent).or_default().push(folder);
    }

    let mut top_files = Vec::new();
    let mut by_folder: HashMap<FolderId, Vec<&FileEntry>> = HashMap::new();
    for file in files {
        match file.folder_id.filter(|id| known.contains(id)) {
            Some(folder_id) => by_folder.entry(folder_id).or_default().push(file),
            None => top_files.push(file.clone()),
        }
    }

    let mut builder = TreeBuilder {
        children,
        files: by_folder,
        on_path: HashSet::new(),
        placed: 0,
    };

    let top_folders = builder.materialize(None)?;

    if builder.placed < folders.len() {
        let reachable = collect_ids(&top_folders);
        if let Some(stray) = folders.iter().find(|f| !reachable.contains(&f.id)) {
            return Err(TreeError::Cycle(stray.id));
        }
    }

    Ok(ProjectTree {
        folders: top_folders,
        files: top_files,
    })
}

fn collect_ids(nodes: &[FolderNode]) -> HashSet<FolderId> {
    let mut ids = HashSet::new();
    let mut stack: Vec<&FolderNode> = nodes.iter().collect();

    while let Some(node) = stack.pop() {
        ids.insert(node.folder.id);
        stack.extend(node.folders.iter());
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: u64, name: &str, folder_id: Option<u64>) -> FileEntry {
        FileEntry {
            id,
            name: name.to_string(),
            file_type: name.rsplit('.').next().unwrap_or_default().to_string(),
            version: 1,
            folder_id,
        }
    }

    fn folder(id: u64, name: &str, parent_id: Option<u64>) -> Folder {
        Folder {
            id,
            name: name.to_string(),
            parent_id,
        }
    }

    fn count_folders(nodes: &[FolderNode]) -> usize {
        nodes.iter().map(|n| 1 + count_folders(&n.folders)).sum()
    }

    #[test]
    fn single_top_level_file() {
        let tree = build_tree(&[file(1, "a.tex", None)], &[]).unwrap();

        assert!(tree.folders.is_empty());
        assert_eq!(tree.files.len(), 1);
        assert_eq!(tree.files[0].name, "a.tex");
    }

    #[test]
    fn nested_folders_land_under_their_parent() {
        let folders = vec![
            folder(1, "chapters", None),
            folder(2, "images", None),
            folder(3, "appendix", Some(1)),
            folder(4, "drafts", Some(3)),
        ];
        let files = vec![
            file(10, "main.tex", None),
            file(11, "intro.tex", Some(1)),
            file(12, "plot.png", Some(2)),
            file(13, "old.tex", Some(4)),
        ];

        let tree = build_tree(&files, &folders).unwrap();

        assert_eq!(count_folders(&tree.folders), folders.len());
        assert_eq!(tree.folders.len(), 2);

        let chapters = &tree.folders[0];
        assert_eq!(chapters.folder.name, "chapters");
        assert_eq!(chapters.files[0].name, "intro.tex");
        assert_eq!(chapters.folders[0].folder.name, "appendix");
        assert_eq!(chapters.folders[0].folders[0].files[0].name, "old.tex");

        assert_eq!(tree.folders[1].files[0].name, "plot.png");
        assert_eq!(tree.files.len(), 1);
    }

    #[test]
    fn listing_order_is_preserved() {
        let folders = vec![folder(5, "z", None), folder(2, "a", None), folder(9, "m", None)];
        let tree = build_tree(&[], &folders).unwrap();

        let names: Vec<_> = tree.folders.iter().map(|n| n.folder.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn file_in_unknown_folder_goes_top_level() {
        let tree = build_tree(&[file(1, "lost.tex", Some(99))], &[folder(1, "x", None)]).unwrap();

        assert_eq!(tree.files.len(), 1);
        assert!(tree.folders[0].files.is_empty());
    }

    #[test]
    fn folder_with_unknown_parent_goes_top_level() {
        let tree = build_tree(&[], &[folder(3, "orphan", Some(42))]).unwrap();

        assert_eq!(tree.folders.len(), 1);
        assert_eq!(tree.folders[0].folder.name, "orphan");
    }

    #[test]
    fn two_folder_cycle_is_detected() {
        let folders = vec![folder(1, "a", Some(2)), folder(2, "b", Some(1))];

        assert!(matches!(build_tree(&[], &folders), Err(TreeError::Cycle(_))));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let folders = vec![folder(1, "root", None), folder(7, "loop", Some(7))];

        assert_eq!(build_tree(&[], &folders), Err(TreeError::Cycle(7)));
    }

    #[test]
    fn duplicate_ids_cannot_recurse_forever() {
        let folders = vec![folder(1, "a", None), folder(1, "b", Some(1))];

        assert_eq!(build_tree(&[], &folders), Err(TreeError::Cycle(1)));
    }

    #[test]
    fn empty_listing_gives_empty_tree() {
        assert_eq!(build_tree(&[], &[]).unwrap(), ProjectTree::default());
    }
}
