use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use doccollab_protocol::{FileEntry, FileId, FolderId};
use html_escape::encode_safe;
use lazy_static::lazy_static;

use super::tree::{FolderNode, ProjectTree, TreeError};

/// Left padding added per nesting level, in pixels.
const INDENT_PX: usize = 20;

const DEFAULT_FILE_ICON: &str = "fas fa-file";

lazy_static! {
    static ref FILE_ICONS: HashMap<&'static str, &'static str> = HashMap::from([
        ("tex", "fas fa-file-code"),
        ("bib", "fas fa-book"),
        ("pdf", "fas fa-file-pdf"),
        ("png", "fas fa-file-image"),
        ("jpg", "fas fa-file-image"),
        ("jpeg", "fas fa-file-image"),
        ("gif", "fas fa-file-image"),
        ("svg", "fas fa-file-image"),
        ("txt", "fas fa-file-alt"),
        ("md", "fas fa-file-alt"),
    ]);
}

/// Icon classes for a file extension.
pub fn file_icon(file_type: &str) -> &'static str {
    FILE_ICONS
        .get(file_type.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_FILE_ICON)
}

/// What the renderer needs besides the tree itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    pub selected: Option<FileId>,
    pub collapsed: &'a HashSet<FolderId>,
}

/// The whole widget: header toolbar plus the tree body.
pub fn render_file_tree(tree: &Result<ProjectTree, TreeError>, state: RenderState<'_>) -> String {
    let body = match tree {
        Ok(tree) => render_tree(&tree.folders, &tree.files, 0, state),
        Err(e) => format!(
            r#"<div class="file-tree-error">{}</div>"#,
            encode_safe(&e.to_string())
        ),
    };

    format!(
        r#"<div class="file-tree">
    <div class="file-tree-header">
        <h3>Files</h3>
        <div class="file-tree-actions">
            <button class="btn-icon" id="newFileBtn" title="New file"><i class="fas fa-file-plus"></i></button>
            <button class="btn-icon" id="newFolderBtn" title="New folder"><i class="fas fa-folder-plus"></i></button>
            <button class="btn-icon" id="uploadFileBtn" title="Upload"><i class="fas fa-upload"></i></button>
            <button class="btn-icon" id="downloadProjectBtn" title="Download ZIP"><i class="fas fa-download"></i></button>
        </div>
    </div>
    <div class="file-tree-content">{}</div>
</div>"#,
        body
    )
}

/// One `<ul>` level: folders first, then files.
pub fn render_tree(
    folders: &[FolderNode],
    files: &[FileEntry],
    level: usize,
    state: RenderState<'_>,
) -> String {
    let mut html = String::from(r#"<ul class="file-tree-list">"#);

    for node in folders {
        render_folder(&mut html, node, level, state);
    }

    for file in files {
        render_file(&mut html, file, level, state);
    }

    html.push_str("</ul>");
    html
}

fn render_folder(html: &mut String, node: &FolderNode, level: usize, state: RenderState<'_>) {
    let collapsed = if state.collapsed.contains(&node.folder.id) {
        " collapsed"
    } else {
        ""
    };

    let _ = write!(
        html,
        r#"<li class="file-tree-item folder{}" data-folder-id="{}"><div class="file-tree-item-content" style="padding-left: {}px"><i class="fas fa-folder folder-icon"></i><span class="file-tree-item-name">{}</span><div class="file-tree-item-actions"><button class="btn-icon-small" data-action="rename" title="Rename"><i class="fas fa-edit"></i></button><button class="btn-icon-small" data-action="delete" title="Delete"><i class="fas fa-trash"></i></button></div></div>"#,
        collapsed,
        node.folder.id,
        level * INDENT_PX,
        encode_safe(&node.folder.name),
    );

    if !node.is_empty() {
        html.push_str(&render_tree(&node.folders, &node.files, level + 1, state));
    }

    html.push_str("</li>");
}

fn render_file(html: &mut String, file: &FileEntry, level: usize, state: RenderState<'_>) {
    let selected = if state.selected == Some(file.id) {
        " selected"
    } else {
        ""
    };

    let _ = write!(
        html,
        r#"<li class="file-tree-item file{}" data-file-id="{}"><div class="file-tree-item-content" style="padding-left: {}px"><i class="{} file-icon"></i><span class="file-tree-item-name">{}</span><span class="file-tree-item-meta">v{}</span><div class="file-tree-item-actions"><button class="btn-icon-small" data-action="copy" title="Copy"><i class="fas fa-copy"></i></button><button class="btn-icon-small" data-action="rename" title="Rename"><i class="fas fa-edit"></i></button><button class="btn-icon-small" data-action="download" title="Download"><i class="fas fa-download"></i></button><button class="btn-icon-small" data-action="delete" title="Delete"><i class="fas fa-trash"></i></button></div></div></li>"#,
        selected,
        file.id,
        level * INDENT_PX,
        file_icon(&file.file_type),
        encode_safe(&file.name),
        file.version,
    );
}

#[cfg(test)]
mod tests {
    use doccollab_protocol::Folder;

    use super::super::tree::build_tree;
    use super::*;

    fn file(id: u64, name: &str, folder_id: Option<u64>) -> FileEntry {
        FileEntry {
            id,
            name: name.to_string(),
            file_type: "tex".to_string(),
            version: 2,
            folder_id,
        }
    }

    fn render(files: &[FileEntry], folders: &[Folder], selected: Option<FileId>) -> String {
        let collapsed = HashSet::new();
        render_file_tree(
            &build_tree(files, folders),
            RenderState {
                selected,
                collapsed: &collapsed,
            },
        )
    }

    #[test]
    fn quotes_and_ampersands_in_names_are_escaped() {
        let html = render(&[file(1, r#"a "b" & 'c'.tex"#, None)], &[], None);

        assert!(html.contains("a &quot;b&quot; &amp; &#x27;c&#x27;.tex"));
        assert!(!html.contains(r#""b""#));
    }

    #[test]
    fn hostile_names_are_not_rendered_as_elements() {
        let html = render(&[file(1, "<script>evil()</script>.tex", None)], &[], None);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;evil()&lt;&#x2F;script&gt;.tex"));
    }

    #[test]
    fn hostile_folder_names_are_escaped() {
        let folders = vec![Folder {
            id: 1,
            name: "<img src=x onerror=alert(1)>".to_string(),
            parent_id: None,
        }];
        let html = render(&[], &folders, None);

        assert!(!html.contains("<img"));
    }

    #[test]
    fn single_file_renders_one_file_node() {
        let html = render(&[file(1, "a.tex", None)], &[], None);

        assert_eq!(html.matches(r#"class="file-tree-item file""#).count(), 1);
        assert!(html.contains(r#"data-file-id="1""#));
        assert!(html.contains(">a.tex<"));
        assert!(html.contains(">v2<"));
        assert!(html.contains("fas fa-file-code"));
    }

    #[test]
    fn nested_items_are_indented() {
        let folders = vec![Folder {
            id: 3,
            name: "chapters".to_string(),
            parent_id: None,
        }];
        let html = render(&[file(1, "intro.tex", Some(3))], &folders, None);

        assert!(html.contains(r#"data-folder-id="3"><div class="file-tree-item-content" style="padding-left: 0px""#));
        assert!(html.contains(r#"data-file-id="1"><div class="file-tree-item-content" style="padding-left: 20px""#));
    }

    #[test]
    fn empty_folder_has_no_nested_list() {
        let folders = vec![Folder {
            id: 3,
            name: "empty".to_string(),
            parent_id: None,
        }];
        let html = render(&[], &folders, None);

        assert_eq!(html.matches("<ul").count(), 1);
    }

    #[test]
    fn selected_file_is_marked() {
        let html = render(&[file(1, "a.tex", None), file(2, "b.tex", None)], &[], Some(2));

        assert!(html.contains(r#"class="file-tree-item file selected" data-file-id="2""#));
        assert!(html.contains(r#"class="file-tree-item file" data-file-id="1""#));
    }

    #[test]
    fn collapsed_folders_keep_their_state() {
        let folders = vec![Folder {
            id: 4,
            name: "fig".to_string(),
            parent_id: None,
        }];
        let collapsed = HashSet::from([4]);
        let html = render_file_tree(
            &build_tree(&[], &folders),
            RenderState {
                selected: None,
                collapsed: &collapsed,
            },
        );

        assert!(html.contains(r#"class="file-tree-item folder collapsed" data-folder-id="4""#));
    }

    #[test]
    fn cycles_render_an_error_block() {
        let folders = vec![Folder {
            id: 1,
            name: "loop".to_string(),
            parent_id: Some(1),
        }];
        let html = render(&[], &folders, None);

        assert!(html.contains("file-tree-error"));
        assert!(html.contains("newFileBtn"));
    }

    #[test]
    fn unknown_extensions_use_generic_icon() {
        assert_eq!(file_icon("xyz"), "fas fa-file");
        assert_eq!(file_icon("PNG"), "fas fa-file-image");
    }
}
