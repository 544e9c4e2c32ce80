//! Seed document loading.
//!
//! The initial tree comes from a nested `id` / `name` / `children` document,
//! JSON by default or TOML when the file has a `.toml` extension.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::{read_text, ApplicationError, ApplicationResult};
use crate::domain::Node;

const INLINE_SOURCE: &str = "<inline>";

fn seed_err(path: &Path, message: impl ToString) -> ApplicationError {
    ApplicationError::Seed {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn from_json(content: &str, path: &Path) -> ApplicationResult<Node> {
    let root = serde_json::from_str(content).map_err(|e| seed_err(path, e))?;
    validate(root, path)
}

fn from_toml(content: &str, path: &Path) -> ApplicationResult<Node> {
    let root = toml::from_str(content).map_err(|e| seed_err(path, e))?;
    validate(root, path)
}

/// Only the root may go without an id; every other node must be addressable.
fn validate(root: Node, path: &Path) -> ApplicationResult<Node> {
    if let Some(visit) = root.iter().skip(1).find(|v| v.node.id.is_none()) {
        return Err(seed_err(
            path,
            format!(
                "node '{}' at depth {} has no id",
                visit.node.name,
                visit.depth()
            ),
        ));
    }
    Ok(root)
}

/// Parse a JSON seed document.
pub fn parse_seed_json(content: &str) -> ApplicationResult<Node> {
    from_json(content, Path::new(INLINE_SOURCE))
}

/// Parse a TOML seed document; the top-level table is the root node.
pub fn parse_seed_toml(content: &str) -> ApplicationResult<Node> {
    from_toml(content, Path::new(INLINE_SOURCE))
}

/// Read and parse the seed file at `path`.
#[instrument(level = "debug")]
pub fn load_seed(path: &Path) -> ApplicationResult<Node> {
    let content = read_text(path, "seed")?;

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let root = if is_toml {
        from_toml(&content, path)?
    } else {
        from_json(&content, path)?
    };

    debug!(nodes = root.node_count(), "seed loaded");
    Ok(root)
}

/// Seed location relative to `base` unless already absolute.
pub fn resolve_seed_path(base: &Path, seed: &Path) -> PathBuf {
    if seed.is_absolute() {
        seed.to_path_buf()
    } else {
        base.join(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;

    #[test]
    fn given_json_with_mixed_ids_when_parsing_then_normalises_to_strings() {
        let root = parse_seed_json(
            r#"{"name": "root", "children": [
                {"id": 1, "name": "a", "children": []},
                {"id": "b7", "name": "b"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(root.id, None);
        assert_eq!(root.children[0].id, Some(NodeId::from(1)));
        assert_eq!(root.children[1].id, Some(NodeId::from("b7")));
        assert!(root.children[1].is_leaf());
    }

    #[test]
    fn given_toml_seed_when_parsing_then_builds_nested_tree() {
        let root = parse_seed_toml(
            r#"
name = "root"

[[children]]
id = 1
name = "a"

[[children.children]]
id = 2
name = "a1"
"#,
        )
        .unwrap();

        assert_eq!(root.node_count(), 3);
        assert_eq!(root.children[0].children[0].name, "a1");
    }

    #[test]
    fn given_missing_name_when_parsing_then_seed_error() {
        let err = parse_seed_json(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, ApplicationError::Seed { .. }));
    }

    #[test]
    fn given_idless_child_when_parsing_then_seed_error_names_it() {
        let err = parse_seed_json(
            r#"{"name": "root", "children": [
                {"id": 1, "name": "a", "children": [{"name": "orphan"}]}
            ]}"#,
        )
        .unwrap_err();

        match err {
            ApplicationError::Seed { message, .. } => {
                assert_eq!(message, "node 'orphan' at depth 2 has no id");
            }
            other => panic!("expected seed error, got {other:?}"),
        }
    }

    #[test]
    fn given_relative_seed_when_resolving_then_joins_base() {
        assert_eq!(
            resolve_seed_path(Path::new("/cfg"), Path::new("tree.json")),
            PathBuf::from("/cfg/tree.json")
        );
        assert_eq!(
            resolve_seed_path(Path::new("/cfg"), Path::new("/abs/tree.json")),
            PathBuf::from("/abs/tree.json")
        );
    }
}
