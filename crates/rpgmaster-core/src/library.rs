//! Content library: monsters, spells, and rules authored as markdown files.
//!
//! Each entry is a `<slug>.md` file whose optional front matter is a YAML
//! mapping between two `---` lines. The library is read on demand; there
//! is no cache, so edits to the files show up on the next request.
//!
//! All reads are blocking filesystem I/O. Async callers should run them on
//! a blocking task.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ContentConfig;
use crate::input::validate_slug;

/// Front matter keys consulted, in order, for an entry's display name.
const DISPLAY_NAME_KEYS: [&str; 3] = ["name", "nombre", "title"];

/// Front matter key holding a monster's portrait image path.
const PORTRAIT_KEY: &str = "portrait_path";

/// Errors reading a single content file.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The front matter block was never closed.
    #[error("front matter is not terminated")]
    UnterminatedFrontMatter,

    /// The front matter was not valid YAML.
    #[error("front matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// The front matter parsed, but not as a key/value mapping.
    #[error("front matter is not a mapping")]
    NotAMapping,
}

/// The three sections of the content library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Monster stat blocks.
    Monster,
    /// Spell descriptions.
    Spell,
    /// Rules reference.
    Rule,
}

/// A library entry as listed: front matter plus identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentEntry {
    /// File name without the `.md` extension.
    pub slug: String,
    /// Display name taken from front matter, falling back to the slug.
    pub name: String,
    /// Raw front matter.
    pub metadata: Map<String, Value>,
}

/// A library entry with its markdown body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentDetail {
    /// The listed part of the entry.
    #[serde(flatten)]
    pub entry: ContentEntry,
    /// Markdown text following the front matter.
    pub body: String,
}

/// Split a document into its front matter mapping and markdown body.
///
/// A document without a leading `---` line has empty front matter and is
/// all body.
pub fn split_front_matter(text: &str) -> Result<(Map<String, Value>, &str), LibraryError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let opened = text
        .strip_prefix("---")
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')));
    let Some(after_open) = opened else {
        return Ok((Map::new(), text));
    };

    let mut offset: usize = 0;
    for line in after_open.split_inclusive('\n') {
        let marker = line.trim_end_matches(['\r', '\n']);
        if marker == "---" || marker == "..." {
            let yaml = after_open.get(..offset).unwrap_or_default();
            let body = after_open
                .get(offset.saturating_add(line.len())..)
                .unwrap_or_default();
            return Ok((parse_mapping(yaml)?, body));
        }
        offset = offset.saturating_add(line.len());
    }

    Err(LibraryError::UnterminatedFrontMatter)
}

fn parse_mapping(yaml: &str) -> Result<Map<String, Value>, LibraryError> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_yml::from_str::<Value>(yaml)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(LibraryError::NotAMapping),
    }
}

fn display_name(metadata: &Map<String, Value>, slug: &str) -> String {
    DISPLAY_NAME_KEYS
        .iter()
        .find_map(|key| metadata.get(*key).and_then(Value::as_str))
        .map_or_else(|| slug.to_owned(), str::to_owned)
}

/// Read-only view over the content directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLibrary {
    monsters_dir: PathBuf,
    spells_dir: PathBuf,
    rules_dir: PathBuf,
}

impl ContentLibrary {
    /// Create a library over the configured directories.
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            monsters_dir: config.monsters_dir.clone(),
            spells_dir: config.spells_dir.clone(),
            rules_dir: config.rules_dir.clone(),
        }
    }

    /// Directory holding entries of the given kind.
    pub fn dir(&self, kind: ContentKind) -> &Path {
        match kind {
            ContentKind::Monster => &self.monsters_dir,
            ContentKind::Spell => &self.spells_dir,
            ContentKind::Rule => &self.rules_dir,
        }
    }

    /// List every entry of a kind, sorted case-insensitively by name.
    ///
    /// A missing directory lists as empty. Files that cannot be read or
    /// parsed are logged and skipped.
    pub fn list(&self, kind: ContentKind) -> Vec<ContentEntry> {
        let dir = self.dir(kind);
        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Content directory unavailable");
                return Vec::new();
            }
        };

        let mut entries: Vec<ContentEntry> = read_dir
            .filter_map(Result::ok)
            .filter_map(|dir_entry| {
                let path = dir_entry.path();
                let slug = markdown_slug(&path)?;
                match read_entry(&path, &slug) {
                    Ok(detail) => Some(detail.entry),
                    Err(e) => {
                        tracing::warn!(file = %path.display(), error = %e, "Skipping content file");
                        None
                    }
                }
            })
            .collect();

        entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
        entries
    }

    /// Load a single entry with its body.
    ///
    /// Returns `None` for unknown or unsafe slugs and for files that fail to
    /// parse (the failure is logged).
    pub fn detail(&self, kind: ContentKind, slug: &str) -> Option<ContentDetail> {
        let slug = match validate_slug(slug) {
            Ok(slug) => slug,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected content lookup");
                return None;
            }
        };

        let path = self.dir(kind).join(format!("{slug}.md"));
        if !path.is_file() {
            return None;
        }

        match read_entry(&path, slug) {
            Ok(detail) => Some(detail),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Failed to load content entry");
                None
            }
        }
    }

    /// Resolve a monster's portrait path from its front matter.
    pub fn portrait(&self, slug: &str) -> Option<String> {
        self.detail(ContentKind::Monster, slug)?
            .entry
            .metadata
            .get(PORTRAIT_KEY)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

fn markdown_slug(path: &Path) -> Option<String> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
        return None;
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
}

fn read_entry(path: &Path, slug: &str) -> Result<ContentDetail, LibraryError> {
    let text = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (metadata, body) = split_front_matter(&text)?;

    Ok(ContentDetail {
        entry: ContentEntry {
            slug: slug.to_owned(),
            name: display_name(&metadata, slug),
            metadata,
        },
        body: body.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn library_in(root: &Path) -> ContentLibrary {
        ContentLibrary::new(&ContentConfig {
            monsters_dir: root.join("monsters"),
            spells_dir: root.join("spells"),
            rules_dir: root.join("rules"),
        })
    }

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(path, text);
    }

    #[test]
    fn front_matter_is_split_from_body() {
        let doc = "---\nname: Goblin\nhp: 7\n---\n# Goblin\nSmall and mean.\n";
        let parsed = split_front_matter(doc);
        assert!(parsed.is_ok());
        if let Ok((meta, body)) = parsed {
            assert_eq!(meta.get("name"), Some(&Value::from("Goblin")));
            assert_eq!(meta.get("hp"), Some(&Value::from(7)));
            assert_eq!(body, "# Goblin\nSmall and mean.\n");
        }
    }

    #[test]
    fn document_without_front_matter_is_all_body() {
        let parsed = split_front_matter("# Just text\n");
        assert!(matches!(parsed, Ok((ref meta, "# Just text\n")) if meta.is_empty()));
    }

    #[test]
    fn crlf_front_matter_is_supported() {
        let parsed = split_front_matter("---\r\ntitle: Fireball\r\n---\r\nBoom.\r\n");
        assert!(matches!(parsed, Ok((ref meta, "Boom.\r\n")) if meta.contains_key("title")));
    }

    #[test]
    fn unterminated_front_matter_is_an_error() {
        let parsed = split_front_matter("---\nname: Lost\n");
        assert!(matches!(parsed, Err(LibraryError::UnterminatedFrontMatter)));
    }

    #[test]
    fn scalar_front_matter_is_an_error() {
        let parsed = split_front_matter("---\njust a string\n---\n");
        assert!(matches!(parsed, Err(LibraryError::NotAMapping)));
    }

    #[test]
    fn listing_sorts_by_name_and_skips_broken_files() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let root = dir.path();

        write(root, "monsters/zombie.md", "---\nname: zombie\n---\n");
        write(root, "monsters/ancient-dragon.md", "---\ntitle: Ancient Dragon\n---\n");
        write(root, "monsters/ogre.md", "No front matter.\n");
        write(root, "monsters/broken.md", "---\nname: [oops\n---\n");
        write(root, "monsters/notes.txt", "ignored");

        let entries = library_in(root).list(ContentKind::Monster);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Ancient Dragon", "ogre", "zombie"]);
    }

    #[test]
    fn missing_directory_lists_empty() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        assert!(library_in(dir.path()).list(ContentKind::Rule).is_empty());
    }

    #[test]
    fn detail_and_portrait_lookup() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let root = dir.path();
        write(
            root,
            "monsters/goblin.md",
            "---\nnombre: Goblin\nportrait_path: /static/img/goblin.png\n---\nStats here.\n",
        );

        let library = library_in(root);
        let detail = library.detail(ContentKind::Monster, "goblin");
        assert_eq!(detail.as_ref().map(|d| d.entry.name.as_str()), Some("Goblin"));
        assert_eq!(detail.as_ref().map(|d| d.body.as_str()), Some("Stats here.\n"));

        assert_eq!(
            library.portrait("goblin").as_deref(),
            Some("/static/img/goblin.png")
        );
        assert_eq!(library.portrait("dragon"), None);
        assert_eq!(library.detail(ContentKind::Monster, "../monsters/goblin"), None);
    }
}
