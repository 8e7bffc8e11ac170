//! The content model: [`SectionId`], [`Section`], [`Item`], [`Tag`], and
//! [`Page`], plus the loader that parses items from markdown source files.
//! Everything in here is immutable once [`load`] (and the pipeline's
//! explicit [`Content::add_page`] calls) complete; the rest of the build
//! only reads from the [`Content`] store.
//!
//! Each item source file is structured as follows:
//!
//! 1. Initial frontmatter fence (`---`)
//! 2. YAML frontmatter with fields `title`, `date`, and optionally
//!    `description`, `updated`, and `tags`
//! 3. Terminal frontmatter fence (`---`)
//! 4. Markdown body
//!
//! For example:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2023-02-06
//! tags: [swift, macos]
//! ---
//! # Hello
//!
//! World
//! ```

use crate::markdown;
use crate::plugin::Plugin;
use chrono::NaiveDate;
use maud::Markup;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs::{read_dir, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Identifies one of the site's content sections. Navigation highlighting
/// compares these by equality; adding a section means adding a variant and
/// letting the exhaustive matches point out every place that needs to know
/// about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionId {
    Posts,
    Projects,
}

impl SectionId {
    /// Every section, in navigation order.
    pub const ALL: [SectionId; 2] = [SectionId::Posts, SectionId::Projects];

    /// The section's path component (also its source subdirectory name).
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Posts => "posts",
            SectionId::Projects => "projects",
        }
    }

    /// The section's display title.
    pub fn title(self) -> &'static str {
        match self {
            SectionId::Posts => "Posts",
            SectionId::Projects => "Projects",
        }
    }

    /// The route of the section's listing page.
    pub fn route(self) -> String {
        format!("/{}/", self.as_str())
    }
}

/// A label attached to items, slugified so that e.g. `macOS` and `MacOS`
/// resolve to the same tag and so the slug can be dropped into a route.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(label: &str) -> Tag {
        Tag(slug::slugify(label))
    }

    pub fn slug(&self) -> &str {
        &self.0
    }

    /// The route of the tag's detail page.
    pub fn route(&self) -> String {
        format!("/tags/{}/", self.0)
    }
}

/// One published content entry, parsed from a single markdown source file.
#[derive(Debug)]
pub struct Item {
    /// The section the item belongs to. Every item belongs to exactly one.
    pub section: SectionId,

    /// The item's title.
    pub title: String,

    /// A short description, shown on listing cards and in the feed.
    pub description: String,

    /// The rendered HTML body.
    pub body: String,

    /// The publish date.
    pub date: NaiveDate,

    /// The last-modified date. Defaults to the publish date.
    pub last_modified: NaiveDate,

    /// The item's tags, in frontmatter order.
    pub tags: Vec<Tag>,

    /// The item's route, `/{section}/{slug}/`.
    pub route: String,
}

/// A named collection of items sharing a listing page.
pub struct Section {
    pub id: SectionId,
    /// The section's items, sorted by date descending.
    pub items: Vec<Item>,
}

/// A standalone document outside the section/item flow (e.g. the About
/// page). Constructed explicitly by the pipeline, not parsed from content
/// files.
pub struct Page {
    pub route: String,
    pub title: String,
    pub description: String,
    pub body: Markup,
    pub date: NaiveDate,
    pub last_modified: NaiveDate,
}

/// The read-only content store. Exposes sections, items, standalone pages,
/// and the site-wide tag index.
pub struct Content {
    sections: Vec<Section>,
    pages: Vec<Page>,
    routes: HashSet<String>,
}

impl Content {
    /// Assembles a store from loaded sections, enforcing route uniqueness
    /// across all items.
    pub fn new(sections: Vec<Section>) -> Result<Content> {
        let mut routes = HashSet::new();
        for section in &sections {
            for item in &section.items {
                if !routes.insert(item.route.clone()) {
                    return Err(Error::DuplicateRoute(item.route.clone()));
                }
            }
        }
        Ok(Content {
            sections,
            pages: Vec::new(),
            routes,
        })
    }

    /// Adds a standalone page, enforcing route uniqueness against the items
    /// and the pages added so far.
    pub fn add_page(&mut self, page: Page) -> Result<()> {
        if !self.routes.insert(page.route.clone()) {
            return Err(Error::DuplicateRoute(page.route));
        }
        self.pages.push(page);
        Ok(())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> &Section {
        // Sections are created for every `SectionId` at load time, so the
        // lookup always succeeds.
        self.sections
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("section {:?} missing from store", id))
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Every item across all sections.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// The site-wide tag index: every tag referenced by any item, sorted.
    pub fn tags(&self) -> BTreeSet<Tag> {
        self.items().flat_map(|i| i.tags.iter().cloned()).collect()
    }

    /// The items carrying `tag`, sorted by date descending (title ascending
    /// on ties, for deterministic output).
    pub fn items_tagged(&self, tag: &Tag) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items().filter(|i| i.tags.contains(tag)).collect();
        items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
        items
    }
}

/// Loads every section's items from `content_dir/{section}/*.md`. A missing
/// section subdirectory yields an empty section; any malformed source file
/// aborts the whole load.
pub fn load(content_dir: &Path, plugins: &[Plugin]) -> Result<Content> {
    let mut sections = Vec::with_capacity(SectionId::ALL.len());
    for id in SectionId::ALL {
        sections.push(Section {
            id,
            items: load_section(content_dir, id, plugins)?,
        });
    }
    Content::new(sections)
}

const MARKDOWN_EXTENSION: &str = ".md";

fn load_section(content_dir: &Path, id: SectionId, plugins: &[Plugin]) -> Result<Vec<Item>> {
    let dir = content_dir.join(id.as_str());
    let entries = match read_dir(&dir) {
        Ok(entries) => entries,
        // A site with no sources for a section is fine; it just gets an
        // empty listing page.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(e)),
    };

    let mut items = Vec::new();
    for result in entries {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            items.push(parse_item_file(id, &entry.path(), plugins)?);
        }
    }

    items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
    Ok(items)
}

fn parse_item_file(section: SectionId, path: &Path, plugins: &[Plugin]) -> Result<Item> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?;

    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;

    parse_item(section, stem, &contents, plugins).map_err(|e| {
        Error::Annotated(format!("parsing item `{}`", path.display()), Box::new(e))
    })
}

/// Parses a single [`Item`] from a source string. The `stem` is the source
/// file name less the extension; it is slugified to form the item's route.
pub fn parse_item(
    section: SectionId,
    stem: &str,
    input: &str,
    plugins: &[Plugin],
) -> Result<Item> {
    fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
        const FENCE: &str = "---";
        if !input.starts_with(FENCE) {
            return Err(Error::FrontmatterMissingStartFence);
        }
        match input[FENCE.len()..].find(FENCE) {
            None => Err(Error::FrontmatterMissingEndFence),
            Some(offset) => Ok((
                FENCE.len(),                        // yaml_start
                FENCE.len() + offset,               // yaml_stop
                FENCE.len() + offset + FENCE.len(), // body_start
            )),
        }
    }

    let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
    let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

    let mut body = markdown::render(&input[body_start..]);
    for transform in plugins.iter().filter_map(|p| p.transform) {
        body = transform(&body);
    }

    Ok(Item {
        section,
        title: frontmatter.title,
        description: frontmatter.description,
        body,
        date: frontmatter.date,
        last_modified: frontmatter.updated.unwrap_or(frontmatter.date),
        tags: frontmatter.tags.iter().map(|t| Tag::new(t)).collect(),
        route: format!("/{}/{}/", section.as_str(), slug::slugify(stem)),
    })
}

#[derive(Deserialize)]
struct Frontmatter {
    /// The title of the item.
    title: String,

    /// A short description, shown on listing cards.
    #[serde(default)]
    description: String,

    /// The publish date.
    date: NaiveDate,

    /// The last-modified date, when it differs from `date`.
    #[serde(default)]
    updated: Option<NaiveDate>,

    /// The labels associated with the item.
    #[serde(default)]
    tags: Vec<String>,
}

/// Represents the result of a content-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the content model.
#[derive(Debug)]
pub enum Error {
    /// Returned when an item source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when an item source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when two items or pages resolve to the same route.
    DuplicateRoute(String),

    /// Returned when a source file's name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => write!(f, "Item must begin with `---`"),
            Error::FrontmatterMissingEndFence => write!(f, "Missing closing `---`"),
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::DuplicateRoute(route) => write!(f, "Duplicate route `{}`", route),
            Error::InvalidFileName(path) => write!(f, "invalid file name: {:?}", path),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => write!(f, "{}: {}", annotation, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::DuplicateRoute(_) => None,
            Error::InvalidFileName(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SOURCE: &str = "---\n\
        title: Porting Splitter to SwiftUI\n\
        description: Notes from the rewrite\n\
        date: 2023-02-06\n\
        tags: [Swift, macOS]\n\
        ---\n\
        The rewrite took *three* weekends.\n";

    fn item(section: SectionId, slug: &str, date: &str, tags: &[&str]) -> Item {
        Item {
            section,
            title: slug.to_owned(),
            description: String::new(),
            body: String::new(),
            date: date.parse().expect("valid date"),
            last_modified: date.parse().expect("valid date"),
            tags: tags.iter().map(|t| Tag::new(t)).collect(),
            route: format!("/{}/{}/", section.as_str(), slug),
        }
    }

    fn store(posts: Vec<Item>) -> Content {
        Content::new(vec![
            Section {
                id: SectionId::Posts,
                items: posts,
            },
            Section {
                id: SectionId::Projects,
                items: Vec::new(),
            },
        ])
        .expect("no duplicate routes")
    }

    #[test]
    fn test_parse_item() -> Result<()> {
        let item = parse_item(SectionId::Posts, "Porting Splitter", SOURCE, &[])?;
        assert_eq!(item.title, "Porting Splitter to SwiftUI");
        assert_eq!(item.description, "Notes from the rewrite");
        assert_eq!(item.route, "/posts/porting-splitter/");
        assert_eq!(item.date, "2023-02-06".parse::<NaiveDate>().unwrap());
        assert_eq!(item.last_modified, item.date);
        assert_eq!(item.tags, vec![Tag::new("swift"), Tag::new("macos")]);
        assert!(item.body.contains("<em>three</em>"));
        Ok(())
    }

    #[test]
    fn test_parse_item_applies_plugin_transform() -> Result<()> {
        let plugins = vec![Plugin {
            name: "shout",
            stylesheets: vec![],
            scripts: vec![],
            transform: Some(|body| body.to_uppercase()),
        }];
        let item = parse_item(SectionId::Posts, "x", SOURCE, &plugins)?;
        assert!(item.body.contains("WEEKENDS"));
        Ok(())
    }

    #[test]
    fn test_parse_item_missing_start_fence() {
        let err = parse_item(SectionId::Posts, "x", "title: nope\n", &[]).unwrap_err();
        assert!(matches!(err, Error::FrontmatterMissingStartFence));
    }

    #[test]
    fn test_parse_item_missing_end_fence() {
        let err = parse_item(SectionId::Posts, "x", "---\ntitle: nope\n", &[]).unwrap_err();
        assert!(matches!(err, Error::FrontmatterMissingEndFence));
    }

    #[test]
    fn test_duplicate_item_routes_rejected() {
        let result = Content::new(vec![Section {
            id: SectionId::Posts,
            items: vec![
                item(SectionId::Posts, "same", "2023-01-01", &[]),
                item(SectionId::Posts, "same", "2023-01-02", &[]),
            ],
        }]);
        assert!(matches!(result, Err(Error::DuplicateRoute(r)) if r == "/posts/same/"));
    }

    #[test]
    fn test_add_page_rejects_item_route() {
        let mut content = store(vec![item(SectionId::Posts, "about", "2023-01-01", &[])]);
        let result = content.add_page(Page {
            route: "/posts/about/".to_owned(),
            title: "About".to_owned(),
            description: String::new(),
            body: maud::html! {},
            date: "2023-01-01".parse().unwrap(),
            last_modified: "2023-01-01".parse().unwrap(),
        });
        assert!(matches!(result, Err(Error::DuplicateRoute(_))));
    }

    #[test]
    fn test_tag_index_covers_every_item_tag() {
        let content = store(vec![
            item(SectionId::Posts, "a", "2023-01-01", &["swift", "macos"]),
            item(SectionId::Posts, "b", "2023-01-02", &["macos"]),
        ]);
        let tags = content.tags();
        for item in content.items() {
            for tag in &item.tags {
                assert!(tags.contains(tag));
            }
        }
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_items_tagged_sorted_date_descending() {
        let content = store(vec![
            item(SectionId::Posts, "old", "2022-05-01", &["macos"]),
            item(SectionId::Posts, "new", "2023-02-06", &["macos"]),
            item(SectionId::Posts, "untagged", "2023-03-01", &[]),
        ]);
        let tagged = content.items_tagged(&Tag::new("macos"));
        let titles: Vec<&str> = tagged.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn test_tag_slugs() {
        assert_eq!(Tag::new("macOS").slug(), "macos");
        assert_eq!(Tag::new("Speedrun Timers").slug(), "speedrun-timers");
        assert_eq!(Tag::new("macOS").route(), "/tags/macos/");
    }
}

