//! Exports the [`build_site`] function which sequences the pipeline steps:
//! install plugins, clean the output directory, copy static resources and
//! verbatim files, load the content model ([`crate::content`]), construct
//! the standalone pages, compose and write every page
//! ([`crate::theme`], [`crate::write`]), generate the RSS feed
//! ([`crate::feed`]) and sitemap ([`crate::sitemap`]), and finally deploy
//! ([`crate::deploy`]). Steps run strictly in sequence and the first
//! failure aborts the rest; there is no partial-success mode.

use crate::config::SiteConfig;
use crate::content::{Content, SectionId};
use crate::plugin::{Plugin, PluginAssets};
use crate::sitemap::Entry as SitemapEntry;
use crate::theme::PageRef;
use crate::{about, content, deploy, feed, sitemap, theme, write};
use std::fmt;
use std::fs::{create_dir_all, File};

/// Builds the site from a [`SiteConfig`]. `run_deploy` gates the deploy
/// step on top of the configuration, so a local build can skip publishing.
pub fn build_site(config: &SiteConfig, plugins: &[Plugin], run_deploy: bool) -> Result<()> {
    let output_dir = config.output_dir();

    // install plugins
    let assets = PluginAssets::install(plugins);

    // blow away the old output directory so stale pages can't survive a
    // rename
    write::clean_dir(&output_dir)?;
    create_dir_all(&output_dir).map_err(write::Error::from)?;

    // copy static resources
    log::info!("copying static resources");
    write::copy_resources(&config.resources_dir(), &output_dir.join("static"))?;

    // copy verbatim files (e.g. the donation page)
    for file in &config.copy_files {
        log::info!("copying {}", file.display());
        write::copy_file(&config.project_root.join(file), &output_dir)?;
    }

    // load the content model
    let mut content = content::load(&config.content_dir(), plugins)?;
    log::info!("loaded {} items", content.items().count());

    // construct the standalone pages
    content.add_page(about::page())?;

    // compose and write every page
    let pages_written = write_pages(config, &assets, &content)?;
    log::info!("wrote {} pages", pages_written);

    // generate the RSS feed from the posts section
    let posts = content.section(SectionId::Posts);
    feed::write_feed(
        config,
        &posts.items,
        File::create(output_dir.join("feed.rss")).map_err(write::Error::from)?,
    )?;
    log::info!("wrote feed.rss ({} entries)", posts.items.len());

    // generate the sitemap
    sitemap::write_sitemap(
        &config.base_url,
        &sitemap_entries(&content),
        File::create(output_dir.join("sitemap.xml")).map_err(write::Error::from)?,
    )?;
    log::info!("wrote sitemap.xml");

    // publish
    match &config.deploy {
        Some(target) if run_deploy => deploy::deploy(&output_dir, target)?,
        _ => log::info!("skipping deploy"),
    }

    Ok(())
}

/// Composes every page with the theme and writes it to disk. Returns the
/// number of pages written.
fn write_pages(config: &SiteConfig, assets: &PluginAssets, content: &Content) -> Result<usize> {
    let output_dir = config.output_dir();
    let mut count = 0;

    // the home page is the posts listing
    emit(
        config,
        assets,
        &output_dir,
        "/",
        PageRef::SectionIndex(content.section(SectionId::Posts)),
    )?;
    count += 1;

    for section in content.sections() {
        emit(
            config,
            assets,
            &output_dir,
            &section.id.route(),
            PageRef::SectionIndex(section),
        )?;
        count += 1;
        for item in &section.items {
            emit(config, assets, &output_dir, &item.route, PageRef::Item(item))?;
            count += 1;
        }
    }

    for page in content.pages() {
        emit(
            config,
            assets,
            &output_dir,
            &page.route,
            PageRef::Standalone(page),
        )?;
        count += 1;
    }

    let tags = content.tags();
    emit(config, assets, &output_dir, "/tags/", PageRef::TagList(&tags))?;
    count += 1;
    for tag in &tags {
        let items = content.items_tagged(tag);
        emit(
            config,
            assets,
            &output_dir,
            &tag.route(),
            PageRef::TagDetail { tag, items: &items },
        )?;
        count += 1;
    }

    Ok(count)
}

fn emit(
    config: &SiteConfig,
    assets: &PluginAssets,
    output_dir: &std::path::Path,
    route: &str,
    page: PageRef,
) -> Result<()> {
    write::write_page(output_dir, route, theme::render(config, assets, page))?;
    Ok(())
}

fn sitemap_entries(content: &Content) -> Vec<SitemapEntry> {
    let mut entries = vec![SitemapEntry {
        route: "/".to_owned(),
        lastmod: None,
    }];
    for section in content.sections() {
        entries.push(SitemapEntry {
            route: section.id.route(),
            lastmod: None,
        });
        for item in &section.items {
            entries.push(SitemapEntry {
                route: item.route.clone(),
                lastmod: Some(item.last_modified),
            });
        }
    }
    for page in content.pages() {
        entries.push(SitemapEntry {
            route: page.route.clone(),
            lastmod: Some(page.last_modified),
        });
    }
    entries.push(SitemapEntry {
        route: "/tags/".to_owned(),
        lastmod: None,
    });
    for tag in content.tags() {
        entries.push(SitemapEntry {
            route: tag.route(),
            lastmod: None,
        });
    }
    entries
}

/// The result of building a site.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site: any pipeline step's failure, wrapped.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the content model.
    Content(content::Error),

    /// Returned for errors writing or copying output files.
    Write(write::Error),

    /// Returned for errors writing the feed.
    Feed(feed::Error),

    /// Returned for errors writing the sitemap.
    Sitemap(sitemap::Error),

    /// Returned for errors publishing the output directory.
    Deploy(deploy::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Content(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Sitemap(err) => err.fmt(f),
            Error::Deploy(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Content(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Sitemap(err) => Some(err),
            Error::Deploy(err) => Some(err),
        }
    }
}

impl From<content::Error> for Error {
    /// Converts [`content::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: content::Error) -> Error {
        Error::Content(err)
    }
}

impl From<write::Error> for Error {
    /// Converts [`write::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: write::Error) -> Error {
        Error::Write(err)
    }
}

impl From<feed::Error> for Error {
    /// Converts [`feed::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: feed::Error) -> Error {
        Error::Feed(err)
    }
}

impl From<sitemap::Error> for Error {
    /// Converts [`sitemap::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: sitemap::Error) -> Error {
        Error::Sitemap(err)
    }
}

impl From<deploy::Error> for Error {
    /// Converts [`deploy::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: deploy::Error) -> Error {
        Error::Deploy(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plugin;
    use std::fs;
    use std::path::{Path, PathBuf};
    use url::Url;

    fn config(project_root: &Path) -> SiteConfig {
        SiteConfig {
            name: "Michael Berk".to_owned(),
            description: "Michael Berk's website".to_owned(),
            base_url: Url::parse("https://example.com/").unwrap(),
            language: "en".to_owned(),
            favicon: "/static/images/favicon.png".to_owned(),
            content_dir: PathBuf::from("content"),
            resources_dir: PathBuf::from("resources"),
            output_dir: PathBuf::from("output"),
            copy_files: vec![PathBuf::from("donate.html")],
            deploy: None,
            project_root: project_root.to_owned(),
        }
    }

    fn scaffold(root: &Path) {
        fs::create_dir_all(root.join("content/posts")).unwrap();
        fs::create_dir_all(root.join("resources")).unwrap();
        fs::write(root.join("resources/styles.css"), "body {}").unwrap();
        fs::write(root.join("donate.html"), "<html>donate</html>").unwrap();
        fs::write(
            root.join("content/posts/porting-splitter.md"),
            "---\n\
             title: Porting Splitter\n\
             description: Notes from the rewrite\n\
             date: 2023-02-06\n\
             tags: [swift, macos]\n\
             ---\n\
             The rewrite took three weekends.\n",
        )
        .unwrap();
        fs::write(
            root.join("content/posts/older-post.md"),
            "---\n\
             title: Older Post\n\
             date: 2022-05-01\n\
             tags: [macos]\n\
             ---\n\
             Old news.\n",
        )
        .unwrap();
    }

    #[test]
    fn test_build_site_end_to_end() -> Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        scaffold(dir.path());
        let config = config(dir.path());

        build_site(&config, &[plugin::highlight_js()], true)?;

        let out = config.output_dir();
        // home page lists the posts, newest first
        let home = fs::read_to_string(out.join("index.html")).map_err(write::Error::from)?;
        assert!(home.contains("Porting Splitter"));
        assert!(home.find("Porting Splitter").unwrap() < home.find("Older Post").unwrap());

        // each item page carries its own data and nobody else's
        let item =
            fs::read_to_string(out.join("posts/porting-splitter/index.html"))
                .map_err(write::Error::from)?;
        assert!(item.contains("The rewrite took three weekends."));
        assert!(!item.contains("Older Post"));
        // the highlight plugin's assets made it into the head
        assert!(item.contains("/static/hl.css"));

        // every referenced tag got a detail page, linked from the tag list
        let tag_list = fs::read_to_string(out.join("tags/index.html")).map_err(write::Error::from)?;
        for tag in ["swift", "macos"] {
            assert!(tag_list.contains(&format!("/tags/{}/", tag)));
            assert!(out.join("tags").join(tag).join("index.html").is_file());
        }

        // the macos tag page lists exactly the macos-tagged items
        let macos = fs::read_to_string(out.join("tags/macos/index.html"))
            .map_err(write::Error::from)?;
        assert!(macos.contains("Porting Splitter"));
        assert!(macos.contains("Older Post"));

        // standalone, feed, sitemap, resources, verbatim copies
        assert!(out.join("about/index.html").is_file());
        assert!(out.join("projects/index.html").is_file());
        assert!(out.join("static/styles.css").is_file());
        assert!(out.join("donate.html").is_file());
        let feed = fs::read_to_string(out.join("feed.rss")).map_err(write::Error::from)?;
        assert_eq!(feed.matches("<item>").count(), 2);
        let sitemap = fs::read_to_string(out.join("sitemap.xml")).map_err(write::Error::from)?;
        assert!(sitemap.contains("https://example.com/posts/porting-splitter/"));
        assert!(sitemap.contains("https://example.com/tags/macos/"));
        Ok(())
    }

    #[test]
    fn test_build_site_with_zero_posts() -> Result<()> {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("resources")).unwrap();
        let mut config = config(dir.path());
        config.copy_files.clear();

        build_site(&config, &[], true)?;

        let out = config.output_dir();
        // an empty post list page, and a feed with zero entries; not an error
        assert!(out.join("posts/index.html").is_file());
        let feed = fs::read_to_string(out.join("feed.rss")).map_err(write::Error::from)?;
        assert!(!feed.contains("<item>"));
        Ok(())
    }

    #[test]
    fn test_duplicate_routes_abort_the_build() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("content/posts")).unwrap();
        fs::create_dir_all(dir.path().join("resources")).unwrap();
        // distinct file names, same slugified route
        for name in ["First Post.md", "first-post.md"] {
            fs::write(
                dir.path().join("content/posts").join(name),
                "---\ntitle: First Post\ndate: 2023-01-01\n---\nbody\n",
            )
            .unwrap();
        }
        let mut config = config(dir.path());
        config.copy_files.clear();

        let err = build_site(&config, &[], true).unwrap_err();
        assert!(matches!(
            err,
            Error::Content(content::Error::DuplicateRoute(_))
        ));
    }
}
