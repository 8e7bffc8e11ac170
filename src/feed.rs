//! RSS feed generation for the posts section. The channel assembly is
//! delegated to the [`rss`] crate's builders; this module only maps items
//! onto feed entries and validates the result before writing it.

use crate::config::SiteConfig;
use crate::content::Item;
use chrono::NaiveTime;
use rss::validation::{Validate, ValidationError};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use std::fmt;
use std::io::Write;
use url::Url;

/// Creates an RSS 2.0 feed from the posts and writes it to `w`. A site with
/// zero posts produces a valid channel with zero entries.
pub fn write_feed<W: Write>(config: &SiteConfig, posts: &[Item], w: W) -> Result<()> {
    let mut entries = Vec::with_capacity(posts.len());
    for post in posts {
        entries.push(feed_entry(&config.base_url, post)?);
    }

    let channel = ChannelBuilder::default()
        .title(&config.name)
        .link(config.base_url.as_str())
        .description(&config.description)
        .language(Some(config.language.clone()))
        .generator(Some("pagewright".to_owned()))
        .items(entries)
        .build();

    channel.validate()?;
    channel.write_to(w)?;
    Ok(())
}

fn feed_entry(base_url: &Url, post: &Item) -> Result<rss::Item> {
    let link = base_url.join(&post.route)?.to_string();

    // Posts carry a date but no time of day; publish them at midnight UTC.
    let published = post
        .date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc2822();

    Ok(ItemBuilder::default()
        .title(Some(post.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(post.description.clone()))
        .pub_date(Some(published))
        .build())
}

/// The result of a feed-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an RSS serialization error.
    Rss(rss::Error),

    /// Returned when the assembled channel fails validation.
    Validation(ValidationError),

    /// Returned when an entry's URL can't be resolved against the base URL.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Rss(err) => err.fmt(f),
            Error::Validation(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Rss(err) => Some(err),
            Error::Validation(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<rss::Error> for Error {
    /// Converts [`rss::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: rss::Error) -> Error {
        Error::Rss(err)
    }
}

impl From<ValidationError> for Error {
    /// Converts [`ValidationError`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: ValidationError) -> Error {
        Error::Validation(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator for URL joining.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::{SectionId, Tag};
    use std::path::PathBuf;

    fn config() -> SiteConfig {
        SiteConfig {
            name: "Michael Berk".to_owned(),
            description: "Michael Berk's website".to_owned(),
            base_url: Url::parse("https://example.com/").unwrap(),
            language: "en".to_owned(),
            favicon: "/static/images/favicon.png".to_owned(),
            content_dir: PathBuf::from("content"),
            resources_dir: PathBuf::from("resources"),
            output_dir: PathBuf::from("output"),
            copy_files: Vec::new(),
            deploy: None,
            project_root: PathBuf::new(),
        }
    }

    fn post(title: &str, date: &str) -> Item {
        Item {
            section: SectionId::Posts,
            title: title.to_owned(),
            description: "A post".to_owned(),
            body: String::new(),
            date: date.parse().expect("valid date"),
            last_modified: date.parse().expect("valid date"),
            tags: vec![Tag::new("swift")],
            route: format!("/posts/{}/", slug::slugify(title)),
        }
    }

    #[test]
    fn test_feed_with_zero_posts_is_valid_and_empty() -> Result<()> {
        let mut out = Vec::new();
        write_feed(&config(), &[], &mut out)?;
        let xml = String::from_utf8(out).expect("feed is UTF-8");
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
        Ok(())
    }

    #[test]
    fn test_feed_entries() -> Result<()> {
        let posts = vec![post("First", "2023-02-06"), post("Second", "2023-03-01")];
        let mut out = Vec::new();
        write_feed(&config(), &posts, &mut out)?;
        let xml = String::from_utf8(out).expect("feed is UTF-8");
        assert_eq!(xml.matches("<item>").count(), 2);
        assert!(xml.contains("<title>First</title>"));
        assert!(xml.contains("https://example.com/posts/first/"));
        assert!(xml.contains("Mon, 6 Feb 2023 00:00:00 +0000"));
        Ok(())
    }
}
