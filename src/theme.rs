//! The site theme: pure functions mapping content values to [`maud`] markup
//! trees. Every page kind gets one compose function, all dispatched from
//! [`render`] over the [`PageRef`] union. Nothing in this module performs
//! I/O or holds state; given the same inputs, the same markup comes out.

use crate::config::SiteConfig;
use crate::content::{Item, Page, Section, SectionId, Tag};
use crate::plugin::PluginAssets;
use crate::projects;
use chrono::NaiveDate;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::collections::BTreeSet;

/// A reference to the page being composed. The variants are the site's page
/// kinds; [`render`] matches exhaustively so a new kind can't be added
/// without deciding how it renders.
#[derive(Clone, Copy)]
pub enum PageRef<'a> {
    /// A section's listing page (also used for the home page).
    SectionIndex(&'a Section),

    /// A single item's page.
    Item(&'a Item),

    /// The page listing every tag in the site-wide index.
    TagList(&'a BTreeSet<Tag>),

    /// One tag's detail page, listing the items carrying it.
    TagDetail {
        tag: &'a Tag,
        /// The tagged items, sorted by date descending by the caller.
        items: &'a [&'a Item],
    },

    /// A standalone page outside any section.
    Standalone(&'a Page),
}

impl PageRef<'_> {
    /// The section the page belongs to, for navigation highlighting. Tag
    /// pages belong to the posts section; standalone pages belong to none.
    fn section(&self) -> Option<SectionId> {
        match self {
            PageRef::SectionIndex(section) => Some(section.id),
            PageRef::Item(item) => Some(item.section),
            PageRef::TagList(_) => Some(SectionId::Posts),
            PageRef::TagDetail { .. } => Some(SectionId::Posts),
            PageRef::Standalone(_) => None,
        }
    }
}

/// Composes a full HTML document for one page.
pub fn render(config: &SiteConfig, assets: &PluginAssets, page: PageRef) -> Markup {
    match page {
        PageRef::SectionIndex(section) => match section.id {
            SectionId::Projects => projects_page(config, assets, section),
            SectionId::Posts => section_page(config, assets, section),
        },
        PageRef::Item(item) => item_page(config, assets, item),
        PageRef::TagList(tags) => tag_list_page(config, assets, tags),
        PageRef::TagDetail { tag, items } => tag_detail_page(config, assets, tag, items),
        PageRef::Standalone(page) => standalone_page(config, assets, page),
    }
}

/// The date format used on item pages.
const DATE_FORMAT: &str = "%B %-d, %Y";

/// Formats a date with an explicit format string. Kept stateless on purpose;
/// there is no shared formatter anywhere in the theme.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Destination of the fixed "Tip Jar" navigation entry.
const TIP_JAR_URL: &str = "https://ko-fi.com/mjberk";

/// The document shell shared by every page: head, site header with
/// navigation, the page contents, and the site footer.
fn shell(
    config: &SiteConfig,
    assets: &PluginAssets,
    selected: Option<SectionId>,
    title: &str,
    description: &str,
    contents: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.language) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (config.name) }
                meta name="description" content=(description);
                link rel="stylesheet" href="/static/styles.css";
                @for stylesheet in &assets.stylesheets {
                    link rel="stylesheet" href=(stylesheet);
                }
                link rel="icon" type="image/png" href=(config.favicon);
                link rel="alternate" type="application/rss+xml" title=(config.name) href="/feed.rss";
                @for script in &assets.scripts {
                    script src=(script) defer {}
                }
            }
            body {
                div class="page" {
                    (site_header(config, selected))
                    (contents)
                    (site_footer())
                }
            }
        }
    }
}

fn site_header(config: &SiteConfig, selected: Option<SectionId>) -> Markup {
    html! {
        header {
            div class="head" {
                div class="head-title" {
                    a href="/" { (config.name) }
                }
                div class="head-nav" {
                    @for id in SectionId::ALL {
                        (nav_link(id.title(), &id.route(), Some(id), selected, false))
                    }
                    (nav_link("Tip Jar", TIP_JAR_URL, None, selected, true))
                }
            }
        }
    }
}

/// One navigation entry. The entry is marked `selected` only when it points
/// at a section and that section is the current one; an entry without a
/// section (the Tip Jar) never matches, and neither does any entry on a
/// page outside all sections.
fn nav_link(
    title: &str,
    href: &str,
    section: Option<SectionId>,
    selected: Option<SectionId>,
    external: bool,
) -> Markup {
    let class = if section.is_some() && section == selected {
        "nav-item selected"
    } else {
        "nav-item"
    };
    html! {
        div class="nav-item-box" {
            a class=(class) href=(href) target=[external.then_some("_blank")] {
                (title)
            }
        }
    }
}

fn site_footer() -> Markup {
    html! {
        footer {
            p {
                "Generated using "
                a href="https://github.com/mjberk/pagewright" { "pagewright" }
            }
            p {
                a href="/feed.rss" { "RSS feed" }
            }
            p { "Support Email: mjberk.dev[at]gmail.com" }
        }
    }
}

/// The tag list component: a fixed "Tags:" label followed by one link per
/// tag to that tag's detail page. An empty tag set still renders the
/// container and label, just with no links.
pub fn tag_list<'a, I>(tags: I) -> Markup
where
    I: IntoIterator<Item = &'a Tag>,
{
    html! {
        div class="tag-list-container" {
            div { "Tags:" }
            @for tag in tags {
                div class="tag" {
                    a href=(tag.route()) { (tag.slug()) }
                }
            }
        }
    }
}

/// The item list component: one card per item with a title link, the item's
/// tag list, and its description, in the order given by the caller.
fn item_list<'a, I>(items: I) -> Markup
where
    I: IntoIterator<Item = &'a Item>,
{
    html! {
        ul class="item-list" {
            @for item in items {
                li {
                    div class="main-card" {
                        h3 { a href=(item.route) { (item.title) } }
                        (tag_list(&item.tags))
                        p { (item.description) }
                    }
                }
            }
        }
    }
}

/// A generic section listing page (used for posts and for the home page).
fn section_page(config: &SiteConfig, assets: &PluginAssets, section: &Section) -> Markup {
    shell(
        config,
        assets,
        Some(section.id),
        section.id.title(),
        &config.description,
        html! {
            div class="wrapper" {
                (item_list(&section.items))
            }
        },
    )
}

/// The projects index. Its entries are a fixed, hand-authored sequence
/// ([`projects::homepage`]), not derived from content files.
fn projects_page(config: &SiteConfig, assets: &PluginAssets, section: &Section) -> Markup {
    shell(
        config,
        assets,
        Some(section.id),
        section.id.title(),
        &config.description,
        html! {
            div class="main-card" {
                h2 { "Projects" }
                (projects::homepage())
            }
        },
    )
}

fn item_page(config: &SiteConfig, assets: &PluginAssets, item: &Item) -> Markup {
    shell(
        config,
        assets,
        Some(item.section),
        &item.title,
        &item.description,
        html! {
            div class="main-card" {
                article class="content" {
                    h1 { (item.title) }
                    p class="contentDate" {
                        "Published: " (format_date(item.date, DATE_FORMAT))
                    }
                    p class="contentDate" {
                        "Updated: " (format_date(item.last_modified, DATE_FORMAT))
                    }
                    div class="divider" {}
                    (PreEscaped(item.body.as_str()))
                }
                (tag_list(&item.tags))
            }
        },
    )
}

fn tag_list_page(config: &SiteConfig, assets: &PluginAssets, tags: &BTreeSet<Tag>) -> Markup {
    shell(
        config,
        assets,
        Some(SectionId::Posts),
        "Tags",
        &config.description,
        html! {
            div class="main-card" {
                div class="all-tags" {
                    (tag_list(tags))
                }
            }
        },
    )
}

fn tag_detail_page(
    config: &SiteConfig,
    assets: &PluginAssets,
    tag: &Tag,
    items: &[&Item],
) -> Markup {
    shell(
        config,
        assets,
        Some(SectionId::Posts),
        &format!("Tagged with {}", tag.slug()),
        &config.description,
        html! {
            div class="wrapper" {
                h3 {
                    "Tagged with "
                    span class="tag" { (tag.slug()) }
                }
                a class="allTagsButton" href="/tags/" { "Browse all tags" }
                (item_list(items.iter().copied()))
            }
        },
    )
}

fn standalone_page(config: &SiteConfig, assets: &PluginAssets, page: &Page) -> Markup {
    shell(
        config,
        assets,
        None,
        &page.title,
        &page.description,
        html! {
            div class="main-card" {
                (page.body)
            }
        },
    )
}
