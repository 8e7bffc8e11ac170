//! The hand-authored project list shown on the projects index. These
//! entries are maintained here rather than derived from content files; a
//! new app ships rarely enough that editing this file is the whole
//! workflow.

use maud::{html, Markup};

struct ProjectRow<'a> {
    title: &'a str,
    /// One paragraph per line of blurb text.
    info: &'a [&'a str],
    icon: &'a str,
    icon_alt: &'a str,
    link: &'a str,
}

/// The fixed sequence of project entries, newest first.
pub fn homepage() -> Markup {
    let rows = [
        ProjectRow {
            title: "Splitter",
            info: &["The speedrunning timer for macOS"],
            icon: "/static/images/Splitter-icon.png",
            icon_alt: "Icon for the Splitter app",
            link: "https://splitter.mberk.com",
        },
        ProjectRow {
            title: "Siddur + Tehillim Anywhere",
            info: &[
                "The Jewish prayer book, on your iPhone or iPad.",
                "Includes Nusach Ashkenaz, Sefard, and Edot HaMizrach",
            ],
            icon: "/static/images/Siddur-icon.png",
            icon_alt: "Icon for the Siddur app",
            link: "https://apps.apple.com/us/app/siddur-tehilim-anywhere/id1455032858",
        },
        ProjectRow {
            title: "BlueBed",
            info: &["Disconnect a Bluetooth device when your Mac sleeps. Reconnect when it wakes"],
            icon: "/static/images/BlueBed-icon.png",
            icon_alt: "Icon for the BlueBed app",
            link: "https://apps.apple.com/us/app/bluebed/id6484504503?mt=12",
        },
        ProjectRow {
            title: "Zmanim",
            info: &["Keep track of Zmanim on iPhone and iPad"],
            icon: "/static/images/Zmanim-icon.png",
            icon_alt: "Icon for the Zmanim app",
            link: "https://apps.apple.com/us/app/zmanim/id1534265457",
        },
    ];

    html! {
        div class="projlist" {
            @for row in &rows {
                (project_row(row))
            }
        }
    }
}

fn project_row(row: &ProjectRow) -> Markup {
    let title = html! {
        a href=(row.link) {
            p class="project-title" { (row.title) }
        }
    };
    html! {
        div class="projrow" {
            div class="smallWidth-proj-title" { (title) }
            div class="projrow-image" {
                a href=(row.link) {
                    img src=(row.icon) alt=(row.icon_alt);
                }
            }
            div class="projrow-text" {
                div class="fullWidth-proj-title" { (title) }
                @for line in row.info {
                    p { (line) }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_every_row_links_its_title_and_icon() {
        let html = homepage().into_string();
        assert_eq!(html.matches("class=\"projrow\"").count(), 4);
        assert!(html.contains("Splitter"));
        assert!(html.contains("https://splitter.mberk.com"));
        assert!(html.contains("Splitter-icon.png"));
    }
}
