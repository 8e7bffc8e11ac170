//! The About page: a standalone document constructed in code rather than
//! parsed from a content file.

use crate::content::Page;
use chrono::NaiveDate;
use maud::html;

/// Constructs the About page.
pub fn page() -> Page {
    let date = NaiveDate::from_ymd_opt(2023, 2, 6).unwrap();
    Page {
        route: "/about/".to_owned(),
        title: "About".to_owned(),
        description: String::new(),
        body: html! {
            div {
                h1 { "About" }
                div {
                    img src="/static/images/portrait.jpeg" alt="" style="display: block";
                }
                p {
                    "Hello! I'm Michael. I've been developing apps for iOS \
                     and macOS for years."
                }
            }
        },
        date,
        last_modified: date,
    }
}
