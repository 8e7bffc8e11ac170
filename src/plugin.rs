//! Content-transform plugins. A [`Plugin`] can rewrite an item's rendered
//! body and contribute extra stylesheets and scripts to every page's
//! `<head>`. Installing plugins is the first step of the build pipeline;
//! the set is fixed per build and never changes mid-run.

/// A content-transform plugin.
pub struct Plugin {
    /// The plugin's name, used only for logging.
    pub name: &'static str,

    /// Site-relative stylesheet URLs added to every page's head.
    pub stylesheets: Vec<String>,

    /// Site-relative script URLs added to every page's head.
    pub scripts: Vec<String>,

    /// An optional transform applied to each item's rendered HTML body.
    pub transform: Option<fn(&str) -> String>,
}

/// The head assets contributed by the installed plugins, aggregated once at
/// install time and shared read-only with the theme.
#[derive(Default)]
pub struct PluginAssets {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl PluginAssets {
    /// Collects the stylesheets and scripts of all installed plugins, in
    /// installation order.
    pub fn install(plugins: &[Plugin]) -> PluginAssets {
        let mut assets = PluginAssets::default();
        for plugin in plugins {
            log::info!("installing plugin `{}`", plugin.name);
            assets.stylesheets.extend(plugin.stylesheets.iter().cloned());
            assets.scripts.extend(plugin.scripts.iter().cloned());
        }
        assets
    }
}

/// Client-side syntax highlighting via highlight.js. The markdown renderer
/// already emits `language-*` classes on fenced code blocks; this plugin
/// only adds the stylesheet and the bootstrap script that highlights them in
/// the browser. Both files live in the site's static resources.
pub fn highlight_js() -> Plugin {
    Plugin {
        name: "highlight-js",
        stylesheets: vec!["/static/hl.css".to_owned()],
        scripts: vec!["/static/hl.js".to_owned()],
        transform: None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_install_aggregates_in_order() {
        let plugins = vec![
            highlight_js(),
            Plugin {
                name: "analytics",
                stylesheets: vec![],
                scripts: vec!["/static/analytics.js".to_owned()],
                transform: None,
            },
        ];
        let assets = PluginAssets::install(&plugins);
        assert_eq!(assets.stylesheets, vec!["/static/hl.css"]);
        assert_eq!(assets.scripts, vec!["/static/hl.js", "/static/analytics.js"]);
    }
}
