//! HTML page generation.
//!
//! The page lists the scripts and stylesheets of its allowed entries. Tags are
//! injected before `</head>` (favicon, stylesheets) and `</body>` (scripts).

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use weft_config::HtmlMinifyOptions;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));
static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("inter-tag whitespace pattern"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace run pattern"));

/// Used when no template is configured.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlPage {
    /// Template path relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Script URLs, in load order
    pub scripts: Vec<String>,
    /// Stylesheet URLs, in load order
    pub stylesheets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub inject: bool,
    #[serde(skip)]
    pub minify: HtmlMinifyOptions,
}

impl HtmlPage {
    /// Render the page from `template` (or [`DEFAULT_TEMPLATE`]).
    pub fn render(&self, template: Option<&str>) -> String {
        let mut html = template.unwrap_or(DEFAULT_TEMPLATE).to_string();

        if self.inject {
            let mut head = String::new();
            if let Some(favicon) = &self.favicon {
                head.push_str(&format!("<link rel=\"icon\" href=\"{favicon}\">"));
            }
            for href in &self.stylesheets {
                head.push_str(&format!("<link href=\"{href}\" rel=\"stylesheet\">"));
            }

            let body: String = self
                .scripts
                .iter()
                .map(|src| format!("<script defer=\"defer\" src=\"{src}\"></script>"))
                .collect();

            html = insert_before(&html, "</head>", &head, false);
            html = insert_before(&html, "</body>", &body, true);
        }

        if self.minify.remove_comments {
            html = COMMENT.replace_all(&html, "").into_owned();
        }

        if self.minify.collapse_whitespace {
            html = BETWEEN_TAGS.replace_all(&html, "><").into_owned();
            html = WHITESPACE_RUN.replace_all(&html, " ").into_owned();
            html = html.trim().to_string();
        }

        html
    }
}

/// Insert `tags` before the first case-insensitive `marker`; prepend (or append
/// when `append_missing`) if the marker is absent.
fn insert_before(html: &str, marker: &str, tags: &str, append_missing: bool) -> String {
    if tags.is_empty() {
        return html.to_string();
    }

    match html.to_ascii_lowercase().find(marker) {
        Some(at) => format!("{}{tags}{}", &html[..at], &html[at..]),
        None if append_missing => format!("{html}{tags}"),
        None => format!("{tags}{html}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> HtmlPage {
        HtmlPage {
            template: None,
            scripts: vec!["./vanilla.bundle.js".to_string()],
            stylesheets: vec!["./vanilla.css".to_string()],
            favicon: Some("./favicon.ico".to_string()),
            inject: true,
            minify: HtmlMinifyOptions::default(),
        }
    }

    #[test]
    fn injects_tags_into_head_and_body() {
        let html = page().render(None);
        let head_end = html.find("</head>").unwrap();
        let body_end = html.find("</body>").unwrap();

        let css = html.find("./vanilla.css").unwrap();
        let icon = html.find("./favicon.ico").unwrap();
        let script = html.find("<script defer=\"defer\" src=\"./vanilla.bundle.js\">").unwrap();

        assert!(icon < css && css < head_end);
        assert!(head_end < script && script < body_end);
    }

    #[test]
    fn inject_false_leaves_template_untouched() {
        let mut page = page();
        page.inject = false;
        assert_eq!(page.render(Some("<p>hi</p>")), "<p>hi</p>");
    }

    #[test]
    fn markers_are_case_insensitive() {
        let html = page().render(Some("<HTML><HEAD></HEAD><BODY></BODY></HTML>"));
        assert!(html.contains("rel=\"stylesheet\"></HEAD>"));
        assert!(html.contains("</script></BODY>"));
    }

    #[test]
    fn template_without_markers_still_gets_tags() {
        let html = page().render(Some("<div id=\"root\"></div>"));
        assert!(html.starts_with("<link rel=\"icon\""));
        assert!(html.ends_with("</script>"));
    }

    #[test]
    fn minify_removes_comments_and_keeps_whitespace() {
        let mut page = page();
        page.inject = false;
        page.minify = HtmlMinifyOptions {
            remove_comments: true,
            collapse_whitespace: false,
        };
        let html = page.render(Some("<body>\n  <!-- %PUBLIC_URL% -->\n  <main></main>\n</body>"));
        assert_eq!(html, "<body>\n  \n  <main></main>\n</body>");
    }

    #[test]
    fn collapse_whitespace_joins_tags() {
        let mut page = page();
        page.inject = false;
        page.minify.collapse_whitespace = true;
        assert_eq!(
            page.render(Some("<ul>\n  <li>a   b</li>\n</ul>\n")),
            "<ul><li>a b</li></ul>"
        );
    }
}
