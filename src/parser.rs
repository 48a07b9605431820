use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use url::Url;

/// Title and plain-text rendering of one HTML document.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub title: String,
    pub content: String,
}

/// HTML parsing capability the crawl core depends on: a document goes in,
/// a title, a text rendering, and the anchor targets come out. Everything
/// here is pure; no network or crawl state is involved.
pub struct PageParser;

impl PageParser {
    pub fn parse(html: &str) -> ParsedPage {
        let document = Html::parse_document(html);

        let title = Selector::parse("title")
            .ok()
            .and_then(|selector| document.select(&selector).next())
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| "No title".to_string());

        let mut text = String::new();
        collect_text(document.tree.root(), &mut text);
        let content = text.split_whitespace().collect::<Vec<_>>().join(" ");

        ParsedPage { title, content }
    }

    /// Extracts every anchor target, resolved against `base_url` to an
    /// absolute URL. Fragments are stripped (they address positions within
    /// one page) and non-http(s) schemes are dropped.
    pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_link(base_url, href))
            .collect()
    }
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            out.push_str(text);
            out.push(' ');
        }
        Node::Element(element) => {
            if !matches!(element.name(), "script" | "style" | "noscript") {
                for child in node.children() {
                    collect_text(child, out);
                }
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html>
        <head>
            <title>  Robotics Lab  </title>
            <style>body { color: red; }</style>
        </head>
        <body>
            <h1>Welcome</h1>
            <p>Research on    autonomous robots.</p>
            <script>var hidden = "not content";</script>
            <a href="/projects">Projects</a>
            <a href="about.html">About</a>
            <a href="https://other.example.org/page">External</a>
            <a href="#section">Anchor</a>
            <a href="mailto:lab@example.com">Mail</a>
        </body>
        </html>
    "##;

    #[test]
    fn parses_title_and_content() {
        let page = PageParser::parse(PAGE);

        assert_eq!(page.title, "Robotics Lab");
        assert!(page.content.contains("Research on autonomous robots."));
        assert!(page.content.contains("Welcome"));
    }

    #[test]
    fn script_and_style_are_not_content() {
        let page = PageParser::parse(PAGE);

        assert!(!page.content.contains("not content"));
        assert!(!page.content.contains("color: red"));
    }

    #[test]
    fn missing_title_falls_back() {
        let page = PageParser::parse("<html><body><p>Hi</p></body></html>");
        assert_eq!(page.title, "No title");
    }

    #[test]
    fn links_are_resolved_against_the_page_url() {
        let base = Url::parse("https://example.com/lab/index.html").unwrap();
        let links = PageParser::extract_links(PAGE, &base);

        let links: Vec<String> = links.iter().map(Url::to_string).collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/projects",
                "https://example.com/lab/about.html",
                "https://other.example.org/page",
            ]
        );
    }

    #[test]
    fn fragments_are_stripped() {
        let base = Url::parse("https://example.com/").unwrap();
        let html = r##"<a href="/docs#intro">Docs</a>"##;

        let links = PageParser::extract_links(html, &base);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/docs");
    }
}
