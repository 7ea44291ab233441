use std::collections::{HashMap, HashSet};

/// Render note or grammar text as sanitized HTML.
#[must_use]
pub fn render_markdown(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

/// Escape plain text for `dangerous_inner_html`, keeping line breaks.
#[must_use]
pub fn plain_text_html(input: &str) -> String {
    input
        .lines()
        .map(ammonia::clean_text)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Strip everything but basic formatting, tables and furigana markup.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "br", "em", "strong", "del", "code", "pre", "blockquote", "ul", "ol", "li", "h3",
        "h4", "table", "thead", "tbody", "tr", "th", "td", "ruby", "rt", "rp", "a",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}
