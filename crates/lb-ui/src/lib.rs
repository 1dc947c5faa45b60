use askama::Template;

/// The single page shell; the feed itself is filled in by `public/main.js`.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    /// Collection endpoint the page script talks to (e.g. "/api/threads")
    pub api_base: &'a str,
}
