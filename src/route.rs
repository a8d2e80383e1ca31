//! Page identity plus the optional record id that edit and detail pages
//! receive, written as `page?id=value`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Explore,
    Collection,
    /// Add form when `id` is `None`, edit form otherwise.
    Form { id: Option<String> },
    Detail { id: Option<String> },
}

impl Route {
    pub fn add() -> Self {
        Route::Form { id: None }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Route::Form {
            id: Some(id.into()),
        }
    }

    pub fn detail(id: impl Into<String>) -> Self {
        Route::Detail {
            id: Some(id.into()),
        }
    }

    /// Parse `page` or `page?id=value`. Page names accept the short form
    /// (`detail`) and the old page file names (`book_detail.html`).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (page, query) = match raw.split_once('?') {
            Some((page, query)) => (page, Some(query)),
            None => (raw, None),
        };
        let page = page.trim_start_matches('/');
        let page = page.strip_suffix(".html").unwrap_or(page);
        let id = query.and_then(query_id);

        match page.to_ascii_lowercase().as_str() {
            "" | "home" | "index" => Some(Route::Home),
            "explore" => Some(Route::Explore),
            "collection" | "save" => Some(Route::Collection),
            "form" | "add" | "add_book" | "edit" => Some(Route::Form { id }),
            "detail" | "book_detail" => Some(Route::Detail { id }),
            _ => None,
        }
    }

    pub fn page_name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Explore => "explore",
            Route::Collection => "collection",
            Route::Form { .. } => "form",
            Route::Detail { .. } => "detail",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Route::Form { id } | Route::Detail { id } => id.as_deref(),
            _ => None,
        }
    }
}

fn query_id(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|value| !value.is_empty())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}?id={}", self.page_name(), urlencoding::encode(id)),
            None => write!(f, "{}", self.page_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pages_and_ids() {
        assert_eq!(Route::parse("explore"), Some(Route::Explore));
        assert_eq!(Route::parse("save.html"), Some(Route::Collection));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(
            Route::parse("book_detail.html?id=abc"),
            Some(Route::detail("abc"))
        );
        assert_eq!(Route::parse("add_book"), Some(Route::add()));
        assert_eq!(Route::parse("form?x=1&id=a%20b"), Some(Route::edit("a b")));
        assert_eq!(Route::parse("detail?id="), Some(Route::Detail { id: None }));
        assert_eq!(Route::parse("settings"), None);
    }

    #[test]
    fn display_round_trips() {
        for route in [Route::Home, Route::Collection, Route::edit("x y"), Route::detail("1")] {
            assert_eq!(Route::parse(&route.to_string()), Some(route));
        }
    }
}
