//! Presentation layer: a view is a name, a title and a JSON data mapping;
//! a [`Presenter`] turns it into an HTML document.

use std::fmt::Write as _;

use axum::http::{HeaderMap, StatusCode, header};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::Category;

#[derive(Debug, Clone)]
pub struct View {
    pub name: &'static str,
    pub title: String,
    pub status: StatusCode,
    pub data: Map<String, Value>,
}

impl View {
    pub fn new(name: &'static str, title: impl Into<String>) -> Self {
        Self {
            name,
            title: title.into(),
            status: StatusCode::OK,
            data: Map::new(),
        }
    }

    pub fn error(status: StatusCode, title: impl Into<String>, message: impl Into<String>) -> Self {
        View::new("error", title)
            .status(status)
            .with("message", message.into())
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|err| {
            tracing::warn!(view = self.name, key, error = %err, "view value not serializable");
            Value::Null
        });
        self.data.insert(key.to_string(), value);
        self
    }

    /// Copy every field of a serializable struct into the view data.
    pub fn merge(mut self, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Object(fields)) => self.data.extend(fields),
            Ok(_) => tracing::warn!(view = self.name, "merged view data is not an object"),
            Err(err) => tracing::warn!(view = self.name, error = %err, "view data not serializable"),
        }
        self
    }

    pub fn errors(self, errors: &[String]) -> Self {
        self.with("errors", errors)
    }
}

/// Renders views to HTML. Template engines plug in here.
pub trait Presenter: Send + Sync {
    fn render(&self, view: &View, nav: &[Category]) -> String;
}

/// Minimal presenter: a layout with the navigation menu, the inline error
/// list and the view data embedded as JSON for client-side templates.
#[derive(Debug, Clone)]
pub struct HtmlShell {
    app_name: String,
}

impl HtmlShell {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Presenter for HtmlShell {
    fn render(&self, view: &View, nav: &[Category]) -> String {
        let app = escape_html(&self.app_name);
        let title = escape_html(&view.title);
        let mut html = String::with_capacity(2048);

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title} | {app}</title>\n\
             <link rel=\"stylesheet\" href=\"/css/main.css\">\n</head>\n\
             <body data-view=\"{}\">\n<nav>\n<a href=\"/\">{app}</a>\n<ul>\n",
            escape_html(view.name)
        );
        for category in nav {
            let _ = writeln!(
                html,
                "<li><a href=\"/products?category={}\">{}</a></li>",
                escape_html(&category.slug),
                escape_html(&category.name)
            );
        }
        let _ = write!(html, "</ul>\n</nav>\n<main>\n<h1>{title}</h1>\n");

        if let Some(message) = view.data.get("message").and_then(Value::as_str) {
            let _ = writeln!(html, "<p class=\"message\">{}</p>", escape_html(message));
        }
        if let Some(errors) = view.data.get("errors").and_then(Value::as_array) {
            html.push_str("<ul class=\"errors\">\n");
            for error in errors.iter().filter_map(Value::as_str) {
                let _ = writeln!(html, "<li>{}</li>", escape_html(error));
            }
            html.push_str("</ul>\n");
        }

        let data = Value::Object(view.data.clone()).to_string();
        let _ = write!(
            html,
            "<script type=\"application/json\" id=\"page-data\">{}</script>\n</main>\n</body>\n</html>\n",
            data.replace('<', "\\u003c")
        );
        html
    }
}

/// Whether the client asked for the JSON envelope instead of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|accept| accept.contains("json"));
        let is_xhr = headers
            .get("x-requested-with")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"));
        if wants_json || is_xhr {
            ResponseFormat::Json
        } else {
            ResponseFormat::Html
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
