//! View renderer contract and the built-in page renderer.

use std::sync::Arc;

use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::person::Person;
use crate::response::{IntoResponse, Response};

/// Template name of the people list page.
pub const INDEX: &str = "index.html";

/// Browser script loaded by the list page.
pub const SCRIPT: &str = include_str!("../assets/scripts.js");

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),
    #[error("invalid context: {0}")]
    Context(#[from] serde_json::Error),
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!("render failed: {self}");
        Response::status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Turns a template name and a context mapping into a page.
pub trait ViewRenderer: Send + Sync + 'static {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError>;
}

impl<R: ViewRenderer> ViewRenderer for Arc<R> {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        (**self).render(template, context)
    }
}

/// Renders the pages compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageRenderer;

#[derive(Deserialize)]
struct IndexContext {
    host_name: String,
    db_host: Option<String>,
    backend: String,
    data: Vec<Person>,
}

impl ViewRenderer for PageRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        match template {
            INDEX => Ok(index(&IndexContext::deserialize(context)?)),
            other => Err(RenderError::UnknownTemplate(other.to_owned())),
        }
    }
}

fn index(ctx: &IndexContext) -> String {
    let mut page = String::with_capacity(2048 + ctx.data.len() * 256);
    page.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>WorkProfile</title>\n</head>\n<body>\n<h1>WorkProfile</h1>\n",
    );
    page.push_str(&format!(
        "<p class=\"meta\">Served by <b>{}</b> &middot; database <b>{}</b></p>\n",
        escape(&ctx.host_name),
        escape(ctx.db_host.as_deref().unwrap_or("none")),
    ));

    page.push_str("<button onclick=\"handleClick()\">Add person</button>\n");
    if ctx.data.is_empty() {
        page.push_str("<p class=\"empty\">No people yet.</p>\n");
    } else {
        page.push_str("<section class=\"people\">\n");
        for person in &ctx.data {
            page.push_str(&format!(
                "<div class=\"person\" onclick=\"handlePersonClick(this, {id})\">\
                 <h2>{first} {last}</h2><p>Age {age}</p><p>{address}</p><p>{workplace}</p></div>\n",
                id = person.id,
                first = escape(&person.first_name),
                last = escape(&person.last_name),
                age = person.age,
                address = escape(&person.address),
                workplace = escape(&person.workplace),
            ));
        }
        page.push_str("</section>\n");
    }

    page.push_str(
        "<div id=\"personModal\" style=\"display:none\">\n<form id=\"addPersonForm\">\n\
         <input id=\"firstName\" placeholder=\"First name\" required>\n\
         <input id=\"lastName\" placeholder=\"Last name\" required>\n\
         <input id=\"age\" type=\"number\" min=\"0\" placeholder=\"Age\" required>\n\
         <input id=\"address\" placeholder=\"Address\" required>\n\
         <input id=\"workplace\" placeholder=\"Workplace\" required>\n\
         <button type=\"submit\">Save</button>\n\
         <button type=\"button\" onclick=\"closeModal()\">Cancel</button>\n\
         </form>\n</div>\n",
    );

    page.push_str(&format!("<script>const backend = {};</script>\n", script_string(&ctx.backend)));
    page.push_str("<script src=\"/static/scripts.js\"></script>\n</body>\n</html>\n");
    page
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// A JS string literal that cannot close the surrounding `<script>`.
fn script_string(text: &str) -> String {
    Value::String(text.to_owned()).to_string().replace("</", "<\\/")
}
