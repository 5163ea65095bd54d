//! The submission form page.
//!
//! Field limits and the genre list are filled in from the same constants the
//! validator enforces, so the browser and the server agree.

use std::sync::OnceLock;

use axum::response::Html;

use crate::submission::{Genre, MAX_DESCRIPTION, MAX_NAME, MAX_OTHER_GENRE};

const TEMPLATE: &str = include_str!("../../assets/form.html");

/// Render the form page.
pub fn render_form() -> String {
    let options = Genre::ALL
        .iter()
        .map(|genre| format!("        <option value=\"{0}\">{0}</option>", genre))
        .collect::<Vec<_>>()
        .join("\n");

    TEMPLATE
        .replace("{{MAX_DESCRIPTION}}", &MAX_DESCRIPTION.to_string())
        .replace("{{MAX_OTHER_GENRE}}", &MAX_OTHER_GENRE.to_string())
        .replace("{{MAX_NAME}}", &MAX_NAME.to_string())
        .replace("{{GENRE_OPTIONS}}", &options)
}

pub async fn form_handler() -> Html<&'static str> {
    static PAGE: OnceLock<String> = OnceLock::new();
    Html(PAGE.get_or_init(render_form).as_str())
}
