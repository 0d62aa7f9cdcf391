//! HTML cleaning for user-authored community content.

/// Strips scripts, event handlers and other unsafe markup, keeping ordinary
/// formatting tags.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// Visible text with every tag removed, trimmed.
pub fn plain_text(html: &str) -> String {
    ammonia::Builder::empty().clean(html).to_string().trim().to_string()
}

pub fn has_visible_text(html: &str) -> bool {
    !plain_text(html).is_empty()
}
