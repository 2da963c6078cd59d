//! Seed content for corpus messages.

use mailforge_mime::{BoundaryGenerator, ContentType, Entity, Result};

/// Stock plain-text sample body.
pub const TEXT_BODY: &str = "This is a test\n\
                             message on multiple lines\n\
                             \n\
                             with a silly bit more.\n\
                             --\n\
                             and a .sig here.\n";

/// Stock HTML sample body.
pub const HTML_BODY: &str = "<html>\n\
                             <head>\n\
                             <title>titles are usually unrendered</title>\n\
                             </head>\n\
                             <body>\n\
                             <p>This is a test<br/>message on multiple lines</p>\n\
                             <p>with a silly bit more.</p>\n\
                             <hr/>\n\
                             <p>and a .sig here.</p>\n\
                             </body>\n\
                             </html>\n";

/// Builds the plain-text part, substituting `extended` for the stock body
/// when a message carries an extended description.
#[must_use]
pub fn text_plain(extended: Option<&str>) -> Entity {
    Entity::leaf(
        ContentType::text_plain(),
        extended.unwrap_or(TEXT_BODY),
    )
}

/// Builds the HTML part.
#[must_use]
pub fn text_html() -> Entity {
    Entity::leaf(ContentType::text_html(), HTML_BODY)
}

/// Builds the stock `multipart/alternative` body from the plain-text and
/// HTML parts.
///
/// # Errors
///
/// Mirrors [`Entity::multipart`]; cannot fail structurally here.
pub fn alternative(boundaries: &mut BoundaryGenerator, extended: Option<&str>) -> Result<Entity> {
    Entity::multipart(
        ContentType::new("multipart", "alternative"),
        vec![text_plain(extended), text_html()],
        boundaries.next_boundary(),
    )
}
