//! Page contexts and HTML rendering.
//!
//! The builder assembles one context record per page and hands it to a
//! [`PageRenderer`]. Contexts are plain serializable data, so a renderer
//! only needs the record and the template it names:
//!
//! ```text
//! DirectoryPage {title, site, css_dir, breadcrumbs, subdirs, photos}
//!     subdirs: [{link, title, preview?, width?, height?}]
//!     photos:  [{link, preview, caption, width, height}]
//! PhotoPage     {title, site, css_dir, breadcrumbs, prev, next,
//!                photo, view, caption, width, height}
//! ```
//!
//! Links are relative to the page, so a published tree works from any URL
//! prefix or straight from disk. `css_dir` is the `../` prefix from the
//! page's directory back to the target root.
//!
//! ## HTML Generation
//!
//! [`HtmlRenderer`] uses [maud](https://maud.lambda.xyz/) for compile-time
//! HTML templating with automatic escaping. The stylesheet is linked, not
//! inlined; [`DEFAULT_STYLESHEET`] is published when the gallery configures
//! none.

use maud::{DOCTYPE, Markup, html};
use serde::Serialize;
use thiserror::Error;

/// Stylesheet published as `carousel.css` when none is configured.
pub const DEFAULT_STYLESHEET: &str = include_str!("../static/carousel.css");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(String),
}

/// One step of the trail from the gallery root to a page's parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub title: String,
    pub link: String,
}

/// Thumbnail of a listed subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewImage {
    pub preview: String,
    pub width: u32,
    pub height: u32,
}

/// A subdirectory in a directory listing. Directories without a reserved
/// preview image are listed without a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdirEntry {
    pub link: String,
    pub title: String,
    #[serde(flatten)]
    pub preview: Option<PreviewImage>,
}

/// A photo in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoEntry {
    pub link: String,
    pub preview: String,
    pub caption: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryPage {
    pub title: String,
    pub site: String,
    pub css_dir: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub subdirs: Vec<SubdirEntry>,
    pub photos: Vec<PhotoEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoPage {
    pub title: String,
    pub site: String,
    pub css_dir: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub prev: Option<String>,
    pub next: Option<String>,
    /// Full-size image, relative to the page.
    pub photo: String,
    /// View-sized image, relative to the page.
    pub view: String,
    pub caption: String,
    /// Dimensions of the view image.
    pub width: u32,
    pub height: u32,
}

/// A page to render, tagged with its template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageContext {
    Directory(DirectoryPage),
    Photo(PhotoPage),
}

impl PageContext {
    /// Identifier of the template this context is rendered with.
    pub fn template(&self) -> &'static str {
        match self {
            PageContext::Directory(_) => "directory",
            PageContext::Photo(_) => "photo",
        }
    }
}

/// Turns a page context into page text.
pub trait PageRenderer {
    fn render(&self, page: &PageContext) -> Result<String, RenderError>;
}

/// Production renderer: static HTML via maud.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl PageRenderer for HtmlRenderer {
    fn render(&self, page: &PageContext) -> Result<String, RenderError> {
        let markup = match page {
            PageContext::Directory(dir) => render_directory(dir),
            PageContext::Photo(photo) => render_photo(photo),
        };
        Ok(markup.into_string())
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css_dir: &str, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ (css_dir) "carousel.css" };
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

/// Renders the breadcrumb trail followed by the current page's title
fn breadcrumb_nav(crumbs: &[Breadcrumb], current: &str) -> Markup {
    html! {
        nav.breadcrumb {
            @for crumb in crumbs {
                a href=(crumb.link) { (crumb.title) }
                " › "
            }
            span.current { (current) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_directory(page: &DirectoryPage) -> Markup {
    let content = html! {
        header.site-header {
            @if !page.breadcrumbs.is_empty() {
                (breadcrumb_nav(&page.breadcrumbs, &page.title))
            }
            h1 { (page.title) }
        }
        main.directory-page {
            @if !page.subdirs.is_empty() {
                ul.subdirs {
                    @for subdir in &page.subdirs {
                        li {
                            a href=(subdir.link) {
                                @if let Some(preview) = &subdir.preview {
                                    img src=(preview.preview) width=(preview.width)
                                        height=(preview.height) alt=(subdir.title) loading="lazy";
                                }
                                span.subdir-title { (subdir.title) }
                            }
                        }
                    }
                }
            }
            div.photo-grid {
                @for photo in &page.photos {
                    a.thumb-link href=(photo.link) {
                        img src=(photo.preview) width=(photo.width) height=(photo.height)
                            alt=(photo.caption) loading="lazy";
                        @if !photo.caption.is_empty() {
                            span.caption { (photo.caption) }
                        }
                    }
                }
            }
        }
    };

    base_document(
        &format!("{} - {}", page.title, page.site),
        &page.css_dir,
        "directory",
        content,
    )
}

fn render_photo(page: &PhotoPage) -> Markup {
    let content = html! {
        header.site-header {
            (breadcrumb_nav(&page.breadcrumbs, &page.title))
        }
        main.photo-page {
            figure {
                a href=(page.photo) {
                    img src=(page.view) width=(page.width) height=(page.height) alt=(page.title);
                }
                @if !page.caption.is_empty() {
                    figcaption { (page.caption) }
                }
            }
            nav.photo-nav {
                @if let Some(prev) = &page.prev {
                    a.prev href=(prev) rel="prev" { "‹ Previous" }
                }
                @if let Some(next) = &page.next {
                    a.next href=(next) rel="next" { "Next ›" }
                }
            }
        }
    };

    base_document(
        &format!("{} - {}", page.title, page.site),
        &page.css_dir,
        "photo",
        content,
    )
}
