//! HTML views.
//!
//! Pages are assembled with `format!`; every piece of user-controlled text
//! goes through [`escape`].

use std::fmt::Write;

use gallery_core::{ImageRecord, MAX_TITLE_LEN};

/// State of the submission form after a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormNotice {
    /// Blank form.
    None,
    /// The image was added.
    Posted,
    /// The URL was already in the gallery.
    Repeated(String),
}

/// Escapes text for use in HTML bodies and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/public/style.css">
</head>
<body>
<header>
<nav><a href="/">Gallery</a> <a href="/add-image-form">Add image</a></nav>
</header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Gallery of `images`. `keyword` is echoed into the search box.
pub fn gallery_page(images: &[ImageRecord], keyword: Option<&str>) -> String {
    let keyword = keyword.unwrap_or("");
    let mut body = format!(
        r#"<form class="search" action="/search" method="get">
<input type="search" name="keyword" placeholder="Search by title" value="{}">
<button type="submit">Search</button>
</form>
"#,
        escape(keyword)
    );

    if images.is_empty() {
        let message = if keyword.is_empty() {
            "No images yet. <a href=\"/add-image-form\">Add the first one</a>.".to_string()
        } else {
            format!("No images match &quot;{}&quot;.", escape(keyword))
        };
        let _ = writeln!(body, r#"<p class="empty">{message}</p>"#);
        return layout("Gallery", &body);
    }

    body.push_str("<section class=\"gallery\">\n");
    for image in images {
        let color = image.dominant_color;
        let ink = if color.luma() > 140.0 { "#000" } else { "#fff" };
        let _ = writeln!(
            body,
            r#"<article class="card" style="background-color: {hex}; color: {ink}">
<img src="{url}" alt="{title}" loading="lazy">
<h2>{title}</h2>
<p class="color">{color}</p>
<form action="/images/{id}/delete" method="post">
<button type="submit">Delete</button>
</form>
</article>"#,
            hex = color.to_hex(),
            url = escape(&image.url),
            title = escape(&image.title),
            id = image.id,
        );
    }
    body.push_str("</section>\n");

    layout("Gallery", &body)
}

/// Submission form with an optional notice above it.
pub fn form_page(notice: &FormNotice) -> String {
    let notice = match notice {
        FormNotice::None => String::new(),
        FormNotice::Posted => {
            "<p id=\"message\" class=\"notice success\">Image added to the gallery.</p>\n"
                .to_string()
        }
        FormNotice::Repeated(url) => format!(
            "<p id=\"message\" class=\"notice warning\">The image {} is already in the gallery.</p>\n",
            escape(url)
        ),
    };

    let body = format!(
        r#"<h1>Add an image</h1>
{notice}<form action="/add-image-form" method="post">
<label>Title <input type="text" name="title" required maxlength="{max}" pattern="[0-9A-Za-z_\s]+"></label>
<label>URL <input type="url" name="url" required></label>
<button type="submit">Add</button>
</form>
<script src="/public/form.js"></script>
"#,
        max = MAX_TITLE_LEN,
    );

    layout("Add image", &body)
}

/// Generic page for unexpected failures.
pub fn apology_page() -> String {
    layout(
        "Error",
        "<p>Sorry! The operation failed. The developers have been notified. \
         Please try again later. Back to the <a href=\"/\">home page</a>.</p>",
    )
}
