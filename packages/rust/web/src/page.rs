//! HTML page template for the course front end.

use std::fmt::Write;

use coursegen_core::{escape_html, render_markdown};
use coursegen_shared::{CourseResult, ModuleVideos, VideoDescriptor};

/// Text shown before any course has been generated.
pub const PLACEHOLDER: &str = "Output will be here";

/// Everything the page template needs.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Topic to pre-fill in the form.
    pub topic: Option<&'a str>,
    /// Course Markdown, rendered into the content area.
    pub course_markdown: Option<&'a str>,
    /// Per-module videos, in display order.
    pub modules: &'a [ModuleVideos],
    /// User-facing error banner.
    pub error: Option<&'a str>,
}

impl<'a> PageView<'a> {
    /// Empty landing page.
    pub fn landing() -> Self {
        Self::default()
    }

    /// Page showing a generated course.
    pub fn course(result: &'a CourseResult) -> Self {
        Self {
            topic: Some(result.document.topic.as_str()),
            course_markdown: Some(result.text()),
            modules: &result.modules,
            error: None,
        }
    }

    /// Page showing an error next to the form.
    pub fn error(topic: Option<&'a str>, message: &'a str) -> Self {
        Self {
            topic,
            error: Some(message),
            ..Self::default()
        }
    }
}

/// Render the full HTML document.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    let title = match view.topic {
        Some(topic) => format!("{} · CourseGen", escape_html(topic)),
        None => "CourseGen".to_string(),
    };

    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/styles.css">
</head>
<body>
<header>
<h1>CourseGen</h1>
<p>Enter a topic to generate a structured course with suggested videos.</p>
</header>
<form class="topic-form" method="post" action="/submit">
<input type="text" name="topic" placeholder="e.g. Python programming" value="{topic}" required>
<button type="submit">Generate course</button>
</form>
"#,
        topic = escape_html(view.topic.unwrap_or_default()),
    );

    if let Some(error) = view.error {
        let _ = writeln!(out, r#"<p class="error" role="alert">{}</p>"#, escape_html(error));
    }

    out.push_str("<main>\n<article class=\"course-content\">\n");
    match view.course_markdown {
        Some(md) => out.push_str(&render_markdown(md)),
        None => {
            let _ = writeln!(out, "<p>{PLACEHOLDER}</p>");
        }
    }
    out.push_str("</article>\n");

    if !view.modules.is_empty() {
        out.push_str("<h2>Recommended videos</h2>\n");
        for module in view.modules {
            render_module(&mut out, module);
        }
    }

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn render_module(out: &mut String, module: &ModuleVideos) {
    let _ = writeln!(
        out,
        "<section class=\"module\">\n<h3>{}</h3>",
        escape_html(module.heading.as_str())
    );

    if module.videos.is_empty() {
        out.push_str("<p class=\"no-videos\">No videos found for this module.</p>\n");
    } else {
        out.push_str("<div class=\"videos\">\n");
        for video in &module.videos {
            render_video(out, video);
        }
        out.push_str("</div>\n");
    }

    out.push_str("</section>\n");
}

fn render_video(out: &mut String, video: &VideoDescriptor) {
    let title = escape_html(&video.title);
    let _ = writeln!(
        out,
        r#"<div class="video" itemscope itemtype="https://schema.org/VideoObject">
<iframe src="{src}" title="{title}" loading="lazy" allow="accelerometer; encrypted-media; picture-in-picture" allowfullscreen></iframe>
<p class="title" itemprop="name">{title}</p>"#,
        src = escape_html(&video.embed_url),
    );

    if let Some(thumb) = &video.thumbnail_url {
        let _ = writeln!(
            out,
            r#"<meta itemprop="thumbnailUrl" content="{}">"#,
            escape_html(thumb)
        );
    }

    let _ = write!(out, r#"<p class="meta">{}"#, escape_html(&video.channel));
    if let Some(published) = video.published_at {
        let _ = write!(
            out,
            r#" · <time datetime="{}">{}</time>"#,
            published.to_rfc3339(),
            published.format("%b %-d, %Y")
        );
    }
    out.push_str("</p>\n</div>\n");
}
