//! HTML serialization of a render tree
//!
//! Text markup is inserted as-is; every attribute value is escaped. Panel
//! regions are absolutely positioned inside a relative container.

use std::fmt::Write;

use super::{
    Activation, PanelView, RenderNode, RenderedPage, GALLERY_THUMB_WIDTH,
};

/// Headline shown for a page with nothing to render.
pub const EMPTY_PAGE_LABEL: &str = "No content.";
pub const EMPTY_PAGE_MESSAGE: &str =
    "It seems there's no content available for this section yet. Check back later!";

/// Escape text for use inside a double-quoted attribute or element body.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn to_html(page: &RenderedPage) -> String {
    let mut out = String::new();
    if page.is_empty() {
        let _ = write!(
            out,
            "<div class=\"page-empty\"><div class=\"page-empty-label\">{}</div><div>{}</div></div>",
            escape(EMPTY_PAGE_LABEL),
            escape(EMPTY_PAGE_MESSAGE)
        );
        return out;
    }

    out.push_str("<div class=\"page\">");
    for node in &page.nodes {
        write_node(&mut out, node);
    }
    out.push_str("</div>");
    out
}

fn write_node(out: &mut String, node: &RenderNode) {
    // Writing into a String cannot fail.
    let _ = match node {
        RenderNode::Html { markup } => write!(out, "<div class=\"block-text\">{}</div>", markup),
        RenderNode::Image { url, width } => write!(
            out,
            "<img class=\"block-image\" src=\"{0}\" alt=\"\" data-preview=\"{0}\" style=\"width:{1}px;max-width:100%\">",
            escape(url),
            width
        ),
        RenderNode::Video { url, width } => write!(
            out,
            "<video class=\"block-video\" controls src=\"{}\" style=\"width:{}px;max-width:100%\"></video>",
            escape(url),
            width
        ),
        RenderNode::Audio { url } => write!(
            out,
            "<audio class=\"block-audio\" controls src=\"{}\" style=\"width:100%\"></audio>",
            escape(url)
        ),
        RenderNode::Gallery { images } => {
            out.push_str("<div class=\"block-gallery\">");
            for url in images {
                let _ = write!(
                    out,
                    "<img src=\"{0}\" alt=\"\" data-preview=\"{0}\" style=\"width:{1}px;max-width:100%\">",
                    escape(url),
                    GALLERY_THUMB_WIDTH
                );
            }
            out.push_str("</div>");
            Ok(())
        }
        RenderNode::Button { label, on_click } => write_button(out, label, on_click),
        RenderNode::Panels(view) => {
            write_panels(out, view);
            Ok(())
        }
    };
}

fn write_button(out: &mut String, label: &str, on_click: &Activation) -> std::fmt::Result {
    match on_click {
        Activation::Navigate { url, new_tab } => {
            let target = if *new_tab { "_blank" } else { "_self" };
            write!(
                out,
                "<a class=\"block-button\" href=\"{}\" target=\"{}\" rel=\"noopener\">{}</a>",
                escape(url),
                target,
                escape(label)
            )
        }
        Activation::OpenContact(prefill) => write!(
            out,
            "<button class=\"block-button\" data-contact-title=\"{}\" data-contact-subject=\"{}\" data-contact-message=\"{}\">{}</button>",
            escape(&prefill.title),
            escape(&prefill.subject),
            escape(&prefill.message),
            escape(label)
        ),
        Activation::Preview { url } => write!(
            out,
            "<button class=\"block-button\" data-preview=\"{}\">{}</button>",
            escape(url),
            escape(label)
        ),
    }
}

fn write_panels(out: &mut String, view: &PanelView) {
    let _ = write!(
        out,
        "<div class=\"block-panels\" style=\"position:relative;width:100%;height:{:.2}px\">",
        view.height
    );
    for region in &view.regions {
        let r = region.rect;
        let _ = write!(
            out,
            "<div class=\"panel\" data-panel=\"{}\" style=\"position:absolute;left:{:.2}px;top:{:.2}px;width:{:.2}px;height:{:.2}px;overflow:auto\">",
            escape(&region.id),
            r.left,
            r.top,
            r.width,
            r.height
        );
        for child in &region.children {
            write_node(out, child);
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}
