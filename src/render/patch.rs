//! Clone-and-patch strategy: rewrite a copy of the reference document.

use super::RenderError;
use super::dom::{Document, Element};
use super::head::{MetaTag, is_json_ld, is_social_tag, json_ld, robots_tag, social_tags};
use crate::config::BodyTarget;
use crate::page::PageMetadata;

pub fn render_patch(
    reference: &Document,
    body_target: &BodyTarget,
    meta: &PageMetadata,
) -> Result<String, RenderError> {
    let mut doc = reference.clone();

    if doc.element("head").is_none() {
        return Err(RenderError::MissingNode("<head>".into()));
    }

    if let Some(body) = &meta.body {
        let target = doc
            .find_mut(&|e| matches_target(body_target, e))
            .ok_or_else(|| RenderError::MissingNode(format!("body target `{body_target}`")))?;
        target
            .set_inner_html(body)
            .map_err(|e| RenderError::Parse {
                what: "page body".into(),
                reason: e.to_string(),
            })?;
    }

    if let Some(h1) = doc.element_mut("h1") {
        h1.set_text(&meta.heading);
    }

    if let Some(html) = doc.element_mut("html") {
        html.set_attr("lang", meta.language.as_str());
    }

    // Structured data found anywhere in the reference describes the reference page
    doc.remove_all(&is_json_ld);

    let head = doc
        .element_mut("head")
        .ok_or_else(|| RenderError::MissingNode("<head>".into()))?;
    patch_head(head, meta);

    Ok(doc.to_html())
}

fn matches_target(target: &BodyTarget, element: &Element) -> bool {
    match target {
        BodyTarget::Tag(tag) => element.tag == *tag,
        BodyTarget::Id(id) => element.attr("id") == Some(id.as_str()),
    }
}

fn patch_head(head: &mut Element, meta: &PageMetadata) {
    match head.find_mut(&|e| e.tag == "title") {
        Some(title) => title.set_text(&meta.title),
        None => {
            let mut title = Element::new("title");
            title.set_text(&meta.title);
            head.push(title);
        }
    }

    upsert_meta(head, &MetaTag {
        attr: "name",
        key: "description",
        content: meta.description.clone(),
    });

    match head.find_mut(&|e| e.tag == "link" && e.attr_has_token("rel", "canonical")) {
        Some(link) => link.set_attr("href", meta.canonical_url.as_str()),
        None => head.push(
            Element::new("link")
                .with_attr("rel", "canonical")
                .with_attr("href", meta.canonical_url.as_str()),
        ),
    }

    upsert_meta(head, &robots_tag(meta));

    // Social tags the page does not set would describe the reference page
    let tags = social_tags(meta);
    head.remove_all(&|e| is_social_tag(e) && !tags.iter().any(|t| t.matches(e)));
    for tag in &tags {
        upsert_meta(head, tag);
    }

    if let Some(script) = json_ld(meta) {
        head.push(script);
    }
}

fn upsert_meta(head: &mut Element, tag: &MetaTag) {
    match head.find_mut(&|e| tag.matches(e)) {
        Some(existing) => existing.set_attr("content", tag.content.as_str()),
        None => head.push(tag.to_element()),
    }
}
