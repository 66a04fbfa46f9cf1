//! Reading a sitemap back for verification.

use crate::utils::html::unescape;
use quick_xml::Reader;
use quick_xml::events::Event;

/// What `verify` needs from a sitemap file.
#[derive(Debug, Default, PartialEq)]
pub struct SitemapDoc {
    pub has_declaration: bool,
    /// `xmlns` of the `<urlset>` element.
    pub namespace: Option<String>,
    /// `<loc>` values, unescaped, in document order.
    pub locs: Vec<String>,
}

pub fn read_sitemap(xml: &str) -> Result<SitemapDoc, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut doc = SitemapDoc::default();
    let mut loc: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Decl(_) => doc.has_declaration = true,
            Event::Start(e) if e.local_name().as_ref() == b"urlset" => {
                doc.namespace = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.as_ref() == b"xmlns")
                    .map(|attr| String::from_utf8_lossy(&attr.value).into_owned());
            }
            Event::Start(e) if e.local_name().as_ref() == b"loc" => loc = Some(String::new()),
            Event::Text(text) => {
                if let Some(buf) = loc.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&text));
                }
            }
            // Entity references arrive as separate events
            Event::GeneralRef(reference) => {
                if let Some(buf) = loc.as_mut() {
                    buf.push('&');
                    buf.push_str(&String::from_utf8_lossy(&reference));
                    buf.push(';');
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"loc" => {
                if let Some(buf) = loc.take() {
                    doc.locs.push(unescape(buf.trim()).into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(doc)
}
