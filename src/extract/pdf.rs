//! PDF reader built on lopdf's per-page text extraction.

use lopdf::Document;
use tracing::debug;

use super::ExtractError;

/// Extract the text layer of every page, in page order, concatenated without separators.
///
/// A page whose text cannot be decoded contributes nothing instead of failing the document.
pub(super) fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = Document::load_mem(bytes).map_err(|err| ExtractError::Pdf(err.to_string()))?;

    let mut text = String::new();
    // get_pages is keyed by page number, so iteration follows document order.
    for page_number in document.get_pages().into_keys() {
        match document.extract_text(&[page_number]) {
            // lopdf terminates every text object with a newline.
            Ok(page_text) => text.push_str(page_text.trim_end_matches('\n')),
            Err(err) => debug!(page = page_number, error = %err, "Page has no readable text layer"),
        }
    }

    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a PDF with one page per entry; `None` produces a page without a content stream.
    pub(crate) fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for page_text in pages {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            };
            if let Some(page_text) = page_text {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id = doc.add_object(Stream::new(
                    dictionary! {},
                    content.encode().expect("encode content"),
                ));
                page.set("Contents", content_id);
            }
            kids.push(Object::from(doc.add_object(page)));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("save pdf");
        bytes
    }

    #[test]
    fn concatenates_pages_in_order() {
        let bytes = build_pdf(&[Some("Alpha"), Some("Beta")]);
        let text = extract_pdf_text(&bytes).expect("pdf text");
        assert_eq!(text, "AlphaBeta");
    }

    #[test]
    fn page_without_text_layer_does_not_fail_document() {
        let bytes = build_pdf(&[Some("Opening"), None, Some("Closing")]);
        let text = extract_pdf_text(&bytes).expect("pdf text");
        assert_eq!(text, "OpeningClosing");
    }

    #[test]
    fn rejects_garbage_bytes() {
        let err = extract_pdf_text(b"not a pdf at all").expect_err("garbage");
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
