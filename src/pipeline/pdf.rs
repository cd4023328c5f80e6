//! PDF encoding of laid-out pages.
//!
//! Uses the two standard Type 1 fonts Helvetica (`/F1`) and Helvetica-Bold
//! (`/F2`) with `WinAnsiEncoding`, so no font program is embedded and the
//! output is a few kilobytes per page.

use crate::config::{Color, RenderStyle};
use crate::error::RenderCause;
use crate::pipeline::format;
use crate::pipeline::layout::{DrawOp, Font, Page};
use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

const PRODUCER: &str = concat!("sales-report ", env!("CARGO_PKG_VERSION"));

/// Document-level metadata written to the Info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub created: NaiveDateTime,
}

/// Encode `pages` as a complete PDF file.
pub fn encode_document(
    pages: &[Page],
    info: &DocumentInfo,
    style: &RenderStyle,
) -> Result<Vec<u8>, RenderCause> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dict("Helvetica"));
    let bold_id = doc.add_object(font_dict("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page).encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        style.page_width.into(),
        style.page_height.into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => literal(&info.title),
        "Producer" => literal(PRODUCER),
        "CreationDate" => literal(&format::pdf_date(info.created)),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn font_dict(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn literal(text: &str) -> Object {
    Object::String(win_ansi(text), StringFormat::Literal)
}

fn font_resource(font: Font) -> Object {
    let name: &[u8] = match font {
        Font::Regular => b"F1",
        Font::Bold => b"F2",
    };
    Object::Name(name.to_vec())
}

fn rgb(op: &str, color: Color) -> Operation {
    Operation::new(op, vec![color.r.into(), color.g.into(), color.b.into()])
}

fn page_content(page: &Page) -> Content {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ops.push(rgb("rg", *color));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                line_width,
                color,
            } => {
                ops.push(rgb("RG", *color));
                ops.push(Operation::new("w", vec![(*line_width).into()]));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
                color,
            } => {
                ops.push(rgb("RG", *color));
                ops.push(Operation::new("w", vec![(*line_width).into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), (*y1).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (*y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Text {
                x,
                y,
                font,
                size,
                color,
                angle,
                text,
            } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                ops.push(Operation::new("BT", vec![]));
                ops.push(rgb("rg", *color));
                ops.push(Operation::new("Tf", vec![font_resource(*font), (*size).into()]));
                ops.push(Operation::new(
                    "Tm",
                    vec![
                        cos.into(),
                        sin.into(),
                        (-sin).into(),
                        cos.into(),
                        (*x).into(),
                        (*y).into(),
                    ],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    Content { operations: ops }
}

/// Encode text for a `WinAnsiEncoding` font. Characters outside the code
/// page become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            // 0x80..=0x9F are remapped in WinAnsi; the Latin-1 controls there
            // have no glyph.
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItem, Report};
    use crate::pipeline::layout::compose;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    #[test]
    fn encodes_a_complete_document() {
        let style = RenderStyle::default();
        let report = Report::with_timestamp(
            vec![LineItem::new("Widget", 3, Decimal::new(999, 2)).unwrap()],
            created(),
        )
        .unwrap();
        let layout = compose(&report, &style);
        let info = DocumentInfo {
            title: "Sales Report".into(),
            created: created(),
        };

        let bytes = encode_document(&layout.pages, &info, &style).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, "%%EOF"));
        assert!(contains(&bytes, "Helvetica-Bold"));
        assert!(contains(&bytes, "WinAnsiEncoding"));
        assert!(contains(&bytes, "Widget"));
        assert!(contains(&bytes, "$29.97"));
        assert!(contains(&bytes, "D:20240309140507"));
    }

    #[test]
    fn empty_page_list_still_encodes() {
        let info = DocumentInfo {
            title: "Empty".into(),
            created: created(),
        };
        let bytes = encode_document(&[], &info, &RenderStyle::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn win_ansi_maps_latin1_and_replaces_the_rest() {
        assert_eq!(win_ansi("Plain"), b"Plain".to_vec());
        assert_eq!(win_ansi("Añejo"), vec![b'A', 0xF1, b'e', b'j', b'o']);
        assert_eq!(win_ansi("€5"), vec![0x80, b'5']);
        assert_eq!(win_ansi("日本"), b"??".to_vec());
        assert_eq!(win_ansi("\u{0085}"), b"?".to_vec());
    }
}
