//! Page layout and PDF output for the shopping list.
//!
//! Layout works in PDF points with the origin at the bottom-left corner, the same way the
//! document itself is drawn. It is computed up front so pagination can be checked without
//! parsing a PDF.

use anyhow::{anyhow, Result};
use printpdf::{Mm, PdfDocument, Pt};
use ttf_parser::Face;

use super::ShoppingItem;

pub const TITLE: &str = "Foodgram - shopping list";

// A4
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

pub const TITLE_SIZE: f32 = 18.0;
pub const LIST_SIZE: f32 = TITLE_SIZE * 0.8;
pub const LINE_STEP: f32 = TITLE_SIZE * 1.1;
pub const LEFT_MARGIN: f32 = 72.0;
/// Baseline of the title on every page.
pub const TOP: f32 = PAGE_HEIGHT * 0.95;
/// A list line is never drawn at or below this baseline.
pub const BOTTOM: f32 = TOP * 0.05;

/// DejaVu Sans, embedded so ingredient names in any script survive. The PDF base fonts only
/// cover Latin-1.
pub const FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

pub fn font_face() -> Result<Face<'static>> {
    Face::parse(FONT, 0).map_err(|e| anyhow!("Unreadable shopping list font: {}", e))
}

/// Advance width of `text` set at `size` points.
pub fn text_width(face: &Face, text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .filter_map(|c| face.glyph_index(c))
        .filter_map(|glyph| face.glyph_hor_advance(glyph))
        .map(u32::from)
        .sum();
    units as f32 * size / f32::from(face.units_per_em())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub lines: Vec<TextLine>,
}

impl PageLayout {
    /// A fresh page with the title already drawn. Returns the baseline for the first list line.
    fn with_title(face: &Face) -> (Self, f32) {
        let width = text_width(face, TITLE, TITLE_SIZE);
        let page = PageLayout {
            lines: vec![TextLine {
                text: TITLE.into(),
                size: TITLE_SIZE,
                x: ((PAGE_WIDTH - width) / 2.0).max(0.0),
                y: TOP,
            }],
        };
        (page, TOP - TITLE_SIZE * 2.0)
    }
}

/// Lay out a numbered list of items, breaking onto a new page whenever the next line would
/// fall on or below the bottom margin. Every page starts with the title.
pub fn layout(items: &[ShoppingItem]) -> Result<Vec<PageLayout>> {
    let face = font_face()?;
    let mut pages = vec![];
    let (mut page, mut y) = PageLayout::with_title(&face);
    for (num, item) in items.iter().enumerate() {
        if y <= BOTTOM {
            let (next_page, next_y) = PageLayout::with_title(&face);
            pages.push(std::mem::replace(&mut page, next_page));
            y = next_y;
        }
        page.lines.push(TextLine {
            text: format!("{}. {}", num + 1, item),
            size: LIST_SIZE,
            x: LEFT_MARGIN,
            y,
        });
        y -= LINE_STEP;
    }
    pages.push(page);
    Ok(pages)
}

/// Draw the laid out pages into a PDF document.
pub fn to_pdf(pages: &[PageLayout]) -> Result<Vec<u8>> {
    let (width, height) = (Mm::from(Pt(PAGE_WIDTH)), Mm::from(Pt(PAGE_HEIGHT)));
    let (doc, first_page, first_layer) = PdfDocument::new(TITLE, width, height, "Page 1");
    let font = doc
        .add_external_font(FONT)
        .map_err(|e| anyhow!("PDF font error: {:?}", e))?;
    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Page {}", index + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in &page.lines {
            layer.use_text(
                line.text.clone(),
                line.size,
                Mm::from(Pt(line.x)),
                Mm::from(Pt(line.y)),
                &font,
            );
        }
    }
    doc.save_to_bytes()
        .map_err(|e| anyhow!("PDF encoding error: {:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<ShoppingItem> {
        (0..count)
            .map(|i| ShoppingItem {
                ingredient_id: i as i64,
                name: format!("item {i:03}"),
                measurement_unit: "g".into(),
                total: 10,
            })
            .collect()
    }

    /// How many list lines fit under the title of one page.
    fn per_page() -> usize {
        let first = TOP - TITLE_SIZE * 2.0;
        ((first - BOTTOM) / LINE_STEP).ceil() as usize
    }

    #[test]
    fn short_list_fits_one_page() {
        let pages = layout(&items(3)).unwrap();
        assert_eq!(pages.len(), 1);
        let texts = pages[0]
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            texts,
            [TITLE, "1. item 000: 10 g", "2. item 001: 10 g", "3. item 002: 10 g"]
        );
    }

    #[test]
    fn lines_descend_and_stay_above_bottom() {
        let pages = layout(&items(200)).unwrap();
        for page in &pages {
            assert_eq!(page.lines[0].text, TITLE);
            assert_eq!(page.lines[0].size, TITLE_SIZE);
            let list = &page.lines[1..];
            assert!(list.iter().all(|l| l.y > BOTTOM && l.size == LIST_SIZE));
            assert!(list.windows(2).all(|w| w[0].y > w[1].y));
        }
    }

    #[test]
    fn breaks_exactly_when_full() {
        let n = per_page();
        assert_eq!(layout(&items(n)).unwrap().len(), 1);
        let pages = layout(&items(n + 1)).unwrap();
        assert_eq!(pages.len(), 2);
        // numbering continues across pages
        assert_eq!(pages[1].lines[1].text, format!("{}. item {:03}: 10 g", n + 1, n));
        assert_eq!(pages[1].lines[1].y, TOP - TITLE_SIZE * 2.0);
    }

    #[test]
    fn no_trailing_blank_page() {
        let n = per_page();
        let pages = layout(&items(n * 2)).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.lines.len() == n + 1));
    }

    #[test]
    fn writes_a_pdf() {
        let pdf = to_pdf(&layout(&items(80)).unwrap()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn cyrillic_names_keep_every_glyph() {
        let flour = ShoppingItem {
            ingredient_id: 1,
            name: "Мука".into(),
            measurement_unit: "г".into(),
            total: 500,
        };
        let pages = layout(&[flour]).unwrap();
        assert_eq!(pages[0].lines[1].text, "1. Мука: 500 г");
        let face = font_face().unwrap();
        for line in &pages[0].lines {
            let missing = line
                .text
                .chars()
                .filter(|c| face.glyph_index(*c).is_none())
                .collect::<String>();
            assert_eq!(missing, "", "no glyph in {:?}", line.text);
        }
        assert!(text_width(&face, "Мука", LIST_SIZE) > 0.0);

        let pdf = to_pdf(&pages).unwrap();
        // The TrueType program is embedded rather than a base-14 font being referenced
        assert!(pdf.windows(9).any(|w| w == b"FontFile2"));
    }

    #[test]
    fn title_is_centered_by_its_measured_width() {
        let face = font_face().unwrap();
        let pages = layout(&[]).unwrap();
        let title = &pages[0].lines[0];
        let width = text_width(&face, TITLE, TITLE_SIZE);
        assert!(width > 0.0 && width < PAGE_WIDTH);
        assert!((title.x * 2.0 + width - PAGE_WIDTH).abs() < 0.01);
    }
}
