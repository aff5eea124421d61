//! Output document composition
//!
//! Builds the 2-up booklet document from imposed slots. Every source page
//! that appears in the booklet is turned into a Form XObject (its content
//! stream and resources, clipped to its MediaBox). Each output page then
//! draws up to two forms, scaled and centred in the left and right halves.
//!
//! The output is built inside a copy of the source document so the forms can
//! share the source's fonts and images; the old page tree is detached and
//! pruned before saving.

use crate::error::BookletError;
use crate::imposition::Slot;
use crate::layout::{place_in_half, sheet_size, Placement, Side, POINTS_PER_INCH};
use crate::options::BookletOptions;
use crate::page_info::{inherited_attribute, PageInfo};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Page-number font size before scaling with the placed page
const PAGE_NUMBER_FONT_SIZE: f64 = 9.0;
/// Distance of the page number's baseline from the page bottom
const PAGE_NUMBER_MARGIN: f64 = 0.25 * POINTS_PER_INCH;
/// Helvetica advance width of every digit, per 1000 units of font size
const HELVETICA_DIGIT_WIDTH: f64 = 556.0;
const PAGE_NUMBER_FONT: &str = "Helv";

/// Catalog entries that point into the replaced page tree
const DETACHED_CATALOG_KEYS: [&[u8]; 7] = [
    b"Outlines",
    b"OpenAction",
    b"PageLabels",
    b"StructTreeRoot",
    b"Dests",
    b"AcroForm",
    b"Names",
];

/// Affine transform `[a b c d e f]` in PDF row-vector convention
type Matrix = [f64; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `first` applied, then `then`
fn concat(first: Matrix, then: Matrix) -> Matrix {
    let [a1, b1, c1, d1, e1, f1] = first;
    let [a2, b2, c2, d2, e2, f2] = then;
    [
        a1 * a2 + b1 * c2,
        a1 * b2 + b1 * d2,
        c1 * a2 + d1 * c2,
        c1 * b2 + d1 * d2,
        e1 * a2 + f1 * c2 + e2,
        e1 * b2 + f1 * d2 + f2,
    ]
}

/// Map form space (the page's MediaBox) onto its placement on the sheet,
/// turning it by the page's /Rotate.
fn page_transform(info: &PageInfo, placement: &Placement) -> Matrix {
    let [x0, y0, _, _] = info.media_box;
    let (w, h) = (info.width, info.height);

    let to_origin = [1.0, 0.0, 0.0, 1.0, -x0, -y0];
    // /Rotate turns the page clockwise
    let rotate = match info.rotation {
        90 => [0.0, -1.0, 1.0, 0.0, 0.0, w],
        180 => [-1.0, 0.0, 0.0, -1.0, w, h],
        270 => [0.0, 1.0, -1.0, 0.0, h, 0.0],
        _ => IDENTITY,
    };
    let place = [
        placement.scale,
        0.0,
        0.0,
        placement.scale,
        placement.x,
        placement.y,
    ];

    concat(concat(to_origin, rotate), place)
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// A source page converted to a Form XObject
struct PlacedForm {
    id: ObjectId,
    info: PageInfo,
}

/// Compose the booklet for one chunk of imposed slots.
///
/// `slots` come in (left, right) pairs, one pair per output page; a trailing
/// unpaired slot leaves the right half empty.
pub fn compose_booklet(
    source: &Document,
    slots: &[Slot],
    options: &BookletOptions,
) -> Result<Document, BookletError> {
    let mut doc = source.clone();
    let source_pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    let sheet = sheet_size(options.paper_size, options.orientation);

    let pages_id = doc.new_object_id();
    let font_id = options
        .add_page_numbers
        .then(|| doc.add_object(helvetica_font()));

    let mut forms: HashMap<usize, PlacedForm> = HashMap::new();
    let mut kids = Vec::new();

    for (sheet_side, pair) in slots.chunks(2).enumerate() {
        let mut operations = Vec::new();
        let mut xobjects = Dictionary::new();

        let halves = [(Side::Left, pair.first()), (Side::Right, pair.get(1))];
        for (side, slot) in halves {
            let Some(index) = slot.and_then(Slot::page) else {
                continue;
            };

            let page_id = *source_pages.get(index).ok_or_else(|| {
                BookletError::OperationError(format!(
                    "Page index {} out of bounds ({} pages)",
                    index,
                    source_pages.len()
                ))
            })?;

            if !forms.contains_key(&index) {
                let placed = page_to_form(&mut doc, index, page_id)?;
                forms.insert(index, placed);
            }
            let form = &forms[&index];

            let placement = place_in_half(sheet, form.info.displayed_size(), side);
            let resource_name = format!("P{}", index + 1);
            xobjects.set(resource_name.as_str(), Object::Reference(form.id));

            operations.extend(draw_form(&resource_name, &page_transform(&form.info, &placement)));
            if options.add_page_numbers {
                operations.extend(draw_page_number(index + 1, &placement));
            }
        }

        tracing::debug!(
            "Output page {}: {} placed pages",
            sheet_side + 1,
            xobjects.len()
        );

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| BookletError::OperationError(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));
        if let Some(font_id) = font_id {
            let mut fonts = Dictionary::new();
            fonts.set(PAGE_NUMBER_FONT, Object::Reference(font_id));
            resources.set("Font", Object::Dictionary(fonts));
        }

        let page = Dictionary::from_iter(vec![
            ("Type", name("Page")),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![real(0.0), real(0.0), real(sheet.0), real(sheet.1)]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]);
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    let pages = Dictionary::from_iter(vec![
        ("Type", name("Pages")),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    attach_page_tree(&mut doc, pages_id)?;

    let pruned = doc.prune_objects();
    tracing::debug!("Pruned {} unreferenced objects", pruned.len());
    doc.compress();

    Ok(doc)
}

/// Serialize a composed document
pub fn save_document(doc: &mut Document) -> Result<Vec<u8>, BookletError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| BookletError::OperationError(format!("Save failed: {}", e)))?;
    Ok(buffer)
}

/// Wrap a page's content and resources in a Form XObject
fn page_to_form(
    doc: &mut Document,
    index: usize,
    page_id: ObjectId,
) -> Result<PlacedForm, BookletError> {
    let info = PageInfo::from_page_id(doc, index as u32 + 1, page_id)?;

    let content = page_content(doc, page_id);

    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| BookletError::OperationError(e.to_string()))?;
    let resources = inherited_attribute(doc, page_dict, b"Resources").cloned();

    let [x0, y0, x1, y1] = info.media_box;
    let mut dict = Dictionary::from_iter(vec![
        ("Type", name("XObject")),
        ("Subtype", name("Form")),
        ("FormType", Object::Integer(1)),
        (
            "BBox",
            Object::Array(vec![real(x0), real(y0), real(x1), real(y1)]),
        ),
    ]);
    if let Some(resources) = resources {
        dict.set("Resources", resources);
    }

    let id = doc.add_object(Stream::new(dict, content));
    Ok(PlacedForm { id, info })
}

/// Decoded page content with every `/Contents` stream on its own line.
///
/// Streams in a `/Contents` array only break between tokens, not
/// necessarily on whitespace, so they cannot be joined back to back.
fn page_content(doc: &Document, page_id: ObjectId) -> Vec<u8> {
    let mut content = Vec::new();
    for stream_id in doc.get_page_contents(page_id) {
        let Ok(stream) = doc.get_object(stream_id).and_then(Object::as_stream) else {
            tracing::warn!("Skipping missing content stream {:?}", stream_id);
            continue;
        };
        if !content.is_empty() {
            content.push(b'\n');
        }
        match stream.decompressed_content() {
            Ok(data) => content.extend_from_slice(&data),
            Err(_) => content.extend_from_slice(&stream.content),
        }
    }
    content
}

fn draw_form(resource_name: &str, matrix: &Matrix) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new("cm", matrix.iter().map(|v| real(*v)).collect()),
        Operation::new("Do", vec![name(resource_name)]),
        Operation::new("Q", vec![]),
    ]
}

/// Page number centred under the placed page, scaled with it
fn draw_page_number(number: usize, placement: &Placement) -> Vec<Operation> {
    let text = number.to_string();
    let font_size = PAGE_NUMBER_FONT_SIZE * placement.scale;
    let text_width = text.len() as f64 * HELVETICA_DIGIT_WIDTH / 1000.0 * font_size;
    let x = placement.x + (placement.width - text_width) / 2.0;
    let y = placement.y + PAGE_NUMBER_MARGIN * placement.scale;

    vec![
        Operation::new("q", vec![]),
        Operation::new("g", vec![real(0.0)]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![name(PAGE_NUMBER_FONT), real(font_size)]),
        Operation::new("Td", vec![real(x), real(y)]),
        Operation::new(
            "Tj",
            vec![Object::String(
                text.into_bytes(),
                lopdf::StringFormat::Literal,
            )],
        ),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]
}

fn helvetica_font() -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", name("Font")),
        ("Subtype", name("Type1")),
        ("BaseFont", name("Helvetica")),
        ("Encoding", name("WinAnsiEncoding")),
    ])
}

/// Point the catalog at the new page tree and drop entries into the old one
fn attach_page_tree(doc: &mut Document, pages_id: ObjectId) -> Result<(), BookletError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(|o| o.as_reference())
        .map_err(|_| BookletError::OperationError("No Root in trailer".into()))?;

    let Some(Object::Dictionary(catalog)) = doc.objects.get_mut(&catalog_id) else {
        return Err(BookletError::OperationError("Invalid catalog".into()));
    };

    catalog.set("Pages", Object::Reference(pages_id));
    for key in DETACHED_CATALOG_KEYS {
        catalog.remove(key);
    }

    Ok(())
}
