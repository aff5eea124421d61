//! Helpers for building small PDFs in unit tests

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, ObjectId, Stream};

/// Build a document with `num_pages` US Letter pages, each showing
/// "<prefix>-Page-<n>".
pub fn create_test_document(num_pages: u32, prefix: &str) -> Document {
    create_sized_document(num_pages, prefix, 612, 792, None)
}

/// Build a document whose pages share one MediaBox and optional rotation.
///
/// MediaBox and Rotate are placed on the Pages node so that pages inherit them.
pub fn create_sized_document(
    num_pages: u32,
    prefix: &str,
    width: i64,
    height: i64,
    rotate: Option<i64>,
) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Courier".to_vec())),
    ]));

    let mut page_ids = Vec::new();
    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(50), Object::Integer(50)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("{}-Page-{}", prefix, i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let mut pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
    ]);
    if let Some(angle) = rotate {
        pages.set("Rotate", Object::Integer(angle));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}

pub fn create_test_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    to_bytes(create_test_document(num_pages, prefix))
}

pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Password padding of the standard security handler
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
    0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
    0x69, 0x7A,
];

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state: Vec<u8> = (0..=255).collect();
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[i as usize]);
            state.swap(i as usize, j as usize);
            byte ^ state[state[i as usize].wrapping_add(state[j as usize]) as usize]
        })
        .collect()
}

fn hex_string(bytes: &[u8]) -> Object {
    Object::String(bytes.to_vec(), lopdf::StringFormat::Hexadecimal)
}

/// Encrypt with the 40-bit RC4 standard handler (V 1, R 2).
///
/// The key comes from lopdf's own derivation so that `Document::decrypt`
/// accepts exactly `user_password`.
pub fn encrypt_document(mut doc: Document, user_password: &str) -> Document {
    let file_id = hex_string(b"booklet-fixture!");
    doc.trailer
        .set("ID", Object::Array(vec![file_id.clone(), file_id]));

    let encrypt_id = doc.add_object(Dictionary::from_iter(vec![
        ("Filter", Object::Name(b"Standard".to_vec())),
        ("V", Object::Integer(1)),
        ("R", Object::Integer(2)),
        ("Length", Object::Integer(40)),
        ("O", hex_string(&[0x4F; 32])),
        ("P", Object::Integer(-4)),
    ]));
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));

    let key = lopdf::encryption::get_encryption_key(&doc, user_password, false).unwrap();
    if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(encrypt_id) {
        dict.set("U", hex_string(&rc4(&key, &PASSWORD_PAD)));
    }

    let ids: Vec<ObjectId> = doc
        .objects
        .keys()
        .copied()
        .filter(|id| *id != encrypt_id)
        .collect();
    for id in ids {
        // RC4 is symmetric, so lopdf's object decryption also encrypts
        let Ok(encrypted) = lopdf::encryption::decrypt_object(&key, id, &doc.objects[&id]) else {
            continue;
        };
        match doc.objects.get_mut(&id) {
            Some(Object::Stream(stream)) => stream.set_content(encrypted),
            Some(Object::String(content, _)) => *content = encrypted,
            _ => {}
        }
    }

    doc
}

/// An AES-style (V 4) encryption dictionary, which lopdf cannot decrypt
pub fn mark_aes_encrypted(mut doc: Document) -> Document {
    let file_id = hex_string(b"booklet-fixture!");
    doc.trailer
        .set("ID", Object::Array(vec![file_id.clone(), file_id]));
    let encrypt_id = doc.add_object(Dictionary::from_iter(vec![
        ("Filter", Object::Name(b"Standard".to_vec())),
        ("V", Object::Integer(4)),
        ("R", Object::Integer(4)),
        ("Length", Object::Integer(128)),
        ("O", hex_string(&[0x4F; 32])),
        ("U", hex_string(&[0x55; 32])),
        ("P", Object::Integer(-4)),
    ]));
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    doc
}
