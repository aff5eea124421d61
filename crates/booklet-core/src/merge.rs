//! PDF Merge algorithm
//!
//! Combines multiple loaded PDFs into a single document, in memory.

use crate::error::BookletError;
use lopdf::{Document, Object, ObjectId};

/// Merge multiple documents into one, preserving input order
///
/// The algorithm:
/// 1. If empty, return error
/// 2. If single document, return it as-is
/// 3. Use the first document as the destination
/// 4. For each further document:
///    a. Offset its object IDs past the destination's highest ID
///    b. Import all objects with remapped references
///    c. Append its pages to the destination page list
/// 5. Rewrite the destination's root page tree
pub fn merge_documents(documents: Vec<Document>) -> Result<Document, BookletError> {
    let mut documents = documents.into_iter();
    let Some(mut dest) = documents.next() else {
        return Err(BookletError::NoDocuments);
    };

    let mut rest = documents.peekable();
    if rest.peek().is_none() {
        return Ok(dest);
    }

    let mut dest_max_id = dest.max_id;
    let mut dest_page_refs = get_page_references(&dest);

    for source in rest {
        let source_pages = get_page_references(&source);
        let id_offset = dest_max_id;

        for (old_id, object) in source.objects.into_iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            dest.objects
                .insert(new_id, remap_object_refs(object, id_offset));
        }

        dest_page_refs.extend(
            source_pages
                .into_iter()
                .map(|(num, gen)| (num + id_offset, gen)),
        );

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
    }

    update_page_tree(&mut dest, &dest_page_refs)?;
    dest.max_id = dest_max_id;

    tracing::debug!("Merged document has {} pages", dest_page_refs.len());

    Ok(dest)
}

/// Get all page object references from a document, in page order
fn get_page_references(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Recursively remap object references in an object
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Locate the root Pages node through the trailer and catalog
fn root_pages_id(doc: &Document) -> Result<ObjectId, BookletError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(|o| o.as_reference())
        .map_err(|_| BookletError::OperationError("No Root in trailer".into()))?;

    let catalog = doc
        .objects
        .get(&catalog_id)
        .ok_or_else(|| BookletError::OperationError("Catalog not found".into()))?
        .as_dict()
        .map_err(|_| BookletError::OperationError("Invalid catalog".into()))?;

    catalog
        .get(b"Pages")
        .and_then(|o| o.as_reference())
        .map_err(|_| BookletError::OperationError("No Pages in catalog".into()))
}

/// Replace the root page tree's Kids and Count with a flat page list
fn update_page_tree(doc: &mut Document, page_refs: &[ObjectId]) -> Result<(), BookletError> {
    let pages_id = root_pages_id(doc)?;

    let Some(Object::Dictionary(pages_dict)) = doc.objects.get_mut(&pages_id) else {
        return Err(BookletError::OperationError(
            "Invalid pages dictionary".into(),
        ));
    };

    let kids = page_refs
        .iter()
        .map(|&id| Object::Reference(id))
        .collect::<Vec<_>>();
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(page_refs.len() as i64));

    Ok(())
}
