//! Uploaded document intake and preview lifetime.

use std::collections::HashMap;

use uuid::Uuid;

/// The only MIME type the pad accepts.
pub const PDF_MIME: &str = "application/pdf";

/// A file handed to the pad by manual selection or drag-and-drop.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// An accepted document awaiting signature.
#[derive(Debug)]
pub struct UploadedDocument {
    /// Locally-unique identifier.
    pub id: Uuid,
    /// Display name, used to derive the signed output name.
    pub name: String,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
    /// Preview handle created at acceptance, released with the document.
    pub preview_url: String,
}

/// Allocates and releases preview handles for accepted documents.
///
/// This is the object-URL analog: every handle created through `create`
/// must eventually see a matching `release`.
pub trait PreviewStore {
    /// Create a preview handle for a document's bytes.
    fn create(&mut self, id: Uuid, bytes: &[u8]) -> String;

    /// Release a previously created handle.
    fn release(&mut self, url: &str);
}

impl<P: PreviewStore + ?Sized> PreviewStore for &mut P {
    fn create(&mut self, id: Uuid, bytes: &[u8]) -> String {
        (**self).create(id, bytes)
    }

    fn release(&mut self, url: &str) {
        (**self).release(url);
    }
}

/// In-memory preview registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreviews {
    live: HashMap<String, usize>,
}

impl MemoryPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently alive.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Whether a handle is still alive.
    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains_key(url)
    }
}

impl PreviewStore for MemoryPreviews {
    fn create(&mut self, id: Uuid, bytes: &[u8]) -> String {
        let url = format!("preview://{id}");
        self.live.insert(url.clone(), bytes.len());
        url
    }

    fn release(&mut self, url: &str) {
        self.live.remove(url);
    }
}

/// Holds accepted documents and tracks which one is active.
///
/// Previews are released when their document is removed and when the store
/// is dropped.
#[derive(Debug)]
pub struct DocumentStore<P: PreviewStore> {
    previews: P,
    documents: Vec<UploadedDocument>,
    active: Option<Uuid>,
}

impl<P: PreviewStore> DocumentStore<P> {
    /// Create an empty store backed by the given preview allocator.
    pub fn new(previews: P) -> Self {
        Self {
            previews,
            documents: Vec::new(),
            active: None,
        }
    }

    /// Accept a file from manual selection.
    ///
    /// Only `application/pdf` is admitted; anything else is silently
    /// ignored. On acceptance the document joins the list and becomes
    /// active. Returns the new document's id.
    pub fn accept(&mut self, upload: FileUpload) -> Option<Uuid> {
        if upload.mime != PDF_MIME {
            log::debug!("ignoring upload {:?} with type {}", upload.name, upload.mime);
            return None;
        }
        let id = Uuid::new_v4();
        let preview_url = self.previews.create(id, &upload.bytes);
        self.documents.push(UploadedDocument {
            id,
            name: upload.name,
            bytes: upload.bytes,
            preview_url,
        });
        self.active = Some(id);
        Some(id)
    }

    /// Accept a drag-and-drop payload.
    ///
    /// Takes the first dropped file and re-dispatches it through the same
    /// acceptance path as manual selection.
    pub fn accept_drop(&mut self, mut files: Vec<FileUpload>) -> Option<Uuid> {
        if files.is_empty() {
            return None;
        }
        self.accept(files.remove(0))
    }

    /// The currently active document, if any.
    pub fn active(&self) -> Option<&UploadedDocument> {
        let id = self.active?;
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Remove a document, releasing its preview.
    ///
    /// If the removed document was active, the most recently accepted
    /// remaining document becomes active.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.documents.iter().position(|doc| doc.id == id) else {
            return false;
        };
        let doc = self.documents.remove(index);
        self.previews.release(&doc.preview_url);
        if self.active == Some(id) {
            self.active = self.documents.last().map(|d| d.id);
        }
        true
    }

    /// Number of accepted documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents have been accepted.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Access the preview allocator.
    pub fn previews(&self) -> &P {
        &self.previews
    }
}

impl<P: PreviewStore> Drop for DocumentStore<P> {
    fn drop(&mut self) {
        for doc in std::mem::take(&mut self.documents) {
            self.previews.release(&doc.preview_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_upload(name: &str) -> FileUpload {
        FileUpload {
            name: name.to_string(),
            mime: PDF_MIME.to_string(),
            bytes: b"%PDF-1.5 test".to_vec(),
        }
    }

    #[test]
    fn test_accept_pdf() {
        let mut store = DocumentStore::new(MemoryPreviews::new());
        let id = store.accept(pdf_upload("contract.pdf")).unwrap();

        let active = store.active().unwrap();
        assert_eq!(active.id, id);
        assert_eq!(active.name, "contract.pdf");
        assert!(store.previews().is_live(&active.preview_url));
    }

    #[test]
    fn test_reject_non_pdf() {
        let mut store = DocumentStore::new(MemoryPreviews::new());
        let upload = FileUpload {
            name: "photo.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8],
        };

        assert!(store.accept(upload).is_none());
        assert!(store.is_empty());
        assert!(store.active().is_none());
        assert_eq!(store.previews().live_count(), 0);
    }

    #[test]
    fn test_drop_payload_reuses_accept_path() {
        let mut store = DocumentStore::new(MemoryPreviews::new());
        let files = vec![
            FileUpload {
                name: "notes.txt".to_string(),
                mime: "text/plain".to_string(),
                bytes: vec![],
            },
        ];
        // First dropped file is not a PDF: whole drop is ignored.
        assert!(store.accept_drop(files).is_none());

        let id = store
            .accept_drop(vec![pdf_upload("contract.pdf"), pdf_upload("other.pdf")])
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.active().unwrap().id, id);
    }

    #[test]
    fn test_newest_upload_becomes_active() {
        let mut store = DocumentStore::new(MemoryPreviews::new());
        store.accept(pdf_upload("first.pdf"));
        store.accept(pdf_upload("second.pdf"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.active().unwrap().name, "second.pdf");
    }

    #[test]
    fn test_remove_releases_preview() {
        let mut store = DocumentStore::new(MemoryPreviews::new());
        let first = store.accept(pdf_upload("first.pdf")).unwrap();
        let second = store.accept(pdf_upload("second.pdf")).unwrap();

        assert!(store.remove(second));
        assert_eq!(store.previews().live_count(), 1);
        // Active falls back to the remaining document.
        assert_eq!(store.active().unwrap().id, first);

        assert!(!store.remove(second));
    }

    #[test]
    fn test_drop_releases_all_previews() {
        let previews = {
            let mut store = DocumentStore::new(MemoryPreviews::new());
            store.accept(pdf_upload("first.pdf"));
            store.accept(pdf_upload("second.pdf"));
            store.previews().clone()
        };
        // The clone taken before drop still sees both handles...
        assert_eq!(previews.live_count(), 2);

        // ...but a store that is dropped releases everything it allocated.
        let mut observed = MemoryPreviews::new();
        {
            let mut store = DocumentStore::new(&mut observed);
            store.accept(pdf_upload("first.pdf"));
            store.accept(pdf_upload("second.pdf"));
        }
        assert_eq!(observed.live_count(), 0);
    }
}
