use std::io;
use std::io::Read;

use manifest::ContentId;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Opens a fresh reader over the content being uploaded.
pub type Open<'a> = dyn Fn() -> io::Result<Box<dyn Read + Send>> + 'a;

/// Destination for deployed content.
pub trait ContentStore {
    /// Uploads the `size` bytes yielded by `open` and returns the identifier the content is stored
    /// under. Stores that need several passes over the content call `open` once per pass.
    fn upload(
        &self,
        open: &Open<'_>,
        size: u64,
        content_type: &str,
    ) -> Result<ContentId, StoreError>;
}

impl ContentStore for turbo::Client {
    fn upload(
        &self,
        open: &Open<'_>,
        size: u64,
        content_type: &str,
    ) -> Result<ContentId, StoreError> {
        let response = turbo::Client::upload(self, open, size, content_type)?;
        Ok(ContentId::from(response.id))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::io::Read;

    use manifest::ContentId;

    use super::{ContentStore, Open, StoreError};

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct RecordedUpload {
        pub id: ContentId,
        pub content_type: String,
        pub size: u64,
        pub body: Vec<u8>,
    }

    /// Records every upload and hands out sequential identifiers. Fails the upload whose zero
    /// based position equals `fail_at`.
    #[derive(Default)]
    pub(crate) struct RecordingStore {
        uploads: RefCell<Vec<RecordedUpload>>,
        fail_at: Option<usize>,
    }

    impl RecordingStore {
        pub(crate) fn failing_at(position: usize) -> Self {
            Self {
                uploads: RefCell::new(Vec::new()),
                fail_at: Some(position),
            }
        }

        pub(crate) fn uploads(&self) -> Vec<RecordedUpload> {
            self.uploads.borrow().clone()
        }

        pub(crate) fn bodies(&self) -> Vec<String> {
            self.uploads
                .borrow()
                .iter()
                .map(|u| String::from_utf8_lossy(&u.body).to_string())
                .collect()
        }
    }

    impl ContentStore for RecordingStore {
        fn upload(
            &self,
            open: &Open<'_>,
            size: u64,
            content_type: &str,
        ) -> Result<ContentId, StoreError> {
            let position = self.uploads.borrow().len();
            if self.fail_at == Some(position) {
                return Err("upload service unavailable".into());
            }

            let mut bytes = Vec::new();
            open()?.read_to_end(&mut bytes)?;

            let id = ContentId::new(format!("tx-{position}"));
            self.uploads.borrow_mut().push(RecordedUpload {
                id: id.clone(),
                content_type: content_type.to_string(),
                size,
                body: bytes,
            });

            Ok(id)
        }
    }
}
