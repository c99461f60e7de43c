//! Avatar upload control with drag-and-drop and preview.

use super::hint;
use crate::markup::escape;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// Hint shown inside the drop zone for a ceiling of `max_bytes`.
#[must_use]
pub fn size_hint(max_bytes: usize) -> String {
    format!("PNG, JPG (max {} KB)", max_bytes / 1024)
}

/// A file selected in the upload control.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarFile {
    /// Original file name
    pub file_name: String,
    /// MIME type reported by the browser
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl AvatarFile {
    /// Create a file.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Encode the contents as a `data:` URI.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        let content_type = if self.content_type.trim().is_empty() {
            "application/octet-stream"
        } else {
            self.content_type.trim()
        };
        format!("data:{content_type};base64,{}", STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for AvatarFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Read a file into a `data:` URI off the async executor.
pub async fn read_as_data_uri(file: AvatarFile) -> Option<String> {
    match tokio::task::spawn_blocking(move || file.to_data_uri()).await {
        Ok(uri) => Some(uri),
        Err(e) => {
            tracing::warn!(error = %e, "Avatar preview read failed");
            None
        },
    }
}

/// Raw events of the upload control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileUploadEvent {
    /// A drag entered the drop zone
    DragEnter,
    /// The drag left without dropping
    DragLeave,
    /// A file was dropped on the zone
    Drop(AvatarFile),
    /// A file was picked through the file dialog
    Selected(AvatarFile),
    /// The selection was cleared
    Cleared,
}

/// Transient state of the upload control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUploadState {
    /// Drop-zone highlighting
    pub drag_over: bool,
    /// Preview `data:` URI of the current file, once read
    pub preview: Option<String>,
    /// Incremented on every change; a preview read for an older selection
    /// is discarded
    pub selection: u64,
}

impl FileUploadState {
    /// Apply an event.
    ///
    /// Returns `Some(file)` when the event changes the reported file
    /// (`Some(None)` on clear), `None` for pure highlighting changes.
    pub fn apply(&mut self, event: FileUploadEvent) -> Option<Option<AvatarFile>> {
        match event {
            FileUploadEvent::DragEnter => {
                self.drag_over = true;
                None
            },
            FileUploadEvent::DragLeave => {
                self.drag_over = false;
                None
            },
            FileUploadEvent::Drop(file) | FileUploadEvent::Selected(file) => {
                self.drag_over = false;
                self.preview = None;
                self.selection += 1;
                Some(Some(file))
            },
            FileUploadEvent::Cleared => {
                self.drag_over = false;
                self.preview = None;
                self.selection += 1;
                Some(None)
            },
        }
    }

    /// Store a finished preview read if it belongs to the current selection.
    pub fn preview_ready(&mut self, selection: u64, data_uri: String) -> bool {
        if selection == self.selection {
            self.preview = Some(data_uri);
            true
        } else {
            false
        }
    }
}

/// Upload widget.
#[derive(Debug, Clone, Copy)]
pub struct FileUpload<'a> {
    /// Field name
    pub id: &'a str,
    /// Label
    pub label: &'a str,
    /// Drop-zone description
    pub description: &'a str,
    /// Accepted MIME types
    pub accept: &'a str,
    /// Whether a file is required
    pub required: bool,
    /// Validation or size error
    pub error: Option<&'a str>,
    /// Largest accepted file
    pub max_bytes: usize,
    /// Transient control state
    pub state: &'a FileUploadState,
}

impl FileUpload<'_> {
    /// Render the drop zone with preview.
    #[must_use]
    pub fn render(&self) -> String {
        let id = escape(self.id);
        let zone_class = if self.state.drag_over {
            "dropzone dragging"
        } else {
            "dropzone"
        };
        let preview = self.state.preview.as_deref().map_or_else(String::new, |uri| {
            format!(
                "<img class=\"avatar-preview\" src=\"{}\" alt=\"Preview\" width=\"96\" height=\"96\">\n",
                escape(uri)
            )
        });
        let required = if self.required { " required" } else { "" };

        format!(
            "<div class=\"field\">\n\
             <label for=\"{id}\">{label}</label>\n\
             <div class=\"{zone_class}\" data-target=\"{id}\">\n\
             {preview}<p>{description}</p>\n<p class=\"hint\">{size}</p>\n\
             <input id=\"{id}\" name=\"{id}\" type=\"file\" accept=\"{accept}\"{required} hidden>\n\
             </div>\n{hint}\n</div>",
            label = escape(self.label),
            description = escape(self.description),
            accept = escape(self.accept),
            size = size_hint(self.max_bytes),
            hint = hint(self.id, None, self.error),
        )
    }
}
