use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use thiserror::Error;

use crate::domain::DropzoneOptions;
use crate::form::field::{FieldValue, UploadedFile};

use super::helpers::{plain_char, step_cursor};
use super::{ComponentKind, FieldComponent, KeyOutcome, palette::ComponentPalette};

/// Why a dropped file was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("file type not accepted: {name}")]
    Type { name: String },
    #[error("{name} is larger than {limit}")]
    TooLarge { name: String, limit: String },
    #[error("too many files (max {max})")]
    TooMany { max: usize },
}

const MIME_TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("csv", "text/csv"),
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

/// MIME type guessed from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = extension(path);
    MIME_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Read name, size and type of a local file.
pub fn probe_file(path: &Path) -> Result<UploadedFile, UploadRejection> {
    let metadata = std::fs::metadata(path)
        .ok()
        .filter(|metadata| metadata.is_file())
        .ok_or_else(|| UploadRejection::NotFound(path.display().to_string()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile {
        name,
        path: path.to_path_buf(),
        size: metadata.len(),
        mime: mime_for(path).to_string(),
    })
}

/// True when `file` matches one of the `accept` entries, either by MIME
/// pattern (`image/*`) or by listed extension.
pub fn accepts(dropzone: &DropzoneOptions, file: &UploadedFile) -> bool {
    if dropzone.accept.is_empty() {
        return true;
    }
    let ext = format!(".{}", extension(&file.path));
    dropzone.accept.iter().any(|(pattern, extensions)| {
        let by_mime = match pattern.strip_suffix("/*") {
            Some(family) => file
                .mime
                .split_once('/')
                .is_some_and(|(kind, _)| kind == family),
            None => file.mime == *pattern,
        };
        by_mime
            || extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    })
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[derive(Debug, Default)]
struct PreviewTable {
    next_id: u64,
    entries: BTreeMap<u64, PathBuf>,
}

/// Tracks live image previews. Each preview is leased through a
/// [`PreviewHandle`] and released when the handle drops.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    table: Rc<RefCell<PreviewTable>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, path: &Path) -> PreviewHandle {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.insert(id, path.to_path_buf());
        tracing::debug!(preview = id, path = %path.display(), "preview acquired");
        PreviewHandle {
            id,
            table: Rc::downgrade(&self.table),
        }
    }

    pub fn active(&self) -> usize {
        self.table.borrow().entries.len()
    }
}

pub struct PreviewHandle {
    id: u64,
    table: Weak<RefCell<PreviewTable>>,
}

impl PreviewHandle {
    pub fn url(&self) -> String {
        format!("preview://{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().entries.remove(&self.id);
            tracing::debug!(preview = self.id, "preview released");
        }
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.id).finish()
    }
}

#[derive(Debug)]
struct Upload {
    file: UploadedFile,
    _preview: Option<PreviewHandle>,
}

/// Dropzone-style upload list. A typed path is added on Enter; Delete
/// removes the file under the cursor.
#[derive(Debug)]
pub struct FileUploadComponent {
    dropzone: DropzoneOptions,
    uploads: Vec<Upload>,
    input: String,
    cursor: usize,
    issue: Option<String>,
    previews: PreviewRegistry,
    palette: Arc<ComponentPalette>,
}

impl FileUploadComponent {
    pub fn new(
        dropzone: DropzoneOptions,
        previews: PreviewRegistry,
        palette: Arc<ComponentPalette>,
    ) -> Self {
        Self {
            dropzone,
            uploads: Vec::new(),
            input: String::new(),
            cursor: 0,
            issue: None,
            previews,
            palette,
        }
    }

    pub fn files(&self) -> Vec<UploadedFile> {
        self.uploads.iter().map(|upload| upload.file.clone()).collect()
    }

    /// Validate and add one file against the dropzone constraints.
    pub fn add_file(&mut self, file: UploadedFile) -> Result<(), UploadRejection> {
        if !accepts(&self.dropzone, &file) {
            return Err(UploadRejection::Type { name: file.name });
        }
        if file.size > self.dropzone.max_size {
            return Err(UploadRejection::TooLarge {
                name: file.name,
                limit: human_size(self.dropzone.max_size),
            });
        }
        if self.dropzone.multiple && self.uploads.len() >= self.dropzone.max_files {
            return Err(UploadRejection::TooMany {
                max: self.dropzone.max_files,
            });
        }
        if !self.dropzone.multiple {
            self.uploads.clear();
        }
        let preview = file.is_image().then(|| self.previews.acquire(&file.path));
        self.uploads.push(Upload {
            file,
            _preview: preview,
        });
        self.cursor = self.uploads.len() - 1;
        Ok(())
    }

    fn submit_input(&mut self) -> KeyOutcome {
        let raw = self.input.trim().to_string();
        if raw.is_empty() {
            return KeyOutcome::Ignored;
        }
        let result = probe_file(Path::new(&raw)).and_then(|file| self.add_file(file));
        match result {
            Ok(()) => {
                self.issue = None;
                self.input.clear();
                KeyOutcome::Changed(self.current_value())
            }
            Err(rejection) => {
                tracing::debug!(path = %raw, %rejection, "upload rejected");
                self.issue = Some(rejection.to_string());
                KeyOutcome::Handled
            }
        }
    }

    fn remove_cursor(&mut self) -> KeyOutcome {
        if self.cursor >= self.uploads.len() {
            return KeyOutcome::Ignored;
        }
        self.uploads.remove(self.cursor);
        self.cursor = self.cursor.min(self.uploads.len().saturating_sub(1));
        self.issue = None;
        KeyOutcome::Changed(self.current_value())
    }
}

impl FieldComponent for FileUploadComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::FileUpload
    }

    fn display_value(&self) -> String {
        let mut parts = self
            .uploads
            .iter()
            .enumerate()
            .map(|(index, upload)| {
                let marker = if index == self.cursor { "›" } else { " " };
                format!(
                    "{marker}{} ({})",
                    upload.file.name,
                    human_size(upload.file.size)
                )
            })
            .collect::<Vec<_>>();
        if self.input.is_empty() {
            if self.uploads.is_empty() {
                parts.push(format!("⇪ {}", self.palette.pickers.upload_hint));
            }
        } else {
            parts.push(format!("⇪ {}", self.input));
        }
        parts.join("  ")
    }

    fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Delete => self.remove_cursor(),
            KeyCode::Backspace if self.input.is_empty() => self.remove_cursor(),
            KeyCode::Backspace => {
                self.input.pop();
                KeyOutcome::Handled
            }
            KeyCode::Left if self.input.is_empty() => {
                self.cursor = step_cursor(self.cursor, -1, self.uploads.len(), false);
                KeyOutcome::Handled
            }
            KeyCode::Right if self.input.is_empty() => {
                self.cursor = step_cursor(self.cursor, 1, self.uploads.len(), false);
                KeyOutcome::Handled
            }
            _ => match plain_char(key) {
                Some(ch) => {
                    self.input.push(ch);
                    KeyOutcome::Handled
                }
                None => KeyOutcome::Ignored,
            },
        }
    }

    fn seed_value(&mut self, value: &FieldValue) {
        let incoming = match value {
            FieldValue::Files(files) => files.clone(),
            _ => Vec::new(),
        };
        // Keep leases of files that survive the reseed.
        let mut kept: Vec<Upload> = Vec::new();
        let mut previous = std::mem::take(&mut self.uploads);
        for file in incoming {
            match previous.iter().position(|upload| upload.file == file) {
                Some(index) => kept.push(previous.remove(index)),
                None => {
                    let preview = file.is_image().then(|| self.previews.acquire(&file.path));
                    kept.push(Upload {
                        file,
                        _preview: preview,
                    });
                }
            }
        }
        self.uploads = kept;
        self.cursor = self.cursor.min(self.uploads.len().saturating_sub(1));
    }

    fn current_value(&self) -> FieldValue {
        if self.uploads.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Files(self.files())
        }
    }

    fn issue(&self) -> Option<&str> {
        self.issue.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_MAX_UPLOAD_SIZE;

    fn file(name: &str, size: u64) -> UploadedFile {
        let path = PathBuf::from(format!("/uploads/{name}"));
        UploadedFile {
            name: name.to_string(),
            mime: mime_for(&path).to_string(),
            path,
            size,
        }
    }

    fn component(multiple: bool, previews: &PreviewRegistry) -> FileUploadComponent {
        let dropzone = DropzoneOptions {
            multiple,
            max_files: 2,
            ..DropzoneOptions::default()
        };
        FileUploadComponent::new(
            dropzone,
            previews.clone(),
            Arc::new(ComponentPalette::default()),
        )
    }

    #[test]
    fn default_dropzone_accepts_images_and_csv() {
        let dropzone = DropzoneOptions::default();
        assert!(accepts(&dropzone, &file("photo.PNG", 10)));
        assert!(accepts(&dropzone, &file("sheet.csv", 10)));
        assert!(!accepts(&dropzone, &file("notes.pdf", 10)));
    }

    #[test]
    fn rejections_are_reported_not_added() {
        let previews = PreviewRegistry::new();
        let mut upload = component(true, &previews);
        assert_eq!(
            upload.add_file(file("big.png", DEFAULT_MAX_UPLOAD_SIZE + 1)),
            Err(UploadRejection::TooLarge {
                name: "big.png".into(),
                limit: "20.0 MB".into()
            })
        );
        upload.add_file(file("a.png", 1)).expect("first file");
        upload.add_file(file("b.csv", 1)).expect("second file");
        assert_eq!(
            upload.add_file(file("c.csv", 1)),
            Err(UploadRejection::TooMany { max: 2 })
        );
        assert_eq!(upload.files().len(), 2);
    }

    #[test]
    fn single_mode_replaces_and_releases_preview() {
        let previews = PreviewRegistry::new();
        let mut upload = component(false, &previews);
        upload.add_file(file("a.png", 1)).expect("image");
        assert_eq!(previews.active(), 1);
        upload.add_file(file("b.csv", 1)).expect("csv");
        assert_eq!(previews.active(), 0);
        assert_eq!(upload.files()[0].name, "b.csv");
    }

    #[test]
    fn removal_and_unmount_release_previews() {
        let previews = PreviewRegistry::new();
        let mut upload = component(true, &previews);
        upload.add_file(file("a.png", 1)).expect("a");
        upload.add_file(file("b.jpg", 1)).expect("b");
        assert_eq!(previews.active(), 2);
        assert!(matches!(
            upload.handle_key(&KeyEvent::new(KeyCode::Delete, crossterm::event::KeyModifiers::NONE)),
            KeyOutcome::Changed(_)
        ));
        assert_eq!(previews.active(), 1);
        drop(upload);
        assert_eq!(previews.active(), 0);
    }
}
