//! Reading registry forms submitted as `multipart/form-data`.

use std::collections::{BTreeSet, HashMap};

use axum::extract::Multipart;
use qtrace_cloud::ImageUpload;
use qtrace_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// A fully read multipart form: text fields and attached files by name.
///
/// A file input left empty is sent by browsers as a part with no file name
/// and no bytes; such parts are dropped, so "no file chosen" reads as absent.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl FormData {
    /// Drain every part of the request.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.insert_file(
                        name,
                        ImageUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.insert_text(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: ImageUpload) {
        self.files.insert(name.into(), file);
    }

    /// The trimmed value of a text field, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// The trimmed value of a text field, `None` when the field was not sent.
    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|v| v.trim().to_string())
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }

    /// Parse a numeric field. Blank or absent reads as `None`.
    pub fn number(&self, name: &str) -> Result<Option<f64>, CoreError> {
        let raw = self.text(name);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("{name} must be a number, got '{raw}'")))
    }

    /// Row indexes used by fields named `{group}[{index}][...]`, in order.
    pub fn row_indexes(&self, group: &str) -> BTreeSet<usize> {
        self.fields
            .keys()
            .chain(self.files.keys())
            .filter_map(|name| row_index(name, group))
            .collect()
    }
}

/// Field name of column `column` in row `index` of `group`.
pub fn row_field(group: &str, index: usize, column: &str) -> String {
    format!("{group}[{index}][{column}]")
}

fn row_index(name: &str, group: &str) -> Option<usize> {
    let rest = name.strip_prefix(group)?.strip_prefix('[')?;
    let (index, _) = rest.split_once(']')?;
    index.parse().ok()
}
