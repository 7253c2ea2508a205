use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt;

use crate::error::ApiError;

/// An uploaded file collected from a multipart form.
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Text fields and the optional file part of a multipart admin form.
pub struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl FormData {
    /// A text field, with blank input collapsed to None.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, name: &str) -> Result<&str, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::Validation(format!("The {} field is required.", name)))
    }
}

/// Drains a multipart payload into text fields plus at most one file field
/// named "file". The size cap is enforced while streaming so an oversized
/// upload is rejected before it is fully read.
pub async fn collect(mut multipart: Multipart, max_file_bytes: usize) -> Result<FormData, ApiError> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(item) = multipart.next().await {
        let mut field =
            item.map_err(|_| ApiError::Validation("Invalid multipart data.".to_string()))?;

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .filter(|f| !f.is_empty());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|_| ApiError::Validation("Invalid multipart data.".to_string()))?;
            bytes.extend_from_slice(&chunk);

            if filename.is_some() && bytes.len() > max_file_bytes {
                return Err(ApiError::Validation(
                    "The file exceeds the maximum allowed size.".to_string(),
                ));
            }
        }

        match filename {
            Some(filename) if name == "file" => {
                file = Some(UploadedFile { filename, bytes });
            }
            // A file part under any other name is not a form the admin
            // panel sends; ignore it like an unknown field.
            Some(_) => {}
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| ApiError::Validation("Invalid multipart data.".to_string()))?;
                fields.insert(name, value);
            }
        }
    }

    Ok(FormData { fields, file })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> FormData {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    #[test]
    fn blank_text_fields_collapse_to_none() {
        let data = form(&[("folder", "  "), ("category", "thesis")]);

        assert_eq!(data.text("folder"), None);
        assert_eq!(data.text("category"), Some("thesis"));
        assert_eq!(data.text("missing"), None);
    }

    #[test]
    fn require_text_reports_the_field_name() {
        let data = form(&[]);

        match data.require_text("filename") {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "The filename field is required.")
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
