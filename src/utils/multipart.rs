use crate::utils::error::CustomError;
use crate::utils::uploads::FileUpload;
use actix_multipart::Multipart;
use futures_util::StreamExt;
use std::collections::HashMap;

/// A parsed multipart submission: text fields plus at most one file under
/// the `file` field. This is the shape every content editor submits.
pub struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<FileUpload>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn required_text(&self, name: &str) -> Result<&str, CustomError> {
        self.text(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CustomError::ValidationError(format!("Field '{}' is required", name)))
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.text(name).map(str::trim), Some("true") | Some("1"))
    }
}

pub async fn parse_form(mut payload: Multipart) -> Result<FormData, CustomError> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            CustomError::BadRequestError(format!("Error reading multipart field: {}", e))
        })?;

        let (name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or("").to_string(),
                cd.get_filename().map(|f| f.to_string()),
            ),
            None => continue,
        };
        let content_type = field.content_type().map(|ct| ct.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                CustomError::BadRequestError(format!("Error reading field chunk: {}", e))
            })?;
            data.extend_from_slice(&chunk);
        }

        if name == "file" {
            // An unselected browser file input arrives as a part with an
            // empty filename; a named part is kept even when empty so the
            // validator can reject it
            let file_name = file_name.unwrap_or_default();
            if !file_name.is_empty() {
                file = Some(FileUpload::new(file_name, data, content_type));
            }
        } else {
            let value = String::from_utf8(data).map_err(|_| {
                CustomError::BadRequestError(format!("Field '{}' is not valid UTF-8", name))
            })?;
            fields.insert(name, value);
        }
    }

    Ok(FormData { fields, file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::uploads::FileValidator;
    use actix_web::http::header::{self, HeaderMap};
    use actix_web::web::Bytes;
    use futures_util::stream;

    const BOUNDARY: &str = "abbc761f78ff4d7cb7573b5a23f96ef0";

    fn multipart_from(body: &str) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary=\"{}\"", BOUNDARY)
                .parse()
                .unwrap(),
        );
        let bytes = Bytes::from(body.to_string());
        Multipart::new(
            &headers,
            stream::once(async { Ok::<_, actix_web::error::PayloadError>(bytes) }),
        )
    }

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    #[test]
    fn required_text_trims_and_rejects_blank() {
        let data = form(&[("title", "  My Story  "), ("content", "   ")]);
        assert_eq!(data.required_text("title").unwrap(), "My Story");
        assert!(data.required_text("content").is_err());
        assert!(data.required_text("missing").is_err());
    }

    #[test]
    fn flag_accepts_true_and_one() {
        let data = form(&[("remove_photo", "true"), ("other", "yes")]);
        assert!(data.flag("remove_photo"));
        assert!(!data.flag("other"));
        assert!(!data.flag("absent"));
    }

    #[actix_web::test]
    async fn empty_file_with_a_name_is_surfaced_and_fails_validation() {
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\
             \r\n\
             \r\n\
             --{b}--\r\n",
            b = BOUNDARY
        );

        let parsed = parse_form(multipart_from(&body)).await.unwrap();
        let file = parsed.file.expect("a named empty file must be surfaced");
        assert_eq!(file.file_name, "a.png");
        assert!(file.data.is_empty());

        let err = FileValidator::images().validate(&file).unwrap_err();
        assert!(err.to_string().contains("File is empty"));
    }

    #[actix_web::test]
    async fn unselected_file_input_is_skipped() {
        // A browser submits an untouched file input as a part with an
        // empty filename
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"\"\r\n\
             Content-Type: application/octet-stream\r\n\
             \r\n\
             \r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\
             \r\n\
             My Story\r\n\
             --{b}--\r\n",
            b = BOUNDARY
        );

        let parsed = parse_form(multipart_from(&body)).await.unwrap();
        assert!(parsed.file.is_none());
        assert_eq!(parsed.text("title"), Some("My Story"));
    }
}
