//! File attachments

use std::{
    fs,
    fs::File,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::message::error::ComposeError;

/// Base64 line width for attachment bodies, per RFC 2045 §6.8
const BASE64_LINE_WIDTH: usize = 76;

/// A file attached to a message
///
/// The file must exist and be readable when the attachment is built; its
/// content is only read when the message is compiled.
#[derive(Debug, Clone)]
pub struct Attachment {
    path: PathBuf,
    name: String,
    content_type: String,
    disposition: String,
    content_id: Option<String>,
}

impl Attachment {
    /// Creates an attachment from a file path
    ///
    /// `name` defaults to the file name, `content_type` is resolved from the
    /// file extension when not given, and `disposition` defaults to
    /// `attachment`. Fails with [`ComposeError::AttachmentUnreadable`] when
    /// the file cannot be opened.
    pub fn new<P: AsRef<Path>>(
        path: P,
        name: Option<String>,
        content_type: Option<String>,
        disposition: Option<String>,
        content_id: Option<String>,
    ) -> Result<Attachment, ComposeError> {
        let path = path.as_ref().to_path_buf();

        // A readability probe only: the content is read at compile time.
        File::open(&path).map_err(|source| ComposeError::AttachmentUnreadable {
            path: path.clone(),
            source,
        })?;

        let name = name.unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let content_type = content_type.unwrap_or_else(|| content_type_for(&path).to_owned());

        Ok(Attachment {
            path,
            name,
            content_type,
            disposition: disposition.unwrap_or_else(|| "attachment".to_owned()),
            content_id,
        })
    }

    /// Resolved display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved content type
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Serializes the attachment as MIME part lines, without boundaries
    ///
    /// The file is re-read here; it may have vanished since construction, in
    /// which case [`ComposeError::AttachmentUnreadable`] is returned again.
    pub(crate) fn mime_lines(&self) -> Result<Vec<String>, ComposeError> {
        let content = fs::read(&self.path).map_err(|source| {
            ComposeError::AttachmentUnreadable {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut lines = vec![
            format!(
                "Content-Type: {}; name=\"{}\"",
                self.content_type, self.name
            ),
            "Content-Transfer-Encoding: base64".to_owned(),
            format!("Content-Disposition: {}", self.disposition),
        ];
        if let Some(content_id) = &self.content_id {
            lines.push(format!("Content-ID: <{content_id}>"));
        }
        lines.push(String::new());
        lines.extend(chunked_base64(&content));
        Ok(lines)
    }
}

/// Base64-encodes `content` and splits it into fixed-width lines
fn chunked_base64(content: &[u8]) -> Vec<String> {
    let encoded = STANDARD.encode(content);
    encoded
        .as_bytes()
        .chunks(BASE64_LINE_WIDTH)
        // base64 output is always ASCII
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// Suggested content type from the file extension, `application/octet-stream`
/// when unknown
fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("txt") => "text/plain",
        Some("html") | Some("htm") => "text/html",
        Some("zip") => "application/zip",
        Some("tar") => "application/x-tar",
        Some("pdf") => "application/pdf",
        Some("odt") => "application/vnd.oasis.opendocument.text",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("avi") => "video/x-msvideo",
        Some("mp4") => "video/mp4",
        Some("jpeg") | Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    fn temp_file(name: &str, content: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn missing_file_is_rejected_at_construction() {
        let result = Attachment::new("/definitely/not/here.pdf", None, None, None, None);
        assert!(matches!(
            result,
            Err(ComposeError::AttachmentUnreadable { .. })
        ));
    }

    #[test]
    fn defaults_resolved_from_path() {
        let path = temp_file("courriel_attachment_defaults.png", b"not a real png");
        let attachment = Attachment::new(&path, None, None, None, None).unwrap();
        assert_eq!(attachment.name(), "courriel_attachment_defaults.png");
        assert_eq!(attachment.content_type(), "image/png");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn vanished_file_is_rejected_at_serialization() {
        let path = temp_file("courriel_attachment_vanish.txt", b"soon gone");
        let attachment = Attachment::new(&path, None, None, None, None).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            attachment.mime_lines(),
            Err(ComposeError::AttachmentUnreadable { .. })
        ));
    }

    #[test]
    fn base64_lines_are_bounded() {
        let content = vec![0xAAu8; 300];
        for line in chunked_base64(&content) {
            assert!(line.len() <= BASE64_LINE_WIDTH);
        }
    }

    #[test]
    fn mime_lines_carry_content_id() {
        let path = temp_file("courriel_attachment_cid.txt", b"inline me");
        let attachment = Attachment::new(
            &path,
            Some("inline.txt".into()),
            None,
            Some("inline".into()),
            Some("cid-1".into()),
        )
        .unwrap();
        let lines = attachment.mime_lines().unwrap();
        assert!(lines.contains(&"Content-Disposition: inline".to_owned()));
        assert!(lines.contains(&"Content-ID: <cid-1>".to_owned()));
        std::fs::remove_file(path).unwrap();
    }
}
