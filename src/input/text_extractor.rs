//! Text extraction from the supported document formats

use crate::error::{Result, ResumeSkillsError};
use crate::input::file_detector::DocumentFormat;
use pulldown_cmark::{html, Parser};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ResumeSkillsError::Io)?;
        pdf_bytes_to_text(&bytes).map_err(|e| {
            ResumeSkillsError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ResumeSkillsError::Io)?;
        docx_bytes_to_text(&bytes).map_err(|e| {
            ResumeSkillsError::DocxExtraction(format!(
                "Failed to extract text from DOCX '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ResumeSkillsError::Io)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ResumeSkillsError::Io)?;
        Ok(markdown_to_text(&String::from_utf8_lossy(&bytes)))
    }
}

/// Extract text from in-memory document bytes. Never fails: a document
/// that cannot be parsed, or that holds no text, yields the empty string.
/// Failures are logged at warn level before being absorbed.
pub async fn extract_text(bytes: &[u8], format: DocumentFormat) -> String {
    match try_extract(bytes, format).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Text extraction failed for {:?} input: {}", format, e);
            String::new()
        }
    }
}

async fn try_extract(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    let text = match format {
        DocumentFormat::Pdf => {
            let staged = stage_to_temp_file(bytes)?;
            PdfExtractor.extract(staged.path()).await?
        }
        DocumentFormat::Docx => {
            let staged = stage_to_temp_file(bytes)?;
            DocxExtractor.extract(staged.path()).await?
        }
        DocumentFormat::Markdown => markdown_to_text(&String::from_utf8_lossy(bytes)),
        DocumentFormat::Text => String::from_utf8_lossy(bytes).into_owned(),
        DocumentFormat::Unknown => {
            return Err(ResumeSkillsError::UnsupportedFormat(
                "Cannot extract text from an unknown document format".to_string(),
            ));
        }
    };

    Ok(normalize_whitespace(&text))
}

/// Write payload bytes to a named temp file. The file is removed when the
/// returned handle drops, on every exit path.
fn stage_to_temp_file(bytes: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().map_err(ResumeSkillsError::Io)?;
    file.write_all(bytes).map_err(ResumeSkillsError::Io)?;
    file.flush().map_err(ResumeSkillsError::Io)?;
    Ok(file)
}

/// Per-page PDF extraction: trim each page, skip pages with no text, join
/// the rest with single spaces.
fn pdf_bytes_to_text(bytes: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ResumeSkillsError::PdfExtraction(e.to_string()))?;

    let joined = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Ok(joined)
}

/// A DOCX file is a ZIP archive; the document body lives in
/// `word/document.xml`.
fn docx_bytes_to_text(bytes: &[u8]) -> Result<String> {
    use std::io::Read;

    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| ResumeSkillsError::DocxExtraction(format!("Not a DOCX archive: {}", e)))?;

    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| {
            ResumeSkillsError::DocxExtraction(format!("Missing word/document.xml: {}", e))
        })?
        .read_to_string(&mut document)
        .map_err(|e| {
            ResumeSkillsError::DocxExtraction(format!("Failed to read document.xml: {}", e))
        })?;

    Ok(document_xml_to_text(&document))
}

/// Pull the visible text out of a WordprocessingML body: concatenate the
/// `<w:t>` runs of each paragraph, one output line per paragraph.
fn document_xml_to_text(xml: &str) -> String {
    let run_re = regex::Regex::new(r"<w:t[^>]*>([^<]*)</w:t>").unwrap();

    let mut paragraphs = Vec::new();
    for paragraph in xml.split("</w:p>") {
        let mut runs = String::new();
        for cap in run_re.captures_iter(paragraph) {
            runs.push_str(&cap[1]);
        }
        let text = unescape_xml(&runs);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            paragraphs.push(trimmed.to_string());
        }
    }
    paragraphs.join("\n")
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Render markdown to HTML, then strip the markup down to plain text.
fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_to_text(&html_output)
}

fn html_to_text(html: &str) -> String {
    let text = html
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let re = regex::Regex::new(r"<[^>]*>").unwrap();
    let clean_text = re.replace_all(&text, "");

    let lines: Vec<String> = clean_text
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}

/// Collapse runs of spaces and tabs, cap blank-line runs at one, trim.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    let text = text.replace('\r', "");
    let horizontal = regex::Regex::new(r"[ \t]+").unwrap();
    let collapsed = horizontal.replace_all(&text, " ");
    let newlines = regex::Regex::new(r"\n{3,}").unwrap();
    let collapsed = newlines.replace_all(&collapsed, "\n\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_archive(document_xml: &str) -> Vec<u8> {
        use zip::write::SimpleFileOptions;

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn markdown_strips_to_plain_text() {
        let markdown = "# Skills\n\n- **Rust** programming\n- [Docker](https://docker.com)\n";
        let text = markdown_to_text(markdown);

        assert!(text.contains("Skills"));
        assert!(text.contains("Rust programming"));
        assert!(text.contains("Docker"));
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
        assert!(!text.contains("https://"));
    }

    #[test]
    fn document_xml_joins_runs_and_paragraphs() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Senior </w:t></w:r><w:r><w:t xml:space="preserve">Engineer</w:t></w:r></w:p>
            <w:p></w:p>
            <w:p><w:r><w:t>Python &amp; Rust</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let text = document_xml_to_text(xml);
        assert_eq!(text, "Senior Engineer\nPython & Rust");
    }

    #[test]
    fn unescape_handles_double_escaped_ampersand() {
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
        assert_eq!(unescape_xml("a &lt; b &amp;&amp; c &gt; d"), "a < b && c > d");
    }

    #[test]
    fn normalize_collapses_runs() {
        let text = "a\t\t b   c\n\n\n\n\nd  ";
        assert_eq!(normalize_whitespace(text), "a b c\n\nd");
    }

    #[tokio::test]
    async fn extract_text_reads_docx_bytes() {
        let bytes = docx_archive(
            "<w:document><w:body><w:p><w:r><w:t>Kubernetes administration</w:t></w:r></w:p></w:body></w:document>",
        );

        let text = extract_text(&bytes, DocumentFormat::Docx).await;
        assert_eq!(text, "Kubernetes administration");
    }

    #[tokio::test]
    async fn extract_text_absorbs_corrupt_documents() {
        let garbage = b"not a real document";
        assert_eq!(extract_text(garbage, DocumentFormat::Pdf).await, "");
        assert_eq!(extract_text(garbage, DocumentFormat::Docx).await, "");
        assert_eq!(extract_text(garbage, DocumentFormat::Unknown).await, "");
    }

    #[tokio::test]
    async fn extract_text_decodes_plain_text_lossily() {
        let mut bytes = b"Rust \xFF developer".to_vec();
        let text = extract_text(&bytes, DocumentFormat::Text).await;
        assert!(text.starts_with("Rust"));
        assert!(text.ends_with("developer"));

        bytes.clear();
        assert_eq!(extract_text(&bytes, DocumentFormat::Text).await, "");
    }

    #[tokio::test]
    async fn docx_without_document_xml_yields_empty() {
        use zip::write::SimpleFileOptions;

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("other.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }

        let text = extract_text(&cursor.into_inner(), DocumentFormat::Docx).await;
        assert_eq!(text, "");
    }
}
