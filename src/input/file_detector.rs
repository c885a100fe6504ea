//! Document format detection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Markdown,
    Text,
    Unknown,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => DocumentFormat::Pdf,
            "docx" => DocumentFormat::Docx,
            "md" | "markdown" => DocumentFormat::Markdown,
            "txt" => DocumentFormat::Text,
            _ => DocumentFormat::Unknown,
        }
    }
}
