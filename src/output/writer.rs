//! Page file writer
//!
//! Every saved page becomes one UTF-8 text file, placed flat in the output
//! directory:
//!
//! ```text
//! URL: <absolute URL>
//! Title: <title or empty>
//! ================================================================================
//!
//! <extracted text>
//! ```

use crate::crawler::PageResult;
use crate::output::naming::NameAllocator;
use crate::output::OutputResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Width of the separator line under the header
const SEPARATOR_WIDTH: usize = 80;

/// Writes page files with unique names into one directory
#[derive(Debug)]
pub struct TextFileWriter {
    output_dir: PathBuf,
    names: NameAllocator,
}

impl TextFileWriter {
    /// Creates the output directory (and parents) if needed
    ///
    /// # Returns
    ///
    /// * `Ok(TextFileWriter)` - The directory exists and is ready
    /// * `Err(OutputError)` - The directory could not be created
    pub fn create(output_dir: &Path, include_title: bool) -> OutputResult<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            names: NameAllocator::new(include_title),
        })
    }

    /// Returns the directory files are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Allocates a name for the page and writes its file
    ///
    /// # Returns
    ///
    /// The path of the written file
    pub fn save(&mut self, page: &PageResult) -> OutputResult<PathBuf> {
        let file_name = self.names.allocate(&page.url, page.title.as_deref());
        let path = self.output_dir.join(file_name);

        let content = format_page(page.url.as_str(), page.title.as_deref(), &page.text);
        fs::write(&path, content)?;

        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }
}

/// Formats a page in the output file layout
pub fn format_page(url: &str, title: Option<&str>, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + url.len() + SEPARATOR_WIDTH + 32);
    out.push_str(&format!("URL: {}\n", url));
    out.push_str(&format!("Title: {}\n", title.unwrap_or("")));
    out.push_str(&"=".repeat(SEPARATOR_WIDTH));
    out.push_str("\n\n");
    out.push_str(text);
    out
}
