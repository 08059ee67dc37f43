use crate::core::MarkupStore;
use crate::utils::error::{FigError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Markup files on the local filesystem, relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl MarkupStore for LocalStorage {
    fn read_file(&self, path: &str) -> Result<String> {
        let data = fs::read_to_string(self.full_path(path))?;
        Ok(data)
    }

    fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, content)?;
        Ok(())
    }

    fn prepend(&self, path: &str, header: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(self.full_path(path))?;

        // 只讀一次，之後從頭覆寫（新內容只會更長，不需要 truncate）
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(header.as_bytes())?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn append(&self, path: &str, trailer: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(self.full_path(path))?;
        file.write_all(trailer.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// In-memory markup files; used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.files
            .borrow_mut()
            .insert(path.to_string(), content.to_string());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    fn not_found(path: &str) -> FigError {
        FigError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path),
        ))
    }
}

impl MarkupStore for MemoryStore {
    fn read_file(&self, path: &str) -> Result<String> {
        self.get(path).ok_or_else(|| Self::not_found(path))
    }

    fn write_file(&self, path: &str, content: &str) -> Result<()> {
        self.insert(path, content);
        Ok(())
    }

    fn prepend(&self, path: &str, header: &str) -> Result<()> {
        let mut files = self.files.borrow_mut();
        let content = files.get_mut(path).ok_or_else(|| Self::not_found(path))?;
        content.insert_str(0, header);
        Ok(())
    }

    fn append(&self, path: &str, trailer: &str) -> Result<()> {
        let mut files = self.files.borrow_mut();
        let content = files.get_mut(path).ok_or_else(|| Self::not_found(path))?;
        content.push_str(trailer);
        Ok(())
    }
}
