use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::ImportError;

const DATA_FILE_EXTENSION: &str = ".csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    TarGz,
    Zip,
    Flat,
}

impl InputKind {
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            InputKind::TarGz
        } else if name.ends_with(".zip") {
            InputKind::Zip
        } else {
            InputKind::Flat
        }
    }
}

/// The CSV file an import reads from.
///
/// When the file was extracted from an archive it is removed on drop, whatever
/// happened to the run in between, together with the directories the
/// extraction had to create.
#[derive(Debug)]
pub struct DataFile {
    path: PathBuf,
    extracted: bool,
    /// Outermost first.
    created_dirs: Vec<PathBuf>,
}

impl DataFile {
    fn source(path: &Path) -> Self {
        DataFile {
            path: path.to_path_buf(),
            extracted: false,
            created_dirs: Vec::new(),
        }
    }

    /// Guard for a file about to be extracted to `target`. Taken before the
    /// first write so a failed extraction is cleaned up as well.
    fn extracting(target: PathBuf) -> Self {
        let mut created_dirs: Vec<PathBuf> = target
            .ancestors()
            .skip(1)
            .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
            .map(Path::to_path_buf)
            .collect();
        created_dirs.reverse();
        DataFile {
            path: target,
            extracted: true,
            created_dirs,
        }
    }

    fn prepare_parent(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_extracted(&self) -> bool {
        self.extracted
    }
}

impl Drop for DataFile {
    fn drop(&mut self) {
        if !self.extracted {
            return;
        }
        if self.path.exists() {
            match fs::remove_file(&self.path) {
                Ok(()) => info!("Cleaned up temporary file {}", self.path.display()),
                Err(e) => warn!("Could not remove temporary file {}: {}", self.path.display(), e),
            }
        }
        for dir in self.created_dirs.iter().rev() {
            // remove_dir only succeeds on empty directories
            if let Err(e) = fs::remove_dir(dir) {
                debug!("Keeping directory {}: {}", dir.display(), e);
            }
        }
    }
}

/// Resolves the input path to a readable CSV file, extracting it from an
/// archive into `work_dir` (default: the archive's directory) when needed.
pub fn open_input(input: &Path, work_dir: Option<&Path>) -> Result<DataFile, ImportError> {
    if !input.exists() {
        return Err(ImportError::MissingInput(input.to_path_buf()));
    }

    let data = match InputKind::detect(input) {
        InputKind::Flat => return Ok(DataFile::source(input)),
        InputKind::TarGz => extract_from_tar_gz(input, &extraction_dir(input, work_dir))?,
        InputKind::Zip => extract_from_zip(input, &extraction_dir(input, work_dir))?,
    };
    info!("Extracted {}", data.path().display());
    Ok(data)
}

fn extraction_dir(input: &Path, work_dir: Option<&Path>) -> PathBuf {
    match work_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

fn extract_from_tar_gz(archive_path: &Path, dir: &Path) -> Result<DataFile, ImportError> {
    let file = File::open(archive_path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path()?.into_owned();
        if !name.to_string_lossy().ends_with(DATA_FILE_EXTENSION) {
            continue;
        }
        if !name.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(ImportError::Archive(format!(
                "refusing to extract unsafe entry {}",
                name.display()
            )));
        }

        let data = DataFile::extracting(dir.join(&name));
        data.prepare_parent()?;
        // unpack_in refuses paths escaping `dir` and reports that as Ok(false)
        if !entry.unpack_in(dir)? {
            return Err(ImportError::Archive(format!(
                "refusing to extract {} outside {}",
                name.display(),
                dir.display()
            )));
        }
        return Ok(data);
    }

    Err(ImportError::NoDataFileInArchive(archive_path.to_path_buf()))
}

fn extract_from_zip(archive_path: &Path, dir: &Path) -> Result<DataFile, ImportError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.is_file() || !entry.name().ends_with(DATA_FILE_EXTENSION) {
            continue;
        }
        let Some(name) = entry.enclosed_name() else {
            return Err(ImportError::Archive(format!(
                "refusing to extract unsafe entry {}",
                entry.name()
            )));
        };

        let data = DataFile::extracting(dir.join(name));
        data.prepare_parent()?;
        let mut out = File::create(data.path())?;
        io::copy(&mut entry, &mut out)?;
        return Ok(data);
    }

    Err(ImportError::NoDataFileInArchive(archive_path.to_path_buf()))
}
