//! Size-based rotation and gzip compression of log files

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use jiff::Zoned;

use crate::logger::config::RotationConfig;
use crate::logger::error::LoggerError;

pub struct RotationManager {
    config: RotationConfig,
    sequence: u32,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            sequence: 0,
        }
    }

    pub fn should_rotate(&self, current_file_size: u64) -> bool {
        current_file_size >= self.config.max_size
    }

    /// Moves the active file aside, optionally compresses it and prunes old files.
    pub fn rotate(&mut self, current_path: &Path) -> Result<(), LoggerError> {
        if current_path.exists() {
            let rotated_path = self.next_rotated_path(current_path);
            fs::rename(current_path, &rotated_path)?;

            if self.config.compress {
                compress_file(&rotated_path)?;
            }
        }

        self.cleanup_old_files(current_path)
    }

    fn cleanup_old_files(&self, base_path: &Path) -> Result<(), LoggerError> {
        let mut rotated = rotated_files(base_path)?;
        // Rotated names embed a sortable timestamp
        rotated.sort();

        let excess = rotated.len().saturating_sub(self.config.max_files);
        for path in rotated.into_iter().take(excess) {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// `logs/app.log` becomes `logs/app.20261018_120000_0003.log`.
    ///
    /// Names sort in rotation order: the timestamp orders processes and the
    /// per-manager sequence orders rotations within the same second.
    fn next_rotated_path(&mut self, base_path: &Path) -> PathBuf {
        let timestamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
        let stem = base_path.file_stem().unwrap_or_default().to_string_lossy();
        let ext = base_path.extension().map(|e| e.to_string_lossy());

        loop {
            let name = match &ext {
                Some(ext) => format!("{}.{}_{:04}.{}", stem, timestamp, self.sequence, ext),
                None => format!("{}.{}_{:04}", stem, timestamp, self.sequence),
            };
            self.sequence = self.sequence.wrapping_add(1);

            let candidate = base_path.with_file_name(name);
            if !candidate.exists() && !gz_path(&candidate).exists() {
                return candidate;
            }
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".gz");
    path.with_file_name(name)
}

fn rotated_files(base_path: &Path) -> io::Result<Vec<PathBuf>> {
    let parent = match base_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = format!(
        "{}.",
        base_path.file_stem().unwrap_or_default().to_string_lossy()
    );
    let active = base_path.file_name().unwrap_or_default();

    Ok(fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let name = path.file_name().unwrap_or_default();
            name != active && name.to_string_lossy().starts_with(&prefix)
        })
        .collect())
}

/// Replaces `path` with a gzip-compressed `path.gz`.
pub fn compress_file(path: &Path) -> Result<PathBuf, LoggerError> {
    let input = fs::read(path)?;
    let compressed_path = gz_path(path);

    let mut encoder = GzEncoder::new(File::create(&compressed_path)?, Compression::default());
    encoder.write_all(&input)?;
    encoder.finish()?;

    fs::remove_file(path)
        .map_err(|e| LoggerError::rotation(format!("remove {}: {}", path.display(), e)))?;
    Ok(compressed_path)
}
