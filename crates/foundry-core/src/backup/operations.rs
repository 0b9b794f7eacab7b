use chrono::{Local, NaiveDateTime};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::BACKUP_DIR;
use super::errors::BackupError;

const SNAPSHOT_PREFIX: &str = "backup-";
const SNAPSHOT_EXTENSION: &str = ".tar.gz";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// A snapshot archive on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// File name without extension, e.g. `backup-20240101-120000` or
    /// `backup-20240101-120000-1` for a same-second follow-up.
    pub id: String,
    pub path: PathBuf,
    /// Second-precision local time encoded in the name.
    pub timestamp: NaiveDateTime,
    /// Same-second disambiguator; 0 for the first snapshot of that second.
    #[serde(skip)]
    sequence: u32,
}

/// Archive the whole configuration root into a new snapshot.
///
/// The `backups/` directory itself is excluded. A snapshot requested within
/// the same second as an existing one gets a numeric suffix instead of
/// replacing it. The archive is written under a temporary name and renamed
/// into place once complete.
///
/// # Errors
///
/// Returns `BackupError::CreateDirFailed` if the backup directory cannot be
/// created and `BackupError::ArchiveFailed` if walking the root or writing
/// the archive fails.
pub fn create_snapshot(root: &Path) -> Result<Snapshot, BackupError> {
    let backup_dir = root.join(BACKUP_DIR);
    fs::create_dir_all(&backup_dir).map_err(|e| BackupError::CreateDirFailed {
        path: backup_dir.clone(),
        source: e,
    })?;

    let timestamp = Local::now().naive_local();
    let snapshot = next_free_snapshot(&backup_dir, timestamp);
    let temp_path = backup_dir.join(format!("{}.tmp", snapshot.id));

    let entries = match write_archive(root, &backup_dir, &temp_path) {
        Ok(entries) => entries,
        Err(e) => {
            cleanup_temp_file(&temp_path, &e);
            return Err(BackupError::ArchiveFailed {
                path: snapshot.path,
                source: e,
            });
        }
    };

    if let Err(e) = fs::rename(&temp_path, &snapshot.path) {
        cleanup_temp_file(&temp_path, &e);
        return Err(BackupError::ArchiveFailed {
            path: snapshot.path,
            source: e,
        });
    }

    tracing::info!(
        event = "core.backup.snapshot_created",
        path = %snapshot.path.display(),
        entries = entries
    );

    Ok(snapshot)
}

/// List existing snapshots, oldest first.
///
/// A missing backup directory yields an empty list. Files that do not follow
/// the snapshot naming scheme are ignored.
pub fn list_snapshots(root: &Path) -> Result<Vec<Snapshot>, BackupError> {
    let backup_dir = root.join(BACKUP_DIR);
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let list_error = |e: io::Error| BackupError::ListFailed {
        path: backup_dir.clone(),
        source: e,
    };

    let mut snapshots = Vec::new();
    for entry in fs::read_dir(&backup_dir).map_err(list_error)? {
        let path = entry.map_err(list_error)?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(snapshot) = parse_snapshot_name(file_name, &path) {
            snapshots.push(snapshot);
        }
    }

    snapshots.sort_by(|a, b| (a.timestamp, a.sequence).cmp(&(b.timestamp, b.sequence)));
    Ok(snapshots)
}

fn next_free_snapshot(backup_dir: &Path, timestamp: NaiveDateTime) -> Snapshot {
    let stem = format!("{}{}", SNAPSHOT_PREFIX, timestamp.format(TIMESTAMP_FORMAT));
    let mut sequence = 0;
    loop {
        let id = if sequence == 0 {
            stem.clone()
        } else {
            format!("{}-{}", stem, sequence)
        };
        let path = backup_dir.join(format!("{}{}", id, SNAPSHOT_EXTENSION));
        if !path.exists() {
            return Snapshot {
                id,
                path,
                timestamp: parse_timestamp(&stem[SNAPSHOT_PREFIX.len()..]).unwrap_or(timestamp),
                sequence,
            };
        }
        sequence += 1;
    }
}

fn parse_snapshot_name(file_name: &str, path: &Path) -> Option<Snapshot> {
    let id = file_name.strip_suffix(SNAPSHOT_EXTENSION)?;
    let rest = id.strip_prefix(SNAPSHOT_PREFIX)?;

    // "YYYYMMDD-HHMMSS" is 15 characters, optionally followed by "-<n>"
    let (stamp, suffix) = rest.split_at_checked(15)?;
    let timestamp = parse_timestamp(stamp)?;
    let sequence = match suffix {
        "" => 0,
        _ => suffix.strip_prefix('-')?.parse().ok()?,
    };

    Some(Snapshot {
        id: id.to_string(),
        path: path.to_path_buf(),
        timestamp,
        sequence,
    })
}

fn parse_timestamp(stamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

/// Write `root` (minus `backup_dir`) into a gzip tar at `dest`, returning
/// the number of entries archived.
fn write_archive(root: &Path, backup_dir: &Path, dest: &Path) -> io::Result<usize> {
    let file = File::create(dest)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.follow_symlinks(false);

    let mut entries = 0;
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.path() != backup_dir);

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };

        // Skip root itself
        if rel_path.as_os_str().is_empty() {
            continue;
        }

        builder.append_path_with_name(entry.path(), rel_path)?;
        entries += 1;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?.sync_all()?;
    Ok(entries)
}

fn cleanup_temp_file(temp_file: &Path, original_error: &io::Error) {
    if temp_file.exists()
        && let Err(cleanup_err) = fs::remove_file(temp_file)
    {
        tracing::warn!(
            event = "core.backup.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    fn archive_entries(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                entry
                    .unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .trim_end_matches('/')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_snapshot_archives_whole_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("config.toml"), "version = \"1\"").unwrap();
        fs::create_dir_all(root.join("teams")).unwrap();
        fs::write(root.join("teams").join("infra.toml"), "version = \"1\"").unwrap();

        let snapshot = create_snapshot(root).unwrap();

        assert!(snapshot.path.exists());
        assert!(snapshot.id.starts_with("backup-"));
        assert!(snapshot.path.to_string_lossy().ends_with(".tar.gz"));
        assert_eq!(snapshot.path.parent().unwrap(), root.join("backups"));

        let entries = archive_entries(&snapshot.path);
        assert!(entries.contains(&"config.toml".to_string()));
        assert!(entries.contains(&"teams".to_string()));
        assert!(entries.contains(&"teams/infra.toml".to_string()));
        assert!(!entries.iter().any(|e| e.starts_with("backups")));
    }

    #[test]
    fn test_snapshot_of_missing_root_creates_empty_archive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("not-yet-created");

        let snapshot = create_snapshot(&root).unwrap();
        assert!(snapshot.path.exists());
        assert!(archive_entries(&snapshot.path).is_empty());
    }

    #[test]
    fn test_snapshots_never_overwrite_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("config.toml"), "a").unwrap();

        let first = create_snapshot(root).unwrap();
        let second = create_snapshot(root).unwrap();
        let third = create_snapshot(root).unwrap();

        assert_ne!(first.path, second.path);
        assert_ne!(second.path, third.path);
        assert!(first.path.exists());
        assert!(second.path.exists());
        assert!(third.path.exists());

        let listed = list_snapshots(root).unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[test]
    fn test_same_second_gets_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let timestamp = parse_timestamp("20240102-030405").unwrap();
        fs::write(temp_dir.path().join("backup-20240102-030405.tar.gz"), "").unwrap();

        let snapshot = next_free_snapshot(temp_dir.path(), timestamp);
        assert_eq!(snapshot.id, "backup-20240102-030405-1");
        assert_eq!(snapshot.sequence, 1);
    }

    #[test]
    fn test_list_snapshots_orders_by_time_then_sequence() {
        let temp_dir = TempDir::new().unwrap();
        let backups = temp_dir.path().join("backups");
        fs::create_dir_all(&backups).unwrap();
        for name in [
            "backup-20240101-000000-10.tar.gz",
            "backup-20240101-000001.tar.gz",
            "backup-20240101-000000-2.tar.gz",
            "backup-20240101-000000.tar.gz",
            "notes.txt",
            "backup-garbage.tar.gz",
        ] {
            fs::write(backups.join(name), "").unwrap();
        }

        let ids: Vec<_> = list_snapshots(temp_dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "backup-20240101-000000",
                "backup-20240101-000000-2",
                "backup-20240101-000000-10",
                "backup-20240101-000001",
            ]
        );
    }

    #[test]
    fn test_list_snapshots_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_snapshots(temp_dir.path()).unwrap().is_empty());
    }
}
