use anyhow::{anyhow, Context};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipError;

use crate::config::LocalState;
use crate::error::UpdateError;

use super::manifest::RemoteManifest;
use super::USER_AGENT;

/// Download the archive named by the manifest, unpack it over `root`, and
/// record the new version in the state file. The version is written only
/// after extraction succeeded.
pub fn download_and_apply(
    manifest: &RemoteManifest,
    mut state: LocalState,
    root: &Path,
) -> Result<(), UpdateError> {
    let archive_path = download_archive(&manifest.source, root)?;

    println!("{}", "Extracting...".cyan());
    extract_archive(&archive_path, root)?;

    state.local_version.current_version = manifest.current_version.clone();
    state.store(root)?;

    Ok(())
}

/// GET `source` and stream the body into `root`, keeping the file name
/// the publisher gave the archive.
fn download_archive(source: &str, root: &Path) -> Result<PathBuf, UpdateError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("failed to create HTTP client")?;

    let mut response = client
        .get(source)
        .send()
        .map_err(|e| UpdateError::network(anyhow!(e).context(format!("GET {source} failed"))))?;

    if !response.status().is_success() {
        return Err(UpdateError::network(anyhow!(
            "GET {source} answered {}",
            response.status()
        )));
    }

    println!("Downloading {}...", archive_name(source));
    let dest = root.join(archive_name(source));

    let pb = match response.content_length() {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let mut file =
        File::create(&dest).with_context(|| format!("failed to create {}", dest.display()))?;
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| UpdateError::network(anyhow!(e).context("download interrupted")))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .with_context(|| format!("failed to write {}", dest.display()))?;
        downloaded += bytes_read as u64;
        pb.set_position(downloaded);
    }

    pb.finish_with_message("Download complete");
    Ok(dest)
}

/// Extract every entry of the archive into `dest`, overwriting freely.
fn extract_archive(archive_path: &Path, dest: &Path) -> Result<(), UpdateError> {
    let file = File::open(archive_path)
        .with_context(|| format!("failed to open {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(classify_zip_error)?;
    archive.extract(dest).map_err(classify_zip_error)?;
    Ok(())
}

/// I/O failures during extraction are environment problems, not archive
/// problems; only format-level errors belong to the archive class.
fn classify_zip_error(err: ZipError) -> UpdateError {
    match err {
        ZipError::Io(io) => {
            UpdateError::Other(anyhow!(io).context("I/O error while extracting archive"))
        }
        other => UpdateError::archive(other),
    }
}

/// Last path segment of the source URL.
fn archive_name(source: &str) -> &str {
    source.rsplit('/').next().unwrap_or(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name("https://example.com/dl/app.zip"), "app.zip");
        assert_eq!(archive_name("app.zip"), "app.zip");
        assert_eq!(archive_name("https://example.com/dl/"), "");
    }

    #[test]
    fn test_extract_archive() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("app.zip");
        fs::write(
            &archive_path,
            zip_bytes(&[("app.bin", b"binary"), ("data/readme.txt", b"hello")]),
        )
        .unwrap();

        extract_archive(&archive_path, dir.path()).unwrap();

        assert_eq!(fs::read(dir.path().join("app.bin")).unwrap(), b"binary");
        assert_eq!(
            fs::read(dir.path().join("data/readme.txt")).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_extract_archive_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.bin"), b"old").unwrap();
        let archive_path = dir.path().join("app.zip");
        fs::write(&archive_path, zip_bytes(&[("app.bin", b"new")])).unwrap();

        extract_archive(&archive_path, dir.path()).unwrap();

        assert_eq!(fs::read(dir.path().join("app.bin")).unwrap(), b"new");
    }

    #[test]
    fn test_extract_not_a_zip() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("app.zip");
        fs::write(&archive_path, b"this is not a zip archive").unwrap();

        let err = extract_archive(&archive_path, dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_classify_io_error_as_other() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(classify_zip_error(ZipError::Io(io)).exit_code(), 4);
    }
}
