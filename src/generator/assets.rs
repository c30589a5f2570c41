//! Mirror `<content>/public` into the site's public directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy every top-level entry of `source` into `<public>/<entry>` and
/// `<public>/content/<entry>`. `<public>/content` is rebuilt from scratch;
/// top-level entries are replaced one by one.
///
/// Returns the number of entries mirrored. A missing source mirrors nothing.
pub fn mirror_assets(source: &Path, public_dir: &Path) -> Result<usize> {
    if !source.is_dir() {
        tracing::debug!("No content assets at {:?}", source);
        return Ok(0);
    }

    let mirror_dir = public_dir.join("content");
    remove_path(&mirror_dir)?;
    fs::create_dir_all(&mirror_dir)?;

    let targets = [public_dir.to_path_buf(), mirror_dir];
    let mut count = 0;

    let mut entries: Vec<_> = fs::read_dir(source)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let from = entry.path();
        for target in &targets {
            let dest = target.join(entry.file_name());
            remove_path(&dest)?;
            copy_path(&from, &dest)?;
        }
        tracing::debug!("Mirrored {:?}", from);
        count += 1;
    }

    Ok(count)
}

fn remove_path(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)?,
        Ok(_) => fs::remove_file(path)?,
        Err(_) => {}
    }
    Ok(())
}

fn copy_path(from: &Path, dest: &Path) -> Result<()> {
    if from.is_file() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, dest)?;
        return Ok(());
    }

    for entry in WalkDir::new(from)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let relative = path.strip_prefix(from)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)?;
        }
    }

    Ok(())
}
