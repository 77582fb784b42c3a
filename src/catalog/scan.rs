use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::error::CatalogError;
use super::lrc::load_lrc;
use super::manifest::{AlbumManifest, TrackManifest, resolve, validate_timed_lyrics};
use super::model::{Album, Track};

/// Result of walking a library root.
#[derive(Debug, Default)]
pub struct Scan {
    /// Loaded albums, ordered by year then title.
    pub albums: Vec<Album>,
    /// Manifests that were found but rejected.
    pub errors: Vec<CatalogError>,
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_manifest(path: &Path, settings: &LibrarySettings) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| {
            settings
                .manifest_names
                .iter()
                .any(|m| m.trim().eq_ignore_ascii_case(name))
        })
        .unwrap_or(false)
}

/// Find and load every album manifest below `root`.
pub fn scan(root: &Path, settings: &LibrarySettings) -> Scan {
    let mut out = Scan::default();

    let mut walker = WalkDir::new(root).follow_links(settings.follow_links);
    if let Some(d) = settings.max_depth {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_manifest(path, settings) {
            continue;
        }

        match load_album(path, settings) {
            Ok(album) => {
                debug!(path = %path.display(), tracks = album.tracks.len(), "Loaded album");
                out.albums.push(album);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping album manifest");
                out.errors.push(e);
            }
        }
    }

    out.albums.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });

    info!(
        root = %root.display(),
        albums = out.albums.len(),
        rejected = out.errors.len(),
        "Library scan finished"
    );
    out
}

/// Load and validate a single manifest.
pub fn load_album(manifest_path: &Path, settings: &LibrarySettings) -> Result<Album, CatalogError> {
    let manifest = AlbumManifest::from_path(manifest_path)?;
    let dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let id = manifest
        .id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            dir.file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| manifest.title.clone());

    let mut tracks = manifest
        .tracks
        .iter()
        .map(|t| load_track(manifest_path, &dir, &id, t, settings))
        .collect::<Result<Vec<_>, _>>()?;
    tracks.sort_by_key(|t| t.track_number);

    Ok(Album {
        id,
        title: manifest.title,
        year: manifest.year,
        artist: manifest.artist.filter(|a| !a.trim().is_empty()),
        cover: manifest.cover.as_deref().map(|c| resolve(&dir, c)),
        dir,
        tracks,
    })
}

fn load_track(
    manifest_path: &Path,
    dir: &Path,
    album_id: &str,
    t: &TrackManifest,
    settings: &LibrarySettings,
) -> Result<Track, CatalogError> {
    let audio = resolve(dir, &t.audio);
    let id = t
        .id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("{album_id}-{}", t.track_number));

    let timed_lyrics = match (&t.timed_lyrics, &t.lyrics_file) {
        (Some(lines), _) => Some(lines.clone()),
        (None, Some(file)) => Some(load_lrc(&resolve(dir, file))?),
        (None, None) if settings.lrc_sidecars => {
            let sidecar = audio.with_extension("lrc");
            if sidecar.is_file() {
                debug!(path = %sidecar.display(), "Using LRC sidecar");
                Some(load_lrc(&sidecar)?)
            } else {
                None
            }
        }
        (None, None) => None,
    };

    if let Some(lines) = &timed_lyrics {
        validate_timed_lyrics(manifest_path, &t.title, lines)?;
    }

    let duration = if settings.read_durations {
        read_duration(&audio)
    } else {
        None
    };

    Ok(Track {
        id,
        track_number: t.track_number,
        title: t.title.clone(),
        audio,
        lyrics: t.lyrics.clone().filter(|l| !l.trim().is_empty()),
        timed_lyrics,
        credits: t.credits.clone().filter(|c| !c.trim().is_empty()),
        duration,
    })
}

/// Read the track length from the audio file header, if it can be parsed.
fn read_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged.properties().duration()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not read duration");
            None
        }
    }
}
