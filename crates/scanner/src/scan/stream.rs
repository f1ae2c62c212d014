use crate::error::{ErrorKind as ScannerErrorKind, Result as ScannerResult};
use crate::scan::error::{ErrorKind, Result as ScanResult};
use crate::scan::parse::parse_title_author;
use crate::scan::{SUPPORTED_EXTENSIONS, UNKNOWN_GENRE};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use inkdex_catalog::Repository;
use inkdex_catalog::error::ErrorKind as CatalogErrorKind;
use inkdex_catalog::models::{NewRecord, Record};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Knobs for a directory scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Treat a nonexistent scan root as [`ErrorKind::MissingRoot`] instead
    /// of an empty scan. Off by default: a missing directory historically
    /// produced zero results and no error, and callers depend on that.
    pub missing_root_is_error: bool,
}

/// Progress events emitted by [`scan`] as it works through a directory tree.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete): exactly once, with
///    the total number of candidate files.
/// 3. [`Progress`](Self::Progress): once per candidate, *before* the
///    scanner decides whether the file is new or already indexed, so
///    progress always reflects files considered rather than files added.
/// 4. [`Added`](Self::Added): zero or more times, one per newly indexed
///    file, each immediately after its `Progress` event.
/// 5. [`Complete`](Self::Complete): exactly once, signalling the stream is
///    finished.
///
/// An error may terminate the stream early, in which case
/// [`Complete`](Self::Complete) is never emitted.
#[derive(Debug)]
pub enum ScanEvent {
    /// Scanning has begun; emitted exactly once before any other event.
    Started,
    /// The directory walk finished; the candidate count is now known.
    DiscoveryComplete(u64),
    /// A candidate file is being considered.
    Progress { file: PathBuf, processed: u64, total: u64 },
    /// A file not previously in the catalog has been indexed.
    Added(Box<Record>),
    /// Every candidate has been considered; the stream is finished.
    Complete,
}

/// A file that survived the extension filter during discovery.
struct Candidate {
    path: PathBuf,
    size: u64,
}

/// Streams [`ScanEvent`]s for every supported archive under `root`,
/// inserting records for files the catalog has not seen before.
///
/// The walk is depth-first in filesystem enumeration order. Between files
/// the scan yields to the executor, so it never monopolises a worker and
/// dropping the stream cancels it at per-file granularity. Per-file
/// metadata failures are skipped silently (debug log only); enumeration and
/// catalog failures terminate the stream with an error.
pub fn scan<'a>(
    repo: &'a Repository,
    root: &'a Path,
    options: ScanOptions,
) -> impl Stream<Item = ScannerResult<ScanEvent>> + 'a {
    // `rustfmt` does not format macro-specific syntax such as
    // `for await` even using the parentheses trick.
    stream! {
        for await event in scan_inner(repo, root, options) {
            yield event.or_raise(|| ScannerErrorKind::Scan);
        }
    }
}

fn scan_inner<'a>(
    repo: &'a Repository,
    root: &'a Path,
    options: ScanOptions,
) -> impl Stream<Item = ScanResult<ScanEvent>> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(ScanEvent::Started);

        if !matches!(fs::metadata(root).await, Ok(meta) if meta.is_dir()) {
            if options.missing_root_is_error {
                yield Err(exn::Exn::from(ErrorKind::MissingRoot(root.to_path_buf())));
                return;
            }
            // Historical behaviour: a nonexistent root is an empty scan.
            tracing::warn!(root = %root.display(), "scan root does not exist, returning empty scan");
            yield Ok(ScanEvent::DiscoveryComplete(0));
            yield Ok(ScanEvent::Complete);
            return;
        }

        let candidates = match discover(root).await {
            Ok(candidates) => candidates,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        let total = u64::try_from(candidates.len()).unwrap_or(0);
        yield Ok(ScanEvent::DiscoveryComplete(total));

        let mut processed = 0u64;
        for candidate in candidates {
            processed += 1;
            // Progress counts files considered, not files added, and is
            // emitted before the dedupe decision.
            yield Ok(ScanEvent::Progress { file: candidate.path.clone(), processed, total });
            match index_file(repo, candidate).await {
                Ok(Some(record)) => yield Ok(ScanEvent::Added(Box::new(record))),
                Ok(None) => {},
                Err(e) => {
                    yield Err(e);
                    return;
                },
            }
            // Cooperative checkpoint: keeps an interactive consumer
            // responsive and bounds how long cancellation takes.
            tokio::task::yield_now().await;
        }

        yield Ok(ScanEvent::Complete);
    })
}

/// Walk the tree under `root`, collecting files with a supported extension.
///
/// Enumeration failure is fatal. An entry whose metadata cannot be read is
/// dropped with a debug log, as is anything that is neither file nor
/// directory (most likely a broken symlink).
async fn discover(root: &Path) -> ScanResult<Vec<Candidate>> {
    let mut stack = vec![root.to_path_buf()];
    let mut found = Vec::new();
    while let Some(current) = stack.pop() {
        let mut entries = fs::read_dir(&current).await.or_raise(|| ErrorKind::Walk)?;
        while let Some(entry) = entries.next_entry().await.or_raise(|| ErrorKind::Walk)? {
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "skipping unreadable entry");
                    continue;
                },
            };
            if metadata.is_dir() {
                stack.push(path);
            } else if metadata.is_file() && is_supported(&path) {
                found.push(Candidate { path, size: metadata.len() });
            }
        }
    }
    Ok(found)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|supported| ext.eq_ignore_ascii_case(supported)))
}

/// Index a single candidate, returning the new record or `None` if the path
/// is already catalogued.
async fn index_file(repo: &Repository, candidate: Candidate) -> ScanResult<Option<Record>> {
    // Cheap short-circuit only. The UNIQUE constraint inside `add` is the
    // authoritative dedupe signal; this probe can race and that's fine.
    if repo.exists(&candidate.path).await.or_raise(|| ErrorKind::Catalog)? {
        return Ok(None);
    }
    let stem = candidate.path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default();
    let (title, author) = parse_title_author(stem);
    let mut record = NewRecord::new(&candidate.path, title, author);
    record.genre = UNKNOWN_GENRE.to_string();
    record.file_format =
        candidate.path.extension().and_then(|ext| ext.to_str()).unwrap_or_default().to_ascii_uppercase();
    record.file_size = candidate.size;
    match repo.add(&record).await {
        Ok(record) => {
            tracing::debug!(path = %record.path.display(), title = %record.title, "indexed new archive");
            Ok(Some(record))
        },
        // Lost the race against a concurrent insert of the same path.
        Err(err) if matches!(&*err, CatalogErrorKind::DuplicatePath(_)) => {
            tracing::debug!(path = %candidate.path.display(), "already indexed, skipping");
            Ok(None)
        },
        Err(err) => Err(err).or_raise(|| ErrorKind::Catalog),
    }
}
