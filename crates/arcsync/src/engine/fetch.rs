use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use arcsync_archive::Materializer;
use arcsync_fetch::{CountingReader, ResourceDescriptor, Transport};
use arcsync_fs::{Marker, clear_contents, ensure_dir};

use super::log_proxy;
use crate::error::FetchError;
use crate::ledger::ChangeLedger;

/// Outcome of a successful fetch.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Indicators observed for every resource, changed or not.
    pub ledger: ChangeLedger,
    /// URLs that were downloaded and materialized.
    pub downloaded: Vec<String>,
    /// URLs skipped because their marker matched.
    pub up_to_date: Vec<String>,
    /// Bytes transferred.
    pub bytes: u64,
    pub elapsed: Duration,
}

/// Downloads changed resources and materializes them into a destination.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use arcsync::FetchEngine;
/// use arcsync_fetch::{ResourceDescriptor, TransportOptions, UrlTransport};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = UrlTransport::from_options(TransportOptions::default())?;
/// let engine = FetchEngine::new(transport).clear_workspace(false);
/// let resources = [ResourceDescriptor::anonymous("https://example.com/app.tar.gz")];
/// let report = engine.run(&resources, Path::new("work")).await?;
/// println!("{} downloaded", report.downloaded.len());
/// # Ok(())
/// # }
/// ```
pub struct FetchEngine<T> {
    transport: T,
    clear_workspace: bool,
}

impl<T: Transport> FetchEngine<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            clear_workspace: false,
        }
    }

    /// Delete the destination's contents once before fetching.
    pub fn clear_workspace(mut self, clear: bool) -> Self {
        self.clear_workspace = clear;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `resources` into `destination`, aborting on the first failure.
    pub async fn run(
        &self,
        resources: &[ResourceDescriptor],
        destination: &Path,
    ) -> Result<FetchReport, FetchError> {
        let started = Instant::now();

        if self.clear_workspace {
            let removed = clear_contents(destination).map_err(workspace(destination))?;
            tracing::info!(dest = %destination.display(), removed, "cleared workspace");
        }
        log_proxy(self.transport.proxy());

        let mut report = FetchReport::default();
        for resource in resources {
            self.fetch_one(resource, destination, &mut report).await?;
        }

        report.elapsed = started.elapsed();
        tracing::info!(
            downloaded = report.downloaded.len(),
            up_to_date = report.up_to_date.len(),
            bytes = report.bytes,
            elapsed = ?report.elapsed,
            "fetch complete"
        );
        Ok(report)
    }

    async fn fetch_one(
        &self,
        resource: &ResourceDescriptor,
        destination: &Path,
        report: &mut FetchReport,
    ) -> Result<(), FetchError> {
        let indicator = self
            .transport
            .check_changed(resource)
            .await
            .map_err(|e| FetchError::transport(resource, e))?;
        report.ledger.record(resource.url(), indicator);

        let file_name = resource
            .file_name()
            .map_err(|e| FetchError::transport(resource, e))?;
        ensure_dir(destination).map_err(workspace(destination))?;

        let marker = Marker::for_resource(destination, &file_name);
        if marker
            .matches(indicator.millis())
            .map_err(workspace(destination))?
        {
            tracing::info!(url = %resource, "up to date");
            report.up_to_date.push(resource.url().to_string());
            return Ok(());
        }

        tracing::info!(url = %resource, modified = %indicator, "downloading");
        let download = self
            .transport
            .download(resource)
            .await
            .map_err(|e| FetchError::transport(resource, e))?;
        tracing::debug!(url = %resource, bytes = download.bytes, "downloaded");

        let materializer = Materializer::for_file_name(&file_name);
        if materializer.is_archive() {
            tracing::info!(url = %resource, compression = %materializer, "extracting");
        } else {
            tracing::info!(url = %resource, "copying");
        }

        let target = destination.to_path_buf();
        let name = file_name.clone();
        let file = download.file;
        let (materialized, consumed) = tokio::task::spawn_blocking(move || {
            let mut reader = CountingReader::new(file);
            materializer
                .materialize(&mut reader, &target, &name)
                .map(|materialized| (materialized, reader.count()))
        })
        .await
        .map_err(|e| arcsync_archive::Error::Io(io::Error::other(e)))
        .and_then(|result| result)
        .map_err(|source| FetchError::Extraction {
            url: resource.url().to_string(),
            source,
        })?;
        tracing::debug!(
            url = %resource,
            entries = materialized.entries,
            written = materialized.bytes,
            consumed,
            "materialized"
        );

        marker
            .touch(indicator.millis())
            .map_err(workspace(destination))?;

        report.bytes += download.bytes;
        report.downloaded.push(resource.url().to_string());
        Ok(())
    }
}

fn workspace(path: &Path) -> impl FnOnce(arcsync_fs::Error) -> FetchError + '_ {
    move |source| FetchError::Workspace {
        path: path.to_path_buf(),
        source,
    }
}
