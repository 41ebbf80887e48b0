use std::path::PathBuf;

use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{filter::Directive, EnvFilter, Layer, Registry};

use crate::formatter::LogFormat;

/// A worker guard returned by the file layer. Buffered log lines are flushed when it is dropped.
pub type FileWorkerGuard = tracing_appender::non_blocking::WorkerGuard;

/// A boxed tracing [`Layer`].
pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Directives applied to every layer, silencing noisy dependencies.
const DEFAULT_ENV_FILTER_DIRECTIVES: [&str; 1] = ["criterion=off"];

/// The layers that will make up the global subscriber.
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl Layers {
    pub(crate) fn new() -> Self {
        Self { inner: vec![] }
    }

    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<&str>,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        self.inner.push(format.apply::<Registry, NonBlocking>(filter, color, None));
        Ok(())
    }

    pub(crate) fn journald(&mut self, filters: &str) -> eyre::Result<()> {
        let layer = tracing_journald::layer()?.with_filter(build_env_filter(None, filters)?).boxed();
        self.inner.push(layer);
        Ok(())
    }

    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        file_info: &FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        let (writer, guard) = file_info.create_log_writer()?;
        let filter = build_env_filter(Some(default_directive), filters)?;
        self.inner.push(format.apply(filter, None, Some(writer)));
        Ok(guard)
    }
}

impl std::fmt::Debug for Layers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layers").field("layers", &self.inner.len()).finish()
    }
}

/// Where the file layer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
}

impl FileInfo {
    /// Creates a new [`FileInfo`] writing `file_name` inside `dir`.
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self { dir: dir.into(), file_name: file_name.into() }
    }

    fn create_log_writer(&self) -> eyre::Result<(NonBlocking, FileWorkerGuard)> {
        std::fs::create_dir_all(&self.dir)?;
        let appender = tracing_appender::rolling::never(&self.dir, &self.file_name);
        Ok(tracing_appender::non_blocking(appender))
    }
}

/// Builds an [`EnvFilter`] from `RUST_LOG`, the default directive, and comma separated
/// `directives`.
pub(crate) fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = match default_directive {
        Some(directive) => EnvFilter::builder().with_default_directive(directive).from_env_lossy(),
        None => EnvFilter::builder().from_env_lossy(),
    };

    DEFAULT_ENV_FILTER_DIRECTIVES
        .into_iter()
        .chain(directives.split(',').filter(|d| !d.is_empty()))
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_env_filter_accepts_directives() {
        let filter = build_env_filter(Some("warn".parse().expect("valid")), "warden_vm=trace,")
            .expect("valid filter");
        assert!(filter.to_string().contains("warden_vm=trace"));
    }

    #[test]
    fn test_build_env_filter_rejects_garbage() {
        assert!(build_env_filter(None, "warden_vm=loud").is_err());
    }

    #[test]
    fn test_create_log_writer_creates_directory() {
        let dir = std::env::temp_dir().join("warden-tracing-test");
        let _ = std::fs::remove_dir_all(&dir);

        let info = FileInfo::new(&dir, "warden.log");
        let (_writer, guard) = info.create_log_writer().expect("writer");
        drop(guard);
        assert!(dir.is_dir());
    }
}
