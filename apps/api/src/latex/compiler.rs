//! LaTeX → PDF compilation through an external pdflatex-compatible toolchain.
//!
//! # Lifecycle of one `compile` call
//! 1. The markup is validated; invalid markup never reaches the toolchain.
//! 2. A fresh `Workspace` (unique temp directory) is created and the markup is
//!    written to it as `resume.tex`.
//! 3. The toolchain runs twice from inside the workspace so forward references
//!    (numbering, cross references) resolve on the second pass.
//! 4. The source is read back, the PDF is looked up, and both are base64-encoded.
//!
//! The workspace is owned by the call. It is removed on a blocking thread once
//! the call finishes, and by its drop if the call is cancelled part way. Nothing about a compilation is stored on `LatexCompiler`, so a single
//! instance is shared freely between concurrent requests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::latex::validation::{validate_markup, MarkupError};

/// Fixed base name so the toolchain's output file names are predictable.
pub const SOURCE_FILE_NAME: &str = "resume.tex";
pub const ARTIFACT_FILE_NAME: &str = "resume.pdf";
pub const LOG_FILE_NAME: &str = "resume.log";

/// Number of toolchain passes per compile. Fixed; no detection of a needed third pass.
pub const PASSES: u32 = 2;

pub const ARTIFACT_NOT_PRODUCED: &str = "artifact not produced";

const WORKSPACE_PREFIX: &str = "tailor-latex-";

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error(transparent)]
    Validation(#[from] MarkupError),

    #[error("typesetting toolchain '{program}' unavailable: {reason}")]
    ToolchainUnavailable { program: String, reason: String },

    #[error("workspace I/O failed while {stage}: {source}")]
    Workspace {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run toolchain on pass {pass}: {source}")]
    Spawn {
        pass: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("toolchain pass {pass} timed out after {timeout_secs}s")]
    Timeout { pass: u32, timeout_secs: u64 },
}

/// Outcome of one attempted compilation. `succeeded == false` is a recovered
/// failure: the source is still returned so the user can fix it and retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationResult {
    pub source_encoded: String,
    pub artifact_encoded: Option<String>,
    pub succeeded: bool,
    pub diagnostic: Option<String>,
}

#[derive(Debug)]
struct PassOutcome {
    pass: u32,
    exit_code: Option<i32>,
    success: bool,
    output: String,
}

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    program: PathBuf,
    timeout: Duration,
}

impl LatexCompiler {
    /// Builds a compiler after confirming the toolchain answers a version probe.
    /// A missing toolchain is fatal: the service cannot render anything without it.
    pub async fn new(program: impl Into<PathBuf>, timeout: Duration) -> Result<Self, CompilerError> {
        let compiler = Self {
            program: program.into(),
            timeout,
        };
        compiler.ensure_toolchain_available().await?;
        Ok(compiler)
    }

    pub async fn ensure_toolchain_available(&self) -> Result<(), CompilerError> {
        let mut probe = Command::new(&self.program);
        probe
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, probe.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(self.unavailable(err.to_string())),
            Err(_) => {
                return Err(self.unavailable(format!(
                    "version probe timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        if !output.status.success() {
            return Err(self.unavailable(format!("version probe exited with {}", output.status)));
        }

        let banner = String::from_utf8_lossy(&output.stdout);
        info!(
            program = %self.program.display(),
            version = banner.lines().next().unwrap_or_default().trim(),
            "Typesetting toolchain available"
        );
        Ok(())
    }

    /// Compiles `markup` into a PDF.
    ///
    /// Returns `Ok` with `succeeded == false` when the toolchain ran but rejected
    /// the document. Returns `Err` for invalid markup and for faults outside the
    /// document's control (I/O, spawn failure, timeout).
    pub async fn compile(&self, markup: &str) -> Result<CompilationResult, CompilerError> {
        validate_markup(markup)?;

        let compile_id = Uuid::new_v4();
        self.compile_in_workspace(markup)
            .instrument(info_span!("latex_compile", %compile_id))
            .await
    }

    async fn compile_in_workspace(&self, markup: &str) -> Result<CompilationResult, CompilerError> {
        let workspace = Workspace::create()?;
        let result = self.compile_in(&workspace, markup).await;
        // A cancelled compile never gets here; the drop of `workspace` removes it instead.
        workspace.close().await;
        result
    }

    async fn compile_in(
        &self,
        workspace: &Workspace,
        markup: &str,
    ) -> Result<CompilationResult, CompilerError> {
        let started_at = Instant::now();
        workspace.write(SOURCE_FILE_NAME, markup.as_bytes()).await?;
        debug!(workspace = %workspace.path().display(), "Workspace ready");

        let mut failed_pass = None;
        for pass in 1..=PASSES {
            let outcome = self.run_pass(workspace.path(), pass).await?;
            if !outcome.success {
                failed_pass = Some(outcome);
                break;
            }
        }

        workspace.log_toolchain_log().await;

        // Read back rather than re-encoding `markup`: the caller gets exactly what the toolchain consumed.
        let source = workspace.read(SOURCE_FILE_NAME).await?;
        let source_encoded = STANDARD.encode(&source);
        let artifact = workspace.read_optional(ARTIFACT_FILE_NAME).await?;
        let elapsed_ms = started_at.elapsed().as_millis() as u64;

        let result = match (failed_pass, artifact) {
            (None, Some(pdf)) => {
                info!(elapsed_ms, pdf_bytes = pdf.len(), "LaTeX compiled");
                CompilationResult {
                    source_encoded,
                    artifact_encoded: Some(STANDARD.encode(&pdf)),
                    succeeded: true,
                    diagnostic: None,
                }
            }
            (Some(outcome), _) => {
                warn!(
                    elapsed_ms,
                    pass = outcome.pass,
                    exit_code = outcome.exit_code.unwrap_or(-1),
                    "LaTeX compilation failed"
                );
                let diagnostic = if outcome.output.trim().is_empty() {
                    ARTIFACT_NOT_PRODUCED.to_string()
                } else {
                    outcome.output
                };
                partial_failure(source_encoded, diagnostic)
            }
            (None, None) => {
                warn!(elapsed_ms, "Toolchain reported success but wrote no PDF");
                partial_failure(source_encoded, ARTIFACT_NOT_PRODUCED.to_string())
            }
        };

        Ok(result)
    }

    async fn run_pass(&self, dir: &Path, pass: u32) -> Result<PassOutcome, CompilerError> {
        let started_at = Instant::now();
        let mut command = Command::new(&self.program);
        command
            .arg("-interaction=nonstopmode")
            .arg(SOURCE_FILE_NAME)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                warn!(pass, timeout_secs = self.timeout.as_secs(), "Toolchain pass timed out; killed");
                CompilerError::Timeout {
                    pass,
                    timeout_secs: self.timeout.as_secs(),
                }
            })?
            .map_err(|source| CompilerError::Spawn { pass, source })?;

        let exit_code = output.status.code();
        let success = output.status.success();
        let output_text = combine_output(&output.stdout, &output.stderr);

        debug!(
            pass,
            exit_code = exit_code.unwrap_or(-1),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Toolchain pass finished"
        );

        Ok(PassOutcome {
            pass,
            exit_code,
            success,
            output: output_text,
        })
    }

    fn unavailable(&self, reason: String) -> CompilerError {
        CompilerError::ToolchainUnavailable {
            program: self.program.display().to_string(),
            reason,
        }
    }
}

fn partial_failure(source_encoded: String, diagnostic: String) -> CompilationResult {
    CompilationResult {
        source_encoded,
        artifact_encoded: None,
        succeeded: false,
        diagnostic: Some(diagnostic),
    }
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (_, true) => stdout.into_owned(),
        (true, false) => stderr.into_owned(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Workspace
// ────────────────────────────────────────────────────────────────────────────

/// A per-call scratch directory. `close` (or a drop) deletes the directory and
/// everything the toolchain wrote.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn create() -> Result<Self, CompilerError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(|source| CompilerError::Workspace {
                stage: "creating workspace",
                source,
            })?;
        Ok(Self { dir })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory tree off the async worker threads.
    async fn close(self) {
        let path = self.dir.path().to_path_buf();
        let dir = self.dir;
        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => debug!(workspace = %path.display(), "Workspace removed"),
            Ok(Err(err)) => {
                warn!(workspace = %path.display(), error = %err, "Failed to remove workspace")
            }
            Err(err) => warn!(error = %err, "Workspace cleanup task failed"),
        }
    }

    async fn write(&self, name: &str, contents: &[u8]) -> Result<(), CompilerError> {
        tokio::fs::write(self.path().join(name), contents)
            .await
            .map_err(|source| CompilerError::Workspace {
                stage: "writing source",
                source,
            })
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, CompilerError> {
        tokio::fs::read(self.path().join(name))
            .await
            .map_err(|source| CompilerError::Workspace {
                stage: "reading source back",
                source,
            })
    }

    async fn read_optional(&self, name: &str) -> Result<Option<Vec<u8>>, CompilerError> {
        match tokio::fs::read(self.path().join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CompilerError::Workspace {
                stage: "reading artifact",
                source,
            }),
        }
    }

    async fn log_toolchain_log(&self) {
        match tokio::fs::read(self.path().join(LOG_FILE_NAME)).await {
            Ok(log) => debug!(log = %String::from_utf8_lossy(&log), "Toolchain log"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => debug!(error = %err, "Toolchain log unreadable"),
        }
    }
}
