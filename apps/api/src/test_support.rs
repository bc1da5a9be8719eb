//! Shared test fixtures: fake pdflatex executables, a scripted text generator,
//! and an `AppState` wired to both.

#[cfg(unix)]
pub use fake_toolchain::{test_state, test_state_with_timeout, FakeToolchain, ToolchainBehavior};

use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::Config;
use crate::llm_client::{GenerationParams, LlmError, TextGenerator};

/// Text generator that returns a fixed reply and records every prompt it was given.
#[derive(Default)]
pub struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<(String, GenerationParams)>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose every call fails with an API error.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<(String, GenerationParams)> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push((prompt.to_string(), params));
        self.reply.clone().ok_or(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        anthropic_api_key: "test-key".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        latex_bin: "pdflatex".to_string(),
        latex_timeout_secs: 10,
        allowed_origins: vec!["http://localhost:3000".to_string()],
        max_upload_bytes: 1024 * 1024,
    }
}

#[cfg(unix)]
mod fake_toolchain {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::{test_config, ScriptedGenerator};
    use crate::latex::LatexCompiler;
    use crate::state::AppState;

    /// How a fake toolchain responds to compile invocations. Every variant answers `--version`.
    #[derive(Debug, Clone, Copy)]
    pub enum ToolchainBehavior {
        /// Writes `<stem>.pdf` (a `%PDF-` header followed by the source). Sources
        /// containing `\undefinedcommand` still get a PDF but exit 1 with a
        /// pdflatex-style error, like real pdflatex in nonstopmode.
        Pdflatex,
        /// Exits 0 without writing anything.
        SilentNoOutput,
        /// Never finishes a compile pass.
        Hang,
        /// Fails even the version probe.
        BrokenInstall,
    }

    const PREAMBLE: &str = r#"#!/bin/sh
echo "$PWD|$*" >> "__LOG__"
if [ "$1" = "--version" ]; then
  __VERSION__
fi
src=""
for arg in "$@"; do src="$arg"; done
stem="${src%.tex}"
"#;

    const PDFLATEX_BODY: &str = r#"printf '%%PDF-1.5\n' > "$stem.pdf"
cat "$src" >> "$stem.pdf"
echo "This is pdfTeX, Version 3.141592653 (fake)" > "$stem.log"
if grep -q 'undefinedcommand' "$src"; then
  echo "! Undefined control sequence."
  printf '%s\n' 'l.3 \undefinedcommand'
  exit 1
fi
echo "Output written on $stem.pdf (1 page)."
exit 0
"#;

    pub struct FakeToolchain {
        dir: TempDir,
        program: PathBuf,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Invocation {
        pub cwd: String,
        pub args: String,
    }

    impl FakeToolchain {
        pub fn new(behavior: ToolchainBehavior) -> Self {
            let dir = TempDir::new().expect("temp dir");
            let program = dir.path().join("fake-pdflatex");
            let log = dir.path().join("invocations.log");

            let version = match behavior {
                ToolchainBehavior::BrokenInstall => {
                    "echo \"kpathsea: configuration file texmf.cnf not found\" >&2; exit 1"
                }
                _ => "echo \"pdfTeX 3.141592653-2.6-1.40.25 (fake)\"; exit 0",
            };
            let body = match behavior {
                ToolchainBehavior::Pdflatex | ToolchainBehavior::BrokenInstall => PDFLATEX_BODY,
                ToolchainBehavior::SilentNoOutput => "exit 0\n",
                ToolchainBehavior::Hang => "exec sleep 30\n",
            };

            let script = PREAMBLE
                .replace("__LOG__", &log.display().to_string())
                .replace("__VERSION__", version)
                + body;
            fs::write(&program, script).expect("write fake toolchain");
            make_executable(&program);

            Self { dir, program }
        }

        pub fn program(&self) -> PathBuf {
            self.program.clone()
        }

        /// All compile invocations so far, excluding version probes.
        pub fn compile_invocations(&self) -> Vec<Invocation> {
            let log = fs::read_to_string(self.dir.path().join("invocations.log")).unwrap_or_default();
            log.lines()
                .filter_map(|line| line.split_once('|'))
                .map(|(cwd, args)| Invocation {
                    cwd: cwd.to_string(),
                    args: args.to_string(),
                })
                .filter(|inv| inv.args != "--version")
                .collect()
        }
    }

    fn make_executable(path: &Path) {
        let mut perms = fs::metadata(path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).expect("set perms");
    }

    pub async fn test_state(llm: Arc<ScriptedGenerator>, toolchain: &FakeToolchain) -> AppState {
        test_state_with_timeout(llm, toolchain, Duration::from_secs(10)).await
    }

    pub async fn test_state_with_timeout(
        llm: Arc<ScriptedGenerator>,
        toolchain: &FakeToolchain,
        timeout: Duration,
    ) -> AppState {
        let compiler = LatexCompiler::new(toolchain.program(), timeout)
            .await
            .expect("fake toolchain available");
        AppState {
            llm,
            compiler,
            config: test_config(),
        }
    }
}
