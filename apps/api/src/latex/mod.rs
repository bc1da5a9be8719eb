// Document compilation: LaTeX markup → PDF through an external pdflatex toolchain.
// Toolchain processes are spawned with tokio::process and never block the runtime.

pub mod compiler;
pub mod diagnostics;
pub mod handlers;
pub mod validation;

pub use compiler::{CompilerError, LatexCompiler};
