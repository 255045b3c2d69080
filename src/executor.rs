use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use uuid::Uuid;

use crate::error::ExecutorError;
use crate::generator::Deck;

/// Solver command: `CALCULIX_PATH` if set, else a repo-local `./bin/ccx`,
/// else `ccx` from `PATH`.
pub fn resolve_ccx_path() -> String {
    let ccx_path = std::env::var("CALCULIX_PATH").unwrap_or_else(|_| {
        if Path::new("./bin/ccx").exists() {
            "./bin/ccx".to_string()
        } else {
            "ccx".to_string()
        }
    });

    // ccx runs inside the scratch directory, so relative paths would break
    if ccx_path.contains(std::path::MAIN_SEPARATOR) {
        std::fs::canonicalize(&ccx_path)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or(ccx_path)
    } else {
        ccx_path
    }
}

/// Runs one deck through CalculiX inside a private scratch directory.
///
/// The directory is removed when `run` returns, whatever the outcome.
#[derive(Debug, Clone)]
pub struct CalculiXExecutor {
    ccx_path: String,
    job_name: String,
    scratch_root: Option<PathBuf>,
    debug_export: Option<PathBuf>,
}

impl Default for CalculiXExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculiXExecutor {
    pub fn new() -> Self {
        Self {
            ccx_path: resolve_ccx_path(),
            job_name: "analysis".to_string(),
            scratch_root: None,
            debug_export: std::env::var("CALCULIX_DEBUG_EXPORT").ok().map(PathBuf::from),
        }
    }

    pub fn with_ccx_path(mut self, ccx_path: impl Into<String>) -> Self {
        self.ccx_path = ccx_path.into();
        self
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Copy every `.inp` and `.dat` into `dir` for inspection.
    pub fn with_debug_export(mut self, dir: Option<PathBuf>) -> Self {
        self.debug_export = dir;
        self
    }

    pub fn ccx_path(&self) -> &str {
        &self.ccx_path
    }

    /// Write the deck, run the solver and return the report text.
    pub fn run(&self, deck: &Deck) -> Result<String, ExecutorError> {
        let analysis_id = Uuid::new_v4();
        let temp_dir = match &self.scratch_root {
            Some(root) => TempDir::new_in(root),
            None => TempDir::new(),
        }
        .map_err(|e| ExecutorError::IoError(format!("Failed to create scratch directory: {}", e)))?;
        let work_path = temp_dir.path();

        tracing::info!("Starting analysis {} in {:?}", analysis_id, work_path);

        // ccx expects the job name without extension
        let base = work_path.join(&self.job_name);
        let inp_path = base.with_extension("inp");
        fs::write(&inp_path, deck.as_str())
            .map_err(|e| ExecutorError::IoError(format!("Failed to write .inp file: {}", e)))?;
        self.maybe_export_debug_file(&inp_path, &analysis_id, "inp");

        tracing::info!("Running command: {} {}", self.ccx_path, base.display());
        let output = Command::new(&self.ccx_path)
            .arg(&base)
            .current_dir(work_path)
            .output()
            .map_err(|e| ExecutorError::ExecutionError(format!("Failed to execute ccx: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            tracing::error!("CalculiX failed. Stderr: {}\nStdout: {}", stderr, stdout);
            return Err(ExecutorError::AnalysisFailed(format!(
                "CalculiX exited with status {}. Check logs.",
                output.status
            )));
        }

        let dat_path = base.with_extension("dat");
        if !dat_path.exists() {
            return Err(ExecutorError::AnalysisFailed("No .dat file generated".to_string()));
        }
        self.maybe_export_debug_file(&dat_path, &analysis_id, "dat");

        let content = fs::read_to_string(&dat_path)
            .map_err(|e| ExecutorError::IoError(format!("Failed to read .dat file: {}", e)))?;
        tracing::debug!("Read {} lines of solver report", content.lines().count());

        Ok(content)
    }

    fn maybe_export_debug_file(&self, path: &Path, analysis_id: &Uuid, extension: &str) {
        let Some(dest_path) = &self.debug_export else {
            return;
        };
        if let Err(err) = fs::create_dir_all(dest_path) {
            tracing::warn!("Failed to create debug export directory {:?}: {}", dest_path, err);
            return;
        }

        let file_name = format!("analysis_{}.{}", analysis_id, extension);
        let dest_file = dest_path.join(file_name);
        if let Err(err) = fs::copy(path, &dest_file) {
            tracing::warn!("Failed to export debug file {:?}: {}", dest_file, err);
        } else {
            tracing::info!("Exported debug file to {:?}", dest_file);
        }
    }
}
