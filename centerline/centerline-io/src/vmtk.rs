//! Centerline extraction through the VMTK command line.
//!
//! Runs a single `vmtk` pipe: read the surface, compute centerlines between
//! open profiles with end points appended, split them into branches, merge
//! each branch into one line and write ASCII PolyData.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// Parameters for running the VMTK extraction pipe.
///
/// # Example
///
/// ```
/// use centerline_io::VmtkPipeline;
///
/// let pipeline = VmtkPipeline::default().with_seed_selector("pointlist");
/// assert_eq!(pipeline.executable.to_str(), Some("vmtk"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmtkPipeline {
    /// The `vmtk` launcher to run. Default: `vmtk` from `PATH`.
    pub executable: PathBuf,

    /// Seed selector passed to `vmtkcenterlines`. Default: `openprofiles`.
    pub seed_selector: String,

    /// Extend centerlines to the inlet and outlet profiles. Default: true.
    pub append_end_points: bool,
}

impl Default for VmtkPipeline {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("vmtk"),
            seed_selector: "openprofiles".to_string(),
            append_end_points: true,
        }
    }
}

impl VmtkPipeline {
    /// Create a pipeline that runs the given launcher.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    /// Set the seed selector.
    #[must_use]
    pub fn with_seed_selector(mut self, selector: impl Into<String>) -> Self {
        self.seed_selector = selector.into();
        self
    }

    /// Set whether end points are appended.
    #[must_use]
    pub const fn with_append_end_points(mut self, append: bool) -> Self {
        self.append_end_points = append;
        self
    }

    /// Arguments passed to the launcher for one extraction.
    #[must_use]
    pub fn arguments(&self, surface: &Path, output: &Path) -> Vec<OsString> {
        let endpoints = if self.append_end_points { "1" } else { "0" };

        let mut args: Vec<OsString> = vec!["vmtksurfacereader".into(), "-ifile".into()];
        args.push(surface.as_os_str().to_owned());
        args.extend(
            [
                "--pipe",
                "vmtkcenterlines",
                "-seedselector",
                self.seed_selector.as_str(),
                "-endpoints",
                endpoints,
                "--pipe",
                "vmtkbranchextractor",
                "--pipe",
                "vmtkcenterlinemerge",
                "--pipe",
                "vmtksurfacewriter",
                "-i",
                "@vmtkcenterlinemerge.o",
                "-mode",
                "ascii",
                "-ofile",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Extract centerlines from `surface` and write them to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The surface file does not exist
    /// - The launcher cannot be started
    /// - The pipe exits unsuccessfully or leaves no output file
    pub fn run(&self, surface: &Path, output: &Path) -> IoResult<()> {
        if !surface.exists() {
            return Err(IoError::FileNotFound {
                path: surface.to_path_buf(),
            });
        }

        let tool = self.executable.display().to_string();
        let args = self.arguments(surface, output);
        info!(
            tool = %tool,
            surface = %surface.display(),
            output = %output.display(),
            "Extracting centerlines"
        );

        let result = Command::new(&self.executable)
            .args(&args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    IoError::external_tool(&tool, "executable not found")
                } else {
                    IoError::Io(e)
                }
            })?;

        debug!(stdout = %String::from_utf8_lossy(&result.stdout), "vmtk output");

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(IoError::external_tool(
                tool,
                format!("{}: {}", result.status, stderr.trim()),
            ));
        }

        if !output.exists() {
            return Err(IoError::external_tool(
                tool,
                format!("no centerline written to {}", output.display()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_default_pipeline() {
        let pipeline = VmtkPipeline::default();
        assert_eq!(pipeline.executable, PathBuf::from("vmtk"));
        assert_eq!(pipeline.seed_selector, "openprofiles");
        assert!(pipeline.append_end_points);
    }

    #[test]
    fn test_arguments_order() {
        let pipeline = VmtkPipeline::default();
        let args = strings(&pipeline.arguments(Path::new("lung.stl"), Path::new("out/lung.vtp")));

        assert_eq!(args[0], "vmtksurfacereader");
        assert_eq!(args[2], "lung.stl");
        assert_eq!(args.last().map(String::as_str), Some("out/lung.vtp"));

        let stage = |name: &str| args.iter().position(|a| a == name).unwrap();
        assert!(stage("vmtkcenterlines") < stage("vmtkbranchextractor"));
        assert!(stage("vmtkbranchextractor") < stage("vmtkcenterlinemerge"));
        assert!(stage("vmtkcenterlinemerge") < stage("vmtksurfacewriter"));

        let endpoints = stage("-endpoints");
        assert_eq!(args[endpoints + 1], "1");
        let selector = stage("-seedselector");
        assert_eq!(args[selector + 1], "openprofiles");
        let mode = stage("-mode");
        assert_eq!(args[mode + 1], "ascii");
    }

    #[test]
    fn test_arguments_without_end_points() {
        let pipeline = VmtkPipeline::new("/opt/vmtk/bin/vmtk")
            .with_append_end_points(false)
            .with_seed_selector("carotidprofiles");
        let args = strings(&pipeline.arguments(Path::new("a.stl"), Path::new("a.vtp")));
        let endpoints = args.iter().position(|a| a == "-endpoints").unwrap();
        assert_eq!(args[endpoints + 1], "0");
        assert!(args.iter().any(|a| a == "carotidprofiles"));
    }

    #[test]
    fn test_run_missing_surface() {
        let err = VmtkPipeline::default()
            .run(Path::new("/nonexistent/lung.stl"), Path::new("/tmp/out.vtp"))
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn test_run_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let surface = dir.path().join("lung.stl");
        std::fs::write(&surface, "solid empty\nendsolid empty\n").unwrap();

        let pipeline = VmtkPipeline::new(dir.path().join("no-such-vmtk"));
        let err = pipeline.run(&surface, &dir.path().join("lung.vtp")).unwrap_err();
        assert!(matches!(err, IoError::ExternalTool { .. }));
    }
}
