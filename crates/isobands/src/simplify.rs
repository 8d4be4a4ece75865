//! The external isoband simplification step.
//!
//! Dense isogons are handed to a collaborator that simplifies them with a
//! tolerance and returns isobands in the same schema. The default
//! collaborator is an external program exchanging GeoJSON files through a
//! work directory:
//!
//! ```text
//! <program> <args...> <work_dir>/<job>-dense.geojson <work_dir>/<job>-simple.geojson <tolerance>
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use isoband_common::FeatureCollection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SimplifierConfig;
use crate::error::SimplifyError;

/// How often a running collaborator is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Turns dense isogons into simplified isobands.
pub trait IsobandSimplifier: Send + Sync {
    /// Simplify `isogons`. Features with null or empty geometry in the
    /// result are dropped.
    fn simplify(
        &self,
        isogons: FeatureCollection,
        tolerance: f64,
        work_dir: &Path,
    ) -> Result<FeatureCollection, SimplifyError>;
}

/// Returns the isogons as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSimplifier;

impl IsobandSimplifier for PassthroughSimplifier {
    fn simplify(
        &self,
        mut isogons: FeatureCollection,
        _tolerance: f64,
        _work_dir: &Path,
    ) -> Result<FeatureCollection, SimplifyError> {
        isogons.retain_non_empty();
        Ok(isogons)
    }
}

/// Runs an external program over GeoJSON files.
#[derive(Debug, Clone)]
pub struct CommandSimplifier {
    config: SimplifierConfig,
}

impl CommandSimplifier {
    pub fn new(config: SimplifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Wait for `child`, killing it once the timeout elapses.
    fn wait(&self, child: &mut Child) -> Result<std::process::ExitStatus, SimplifyError> {
        let program = &self.config.program;
        let deadline = self
            .config
            .timeout_secs
            .map(|secs| Instant::now() + Duration::from_secs(secs));

        loop {
            let status = child.try_wait().map_err(|source| SimplifyError::Spawn {
                program: program.clone(),
                source,
            })?;
            if let Some(status) = status {
                return Ok(status);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(
                    program = %program,
                    pid = child.id(),
                    "Killing isoband collaborator after timeout"
                );
                kill_process_group(child);
                let _ = child.kill();
                let _ = child.wait();
                return Err(SimplifyError::Timeout {
                    program: program.clone(),
                    secs: self.config.timeout_secs.unwrap_or_default(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl IsobandSimplifier for CommandSimplifier {
    fn simplify(
        &self,
        isogons: FeatureCollection,
        tolerance: f64,
        work_dir: &Path,
    ) -> Result<FeatureCollection, SimplifyError> {
        let start = Instant::now();
        fs::create_dir_all(work_dir).map_err(|source| SimplifyError::WorkDir {
            path: work_dir.to_path_buf(),
            source,
        })?;
        let work_dir = work_dir
            .canonicalize()
            .map_err(|source| SimplifyError::WorkDir {
                path: work_dir.to_path_buf(),
                source,
            })?;

        let job_id = Uuid::new_v4();
        let dense = work_dir.join(format!("{job_id}-dense.geojson"));
        let simple = work_dir.join(format!("{job_id}-simple.geojson"));
        let _scratch = ScratchFiles {
            paths: vec![dense.clone(), simple.clone()],
            keep: self.config.keep_files,
        };

        let encoded = serde_json::to_vec(&isogons)?;
        fs::write(&dense, encoded).map_err(|source| SimplifyError::WriteInput {
            path: dense.clone(),
            source,
        })?;

        let program = &self.config.program;
        debug!(
            job_id = %job_id,
            program = %program,
            features = isogons.len(),
            tolerance,
            "Running isoband collaborator"
        );

        let mut command = Command::new(program);
        command
            .args(&self.config.args)
            .arg(&dense)
            .arg(&simple)
            .arg(tolerance.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group, so a timeout reaches helpers it forks.
            command.process_group(0);
        }
        let mut child = command.spawn().map_err(|source| SimplifyError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);
        // After a timeout a surviving descendant may still hold the pipes,
        // so the drain threads are left detached instead of joined.
        let status = self.wait(&mut child)?;
        let stdout = stdout.and_then(|h| h.join().ok()).unwrap_or_default();
        let stderr = stderr.and_then(|h| h.join().ok()).unwrap_or_default();

        if !stdout.trim().is_empty() {
            debug!(job_id = %job_id, output = %stdout.trim(), "Collaborator output");
        }
        if !status.success() {
            return Err(SimplifyError::Failed {
                program: program.clone(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let raw = fs::read(&simple).map_err(|source| SimplifyError::ReadOutput {
            path: simple.clone(),
            source,
        })?;
        let mut isobands: FeatureCollection = serde_json::from_slice(&raw)?;

        let dropped = isobands.retain_non_empty();
        if dropped > 0 {
            warn!(job_id = %job_id, dropped, "Dropped isobands with empty geometry");
        }

        info!(
            job_id = %job_id,
            isogons = isogons.len(),
            isobands = isobands.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Isoband simplification complete"
        );

        Ok(isobands)
    }
}

/// Send SIGKILL to the child's whole process group.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let group = format!("-{}", child.id());
    let result = Command::new("kill")
        .args(["-s", "KILL", "--", &group])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = result {
        warn!(error = %e, "Failed to signal collaborator process group");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

/// Read a child pipe to completion on its own thread.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Removes exchange files when the run ends, however it ends.
struct ScratchFiles {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for path in &self.paths {
            let _ = fs::remove_file(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoband_common::{Feature, FeatureProperties, Point, Polygon, Ring};

    fn sample() -> FeatureCollection {
        let ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ]);
        let mut fc = FeatureCollection::new();
        fc.push(Feature::polygon(
            &Polygon::new(ring, vec![]),
            FeatureProperties::new(0, 5.0, 7.5),
        ));
        fc.push(Feature {
            type_: "Feature".to_string(),
            geometry: None,
            properties: FeatureProperties::new(1, 7.5, 10.0),
        });
        fc
    }

    #[test]
    fn test_passthrough_drops_empty() {
        let out = PassthroughSimplifier
            .simplify(sample(), 1000.0, Path::new("unused"))
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.features[0].properties.level_index, 0);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let simplifier = CommandSimplifier::new(SimplifierConfig {
            program: "definitely-not-an-installed-program".to_string(),
            args: vec![],
            timeout_secs: Some(5),
            keep_files: false,
        });
        let err = simplifier
            .simplify(sample(), 1000.0, dir.path())
            .unwrap_err();
        assert!(matches!(err, SimplifyError::Spawn { .. }));
        // Scratch files are removed on failure too.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
