use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    compile::timeline::Timeline,
    foundation::error::{ReelError, ReelResult},
    render::backend::{RenderReport, TimelineRenderer},
};

pub const MANIFEST_PLACEHOLDER: &str = "{manifest}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

const STDERR_TAIL_LINES: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommandRendererOpts {
    /// Executable to run, looked up on PATH.
    pub program: String,
    /// Arguments; `{manifest}` and `{output}` are replaced per render.
    pub args: Vec<String>,
    /// Replace an existing output file instead of failing.
    pub overwrite: bool,
}

impl Default for CommandRendererOpts {
    fn default() -> Self {
        Self {
            program: "node".to_owned(),
            args: vec![
                "render-cli.js".to_owned(),
                format!("--input={MANIFEST_PLACEHOLDER}"),
                format!("--output={OUTPUT_PLACEHOLDER}"),
            ],
            overwrite: true,
        }
    }
}

impl CommandRendererOpts {
    pub fn validate(&self) -> ReelResult<()> {
        if self.program.trim().is_empty() {
            return Err(ReelError::config("render program must be non-empty"));
        }
        Ok(())
    }
}

/// Writes the timeline manifest next to the output and runs an external render command on it.
#[derive(Clone, Debug, Default)]
pub struct CommandRenderer {
    opts: CommandRendererOpts,
}

impl CommandRenderer {
    pub fn new(opts: CommandRendererOpts) -> ReelResult<Self> {
        opts.validate()?;
        Ok(Self { opts })
    }

    pub fn opts(&self) -> &CommandRendererOpts {
        &self.opts
    }
}

/// `<out>.timeline.json`, placed beside the output file.
pub fn manifest_path(out: &Path) -> PathBuf {
    let mut name = out
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("render"));
    name.push(".timeline.json");
    out.with_file_name(name)
}

pub fn expand_args(args: &[String], manifest: &Path, output: &Path) -> Vec<String> {
    let manifest = manifest.display().to_string();
    let output = output.display().to_string();
    args.iter()
        .map(|a| {
            a.replace(MANIFEST_PLACEHOLDER, &manifest)
                .replace(OUTPUT_PLACEHOLDER, &output)
        })
        .collect()
}

pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

impl TimelineRenderer for CommandRenderer {
    #[tracing::instrument(skip(self, timeline), fields(video = %timeline.id, program = %self.opts.program))]
    fn render(&mut self, timeline: &Timeline, out: &Path) -> ReelResult<RenderReport> {
        ensure_parent_dir(out)?;
        if !self.opts.overwrite && out.exists() {
            return Err(ReelError::render(
                format!("output file '{}' already exists", out.display()),
                "remove it or enable overwrite",
            ));
        }

        let manifest = manifest_path(out);
        let json = timeline.to_json_pretty()?;
        {
            use anyhow::Context as _;
            std::fs::write(&manifest, json)
                .with_context(|| format!("write timeline manifest '{}'", manifest.display()))?;
        }

        let args = expand_args(&self.opts.args, &manifest, out);
        tracing::debug!(?args, "spawning renderer");

        let output = Command::new(&self.opts.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ReelError::render(
                        format!("render program '{}' was not found", self.opts.program),
                        "install it or set [render] program in reelgen.toml",
                    )
                } else {
                    ReelError::render(
                        format!("failed to spawn '{}': {e}", self.opts.program),
                        "check the render program and its permissions",
                    )
                }
            })?;

        if !output.status.success() {
            let tail = stderr_tail(&output.stderr);
            return Err(ReelError::render(
                format!("'{}' exited with {}", self.opts.program, output.status),
                if tail.is_empty() {
                    "the renderer printed nothing on stderr".to_owned()
                } else {
                    tail
                },
            ));
        }

        tracing::info!(output = %out.display(), frames = timeline.duration_in_frames, "render finished");
        Ok(RenderReport {
            output: out.to_path_buf(),
            manifest: Some(manifest),
            frames: timeline.duration_in_frames,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/command.rs"]
mod tests;
