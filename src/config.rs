use std::path::{Path, PathBuf};

use crate::{
    compile::timeline::CompileOptions,
    foundation::error::{ReelError, ReelResult},
    layout::chart::ChartBox,
    render::command::CommandRendererOpts,
    timing::resolver::TimingPolicy,
};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "reelgen.toml";

/// File-backed settings; every section and key is optional.
///
/// ```toml
/// [timing]
/// policy = "sequential"
///
/// [chart]
/// width = 900
/// height = 500
///
/// [render]
/// program = "node"
/// args = ["render-cli.js", "--input={manifest}", "--output={output}"]
/// overwrite = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    pub timing: TimingSection,
    pub chart: ChartSection,
    pub render: RenderSection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSection {
    pub policy: TimingPolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartSection {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartSection {
    fn default() -> Self {
        let b = ChartBox::default();
        Self {
            width: b.width,
            height: b.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSection {
    pub program: String,
    pub args: Vec<String>,
    pub overwrite: bool,
}

impl Default for RenderSection {
    fn default() -> Self {
        let d = CommandRendererOpts::default();
        Self {
            program: d.program,
            args: d.args,
            overwrite: d.overwrite,
        }
    }
}

impl ReelConfig {
    pub fn from_toml_str(s: &str) -> ReelResult<Self> {
        let cfg: Self =
            toml::from_str(s).map_err(|e| ReelError::config(format!("invalid TOML: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> ReelResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_toml_str(&text).map_err(|e| match e {
            ReelError::Config(msg) => ReelError::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Load `path` if given, else `./reelgen.toml` if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> ReelResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!(path = %default.display(), "loading default config file");
                    Self::from_path(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.chart_box()
            .validate()
            .map_err(|e| in_section("chart", e))?;
        self.renderer_opts()
            .validate()
            .map_err(|e| in_section("render", e))?;
        Ok(())
    }

    pub fn chart_box(&self) -> ChartBox {
        ChartBox {
            width: self.chart.width,
            height: self.chart.height,
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            timing: self.timing.policy,
            chart: self.chart_box(),
        }
    }

    pub fn renderer_opts(&self) -> CommandRendererOpts {
        CommandRendererOpts {
            program: self.render.program.clone(),
            args: self.render.args.clone(),
            overwrite: self.render.overwrite,
        }
    }
}

// Re-scope a section's validation error without nesting its category prefix.
fn in_section(section: &str, e: ReelError) -> ReelError {
    let msg = match e {
        ReelError::Layout(m) | ReelError::Config(m) | ReelError::Serde(m) => m,
        other => other.to_string(),
    };
    ReelError::config(format!("[{section}] {msg}"))
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
