use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Frame-rate caps below this value mean "no cap".
pub const MIN_FRAME_RATE_CAP: f32 = 19.0;
pub const MIN_UPSCALE_FACTOR: f32 = 1.0;
pub const MAX_UPSCALE_FACTOR: f32 = 2.0;

/// Graphics translation layer selected in the bottle.
#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsBackend {
    #[default]
    #[display("d3dmetal")]
    D3DMetal,
    #[display("dxmt")]
    Dxmt,
    #[display("dxvk")]
    Dxvk,
    #[display("wined3d")]
    Wined3d,
}

impl std::str::FromStr for GraphicsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d3dmetal" | "default" => Ok(GraphicsBackend::D3DMetal),
            "dxmt" => Ok(GraphicsBackend::Dxmt),
            "dxvk" => Ok(GraphicsBackend::Dxvk),
            "wined3d" => Ok(GraphicsBackend::Wined3d),
            other => Err(format!("unknown graphics backend: {other}")),
        }
    }
}

/// Per-title launch settings. Values are only changed through
/// [`LaunchOptionsBuilder`], which keeps them normalized.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LaunchOptions {
    backend: GraphicsBackend,
    sync_mode: bool,
    hud_enabled: bool,
    frame_rate_cap: f32,
    upscale_enabled: bool,
    upscale_factor: f32,
    advertise_extended_cpu: bool,
    extra_arguments: String,
    extra_env: String,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            backend: GraphicsBackend::default(),
            sync_mode: true,
            hud_enabled: false,
            frame_rate_cap: 0.0,
            upscale_enabled: false,
            upscale_factor: MIN_UPSCALE_FACTOR,
            advertise_extended_cpu: false,
            extra_arguments: String::new(),
            extra_env: String::new(),
        }
    }
}

impl LaunchOptions {
    pub fn builder() -> LaunchOptionsBuilder {
        LaunchOptionsBuilder::from(Self::default())
    }

    /// Starts a mutation step from the current values.
    pub fn to_builder(&self) -> LaunchOptionsBuilder {
        LaunchOptionsBuilder::from(self.clone())
    }

    pub fn backend(&self) -> GraphicsBackend {
        self.backend
    }

    pub fn sync_mode(&self) -> bool {
        self.sync_mode
    }

    pub fn hud_enabled(&self) -> bool {
        self.hud_enabled
    }

    pub fn frame_rate_cap(&self) -> f32 {
        self.frame_rate_cap
    }

    /// The cap, if it is high enough to be applied.
    pub fn effective_frame_rate_cap(&self) -> Option<f32> {
        (self.frame_rate_cap >= MIN_FRAME_RATE_CAP).then_some(self.frame_rate_cap)
    }

    pub fn upscale_enabled(&self) -> bool {
        self.upscale_enabled
    }

    pub fn upscale_factor(&self) -> f32 {
        self.upscale_factor
    }

    pub fn advertise_extended_cpu(&self) -> bool {
        self.advertise_extended_cpu
    }

    pub fn extra_arguments(&self) -> &str {
        &self.extra_arguments
    }

    pub fn extra_env(&self) -> &str {
        &self.extra_env
    }
}

#[derive(Clone, Debug)]
pub struct LaunchOptionsBuilder {
    inner: LaunchOptions,
}

impl From<LaunchOptions> for LaunchOptionsBuilder {
    fn from(inner: LaunchOptions) -> Self {
        Self { inner }
    }
}

impl LaunchOptionsBuilder {
    pub fn backend(mut self, backend: GraphicsBackend) -> Self {
        self.inner.backend = backend;
        self
    }

    pub fn sync_mode(mut self, enabled: bool) -> Self {
        self.inner.sync_mode = enabled;
        self
    }

    pub fn hud_enabled(mut self, enabled: bool) -> Self {
        self.inner.hud_enabled = enabled;
        self
    }

    pub fn frame_rate_cap(mut self, cap: f32) -> Self {
        self.inner.frame_rate_cap = cap;
        self
    }

    pub fn upscale_enabled(mut self, enabled: bool) -> Self {
        self.inner.upscale_enabled = enabled;
        self
    }

    pub fn upscale_factor(mut self, factor: f32) -> Self {
        self.inner.upscale_factor = factor;
        self
    }

    pub fn advertise_extended_cpu(mut self, enabled: bool) -> Self {
        self.inner.advertise_extended_cpu = enabled;
        self
    }

    pub fn extra_arguments(mut self, args: impl Into<String>) -> Self {
        self.inner.extra_arguments = args.into();
        self
    }

    pub fn extra_env(mut self, env: impl Into<String>) -> Self {
        self.inner.extra_env = env.into();
        self
    }

    /// Clamps the upscale factor into range and resets it when upscaling is off.
    pub fn build(self) -> LaunchOptions {
        let mut opts = self.inner;
        opts.upscale_factor = if opts.upscale_enabled && opts.upscale_factor.is_finite() {
            opts.upscale_factor
                .clamp(MIN_UPSCALE_FACTOR, MAX_UPSCALE_FACTOR)
        } else {
            MIN_UPSCALE_FACTOR
        };
        if !opts.frame_rate_cap.is_finite() {
            opts.frame_rate_cap = 0.0;
        }
        opts
    }
}
