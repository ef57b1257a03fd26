use crate::core::bottle::Bottle;
use crate::models::launch_options::{GraphicsBackend, LaunchOptions};
use crate::models::paths::{CrossOverPaths, BOTTLE_STEAM_EXE};
use camino::Utf8PathBuf;

const WINDOWS_CLIENT_ARGS: &[&str] = &["-nochatui", "-nofriendsui", "-silent", "-applaunch"];
const NATIVE_CLIENT_ARGS: &[&str] = &["-silent", "-applaunch"];
const WINDOWS_CLIENT_PROCESS: &str = "steam.exe";

/// Builds the `DXMT_CONFIG` value from the sub-settings that are enabled.
/// `None` when the backend is not DXMT or nothing is enabled.
pub fn dxmt_config(options: &LaunchOptions) -> Option<String> {
    if options.backend() != GraphicsBackend::Dxmt {
        return None;
    }

    let mut parts = Vec::new();
    if let Some(cap) = options.effective_frame_rate_cap() {
        parts.push(format!("d3d11.preferredMaxFrameRate={cap:.0}"));
    }
    if options.upscale_enabled() {
        parts.push(format!(
            "d3d11.metalSpatialUpscaleFactor={:.2}",
            options.upscale_factor()
        ));
    }

    (!parts.is_empty()).then(|| parts.join(";"))
}

/// Environment prefix for the launch command, as `KEY=value` words joined by
/// spaces. User-supplied variables are appended verbatim.
pub fn environment_string(options: &LaunchOptions) -> String {
    let flag = |on: bool| if on { "1" } else { "0" };

    let mut vars = vec![
        "WINEDEBUG=-all".to_string(),
        format!("MTL_HUD_ENABLED={}", flag(options.hud_enabled())),
    ];
    if options.advertise_extended_cpu() {
        vars.push("ROSETTA_ADVERTISE_AVX=1".to_string());
    }
    vars.push(format!(
        "DXMT_METALFX_SPATIAL_SWAPCHAIN={}",
        flag(options.upscale_enabled())
    ));
    if let Some(config) = dxmt_config(options) {
        vars.push(format!("DXMT_CONFIG=\"{config}\""));
    }
    if !options.extra_env().trim().is_empty() {
        vars.push(options.extra_env().trim().to_string());
    }

    vars.join(" ")
}

/// Where the launch command sends the title.
#[derive(Debug, Clone)]
pub enum LaunchTarget {
    /// Through wine inside a bottle.
    Bottle { crossover_app: Utf8PathBuf, bottle: Bottle },
    /// Straight to the native client, bypassing the compatibility layer.
    Native { client: Utf8PathBuf },
}

impl LaunchTarget {
    /// Executable-name suffixes of a previous instance of this target.
    pub fn prior_process_suffixes(&self) -> Vec<String> {
        match self {
            LaunchTarget::Bottle { .. } => vec![WINDOWS_CLIENT_PROCESS.to_string()],
            LaunchTarget::Native { client } => client
                .file_name()
                .map(|name| vec![name.to_string()])
                .unwrap_or_default(),
        }
    }
}

/// Assembles the full shell command line.
///
/// Plain concatenation: `extra_arguments` and `extra_env` are inserted
/// unescaped, so shell metacharacters in them are interpreted by the shell.
pub fn build_command(target: &LaunchTarget, app_id: &str, options: &LaunchOptions) -> String {
    let env = environment_string(options);

    let mut words = vec![env];
    match target {
        LaunchTarget::Bottle {
            crossover_app,
            bottle,
        } => {
            words.push(CrossOverPaths::new(crossover_app).wine.to_string());
            words.push("--bottle".to_string());
            words.push(bottle.name.clone());
            words.push(format!("\"{BOTTLE_STEAM_EXE}\""));
            words.extend(WINDOWS_CLIENT_ARGS.iter().map(|s| s.to_string()));
        }
        LaunchTarget::Native { client } => {
            words.push(format!("\"{client}\""));
            words.extend(NATIVE_CLIENT_ARGS.iter().map(|s| s.to_string()));
        }
    }
    words.push(app_id.to_string());
    if !options.extra_arguments().trim().is_empty() {
        words.push(options.extra_arguments().trim().to_string());
    }

    words.join(" ")
}
