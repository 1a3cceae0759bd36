use anyhow::{Context, Result};

/// WGSL source of the flat-color program.
pub const FLAT_SHADER_WGSL: &str = include_str!("shaders/flat.wgsl");

/// Vertex stage entry point.
pub const VS_ENTRY: &str = "vs_main";

/// Fragment stage entry point.
pub const FS_ENTRY: &str = "fs_main";

/// Shader module descriptor for the flat-color program.
///
/// Consumers hand this to `Device::create_shader_module`.
pub fn shader_module_descriptor() -> wgpu::ShaderModuleDescriptor<'static> {
    wgpu::ShaderModuleDescriptor {
        label: Some("lumen flat shader"),
        source: wgpu::ShaderSource::Wgsl(FLAT_SHADER_WGSL.into()),
    }
}

/// Entry points discovered in a validated module.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderInfo {
    pub entry_points: Vec<(String, naga::ShaderStage)>,
}

impl ShaderInfo {
    pub fn stage_of(&self, name: &str) -> Option<naga::ShaderStage> {
        self.entry_points
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, stage)| *stage)
    }
}

/// Parses and validates a WGSL program with naga.
///
/// On top of naga's own validation, requires `vs_main` to be a vertex entry
/// point and `fs_main` a fragment entry point.
pub fn validate_wgsl(source: &str, name: &str) -> Result<ShaderInfo> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow::anyhow!("{}", e.emit_to_string(source)))
        .with_context(|| format!("WGSL parse error for {name}"))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );

    validator
        .validate(&module)
        .map_err(|e| anyhow::anyhow!("{}", e.emit_to_string(source)))
        .with_context(|| format!("validation error for {name}"))?;

    let info = ShaderInfo {
        entry_points: module
            .entry_points
            .iter()
            .map(|ep| (ep.name.clone(), ep.stage))
            .collect(),
    };

    for (entry, stage) in [
        (VS_ENTRY, naga::ShaderStage::Vertex),
        (FS_ENTRY, naga::ShaderStage::Fragment),
    ] {
        match info.stage_of(entry) {
            Some(found) => anyhow::ensure!(
                found == stage,
                "{name}: entry point `{entry}` is a {found:?} stage, expected {stage:?}"
            ),
            None => anyhow::bail!("{name}: missing entry point `{entry}`"),
        }
    }

    log::debug!("validated shader {name}: {:?}", info.entry_points);
    Ok(info)
}

/// Validates the embedded flat-color program.
pub fn validate_flat_shader() -> Result<ShaderInfo> {
    validate_wgsl(FLAT_SHADER_WGSL, "flat.wgsl")
}
