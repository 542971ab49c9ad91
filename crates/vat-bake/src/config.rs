/// Naming and shader configuration for a bake.
#[derive(Debug, Clone)]
pub struct BakeConfig {
    /// Top-level export folder, shared by every bake.
    pub export_root: String,
    /// Shader assigned to baked materials.
    pub shader: String,
    pub materials_folder: String,
    pub textures_folder: String,
    pub mesh_folder: String,
    /// Appended to the source name to name the produced object.
    pub object_suffix: String,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            export_root: "VATExportData".into(),
            shader: "VAT/Lit".into(),
            materials_folder: "Materials".into(),
            textures_folder: "Textures".into(),
            mesh_folder: "Mesh".into(),
            object_suffix: "_VAT".into(),
        }
    }
}

impl BakeConfig {
    /// Name of the produced object for a source called `source`.
    pub fn object_name(&self, source: &str) -> String {
        format!("{source}{}", self.object_suffix)
    }
}
