//! Supported parser subcommands (spec §4.4).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleCommand {
    Summary,
    Inspect,
    References,
    Widgets,
    Datatable,
    Blueprint,
    GraphJson,
    Material,
    Materialfunction,
}

impl SingleCommand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Inspect => "inspect",
            Self::References => "references",
            Self::Widgets => "widgets",
            Self::Datatable => "datatable",
            Self::Blueprint => "blueprint",
            Self::GraphJson => "graph-json",
            Self::Material => "material",
            Self::Materialfunction => "materialfunction",
        }
    }

    /// Whether this command's stdout is XML rather than JSON (spec §6.1).
    #[must_use]
    pub fn emits_xml(self) -> bool {
        matches!(
            self,
            Self::References
                | Self::Widgets
                | Self::Datatable
                | Self::Blueprint
                | Self::Material
                | Self::Materialfunction
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchCommand {
    BatchFast,
    BatchSummary,
    BatchRefs,
    BatchBlueprint,
    BatchWidget,
    BatchMaterial,
    BatchDatatable,
}

impl BatchCommand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BatchFast => "batch-fast",
            Self::BatchSummary => "batch-summary",
            Self::BatchRefs => "batch-refs",
            Self::BatchBlueprint => "batch-blueprint",
            Self::BatchWidget => "batch-widget",
            Self::BatchMaterial => "batch-material",
            Self::BatchDatatable => "batch-datatable",
        }
    }
}
