//! Per-variant [`DocChunk`] constructors (spec §4.2).
//!
//! Each builder follows the teacher/source pattern: assemble a list of text
//! fragments, join with `". "`, and build the variant-specific `metadata`
//! map alongside it. Lists embedded in `text` are capped per spec (first 10
//! unless noted); the full lists are kept in `metadata`.

use serde_json::{Map, Value, json};

use crate::document::{module_from_asset_path, module_from_source_path, DocChunk, DocKind};

fn join_capped(items: &[String], cap: usize) -> String {
    items.iter().take(cap).cloned().collect::<Vec<_>>().join(", ")
}

/// `asset_summary` — high-level per-asset document (spec §3.1, §4.2).
#[derive(Debug, Clone, Default)]
pub struct AssetSummaryInput {
    pub path: String,
    pub name: String,
    pub asset_type: String,
    pub widget_count: usize,
    pub function_count: usize,
    pub parent_class: String,
    pub events: Vec<String>,
    pub functions: Vec<String>,
    pub components: Vec<String>,
    pub variables: Vec<String>,
    pub interfaces: Vec<String>,
    pub references_out: Vec<String>,
    pub module: Option<String>,
}

#[must_use]
pub fn asset_summary(input: AssetSummaryInput) -> DocChunk {
    let mut parts = vec![format!("{} is a {}", input.name, input.asset_type)];
    if !input.parent_class.is_empty() {
        parts.push(format!("inheriting from {}", input.parent_class));
    }
    if !input.interfaces.is_empty() {
        parts.push(format!("implementing {}", join_capped(&input.interfaces, 5)));
    }
    if input.widget_count > 0 {
        parts.push(format!("containing {} widgets", input.widget_count));
    }
    if !input.components.is_empty() {
        parts.push(format!("Components: {}", join_capped(&input.components, 10)));
    }
    if !input.events.is_empty() {
        parts.push(format!("Events: {}", join_capped(&input.events, 10)));
    }
    if !input.functions.is_empty() {
        parts.push(format!("Functions: {}", join_capped(&input.functions, 10)));
    }
    if !input.variables.is_empty() {
        parts.push(format!("Variables: {}", join_capped(&input.variables, 10)));
    }
    let text = format!("{}.", parts.join(". "));

    let mut metadata = Map::new();
    metadata.insert("widget_count".into(), json!(input.widget_count));
    metadata.insert("function_count".into(), json!(input.function_count));
    metadata.insert("parent_class".into(), json!(input.parent_class));
    metadata.insert("events".into(), json!(cap_vec(&input.events, 15)));
    metadata.insert("functions".into(), json!(cap_vec(&input.functions, 15)));
    metadata.insert("components".into(), json!(cap_vec(&input.components, 15)));
    metadata.insert("variables".into(), json!(cap_vec(&input.variables, 15)));
    metadata.insert("interfaces".into(), json!(cap_vec(&input.interfaces, 10)));

    let module = input
        .module
        .unwrap_or_else(|| module_from_asset_path(&input.path));

    DocChunk::new(
        format!("asset:{}", input.path),
        DocKind::AssetSummary,
        input.path,
        input.name,
        text,
        Some(module),
        Some(input.asset_type),
    )
    .with_metadata(metadata)
    .with_references(input.references_out)
}

fn cap_vec(items: &[String], cap: usize) -> Vec<String> {
    items.iter().take(cap).cloned().collect()
}

/// `umg_widget_tree` — widget hierarchy of a `WidgetBlueprint` (spec §3.1).
#[must_use]
pub fn umg_widget_tree(
    path: &str,
    name: &str,
    root_widget: &str,
    widget_names: &[String],
    hierarchy_text: &str,
    references_out: Vec<String>,
    module: Option<String>,
) -> DocChunk {
    let text = format!(
        "Widget tree for {name}. Root widget: {root_widget}. Contains widgets: {}. Hierarchy: {hierarchy_text}",
        join_capped(widget_names, 15)
    );
    let mut metadata = Map::new();
    metadata.insert("root_widget".into(), json!(root_widget));
    metadata.insert("widget_names".into(), json!(widget_names));
    metadata.insert("widget_count".into(), json!(widget_names.len()));

    let module = module.unwrap_or_else(|| module_from_asset_path(path));
    DocChunk::new(
        format!("widget:{path}/WidgetTree"),
        DocKind::UmgWidgetTree,
        path,
        format!("{name}/WidgetTree"),
        text,
        Some(module),
        Some("WidgetBlueprint".to_string()),
    )
    .with_metadata(metadata)
    .with_references(references_out)
}

/// A single Blueprint function parameter (spec §4.2, `bp_graph_summary`).
#[derive(Debug, Clone)]
pub struct BpParameter {
    pub name: String,
    pub param_type: String,
    pub direction: BpParamDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpParamDirection {
    In,
    Out,
    Return,
}

impl BpParamDirection {
    fn prefix(self) -> &'static str {
        match self {
            Self::In => "",
            Self::Out => "out ",
            Self::Return => "returns ",
        }
    }
}

/// `bp_graph_summary` — one Blueprint function or event graph (spec §3.1).
#[derive(Debug, Clone, Default)]
pub struct BpGraphInput {
    pub path: String,
    pub asset_name: String,
    pub function_name: String,
    pub flags: Vec<String>,
    pub calls: Vec<String>,
    pub variables: Vec<String>,
    pub references_out: Vec<String>,
    pub module: Option<String>,
    pub is_event: bool,
    pub has_branches: bool,
    pub complexity: String,
    pub parameters: Vec<BpParameter>,
}

#[must_use]
pub fn bp_graph_summary(input: BpGraphInput) -> DocChunk {
    let func_type = if input.is_event { "Event" } else { "Function" };
    let mut parts = vec![format!(
        "{func_type} {} in {}",
        input.function_name, input.asset_name
    )];
    if !input.flags.is_empty() {
        parts.push(format!("Flags: {}", input.flags.join(", ")));
    }
    if !input.parameters.is_empty() {
        let param_strs: Vec<String> = input
            .parameters
            .iter()
            .map(|p| format!("{}{}: {}", p.direction.prefix(), p.name, p.param_type))
            .collect();
        parts.push(format!("Parameters: {}", param_strs.join(", ")));
    }
    if !input.calls.is_empty() {
        parts.push(format!("Calls: {}", join_capped(&input.calls, 10)));
    }
    if !input.variables.is_empty() {
        parts.push(format!("Variables: {}", join_capped(&input.variables, 10)));
    }
    if input.has_branches {
        parts.push(format!(
            "Contains conditional logic ({} complexity)",
            input.complexity
        ));
    }
    let text = format!("{}.", parts.join(". "));

    let mut metadata = Map::new();
    metadata.insert("flags".into(), json!(input.flags));
    metadata.insert("calls".into(), json!(input.calls));
    metadata.insert("variables".into(), json!(input.variables));
    metadata.insert("is_event".into(), json!(input.is_event));
    metadata.insert(
        "control_flow".into(),
        json!({"has_branches": input.has_branches, "complexity": input.complexity}),
    );
    metadata.insert(
        "parameters".into(),
        Value::Array(
            input
                .parameters
                .iter()
                .map(|p| {
                    json!({
                        "name": p.name,
                        "type": p.param_type,
                        "direction": match p.direction {
                            BpParamDirection::In => "in",
                            BpParamDirection::Out => "out",
                            BpParamDirection::Return => "return",
                        },
                    })
                })
                .collect(),
        ),
    );

    let module = input
        .module
        .unwrap_or_else(|| module_from_asset_path(&input.path));
    DocChunk::new(
        format!("bp_func:{}::{}", input.path, input.function_name),
        DocKind::BpGraphSummary,
        input.path,
        input.function_name,
        text,
        Some(module),
        Some("Blueprint".to_string()),
    )
    .with_metadata(metadata)
    .with_references(input.references_out)
}

/// `material_params` — `Material`/`MaterialInstance` parameters (spec §3.1,
/// §4.2: "adds parent and referenced textures to `references_out`").
#[derive(Debug, Clone, Default)]
pub struct MaterialParamsInput {
    pub path: String,
    pub name: String,
    pub is_instance: bool,
    pub parent: String,
    pub domain: String,
    pub blend_mode: String,
    pub shading_model: String,
    pub scalar_params: Map<String, Value>,
    pub vector_params: Map<String, Value>,
    pub texture_params: Map<String, Value>,
    pub static_switches: Map<String, Value>,
    pub references_out: Vec<String>,
    pub module: Option<String>,
}

#[must_use]
pub fn material_params(mut input: MaterialParamsInput) -> DocChunk {
    let mat_type = if input.is_instance {
        "MaterialInstance"
    } else {
        "Material"
    };
    let mut parts = vec![format!("{mat_type} {}", input.name)];
    if !input.parent.is_empty() {
        parts.push(format!("inherits from {}", input.parent));
    }
    parts.push(format!(
        "Domain: {}, Blend: {}, Shading: {}",
        input.domain, input.blend_mode, input.shading_model
    ));
    if !input.scalar_params.is_empty() {
        parts.push(format!(
            "Scalar params: {}",
            map_kv_capped(&input.scalar_params, 5)
        ));
    }
    if !input.vector_params.is_empty() {
        parts.push(format!(
            "Vector params: {}",
            map_keys_capped(&input.vector_params, 5)
        ));
    }
    if !input.texture_params.is_empty() {
        parts.push(format!(
            "Texture params: {}",
            map_kv_capped(&input.texture_params, 5)
        ));
    }
    if !input.static_switches.is_empty() {
        parts.push(format!(
            "Static switches: {}",
            map_kv_capped(&input.static_switches, 5)
        ));
    }
    let text = format!("{}.", parts.join(". "));

    if let Some(parent_id) = crate::reference::normalize_reference(&input.parent).map(|n| n.as_id()) {
        if !input.references_out.contains(&parent_id) {
            input.references_out.insert(0, parent_id);
        }
    }
    for value in input.texture_params.values() {
        if let Some(tex_path) = value.as_str() {
            if let Some(tex_id) = crate::reference::normalize_reference(tex_path).map(|n| n.as_id()) {
                if !input.references_out.iter().any(|r| r == &tex_id) {
                    input.references_out.push(tex_id);
                }
            }
        }
    }

    let mut metadata = Map::new();
    metadata.insert("is_instance".into(), json!(input.is_instance));
    metadata.insert("parent".into(), json!(input.parent));
    metadata.insert("domain".into(), json!(input.domain));
    metadata.insert("blend_mode".into(), json!(input.blend_mode));
    metadata.insert("shading_model".into(), json!(input.shading_model));
    metadata.insert("scalar_params".into(), Value::Object(input.scalar_params));
    metadata.insert("vector_params".into(), Value::Object(input.vector_params));
    metadata.insert("texture_params".into(), Value::Object(input.texture_params));
    metadata.insert(
        "static_switches".into(),
        Value::Object(input.static_switches),
    );

    let asset_type = if input.is_instance {
        "MaterialInstance"
    } else {
        "Material"
    };
    let module = input
        .module
        .unwrap_or_else(|| module_from_asset_path(&input.path));
    DocChunk::new(
        format!("material:{}", input.path),
        DocKind::MaterialParams,
        input.path,
        input.name,
        text,
        Some(module),
        Some(asset_type.to_string()),
    )
    .with_metadata(metadata)
    .with_references(input.references_out)
}

fn map_kv_capped(map: &Map<String, Value>, cap: usize) -> String {
    map.iter()
        .take(cap)
        .map(|(k, v)| format!("{k}={}", value_display(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn map_keys_capped(map: &Map<String, Value>, cap: usize) -> String {
    map.keys().take(cap).cloned().collect::<Vec<_>>().join(", ")
}

fn value_display(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A `MaterialFunction` input/output pin.
#[derive(Debug, Clone)]
pub struct MaterialFunctionPin {
    pub name: String,
    pub pin_type: Option<String>,
}

/// `materialfunction_params` (spec §3.1, §4.2).
#[derive(Debug, Clone, Default)]
pub struct MaterialFunctionInput {
    pub path: String,
    pub name: String,
    pub inputs: Vec<MaterialFunctionPin>,
    pub outputs: Vec<MaterialFunctionPin>,
    pub scalar_params: Map<String, Value>,
    pub vector_params: Map<String, Value>,
    pub static_switches: Map<String, Value>,
    pub references_out: Vec<String>,
    pub module: Option<String>,
}

#[must_use]
pub fn materialfunction_params(input: MaterialFunctionInput) -> DocChunk {
    let mut parts = vec![format!("MaterialFunction {}", input.name)];
    if !input.inputs.is_empty() {
        let desc: Vec<String> = input
            .inputs
            .iter()
            .take(5)
            .map(|i| format!("{}({})", i.name, i.pin_type.clone().unwrap_or_default()))
            .collect();
        parts.push(format!("Inputs: {}", desc.join(", ")));
    }
    if !input.outputs.is_empty() {
        let desc: Vec<String> = input.outputs.iter().take(5).map(|o| o.name.clone()).collect();
        parts.push(format!("Outputs: {}", desc.join(", ")));
    }
    if !input.scalar_params.is_empty() {
        parts.push(format!(
            "Scalar params: {}",
            map_kv_capped(&input.scalar_params, 5)
        ));
    }
    if !input.vector_params.is_empty() {
        parts.push(format!(
            "Vector params: {}",
            map_keys_capped(&input.vector_params, 5)
        ));
    }
    if !input.static_switches.is_empty() {
        parts.push(format!(
            "Static switches: {}",
            map_kv_capped(&input.static_switches, 5)
        ));
    }
    let text = format!("{}.", parts.join(". "));

    let input_count = input.inputs.len();
    let output_count = input.outputs.len();
    let param_count = input.scalar_params.len() + input.vector_params.len() + input.static_switches.len();

    let mut metadata = Map::new();
    metadata.insert(
        "inputs".into(),
        Value::Array(
            input
                .inputs
                .iter()
                .map(|i| json!({"name": i.name, "type": i.pin_type}))
                .collect(),
        ),
    );
    metadata.insert(
        "outputs".into(),
        Value::Array(input.outputs.iter().map(|o| json!({"name": o.name})).collect()),
    );
    metadata.insert("scalar_params".into(), Value::Object(input.scalar_params));
    metadata.insert("vector_params".into(), Value::Object(input.vector_params));
    metadata.insert(
        "static_switches".into(),
        Value::Object(input.static_switches),
    );
    metadata.insert("input_count".into(), json!(input_count));
    metadata.insert("output_count".into(), json!(output_count));
    metadata.insert("param_count".into(), json!(param_count));

    let module = input
        .module
        .unwrap_or_else(|| module_from_asset_path(&input.path));
    DocChunk::new(
        format!("materialfunction:{}", input.path),
        DocKind::MaterialfunctionParams,
        input.path,
        input.name,
        text,
        Some(module),
        Some("MaterialFunction".to_string()),
    )
    .with_metadata(metadata)
    .with_references(input.references_out)
}

/// `datatable` — row struct, row count, first 10 columns, first 5 row keys
/// (spec §4.2).
#[must_use]
pub fn datatable(
    path: &str,
    name: &str,
    row_struct: &str,
    row_count: usize,
    columns: &[String],
    sample_row_keys: &[String],
    module: Option<String>,
) -> DocChunk {
    let mut parts = vec![format!("DataTable {name} with row struct {row_struct}")];
    parts.push(format!("{row_count} rows"));
    if !columns.is_empty() {
        parts.push(format!("Columns: {}", join_capped(columns, 10)));
    }
    if !sample_row_keys.is_empty() {
        parts.push(format!("Sample rows: {}", join_capped(sample_row_keys, 5)));
    }
    let text = format!("{}.", parts.join(". "));

    let mut metadata = Map::new();
    metadata.insert("row_struct".into(), json!(row_struct));
    metadata.insert("row_count".into(), json!(row_count));
    metadata.insert("columns".into(), json!(columns));
    metadata.insert("sample_keys".into(), json!(sample_row_keys));

    let module = module.unwrap_or_else(|| module_from_asset_path(path));
    DocChunk::new(
        format!("datatable:{path}"),
        DocKind::Datatable,
        path,
        name,
        text,
        Some(module),
        Some("DataTable".to_string()),
    )
    .with_metadata(metadata)
}

/// `source_file` — a scanned C++ header, summarized for FTS (spec §3.1).
#[must_use]
pub fn source_file(relative_path: &str, class_names: &[String]) -> DocChunk {
    let text = if class_names.is_empty() {
        format!("Source file {relative_path}.")
    } else {
        format!(
            "Source file {relative_path}. Declares: {}.",
            class_names.join(", ")
        )
    };
    let mut metadata = Map::new();
    metadata.insert("class_names".into(), json!(class_names));
    let module = module_from_source_path(relative_path);
    let name = relative_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(relative_path)
        .to_string();
    DocChunk::new(
        format!("source:{relative_path}"),
        DocKind::SourceFile,
        relative_path,
        name,
        text,
        Some(module),
        None,
    )
    .with_metadata(metadata)
}

/// `cpp_class` — a `UCLASS`/`USTRUCT` declaration (spec §3.1).
#[must_use]
pub fn cpp_class(
    class_name: &str,
    parent_class: Option<&str>,
    source_path: &str,
    specifiers: &[String],
) -> DocChunk {
    let mut text = format!("class {class_name}");
    if let Some(parent) = parent_class {
        text.push_str(&format!(" : public {parent}"));
    }
    text.push_str(&format!(" declared in {source_path}"));
    if !specifiers.is_empty() {
        text.push_str(&format!(". Specifiers: {}", specifiers.join(", ")));
    }
    text.push('.');

    let mut metadata = Map::new();
    metadata.insert("parent_class".into(), json!(parent_class));
    metadata.insert("source_path".into(), json!(source_path));
    metadata.insert("specifiers".into(), json!(specifiers));
    let module = module_from_source_path(source_path);
    DocChunk::new(
        format!("cpp_class:{class_name}"),
        DocKind::CppClass,
        source_path,
        class_name,
        text,
        Some(module),
        Some("CppClass".to_string()),
    )
    .with_metadata(metadata)
}

/// `cpp_func` — a UFUNCTION signature (spec §3.1).
#[must_use]
pub fn cpp_func(
    class_name: &str,
    func_name: &str,
    signature: &str,
    specifiers: &[String],
) -> DocChunk {
    let mut text = format!("{class_name}::{func_name}({signature})");
    if !specifiers.is_empty() {
        text.push_str(&format!(". Specifiers: {}", specifiers.join(", ")));
    }
    text.push('.');
    let mut metadata = Map::new();
    metadata.insert("signature".into(), json!(signature));
    metadata.insert("specifiers".into(), json!(specifiers));
    DocChunk::new(
        format!("cpp_func:{class_name}::{func_name}"),
        DocKind::CppFunc,
        class_name,
        func_name,
        text,
        None,
        Some("CppFunc".to_string()),
    )
    .with_metadata(metadata)
}

/// `cpp_property` — a UPROPERTY declaration (spec §3.1).
#[must_use]
pub fn cpp_property(
    class_name: &str,
    prop_name: &str,
    prop_type: &str,
    specifiers: &[String],
) -> DocChunk {
    let mut text = format!("{class_name}::{prop_name}: {prop_type}");
    if !specifiers.is_empty() {
        text.push_str(&format!(". Specifiers: {}", specifiers.join(", ")));
    }
    text.push('.');
    let mut metadata = Map::new();
    metadata.insert("prop_type".into(), json!(prop_type));
    metadata.insert("specifiers".into(), json!(specifiers));
    DocChunk::new(
        format!("cpp_prop:{class_name}::{prop_name}"),
        DocKind::CppProperty,
        class_name,
        prop_name,
        text,
        None,
        Some("CppProperty".to_string()),
    )
    .with_metadata(metadata)
}
