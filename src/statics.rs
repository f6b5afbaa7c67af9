// Central place for document keys, UI strings and other constants.
// Keep these out of gui.rs/codec.rs to reduce duplication and make tweaks safer.

// Resource document keys (DOC_ prefix)
pub const DOC_SCRIPT: &str = "script";
pub const DOC_CHILDREN: &str = "children";
pub const DOC_BRANCH_TRUE: &str = "true";
pub const DOC_BRANCH_FALSE: &str = "false";
pub const DOC_COMMAND: &str = "command";
pub const DOC_ARGS: &str = "args";
pub const DOC_ID: &str = "id";
pub const DOC_ARG_VARIABLE: &str = "variable";
pub const DOC_ARG_COLLAPSE: &str = "__collapse";

// The event used as the on/off marker for each cell.
pub const CMD_INC_VALUE: &str = "EVENT_INC_VALUE";
// Variable targeted by synthesized markers.
pub const MARKER_VARIABLE: &str = "V1";
// Prefix of synthesized marker ids.
pub const GENERATED_ID_PREFIX: &str = "gen";

pub const DEFAULT_FILE_NAME: &str = "win_picross.gbsres";
pub const FILE_FILTER_NAME: &str = "GB Studio Resource";
pub const FILE_FILTER_EXTENSIONS: &[&str] = &["gbsres", "json"];

// Success banners disappear after this many seconds.
pub const STATUS_CLEAR_SECS: f64 = 3.0;

pub const ENV_LANG: &str = "GBSGRID_LANG";
pub const DEFAULT_LOG_DIRECTIVE: &str = "gbsgrid=info";

pub const APP_TITLE: &str = "GBS Picross Grid Editor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Es,
    Zh,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::Zh];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Zh => "zh",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Zh => "中文",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn strings(self) -> &'static UiStrings {
        match self {
            Language::En => &EN,
            Language::Es => &ES,
            Language::Zh => &ZH,
        }
    }
}

pub struct UiStrings {
    pub subtitle: &'static str,
    pub how_to_use: &'static str,
    pub instructions: [&'static str; 4],
    pub btn_load: &'static str,
    pub btn_save: &'static str,
    pub btn_clear: &'static str,
    pub label_grid_size: &'static str,
    pub label_language: &'static str,
    pub status_loading: &'static str,
    pub status_success: &'static str,
    pub status_error: &'static str,
    pub status_file_error: &'static str,
    pub status_no_file: &'static str,
    pub status_saved: &'static str,
    pub status_cleared: &'static str,
    pub status_size_change: &'static str,
}

pub static EN: UiStrings = UiStrings {
    subtitle: "Edit .gbsres files",
    how_to_use: "How to use:",
    instructions: [
        "Load a .gbsres file using the \"Load File\" button",
        "Select grid size (3x3, 5x5, or 10x10)",
        "Click on grid cells to toggle their state (active/inactive)",
        "Write the modified file with the \"Save File\" button",
    ],
    btn_load: "Load File",
    btn_save: "Save File",
    btn_clear: "Clear Grid",
    label_grid_size: "Grid size:",
    label_language: "Language:",
    status_loading: "Loading file...",
    status_success: "File loaded successfully!",
    status_error: "Error: Invalid file structure",
    status_file_error: "Error reading file",
    status_no_file: "Error: No file loaded",
    status_saved: "File saved successfully!",
    status_cleared: "Grid cleared",
    status_size_change: "Grid size changed",
};

pub static ES: UiStrings = UiStrings {
    subtitle: "Editar archivos .gbsres",
    how_to_use: "Cómo usar:",
    instructions: [
        "Carga un archivo .gbsres usando el botón \"Cargar archivo\"",
        "Selecciona el tamaño de la cuadrícula (3x3, 5x5 o 10x10)",
        "Haz clic en las celdas para cambiar su estado (activo/inactivo)",
        "Guarda el archivo modificado con el botón \"Guardar archivo\"",
    ],
    btn_load: "Cargar archivo",
    btn_save: "Guardar archivo",
    btn_clear: "Limpiar cuadrícula",
    label_grid_size: "Tamaño:",
    label_language: "Idioma:",
    status_loading: "Cargando archivo...",
    status_success: "¡Archivo cargado correctamente!",
    status_error: "Error: Estructura de archivo inválida",
    status_file_error: "Error al leer el archivo",
    status_no_file: "Error: No hay archivo cargado",
    status_saved: "¡Archivo guardado correctamente!",
    status_cleared: "Cuadrícula limpiada",
    status_size_change: "Tamaño de cuadrícula cambiado",
};

pub static ZH: UiStrings = UiStrings {
    subtitle: "编辑 .gbsres 文件",
    how_to_use: "使用方法:",
    instructions: [
        "使用“加载文件”按钮打开 .gbsres 文件",
        "选择网格大小（3x3、5x5 或 10x10）",
        "点击网格单元切换状态（激活/非激活）",
        "使用“保存文件”按钮写出修改后的文件",
    ],
    btn_load: "加载文件",
    btn_save: "保存文件",
    btn_clear: "清除网格",
    label_grid_size: "网格大小:",
    label_language: "语言:",
    status_loading: "正在加载文件...",
    status_success: "文件加载成功!",
    status_error: "错误: 无效的文件结构",
    status_file_error: "读取文件错误",
    status_no_file: "错误: 没有加载文件",
    status_saved: "文件保存成功!",
    status_cleared: "网格已清除",
    status_size_change: "网格大小已更改",
};
