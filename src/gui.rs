use crate::document::SourceText;
use crate::error::LoadError;
use crate::grid::{GRID_CAPACITY, GridSize};
use crate::session::{LoadOutcome, LoadTicket, Session};
use crate::statics::{self, Language, UiStrings};
use eframe::egui;
use std::{
    path::PathBuf,
    sync::{Arc, mpsc},
    time::Duration,
};
use tracing::{debug, info, warn};

const CELL_SIZE: f32 = 34.0;
const CELL_GAP: f32 = 3.0;

// Fallback fonts probed at startup so the Chinese UI renders.
const CJK_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simsun.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
];

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([760.0, 860.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            install_cjk_fallback(&cc.egui_ctx);
            Ok(Box::new(GridApp::new(initial_language())))
        }),
    )
}

fn initial_language() -> Language {
    std::env::var(statics::ENV_LANG)
        .ok()
        .and_then(|code| Language::from_code(&code))
        .unwrap_or_default()
}

fn install_cjk_fallback(ctx: &egui::Context) {
    let Some((path, bytes)) = CJK_FONT_CANDIDATES
        .iter()
        .find_map(|p| std::fs::read(p).ok().map(|b| (*p, b)))
    else {
        debug!("no CJK fallback font found");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "cjk_fallback".to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("cjk_fallback".to_owned());
    }
    ctx.set_fonts(fonts);
    debug!(path, "installed CJK fallback font");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusKind {
    Loading,
    Success,
    Error,
}

#[derive(Clone, Debug)]
struct Status {
    kind: StatusKind,
    message: &'static str,
    detail: Option<String>,
    shown_at: f64,
}

/// A file read running on a background thread.
struct PendingLoad {
    ticket: LoadTicket,
    path: PathBuf,
    rx: mpsc::Receiver<Result<SourceText, LoadError>>,
}

/// The application state: the edit session plus UI-only state.
struct GridApp {
    session: Session,
    language: Language,
    dialog_dir: Option<PathBuf>,
    pending: Vec<PendingLoad>,
    status: Option<Status>,
    theme_dark: bool,
}

impl GridApp {
    fn new(language: Language) -> Self {
        Self {
            session: Session::new(GridSize::default()),
            language,
            dialog_dir: None,
            pending: Vec::new(),
            status: None,
            theme_dark: true,
        }
    }

    fn strings(&self) -> &'static UiStrings {
        self.language.strings()
    }

    fn show_status(&mut self, ctx: &egui::Context, kind: StatusKind, message: &'static str) {
        self.show_status_detail(ctx, kind, message, None);
    }

    fn show_status_detail(
        &mut self,
        ctx: &egui::Context,
        kind: StatusKind,
        message: &'static str,
        detail: Option<String>,
    ) {
        let shown_at = ctx.input(|i| i.time);
        self.status = Some(Status {
            kind,
            message,
            detail,
            shown_at,
        });
    }

    fn expire_status(&mut self, ctx: &egui::Context) {
        let Some(status) = &self.status else {
            return;
        };
        if status.kind != StatusKind::Success {
            return;
        }
        let elapsed = ctx.input(|i| i.time) - status.shown_at;
        if elapsed >= statics::STATUS_CLEAR_SECS {
            self.status = None;
        } else {
            let left = statics::STATUS_CLEAR_SECS - elapsed;
            ctx.request_repaint_after(Duration::from_secs_f64(left));
        }
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new()
            .add_filter(statics::FILE_FILTER_NAME, statics::FILE_FILTER_EXTENSIONS);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn open_file(&mut self, ctx: &egui::Context) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };

        let ticket = self.session.begin_load();
        let (tx, rx) = mpsc::channel();
        let read_path = path.clone();
        let repaint = ctx.clone();
        std::thread::spawn(move || {
            // The receiver is gone only if the app is shutting down.
            tx.send(SourceText::read(&read_path)).ok();
            repaint.request_repaint();
        });

        info!(path = %path.display(), "loading resource");
        self.pending.push(PendingLoad { ticket, path, rx });
        self.show_status(ctx, StatusKind::Loading, self.strings().status_loading);
    }

    fn poll_pending_loads(&mut self, ctx: &egui::Context) {
        let mut finished = Vec::new();
        self.pending.retain(|load| match load.rx.try_recv() {
            Ok(result) => {
                finished.push((load.ticket, load.path.clone(), result));
                false
            }
            Err(mpsc::TryRecvError::Empty) => true,
            Err(mpsc::TryRecvError::Disconnected) => {
                warn!(path = %load.path.display(), "reader thread vanished");
                false
            }
        });

        for (ticket, path, result) in finished {
            self.finish_load(ctx, ticket, path, result);
        }

        if !self.pending.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }

    fn finish_load(
        &mut self,
        ctx: &egui::Context,
        ticket: LoadTicket,
        path: PathBuf,
        result: Result<SourceText, LoadError>,
    ) {
        let strings = self.strings();
        match self.session.complete_load(ticket, result) {
            Ok(LoadOutcome::Loaded) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.show_status(ctx, StatusKind::Success, strings.status_success);
            }
            Ok(LoadOutcome::Stale) => {
                debug!(path = %path.display(), "ignored superseded load");
            }
            Err(e @ LoadError::Malformed(_)) => {
                warn!(path = %path.display(), "load failed: {e:#}");
                self.show_status_detail(
                    ctx,
                    StatusKind::Error,
                    strings.status_error,
                    Some(e.to_string()),
                );
            }
            Err(e) => {
                warn!(path = %path.display(), "load failed: {e:#}");
                self.show_status_detail(
                    ctx,
                    StatusKind::Error,
                    strings.status_file_error,
                    Some(e.to_string()),
                );
            }
        }
    }

    fn save_file(&mut self, ctx: &egui::Context) {
        let strings = self.strings();
        let Some(file_name) = self.session.suggested_file_name() else {
            self.show_status(ctx, StatusKind::Error, strings.status_no_file);
            return;
        };

        let Some(path) = self.file_dialog().set_file_name(file_name).save_file() else {
            return;
        };

        match self.session.save_to_path(&path) {
            Ok(()) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.show_status(ctx, StatusKind::Success, strings.status_saved);
            }
            Err(e) => {
                self.show_status_detail(
                    ctx,
                    StatusKind::Error,
                    strings.status_error,
                    Some(format!("{e:#}")),
                );
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let strings = self.strings();
        ui.horizontal_wrapped(|ui| {
            if ui.button(strings.btn_load).clicked() {
                self.open_file(ctx);
            }
            if ui.button(strings.btn_save).clicked() {
                self.save_file(ctx);
            }
            if ui.button(strings.btn_clear).clicked() {
                self.session.clear_grid();
                self.show_status(ctx, StatusKind::Success, strings.status_cleared);
            }

            ui.separator();
            ui.label(strings.label_grid_size);
            let current = self.session.grid().active_size();
            let mut selected = current;
            egui::ComboBox::from_id_salt("grid_size")
                .selected_text(current.to_string())
                .show_ui(ui, |ui| {
                    for size in GridSize::ALL {
                        ui.selectable_value(&mut selected, size, size.to_string());
                    }
                });
            if selected != current {
                self.session.set_active_size(selected);
                self.show_status(ctx, StatusKind::Success, strings.status_size_change);
            }

            ui.separator();
            ui.label(strings.label_language);
            egui::ComboBox::from_id_salt("language")
                .selected_text(self.language.native_name())
                .show_ui(ui, |ui| {
                    for lang in Language::ALL {
                        ui.selectable_value(&mut self.language, lang, lang.native_name());
                    }
                });

            ui.separator();
            if ui.button(if self.theme_dark { "☀" } else { "🌙" }).clicked() {
                self.theme_dark = !self.theme_dark;
                if self.theme_dark {
                    ctx.set_visuals(egui::Visuals::dark());
                } else {
                    ctx.set_visuals(egui::Visuals::light());
                }
            }
        });
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let Some(status) = self.status.clone() else {
            return;
        };
        let color = match status.kind {
            StatusKind::Loading => ui.visuals().warn_fg_color,
            StatusKind::Success => egui::Color32::from_rgb(60, 170, 80),
            StatusKind::Error => ui.visuals().error_fg_color,
        };
        ui.horizontal(|ui| {
            ui.colored_label(color, status.message)
                .on_hover_text(status.detail.as_deref().unwrap_or(status.message));
            if status.kind == StatusKind::Error && ui.small_button("✖").clicked() {
                self.status = None;
            }
        });
    }

    fn render_instructions(&self, ui: &mut egui::Ui) {
        let strings = self.strings();
        ui.heading(statics::APP_TITLE);
        ui.label(strings.subtitle);
        ui.add_space(4.0);
        ui.strong(strings.how_to_use);
        for (i, step) in strings.instructions.iter().enumerate() {
            ui.label(format!("{}. {step}", i + 1));
        }
    }

    /// Board with column hints on top and row hints on the left. Cells and
    /// hints outside the active size are drawn greyed out with a `0`.
    fn render_board(&mut self, ui: &mut egui::Ui) {
        let hints = self.session.hints();
        let grid = self.session.grid().clone();
        let mut clicked = None;

        egui::Grid::new("board")
            .spacing([CELL_GAP, CELL_GAP])
            .min_col_width(CELL_SIZE)
            .show(ui, |ui| {
                ui.label("");
                for col in 0..GRID_CAPACITY {
                    let column = hints.columns.get(col);
                    ui.vertical_centered(|ui| match column {
                        Some(runs) => {
                            for run in runs {
                                ui.strong(run.to_string());
                            }
                        }
                        None => {
                            ui.weak("0");
                        }
                    });
                }
                ui.end_row();

                for row in 0..GRID_CAPACITY {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        match hints.rows.get(row) {
                            Some(runs) => {
                                let text = runs
                                    .iter()
                                    .map(ToString::to_string)
                                    .collect::<Vec<_>>()
                                    .join(" ");
                                ui.strong(text);
                            }
                            None => {
                                ui.weak("0");
                            }
                        }
                    });

                    for col in 0..GRID_CAPACITY {
                        let enabled = grid.active_size().contains(col, row);
                        if board_cell(ui, grid.get(col, row), enabled).clicked() {
                            clicked = Some((col, row));
                        }
                    }
                    ui.end_row();
                }
            });

        if let Some((col, row)) = clicked
            && let Err(e) = self.session.toggle_cell(col, row)
        {
            debug!("ignored click: {e}");
        }
    }
}

fn board_cell(ui: &mut egui::Ui, active: bool, enabled: bool) -> egui::Response {
    let sense = if enabled {
        egui::Sense::click()
    } else {
        egui::Sense::hover()
    };
    let (rect, response) = ui.allocate_exact_size(egui::vec2(CELL_SIZE, CELL_SIZE), sense);

    let visuals = ui.visuals();
    let fill = match (enabled, active) {
        (false, _) => visuals.faint_bg_color,
        (true, true) => visuals.selection.bg_fill,
        (true, false) if response.hovered() => visuals.widgets.hovered.bg_fill,
        (true, false) => visuals.extreme_bg_color,
    };
    let stroke = if enabled {
        visuals.widgets.inactive.bg_stroke
    } else {
        egui::Stroke::new(1.0, visuals.weak_text_color())
    };
    ui.painter().rect(rect, 3.0, fill, stroke, egui::StrokeKind::Inside);

    if enabled {
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    } else {
        response
    }
}

impl eframe::App for GridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending_loads(ctx);
        self.expire_status(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.render_top_bar(ctx, ui);
        });

        if self.status.is_some() {
            egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
                self.render_status(ui);
            });
        }

        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let file_label = self
                    .session
                    .document()
                    .and_then(|d| d.source_path.as_ref())
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string());
                ui.label(file_label);
                ui.separator();
                ui.label(format!("{}", self.session.grid().active_size()));
                ui.separator();
                ui.label(format!("active: {}", self.session.grid().active_count()));
                if self.session.is_dirty() {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, "modified");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                if self.session.document().is_none() {
                    self.render_instructions(ui);
                    ui.separator();
                }
                self.render_board(ui);
            });
        });
    }
}
