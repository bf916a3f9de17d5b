use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use eframe::egui::{self, Align, Color32, Layout, RichText, TextEdit, TopBottomPanel, Ui};
use log::{debug, warn};

use crate::api::ApiSharedState;
use crate::config::{Settings, Theme, save_settings};
use crate::locale::{BRAND_LINE, Language};
use crate::puzzle::calculator::CrossingPlan;
use crate::puzzle::model::{CrossingInput, GroupColor, GroupCount};
use crate::ui::fonts::install_arabic_fallback;
use crate::ui::reveal::DelayedReveal;

pub fn run_gui(
    settings: Settings,
    settings_path: PathBuf,
    api_state: Option<Arc<Mutex<ApiSharedState>>>,
    api_address: Option<String>,
) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Summit Calculator")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 520.0]),
        ..Default::default()
    };

    let app = SummitApp::new(settings, settings_path, api_state, api_address);

    eframe::run_native(
        "Summit Calculator",
        native_options,
        Box::new(move |cc| {
            install_arabic_fallback(&cc.egui_ctx);
            configure_theme(&cc.egui_ctx, app.settings.theme);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch calculator GUI: {err}"))?;

    Ok(())
}

fn configure_theme(ctx: &egui::Context, theme: Theme) {
    let visuals = match theme {
        Theme::Dark => {
            let mut visuals = egui::Visuals::dark();
            visuals.override_text_color = Some(Color32::from_rgb(236, 232, 246));
            visuals.panel_fill = Color32::from_rgb(18, 12, 32);
            visuals.window_fill = Color32::from_rgb(26, 18, 44);
            visuals.widgets.inactive.bg_fill = Color32::from_rgb(40, 30, 62);
            visuals.widgets.hovered.bg_fill = Color32::from_rgb(86, 44, 128);
            visuals.widgets.active.bg_fill = Color32::from_rgb(147, 51, 234);
            visuals.selection.bg_fill = Color32::from_rgb(168, 85, 247);
            visuals
        }
        Theme::Light => {
            let mut visuals = egui::Visuals::light();
            visuals.panel_fill = Color32::from_rgb(246, 242, 252);
            visuals.selection.bg_fill = Color32::from_rgb(219, 39, 119);
            visuals
        }
    };
    ctx.set_visuals(visuals);
}

fn team_color(color: GroupColor) -> Color32 {
    match color {
        GroupColor::Red => Color32::from_rgb(248, 113, 113),
        GroupColor::Green => Color32::from_rgb(74, 222, 128),
        GroupColor::Blue => Color32::from_rgb(96, 165, 250),
    }
}

fn team_fill(color: GroupColor, theme: Theme) -> Color32 {
    let alpha = if theme.is_dark() { 40 } else { 28 };
    match color {
        GroupColor::Red => Color32::from_rgba_unmultiplied(127, 29, 29, alpha),
        GroupColor::Green => Color32::from_rgba_unmultiplied(20, 83, 45, alpha),
        GroupColor::Blue => Color32::from_rgba_unmultiplied(30, 58, 138, alpha),
    }
}

const ACCENT: Color32 = Color32::from_rgb(192, 132, 252);

/// Rewrites a field to the count it stands for, floored and clamped like every other input path.
fn normalize_count_text(text: &mut String) {
    let normalized = count_text(GroupCount::from_raw(text));
    if *text != normalized {
        *text = normalized;
    }
}

fn count_text(count: GroupCount) -> String {
    if count == GroupCount::ZERO {
        String::new()
    } else {
        count.get().to_string()
    }
}

struct SummitApp {
    settings: Settings,
    settings_path: PathBuf,
    count_inputs: [String; 3],
    reveal: DelayedReveal<CrossingPlan>,
    result: Option<CrossingPlan>,
    show_process: bool,
    status_message: Option<(String, Instant)>,
    api_state: Option<Arc<Mutex<ApiSharedState>>>,
    api_address: Option<String>,
}

impl SummitApp {
    fn new(
        settings: Settings,
        settings_path: PathBuf,
        api_state: Option<Arc<Mutex<ApiSharedState>>>,
        api_address: Option<String>,
    ) -> Self {
        let count_inputs = GroupColor::ALL.map(|color| count_text(settings.groups[color]));
        Self {
            settings,
            settings_path,
            count_inputs,
            reveal: DelayedReveal::default(),
            result: None,
            show_process: false,
            status_message: None,
            api_state,
            api_address,
        }
    }

    fn language(&self) -> Language {
        self.settings.language
    }

    fn set_status(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status_message = Some((text.into(), Instant::now() + ttl));
    }

    fn current_input(&self) -> CrossingInput {
        let [red, green, blue] = &self.count_inputs;
        CrossingInput::from_raw(red, green, blue)
    }

    fn persist_settings(&mut self) {
        if let Err(err) = save_settings(&self.settings_path, &self.settings) {
            warn!("{err:#}");
            self.set_status(format!("Could not save settings: {err}"), Duration::from_secs(4));
        }
    }

    fn publish_calculation(&self, input: CrossingInput, plan: &CrossingPlan) {
        let Some(state) = &self.api_state else {
            return;
        };
        match state.lock() {
            Ok(mut guard) => guard.record_calculation(input, plan.clone(), "gui"),
            Err(_) => warn!("API state lock poisoned; calculation not published"),
        }
    }

    fn calculate(&mut self, now: Instant) {
        let input = self.current_input();
        self.count_inputs.iter_mut().for_each(normalize_count_text);
        let plan = CrossingPlan::compute(&input);
        debug!(
            "calculated {} for red={} green={} blue={}",
            plan.total_time,
            input.red.get(),
            input.green.get(),
            input.blue.get()
        );
        self.publish_calculation(input, &plan);
        self.reveal.start(
            plan,
            now,
            Duration::from_millis(self.settings.reveal_delay_ms),
        );
        self.show_process = self.settings.show_breakdown;

        if self.settings.groups != input {
            self.settings.groups = input;
            self.persist_settings();
        }
    }

    fn show_header(&mut self, ui: &mut Ui) {
        let language = self.language();
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(BRAND_LINE).size(18.0).strong());
            ui.horizontal(|ui| {
                if ui
                    .button(language.theme_toggle(self.settings.theme.is_dark()))
                    .clicked()
                {
                    self.settings.theme = self.settings.theme.toggled();
                    configure_theme(ui.ctx(), self.settings.theme);
                    self.persist_settings();
                }
                if ui.button(language.language_toggle()).clicked() {
                    self.settings.language = language.toggled();
                    self.persist_settings();
                }
            });
        });

        if let Some((msg, _)) = &self.status_message {
            ui.label(
                RichText::new(msg)
                    .color(Color32::from_rgb(255, 183, 95))
                    .strong(),
            );
        }
    }

    fn show_groups(&mut self, ui: &mut Ui) {
        let language = self.language();
        let theme = self.settings.theme;
        let inputs = &mut self.count_inputs;
        ui.columns(GroupColor::ALL.len(), |columns| {
            for (column, color) in columns.iter_mut().zip(GroupColor::ALL) {
                egui::Frame::group(column.style())
                    .fill(team_fill(color, theme))
                    .show(column, |ui| {
                        ui.label(
                            RichText::new(language.team_label(color))
                                .size(20.0)
                                .color(team_color(color))
                                .strong(),
                        );
                        let response = ui.add(
                            TextEdit::singleline(&mut inputs[color.index()])
                                .hint_text("0")
                                .desired_width(f32::INFINITY),
                        );
                        if response.lost_focus() {
                            normalize_count_text(&mut inputs[color.index()]);
                        }
                    });
            }
        });
    }

    fn show_result(&mut self, ui: &mut Ui) {
        let language = self.language();
        ui.vertical_centered(|ui| {
            let pending = self.reveal.is_pending();
            let button = egui::Button::new(
                RichText::new(language.calculate_button())
                    .size(18.0)
                    .strong(),
            )
            .fill(Color32::from_rgb(147, 51, 234))
            .min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(!pending, button).clicked() {
                self.calculate(Instant::now());
            }
            if pending {
                ui.spinner();
                return;
            }

            let Some(plan) = &self.result else {
                return;
            };
            if plan.total_time == 0 {
                return;
            }
            ui.add_space(12.0);
            ui.label(
                RichText::new(language.total_time_line(plan.total_time))
                    .size(24.0)
                    .strong(),
            );

            if self.show_process {
                ui.add_space(8.0);
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label(
                        RichText::new(language.process_details())
                            .size(20.0)
                            .color(ACCENT)
                            .strong(),
                    );
                    for group in &plan.groups {
                        ui.label(
                            RichText::new(language.trips_line(group.color, group.trips))
                                .color(team_color(group.color)),
                        );
                    }
                });
            }
        });
    }
}

impl eframe::App for SummitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        if let Some((_, expires_at)) = &self.status_message
            && now >= *expires_at
        {
            self.status_message = None;
        }
        if let Some(plan) = self.reveal.poll(now) {
            self.result = Some(plan);
        }

        TopBottomPanel::top("header")
            .resizable(false)
            .show(ctx, |ui| self.show_header(ui));

        if let Some(address) = &self.api_address {
            TopBottomPanel::bottom("footer")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(
                        RichText::new(format!(
                            "API http://{address}/v1 | calculate /v1/calculate?red=&green=&blue="
                        ))
                        .color(Color32::from_rgb(161, 180, 201)),
                    );
                });
        }

        let language = self.language();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                ui.add_space(12.0);
                ui.label(
                    RichText::new(language.title())
                        .size(30.0)
                        .color(ACCENT)
                        .strong(),
                );
                ui.label(RichText::new(language.subtitle()).size(16.0));
                ui.add_space(16.0);
            });
            self.show_groups(ui);
            ui.add_space(16.0);
            self.show_result(ui);
        });

        if let Some(wait) = self.reveal.remaining(Instant::now()) {
            ctx.request_repaint_after(wait);
        } else if let Some((_, expires_at)) = &self.status_message {
            ctx.request_repaint_after(expires_at.saturating_duration_since(Instant::now()));
        }
    }
}
