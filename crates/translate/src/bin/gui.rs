use std::time::Instant;

use anyhow::anyhow;
use clap::Parser;
use eframe::{egui, App, Frame};
use log::info;

use translate::render::{LOADING_LABEL, PLACEHOLDER_LABEL};
use translate::{ClientArgs, ClientConfig, Controller, HttpPredictor, RequestState};

/// Desktop translation client.
#[derive(Parser)]
#[command(name = "translate-gui")]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,
}

// light blue used for probability highlights (sRGB of oklch(0.809 0.105 251.8))
fn highlight(intensity: f32) -> egui::Color32 {
    let alpha = (intensity.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(142, 197, 255, alpha)
}

fn token_label(ui: &mut egui::Ui, view: &tokens::TokenView) {
    let text = egui::RichText::new(&view.text)
        .size(18.0)
        .background_color(highlight(view.intensity));
    let response = ui.add(egui::Label::new(text).sense(egui::Sense::hover()));
    response.on_hover_ui(|ui| {
        ui.label(egui::RichText::new("Candidates:").weak());
        for row in &view.candidates {
            let mut label = egui::RichText::new(&row.label).background_color(highlight(row.intensity));
            if row.is_top_pick {
                label = label.strong();
            }
            ui.label(label);
        }
    });
}

struct TranslateApp {
    controller: Controller<HttpPredictor>,
    input: String,
    top_n: usize,
    // token views of the current result, rebuilt when the state changes
    views: Vec<tokens::TokenView>,
    updated_at: Option<String>,
}

impl TranslateApp {
    fn new(cc: &eframe::CreationContext<'_>, config: &ClientConfig, predictor: HttpPredictor) -> Self {
        // highlights are tuned for a light background
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        let repaint = cc.egui_ctx.clone();
        Self {
            controller: Controller::new(predictor, config.quiet_period)
                .with_notifier(move || repaint.request_repaint()),
            input: String::new(),
            top_n: config.top_n,
            views: Vec::new(),
            updated_at: None,
        }
    }

    fn refresh_views(&mut self) {
        self.views = match self.controller.state() {
            RequestState::Succeeded(t) => {
                self.updated_at = Some(chrono::Local::now().format("%H:%M:%S").to_string());
                tokens::token_views(t, self.top_n)
            }
            RequestState::Idle => {
                self.updated_at = None;
                Vec::new()
            }
            RequestState::Loading | RequestState::Failed(_) => Vec::new(),
        };
    }

    fn edit(&mut self, now: Instant) {
        self.controller.set_input(&self.input, now);
        if self.controller.state() == &RequestState::Idle {
            self.refresh_views();
        }
    }
}

impl App for TranslateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();
        if self.controller.poll(now) {
            self.refresh_views();
        }
        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Danbooru translation");
                if let Some(at) = &self.updated_at {
                    ui.separator();
                    ui.small(format!("updated {at}"));
                }
            });
        });

        egui::SidePanel::left("input_panel")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label("Natural language");
                let response = ui.add(
                    egui::TextEdit::multiline(&mut self.input)
                        .hint_text("Type text to translate...")
                        .desired_rows(10)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.edit(Instant::now());
                    ctx.request_repaint();
                }
                if let Some(msg) = self.controller.state().error() {
                    ui.colored_label(egui::Color32::RED, format!("Error: {msg}"));
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Danbooru tags");
            ui.separator();
            if self.controller.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak(LOADING_LABEL);
                });
            } else if self.views.is_empty() {
                ui.weak(PLACEHOLDER_LABEL);
            } else {
                ui.horizontal_wrapped(|ui| {
                    for view in &self.views {
                        token_label(ui, view);
                    }
                });
            }
        });
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    translate::init_logging(cli.client.log_level)?;
    let config = cli.client.config();
    let predictor = HttpPredictor::new(&config)?;
    info!("using endpoint {}", predictor.endpoint());

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Danbooru translation",
        native_options,
        Box::new(move |cc| Ok(Box::new(TranslateApp::new(cc, &config, predictor)))),
    )
    .map_err(|e| anyhow!("gui failed: {e}"))
}
