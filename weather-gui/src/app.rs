use eframe::egui;
use std::time::Duration;

use crate::controller::{Controller, View};

const WELCOME: &str = "\
This application provides real-time weather information
for cities around the world.

Enter a city name in the search box and click 'Search'
or press Enter to get weather information.

Click 'History' to view your recent searches.";

pub struct WeatherGuiApp {
    controller: Controller,
    icon: Option<egui::TextureHandle>,
}

impl WeatherGuiApp {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            icon: None,
        }
    }

    fn search_bar(&mut self, ui: &mut egui::Ui) {
        let configured = self.controller.is_configured();

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Enter City:").size(16.0));

            let field = ui.add_enabled(
                configured,
                egui::TextEdit::singleline(&mut self.controller.input).desired_width(220.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let clicked = ui
                .add_enabled(configured, egui::Button::new("Search"))
                .clicked();

            if clicked || submitted {
                let ctx = ui.ctx().clone();
                self.controller.search(move || ctx.request_repaint());
            }

            if ui.button("History").clicked() {
                self.controller.history_open = true;
            }
        });
    }

    fn display(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| match self.controller.view() {
            View::Welcome => {
                ui.add_space(30.0);
                ui.heading("Welcome to Weather App");
                ui.add_space(15.0);
                ui.label(WELCOME);
            }
            View::Loading(query) => {
                ui.add_space(80.0);
                ui.spinner();
                ui.label(format!("Loading weather for {query}..."));
            }
            View::Weather(card) => {
                ui.add_space(10.0);
                ui.label(egui::RichText::new(&card.title).size(26.0).strong());
                ui.label(egui::RichText::new(&card.observed).color(egui::Color32::GRAY));

                if let Some(icon) = &self.icon {
                    ui.image((icon.id(), icon.size_vec2()));
                }

                ui.label(egui::RichText::new(&card.condition).size(18.0));
                ui.add_space(10.0);
                ui.label(egui::RichText::new(&card.temperature).size(36.0).strong());
                ui.label(format!("Feels like: {}", card.feels_like));
                ui.separator();

                egui::Grid::new("details").num_columns(2).spacing([20.0, 8.0]).show(ui, |ui| {
                    ui.label("Humidity:");
                    ui.strong(&card.humidity);
                    ui.end_row();
                    ui.label("Wind Speed:");
                    ui.strong(&card.wind);
                    ui.end_row();
                });
            }
            View::Error { title, message } => {
                ui.add_space(60.0);
                ui.label(
                    egui::RichText::new(title)
                        .size(18.0)
                        .strong()
                        .color(egui::Color32::from_rgb(0xcc, 0, 0)),
                );
                ui.add_space(8.0);
                ui.label(message);
            }
        });
    }

    fn history_window(&mut self, ctx: &egui::Context) {
        if !self.controller.history_open {
            return;
        }

        let lines = self.controller.history_lines();
        let mut open = true;

        egui::Window::new("Recent Searches")
            .open(&mut open)
            .default_width(460.0)
            .show(ctx, |ui| match &lines {
                None => {
                    ui.label(weather_core::present::NO_HISTORY);
                }
                Some(lines) => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for line in lines {
                            ui.label(line);
                            ui.add_space(4.0);
                        }
                    });
                }
            });

        self.controller.history_open = open;
    }
}

impl eframe::App for WeatherGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();

        if let Some(update) = self.controller.take_icon_update() {
            self.icon = update
                .map(|image| ctx.load_texture("weather-icon", image, egui::TextureOptions::LINEAR));
        }

        egui::TopBottomPanel::top("search").show(ctx, |ui| {
            ui.add_space(10.0);
            self.search_bar(ui);
            ui.add_space(10.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.controller.status());
        });

        egui::CentralPanel::default().show(ctx, |ui| self.display(ui));

        self.history_window(ctx);

        if self.controller.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
