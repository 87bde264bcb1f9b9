use std::time::Duration;

use client_core::{ClipboardAck, RequestState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::IdentitySnapshot;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_backend_command,
};

const EXPERIENCE_PLACEHOLDER: &str = "Example: I've been a taxi driver for 5 years. I manage my \
     own routes, handle all cash, and maintain the vehicle...";

const ACCENT: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(196, 46, 46);

#[derive(Default)]
struct SignInForm {
    full_name: String,
    email: String,
    token: String,
}

pub struct HustleApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    backend_ready: bool,
    identity: Option<IdentitySnapshot>,
    sign_in: SignInForm,
    experience: String,
    request_state: RequestState,
    clipboard_ack: ClipboardAck,
    status: String,
    banner: Option<UiError>,
}

impl HustleApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            backend_ready: false,
            identity: None,
            sign_in: SignInForm::default(),
            experience: String::new(),
            request_state: RequestState::Idle,
            clipboard_ack: ClipboardAck::Idle,
            status: "Backend worker starting...".to_string(),
            banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendReady => {
                    self.backend_ready = true;
                    self.status = "Ready".to_string();
                }
                UiEvent::SignedIn(identity) => {
                    self.identity = Some(identity);
                    self.sign_in.token.clear();
                    self.banner = None;
                    self.status = "Signed in".to_string();
                }
                UiEvent::SignedOut => {
                    self.identity = None;
                    self.status = "Signed out".to_string();
                }
                UiEvent::RequestStateChanged(state) => {
                    self.request_state = state;
                }
                UiEvent::ClipboardAckChanged(ack) => {
                    self.clipboard_ack = ack;
                }
                UiEvent::Error(err) => {
                    self.status = err.message().to_string();
                    self.banner = Some(err);
                }
            }
        }
    }

    fn header_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("HUSTLE 2 CV").strong().color(ACCENT));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &self.identity {
                        Some(identity) => {
                            if ui.button("Sign out").clicked() {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::SignOut,
                                    &mut self.status,
                                );
                            }
                            let label = identity
                                .email
                                .clone()
                                .or_else(|| identity.full_name.clone())
                                .unwrap_or_else(|| "Guest".to_string());
                            ui.label(label);
                        }
                        None => {
                            ui.label(egui::RichText::new(self.status.as_str()).weak());
                        }
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn landing_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(48.0);
        ui.vertical_centered(|ui| {
            ui.heading("Your skills deserve a professional look.");
            ui.add_space(8.0);
            ui.label(
                "We help taxi drivers, cleaners, and informal workers create world-class CVs \
                 from their daily hustle.",
            );
            ui.add_space(24.0);

            let form_width = 320.0;
            ui.add(
                egui::TextEdit::singleline(&mut self.sign_in.full_name)
                    .desired_width(form_width)
                    .hint_text("Full name"),
            );
            ui.add_space(4.0);
            ui.add(
                egui::TextEdit::singleline(&mut self.sign_in.email)
                    .desired_width(form_width)
                    .hint_text("Email"),
            );
            ui.add_space(4.0);
            ui.add(
                egui::TextEdit::singleline(&mut self.sign_in.token)
                    .desired_width(form_width)
                    .password(true)
                    .hint_text("Access token"),
            );
            ui.add_space(12.0);

            let can_sign_in = self.backend_ready && !self.sign_in.token.trim().is_empty();
            if ui
                .add_enabled(can_sign_in, egui::Button::new("Get Started Now"))
                .clicked()
            {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::SignIn {
                        full_name: self.sign_in.full_name.clone(),
                        email: self.sign_in.email.clone(),
                        token: self.sign_in.token.clone(),
                    },
                    &mut self.status,
                );
            }
        });
    }

    fn form_panel(&mut self, ui: &mut egui::Ui) {
        let first_name = self
            .identity
            .as_ref()
            .and_then(|identity| identity.first_name())
            .unwrap_or("there")
            .to_string();
        ui.heading(format!("Hi {first_name}, turn your Hustle into a CV"));
        ui.add_space(8.0);

        ui.add(
            egui::TextEdit::multiline(&mut self.experience)
                .desired_rows(8)
                .desired_width(f32::INFINITY)
                .hint_text(EXPERIENCE_PLACEHOLDER),
        );
        ui.add_space(8.0);

        let in_flight = self.request_state.is_in_flight();
        let can_generate =
            self.backend_ready && !in_flight && !self.experience.trim().is_empty();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(can_generate, egui::Button::new("Generate Professional CV"))
                .clicked()
            {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::Generate {
                        raw_experience: self.experience.clone(),
                    },
                    &mut self.status,
                );
            }
            if in_flight {
                ui.spinner();
                ui.label("Polishing your CV...");
            }
        });

        if let RequestState::Failed(failure) = &self.request_state {
            ui.add_space(8.0);
            ui.colored_label(ERROR_RED, failure.message.clone());
        }

        if let RequestState::Succeeded(cv) = &self.request_state {
            let cv_text = cv.text.clone();
            ui.add_space(16.0);
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Your Professional Experience:")
                            .strong()
                            .color(ACCENT),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let copy_label = match self.clipboard_ack {
                            ClipboardAck::Copied => "✔ Copied",
                            ClipboardAck::Idle => "Copy",
                        };
                        if ui.button(copy_label).clicked() {
                            dispatch_backend_command(
                                &self.cmd_tx,
                                BackendCommand::CopyResult,
                                &mut self.status,
                            );
                        }
                    });
                });
                ui.separator();
                egui::ScrollArea::vertical()
                    .max_height(320.0)
                    .show(ui, |ui| {
                        ui.add(egui::Label::new(cv_text).wrap());
                    });
            });
        }
    }

    fn banner_panel(&self, ui: &mut egui::Ui) {
        if let Some(banner) = &self.banner {
            ui.colored_label(ERROR_RED, banner.message());
            ui.add_space(8.0);
        }
    }
}

impl eframe::App for HustleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.header_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(12.0);
                self.banner_panel(ui);
                if self.identity.is_some() {
                    self.form_panel(ui);
                } else {
                    self.landing_panel(ui);
                }
            });
        });

        // Backend events arrive on a channel, not through egui input, so
        // keep a modest repaint cadence to pick them up.
        ctx.request_repaint_after(Duration::from_millis(120));
    }
}
