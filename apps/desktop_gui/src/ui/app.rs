use client_core::{FormSession, ImprovementsView, ResultView, SubmitOutcome};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Feature;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const SUCCESS_FILL: egui::Color32 = egui::Color32::from_rgb(40, 92, 58);
const INFO_FILL: egui::Color32 = egui::Color32::from_rgb(36, 74, 104);
const WARNING_FILL: egui::Color32 = egui::Color32::from_rgb(112, 88, 30);
const ERROR_FILL: egui::Color32 = egui::Color32::from_rgb(111, 53, 53);

pub struct CropAdvisorApp {
    session: FormSession,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    last_error: Option<UiError>,
}

impl CropAdvisorApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            session: FormSession::new(),
            cmd_tx,
            ui_rx,
            status: String::new(),
            last_error: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::PredictionCompleted { ticket_id, result } => {
                match self.session.complete_submission(ticket_id, result) {
                    SubmitOutcome::Applied => {
                        self.status = "Prediction received".to_string();
                        self.last_error = None;
                    }
                    SubmitOutcome::Failed(err) => {
                        let ui_error = UiError::from_prediction(&err);
                        self.status = ui_error.message().to_string();
                        self.last_error = Some(ui_error);
                    }
                    SubmitOutcome::Superseded => {}
                }
            }
            UiEvent::Error(err) => {
                tracing::warn!(
                    context = ?err.context(),
                    category = ?err.category(),
                    "{}",
                    err.message()
                );
                self.status = err.message().to_string();
                self.last_error = Some(err);
            }
        }
    }

    fn submit_form(&mut self) {
        let ticket = self.session.begin_submission();
        let ticket_id = ticket.id;
        self.status = "Predicting...".to_string();
        if let Err(message) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Predict { ticket })
        {
            self.session.abandon_submission(ticket_id);
            self.last_error = Some(UiError::from_message(UiErrorContext::General, &message));
            self.status = message;
        }
    }

    fn clear_form(&mut self) {
        self.session.clear();
        self.last_error = None;
        self.status = "Form cleared".to_string();
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("readings")
            .num_columns(4)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                for (column, feature) in Feature::ALL.into_iter().enumerate() {
                    ui.label(feature.label());
                    let mut value = self.session.fields().get(feature).to_string();
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut value)
                            .hint_text(feature.placeholder())
                            .desired_width(200.0),
                    );
                    if response.changed() {
                        self.session.update_field(feature, value);
                    }
                    if column % 2 == 1 {
                        ui.end_row();
                    }
                }
                ui.end_row();
            });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Predict Crop").clicked() {
                self.submit_form();
            }
            if self.session.is_pending() {
                ui.spinner();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear Form").clicked() {
                    self.clear_form();
                }
            });
        });
    }

    fn show_results(&self, ui: &mut egui::Ui) {
        let ResultView::Submitted {
            predicted_crop,
            improvements,
        } = self.session.view()
        else {
            return;
        };

        ui.add_space(18.0);
        if let Some(crop) = predicted_crop {
            alert(ui, SUCCESS_FILL, |ui| {
                ui.heading(format!("Predicted Crop: {crop}"));
            });
        }
        match improvements {
            ImprovementsView::Suggestions(lines) => alert(ui, INFO_FILL, |ui| {
                ui.heading("Suggested Improvements:");
                for line in lines {
                    ui.label(format!("• {line}"));
                }
            }),
            ImprovementsView::NoneNeeded => alert(ui, WARNING_FILL, |ui| {
                ui.heading("No improvements needed for this crop.");
            }),
        }
    }

    fn show_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(err) = self.last_error.clone() else {
            return;
        };
        alert(ui, ERROR_FILL, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(err.message()).color(egui::Color32::WHITE));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Dismiss").clicked() {
                        self.last_error = None;
                    }
                });
            });
        });
    }
}

fn alert(ui: &mut egui::Ui, fill: egui::Color32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.visuals_mut().override_text_color = Some(egui::Color32::WHITE);
            add_contents(ui);
        });
    ui.add_space(8.0);
}

impl eframe::App for CropAdvisorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.weak(&self.status);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Crop Prediction and Improvement Suggestions");
                });
                ui.add_space(16.0);
                self.show_form(ui);
                ui.add_space(8.0);
                self.show_error_banner(ui);
                self.show_results(ui);
            });
        });

        if self.session.is_pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::PredictionError;
    use crossbeam_channel::bounded;
    use shared::protocol::PredictionResponse;

    fn test_app() -> (CropAdvisorApp, crossbeam_channel::Receiver<BackendCommand>) {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (_ui_tx, ui_rx) = bounded(8);
        (CropAdvisorApp::new(cmd_tx, ui_rx), cmd_rx)
    }

    fn queued_ticket_id(cmd_rx: &crossbeam_channel::Receiver<BackendCommand>) -> u64 {
        match cmd_rx.try_recv().expect("queued command") {
            BackendCommand::Predict { ticket } => ticket.id,
        }
    }

    #[test]
    fn submit_queues_coerced_readings() {
        let (mut app, cmd_rx) = test_app();
        app.session.update_field(Feature::Nitrogen, "90");

        app.submit_form();

        let BackendCommand::Predict { ticket } = cmd_rx.try_recv().expect("queued command");
        assert_eq!(ticket.features.nitrogen, 90.0);
        assert!(ticket.features.rainfall.is_nan());
        assert!(app.session.has_submitted());
        assert!(app.session.is_pending());
    }

    #[test]
    fn completed_prediction_populates_results() {
        let (mut app, cmd_rx) = test_app();
        app.submit_form();
        let ticket_id = queued_ticket_id(&cmd_rx);

        app.handle_event(UiEvent::PredictionCompleted {
            ticket_id,
            result: Ok(PredictionResponse::new("Jute", Vec::new())),
        });

        assert_eq!(
            app.session.view(),
            ResultView::Submitted {
                predicted_crop: Some("Jute"),
                improvements: ImprovementsView::NoneNeeded,
            }
        );
        assert!(app.last_error.is_none());
    }

    #[test]
    fn failed_prediction_is_shown_but_keeps_session_state() {
        let (mut app, cmd_rx) = test_app();
        app.submit_form();
        let ticket_id = queued_ticket_id(&cmd_rx);

        app.handle_event(UiEvent::PredictionCompleted {
            ticket_id,
            result: Err(PredictionError::Status {
                status: 503,
                message: "down".to_string(),
            }),
        });

        assert!(app.session.has_submitted());
        assert!(app.session.result().is_none());
        let err = app.last_error.as_ref().expect("error banner");
        assert!(err.message().contains("503"));
    }

    #[test]
    fn clear_drops_late_response() {
        let (mut app, cmd_rx) = test_app();
        app.submit_form();
        let ticket_id = queued_ticket_id(&cmd_rx);

        app.clear_form();
        app.handle_event(UiEvent::PredictionCompleted {
            ticket_id,
            result: Ok(PredictionResponse::new("Rice", Vec::new())),
        });

        assert_eq!(app.session.view(), ResultView::Editing);
    }

    #[test]
    fn disconnected_backend_reports_error() {
        let (mut app, cmd_rx) = test_app();
        drop(cmd_rx);

        app.submit_form();

        let err = app.last_error.as_ref().expect("error banner");
        assert!(err.message().contains("disconnected"));
        assert!(!app.session.is_pending());
        assert!(app.session.has_submitted());
    }

    #[test]
    fn full_queue_releases_pending_submission() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (_ui_tx, ui_rx) = bounded(8);
        let mut app = CropAdvisorApp::new(cmd_tx, ui_rx);
        app.submit_form();
        assert!(app.session.is_pending());

        app.submit_form();

        let err = app.last_error.as_ref().expect("error banner");
        assert!(err.message().contains("full"));
        assert!(!app.session.is_pending());
        assert_eq!(cmd_rx.len(), 1);
    }
}
