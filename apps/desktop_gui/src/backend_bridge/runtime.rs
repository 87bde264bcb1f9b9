//! Backend worker: a dedicated thread running a tokio runtime that owns the
//! generation controller and drains the UI command queue.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};

use client_core::{
    ClipboardSink, ControllerEvent, GenerationConfig, GenerationController, IdentityProvider,
};
use shared::domain::IdentitySnapshot;

use crate::backend_bridge::{
    clipboard::SystemClipboard, commands::BackendCommand, session::SessionIdentity,
};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let config = match GenerationConfig::for_service(server_url) {
                Ok(config) => config,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("invalid generation service url: {err}");
                    return;
                }
            };

            let session = Arc::new(SessionIdentity::default());
            let controller = GenerationController::new(
                config,
                Arc::clone(&session) as Arc<dyn IdentityProvider>,
                Arc::new(SystemClipboard) as Arc<dyn ClipboardSink>,
            );
            let _ = ui_tx.try_send(UiEvent::BackendReady);

            let mut events = controller.subscribe_events();
            let event_tx = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    let mapped = match event {
                        ControllerEvent::RequestStateChanged(state) => {
                            UiEvent::RequestStateChanged(state)
                        }
                        ControllerEvent::ClipboardAckChanged(ack) => {
                            UiEvent::ClipboardAckChanged(ack)
                        }
                    };
                    let _ = event_tx.try_send(mapped);
                }
            });

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SignIn {
                        full_name,
                        email,
                        token,
                    } => {
                        let identity = IdentitySnapshot {
                            full_name: some_if_not_blank(full_name),
                            email: some_if_not_blank(email),
                        };
                        session.sign_in(identity.clone(), token);
                        let _ = ui_tx.try_send(UiEvent::SignedIn(identity));
                    }
                    BackendCommand::SignOut => {
                        session.sign_out();
                        let _ = ui_tx.try_send(UiEvent::SignedOut);
                    }
                    BackendCommand::Generate { raw_experience } => {
                        controller.update_input(raw_experience).await;
                        let controller = Arc::clone(&controller);
                        // Submit runs on its own task so the command queue
                        // keeps draining while the request is in flight.
                        tokio::spawn(async move { controller.submit().await });
                    }
                    BackendCommand::CopyResult => controller.copy_result().await,
                }
            }
        });
    });
}

fn some_if_not_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
