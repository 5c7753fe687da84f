//! Per-message dispatch: global triggers first, then the current stage.
//!
//! Side effects within one message are strictly sequential, in the order
//! written here (a ticket is appended before its alert goes out, a menu
//! is rendered before the stage moves). Any error aborts the rest of the
//! message's effects and surfaces to the catch in `handle_message`.

use balcao_core::{InboundMessage, Rating, SessionRecord, Stage, Ticket};
use balcao_persistence::StoreError;
use balcao_text::{capitalize_word, first_token, normalize, triggers};

use crate::engine::Attendant;
use crate::metrics;
use crate::replies;
use crate::EngineError;

impl Attendant {
    pub(crate) async fn dispatch(&self, message: &InboundMessage) -> Result<(), EngineError> {
        let normalized = normalize(&message.text);

        let session = match self.sessions.get(&message.sender_id).await {
            Ok(Some(session)) => session,
            Ok(None) => return self.greet_new_user(message).await,
            Err(StoreError::UnknownStage {
                user_id,
                value,
                display_name,
            }) => {
                // Corrupt stage value. Recover by going back to the menu;
                // the shared menu path rewrites the record with a valid
                // stage while keeping whatever name was captured.
                tracing::warn!(
                    user_id = %user_id,
                    stage = %value,
                    "unknown session stage, recovering via menu"
                );
                metrics::record_stage_recovery();
                return self.reset_to_menu(message, &display_name).await;
            }
            Err(error) => return Err(error.into()),
        };

        // Exit wins over everything, name or not.
        if triggers::EXIT.matches(&normalized) {
            return self.close_conversation(message, &session).await;
        }

        // Remaining global commands only apply once we know who we are
        // talking to.
        if session.has_name() {
            if triggers::HUMAN_HANDOFF.matches(&normalized) {
                return self.handoff_to_specialist(message, &session).await;
            }
            if triggers::MENU_RESET.matches(&normalized) {
                return self.reset_to_menu(message, &session.display_name).await;
            }
        }

        match session.stage {
            Stage::NameCapture => self.capture_name(message).await,
            Stage::MainMenu => self.menu_input(message, &session, &normalized).await,
            Stage::SupportTriage => self.triage(message, &session).await,
            Stage::AwaitingHuman => self.relay_waiting(message, &session).await,
            Stage::Silent => self.silent_mode(message, &session, &normalized).await,
            Stage::Rating => self.record_rating(message, &session, &normalized).await,
        }
    }

    /// First contact: open a session and ask for a name. Nothing else in
    /// the first message is interpreted.
    async fn greet_new_user(&self, message: &InboundMessage) -> Result<(), EngineError> {
        self.sessions
            .upsert(&message.sender_id, Stage::NameCapture, "")
            .await?;
        self.send_to_user(message, replies::welcome(&self.options.company_name))
            .await?;

        metrics::record_session_created();
        tracing::info!(user_id = %message.sender_id, "new conversation started");
        Ok(())
    }

    /// Global exit: with a name we ask for a rating first, without one
    /// the session just ends.
    async fn close_conversation(
        &self,
        message: &InboundMessage,
        session: &SessionRecord,
    ) -> Result<(), EngineError> {
        if session.has_name() {
            self.sessions
                .upsert(&session.user_id, Stage::Rating, &session.display_name)
                .await?;
            self.send_to_user(message, replies::rating_prompt(&session.display_name))
                .await?;
            tracing::info!(user_id = %session.user_id, "exit requested, asking for rating");
        } else {
            self.send_to_user(message, replies::closing_no_name())
                .await?;
            self.sessions.delete(&session.user_id).await?;
            metrics::record_session_closed();
            tracing::info!(user_id = %session.user_id, "exit before name capture, session closed");
        }
        Ok(())
    }

    /// Global handoff: notify the user, park the session, alert the
    /// specialist with the user's own words as the reason.
    async fn handoff_to_specialist(
        &self,
        message: &InboundMessage,
        session: &SessionRecord,
    ) -> Result<(), EngineError> {
        self.send_to_user(message, replies::handoff_notice(&session.display_name))
            .await?;
        self.sessions
            .upsert(&session.user_id, Stage::AwaitingHuman, &session.display_name)
            .await?;
        self.notify_specialist(replies::handoff_alert(
            &session.display_name,
            &session.user_id,
            message.text.trim(),
        ))
        .await?;

        metrics::record_handoff();
        tracing::info!(user_id = %session.user_id, "handed off to specialist");
        Ok(())
    }

    /// Render the menu and move the session to the menu stage. Also the
    /// recovery path for corrupt stages; the placeholder name is only
    /// rendered, never stored.
    async fn reset_to_menu(
        &self,
        message: &InboundMessage,
        display_name: &str,
    ) -> Result<(), EngineError> {
        let shown = if display_name.is_empty() {
            replies::FALLBACK_NAME
        } else {
            display_name
        };
        self.send_to_user(
            message,
            replies::main_menu(shown, &self.options.company_name),
        )
        .await?;
        self.sessions
            .upsert(&message.sender_id, Stage::MainMenu, display_name)
            .await?;
        Ok(())
    }

    /// Name capture: first token of the raw text, two characters minimum.
    async fn capture_name(&self, message: &InboundMessage) -> Result<(), EngineError> {
        let candidate = first_token(&message.text).unwrap_or_default();
        if candidate.chars().count() < 2 {
            self.send_to_user(message, replies::name_too_short())
                .await?;
            return Ok(());
        }

        let name = capitalize_word(candidate);
        self.send_to_user(message, replies::main_menu(&name, &self.options.company_name))
            .await?;
        self.sessions
            .upsert(&message.sender_id, Stage::MainMenu, &name)
            .await?;

        tracing::info!(user_id = %message.sender_id, name = %name, "name captured");
        Ok(())
    }

    /// Main menu: digits are commands, anything else is a product query.
    async fn menu_input(
        &self,
        message: &InboundMessage,
        session: &SessionRecord,
        normalized: &str,
    ) -> Result<(), EngineError> {
        match normalized {
            "1" => {
                match &self.options.catalog_artifact {
                    Some(reference) => {
                        self.send_to_user(
                            message,
                            replies::catalog_caption(&self.options.company_name),
                        )
                        .await?;
                        self.transport
                            .send_document(&message.sender_id, reference)
                            .await?;
                    }
                    None => {
                        self.send_to_user(message, replies::catalog_unavailable())
                            .await?;
                    }
                }
                // Back to the menu either way; the stage never left it.
                self.send_to_user(
                    message,
                    replies::main_menu(&session.display_name, &self.options.company_name),
                )
                .await?;
                Ok(())
            }
            "2" => {
                self.send_to_user(message, replies::category_prompt(self.catalog.categories()))
                    .await?;
                Ok(())
            }
            "3" => {
                self.send_to_user(message, replies::parts_prompt(&session.display_name))
                    .await?;
                self.sessions
                    .upsert(&session.user_id, Stage::AwaitingHuman, &session.display_name)
                    .await?;
                tracing::info!(user_id = %session.user_id, "parts inquiry, awaiting human");
                Ok(())
            }
            "4" | "5" => {
                self.send_to_user(message, replies::support_prompt(&session.display_name))
                    .await?;
                self.sessions
                    .upsert(&session.user_id, Stage::SupportTriage, &session.display_name)
                    .await?;
                Ok(())
            }
            _ => self.product_query(message).await,
        }
    }

    /// Free-text product search from the menu.
    async fn product_query(&self, message: &InboundMessage) -> Result<(), EngineError> {
        match self.catalog.find(&message.text) {
            Some(hit) => {
                metrics::record_catalog_search(true);
                self.send_to_user(message, replies::product_card(&hit))
                    .await?;
            }
            None => {
                metrics::record_catalog_search(false);
                self.send_to_user(message, replies::option_not_recognized())
                    .await?;
            }
        }
        Ok(())
    }

    /// Support triage: one message is the whole intake. Guess the product
    /// from the text, record the ticket, alert the specialist, go quiet.
    async fn triage(
        &self,
        message: &InboundMessage,
        session: &SessionRecord,
    ) -> Result<(), EngineError> {
        let product = self
            .catalog
            .find(&message.text)
            .map(|hit| hit.product.name.clone())
            .unwrap_or_else(|| replies::UNSPECIFIED_PRODUCT.to_string());

        self.send_to_user(message, replies::triage_ack(&session.display_name))
            .await?;

        let ticket = Ticket::open(
            &session.user_id,
            &session.display_name,
            &product,
            message.text.trim(),
        );
        let ticket_id = self.tickets.append(&ticket).await?;
        self.notify_specialist(replies::ticket_alert(&ticket)).await?;
        self.sessions
            .upsert(&session.user_id, Stage::Silent, &session.display_name)
            .await?;

        metrics::record_ticket_created();
        tracing::info!(
            user_id = %session.user_id,
            ticket_id,
            product = %product,
            "support ticket recorded, going silent"
        );
        Ok(())
    }

    /// A human owns the thread: everything the user says is relayed.
    async fn relay_waiting(
        &self,
        message: &InboundMessage,
        session: &SessionRecord,
    ) -> Result<(), EngineError> {
        let content = if message.has_media {
            replies::MEDIA_SUMMARY
        } else {
            message.text.trim()
        };
        self.notify_specialist(replies::relay(
            &session.display_name,
            &session.user_id,
            content,
        ))
        .await?;
        Ok(())
    }

    /// Silent mode: say nothing unless a wake keyword shows up.
    async fn silent_mode(
        &self,
        message: &InboundMessage,
        session: &SessionRecord,
        normalized: &str,
    ) -> Result<(), EngineError> {
        if triggers::SILENT_WAKE.matches(normalized) {
            tracing::info!(user_id = %session.user_id, "reactivated from silent mode");
            return self.reset_to_menu(message, &session.display_name).await;
        }
        tracing::debug!(user_id = %session.user_id, "silent mode, message ignored");
        Ok(())
    }

    /// Rating capture: store the raw text and close the conversation.
    async fn record_rating(
        &self,
        message: &InboundMessage,
        session: &SessionRecord,
        normalized: &str,
    ) -> Result<(), EngineError> {
        let rating = Rating::new(
            &session.user_id,
            &session.display_name,
            message.text.trim(),
        );
        let rating_id = self.ratings.append(&rating).await?;

        let closing = if normalized.contains('5') || normalized.contains("excelente") {
            replies::closing_warm(&session.display_name)
        } else {
            replies::closing_plain(&session.display_name)
        };
        self.send_to_user(message, closing).await?;
        self.sessions.delete(&session.user_id).await?;

        metrics::record_rating_recorded();
        metrics::record_session_closed();
        tracing::info!(user_id = %session.user_id, rating_id, "rating recorded, session closed");
        Ok(())
    }
}
