use crate::color;
use crate::placeholder::{PlaceholderContext, Placeholders};
use crate::services::Services;
use crate::settings::{ChatSettings, SettingsHandle};
use crate::template::{MESSAGE_PLACEHOLDER, Template};
use mchprs_plugin::event::{ChatEvent, ChatSender, EventHandler, ServerContext, Viewer};
use mchprs_text::{LegacySerializer, TextComponent};
use std::sync::Arc;
use tracing::debug;

/// Formats chat events according to the current chat settings.
pub struct ChatFormatListener {
    settings: Arc<SettingsHandle>,
    services: Arc<Services>,
}

impl ChatFormatListener {
    pub fn new(settings: Arc<SettingsHandle>, services: Arc<Services>) -> ChatFormatListener {
        ChatFormatListener { settings, services }
    }

    fn placeholders(
        &self,
        settings: &ChatSettings,
        sender: &ChatSender,
        prefix: &str,
        server: &dyn ServerContext,
    ) -> Placeholders {
        let context = PlaceholderContext::capture(
            sender,
            prefix,
            &settings.config,
            &settings.clock,
            &self.services,
            server,
        );
        let hook = if settings.config.chat.enable_placeholder_hook {
            self.services.placeholders.clone()
        } else {
            None
        };
        Placeholders::new(context, hook)
    }

    fn send_blocked_notice(
        &self,
        settings: &ChatSettings,
        sender: &ChatSender,
        original: &str,
        server: &dyn ServerContext,
    ) {
        let placeholders = self.placeholders(settings, sender, "", server);
        let notice = placeholders
            .expand(settings.config.chat.filter.blocked_message())
            .replace(MESSAGE_PLACEHOLDER, original);
        server.send_message(sender.uuid, LegacySerializer::ampersand().deserialize(&notice));
    }
}

impl EventHandler for ChatFormatListener {
    fn on_chat(&self, server: &dyn ServerContext, event: &mut ChatEvent) {
        if event.is_cancelled() {
            return;
        }

        let settings = self.settings.snapshot();
        let permissions = &settings.config.permissions;
        let sender = event.sender().clone();
        let original = event.message().plain_text();

        let bypass = self
            .services
            .has_permission(&sender, permissions.chat_filter_bypass());
        let result = settings.filter.check(&original, bypass);
        if result.blocked {
            event.set_cancelled(true);
            if settings.config.chat.filter.send_blocked_message {
                self.send_blocked_notice(&settings, &sender, &result.message, server);
            }
            debug!("Blocked chat message from {}: {:?}", sender.username, original);
            return;
        }
        event.set_message(TextComponent::from(result.message));

        let prefix = self.services.resolve_prefix(&sender);
        let placeholders = self.placeholders(&settings, &sender, &prefix, server);
        let line = Template::build(
            settings.config.chat.format(),
            &placeholders,
            settings.config.chat.enable_legacy_codes_in_format,
        );

        let services = Arc::clone(&self.services);
        let render = move |source: &ChatSender, message: &TextComponent, _: Viewer| {
            let permissions = &settings.config.permissions;
            let colors = services.has_permission(source, permissions.chat_color());
            let formats = services.has_permission(source, permissions.chat_format());
            let body = color::player_message(&message.plain_text(), colors, formats);
            let wrapped = Template::build(
                settings.config.chat.message_format(),
                &placeholders,
                settings.config.chat.enable_legacy_codes_in_message_format,
            )
            .wrap(body);
            line.wrap(wrapped)
        };
        event.set_renderer(Box::new(render));
    }
}
