use mchprs_text::{ColorCode, TextComponent, TextComponentBuilder};
use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> BlockPos {
        BlockPos { x, y, z }
    }

    /// The block containing the entity position.
    pub fn from_entity_pos(x: f64, y: f64, z: f64) -> BlockPos {
        BlockPos::new(x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }
}

/// A snapshot of the player that sent a chat message, taken when the event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSender {
    pub uuid: u128,
    pub username: String,
    pub display_name: TextComponent,
    /// The name of the world the player is in
    pub world: String,
    pub pos: BlockPos,
    pub op: bool,
}

impl ChatSender {
    pub fn new(uuid: u128, username: impl Into<String>, world: impl Into<String>) -> ChatSender {
        let username = username.into();
        ChatSender {
            uuid,
            display_name: TextComponent::from(username.clone()),
            username,
            world: world.into(),
            pos: BlockPos::default(),
            op: false,
        }
    }

    pub fn with_display_name(mut self, display_name: TextComponent) -> ChatSender {
        self.display_name = display_name;
        self
    }

    pub fn with_pos(mut self, pos: BlockPos) -> ChatSender {
        self.pos = pos;
        self
    }

    pub fn with_op(mut self, op: bool) -> ChatSender {
        self.op = op;
        self
    }
}

/// Who a rendered chat line is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Console,
    Player(u128),
}

/// The parts of the server a plugin may query or act on while handling an event.
///
/// Implementations must be cheap to call; handlers query them on the event thread.
pub trait ServerContext {
    fn online_players(&self) -> usize;

    fn max_players(&self) -> usize;

    /// The tick counter of the day cycle in `world`
    fn world_time(&self, world: &str) -> i64;

    /// Sends a message directly to a single player.
    fn send_message(&self, player: u128, message: TextComponent);
}

/// Renders the final chat line of an event for a single viewer.
///
/// Arguments are the sender, the current event message and the viewer.
pub type ChatRenderer =
    Box<dyn Fn(&ChatSender, &TextComponent, Viewer) -> TextComponent + Send + Sync>;

/// Fired when a player sends a chat message that is not a command.
pub struct ChatEvent {
    sender: ChatSender,
    message: TextComponent,
    cancelled: bool,
    renderer: Option<ChatRenderer>,
}

impl ChatEvent {
    pub fn new(sender: ChatSender, message: impl Into<TextComponent>) -> ChatEvent {
        ChatEvent {
            sender,
            message: message.into(),
            cancelled: false,
            renderer: None,
        }
    }

    pub fn sender(&self) -> &ChatSender {
        &self.sender
    }

    pub fn message(&self) -> &TextComponent {
        &self.message
    }

    /// Replaces the message, later handlers and the renderer see the new one.
    pub fn set_message(&mut self, message: TextComponent) {
        self.message = message;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// A cancelled event is not broadcasted.
    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn set_renderer(&mut self, renderer: ChatRenderer) {
        self.renderer = Some(renderer);
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Renders the chat line `viewer` receives. Without a registered renderer
    /// this is the vanilla `<username> message` line.
    pub fn render(&self, viewer: Viewer) -> TextComponent {
        match &self.renderer {
            Some(renderer) => renderer(&self.sender, &self.message, viewer),
            None => TextComponentBuilder::new(format!("<{}> ", self.sender.username))
                .color_code(ColorCode::White)
                .append(self.message.clone())
                .finish(),
        }
    }
}

impl fmt::Debug for ChatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatEvent")
            .field("sender", &self.sender)
            .field("message", &self.message)
            .field("cancelled", &self.cancelled)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

pub trait EventHandler: Send + Sync {
    fn on_chat(&self, ctx: &dyn ServerContext, event: &mut ChatEvent);
}
