//! Discord front-end.
//!
//! Mentioning the bot with a scorecard image (or replying to one) submits a
//! game; slash commands are registered globally once the gateway is ready.

mod slash;

use async_trait::async_trait;
use serenity::all::{
    Attachment, Context, EditMessage, EventHandler, GatewayIntents, GuildId, Interaction,
    Mentionable, Message, Ready, UserId,
};
use serenity::Client;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};

use crate::config::BotConfig;
use crate::engine::{Submission, SubmissionEngine};
use crate::error::WingStatsError;
use crate::notify::StaticDirectory;

pub use slash::command_definitions;

const PROGRESS_TEXT: &str = "Parsing scorecard... please wait.";

/// Attachment content type is an image
pub fn is_image(content_type: Option<&str>) -> bool {
    content_type.map_or(false, |ct| ct.starts_with("image/"))
}

/// Someone other than the bot itself tagged the bot. Other bots count.
pub fn is_submission_request(author: UserId, mentions_bot: bool, bot_id: UserId) -> bool {
    author != bot_id && mentions_bot
}

fn first_image_url(attachments: &[Attachment]) -> Option<String> {
    attachments
        .iter()
        .find(|att| is_image(att.content_type.as_deref()))
        .map(|att| att.url.clone())
}

struct Handler {
    engine: Arc<SubmissionEngine>,
    bot_id: OnceLock<UserId>,
}

impl Handler {
    fn new(engine: Arc<SubmissionEngine>) -> Self {
        Self {
            engine,
            bot_id: OnceLock::new(),
        }
    }

    /// First image on the message, else on the message it replies to
    async fn find_image(&self, ctx: &Context, msg: &Message) -> Option<String> {
        if let Some(url) = first_image_url(&msg.attachments) {
            return Some(url);
        }

        if let Some(referenced) = &msg.referenced_message {
            return first_image_url(&referenced.attachments);
        }

        let reference = msg.message_reference.as_ref()?;
        let message_id = reference.message_id?;
        match reference.channel_id.message(ctx, message_id).await {
            Ok(referenced) => first_image_url(&referenced.attachments),
            Err(e) => {
                // Usually the replied-to message was deleted
                debug!("Could not fetch referenced message {}: {}", message_id, e);
                None
            }
        }
    }

    async fn handle_submission(&self, ctx: &Context, msg: &Message, image_url: String) {
        let mut progress = match msg.reply(ctx, PROGRESS_TEXT).await {
            Ok(progress) => progress,
            Err(e) => {
                error!("❌ Could not reply to {}: {}", msg.author.name, e);
                return;
            }
        };

        let directory = match msg.guild_id {
            Some(guild_id) => guild_directory(ctx, guild_id).await,
            None => StaticDirectory::new(),
        };

        let submission = Submission {
            image_url,
            uploader: msg.author.name.clone(),
        };

        let (content, taunt) = match self.engine.submit(&submission, &directory).await {
            Ok(outcome) => (outcome.announcement, outcome.taunt),
            Err(e) => {
                warn!("⚠️ Submission from {} failed: {}", submission.uploader, e);
                (e.user_message(), None)
            }
        };

        if let Err(e) = progress.edit(ctx, EditMessage::new().content(content)).await {
            error!("❌ Could not edit progress message: {}", e);
        }

        if let Some(taunt) = taunt {
            if let Err(e) = msg.channel_id.say(ctx, taunt).await {
                warn!("⚠️ Failed to send low score taunt: {}", e);
            }
        }
    }
}

/// Guild members as a mention directory; empty when they cannot be listed
async fn guild_directory(ctx: &Context, guild_id: GuildId) -> StaticDirectory {
    let cached: Option<Vec<(String, String)>> = guild_id.to_guild_cached(&ctx.cache).map(|guild| {
        guild
            .members
            .values()
            .map(|m| (m.user.name.clone(), m.user.mention().to_string()))
            .collect()
    });

    let members = match cached {
        Some(members) if !members.is_empty() => members,
        _ => match guild_id.members(ctx, None, None).await {
            Ok(members) => members
                .iter()
                .map(|m| (m.user.name.clone(), m.user.mention().to_string()))
                .collect(),
            Err(e) => {
                warn!("⚠️ Could not list members of guild {}: {}", guild_id, e);
                Vec::new()
            }
        },
    };

    members
        .into_iter()
        .fold(StaticDirectory::new(), |dir, (name, mention)| dir.with_member(name, mention))
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let Some(bot_id) = self.bot_id.get().copied() else {
            return;
        };
        if !is_submission_request(msg.author.id, msg.mentions_user_id(bot_id), bot_id) {
            return;
        }

        info!("📨 Scorecard request from {} in channel {}", msg.author.name, msg.channel_id);

        match self.find_image(&ctx, &msg).await {
            Some(url) => self.handle_submission(&ctx, &msg, url).await,
            None => {
                if let Err(e) = msg.reply(&ctx, WingStatsError::NoImages.user_message()).await {
                    error!("❌ Could not reply to {}: {}", msg.author.name, e);
                }
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            debug!("Slash command /{} from {}", command.data.name, command.user.name);
            if let Err(e) = slash::dispatch(&ctx, &command, &self.engine).await {
                error!("❌ /{} failed: {}", command.data.name, e);
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        let _ = self.bot_id.set(ready.user.id);
        info!("✅ Logged in as {} ({})", ready.user.name, ready.user.id);

        match slash::register_commands(&ctx).await {
            Ok(count) => info!("✅ Synced {} slash commands", count),
            Err(e) => error!("❌ Failed to sync slash commands: {}", e),
        }
    }
}

/// Connect to the gateway and handle events until the client stops
pub async fn run(config: &BotConfig, engine: SubmissionEngine) -> anyhow::Result<()> {
    let token = config.require_token()?;

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(token, intents)
        .event_handler(Handler::new(Arc::new(engine)))
        .await?;

    info!("🚀 Starting Discord client");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
        anyhow::bail!("Discord client error: {:?}", why);
    }

    Ok(())
}
